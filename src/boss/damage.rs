//! Damage and invulnerability negotiation

use super::events::EncounterEvent;
use super::frame::Frame;
use super::health::DamageOutcome;
use super::phase::PhaseKind;
use super::script::{enter_phase, BossScript};

/// Damage the boss. A hit outside a flash window starts one and plays the
/// hit reaction. The amount is always applied, and the first crossing to
/// zero enters the dying phase.
pub fn deal_damage<B: BossScript>(boss: &mut B, frame: &mut Frame<'_>, amount: f32) -> DamageOutcome {
    let now = frame.now;

    if boss.core_mut().flash.trigger(now) {
        boss.hit_reaction(frame);
    } else {
        frame.events.push(EncounterEvent::HitSuppressed { at: now });
    }

    let outcome = boss.core_mut().health.damage(amount);
    frame.events.push(EncounterEvent::BossDamaged {
        at: now,
        amount,
        health: outcome.after,
    });
    log::debug!("{} took {:.2} damage ({:.2} left)", boss.name(), amount, outcome.after);

    if outcome.crossed_zero() && !boss.core().phase.current().is_terminal() {
        log::info!("{} defeated", boss.name());
        enter_phase(boss, frame, B::Phase::DYING);
    }

    outcome
}

/// Heal the boss, clamped at max health. Never flashes.
pub fn heal_damage<B: BossScript>(boss: &mut B, frame: &mut Frame<'_>, amount: f32) -> f32 {
    let gained = boss.core_mut().health.heal(amount);
    if gained > 0.0 {
        frame.events.push(EncounterEvent::BossHealed {
            at: frame.now,
            amount: gained,
            health: boss.core().health.current(),
        });
    }
    gained
}
