//! Boss behaviour trait and phase transitions

use rand::Rng;

use crate::collab::SoundCue;
use crate::render::Canvas;

use super::state::BossCore;
use super::events::EncounterEvent;
use super::frame::Frame;
use super::phase::{PhaseDescriptor, PhaseKind};

/// Behaviour plugged into the generic encounter controller
pub trait BossScript: Sized {
    type Phase: PhaseKind;

    fn name(&self) -> &'static str;

    fn core(&self) -> &BossCore<Self::Phase>;

    fn core_mut(&mut self) -> &mut BossCore<Self::Phase>;

    /// Hooks for one phase
    fn descriptor(phase: Self::Phase) -> PhaseDescriptor<Self>;

    /// Advance every sub-entity pool
    fn update_entities(&mut self, frame: &mut Frame<'_>);

    /// Resolve collisions between the player, the boss and its sub-entities
    fn arbitrate(&mut self, frame: &mut Frame<'_>);

    /// Run once when the boss enters its dying phase
    fn on_defeated(&mut self, frame: &mut Frame<'_>);

    /// Run once when the fade-out completes; hands out the rewards
    fn on_faded(&mut self, frame: &mut Frame<'_>);

    /// Drop every live sub-entity
    fn clear_entities(&mut self);

    /// Remove sub-entities retired during this frame
    fn compact(&mut self);

    fn draw(&self, canvas: &mut dyn Canvas, now: f32);

    /// Phase the debug skip jumps to from the current one
    fn skip_target(&self) -> Option<Self::Phase> {
        None
    }

    /// Reaction to a hit that opened a new flash window
    fn hit_reaction(&mut self, frame: &mut Frame<'_>) {
        let variant = frame.rng.gen_range(0..3u8);
        frame.play(SoundCue::BossHit(variant));
    }
}

/// Run the initial phase's entry hook without an exit
pub fn begin<B: BossScript>(boss: &mut B, frame: &mut Frame<'_>) {
    let initial = boss.core().phase.current();
    boss.core_mut().phase.reset(initial, frame.now);
    log::info!("{} starts in phase {}", boss.name(), initial.name());
    (B::descriptor(initial).on_enter)(boss, frame);
}

/// The only way the active phase changes: exit hook, timer reset, entry hook
pub fn enter_phase<B: BossScript>(boss: &mut B, frame: &mut Frame<'_>, next: B::Phase) {
    let previous = boss.core().phase.current();
    (B::descriptor(previous).on_exit)(boss, frame);

    boss.core_mut().phase.reset(next, frame.now);
    frame.events.push(EncounterEvent::PhaseEntered {
        at: frame.now,
        from: previous.name(),
        to: next.name(),
    });
    log::info!("{}: {} -> {}", boss.name(), previous.name(), next.name());

    (B::descriptor(next).on_enter)(boss, frame);
}

/// Run the active phase's per-frame hook
pub fn tick_phase<B: BossScript>(boss: &mut B, frame: &mut Frame<'_>) {
    let current = boss.core().phase.current();
    (B::descriptor(current).tick)(boss, frame);
}
