//! Shared dying and fading sequence

use crate::collab::{Ability, Area, LootDrop, LootKind};

use crate::geometry::Vec2;

use super::events::EncounterEvent;
use super::frame::Frame;
use super::phase::{PhaseDescriptor, PhaseKind};
use super::script::{enter_phase, BossScript};

/// Entry hook of the dying phase
pub fn enter_dying<B: BossScript>(boss: &mut B, frame: &mut Frame<'_>) {
    boss.core_mut().flash.reset();
    boss.on_defeated(frame);
}

/// Wait for the death dialogue to close, then fade
pub fn tick_dying<B: BossScript>(boss: &mut B, frame: &mut Frame<'_>) {
    if !frame.dialogue.is_text_box_open() {
        enter_phase(boss, frame, B::Phase::FADING);
    }
}

/// Fade the body out; rewards go out once, at zero alpha
pub fn tick_fading<B: BossScript>(boss: &mut B, frame: &mut Frame<'_>) {
    let core = boss.core_mut();
    core.fade_alpha -= core.fade_rate * frame.dt;
    if core.fade_alpha > 0.0 {
        return;
    }
    core.fade_alpha = 0.0;

    if !core.rewarded {
        core.rewarded = true;
        boss.on_faded(frame);
        boss.clear_entities();
    }
    boss.core_mut().finished = true;
}

/// Drop the ability loot, heal the player and restore the area music
pub fn grant_rewards(
    frame: &mut Frame<'_>,
    position: Vec2,
    group_id: i32,
    ability: Ability,
    area: Area,
) {
    let drop = LootDrop::new(LootKind::NewAbility(ability), position).with_group(group_id);
    frame.scene.add_loot(drop);
    frame.events.push(EncounterEvent::LootDropped { at: frame.now, drop });
    log::info!("Dropped {:?} for group {}", ability, group_id);

    let max = frame.player.max_health();
    frame.player.set_health(max);
    frame.scene.play_area_music(area);
}

/// Hooks for a boss' dying phase
pub fn dying_descriptor<B: BossScript>() -> PhaseDescriptor<B> {
    PhaseDescriptor::new()
        .on_enter(enter_dying::<B>)
        .tick(tick_dying::<B>)
}

pub fn fading_descriptor<B: BossScript>() -> PhaseDescriptor<B> {
    PhaseDescriptor::new().tick(tick_fading::<B>)
}
