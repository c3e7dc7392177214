use rand::rngs::StdRng;

use crate::collab::{Dialogue, PlayerActor, Projectiles, Scene, Services, SoundCue, TriggerGroups};
use crate::game::Difficulty;
use crate::geometry::Vec2;
use crate::pools::SubEntityKind;

use super::events::{EncounterEvent, EventLog};

/// Everything a boss may touch during one frame
pub struct Frame<'a> {
    /// Game time at the start of this frame
    pub now: f32,
    pub dt: f32,
    pub difficulty: Difficulty,
    pub rng: &'a mut StdRng,
    pub player: &'a mut dyn PlayerActor,
    pub dialogue: &'a mut dyn Dialogue,
    pub triggers: &'a mut dyn TriggerGroups,
    pub scene: &'a mut dyn Scene,
    pub projectiles: &'a mut dyn Projectiles,
    pub events: &'a mut EventLog,
}

impl<'a> Frame<'a> {
    pub fn new(
        now: f32,
        dt: f32,
        difficulty: Difficulty,
        rng: &'a mut StdRng,
        services: Services<'a>,
        events: &'a mut EventLog,
    ) -> Self {
        Self {
            now,
            dt,
            difficulty,
            rng,
            player: services.player,
            dialogue: services.dialogue,
            triggers: services.triggers,
            scene: services.scene,
            projectiles: services.projectiles,
            events,
        }
    }

    /// Seconds elapsed since `timestamp`
    pub fn since(&self, timestamp: f32) -> f32 {
        self.now - timestamp
    }

    pub fn play(&mut self, cue: SoundCue) {
        self.scene.play_sound(cue);
    }

    pub fn spawned(&mut self, kind: SubEntityKind) {
        log::debug!("Spawned {:?} at t={:.2}", kind, self.now);
        self.events.push(EncounterEvent::Spawned { at: self.now, kind });
    }

    pub fn removed(&mut self, kind: SubEntityKind, count: usize) {
        for _ in 0..count {
            self.events.push(EncounterEvent::Removed { at: self.now, kind });
        }
    }

    /// Contact damage to the player, recorded in the event log
    pub fn hurt_player(&mut self, source: &'static str, amount: f32) {
        self.player.deal_damage(amount, true);
        self.events.push(EncounterEvent::PlayerHit { at: self.now, amount, source });
    }

    /// Contact damage that also pushes the player away from `origin`
    pub fn knock_player(&mut self, source: &'static str, amount: f32, force: f32, origin: Vec2) {
        self.player.deal_damage_and_knockback(amount, true, false, force, origin);
        self.events.push(EncounterEvent::PlayerHit { at: self.now, amount, source });
    }
}
