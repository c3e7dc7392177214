//! Dialogue, trigger, scene and projectile collaborators

use serde::{Deserialize, Serialize};

use crate::bosses::BossKind;
use crate::collab::cues::{Area, LootDrop, MusicTrack, SoundCue};
use crate::collab::player::PlayerActor;
use crate::geometry::{Rect, Vec2};
use crate::render::Color;

/// Dialogue window collaborator. Polled every frame, never called back.
pub trait Dialogue {
    fn open_dialogue_text_box(&mut self, speaker_id: i32, text_id: u32);

    fn is_text_box_open(&self) -> bool;
}

/// Enemy-block trigger groups
pub trait TriggerGroups {
    /// Has the player walked into this group's trigger yet?
    fn has_triggered(&self, group_id: i32) -> bool;

    /// The group's enemies are dead; release its blocks
    fn notify_of_death(&mut self, group_id: i32);
}

/// Fire-and-forget scene effects
pub trait Scene {
    fn add_loot(&mut self, drop: LootDrop);

    fn set_screen_tint(&mut self, color: Color, alpha: f32);

    fn clear_screen_tint(&mut self);

    fn play_sound(&mut self, cue: SoundCue);

    fn play_music(&mut self, track: MusicTrack);

    fn fade_out_music(&mut self);

    fn play_area_music(&mut self, area: Area);

    /// Persist that this boss has been beaten
    fn record_boss_defeated(&mut self, boss: BossKind);
}

/// Projectile types handled by the generic projectile layer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ProjectileKind {
    /// Tentacle slime ball
    Slime,
    /// Aimed shot from the egg boss' eyes
    EyeBolt,
    /// Shot from a grid launcher
    GridBolt,
    /// Player's lightning orb
    LightningOrb,
}

/// Parameters for a projectile handed to the projectile layer
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ProjectileSpec {
    pub kind: ProjectileKind,
    pub origin: Vec2,
    /// Heading in radians
    pub angle: f32,
    pub speed: f32,
    pub damage: f32,
    /// Hurts the player (as opposed to enemies)
    pub hostile: bool,
    /// Travel distance after which the projectile lands, if any
    pub max_distance: Option<f32>,
}

/// Generic projectile layer
pub trait Projectiles {
    fn spawn_projectile(&mut self, spec: ProjectileSpec);

    /// Remove every projectile of `kind` inside `rect`, returning how many died
    fn kill_projectiles_in_box(&mut self, rect: &Rect, kind: ProjectileKind) -> usize;
}

/// Borrowed view of every collaborator for one frame
pub struct Services<'a> {
    pub player: &'a mut dyn PlayerActor,
    pub dialogue: &'a mut dyn Dialogue,
    pub triggers: &'a mut dyn TriggerGroups,
    pub scene: &'a mut dyn Scene,
    pub projectiles: &'a mut dyn Projectiles,
}

/// Owner of the collaborators injected into an encounter
pub trait Host {
    fn services(&mut self) -> Services<'_>;
}
