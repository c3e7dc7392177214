//! External collaborators
//!
//! The encounter core never reaches into the rest of the game directly. The
//! player, dialogue windows, trigger groups, scene effects and the generic
//! projectile layer are reached through the traits in this module, bundled by
//! a [`Host`] that the encounter controller owns.

pub mod cues;
pub mod player;
pub mod services;
pub mod sandbox;

pub use cues::{Ability, Area, LootDrop, LootKind, MusicTrack, SoundCue};
pub use player::{PlayerActor, PlayerAttack};
pub use services::{
    Dialogue, Host, ProjectileKind, ProjectileSpec, Projectiles, Scene, Services, TriggerGroups,
};
pub use sandbox::{
    PlayerHit, SandboxDialogue, SandboxHost, SandboxPlayer, SandboxProjectiles, SandboxScene,
    SandboxTriggers, SceneCall,
};
