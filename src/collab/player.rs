//! Player collaborator
//!
//! The single shared actor every boss and sub-entity tests against.

use serde::{Deserialize, Serialize};

use crate::geometry::{Circle, Shape, Vec2};

/// Player attacks that bosses hit-test against
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PlayerAttack {
    Tongue,
    FireBreath,
    IceBreath,
}

/// Interface the encounter needs from the player
pub trait PlayerActor {
    fn position(&self) -> Vec2;

    /// Collision volume used for contact damage
    fn collision_circle(&self) -> Circle;

    /// Apply damage; `makes_flash` starts the player's own hit flash
    fn deal_damage(&mut self, amount: f32, makes_flash: bool);

    /// Apply damage and push the player away from `origin`
    fn deal_damage_and_knockback(
        &mut self,
        amount: f32,
        makes_flash: bool,
        always_knockback: bool,
        force: f32,
        origin: Vec2,
    );

    fn health(&self) -> f32;

    fn max_health(&self) -> f32;

    fn set_health(&mut self, health: f32);

    /// Whether the given attack is currently active and overlaps `shape`
    fn attack_hits(&self, attack: PlayerAttack, shape: &Shape) -> bool;

    /// Damage dealt by the given attack
    fn attack_damage(&self, attack: PlayerAttack) -> f32;

    /// Suppress (or restore) player input and movement
    fn set_frozen(&mut self, frozen: bool);
}
