//! Loot pickup
//!
//! Bosses drop their loot through the scene collaborator. The loot manager
//! holds dropped loot until the player walks over it, then applies it. Boss
//! loot carries the encounter's group id so the arena's enemy blocks only
//! open once the reward has actually been collected.

use crate::collab::{Ability, LootDrop, LootKind, PlayerActor, TriggerGroups};
use crate::geometry::Circle;

/// Result of collecting one piece of loot
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Pickup {
    /// Player regained health
    Healed(f32),
    /// Player learned an ability
    AbilityGranted(Ability),
}

/// Holds loot on the ground until it is picked up
#[derive(Debug, Clone)]
pub struct LootManager {
    drops: Vec<LootDrop>,
    /// Abilities granted so far, in pickup order
    granted: Vec<Ability>,
    /// Health given by a health pickup
    health_per_pickup: f32,
}

impl LootManager {
    pub fn new() -> Self {
        Self {
            drops: Vec::new(),
            granted: Vec::new(),
            health_per_pickup: 1.0,
        }
    }

    /// Drop a piece of loot
    pub fn add(&mut self, drop: LootDrop) {
        log::debug!("Loot {:?} dropped at ({:.0}, {:.0})", drop.kind, drop.position.x, drop.position.y);
        self.drops.push(drop);
    }

    /// Loot currently on the ground
    pub fn drops(&self) -> &[LootDrop] {
        &self.drops
    }

    /// Abilities granted so far
    pub fn granted(&self) -> &[Ability] {
        &self.granted
    }

    pub fn has_ability(&self, ability: Ability) -> bool {
        self.granted.contains(&ability)
    }

    /// Collect whatever loot the player is touching
    pub fn update(
        &mut self,
        player: &mut dyn PlayerActor,
        triggers: &mut dyn TriggerGroups,
    ) -> Vec<Pickup> {
        let mut pickups = Vec::new();
        let player_circle = player.collision_circle();
        let health_per_pickup = self.health_per_pickup;
        let granted = &mut self.granted;

        self.drops.retain(|drop| {
            let area = Circle::new(drop.position, drop.kind.pickup_radius()).bounds();
            if !player_circle.overlaps_rect(&area) {
                return true;
            }

            match drop.kind {
                LootKind::Health => {
                    // Full health leaves the pickup on the ground
                    if player.health() >= player.max_health() {
                        return true;
                    }
                    let before = player.health();
                    let after = (before + health_per_pickup).min(player.max_health());
                    player.set_health(after);
                    pickups.push(Pickup::Healed(after - before));
                }
                LootKind::NewAbility(ability) => {
                    log::info!("New ability collected: {:?}", ability);
                    if !granted.contains(&ability) {
                        granted.push(ability);
                    }
                    pickups.push(Pickup::AbilityGranted(ability));
                    if let Some(group_id) = drop.group_id {
                        triggers.notify_of_death(group_id);
                    }
                }
            }
            false
        });

        pickups
    }

    /// Remove all loot
    pub fn reset(&mut self) {
        self.drops.clear();
    }
}

impl Default for LootManager {
    fn default() -> Self {
        Self::new()
    }
}
