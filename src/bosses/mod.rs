//! Boss roster
//!
//! Every boss runs on the shared phase machine, damage negotiator and death
//! sequence; this module only holds what makes each of them different.

pub mod conservatory;
pub mod eldritch;
pub mod fire;

pub use conservatory::{ConservatoryBoss, ConservatoryPhase};
pub use eldritch::{EldritchBoss, EldritchPhase, EyeKind};
pub use fire::{FireBoss, FirePhase};

use clap::ValueEnum;
use serde::{Deserialize, Serialize};

use crate::collab::{Ability, Area};
use crate::data::{ResourceRef, ResourceSet};

/// The bosses of the game
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ValueEnum)]
pub enum BossKind {
    /// Forest of Fungoria boss
    #[value(alias = "lovecraft")]
    Eldritch,
    /// Conservatory boss
    #[value(alias = "egg")]
    Conservatory,
    /// Fiery Caverns boss
    Fire,
}

impl BossKind {
    pub const ALL: [BossKind; 3] = [BossKind::Eldritch, BossKind::Conservatory, BossKind::Fire];

    /// Name shown on the health bar
    pub fn name(&self) -> &'static str {
        match self {
            BossKind::Eldritch => "Magnitogorsk",
            BossKind::Conservatory => "Barvinoid",
            BossKind::Fire => "Fenwar's Flame",
        }
    }

    /// Get the boss glyph
    pub fn glyph(&self) -> char {
        match self {
            BossKind::Eldritch => 'M',
            BossKind::Conservatory => 'B',
            BossKind::Fire => 'F',
        }
    }

    /// Get the boss color
    pub fn color(&self) -> (u8, u8, u8) {
        match self {
            BossKind::Eldritch => (120, 200, 120),
            BossKind::Conservatory => (220, 200, 160),
            BossKind::Fire => (255, 120, 40),
        }
    }

    /// Area whose music plays again after the fight
    pub fn area(&self) -> Area {
        match self {
            BossKind::Eldritch => Area::ForestOfFungoria,
            BossKind::Conservatory => Area::Conservatory,
            BossKind::Fire => Area::FieryCaverns,
        }
    }

    /// Ability dropped on defeat
    pub fn reward(&self) -> Ability {
        match self {
            BossKind::Eldritch => Ability::Shrink,
            BossKind::Conservatory => Ability::Hover,
            BossKind::Fire => Ability::FireBreath,
        }
    }

    /// Resources the boss draws with
    pub fn required_resources(&self) -> &'static [ResourceRef] {
        match self {
            BossKind::Eldritch => eldritch::REQUIRED_RESOURCES,
            BossKind::Conservatory => conservatory::REQUIRED_RESOURCES,
            BossKind::Fire => fire::REQUIRED_RESOURCES,
        }
    }
}

/// Catalog holding every resource any boss needs
pub fn full_catalog() -> ResourceSet {
    let mut set = ResourceSet::new();
    for kind in BossKind::ALL {
        for &(resource, name) in kind.required_resources() {
            set.insert(resource, name);
        }
    }
    set
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::require_resources;

    #[test]
    fn test_command_line_names() {
        assert_eq!(BossKind::from_str("Eldritch", true), Ok(BossKind::Eldritch));
        assert_eq!(BossKind::from_str("egg", true), Ok(BossKind::Conservatory));
        assert_eq!(BossKind::from_str("fire", false), Ok(BossKind::Fire));
        assert!(BossKind::from_str("dragon", true).is_err());
    }

    #[test]
    fn test_full_catalog_covers_every_boss() {
        let catalog = full_catalog();
        for kind in BossKind::ALL {
            assert!(require_resources(&catalog, kind.required_resources()).is_ok());
        }
    }

    #[test]
    fn test_rewards_are_distinct() {
        assert_ne!(BossKind::Eldritch.reward(), BossKind::Fire.reward());
        assert_eq!(BossKind::Conservatory.area(), Area::Conservatory);
    }
}
