//! Difficulty settings
//!
//! Bosses scale their health and regeneration from the chosen difficulty.

use clap::ValueEnum;
use serde::{Deserialize, Serialize};

/// Game difficulty levels
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize, ValueEnum)]
pub enum Difficulty {
    VeryEasy,
    Easy,
    #[default]
    Normal,
    Hard,
    VeryHard,
}

impl Difficulty {
    pub const ALL: [Difficulty; 5] = [
        Difficulty::VeryEasy,
        Difficulty::Easy,
        Difficulty::Normal,
        Difficulty::Hard,
        Difficulty::VeryHard,
    ];

    /// Divisor applied to boss base health (max health = base / modifier)
    pub fn health_modifier(&self) -> f32 {
        match self {
            Difficulty::VeryEasy => 1.6,
            Difficulty::Easy => 1.3,
            Difficulty::Normal => 1.0,
            Difficulty::Hard => 0.85,
            Difficulty::VeryHard => 0.7,
        }
    }

    /// Multiplier for boss health regeneration
    pub fn heal_rate_multiplier(&self) -> f32 {
        match self {
            Difficulty::VeryEasy | Difficulty::Easy => 0.8,
            Difficulty::Normal => 1.0,
            Difficulty::Hard | Difficulty::VeryHard => 1.3,
        }
    }

    /// Scale a base health value for this difficulty
    pub fn scale_health(&self, base: f32) -> f32 {
        base / self.health_modifier()
    }

    pub fn name(&self) -> &'static str {
        match self {
            Difficulty::VeryEasy => "Very Easy",
            Difficulty::Easy => "Easy",
            Difficulty::Normal => "Normal",
            Difficulty::Hard => "Hard",
            Difficulty::VeryHard => "Very Hard",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normal_is_unscaled() {
        assert_eq!(Difficulty::Normal.scale_health(17.0), 17.0);
        assert_eq!(Difficulty::Normal.heal_rate_multiplier(), 1.0);
    }

    #[test]
    fn test_harder_means_more_health() {
        let mut last = 0.0;
        for difficulty in Difficulty::ALL {
            let hp = difficulty.scale_health(10.0);
            assert!(hp > last, "{} should have more health", difficulty.name());
            last = hp;
        }
    }

    #[test]
    fn test_command_line_names() {
        assert_eq!(Difficulty::from_str("hard", false), Ok(Difficulty::Hard));
        assert_eq!(Difficulty::from_str("very-easy", false), Ok(Difficulty::VeryEasy));
        assert!(Difficulty::from_str("brutal", true).is_err());
    }
}
