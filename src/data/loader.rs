//! RON data loader
//!
//! Loads boss tunings from an external RON file, with fallback to the
//! built-in defaults.

use std::fs;
use std::path::{Path, PathBuf};

use crate::error::{BossError, Result};
use super::tuning::BossTunings;

/// File name of the tuning tables inside a data directory
pub const TUNING_FILE: &str = "bosses.ron";

impl BossTunings {
    /// Load and validate tunings from a RON file
    pub fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)?;
        let tunings: BossTunings = ron::from_str(&content)?;
        tunings.validate()?;
        log::info!("Loaded boss tunings from {}", path.display());
        Ok(tunings)
    }

    /// Load `bosses.ron` from `dir`, falling back to the defaults
    pub fn load_or_default(dir: &Path) -> Self {
        let path = dir.join(TUNING_FILE);
        if !path.exists() {
            log::debug!("No {} in {}, using default tunings", TUNING_FILE, dir.display());
            return Self::default();
        }

        match Self::load(&path) {
            Ok(tunings) => tunings,
            Err(e) => {
                log::warn!("Failed to load {}: {}. Using defaults.", path.display(), e);
                Self::default()
            }
        }
    }

    /// Serialize to pretty RON
    pub fn to_ron(&self) -> Result<String> {
        Ok(ron::ser::to_string_pretty(self, ron::ser::PrettyConfig::default())?)
    }
}

/// Export the default tunings to `dir/bosses.ron` for easy editing
pub fn export_default_tunings(dir: &Path) -> Result<PathBuf> {
    if !dir.exists() {
        fs::create_dir_all(dir)?;
    }

    let path = dir.join(TUNING_FILE);
    fs::write(&path, BossTunings::default().to_ron()?)?;
    log::info!("Exported default boss tunings to {}", path.display());
    Ok(path)
}
