//! Boss data and external content
//!
//! Tuning tables are loaded from RON files so fights can be rebalanced
//! without a rebuild. Resources a boss draws with are checked up front.

pub mod loader;
pub mod resources;
pub mod tuning;

pub use loader::{export_default_tunings, TUNING_FILE};
pub use resources::{require_resources, ResourceCatalog, ResourceKind, ResourceRef, ResourceSet};
pub use tuning::{
    BossTunings, CommonTuning, ConservatoryTuning, CrusherTuning, EldritchTuning, FireBallTuning,
    FireTuning, FloatingEyeTuning, OrbTuning, Span, TentacleTuning,
};
