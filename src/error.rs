//! Error types
//!
//! Encounter frames never fail. Errors only come from building a boss
//! (missing resources, bad tuning) and from reading or writing tuning files.

use thiserror::Error;

use crate::data::ResourceKind;

/// Errors raised while configuring or constructing a boss
#[derive(Debug, Error)]
pub enum BossError {
    #[error("missing {kind} resource `{name}`")]
    MissingResource { kind: ResourceKind, name: String },

    #[error("invalid tuning for {boss}: {reason}")]
    InvalidTuning { boss: &'static str, reason: String },

    #[error("failed to access boss data: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to parse boss data: {0}")]
    Parse(#[from] ron::error::SpannedError),

    #[error("failed to serialize boss data: {0}")]
    Serialize(#[from] ron::Error),
}

pub type Result<T> = std::result::Result<T, BossError>;
