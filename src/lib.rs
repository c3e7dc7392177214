//! Bossworks - frame-stepped boss encounters for 2D action games
//!
//! Each boss is a phase machine driven once per frame. It owns pools of
//! short-lived sub-entities and talks to the rest of the game only through
//! the collaborator traits in [`collab`].

pub mod geometry;
pub mod game;
pub mod collab;
pub mod render;
pub mod data;
pub mod boss;
pub mod pools;
pub mod bosses;
pub mod loot;
pub mod error;
pub mod ui;

// Re-export commonly used types
pub use boss::{BossScript, Encounter, EncounterEvent};
pub use bosses::BossKind;
pub use collab::{Host, SandboxHost};
pub use data::BossTunings;
pub use error::BossError;
pub use game::Difficulty;
