//! Boss encounter core
//!
//! Shared machinery every boss runs on: health, the invulnerability flash,
//! the generic phase machine, the damage negotiator, the dying and fading
//! sequence and the per-frame encounter controller.

mod damage;
mod death;
mod encounter;
mod events;
mod flash;
mod frame;
mod health;
mod indicator;
mod phase;
mod script;
mod state;

pub use damage::{deal_damage, heal_damage};
pub use death::{dying_descriptor, enter_dying, fading_descriptor, grant_rewards, tick_dying, tick_fading};
pub use encounter::Encounter;
pub use events::{EncounterEvent, EventLog};
pub use flash::FlashWindow;
pub use frame::Frame;
pub use health::{BossHealth, DamageOutcome};
pub use indicator::{Indicator, IndicatorState};
pub use phase::{PhaseDescriptor, PhaseHook, PhaseKind, PhaseMachine};
pub use script::{begin, enter_phase, tick_phase, BossScript};
pub use state::BossCore;
