//! Sub-entity pools
//!
//! Short-lived actors a boss spawns during a fight. Each variant runs its own
//! little state machine and reports back to its boss through return values;
//! the boss decides what the player and the scene get to see.

mod arena;
mod crusher;
mod fireball;
mod floating_eye;
mod orb;
mod tentacle;

pub use arena::{Handle, Lifecycle, Pool, SubEntity, SubEntityKind};
pub use crusher::{Crusher, CrusherState, Slammed};
pub use fireball::FireBall;
pub use floating_eye::{Blast, FloatingEye, FloatingEyeState};
pub use orb::ProjectileOrb;
pub use tentacle::{Tentacle, TentacleCue, TentacleState};
