//! Collision primitives
//!
//! Points, axis-aligned boxes and circles. Every overlap test the encounter
//! code performs goes through this module.

mod shapes;

pub use shapes::{Circle, Rect, Shape, Vec2};
