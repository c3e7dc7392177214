//! Draw collaborator
//!
//! Sprite and mesh rendering live outside the engine. Bosses describe what to
//! draw through [`Canvas`]; the host decides how.

mod canvas;

pub use canvas::{Canvas, Color, DrawCmd, DrawList};
