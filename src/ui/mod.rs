//! User Interface module
//!
//! Terminal arena viewer for running a boss encounter against the sandbox
//! collaborators.

pub mod app;
pub mod session;

pub use app::App;
pub use session::{ActiveEncounter, Session};
