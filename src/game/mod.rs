//! Game module - clock and difficulty shared by every encounter

mod clock;
mod difficulty;

pub use clock::GameClock;
pub use difficulty::Difficulty;
