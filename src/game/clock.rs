//! Game clock
//!
//! Monotonic game time advanced only by the per-frame delta. Everything that
//! waits stores a timestamp from here and compares against `now()`.

/// Frame-stepped game clock
#[derive(Debug, Clone, Copy, Default)]
pub struct GameClock {
    /// Total elapsed game time in seconds
    now: f32,
    /// Delta of the most recent frame
    last_delta: f32,
    /// Number of frames advanced
    frames: u64,
}

impl GameClock {
    /// Create a clock starting at time zero
    pub fn new() -> Self {
        Self::default()
    }

    /// Advance by `delta` seconds. Negative deltas are treated as zero.
    pub fn advance(&mut self, delta: f32) -> f32 {
        let delta = if delta.is_finite() { delta.max(0.0) } else { 0.0 };
        self.now += delta;
        self.last_delta = delta;
        self.frames += 1;
        delta
    }

    /// Current game time
    pub fn now(&self) -> f32 {
        self.now
    }

    /// Delta of the last `advance` call
    pub fn last_delta(&self) -> f32 {
        self.last_delta
    }

    pub fn frames(&self) -> u64 {
        self.frames
    }

    /// Seconds elapsed since `timestamp`
    pub fn time_passed_since(&self, timestamp: f32) -> f32 {
        self.now - timestamp
    }

    /// Reset to time zero
    pub fn reset(&mut self) {
        *self = Self::default();
    }
}
