/// Invulnerability flash after a registered hit
///
/// Only one window is ever active. Hits landing inside it are counted but do
/// not extend it.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FlashWindow {
    duration: f32,
    started_at: Option<f32>,
    suppressed: u32,
}

impl FlashWindow {
    pub fn new(duration: f32) -> Self {
        Self {
            duration,
            started_at: None,
            suppressed: 0,
        }
    }

    /// Start a window at `now`. Returns false (and counts the hit) when one
    /// is already running.
    pub fn trigger(&mut self, now: f32) -> bool {
        if self.started_at.is_some() {
            self.suppressed += 1;
            return false;
        }
        self.started_at = Some(now);
        true
    }

    /// Close the window once it has run its full duration
    pub fn expire(&mut self, now: f32) -> bool {
        match self.started_at {
            Some(start) if now - start > self.duration => {
                self.started_at = None;
                true
            }
            _ => false,
        }
    }

    pub fn is_active(&self) -> bool {
        self.started_at.is_some()
    }

    pub fn started_at(&self) -> Option<f32> {
        self.started_at
    }

    pub fn ends_at(&self) -> Option<f32> {
        self.started_at.map(|start| start + self.duration)
    }

    pub fn duration(&self) -> f32 {
        self.duration
    }

    /// Hits absorbed by an already running window
    pub fn suppressed(&self) -> u32 {
        self.suppressed
    }

    pub fn reset(&mut self) {
        self.started_at = None;
    }

    /// Sprite alpha while flashing: blinks between full and dim
    pub fn alpha(&self, now: f32) -> f32 {
        match self.started_at {
            Some(start) if ((now - start) * 16.0) as i32 % 2 == 1 => 96.0,
            _ => 255.0,
        }
    }
}
