use serde::Serialize;

/// Open/close state of an animated indicator such as an eye or a mouth
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum IndicatorState {
    Closed,
    Opening,
    Open,
    Closing,
}

/// An indicator that takes a fixed time to open or close
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Indicator {
    state: IndicatorState,
    changed_at: f32,
    transition_time: f32,
}

impl Indicator {
    pub fn new(transition_time: f32) -> Self {
        Self {
            state: IndicatorState::Closed,
            changed_at: 0.0,
            transition_time,
        }
    }

    pub fn state(&self) -> IndicatorState {
        self.state
    }

    pub fn open(&mut self, now: f32) {
        if matches!(self.state, IndicatorState::Closed | IndicatorState::Closing) {
            self.state = IndicatorState::Opening;
            self.changed_at = now;
        }
    }

    pub fn close(&mut self, now: f32) {
        if matches!(self.state, IndicatorState::Open | IndicatorState::Opening) {
            self.state = IndicatorState::Closing;
            self.changed_at = now;
        }
    }

    /// Snap shut without animating
    pub fn shut(&mut self) {
        self.state = IndicatorState::Closed;
    }

    /// Finish a running transition once its time is up
    pub fn update(&mut self, now: f32) {
        if now - self.changed_at < self.transition_time {
            return;
        }
        self.state = match self.state {
            IndicatorState::Opening => IndicatorState::Open,
            IndicatorState::Closing => IndicatorState::Closed,
            other => other,
        };
    }

    pub fn is_open(&self) -> bool {
        self.state == IndicatorState::Open
    }

    pub fn is_closed(&self) -> bool {
        self.state == IndicatorState::Closed
    }

    /// How far open, 0.0 (closed) to 1.0 (open)
    pub fn openness(&self, now: f32) -> f32 {
        let progress = ((now - self.changed_at) / self.transition_time).clamp(0.0, 1.0);
        match self.state {
            IndicatorState::Closed => 0.0,
            IndicatorState::Opening => progress,
            IndicatorState::Open => 1.0,
            IndicatorState::Closing => 1.0 - progress,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_open_then_close() {
        let mut eye = Indicator::new(0.5);
        eye.open(1.0);
        eye.update(1.2);
        assert_eq!(eye.state(), IndicatorState::Opening);
        eye.update(1.5);
        assert!(eye.is_open());

        eye.close(2.0);
        assert!((eye.openness(2.25) - 0.5).abs() < 1e-5);
        eye.update(2.5);
        assert!(eye.is_closed());
    }

    #[test]
    fn test_open_is_idempotent() {
        let mut eye = Indicator::new(0.5);
        eye.open(0.0);
        eye.open(0.4);
        eye.update(0.5);
        assert!(eye.is_open());
    }
}
