//! Generic phase machine
//!
//! Each boss describes its phases with a table of [`PhaseDescriptor`]s. The
//! machine itself only tracks the active phase and when it was entered.

use std::fmt;

use super::frame::Frame;

/// A boss' phase enum
pub trait PhaseKind: Copy + Eq + fmt::Debug + 'static {
    /// Entered exactly once, when health crosses zero
    const DYING: Self;
    /// Final fade-out after the death dialogue
    const FADING: Self;

    fn name(&self) -> &'static str;

    fn is_terminal(&self) -> bool {
        *self == Self::DYING || *self == Self::FADING
    }
}

/// Active phase and its timer
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PhaseMachine<P: PhaseKind> {
    current: P,
    entered_at: f32,
    time_in_phase: f32,
}

impl<P: PhaseKind> PhaseMachine<P> {
    pub fn new(initial: P, now: f32) -> Self {
        Self {
            current: initial,
            entered_at: now,
            time_in_phase: 0.0,
        }
    }

    pub fn current(&self) -> P {
        self.current
    }

    pub fn is(&self, phase: P) -> bool {
        self.current == phase
    }

    pub fn entered_at(&self) -> f32 {
        self.entered_at
    }

    /// Seconds spent in the current phase as of the last `advance`
    pub fn time_in_phase(&self) -> f32 {
        self.time_in_phase
    }

    pub fn advance(&mut self, now: f32) {
        self.time_in_phase = now - self.entered_at;
    }

    /// Switch to `next` and restart the timer, even if `next` is current
    pub fn reset(&mut self, next: P, now: f32) -> P {
        let previous = self.current;
        self.current = next;
        self.entered_at = now;
        self.time_in_phase = 0.0;
        previous
    }
}

/// Hook run against a boss during a frame
pub type PhaseHook<B> = fn(&mut B, &mut Frame<'_>);

/// Entry, exit and per-frame behaviour of one phase
pub struct PhaseDescriptor<B> {
    pub on_enter: PhaseHook<B>,
    pub on_exit: PhaseHook<B>,
    pub tick: PhaseHook<B>,
}

fn noop<B>(_: &mut B, _: &mut Frame<'_>) {}

impl<B> PhaseDescriptor<B> {
    /// Descriptor that does nothing
    pub fn new() -> Self {
        Self {
            on_enter: noop::<B>,
            on_exit: noop::<B>,
            tick: noop::<B>,
        }
    }

    pub fn on_enter(mut self, hook: PhaseHook<B>) -> Self {
        self.on_enter = hook;
        self
    }

    pub fn on_exit(mut self, hook: PhaseHook<B>) -> Self {
        self.on_exit = hook;
        self
    }

    pub fn tick(mut self, hook: PhaseHook<B>) -> Self {
        self.tick = hook;
        self
    }
}

impl<B> Default for PhaseDescriptor<B> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    enum TestPhase {
        Idle,
        Dying,
        Fading,
    }

    impl PhaseKind for TestPhase {
        const DYING: Self = TestPhase::Dying;
        const FADING: Self = TestPhase::Fading;

        fn name(&self) -> &'static str {
            match self {
                TestPhase::Idle => "idle",
                TestPhase::Dying => "dying",
                TestPhase::Fading => "fading",
            }
        }
    }

    #[test]
    fn test_reset_same_phase_restarts_timer() {
        let mut machine = PhaseMachine::new(TestPhase::Idle, 0.0);
        machine.advance(3.0);
        assert_eq!(machine.time_in_phase(), 3.0);

        let previous = machine.reset(TestPhase::Idle, 3.0);
        assert_eq!(previous, TestPhase::Idle);
        assert_eq!(machine.time_in_phase(), 0.0);
        machine.advance(4.0);
        assert_eq!(machine.time_in_phase(), 1.0);
    }

    #[test]
    fn test_terminal_phases() {
        assert!(!TestPhase::Idle.is_terminal());
        assert!(TestPhase::Dying.is_terminal());
        assert!(TestPhase::Fading.is_terminal());
    }
}
