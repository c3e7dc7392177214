use serde::Serialize;

use crate::game::Difficulty;

/// Health before and after a damage call
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DamageOutcome {
    pub before: f32,
    pub after: f32,
}

impl DamageOutcome {
    /// Did this hit take the boss from alive to dead?
    pub fn crossed_zero(&self) -> bool {
        self.before > 0.0 && self.after <= 0.0
    }
}

/// Boss health, always within `0..=max`
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct BossHealth {
    current: f32,
    max: f32,
}

impl BossHealth {
    pub fn new(max: f32) -> Self {
        let max = max.max(0.0);
        Self { current: max, max }
    }

    /// Full health for `base` scaled by the difficulty modifier
    pub fn scaled(base: f32, difficulty: Difficulty) -> Self {
        Self::new(difficulty.scale_health(base))
    }

    pub fn current(&self) -> f32 {
        self.current
    }

    pub fn max(&self) -> f32 {
        self.max
    }

    pub fn fraction(&self) -> f32 {
        if self.max <= 0.0 {
            0.0
        } else {
            self.current / self.max
        }
    }

    pub fn is_depleted(&self) -> bool {
        self.current <= 0.0
    }

    pub fn is_full(&self) -> bool {
        self.current >= self.max
    }

    /// Subtract `amount`, clamping at zero. Negative amounts count as zero.
    pub fn damage(&mut self, amount: f32) -> DamageOutcome {
        let amount = sanitize(amount);
        let before = self.current;
        self.current = (self.current - amount).max(0.0);
        DamageOutcome { before, after: self.current }
    }

    /// Add `amount`, clamping at max. Returns the health actually gained.
    pub fn heal(&mut self, amount: f32) -> f32 {
        let before = self.current;
        self.current = (self.current + sanitize(amount)).min(self.max);
        self.current - before
    }
}

fn sanitize(amount: f32) -> f32 {
    if amount.is_finite() {
        amount.max(0.0)
    } else {
        0.0
    }
}
