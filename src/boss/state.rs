use crate::data::CommonTuning;
use crate::geometry::Vec2;

use super::flash::FlashWindow;
use super::health::BossHealth;
use super::phase::{PhaseKind, PhaseMachine};

/// State every boss carries regardless of its behaviour
#[derive(Debug, Clone)]
pub struct BossCore<P: PhaseKind> {
    pub position: Vec2,
    pub health: BossHealth,
    pub phase: PhaseMachine<P>,
    pub flash: FlashWindow,
    /// Links the boss to its trigger and enemy-block group
    pub group_id: i32,
    /// Body alpha while fading out
    pub fade_alpha: f32,
    pub fade_rate: f32,
    /// Death rewards have been handed out
    pub rewarded: bool,
    pub finished: bool,
}

impl<P: PhaseKind> BossCore<P> {
    pub fn new(
        position: Vec2,
        health: BossHealth,
        initial: P,
        group_id: i32,
        common: &CommonTuning,
    ) -> Self {
        Self {
            position,
            health,
            phase: PhaseMachine::new(initial, 0.0),
            flash: FlashWindow::new(common.flash_duration),
            group_id,
            fade_alpha: common.fade_start_alpha,
            fade_rate: common.fade_rate,
            rewarded: false,
            finished: false,
        }
    }

    pub fn current_phase(&self) -> P {
        self.phase.current()
    }

    pub fn is_dead(&self) -> bool {
        self.phase.current().is_terminal()
    }

    /// Alpha to draw the body with
    pub fn body_alpha(&self, now: f32) -> f32 {
        if self.phase.is(P::FADING) {
            self.fade_alpha
        } else {
            self.flash.alpha(now)
        }
    }
}
