//! Ice crushers
//!
//! A pair of blocks that grow out of both arena walls toward the center,
//! slam together, hold, and pull back.

use serde::Serialize;

use crate::data::CrusherTuning;
use crate::geometry::{Circle, Rect, Vec2};
use crate::render::{Canvas, Color};

use super::arena::{Lifecycle, SubEntity, SubEntityKind};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum CrusherState {
    Extending,
    Remaining,
    Contracting,
}

/// Reached full size
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Slammed;

#[derive(Debug, Clone)]
pub struct Crusher {
    /// Arena center line the two halves meet at
    pub center: Vec2,
    pub speed: f32,
    size: f32,
    state: CrusherState,
    extended_at: f32,
    has_damaged: bool,
    left: Rect,
    right: Rect,
    tuning: CrusherTuning,
}

impl Crusher {
    pub fn new(center: Vec2, speed: f32, tuning: CrusherTuning) -> Self {
        let mut crusher = Self {
            center,
            speed,
            size: 0.0,
            state: CrusherState::Extending,
            extended_at: 0.0,
            has_damaged: false,
            left: Rect::default(),
            right: Rect::default(),
            tuning,
        };
        crusher.refresh_boxes();
        crusher
    }

    pub fn state(&self) -> CrusherState {
        self.state
    }

    pub fn size(&self) -> f32 {
        self.size
    }

    pub fn boxes(&self) -> [Rect; 2] {
        [self.left, self.right]
    }

    pub fn has_damaged(&self) -> bool {
        self.has_damaged
    }

    pub fn update(&mut self, now: f32, dt: f32) -> (Lifecycle, Option<Slammed>) {
        let mut cue = None;
        let mut life = Lifecycle::Alive;

        match self.state {
            CrusherState::Extending => {
                self.size += self.speed * dt;
                if self.size >= self.tuning.max_size {
                    self.size = self.tuning.max_size;
                    self.state = CrusherState::Remaining;
                    self.extended_at = now;
                    cue = Some(Slammed);
                }
            }
            CrusherState::Remaining => {
                if now - self.extended_at >= self.tuning.remain_time {
                    self.state = CrusherState::Contracting;
                }
            }
            CrusherState::Contracting => {
                self.size -= self.speed * dt;
                if self.size < 0.0 {
                    life = Lifecycle::Expired;
                }
            }
        }

        self.refresh_boxes();
        (life, cue)
    }

    /// Damage the player on first contact only. Returns true on that hit.
    pub fn try_hit(&mut self, player: &Circle) -> bool {
        if self.has_damaged || self.size <= 0.0 {
            return false;
        }
        if player.overlaps_rect(&self.left) || player.overlaps_rect(&self.right) {
            self.has_damaged = true;
            return true;
        }
        false
    }

    fn refresh_boxes(&mut self) {
        let max = self.tuning.max_size;
        let hh = self.tuning.half_height;
        let size = self.size.max(0.0);
        let left_x = self.center.x - max;
        let right_x = self.center.x + max;
        let y = self.center.y;
        self.left.set(left_x, y - hh, left_x + size, y + hh);
        self.right.set(right_x - size, y - hh, right_x, y + hh);
    }
}

impl SubEntity for Crusher {
    const KIND: SubEntityKind = SubEntityKind::Crusher;

    fn draw(&self, canvas: &mut dyn Canvas, _now: f32) {
        canvas.sprite("spr_IceCrusher", self.left.center(), 255.0);
        canvas.sprite("spr_IceCrusher", self.right.center(), 255.0);
        if canvas.debug() {
            canvas.rect(&self.left, Color::Blue);
            canvas.rect(&self.right, Color::Blue);
        }
    }
}
