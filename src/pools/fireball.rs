use crate::data::FireBallTuning;
use crate::geometry::{Circle, Vec2};
use crate::render::{Canvas, Color};

use super::arena::{Lifecycle, SubEntity, SubEntityKind};

/// Falls straight down at a constant speed for a fixed lifetime
#[derive(Debug, Clone)]
pub struct FireBall {
    pub position: Vec2,
    pub speed: f32,
    created_at: f32,
    radius: f32,
    lifetime: f32,
    damage: f32,
}

impl FireBall {
    pub fn new(position: Vec2, speed: f32, now: f32, tuning: &FireBallTuning) -> Self {
        Self {
            position,
            speed,
            created_at: now,
            radius: tuning.radius,
            lifetime: tuning.lifetime,
            damage: tuning.damage,
        }
    }

    pub fn update(&mut self, now: f32, dt: f32) -> Lifecycle {
        self.position.y += self.speed * dt;
        if now - self.created_at >= self.lifetime {
            Lifecycle::Expired
        } else {
            Lifecycle::Alive
        }
    }

    pub fn circle(&self) -> Circle {
        Circle::new(self.position, self.radius)
    }

    /// Damage dealt for every frame the player overlaps it
    pub fn damage(&self) -> f32 {
        self.damage
    }
}

impl SubEntity for FireBall {
    const KIND: SubEntityKind = SubEntityKind::FireBall;

    fn draw(&self, canvas: &mut dyn Canvas, _now: f32) {
        canvas.sprite("spr_FireBall", self.position, 255.0);
        if canvas.debug() {
            canvas.circle(&self.circle(), Color::Orange);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_falls_at_constant_speed() {
        let tuning = FireBallTuning::default();
        let mut ball = FireBall::new(Vec2::new(0.0, 0.0), 700.0, 0.0, &tuning);
        ball.update(0.5, 0.5);
        assert_eq!(ball.position, Vec2::new(0.0, 350.0));
        assert_eq!(ball.circle().radius, 30.0);
    }

    #[test]
    fn test_expires_after_lifetime() {
        let tuning = FireBallTuning::default();
        let mut ball = FireBall::new(Vec2::new(0.0, 0.0), 700.0, 1.0, &tuning);
        assert_eq!(ball.update(3.9, 0.1), Lifecycle::Alive);
        assert_eq!(ball.update(4.0, 0.1), Lifecycle::Expired);
    }
}
