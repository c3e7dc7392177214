use std::f32::consts::{PI, TAU};

use crate::data::OrbTuning;
use crate::geometry::{Circle, Vec2};
use crate::render::{Canvas, Color};

use super::arena::{Lifecycle, SubEntity, SubEntityKind};

/// Homing orb fired by the fire boss
#[derive(Debug, Clone)]
pub struct ProjectileOrb {
    pub position: Vec2,
    /// Heading in radians
    heading: f32,
    created_at: f32,
    tuning: OrbTuning,
}

impl ProjectileOrb {
    pub fn new(position: Vec2, heading: f32, now: f32, tuning: OrbTuning) -> Self {
        Self {
            position,
            heading,
            created_at: now,
            tuning,
        }
    }

    pub fn heading(&self) -> f32 {
        self.heading
    }

    pub fn damage(&self) -> f32 {
        self.tuning.damage
    }

    pub fn circle(&self) -> Circle {
        Circle::new(self.position, self.tuning.radius)
    }

    /// Turn toward `target` at the limited turn rate, then move
    pub fn update(&mut self, now: f32, dt: f32, target: Vec2) -> Lifecycle {
        let desired = self.position.angle_to(target);
        let mut diff = (desired - self.heading) % TAU;
        if diff > PI {
            diff -= TAU;
        } else if diff < -PI {
            diff += TAU;
        }
        let max_turn = self.tuning.turn_rate * dt;
        self.heading += diff.clamp(-max_turn, max_turn);
        self.position += Vec2::from_angle(self.heading) * (self.tuning.speed * dt);

        if now - self.created_at >= self.tuning.lifetime {
            Lifecycle::Expired
        } else {
            Lifecycle::Alive
        }
    }
}

impl SubEntity for ProjectileOrb {
    const KIND: SubEntityKind = SubEntityKind::ProjectileOrb;

    fn draw(&self, canvas: &mut dyn Canvas, _now: f32) {
        canvas.sprite("spr_FireOrb", self.position, 255.0);
        if canvas.debug() {
            canvas.circle(&self.circle(), Color::Red);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_turns_toward_target_gradually() {
        let tuning = OrbTuning::default();
        // Heading right, target straight below
        let mut orb = ProjectileOrb::new(Vec2::new(0.0, 0.0), 0.0, 0.0, tuning);
        orb.update(0.1, 0.1, Vec2::new(0.0, 5000.0));
        assert!((orb.heading() - 0.2).abs() < 1e-4);

        for i in 2..40 {
            orb.update(i as f32 * 0.1, 0.1, Vec2::new(0.0, 5000.0));
        }
        let desired = orb.position.angle_to(Vec2::new(0.0, 5000.0));
        assert!((orb.heading() - desired).abs() < 0.3);
    }

    #[test]
    fn test_takes_the_short_way_round() {
        let tuning = OrbTuning::default();
        // Heading almost -PI, target at almost +PI: turn negative, across the seam
        let mut orb = ProjectileOrb::new(Vec2::new(0.0, 0.0), -3.0, 0.0, tuning);
        orb.update(0.01, 0.01, Vec2::new(-100.0, 15.0));
        assert!(orb.heading() < -3.0);
    }

    #[test]
    fn test_expires() {
        let tuning = OrbTuning::default();
        let mut orb = ProjectileOrb::new(Vec2::ZERO, 0.0, 0.0, tuning);
        assert_eq!(orb.update(5.9, 0.1, Vec2::new(100.0, 0.0)), Lifecycle::Alive);
        assert_eq!(orb.update(6.0, 0.1, Vec2::new(100.0, 0.0)), Lifecycle::Expired);
    }
}
