//! Floating eyes
//!
//! Released by the egg boss. Each one drifts down with its own sway, aims a
//! crosshair at the player for a fixed countdown, fires a blast at the
//! crosshair and floats away.

use std::f32::consts::TAU;

use serde::Serialize;

use crate::data::FloatingEyeTuning;
use crate::geometry::{Circle, Vec2};
use crate::render::{Canvas, Color};

use super::arena::{Lifecycle, SubEntity, SubEntityKind};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum FloatingEyeState {
    Descending,
    Countdown,
    FloatingAway,
}

/// Fire a blast centered on this point
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Blast(pub Vec2);

#[derive(Debug, Clone)]
pub struct FloatingEye {
    /// Ground point the eye hovers over
    pub anchor: Vec2,
    elevation: f32,
    state: FloatingEyeState,
    created_at: f32,
    countdown_started: f32,
    sway_period: f32,
    crosshair: Vec2,
    tuning: FloatingEyeTuning,
}

impl FloatingEye {
    pub fn new(anchor: Vec2, now: f32, sway_period: f32, tuning: FloatingEyeTuning) -> Self {
        Self {
            anchor,
            elevation: tuning.start_elevation,
            state: FloatingEyeState::Descending,
            created_at: now,
            countdown_started: now,
            sway_period: sway_period.max(f32::EPSILON),
            crosshair: anchor,
            tuning,
        }
    }

    pub fn state(&self) -> FloatingEyeState {
        self.state
    }

    pub fn crosshair(&self) -> Vec2 {
        self.crosshair
    }

    /// Current position including sway and elevation
    pub fn position(&self, now: f32) -> Vec2 {
        let t = now - self.created_at;
        let sway = (t * TAU / self.sway_period).sin() * self.tuning.sway_amplitude;
        Vec2::new(self.anchor.x + sway, self.anchor.y - self.elevation)
    }

    pub fn circle(&self, now: f32) -> Circle {
        Circle::new(self.position(now), self.tuning.radius)
    }

    pub fn update(&mut self, now: f32, dt: f32, target: Vec2) -> (Lifecycle, Option<Blast>) {
        let mut blast = None;
        let mut life = Lifecycle::Alive;

        match self.state {
            FloatingEyeState::Descending => {
                self.elevation -= self.tuning.descend_speed * dt;
                if self.elevation <= 0.0 {
                    self.elevation = 0.0;
                    self.state = FloatingEyeState::Countdown;
                    self.countdown_started = now;
                    self.crosshair = self.position(now);
                }
            }
            FloatingEyeState::Countdown => {
                self.crosshair = self
                    .crosshair
                    .move_toward(target, self.tuning.crosshair_speed * dt);
                if now - self.countdown_started >= self.tuning.countdown {
                    self.state = FloatingEyeState::FloatingAway;
                    blast = Some(Blast(self.crosshair));
                }
            }
            FloatingEyeState::FloatingAway => {
                self.elevation += self.tuning.rise_speed * dt;
                if self.elevation >= self.tuning.exit_elevation {
                    life = Lifecycle::Expired;
                }
            }
        }

        (life, blast)
    }

    /// Give up and float away without firing
    pub fn dismiss(&mut self) {
        self.state = FloatingEyeState::FloatingAway;
    }
}

impl SubEntity for FloatingEye {
    const KIND: SubEntityKind = SubEntityKind::FloatingEye;

    fn draw(&self, canvas: &mut dyn Canvas, now: f32) {
        canvas.sprite("spr_FloatingEye", self.position(now), 255.0);
        if self.state == FloatingEyeState::Countdown {
            canvas.sprite("spr_Crosshair", self.crosshair, 255.0);
        }
        if canvas.debug() {
            canvas.circle(&self.circle(now), Color::Green);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const DT: f32 = 1.0 / 60.0;

    fn run_until_blast(eye: &mut FloatingEye, target: Vec2) -> Option<(f32, Vec2)> {
        let mut now = 0.0;
        for _ in 0..2000 {
            now += DT;
            if let (_, Some(Blast(at))) = eye.update(now, DT, target) {
                return Some((now, at));
            }
        }
        None
    }

    #[test]
    fn test_fires_after_descent_and_countdown() {
        let tuning = FloatingEyeTuning::default();
        let mut eye = FloatingEye::new(Vec2::new(0.0, 0.0), 0.0, 1.5, tuning);
        let (at, _) = run_until_blast(&mut eye, Vec2::new(50.0, 0.0)).expect("never fired");

        let expected = tuning.start_elevation / tuning.descend_speed + tuning.countdown;
        assert!((at - expected).abs() <= 3.0 * DT);
        assert_eq!(eye.state(), FloatingEyeState::FloatingAway);
    }

    #[test]
    fn test_crosshair_tracks_the_player() {
        let tuning = FloatingEyeTuning::default();
        let mut eye = FloatingEye::new(Vec2::new(0.0, 0.0), 0.0, 1.5, tuning);
        let target = Vec2::new(100.0, 50.0);
        let (_, at) = run_until_blast(&mut eye, target).expect("never fired");
        assert!(at.distance(target) < 1.0);
    }

    #[test]
    fn test_floats_away_and_expires() {
        let tuning = FloatingEyeTuning::default();
        let mut eye = FloatingEye::new(Vec2::new(0.0, 0.0), 0.0, 1.5, tuning);
        eye.dismiss();
        let mut now = 0.0;
        let mut expired = false;
        for _ in 0..600 {
            now += DT;
            if eye.update(now, DT, Vec2::ZERO).0 == Lifecycle::Expired {
                expired = true;
                break;
            }
        }
        assert!(expired);
    }

    #[test]
    fn test_sway_is_bounded() {
        let tuning = FloatingEyeTuning::default();
        let eye = FloatingEye::new(Vec2::new(10.0, 0.0), 0.0, 1.2, tuning);
        for i in 0..100 {
            let x = eye.position(i as f32 * 0.05).x;
            assert!((x - 10.0).abs() <= tuning.sway_amplitude + 1e-3);
        }
    }
}
