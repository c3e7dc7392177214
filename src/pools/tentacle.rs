//! Tentacles
//!
//! Burst out of the ground, stay extended for their duration (spitting one
//! slime ball partway through) and sink back. A pool-wide forced exit pulls
//! them all back early.

use serde::Serialize;

use crate::data::TentacleTuning;
use crate::geometry::{Rect, Vec2};
use crate::render::{Canvas, Color};

use super::arena::{Lifecycle, SubEntity, SubEntityKind};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum TentacleState {
    Hidden,
    Entering,
    Extended,
    Exiting,
}

/// Things a tentacle asks its boss to do
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TentacleCue {
    /// Started to emerge
    Emerged,
    /// Time to spit a slime ball at the player
    Spit,
}

#[derive(Debug, Clone)]
pub struct Tentacle {
    /// Top-center of the fully extended tentacle
    pub position: Vec2,
    /// Marked tentacles are the ones the player has to hit
    pub marked: bool,
    state: TentacleState,
    created_at: f32,
    extended_at: f32,
    duration: f32,
    time_offset: f32,
    visible: f32,
    has_spit: bool,
    hitbox: Rect,
    tuning: TentacleTuning,
}

impl Tentacle {
    pub fn new(
        position: Vec2,
        now: f32,
        duration: f32,
        time_offset: f32,
        marked: bool,
        tuning: TentacleTuning,
    ) -> Self {
        let mut tentacle = Self {
            position,
            marked,
            state: TentacleState::Hidden,
            created_at: now,
            extended_at: now,
            duration,
            time_offset,
            visible: 0.0,
            has_spit: false,
            hitbox: Rect::default(),
            tuning,
        };
        tentacle.refresh_hitbox();
        tentacle
    }

    pub fn state(&self) -> TentacleState {
        self.state
    }

    /// How far out of the ground, 0.0 to 1.0
    pub fn visible(&self) -> f32 {
        self.visible
    }

    pub fn hitbox(&self) -> Rect {
        self.hitbox
    }

    /// Can be touched: out of the ground at least a little
    pub fn is_solid(&self) -> bool {
        self.state != TentacleState::Hidden && self.visible > 0.0
    }

    /// Where a spat slime ball starts
    pub fn mouth(&self) -> Vec2 {
        let top = self.position.y + self.tuning.height * (1.0 - self.visible);
        Vec2::new(self.position.x, top + 20.0)
    }

    pub fn update(&mut self, now: f32, dt: f32) -> (Lifecycle, Option<TentacleCue>) {
        let mut cue = None;
        let mut life = Lifecycle::Alive;

        match self.state {
            TentacleState::Hidden => {
                if now - self.created_at >= self.tuning.hidden_delay {
                    self.state = TentacleState::Entering;
                    cue = Some(TentacleCue::Emerged);
                }
            }
            TentacleState::Entering => {
                self.visible += self.tuning.enter_rate * dt;
                if self.visible >= 1.0 {
                    self.visible = 1.0;
                    self.state = TentacleState::Extended;
                    self.extended_at = now;
                }
            }
            TentacleState::Extended => {
                if !self.has_spit && now - self.extended_at >= self.time_offset / 2.0 {
                    self.has_spit = true;
                    cue = Some(TentacleCue::Spit);
                }
                if now - self.created_at > self.duration {
                    self.state = TentacleState::Exiting;
                }
            }
            TentacleState::Exiting => {
                self.visible -= self.tuning.exit_rate * dt;
                if self.visible <= 0.0 {
                    self.visible = 0.0;
                    life = Lifecycle::Expired;
                }
            }
        }

        self.refresh_hitbox();
        (life, cue)
    }

    /// Start sinking back now, unless already on the way
    pub fn force_exit(&mut self) {
        if self.state != TentacleState::Exiting {
            self.state = TentacleState::Exiting;
        }
    }

    fn refresh_hitbox(&mut self) {
        let w = self.tuning.width;
        let h = self.tuning.height;
        let inset = self.tuning.hitbox_inset;
        let (x, y) = (self.position.x, self.position.y);
        self.hitbox.set(
            x - w / 3.0,
            y + h * (1.0 - self.visible) + inset,
            x + w / 3.0,
            y + h - inset,
        );
    }
}

impl SubEntity for Tentacle {
    const KIND: SubEntityKind = SubEntityKind::Tentacle;

    fn draw(&self, canvas: &mut dyn Canvas, _now: f32) {
        if self.state == TentacleState::Hidden {
            canvas.sprite("spr_TentacleHole", self.position + Vec2::new(0.0, self.tuning.height), 255.0);
            return;
        }
        let sprite = if self.marked { "spr_TentacleMarked" } else { "spr_Tentacle" };
        let top = self.position.y + self.tuning.height * (1.0 - self.visible);
        canvas.sprite(sprite, Vec2::new(self.position.x, top), 255.0);
        if canvas.debug() {
            canvas.rect(&self.hitbox, Color::Purple);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const DT: f32 = 1.0 / 60.0;

    fn run(tentacle: &mut Tentacle, until: f32, now: &mut f32) -> Vec<(f32, TentacleCue)> {
        let mut cues = Vec::new();
        while *now < until {
            *now += DT;
            let (life, cue) = tentacle.update(*now, DT);
            if let Some(cue) = cue {
                cues.push((*now, cue));
            }
            if life == Lifecycle::Expired {
                break;
            }
        }
        cues
    }

    #[test]
    fn test_full_lifecycle_timing() {
        let tuning = TentacleTuning::default();
        let duration = 2.75;
        let mut tentacle = Tentacle::new(Vec2::new(0.0, 0.0), 0.0, duration, 1.0, false, tuning);
        let mut now = 0.0;

        let cues = run(&mut tentacle, 1.0 + DT, &mut now);
        assert_eq!(tentacle.state(), TentacleState::Entering);
        assert_eq!(cues.first().map(|c| c.1), Some(TentacleCue::Emerged));

        // Entering takes 1 / 3.5 s
        run(&mut tentacle, 1.0 + 1.0 / 3.5 + 3.0 * DT, &mut now);
        assert_eq!(tentacle.state(), TentacleState::Extended);
        assert_eq!(tentacle.visible(), 1.0);

        let mut removed_at = None;
        while now < 10.0 {
            now += DT;
            if tentacle.update(now, DT).0 == Lifecycle::Expired {
                removed_at = Some(now);
                break;
            }
        }
        let removed_at = removed_at.expect("tentacle never removed");
        assert!(removed_at <= duration + tuning.exit_time() + 3.0 * DT);
        assert!(removed_at > duration);
    }

    #[test]
    fn test_spits_once_halfway_through_offset() {
        let mut tentacle =
            Tentacle::new(Vec2::new(0.0, 0.0), 0.0, 2.75, 1.0, false, TentacleTuning::default());
        let mut now = 0.0;
        let cues = run(&mut tentacle, 5.0, &mut now);
        let spits: Vec<_> = cues.iter().filter(|c| c.1 == TentacleCue::Spit).collect();
        assert_eq!(spits.len(), 1);
        // Extended at ~1.29 s, spit 0.5 s later
        assert!(spits[0].0 >= 1.7 && spits[0].0 < 1.9);
    }

    #[test]
    fn test_forced_exit_never_returns() {
        let mut tentacle =
            Tentacle::new(Vec2::new(0.0, 0.0), 0.0, 2.75, 0.0, true, TentacleTuning::default());
        let mut now = 0.0;
        run(&mut tentacle, 1.5, &mut now);
        assert_eq!(tentacle.state(), TentacleState::Extended);

        tentacle.force_exit();
        let mut states = Vec::new();
        loop {
            now += DT;
            let (life, _) = tentacle.update(now, DT);
            states.push(tentacle.state());
            if life == Lifecycle::Expired {
                break;
            }
        }
        assert!(states.iter().all(|s| *s == TentacleState::Exiting));
    }

    #[test]
    fn test_hitbox_follows_visibility() {
        let tuning = TentacleTuning::default();
        let mut tentacle = Tentacle::new(Vec2::new(100.0, 0.0), 0.0, 2.75, 0.0, false, tuning);
        assert!(!tentacle.is_solid());

        let mut now = 0.0;
        run(&mut tentacle, 1.5, &mut now);
        let hitbox = tentacle.hitbox();
        assert!((hitbox.x1 - (100.0 - 56.0 / 3.0)).abs() < 1e-3);
        assert!((hitbox.y1 - 5.0).abs() < 1e-3);
        assert!((hitbox.y2 - 170.0).abs() < 1e-3);
    }
}
