//! Demo session
//!
//! One running encounter against the sandbox collaborators, plus the input
//! state the arena viewer feeds into it.

use std::collections::HashMap;
use std::io::Write;

use anyhow::Result;

use crate::boss::{BossScript, Encounter, EncounterEvent, PhaseKind};
use crate::bosses::{full_catalog, BossKind, ConservatoryBoss, EldritchBoss, FireBoss};
use crate::collab::{PlayerAttack, SandboxHost};
use crate::data::BossTunings;
use crate::game::Difficulty;
use crate::geometry::{Circle, Vec2};
use crate::loot::Pickup;
use crate::render::DrawList;

/// Trigger group of the demo arena
pub const DEMO_GROUP: i32 = 1;

/// Distance at which walking toward the boss starts the fight
const TRIGGER_DISTANCE: f32 = 450.0;

/// Player step per key press
const STEP: f32 = 24.0;

/// How long one key press keeps an attack active
const ATTACK_TIME: f32 = 0.3;

/// Grace period after the player is hit
const PLAYER_GRACE: f32 = 1.0;

/// Most recent events kept for display
const EVENT_HISTORY: usize = 12;

/// The encounter being viewed, whichever boss it is
pub enum ActiveEncounter {
    Eldritch(Encounter<EldritchBoss, SandboxHost>),
    Conservatory(Encounter<ConservatoryBoss, SandboxHost>),
    Fire(Encounter<FireBoss, SandboxHost>),
}

macro_rules! with_encounter {
    ($active:expr, $enc:ident => $body:expr) => {
        match $active {
            ActiveEncounter::Eldritch($enc) => $body,
            ActiveEncounter::Conservatory($enc) => $body,
            ActiveEncounter::Fire($enc) => $body,
        }
    };
}

impl ActiveEncounter {
    pub fn update(&mut self, dt: f32) -> bool {
        with_encounter!(self, enc => enc.update(dt))
    }

    pub fn skip_phase(&mut self) -> bool {
        with_encounter!(self, enc => enc.skip_phase())
    }

    pub fn phase_name(&self) -> &'static str {
        with_encounter!(self, enc => enc.phase().name())
    }

    pub fn boss_position(&self) -> Vec2 {
        with_encounter!(self, enc => enc.boss().core().position)
    }

    pub fn now(&self) -> f32 {
        with_encounter!(self, enc => enc.now())
    }

    pub fn draw(&self, list: &mut DrawList) {
        with_encounter!(self, enc => enc.draw(list))
    }

    pub fn drain_events(&mut self) -> Vec<EncounterEvent> {
        with_encounter!(self, enc => enc.drain_events())
    }

    pub fn host(&self) -> &SandboxHost {
        with_encounter!(self, enc => enc.host())
    }

    pub fn host_mut(&mut self) -> &mut SandboxHost {
        with_encounter!(self, enc => enc.host_mut())
    }

    pub fn is_finished(&self) -> bool {
        with_encounter!(self, enc => enc.is_finished())
    }
}

/// Everything the demo needs between frames
pub struct Session {
    pub kind: BossKind,
    pub encounter: ActiveEncounter,
    /// Where the boss started, used to frame the view
    pub origin: Vec2,
    pub history: Vec<String>,
    pub pickups: Vec<Pickup>,
    facing: Vec2,
    attacks: HashMap<PlayerAttack, f32>,
    trace: Option<Box<dyn Write>>,
}

impl Session {
    pub fn new(
        kind: BossKind,
        difficulty: Difficulty,
        tunings: &BossTunings,
        trace: Option<Box<dyn Write>>,
    ) -> Result<Self> {
        let catalog = full_catalog();
        let (gx, gy) = (10, 4);
        let encounter = match kind {
            BossKind::Eldritch => {
                let boss = EldritchBoss::new(gx, gy, DEMO_GROUP, difficulty, tunings, &catalog)?;
                let start = boss.arena_center() + Vec2::new(0.0, 550.0);
                ActiveEncounter::Eldritch(Encounter::new(boss, demo_host(start), difficulty))
            }
            BossKind::Conservatory => {
                let boss = ConservatoryBoss::new(gx, gy, DEMO_GROUP, difficulty, tunings, &catalog)?;
                let start = boss.arena_center() + Vec2::new(0.0, 600.0);
                ActiveEncounter::Conservatory(Encounter::new(boss, demo_host(start), difficulty))
            }
            BossKind::Fire => {
                let boss = FireBoss::new(gx, gy, DEMO_GROUP, difficulty, tunings, &catalog)?;
                let start = boss.core().position + Vec2::new(0.0, 600.0);
                ActiveEncounter::Fire(Encounter::new(boss, demo_host(start), difficulty))
            }
        };
        let origin = encounter.boss_position();
        log::info!("Demo session for {} ({})", kind.name(), difficulty.name());

        Ok(Self {
            kind,
            encounter,
            origin,
            history: Vec::new(),
            pickups: Vec::new(),
            facing: Vec2::new(0.0, -1.0),
            attacks: HashMap::new(),
            trace,
        })
    }

    /// Walk one step in a direction, unless the boss froze the player
    pub fn step(&mut self, dx: f32, dy: f32) {
        self.facing = Vec2::new(dx, dy).normalized();
        let player = &mut self.encounter.host_mut().player;
        if !player.frozen {
            player.position += self.facing * STEP;
        }
    }

    pub fn attack(&mut self, attack: PlayerAttack) {
        let until = self.encounter.now() + ATTACK_TIME;
        self.attacks.insert(attack, until);
    }

    pub fn close_dialogue(&mut self) {
        self.encounter.host_mut().dialogue.close();
    }

    pub fn skip_phase(&mut self) {
        if !self.encounter.skip_phase() {
            log::debug!("No phase to skip to from {}", self.encounter.phase_name());
        }
    }

    /// Advance the encounter and everything around it by one frame
    pub fn update(&mut self, dt: f32) -> Result<()> {
        let now = self.encounter.now();
        self.attacks.retain(|_, until| *until > now);
        let facing = self.facing;
        let attacks: Vec<PlayerAttack> = self.attacks.keys().copied().collect();
        let origin = self.origin;

        let host = self.encounter.host_mut();
        host.player.tick(dt);
        host.player.clear_attacks();
        let at = host.player.position;
        for attack in attacks {
            host.player.set_attack(attack, attack_volume(attack, at, facing));
        }
        if at.distance(origin) < TRIGGER_DISTANCE {
            host.triggers.trigger(DEMO_GROUP);
        }

        if !self.encounter.is_finished() {
            self.encounter.update(dt);
        }
        let pickups = self.encounter.host_mut().collect_loot();
        self.pickups.extend(pickups);

        for event in self.encounter.drain_events() {
            let line = serde_json::to_string(&event)?;
            if let Some(trace) = self.trace.as_mut() {
                writeln!(trace, "{}", line)?;
            }
            self.history.push(line);
        }
        if self.history.len() > EVENT_HISTORY {
            let excess = self.history.len() - EVENT_HISTORY;
            self.history.drain(..excess);
        }
        Ok(())
    }
}

fn demo_host(start: Vec2) -> SandboxHost {
    let mut host = SandboxHost::new(start);
    host.player = host.player.with_grace_period(PLAYER_GRACE);
    host
}

/// Hit volume of an attack for a player at `at` facing `facing`
fn attack_volume(attack: PlayerAttack, at: Vec2, facing: Vec2) -> Circle {
    match attack {
        PlayerAttack::Tongue => Circle::new(at + facing * 70.0, 20.0),
        PlayerAttack::FireBreath | PlayerAttack::IceBreath => Circle::new(at + facing * 90.0, 50.0),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn session(kind: BossKind) -> Session {
        Session::new(kind, Difficulty::Normal, &BossTunings::default(), None).expect("session should start")
    }

    #[test]
    fn test_walking_in_triggers_the_fight() {
        let mut session = session(BossKind::Fire);
        session.update(0.016).expect("update");
        assert!(session.encounter.host().triggers.triggered.is_empty());

        for _ in 0..8 {
            session.step(0.0, -1.0);
        }
        session.update(0.016).expect("update");
        assert!(session.encounter.host().triggers.triggered.contains(&DEMO_GROUP));
        assert!(session.encounter.host().dialogue.open);
    }

    #[test]
    fn test_attacks_expire() {
        let mut session = session(BossKind::Eldritch);
        session.attack(PlayerAttack::Tongue);
        session.update(0.1).expect("update");
        assert_eq!(session.encounter.host().player.attacks.len(), 1);
        for _ in 0..5 {
            session.update(0.1).expect("update");
        }
        assert!(session.encounter.host().player.attacks.is_empty());
    }

    #[test]
    fn test_events_are_kept_as_json() {
        let mut session = session(BossKind::Conservatory);
        session.skip_phase();
        session.update(0.016).expect("update");
        assert!(session.history.iter().any(|l| l.contains("phase_entered")));
    }

    #[test]
    fn test_frozen_player_cannot_move() {
        let mut session = session(BossKind::Fire);
        session.encounter.host_mut().player.frozen = true;
        let before = session.encounter.host().player.position;
        session.step(1.0, 0.0);
        assert_eq!(session.encounter.host().player.position, before);
    }
}
