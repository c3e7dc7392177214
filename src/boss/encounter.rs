//! Encounter controller
//!
//! Owns one boss and the injected collaborators, and drives them in a fixed
//! order every frame.

use rand::rngs::StdRng;
use rand::SeedableRng;

use crate::collab::Host;
use crate::game::{Difficulty, GameClock};
use crate::render::Canvas;

use super::damage;
use super::events::{EncounterEvent, EventLog};
use super::frame::Frame;
use super::health::DamageOutcome;
use super::script::{begin, enter_phase, tick_phase, BossScript};

/// A running boss fight
pub struct Encounter<B: BossScript, H: Host> {
    boss: B,
    host: H,
    clock: GameClock,
    rng: StdRng,
    events: EventLog,
    difficulty: Difficulty,
    finished: bool,
}

impl<B: BossScript, H: Host> Encounter<B, H> {
    pub fn new(boss: B, host: H, difficulty: Difficulty) -> Self {
        Self::with_seed(boss, host, difficulty, rand::random())
    }

    /// Start an encounter with a fixed random seed
    pub fn with_seed(boss: B, host: H, difficulty: Difficulty, seed: u64) -> Self {
        let mut encounter = Self {
            boss,
            host,
            clock: GameClock::new(),
            rng: StdRng::seed_from_u64(seed),
            events: EventLog::new(),
            difficulty,
            finished: false,
        };
        log::info!(
            "Encounter with {} started ({}, seed {})",
            encounter.boss.name(),
            difficulty.name(),
            seed
        );
        encounter.with_frame(0.0, |boss, frame| begin(boss, frame));
        encounter
    }

    fn with_frame<R>(&mut self, dt: f32, f: impl FnOnce(&mut B, &mut Frame<'_>) -> R) -> R {
        let services = self.host.services();
        let mut frame = Frame::new(
            self.clock.now(),
            dt,
            self.difficulty,
            &mut self.rng,
            services,
            &mut self.events,
        );
        f(&mut self.boss, &mut frame)
    }

    /// Advance the fight by `dt` seconds. Returns true once it has finished.
    pub fn update(&mut self, dt: f32) -> bool {
        if self.finished {
            return true;
        }

        let dt = self.clock.advance(dt);
        let now = self.clock.now();
        {
            let core = self.boss.core_mut();
            core.phase.advance(now);
            core.flash.expire(now);
        }

        self.with_frame(dt, |boss, frame| {
            tick_phase(boss, frame);
            boss.update_entities(frame);
            boss.arbitrate(frame);
        });
        self.boss.compact();

        if self.boss.core().finished {
            self.finished = true;
            self.events.push(EncounterEvent::Finished { at: now });
            log::info!("Encounter with {} finished at t={:.2}", self.boss.name(), now);
        }
        self.finished
    }

    /// Damage the boss from outside the frame loop
    pub fn deal_damage(&mut self, amount: f32) -> DamageOutcome {
        self.with_frame(0.0, |boss, frame| damage::deal_damage(boss, frame, amount))
    }

    pub fn heal_damage(&mut self, amount: f32) -> f32 {
        self.with_frame(0.0, |boss, frame| damage::heal_damage(boss, frame, amount))
    }

    /// Debug skip: jump to `phase`, running the usual exit and entry hooks
    pub fn force_phase(&mut self, phase: B::Phase) {
        log::warn!("Forcing {} into phase {:?}", self.boss.name(), phase);
        self.with_frame(0.0, |boss, frame| enter_phase(boss, frame, phase));
    }

    /// Debug skip to whatever phase the boss considers next
    pub fn skip_phase(&mut self) -> bool {
        match self.boss.skip_target() {
            Some(phase) => {
                self.force_phase(phase);
                true
            }
            None => false,
        }
    }

    pub fn draw(&self, canvas: &mut dyn Canvas) {
        self.boss.draw(canvas, self.clock.now());
    }

    pub fn drain_events(&mut self) -> Vec<EncounterEvent> {
        self.events.drain()
    }

    pub fn events(&self) -> &EventLog {
        &self.events
    }

    pub fn boss(&self) -> &B {
        &self.boss
    }

    pub fn boss_mut(&mut self) -> &mut B {
        &mut self.boss
    }

    pub fn host(&self) -> &H {
        &self.host
    }

    pub fn host_mut(&mut self) -> &mut H {
        &mut self.host
    }

    pub fn phase(&self) -> B::Phase {
        self.boss.core().phase.current()
    }

    pub fn now(&self) -> f32 {
        self.clock.now()
    }

    pub fn difficulty(&self) -> Difficulty {
        self.difficulty
    }

    pub fn is_finished(&self) -> bool {
        self.finished
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::boss::{
        dying_descriptor, fading_descriptor, grant_rewards, BossCore, BossHealth, PhaseDescriptor,
        PhaseKind,
    };
    use crate::collab::{Ability, Area, Dialogue, SandboxHost, SceneCall};
    use crate::data::CommonTuning;
    use crate::geometry::Vec2;
    use crate::render::DrawList;

    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    enum DummyPhase {
        Idle,
        Busy,
        Dying,
        Fading,
    }

    impl PhaseKind for DummyPhase {
        const DYING: Self = DummyPhase::Dying;
        const FADING: Self = DummyPhase::Fading;

        fn name(&self) -> &'static str {
            match self {
                DummyPhase::Idle => "idle",
                DummyPhase::Busy => "busy",
                DummyPhase::Dying => "dying",
                DummyPhase::Fading => "fading",
            }
        }
    }

    struct DummyBoss {
        core: BossCore<DummyPhase>,
        hooks: Vec<&'static str>,
    }

    impl DummyBoss {
        fn new() -> Self {
            Self {
                core: BossCore::new(
                    Vec2::new(0.0, 0.0),
                    BossHealth::new(17.0),
                    DummyPhase::Idle,
                    3,
                    &CommonTuning::default(),
                ),
                hooks: Vec::new(),
            }
        }
    }

    fn enter_idle(boss: &mut DummyBoss, _: &mut Frame<'_>) {
        boss.hooks.push("enter idle");
    }

    fn exit_idle(boss: &mut DummyBoss, _: &mut Frame<'_>) {
        boss.hooks.push("exit idle");
    }

    fn enter_busy(boss: &mut DummyBoss, _: &mut Frame<'_>) {
        boss.hooks.push("enter busy");
    }

    impl BossScript for DummyBoss {
        type Phase = DummyPhase;

        fn name(&self) -> &'static str {
            "Dummy"
        }

        fn core(&self) -> &BossCore<DummyPhase> {
            &self.core
        }

        fn core_mut(&mut self) -> &mut BossCore<DummyPhase> {
            &mut self.core
        }

        fn descriptor(phase: DummyPhase) -> PhaseDescriptor<Self> {
            match phase {
                DummyPhase::Idle => PhaseDescriptor::new().on_enter(enter_idle).on_exit(exit_idle),
                DummyPhase::Busy => PhaseDescriptor::new().on_enter(enter_busy),
                DummyPhase::Dying => dying_descriptor(),
                DummyPhase::Fading => fading_descriptor(),
            }
        }

        fn update_entities(&mut self, _: &mut Frame<'_>) {}

        fn arbitrate(&mut self, _: &mut Frame<'_>) {}

        fn on_defeated(&mut self, frame: &mut Frame<'_>) {
            self.hooks.push("defeated");
            frame.dialogue.open_dialogue_text_box(0, 192);
        }

        fn on_faded(&mut self, frame: &mut Frame<'_>) {
            grant_rewards(frame, self.core.position, self.core.group_id, Ability::Shrink, Area::ForestOfFungoria);
        }

        fn clear_entities(&mut self) {}

        fn compact(&mut self) {}

        fn draw(&self, canvas: &mut dyn Canvas, now: f32) {
            canvas.sprite("dummy", self.core.position, self.core.body_alpha(now));
        }

        fn skip_target(&self) -> Option<DummyPhase> {
            Some(DummyPhase::Busy)
        }
    }

    fn encounter() -> Encounter<DummyBoss, SandboxHost> {
        Encounter::with_seed(DummyBoss::new(), SandboxHost::new(Vec2::new(100.0, 0.0)), Difficulty::Normal, 1)
    }

    #[test]
    fn test_initial_phase_entered_once() {
        let enc = encounter();
        assert_eq!(enc.boss().hooks, vec!["enter idle"]);
    }

    #[test]
    fn test_force_phase_runs_exit_before_entry() {
        let mut enc = encounter();
        enc.update(0.5);
        assert!(enc.skip_phase());
        assert_eq!(enc.phase(), DummyPhase::Busy);
        assert_eq!(enc.boss().hooks, vec!["enter idle", "exit idle", "enter busy"]);
        assert_eq!(enc.boss().core().phase.entered_at(), 0.5);
    }

    #[test]
    fn test_death_scenario() {
        let mut enc = encounter();
        enc.update(0.016);

        enc.deal_damage(17.0);
        assert_eq!(enc.boss().core().health.current(), 0.0);
        assert_eq!(enc.phase(), DummyPhase::Dying);

        // Dialogue open: stays dying
        for _ in 0..10 {
            enc.update(0.1);
        }
        assert_eq!(enc.phase(), DummyPhase::Dying);

        enc.host_mut().dialogue.close();
        enc.update(0.1);
        assert_eq!(enc.phase(), DummyPhase::Fading);

        let mut finished = false;
        for _ in 0..100 {
            if enc.update(0.1) {
                finished = true;
                break;
            }
        }
        assert!(finished);
        assert_eq!(enc.host().scene.loot_drops(), 1);
        assert_eq!(enc.host().triggers.deaths.len(), 0);
        assert!(enc.host().scene.calls.contains(&SceneCall::AreaMusic(Area::ForestOfFungoria)));
    }

    #[test]
    fn test_repeated_damage_at_zero_is_idempotent() {
        let mut enc = encounter();
        enc.deal_damage(17.0);
        enc.deal_damage(5.0);
        enc.deal_damage(0.0);
        enc.host_mut().dialogue.close();
        for _ in 0..100 {
            enc.update(0.1);
            enc.deal_damage(1.0);
        }
        assert_eq!(enc.boss().hooks.iter().filter(|h| **h == "defeated").count(), 1);
        assert_eq!(enc.host().scene.loot_drops(), 1);
        assert!(enc.is_finished());
    }

    #[test]
    fn test_flash_window_does_not_stack() {
        let mut enc = encounter();
        enc.deal_damage(1.0);
        enc.update(0.3);
        enc.deal_damage(1.0);

        let flash = enc.boss().core().flash;
        assert_eq!(flash.ends_at(), Some(0.7));
        assert_eq!(flash.suppressed(), 1);
        assert_eq!(enc.boss().core().health.current(), 15.0);

        enc.update(0.5);
        assert!(!enc.boss().core().flash.is_active());
    }

    #[test]
    fn test_health_stays_in_bounds() {
        let mut enc = encounter();
        let steps = [0.0, 0.016, 0.5, 0.0, 1.3, 0.033];
        for (i, dt) in steps.iter().cycle().take(60).enumerate() {
            if i % 3 == 0 {
                enc.deal_damage(0.7);
            } else {
                enc.heal_damage(2.0);
            }
            enc.update(*dt);
            let health = enc.boss().core().health;
            assert!(health.current() >= 0.0 && health.current() <= health.max());
        }
    }

    #[test]
    fn test_finished_event_recorded_once() {
        let mut enc = encounter();
        enc.deal_damage(20.0);
        enc.host_mut().dialogue.close();
        for _ in 0..50 {
            enc.update(0.2);
        }
        let finished = enc
            .events()
            .count(|e| matches!(e, EncounterEvent::Finished { .. }));
        assert_eq!(finished, 1);
        assert!(!enc.host().dialogue.is_text_box_open());

        let mut canvas = DrawList::new();
        enc.draw(&mut canvas);
        assert_eq!(canvas.count_sprites("dummy"), 1);
    }
}
