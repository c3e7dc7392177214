//! The fire elemental
//!
//! Travels between five fixed locations. At each stop it holds still,
//! launches homing orbs at the player and bursts into a fire nova when the
//! player gets too close. Only the tongue hurts it.

use rand::Rng;
use serde::Serialize;

use crate::boss::{
    deal_damage, dying_descriptor, enter_phase, fading_descriptor, grant_rewards, BossCore,
    BossHealth, BossScript, Frame, PhaseDescriptor, PhaseKind,
};
use crate::collab::{MusicTrack, PlayerAttack, SoundCue};
use crate::data::{
    require_resources, BossTunings, FireTuning, ResourceCatalog, ResourceKind, ResourceRef,
};
use crate::error::BossError;
use crate::game::Difficulty;
use crate::geometry::{Circle, Shape, Vec2};
use crate::pools::{Pool, ProjectileOrb, SubEntity};
use crate::render::{Canvas, Color};

use super::BossKind;

const SPEAKER: i32 = -1;
const INTRO_TEXT: u32 = 150;
const DEFEAT_TEXT: u32 = 151;

/// Vertical bob of the body while drawn
const FLOAT_AMPLITUDE: f32 = 6.0;

pub const REQUIRED_RESOURCES: &[ResourceRef] = &[
    (ResourceKind::Texture, "FireBossTx"),
    (ResourceKind::Sprite, "spr_FireOrb"),
    (ResourceKind::ParticleSystem, "fireNova"),
    (ResourceKind::ParticleSystem, "fenwarWarp"),
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum FirePhase {
    Inactive,
    /// Travelling to the next location
    Moving,
    Attacking,
    Dying,
    Fading,
}

impl PhaseKind for FirePhase {
    const DYING: Self = FirePhase::Dying;
    const FADING: Self = FirePhase::Fading;

    fn name(&self) -> &'static str {
        match self {
            FirePhase::Inactive => "inactive",
            FirePhase::Moving => "moving",
            FirePhase::Attacking => "attacking",
            FirePhase::Dying => "dying",
            FirePhase::Fading => "fading",
        }
    }
}

pub struct FireBoss {
    core: BossCore<FirePhase>,
    tuning: FireTuning,
    locations: [Vec2; 5],
    current_location: usize,
    previous_position: Vec2,

    started_intro: bool,
    last_tongue_hit: f32,
    last_orb: f32,
    last_nova: f32,
    orbs: Pool<ProjectileOrb>,
}

impl FireBoss {
    pub fn new(
        grid_x: i32,
        grid_y: i32,
        group_id: i32,
        difficulty: Difficulty,
        tunings: &BossTunings,
        catalog: &dyn ResourceCatalog,
    ) -> Result<Self, BossError> {
        require_resources(catalog, REQUIRED_RESOURCES)?;
        tunings.common.validate()?;
        tunings.fire.validate()?;

        let tuning = tunings.fire;
        let home = Vec2::new(grid_x as f32 * 64.0 + 32.0, grid_y as f32 * 64.0 + 32.0);
        let s = tuning.location_spread;
        let locations = [
            home,
            home + Vec2::new(-s, -s),
            home + Vec2::new(s, -s),
            home + Vec2::new(-s, s),
            home + Vec2::new(s, s),
        ];

        log::debug!("Fire boss placed at ({}, {}) for group {}", home.x, home.y, group_id);

        Ok(Self {
            core: BossCore::new(
                home,
                BossHealth::scaled(tuning.health, difficulty),
                FirePhase::Inactive,
                group_id,
                &tunings.common,
            ),
            tuning,
            locations,
            current_location: 0,
            previous_position: home,
            started_intro: false,
            last_tongue_hit: f32::NEG_INFINITY,
            last_orb: 0.0,
            last_nova: f32::NEG_INFINITY,
            orbs: Pool::new(),
        })
    }

    pub fn locations(&self) -> &[Vec2; 5] {
        &self.locations
    }

    pub fn current_location(&self) -> usize {
        self.current_location
    }

    pub fn orbs(&self) -> &Pool<ProjectileOrb> {
        &self.orbs
    }

    /// Fire an orb from `at`, heading straight for `target`
    fn launch_orb(&mut self, frame: &mut Frame<'_>, at: Vec2, target: Vec2) {
        self.orbs
            .spawn(ProjectileOrb::new(at, at.angle_to(target), frame.now, self.tuning.orb));
        frame.spawned(ProjectileOrb::KIND);
    }

    fn body(&self) -> Circle {
        Circle::new(self.core.position, self.tuning.body_radius)
    }

    fn pick_next_location(&mut self, frame: &mut Frame<'_>) -> usize {
        let others = self.locations.len() - 1;
        let step = frame.rng.gen_range(1..=others);
        (self.current_location + step) % self.locations.len()
    }

    fn update_nova(&mut self, frame: &mut Frame<'_>) {
        if frame.since(self.last_nova) < self.tuning.nova_cooldown {
            return;
        }
        if frame.player.position().distance(self.core.position) > self.tuning.nova_range {
            return;
        }
        self.last_nova = frame.now;
        frame.play(SoundCue::FireNova);
        frame.knock_player(
            "fire nova",
            self.tuning.nova_damage,
            self.tuning.nova_knockback,
            self.core.position,
        );
    }

    fn kill_orbs(&mut self, frame: &mut Frame<'_>) {
        let count = self.orbs.len();
        self.orbs.clear();
        frame.removed(ProjectileOrb::KIND, count);
    }

    fn arbitrate_orbs(&mut self, frame: &mut Frame<'_>) {
        let player = frame.player.collision_circle();
        let mut melted = Vec::new();
        let mut hits = Vec::new();
        self.orbs.for_each(|handle, orb| {
            let circle = orb.circle();
            if frame.player.attack_hits(PlayerAttack::IceBreath, &Shape::Circle(circle)) {
                melted.push(handle);
            } else if player.overlaps_circle(&circle) {
                hits.push((handle, orb.damage()));
            }
        });

        for handle in melted {
            self.orbs.retire(handle);
            frame.removed(ProjectileOrb::KIND, 1);
        }
        for (handle, damage) in hits {
            self.orbs.retire(handle);
            frame.removed(ProjectileOrb::KIND, 1);
            frame.hurt_player("fire orb", damage);
        }
    }
}

fn tick_inactive(boss: &mut FireBoss, frame: &mut Frame<'_>) {
    if !boss.started_intro {
        if frame.triggers.has_triggered(boss.core.group_id) {
            boss.started_intro = true;
            frame.player.set_frozen(true);
            frame.dialogue.open_dialogue_text_box(SPEAKER, INTRO_TEXT);
        }
    } else if !frame.dialogue.is_text_box_open() {
        frame.player.set_frozen(false);
        frame.scene.play_music(MusicTrack::BossMusic);
        enter_phase(boss, frame, FirePhase::Moving);
    }
}

fn exit_inactive(boss: &mut FireBoss, frame: &mut Frame<'_>) {
    boss.started_intro = true;
    frame.player.set_frozen(false);
}

fn enter_moving(boss: &mut FireBoss, frame: &mut Frame<'_>) {
    boss.previous_position = boss.core.position;
    boss.current_location = boss.pick_next_location(frame);
    log::debug!("Fire boss heading to location {}", boss.current_location);
}

fn tick_moving(boss: &mut FireBoss, frame: &mut Frame<'_>) {
    let t = (frame.since(boss.core.phase.entered_at()) / boss.tuning.path_time).min(1.0);
    let from = boss.previous_position;
    let to = boss.locations[boss.current_location];
    boss.core.position = from + (to - from) * t;
    if t >= 1.0 {
        enter_phase(boss, frame, FirePhase::Attacking);
    }
}

fn enter_attacking(boss: &mut FireBoss, frame: &mut Frame<'_>) {
    boss.last_orb = frame.now;
}

fn tick_attacking(boss: &mut FireBoss, frame: &mut Frame<'_>) {
    if frame.since(boss.core.phase.entered_at()) >= boss.tuning.attack_duration {
        enter_phase(boss, frame, FirePhase::Moving);
        return;
    }

    if frame.since(boss.last_orb) >= boss.tuning.orb_interval {
        boss.last_orb = frame.now;
        let (at, target) = (boss.core.position, frame.player.position());
        boss.launch_orb(frame, at, target);
        frame.play(SoundCue::OrbLaunch);
    }
    boss.update_nova(frame);
}

impl BossScript for FireBoss {
    type Phase = FirePhase;

    fn name(&self) -> &'static str {
        BossKind::Fire.name()
    }

    fn core(&self) -> &BossCore<FirePhase> {
        &self.core
    }

    fn core_mut(&mut self) -> &mut BossCore<FirePhase> {
        &mut self.core
    }

    fn descriptor(phase: FirePhase) -> PhaseDescriptor<Self> {
        match phase {
            FirePhase::Inactive => PhaseDescriptor::new()
                .on_exit(exit_inactive)
                .tick(tick_inactive),
            FirePhase::Moving => PhaseDescriptor::new().on_enter(enter_moving).tick(tick_moving),
            FirePhase::Attacking => PhaseDescriptor::new()
                .on_enter(enter_attacking)
                .tick(tick_attacking),
            FirePhase::Dying => dying_descriptor(),
            FirePhase::Fading => fading_descriptor(),
        }
    }

    fn update_entities(&mut self, frame: &mut Frame<'_>) {
        let (now, dt) = (frame.now, frame.dt);
        let target = frame.player.position();
        let removed = self.orbs.update_all(|_, orb| orb.update(now, dt, target));
        frame.removed(ProjectileOrb::KIND, removed);
    }

    fn arbitrate(&mut self, frame: &mut Frame<'_>) {
        self.arbitrate_orbs(frame);

        let phase = self.core.phase.current();
        if phase == FirePhase::Inactive || phase.is_terminal() {
            return;
        }

        let body = self.body();
        if frame.player.collision_circle().overlaps_circle(&body) {
            frame.knock_player(
                "fire body",
                self.tuning.contact_damage,
                self.tuning.contact_knockback,
                self.core.position,
            );
        }

        let tongue_hit = frame.player.attack_hits(PlayerAttack::Tongue, &Shape::Circle(body));
        if tongue_hit
            && !self.core.flash.is_active()
            && frame.since(self.last_tongue_hit) >= self.tuning.tongue_throttle
        {
            self.last_tongue_hit = frame.now;
            let damage = frame.player.attack_damage(PlayerAttack::Tongue);
            deal_damage(self, frame, damage);
        }
    }

    fn on_defeated(&mut self, frame: &mut Frame<'_>) {
        self.kill_orbs(frame);
        frame.player.set_frozen(false);
        frame.dialogue.open_dialogue_text_box(SPEAKER, DEFEAT_TEXT);
        frame.scene.record_boss_defeated(BossKind::Fire);
        frame.scene.fade_out_music();
    }

    fn on_faded(&mut self, frame: &mut Frame<'_>) {
        let kind = BossKind::Fire;
        grant_rewards(frame, self.core.position, self.core.group_id, kind.reward(), kind.area());
    }

    fn clear_entities(&mut self) {
        self.orbs.clear();
    }

    fn compact(&mut self) {
        self.orbs.compact();
    }

    fn draw(&self, canvas: &mut dyn Canvas, now: f32) {
        let bob = (now * 2.0).sin() * FLOAT_AMPLITUDE;
        canvas.sprite("FireBossTx", self.core.position + Vec2::new(0.0, bob), self.core.body_alpha(now));
        self.orbs.draw_all(canvas, now);

        if self.core.phase.current() != FirePhase::Inactive {
            canvas.health_bar(self.name(), self.core.health.fraction());
        }
        if canvas.debug() {
            canvas.circle(&self.body(), Color::Red);
            canvas.circle(&Circle::new(self.core.position, self.tuning.nova_range), Color::Orange);
        }
    }

    fn skip_target(&self) -> Option<FirePhase> {
        match self.core.phase.current() {
            FirePhase::Inactive => Some(FirePhase::Moving),
            FirePhase::Moving => Some(FirePhase::Attacking),
            FirePhase::Attacking => Some(FirePhase::Moving),
            FirePhase::Dying => Some(FirePhase::Fading),
            FirePhase::Fading => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::boss::{Encounter, EncounterEvent};
    use crate::bosses::full_catalog;
    use crate::collab::{Area, SandboxHost, SceneCall};
    use crate::pools::SubEntityKind;

    const DT: f32 = 1.0 / 60.0;
    const GROUP: i32 = 2;

    fn boss() -> FireBoss {
        FireBoss::new(30, 8, GROUP, Difficulty::Normal, &BossTunings::default(), &full_catalog())
            .expect("boss should build")
    }

    fn encounter_with_player(offset: Vec2) -> Encounter<FireBoss, SandboxHost> {
        let boss = boss();
        let player = boss.core().position + offset;
        Encounter::with_seed(boss, SandboxHost::new(player), Difficulty::Normal, 5)
    }

    fn encounter() -> Encounter<FireBoss, SandboxHost> {
        encounter_with_player(Vec2::new(0.0, 2000.0))
    }

    fn run(enc: &mut Encounter<FireBoss, SandboxHost>, seconds: f32) {
        let frames = (seconds / DT).ceil() as usize;
        for _ in 0..frames {
            enc.update(DT);
        }
    }

    fn orbs_spawned(enc: &Encounter<FireBoss, SandboxHost>) -> usize {
        enc.events().count(|e| {
            matches!(e, EncounterEvent::Spawned { kind: SubEntityKind::ProjectileOrb, .. })
        })
    }

    #[test]
    fn test_five_distinct_locations() {
        let boss = boss();
        let locations = boss.locations();
        for i in 0..5 {
            for j in (i + 1)..5 {
                assert!(locations[i].distance(locations[j]) > 1.0);
            }
        }
        assert_eq!(locations[0], boss.core().position);
    }

    #[test]
    fn test_intro_sequence() {
        let mut enc = encounter();
        enc.host_mut().triggers.trigger(GROUP);
        enc.update(DT);
        assert!(enc.host().player.frozen);
        assert!(enc.host().dialogue.was_opened(INTRO_TEXT));

        enc.host_mut().dialogue.close();
        enc.update(DT);
        assert_eq!(enc.phase(), FirePhase::Moving);
        assert!(!enc.host().player.frozen);
    }

    #[test]
    fn test_skipping_the_intro_releases_the_player() {
        let mut enc = encounter();
        enc.host_mut().triggers.trigger(GROUP);
        enc.update(DT);
        assert!(enc.host().player.frozen);

        assert!(enc.skip_phase());
        assert_eq!(enc.phase(), FirePhase::Moving);
        run(&mut enc, 1.0);
        assert!(!enc.host().player.frozen);
    }

    #[test]
    fn test_moves_to_a_new_location() {
        let mut enc = encounter();
        enc.force_phase(FirePhase::Moving);
        let target = enc.boss().current_location();
        assert_ne!(target, 0);

        run(&mut enc, 0.75);
        assert_eq!(enc.phase(), FirePhase::Moving);

        run(&mut enc, 0.85);
        assert_eq!(enc.phase(), FirePhase::Attacking);
        let boss = enc.boss();
        assert!(boss.core().position.distance(boss.locations()[target]) < 1e-3);
    }

    #[test]
    fn test_orbs_on_interval() {
        let mut enc = encounter();
        enc.force_phase(FirePhase::Attacking);
        run(&mut enc, 3.5);
        assert_eq!(orbs_spawned(&enc), 3);
        assert_eq!(enc.host().scene.count_sound(SoundCue::OrbLaunch), 3);

        run(&mut enc, 2.6);
        assert_eq!(enc.phase(), FirePhase::Moving);
    }

    #[test]
    fn test_nova_respects_cooldown() {
        let mut enc = encounter_with_player(Vec2::new(100.0, 0.0));
        enc.force_phase(FirePhase::Attacking);
        run(&mut enc, 0.9);
        assert_eq!(enc.host().scene.count_sound(SoundCue::FireNova), 1);
        let hit = enc.host().player.hits[0];
        assert_eq!(hit.amount, 0.5);
        assert!(hit.knockback.is_some());

        // Nothing while far away, even after the cooldown
        enc.host_mut().player.position = enc.boss().core().position + Vec2::new(0.0, 2000.0);
        run(&mut enc, 3.0);
        assert_eq!(enc.host().scene.count_sound(SoundCue::FireNova), 1);
    }

    #[test]
    fn test_tongue_throttled_and_flash_gated() {
        let mut enc = encounter();
        enc.force_phase(FirePhase::Attacking);
        let body = enc.boss().body();
        enc.host_mut().player.set_attack(PlayerAttack::Tongue, body);

        run(&mut enc, 0.6);
        assert_eq!(enc.boss().core().health.current(), 9.0);

        run(&mut enc, 1.4);
        assert_eq!(enc.boss().core().health.current(), 7.0);
    }

    #[test]
    fn test_fire_breath_is_harmless() {
        let mut enc = encounter();
        enc.force_phase(FirePhase::Attacking);
        let body = enc.boss().body();
        enc.host_mut().player.set_attack(PlayerAttack::FireBreath, body);
        run(&mut enc, 1.0);
        assert!(enc.boss().core().health.is_full());
    }

    #[test]
    fn test_ice_breath_melts_orbs() {
        let mut enc = encounter();
        enc.force_phase(FirePhase::Attacking);
        run(&mut enc, 1.1);
        assert_eq!(enc.boss().orbs().len(), 1);

        let mut at = Vec2::ZERO;
        enc.boss().orbs().for_each(|_, orb| at = orb.position);
        enc.host_mut().player.set_attack(PlayerAttack::IceBreath, Circle::new(at, 40.0));
        enc.update(DT);
        assert!(enc.boss().orbs().is_empty());
        assert!(enc.host().player.hits.is_empty());
    }

    #[test]
    fn test_orb_consumed_on_contact() {
        let mut enc = encounter();
        enc.force_phase(FirePhase::Attacking);
        let (at, now) = (enc.host().player.position, enc.now());
        let orb = ProjectileOrb::new(at, 0.0, now, BossTunings::default().fire.orb);
        enc.boss_mut().orbs.spawn(orb);

        enc.update(DT);
        assert!(enc.boss().orbs().is_empty());
        assert_eq!(enc.host().player.damage_taken(), 0.5);
        let orb_hits = enc.events().count(|e| {
            matches!(e, EncounterEvent::PlayerHit { source: "fire orb", .. })
        });
        assert_eq!(orb_hits, 1);
    }

    #[test]
    fn test_orbs_expire() {
        let mut enc = encounter();
        enc.force_phase(FirePhase::Attacking);
        run(&mut enc, 1.1);
        enc.force_phase(FirePhase::Moving);
        run(&mut enc, 6.1);
        let removed = enc.events().count(|e| {
            matches!(e, EncounterEvent::Removed { kind: SubEntityKind::ProjectileOrb, .. })
        });
        assert!(removed >= 1);
    }

    #[test]
    fn test_defeat_kills_orbs_and_rewards() {
        let mut enc = encounter();
        enc.force_phase(FirePhase::Attacking);
        run(&mut enc, 2.1);
        assert_eq!(enc.boss().orbs().len(), 2);

        enc.deal_damage(10.0);
        assert_eq!(enc.phase(), FirePhase::Dying);
        assert!(enc.boss().orbs().is_empty());
        assert!(enc.host().dialogue.was_opened(DEFEAT_TEXT));

        enc.host_mut().dialogue.close();
        let mut finished = false;
        for _ in 0..300 {
            if enc.update(DT) {
                finished = true;
                break;
            }
        }
        assert!(finished);
        assert_eq!(enc.host().scene.count(&SceneCall::AreaMusic(Area::FieryCaverns)), 1);
        assert_eq!(enc.host().scene.count(&SceneCall::BossDefeated(BossKind::Fire)), 1);
        assert_eq!(enc.host().scene.loot_drops(), 1);
    }
}
