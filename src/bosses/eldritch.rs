//! The eldritch tentacle boss
//!
//! Sits at the top of its arena and never moves. Tentacles burst out of five
//! points around the arena; hitting the marked one enough times makes the
//! boss open a fire or ice eye and rain fireballs or crushers on the player.
//! The open eye is the only place it can be hurt.

use rand::Rng;
use serde::Serialize;

use crate::boss::{
    deal_damage, dying_descriptor, enter_phase, fading_descriptor, grant_rewards, heal_damage,
    BossCore, BossHealth, BossScript, Frame, Indicator, PhaseDescriptor, PhaseKind,
};
use crate::collab::{MusicTrack, PlayerAttack, ProjectileKind, ProjectileSpec, SoundCue};
use crate::data::{
    require_resources, BossTunings, EldritchTuning, ResourceCatalog, ResourceKind, ResourceRef,
};
use crate::error::BossError;
use crate::game::Difficulty;
use crate::geometry::{Circle, Rect, Shape, Vec2};
use crate::pools::{Crusher, FireBall, Pool, SubEntity, Tentacle, TentacleCue};
use crate::render::{Canvas, Color};

use super::BossKind;

const SPEAKER: i32 = -1;
const INTRO_TEXT: u32 = 190;
const HEAL_TEXT: u32 = 191;
const DEFEAT_TEXT: u32 = 192;

pub const REQUIRED_RESOURCES: &[ResourceRef] = &[
    (ResourceKind::Texture, "LovecraftTx"),
    (ResourceKind::Animation, "LightningEye"),
    (ResourceKind::Animation, "FireEye"),
    (ResourceKind::Animation, "IceEye"),
    (ResourceKind::ParticleSystem, "bigFireball"),
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum EldritchPhase {
    /// Waiting for the player and talking
    Inactive,
    Tentacles,
    EyeAttack,
    Dying,
    Fading,
}

impl PhaseKind for EldritchPhase {
    const DYING: Self = EldritchPhase::Dying;
    const FADING: Self = EldritchPhase::Fading;

    fn name(&self) -> &'static str {
        match self {
            EldritchPhase::Inactive => "inactive",
            EldritchPhase::Tentacles => "tentacles",
            EldritchPhase::EyeAttack => "eye attack",
            EldritchPhase::Dying => "dying",
            EldritchPhase::Fading => "fading",
        }
    }
}

/// Which eye is showing
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum EyeKind {
    Lightning,
    Fire,
    Ice,
}

impl EyeKind {
    pub fn animation(&self) -> &'static str {
        match self {
            EyeKind::Lightning => "LightningEye",
            EyeKind::Fire => "FireEye",
            EyeKind::Ice => "IceEye",
        }
    }

    /// Screen tint during an attack with this eye
    pub fn tint(&self) -> Color {
        match self {
            EyeKind::Lightning => Color::Yellow,
            EyeKind::Fire => Color::Red,
            EyeKind::Ice => Color::Blue,
        }
    }
}

pub struct EldritchBoss {
    core: BossCore<EldritchPhase>,
    tuning: EldritchTuning,
    arena_center: Vec2,
    anchors: [Vec2; 5],

    eye: Indicator,
    eye_kind: EyeKind,
    last_attack_was_fire: bool,

    started_intro: bool,
    started_heal_dialogue: bool,

    last_tentacle_spawn: f32,
    marked_hits: u32,

    // Eye attack
    attack_started: bool,
    tint_cleared: bool,
    last_wave: f32,
    last_crusher: f32,
    crusher_delay: f32,

    tentacles: Pool<Tentacle>,
    fireballs: Pool<FireBall>,
    crushers: Pool<Crusher>,
}

impl EldritchBoss {
    /// Boss sitting at grid cell `(grid_x, grid_y)`
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
        tunings.eldritch.validate()?;

        let tuning = tunings.eldritch;
        let position = Vec2::new(grid_x as f32 * 64.0 + 64.0, grid_y as f32 * 64.0 + 32.0);
        let arena_center = Vec2::new(position.x, position.y + 320.0);
        let (cx, y) = (arena_center.x, position.y);
        let anchors = [
            Vec2::new(cx, y + 110.0),
            Vec2::new(cx - 200.0, y + 110.0 - 180.0),
            Vec2::new(cx + 200.0, y + 110.0 - 180.0),
            Vec2::new(cx - 200.0, y + 110.0 + 180.0),
            Vec2::new(cx + 200.0, y + 110.0 + 180.0),
        ];

        log::debug!("Eldritch boss placed at ({}, {}) for group {}", position.x, position.y, group_id);

        Ok(Self {
            core: BossCore::new(
                position,
                BossHealth::scaled(tuning.health, difficulty),
                EldritchPhase::Inactive,
                group_id,
                &tunings.common,
            ),
            tuning,
            arena_center,
            anchors,
            eye: Indicator::new(tuning.eye_transition_time),
            eye_kind: EyeKind::Lightning,
            last_attack_was_fire: false,
            started_intro: false,
            started_heal_dialogue: false,
            last_tentacle_spawn: 0.0,
            marked_hits: 0,
            attack_started: false,
            tint_cleared: false,
            last_wave: 0.0,
            last_crusher: 0.0,
            crusher_delay: 0.0,
            tentacles: Pool::new(),
            fireballs: Pool::new(),
            crushers: Pool::new(),
        })
    }

    pub fn arena_center(&self) -> Vec2 {
        self.arena_center
    }

    pub fn eye(&self) -> &Indicator {
        &self.eye
    }

    pub fn eye_kind(&self) -> EyeKind {
        self.eye_kind
    }

    pub fn marked_hits(&self) -> u32 {
        self.marked_hits
    }

    pub fn tentacles(&self) -> &Pool<Tentacle> {
        &self.tentacles
    }

    pub fn fireballs(&self) -> &Pool<FireBall> {
        &self.fireballs
    }

    pub fn crushers(&self) -> &Pool<Crusher> {
        &self.crushers
    }

    fn body(&self) -> Circle {
        Circle::new(self.core.position, self.tuning.body_radius)
    }

    fn eye_box(&self) -> Rect {
        let half = self.tuning.eye_half_size;
        Rect::from_center(self.core.position + self.tuning.eye_offset, half.x, half.y)
    }

    fn open_eye(&mut self, kind: EyeKind, now: f32) {
        self.eye_kind = kind;
        self.eye.open(now);
    }

    fn spawn_tentacles(&mut self, frame: &mut Frame<'_>) {
        self.last_tentacle_spawn = frame.now;
        let marked = frame.rng.gen_range(0..self.anchors.len());
        for (i, anchor) in self.anchors.iter().enumerate() {
            let angle = frame.rng.gen_range(0.0..std::f32::consts::TAU);
            let dist = self.tuning.tentacle_jitter.roll(frame.rng);
            let offset = frame.rng.gen_range(0.0..=self.tuning.tentacle.max_time_offset);
            self.tentacles.spawn(Tentacle::new(
                *anchor + Vec2::from_angle(angle) * dist,
                frame.now,
                self.tuning.tentacle_duration,
                offset,
                i == marked,
                self.tuning.tentacle,
            ));
            frame.spawned(Tentacle::KIND);
        }
    }

    /// A wave of fireballs falling across the whole arena
    fn update_fire_attack(&mut self, frame: &mut Frame<'_>) {
        let wave = self.tuning.fireball;
        if frame.since(self.last_wave) <= wave.wave_interval {
            return;
        }

        let offset = wave.offset.roll(frame.rng);
        let gap = wave.gap.roll(frame.rng);
        let count = (wave.wave_span / gap) as usize;
        let speed = wave.speed.roll(frame.rng);
        let top = frame.player.position().y - wave.spawn_height;
        let left = self.arena_center.x - wave.wave_left + offset;

        for i in 0..count {
            let at = Vec2::new(left + gap * i as f32, top);
            self.fireballs.spawn(FireBall::new(at, speed, frame.now, &wave));
            frame.spawned(FireBall::KIND);
        }
        self.last_wave = frame.now;
        frame.play(SoundCue::FirePassBy);
    }

    /// Crushers closing in on a band around the player
    fn update_ice_attack(&mut self, frame: &mut Frame<'_>) {
        let crusher = self.tuning.crusher;
        if frame.since(self.last_crusher) <= self.crusher_delay {
            return;
        }

        let player_y = frame.player.position().y;
        let arena_top = self.arena_center.y - crusher.arena_half_height;
        let arena_bottom = self.arena_center.y + crusher.arena_half_height;
        let top = (player_y - crusher.band.roll(frame.rng)).max(arena_top);
        let bottom = (player_y + crusher.band.roll(frame.rng)).min(arena_bottom);

        let wanted = match frame.rng.gen_range(0..1000) {
            r if r < 100 => 4,
            r if r < 500 => 3,
            _ => 2,
        };
        let range = (bottom - top).max(0.0);
        let count = wanted.min((range / crusher.min_spacing) as usize);
        let speed = crusher.speed.roll(frame.rng);

        for i in 0..count {
            let y = top + i as f32 * (range / count as f32);
            self.crushers
                .spawn(Crusher::new(Vec2::new(self.arena_center.x, y), speed, crusher));
            frame.spawned(Crusher::KIND);
        }

        self.last_crusher = frame.now;
        self.crusher_delay = crusher.base_delay + speed / (crusher.max_size * 2.0);
    }

    fn spit_slime(&self, frame: &mut Frame<'_>, from: Vec2) {
        let target = frame.player.position();
        let spread = self.tuning.slime_spread;
        let angle = from.angle_to(target) + frame.rng.gen_range(-spread..=spread);
        frame.projectiles.spawn_projectile(ProjectileSpec {
            kind: ProjectileKind::Slime,
            origin: from,
            angle,
            speed: self.tuning.slime_speed,
            damage: self.tuning.slime_damage,
            hostile: true,
            max_distance: Some(from.distance(target)),
        });
    }

    fn arbitrate_body(&mut self, frame: &mut Frame<'_>) {
        let body = self.body();
        if frame.player.collision_circle().overlaps_circle(&body) {
            frame.knock_player(
                "eldritch body",
                self.tuning.contact_damage,
                self.tuning.contact_knockback,
                self.core.position,
            );
        }
        if frame.player.attack_hits(PlayerAttack::Tongue, &Shape::Circle(body)) {
            frame.play(SoundCue::HitInvulnerable);
        }

        if self.eye.is_closed() {
            return;
        }
        let eye = Shape::Rect(self.eye_box());
        let dt = frame.dt;
        match self.eye_kind {
            EyeKind::Fire => {
                // Scaled by the player's base (tongue) damage
                let amount = frame.player.attack_damage(PlayerAttack::Tongue)
                    * self.tuning.fire_eye_damage_scale
                    * dt;
                if frame.player.attack_hits(PlayerAttack::IceBreath, &eye) {
                    deal_damage(self, frame, amount);
                }
                if frame.player.attack_hits(PlayerAttack::FireBreath, &eye) {
                    heal_damage(self, frame, amount);
                }
            }
            EyeKind::Ice => {
                let amount = frame.player.attack_damage(PlayerAttack::FireBreath)
                    * self.tuning.ice_eye_damage_scale
                    * dt;
                if frame.player.attack_hits(PlayerAttack::FireBreath, &eye) {
                    deal_damage(self, frame, amount);
                }
                if frame.player.attack_hits(PlayerAttack::IceBreath, &eye) {
                    heal_damage(self, frame, amount);
                }
            }
            EyeKind::Lightning => {}
        }
    }

    fn arbitrate_tentacles(&mut self, frame: &mut Frame<'_>) {
        let mut solid = Vec::new();
        self.tentacles.for_each(|_, t| {
            if t.is_solid() {
                solid.push((t.hitbox(), t.marked));
            }
        });

        let tentacle = self.tuning.tentacle;
        let mut marked_hit = false;
        for (hitbox, marked) in solid {
            if frame.player.collision_circle().overlaps_rect(&hitbox) {
                frame.knock_player(
                    "tentacle",
                    tentacle.contact_damage,
                    tentacle.contact_knockback,
                    hitbox.center(),
                );
            }

            let shape = Shape::Rect(hitbox);
            let hit = frame.player.attack_hits(PlayerAttack::Tongue, &shape)
                || frame.projectiles.kill_projectiles_in_box(&hitbox, ProjectileKind::LightningOrb) > 0
                || frame.player.attack_hits(PlayerAttack::FireBreath, &shape);
            if !hit {
                continue;
            }

            if !marked {
                frame.play(SoundCue::HitInvulnerable);
            } else if !self.core.flash.is_active() && !self.core.is_dead() {
                deal_damage(self, frame, 0.0);
                self.marked_hits += 1;
                marked_hit = true;
                log::debug!("Marked tentacle hit ({} so far)", self.marked_hits);
            }
        }

        if marked_hit {
            self.tentacles.for_each_mut(|_, t| t.force_exit());
        }
    }

    fn arbitrate_hazards(&mut self, frame: &mut Frame<'_>) {
        let player = frame.player.collision_circle();

        let mut fireball_hits = Vec::new();
        self.fireballs.for_each(|_, ball| {
            if player.overlaps_circle(&ball.circle()) {
                fireball_hits.push(ball.damage());
            }
        });
        for damage in fireball_hits {
            frame.hurt_player("fireball", damage);
        }

        let mut crusher_hits = 0;
        self.crushers.for_each_mut(|_, crusher| {
            if crusher.try_hit(&player) {
                crusher_hits += 1;
            }
        });
        for _ in 0..crusher_hits {
            frame.hurt_player("crusher", self.tuning.crusher.damage);
        }
    }
}

fn tick_inactive(boss: &mut EldritchBoss, frame: &mut Frame<'_>) {
    if !boss.started_intro && frame.triggers.has_triggered(boss.core.group_id) {
        if boss.eye.is_closed() {
            frame.player.set_frozen(true);
            boss.open_eye(EyeKind::Lightning, frame.now);
        }
        if boss.eye.is_open() {
            frame.dialogue.open_dialogue_text_box(SPEAKER, INTRO_TEXT);
            boss.started_intro = true;
        }
    }

    if boss.started_intro && !frame.dialogue.is_text_box_open() {
        if boss.eye.is_open() {
            boss.eye.close(frame.now);
        }
        if boss.eye.is_closed() {
            frame.player.set_frozen(false);
            enter_phase(boss, frame, EldritchPhase::Tentacles);
            frame.scene.play_music(MusicTrack::BossMusic);
        }
    }
}

fn exit_inactive(boss: &mut EldritchBoss, frame: &mut Frame<'_>) {
    boss.started_intro = true;
    boss.eye.shut();
    frame.player.set_frozen(false);
}

fn enter_tentacles(boss: &mut EldritchBoss, frame: &mut Frame<'_>) {
    // Spawn a batch on the first tick
    boss.last_tentacle_spawn = frame.now - boss.tuning.tentacle_spawn_interval - 1.0;
    boss.marked_hits = 0;
    if !boss.core.health.is_full() && !boss.started_heal_dialogue {
        boss.started_heal_dialogue = true;
        frame.dialogue.open_dialogue_text_box(SPEAKER, HEAL_TEXT);
    }
}

fn tick_tentacles(boss: &mut EldritchBoss, frame: &mut Frame<'_>) {
    if boss.marked_hits >= boss.tuning.marked_hits_required {
        enter_phase(boss, frame, EldritchPhase::EyeAttack);
        return;
    }

    if frame.since(boss.last_tentacle_spawn) > boss.tuning.tentacle_spawn_interval {
        boss.spawn_tentacles(frame);
    }

    let regen = boss.tuning.heal_rate * frame.difficulty.heal_rate_multiplier() * frame.dt;
    heal_damage(boss, frame, regen);
}

fn enter_eye_attack(boss: &mut EldritchBoss, frame: &mut Frame<'_>) {
    boss.crusher_delay = 0.0;
    boss.last_crusher = frame.now;
    boss.attack_started = false;
    boss.tint_cleared = false;

    let kind = if boss.last_attack_was_fire { EyeKind::Ice } else { EyeKind::Fire };
    boss.last_attack_was_fire = kind == EyeKind::Fire;
    boss.open_eye(kind, frame.now);
}

fn tick_eye_attack(boss: &mut EldritchBoss, frame: &mut Frame<'_>) {
    let in_phase = frame.since(boss.core.phase.entered_at());
    let tint = boss.eye_kind.tint();
    let max_alpha = boss.tuning.tint_max_alpha;

    if !boss.attack_started {
        let alpha = in_phase * boss.tuning.tint_ramp_rate;
        if alpha >= max_alpha {
            frame.scene.set_screen_tint(tint, max_alpha);
            boss.attack_started = true;
            boss.last_wave = frame.now;
        } else {
            frame.scene.set_screen_tint(tint, alpha);
        }
    } else if in_phase < boss.tuning.attack_duration {
        match boss.eye_kind {
            EyeKind::Fire => boss.update_fire_attack(frame),
            EyeKind::Ice => boss.update_ice_attack(frame),
            EyeKind::Lightning => {}
        }
        frame.scene.set_screen_tint(tint, max_alpha);
    } else if !boss.tint_cleared {
        boss.tint_cleared = true;
        frame.scene.clear_screen_tint();
    }

    if in_phase > boss.tuning.attack_duration + boss.tuning.window_to_attack {
        if boss.eye.is_open() {
            boss.eye.close(frame.now);
        }
        if boss.eye.is_closed() {
            enter_phase(boss, frame, EldritchPhase::Tentacles);
        }
    }
}

fn exit_eye_attack(boss: &mut EldritchBoss, frame: &mut Frame<'_>) {
    boss.eye.shut();
    frame.scene.clear_screen_tint();
}

impl BossScript for EldritchBoss {
    type Phase = EldritchPhase;

    fn name(&self) -> &'static str {
        BossKind::Eldritch.name()
    }

    fn core(&self) -> &BossCore<EldritchPhase> {
        &self.core
    }

    fn core_mut(&mut self) -> &mut BossCore<EldritchPhase> {
        &mut self.core
    }

    fn descriptor(phase: EldritchPhase) -> PhaseDescriptor<Self> {
        match phase {
            EldritchPhase::Inactive => PhaseDescriptor::new()
                .on_exit(exit_inactive)
                .tick(tick_inactive),
            EldritchPhase::Tentacles => PhaseDescriptor::new()
                .on_enter(enter_tentacles)
                .tick(tick_tentacles),
            EldritchPhase::EyeAttack => PhaseDescriptor::new()
                .on_enter(enter_eye_attack)
                .on_exit(exit_eye_attack)
                .tick(tick_eye_attack),
            EldritchPhase::Dying => dying_descriptor(),
            EldritchPhase::Fading => fading_descriptor(),
        }
    }

    fn update_entities(&mut self, frame: &mut Frame<'_>) {
        let (now, dt) = (frame.now, frame.dt);
        self.eye.update(now);

        let mut emerged = false;
        let mut spits = Vec::new();
        let removed = self.tentacles.update_all(|_, tentacle| {
            let (life, cue) = tentacle.update(now, dt);
            match cue {
                Some(TentacleCue::Emerged) => emerged = true,
                Some(TentacleCue::Spit) => spits.push(tentacle.mouth()),
                None => {}
            }
            life
        });
        frame.removed(Tentacle::KIND, removed);
        if emerged {
            frame.play(SoundCue::TentaclesExtend);
        }
        for from in spits {
            self.spit_slime(frame, from);
        }

        let removed = self.fireballs.update_all(|_, ball| ball.update(now, dt));
        frame.removed(FireBall::KIND, removed);

        let mut slammed = false;
        let removed = self.crushers.update_all(|_, crusher| {
            let (life, cue) = crusher.update(now, dt);
            slammed |= cue.is_some();
            life
        });
        frame.removed(Crusher::KIND, removed);
        if slammed {
            frame.play(SoundCue::CrusherSlam);
        }
    }

    fn arbitrate(&mut self, frame: &mut Frame<'_>) {
        let phase = self.core.phase.current();
        if phase != EldritchPhase::Inactive && !phase.is_terminal() {
            self.arbitrate_body(frame);
        }
        self.arbitrate_tentacles(frame);
        self.arbitrate_hazards(frame);
    }

    fn on_defeated(&mut self, frame: &mut Frame<'_>) {
        self.eye.close(frame.now);
        frame.player.set_frozen(false);
        frame.dialogue.open_dialogue_text_box(SPEAKER, DEFEAT_TEXT);
        frame.scene.record_boss_defeated(BossKind::Eldritch);
        frame.scene.fade_out_music();
    }

    fn on_faded(&mut self, frame: &mut Frame<'_>) {
        let kind = BossKind::Eldritch;
        grant_rewards(frame, self.core.position, self.core.group_id, kind.reward(), kind.area());
    }

    fn clear_entities(&mut self) {
        self.tentacles.clear();
        self.fireballs.clear();
        self.crushers.clear();
    }

    fn compact(&mut self) {
        self.tentacles.compact();
        self.fireballs.compact();
        self.crushers.compact();
    }

    fn draw(&self, canvas: &mut dyn Canvas, now: f32) {
        let alpha = self.core.body_alpha(now);
        self.tentacles.draw_all(canvas, now);
        canvas.sprite("LovecraftTx", self.core.position, alpha);
        if !self.eye.is_closed() {
            canvas.sprite(self.eye_kind.animation(), self.core.position + self.tuning.eye_offset, alpha);
        }
        self.fireballs.draw_all(canvas, now);
        self.crushers.draw_all(canvas, now);

        if self.core.phase.current() != EldritchPhase::Inactive {
            canvas.health_bar(self.name(), self.core.health.fraction());
        }
        if canvas.debug() {
            canvas.circle(&self.body(), Color::Red);
            canvas.rect(&self.eye_box(), Color::Red);
        }
    }

    fn skip_target(&self) -> Option<EldritchPhase> {
        match self.core.phase.current() {
            EldritchPhase::Inactive => Some(EldritchPhase::Tentacles),
            EldritchPhase::Tentacles => Some(EldritchPhase::EyeAttack),
            EldritchPhase::EyeAttack => Some(EldritchPhase::Tentacles),
            EldritchPhase::Dying => Some(EldritchPhase::Fading),
            EldritchPhase::Fading => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::boss::{Encounter, EncounterEvent};
    use crate::bosses::full_catalog;
    use crate::collab::{Area, SandboxHost, SceneCall};
    use crate::data::ResourceSet;
    use crate::pools::{CrusherState, TentacleState};
    use rand::SeedableRng;

    const DT: f32 = 1.0 / 60.0;
    const GROUP: i32 = 4;

    fn boss() -> EldritchBoss {
        EldritchBoss::new(10, 5, GROUP, Difficulty::Normal, &BossTunings::default(), &full_catalog())
            .expect("boss should build")
    }

    fn encounter() -> Encounter<EldritchBoss, SandboxHost> {
        let boss = boss();
        // Well below the body, clear of the eye
        let player = boss.arena_center() + Vec2::new(0.0, 250.0);
        Encounter::with_seed(boss, SandboxHost::new(player), Difficulty::Normal, 7)
    }

    fn run(enc: &mut Encounter<EldritchBoss, SandboxHost>, seconds: f32) {
        let frames = (seconds / DT).ceil() as usize;
        for _ in 0..frames {
            enc.update(DT);
        }
    }

    #[test]
    fn test_missing_resource_fails_construction() {
        let catalog = ResourceSet::from_refs(&REQUIRED_RESOURCES[1..]);
        let result = EldritchBoss::new(0, 0, 0, Difficulty::Normal, &BossTunings::default(), &catalog);
        assert!(matches!(result, Err(BossError::MissingResource { .. })));
    }

    #[test]
    fn test_invalid_tuning_fails_construction() {
        let mut tunings = BossTunings::default();
        tunings.eldritch.tentacle_duration = 0.0;
        let result = EldritchBoss::new(0, 0, 0, Difficulty::Normal, &tunings, &full_catalog());
        assert!(matches!(result, Err(BossError::InvalidTuning { .. })));
    }

    #[test]
    fn test_layout() {
        let boss = boss();
        assert_eq!(boss.core().position, Vec2::new(704.0, 352.0));
        assert_eq!(boss.arena_center(), Vec2::new(704.0, 672.0));
        assert_eq!(boss.anchors[0], Vec2::new(704.0, 462.0));
    }

    #[test]
    fn test_intro_sequence() {
        let mut enc = encounter();
        run(&mut enc, 1.0);
        assert_eq!(enc.phase(), EldritchPhase::Inactive);
        assert!(!enc.host().player.frozen);

        enc.host_mut().triggers.trigger(GROUP);
        enc.update(DT);
        assert!(enc.host().player.frozen);

        run(&mut enc, 0.6);
        assert!(enc.host().dialogue.was_opened(INTRO_TEXT));
        assert_eq!(enc.phase(), EldritchPhase::Inactive);

        enc.host_mut().dialogue.close();
        run(&mut enc, 0.6);
        assert_eq!(enc.phase(), EldritchPhase::Tentacles);
        assert!(!enc.host().player.frozen);
        assert_eq!(enc.host().scene.count(&SceneCall::Music(MusicTrack::BossMusic)), 1);
    }

    #[test]
    fn test_tentacles_spawn_with_one_marked() {
        let mut enc = encounter();
        enc.force_phase(EldritchPhase::Tentacles);
        enc.update(DT);

        let mut count = 0;
        let mut marked = 0;
        enc.boss().tentacles().for_each(|_, t| {
            count += 1;
            if t.marked {
                marked += 1;
            }
        });
        assert_eq!(count, 5);
        assert_eq!(marked, 1);
        // Full health: no heal dialogue
        assert!(!enc.host().dialogue.was_opened(HEAL_TEXT));
    }

    #[test]
    fn test_marked_hits_escalate_on_next_tick() {
        for dt in [0.0, DT, 5.0] {
            let mut enc = encounter();
            enc.force_phase(EldritchPhase::Tentacles);
            enc.boss_mut().marked_hits = 5;
            enc.update(dt);
            assert_eq!(enc.phase(), EldritchPhase::EyeAttack);
        }
    }

    #[test]
    fn test_hitting_the_marked_tentacle() {
        let mut enc = encounter();
        enc.force_phase(EldritchPhase::Tentacles);
        run(&mut enc, 1.5);

        let mut marked_box = None;
        enc.boss().tentacles().for_each(|_, t| {
            if t.marked {
                marked_box = Some(t.hitbox());
            }
        });
        let marked_box = marked_box.expect("no marked tentacle");

        enc.host_mut().player.set_attack(PlayerAttack::Tongue, marked_box);
        enc.update(DT);
        enc.host_mut().player.clear_attacks();

        assert_eq!(enc.boss().marked_hits(), 1);
        assert!(enc.boss().core().flash.is_active());
        assert_eq!(enc.boss().core().health.current(), enc.boss().core().health.max());
        enc.boss().tentacles().for_each(|_, t| {
            assert_eq!(t.state(), TentacleState::Exiting);
        });
    }

    #[test]
    fn test_marked_hit_ignored_while_flashing() {
        let mut enc = encounter();
        enc.force_phase(EldritchPhase::Tentacles);
        run(&mut enc, 1.5);
        enc.deal_damage(0.5);

        let mut marked_box = None;
        enc.boss().tentacles().for_each(|_, t| {
            if t.marked {
                marked_box = Some(t.hitbox());
            }
        });
        enc.host_mut().player.set_attack(PlayerAttack::Tongue, marked_box.expect("no marked tentacle"));
        enc.update(DT);
        assert_eq!(enc.boss().marked_hits(), 0);
    }

    #[test]
    fn test_eye_attacks_alternate() {
        let mut enc = encounter();
        let mut kinds = Vec::new();
        for _ in 0..4 {
            enc.force_phase(EldritchPhase::EyeAttack);
            kinds.push(enc.boss().eye_kind());
            enc.force_phase(EldritchPhase::Tentacles);
        }
        assert_eq!(kinds, vec![EyeKind::Fire, EyeKind::Ice, EyeKind::Fire, EyeKind::Ice]);
    }

    #[test]
    fn test_fire_attack_cycle() {
        let mut enc = encounter();
        enc.force_phase(EldritchPhase::EyeAttack);
        assert_eq!(enc.boss().eye_kind(), EyeKind::Fire);

        // Wind-up: tint ramps to 60 over one second
        run(&mut enc, 0.5);
        let (color, alpha) = enc.host().scene.tint.expect("no tint during wind-up");
        assert_eq!(color, Color::Red);
        assert!(alpha > 20.0 && alpha < 40.0);

        run(&mut enc, 1.6);
        assert!(!enc.boss().fireballs().is_empty());
        assert!(enc.host().scene.count_sound(SoundCue::FirePassBy) >= 1);

        // Attack window, cool-down, then the eye closes and tentacles return
        run(&mut enc, 12.5 + 4.6 + 1.0);
        assert_eq!(enc.phase(), EldritchPhase::Tentacles);
        assert_eq!(enc.host().scene.tint, None);
        assert!(enc.boss().eye().is_closed());
    }

    #[test]
    fn test_ice_attack_spawns_crushers() {
        let mut enc = encounter();
        enc.force_phase(EldritchPhase::EyeAttack);
        enc.force_phase(EldritchPhase::Tentacles);
        enc.force_phase(EldritchPhase::EyeAttack);
        assert_eq!(enc.boss().eye_kind(), EyeKind::Ice);

        run(&mut enc, 1.2);
        let crushers = enc.boss().crushers().len();
        assert!((1..=4).contains(&crushers), "got {} crushers", crushers);
        enc.boss().crushers().for_each(|_, c| {
            assert_eq!(c.state(), CrusherState::Extending);
        });
    }

    #[test]
    fn test_ice_eye_takes_fire_breath_damage() {
        let mut enc = encounter();
        enc.force_phase(EldritchPhase::EyeAttack);
        enc.force_phase(EldritchPhase::Tentacles);
        enc.force_phase(EldritchPhase::EyeAttack);
        run(&mut enc, 0.6);
        assert!(enc.boss().eye().is_open());

        let eye = enc.boss().eye_box();
        enc.host_mut().player.set_attack(PlayerAttack::FireBreath, eye);
        let before = enc.boss().core().health.current();
        run(&mut enc, 1.0);
        let after = enc.boss().core().health.current();
        // 0.32 * 1.0 damage per second of breath
        assert!((before - after - 0.32).abs() < 0.02);
    }

    #[test]
    fn test_fire_eye_damage_uses_base_damage() {
        let mut enc = encounter();
        enc.host_mut().player.tongue_damage = 2.0;
        enc.host_mut().player.breath_damage = 1.0;
        enc.force_phase(EldritchPhase::EyeAttack);
        assert_eq!(enc.boss().eye_kind(), EyeKind::Fire);

        let eye = enc.boss().eye_box();
        enc.host_mut().player.set_attack(PlayerAttack::IceBreath, eye);
        let before = enc.boss().core().health.current();
        enc.update(DT);
        let lost = before - enc.boss().core().health.current();
        assert!((lost - 2.0 * 3.25 * DT).abs() < 1e-4);
    }

    #[test]
    fn test_skipping_the_intro_releases_the_player() {
        let mut enc = encounter();
        enc.host_mut().triggers.trigger(GROUP);
        enc.update(DT);
        assert!(enc.host().player.frozen);
        assert!(!enc.boss().eye().is_closed());

        assert!(enc.skip_phase());
        run(&mut enc, 2.0);
        assert_eq!(enc.phase(), EldritchPhase::Tentacles);
        assert!(!enc.host().player.frozen);
        assert!(enc.boss().eye().is_closed());
    }

    #[test]
    fn test_skipping_the_eye_attack_closes_the_eye() {
        let mut enc = encounter();
        enc.force_phase(EldritchPhase::EyeAttack);
        run(&mut enc, 0.6);
        assert!(enc.boss().eye().is_open());

        assert!(enc.skip_phase());
        assert_eq!(enc.phase(), EldritchPhase::Tentacles);
        assert!(enc.boss().eye().is_closed());
        assert_eq!(enc.host().scene.tint, None);

        // Breath on the closed eye no longer heals or hurts
        enc.deal_damage(2.0);
        let eye = enc.boss().eye_box();
        enc.host_mut().player.set_attack(PlayerAttack::FireBreath, eye);
        let before = enc.boss().core().health.current();
        enc.update(DT);
        let gained = enc.boss().core().health.current() - before;
        // Only the passive regeneration
        assert!(gained <= 0.05 * DT + 1e-5);
    }

    #[test]
    fn test_regeneration_scaled_by_difficulty() {
        let mut enc = encounter();
        enc.force_phase(EldritchPhase::Tentacles);
        enc.deal_damage(5.0);
        enc.host_mut().dialogue.close();
        let before = enc.boss().core().health.current();
        run(&mut enc, 2.0);
        let gained = enc.boss().core().health.current() - before;
        assert!((gained - 0.1).abs() < 0.01);
    }

    #[test]
    fn test_defeat_scenario() {
        let mut enc = encounter();
        enc.host_mut().triggers.trigger(GROUP);
        enc.force_phase(EldritchPhase::Tentacles);
        enc.update(DT);
        assert_eq!(enc.boss().core().health.current(), 17.0);

        enc.deal_damage(17.0);
        assert_eq!(enc.boss().core().health.current(), 0.0);
        assert_eq!(enc.phase(), EldritchPhase::Dying);
        assert!(enc.host().dialogue.was_opened(DEFEAT_TEXT));
        assert_eq!(enc.host().scene.count(&SceneCall::BossDefeated(BossKind::Eldritch)), 1);

        run(&mut enc, 1.0);
        assert_eq!(enc.phase(), EldritchPhase::Dying);

        enc.host_mut().dialogue.close();
        enc.update(DT);
        assert_eq!(enc.phase(), EldritchPhase::Fading);

        let mut finished = false;
        for _ in 0..200 {
            enc.deal_damage(1.0);
            if enc.update(DT) {
                finished = true;
                break;
            }
        }
        assert!(finished);
        assert_eq!(enc.host().scene.loot_drops(), 1);
        assert_eq!(enc.host().scene.count(&SceneCall::AreaMusic(Area::ForestOfFungoria)), 1);
        assert_eq!(enc.host().player.health, enc.host().player.max_health);
        assert!(enc.boss().tentacles().is_empty());

        let dying_entries = enc
            .events()
            .count(|e| matches!(e, EncounterEvent::PhaseEntered { to: "dying", .. }));
        assert_eq!(dying_entries, 1);

        // Walking over the loot releases the enemy blocks
        let at = enc.boss().core().position;
        enc.host_mut().player.position = at;
        enc.host_mut().collect_loot();
        assert_eq!(enc.host().triggers.deaths, vec![GROUP]);
    }

    #[test]
    fn test_health_bounded_under_random_frames() {
        let mut enc = encounter();
        enc.force_phase(EldritchPhase::Tentacles);
        let mut rng = rand::rngs::StdRng::seed_from_u64(11);
        for _ in 0..2000 {
            let dt = rng.gen_range(0.0..0.1);
            if rng.gen_bool(0.05) {
                enc.deal_damage(rng.gen_range(0.0..2.0));
            }
            enc.host_mut().dialogue.close();
            enc.update(dt);
            let health = enc.boss().core().health;
            assert!(health.current() >= 0.0 && health.current() <= health.max());
        }
    }
}
