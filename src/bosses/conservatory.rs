//! The hopping egg boss
//!
//! Shoots from its two eyes while a ring of launchers fires on a shared
//! pulse, then hops around the arena and releases floating eyes. Only the
//! blasts of its own floating eyes can hurt it.

use std::f32::consts::TAU;

use rand::Rng;
use serde::Serialize;

use crate::boss::{
    deal_damage, dying_descriptor, enter_phase, fading_descriptor, grant_rewards, BossCore,
    BossHealth, BossScript, Frame, Indicator, PhaseDescriptor, PhaseKind,
};
use crate::collab::{MusicTrack, PlayerAttack, ProjectileKind, ProjectileSpec, SoundCue};
use crate::data::{
    require_resources, BossTunings, ConservatoryTuning, ResourceCatalog, ResourceKind, ResourceRef,
};
use crate::error::BossError;
use crate::game::Difficulty;
use crate::geometry::{Circle, Rect, Shape, Vec2};
use crate::pools::{Blast, FloatingEye, FloatingEyeState, Pool, SubEntity};
use crate::render::{Canvas, Color};

use super::BossKind;

const SPEAKER: i32 = -1;
const INTRO_TEXT: u32 = 170;
const COMPLAIN_TEXT: u32 = 171;
const DEFEAT_TEXT: u32 = 172;

/// Eyes sit left and right of the body center
const EYE_OFFSETS: [Vec2; 2] = [Vec2::new(-28.0, -30.0), Vec2::new(28.0, -30.0)];

/// Minimum time between two "invulnerable" cues from the tongue
const TONGUE_CUE_INTERVAL: f32 = 0.5;

/// Spread of floating eye anchors around the player
const EYE_DROP_SPREAD: f32 = 100.0;

pub const REQUIRED_RESOURCES: &[ResourceRef] = &[
    (ResourceKind::Texture, "BarvinoidTx"),
    (ResourceKind::Animation, "BarvinoidMouth"),
    (ResourceKind::Sprite, "spr_FloatingEye"),
    (ResourceKind::Sprite, "spr_Crosshair"),
    (ResourceKind::ParticleSystem, "eyeBlast"),
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ConservatoryPhase {
    Inactive,
    EyeAttack,
    Hopping,
    HoppingToEdge,
    ReleasingEyes,
    FloatingEyes,
    HoppingToCenter,
    Dying,
    Fading,
}

impl PhaseKind for ConservatoryPhase {
    const DYING: Self = ConservatoryPhase::Dying;
    const FADING: Self = ConservatoryPhase::Fading;

    fn name(&self) -> &'static str {
        match self {
            ConservatoryPhase::Inactive => "inactive",
            ConservatoryPhase::EyeAttack => "eye attack",
            ConservatoryPhase::Hopping => "hopping",
            ConservatoryPhase::HoppingToEdge => "hopping to edge",
            ConservatoryPhase::ReleasingEyes => "releasing eyes",
            ConservatoryPhase::FloatingEyes => "floating eyes",
            ConservatoryPhase::HoppingToCenter => "hopping to center",
            ConservatoryPhase::Dying => "dying",
            ConservatoryPhase::Fading => "fading",
        }
    }
}

/// A hop in progress
#[derive(Debug, Clone, Copy, PartialEq)]
struct Hop {
    from: Vec2,
    to: Vec2,
    started_at: f32,
}

/// Result of advancing the hop state machine one frame
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum HopStep {
    InAir,
    Landed,
    Resting,
    /// On the ground at the destination
    Arrived,
}

/// One launcher of the projectile grid
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Launcher {
    pub position: Vec2,
    pub angle: f32,
    /// Fraction of the pulse interval after the master pulse at which this
    /// launcher fires
    pub timing_offset: f32,
    fired_this_pulse: bool,
}

pub struct ConservatoryBoss {
    core: BossCore<ConservatoryPhase>,
    tuning: ConservatoryTuning,
    arena_center: Vec2,
    edge: Vec2,

    started_intro: bool,
    last_tongue_cue: f32,

    // Hopping
    hop: Option<Hop>,
    lift: f32,
    landed_at: f32,
    hops_done: u32,

    // Eye attack
    eye_glow: [Option<f32>; 2],
    last_eye: usize,
    last_eye_attack: f32,
    eye_attack_interval: f32,
    launchers: Vec<Launcher>,
    last_pulse: f32,

    // Floating eyes
    mouth: Indicator,
    released: u32,
    last_release: f32,
    floating_eyes: Pool<FloatingEye>,
    pending_blasts: Vec<Vec2>,
    hit_by_blast_at: Option<f32>,
    started_complaint: bool,
}

impl ConservatoryBoss {
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
        tunings.conservatory.validate()?;

        let tuning = tunings.conservatory;
        let position = Vec2::new(grid_x as f32 * 64.0 + 32.0, grid_y as f32 * 64.0 + 32.0);

        log::debug!("Conservatory boss placed at ({}, {}) for group {}", position.x, position.y, group_id);

        Ok(Self {
            core: BossCore::new(
                position,
                BossHealth::scaled(tuning.health, difficulty),
                ConservatoryPhase::Inactive,
                group_id,
                &tunings.common,
            ),
            tuning,
            arena_center: position,
            edge: position + tuning.edge_offset,
            started_intro: false,
            last_tongue_cue: f32::NEG_INFINITY,
            hop: None,
            lift: 0.0,
            landed_at: 0.0,
            hops_done: 0,
            eye_glow: [None; 2],
            last_eye: 1,
            last_eye_attack: 0.0,
            eye_attack_interval: tuning.eye_attack_start_interval,
            launchers: build_launchers(position, &tuning),
            last_pulse: 0.0,
            mouth: Indicator::new(tuning.mouth_transition_time),
            released: 0,
            last_release: 0.0,
            floating_eyes: Pool::new(),
            pending_blasts: Vec::new(),
            hit_by_blast_at: None,
            started_complaint: false,
        })
    }

    pub fn arena_center(&self) -> Vec2 {
        self.arena_center
    }

    /// Where the floating eyes get released
    pub fn edge(&self) -> Vec2 {
        self.edge
    }

    pub fn launchers(&self) -> &[Launcher] {
        &self.launchers
    }

    pub fn mouth(&self) -> &Indicator {
        &self.mouth
    }

    pub fn floating_eyes(&self) -> &Pool<FloatingEye> {
        &self.floating_eyes
    }

    /// Current wait between two eye shots
    pub fn eye_attack_interval(&self) -> f32 {
        self.eye_attack_interval
    }

    pub fn is_airborne(&self) -> bool {
        self.hop.is_some()
    }

    fn body(&self) -> Rect {
        let half = self.tuning.body_half_size;
        Rect::from_center(self.core.position - Vec2::new(0.0, self.lift), half.x, half.y)
    }

    fn eye_position(&self, eye: usize) -> Vec2 {
        self.core.position + EYE_OFFSETS[eye] - Vec2::new(0.0, self.lift)
    }

    /// Advance the hop toward `dest`, never covering more than the maximum
    /// hop distance in one jump. With `stop_at_dest` unset the boss keeps
    /// hopping in place once it gets there.
    fn step_hop(&mut self, frame: &mut Frame<'_>, dest: Vec2, stop_at_dest: bool) -> HopStep {
        if let Some(hop) = self.hop {
            let t = (frame.since(hop.started_at) / self.tuning.hop_duration).min(1.0);
            self.core.position = hop.from + (hop.to - hop.from) * t;
            self.lift = 4.0 * self.tuning.hop_height * t * (1.0 - t);
            if t < 1.0 {
                return HopStep::InAir;
            }
            self.core.position = hop.to;
            self.lift = 0.0;
            self.hop = None;
            self.landed_at = frame.now;
            frame.play(SoundCue::Thud);
            return HopStep::Landed;
        }

        if frame.since(self.landed_at) < self.tuning.hop_rest {
            return HopStep::Resting;
        }
        if stop_at_dest && self.core.position.distance(dest) < 1.0 {
            return HopStep::Arrived;
        }

        let from = self.core.position;
        self.hop = Some(Hop {
            from,
            to: from.move_toward(dest, self.tuning.hop_max_distance),
            started_at: frame.now,
        });
        frame.play(SoundCue::Hover);
        HopStep::InAir
    }

    fn update_eye_shots(&mut self, frame: &mut Frame<'_>) {
        let next = 1 - self.last_eye;
        match self.eye_glow[next] {
            None if frame.since(self.last_eye_attack) >= self.eye_attack_interval => {
                self.eye_glow[next] = Some(frame.now);
                frame.play(SoundCue::EyeFlash);
            }
            Some(started) if frame.since(started) >= self.tuning.eye_flash_time => {
                let origin = self.eye_position(next);
                frame.projectiles.spawn_projectile(ProjectileSpec {
                    kind: ProjectileKind::EyeBolt,
                    origin,
                    angle: origin.angle_to(frame.player.position()),
                    speed: self.tuning.eye_bolt_speed,
                    damage: self.tuning.eye_bolt_damage,
                    hostile: true,
                    max_distance: None,
                });
                self.eye_glow[next] = None;
                self.last_eye = next;
                self.last_eye_attack = frame.now;
                self.eye_attack_interval = (self.eye_attack_interval
                    * self.tuning.eye_attack_interval_decay)
                    .max(self.tuning.eye_attack_min_interval);
            }
            _ => {}
        }
    }

    fn update_launchers(&mut self, frame: &mut Frame<'_>) {
        let interval = self.tuning.pulse_interval;
        if frame.since(self.last_pulse) >= interval {
            self.last_pulse = frame.now;
            for launcher in &mut self.launchers {
                launcher.fired_this_pulse = false;
            }
        }

        let in_pulse = frame.since(self.last_pulse);
        for launcher in &mut self.launchers {
            if launcher.fired_this_pulse || in_pulse < launcher.timing_offset * interval {
                continue;
            }
            launcher.fired_this_pulse = true;
            frame.projectiles.spawn_projectile(ProjectileSpec {
                kind: ProjectileKind::GridBolt,
                origin: launcher.position,
                angle: launcher.angle,
                speed: self.tuning.grid_bolt_speed,
                damage: self.tuning.grid_bolt_damage,
                hostile: true,
                max_distance: Some(self.tuning.launcher_ring_radius * 2.0),
            });
        }
    }

    fn release_eye(&mut self, frame: &mut Frame<'_>) {
        let player = frame.player.position();
        let anchor = player
            + Vec2::new(
                frame.rng.gen_range(-EYE_DROP_SPREAD..=EYE_DROP_SPREAD),
                frame.rng.gen_range(-EYE_DROP_SPREAD..=EYE_DROP_SPREAD),
            );
        let sway = self.tuning.floating_eye.sway_period.roll(frame.rng);
        self.floating_eyes
            .spawn(FloatingEye::new(anchor, frame.now, sway, self.tuning.floating_eye));
        self.released += 1;
        self.last_release = frame.now;
        frame.spawned(FloatingEye::KIND);
    }

    fn resolve_blasts(&mut self, frame: &mut Frame<'_>) {
        let eye = self.tuning.floating_eye;
        for at in std::mem::take(&mut self.pending_blasts) {
            let blast = Circle::new(at, eye.blast_radius);
            frame.play(SoundCue::EyeBlast);

            if frame.player.collision_circle().overlaps_circle(&blast) {
                frame.knock_player("floating eye blast", eye.blast_player_damage, eye.blast_knockback, at);
            }

            if self.core.is_dead() || !blast.overlaps_rect(&self.body()) {
                continue;
            }
            if self.core.flash.is_active() {
                log::debug!("Blast hit the egg boss while flashing");
                continue;
            }
            if self.hit_by_blast_at.is_none() {
                self.hit_by_blast_at = Some(frame.now);
            }
            deal_damage(self, frame, eye.blast_boss_damage);
        }
    }
}

fn build_launchers(center: Vec2, tuning: &ConservatoryTuning) -> Vec<Launcher> {
    let count = tuning.launcher_count.max(1);
    (0..count)
        .map(|i| {
            let around = TAU * i as f32 / count as f32;
            let position = center + Vec2::from_angle(around) * tuning.launcher_ring_radius;
            Launcher {
                position,
                angle: position.angle_to(center),
                timing_offset: (i % 4) as f32 / 4.0,
                fired_this_pulse: false,
            }
        })
        .collect()
}

fn tick_inactive(boss: &mut ConservatoryBoss, frame: &mut Frame<'_>) {
    if !boss.started_intro {
        if frame.triggers.has_triggered(boss.core.group_id) {
            boss.started_intro = true;
            frame.player.set_frozen(true);
            frame.dialogue.open_dialogue_text_box(SPEAKER, INTRO_TEXT);
        }
    } else if !frame.dialogue.is_text_box_open() {
        frame.player.set_frozen(false);
        frame.scene.play_music(MusicTrack::BossMusic);
        enter_phase(boss, frame, ConservatoryPhase::EyeAttack);
    }
}

fn exit_inactive(boss: &mut ConservatoryBoss, frame: &mut Frame<'_>) {
    boss.started_intro = true;
    frame.player.set_frozen(false);
}

fn enter_eye_attack(boss: &mut ConservatoryBoss, frame: &mut Frame<'_>) {
    boss.eye_glow = [None; 2];
    boss.last_eye_attack = frame.now;
    boss.eye_attack_interval = boss.tuning.eye_attack_start_interval;
    boss.last_pulse = frame.now;
    for launcher in &mut boss.launchers {
        launcher.fired_this_pulse = false;
    }
}

fn tick_eye_attack(boss: &mut ConservatoryBoss, frame: &mut Frame<'_>) {
    if frame.since(boss.core.phase.entered_at()) >= boss.tuning.eye_attack_duration {
        enter_phase(boss, frame, ConservatoryPhase::Hopping);
        return;
    }
    boss.update_eye_shots(frame);
    boss.update_launchers(frame);
}

fn exit_eye_attack(boss: &mut ConservatoryBoss, _frame: &mut Frame<'_>) {
    boss.eye_glow = [None; 2];
}

fn enter_hopping(boss: &mut ConservatoryBoss, frame: &mut Frame<'_>) {
    boss.hops_done = 0;
    boss.landed_at = frame.now - boss.tuning.hop_rest;
}

fn tick_hopping(boss: &mut ConservatoryBoss, frame: &mut Frame<'_>) {
    let target = frame.player.position();
    if boss.step_hop(frame, target, false) == HopStep::Landed {
        boss.hops_done += 1;
        if boss.hops_done >= boss.tuning.hops_per_cycle {
            enter_phase(boss, frame, ConservatoryPhase::HoppingToEdge);
        }
    }
}

fn tick_hopping_to_edge(boss: &mut ConservatoryBoss, frame: &mut Frame<'_>) {
    let edge = boss.edge;
    if boss.step_hop(frame, edge, true) == HopStep::Arrived {
        enter_phase(boss, frame, ConservatoryPhase::ReleasingEyes);
    }
}

fn enter_releasing_eyes(boss: &mut ConservatoryBoss, frame: &mut Frame<'_>) {
    boss.released = 0;
    boss.last_release = frame.now - boss.tuning.eye_release_interval;
    boss.mouth.open(frame.now);
}

fn tick_releasing_eyes(boss: &mut ConservatoryBoss, frame: &mut Frame<'_>) {
    if boss.released < boss.tuning.floating_eye_count {
        if boss.mouth.is_open() && frame.since(boss.last_release) >= boss.tuning.eye_release_interval {
            boss.release_eye(frame);
            if boss.released == boss.tuning.floating_eye_count {
                boss.mouth.close(frame.now);
            }
        }
        return;
    }

    if boss.mouth.is_open() {
        boss.mouth.close(frame.now);
    }
    if boss.mouth.is_closed() {
        enter_phase(boss, frame, ConservatoryPhase::FloatingEyes);
    }
}

fn exit_releasing_eyes(boss: &mut ConservatoryBoss, _frame: &mut Frame<'_>) {
    boss.mouth.shut();
}

fn tick_floating_eyes(boss: &mut ConservatoryBoss, frame: &mut Frame<'_>) {
    if boss.floating_eyes.is_empty() {
        enter_phase(boss, frame, ConservatoryPhase::HoppingToCenter);
        return;
    }
    if frame.since(boss.core.phase.entered_at()) >= boss.tuning.floating_eye_timeout {
        log::debug!("Floating eyes timed out, {} left", boss.floating_eyes.len());
        boss.floating_eyes.for_each_mut(|_, eye| eye.dismiss());
        enter_phase(boss, frame, ConservatoryPhase::HoppingToCenter);
    }
}

fn enter_hopping_to_center(boss: &mut ConservatoryBoss, frame: &mut Frame<'_>) {
    boss.landed_at = frame.now - boss.tuning.hop_rest;
}

fn tick_hopping_to_center(boss: &mut ConservatoryBoss, frame: &mut Frame<'_>) {
    let center = boss.arena_center;
    if boss.step_hop(frame, center, true) == HopStep::Arrived {
        enter_phase(boss, frame, ConservatoryPhase::EyeAttack);
    }
}

impl BossScript for ConservatoryBoss {
    type Phase = ConservatoryPhase;

    fn name(&self) -> &'static str {
        BossKind::Conservatory.name()
    }

    fn core(&self) -> &BossCore<ConservatoryPhase> {
        &self.core
    }

    fn core_mut(&mut self) -> &mut BossCore<ConservatoryPhase> {
        &mut self.core
    }

    fn descriptor(phase: ConservatoryPhase) -> PhaseDescriptor<Self> {
        match phase {
            ConservatoryPhase::Inactive => PhaseDescriptor::new()
                .on_exit(exit_inactive)
                .tick(tick_inactive),
            ConservatoryPhase::EyeAttack => PhaseDescriptor::new()
                .on_enter(enter_eye_attack)
                .on_exit(exit_eye_attack)
                .tick(tick_eye_attack),
            ConservatoryPhase::Hopping => PhaseDescriptor::new()
                .on_enter(enter_hopping)
                .tick(tick_hopping),
            ConservatoryPhase::HoppingToEdge => PhaseDescriptor::new().tick(tick_hopping_to_edge),
            ConservatoryPhase::ReleasingEyes => PhaseDescriptor::new()
                .on_enter(enter_releasing_eyes)
                .on_exit(exit_releasing_eyes)
                .tick(tick_releasing_eyes),
            ConservatoryPhase::FloatingEyes => PhaseDescriptor::new().tick(tick_floating_eyes),
            ConservatoryPhase::HoppingToCenter => PhaseDescriptor::new()
                .on_enter(enter_hopping_to_center)
                .tick(tick_hopping_to_center),
            ConservatoryPhase::Dying => dying_descriptor(),
            ConservatoryPhase::Fading => fading_descriptor(),
        }
    }

    fn update_entities(&mut self, frame: &mut Frame<'_>) {
        let (now, dt) = (frame.now, frame.dt);
        let target = frame.player.position();
        self.mouth.update(now);

        let blasts = &mut self.pending_blasts;
        let removed = self.floating_eyes.update_all(|_, eye| {
            let (life, blast) = eye.update(now, dt, target);
            if let Some(Blast(at)) = blast {
                blasts.push(at);
            }
            life
        });
        frame.removed(FloatingEye::KIND, removed);

        if let Some(hit_at) = self.hit_by_blast_at {
            if !self.started_complaint
                && !self.core.is_dead()
                && frame.since(hit_at) >= self.tuning.complain_delay
            {
                self.started_complaint = true;
                frame.dialogue.open_dialogue_text_box(SPEAKER, COMPLAIN_TEXT);
            }
        }
    }

    fn arbitrate(&mut self, frame: &mut Frame<'_>) {
        self.resolve_blasts(frame);

        let phase = self.core.phase.current();
        if phase == ConservatoryPhase::Inactive || phase.is_terminal() {
            return;
        }

        let body = self.body();
        if frame.player.collision_circle().overlaps_rect(&body) {
            frame.knock_player(
                "egg body",
                self.tuning.contact_damage,
                self.tuning.contact_knockback,
                body.center(),
            );
        }
        if frame.player.attack_hits(PlayerAttack::Tongue, &Shape::Rect(body))
            && frame.since(self.last_tongue_cue) >= TONGUE_CUE_INTERVAL
        {
            self.last_tongue_cue = frame.now;
            frame.play(SoundCue::HitInvulnerable);
        }

        let now = frame.now;
        let player = frame.player.collision_circle();
        let mut touching = 0;
        self.floating_eyes.for_each(|_, eye| {
            if eye.state() != FloatingEyeState::FloatingAway && player.overlaps_circle(&eye.circle(now)) {
                touching += 1;
            }
        });
        for _ in 0..touching {
            frame.hurt_player("floating eye", self.tuning.floating_eye.contact_damage);
        }
    }

    fn on_defeated(&mut self, frame: &mut Frame<'_>) {
        self.hop = None;
        self.lift = 0.0;
        self.eye_glow = [None; 2];
        self.mouth.close(frame.now);
        self.floating_eyes.for_each_mut(|_, eye| eye.dismiss());
        frame.player.set_frozen(false);
        frame.dialogue.open_dialogue_text_box(SPEAKER, DEFEAT_TEXT);
        frame.scene.record_boss_defeated(BossKind::Conservatory);
        frame.scene.fade_out_music();
    }

    fn on_faded(&mut self, frame: &mut Frame<'_>) {
        let kind = BossKind::Conservatory;
        grant_rewards(frame, self.core.position, self.core.group_id, kind.reward(), kind.area());
    }

    fn clear_entities(&mut self) {
        self.floating_eyes.clear();
        self.pending_blasts.clear();
    }

    fn compact(&mut self) {
        self.floating_eyes.compact();
    }

    fn draw(&self, canvas: &mut dyn Canvas, now: f32) {
        let alpha = self.core.body_alpha(now);
        let body = self.body();
        canvas.sprite("BarvinoidTx", body.center(), alpha);
        for (eye, glow) in self.eye_glow.iter().enumerate() {
            if glow.is_some() {
                canvas.circle(&Circle::new(self.eye_position(eye), 8.0), Color::Purple);
            }
        }
        if !self.mouth.is_closed() {
            canvas.sprite("BarvinoidMouth", body.center(), alpha);
        }
        self.floating_eyes.draw_all(canvas, now);

        if self.core.phase.current() != ConservatoryPhase::Inactive {
            canvas.health_bar(self.name(), self.core.health.fraction());
        }
        if canvas.debug() {
            canvas.rect(&body, Color::Red);
            for launcher in &self.launchers {
                canvas.circle(&Circle::new(launcher.position, 6.0), Color::Gray);
            }
        }
    }

    fn skip_target(&self) -> Option<ConservatoryPhase> {
        use ConservatoryPhase::*;
        match self.core.phase.current() {
            Inactive => Some(EyeAttack),
            EyeAttack => Some(Hopping),
            Hopping => Some(HoppingToEdge),
            HoppingToEdge => Some(ReleasingEyes),
            ReleasingEyes => Some(FloatingEyes),
            FloatingEyes => Some(HoppingToCenter),
            HoppingToCenter => Some(EyeAttack),
            Dying => Some(Fading),
            Fading => None,
        }
    }
}
