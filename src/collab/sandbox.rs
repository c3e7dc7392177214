//! In-memory collaborators
//!
//! Simple implementations of every collaborator trait. The demo binary runs
//! encounters against them and the tests use them as fakes: every call is
//! recorded so a test can assert on what the boss asked for.

use std::collections::HashSet;

use crate::bosses::BossKind;
use crate::collab::cues::{Area, LootDrop, MusicTrack, SoundCue};
use crate::collab::player::{PlayerActor, PlayerAttack};
use crate::collab::services::{
    Dialogue, Host, ProjectileKind, ProjectileSpec, Projectiles, Scene, Services, TriggerGroups,
};
use crate::geometry::{Circle, Rect, Shape, Vec2};
use crate::loot::LootManager;
use crate::render::Color;

/// Knockback distance per unit of force
const KNOCKBACK_SCALE: f32 = 0.2;

/// One damage event received by the sandbox player
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PlayerHit {
    pub amount: f32,
    /// Force and origin, when the hit knocked the player back
    pub knockback: Option<(f32, Vec2)>,
}

/// Player stand-in with scriptable attacks
#[derive(Debug, Clone)]
pub struct SandboxPlayer {
    pub position: Vec2,
    pub radius: f32,
    pub health: f32,
    pub max_health: f32,
    pub frozen: bool,
    /// Attacks currently active and their hit volumes
    pub attacks: Vec<(PlayerAttack, Shape)>,
    pub tongue_damage: f32,
    pub breath_damage: f32,
    /// Invulnerability after a hit, in seconds (0 disables it)
    pub grace_period: f32,
    grace_remaining: f32,
    /// Every damage call received, including ones absorbed by grace
    pub hits: Vec<PlayerHit>,
}

impl SandboxPlayer {
    pub fn new(position: Vec2) -> Self {
        Self {
            position,
            radius: 16.0,
            health: 5.0,
            max_health: 5.0,
            frozen: false,
            attacks: Vec::new(),
            tongue_damage: 1.0,
            breath_damage: 1.0,
            grace_period: 0.0,
            grace_remaining: 0.0,
            hits: Vec::new(),
        }
    }

    pub fn with_grace_period(mut self, seconds: f32) -> Self {
        self.grace_period = seconds.max(0.0);
        self
    }

    /// Activate an attack with the given hit volume
    pub fn set_attack(&mut self, attack: PlayerAttack, shape: impl Into<Shape>) {
        self.attacks.retain(|(a, _)| *a != attack);
        self.attacks.push((attack, shape.into()));
    }

    pub fn clear_attacks(&mut self) {
        self.attacks.clear();
    }

    /// Count down the post-hit grace period
    pub fn tick(&mut self, dt: f32) {
        self.grace_remaining = (self.grace_remaining - dt).max(0.0);
    }

    /// Total damage received
    pub fn damage_taken(&self) -> f32 {
        self.hits.iter().map(|h| h.amount).sum()
    }

    fn take(&mut self, amount: f32) -> bool {
        if self.grace_remaining > 0.0 {
            return false;
        }
        self.health = (self.health - amount).max(0.0);
        self.grace_remaining = self.grace_period;
        true
    }
}

impl PlayerActor for SandboxPlayer {
    fn position(&self) -> Vec2 {
        self.position
    }

    fn collision_circle(&self) -> Circle {
        Circle::new(self.position, self.radius)
    }

    fn deal_damage(&mut self, amount: f32, _makes_flash: bool) {
        self.hits.push(PlayerHit { amount, knockback: None });
        self.take(amount);
    }

    fn deal_damage_and_knockback(
        &mut self,
        amount: f32,
        _makes_flash: bool,
        _always_knockback: bool,
        force: f32,
        origin: Vec2,
    ) {
        self.hits.push(PlayerHit { amount, knockback: Some((force, origin)) });
        if self.take(amount) {
            let away = (self.position - origin).normalized();
            self.position += away * (force * KNOCKBACK_SCALE);
        }
    }

    fn health(&self) -> f32 {
        self.health
    }

    fn max_health(&self) -> f32 {
        self.max_health
    }

    fn set_health(&mut self, health: f32) {
        self.health = health.clamp(0.0, self.max_health);
    }

    fn attack_hits(&self, attack: PlayerAttack, shape: &Shape) -> bool {
        self.attacks
            .iter()
            .any(|(a, volume)| *a == attack && volume.overlaps(shape))
    }

    fn attack_damage(&self, attack: PlayerAttack) -> f32 {
        match attack {
            PlayerAttack::Tongue => self.tongue_damage,
            PlayerAttack::FireBreath | PlayerAttack::IceBreath => self.breath_damage,
        }
    }

    fn set_frozen(&mut self, frozen: bool) {
        self.frozen = frozen;
    }
}

/// Dialogue window that stays open until told otherwise
#[derive(Debug, Clone, Default)]
pub struct SandboxDialogue {
    pub open: bool,
    /// Every (speaker, text) opened, in order
    pub opened: Vec<(i32, u32)>,
}

impl SandboxDialogue {
    /// Close the current text box
    pub fn close(&mut self) {
        self.open = false;
    }

    pub fn was_opened(&self, text_id: u32) -> bool {
        self.opened.iter().any(|(_, t)| *t == text_id)
    }
}

impl Dialogue for SandboxDialogue {
    fn open_dialogue_text_box(&mut self, speaker_id: i32, text_id: u32) {
        self.open = true;
        self.opened.push((speaker_id, text_id));
    }

    fn is_text_box_open(&self) -> bool {
        self.open
    }
}

/// Trigger groups keyed by id
#[derive(Debug, Clone, Default)]
pub struct SandboxTriggers {
    pub triggered: HashSet<i32>,
    /// Groups notified of death, in order
    pub deaths: Vec<i32>,
}

impl SandboxTriggers {
    pub fn trigger(&mut self, group_id: i32) {
        self.triggered.insert(group_id);
    }
}

impl TriggerGroups for SandboxTriggers {
    fn has_triggered(&self, group_id: i32) -> bool {
        self.triggered.contains(&group_id)
    }

    fn notify_of_death(&mut self, group_id: i32) {
        self.deaths.push(group_id);
    }
}

/// A recorded scene call
#[derive(Debug, Clone, PartialEq)]
pub enum SceneCall {
    AddLoot(LootDrop),
    ScreenTint(Color, f32),
    ClearTint,
    Sound(SoundCue),
    Music(MusicTrack),
    FadeOutMusic,
    AreaMusic(Area),
    BossDefeated(BossKind),
}

/// Scene that records every effect and keeps dropped loot
#[derive(Debug, Clone, Default)]
pub struct SandboxScene {
    pub calls: Vec<SceneCall>,
    /// Current screen tint
    pub tint: Option<(Color, f32)>,
    pub loot: LootManager,
}

impl SandboxScene {
    pub fn new() -> Self {
        Self {
            calls: Vec::new(),
            tint: None,
            loot: LootManager::new(),
        }
    }

    /// How many times loot was dropped
    pub fn loot_drops(&self) -> usize {
        self.calls.iter().filter(|c| matches!(c, SceneCall::AddLoot(_))).count()
    }

    pub fn count_sound(&self, cue: SoundCue) -> usize {
        self.calls.iter().filter(|c| **c == SceneCall::Sound(cue)).count()
    }

    pub fn count(&self, call: &SceneCall) -> usize {
        self.calls.iter().filter(|c| *c == call).count()
    }
}

impl Scene for SandboxScene {
    fn add_loot(&mut self, drop: LootDrop) {
        self.calls.push(SceneCall::AddLoot(drop));
        self.loot.add(drop);
    }

    fn set_screen_tint(&mut self, color: Color, alpha: f32) {
        self.calls.push(SceneCall::ScreenTint(color, alpha));
        self.tint = Some((color, alpha));
    }

    fn clear_screen_tint(&mut self) {
        self.calls.push(SceneCall::ClearTint);
        self.tint = None;
    }

    fn play_sound(&mut self, cue: SoundCue) {
        self.calls.push(SceneCall::Sound(cue));
    }

    fn play_music(&mut self, track: MusicTrack) {
        self.calls.push(SceneCall::Music(track));
    }

    fn fade_out_music(&mut self) {
        self.calls.push(SceneCall::FadeOutMusic);
    }

    fn play_area_music(&mut self, area: Area) {
        self.calls.push(SceneCall::AreaMusic(area));
    }

    fn record_boss_defeated(&mut self, boss: BossKind) {
        self.calls.push(SceneCall::BossDefeated(boss));
    }
}

/// Projectile layer that records spawns and holds player-owned orbs
#[derive(Debug, Clone, Default)]
pub struct SandboxProjectiles {
    pub spawned: Vec<ProjectileSpec>,
    /// Live projectiles that bosses can destroy, e.g. the player's orbs
    pub live: Vec<(ProjectileKind, Vec2)>,
}

impl SandboxProjectiles {
    pub fn add_live(&mut self, kind: ProjectileKind, position: Vec2) {
        self.live.push((kind, position));
    }

    pub fn count_spawned(&self, kind: ProjectileKind) -> usize {
        self.spawned.iter().filter(|s| s.kind == kind).count()
    }
}

impl Projectiles for SandboxProjectiles {
    fn spawn_projectile(&mut self, spec: ProjectileSpec) {
        self.spawned.push(spec);
    }

    fn kill_projectiles_in_box(&mut self, rect: &Rect, kind: ProjectileKind) -> usize {
        let before = self.live.len();
        self.live.retain(|(k, p)| !(*k == kind && rect.contains(*p)));
        before - self.live.len()
    }
}

/// Bundle of sandbox collaborators
#[derive(Debug, Clone)]
pub struct SandboxHost {
    pub player: SandboxPlayer,
    pub dialogue: SandboxDialogue,
    pub triggers: SandboxTriggers,
    pub scene: SandboxScene,
    pub projectiles: SandboxProjectiles,
}

impl SandboxHost {
    pub fn new(player_position: Vec2) -> Self {
        Self {
            player: SandboxPlayer::new(player_position),
            dialogue: SandboxDialogue::default(),
            triggers: SandboxTriggers::default(),
            scene: SandboxScene::new(),
            projectiles: SandboxProjectiles::default(),
        }
    }

    /// Collect loot the player is standing on
    pub fn collect_loot(&mut self) -> Vec<crate::loot::Pickup> {
        self.scene.loot.update(&mut self.player, &mut self.triggers)
    }
}

impl Host for SandboxHost {
    fn services(&mut self) -> Services<'_> {
        Services {
            player: &mut self.player,
            dialogue: &mut self.dialogue,
            triggers: &mut self.triggers,
            scene: &mut self.scene,
            projectiles: &mut self.projectiles,
        }
    }
}
