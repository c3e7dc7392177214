//! Fire-and-forget cue identifiers
//!
//! Sounds, music, areas and loot handed to the scene collaborators.

use serde::{Deserialize, Serialize};

use crate::geometry::Vec2;

/// Sound effect identifiers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SoundCue {
    // === Boss reactions ===
    /// Boss registers a hit (three variations)
    BossHit(u8),
    /// Player attack bounced off something invulnerable
    HitInvulnerable,

    // === Sub-entities ===
    /// Tentacles burst out of the ground
    TentaclesExtend,
    /// Crusher reached full size
    CrusherSlam,
    /// A wave of fireballs passes by
    FirePassBy,
    /// Floating eye blast detonates
    EyeBlast,
    /// Boss eye flashes before firing
    EyeFlash,
    /// Homing orb launched
    OrbLaunch,
    /// Fire nova burst
    FireNova,

    // === Movement ===
    /// Egg boss lands after a hop
    Thud,
    /// Egg boss is airborne
    Hover,

    // === Loot ===
    NewAbility,
    HealthPickup,
}

impl SoundCue {
    /// Resource name of the sound
    pub fn asset_name(&self) -> &'static str {
        match self {
            SoundCue::BossHit(0) => "snd_BossHit1",
            SoundCue::BossHit(1) => "snd_BossHit2",
            SoundCue::BossHit(_) => "snd_BossHit3",
            SoundCue::HitInvulnerable => "snd_HitInvulnerable",
            SoundCue::TentaclesExtend => "snd_TentaclesExtend",
            SoundCue::CrusherSlam => "snd_Crusher",
            SoundCue::FirePassBy => "snd_FirePassBy",
            SoundCue::EyeBlast => "snd_EyeBlast",
            SoundCue::EyeFlash => "snd_EyeFlash",
            SoundCue::OrbLaunch => "snd_OrbLaunch",
            SoundCue::FireNova => "snd_FireNova",
            SoundCue::Thud => "snd_Thud",
            SoundCue::Hover => "snd_Hover",
            SoundCue::NewAbility => "snd_NewAbility",
            SoundCue::HealthPickup => "snd_Health",
        }
    }

    /// Default playback volume (0.0 - 1.0)
    pub fn default_volume(&self) -> f32 {
        match self {
            SoundCue::HitInvulnerable => 0.4,
            SoundCue::CrusherSlam => 0.25,
            SoundCue::Hover => 0.5,
            _ => 1.0,
        }
    }
}

/// Music tracks the bosses start themselves
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MusicTrack {
    BossMusic,
}

/// Areas whose music resumes once a boss is gone
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Area {
    ForestOfFungoria,
    Conservatory,
    FieryCaverns,
}

impl Area {
    pub fn name(&self) -> &'static str {
        match self {
            Area::ForestOfFungoria => "Forest of Fungoria",
            Area::Conservatory => "Conservatory",
            Area::FieryCaverns => "Fiery Caverns",
        }
    }
}

/// Abilities granted by boss loot
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Ability {
    Shrink,
    Hover,
    FireBreath,
    IceBreath,
    LightningOrb,
}

/// What a piece of loot gives
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum LootKind {
    Health,
    NewAbility(Ability),
}

impl LootKind {
    /// Pickup radius in pixels
    pub fn pickup_radius(&self) -> f32 {
        match self {
            LootKind::Health => 15.0,
            LootKind::NewAbility(_) => 33.0,
        }
    }
}

/// A dropped piece of loot
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LootDrop {
    pub kind: LootKind,
    pub position: Vec2,
    /// Enemy-block group released when this loot is collected
    pub group_id: Option<i32>,
}

impl LootDrop {
    pub fn new(kind: LootKind, position: Vec2) -> Self {
        Self { kind, position, group_id: None }
    }

    pub fn with_group(mut self, group_id: i32) -> Self {
        self.group_id = Some(group_id);
        self
    }
}
