//! Boss tuning tables
//!
//! Every number a boss fight runs on lives here, loaded from RON with the
//! shipped values as the fallback.

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::error::BossError;
use crate::geometry::Vec2;

/// Inclusive range a random value is rolled from
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Span {
    pub min: f32,
    pub max: f32,
}

impl Span {
    pub const fn new(min: f32, max: f32) -> Self {
        Self { min, max }
    }

    /// Roll a value in the range
    pub fn roll(&self, rng: &mut impl Rng) -> f32 {
        if self.max > self.min {
            rng.gen_range(self.min..=self.max)
        } else {
            self.min
        }
    }

    pub fn contains(&self, value: f32) -> bool {
        value >= self.min && value <= self.max
    }
}

/// Settings shared by every boss
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CommonTuning {
    /// Invulnerability flash after a registered hit, in seconds
    pub flash_duration: f32,
    /// Alpha the death fade starts from
    pub fade_start_alpha: f32,
    /// Alpha lost per second while fading
    pub fade_rate: f32,
}

impl Default for CommonTuning {
    fn default() -> Self {
        Self {
            flash_duration: 0.7,
            fade_start_alpha: 255.0,
            fade_rate: 155.0,
        }
    }
}

/// Tentacle dimensions and timings
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TentacleTuning {
    pub width: f32,
    pub height: f32,
    /// Time spent hidden before emerging
    pub hidden_delay: f32,
    /// Visibility gained per second while entering
    pub enter_rate: f32,
    /// Visibility lost per second while exiting
    pub exit_rate: f32,
    /// Upper bound of the per-tentacle random time offset
    pub max_time_offset: f32,
    pub contact_damage: f32,
    pub contact_knockback: f32,
    /// Vertical inset of the hitbox from the visible sprite
    pub hitbox_inset: f32,
}

impl Default for TentacleTuning {
    fn default() -> Self {
        Self {
            width: 56.0,
            height: 175.0,
            hidden_delay: 1.0,
            enter_rate: 3.5,
            exit_rate: 1.5,
            max_time_offset: 3.0,
            contact_damage: 0.25,
            contact_knockback: 160.0,
            hitbox_inset: 5.0,
        }
    }
}

impl TentacleTuning {
    /// Time a fully extended tentacle needs to retract
    pub fn exit_time(&self) -> f32 {
        1.0 / self.exit_rate
    }
}

/// Falling fireball waves
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FireBallTuning {
    pub radius: f32,
    pub lifetime: f32,
    pub damage: f32,
    /// Time between waves
    pub wave_interval: f32,
    /// Horizontal gap between fireballs of one wave
    pub gap: Span,
    pub speed: Span,
    /// Random horizontal shift of a whole wave
    pub offset: Span,
    /// Width covered by a wave
    pub wave_span: f32,
    /// Waves start this far left of the arena center
    pub wave_left: f32,
    /// Waves start this far above the player
    pub spawn_height: f32,
}

impl Default for FireBallTuning {
    fn default() -> Self {
        Self {
            radius: 30.0,
            lifetime: 3.0,
            damage: 1.0,
            wave_interval: 1.0,
            gap: Span::new(180.0, 270.0),
            speed: Span::new(620.0, 800.0),
            offset: Span::new(0.0, 100.0),
            wave_span: 1500.0,
            wave_left: 700.0,
            spawn_height: 500.0,
        }
    }
}

/// Ice crushers closing in from both arena walls
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CrusherTuning {
    pub max_size: f32,
    /// Hold time at full size
    pub remain_time: f32,
    pub damage: f32,
    pub half_height: f32,
    pub speed: Span,
    /// Base delay between crusher volleys
    pub base_delay: f32,
    /// Minimum vertical room per crusher in a volley
    pub min_spacing: f32,
    /// Distance above/below the player a volley covers
    pub band: Span,
    /// Half height of the arena the band is clamped to
    pub arena_half_height: f32,
}

impl Default for CrusherTuning {
    fn default() -> Self {
        Self {
            max_size: 7.0 * 64.0,
            remain_time: 1.0,
            damage: 0.75,
            half_height: 30.0,
            speed: Span::new(650.0, 750.0),
            base_delay: 1.25,
            min_spacing: 150.0,
            band: Span::new(100.0, 300.0),
            arena_half_height: 6.0 * 64.0,
        }
    }
}

/// The tentacle boss
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EldritchTuning {
    pub health: f32,
    pub body_radius: f32,
    pub contact_damage: f32,
    pub contact_knockback: f32,
    /// Eye position relative to the body
    pub eye_offset: Vec2,
    pub eye_half_size: Vec2,
    /// Time for the eye to open or close
    pub eye_transition_time: f32,
    pub tentacle_spawn_interval: f32,
    pub tentacle_duration: f32,
    /// Random distance of a tentacle from its anchor
    pub tentacle_jitter: Span,
    /// Marked tentacle hits that trigger an eye attack
    pub marked_hits_required: u32,
    /// Health regenerated per second in the tentacle phase
    pub heal_rate: f32,
    /// Tint alpha gained per second during the wind-up
    pub tint_ramp_rate: f32,
    pub tint_max_alpha: f32,
    /// Length of the attack window, counted from phase entry
    pub attack_duration: f32,
    /// Extra time after the attack for the player to hit the eye
    pub window_to_attack: f32,
    /// Fire eye: ice breath damage = player damage * scale * dt
    pub fire_eye_damage_scale: f32,
    /// Ice eye: fire breath damage = breath damage * scale * dt
    pub ice_eye_damage_scale: f32,
    pub slime_speed: f32,
    pub slime_damage: f32,
    /// Maximum aim error of a slime ball, in radians
    pub slime_spread: f32,
    pub tentacle: TentacleTuning,
    pub fireball: FireBallTuning,
    pub crusher: CrusherTuning,
}

impl Default for EldritchTuning {
    fn default() -> Self {
        Self {
            health: 17.0,
            body_radius: 95.0,
            contact_damage: 1.0,
            contact_knockback: 225.0,
            eye_offset: Vec2::new(0.0, 50.0),
            eye_half_size: Vec2::new(44.0, 20.0),
            eye_transition_time: 0.5,
            tentacle_spawn_interval: 4.5,
            tentacle_duration: 2.75,
            tentacle_jitter: Span::new(25.0, 100.0),
            marked_hits_required: 5,
            heal_rate: 0.05,
            tint_ramp_rate: 60.0,
            tint_max_alpha: 60.0,
            attack_duration: 12.5,
            window_to_attack: 4.6,
            fire_eye_damage_scale: 3.25,
            ice_eye_damage_scale: 0.32,
            slime_speed: 300.0,
            slime_damage: 0.5,
            slime_spread: std::f32::consts::PI / 8.0,
            tentacle: TentacleTuning::default(),
            fireball: FireBallTuning::default(),
            crusher: CrusherTuning::default(),
        }
    }
}

/// Floating eyes released by the egg boss
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FloatingEyeTuning {
    /// Height the eye is released from
    pub start_elevation: f32,
    pub descend_speed: f32,
    pub rise_speed: f32,
    /// Height at which a rising eye is gone
    pub exit_elevation: f32,
    /// Aiming time before the shot
    pub countdown: f32,
    pub crosshair_speed: f32,
    pub sway_amplitude: f32,
    pub sway_period: Span,
    pub radius: f32,
    pub contact_damage: f32,
    pub blast_radius: f32,
    pub blast_player_damage: f32,
    pub blast_boss_damage: f32,
    pub blast_knockback: f32,
}

impl Default for FloatingEyeTuning {
    fn default() -> Self {
        Self {
            start_elevation: 300.0,
            descend_speed: 150.0,
            rise_speed: 200.0,
            exit_elevation: 400.0,
            countdown: 2.0,
            crosshair_speed: 180.0,
            sway_amplitude: 12.0,
            sway_period: Span::new(1.2, 2.0),
            radius: 20.0,
            contact_damage: 0.25,
            blast_radius: 48.0,
            blast_player_damage: 0.5,
            blast_boss_damage: 1.0,
            blast_knockback: 200.0,
        }
    }
}

/// The hopping egg boss
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ConservatoryTuning {
    pub health: f32,
    pub body_half_size: Vec2,
    pub contact_damage: f32,
    pub contact_knockback: f32,
    pub hop_duration: f32,
    /// Pause on the ground between hops
    pub hop_rest: f32,
    pub hop_height: f32,
    /// Longest distance covered by a single hop toward the player
    pub hop_max_distance: f32,
    pub hops_per_cycle: u32,
    /// Where the eyes get released, relative to the arena center
    pub edge_offset: Vec2,
    pub eye_attack_duration: f32,
    pub eye_attack_start_interval: f32,
    pub eye_attack_interval_decay: f32,
    pub eye_attack_min_interval: f32,
    /// How long an eye glows before it fires
    pub eye_flash_time: f32,
    pub eye_bolt_speed: f32,
    pub eye_bolt_damage: f32,
    pub pulse_interval: f32,
    pub launcher_count: u32,
    /// Distance of the launcher ring from the arena center
    pub launcher_ring_radius: f32,
    pub grid_bolt_speed: f32,
    pub grid_bolt_damage: f32,
    pub mouth_transition_time: f32,
    pub eye_release_interval: f32,
    pub floating_eye_count: u32,
    pub floating_eye_timeout: f32,
    /// Delay before complaining about the first blast
    pub complain_delay: f32,
    pub floating_eye: FloatingEyeTuning,
}

impl Default for ConservatoryTuning {
    fn default() -> Self {
        Self {
            health: 6.0,
            body_half_size: Vec2::new(60.0, 70.0),
            contact_damage: 0.5,
            contact_knockback: 200.0,
            hop_duration: 0.9,
            hop_rest: 0.4,
            hop_height: 80.0,
            hop_max_distance: 250.0,
            hops_per_cycle: 3,
            edge_offset: Vec2::new(0.0, -250.0),
            eye_attack_duration: 10.0,
            eye_attack_start_interval: 1.5,
            eye_attack_interval_decay: 0.9,
            eye_attack_min_interval: 0.6,
            eye_flash_time: 0.4,
            eye_bolt_speed: 350.0,
            eye_bolt_damage: 0.5,
            pulse_interval: 2.0,
            launcher_count: 16,
            launcher_ring_radius: 420.0,
            grid_bolt_speed: 250.0,
            grid_bolt_damage: 0.5,
            mouth_transition_time: 0.5,
            eye_release_interval: 0.6,
            floating_eye_count: 4,
            floating_eye_timeout: 15.0,
            complain_delay: 0.75,
            floating_eye: FloatingEyeTuning::default(),
        }
    }
}

/// Homing fire orbs
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OrbTuning {
    pub radius: f32,
    pub speed: f32,
    /// Maximum heading change per second, in radians
    pub turn_rate: f32,
    pub lifetime: f32,
    pub damage: f32,
}

impl Default for OrbTuning {
    fn default() -> Self {
        Self {
            radius: 12.0,
            speed: 160.0,
            turn_rate: 2.0,
            lifetime: 6.0,
            damage: 0.5,
        }
    }
}

/// The fire elemental
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FireTuning {
    pub health: f32,
    pub body_radius: f32,
    pub contact_damage: f32,
    pub contact_knockback: f32,
    /// Distance of the outer locations from the home location
    pub location_spread: f32,
    /// Travel time between locations
    pub path_time: f32,
    pub attack_duration: f32,
    pub orb_interval: f32,
    pub nova_range: f32,
    pub nova_cooldown: f32,
    pub nova_damage: f32,
    pub nova_knockback: f32,
    /// Minimum time between two tongue hits
    pub tongue_throttle: f32,
    pub orb: OrbTuning,
}

impl Default for FireTuning {
    fn default() -> Self {
        Self {
            health: 10.0,
            body_radius: 40.0,
            contact_damage: 0.5,
            contact_knockback: 180.0,
            location_spread: 256.0,
            path_time: 1.5,
            attack_duration: 6.0,
            orb_interval: 1.0,
            nova_range: 150.0,
            nova_cooldown: 3.0,
            nova_damage: 0.5,
            nova_knockback: 250.0,
            tongue_throttle: 0.5,
            orb: OrbTuning::default(),
        }
    }
}

/// All boss tuning tables
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct BossTunings {
    pub common: CommonTuning,
    pub eldritch: EldritchTuning,
    pub conservatory: ConservatoryTuning,
    pub fire: FireTuning,
}

/// Collects validation failures for one boss
struct Checker {
    boss: &'static str,
}

impl Checker {
    fn positive(&self, name: &str, value: f32) -> Result<(), BossError> {
        if value.is_finite() && value > 0.0 {
            Ok(())
        } else {
            Err(self.fail(format!("{} must be positive, got {}", name, value)))
        }
    }

    fn non_negative(&self, name: &str, value: f32) -> Result<(), BossError> {
        if value.is_finite() && value >= 0.0 {
            Ok(())
        } else {
            Err(self.fail(format!("{} must not be negative, got {}", name, value)))
        }
    }

    fn span(&self, name: &str, span: Span) -> Result<(), BossError> {
        if span.min.is_finite() && span.max.is_finite() && span.min <= span.max {
            Ok(())
        } else {
            Err(self.fail(format!("{} range {}..{} is out of order", name, span.min, span.max)))
        }
    }

    fn fail(&self, reason: String) -> BossError {
        BossError::InvalidTuning { boss: self.boss, reason }
    }
}

impl CommonTuning {
    pub fn validate(&self) -> Result<(), BossError> {
        let c = Checker { boss: "common" };
        c.positive("flash_duration", self.flash_duration)?;
        c.positive("fade_start_alpha", self.fade_start_alpha)?;
        c.positive("fade_rate", self.fade_rate)
    }
}

impl EldritchTuning {
    pub fn validate(&self) -> Result<(), BossError> {
        let c = Checker { boss: "eldritch" };
        c.positive("health", self.health)?;
        c.positive("eye_transition_time", self.eye_transition_time)?;
        c.positive("tentacle_spawn_interval", self.tentacle_spawn_interval)?;
        c.positive("tentacle_duration", self.tentacle_duration)?;
        c.span("tentacle_jitter", self.tentacle_jitter)?;
        c.non_negative("heal_rate", self.heal_rate)?;
        c.positive("tint_ramp_rate", self.tint_ramp_rate)?;
        c.non_negative("tint_max_alpha", self.tint_max_alpha)?;
        c.positive("attack_duration", self.attack_duration)?;
        c.non_negative("window_to_attack", self.window_to_attack)?;
        if self.marked_hits_required == 0 {
            return Err(c.fail("marked_hits_required must be at least 1".to_string()));
        }
        c.positive("tentacle.enter_rate", self.tentacle.enter_rate)?;
        c.positive("tentacle.exit_rate", self.tentacle.exit_rate)?;
        c.non_negative("tentacle.max_time_offset", self.tentacle.max_time_offset)?;
        c.positive("fireball.lifetime", self.fireball.lifetime)?;
        c.positive("fireball.wave_interval", self.fireball.wave_interval)?;
        c.span("fireball.gap", self.fireball.gap)?;
        c.positive("fireball.gap.min", self.fireball.gap.min)?;
        c.span("fireball.speed", self.fireball.speed)?;
        c.span("fireball.offset", self.fireball.offset)?;
        c.positive("crusher.max_size", self.crusher.max_size)?;
        c.non_negative("crusher.remain_time", self.crusher.remain_time)?;
        c.span("crusher.speed", self.crusher.speed)?;
        c.positive("crusher.speed.min", self.crusher.speed.min)?;
        c.span("crusher.band", self.crusher.band)?;
        c.positive("crusher.min_spacing", self.crusher.min_spacing)
    }
}

impl ConservatoryTuning {
    pub fn validate(&self) -> Result<(), BossError> {
        let c = Checker { boss: "conservatory" };
        c.positive("health", self.health)?;
        c.positive("hop_duration", self.hop_duration)?;
        c.non_negative("hop_rest", self.hop_rest)?;
        c.positive("eye_attack_duration", self.eye_attack_duration)?;
        c.positive("eye_attack_start_interval", self.eye_attack_start_interval)?;
        c.positive("eye_attack_min_interval", self.eye_attack_min_interval)?;
        c.positive("pulse_interval", self.pulse_interval)?;
        c.positive("mouth_transition_time", self.mouth_transition_time)?;
        c.positive("eye_release_interval", self.eye_release_interval)?;
        c.positive("floating_eye_timeout", self.floating_eye_timeout)?;
        c.positive("floating_eye.descend_speed", self.floating_eye.descend_speed)?;
        c.positive("floating_eye.rise_speed", self.floating_eye.rise_speed)?;
        c.positive("floating_eye.countdown", self.floating_eye.countdown)?;
        c.span("floating_eye.sway_period", self.floating_eye.sway_period)?;
        c.positive("floating_eye.sway_period.min", self.floating_eye.sway_period.min)
    }
}

impl FireTuning {
    pub fn validate(&self) -> Result<(), BossError> {
        let c = Checker { boss: "fire" };
        c.positive("health", self.health)?;
        c.positive("path_time", self.path_time)?;
        c.positive("attack_duration", self.attack_duration)?;
        c.positive("orb_interval", self.orb_interval)?;
        c.non_negative("nova_cooldown", self.nova_cooldown)?;
        c.non_negative("tongue_throttle", self.tongue_throttle)?;
        c.positive("orb.lifetime", self.orb.lifetime)?;
        c.non_negative("orb.speed", self.orb.speed)
    }
}

impl BossTunings {
    /// Validate every table
    pub fn validate(&self) -> Result<(), BossError> {
        self.common.validate()?;
        self.eldritch.validate()?;
        self.conservatory.validate()?;
        self.fire.validate()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn test_defaults_are_valid() {
        assert!(BossTunings::default().validate().is_ok());
    }

    #[test]
    fn test_negative_duration_is_rejected() {
        let mut tunings = BossTunings::default();
        tunings.eldritch.attack_duration = -1.0;
        let err = tunings.validate().unwrap_err();
        assert!(err.to_string().contains("attack_duration"));
    }

    #[test]
    fn test_span_roll_stays_in_range() {
        let mut rng = StdRng::seed_from_u64(3);
        let span = Span::new(180.0, 270.0);
        for _ in 0..100 {
            assert!(span.contains(span.roll(&mut rng)));
        }
        assert_eq!(Span::new(5.0, 5.0).roll(&mut rng), 5.0);
    }

    #[test]
    fn test_exit_time() {
        let t = TentacleTuning::default();
        assert!((t.exit_time() - 1.0 / 1.5).abs() < 1e-6);
    }
}
