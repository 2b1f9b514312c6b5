//! Game settings and tuning
//!
//! Every gameplay constant lives here so hosts can override them from JSON.
//! Missing fields fall back to the defaults below.

use glam::Vec2;
use serde::{Deserialize, Deserializer, Serialize};

use crate::error::SimError;

/// What a pool does when asked for an entity it doesn't have
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum PoolPolicy {
    /// Refuse the spawn and report `SimError::PoolExhausted`
    #[default]
    Reject,
    /// Allocate a fresh entity, raising the pool's capacity
    Grow,
}

/// How the runner spaces simulation steps
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum Pacing {
    /// One step per host frame, skipped when the host calls back too soon
    #[default]
    Gate,
    /// Fixed-rate accumulator, possibly several steps per host frame
    Fixed,
}

/// Source sprite dimensions plus the scale factors applied to them
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SpriteSpec {
    pub width: f32,
    pub height: f32,
    /// Visual scale applied to the source frame
    pub scale: f32,
    /// Collidable fraction of the scaled sprite
    pub hitbox_scale: f32,
}

impl SpriteSpec {
    pub const fn new(width: f32, height: f32, scale: f32, hitbox_scale: f32) -> Self {
        Self {
            width,
            height,
            scale,
            hitbox_scale,
        }
    }

    /// On-screen size at the default scale
    pub fn size(&self) -> Vec2 {
        self.size_at(self.scale)
    }

    /// On-screen size at an arbitrary scale
    pub fn size_at(&self, scale: f32) -> Vec2 {
        Vec2::new(self.width * scale, self.height * scale)
    }

    fn validate(&self, field: &'static str) -> Result<(), SimError> {
        if !(self.width > 0.0 && self.height > 0.0 && self.scale > 0.0) {
            return Err(invalid(field, "sprite dimensions and scale must be positive"));
        }
        if !(self.hitbox_scale > 0.0 && self.hitbox_scale <= 1.0) {
            return Err(invalid(field, "hitbox_scale must be in (0, 1]"));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FieldSettings {
    pub width: f32,
    pub height: f32,
}

impl Default for FieldSettings {
    fn default() -> Self {
        Self {
            width: 800.0,
            height: 800.0,
        }
    }
}

impl FieldSettings {
    pub fn size(&self) -> Vec2 {
        Vec2::new(self.width, self.height)
    }

    pub fn center(&self) -> Vec2 {
        self.size() * 0.5
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PlayerSettings {
    /// Thrust added per frame along the facing angle
    pub acceleration: f32,
    /// Facing at spawn (degrees, 270 = north)
    pub start_angle: f32,
    /// Angular velocity change per turn-input frame
    pub torque: f32,
    pub max_velocity: f32,
    pub max_rotation: f32,
    pub sprite: SpriteSpec,
}

impl Default for PlayerSettings {
    fn default() -> Self {
        Self {
            acceleration: 0.02,
            start_angle: 270.0,
            torque: 0.5,
            max_velocity: 3.0,
            max_rotation: 3.0,
            sprite: SpriteSpec::new(100.0, 100.0, 0.8, 0.7),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AsteroidSettings {
    /// Live asteroids the field is kept topped up to
    pub population: usize,
    pub min_scale: f32,
    pub max_scale: f32,
    /// Distance beyond the screen edge where new asteroids appear
    pub spawn_buffer: f32,
    /// Spin is drawn from [-max_spin, max_spin] degrees per frame
    pub max_spin: f32,
    /// Inward speed range along the spawn side's normal
    pub min_speed: f32,
    pub max_speed: f32,
    /// Sideways drift is drawn from [-drift, drift]
    pub drift: f32,
    /// Number of sprite-sheet variations
    pub variations: u32,
    /// Columns in the variation sheet
    pub sheet_cols: u32,
    pub sprite: SpriteSpec,
}

impl Default for AsteroidSettings {
    fn default() -> Self {
        Self {
            population: 10,
            min_scale: 0.5,
            max_scale: 1.9,
            spawn_buffer: 100.0,
            max_spin: 0.5,
            min_speed: 0.5,
            max_speed: 1.0,
            drift: 0.3,
            variations: 12,
            sheet_cols: 4,
            sprite: SpriteSpec::new(64.0, 64.0, 1.0, 0.8),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct EnemySettings {
    pub min_speed: f32,
    pub max_speed: f32,
    pub min_attack_interval_ms: f64,
    pub max_attack_interval_ms: f64,
    /// Delay before the next wave is drawn from [interval, 2 * interval]
    pub wave_interval_ms: f64,
    pub min_wave_size: u32,
    pub max_wave_size: u32,
    pub spawn_buffer: f32,
    /// Enemies aim their drift at a point this far (at most) from field center
    pub target_jitter: f32,
    pub sprite: SpriteSpec,
}

impl Default for EnemySettings {
    fn default() -> Self {
        Self {
            min_speed: 0.4,
            max_speed: 1.0,
            min_attack_interval_ms: 1500.0,
            max_attack_interval_ms: 3500.0,
            wave_interval_ms: 5000.0,
            min_wave_size: 2,
            max_wave_size: 5,
            spawn_buffer: 60.0,
            target_jitter: 150.0,
            sprite: SpriteSpec::new(80.0, 80.0, 0.7, 0.7),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ProjectileSettings {
    pub speed: f32,
    /// Add the shooter's velocity to the muzzle velocity
    pub inherit_momentum: bool,
    /// Play the laser sound when fired
    pub sound: bool,
    pub sprite: SpriteSpec,
}

impl ProjectileSettings {
    fn player() -> Self {
        Self {
            speed: 20.0,
            inherit_momentum: true,
            sound: true,
            sprite: SpriteSpec::new(80.0, 48.0, 0.5, 0.5),
        }
    }

    fn enemy() -> Self {
        Self {
            speed: 6.0,
            inherit_momentum: false,
            sound: false,
            sprite: SpriteSpec::new(48.0, 48.0, 0.4, 0.5),
        }
    }
}

impl Default for ProjectileSettings {
    fn default() -> Self {
        Self::player()
    }
}

/// Enemy bolts fill missing fields from the enemy defaults, not the player's
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ProjectilesSettings {
    pub player: ProjectileSettings,
    #[serde(deserialize_with = "enemy_projectile")]
    pub enemy: ProjectileSettings,
}

/// Partial projectile override layered onto a base
#[derive(Deserialize)]
#[serde(deny_unknown_fields)]
struct ProjectileOverride {
    speed: Option<f32>,
    inherit_momentum: Option<bool>,
    sound: Option<bool>,
    sprite: Option<SpriteSpec>,
}

impl ProjectileOverride {
    fn over(self, base: ProjectileSettings) -> ProjectileSettings {
        ProjectileSettings {
            speed: self.speed.unwrap_or(base.speed),
            inherit_momentum: self.inherit_momentum.unwrap_or(base.inherit_momentum),
            sound: self.sound.unwrap_or(base.sound),
            sprite: self.sprite.unwrap_or(base.sprite),
        }
    }
}

fn enemy_projectile<'de, D>(de: D) -> Result<ProjectileSettings, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(ProjectileOverride::deserialize(de)?.over(ProjectileSettings::enemy()))
}

impl Default for ProjectilesSettings {
    fn default() -> Self {
        Self {
            player: ProjectileSettings::player(),
            enemy: ProjectileSettings::enemy(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ExplosionSettings {
    pub sprite: SpriteSpec,
    /// Frame grid of the explosion sheet
    pub cols: u32,
    pub rows: u32,
    /// Simulation frames per animation frame
    pub stagger: u32,
    pub player_scale: f32,
    pub enemy_scale: f32,
}

impl Default for ExplosionSettings {
    fn default() -> Self {
        Self {
            sprite: SpriteSpec::new(96.0, 96.0, 1.0, 1.0),
            cols: 8,
            rows: 8,
            stagger: 1,
            player_scale: 1.5,
            enemy_scale: 1.2,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PoolSettings {
    pub projectiles: usize,
    pub enemy_projectiles: usize,
    pub explosions: usize,
    pub policy: PoolPolicy,
}

impl Default for PoolSettings {
    fn default() -> Self {
        Self {
            projectiles: 32,
            enemy_projectiles: 64,
            explosions: 24,
            policy: PoolPolicy::Reject,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TimingSettings {
    /// Time between the player exploding and the round resetting
    pub respawn_delay_ms: f64,
    /// Invulnerability window after a respawn
    pub respawn_grace_ms: f64,
    /// How long the shield flashes after absorbing a hit
    pub shield_flash_ms: f64,
    /// Thrust stays locked this long after a manual restart
    pub thrust_lock_ms: f64,
    /// Upper bound on simulation steps per second
    pub target_fps: f64,
    pub pacing: Pacing,
    /// Step cap per host frame in `Pacing::Fixed`
    pub max_substeps: u32,
}

impl Default for TimingSettings {
    fn default() -> Self {
        Self {
            respawn_delay_ms: 2000.0,
            respawn_grace_ms: 1500.0,
            shield_flash_ms: 200.0,
            thrust_lock_ms: 1000.0,
            target_fps: 60.0,
            pacing: Pacing::Gate,
            max_substeps: 4,
        }
    }
}

impl TimingSettings {
    /// Minimum wall time between two simulation steps
    pub fn frame_ms(&self) -> f64 {
        1000.0 / self.target_fps
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ScoringSettings {
    pub asteroid: u32,
    pub enemy: u32,
}

impl Default for ScoringSettings {
    fn default() -> Self {
        Self {
            asteroid: 10,
            enemy: 50,
        }
    }
}

/// Debug overlays drawn on top of the scene
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct DebugSettings {
    pub show_boxes: bool,
    pub show_player_vector: bool,
    pub show_pos: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AudioSettings {
    pub enable_sound: bool,
}

impl Default for AudioSettings {
    fn default() -> Self {
        Self { enable_sound: true }
    }
}

/// Complete game configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub field: FieldSettings,
    pub player: PlayerSettings,
    pub asteroids: AsteroidSettings,
    pub enemies: EnemySettings,
    pub projectiles: ProjectilesSettings,
    pub explosions: ExplosionSettings,
    pub pools: PoolSettings,
    pub timing: TimingSettings,
    pub scoring: ScoringSettings,
    pub debug: DebugSettings,
    pub audio: AudioSettings,
}

impl Settings {
    /// Parse settings from JSON and validate them
    pub fn from_json(json: &str) -> Result<Self, SimError> {
        let settings: Settings = serde_json::from_str(json)?;
        settings.validate()?;
        log::info!("Loaded settings from JSON");
        Ok(settings)
    }

    pub fn to_json(&self) -> Result<String, SimError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Reject values the simulation can't run with
    pub fn validate(&self) -> Result<(), SimError> {
        let f = &self.field;
        if !(f.width.is_finite() && f.height.is_finite() && f.width > 0.0 && f.height > 0.0) {
            return Err(invalid("field", "width and height must be positive and finite"));
        }

        let p = &self.player;
        p.sprite.validate("player.sprite")?;
        if ![p.acceleration, p.max_velocity, p.max_rotation, p.torque]
            .iter()
            .all(|v| v.is_finite())
        {
            return Err(invalid("player", "motion limits must be finite"));
        }
        if !(p.acceleration >= 0.0
            && p.max_velocity > 0.0
            && p.max_rotation >= 0.0
            && p.torque >= 0.0)
        {
            return Err(invalid("player", "limits must be non-negative"));
        }

        let a = &self.asteroids;
        a.sprite.validate("asteroids.sprite")?;
        ordered("asteroids.scale", a.min_scale, a.max_scale)?;
        ordered("asteroids.speed", a.min_speed, a.max_speed)?;
        if a.min_speed <= 0.0 {
            return Err(invalid("asteroids.min_speed", "must be positive"));
        }
        if a.variations == 0 || a.sheet_cols == 0 {
            return Err(invalid("asteroids.variations", "sheet must not be empty"));
        }

        let e = &self.enemies;
        e.sprite.validate("enemies.sprite")?;
        ordered("enemies.speed", e.min_speed, e.max_speed)?;
        duration("enemies.min_attack_interval_ms", e.min_attack_interval_ms)?;
        duration("enemies.max_attack_interval_ms", e.max_attack_interval_ms)?;
        if e.min_attack_interval_ms > e.max_attack_interval_ms {
            return Err(invalid("enemies.attack_interval", "min must not exceed max"));
        }
        if e.min_wave_size == 0 || e.min_wave_size > e.max_wave_size {
            return Err(invalid("enemies.wave_size", "need 0 < min <= max"));
        }
        // Wave delays are drawn up to twice the interval
        duration("enemies.wave_interval_ms", e.wave_interval_ms * 2.0)?;

        self.projectiles.player.sprite.validate("projectiles.player.sprite")?;
        self.projectiles.enemy.sprite.validate("projectiles.enemy.sprite")?;

        let x = &self.explosions;
        x.sprite.validate("explosions.sprite")?;
        if x.cols == 0 || x.rows == 0 || x.stagger == 0 {
            return Err(invalid("explosions", "frame grid and stagger must be non-zero"));
        }

        let pools = &self.pools;
        if pools.projectiles == 0 || pools.enemy_projectiles == 0 || pools.explosions == 0 {
            return Err(invalid("pools", "capacities must be non-zero"));
        }

        let t = &self.timing;
        duration("timing.respawn_delay_ms", t.respawn_delay_ms)?;
        duration("timing.respawn_grace_ms", t.respawn_grace_ms)?;
        duration("timing.shield_flash_ms", t.shield_flash_ms)?;
        duration("timing.thrust_lock_ms", t.thrust_lock_ms)?;
        if !(t.target_fps.is_finite() && t.target_fps > 0.0) {
            return Err(invalid("timing.target_fps", "must be positive"));
        }
        if self.timing.max_substeps == 0 {
            return Err(invalid("timing.max_substeps", "must be non-zero"));
        }

        Ok(())
    }
}

fn invalid(field: &'static str, reason: &str) -> SimError {
    log::warn!("Rejected setting {}: {}", field, reason);
    SimError::InvalidSetting {
        field,
        reason: reason.to_string(),
    }
}

fn ordered(field: &'static str, min: f32, max: f32) -> Result<(), SimError> {
    if !(min.is_finite() && max.is_finite()) {
        return Err(invalid(field, "bounds must be finite"));
    }
    if min > max {
        return Err(invalid(field, "min must not exceed max"));
    }
    Ok(())
}

fn duration(field: &'static str, ms: f64) -> Result<(), SimError> {
    if !(ms.is_finite() && ms >= 0.0) {
        return Err(invalid(field, "must be finite and non-negative"));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        assert!(Settings::default().validate().is_ok());
    }

    #[test]
    fn test_partial_json_keeps_defaults() {
        let json = r#"{ "asteroids": { "population": 4 }, "debug": { "show_boxes": true } }"#;
        let s = Settings::from_json(json).unwrap();
        assert_eq!(s.asteroids.population, 4);
        assert_eq!(s.asteroids.max_scale, 1.9);
        assert!(s.debug.show_boxes);
        assert_eq!(s.player.start_angle, 270.0);
    }

    #[test]
    fn test_inverted_range_rejected() {
        let err = Settings::from_json(r#"{ "asteroids": { "min_scale": 2.0, "max_scale": 1.0 } }"#)
            .unwrap_err();
        assert!(matches!(err, SimError::InvalidSetting { field: "asteroids.scale", .. }));
    }

    #[test]
    fn test_bad_json_is_parse_error() {
        assert!(matches!(Settings::from_json("{ nope"), Err(SimError::Parse(_))));
    }

    #[test]
    fn test_json_roundtrip_preserves_policy() {
        let mut s = Settings::default();
        s.pools.policy = PoolPolicy::Grow;
        let back = Settings::from_json(&s.to_json().unwrap()).unwrap();
        assert_eq!(back.pools.policy, PoolPolicy::Grow);
    }

    #[test]
    fn test_partial_enemy_projectile_keeps_enemy_defaults() {
        let s = Settings::from_json(r#"{ "projectiles": { "enemy": { "speed": 8.0 } } }"#).unwrap();
        let enemy = &s.projectiles.enemy;
        assert_eq!(enemy.speed, 8.0);
        assert!(!enemy.sound);
        assert!(!enemy.inherit_momentum);
        assert_eq!(enemy.sprite, ProjectileSettings::enemy().sprite);
        // The player's shots are untouched
        assert!(s.projectiles.player.sound);
    }

    #[test]
    fn test_huge_wave_interval_rejected() {
        let err = Settings::from_json(r#"{ "enemies": { "wave_interval_ms": 1e308 } }"#)
            .unwrap_err();
        assert!(matches!(
            err,
            SimError::InvalidSetting { field: "enemies.wave_interval_ms", .. }
        ));
    }

    #[test]
    fn test_non_finite_values_rejected() {
        let mut s = Settings::default();
        s.player.acceleration = f32::NAN;
        assert!(s.validate().is_err());

        let mut s = Settings::default();
        s.enemies.max_attack_interval_ms = f64::NAN;
        assert!(s.validate().is_err());

        let mut s = Settings::default();
        s.timing.respawn_delay_ms = f64::INFINITY;
        assert!(matches!(
            s.validate(),
            Err(SimError::InvalidSetting { field: "timing.respawn_delay_ms", .. })
        ));

        let mut s = Settings::default();
        s.asteroids.max_speed = f32::NAN;
        assert!(s.validate().is_err());
    }
}
