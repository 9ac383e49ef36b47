//! Simulation settings
//!
//! Every tunable in one serializable bundle. Missing JSON fields fall back to
//! defaults, so partial override files are fine.

use serde::{Deserialize, Serialize};

use crate::consts::*;
use crate::error::{SimError, SimResult};
use crate::sim::ai::{AiConfig, AiPreset};
use crate::sim::physics::{BounceParams, PlayField};
use crate::sim::pool::PoolLimits;

/// Player tuning
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlayerSettings {
    /// Live projectile cap
    pub max_projectiles: usize,
    /// Ticks between shots
    pub fire_cooldown_ticks: u32,
}

impl Default for PlayerSettings {
    fn default() -> Self {
        Self {
            max_projectiles: MAX_PROJECTILES,
            fire_cooldown_ticks: FIRE_COOLDOWN_TICKS,
        }
    }
}

/// Simulation settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// RNG seed for wave spawning
    pub seed: u64,
    pub field: PlayField,
    pub physics: BounceParams,
    /// Broad-phase cell edge (a small multiple of typical entity size)
    pub grid_cell_size: f32,
    pub pool: PoolLimits,
    pub player: PlayerSettings,
    /// Projectile upward speed (px/s)
    pub projectile_speed: f32,
    /// Preset used when `ai` is not given explicitly
    pub ai_preset: AiPreset,
    /// Explicit autopilot tuning (overrides `ai_preset`)
    pub ai: Option<AiConfig>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            seed: 12345,
            field: PlayField::default(),
            physics: BounceParams::default(),
            grid_cell_size: GRID_CELL_SIZE,
            pool: PoolLimits::default(),
            player: PlayerSettings::default(),
            projectile_speed: PROJECTILE_SPEED,
            ai_preset: AiPreset::default(),
            ai: None,
        }
    }
}

fn check(ok: bool, field: &'static str, reason: &'static str) -> SimResult<()> {
    if ok {
        Ok(())
    } else {
        Err(SimError::InvalidConfig { field, reason })
    }
}

fn positive(v: f32) -> bool {
    v.is_finite() && v > 0.0
}

fn unit(v: f32) -> bool {
    v.is_finite() && (0.0..=1.0).contains(&v)
}

fn non_negative(v: f32) -> bool {
    v.is_finite() && v >= 0.0
}

impl Settings {
    /// Create settings with a specific autopilot preset
    pub fn from_preset(preset: AiPreset) -> Self {
        Self {
            ai_preset: preset,
            ..Self::default()
        }
    }

    /// Parse and validate settings JSON
    pub fn from_json(json: &str) -> SimResult<Self> {
        let settings: Settings = serde_json::from_str(json)?;
        settings.validate()?;
        Ok(settings)
    }

    pub fn to_json(&self) -> SimResult<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Effective autopilot tuning
    pub fn ai_config(&self) -> AiConfig {
        self.ai.unwrap_or_else(|| self.ai_preset.config())
    }

    pub fn validate(&self) -> SimResult<()> {
        let f = &self.field;
        check(positive(f.width), "field.width", "must be finite and > 0")?;
        check(positive(f.height), "field.height", "must be finite and > 0")?;
        let insets = [f.safe_area.top, f.safe_area.bottom, f.safe_area.left, f.safe_area.right];
        check(
            insets.iter().all(|v| non_negative(*v)),
            "field.safe_area",
            "insets must be finite and >= 0",
        )?;
        check(
            f.usable_width() > PLAYER_WIDTH && f.bottom() - f.top() > PLAYER_HEIGHT,
            "field.safe_area",
            "insets leave no room for the player",
        )?;
        check(
            f.usable_width() > ENEMY_BASE_SIZE && f.bottom() - f.top() > ENEMY_BASE_SIZE,
            "field",
            "usable area must exceed the largest enemy",
        )?;

        let p = &self.physics;
        check(non_negative(p.gravity), "physics.gravity", "must be finite and >= 0")?;
        check(unit(p.floor_restitution), "physics.floor_restitution", "must be in [0, 1]")?;
        check(unit(p.wall_restitution), "physics.wall_restitution", "must be in [0, 1]")?;
        check(unit(p.ceiling_restitution), "physics.ceiling_restitution", "must be in [0, 1]")?;
        check(positive(p.max_velocity), "physics.max_velocity", "must be finite and > 0")?;
        check(
            non_negative(p.min_bounce_velocity) && p.min_bounce_velocity <= p.max_velocity,
            "physics.min_bounce_velocity",
            "must be in [0, max_velocity]",
        )?;
        check(
            non_negative(p.min_horizontal_velocity) && p.min_horizontal_velocity <= p.max_velocity,
            "physics.min_horizontal_velocity",
            "must be in [0, max_velocity]",
        )?;

        check(positive(self.grid_cell_size), "grid_cell_size", "must be finite and > 0")?;
        check(positive(self.projectile_speed), "projectile_speed", "must be finite and > 0")?;
        check(self.player.max_projectiles > 0, "player.max_projectiles", "must be > 0")?;

        let ai = self.ai_config();
        check(
            [ai.shoot_threshold, ai.lane_width, ai.avoid_threshold, ai.dodge_speed, ai.center_speed]
                .iter()
                .all(|v| non_negative(*v)),
            "ai",
            "thresholds and speeds must be finite and >= 0",
        )?;
        check(unit(ai.center_bias), "ai.center_bias", "must be in [0, 1]")?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        assert!(Settings::default().validate().is_ok());
        for preset in AiPreset::ALL {
            assert!(Settings::from_preset(preset).validate().is_ok());
        }
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let settings = Settings::from_json(
            r#"{ "seed": 7, "field": { "width": 1024 }, "physics": { "gravity": 300 } }"#,
        )
        .unwrap();
        assert_eq!(settings.seed, 7);
        assert_eq!(settings.field.width, 1024.0);
        assert_eq!(settings.field.height, FIELD_HEIGHT);
        assert_eq!(settings.physics.gravity, 300.0);
        assert_eq!(settings.physics.max_velocity, BounceParams::default().max_velocity);
    }

    #[test]
    fn test_json_roundtrip() {
        let settings = Settings::from_preset(AiPreset::Chaotic);
        let json = settings.to_json().unwrap();
        assert_eq!(Settings::from_json(&json).unwrap(), settings);
    }

    #[test]
    fn test_rejects_bad_restitution() {
        let json = r#"{ "physics": { "floor_restitution": 1.5 } }"#;
        let err = Settings::from_json(json).unwrap_err();
        assert!(matches!(
            err,
            SimError::InvalidConfig {
                field: "physics.floor_restitution",
                ..
            }
        ));
    }

    #[test]
    fn test_rejects_field_smaller_than_enemy() {
        let json = r#"{ "field": { "width": 800, "height": 50 } }"#;
        let err = Settings::from_json(json).unwrap_err();
        assert!(matches!(err, SimError::InvalidConfig { field: "field", .. }));

        // Insets count against the usable area too
        let json = r#"{ "field": { "width": 100, "safe_area": { "left": 20, "right": 20 } } }"#;
        let err = Settings::from_json(json).unwrap_err();
        assert!(matches!(err, SimError::InvalidConfig { field: "field", .. }));

        let mut settings = Settings::default();
        settings.field.height = ENEMY_BASE_SIZE + 1.0;
        assert!(settings.validate().is_ok());
    }

    #[test]
    fn test_rejects_malformed_json() {
        let err = Settings::from_json("{ not json").unwrap_err();
        assert!(matches!(err, SimError::ConfigParse(_)));
    }

    #[test]
    fn test_explicit_ai_overrides_preset() {
        let mut settings = Settings::from_preset(AiPreset::Aggressive);
        assert_eq!(settings.ai_config(), AiPreset::Aggressive.config());

        let custom = AiConfig {
            center_bias: 0.9,
            ..AiPreset::Stationary.config()
        };
        settings.ai = Some(custom);
        assert_eq!(settings.ai_config(), custom);
    }
}
