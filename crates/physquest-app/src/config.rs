//! Layered configuration: defaults, then an optional JSON file, then
//! `PHYSQUEST_*` environment variables (nested keys split on `__`, e.g.
//! `PHYSQUEST_TANK__KP=2.5`).
//!
//! Ranges match the slider limits of the interactive front end.

use std::path::Path;

use figment::providers::{Env, Format, Json, Serialized};
use figment::Figment;
use serde::{Deserialize, Serialize};
use validator::{Validate, ValidationError};

use physquest_core::constants::*;
use physquest_core::enums::PendulumModel;

use crate::error::ConfigError;

/// Looked up in the working directory when `--config` is not given.
pub const DEFAULT_CONFIG_FILE: &str = "physquest.json";

pub const ENV_PREFIX: &str = "PHYSQUEST_";

#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
pub struct PhysQuestConfig {
    #[validate(nested)]
    pub player: PlayerConfig,
    #[validate(nested)]
    pub run: RunConfig,
    #[validate(nested)]
    pub projectile: ProjectileConfig,
    #[validate(nested)]
    pub tank: TankConfig,
    #[validate(nested)]
    pub spring: SpringConfig,
    #[validate(nested)]
    pub pendulum: PendulumConfig,
    #[validate(nested)]
    pub digits: DigitsConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct PlayerConfig {
    #[validate(length(min = 1, max = 64))]
    pub name: String,
}

impl Default for PlayerConfig {
    fn default() -> Self {
        Self {
            name: "Player".into(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct RunConfig {
    /// Seed for target distances, datasets and weight init.
    pub seed: u64,
    /// Wall-clock speed-up applied to paced runs.
    #[validate(range(min = 0.1, max = 100.0))]
    pub time_scale: f64,
    /// Skip pacing entirely.
    pub fast: bool,
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            seed: DIGIT_SPLIT_SEED,
            time_scale: 1.0,
            fast: false,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct ProjectileConfig {
    #[validate(range(min = 10.0, max = 100.0))]
    pub speed: f64,
}

impl Default for ProjectileConfig {
    fn default() -> Self {
        Self {
            speed: PROJECTILE_DEFAULT_SPEED,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct TankConfig {
    #[validate(range(min = 0.0, max = 10.0))]
    pub kp: f64,
    #[validate(range(min = 0.0, max = 5.0))]
    pub ki: f64,
    #[validate(range(min = 0.0, max = 5.0))]
    pub kd: f64,
}

impl Default for TankConfig {
    fn default() -> Self {
        Self {
            kp: TANK_DEFAULT_KP,
            ki: TANK_DEFAULT_KI,
            kd: TANK_DEFAULT_KD,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[validate(schema(function = validate_spring_start))]
pub struct SpringConfig {
    #[validate(range(min = 0.1, max = 10.0))]
    pub mass: f64,
    #[validate(range(min = 0.1, max = 10.0))]
    pub stiffness: f64,
    #[validate(range(min = 0.0, max = 5.0))]
    pub damping: f64,
    /// Starting position, -5 to 15.
    pub x0: f64,
}

fn validate_spring_start(config: &SpringConfig) -> Result<(), ValidationError> {
    if (-5.0..=15.0).contains(&config.x0) {
        Ok(())
    } else {
        Err(ValidationError::new("range").with_message("x0 must be between -5 and 15".into()))
    }
}

impl Default for SpringConfig {
    fn default() -> Self {
        Self {
            mass: SPRING_DEFAULT_MASS,
            stiffness: SPRING_DEFAULT_STIFFNESS,
            damping: SPRING_DEFAULT_DAMPING,
            x0: SPRING_DEFAULT_X0,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct PendulumConfig {
    #[validate(range(min = 0.0, max = 200.0))]
    pub kp: f64,
    #[validate(range(min = 0.0, max = 10.0))]
    pub ki: f64,
    #[validate(range(min = 0.0, max = 50.0))]
    pub kd: f64,
    pub model: PendulumModel,
}

impl Default for PendulumConfig {
    fn default() -> Self {
        Self {
            kp: PENDULUM_DEFAULT_KP,
            ki: PENDULUM_DEFAULT_KI,
            kd: PENDULUM_DEFAULT_KD,
            model: PendulumModel::Linearized,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct DigitsConfig {
    #[validate(range(min = 0.001, max = 1.0))]
    pub learning_rate: f64,
    #[validate(range(min = 10, max = 200))]
    pub hidden: usize,
    #[validate(range(min = 1, max = 50))]
    pub epochs: usize,
    /// Size of the generated dataset when no file is given.
    #[validate(range(min = 1, max = 1000))]
    pub samples_per_class: usize,
    #[validate(range(min = 0.0001, max = 1.0))]
    pub init_scale: f64,
}

impl Default for DigitsConfig {
    fn default() -> Self {
        Self {
            learning_rate: DIGIT_DEFAULT_LEARNING_RATE,
            hidden: DIGIT_DEFAULT_HIDDEN,
            epochs: DIGIT_DEFAULT_EPOCHS,
            samples_per_class: DIGIT_SAMPLES_PER_CLASS,
            init_scale: DIGIT_INIT_SCALE,
        }
    }
}

impl PhysQuestConfig {
    /// Load configuration.
    ///
    /// Hierarchy:
    /// 1. Default values
    /// 2. `path`, or `physquest.json` in the working directory if present
    /// 3. `PHYSQUEST_*` environment variables
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let mut figment = Figment::from(Serialized::defaults(PhysQuestConfig::default()));

        match path {
            Some(path) => {
                if !path.try_exists()? {
                    return Err(ConfigError::FileNotFound(path.to_path_buf()));
                }
                figment = figment.merge(Json::file(path));
            }
            None => {
                let default_file = Path::new(DEFAULT_CONFIG_FILE);
                if default_file.try_exists()? {
                    figment = figment.merge(Json::file(default_file));
                } else {
                    tracing::debug!("{DEFAULT_CONFIG_FILE} not found, using defaults");
                }
            }
        }

        Self::from_figment(figment.merge(Env::prefixed(ENV_PREFIX).split("__")))
    }

    pub fn from_figment(figment: Figment) -> Result<Self, ConfigError> {
        let config: Self = figment.extract()?;
        config.validate()?;
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn with_json(json: &str) -> Result<PhysQuestConfig, ConfigError> {
        PhysQuestConfig::from_figment(
            Figment::from(Serialized::defaults(PhysQuestConfig::default())).merge(Json::string(json)),
        )
    }

    #[test]
    fn defaults_validate() {
        let config = PhysQuestConfig::default();
        config.validate().expect("default config should validate");
        assert_eq!(config.tank.kp, TANK_DEFAULT_KP);
        assert_eq!(config.run.seed, 42);
    }

    #[test]
    fn file_overrides_merge_over_defaults() {
        let config = with_json(r#"{ "tank": { "kp": 0.5 }, "pendulum": { "model": "nonlinear" } }"#)
            .unwrap();
        assert_eq!(config.tank.kp, 0.5);
        assert_eq!(config.tank.ki, TANK_DEFAULT_KI);
        assert_eq!(config.pendulum.model, PendulumModel::Nonlinear);
    }

    #[test]
    fn out_of_range_values_are_rejected() {
        let err = with_json(r#"{ "spring": { "mass": 0.0 } }"#).unwrap_err();
        assert!(matches!(err, ConfigError::Validation(_)));
        assert!(err.to_string().contains("spring.mass"));

        let err = with_json(r#"{ "digits": { "epochs": 500 } }"#).unwrap_err();
        assert!(matches!(err, ConfigError::Validation(_)));

        let err = with_json(r#"{ "spring": { "x0": 40.0 } }"#).unwrap_err();
        assert!(err.to_string().contains("x0 must be between -5 and 15"));
    }

    #[test]
    fn wrong_types_are_parse_errors() {
        let err = with_json(r#"{ "tank": { "kp": "high" } }"#).unwrap_err();
        assert!(matches!(err, ConfigError::Parsing(_)));
    }

    #[test]
    fn missing_explicit_file_is_reported() {
        let err = PhysQuestConfig::load(Some(Path::new("does/not/exist.json"))).unwrap_err();
        assert!(matches!(err, ConfigError::FileNotFound(_)));
    }

    #[test]
    fn environment_override() {
        std::env::set_var("PHYSQUEST_PENDULUM__KD", "12.5");
        let config = PhysQuestConfig::load(None).unwrap();
        std::env::remove_var("PHYSQUEST_PENDULUM__KD");
        assert_eq!(config.pendulum.kd, 12.5);
    }
}
