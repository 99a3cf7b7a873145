//! Параметры controller'а (скорости, множители, policy режимов)

use bevy::prelude::Resource;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Скорость в Alert режиме
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AlertSpeedPolicy {
    /// Alert не трогает скорость (остаётся от предыдущего режима)
    #[default]
    Unchanged,
    /// Alert разгоняет до run скорости: base × run_multiplier
    Run,
}

/// Resource: конфиг для player entity, который спавнит `BatmanPlugin`
#[derive(Resource, Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ControllerConfig {
    /// Базовая скорость (единиц/сек)
    pub base_speed: f32,
    /// Множитель при зажатом модификаторе (Shift)
    pub run_multiplier: f32,
    /// Stealth скорость = base × factor
    pub stealth_speed_factor: f32,
    /// Прозрачность спрайтов в Stealth
    pub stealth_alpha: f32,
    /// Множитель скорости в транспорте
    pub vehicle_multiplier: f32,
    pub alert_speed: AlertSpeedPolicy,
    /// Работает ли модификатор бега в Stealth
    pub stealth_allows_run: bool,
}

impl Default for ControllerConfig {
    fn default() -> Self {
        Self {
            base_speed: 5.0,
            run_multiplier: 1.5,
            stealth_speed_factor: 0.5,
            stealth_alpha: 0.7,
            vehicle_multiplier: 2.0,
            alert_speed: AlertSpeedPolicy::Unchanged,
            stealth_allows_run: true,
        }
    }
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("invalid config field `{field}`: {reason}")]
    Invalid { field: &'static str, reason: String },
}

impl ControllerConfig {
    pub fn from_toml_str(source: &str) -> Result<Self, ConfigError> {
        let config: ControllerConfig = toml::from_str(source)?;
        config.validate()?;
        Ok(config)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let source = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&source)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        positive("base_speed", self.base_speed)?;
        positive("run_multiplier", self.run_multiplier)?;
        positive("stealth_speed_factor", self.stealth_speed_factor)?;
        positive("vehicle_multiplier", self.vehicle_multiplier)?;

        if !(0.0..=1.0).contains(&self.stealth_alpha) {
            return Err(ConfigError::Invalid {
                field: "stealth_alpha",
                reason: format!("{} is outside [0, 1]", self.stealth_alpha),
            });
        }
        Ok(())
    }

    /// Speed при входе в Stealth
    pub fn stealth_speed(&self) -> f32 {
        self.base_speed * self.stealth_speed_factor
    }

    /// Speed бега (Alert с policy `Run`)
    pub fn run_speed(&self) -> f32 {
        self.base_speed * self.run_multiplier
    }
}

fn positive(field: &'static str, value: f32) -> Result<(), ConfigError> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(ConfigError::Invalid {
            field,
            reason: format!("{} must be a finite positive number", value),
        })
    }
}
