//! Environment-driven configuration: process bootstrap settings (log
//! level, database path) and the `ConfigProvider` the engine reads
//! therapy settings from (§6).

use std::env;
use std::sync::Arc;

use async_trait::async_trait;
use thiserror::Error;

use glucloop_core::domain::{ConfigurationSnapshot, DailySchedule, GlucoseTargetRange};
use glucloop_core::ports::ConfigProvider;
use glucloop_storage::SettingsRepository;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Missing environment variable: {0}")]
    MissingVar(String),
    #[error("Invalid value for {0}: {1}")]
    InvalidValue(String, String),
}

/// Process bootstrap configuration.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub log_level: String,
    pub database_path: String,
}

impl AppConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        Ok(Self {
            log_level: env_var_or("GLUCLOOP_LOG_LEVEL", "info"),
            database_path: env_var_or("GLUCLOOP_DATABASE_PATH", "sqlite://glucloop.sqlite3"),
        })
    }
}

/// The therapy configuration the engine reads through `ConfigProvider`
/// (max basal, max bolus, and the three time-of-day schedules), each
/// currently a single constant band read from the environment. A real
/// deployment would source these from a settings UI; this crate's job is
/// only the seam, grounded in the same `from_env` shape as `AppConfig`.
#[derive(Debug, Clone)]
pub struct LoopConfig {
    pub max_basal_units_per_hour: f64,
    pub max_bolus_units: f64,
    pub target_range: GlucoseTargetRange,
    pub sensitivity_mg_dl_per_unit: f64,
    pub basal_rate_units_per_hour: f64,
}

impl LoopConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        Ok(Self {
            max_basal_units_per_hour: env_var_parsed_or("GLUCLOOP_MAX_BASAL_UNITS_PER_HOUR", 3.0)?,
            max_bolus_units: env_var_parsed_or("GLUCLOOP_MAX_BOLUS_UNITS", 5.0)?,
            target_range: GlucoseTargetRange {
                min_mg_dl: env_var_parsed_or("GLUCLOOP_TARGET_RANGE_MIN_MG_DL", 70.0)?,
                max_mg_dl: env_var_parsed_or("GLUCLOOP_TARGET_RANGE_MAX_MG_DL", 140.0)?,
            },
            sensitivity_mg_dl_per_unit: env_var_parsed_or(
                "GLUCLOOP_SENSITIVITY_MG_DL_PER_UNIT",
                50.0,
            )?,
            basal_rate_units_per_hour: env_var_parsed_or(
                "GLUCLOOP_BASAL_RATE_UNITS_PER_HOUR",
                1.0,
            )?,
        })
    }

    fn to_snapshot(&self) -> ConfigurationSnapshot {
        ConfigurationSnapshot {
            max_basal_units_per_hour: self.max_basal_units_per_hour,
            max_bolus_units: self.max_bolus_units,
            target_range_schedule: DailySchedule::constant(self.target_range),
            sensitivity_schedule: DailySchedule::constant(self.sensitivity_mg_dl_per_unit),
            basal_schedule: DailySchedule::constant(self.basal_rate_units_per_hour),
        }
    }
}

/// The `ConfigProvider` wired up for a real run: an env-derived therapy
/// snapshot plus `dosingEnabled` persisted through `glucloop-storage`.
pub struct EnvConfigProvider {
    snapshot: ConfigurationSnapshot,
    settings: Arc<SettingsRepository>,
}

impl EnvConfigProvider {
    pub fn new(config: &LoopConfig, settings: Arc<SettingsRepository>) -> Self {
        Self {
            snapshot: config.to_snapshot(),
            settings,
        }
    }
}

#[async_trait]
impl ConfigProvider for EnvConfigProvider {
    async fn snapshot(&self) -> Option<ConfigurationSnapshot> {
        Some(self.snapshot.clone())
    }

    async fn dosing_enabled(&self) -> bool {
        match self.settings.dosing_enabled().await {
            Ok(enabled) => enabled,
            Err(err) => {
                tracing::error!(error = %err, "failed to read dosingEnabled, defaulting to disabled");
                false
            }
        }
    }

    async fn set_dosing_enabled(&self, enabled: bool) -> anyhow::Result<()> {
        self.settings.set_dosing_enabled(enabled).await?;
        Ok(())
    }
}

fn env_var_or(name: &str, default: &str) -> String {
    env::var(name).unwrap_or_else(|_| default.to_string())
}

fn env_var_parsed_or<T: std::str::FromStr>(name: &str, default: T) -> Result<T, ConfigError> {
    match env::var(name) {
        Ok(raw) => raw
            .parse()
            .map_err(|_| ConfigError::InvalidValue(name.to_string(), raw)),
        Err(_) => Ok(default),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn app_config_falls_back_to_defaults() {
        std::env::remove_var("GLUCLOOP_LOG_LEVEL");
        std::env::remove_var("GLUCLOOP_DATABASE_PATH");
        let config = AppConfig::from_env().unwrap();
        assert_eq!(config.log_level, "info");
    }

    #[test]
    fn loop_config_falls_back_to_defaults() {
        std::env::remove_var("GLUCLOOP_MAX_BASAL_UNITS_PER_HOUR");
        let config = LoopConfig::from_env().unwrap();
        assert_eq!(config.max_basal_units_per_hour, 3.0);
    }
}
