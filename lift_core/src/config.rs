//! Configuration file support for liftlog.
//!
//! Configuration is loaded from `$XDG_CONFIG_HOME/liftlog/config.toml`.

use crate::input::TARGET_REPS_RANGE;
use crate::{Error, Result, WorkoutType};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Application configuration
#[derive(Clone, Debug, Serialize, Deserialize, Default)]
pub struct Config {
    #[serde(default)]
    pub data: DataConfig,

    #[serde(default)]
    pub logging: LoggingConfig,

    #[serde(default)]
    pub timer: TimerConfig,
}

/// Data storage configuration
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct DataConfig {
    #[serde(default = "default_data_dir")]
    pub data_dir: PathBuf,
}

impl Default for DataConfig {
    fn default() -> Self {
        Self {
            data_dir: default_data_dir(),
        }
    }
}

/// Defaults for new sessions
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct LoggingConfig {
    #[serde(default = "default_target_reps")]
    pub default_target_reps: u32,

    #[serde(default = "default_workout_type")]
    pub default_workout_type: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            default_target_reps: default_target_reps(),
            default_workout_type: default_workout_type(),
        }
    }
}

/// Rest timer configuration
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct TimerConfig {
    #[serde(default = "default_rest_seconds")]
    pub rest_seconds: u64,
}

impl Default for TimerConfig {
    fn default() -> Self {
        Self {
            rest_seconds: default_rest_seconds(),
        }
    }
}

// Default value functions
fn default_data_dir() -> PathBuf {
    let base = dirs::data_local_dir()
        .or_else(|| dirs::home_dir().map(|home| home.join(".local/share")))
        .unwrap_or_else(|| PathBuf::from("."));
    base.join("liftlog")
}

fn default_target_reps() -> u32 {
    10
}

fn default_workout_type() -> String {
    WorkoutType::default().label().to_string()
}

fn default_rest_seconds() -> u64 {
    90
}

impl Config {
    /// Load configuration from the standard config path
    pub fn load() -> Result<Self> {
        let config_path = Self::default_config_path();
        if config_path.exists() {
            Self::load_from(&config_path)
        } else {
            tracing::info!(
                "No config file found at {:?}, using defaults",
                config_path
            );
            Ok(Self::default())
        }
    }

    /// Load configuration from a specific path
    pub fn load_from(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)?;
        let config: Config = toml::from_str(&contents)?;
        config.validate()?;
        tracing::info!("Loaded config from {:?}", path);
        Ok(config)
    }

    /// Reject values that the session form would refuse anyway
    pub fn validate(&self) -> Result<()> {
        if !TARGET_REPS_RANGE.contains(&self.logging.default_target_reps) {
            return Err(Error::Config(format!(
                "default_target_reps must be between {} and {}",
                TARGET_REPS_RANGE.start(),
                TARGET_REPS_RANGE.end()
            )));
        }
        if self.timer.rest_seconds == 0 {
            return Err(Error::Config("rest_seconds must be positive".into()));
        }
        Ok(())
    }

    /// Workout type used when none is given
    pub fn default_workout_type(&self) -> WorkoutType {
        WorkoutType::parse(&self.logging.default_workout_type)
    }

    /// Get the default config file path
    pub fn default_config_path() -> PathBuf {
        let base = dirs::config_dir()
            .or_else(|| dirs::home_dir().map(|home| home.join(".config")))
            .unwrap_or_else(|| PathBuf::from("."));
        base.join("liftlog").join("config.toml")
    }

    /// Save the current configuration to a specific path
    pub fn save_to(&self, path: &Path) -> Result<()> {
        // Ensure parent directory exists
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let contents = toml::to_string_pretty(self)
            .map_err(|e| Error::Config(format!("Failed to serialize config: {}", e)))?;
        std::fs::write(path, contents)?;
        tracing::info!("Saved config to {:?}", path);
        Ok(())
    }
}
