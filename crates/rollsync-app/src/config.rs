use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{Context, Result};
use rollsync_engine::config::{DEFAULT_CLOCK_PERIOD, DEFAULT_SONG_LENGTH};
use rollsync_engine::{EngineConfig, Speed, Tick};
use rollsync_pianoroll::layout::DEFAULT_TICKS_PER_STEP;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

const APP_DIR_NAME: &str = "RollSync";
const SETTINGS_FILE: &str = "settings.json";

pub fn settings_path() -> Option<PathBuf> {
    dirs::config_dir().map(|base| base.join(APP_DIR_NAME).join(SETTINGS_FILE))
}

/// User settings. Every field is optional in the file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub clock_period_ms: u64,
    pub song_length: Tick,
    pub looping: bool,
    pub initial_speed: u32,
    pub continuous_scroll: bool,
    pub ticks_per_step: Tick,
    /// Generator seed; a fresh song every run when absent.
    pub seed: Option<u64>,
    pub window_width: u32,
    pub window_height: u32,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            clock_period_ms: DEFAULT_CLOCK_PERIOD.as_millis() as u64,
            song_length: DEFAULT_SONG_LENGTH,
            looping: true,
            initial_speed: 1,
            continuous_scroll: true,
            ticks_per_step: DEFAULT_TICKS_PER_STEP,
            seed: None,
            window_width: 1024,
            window_height: 768,
        }
    }
}

impl AppConfig {
    /// Settings from the user config directory, or defaults.
    pub fn load() -> Self {
        let Some(path) = settings_path() else {
            debug!("no config directory; using default settings");
            return Self::default();
        };
        if !path.exists() {
            return Self::default();
        }
        match Self::load_from(&path) {
            Ok(config) => config,
            Err(err) => {
                warn!(path = %path.display(), "ignoring settings file: {err:#}");
                Self::default()
            }
        }
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        let contents =
            fs::read_to_string(path).with_context(|| format!("read {}", path.display()))?;
        serde_json::from_str(&contents).with_context(|| format!("parse {}", path.display()))
    }

    pub fn engine_config(&self) -> EngineConfig {
        EngineConfig {
            clock_period: Duration::from_millis(self.clock_period_ms),
            song_length: self.song_length,
            looping: self.looping,
        }
    }

    pub fn speed(&self) -> Speed {
        Speed::clamped(self.initial_speed)
    }
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use super::*;

    #[test]
    fn partial_files_fill_in_defaults() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{ "song_length": 960, "seed": 5, "looping": false }}"#).unwrap();

        let config = AppConfig::load_from(file.path()).unwrap();
        assert_eq!(config.song_length, 960);
        assert_eq!(config.seed, Some(5));
        assert_eq!(config.clock_period_ms, 8);

        let engine = config.engine_config();
        assert!(!engine.looping);
        assert_eq!(engine.clock_period, Duration::from_millis(8));
        assert!(engine.validate().is_ok());
    }

    #[test]
    fn malformed_files_are_errors() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "not json").unwrap();
        assert!(AppConfig::load_from(file.path()).is_err());
    }

    #[test]
    fn speed_is_clamped() {
        let config = AppConfig {
            initial_speed: 40,
            ..AppConfig::default()
        };
        assert_eq!(config.speed(), Speed::MAX);
    }
}
