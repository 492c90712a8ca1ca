//! Settings file (TOML).
//!
//! ```toml
//! seed = 1234
//! start_level = 3
//!
//! [[levels]]
//! level = 3
//! kinds = ["red", "green", "blue"]
//! target_score = 2000
//! timer_seconds = 120
//! ```
//!
//! Every field is optional. Levels listed under `[[levels]]` replace the
//! built-in parameters for that level number.

use std::fs;
use std::io;
use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::level::LevelConfig;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("cannot read settings: {0}")]
    Io(#[from] io::Error),
    #[error("invalid settings: {0}")]
    Parse(#[from] toml::de::Error),
}

/// Session settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Fixed seed for reproducible boards; random when absent.
    pub seed: Option<u64>,
    /// Level the console starts on.
    pub start_level: u32,
    /// Per-level overrides.
    pub levels: Vec<LevelConfig>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            seed: None,
            start_level: 1,
            levels: Vec::new(),
        }
    }
}

impl Settings {
    /// Load settings from `path`; a missing file yields the defaults.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        match fs::read_to_string(path) {
            Ok(contents) => Self::parse(&contents),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(Self::default()),
            Err(e) => Err(e.into()),
        }
    }

    pub fn parse(contents: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(contents)?)
    }

    /// Parameters for `level`, preferring an override from the file.
    pub fn level_config(&self, level: u32) -> LevelConfig {
        self.levels
            .iter()
            .find(|l| l.level == level)
            .cloned()
            .unwrap_or_else(|| LevelConfig::for_level(level))
    }

    /// The configured seed, or a random one.
    pub fn seed_or_random(&self) -> u64 {
        self.seed.unwrap_or_else(|| fastrand::u64(..))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::TileKind;

    #[test]
    fn test_empty_file_gives_defaults() {
        assert_eq!(Settings::parse("").unwrap(), Settings::default());
    }

    #[test]
    fn test_unseeded_settings_draw_a_seed() {
        let settings = Settings::default();
        assert_eq!(settings.seed, None);
        let first = settings.seed_or_random();
        let second = settings.seed_or_random();
        assert_ne!(first, second);
    }

    #[test]
    fn test_missing_file_gives_defaults() {
        let settings = Settings::load(Path::new("/nonexistent/tilecascade.toml")).unwrap();
        assert_eq!(settings, Settings::default());
    }

    #[test]
    fn test_level_override() {
        let settings = Settings::parse(
            r#"
            seed = 99
            start_level = 2

            [[levels]]
            level = 2
            kinds = ["red", "green", "blue"]
            target_score = 500
            timer_seconds = 30
            "#,
        )
        .unwrap();
        assert_eq!(settings.seed, Some(99));
        assert_eq!(settings.seed_or_random(), 99);
        let two = settings.level_config(2);
        assert_eq!(two.target_score, 500);
        assert_eq!(two.kinds, vec![TileKind::Red, TileKind::Green, TileKind::Blue]);
        assert_eq!(settings.level_config(3), LevelConfig::for_level(3));
    }

    #[test]
    fn test_malformed_file_is_an_error() {
        assert!(matches!(Settings::parse("seed = \"x\""), Err(ConfigError::Parse(_))));
    }
}
