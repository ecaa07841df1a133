use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::scoring::DEFAULT_WEAK_THRESHOLD;

/// Colour palette of the full-screen viewer
#[derive(Debug, Clone, Copy, Default, Deserialize, Serialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum ThemePreference {
    /// Detect from the terminal background
    #[default]
    Auto,
    Dark,
    Light,
}

/// Application configuration.
///
/// Example YAML:
/// ```yaml
/// data_dir: ~/evaluations
/// theme: dark
/// weak_threshold: 4
/// ```
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct Config {
    /// Root directory holding one sub-directory per project (default: ./data)
    #[serde(default = "default_data_dir")]
    pub data_dir: PathBuf,

    #[serde(default)]
    pub theme: ThemePreference,

    /// Scores strictly below this flag a criterion as weak
    #[serde(default = "default_weak_threshold")]
    pub weak_threshold: u8,
}

fn default_data_dir() -> PathBuf {
    PathBuf::from("data")
}

fn default_weak_threshold() -> u8 {
    DEFAULT_WEAK_THRESHOLD
}

impl Default for Config {
    fn default() -> Self {
        Self {
            data_dir: default_data_dir(),
            theme: ThemePreference::default(),
            weak_threshold: default_weak_threshold(),
        }
    }
}
