mod schema;

pub use schema::{Config, ThemePreference};

use anyhow::{Context, Result};
use std::fs;
use std::path::{Path, PathBuf};

/// Get the config directory path (~/.config/eval-ia/)
pub fn get_config_dir() -> Result<PathBuf> {
    let home = dirs::home_dir().context("Could not determine home directory")?;
    Ok(home.join(".config").join("eval-ia"))
}

/// Get the default config file path (~/.config/eval-ia/config.yaml)
pub fn get_config_path() -> Result<PathBuf> {
    Ok(get_config_dir()?.join("config.yaml"))
}

/// Load configuration from a YAML file
///
/// # Arguments
///
/// * `path` - Optional path to config file. If None, uses the default path
///   (~/.config/eval-ia/config.yaml) and falls back to defaults when it
///   does not exist.
///
/// # Errors
///
/// Returns an error if:
/// - An explicitly given config file does not exist
/// - The config file cannot be read
/// - The YAML cannot be parsed
pub fn load_config(path: Option<PathBuf>) -> Result<Config> {
    let config_path = match path {
        Some(p) => {
            if !p.exists() {
                anyhow::bail!("Config file not found at {}", p.display());
            }
            p
        }
        None => match get_config_path() {
            Ok(p) if p.exists() => p,
            _ => {
                tracing::debug!("no config file, using defaults");
                return Ok(Config::default());
            }
        },
    };

    let config_content = fs::read_to_string(&config_path)
        .with_context(|| format!("Failed to read config file at {}", config_path.display()))?;

    let config: Config = serde_saphyr::from_str(&config_content).with_context(|| {
        format!(
            "Failed to parse config: invalid YAML in {}",
            config_path.display()
        )
    })?;

    tracing::debug!(path = %config_path.display(), "loaded config");
    Ok(config)
}

/// Validate configuration at startup.
/// Returns all validation errors at once (not just the first).
pub fn validate_config(config: &Config) -> Result<(), Vec<String>> {
    let mut errors = Vec::new();

    if config.data_dir.as_os_str().is_empty() {
        errors.push("data_dir: must not be empty".to_string());
    }

    if config.weak_threshold > 10 {
        errors.push(format!(
            "weak_threshold: {} is outside the 0-10 score range",
            config.weak_threshold
        ));
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

/// Expand a leading `~/` in the data directory
pub fn resolve_data_dir(data_dir: &Path) -> PathBuf {
    if let Ok(rest) = data_dir.strip_prefix("~") {
        if let Some(home) = dirs::home_dir() {
            return home.join(rest);
        }
    }
    data_dir.to_path_buf()
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_load_explicit_missing_file() {
        let dir = TempDir::new().unwrap();
        let result = load_config(Some(dir.path().join("missing.yaml")));
        assert!(result.is_err());
    }

    #[test]
    fn test_load_explicit_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.yaml");
        fs::write(&path, "data_dir: projects\nweak_threshold: 4\n").unwrap();

        let config = load_config(Some(path)).unwrap();
        assert_eq!(config.data_dir, PathBuf::from("projects"));
        assert_eq!(config.weak_threshold, 4);
    }

    #[test]
    fn test_load_invalid_yaml() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.yaml");
        fs::write(&path, "data_dir: [unterminated\n").unwrap();

        let err = load_config(Some(path)).unwrap_err();
        assert!(format!("{:#}", err).contains("invalid YAML"));
    }

    #[test]
    fn test_validate_default() {
        assert!(validate_config(&Config::default()).is_ok());
    }

    #[test]
    fn test_validate_collects_all_errors() {
        let config = Config {
            data_dir: PathBuf::new(),
            weak_threshold: 11,
            ..Config::default()
        };
        let errors = validate_config(&config).unwrap_err();
        assert_eq!(errors.len(), 2);
        assert!(errors[0].contains("data_dir"));
        assert!(errors[1].contains("weak_threshold"));
    }

    #[test]
    fn test_resolve_data_dir() {
        assert_eq!(resolve_data_dir(Path::new("data")), PathBuf::from("data"));
        if let Some(home) = dirs::home_dir() {
            assert_eq!(
                resolve_data_dir(Path::new("~/evals")),
                home.join("evals")
            );
        }
    }
}
