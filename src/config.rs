use eyre::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::api::ReplicateConfig;
use crate::poller::PollerConfig;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub log_level: Option<String>,
    pub api: ApiSettings,
    pub poll: PollSettings,
    pub history: HistorySettings,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ApiSettings {
    pub base_url: String,
    pub timeout_ms: u64,
    pub token_env: String,
}

impl Default for ApiSettings {
    fn default() -> Self {
        Self {
            base_url: "https://api.replicate.com/v1/predictions".to_string(),
            timeout_ms: 30000,
            token_env: "REPLICATE_API_TOKEN".to_string(),
        }
    }
}

impl From<&ApiSettings> for ReplicateConfig {
    fn from(settings: &ApiSettings) -> Self {
        Self {
            base_url: settings.base_url.clone(),
            timeout: Duration::from_millis(settings.timeout_ms),
            token_env: settings.token_env.clone(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PollSettings {
    pub interval_ms: u64,
    pub max_attempts: u32,
}

impl Default for PollSettings {
    fn default() -> Self {
        Self {
            interval_ms: 2000,
            max_attempts: 60,
        }
    }
}

impl From<&PollSettings> for PollerConfig {
    fn from(settings: &PollSettings) -> Self {
        Self {
            interval: Duration::from_millis(settings.interval_ms),
            max_attempts: settings.max_attempts,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct HistorySettings {
    pub capacity: usize,
}

impl Default for HistorySettings {
    fn default() -> Self {
        Self { capacity: 12 }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            log_level: Some("info".to_string()),
            api: ApiSettings::default(),
            poll: PollSettings::default(),
            history: HistorySettings::default(),
        }
    }
}

impl Config {
    /// Load configuration with fallback chain
    pub fn load(config_path: Option<&PathBuf>) -> Result<Self> {
        // If explicit config path provided, try to load it
        if let Some(path) = config_path {
            return Self::load_from_file(path).context(format!("Failed to load config from {}", path.display()));
        }

        // Try primary location: ~/.config/<project>/<project>.yml
        if let Some(config_dir) = dirs::config_dir() {
            let project_name = env!("CARGO_PKG_NAME");
            let primary_config = config_dir.join(project_name).join(format!("{}.yml", project_name));
            if primary_config.exists() {
                match Self::load_from_file(&primary_config) {
                    Ok(config) => return Ok(config),
                    Err(e) => {
                        log::warn!("Failed to load config from {}: {}", primary_config.display(), e);
                    }
                }
            }
        }

        // Try fallback location: ./<project>.yml
        let project_name = env!("CARGO_PKG_NAME");
        let fallback_config = PathBuf::from(format!("{}.yml", project_name));
        if fallback_config.exists() {
            match Self::load_from_file(&fallback_config) {
                Ok(config) => return Ok(config),
                Err(e) => {
                    log::warn!("Failed to load config from {}: {}", fallback_config.display(), e);
                }
            }
        }

        // No config file found, use defaults
        log::info!("No config file found, using defaults");
        Ok(Self::default())
    }

    fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(&path).context("Failed to read config file")?;

        let config: Self = serde_yaml::from_str(&content).context("Failed to parse config file")?;

        log::info!("Loaded config from: {}", path.as_ref().display());
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.api.base_url, "https://api.replicate.com/v1/predictions");
        assert_eq!(config.poll.interval_ms, 2000);
        assert_eq!(config.poll.max_attempts, 60);
        assert_eq!(config.history.capacity, 12);
    }

    #[test]
    fn test_load_from_yaml() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(
            file,
            "poll:\n  interval_ms: 500\n  max_attempts: 10\napi:\n  timeout_ms: 5000"
        )
        .unwrap();

        let path = file.path().to_path_buf();
        let config = Config::load(Some(&path)).unwrap();
        assert_eq!(config.poll.interval_ms, 500);
        assert_eq!(config.poll.max_attempts, 10);
        assert_eq!(config.api.timeout_ms, 5000);
        // Unspecified sections keep their defaults
        assert_eq!(config.history.capacity, 12);
    }

    #[test]
    fn test_load_missing_explicit_path_fails() {
        let path = PathBuf::from("/nonexistent/retouch.yml");
        assert!(Config::load(Some(&path)).is_err());
    }

    #[test]
    fn test_poller_config_conversion() {
        let settings = PollSettings {
            interval_ms: 250,
            max_attempts: 4,
        };
        let poller: PollerConfig = (&settings).into();
        assert_eq!(poller.interval, Duration::from_millis(250));
        assert_eq!(poller.max_attempts, 4);
    }

    #[test]
    fn test_replicate_config_conversion() {
        let settings = ApiSettings::default();
        let api: ReplicateConfig = (&settings).into();
        assert_eq!(api.base_url, settings.base_url);
        assert_eq!(api.timeout, Duration::from_secs(30));
        assert_eq!(api.token_env, "REPLICATE_API_TOKEN");
    }
}
