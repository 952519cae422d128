//! Global seminar-desk configuration.

use std::path::{Path, PathBuf};
use std::time::Duration;

use config::{Config, Environment, File};
use serde::{Deserialize, Serialize};

use crate::error::{DeskError, DeskResult};

static DEFAULT_API_BASE_URL: &str = "http://localhost:8000/api";
static DEFAULT_DATA_DIR: &str = "~/.local/share/seminar-desk";
const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 10;

fn default_api_base_url() -> String {
    DEFAULT_API_BASE_URL.to_string()
}

fn default_data_dir() -> PathBuf {
    PathBuf::from(DEFAULT_DATA_DIR)
}

fn default_request_timeout_secs() -> u64 {
    DEFAULT_REQUEST_TIMEOUT_SECS
}

/// Configuration at ~/.config/seminar-desk/config.toml
///
/// `SEMINAR_DESK_API_BASE_URL` (and the other keys, upper-cased) override
/// the file.
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct DeskConfig {
    #[serde(default = "default_api_base_url")]
    pub api_base_url: String,

    #[serde(default = "default_data_dir")]
    pub data_dir: PathBuf,

    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,
}

impl Default for DeskConfig {
    fn default() -> Self {
        DeskConfig {
            api_base_url: default_api_base_url(),
            data_dir: default_data_dir(),
            request_timeout_secs: default_request_timeout_secs(),
        }
    }
}

impl DeskConfig {
    pub fn config_path() -> DeskResult<PathBuf> {
        let config_dir = dirs::config_dir()
            .ok_or_else(|| DeskError::Config("Could not determine config directory".into()))?
            .join("seminar-desk");

        Ok(config_dir.join("config.toml"))
    }

    /// Load the config file (creating a commented default on first run) and
    /// apply environment overrides.
    pub fn load() -> DeskResult<Self> {
        let config_path = Self::config_path()?;

        if !config_path.exists() {
            Self::create_default_config(&config_path)?;
        }

        Self::load_from(&config_path)
    }

    pub fn load_from(path: &Path) -> DeskResult<Self> {
        Config::builder()
            .add_source(File::from(path).required(false))
            .add_source(Environment::with_prefix("SEMINAR_DESK"))
            .build()
            .map_err(|e| DeskError::Config(e.to_string()))?
            .try_deserialize()
            .map_err(|e| DeskError::Config(e.to_string()))
    }

    /// Base URL without trailing slashes.
    pub fn api_base(&self) -> &str {
        self.api_base_url.trim_end_matches('/')
    }

    /// Data directory with `~` expanded.
    pub fn data_path(&self) -> PathBuf {
        let full_path_str = shellexpand::tilde(&self.data_dir.to_string_lossy()).into_owned();

        PathBuf::from(full_path_str)
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    /// Create a default config file with all options commented out.
    pub fn create_default_config(path: &Path) -> DeskResult<()> {
        let contents = format!(
            "\
# seminar-desk configuration

# REST backend (SEMINAR_DESK_API_BASE_URL overrides this):
# api_base_url = \"{}\"

# Where the local mirror lives:
# data_dir = \"{}\"

# Seconds before a backend request is abandoned:
# request_timeout_secs = {}
",
            DEFAULT_API_BASE_URL, DEFAULT_DATA_DIR, DEFAULT_REQUEST_TIMEOUT_SECS
        );

        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| {
                DeskError::Config(format!("Could not create config directory: {e}"))
            })?;
        }

        std::fs::write(path, contents)
            .map_err(|e| DeskError::Config(format!("Could not write config file: {e}")))?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_commented_default_config_loads_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        DeskConfig::create_default_config(&path).unwrap();

        let config = DeskConfig::load_from(&path).unwrap();
        assert_eq!(config.request_timeout_secs, DEFAULT_REQUEST_TIMEOUT_SECS);
        assert_eq!(config.data_dir, PathBuf::from(DEFAULT_DATA_DIR));
        assert!(!config.data_path().to_string_lossy().starts_with('~'));
    }

    #[test]
    fn test_file_values_override_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(
            &path,
            "data_dir = \"/tmp/desk\"\nrequest_timeout_secs = 3\n",
        )
        .unwrap();

        let config = DeskConfig::load_from(&path).unwrap();
        assert_eq!(config.data_path(), PathBuf::from("/tmp/desk"));
        assert_eq!(config.request_timeout(), Duration::from_secs(3));
    }

    #[test]
    fn test_api_base_strips_trailing_slash() {
        let config = DeskConfig {
            api_base_url: "https://example.org/api//".into(),
            ..DeskConfig::default()
        };
        assert_eq!(config.api_base(), "https://example.org/api");
    }
}
