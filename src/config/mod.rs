//! Configuration loading
//!
//! `config.toml` lives in the platform config directory unless a path is
//! given explicitly. A missing default file means built-in defaults.

pub mod schema;

pub use schema::{AttachmentsConfig, Config, GatewayConfig, ProviderConfig};

use std::path::{Path, PathBuf};

const API_KEY_ENV: &str = "OPENROUTER_API_KEY";

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read config file {path}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse config file {path}")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
    #[error("invalid configuration: {0}")]
    Invalid(String),
}

impl Config {
    /// Load from `path` (tilde-expanded), or from the default location.
    /// Environment overrides are applied afterwards.
    pub fn load(path: Option<&str>) -> Result<Self, ConfigError> {
        let mut config = match path {
            Some(path) => {
                let expanded = PathBuf::from(shellexpand::tilde(path).into_owned());
                Self::load_from_path(&expanded)?
            }
            None => match default_config_path() {
                Some(default) if default.exists() => Self::load_from_path(&default)?,
                _ => {
                    tracing::debug!("no config file found, using defaults");
                    Self::default()
                }
            },
        };
        config.apply_env_overrides(|key| std::env::var(key).ok());
        config.validate()?;
        Ok(config)
    }

    pub fn load_from_path(path: &Path) -> Result<Self, ConfigError> {
        let raw = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let config = toml::from_str(&raw).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })?;
        tracing::info!(path = %path.display(), "configuration loaded");
        Ok(config)
    }

    /// Apply environment overrides using `lookup` to read variables.
    pub fn apply_env_overrides(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        if let Some(key) = lookup(API_KEY_ENV).filter(|key| !key.trim().is_empty()) {
            self.provider.api_key = Some(key);
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.attachments.max_file_chars == 0 {
            return Err(ConfigError::Invalid(
                "attachments.max_file_chars must be greater than zero".into(),
            ));
        }
        if self.attachments.max_message_chars < self.attachments.max_file_chars {
            return Err(ConfigError::Invalid(
                "attachments.max_message_chars must not be smaller than max_file_chars".into(),
            ));
        }
        if self.gateway.request_timeout_secs == 0 || self.provider.timeout_secs == 0 {
            return Err(ConfigError::Invalid(
                "timeouts must be greater than zero".into(),
            ));
        }
        Ok(())
    }

    /// JSON schema of the configuration file.
    pub fn json_schema() -> serde_json::Value {
        serde_json::to_value(schemars::schema_for!(Config)).unwrap_or_default()
    }
}

pub fn default_config_path() -> Option<PathBuf> {
    directories::ProjectDirs::from("", "", "chatrelay")
        .map(|dirs| dirs.config_dir().join("config.toml"))
}
