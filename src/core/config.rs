//! Configuration file and startup environment.
//!
//! The config file is optional TOML in the platform config directory. The API
//! key is never stored there; it only comes from the environment.

use std::error::Error as StdError;
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use directories::ProjectDirs;
use serde::Deserialize;

use crate::core::completion::CompletionSettings;
use crate::core::constants::{API_KEY_ENV, DEFAULT_BASE_URL, DEFAULT_MODEL};
use crate::core::syllabus::{EmptySyllabus, SyllabusContext};

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct Config {
    pub model: Option<String>,
    pub base_url: Option<String>,
    /// Replaces the built-in syllabus text.
    pub syllabus_file: Option<PathBuf>,
    /// Client-side limit on a single completion call. Unset means wait.
    pub request_timeout_secs: Option<u64>,
    /// `dark` (default), `light` or `monochrome`.
    pub theme: Option<String>,
}

/// Errors that can occur while preparing the session.
#[derive(Debug)]
pub enum ConfigError {
    /// Failed to read the configuration file from disk.
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    /// The configuration file is not valid TOML for [`Config`].
    Parse {
        path: PathBuf,
        source: toml::de::Error,
    },

    /// The configured syllabus file could not be used.
    Syllabus {
        path: PathBuf,
        source: Box<dyn StdError + Send + Sync>,
    },

    /// No API key in the environment. The chat degrades to a static notice.
    MissingCredential,
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::Read { path, source } => {
                write!(f, "Failed to read config at {}: {}", path.display(), source)
            }
            ConfigError::Parse { path, source } => {
                write!(f, "Failed to parse config at {}: {}", path.display(), source)
            }
            ConfigError::Syllabus { path, source } => {
                write!(
                    f,
                    "Failed to load syllabus from {}: {}",
                    path.display(),
                    source
                )
            }
            ConfigError::MissingCredential => {
                write!(f, "{API_KEY_ENV} is not set. Please configure your environment.")
            }
        }
    }
}

impl StdError for ConfigError {
    fn source(&self) -> Option<&(dyn StdError + 'static)> {
        match self {
            ConfigError::Read { source, .. } => Some(source),
            ConfigError::Parse { source, .. } => Some(source),
            ConfigError::Syllabus { source, .. } => Some(source.as_ref()),
            ConfigError::MissingCredential => None,
        }
    }
}

impl Config {
    /// Load from the default location, or defaults when no file exists.
    pub fn load() -> Result<Config, ConfigError> {
        match Self::config_path() {
            Some(path) => Self::load_from_path(&path),
            None => Ok(Config::default()),
        }
    }

    pub fn load_from_path(config_path: &Path) -> Result<Config, ConfigError> {
        if !config_path.exists() {
            return Ok(Config::default());
        }

        let contents = fs::read_to_string(config_path).map_err(|source| ConfigError::Read {
            path: config_path.to_path_buf(),
            source,
        })?;
        toml::from_str(&contents).map_err(|source| ConfigError::Parse {
            path: config_path.to_path_buf(),
            source,
        })
    }

    pub fn config_path() -> Option<PathBuf> {
        ProjectDirs::from("edu", "escc", "syllabot")
            .map(|dirs| dirs.config_dir().join("config.toml"))
    }

    /// Completion settings with an optional model override from the CLI.
    pub fn completion_settings(&self, model_override: Option<&str>) -> CompletionSettings {
        let model = model_override
            .map(str::trim)
            .filter(|m| !m.is_empty())
            .map(str::to_string)
            .or_else(|| self.model.clone())
            .unwrap_or_else(|| DEFAULT_MODEL.to_string());

        CompletionSettings {
            base_url: self
                .base_url
                .clone()
                .unwrap_or_else(|| DEFAULT_BASE_URL.to_string()),
            model,
            timeout: self
                .request_timeout_secs
                .filter(|secs| *secs > 0)
                .map(Duration::from_secs),
        }
    }

    pub fn syllabus_context(&self) -> Result<SyllabusContext, ConfigError> {
        let Some(path) = &self.syllabus_file else {
            return Ok(SyllabusContext::builtin());
        };

        let text = fs::read_to_string(path).map_err(|source| ConfigError::Syllabus {
            path: path.clone(),
            source: Box::new(source),
        })?;
        SyllabusContext::with_syllabus_text(text).map_err(|source: EmptySyllabus| {
            ConfigError::Syllabus {
                path: path.clone(),
                source: Box::new(source),
            }
        })
    }
}

/// Read the API key once. Unset and empty are both treated as absent.
pub fn credential_from_env() -> Result<String, ConfigError> {
    credential_from(std::env::var(API_KEY_ENV).ok())
}

fn credential_from(value: Option<String>) -> Result<String, ConfigError> {
    value
        .filter(|key| !key.trim().is_empty())
        .ok_or(ConfigError::MissingCredential)
}
