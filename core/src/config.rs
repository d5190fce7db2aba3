//! Application configuration, loaded from TOML.
//!
//! ```toml
//! max_params = 8
//! body_limit = 1048576
//! pretty_json = true
//! ```

use serde::Deserialize;
use std::path::Path;
use thiserror::Error;

pub const DEFAULT_MAX_PARAMS: usize = 5;
pub const DEFAULT_BODY_LIMIT: usize = 4 * 1024 * 1024;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("failed to read config file: {0}")]
    Io(#[from] std::io::Error),
    #[error("invalid config: {0}")]
    Parse(#[from] toml::de::Error),
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct AppConfig {
    /// Number of path parameter slots reserved per request.
    pub max_params: usize,
    /// Largest request body, in bytes, collected into a context.
    pub body_limit: usize,
    /// Indent JSON responses.
    pub pretty_json: bool,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            max_params: DEFAULT_MAX_PARAMS,
            body_limit: DEFAULT_BODY_LIMIT,
            pretty_json: false,
        }
    }
}

impl AppConfig {
    pub fn from_toml_str(source: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(source)?)
    }

    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let source = std::fs::read_to_string(path)?;
        let config = Self::from_toml_str(&source)?;
        tracing::debug!(path = %path.display(), ?config, "Loaded application config");
        Ok(config)
    }
}
