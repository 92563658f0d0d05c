//! Load compiler config from JSON text, a JSON file, or the environment.

use crate::config::{validate, CompilerConfig};
use crate::error::ConfigError;
use std::path::Path;

/// Env var naming a JSON config file.
pub const CONFIG_PATH_ENV: &str = "APIDEF_CONFIG_PATH";
/// Env var overriding `fallback_schema`.
pub const FALLBACK_SCHEMA_ENV: &str = "APIDEF_FALLBACK_SCHEMA";

impl CompilerConfig {
    /// Parse a (possibly partial) JSON config; missing fields take their defaults.
    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        let config: CompilerConfig = serde_json::from_str(json)?;
        validate(&config)?;
        Ok(config)
    }

    pub fn load_from_path(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path.as_ref())?;
        Self::from_json_str(&text)
    }

    /// Defaults, then the file named by `APIDEF_CONFIG_PATH` if set, then `APIDEF_FALLBACK_SCHEMA`.
    pub fn from_env() -> Result<Self, ConfigError> {
        let mut config = match std::env::var(CONFIG_PATH_ENV) {
            Ok(path) if !path.trim().is_empty() => Self::load_from_path(path.trim())?,
            _ => CompilerConfig::default(),
        };
        if let Ok(schema) = std::env::var(FALLBACK_SCHEMA_ENV) {
            tracing::debug!(schema = %schema, "fallback schema from env");
            config.fallback_schema = schema;
        }
        validate(&config)?;
        Ok(config)
    }
}
