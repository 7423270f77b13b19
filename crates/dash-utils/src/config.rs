//! Process-level configuration helpers

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use thiserror::Error;

/// Errors raised while reading the environment
#[derive(Debug, Error, PartialEq, Eq)]
pub enum EnvError {
    /// A required variable is unset or blank
    #[error("{0} environment variable not set")]
    Missing(String),
}

/// Application-wide settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// Application name
    pub app_name: String,
    /// Environment (development, production, ...)
    pub environment: String,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            app_name: "stockdash".to_string(),
            environment: "development".to_string(),
        }
    }
}

impl AppConfig {
    /// Read `STOCKDASH_ENV`, keeping the default name
    pub fn from_env() -> Self {
        let mut config = Self::default();
        if let Ok(env) = std::env::var("STOCKDASH_ENV") {
            if !env.trim().is_empty() {
                config.environment = env;
            }
        }
        config
    }
}

/// Load a `.env` file from the current directory or its parents
///
/// Returns the path that was loaded. A missing file is not an error;
/// variables already present in the process environment win.
pub fn load_env_file() -> Option<PathBuf> {
    match dotenvy::dotenv() {
        Ok(path) => {
            tracing::debug!("Loaded environment from {}", path.display());
            Some(path)
        }
        Err(e) if e.not_found() => None,
        Err(e) => {
            tracing::warn!("Failed to parse .env file: {}", e);
            None
        }
    }
}

/// Read a non-blank environment variable
pub fn require_env(name: &str) -> Result<String, EnvError> {
    match std::env::var(name) {
        Ok(value) if !value.trim().is_empty() => Ok(value),
        _ => Err(EnvError::Missing(name.to_string())),
    }
}
