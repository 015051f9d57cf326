//! CLI configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! ## Optional
//! - `GM_DATA_DIR` - Directory the cart persists in (default: `.gomarketplace`)

use std::path::PathBuf;

use thiserror::Error;

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
}

/// Settings for opening the persisted cart.
#[derive(Debug, Clone)]
pub struct CartConfig {
    /// Directory the file-backed storage keeps the cart in
    pub data_dir: PathBuf,
}

impl CartConfig {
    /// Load configuration from environment variables.
    ///
    /// Calls `dotenvy::dotenv()` to load from `.env` file if present.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if `GM_DATA_DIR` is set to an unusable value.
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();

        let data_dir = data_dir_from(get_optional_env("GM_DATA_DIR"))?;

        Ok(Self { data_dir })
    }
}

/// Resolve the data directory from an optional variable value.
fn data_dir_from(value: Option<String>) -> Result<PathBuf, ConfigError> {
    match value {
        None => Ok(PathBuf::from(".gomarketplace")),
        Some(dir) if dir.is_empty() => Err(ConfigError::InvalidEnvVar(
            "GM_DATA_DIR".to_string(),
            "must not be empty".to_string(),
        )),
        Some(dir) => Ok(PathBuf::from(dir)),
    }
}

/// Get an optional environment variable.
fn get_optional_env(key: &str) -> Option<String> {
    std::env::var(key).ok()
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_data_dir_default() {
        let dir = data_dir_from(None).unwrap();
        assert_eq!(dir, PathBuf::from(".gomarketplace"));
    }

    #[test]
    fn test_data_dir_custom() {
        let dir = data_dir_from(Some("/tmp/carts".to_string())).unwrap();
        assert_eq!(dir, PathBuf::from("/tmp/carts"));
    }

    #[test]
    fn test_data_dir_empty_rejected() {
        let result = data_dir_from(Some(String::new()));
        assert!(matches!(result, Err(ConfigError::InvalidEnvVar(_, _))));
    }
}
