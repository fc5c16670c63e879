//! CLI configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! ## Optional
//! - `TALLY_METADATA_KEY` - Fulfillment metafield holding allocated items
//!   (default: `fulfillment_items`)
//! - `TALLY_LOG_FORMAT` - `text` or `json` (default: `text`)
//! - `RUST_LOG` - Standard tracing filter (default: `tally_core=info,tally_cli=info`)

use tally_core::DEFAULT_ALLOCATION_KEY;
use thiserror::Error;

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
}

/// Log output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogFormat {
    /// Human-readable lines.
    #[default]
    Text,
    /// One JSON object per event, for log shippers.
    Json,
}

impl std::str::FromStr for LogFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "text" => Ok(Self::Text),
            "json" => Ok(Self::Json),
            _ => Err(format!("expected 'text' or 'json', got '{s}'")),
        }
    }
}

/// CLI configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CliConfig {
    /// Metafield key holding each fulfillment's allocated items
    pub metadata_key: String,
    /// Log output format
    pub log_format: LogFormat,
}

impl CliConfig {
    /// Load configuration from environment variables.
    ///
    /// Calls `dotenvy::dotenv()` to load from `.env` file if present.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if a variable is set to an invalid value.
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();

        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load configuration from an arbitrary variable lookup.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if a variable is set to an invalid value.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let metadata_key = get_or_default(&lookup, "TALLY_METADATA_KEY", DEFAULT_ALLOCATION_KEY);
        if metadata_key.trim().is_empty() {
            return Err(ConfigError::InvalidEnvVar(
                "TALLY_METADATA_KEY".to_string(),
                "must not be empty".to_string(),
            ));
        }

        let log_format = get_or_default(&lookup, "TALLY_LOG_FORMAT", "text")
            .parse::<LogFormat>()
            .map_err(|e| ConfigError::InvalidEnvVar("TALLY_LOG_FORMAT".to_string(), e))?;

        Ok(Self {
            metadata_key,
            log_format,
        })
    }
}

/// Get a variable with a default value.
fn get_or_default(lookup: &impl Fn(&str) -> Option<String>, key: &str, default: &str) -> String {
    lookup(key).unwrap_or_else(|| default.to_string())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn config(vars: &[(&str, &str)]) -> Result<CliConfig, ConfigError> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect();
        CliConfig::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn test_defaults() {
        let config = config(&[]).unwrap();
        assert_eq!(config.metadata_key, DEFAULT_ALLOCATION_KEY);
        assert_eq!(config.log_format, LogFormat::Text);
    }

    #[test]
    fn test_overrides() {
        let config = config(&[
            ("TALLY_METADATA_KEY", "packed_items"),
            ("TALLY_LOG_FORMAT", "JSON"),
        ])
        .unwrap();
        assert_eq!(config.metadata_key, "packed_items");
        assert_eq!(config.log_format, LogFormat::Json);
    }

    #[test]
    fn test_empty_metadata_key() {
        let result = config(&[("TALLY_METADATA_KEY", "  ")]);
        assert!(matches!(result, Err(ConfigError::InvalidEnvVar(ref k, _)) if k == "TALLY_METADATA_KEY"));
    }

    #[test]
    fn test_invalid_log_format() {
        let result = config(&[("TALLY_LOG_FORMAT", "xml")]);
        assert!(matches!(result, Err(ConfigError::InvalidEnvVar(ref k, _)) if k == "TALLY_LOG_FORMAT"));
    }
}
