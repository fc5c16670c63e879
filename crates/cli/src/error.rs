//! Unified error handling for the CLI.

use std::path::PathBuf;

use tally_core::{FulfillmentId, MetadataError, SessionError};
use thiserror::Error;

use crate::config::ConfigError;

/// Errors that can occur while running a command.
#[derive(Debug, Error)]
pub enum CliError {
    /// Configuration is invalid.
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Snapshot file could not be read.
    #[error("Failed to read {path}: {source}")]
    Io {
        /// File that was being read.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// Snapshot file extension is not `.json`, `.yaml` or `.yml`.
    #[error("Unsupported snapshot format: {0} (expected .json, .yaml or .yml)")]
    UnsupportedFormat(PathBuf),

    /// Snapshot is not valid JSON.
    #[error("Invalid JSON snapshot: {0}")]
    Json(#[from] serde_json::Error),

    /// Snapshot is not valid YAML.
    #[error("Invalid YAML snapshot: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// A fulfillment's allocation metafield could not be decoded.
    #[error("Metadata error: {0}")]
    Metadata(#[from] MetadataError),

    /// The requested fulfillment is not in the snapshot.
    #[error("Fulfillment {0} not found in snapshot")]
    UnknownFulfillment(FulfillmentId),

    /// The fulfillment cannot be opened.
    #[error("Session error: {0}")]
    Session(SessionError),

    /// Writing output failed.
    #[error("Failed to write output: {0}")]
    Output(#[source] std::io::Error),
}

impl From<SessionError> for CliError {
    fn from(err: SessionError) -> Self {
        match err {
            SessionError::UnknownFulfillment(id) => Self::UnknownFulfillment(id),
            other => Self::Session(other),
        }
    }
}
