//! CLI error types.

use cb_plugin::PluginError;
use thiserror::Error;

/// CLI-specific errors.
#[derive(Debug, Error)]
pub enum CliError {
    /// Invalid or unusable configuration.
    #[error("configuration error: {0}")]
    Config(String),

    /// Invalid argument or missing required value.
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// HTTP request failed.
    #[error("request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// Plugin dispatch or listing failed.
    #[error(transparent)]
    Plugin(#[from] PluginError),

    /// YAML (de)serialization failed.
    #[error("yaml error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// JSON (de)serialization failed.
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),

    /// IO error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
