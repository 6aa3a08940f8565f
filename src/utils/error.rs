//! Error handling for streampicker

use thiserror::Error;

/// Main error type for the collaborators around the selection engine
///
/// The ranking and pairing functions themselves never fail; these variants cover
/// loading inputs and probing streams over HTTP.
#[derive(Debug, Error)]
pub enum StreamError {
    #[error("No streams found in {0}")]
    NoStreams(String),

    #[error("Network error: {0}")]
    NetworkError(#[from] reqwest::Error),

    #[error("HEAD request to {0} timed out")]
    ProbeTimeout(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("Invalid configuration: {0}")]
    ConfigError(#[from] toml::de::Error),

    #[error("Invalid preference {key}: {value}")]
    InvalidPreference { key: &'static str, value: String },
}
