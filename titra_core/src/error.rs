//! Error types for the titra_core library.

use std::io;

/// Result type alias using our Error type
pub type Result<T> = std::result::Result<T, Error>;

/// Core error type for titra_core operations
///
/// The calculation engine itself never fails; these errors come from the
/// collaborators around it (validation, history, config, export).
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// IO error occurred
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    /// JSON serialization/deserialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// CSV error
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// TOML parsing error
    #[error("TOML error: {0}")]
    Toml(#[from] toml::de::Error),

    /// Configuration validation error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Titration input rejected before reaching the engine
    #[error("Invalid titration input: {}", .0.join("; "))]
    Validation(Vec<String>),

    /// Command-line input rejected; the problems were already reported
    #[error("Input error: {0}")]
    Input(String),

    /// History store error
    #[error("History error: {0}")]
    History(String),
}
