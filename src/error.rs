use std::io;

use thiserror::Error;

/// Application-wide error type for the tokscan CLI.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Unknown category '{0}'")]
    InvalidCategory(String),

    #[error("Pattern evaluation failed: {0}")]
    Pattern(String),

    #[error("Failed to write report: {0}")]
    ReportWrite(String),

    #[error("Failed to launch editor: {0}")]
    Editor(String),

    #[error("Failed to parse configuration: {0}")]
    ConfigParse(#[from] toml::de::Error),

    #[error("Failed to write configuration: {0}")]
    ConfigSerialize(#[from] toml::ser::Error),

    #[error("Invalid glob pattern: {0}")]
    Glob(#[from] globset::Error),

    #[error("Invalid pattern rule: {0}")]
    Regex(#[from] regex::Error),

    #[error("Failed to serialize report: {0}")]
    Json(#[from] serde_json::Error),
}

impl AppError {
    pub fn config<S: Into<String>>(msg: S) -> Self {
        AppError::Config(msg.into())
    }

    pub fn pattern<S: Into<String>>(msg: S) -> Self {
        AppError::Pattern(msg.into())
    }
}
