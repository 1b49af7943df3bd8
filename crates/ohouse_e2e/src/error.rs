//! Error types for device control and UI automation

use std::time::Duration;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum E2eError {
    #[error("Command execution failed: {0}")]
    CommandFailed(String),

    #[error("Timed out after {elapsed:?}: {message}")]
    Timeout { message: String, elapsed: Duration },

    #[error("WebDriver error ({error}): {message}")]
    WebDriver { error: String, message: String },

    #[error("Session error: {0}")]
    Session(String),

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl E2eError {
    pub fn timeout(message: impl Into<String>, elapsed: Duration) -> Self {
        Self::Timeout {
            message: message.into(),
            elapsed,
        }
    }

    pub fn is_timeout(&self) -> bool {
        matches!(self, Self::Timeout { .. })
    }
}

pub type Result<T> = std::result::Result<T, E2eError>;
