//! Error types used throughout the application

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Main error type for Yotei
#[derive(Error, Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "message")]
pub enum YoteiError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Network error: {0}")]
    Network(String),

    #[error("Authentication error: {0}")]
    Auth(String),

    /// The language model answered, but not with anything usable.
    #[error("Language model error: {0}")]
    Llm(String),

    #[error("Timed out: {0}")]
    Timeout(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl YoteiError {
    /// Stable label for log fields and metrics.
    pub fn label(&self) -> &'static str {
        match self {
            Self::Config(_) => "config",
            Self::Network(_) => "network",
            Self::Auth(_) => "auth",
            Self::Llm(_) => "llm",
            Self::Timeout(_) => "timeout",
            Self::InvalidInput(_) => "invalid_input",
            Self::Internal(_) => "internal",
        }
    }
}

/// Result type alias for Yotei operations
pub type Result<T> = std::result::Result<T, YoteiError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn serializes_with_type_tag() {
        let err = YoteiError::Llm("no function call".into());
        let json = serde_json::to_value(&err).unwrap();
        assert_eq!(json["type"], "Llm");
        assert_eq!(json["message"], "no function call");
    }

    #[test]
    fn labels_are_stable() {
        assert_eq!(YoteiError::Timeout("x".into()).label(), "timeout");
        assert_eq!(YoteiError::InvalidInput("x".into()).label(), "invalid_input");
    }
}
