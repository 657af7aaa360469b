use miette::{Diagnostic, Result};
use thiserror::Error;

/// Main error type for the application
#[derive(Debug, Error, Diagnostic)]
pub enum Error {
    #[error("Environment error: {0}")]
    #[diagnostic(code(eventboard::environment))]
    Environment(String),

    #[error("Configuration error: {0}")]
    #[diagnostic(code(eventboard::config))]
    Config(String),

    #[error("Cosmic API error: {0}")]
    #[diagnostic(code(eventboard::cosmic))]
    Cosmic(String),

    #[error("Cosmic API returned HTTP {status}: {body}")]
    #[diagnostic(code(eventboard::cosmic_status))]
    CosmicStatus { status: u16, body: String },

    #[error("Invalid submission: {0}")]
    #[diagnostic(code(eventboard::validation))]
    Validation(#[from] crate::submission::ValidationError),

    #[cfg(feature = "web-interface")]
    #[error("Template error: {0}")]
    #[diagnostic(code(eventboard::template))]
    Template(#[from] askama::Error),

    #[error(transparent)]
    #[diagnostic(code(eventboard::io))]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    #[diagnostic(code(eventboard::serialization))]
    Serialization(String),

    #[error("Other error: {0}")]
    #[diagnostic(code(eventboard::other))]
    Other(String),
}

impl From<reqwest::Error> for Error {
    fn from(err: reqwest::Error) -> Self {
        Error::Cosmic(err.to_string())
    }
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Error::Serialization(err.to_string())
    }
}

// Implement From for TOML deserialization errors
impl From<toml::de::Error> for Error {
    fn from(err: toml::de::Error) -> Self {
        Error::Serialization(err.to_string())
    }
}

impl Error {
    /// Whether the Cosmic API answered with 404, which it uses for "no matching objects"
    pub fn is_not_found(&self) -> bool {
        matches!(self, Error::CosmicStatus { status: 404, .. })
    }
}

/// Type alias for Result with our Error type
pub type SiteResult<T> = Result<T, Error>;

/// Helper to create environment errors
pub fn env_error(var: &str) -> Error {
    Error::Environment(format!("Missing environment variable: {}", var))
}

/// Helper to create configuration errors
pub fn config_error(message: &str) -> Error {
    Error::Config(message.to_string())
}

/// Helper to create Cosmic API errors
pub fn cosmic_error(message: &str) -> Error {
    Error::Cosmic(message.to_string())
}

/// Helper to create other errors
pub fn other_error(message: &str) -> Error {
    Error::Other(message.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_not_found_detection() {
        let err = Error::CosmicStatus {
            status: 404,
            body: "{\"message\":\"No objects found\"}".to_string(),
        };
        assert!(err.is_not_found());

        let err = Error::CosmicStatus {
            status: 500,
            body: String::new(),
        };
        assert!(!err.is_not_found());
        assert!(!cosmic_error("timeout").is_not_found());
    }

    #[test]
    fn test_helper_messages() {
        assert_eq!(
            env_error("COSMIC_READ_KEY").to_string(),
            "Environment error: Missing environment variable: COSMIC_READ_KEY"
        );
        assert_eq!(
            config_error("bad week start").to_string(),
            "Configuration error: bad week start"
        );
    }
}
