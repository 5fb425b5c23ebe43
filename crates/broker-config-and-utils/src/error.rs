//! Core error types for broker configuration.

use thiserror::Error;

/// Core error type for configuration and startup.
#[derive(Error, Debug)]
pub enum CoreError {
    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// URL parsing error
    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    /// JSON serialization/deserialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Result type alias using CoreError.
pub type CoreResult<T> = Result<T, CoreError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn config_error_display() {
        let err = CoreError::Config("broker_name is empty".to_string());
        assert_eq!(err.to_string(), "Configuration error: broker_name is empty");
    }

    #[test]
    fn url_error_from_parse() {
        let parse_err = url::Url::parse("not a url").unwrap_err();
        let err: CoreError = parse_err.into();
        assert!(err.to_string().starts_with("Invalid URL:"));
    }
}
