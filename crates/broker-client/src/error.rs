//! Error types for SSO server commands that report failure to the caller.
//!
//! The user-info query never fails: its failures are folded into
//! `RemoteSessionResult::TransportError`.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum BrokerError {
    /// Network or transport-level HTTP error from reqwest.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The server URL cannot be turned into command URLs.
    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    /// The SSO server answered with a non-success status or an error body.
    #[error("SSO server error: {status} - {message}")]
    Server {
        status: u16,
        message: String,
    },

    /// Invalid client configuration.
    #[error("Configuration error: {0}")]
    Config(String),
}

pub type BrokerResult<T> = Result<T, BrokerError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn server_error_display() {
        let err = BrokerError::Server {
            status: 401,
            message: "invalid checksum".to_string(),
        };
        assert_eq!(err.to_string(), "SSO server error: 401 - invalid checksum");
    }

    #[test]
    fn config_error_display() {
        let err = BrokerError::Config("server_url cannot be a base".to_string());
        assert_eq!(err.to_string(), "Configuration error: server_url cannot be a base");
    }
}
