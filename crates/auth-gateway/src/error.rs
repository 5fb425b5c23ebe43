//! Gateway error types.

use thiserror::Error;

/// Failures of the local auth layer.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum GatewayError {
    /// The user store refused the upsert.
    #[error("user repository error: {0}")]
    Repository(String),

    /// The guard could not establish a session.
    #[error("session guard error: {0}")]
    Session(String),
}

/// Result type for gateway operations.
pub type GatewayResult<T> = Result<T, GatewayError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = GatewayError::Repository("unique constraint on email".to_string());
        assert_eq!(
            err.to_string(),
            "user repository error: unique constraint on email"
        );

        let err = GatewayError::Session("store offline".to_string());
        assert_eq!(err.to_string(), "session guard error: store offline");
    }
}
