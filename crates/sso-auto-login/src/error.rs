//! Errors that abort a request cycle.

use auth_gateway::GatewayError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum SsoError {
    /// The local auth layer refused to log in the SSO user.
    #[error("SSO login rejected by local auth: {0}")]
    PolicyViolation(#[from] GatewayError),

    /// The request went away before the SSO server answered.
    #[error("request cancelled before the SSO server answered")]
    Cancelled,
}

impl SsoError {
    /// HTTP status to answer the aborted request with.
    pub fn status_code(&self) -> u16 {
        match self {
            SsoError::PolicyViolation(_) => 500,
            // client closed request
            SsoError::Cancelled => 499,
        }
    }
}

pub type SsoResult<T> = Result<T, SsoError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_codes() {
        let err = SsoError::from(GatewayError::Repository("conflict".to_string()));
        assert_eq!(err.status_code(), 500);
        assert!(err.to_string().contains("conflict"));

        assert_eq!(SsoError::Cancelled.status_code(), 499);
    }
}
