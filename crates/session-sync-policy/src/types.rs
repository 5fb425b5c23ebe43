//! Session state types shared by the broker crates.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Identifier of a user, as issued by the SSO server.
///
/// Servers send ids either as JSON numbers or strings; both are kept in
/// their textual form so `5` and `"5"` compare equal.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UserId(String);

impl UserId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<u64> for UserId {
    fn from(id: u64) -> Self {
        Self(id.to_string())
    }
}

impl From<&str> for UserId {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}

impl From<String> for UserId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

/// Profile attributes copied from the SSO server into the local user record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserAttrs {
    pub name: String,
    pub email: String,
}

impl UserAttrs {
    pub fn new(name: impl Into<String>, email: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            email: email.into(),
        }
    }
}

/// Login state of the local application for the current request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum LocalAuthState {
    Guest,
    Authenticated { user_id: UserId },
}

impl LocalAuthState {
    pub fn authenticated(user_id: impl Into<UserId>) -> Self {
        Self::Authenticated {
            user_id: user_id.into(),
        }
    }
}

/// Category of a failed exchange with the SSO server.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "status", rename_all = "snake_case")]
pub enum TransportKind {
    /// Connection could not be established or was interrupted.
    Network,
    /// The request did not complete within the configured timeout.
    Timeout,
    /// Non-2xx response without a usable body.
    Status(u16),
    /// The body could not be interpreted.
    Malformed,
    /// The server reported an error other than "no session".
    Server,
}

/// Why a broker query produced no usable answer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransportCause {
    pub kind: TransportKind,
    pub message: String,
}

impl TransportCause {
    pub fn new(kind: TransportKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }
}

impl fmt::Display for TransportCause {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.kind {
            TransportKind::Network => write!(f, "network error: {}", self.message),
            TransportKind::Timeout => write!(f, "timeout: {}", self.message),
            TransportKind::Status(code) => write!(f, "HTTP {}: {}", code, self.message),
            TransportKind::Malformed => write!(f, "malformed response: {}", self.message),
            TransportKind::Server => write!(f, "server error: {}", self.message),
        }
    }
}

/// Answer of the SSO server for one broker token.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "result", rename_all = "snake_case")]
pub enum RemoteSessionResult {
    /// The server has a logged-in user for this token.
    Found {
        user_id: UserId,
        name: String,
        email: String,
    },
    /// The server knows the token but nobody is logged in.
    NotFound,
    /// The server does not recognise the broker session id.
    NoSessionError,
    /// No usable answer.
    TransportError(TransportCause),
}

impl RemoteSessionResult {
    pub fn found(
        user_id: impl Into<UserId>,
        name: impl Into<String>,
        email: impl Into<String>,
    ) -> Self {
        Self::Found {
            user_id: user_id.into(),
            name: name.into(),
            email: email.into(),
        }
    }

    /// Short label for log fields.
    pub fn label(&self) -> &'static str {
        match self {
            Self::Found { .. } => "found",
            Self::NotFound => "not_found",
            Self::NoSessionError => "no_session",
            Self::TransportError(_) => "transport_error",
        }
    }
}

/// The single action taken for a request cycle.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "decision", rename_all = "snake_case")]
pub enum SyncDecision {
    NoOp,
    LoginAs {
        user_id: UserId,
        name: String,
        email: String,
    },
    Logout,
    ClearToken,
}

impl SyncDecision {
    /// Short label for log fields.
    pub fn label(&self) -> &'static str {
        match self {
            Self::NoOp => "no_op",
            Self::LoginAs { .. } => "login_as",
            Self::Logout => "logout",
            Self::ClearToken => "clear_token",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn numeric_and_string_ids_compare_equal() {
        assert_eq!(UserId::from(42_u64), UserId::from("42"));
        assert_eq!(UserId::from(42_u64).to_string(), "42");
    }

    #[test]
    fn transport_cause_display() {
        let cause = TransportCause::new(TransportKind::Status(502), "bad gateway");
        assert_eq!(cause.to_string(), "HTTP 502: bad gateway");

        let cause = TransportCause::new(TransportKind::Timeout, "after 5s");
        assert_eq!(cause.to_string(), "timeout: after 5s");
    }

    #[test]
    fn decision_serializes_with_tag() {
        let decision = SyncDecision::LoginAs {
            user_id: UserId::from(7_u64),
            name: "B".to_string(),
            email: "b@x".to_string(),
        };
        let json = serde_json::to_value(&decision).unwrap();
        assert_eq!(json["decision"], "login_as");
        assert_eq!(json["user_id"], "7");
    }
}
