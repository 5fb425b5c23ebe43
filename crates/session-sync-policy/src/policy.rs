//! Decision table for keeping local login state in step with the SSO server.

use crate::{LocalAuthState, RemoteSessionResult, SyncDecision, UserId};

/// Decide what to do with the local session given the server's answer.
///
/// Rules, first match wins:
///
/// 1. server has no logged-in user, local is authenticated: log out
/// 2. server does not know the broker session: clear the token cookie
/// 3. server has a user that differs from the local one (or local is a
///    guest): log in as that user
/// 4. anything else, including transport failures: leave local state alone
pub fn decide(local: &LocalAuthState, remote: &RemoteSessionResult) -> SyncDecision {
    match (local, remote) {
        (LocalAuthState::Authenticated { .. }, RemoteSessionResult::NotFound) => {
            SyncDecision::Logout
        }
        (_, RemoteSessionResult::NoSessionError) => SyncDecision::ClearToken,
        (
            local,
            RemoteSessionResult::Found {
                user_id,
                name,
                email,
            },
        ) if !is_logged_in_as(local, user_id) => SyncDecision::LoginAs {
            user_id: user_id.clone(),
            name: name.clone(),
            email: email.clone(),
        },
        // transport failures fail open
        _ => SyncDecision::NoOp,
    }
}

fn is_logged_in_as(local: &LocalAuthState, remote_id: &UserId) -> bool {
    matches!(local, LocalAuthState::Authenticated { user_id } if user_id == remote_id)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{TransportCause, TransportKind, UserId};

    fn authenticated(id: u64) -> LocalAuthState {
        LocalAuthState::authenticated(id)
    }

    fn transport_error() -> RemoteSessionResult {
        RemoteSessionResult::TransportError(TransportCause::new(
            TransportKind::Network,
            "connection refused",
        ))
    }

    #[test]
    fn same_user_is_no_op() {
        let remote = RemoteSessionResult::found(5_u64, "A", "a@x");
        assert_eq!(decide(&authenticated(5), &remote), SyncDecision::NoOp);
    }

    #[test]
    fn different_user_switches_login() {
        let remote = RemoteSessionResult::found(7_u64, "B", "b@x");
        assert_eq!(
            decide(&authenticated(5), &remote),
            SyncDecision::LoginAs {
                user_id: UserId::from(7_u64),
                name: "B".to_string(),
                email: "b@x".to_string(),
            }
        );
    }

    #[test]
    fn guest_with_remote_user_logs_in() {
        let remote = RemoteSessionResult::found(42_u64, "Alice", "a@x.com");
        assert_eq!(
            decide(&LocalAuthState::Guest, &remote),
            SyncDecision::LoginAs {
                user_id: UserId::from(42_u64),
                name: "Alice".to_string(),
                email: "a@x.com".to_string(),
            }
        );
    }

    #[test]
    fn not_found_logs_out_only_authenticated_users() {
        assert_eq!(
            decide(&LocalAuthState::Guest, &RemoteSessionResult::NotFound),
            SyncDecision::NoOp
        );
        assert_eq!(
            decide(&authenticated(5), &RemoteSessionResult::NotFound),
            SyncDecision::Logout
        );
    }

    #[test]
    fn no_session_error_always_clears_token() {
        for local in [LocalAuthState::Guest, authenticated(5), authenticated(9)] {
            assert_eq!(
                decide(&local, &RemoteSessionResult::NoSessionError),
                SyncDecision::ClearToken
            );
        }
    }

    #[test]
    fn transport_errors_fail_open() {
        assert_eq!(decide(&authenticated(5), &transport_error()), SyncDecision::NoOp);
        assert_eq!(
            decide(&LocalAuthState::Guest, &transport_error()),
            SyncDecision::NoOp
        );
    }

    #[test]
    fn decide_is_deterministic() {
        let locals = [LocalAuthState::Guest, authenticated(5), authenticated(7)];
        let remotes = [
            RemoteSessionResult::found(5_u64, "A", "a@x"),
            RemoteSessionResult::found(7_u64, "B", "b@x"),
            RemoteSessionResult::NotFound,
            RemoteSessionResult::NoSessionError,
            transport_error(),
        ];

        for local in &locals {
            for remote in &remotes {
                assert_eq!(decide(local, remote), decide(local, remote));
            }
        }
    }

    #[test]
    fn string_and_numeric_ids_match() {
        let remote = RemoteSessionResult::found("5", "A", "a@x");
        assert_eq!(decide(&authenticated(5), &remote), SyncDecision::NoOp);
    }
}
