//! Local user records.

use session_sync_policy::{UserAttrs, UserId};

/// A local user row keyed by the SSO server's user id.
pub trait UserRecord: Clone + Send + Sync + 'static {
    /// Build a new record for a user first seen on the SSO server.
    fn from_remote(id: &UserId, attrs: &UserAttrs) -> Self;

    /// Overwrite the synced attributes with the server's current values.
    fn apply(&mut self, attrs: &UserAttrs);

    fn id(&self) -> &UserId;
}

/// Minimal record holding only the synced attributes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BasicUser {
    pub id: UserId,
    pub name: String,
    pub email: String,
}

impl UserRecord for BasicUser {
    fn from_remote(id: &UserId, attrs: &UserAttrs) -> Self {
        Self {
            id: id.clone(),
            name: attrs.name.clone(),
            email: attrs.email.clone(),
        }
    }

    fn apply(&mut self, attrs: &UserAttrs) {
        self.name = attrs.name.clone();
        self.email = attrs.email.clone();
    }

    fn id(&self) -> &UserId {
        &self.id
    }
}
