//! In-process user store and session guard.

use crate::{GatewayError, GatewayResult, SessionGuard, UserRecord, UserRepository};
use parking_lot::Mutex;
use session_sync_policy::{UserAttrs, UserId};
use std::collections::HashMap;

/// User store kept in a map.
#[derive(Debug)]
pub struct MemoryUserRepository<R> {
    users: Mutex<HashMap<UserId, R>>,
    write_failure: Mutex<Option<String>>,
}

impl<R: UserRecord> MemoryUserRepository<R> {
    pub fn new() -> Self {
        Self {
            users: Mutex::new(HashMap::new()),
            write_failure: Mutex::new(None),
        }
    }

    /// Make every following upsert fail with `reason`.
    pub fn fail_writes(&self, reason: impl Into<String>) {
        *self.write_failure.lock() = Some(reason.into());
    }

    pub fn len(&self) -> usize {
        self.users.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.users.lock().is_empty()
    }
}

impl<R: UserRecord> Default for MemoryUserRepository<R> {
    fn default() -> Self {
        Self::new()
    }
}

impl<R: UserRecord> UserRepository<R> for MemoryUserRepository<R> {
    fn update_or_create(&self, id: &UserId, attrs: &UserAttrs) -> GatewayResult<R> {
        if let Some(reason) = self.write_failure.lock().clone() {
            return Err(GatewayError::Repository(reason));
        }

        let mut users = self.users.lock();
        let record = users
            .entry(id.clone())
            .and_modify(|record| record.apply(attrs))
            .or_insert_with(|| R::from_remote(id, attrs));
        Ok(record.clone())
    }

    fn find(&self, id: &UserId) -> GatewayResult<Option<R>> {
        Ok(self.users.lock().get(id).cloned())
    }
}

/// Session guard holding one logged-in user id.
///
/// Every successful login is also recorded, in order.
#[derive(Debug, Default)]
pub struct MemorySessionGuard {
    current: Mutex<Option<UserId>>,
    logins: Mutex<Vec<UserId>>,
    login_failure: Mutex<Option<String>>,
}

impl MemorySessionGuard {
    pub fn new() -> Self {
        Self::default()
    }

    /// A guard that already has `user_id` logged in.
    pub fn logged_in(user_id: impl Into<UserId>) -> Self {
        Self {
            current: Mutex::new(Some(user_id.into())),
            ..Self::default()
        }
    }

    /// Make every following login fail with `reason`.
    pub fn fail_logins(&self, reason: impl Into<String>) {
        *self.login_failure.lock() = Some(reason.into());
    }

    pub fn logins(&self) -> Vec<UserId> {
        self.logins.lock().clone()
    }
}

impl SessionGuard for MemorySessionGuard {
    fn current_user_id(&self) -> Option<UserId> {
        self.current.lock().clone()
    }

    fn login_using_id(&self, id: &UserId) -> GatewayResult<()> {
        if let Some(reason) = self.login_failure.lock().clone() {
            return Err(GatewayError::Session(reason));
        }
        *self.current.lock() = Some(id.clone());
        self.logins.lock().push(id.clone());
        Ok(())
    }

    fn logout(&self) {
        *self.current.lock() = None;
    }
}
