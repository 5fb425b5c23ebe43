//! The gateway trait and its repository-backed implementation.

use crate::{GatewayResult, UserRecord};
use async_trait::async_trait;
use session_sync_policy::{LocalAuthState, UserAttrs, UserId};
use std::marker::PhantomData;
use tracing::{debug, info, warn};

/// Local login state as seen by the SSO auto-login.
#[async_trait]
pub trait AuthGateway: Send + Sync {
    /// Who is logged in for the current request.
    async fn current_state(&self) -> LocalAuthState;

    /// Create or refresh the local user for `user_id` and log them in.
    async fn login_as(&self, user_id: &UserId, attrs: &UserAttrs) -> GatewayResult<()>;

    /// End the local session. Logging out a guest does nothing.
    async fn logout(&self);
}

/// Storage for local user records.
pub trait UserRepository<R: UserRecord>: Send + Sync {
    /// Insert a record for `id`, or overwrite the attributes of the existing one.
    fn update_or_create(&self, id: &UserId, attrs: &UserAttrs) -> GatewayResult<R>;

    fn find(&self, id: &UserId) -> GatewayResult<Option<R>>;
}

/// Per-request session state of the local application.
pub trait SessionGuard: Send + Sync {
    fn current_user_id(&self) -> Option<UserId>;

    fn login_using_id(&self, id: &UserId) -> GatewayResult<()>;

    fn logout(&self);
}

/// [`AuthGateway`] over a [`UserRepository`] and a [`SessionGuard`].
pub struct RepositoryAuthGateway<R, Repo, Guard> {
    repository: Repo,
    guard: Guard,
    _record: PhantomData<fn() -> R>,
}

impl<R, Repo, Guard> RepositoryAuthGateway<R, Repo, Guard>
where
    R: UserRecord,
    Repo: UserRepository<R>,
    Guard: SessionGuard,
{
    pub fn new(repository: Repo, guard: Guard) -> Self {
        Self {
            repository,
            guard,
            _record: PhantomData,
        }
    }

    pub fn repository(&self) -> &Repo {
        &self.repository
    }

    pub fn guard(&self) -> &Guard {
        &self.guard
    }
}

#[async_trait]
impl<R, Repo, Guard> AuthGateway for RepositoryAuthGateway<R, Repo, Guard>
where
    R: UserRecord,
    Repo: UserRepository<R>,
    Guard: SessionGuard,
{
    async fn current_state(&self) -> LocalAuthState {
        match self.guard.current_user_id() {
            Some(user_id) => LocalAuthState::Authenticated { user_id },
            None => LocalAuthState::Guest,
        }
    }

    async fn login_as(&self, user_id: &UserId, attrs: &UserAttrs) -> GatewayResult<()> {
        let record = self.repository.update_or_create(user_id, attrs).map_err(|e| {
            warn!(user_id = %user_id, error = %e, "Failed to upsert SSO user");
            e
        })?;
        debug!(user_id = %record.id(), "Upserted SSO user");

        self.guard.login_using_id(record.id())?;
        info!(user_id = %record.id(), "Logged in SSO user");
        Ok(())
    }

    async fn logout(&self) {
        if let Some(user_id) = self.guard.current_user_id() {
            self.guard.logout();
            info!(user_id = %user_id, "Logged out local user");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{BasicUser, GatewayError, MemorySessionGuard, MemoryUserRepository};

    fn gateway() -> RepositoryAuthGateway<BasicUser, MemoryUserRepository<BasicUser>, MemorySessionGuard>
    {
        RepositoryAuthGateway::new(MemoryUserRepository::new(), MemorySessionGuard::new())
    }

    #[tokio::test]
    async fn login_creates_user_and_session() {
        let gateway = gateway();
        assert_eq!(gateway.current_state().await, LocalAuthState::Guest);

        let id = UserId::from(42_u64);
        gateway
            .login_as(&id, &UserAttrs::new("Alice", "a@x.com"))
            .await
            .unwrap();

        assert_eq!(
            gateway.current_state().await,
            LocalAuthState::authenticated(42_u64)
        );
        let stored = gateway.repository().find(&id).unwrap().unwrap();
        assert_eq!(stored.name, "Alice");
        assert_eq!(stored.email, "a@x.com");
    }

    #[tokio::test]
    async fn login_refreshes_existing_user() {
        let gateway = gateway();
        let id = UserId::from(42_u64);
        gateway
            .login_as(&id, &UserAttrs::new("Alice", "a@x.com"))
            .await
            .unwrap();
        gateway
            .login_as(&id, &UserAttrs::new("Alice B", "alice@x.com"))
            .await
            .unwrap();

        assert_eq!(gateway.repository().len(), 1);
        let stored = gateway.repository().find(&id).unwrap().unwrap();
        assert_eq!(stored.name, "Alice B");
        assert_eq!(gateway.guard().logins(), vec![id.clone(), id]);
    }

    #[tokio::test]
    async fn failed_upsert_leaves_session_untouched() {
        let gateway = gateway();
        gateway.repository().fail_writes("email already taken");

        let err = gateway
            .login_as(&UserId::from(1_u64), &UserAttrs::new("A", "a@x"))
            .await
            .unwrap_err();

        assert_eq!(err, GatewayError::Repository("email already taken".to_string()));
        assert_eq!(gateway.current_state().await, LocalAuthState::Guest);
        assert!(gateway.guard().logins().is_empty());
    }

    #[tokio::test]
    async fn logout_ends_session() {
        let gateway = gateway();
        gateway
            .login_as(&UserId::from(3_u64), &UserAttrs::new("C", "c@x"))
            .await
            .unwrap();

        gateway.logout().await;
        assert_eq!(gateway.current_state().await, LocalAuthState::Guest);

        // logging out a guest is harmless
        gateway.logout().await;
        assert_eq!(gateway.current_state().await, LocalAuthState::Guest);
    }
}
