//! The per-request sync cycle.

use crate::{SsoError, SsoResult, SyncOutcome, SyncReport};
use auth_gateway::AuthGateway;
use broker_client::{BrokerClient, BrokerResult, SessionQuery};
use broker_config_and_utils::Config;
use broker_token_store::{CookieJar, TokenStore};
use session_sync_policy::{decide, RemoteSessionResult, SyncDecision, UserAttrs};
use std::future::{pending, Future};
use tracing::{debug, error, info, warn};

/// Keeps the local login state of one broker in step with the SSO server.
pub struct SsoAutoLogin<Q, G> {
    query: Q,
    gateway: G,
    token_store: TokenStore,
    broker_name: String,
}

impl<G: AuthGateway> SsoAutoLogin<BrokerClient, G> {
    /// Build an auto-login that talks to the SSO server described by `config`.
    pub fn from_config(config: &Config, gateway: G) -> BrokerResult<Self> {
        let client = BrokerClient::new(config)?;
        Ok(Self::new(
            client,
            gateway,
            TokenStore::new(config.cookie.clone()),
            config.broker_name.clone(),
        ))
    }
}

impl<Q: SessionQuery, G: AuthGateway> SsoAutoLogin<Q, G> {
    pub fn new(
        query: Q,
        gateway: G,
        token_store: TokenStore,
        broker_name: impl Into<String>,
    ) -> Self {
        Self {
            query,
            gateway,
            token_store,
            broker_name: broker_name.into(),
        }
    }

    pub fn broker_name(&self) -> &str {
        &self.broker_name
    }

    pub fn query(&self) -> &Q {
        &self.query
    }

    pub fn gateway(&self) -> &G {
        &self.gateway
    }

    /// Run one sync cycle for the request at `full_url`.
    ///
    /// Cookie changes are queued on `jar`; the host copies them onto the
    /// response whatever the outcome.
    pub async fn handle(&self, full_url: &str, jar: &mut impl CookieJar) -> SsoResult<SyncOutcome> {
        self.report(full_url, jar).await.map(|report| report.outcome)
    }

    /// Like [`handle`](Self::handle), but gives up as soon as `cancelled`
    /// resolves while the SSO server has not answered yet. Nothing is applied
    /// to the local session in that case.
    pub async fn handle_until<F>(
        &self,
        full_url: &str,
        jar: &mut impl CookieJar,
        cancelled: F,
    ) -> SsoResult<SyncOutcome>
    where
        F: Future<Output = ()>,
    {
        self.run(full_url, jar, cancelled)
            .await
            .map(|report| report.outcome)
    }

    /// Run one sync cycle and describe what happened.
    pub async fn report(&self, full_url: &str, jar: &mut impl CookieJar) -> SsoResult<SyncReport> {
        self.run(full_url, jar, pending()).await
    }

    async fn run<F>(&self, full_url: &str, jar: &mut impl CookieJar, cancelled: F) -> SsoResult<SyncReport>
    where
        F: Future<Output = ()>,
    {
        let token_minted = self.token_store.get(&*jar, &self.broker_name).is_none();
        let token = self.token_store.get_or_create(jar, &self.broker_name);
        let token_hint = token.masked();

        let remote = tokio::select! {
            biased;
            _ = cancelled => {
                debug!(
                    broker = %self.broker_name,
                    token_hint = %token_hint,
                    "Request cancelled during SSO query"
                );
                return Err(SsoError::Cancelled);
            }
            remote = self.query.query_user_info(&token) => remote,
        };

        let local = self.gateway.current_state().await;
        let decision = decide(&local, &remote);
        if let RemoteSessionResult::TransportError(cause) = &remote {
            warn!(
                broker = %self.broker_name,
                token_hint = %token_hint,
                cause = %cause,
                "SSO server gave no usable answer, keeping local session"
            );
        }
        debug!(
            broker = %self.broker_name,
            token_hint = %token_hint,
            remote = remote.label(),
            decision = decision.label(),
            "SSO sync decision"
        );

        let outcome = self
            .apply(&decision, full_url, jar, &token_hint, token_minted)
            .await?;

        Ok(SyncReport {
            decision,
            outcome,
            token_hint,
            token_minted,
        })
    }

    async fn apply(
        &self,
        decision: &SyncDecision,
        full_url: &str,
        jar: &mut impl CookieJar,
        token_hint: &str,
        token_minted: bool,
    ) -> SsoResult<SyncOutcome> {
        match decision {
            SyncDecision::NoOp => Ok(SyncOutcome::Continue),
            SyncDecision::LoginAs {
                user_id,
                name,
                email,
            } => {
                let attrs = UserAttrs::new(name.clone(), email.clone());
                if let Err(e) = self.gateway.login_as(user_id, &attrs).await {
                    error!(
                        broker = %self.broker_name,
                        token_hint = %token_hint,
                        user_id = %user_id,
                        error = %e,
                        "Local login of SSO user failed"
                    );
                    return Err(SsoError::PolicyViolation(e));
                }
                info!(
                    broker = %self.broker_name,
                    user_id = %user_id,
                    "Logged in from SSO session"
                );
                Ok(SyncOutcome::Continue)
            }
            SyncDecision::Logout => {
                self.gateway.logout().await;
                info!(
                    broker = %self.broker_name,
                    token_hint = %token_hint,
                    "SSO session ended, logged out locally"
                );
                Ok(SyncOutcome::Redirect {
                    location: full_url.to_string(),
                })
            }
            SyncDecision::ClearToken if token_minted => {
                // reloading would mint another unattached token and loop
                self.token_store.clear(jar, &self.broker_name);
                warn!(
                    broker = %self.broker_name,
                    token_hint = %token_hint,
                    "Fresh broker token is not attached at the SSO server, send the browser through the attach URL"
                );
                Ok(SyncOutcome::Continue)
            }
            SyncDecision::ClearToken => {
                self.token_store.clear(jar, &self.broker_name);
                info!(
                    broker = %self.broker_name,
                    token_hint = %token_hint,
                    "SSO server lost the broker session, resetting token"
                );
                Ok(SyncOutcome::Redirect {
                    location: full_url.to_string(),
                })
            }
        }
    }
}
