//! HTTP client for SSO server commands.

use crate::error::{BrokerError, BrokerResult};
use crate::response::classify_response;
use crate::signing::{attach_checksum, session_id};
use async_trait::async_trait;
use broker_config_and_utils::{Config, UserModelMapping, REDACTED_PLACEHOLDER};
use broker_token_store::BrokerToken;
use reqwest::header::ACCEPT;
use session_sync_policy::{RemoteSessionResult, TransportCause, TransportKind};
use std::collections::hash_map::DefaultHasher;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::time::Duration;
use tracing::{debug, info, warn};
use url::Url;

/// Asks the SSO server which user is attached to a broker token.
#[async_trait]
pub trait SessionQuery: Send + Sync {
    async fn query_user_info(&self, token: &BrokerToken) -> RemoteSessionResult;
}

fn summarize_response_body(body: &str) -> String {
    let mut hasher = DefaultHasher::new();
    body.hash(&mut hasher);
    format!("len={},digest={:016x}", body.len(), hasher.finish())
}

/// SSO server client bound to one broker identity.
///
/// Requests carry the broker session id as a bearer credential. There is no
/// retry: a failed user-info query is reported once and the next request
/// cycle asks again.
#[derive(Clone)]
pub struct BrokerClient {
    http_client: reqwest::Client,
    server_url: Url,
    broker_name: String,
    secret: String,
    model: UserModelMapping,
    no_session_marker: String,
    timeout: Duration,
}

impl fmt::Debug for BrokerClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BrokerClient")
            .field("server_url", &self.server_url.as_str())
            .field("broker_name", &self.broker_name)
            .field("secret", &REDACTED_PLACEHOLDER)
            .field("timeout", &self.timeout)
            .finish()
    }
}

impl BrokerClient {
    /// Create a client from a validated configuration.
    pub fn new(config: &Config) -> BrokerResult<Self> {
        let server_url = Url::parse(&config.server_url)?;
        if server_url.cannot_be_a_base() {
            return Err(BrokerError::Config(format!(
                "server_url '{}' cannot carry a path",
                config.server_url
            )));
        }

        let timeout = config.request_timeout();
        let http_client = reqwest::Client::builder()
            .timeout(timeout)
            .connect_timeout(timeout)
            .build()?;

        Ok(Self {
            http_client,
            server_url,
            broker_name: config.broker_name.clone(),
            secret: config.secret.clone(),
            model: config.model.clone(),
            no_session_marker: config.no_session_marker.clone(),
            timeout,
        })
    }

    pub fn broker_name(&self) -> &str {
        &self.broker_name
    }

    /// Build `<server>/api/sso/<command>`, keeping any base path of the server URL.
    fn command_url(&self, command: &str) -> Url {
        let mut url = self.server_url.clone();
        // cannot-be-a-base URLs are rejected in `new`
        if let Ok(mut segments) = url.path_segments_mut() {
            segments.pop_if_empty().extend(["api", "sso", command]);
        }
        url.set_query(None);
        url
    }

    /// Broker session id for a token.
    pub fn session_id(&self, token: &BrokerToken) -> String {
        session_id(&self.broker_name, token.as_str(), &self.secret)
    }

    /// URL the browser is sent to so the server binds `token` to its session,
    /// returning afterwards to `return_url`.
    pub fn attach_url(&self, token: &BrokerToken, return_url: &str) -> Url {
        let checksum = attach_checksum(&self.broker_name, token.as_str(), &self.secret);
        let mut url = self.command_url("attach");
        url.query_pairs_mut()
            .append_pair("broker", &self.broker_name)
            .append_pair("token", token.as_str())
            .append_pair("checksum", &checksum)
            .append_pair("return_url", return_url);
        url
    }

    /// Ask the server which user is logged in for `token`.
    pub async fn query_user_info(&self, token: &BrokerToken) -> RemoteSessionResult {
        let url = self.command_url("userInfo");
        debug!(
            broker = %self.broker_name,
            token_hint = %token.masked(),
            "Querying SSO user info"
        );

        let response = match self
            .http_client
            .post(url)
            .bearer_auth(self.session_id(token))
            .header(ACCEPT, "application/json")
            .send()
            .await
        {
            Ok(response) => response,
            Err(err) => return self.transport_failure(token, &err),
        };

        let status = response.status().as_u16();
        let body = match response.text().await {
            Ok(body) => body,
            Err(err) => return self.transport_failure(token, &err),
        };

        let result = classify_response(status, &body, &self.model, &self.no_session_marker);
        match &result {
            RemoteSessionResult::TransportError(cause) => warn!(
                broker = %self.broker_name,
                token_hint = %token.masked(),
                status,
                body_summary = %summarize_response_body(&body),
                cause = %cause,
                "SSO user info query failed"
            ),
            RemoteSessionResult::NoSessionError => info!(
                broker = %self.broker_name,
                token_hint = %token.masked(),
                "SSO server has no session for broker token"
            ),
            other => debug!(
                broker = %self.broker_name,
                token_hint = %token.masked(),
                result = other.label(),
                "SSO user info received"
            ),
        }
        result
    }

    fn transport_failure(&self, token: &BrokerToken, err: &reqwest::Error) -> RemoteSessionResult {
        let kind = if err.is_timeout() {
            TransportKind::Timeout
        } else {
            TransportKind::Network
        };
        warn!(
            broker = %self.broker_name,
            token_hint = %token.masked(),
            timeout_secs = self.timeout.as_secs(),
            error = %err,
            "SSO server unreachable"
        );
        RemoteSessionResult::TransportError(TransportCause::new(kind, err.to_string()))
    }

    /// End the server-side session attached to `token`.
    pub async fn logout(&self, token: &BrokerToken) -> BrokerResult<()> {
        let response = self
            .http_client
            .post(self.command_url("logout"))
            .bearer_auth(self.session_id(token))
            .header(ACCEPT, "application/json")
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status().as_u16();
            let body = response.text().await.unwrap_or_default();
            let body_summary = summarize_response_body(&body);
            warn!(
                broker = %self.broker_name,
                token_hint = %token.masked(),
                status,
                body_summary = %body_summary,
                "SSO logout failed"
            );
            return Err(BrokerError::Server {
                status,
                message: body_summary,
            });
        }

        info!(
            broker = %self.broker_name,
            token_hint = %token.masked(),
            "SSO session logged out"
        );
        Ok(())
    }
}

#[async_trait]
impl SessionQuery for BrokerClient {
    async fn query_user_info(&self, token: &BrokerToken) -> RemoteSessionResult {
        BrokerClient::query_user_info(self, token).await
    }
}
