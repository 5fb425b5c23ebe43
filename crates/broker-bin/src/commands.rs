//! Subcommand implementations.

use auth_gateway::{BasicUser, MemorySessionGuard, MemoryUserRepository, RepositoryAuthGateway};
use broker_client::BrokerClient;
use broker_config_and_utils::Config;
use broker_token_store::{BrokerToken, MemoryCookieJar};
use session_sync_policy::UserId;
use sso_auto_login::SsoAutoLogin;
use tracing::info;

type CommandResult = Result<(), Box<dyn std::error::Error>>;

/// Run one sync cycle against an in-memory local session and print the report
/// followed by the `Set-Cookie` headers the response would carry.
pub async fn check(
    config: &Config,
    cookie_header: &str,
    full_url: &str,
    logged_in_as: Option<String>,
) -> CommandResult {
    let guard = match logged_in_as {
        Some(id) => MemorySessionGuard::logged_in(UserId::new(id)),
        None => MemorySessionGuard::new(),
    };
    let gateway: RepositoryAuthGateway<BasicUser, _, _> =
        RepositoryAuthGateway::new(MemoryUserRepository::new(), guard);
    let sso = SsoAutoLogin::from_config(config, gateway)?;

    let mut jar = MemoryCookieJar::from_header(cookie_header);
    let report = sso.report(full_url, &mut jar).await?;
    info!(
        broker = %config.broker_name,
        decision = report.decision.label(),
        "Sync cycle finished"
    );

    println!("{}", serde_json::to_string_pretty(&report)?);
    for header in jar.set_cookie_headers() {
        println!("Set-Cookie: {}", header);
    }
    Ok(())
}

pub fn session_id(config: &Config, token: &str) -> CommandResult {
    let client = BrokerClient::new(config)?;
    println!("{}", client.session_id(&BrokerToken::new(token)));
    Ok(())
}

pub fn attach_url(config: &Config, token: &str, return_url: &str) -> CommandResult {
    let client = BrokerClient::new(config)?;
    println!("{}", client.attach_url(&BrokerToken::new(token), return_url));
    Ok(())
}

pub async fn logout(config: &Config, token: &str) -> CommandResult {
    let client = BrokerClient::new(config)?;
    client.logout(&BrokerToken::new(token)).await?;
    println!("Logged out SSO session for broker '{}'", client.broker_name());
    Ok(())
}
