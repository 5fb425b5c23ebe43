//! Broker token minting and cookie lifecycle.

use crate::{Cookie, CookieJar, SameSite};
use broker_config_and_utils::{mask_secret, CookieConfig};
use rand::rngs::OsRng;
use rand::RngCore;
use std::fmt;
use tracing::debug;

/// Random bytes per token (256 bits).
pub const TOKEN_BYTES: usize = 32;

/// Name of the cookie holding the broker token for `broker_name`.
pub fn cookie_name(broker_name: &str) -> String {
    format!("sso_token_{}", broker_name)
}

/// Opaque per-browser token correlating the local cookie with the remote session.
///
/// `Display` and `Debug` only show a prefix; use [`BrokerToken::as_str`] for the
/// raw value.
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct BrokerToken(String);

impl BrokerToken {
    /// Wrap an existing token value (e.g. read from a cookie).
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    /// Mint a fresh token from the OS CSPRNG.
    pub fn generate() -> Self {
        let mut bytes = [0u8; TOKEN_BYTES];
        OsRng.fill_bytes(&mut bytes);
        Self(hex::encode(bytes))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Masked form for log fields.
    pub fn masked(&self) -> String {
        mask_secret(&self.0)
    }

    /// Tokens only ever contain ASCII alphanumerics; anything else was not
    /// minted by a broker and is discarded.
    fn is_well_formed(value: &str) -> bool {
        !value.is_empty() && value.chars().all(|c| c.is_ascii_alphanumeric())
    }
}

impl fmt::Display for BrokerToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.masked())
    }
}

impl fmt::Debug for BrokerToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("BrokerToken").field(&self.masked()).finish()
    }
}

/// Reads, mints and clears the broker token cookie.
#[derive(Debug, Clone, Default)]
pub struct TokenStore {
    cookie: CookieConfig,
}

impl TokenStore {
    pub fn new(cookie: CookieConfig) -> Self {
        Self { cookie }
    }

    /// The token currently held by the browser, if any.
    pub fn get(&self, jar: &impl CookieJar, broker_name: &str) -> Option<BrokerToken> {
        let name = cookie_name(broker_name);
        let value = jar.get(&name)?;
        if BrokerToken::is_well_formed(&value) {
            Some(BrokerToken(value))
        } else {
            debug!(broker = broker_name, "Ignoring malformed broker token cookie");
            None
        }
    }

    /// Return the browser's token, minting and queueing a new one if absent.
    ///
    /// Idempotent within one jar: the queued cookie is seen by later calls.
    pub fn get_or_create(&self, jar: &mut impl CookieJar, broker_name: &str) -> BrokerToken {
        if let Some(token) = self.get(jar, broker_name) {
            return token;
        }

        let token = BrokerToken::generate();
        jar.queue(self.token_cookie(broker_name, &token));
        debug!(
            broker = broker_name,
            token_hint = %token.masked(),
            "Minted new broker token"
        );
        token
    }

    /// Queue removal of the broker token cookie.
    ///
    /// The removal carries the same attributes as the token cookie; browsers
    /// drop `Secure` cookies sent from plain-http origins.
    pub fn clear(&self, jar: &mut impl CookieJar, broker_name: &str) {
        let mut removal = Cookie::removal(
            cookie_name(broker_name),
            self.cookie.path.clone(),
            self.cookie.domain.clone(),
        );
        removal.secure = self.cookie.secure;
        removal.http_only = self.cookie.http_only;
        jar.queue(removal);
        debug!(broker = broker_name, "Queued broker token cookie removal");
    }

    fn token_cookie(&self, broker_name: &str, token: &BrokerToken) -> Cookie {
        Cookie {
            name: cookie_name(broker_name),
            value: token.as_str().to_string(),
            path: self.cookie.path.clone(),
            domain: self.cookie.domain.clone(),
            // Max-Age=0 would delete the cookie it sets
            max_age: self.cookie.max_age_secs.filter(|secs| *secs > 0),
            secure: self.cookie.secure,
            http_only: self.cookie.http_only,
            same_site: SameSite::Lax,
        }
    }
}
