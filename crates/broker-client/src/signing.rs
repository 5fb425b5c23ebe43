//! Keyed derivation of broker session ids.
//!
//! The SSO server holds the same shared secret, so it can recompute these
//! values and verify that a request was issued by the named broker without a
//! per-request secret exchange.

use hmac::{Hmac, Mac};
use sha2::Sha256;

type HmacSha256 = Hmac<Sha256>;

/// Session id sent as the bearer credential on every server command:
/// `SSO-<broker>-<token>-<hmac>`.
pub fn session_id(broker_name: &str, token: &str, secret: &str) -> String {
    let checksum = sign(secret, &["session", broker_name, token]);
    format!("SSO-{}-{}-{}", broker_name, token, checksum)
}

/// Checksum proving an attach redirect was issued by `broker_name`.
pub fn attach_checksum(broker_name: &str, token: &str, secret: &str) -> String {
    sign(secret, &["attach", broker_name, token])
}

/// Hex HMAC-SHA256 of the parts joined with ':'.
fn sign(secret: &str, parts: &[&str]) -> String {
    let mut mac = <HmacSha256 as Mac>::new_from_slice(secret.as_bytes())
        .expect("HMAC can take key of any size");
    mac.update(parts.join(":").as_bytes());
    hex::encode(mac.finalize().into_bytes())
}
