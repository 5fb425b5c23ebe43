//! Broker token storage for the SSO broker.
//!
//! This crate provides:
//! - [`Cookie`] with `Set-Cookie` rendering, including proper removal cookies
//! - The [`CookieJar`] abstraction and an in-memory implementation
//! - [`TokenStore`], which mints and clears the `sso_token_<broker>` cookie

mod jar;
mod outbound;
mod store;

pub use cookie::SameSite;
pub use jar::{CookieJar, MemoryCookieJar};
pub use outbound::Cookie;
pub use store::{cookie_name, BrokerToken, TokenStore, TOKEN_BYTES};
