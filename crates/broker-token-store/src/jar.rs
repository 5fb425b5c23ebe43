//! Cookie jar abstraction.

use crate::Cookie;
use std::collections::HashMap;
use tracing::debug;

/// Request/response cookie access for one request cycle.
///
/// `get` must observe cookies queued earlier in the same cycle, so that a
/// value written on the response is what later readers see.
pub trait CookieJar {
    /// Current value of a cookie, or `None` if absent or queued for removal.
    fn get(&self, name: &str) -> Option<String>;

    /// Queue a cookie on the response, replacing any earlier one with the same name.
    fn queue(&mut self, cookie: Cookie);
}

/// Cookie jar backed by the inbound `Cookie` header and an outbound queue.
#[derive(Debug, Clone, Default)]
pub struct MemoryCookieJar {
    incoming: HashMap<String, String>,
    queued: Vec<Cookie>,
}

impl MemoryCookieJar {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse the value of an inbound `Cookie` header (`a=1; b=2`).
    /// Malformed pairs are skipped.
    pub fn from_header(header: &str) -> Self {
        let incoming = cookie::Cookie::split_parse(header)
            .filter_map(|parsed| match parsed {
                Ok(c) => Some((
                    c.name().to_string(),
                    c.value().trim_matches('"').to_string(),
                )),
                Err(e) => {
                    debug!("ignoring malformed cookie: {e}");
                    None
                }
            })
            .collect();

        Self {
            incoming,
            queued: Vec::new(),
        }
    }

    /// Add an inbound cookie.
    pub fn with_cookie(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.incoming.insert(name.into(), value.into());
        self
    }

    /// Cookies queued for the response, in queue order.
    pub fn pending(&self) -> &[Cookie] {
        &self.queued
    }

    /// Rendered `Set-Cookie` header values for the response.
    pub fn set_cookie_headers(&self) -> Vec<String> {
        self.queued.iter().map(Cookie::to_header_value).collect()
    }
}

impl CookieJar for MemoryCookieJar {
    fn get(&self, name: &str) -> Option<String> {
        if let Some(cookie) = self.queued.iter().rev().find(|c| c.name == name) {
            return (!cookie.is_removal()).then(|| cookie.value.clone());
        }
        self.incoming.get(name).cloned()
    }

    fn queue(&mut self, cookie: Cookie) {
        self.queued.retain(|c| c.name != cookie.name);
        self.queued.push(cookie);
    }
}
