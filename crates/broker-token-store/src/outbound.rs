//! Outbound cookies and their `Set-Cookie` rendering.

use cookie::time::{Duration, OffsetDateTime};
use cookie::SameSite;

/// A cookie queued for the response.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Cookie {
    pub name: String,
    pub value: String,
    pub path: String,
    pub domain: Option<String>,
    /// Seconds until expiry. `Some(0)` deletes the cookie, `None` keeps it
    /// for the browser session.
    pub max_age: Option<u64>,
    pub secure: bool,
    pub http_only: bool,
    pub same_site: SameSite,
}

impl Cookie {
    /// A cookie with `Path=/`, `Secure`, `HttpOnly` and `SameSite=Lax`.
    pub fn new(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
            path: "/".to_string(),
            domain: None,
            max_age: None,
            secure: true,
            http_only: true,
            same_site: SameSite::Lax,
        }
    }

    /// A cookie that makes the browser drop `name` for the given path and domain.
    ///
    /// The browser only removes a cookie whose path and domain match the
    /// original, so both are carried over.
    pub fn removal(name: impl Into<String>, path: impl Into<String>, domain: Option<String>) -> Self {
        Self {
            path: path.into(),
            domain,
            max_age: Some(0),
            ..Self::new(name, "")
        }
    }

    pub fn is_removal(&self) -> bool {
        self.max_age == Some(0)
    }

    /// Render the value of a `Set-Cookie` header.
    pub fn to_header_value(&self) -> String {
        let mut builder = cookie::Cookie::build((self.name.clone(), self.value.clone()))
            .path(self.path.clone())
            .secure(self.secure)
            .http_only(self.http_only)
            .same_site(self.same_site);
        if let Some(domain) = &self.domain {
            builder = builder.domain(domain.clone());
        }
        if let Some(max_age) = self.max_age {
            let seconds = i64::try_from(max_age).unwrap_or(i64::MAX);
            builder = builder.max_age(Duration::seconds(seconds));
            if max_age == 0 {
                // older clients ignore Max-Age
                builder = builder.expires(OffsetDateTime::UNIX_EPOCH);
            }
        }
        builder.build().to_string()
    }
}
