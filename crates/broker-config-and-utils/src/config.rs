//! Broker configuration.

use crate::{parse_level, CoreError, CoreResult, REDACTED_PLACEHOLDER};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};
use std::time::Duration;
use url::Url;

/// Default log level.
pub const DEFAULT_LOG_LEVEL: &str = "info";

/// Error text the SSO server uses when it has no session for a broker session id.
/// Matched as a case-insensitive substring.
pub const DEFAULT_NO_SESSION_MARKER: &str = "no saved session data";

/// Upper bound for one round-trip to the SSO server.
pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 5;

/// Default path attribute for the broker token cookie.
pub const DEFAULT_COOKIE_PATH: &str = "/";

/// Names of the user fields inside the server's `data` object.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserModelMapping {
    #[serde(default = "default_id_field")]
    pub id_field: String,
    #[serde(default = "default_name_field")]
    pub name_field: String,
    #[serde(default = "default_email_field")]
    pub email_field: String,
}

fn default_id_field() -> String {
    "id".to_string()
}

fn default_name_field() -> String {
    "name".to_string()
}

fn default_email_field() -> String {
    "email".to_string()
}

impl Default for UserModelMapping {
    fn default() -> Self {
        Self {
            id_field: default_id_field(),
            name_field: default_name_field(),
            email_field: default_email_field(),
        }
    }
}

/// Attributes of the `sso_token_<broker>` cookie.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CookieConfig {
    #[serde(default = "default_cookie_path")]
    pub path: String,
    #[serde(default)]
    pub domain: Option<String>,
    #[serde(default = "default_true")]
    pub secure: bool,
    #[serde(default = "default_true")]
    pub http_only: bool,
    /// Session cookie when `None`.
    #[serde(default)]
    pub max_age_secs: Option<u64>,
}

fn default_cookie_path() -> String {
    DEFAULT_COOKIE_PATH.to_string()
}

fn default_true() -> bool {
    true
}

impl Default for CookieConfig {
    fn default() -> Self {
        Self {
            path: default_cookie_path(),
            domain: None,
            secure: true,
            http_only: true,
            max_age_secs: None,
        }
    }
}

/// Main broker configuration.
#[derive(Clone, Serialize, Deserialize)]
pub struct Config {
    /// Log level (trace, debug, info, warn, error).
    #[serde(default = "default_log_level")]
    pub log_level: String,
    /// Optional JSONL log file.
    #[serde(default)]
    pub log_file: Option<PathBuf>,
    /// Identifier of this broker at the SSO server.
    #[serde(default)]
    pub broker_name: String,
    /// Shared secret between this broker and the SSO server.
    #[serde(default)]
    pub secret: String,
    /// Base URL of the SSO server.
    #[serde(default)]
    pub server_url: String,
    /// Field names of the remote user object.
    #[serde(default)]
    pub model: UserModelMapping,
    /// Substring identifying the server's "no session" error.
    #[serde(default = "default_no_session_marker")]
    pub no_session_marker: String,
    /// Timeout for a single SSO server request, in seconds.
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,
    #[serde(default)]
    pub cookie: CookieConfig,
}

fn default_log_level() -> String {
    DEFAULT_LOG_LEVEL.to_string()
}

fn default_no_session_marker() -> String {
    DEFAULT_NO_SESSION_MARKER.to_string()
}

fn default_request_timeout_secs() -> u64 {
    DEFAULT_REQUEST_TIMEOUT_SECS
}

impl Default for Config {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
            log_file: None,
            broker_name: String::new(),
            secret: String::new(),
            server_url: String::new(),
            model: UserModelMapping::default(),
            no_session_marker: default_no_session_marker(),
            request_timeout_secs: DEFAULT_REQUEST_TIMEOUT_SECS,
            cookie: CookieConfig::default(),
        }
    }
}

// The shared secret must never show up in logs or panic messages.
impl fmt::Debug for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Config")
            .field("log_level", &self.log_level)
            .field("log_file", &self.log_file)
            .field("broker_name", &self.broker_name)
            .field("secret", &REDACTED_PLACEHOLDER)
            .field("server_url", &self.server_url)
            .field("model", &self.model)
            .field("no_session_marker", &self.no_session_marker)
            .field("request_timeout_secs", &self.request_timeout_secs)
            .field("cookie", &self.cookie)
            .finish()
    }
}

impl Config {
    /// Load configuration from an optional file, apply environment overrides
    /// and validate the result.
    pub fn load(path: Option<&Path>) -> CoreResult<Self> {
        let mut config = match path {
            Some(path) => Self::load_from_file(path)?,
            None => Self::default(),
        };
        config.load_from_env();
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from a specific file without validating it.
    pub fn load_from_file(path: &Path) -> CoreResult<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: Config = serde_json::from_str(&content)?;
        Ok(config)
    }

    /// Save configuration to a file.
    pub fn save(&self, path: &Path) -> CoreResult<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content = serde_json::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }

    /// Override configuration from `SSO_*` environment variables.
    fn load_from_env(&mut self) {
        self.apply_overrides(|name| std::env::var(name).ok());
    }

    fn apply_overrides(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        let lookup = |name: &str| lookup(name).filter(|value| !value.trim().is_empty());

        if let Some(log_level) = lookup("SSO_LOG_LEVEL") {
            self.log_level = log_level;
        }
        if let Some(broker_name) = lookup("SSO_BROKER_NAME") {
            self.broker_name = broker_name;
        }
        if let Some(secret) = lookup("SSO_BROKER_SECRET") {
            self.secret = secret;
        }
        if let Some(server_url) = lookup("SSO_SERVER_URL") {
            self.server_url = server_url;
        }
    }

    /// Check that the broker can talk to the SSO server with this config.
    pub fn validate(&self) -> CoreResult<()> {
        if self.broker_name.is_empty() {
            return Err(CoreError::Config("broker_name is empty".to_string()));
        }
        if !self
            .broker_name
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
        {
            return Err(CoreError::Config(format!(
                "broker_name '{}' may only contain ASCII letters, digits, '-' and '_'",
                self.broker_name
            )));
        }
        if self.secret.is_empty() {
            return Err(CoreError::Config("secret is empty".to_string()));
        }
        if self.no_session_marker.trim().is_empty() {
            return Err(CoreError::Config("no_session_marker is empty".to_string()));
        }
        if self.request_timeout_secs == 0 {
            return Err(CoreError::Config(
                "request_timeout_secs must be greater than zero".to_string(),
            ));
        }
        if self.cookie.max_age_secs == Some(0) {
            return Err(CoreError::Config(
                "cookie.max_age_secs must be greater than zero or absent".to_string(),
            ));
        }
        if parse_level(&self.log_level).is_none() {
            return Err(CoreError::Config(format!(
                "unknown log_level '{}'",
                self.log_level
            )));
        }
        let url = self.server_url()?;
        if url.scheme() != "http" && url.scheme() != "https" {
            return Err(CoreError::Config(format!(
                "server_url must be http or https, got '{}'",
                url.scheme()
            )));
        }
        Ok(())
    }

    /// Get the SSO server URL as a parsed URL.
    pub fn server_url(&self) -> CoreResult<Url> {
        Url::parse(&self.server_url).map_err(CoreError::from)
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use tempfile::tempdir;

    fn valid_config() -> Config {
        Config {
            broker_name: "shop".to_string(),
            secret: "broker-shared-secret".to_string(),
            server_url: "https://sso.example.com".to_string(),
            ..Config::default()
        }
    }

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.log_level, DEFAULT_LOG_LEVEL);
        assert_eq!(config.no_session_marker, DEFAULT_NO_SESSION_MARKER);
        assert_eq!(config.request_timeout(), Duration::from_secs(5));
        assert_eq!(config.model, UserModelMapping::default());
        assert!(config.cookie.secure);
        assert!(config.cookie.http_only);
        assert_eq!(config.cookie.path, "/");
    }

    #[test]
    fn test_config_load_from_file_fills_defaults() {
        let dir = tempdir().unwrap();
        let config_path = dir.path().join("broker.json");

        let config_json = r#"{
            "broker_name": "shop",
            "secret": "s",
            "server_url": "https://sso.example.com",
            "model": { "id_field": "uid" }
        }"#;
        std::fs::write(&config_path, config_json).unwrap();

        let config = Config::load_from_file(&config_path).unwrap();
        assert_eq!(config.broker_name, "shop");
        assert_eq!(config.model.id_field, "uid");
        assert_eq!(config.model.name_field, "name");
        assert_eq!(config.log_level, DEFAULT_LOG_LEVEL);
    }

    #[test]
    fn test_config_save_and_load_roundtrip() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("nested").join("broker.json");

        let mut config = valid_config();
        config.no_session_marker = "session unknown".to_string();
        config.save(&path).unwrap();

        let loaded = Config::load_from_file(&path).unwrap();
        assert_eq!(loaded.broker_name, "shop");
        assert_eq!(loaded.no_session_marker, "session unknown");
    }

    #[test]
    fn test_overrides_replace_file_values() {
        let env: HashMap<&str, &str> = [
            ("SSO_BROKER_NAME", "blog"),
            ("SSO_BROKER_SECRET", "from-env"),
            ("SSO_SERVER_URL", "  "),
        ]
        .into_iter()
        .collect();

        let mut config = valid_config();
        config.apply_overrides(|name| env.get(name).map(|v| v.to_string()));

        assert_eq!(config.broker_name, "blog");
        assert_eq!(config.secret, "from-env");
        // blank values are ignored
        assert_eq!(config.server_url, "https://sso.example.com");
    }

    #[test]
    fn test_validate_accepts_complete_config() {
        assert!(valid_config().validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_missing_fields() {
        let mut config = valid_config();
        config.broker_name.clear();
        assert!(config.validate().is_err());

        let mut config = valid_config();
        config.secret.clear();
        assert!(config.validate().is_err());

        let mut config = valid_config();
        config.broker_name = "shop;evil".to_string();
        assert!(config.validate().is_err());

        let mut config = valid_config();
        config.request_timeout_secs = 0;
        assert!(config.validate().is_err());

        let mut config = valid_config();
        config.log_level = "loud".to_string();
        assert!(config.validate().is_err());

        let mut config = valid_config();
        config.cookie.max_age_secs = Some(0);
        assert!(matches!(config.validate(), Err(CoreError::Config(_))));
        config.cookie.max_age_secs = Some(86_400);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_bad_urls() {
        let mut config = valid_config();
        config.server_url = "not a valid url".to_string();
        assert!(matches!(config.validate(), Err(CoreError::InvalidUrl(_))));

        config.server_url = "ftp://sso.example.com".to_string();
        assert!(matches!(config.validate(), Err(CoreError::Config(_))));
    }

    #[test]
    fn test_debug_masks_secret() {
        let mut config = valid_config();
        config.secret = "Kq9Zt7-broker-shared-secret".to_string();
        let debug = format!("{:?}", config);
        assert!(!debug.contains("Kq9Zt7"));
        assert!(debug.contains(REDACTED_PLACEHOLDER));
        assert!(debug.contains("shop"));
    }
}
