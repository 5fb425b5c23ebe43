//! Configuration, core error type and logging setup shared by every broker crate.

mod config;
mod error;
mod logging;
mod mask;

pub use config::{
    Config, CookieConfig, UserModelMapping, DEFAULT_COOKIE_PATH, DEFAULT_LOG_LEVEL,
    DEFAULT_NO_SESSION_MARKER, DEFAULT_REQUEST_TIMEOUT_SECS,
};
pub use error::{CoreError, CoreResult};
pub use logging::{init_logging, parse_level};
pub use mask::mask_secret;
pub use observability::{default_log_path, REDACTED_PLACEHOLDER};
