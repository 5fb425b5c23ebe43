//! SSO auto-login for one broker.
//!
//! Each inbound request runs one sync cycle: make sure the browser holds a
//! broker token, ask the SSO server who that token belongs to, compare with
//! the local session and apply the resulting [`SyncDecision`].

mod auto_login;
mod error;
mod outcome;

pub use auto_login::SsoAutoLogin;
pub use error::{SsoError, SsoResult};
pub use outcome::{SyncOutcome, SyncReport};

pub use session_sync_policy::SyncDecision;
