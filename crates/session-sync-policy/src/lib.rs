//! Session synchronization policy for SSO brokers.
//!
//! This crate provides:
//! - The shared data model (user ids, local/remote session state)
//! - [`decide`], the pure decision table that turns one local/remote pair
//!   into exactly one [`SyncDecision`]

mod policy;
mod types;

pub use policy::decide;
pub use types::{
    LocalAuthState, RemoteSessionResult, SyncDecision, TransportCause, TransportKind, UserAttrs,
    UserId,
};
