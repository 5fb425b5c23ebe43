//! Client side of the SSO broker protocol.
//!
//! This crate provides:
//! - HMAC-SHA256 derivation of broker session ids and attach checksums
//! - [`BrokerClient`], which asks the SSO server who is logged in for a
//!   broker token and classifies the answer into a [`RemoteSessionResult`]
//! - The [`SessionQuery`] seam used by the request orchestrator
//!
//! [`RemoteSessionResult`]: session_sync_policy::RemoteSessionResult

mod client;
mod error;
mod response;
mod signing;

pub use client::{BrokerClient, SessionQuery};
pub use error::{BrokerError, BrokerResult};
pub use response::classify_response;
pub use signing::{attach_checksum, session_id};
