//! Local authentication seam used by the SSO auto-login.
//!
//! [`AuthGateway`] is what the middleware talks to. [`RepositoryAuthGateway`]
//! builds one from a user store and a session guard: a login upserts the user
//! by remote id and then logs that record in.

mod error;
mod gateway;
mod memory;
mod record;

pub use error::{GatewayError, GatewayResult};
pub use gateway::{AuthGateway, RepositoryAuthGateway, SessionGuard, UserRepository};
pub use memory::{MemorySessionGuard, MemoryUserRepository};
pub use record::{BasicUser, UserRecord};
