//! Identity provider adapters.

mod hosted;
mod local;

pub use hosted::{HostedIdentity, SERVICE_ROLE_KEY_ENV};
pub use local::LocalIdentity;
