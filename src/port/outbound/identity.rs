//! Identity provider port.
//!
//! Login identities live in a hosted auth service; this crate only creates
//! and deletes them on behalf of studio staff.

use async_trait::async_trait;
use serde::Serialize;

use crate::domain::{BusinessId, Role, UserId};
use crate::error::IdentityError;

/// Metadata stored alongside a new identity.
#[derive(Debug, Clone, Serialize)]
pub struct IdentityMetadata {
    pub first_name: String,
    pub last_name: String,
    pub phone: Option<String>,
    pub role: Role,
    pub business_id: BusinessId,
}

/// A request to create a login identity.
#[derive(Debug, Clone)]
pub struct NewIdentity {
    pub email: String,
    pub password: String,
    pub metadata: IdentityMetadata,
}

/// The identity the provider created.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Identity {
    pub id: UserId,
    pub email: String,
}

/// Administrative access to the authentication service.
///
/// Implementations must be thread-safe (`Send + Sync`); handlers share one
/// instance across requests.
#[async_trait]
pub trait IdentityProvider: Send + Sync {
    /// Provider name for logging.
    fn name(&self) -> &'static str;

    /// Create an already-confirmed identity.
    ///
    /// # Errors
    ///
    /// [`IdentityError::Rejected`] when the provider refuses the request
    /// (duplicate email, weak password), [`IdentityError::Unavailable`] on
    /// transport or server failures.
    async fn create_identity(&self, request: &NewIdentity) -> Result<Identity, IdentityError>;

    /// Delete an identity.
    async fn delete_identity(&self, id: &UserId) -> Result<(), IdentityError>;
}
