//! In-process identity provider for development and tests.

use std::collections::HashMap;

use async_trait::async_trait;
use parking_lot::RwLock;

use crate::domain::UserId;
use crate::error::IdentityError;
use crate::port::outbound::identity::{Identity, IdentityProvider, NewIdentity};

/// Keeps identities in memory. Emails are unique, compared case-insensitively.
#[derive(Debug, Default)]
pub struct LocalIdentity {
    users: RwLock<HashMap<UserId, String>>,
    fail_deletes: RwLock<bool>,
}

impl LocalIdentity {
    /// Create an empty provider.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of identities currently held.
    #[must_use]
    pub fn len(&self) -> usize {
        self.users.read().len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.users.read().is_empty()
    }

    #[must_use]
    pub fn contains(&self, id: &UserId) -> bool {
        self.users.read().contains_key(id)
    }

    /// Make every subsequent delete fail as if the service were down.
    pub fn fail_deletes(&self, fail: bool) {
        *self.fail_deletes.write() = fail;
    }
}

#[async_trait]
impl IdentityProvider for LocalIdentity {
    fn name(&self) -> &'static str {
        "local"
    }

    async fn create_identity(&self, request: &NewIdentity) -> Result<Identity, IdentityError> {
        let mut users = self.users.write();
        let taken = users
            .values()
            .any(|email| email.eq_ignore_ascii_case(&request.email));
        if taken {
            return Err(IdentityError::Rejected(
                "A user with this email address has already been registered".into(),
            ));
        }
        let id = UserId::new();
        users.insert(id.clone(), request.email.clone());
        Ok(Identity {
            id,
            email: request.email.clone(),
        })
    }

    async fn delete_identity(&self, id: &UserId) -> Result<(), IdentityError> {
        if *self.fail_deletes.read() {
            return Err(IdentityError::Unavailable("local provider offline".into()));
        }
        match self.users.write().remove(id) {
            Some(_) => Ok(()),
            None => Err(IdentityError::NotFound(id.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{BusinessId, Role};
    use crate::port::outbound::identity::IdentityMetadata;

    fn request(email: &str) -> NewIdentity {
        NewIdentity {
            email: email.into(),
            password: "password1".into(),
            metadata: IdentityMetadata {
                first_name: "Ana".into(),
                last_name: "Rivera".into(),
                phone: None,
                role: Role::Student,
                business_id: BusinessId::from("b"),
            },
        }
    }

    #[tokio::test]
    async fn duplicate_email_is_rejected() {
        let provider = LocalIdentity::new();
        provider.create_identity(&request("ana@example.com")).await.unwrap();
        let err = provider
            .create_identity(&request("ANA@example.com"))
            .await
            .unwrap_err();
        assert!(matches!(err, IdentityError::Rejected(_)));
        assert_eq!(provider.len(), 1);
    }

    #[tokio::test]
    async fn delete_removes_identity() {
        let provider = LocalIdentity::new();
        let identity = provider.create_identity(&request("ana@example.com")).await.unwrap();
        provider.delete_identity(&identity.id).await.unwrap();
        assert!(provider.is_empty());
        assert!(matches!(
            provider.delete_identity(&identity.id).await,
            Err(IdentityError::NotFound(_))
        ));
    }

    #[tokio::test]
    async fn simulated_outage_fails_deletes() {
        let provider = LocalIdentity::new();
        let identity = provider.create_identity(&request("ana@example.com")).await.unwrap();
        provider.fail_deletes(true);
        assert!(matches!(
            provider.delete_identity(&identity.id).await,
            Err(IdentityError::Unavailable(_))
        ));
        assert!(provider.contains(&identity.id));
    }
}
