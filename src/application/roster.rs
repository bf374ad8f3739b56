//! Student accounts: creation and removal across the identity provider and
//! the profile table, plus profile maintenance.

use std::sync::Arc;

use thiserror::Error;
use tracing::{error, info, warn};

use super::Clock;
use crate::domain::user::ProfileFields;
use crate::domain::{BusinessId, DomainError, NewStudent, Role, User, UserId};
use crate::error::{Error, IdentityError, Result};
use crate::port::{IdentityMetadata, IdentityProvider, NewIdentity, Store};

/// Failures of the admin student endpoints. Each stage fails with its own
/// message so callers can tell a half-finished operation apart.
#[derive(Error, Debug)]
pub enum StudentAdminError {
    #[error(transparent)]
    Invalid(#[from] DomainError),

    #[error("Business not found")]
    UnknownBusiness,

    /// The identity provider refused to create the account.
    #[error("{0}")]
    IdentityRejected(#[source] IdentityError),

    /// The identity was created but the profile row was not.
    #[error("Failed to create user profile")]
    ProfileCreate(#[source] Error),

    #[error("Student not found or access denied")]
    StudentNotFound,

    #[error("Failed to delete user from authentication system")]
    IdentityDelete(#[source] IdentityError),

    #[error("Failed to delete user from database")]
    ProfileDelete(#[source] Error),

    #[error(transparent)]
    Store(#[from] Error),
}

/// Student accounts and profiles.
#[derive(Clone)]
pub struct RosterService {
    store: Arc<dyn Store>,
    identity: Arc<dyn IdentityProvider>,
    clock: Clock,
}

impl RosterService {
    /// Create a roster service over the given store and identity provider.
    pub fn new(store: Arc<dyn Store>, identity: Arc<dyn IdentityProvider>, clock: Clock) -> Self {
        Self {
            store,
            identity,
            clock,
        }
    }

    /// Create a confirmed login and a student profile for it.
    ///
    /// If the profile insert fails the identity is deleted again; a failure
    /// of that cleanup is logged but does not change the returned error.
    pub async fn create_student(
        &self,
        request: NewStudent,
    ) -> std::result::Result<User, StudentAdminError> {
        let request = request.validate()?;
        if self
            .store
            .get_business(&request.business_id)
            .await?
            .is_none()
        {
            return Err(StudentAdminError::UnknownBusiness);
        }

        let identity = self
            .identity
            .create_identity(&NewIdentity {
                email: request.email.clone(),
                password: request.password.clone(),
                metadata: IdentityMetadata {
                    first_name: request.profile.first_name.clone(),
                    last_name: request.profile.last_name.clone(),
                    phone: request.profile.phone.clone(),
                    role: Role::Student,
                    business_id: request.business_id.clone(),
                },
            })
            .await
            .map_err(StudentAdminError::IdentityRejected)?;

        let user = request.into_user(identity.id.clone(), self.clock.now());
        if let Err(err) = self.store.insert_user(&user).await {
            error!(user_id = %identity.id, error = %err, "Profile insert failed, removing identity");
            if let Err(cleanup) = self.identity.delete_identity(&identity.id).await {
                warn!(user_id = %identity.id, error = %cleanup, "Identity cleanup failed");
            }
            return Err(StudentAdminError::ProfileCreate(err));
        }

        info!(
            user_id = %user.id,
            business_id = %user.business_id,
            provider = self.identity.name(),
            "Student created"
        );
        Ok(user)
    }

    /// Remove a student's login and profile. Packages and attendance go
    /// with the profile.
    pub async fn delete_student(
        &self,
        business: &BusinessId,
        student: &UserId,
    ) -> std::result::Result<(), StudentAdminError> {
        let user = self
            .store
            .get_user(business, student)
            .await?
            .filter(|u| u.role == Role::Student)
            .ok_or(StudentAdminError::StudentNotFound)?;

        // Any identity failure, a missing login included, keeps the profile.
        if let Err(err) = self.identity.delete_identity(&user.id).await {
            error!(user_id = %user.id, error = %err, "Identity delete failed");
            return Err(StudentAdminError::IdentityDelete(err));
        }

        match self.store.delete_user(business, &user.id).await {
            Ok(true) => {
                info!(user_id = %user.id, business_id = %business, "Student deleted");
                Ok(())
            }
            Ok(false) => Err(StudentAdminError::ProfileDelete(Error::not_found(
                "student", &user.id,
            ))),
            Err(err) => {
                error!(user_id = %user.id, error = %err, "Profile delete failed");
                Err(StudentAdminError::ProfileDelete(err))
            }
        }
    }

    pub async fn list_students(&self, business: &BusinessId) -> Result<Vec<User>> {
        self.store.list_users(business, Role::Student).await
    }

    /// Staff who can be assigned to classes.
    pub async fn list_staff(&self, business: &BusinessId) -> Result<Vec<User>> {
        let mut staff = self.store.list_users(business, Role::Owner).await?;
        staff.extend(self.store.list_users(business, Role::Instructor).await?);
        staff.sort_by(|a, b| {
            (a.last_name.as_str(), a.first_name.as_str())
                .cmp(&(b.last_name.as_str(), b.first_name.as_str()))
        });
        Ok(staff)
    }

    pub async fn get_student(&self, business: &BusinessId, id: &UserId) -> Result<User> {
        self.store
            .get_user(business, id)
            .await?
            .filter(|u| u.role == Role::Student)
            .ok_or_else(|| Error::not_found("student", id))
    }

    /// Update name and phone. Email and role cannot change here.
    pub async fn update_student(
        &self,
        business: &BusinessId,
        id: &UserId,
        fields: ProfileFields,
    ) -> Result<User> {
        let fields = fields.normalized()?;
        let mut user = self.get_student(business, id).await?;
        user.first_name = fields.first_name;
        user.last_name = fields.last_name;
        user.phone = fields.phone;
        user.updated_at = self.clock.now();
        self.store.update_user(&user).await?;
        Ok(user)
    }
}
