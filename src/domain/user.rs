//! User profiles and student intake validation.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::error::DomainError;
use super::id::{BusinessId, UserId};

/// Maximum length of a first or last name.
pub const MAX_NAME_LEN: usize = 50;

/// Minimum password length accepted for new students.
pub const MIN_PASSWORD_LEN: usize = 8;

string_enum!(
    /// A user's role within their studio.
    Role, "role" {
        Owner => "owner",
        Instructor => "instructor",
        Student => "student",
    }
);

impl Role {
    /// Owners and instructors can teach classes and record attendance.
    #[must_use]
    pub fn is_staff(&self) -> bool {
        matches!(self, Self::Owner | Self::Instructor)
    }
}

/// A user profile row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: UserId,
    pub email: String,
    pub business_id: BusinessId,
    pub role: Role,
    pub first_name: String,
    pub last_name: String,
    pub phone: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl User {
    #[must_use]
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }

    /// Fail unless the user holds the student role.
    pub fn ensure_student(&self) -> Result<(), DomainError> {
        if self.role == Role::Student {
            Ok(())
        } else {
            Err(DomainError::WrongRole {
                user: self.id.to_string(),
                expected: "student",
            })
        }
    }

    /// Fail unless the user can teach.
    pub fn ensure_staff(&self) -> Result<(), DomainError> {
        if self.role.is_staff() {
            Ok(())
        } else {
            Err(DomainError::WrongRole {
                user: self.id.to_string(),
                expected: "instructor",
            })
        }
    }
}

/// Editable profile fields.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProfileFields {
    pub first_name: String,
    pub last_name: String,
    pub phone: Option<String>,
}

impl ProfileFields {
    /// Trim fields, drop an empty phone and enforce the name and phone rules.
    pub fn normalized(self) -> Result<Self, DomainError> {
        let first_name = validate_name("first name", &self.first_name)?;
        let last_name = validate_name("last name", &self.last_name)?;
        let phone = match self.phone.as_deref().map(str::trim) {
            None | Some("") => None,
            Some(p) => {
                if !is_valid_phone(p) {
                    return Err(DomainError::InvalidPhone);
                }
                Some(p.to_string())
            }
        };
        Ok(Self {
            first_name,
            last_name,
            phone,
        })
    }
}

/// Input for creating a student account.
#[derive(Debug, Clone)]
pub struct NewStudent {
    pub email: String,
    pub password: String,
    pub profile: ProfileFields,
    pub business_id: BusinessId,
}

impl NewStudent {
    /// Validate and normalize the intake form.
    pub fn validate(self) -> Result<Self, DomainError> {
        let profile = self.profile.normalized()?;
        let email = self.email.trim().to_string();
        if email.is_empty() {
            return Err(DomainError::Required { field: "email" });
        }
        if !is_valid_email(&email) {
            return Err(DomainError::InvalidEmail);
        }
        if self.password.is_empty() {
            return Err(DomainError::Required { field: "password" });
        }
        if self.password.chars().count() < MIN_PASSWORD_LEN {
            return Err(DomainError::PasswordTooShort {
                min: MIN_PASSWORD_LEN,
            });
        }
        Ok(Self {
            email,
            password: self.password,
            profile,
            business_id: self.business_id,
        })
    }

    /// Build the profile row for an identity the provider has created.
    #[must_use]
    pub fn into_user(self, id: UserId, now: DateTime<Utc>) -> User {
        User {
            id,
            email: self.email,
            business_id: self.business_id,
            role: Role::Student,
            first_name: self.profile.first_name,
            last_name: self.profile.last_name,
            phone: self.profile.phone,
            created_at: now,
            updated_at: now,
        }
    }
}

fn validate_name(field: &'static str, value: &str) -> Result<String, DomainError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(DomainError::Required { field });
    }
    if trimmed.chars().count() > MAX_NAME_LEN {
        return Err(DomainError::TooLong {
            field,
            max: MAX_NAME_LEN,
        });
    }
    Ok(trimmed.to_string())
}

/// `local@domain.tld` with no whitespace and exactly one `@`.
fn is_valid_email(email: &str) -> bool {
    if email.chars().any(char::is_whitespace) {
        return false;
    }
    let Some((local, domain)) = email.split_once('@') else {
        return false;
    };
    if local.is_empty() || domain.contains('@') {
        return false;
    }
    match domain.rsplit_once('.') {
        Some((host, tld)) => !host.is_empty() && !tld.is_empty(),
        None => false,
    }
}

fn is_valid_phone(phone: &str) -> bool {
    phone
        .chars()
        .all(|c| c.is_ascii_digit() || matches!(c, ' ' | '-' | '(' | ')'))
}
