//! Class types: the catalog of dance styles a studio teaches.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::error::DomainError;
use super::id::{BusinessId, ClassTypeId};

/// A kind of class offered by a studio (Salsa, Bachata, ...).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClassType {
    pub id: ClassTypeId,
    pub business_id: BusinessId,
    pub name: String,
    pub description: Option<String>,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
}

/// Editable class type fields.
#[derive(Debug, Clone, Deserialize)]
pub struct ClassTypeFields {
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default = "default_true")]
    pub is_active: bool,
}

fn default_true() -> bool {
    true
}

impl ClassTypeFields {
    pub fn normalized(self) -> Result<Self, DomainError> {
        let name = self.name.trim().to_string();
        if name.is_empty() {
            return Err(DomainError::Required { field: "name" });
        }
        Ok(Self {
            name,
            description: trim_optional(self.description),
            is_active: self.is_active,
        })
    }
}

/// Trim an optional text field, mapping blank to `None`.
pub(crate) fn trim_optional(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

impl ClassType {
    pub fn create(
        business_id: BusinessId,
        fields: ClassTypeFields,
        now: DateTime<Utc>,
    ) -> Result<Self, DomainError> {
        let fields = fields.normalized()?;
        Ok(Self {
            id: ClassTypeId::new(),
            business_id,
            name: fields.name,
            description: fields.description,
            is_active: fields.is_active,
            created_at: now,
        })
    }

    pub fn apply(&mut self, fields: ClassTypeFields) -> Result<(), DomainError> {
        let fields = fields.normalized()?;
        self.name = fields.name;
        self.description = fields.description;
        self.is_active = fields.is_active;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blank_description_becomes_none() {
        let ct = ClassType::create(
            BusinessId::from("b"),
            ClassTypeFields {
                name: " Salsa ".into(),
                description: Some("   ".into()),
                is_active: true,
            },
            Utc::now(),
        )
        .unwrap();
        assert_eq!(ct.name, "Salsa");
        assert_eq!(ct.description, None);
    }

    #[test]
    fn name_is_required() {
        let err = ClassType::create(
            BusinessId::from("b"),
            ClassTypeFields {
                name: "".into(),
                description: None,
                is_active: true,
            },
            Utc::now(),
        )
        .unwrap_err();
        assert_eq!(err, DomainError::Required { field: "name" });
    }
}
