//! Package types: the entitlements a studio sells.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::class_type::trim_optional;
use super::error::DomainError;
use super::id::{BusinessId, ClassTypeId, PackageTypeId};

/// How a package meters attendance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "package_structure", rename_all = "snake_case")]
pub enum PackageStructure {
    /// A fixed number of classes, debited one per visit.
    FixedCount { class_count: i32 },
    /// Up to `classes_per_week` visits each week for `duration_months`.
    WeeklyLimit {
        classes_per_week: i32,
        duration_months: i32,
    },
    /// No limit on visits.
    Unlimited,
}

impl PackageStructure {
    /// Database discriminant.
    #[must_use]
    pub fn kind(&self) -> &'static str {
        match self {
            Self::FixedCount { .. } => "fixed_count",
            Self::WeeklyLimit { .. } => "weekly_limit",
            Self::Unlimited => "unlimited",
        }
    }

    #[must_use]
    pub fn class_count(&self) -> Option<i32> {
        match self {
            Self::FixedCount { class_count } => Some(*class_count),
            _ => None,
        }
    }

    #[must_use]
    pub fn classes_per_week(&self) -> Option<i32> {
        match self {
            Self::WeeklyLimit {
                classes_per_week, ..
            } => Some(*classes_per_week),
            _ => None,
        }
    }

    #[must_use]
    pub fn duration_months(&self) -> Option<i32> {
        match self {
            Self::WeeklyLimit {
                duration_months, ..
            } => Some(*duration_months),
            _ => None,
        }
    }

    /// Rebuild from the stored discriminant and nullable columns.
    pub fn from_columns(
        kind: &str,
        class_count: Option<i32>,
        classes_per_week: Option<i32>,
        duration_months: Option<i32>,
    ) -> Result<Self, DomainError> {
        let structure = match kind {
            "fixed_count" => Self::FixedCount {
                class_count: class_count.ok_or(DomainError::Required {
                    field: "class_count",
                })?,
            },
            "weekly_limit" => Self::WeeklyLimit {
                classes_per_week: classes_per_week.ok_or(DomainError::Required {
                    field: "classes_per_week",
                })?,
                duration_months: duration_months.ok_or(DomainError::Required {
                    field: "duration_months",
                })?,
            },
            "unlimited" => Self::Unlimited,
            other => {
                return Err(DomainError::UnknownVariant {
                    field: "package_structure",
                    value: other.to_string(),
                })
            }
        };
        Ok(structure)
    }

    pub fn validate(&self) -> Result<(), DomainError> {
        match *self {
            Self::FixedCount { class_count } if class_count <= 0 => {
                Err(DomainError::NotPositive {
                    field: "class count",
                })
            }
            Self::WeeklyLimit {
                classes_per_week,
                duration_months,
            } => {
                if classes_per_week <= 0 {
                    return Err(DomainError::NotPositive {
                        field: "classes per week",
                    });
                }
                if duration_months <= 0 {
                    return Err(DomainError::NotPositive {
                        field: "duration months",
                    });
                }
                Ok(())
            }
            _ => Ok(()),
        }
    }
}

/// A package offering that can be sold to students.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PackageType {
    pub id: PackageTypeId,
    pub business_id: BusinessId,
    pub name: String,
    #[serde(flatten)]
    pub structure: PackageStructure,
    pub price: Decimal,
    pub expiration_days: Option<i32>,
    pub description: Option<String>,
    /// Class types this package covers; `None` covers every class type.
    pub valid_for_class_types: Option<Vec<ClassTypeId>>,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
}

/// Editable package type fields.
#[derive(Debug, Clone, Deserialize)]
pub struct PackageTypeFields {
    pub name: String,
    #[serde(flatten)]
    pub structure: PackageStructure,
    pub price: Decimal,
    #[serde(default)]
    pub expiration_days: Option<i32>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub valid_for_class_types: Option<Vec<ClassTypeId>>,
    #[serde(default = "default_true")]
    pub is_active: bool,
}

fn default_true() -> bool {
    true
}

impl PackageTypeFields {
    pub fn normalized(self) -> Result<Self, DomainError> {
        let name = self.name.trim().to_string();
        if name.is_empty() {
            return Err(DomainError::Required { field: "name" });
        }
        self.structure.validate()?;
        if self.price < Decimal::ZERO {
            return Err(DomainError::Negative { field: "price" });
        }
        if matches!(self.expiration_days, Some(days) if days <= 0) {
            return Err(DomainError::NotPositive {
                field: "expiration days",
            });
        }
        Ok(Self {
            name,
            description: trim_optional(self.description),
            valid_for_class_types: self.valid_for_class_types.filter(|ids| !ids.is_empty()),
            ..self
        })
    }
}

impl PackageType {
    pub fn create(
        business_id: BusinessId,
        fields: PackageTypeFields,
        now: DateTime<Utc>,
    ) -> Result<Self, DomainError> {
        let f = fields.normalized()?;
        Ok(Self {
            id: PackageTypeId::new(),
            business_id,
            name: f.name,
            structure: f.structure,
            price: f.price,
            expiration_days: f.expiration_days,
            description: f.description,
            valid_for_class_types: f.valid_for_class_types,
            is_active: f.is_active,
            created_at: now,
        })
    }

    /// Overwrite the editable fields. The owning business never changes.
    pub fn apply(&mut self, fields: PackageTypeFields) -> Result<(), DomainError> {
        let f = fields.normalized()?;
        self.name = f.name;
        self.structure = f.structure;
        self.price = f.price;
        self.expiration_days = f.expiration_days;
        self.description = f.description;
        self.valid_for_class_types = f.valid_for_class_types;
        self.is_active = f.is_active;
        Ok(())
    }

    /// Whether packages of this type may be charged for a class of `class_type`.
    #[must_use]
    pub fn covers(&self, class_type: &ClassTypeId) -> bool {
        self.valid_for_class_types
            .as_ref()
            .map_or(true, |ids| ids.contains(class_type))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn fields(structure: PackageStructure) -> PackageTypeFields {
        PackageTypeFields {
            name: "10 Class Card".into(),
            structure,
            price: dec!(150.00),
            expiration_days: Some(90),
            description: None,
            valid_for_class_types: Some(vec![]),
            is_active: true,
        }
    }

    #[test]
    fn fixed_count_requires_positive_count() {
        let err = fields(PackageStructure::FixedCount { class_count: 0 })
            .normalized()
            .unwrap_err();
        assert_eq!(
            err,
            DomainError::NotPositive {
                field: "class count"
            }
        );
    }

    #[test]
    fn weekly_limit_requires_both_fields_positive() {
        let err = fields(PackageStructure::WeeklyLimit {
            classes_per_week: 2,
            duration_months: 0,
        })
        .normalized()
        .unwrap_err();
        assert_eq!(
            err,
            DomainError::NotPositive {
                field: "duration months"
            }
        );
    }

    #[test]
    fn negative_price_and_zero_expiration_are_rejected() {
        let mut f = fields(PackageStructure::Unlimited);
        f.price = dec!(-1);
        assert_eq!(
            f.normalized().unwrap_err(),
            DomainError::Negative { field: "price" }
        );

        let mut f = fields(PackageStructure::Unlimited);
        f.expiration_days = Some(0);
        assert!(f.normalized().is_err());
    }

    #[test]
    fn empty_class_type_list_covers_everything() {
        let pt = PackageType::create(
            BusinessId::from("b"),
            fields(PackageStructure::FixedCount { class_count: 10 }),
            Utc::now(),
        )
        .unwrap();
        assert_eq!(pt.valid_for_class_types, None);
        assert!(pt.covers(&ClassTypeId::from("anything")));
    }

    #[test]
    fn restricted_package_type_covers_only_listed() {
        let mut f = fields(PackageStructure::Unlimited);
        f.valid_for_class_types = Some(vec![ClassTypeId::from("salsa")]);
        let pt = PackageType::create(BusinessId::from("b"), f, Utc::now()).unwrap();
        assert!(pt.covers(&ClassTypeId::from("salsa")));
        assert!(!pt.covers(&ClassTypeId::from("tango")));
    }

    #[test]
    fn structure_serializes_flat() {
        let pt = PackageType::create(
            BusinessId::from("b"),
            fields(PackageStructure::WeeklyLimit {
                classes_per_week: 2,
                duration_months: 3,
            }),
            Utc::now(),
        )
        .unwrap();
        let json = serde_json::to_value(&pt).unwrap();
        assert_eq!(json["package_structure"], "weekly_limit");
        assert_eq!(json["classes_per_week"], 2);
        assert_eq!(json["duration_months"], 3);
    }

    #[test]
    fn columns_roundtrip() {
        let s = PackageStructure::from_columns("fixed_count", Some(5), None, None).unwrap();
        assert_eq!(s, PackageStructure::FixedCount { class_count: 5 });
        assert!(PackageStructure::from_columns("fixed_count", None, None, None).is_err());
        assert!(PackageStructure::from_columns("bogus", None, None, None).is_err());
    }
}
