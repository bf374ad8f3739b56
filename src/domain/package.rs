//! Packages: a student's purchased entitlement and the arithmetic that
//! attendance applies to it.

use chrono::{DateTime, Duration, Months, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::error::DomainError;
use super::id::{BusinessId, PackageId, PackageTypeId, UserId};
use super::package_type::{PackageStructure, PackageType};

string_enum!(
    PackageStatus, "package status" {
        Active => "active",
        Expired => "expired",
        Depleted => "depleted",
    }
);

string_enum!(
    PaymentMethod, "payment method" {
        Stripe => "stripe",
        Square => "square",
        Paypal => "paypal",
        Cash => "cash",
        Venmo => "venmo",
        Other => "other",
    }
);

/// How a package was paid for.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Payment {
    pub method: PaymentMethod,
    pub amount_paid: Decimal,
    pub payment_id: Option<String>,
}

impl Payment {
    pub fn normalized(self) -> Result<Self, DomainError> {
        if self.amount_paid < Decimal::ZERO {
            return Err(DomainError::Negative {
                field: "amount paid",
            });
        }
        Ok(Self {
            payment_id: self
                .payment_id
                .map(|id| id.trim().to_string())
                .filter(|id| !id.is_empty()),
            ..self
        })
    }
}

/// A package sold to a student.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Package {
    pub id: PackageId,
    pub student_id: UserId,
    pub package_type_id: PackageTypeId,
    pub business_id: BusinessId,
    /// `None` for packages that are not metered by count.
    pub classes_remaining: Option<i32>,
    pub total_classes: Option<i32>,
    pub total_months: Option<i32>,
    pub months_remaining: Option<i32>,
    pub classes_per_week: Option<i32>,
    pub purchase_date: DateTime<Utc>,
    pub expiration_date: Option<DateTime<Utc>>,
    pub status: PackageStatus,
    pub payment_method: PaymentMethod,
    pub payment_id: Option<String>,
    pub amount_paid: Decimal,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Changes an instructor may make to an existing package.
#[derive(Debug, Clone, Deserialize)]
pub struct PackageEdit {
    pub payment_method: PaymentMethod,
    pub amount_paid: Decimal,
    #[serde(default)]
    pub payment_id: Option<String>,
    pub purchase_date: DateTime<Utc>,
    /// Left untouched when absent.
    #[serde(default)]
    pub classes_remaining: Option<i32>,
    /// Left untouched when absent.
    #[serde(default)]
    pub expiration_date: Option<DateTime<Utc>>,
}

/// Expiration for a package of `package_type` bought at `purchase_date`.
///
/// `expiration_days` wins when set; weekly-limit packages otherwise run for
/// their duration in calendar months; everything else never expires.
#[must_use]
pub fn expiration_for(
    package_type: &PackageType,
    purchase_date: DateTime<Utc>,
) -> Option<DateTime<Utc>> {
    if let Some(days) = package_type.expiration_days {
        return Some(purchase_date + Duration::days(i64::from(days)));
    }
    match package_type.structure {
        PackageStructure::WeeklyLimit {
            duration_months, ..
        } => u32::try_from(duration_months)
            .ok()
            .and_then(|m| purchase_date.checked_add_months(Months::new(m))),
        _ => None,
    }
}

impl Package {
    /// Issue a new package of `package_type` to `student_id`.
    #[must_use]
    pub fn issue(
        package_type: &PackageType,
        student_id: UserId,
        purchase_date: DateTime<Utc>,
        payment: Payment,
        now: DateTime<Utc>,
    ) -> Self {
        let structure = package_type.structure;
        Self {
            id: PackageId::new(),
            student_id,
            package_type_id: package_type.id.clone(),
            business_id: package_type.business_id.clone(),
            classes_remaining: structure.class_count(),
            total_classes: structure.class_count(),
            total_months: structure.duration_months(),
            months_remaining: structure.duration_months(),
            classes_per_week: structure.classes_per_week(),
            purchase_date,
            expiration_date: expiration_for(package_type, purchase_date),
            status: PackageStatus::Active,
            payment_method: payment.method,
            payment_id: payment.payment_id,
            amount_paid: payment.amount_paid,
            created_at: now,
            updated_at: now,
        }
    }

    /// Charge one class.
    pub fn debit(&mut self, now: DateTime<Utc>) {
        if let Some(remaining) = self.classes_remaining {
            let remaining = remaining - 1;
            self.classes_remaining = Some(remaining);
            self.status = if remaining <= 0 {
                PackageStatus::Depleted
            } else {
                PackageStatus::Active
            };
        }
        self.updated_at = now;
    }

    /// Refund one class. The package becomes active whatever its prior state.
    pub fn credit(&mut self, now: DateTime<Utc>) {
        if let Some(remaining) = self.classes_remaining {
            self.classes_remaining = Some(remaining + 1);
        }
        self.status = PackageStatus::Active;
        self.updated_at = now;
    }

    #[must_use]
    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        self.expiration_date.is_some_and(|exp| exp < now)
    }

    /// Why this package cannot be charged right now, if it cannot.
    #[must_use]
    pub fn unusable_reason(&self, now: DateTime<Utc>) -> Option<&'static str> {
        if self.status != PackageStatus::Active {
            return Some(match self.status {
                PackageStatus::Depleted => "no classes remaining",
                _ => "package is expired",
            });
        }
        if self.is_expired(now) {
            return Some("package is expired");
        }
        if matches!(self.classes_remaining, Some(n) if n <= 0) {
            return Some("no classes remaining");
        }
        None
    }

    #[must_use]
    pub fn is_usable(&self, now: DateTime<Utc>) -> bool {
        self.unusable_reason(now).is_none()
    }

    /// Apply an instructor's edit. A new class count re-derives the status.
    pub fn apply_edit(&mut self, edit: PackageEdit, now: DateTime<Utc>) -> Result<(), DomainError> {
        let payment = Payment {
            method: edit.payment_method,
            amount_paid: edit.amount_paid,
            payment_id: edit.payment_id,
        }
        .normalized()?;
        self.payment_method = payment.method;
        self.amount_paid = payment.amount_paid;
        self.payment_id = payment.payment_id;
        self.purchase_date = edit.purchase_date;
        if let Some(expiration) = edit.expiration_date {
            self.expiration_date = Some(expiration);
        }
        if let Some(remaining) = edit.classes_remaining {
            self.classes_remaining = Some(remaining);
            self.status = if remaining <= 0 {
                PackageStatus::Depleted
            } else if self.is_expired(now) {
                PackageStatus::Expired
            } else {
                PackageStatus::Active
            };
        }
        self.updated_at = now;
        Ok(())
    }

    /// Sort key used when picking which package to charge: soonest
    /// expiration first, packages without an expiration last, then the
    /// oldest purchase.
    #[must_use]
    pub fn charge_order(&self) -> (bool, Option<DateTime<Utc>>, DateTime<Utc>) {
        (
            self.expiration_date.is_none(),
            self.expiration_date,
            self.purchase_date,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::id::ClassTypeId;
    use chrono::TimeZone;
    use rust_decimal_macros::dec;

    fn at(day: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 1, day, 12, 0, 0).unwrap()
    }

    fn package_type(structure: PackageStructure, expiration_days: Option<i32>) -> PackageType {
        PackageType {
            id: PackageTypeId::from("pt"),
            business_id: BusinessId::from("b"),
            name: "card".into(),
            structure,
            price: dec!(100),
            expiration_days,
            description: None,
            valid_for_class_types: None::<Vec<ClassTypeId>>,
            is_active: true,
            created_at: at(1),
        }
    }

    fn cash() -> Payment {
        Payment {
            method: PaymentMethod::Cash,
            amount_paid: dec!(100),
            payment_id: Some("  ".into()),
        }
        .normalized()
        .unwrap()
    }

    fn issue(structure: PackageStructure, expiration_days: Option<i32>) -> Package {
        Package::issue(
            &package_type(structure, expiration_days),
            UserId::from("s"),
            at(1),
            cash(),
            at(1),
        )
    }

    #[test]
    fn issue_fixed_count_copies_class_count() {
        let p = issue(PackageStructure::FixedCount { class_count: 10 }, Some(30));
        assert_eq!(p.classes_remaining, Some(10));
        assert_eq!(p.total_classes, Some(10));
        assert_eq!(p.expiration_date, Some(at(31)));
        assert_eq!(p.status, PackageStatus::Active);
        assert_eq!(p.payment_id, None);
    }

    #[test]
    fn weekly_limit_without_expiration_days_runs_for_its_months() {
        let p = issue(
            PackageStructure::WeeklyLimit {
                classes_per_week: 2,
                duration_months: 3,
            },
            None,
        );
        assert_eq!(p.classes_remaining, None);
        assert_eq!(p.classes_per_week, Some(2));
        assert_eq!(p.months_remaining, Some(3));
        assert_eq!(
            p.expiration_date,
            Some(Utc.with_ymd_and_hms(2026, 4, 1, 12, 0, 0).unwrap())
        );
    }

    #[test]
    fn unlimited_without_expiration_never_expires() {
        let p = issue(PackageStructure::Unlimited, None);
        assert_eq!(p.expiration_date, None);
        assert!(!p.is_expired(at(31)));
    }

    #[test]
    fn debit_depletes_at_zero() {
        let mut p = issue(PackageStructure::FixedCount { class_count: 2 }, None);
        p.debit(at(2));
        assert_eq!(p.classes_remaining, Some(1));
        assert_eq!(p.status, PackageStatus::Active);
        p.debit(at(3));
        assert_eq!(p.classes_remaining, Some(0));
        assert_eq!(p.status, PackageStatus::Depleted);
        assert!(!p.is_usable(at(3)));
    }

    #[test]
    fn credit_restores_and_reactivates() {
        let mut p = issue(PackageStructure::FixedCount { class_count: 1 }, None);
        p.debit(at(2));
        assert_eq!(p.status, PackageStatus::Depleted);
        p.credit(at(3));
        assert_eq!(p.classes_remaining, Some(1));
        assert_eq!(p.status, PackageStatus::Active);
    }

    #[test]
    fn unlimited_debit_leaves_count_alone() {
        let mut p = issue(PackageStructure::Unlimited, None);
        p.debit(at(2));
        assert_eq!(p.classes_remaining, None);
        assert_eq!(p.status, PackageStatus::Active);
    }

    #[test]
    fn expired_package_is_not_usable() {
        let p = issue(PackageStructure::FixedCount { class_count: 5 }, Some(10));
        assert!(p.is_usable(at(11)));
        assert_eq!(p.unusable_reason(at(12)), Some("package is expired"));
    }

    #[test]
    fn edit_with_new_count_rederives_status() {
        let mut p = issue(PackageStructure::FixedCount { class_count: 1 }, None);
        p.debit(at(2));
        p.apply_edit(
            PackageEdit {
                payment_method: PaymentMethod::Venmo,
                amount_paid: dec!(80),
                payment_id: Some(" tx-9 ".into()),
                purchase_date: at(1),
                classes_remaining: Some(4),
                expiration_date: None,
            },
            at(3),
        )
        .unwrap();
        assert_eq!(p.classes_remaining, Some(4));
        assert_eq!(p.status, PackageStatus::Active);
        assert_eq!(p.payment_id.as_deref(), Some("tx-9"));
    }

    #[test]
    fn edit_rejects_negative_amount() {
        let mut p = issue(PackageStructure::Unlimited, None);
        let err = p
            .apply_edit(
                PackageEdit {
                    payment_method: PaymentMethod::Cash,
                    amount_paid: dec!(-5),
                    payment_id: None,
                    purchase_date: at(1),
                    classes_remaining: None,
                    expiration_date: None,
                },
                at(2),
            )
            .unwrap_err();
        assert_eq!(
            err,
            DomainError::Negative {
                field: "amount paid"
            }
        );
    }

    #[test]
    fn charge_order_puts_open_ended_last() {
        let soon = issue(PackageStructure::FixedCount { class_count: 5 }, Some(5));
        let later = issue(PackageStructure::FixedCount { class_count: 5 }, Some(50));
        let never = issue(PackageStructure::FixedCount { class_count: 5 }, None);
        let mut all = vec![never.clone(), later.clone(), soon.clone()];
        all.sort_by_key(Package::charge_order);
        assert_eq!(all, vec![soon, later, never]);
    }

    #[test]
    fn charge_order_prefers_older_purchase_on_equal_expiration() {
        let older = issue(PackageStructure::Unlimited, None);
        let mut newer = issue(PackageStructure::Unlimited, None);
        newer.purchase_date = at(9);
        let mut all = vec![newer.clone(), older.clone()];
        all.sort_by_key(Package::charge_order);
        assert_eq!(all, vec![older, newer]);
    }
}
