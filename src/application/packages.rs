//! Selling packages to students and choosing which one pays for a class.

use std::collections::HashMap;
use std::sync::Arc;

use chrono::{DateTime, Datelike, Duration, Utc};
use serde::Deserialize;
use tracing::info;

use super::Clock;
use crate::domain::package::PackageEdit;
use crate::domain::time::start_of_day;
use crate::domain::{
    BusinessId, ClassTypeId, DomainError, Package, PackageId, PackageType, PackageTypeId,
    Payment, PaymentMethod, Role, UserId,
};
use crate::error::{Error, Result};
use crate::port::{AttendanceQuery, Store};

/// A package sale.
#[derive(Debug, Clone, Deserialize)]
pub struct AssignPackage {
    pub student_id: UserId,
    pub package_type_id: PackageTypeId,
    pub payment_method: PaymentMethod,
    pub amount_paid: rust_decimal::Decimal,
    #[serde(default)]
    pub payment_id: Option<String>,
    /// Defaults to now.
    #[serde(default)]
    pub purchase_date: Option<DateTime<Utc>>,
}

/// Sunday 00:00 UTC of the week containing `at`.
#[must_use]
pub fn week_start(at: DateTime<Utc>) -> DateTime<Utc> {
    let days_since_sunday = i64::from(at.weekday().num_days_from_sunday());
    start_of_day(at) - Duration::days(days_since_sunday)
}

/// Package sales, edits, usability and expiration.
#[derive(Clone)]
pub struct PackageService {
    store: Arc<dyn Store>,
    clock: Clock,
}

impl PackageService {
    /// Create a package service.
    pub fn new(store: Arc<dyn Store>, clock: Clock) -> Self {
        Self { store, clock }
    }

    async fn student(&self, business: &BusinessId, id: &UserId) -> Result<()> {
        match self.store.get_user(business, id).await? {
            Some(user) if user.role == Role::Student => Ok(()),
            _ => Err(Error::not_found("student", id)),
        }
    }

    pub async fn assign(&self, business: &BusinessId, request: AssignPackage) -> Result<Package> {
        self.student(business, &request.student_id).await?;
        let package_type = self
            .store
            .get_package_type(business, &request.package_type_id)
            .await?
            .ok_or_else(|| Error::not_found("package type", &request.package_type_id))?;
        if !package_type.is_active {
            return Err(DomainError::PackageTypeInactive.into());
        }
        let payment = Payment {
            method: request.payment_method,
            amount_paid: request.amount_paid,
            payment_id: request.payment_id,
        }
        .normalized()?;

        let now = self.clock.now();
        let package = Package::issue(
            &package_type,
            request.student_id,
            request.purchase_date.unwrap_or(now),
            payment,
            now,
        );
        self.store.insert_package(&package).await?;
        info!(
            package_id = %package.id,
            student_id = %package.student_id,
            package_type = %package_type.name,
            "Package assigned"
        );
        Ok(package)
    }

    pub async fn get(&self, business: &BusinessId, id: &PackageId) -> Result<Package> {
        self.store
            .get_package(business, id)
            .await?
            .ok_or_else(|| Error::not_found("package", id))
    }

    pub async fn edit(
        &self,
        business: &BusinessId,
        id: &PackageId,
        edit: PackageEdit,
    ) -> Result<Package> {
        let mut package = self.get(business, id).await?;
        package.apply_edit(edit, self.clock.now())?;
        self.store.update_package(&package).await?;
        Ok(package)
    }

    /// Packages of a business, newest first, optionally for one student.
    pub async fn list(&self, business: &BusinessId, student: Option<&UserId>) -> Result<Vec<Package>> {
        self.store.list_packages(business, student).await
    }

    pub async fn for_student(&self, business: &BusinessId, student: &UserId) -> Result<Vec<Package>> {
        self.student(business, student).await?;
        self.store.list_packages(business, Some(student)).await
    }

    /// Packages that can pay for a class right now, best candidate first.
    ///
    /// `week_of` selects the week whose attendance counts against weekly
    /// limits; `class_type` filters by coverage when given.
    pub async fn usable(
        &self,
        business: &BusinessId,
        student: &UserId,
        class_type: Option<&ClassTypeId>,
        week_of: DateTime<Utc>,
    ) -> Result<Vec<Package>> {
        let now = self.clock.now();
        let mut types: HashMap<PackageTypeId, PackageType> = HashMap::new();
        let mut usable = Vec::new();
        for package in self.store.active_packages(business, student).await? {
            if self
                .unusable_reason(&package, class_type, week_of, now, &mut types)
                .await?
                .is_none()
            {
                usable.push(package);
            }
        }
        Ok(usable)
    }

    /// [`usable`](Self::usable) for the current week, after checking the
    /// student exists.
    pub async fn usable_now(
        &self,
        business: &BusinessId,
        student: &UserId,
        class_type: Option<&ClassTypeId>,
    ) -> Result<Vec<Package>> {
        self.student(business, student).await?;
        self.usable(business, student, class_type, self.clock.now())
            .await
    }

    /// Fail unless `package` may pay for a class of `class_type` in the
    /// week of `week_of`.
    pub async fn ensure_usable(
        &self,
        package: &Package,
        class_type: &ClassTypeId,
        week_of: DateTime<Utc>,
    ) -> Result<()> {
        let mut types = HashMap::new();
        match self
            .unusable_reason(package, Some(class_type), week_of, self.clock.now(), &mut types)
            .await?
        {
            None => Ok(()),
            Some(reason) => Err(DomainError::PackageNotUsable { reason }.into()),
        }
    }

    async fn unusable_reason(
        &self,
        package: &Package,
        class_type: Option<&ClassTypeId>,
        week_of: DateTime<Utc>,
        now: DateTime<Utc>,
        types: &mut HashMap<PackageTypeId, PackageType>,
    ) -> Result<Option<&'static str>> {
        if let Some(reason) = package.unusable_reason(now) {
            return Ok(Some(reason));
        }
        if let Some(class_type) = class_type {
            if !types.contains_key(&package.package_type_id) {
                let pt = self
                    .store
                    .get_package_type(&package.business_id, &package.package_type_id)
                    .await?
                    .ok_or_else(|| Error::not_found("package type", &package.package_type_id))?;
                types.insert(pt.id.clone(), pt);
            }
            let covers = types
                .get(&package.package_type_id)
                .is_some_and(|pt| pt.covers(class_type));
            if !covers {
                return Ok(Some("package does not cover this class type"));
            }
        }
        if let Some(limit) = package.classes_per_week {
            let start = week_start(week_of);
            let used = self
                .store
                .list_attendance(
                    &package.business_id,
                    &AttendanceQuery {
                        package_id: Some(package.id.clone()),
                        class_from: Some(start),
                        class_before: Some(start + Duration::days(7)),
                        ..AttendanceQuery::default()
                    },
                )
                .await?
                .len();
            if used >= usize::try_from(limit).unwrap_or(0) {
                return Ok(Some("weekly limit reached"));
            }
        }
        Ok(None)
    }

    /// Mark every overdue active package as expired.
    pub async fn expire_overdue(&self) -> Result<usize> {
        let expired = self.store.expire_packages(self.clock.now()).await?;
        if expired > 0 {
            info!(count = expired, "Expired overdue packages");
        }
        Ok(expired)
    }
}
