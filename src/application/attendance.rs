//! Taking attendance and student self check-in.
//!
//! Both paths pick or verify a package, then hand the attendance row to
//! the store, which inserts it and debits the package in one transaction.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::info;

use super::packages::PackageService;
use super::{AttendancePolicy, Clock};
use crate::domain::{
    Attendance, AttendanceId, BusinessId, CheckInStatus, Class, ClassId, ClassStatus,
    DomainError, Package, PackageId, User, UserId,
};
use crate::error::{Error, Result};
use crate::port::{AttendanceQuery, Store};

/// An instructor marking a student present.
#[derive(Debug, Clone, Deserialize)]
pub struct MarkAttendance {
    pub class_id: ClassId,
    pub student_id: UserId,
    /// Charge this package; otherwise the best usable one is chosen.
    #[serde(default)]
    pub package_id: Option<PackageId>,
    pub recorded_by: UserId,
    #[serde(default)]
    pub notes: Option<String>,
}

/// An attendance row and the package state after the debit or credit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AttendanceOutcome {
    pub attendance: Attendance,
    pub package: Package,
}

/// Marks, check-ins and removals, each paired with a package debit or credit.
#[derive(Clone)]
pub struct AttendanceService {
    store: Arc<dyn Store>,
    packages: PackageService,
    clock: Clock,
    policy: AttendancePolicy,
}

impl AttendanceService {
    /// Create an attendance service.
    pub fn new(
        store: Arc<dyn Store>,
        packages: PackageService,
        clock: Clock,
        policy: AttendancePolicy,
    ) -> Self {
        Self {
            store,
            packages,
            clock,
            policy,
        }
    }

    async fn class(&self, business: &BusinessId, id: &ClassId) -> Result<Class> {
        self.store
            .get_class(business, id)
            .await?
            .ok_or_else(|| Error::not_found("class", id))
    }

    async fn user(&self, business: &BusinessId, id: &UserId, entity: &'static str) -> Result<User> {
        self.store
            .get_user(business, id)
            .await?
            .ok_or_else(|| Error::not_found(entity, id))
    }

    async fn ensure_not_marked(&self, class: &Class, student: &UserId) -> Result<()> {
        if self
            .store
            .find_attendance(&class.business_id, &class.id, student)
            .await?
            .is_some()
        {
            return Err(Error::Conflict(
                "student is already marked present for this class".into(),
            ));
        }
        Ok(())
    }

    async fn first_usable(&self, class: &Class, student: &UserId) -> Result<Package> {
        self.packages
            .usable(
                &class.business_id,
                student,
                Some(&class.class_type_id),
                class.scheduled_at,
            )
            .await?
            .into_iter()
            .next()
            .ok_or_else(|| DomainError::NoUsablePackage.into())
    }

    /// Record a student as present and charge a package.
    pub async fn mark(
        &self,
        business: &BusinessId,
        request: MarkAttendance,
    ) -> Result<AttendanceOutcome> {
        let class = self.class(business, &request.class_id).await?;
        class.ensure_open_for_attendance()?;
        let student = self.user(business, &request.student_id, "student").await?;
        student.ensure_student()?;
        let recorder = self.user(business, &request.recorded_by, "instructor").await?;
        recorder.ensure_staff()?;
        self.ensure_not_marked(&class, &student.id).await?;

        let package = match &request.package_id {
            Some(id) => {
                let package = self
                    .store
                    .get_package(business, id)
                    .await?
                    .ok_or_else(|| Error::not_found("package", id))?;
                if package.student_id != student.id {
                    return Err(DomainError::PackageOwnerMismatch.into());
                }
                self.packages
                    .ensure_usable(&package, &class.class_type_id, class.scheduled_at)
                    .await?;
                package
            }
            None => self.first_usable(&class, &student.id).await?,
        };

        let attendance = Attendance::record(
            business.clone(),
            class.id.clone(),
            student.id.clone(),
            package.id.clone(),
            recorder.id.clone(),
            request.notes,
            self.clock.now(),
        );
        let package = self.store.record_attendance(&attendance).await?;
        info!(
            class_id = %class.id,
            student_id = %student.id,
            package_id = %package.id,
            remaining = ?package.classes_remaining,
            "Attendance marked"
        );
        Ok(AttendanceOutcome {
            attendance,
            package,
        })
    }

    /// Self check-in inside the class's check-in window.
    pub async fn check_in(
        &self,
        business: &BusinessId,
        student: &UserId,
        class_id: &ClassId,
    ) -> Result<AttendanceOutcome> {
        let class = self.class(business, class_id).await?;
        if class.status != ClassStatus::Scheduled {
            return Err(DomainError::ClassNotOpen {
                status: class.status.as_str(),
            }
            .into());
        }
        let student = self.user(business, student, "student").await?;
        student.ensure_student()?;

        let now = self.clock.now();
        let already = self
            .store
            .find_attendance(business, &class.id, &student.id)
            .await?
            .is_some();
        let status = class.check_in_status_with_lead(now, already, self.policy.check_in_lead);
        match status {
            CheckInStatus::Available => {}
            CheckInStatus::CheckedIn => {
                return Err(Error::Conflict("already checked in to this class".into()))
            }
            other => {
                return Err(DomainError::CheckInClosed {
                    reason: other.message(),
                }
                .into())
            }
        }

        let package = self.first_usable(&class, &student.id).await?;
        let attendance = Attendance::record(
            business.clone(),
            class.id.clone(),
            student.id.clone(),
            package.id.clone(),
            student.id.clone(),
            None,
            now,
        );
        let package = self.store.record_attendance(&attendance).await?;
        info!(
            class_id = %class.id,
            student_id = %student.id,
            package_id = %package.id,
            "Student checked in"
        );
        Ok(AttendanceOutcome {
            attendance,
            package,
        })
    }

    /// Undo an attendance record and refund its package.
    pub async fn remove(&self, business: &BusinessId, id: &AttendanceId) -> Result<Package> {
        let package = self
            .store
            .remove_attendance(business, id, self.clock.now())
            .await?
            .ok_or_else(|| Error::not_found("attendance", id))?;
        info!(attendance_id = %id, package_id = %package.id, "Attendance removed");
        Ok(package)
    }

    /// Attendance newest first, filtered by `query`.
    pub async fn history(
        &self,
        business: &BusinessId,
        query: &AttendanceQuery,
    ) -> Result<Vec<Attendance>> {
        self.store.list_attendance(business, query).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapter::outbound::sqlite::store::fixtures::{t0, user};
    use crate::application::testing::{harness_at, Harness};
    use crate::domain::{PackageStatus, Role};
    use crate::port::outbound::store::{ClassStore, PackageStore, UserStore};
    use chrono::Duration;

    fn mark(h: &Harness, class: &Class, package: Option<&Package>) -> MarkAttendance {
        MarkAttendance {
            class_id: class.id.clone(),
            student_id: h.studio.student.id.clone(),
            package_id: package.map(|p| p.id.clone()),
            recorded_by: h.studio.instructor.id.clone(),
            notes: None,
        }
    }

    #[tokio::test]
    async fn mark_charges_soonest_expiring_package() {
        let h = harness_at(t0()).await;
        let business = &h.studio.business.id;
        let later = h.studio.package(&h.studio.card).await;
        let mut sooner = h.studio.package(&h.studio.card).await;
        sooner.expiration_date = Some(t0() + Duration::days(3));
        h.studio.store.update_package(&sooner).await.unwrap();

        let class = h.studio.class_at(t0()).await;
        let outcome = h
            .services
            .attendance
            .mark(business, mark(&h, &class, None))
            .await
            .unwrap();
        assert_eq!(outcome.package.id, sooner.id);
        assert_eq!(outcome.package.classes_remaining, Some(4));
        assert_ne!(outcome.package.id, later.id);
        assert!(!outcome.attendance.is_self_check_in());
    }

    #[tokio::test]
    async fn second_mark_is_a_conflict() {
        let h = harness_at(t0()).await;
        let business = &h.studio.business.id;
        h.studio.package(&h.studio.card).await;
        let class = h.studio.class_at(t0()).await;
        let attendance = &h.services.attendance;
        attendance.mark(business, mark(&h, &class, None)).await.unwrap();
        let err = attendance
            .mark(business, mark(&h, &class, None))
            .await
            .unwrap_err();
        assert!(matches!(err, Error::Conflict(_)));
    }

    #[tokio::test]
    async fn mark_rejects_cancelled_class_and_foreign_package() {
        let h = harness_at(t0()).await;
        let business = &h.studio.business.id;
        let pkg = h.studio.package(&h.studio.card).await;
        let mut class = h.studio.class_at(t0()).await;
        class.status = ClassStatus::Cancelled;
        h.studio.store.update_class(&class).await.unwrap();
        let err = h
            .services
            .attendance
            .mark(business, mark(&h, &class, Some(&pkg)))
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            Error::Domain(DomainError::ClassNotOpen { status: "cancelled" })
        ));

        let open = h.studio.class_at(t0() + Duration::hours(2)).await;
        let mut request = mark(&h, &open, Some(&pkg));
        let other = user(&h.studio.business, Role::Student, "bea@prisma.test", "Alvarez");
        h.studio.store.insert_user(&other).await.unwrap();
        request.student_id = other.id;
        let err = h
            .services
            .attendance
            .mark(business, request)
            .await
            .unwrap_err();
        assert!(matches!(err, Error::Domain(DomainError::PackageOwnerMismatch)));
    }

    #[tokio::test]
    async fn mark_without_packages_fails() {
        let h = harness_at(t0()).await;
        let class = h.studio.class_at(t0()).await;
        let err = h
            .services
            .attendance
            .mark(&h.studio.business.id, mark(&h, &class, None))
            .await
            .unwrap_err();
        assert!(matches!(err, Error::Domain(DomainError::NoUsablePackage)));
    }

    #[tokio::test]
    async fn last_class_depletes_and_removal_reactivates() {
        let h = harness_at(t0()).await;
        let business = &h.studio.business.id;
        let mut pkg = h.studio.package(&h.studio.card).await;
        pkg.classes_remaining = Some(1);
        h.studio.store.update_package(&pkg).await.unwrap();
        let class = h.studio.class_at(t0()).await;

        let outcome = h
            .services
            .attendance
            .mark(business, mark(&h, &class, Some(&pkg)))
            .await
            .unwrap();
        assert_eq!(outcome.package.status, PackageStatus::Depleted);

        let refunded = h
            .services
            .attendance
            .remove(business, &outcome.attendance.id)
            .await
            .unwrap();
        assert_eq!(refunded.classes_remaining, Some(1));
        assert_eq!(refunded.status, PackageStatus::Active);
        assert!(matches!(
            h.services.attendance.remove(business, &outcome.attendance.id).await,
            Err(Error::NotFound { .. })
        ));
    }

    #[tokio::test]
    async fn self_check_in_respects_the_window() {
        let h = harness_at(t0()).await;
        let business = &h.studio.business.id;
        h.studio.package(&h.studio.card).await;
        let student = h.studio.student.id.clone();

        let far = h.studio.class_at(t0() + Duration::hours(3)).await;
        let err = h
            .services
            .attendance
            .check_in(business, &student, &far.id)
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            Error::Domain(DomainError::CheckInClosed { .. })
        ));

        let open = h.studio.class_at(t0() + Duration::minutes(60)).await;
        let outcome = h
            .services
            .attendance
            .check_in(business, &student, &open.id)
            .await
            .unwrap();
        assert!(outcome.attendance.is_self_check_in());
        assert_eq!(outcome.package.classes_remaining, Some(4));

        let err = h
            .services
            .attendance
            .check_in(business, &student, &open.id)
            .await
            .unwrap_err();
        assert!(matches!(err, Error::Conflict(_)));
    }

    #[tokio::test]
    async fn deleting_a_class_refunds_its_attendance() {
        let h = harness_at(t0()).await;
        let business = &h.studio.business.id;
        let pkg = h.studio.package(&h.studio.card).await;
        let class = h.studio.class_at(t0()).await;
        h.services
            .attendance
            .mark(business, mark(&h, &class, Some(&pkg)))
            .await
            .unwrap();

        h.services
            .scheduling
            .delete_class(business, &class.id)
            .await
            .unwrap();
        let refunded = h.services.packages.get(business, &pkg.id).await.unwrap();
        assert_eq!(refunded.classes_remaining, Some(5));
    }
}
