//! Attendance records.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::class_type::trim_optional;
use super::id::{AttendanceId, BusinessId, ClassId, PackageId, UserId};

/// A student's visit to a class, and the package charged for it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Attendance {
    pub id: AttendanceId,
    pub class_id: ClassId,
    pub student_id: UserId,
    pub package_id: PackageId,
    pub business_id: BusinessId,
    /// Instructor who marked it, or the student on self check-in.
    pub recorded_by: UserId,
    pub recorded_at: DateTime<Utc>,
    pub notes: Option<String>,
}

impl Attendance {
    #[must_use]
    pub fn record(
        business_id: BusinessId,
        class_id: ClassId,
        student_id: UserId,
        package_id: PackageId,
        recorded_by: UserId,
        notes: Option<String>,
        now: DateTime<Utc>,
    ) -> Self {
        Self {
            id: AttendanceId::new(),
            class_id,
            student_id,
            package_id,
            business_id,
            recorded_by,
            recorded_at: now,
            notes: trim_optional(notes),
        }
    }

    #[must_use]
    pub fn is_self_check_in(&self) -> bool {
        self.recorded_by == self.student_id
    }
}
