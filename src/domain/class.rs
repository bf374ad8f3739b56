//! Class instances and the student check-in window.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

use super::class_type::trim_optional;
use super::error::DomainError;
use super::id::{BusinessId, ClassId, ClassTypeId, ScheduleId, UserId};

/// Check-in opens this long before a class starts.
pub const DEFAULT_CHECK_IN_LEAD_MINUTES: i64 = 60;

string_enum!(
    ClassStatus, "class status" {
        Scheduled => "scheduled",
        Completed => "completed",
        Cancelled => "cancelled",
    }
);

/// A single class instance, one-time or generated from a schedule.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Class {
    pub id: ClassId,
    pub business_id: BusinessId,
    pub class_type_id: ClassTypeId,
    pub instructor_id: UserId,
    /// Set when the class was generated from a recurring schedule.
    pub recurring_schedule_id: Option<ScheduleId>,
    pub scheduled_at: DateTime<Utc>,
    pub duration_minutes: i32,
    pub notes: Option<String>,
    pub status: ClassStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Editable fields of a one-time class.
#[derive(Debug, Clone, Deserialize)]
pub struct ClassFields {
    pub class_type_id: ClassTypeId,
    pub instructor_id: UserId,
    pub scheduled_at: DateTime<Utc>,
    pub duration_minutes: i32,
    #[serde(default)]
    pub notes: Option<String>,
}

impl ClassFields {
    pub fn normalized(self) -> Result<Self, DomainError> {
        if self.duration_minutes <= 0 {
            return Err(DomainError::NotPositive { field: "duration" });
        }
        Ok(Self {
            notes: trim_optional(self.notes),
            ..self
        })
    }
}

/// Where a class stands relative to a student's check-in window.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum CheckInStatus {
    CheckedIn,
    /// The window opens within the hour.
    AvailableIn { minutes: i64 },
    NotYetAvailable,
    Ended,
    Available,
}

impl CheckInStatus {
    /// Human-readable label.
    #[must_use]
    pub fn message(&self) -> String {
        match self {
            Self::CheckedIn => "Checked In".to_string(),
            Self::AvailableIn { minutes } => format!("Available in {minutes} min"),
            Self::NotYetAvailable => "Not yet available".to_string(),
            Self::Ended => "Class ended".to_string(),
            Self::Available => "Check In Available".to_string(),
        }
    }
}

impl Class {
    /// Create a one-time class (not tied to a schedule).
    pub fn one_time(
        business_id: BusinessId,
        fields: ClassFields,
        now: DateTime<Utc>,
    ) -> Result<Self, DomainError> {
        let f = fields.normalized()?;
        Ok(Self {
            id: ClassId::new(),
            business_id,
            class_type_id: f.class_type_id,
            instructor_id: f.instructor_id,
            recurring_schedule_id: None,
            scheduled_at: f.scheduled_at,
            duration_minutes: f.duration_minutes,
            notes: f.notes,
            status: ClassStatus::Scheduled,
            created_at: now,
            updated_at: now,
        })
    }

    pub fn apply(&mut self, fields: ClassFields, now: DateTime<Utc>) -> Result<(), DomainError> {
        let f = fields.normalized()?;
        self.class_type_id = f.class_type_id;
        self.instructor_id = f.instructor_id;
        self.scheduled_at = f.scheduled_at;
        self.duration_minutes = f.duration_minutes;
        self.notes = f.notes;
        self.updated_at = now;
        Ok(())
    }

    #[must_use]
    pub fn ends_at(&self) -> DateTime<Utc> {
        self.scheduled_at + Duration::minutes(i64::from(self.duration_minutes))
    }

    /// Check-in status with the default one-hour lead.
    #[must_use]
    pub fn check_in_status(&self, now: DateTime<Utc>, already_checked_in: bool) -> CheckInStatus {
        self.check_in_status_with_lead(
            now,
            already_checked_in,
            Duration::minutes(DEFAULT_CHECK_IN_LEAD_MINUTES),
        )
    }

    /// Students may check in from `lead` before the start until the class
    /// ends, both bounds inclusive.
    #[must_use]
    pub fn check_in_status_with_lead(
        &self,
        now: DateTime<Utc>,
        already_checked_in: bool,
        lead: Duration,
    ) -> CheckInStatus {
        if already_checked_in {
            return CheckInStatus::CheckedIn;
        }
        let opens = self.scheduled_at - lead;
        if now < opens {
            let minutes = (opens - now).num_minutes();
            return if minutes < 60 {
                CheckInStatus::AvailableIn { minutes }
            } else {
                CheckInStatus::NotYetAvailable
            };
        }
        if now > self.ends_at() {
            return CheckInStatus::Ended;
        }
        CheckInStatus::Available
    }

    /// Attendance can be taken for scheduled and completed classes.
    pub fn ensure_open_for_attendance(&self) -> Result<(), DomainError> {
        if self.status == ClassStatus::Cancelled {
            return Err(DomainError::ClassNotOpen {
                status: self.status.as_str(),
            });
        }
        Ok(())
    }
}
