//! Domain validation errors.
//!
//! Returned by validating constructors and by the rules that guard package
//! debits and check-ins. Messages are shown to studio staff and students
//! as-is, so they are phrased for people rather than logs.

use thiserror::Error;

/// Errors that occur when domain invariants are violated.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DomainError {
    /// A required field was empty or absent.
    #[error("{field} is required")]
    Required { field: &'static str },

    /// A text field exceeded its maximum length.
    #[error("{field} must be {max} characters or less")]
    TooLong { field: &'static str, max: usize },

    #[error("please enter a valid email address")]
    InvalidEmail,

    #[error("please enter a valid phone number")]
    InvalidPhone,

    #[error("password must be at least {min} characters long")]
    PasswordTooShort { min: usize },

    /// A count or duration that must be strictly positive was not.
    #[error("{field} must be greater than 0")]
    NotPositive { field: &'static str },

    /// A money amount was negative.
    #[error("{field} must be 0 or greater")]
    Negative { field: &'static str },

    #[error("day of week must be between 0 (Sunday) and 6 (Saturday), got {0}")]
    InvalidDayOfWeek(i32),

    #[error("invalid time of day: {0}")]
    InvalidTime(String),

    #[error("invalid date: {0}")]
    InvalidDate(String),

    #[error("unknown time zone: {0}")]
    InvalidTimezone(String),

    #[error("end date must not be before start date")]
    EndBeforeStart,

    #[error("date window must not exceed {max_days} days")]
    WindowTooLarge { max_days: i64 },

    #[error("unknown {field} value: {value}")]
    UnknownVariant { field: &'static str, value: String },

    /// The user exists but does not have the role the operation needs.
    #[error("user {user} is not a {expected}")]
    WrongRole { user: String, expected: &'static str },

    #[error("package type is not active")]
    PackageTypeInactive,

    #[error("package does not belong to this student")]
    PackageOwnerMismatch,

    #[error("package cannot be used: {reason}")]
    PackageNotUsable { reason: &'static str },

    #[error("no active packages with classes remaining")]
    NoUsablePackage,

    #[error("class is {status} and cannot take attendance")]
    ClassNotOpen { status: &'static str },

    #[error("check-in is not available: {reason}")]
    CheckInClosed { reason: String },

    #[error("recurring schedule is not active")]
    ScheduleInactive,
}
