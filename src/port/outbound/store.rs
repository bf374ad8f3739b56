//! Persistence ports, one trait per aggregate.
//!
//! Every method is scoped by [`BusinessId`]: a row that exists under another
//! business is indistinguishable from a row that does not exist.

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::domain::{
    Attendance, AttendanceId, Business, BusinessId, Class, ClassId, ClassStatus, ClassType,
    ClassTypeId, Package, PackageId, PackageType, PackageTypeId, RecurringSchedule, Role,
    ScheduleId, User, UserId,
};
use crate::error::Result;

/// Filters for listing classes.
#[derive(Debug, Clone, Default)]
pub struct ClassQuery {
    /// Only classes not generated from a schedule.
    pub one_time_only: bool,
    pub schedule_id: Option<ScheduleId>,
    pub status: Option<ClassStatus>,
    /// Inclusive lower bound on `scheduled_at`.
    pub from: Option<DateTime<Utc>>,
    /// Inclusive upper bound on `scheduled_at`.
    pub to: Option<DateTime<Utc>>,
}

/// Filters for listing attendance.
#[derive(Debug, Clone, Default)]
pub struct AttendanceQuery {
    pub student_id: Option<UserId>,
    pub class_id: Option<ClassId>,
    pub package_id: Option<PackageId>,
    /// Inclusive lower bound on the class start.
    pub class_from: Option<DateTime<Utc>>,
    /// Exclusive upper bound on the class start.
    pub class_before: Option<DateTime<Utc>>,
}

#[async_trait]
pub trait BusinessStore: Send + Sync {
    async fn insert_business(&self, business: &Business) -> Result<()>;

    async fn get_business(&self, id: &BusinessId) -> Result<Option<Business>>;

    async fn list_businesses(&self) -> Result<Vec<Business>>;
}

/// Staff and student profiles.
#[async_trait]
pub trait UserStore: Send + Sync {
    async fn insert_user(&self, user: &User) -> Result<()>;

    async fn get_user(&self, business: &BusinessId, id: &UserId) -> Result<Option<User>>;

    /// Users of a business with the given role, by last then first name.
    async fn list_users(&self, business: &BusinessId, role: Role) -> Result<Vec<User>>;

    async fn update_user(&self, user: &User) -> Result<()>;

    /// Delete a profile. Dependent packages and attendance go with it.
    async fn delete_user(&self, business: &BusinessId, id: &UserId) -> Result<bool>;
}

#[async_trait]
pub trait ClassTypeStore: Send + Sync {
    async fn insert_class_type(&self, class_type: &ClassType) -> Result<()>;

    async fn get_class_type(
        &self,
        business: &BusinessId,
        id: &ClassTypeId,
    ) -> Result<Option<ClassType>>;

    async fn list_class_types(
        &self,
        business: &BusinessId,
        include_inactive: bool,
    ) -> Result<Vec<ClassType>>;

    async fn update_class_type(&self, class_type: &ClassType) -> Result<()>;

    async fn delete_class_type(&self, business: &BusinessId, id: &ClassTypeId) -> Result<bool>;
}

#[async_trait]
pub trait PackageTypeStore: Send + Sync {
    async fn insert_package_type(&self, package_type: &PackageType) -> Result<()>;

    async fn get_package_type(
        &self,
        business: &BusinessId,
        id: &PackageTypeId,
    ) -> Result<Option<PackageType>>;

    /// Package types by ascending price.
    async fn list_package_types(
        &self,
        business: &BusinessId,
        include_inactive: bool,
    ) -> Result<Vec<PackageType>>;

    async fn update_package_type(&self, package_type: &PackageType) -> Result<()>;

    /// Whether any package references this type.
    async fn package_type_in_use(&self, business: &BusinessId, id: &PackageTypeId)
        -> Result<bool>;
}

/// Packages sold to students.
#[async_trait]
pub trait PackageStore: Send + Sync {
    async fn insert_package(&self, package: &Package) -> Result<()>;

    async fn get_package(&self, business: &BusinessId, id: &PackageId) -> Result<Option<Package>>;

    /// Packages newest first, optionally for one student.
    async fn list_packages(
        &self,
        business: &BusinessId,
        student: Option<&UserId>,
    ) -> Result<Vec<Package>>;

    async fn update_package(&self, package: &Package) -> Result<()>;

    /// Active packages of a student, soonest expiration first.
    async fn active_packages(&self, business: &BusinessId, student: &UserId)
        -> Result<Vec<Package>>;

    /// Mark every active package that expired before `now` as expired,
    /// across all businesses. Returns how many changed.
    async fn expire_packages(&self, now: DateTime<Utc>) -> Result<usize>;
}

#[async_trait]
pub trait ScheduleStore: Send + Sync {
    async fn insert_schedule(&self, schedule: &RecurringSchedule) -> Result<()>;

    async fn get_schedule(
        &self,
        business: &BusinessId,
        id: &ScheduleId,
    ) -> Result<Option<RecurringSchedule>>;

    /// Schedules by day of week then start time.
    async fn list_schedules(&self, business: &BusinessId) -> Result<Vec<RecurringSchedule>>;

    async fn update_schedule(&self, schedule: &RecurringSchedule) -> Result<()>;

    async fn delete_schedule(&self, business: &BusinessId, id: &ScheduleId) -> Result<bool>;
}

/// Class instances.
#[async_trait]
pub trait ClassStore: Send + Sync {
    async fn insert_class(&self, class: &Class) -> Result<()>;

    /// Insert a schedule-generated class unless that occurrence already
    /// exists. Returns whether a row was written.
    async fn insert_generated_class(&self, class: &Class) -> Result<bool>;

    async fn get_class(&self, business: &BusinessId, id: &ClassId) -> Result<Option<Class>>;

    /// Classes matching `query`, by ascending start.
    async fn list_classes(&self, business: &BusinessId, query: &ClassQuery) -> Result<Vec<Class>>;

    async fn update_class(&self, class: &Class) -> Result<()>;

    async fn delete_class(&self, business: &BusinessId, id: &ClassId) -> Result<bool>;
}

/// Attendance rows and the package arithmetic that goes with them.
#[async_trait]
pub trait AttendanceStore: Send + Sync {
    /// Insert the attendance row and debit its package as one unit.
    /// Returns the package after the debit.
    async fn record_attendance(&self, attendance: &Attendance) -> Result<Package>;

    /// Delete the attendance row and credit its package as one unit.
    /// Returns the package after the credit, or `None` if no such row.
    async fn remove_attendance(
        &self,
        business: &BusinessId,
        id: &AttendanceId,
        now: DateTime<Utc>,
    ) -> Result<Option<Package>>;

    async fn find_attendance(
        &self,
        business: &BusinessId,
        class: &ClassId,
        student: &UserId,
    ) -> Result<Option<Attendance>>;

    /// Attendance matching `query`, newest first.
    async fn list_attendance(
        &self,
        business: &BusinessId,
        query: &AttendanceQuery,
    ) -> Result<Vec<Attendance>>;
}

/// Everything the application layer persists.
pub trait Store:
    BusinessStore
    + UserStore
    + ClassTypeStore
    + PackageTypeStore
    + PackageStore
    + ScheduleStore
    + ClassStore
    + AttendanceStore
{
}

impl<T> Store for T where
    T: BusinessStore
        + UserStore
        + ClassTypeStore
        + PackageTypeStore
        + PackageStore
        + ScheduleStore
        + ClassStore
        + AttendanceStore
{
}
