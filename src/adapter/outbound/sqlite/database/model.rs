//! Database model types for Diesel ORM.
//!
//! Rows mirror the tables column for column. Updates write the whole row
//! (`treat_none_as_null`) so clearing an optional field persists.

use diesel::prelude::*;

use super::schema::{
    attendance, businesses, class_types, classes, package_types, packages, recurring_schedules,
    users,
};

/// Database row for a business.
#[derive(Queryable, Selectable, Insertable, Debug, Clone)]
#[diesel(table_name = businesses)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct BusinessRow {
    pub id: String,
    pub name: String,
    pub logo_url: Option<String>,
    pub primary_color: String,
    pub secondary_color: String,
    pub payment_provider: String,
    pub settings: String,
    pub created_at: String,
    pub updated_at: String,
}

/// Database row for a user profile.
#[derive(Queryable, Selectable, Insertable, AsChangeset, Debug, Clone)]
#[diesel(table_name = users)]
#[diesel(treat_none_as_null = true)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct UserRow {
    pub id: String,
    pub email: String,
    pub business_id: String,
    pub role: String,
    pub first_name: String,
    pub last_name: String,
    pub phone: Option<String>,
    pub created_at: String,
    pub updated_at: String,
}

/// Database row for a class type.
#[derive(Queryable, Selectable, Insertable, AsChangeset, Debug, Clone)]
#[diesel(table_name = class_types)]
#[diesel(treat_none_as_null = true)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct ClassTypeRow {
    pub id: String,
    pub business_id: String,
    pub name: String,
    pub description: Option<String>,
    pub is_active: bool,
    pub created_at: String,
}

/// Database row for a package type.
#[derive(Queryable, Selectable, Insertable, AsChangeset, Debug, Clone)]
#[diesel(table_name = package_types)]
#[diesel(treat_none_as_null = true)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct PackageTypeRow {
    pub id: String,
    pub business_id: String,
    pub name: String,
    pub package_structure: String,
    pub class_count: Option<i32>,
    pub classes_per_week: Option<i32>,
    pub duration_months: Option<i32>,
    /// Decimal rendered as text.
    pub price: String,
    pub expiration_days: Option<i32>,
    pub description: Option<String>,
    /// JSON array of class type ids.
    pub valid_for_class_types: Option<String>,
    pub is_active: bool,
    pub created_at: String,
}

/// Database row for a package.
#[derive(Queryable, Selectable, Insertable, AsChangeset, Debug, Clone)]
#[diesel(table_name = packages)]
#[diesel(treat_none_as_null = true)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct PackageRow {
    pub id: String,
    pub student_id: String,
    pub package_type_id: String,
    pub business_id: String,
    pub classes_remaining: Option<i32>,
    pub total_classes: Option<i32>,
    pub total_months: Option<i32>,
    pub months_remaining: Option<i32>,
    pub classes_per_week: Option<i32>,
    pub purchase_date: String,
    pub expiration_date: Option<String>,
    pub status: String,
    pub payment_method: String,
    pub payment_id: Option<String>,
    pub amount_paid: String,
    pub created_at: String,
    pub updated_at: String,
}

/// Database row for a recurring schedule.
#[derive(Queryable, Selectable, Insertable, AsChangeset, Debug, Clone)]
#[diesel(table_name = recurring_schedules)]
#[diesel(treat_none_as_null = true)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct ScheduleRow {
    pub id: String,
    pub business_id: String,
    pub class_type_id: String,
    pub instructor_id: String,
    pub day_of_week: i32,
    pub start_time: String,
    pub duration_minutes: i32,
    pub timezone: String,
    pub start_date: String,
    pub end_date: Option<String>,
    pub is_active: bool,
    pub notes: Option<String>,
    pub created_at: String,
    pub updated_at: String,
}

/// Database row for a class instance.
#[derive(Queryable, Selectable, Insertable, AsChangeset, Debug, Clone)]
#[diesel(table_name = classes)]
#[diesel(treat_none_as_null = true)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct ClassRow {
    pub id: String,
    pub business_id: String,
    pub class_type_id: String,
    pub instructor_id: String,
    pub recurring_schedule_id: Option<String>,
    pub scheduled_at: String,
    pub duration_minutes: i32,
    pub notes: Option<String>,
    pub status: String,
    pub created_at: String,
    pub updated_at: String,
}

/// Database row for an attendance record.
#[derive(Queryable, Selectable, Insertable, Debug, Clone)]
#[diesel(table_name = attendance)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct AttendanceRow {
    pub id: String,
    pub class_id: String,
    pub student_id: String,
    pub package_id: String,
    pub business_id: String,
    pub recorded_by: String,
    pub recorded_at: String,
    pub notes: Option<String>,
}
