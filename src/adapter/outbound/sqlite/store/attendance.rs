//! Attendance rows and the package bookkeeping that travels with them.
//!
//! Marking and unmarking run inside one SQLite transaction so an
//! attendance row never exists without its debit, or vice versa.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use diesel::prelude::*;

use super::{package, parse_ts, ts, SqliteStore};
use crate::adapter::outbound::sqlite::database::model::AttendanceRow;
use crate::adapter::outbound::sqlite::database::schema::{attendance, classes};
use crate::domain::{
    Attendance, AttendanceId, BusinessId, ClassId, Package, PackageId, UserId,
};
use crate::error::{Error, Result};
use crate::port::outbound::store::{AttendanceQuery, AttendanceStore};

fn to_row(record: &Attendance) -> AttendanceRow {
    AttendanceRow {
        id: record.id.to_string(),
        class_id: record.class_id.to_string(),
        student_id: record.student_id.to_string(),
        package_id: record.package_id.to_string(),
        business_id: record.business_id.to_string(),
        recorded_by: record.recorded_by.to_string(),
        recorded_at: ts(record.recorded_at),
        notes: record.notes.clone(),
    }
}

fn from_row(row: AttendanceRow) -> Result<Attendance> {
    Ok(Attendance {
        recorded_at: parse_ts(&row.recorded_at)?,
        id: AttendanceId::from(row.id),
        class_id: ClassId::from(row.class_id),
        student_id: UserId::from(row.student_id),
        package_id: PackageId::from(row.package_id),
        business_id: BusinessId::from(row.business_id),
        recorded_by: UserId::from(row.recorded_by),
        notes: row.notes,
    })
}

#[async_trait]
impl AttendanceStore for SqliteStore {
    async fn record_attendance(&self, record: &Attendance) -> Result<Package> {
        let row = to_row(record);
        let mut conn = self.conn()?;
        conn.transaction::<_, Error, _>(|conn| {
            let mut pkg = package::load(conn, &row.business_id, &row.package_id)?
                .ok_or_else(|| Error::not_found("package", &row.package_id))?;

            diesel::insert_into(attendance::table)
                .values(&row)
                .execute(conn)?;

            pkg.debit(record.recorded_at);
            package::save(conn, &pkg)?;
            Ok(pkg)
        })
    }

    async fn remove_attendance(
        &self,
        business: &BusinessId,
        id: &AttendanceId,
        now: DateTime<Utc>,
    ) -> Result<Option<Package>> {
        let mut conn = self.conn()?;
        conn.transaction::<_, Error, _>(|conn| {
            let row = attendance::table
                .filter(attendance::id.eq(id.as_str()))
                .filter(attendance::business_id.eq(business.as_str()))
                .select(AttendanceRow::as_select())
                .first(conn)
                .optional()?;
            let Some(row) = row else {
                return Ok(None);
            };

            diesel::delete(attendance::table.find(&row.id)).execute(conn)?;

            let mut pkg = package::load(conn, business.as_str(), &row.package_id)?
                .ok_or_else(|| Error::not_found("package", &row.package_id))?;
            pkg.credit(now);
            package::save(conn, &pkg)?;
            Ok(Some(pkg))
        })
    }

    async fn find_attendance(
        &self,
        business: &BusinessId,
        class: &ClassId,
        student: &UserId,
    ) -> Result<Option<Attendance>> {
        let mut conn = self.conn()?;
        let row = attendance::table
            .filter(attendance::business_id.eq(business.as_str()))
            .filter(attendance::class_id.eq(class.as_str()))
            .filter(attendance::student_id.eq(student.as_str()))
            .select(AttendanceRow::as_select())
            .first(&mut conn)
            .optional()?;
        row.map(from_row).transpose()
    }

    async fn list_attendance(
        &self,
        business: &BusinessId,
        query: &AttendanceQuery,
    ) -> Result<Vec<Attendance>> {
        let mut conn = self.conn()?;
        let mut q = attendance::table
            .inner_join(classes::table)
            .filter(attendance::business_id.eq(business.as_str()))
            .select(AttendanceRow::as_select())
            .into_boxed();
        if let Some(student) = &query.student_id {
            q = q.filter(attendance::student_id.eq(student.to_string()));
        }
        if let Some(class) = &query.class_id {
            q = q.filter(attendance::class_id.eq(class.to_string()));
        }
        if let Some(package_id) = &query.package_id {
            q = q.filter(attendance::package_id.eq(package_id.to_string()));
        }
        if let Some(from) = query.class_from {
            q = q.filter(classes::scheduled_at.ge(ts(from)));
        }
        if let Some(before) = query.class_before {
            q = q.filter(classes::scheduled_at.lt(ts(before)));
        }
        let rows = q
            .order((attendance::recorded_at.desc(), attendance::id.asc()))
            .load(&mut conn)?;
        rows.into_iter().map(from_row).collect()
    }
}
