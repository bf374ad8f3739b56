use async_trait::async_trait;
use chrono::{DateTime, Utc};
use diesel::prelude::*;

use super::{parse_decimal, parse_enum, parse_opt_ts, parse_ts, ts, SqliteStore};
use crate::adapter::outbound::sqlite::database::model::PackageRow;
use crate::adapter::outbound::sqlite::database::schema::packages;
use crate::domain::{
    BusinessId, Package, PackageId, PackageStatus, PackageTypeId, UserId,
};
use crate::error::{Error, Result};
use crate::port::outbound::store::PackageStore;

pub(super) fn to_row(package: &Package) -> PackageRow {
    PackageRow {
        id: package.id.to_string(),
        student_id: package.student_id.to_string(),
        package_type_id: package.package_type_id.to_string(),
        business_id: package.business_id.to_string(),
        classes_remaining: package.classes_remaining,
        total_classes: package.total_classes,
        total_months: package.total_months,
        months_remaining: package.months_remaining,
        classes_per_week: package.classes_per_week,
        purchase_date: ts(package.purchase_date),
        expiration_date: package.expiration_date.map(ts),
        status: package.status.as_str().to_string(),
        payment_method: package.payment_method.as_str().to_string(),
        payment_id: package.payment_id.clone(),
        amount_paid: package.amount_paid.to_string(),
        created_at: ts(package.created_at),
        updated_at: ts(package.updated_at),
    }
}

pub(super) fn from_row(row: PackageRow) -> Result<Package> {
    Ok(Package {
        purchase_date: parse_ts(&row.purchase_date)?,
        expiration_date: parse_opt_ts(row.expiration_date.as_deref())?,
        status: parse_enum(&row.status)?,
        payment_method: parse_enum(&row.payment_method)?,
        amount_paid: parse_decimal(&row.amount_paid)?,
        created_at: parse_ts(&row.created_at)?,
        updated_at: parse_ts(&row.updated_at)?,
        id: PackageId::from(row.id),
        student_id: UserId::from(row.student_id),
        package_type_id: PackageTypeId::from(row.package_type_id),
        business_id: BusinessId::from(row.business_id),
        classes_remaining: row.classes_remaining,
        total_classes: row.total_classes,
        total_months: row.total_months,
        months_remaining: row.months_remaining,
        classes_per_week: row.classes_per_week,
        payment_id: row.payment_id,
    })
}

/// Load one package inside an open connection or transaction.
pub(super) fn load(
    conn: &mut SqliteConnection,
    business: &str,
    id: &str,
) -> Result<Option<Package>> {
    let row = packages::table
        .filter(packages::id.eq(id))
        .filter(packages::business_id.eq(business))
        .select(PackageRow::as_select())
        .first(conn)
        .optional()?;
    row.map(from_row).transpose()
}

/// Write back a package inside an open connection or transaction.
pub(super) fn save(conn: &mut SqliteConnection, package: &Package) -> Result<()> {
    let updated = diesel::update(
        packages::table
            .filter(packages::id.eq(package.id.as_str()))
            .filter(packages::business_id.eq(package.business_id.as_str())),
    )
    .set(&to_row(package))
    .execute(conn)?;
    if updated == 0 {
        return Err(Error::not_found("package", &package.id));
    }
    Ok(())
}

#[async_trait]
impl PackageStore for SqliteStore {
    async fn insert_package(&self, package: &Package) -> Result<()> {
        let mut conn = self.conn()?;
        diesel::insert_into(packages::table)
            .values(&to_row(package))
            .execute(&mut conn)?;
        Ok(())
    }

    async fn get_package(&self, business: &BusinessId, id: &PackageId) -> Result<Option<Package>> {
        let mut conn = self.conn()?;
        load(&mut conn, business.as_str(), id.as_str())
    }

    async fn list_packages(
        &self,
        business: &BusinessId,
        student: Option<&UserId>,
    ) -> Result<Vec<Package>> {
        let mut conn = self.conn()?;
        let mut query = packages::table
            .filter(packages::business_id.eq(business.as_str()))
            .select(PackageRow::as_select())
            .into_boxed();
        if let Some(student) = student {
            query = query.filter(packages::student_id.eq(student.as_str()));
        }
        let rows = query
            .order((packages::purchase_date.desc(), packages::created_at.desc()))
            .load(&mut conn)?;
        rows.into_iter().map(from_row).collect()
    }

    async fn update_package(&self, package: &Package) -> Result<()> {
        let mut conn = self.conn()?;
        save(&mut conn, package)
    }

    async fn active_packages(
        &self,
        business: &BusinessId,
        student: &UserId,
    ) -> Result<Vec<Package>> {
        let mut conn = self.conn()?;
        let rows = packages::table
            .filter(packages::business_id.eq(business.as_str()))
            .filter(packages::student_id.eq(student.as_str()))
            .filter(packages::status.eq(PackageStatus::Active.as_str()))
            .select(PackageRow::as_select())
            .load(&mut conn)?;
        let mut active = rows
            .into_iter()
            .map(from_row)
            .collect::<Result<Vec<_>>>()?;
        active.sort_by_key(Package::charge_order);
        Ok(active)
    }

    async fn expire_packages(&self, now: DateTime<Utc>) -> Result<usize> {
        let mut conn = self.conn()?;
        let now = ts(now);
        let expired = diesel::update(
            packages::table
                .filter(packages::status.eq(PackageStatus::Active.as_str()))
                .filter(packages::expiration_date.is_not_null())
                .filter(packages::expiration_date.lt(&now)),
        )
        .set((
            packages::status.eq(PackageStatus::Expired.as_str()),
            packages::updated_at.eq(&now),
        ))
        .execute(&mut conn)?;
        Ok(expired)
    }
}
