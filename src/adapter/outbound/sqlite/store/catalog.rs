//! Class types and package types.

use async_trait::async_trait;
use diesel::dsl::exists;
use diesel::prelude::*;

use super::{parse_decimal, parse_ts, ts, SqliteStore};
use crate::adapter::outbound::sqlite::database::model::{ClassTypeRow, PackageTypeRow};
use crate::adapter::outbound::sqlite::database::schema::{
    class_types, classes, package_types, packages, recurring_schedules,
};
use crate::domain::{
    BusinessId, ClassType, ClassTypeId, PackageStructure, PackageType, PackageTypeId,
};
use crate::error::{Error, Result};
use crate::port::outbound::store::{ClassTypeStore, PackageTypeStore};

fn class_type_row(class_type: &ClassType) -> ClassTypeRow {
    ClassTypeRow {
        id: class_type.id.to_string(),
        business_id: class_type.business_id.to_string(),
        name: class_type.name.clone(),
        description: class_type.description.clone(),
        is_active: class_type.is_active,
        created_at: ts(class_type.created_at),
    }
}

fn class_type_from_row(row: ClassTypeRow) -> Result<ClassType> {
    Ok(ClassType {
        created_at: parse_ts(&row.created_at)?,
        id: ClassTypeId::from(row.id),
        business_id: BusinessId::from(row.business_id),
        name: row.name,
        description: row.description,
        is_active: row.is_active,
    })
}

fn package_type_row(package_type: &PackageType) -> Result<PackageTypeRow> {
    let structure = package_type.structure;
    let valid_for_class_types = package_type
        .valid_for_class_types
        .as_ref()
        .map(serde_json::to_string)
        .transpose()?;
    Ok(PackageTypeRow {
        id: package_type.id.to_string(),
        business_id: package_type.business_id.to_string(),
        name: package_type.name.clone(),
        package_structure: structure.kind().to_string(),
        class_count: structure.class_count(),
        classes_per_week: structure.classes_per_week(),
        duration_months: structure.duration_months(),
        price: package_type.price.to_string(),
        expiration_days: package_type.expiration_days,
        description: package_type.description.clone(),
        valid_for_class_types,
        is_active: package_type.is_active,
        created_at: ts(package_type.created_at),
    })
}

fn package_type_from_row(row: PackageTypeRow) -> Result<PackageType> {
    let structure = PackageStructure::from_columns(
        &row.package_structure,
        row.class_count,
        row.classes_per_week,
        row.duration_months,
    )
    .map_err(|e| Error::Parse(e.to_string()))?;
    let valid_for_class_types = row
        .valid_for_class_types
        .as_deref()
        .map(serde_json::from_str::<Vec<ClassTypeId>>)
        .transpose()
        .map_err(|e| Error::Parse(e.to_string()))?;
    Ok(PackageType {
        structure,
        valid_for_class_types,
        price: parse_decimal(&row.price)?,
        created_at: parse_ts(&row.created_at)?,
        id: PackageTypeId::from(row.id),
        business_id: BusinessId::from(row.business_id),
        name: row.name,
        expiration_days: row.expiration_days,
        description: row.description,
        is_active: row.is_active,
    })
}

#[async_trait]
impl ClassTypeStore for SqliteStore {
    async fn insert_class_type(&self, class_type: &ClassType) -> Result<()> {
        let mut conn = self.conn()?;
        diesel::insert_into(class_types::table)
            .values(&class_type_row(class_type))
            .execute(&mut conn)?;
        Ok(())
    }

    async fn get_class_type(
        &self,
        business: &BusinessId,
        id: &ClassTypeId,
    ) -> Result<Option<ClassType>> {
        let mut conn = self.conn()?;
        let row = class_types::table
            .filter(class_types::id.eq(id.as_str()))
            .filter(class_types::business_id.eq(business.as_str()))
            .select(ClassTypeRow::as_select())
            .first(&mut conn)
            .optional()?;
        row.map(class_type_from_row).transpose()
    }

    async fn list_class_types(
        &self,
        business: &BusinessId,
        include_inactive: bool,
    ) -> Result<Vec<ClassType>> {
        let mut conn = self.conn()?;
        let mut query = class_types::table
            .filter(class_types::business_id.eq(business.as_str()))
            .select(ClassTypeRow::as_select())
            .into_boxed();
        if !include_inactive {
            query = query.filter(class_types::is_active.eq(true));
        }
        let rows = query.order(class_types::name.asc()).load(&mut conn)?;
        rows.into_iter().map(class_type_from_row).collect()
    }

    async fn update_class_type(&self, class_type: &ClassType) -> Result<()> {
        let mut conn = self.conn()?;
        let updated = diesel::update(
            class_types::table
                .filter(class_types::id.eq(class_type.id.as_str()))
                .filter(class_types::business_id.eq(class_type.business_id.as_str())),
        )
        .set(&class_type_row(class_type))
        .execute(&mut conn)?;
        if updated == 0 {
            return Err(Error::not_found("class type", &class_type.id));
        }
        Ok(())
    }

    async fn delete_class_type(&self, business: &BusinessId, id: &ClassTypeId) -> Result<bool> {
        let mut conn = self.conn()?;
        // SQLite reports RESTRICT violations without the foreign-key code,
        // so references are checked before the delete.
        conn.transaction::<_, Error, _>(|conn| {
            let scheduled: bool = diesel::select(exists(
                recurring_schedules::table
                    .filter(recurring_schedules::class_type_id.eq(id.as_str()))
                    .filter(recurring_schedules::business_id.eq(business.as_str())),
            ))
            .get_result(conn)?;
            let taught: bool = diesel::select(exists(
                classes::table
                    .filter(classes::class_type_id.eq(id.as_str()))
                    .filter(classes::business_id.eq(business.as_str())),
            ))
            .get_result(conn)?;
            if scheduled || taught {
                return Err(Error::Conflict(format!(
                    "class type {id} is used by schedules or classes"
                )));
            }
            let deleted = diesel::delete(
                class_types::table
                    .filter(class_types::id.eq(id.as_str()))
                    .filter(class_types::business_id.eq(business.as_str())),
            )
            .execute(conn)?;
            Ok(deleted > 0)
        })
    }
}

#[async_trait]
impl PackageTypeStore for SqliteStore {
    async fn insert_package_type(&self, package_type: &PackageType) -> Result<()> {
        let row = package_type_row(package_type)?;
        let mut conn = self.conn()?;
        diesel::insert_into(package_types::table)
            .values(&row)
            .execute(&mut conn)?;
        Ok(())
    }

    async fn get_package_type(
        &self,
        business: &BusinessId,
        id: &PackageTypeId,
    ) -> Result<Option<PackageType>> {
        let mut conn = self.conn()?;
        let row = package_types::table
            .filter(package_types::id.eq(id.as_str()))
            .filter(package_types::business_id.eq(business.as_str()))
            .select(PackageTypeRow::as_select())
            .first(&mut conn)
            .optional()?;
        row.map(package_type_from_row).transpose()
    }

    async fn list_package_types(
        &self,
        business: &BusinessId,
        include_inactive: bool,
    ) -> Result<Vec<PackageType>> {
        let mut conn = self.conn()?;
        let mut query = package_types::table
            .filter(package_types::business_id.eq(business.as_str()))
            .select(PackageTypeRow::as_select())
            .into_boxed();
        if !include_inactive {
            query = query.filter(package_types::is_active.eq(true));
        }
        let rows = query.load(&mut conn)?;
        let mut types = rows
            .into_iter()
            .map(package_type_from_row)
            .collect::<Result<Vec<_>>>()?;
        // Prices are stored as text, so order numerically here.
        types.sort_by(|a, b| a.price.cmp(&b.price).then_with(|| a.name.cmp(&b.name)));
        Ok(types)
    }

    async fn update_package_type(&self, package_type: &PackageType) -> Result<()> {
        let row = package_type_row(package_type)?;
        let mut conn = self.conn()?;
        let updated = diesel::update(
            package_types::table
                .filter(package_types::id.eq(package_type.id.as_str()))
                .filter(package_types::business_id.eq(package_type.business_id.as_str())),
        )
        .set(&row)
        .execute(&mut conn)?;
        if updated == 0 {
            return Err(Error::not_found("package type", &package_type.id));
        }
        Ok(())
    }

    async fn package_type_in_use(
        &self,
        business: &BusinessId,
        id: &PackageTypeId,
    ) -> Result<bool> {
        let mut conn = self.conn()?;
        let in_use = diesel::select(exists(
            packages::table
                .filter(packages::package_type_id.eq(id.as_str()))
                .filter(packages::business_id.eq(business.as_str())),
        ))
        .get_result(&mut conn)?;
        Ok(in_use)
    }
}
