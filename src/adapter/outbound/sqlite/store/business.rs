use async_trait::async_trait;
use diesel::prelude::*;

use super::{parse_enum, parse_ts, ts, SqliteStore};
use crate::adapter::outbound::sqlite::database::model::BusinessRow;
use crate::adapter::outbound::sqlite::database::schema::businesses;
use crate::domain::{Business, BusinessId};
use crate::error::{Error, Result};
use crate::port::outbound::store::BusinessStore;

fn to_row(business: &Business) -> Result<BusinessRow> {
    Ok(BusinessRow {
        id: business.id.to_string(),
        name: business.name.clone(),
        logo_url: business.logo_url.clone(),
        primary_color: business.primary_color.clone(),
        secondary_color: business.secondary_color.clone(),
        payment_provider: business.payment_provider.as_str().to_string(),
        settings: serde_json::to_string(&business.settings)?,
        created_at: ts(business.created_at),
        updated_at: ts(business.updated_at),
    })
}

fn from_row(row: BusinessRow) -> Result<Business> {
    Ok(Business {
        payment_provider: parse_enum(&row.payment_provider)?,
        settings: serde_json::from_str(&row.settings).map_err(|e| Error::Parse(e.to_string()))?,
        created_at: parse_ts(&row.created_at)?,
        updated_at: parse_ts(&row.updated_at)?,
        id: BusinessId::from(row.id),
        name: row.name,
        logo_url: row.logo_url,
        primary_color: row.primary_color,
        secondary_color: row.secondary_color,
    })
}

#[async_trait]
impl BusinessStore for SqliteStore {
    async fn insert_business(&self, business: &Business) -> Result<()> {
        let row = to_row(business)?;
        let mut conn = self.conn()?;
        diesel::insert_into(businesses::table)
            .values(&row)
            .execute(&mut conn)?;
        Ok(())
    }

    async fn get_business(&self, id: &BusinessId) -> Result<Option<Business>> {
        let mut conn = self.conn()?;
        let row = businesses::table
            .find(id.as_str())
            .select(BusinessRow::as_select())
            .first(&mut conn)
            .optional()?;
        row.map(from_row).transpose()
    }

    async fn list_businesses(&self) -> Result<Vec<Business>> {
        let mut conn = self.conn()?;
        let rows = businesses::table
            .order(businesses::name.asc())
            .select(BusinessRow::as_select())
            .load(&mut conn)?;
        rows.into_iter().map(from_row).collect()
    }
}
