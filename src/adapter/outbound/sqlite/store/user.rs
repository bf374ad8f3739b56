use async_trait::async_trait;
use diesel::prelude::*;

use super::{parse_enum, parse_ts, ts, SqliteStore};
use crate::adapter::outbound::sqlite::database::model::UserRow;
use crate::adapter::outbound::sqlite::database::schema::users;
use crate::domain::{BusinessId, Role, User, UserId};
use crate::error::{Error, Result};
use crate::port::outbound::store::UserStore;

fn to_row(user: &User) -> UserRow {
    UserRow {
        id: user.id.to_string(),
        email: user.email.clone(),
        business_id: user.business_id.to_string(),
        role: user.role.as_str().to_string(),
        first_name: user.first_name.clone(),
        last_name: user.last_name.clone(),
        phone: user.phone.clone(),
        created_at: ts(user.created_at),
        updated_at: ts(user.updated_at),
    }
}

fn from_row(row: UserRow) -> Result<User> {
    Ok(User {
        role: parse_enum(&row.role)?,
        created_at: parse_ts(&row.created_at)?,
        updated_at: parse_ts(&row.updated_at)?,
        id: UserId::from(row.id),
        email: row.email,
        business_id: BusinessId::from(row.business_id),
        first_name: row.first_name,
        last_name: row.last_name,
        phone: row.phone,
    })
}

#[async_trait]
impl UserStore for SqliteStore {
    async fn insert_user(&self, user: &User) -> Result<()> {
        let mut conn = self.conn()?;
        diesel::insert_into(users::table)
            .values(&to_row(user))
            .execute(&mut conn)?;
        Ok(())
    }

    async fn get_user(&self, business: &BusinessId, id: &UserId) -> Result<Option<User>> {
        let mut conn = self.conn()?;
        let row = users::table
            .filter(users::id.eq(id.as_str()))
            .filter(users::business_id.eq(business.as_str()))
            .select(UserRow::as_select())
            .first(&mut conn)
            .optional()?;
        row.map(from_row).transpose()
    }

    async fn list_users(&self, business: &BusinessId, role: Role) -> Result<Vec<User>> {
        let mut conn = self.conn()?;
        let rows = users::table
            .filter(users::business_id.eq(business.as_str()))
            .filter(users::role.eq(role.as_str()))
            .order((users::last_name.asc(), users::first_name.asc()))
            .select(UserRow::as_select())
            .load(&mut conn)?;
        rows.into_iter().map(from_row).collect()
    }

    async fn update_user(&self, user: &User) -> Result<()> {
        let mut conn = self.conn()?;
        let updated = diesel::update(
            users::table
                .filter(users::id.eq(user.id.as_str()))
                .filter(users::business_id.eq(user.business_id.as_str())),
        )
        .set(&to_row(user))
        .execute(&mut conn)?;
        if updated == 0 {
            return Err(Error::not_found("user", &user.id));
        }
        Ok(())
    }

    async fn delete_user(&self, business: &BusinessId, id: &UserId) -> Result<bool> {
        let mut conn = self.conn()?;
        let deleted = diesel::delete(
            users::table
                .filter(users::id.eq(id.as_str()))
                .filter(users::business_id.eq(business.as_str())),
        )
        .execute(&mut conn)?;
        Ok(deleted > 0)
    }
}
