use async_trait::async_trait;
use diesel::prelude::*;

use super::{parse_enum, parse_ts, ts, SqliteStore};
use crate::adapter::outbound::sqlite::database::model::ClassRow;
use crate::adapter::outbound::sqlite::database::schema::classes;
use crate::domain::{BusinessId, Class, ClassId, ClassTypeId, ScheduleId, UserId};
use crate::error::{Error, Result};
use crate::port::outbound::store::{ClassQuery, ClassStore};

pub(super) fn to_row(class: &Class) -> ClassRow {
    ClassRow {
        id: class.id.to_string(),
        business_id: class.business_id.to_string(),
        class_type_id: class.class_type_id.to_string(),
        instructor_id: class.instructor_id.to_string(),
        recurring_schedule_id: class.recurring_schedule_id.as_ref().map(ToString::to_string),
        scheduled_at: ts(class.scheduled_at),
        duration_minutes: class.duration_minutes,
        notes: class.notes.clone(),
        status: class.status.as_str().to_string(),
        created_at: ts(class.created_at),
        updated_at: ts(class.updated_at),
    }
}

pub(super) fn from_row(row: ClassRow) -> Result<Class> {
    Ok(Class {
        scheduled_at: parse_ts(&row.scheduled_at)?,
        status: parse_enum(&row.status)?,
        created_at: parse_ts(&row.created_at)?,
        updated_at: parse_ts(&row.updated_at)?,
        id: ClassId::from(row.id),
        business_id: BusinessId::from(row.business_id),
        class_type_id: ClassTypeId::from(row.class_type_id),
        instructor_id: UserId::from(row.instructor_id),
        recurring_schedule_id: row.recurring_schedule_id.map(ScheduleId::from),
        duration_minutes: row.duration_minutes,
        notes: row.notes,
    })
}

#[async_trait]
impl ClassStore for SqliteStore {
    async fn insert_class(&self, class: &Class) -> Result<()> {
        let mut conn = self.conn()?;
        diesel::insert_into(classes::table)
            .values(&to_row(class))
            .execute(&mut conn)?;
        Ok(())
    }

    async fn insert_generated_class(&self, class: &Class) -> Result<bool> {
        let mut conn = self.conn()?;
        // The (schedule, start) unique key turns a repeat into a no-op.
        let inserted = diesel::insert_or_ignore_into(classes::table)
            .values(&to_row(class))
            .execute(&mut conn)?;
        Ok(inserted > 0)
    }

    async fn get_class(&self, business: &BusinessId, id: &ClassId) -> Result<Option<Class>> {
        let mut conn = self.conn()?;
        let row = classes::table
            .filter(classes::id.eq(id.as_str()))
            .filter(classes::business_id.eq(business.as_str()))
            .select(ClassRow::as_select())
            .first(&mut conn)
            .optional()?;
        row.map(from_row).transpose()
    }

    async fn list_classes(&self, business: &BusinessId, query: &ClassQuery) -> Result<Vec<Class>> {
        let mut conn = self.conn()?;
        let mut q = classes::table
            .filter(classes::business_id.eq(business.as_str()))
            .select(ClassRow::as_select())
            .into_boxed();
        if query.one_time_only {
            q = q.filter(classes::recurring_schedule_id.is_null());
        }
        if let Some(schedule) = &query.schedule_id {
            q = q.filter(classes::recurring_schedule_id.eq(schedule.to_string()));
        }
        if let Some(status) = query.status {
            q = q.filter(classes::status.eq(status.as_str()));
        }
        if let Some(from) = query.from {
            q = q.filter(classes::scheduled_at.ge(ts(from)));
        }
        if let Some(to) = query.to {
            q = q.filter(classes::scheduled_at.le(ts(to)));
        }
        let rows = q.order(classes::scheduled_at.asc()).load(&mut conn)?;
        rows.into_iter().map(from_row).collect()
    }

    async fn update_class(&self, class: &Class) -> Result<()> {
        let mut conn = self.conn()?;
        let updated = diesel::update(
            classes::table
                .filter(classes::id.eq(class.id.as_str()))
                .filter(classes::business_id.eq(class.business_id.as_str())),
        )
        .set(&to_row(class))
        .execute(&mut conn)?;
        if updated == 0 {
            return Err(Error::not_found("class", &class.id));
        }
        Ok(())
    }

    async fn delete_class(&self, business: &BusinessId, id: &ClassId) -> Result<bool> {
        let mut conn = self.conn()?;
        let deleted = diesel::delete(
            classes::table
                .filter(classes::id.eq(id.as_str()))
                .filter(classes::business_id.eq(business.as_str())),
        )
        .execute(&mut conn)?;
        Ok(deleted > 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapter::outbound::sqlite::store::fixtures::{studio, t0};
    use crate::domain::ClassStatus;
    use chrono::Duration;

    #[tokio::test]
    async fn classes_list_in_start_order_within_bounds() {
        let s = studio().await;
        let late = s.class_at(t0() + Duration::days(2)).await;
        let early = s.class_at(t0() + Duration::days(1)).await;
        s.class_at(t0() + Duration::days(9)).await;

        let listed = s
            .store
            .list_classes(
                &s.business.id,
                &ClassQuery {
                    from: Some(t0()),
                    to: Some(t0() + Duration::days(7)),
                    ..ClassQuery::default()
                },
            )
            .await
            .unwrap();
        assert_eq!(listed, vec![early, late]);
    }

    #[tokio::test]
    async fn status_filter_and_update() {
        let s = studio().await;
        let mut class = s.class_at(t0()).await;
        class.status = ClassStatus::Cancelled;
        s.store.update_class(&class).await.unwrap();

        let scheduled = s
            .store
            .list_classes(
                &s.business.id,
                &ClassQuery {
                    status: Some(ClassStatus::Scheduled),
                    ..ClassQuery::default()
                },
            )
            .await
            .unwrap();
        assert!(scheduled.is_empty());
    }

    #[tokio::test]
    async fn unknown_instructor_is_a_conflict() {
        let s = studio().await;
        let mut class = s.class_at(t0()).await;
        class.id = ClassId::new();
        class.instructor_id = UserId::from("ghost");
        let err = s.store.insert_class(&class).await.unwrap_err();
        assert!(matches!(err, Error::Conflict(_)), "{err}");
    }
}
