use async_trait::async_trait;
use diesel::prelude::*;

use super::{parse_date, parse_time, parse_ts, ts, SqliteStore};
use crate::adapter::outbound::sqlite::database::model::ScheduleRow;
use crate::adapter::outbound::sqlite::database::schema::recurring_schedules;
use crate::domain::time::{format_date, format_time};
use crate::domain::{BusinessId, ClassTypeId, RecurringSchedule, ScheduleId, UserId};
use crate::error::{Error, Result};
use crate::port::outbound::store::ScheduleStore;

fn to_row(schedule: &RecurringSchedule) -> ScheduleRow {
    ScheduleRow {
        id: schedule.id.to_string(),
        business_id: schedule.business_id.to_string(),
        class_type_id: schedule.class_type_id.to_string(),
        instructor_id: schedule.instructor_id.to_string(),
        day_of_week: schedule.day_of_week,
        start_time: format_time(schedule.start_time),
        duration_minutes: schedule.duration_minutes,
        timezone: schedule.timezone.clone(),
        start_date: format_date(schedule.start_date),
        end_date: schedule.end_date.map(format_date),
        is_active: schedule.is_active,
        notes: schedule.notes.clone(),
        created_at: ts(schedule.created_at),
        updated_at: ts(schedule.updated_at),
    }
}

fn from_row(row: ScheduleRow) -> Result<RecurringSchedule> {
    Ok(RecurringSchedule {
        start_time: parse_time(&row.start_time)?,
        start_date: parse_date(&row.start_date)?,
        end_date: row.end_date.as_deref().map(parse_date).transpose()?,
        created_at: parse_ts(&row.created_at)?,
        updated_at: parse_ts(&row.updated_at)?,
        id: ScheduleId::from(row.id),
        business_id: BusinessId::from(row.business_id),
        class_type_id: ClassTypeId::from(row.class_type_id),
        instructor_id: UserId::from(row.instructor_id),
        day_of_week: row.day_of_week,
        duration_minutes: row.duration_minutes,
        timezone: row.timezone,
        is_active: row.is_active,
        notes: row.notes,
    })
}

#[async_trait]
impl ScheduleStore for SqliteStore {
    async fn insert_schedule(&self, schedule: &RecurringSchedule) -> Result<()> {
        let mut conn = self.conn()?;
        diesel::insert_into(recurring_schedules::table)
            .values(&to_row(schedule))
            .execute(&mut conn)?;
        Ok(())
    }

    async fn get_schedule(
        &self,
        business: &BusinessId,
        id: &ScheduleId,
    ) -> Result<Option<RecurringSchedule>> {
        let mut conn = self.conn()?;
        let row = recurring_schedules::table
            .filter(recurring_schedules::id.eq(id.as_str()))
            .filter(recurring_schedules::business_id.eq(business.as_str()))
            .select(ScheduleRow::as_select())
            .first(&mut conn)
            .optional()?;
        row.map(from_row).transpose()
    }

    async fn list_schedules(&self, business: &BusinessId) -> Result<Vec<RecurringSchedule>> {
        let mut conn = self.conn()?;
        let rows = recurring_schedules::table
            .filter(recurring_schedules::business_id.eq(business.as_str()))
            .order((
                recurring_schedules::day_of_week.asc(),
                recurring_schedules::start_time.asc(),
            ))
            .select(ScheduleRow::as_select())
            .load(&mut conn)?;
        rows.into_iter().map(from_row).collect()
    }

    async fn update_schedule(&self, schedule: &RecurringSchedule) -> Result<()> {
        let mut conn = self.conn()?;
        let updated = diesel::update(
            recurring_schedules::table
                .filter(recurring_schedules::id.eq(schedule.id.as_str()))
                .filter(recurring_schedules::business_id.eq(schedule.business_id.as_str())),
        )
        .set(&to_row(schedule))
        .execute(&mut conn)?;
        if updated == 0 {
            return Err(Error::not_found("schedule", &schedule.id));
        }
        Ok(())
    }

    async fn delete_schedule(&self, business: &BusinessId, id: &ScheduleId) -> Result<bool> {
        let mut conn = self.conn()?;
        let deleted = diesel::delete(
            recurring_schedules::table
                .filter(recurring_schedules::id.eq(id.as_str()))
                .filter(recurring_schedules::business_id.eq(business.as_str())),
        )
        .execute(&mut conn)?;
        Ok(deleted > 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapter::outbound::sqlite::store::fixtures::{studio, t0, Studio};
    use crate::domain::schedule::ScheduleFields;
    use crate::port::outbound::store::ClassStore;
    use chrono::NaiveDate;

    fn fields(s: &Studio, day: i32) -> ScheduleFields {
        ScheduleFields {
            class_type_id: s.class_type.id.clone(),
            instructor_id: s.instructor.id.clone(),
            day_of_week: day,
            start_time: "19:00".into(),
            duration_minutes: 60,
            timezone: "America/Los_Angeles".into(),
            start_date: NaiveDate::from_ymd_opt(2026, 3, 1).unwrap(),
            end_date: None,
            is_active: true,
            notes: None,
        }
    }

    #[tokio::test]
    async fn schedules_roundtrip_and_sort_by_weekday() {
        let s = studio().await;
        let thursday =
            RecurringSchedule::create(s.business.id.clone(), fields(&s, 4), t0()).unwrap();
        let tuesday =
            RecurringSchedule::create(s.business.id.clone(), fields(&s, 2), t0()).unwrap();
        s.store.insert_schedule(&thursday).await.unwrap();
        s.store.insert_schedule(&tuesday).await.unwrap();

        let listed = s.store.list_schedules(&s.business.id).await.unwrap();
        assert_eq!(listed, vec![tuesday, thursday]);
    }

    #[tokio::test]
    async fn deleting_a_schedule_keeps_its_classes() {
        let s = studio().await;
        let schedule =
            RecurringSchedule::create(s.business.id.clone(), fields(&s, 2), t0()).unwrap();
        s.store.insert_schedule(&schedule).await.unwrap();
        let class = schedule.instance_at(t0(), t0());
        assert!(s.store.insert_generated_class(&class).await.unwrap());

        assert!(s
            .store
            .delete_schedule(&s.business.id, &schedule.id)
            .await
            .unwrap());
        let kept = s
            .store
            .get_class(&s.business.id, &class.id)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(kept.recurring_schedule_id, None);
    }
}
