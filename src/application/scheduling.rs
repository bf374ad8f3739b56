//! Recurring schedules, class instances and the student's upcoming view.

use std::collections::HashSet;
use std::sync::Arc;

use chrono::NaiveDate;
use serde::Serialize;
use tracing::info;

use super::{AttendancePolicy, Clock};
use crate::domain::class::ClassFields;
use crate::domain::schedule::ScheduleFields;
use crate::domain::time::start_of_day;
use crate::domain::{
    BusinessId, CheckInStatus, Class, ClassId, ClassStatus, ClassTypeId, DomainError,
    RecurringSchedule, Role, ScheduleId, UserId,
};
use crate::error::{Error, Result};
use crate::port::{AttendanceQuery, ClassQuery, Store};

/// A class on a student's upcoming list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UpcomingClass {
    #[serde(flatten)]
    pub class: Class,
    pub check_in: CheckInStatus,
    pub check_in_message: String,
}

/// Recurring schedules, class instances and the upcoming-classes view.
#[derive(Clone)]
pub struct SchedulingService {
    store: Arc<dyn Store>,
    clock: Clock,
    policy: AttendancePolicy,
}

impl SchedulingService {
    pub fn new(store: Arc<dyn Store>, clock: Clock, policy: AttendancePolicy) -> Self {
        Self {
            store,
            clock,
            policy,
        }
    }

    /// The class type and instructor must belong to the business, and the
    /// instructor must be staff.
    async fn check_refs(
        &self,
        business: &BusinessId,
        class_type: &ClassTypeId,
        instructor: &UserId,
    ) -> Result<()> {
        if self
            .store
            .get_class_type(business, class_type)
            .await?
            .is_none()
        {
            return Err(Error::not_found("class type", class_type));
        }
        let instructor = self
            .store
            .get_user(business, instructor)
            .await?
            .ok_or_else(|| Error::not_found("instructor", instructor))?;
        instructor.ensure_staff()?;
        Ok(())
    }

    pub async fn create_schedule(
        &self,
        business: &BusinessId,
        fields: ScheduleFields,
    ) -> Result<RecurringSchedule> {
        self.check_refs(business, &fields.class_type_id, &fields.instructor_id)
            .await?;
        let schedule = RecurringSchedule::create(business.clone(), fields, self.clock.now())?;
        self.store.insert_schedule(&schedule).await?;
        info!(schedule_id = %schedule.id, when = %schedule.label(), "Schedule created");
        Ok(schedule)
    }

    pub async fn get_schedule(
        &self,
        business: &BusinessId,
        id: &ScheduleId,
    ) -> Result<RecurringSchedule> {
        self.store
            .get_schedule(business, id)
            .await?
            .ok_or_else(|| Error::not_found("schedule", id))
    }

    pub async fn list_schedules(&self, business: &BusinessId) -> Result<Vec<RecurringSchedule>> {
        self.store.list_schedules(business).await
    }

    /// Classes already generated keep their original times.
    pub async fn update_schedule(
        &self,
        business: &BusinessId,
        id: &ScheduleId,
        fields: ScheduleFields,
    ) -> Result<RecurringSchedule> {
        self.check_refs(business, &fields.class_type_id, &fields.instructor_id)
            .await?;
        let mut schedule = self.get_schedule(business, id).await?;
        schedule.apply(fields, self.clock.now())?;
        self.store.update_schedule(&schedule).await?;
        Ok(schedule)
    }

    pub async fn set_schedule_active(
        &self,
        business: &BusinessId,
        id: &ScheduleId,
        active: bool,
    ) -> Result<RecurringSchedule> {
        let mut schedule = self.get_schedule(business, id).await?;
        schedule.is_active = active;
        schedule.updated_at = self.clock.now();
        self.store.update_schedule(&schedule).await?;
        Ok(schedule)
    }

    /// Generated classes stay and become one-time classes.
    pub async fn delete_schedule(&self, business: &BusinessId, id: &ScheduleId) -> Result<()> {
        if !self.store.delete_schedule(business, id).await? {
            return Err(Error::not_found("schedule", id));
        }
        info!(schedule_id = %id, "Schedule deleted");
        Ok(())
    }

    /// Create the class instances of a schedule between two dates,
    /// inclusive. Occurrences that already exist are skipped; only new
    /// classes are returned.
    pub async fn generate(
        &self,
        business: &BusinessId,
        id: &ScheduleId,
        from: NaiveDate,
        to: NaiveDate,
    ) -> Result<Vec<Class>> {
        let schedule = self.get_schedule(business, id).await?;
        if !schedule.is_active {
            return Err(DomainError::ScheduleInactive.into());
        }
        let now = self.clock.now();
        let mut created = Vec::new();
        for at in schedule.occurrences(from, to)? {
            let class = schedule.instance_at(at, now);
            if self.store.insert_generated_class(&class).await? {
                created.push(class);
            }
        }
        info!(
            schedule_id = %schedule.id,
            when = %schedule.label(),
            %from,
            %to,
            created = created.len(),
            "Generated classes"
        );
        Ok(created)
    }

    pub async fn create_class(&self, business: &BusinessId, fields: ClassFields) -> Result<Class> {
        self.check_refs(business, &fields.class_type_id, &fields.instructor_id)
            .await?;
        let class = Class::one_time(business.clone(), fields, self.clock.now())?;
        self.store.insert_class(&class).await?;
        info!(class_id = %class.id, at = %class.scheduled_at, "Class created");
        Ok(class)
    }

    pub async fn get_class(&self, business: &BusinessId, id: &ClassId) -> Result<Class> {
        self.store
            .get_class(business, id)
            .await?
            .ok_or_else(|| Error::not_found("class", id))
    }

    pub async fn list_classes(&self, business: &BusinessId, query: &ClassQuery) -> Result<Vec<Class>> {
        self.store.list_classes(business, query).await
    }

    pub async fn update_class(
        &self,
        business: &BusinessId,
        id: &ClassId,
        fields: ClassFields,
    ) -> Result<Class> {
        self.check_refs(business, &fields.class_type_id, &fields.instructor_id)
            .await?;
        let mut class = self.get_class(business, id).await?;
        class.apply(fields, self.clock.now())?;
        self.store.update_class(&class).await?;
        Ok(class)
    }

    pub async fn set_class_status(
        &self,
        business: &BusinessId,
        id: &ClassId,
        status: ClassStatus,
    ) -> Result<Class> {
        let mut class = self.get_class(business, id).await?;
        class.status = status;
        class.updated_at = self.clock.now();
        self.store.update_class(&class).await?;
        info!(class_id = %class.id, status = %status, "Class status changed");
        Ok(class)
    }

    /// Attendance taken for the class is removed first so its packages are
    /// credited back.
    pub async fn delete_class(&self, business: &BusinessId, id: &ClassId) -> Result<()> {
        let class = self.get_class(business, id).await?;
        let records = self
            .store
            .list_attendance(
                business,
                &AttendanceQuery {
                    class_id: Some(class.id.clone()),
                    ..AttendanceQuery::default()
                },
            )
            .await?;
        let now = self.clock.now();
        for record in &records {
            self.store.remove_attendance(business, &record.id, now).await?;
        }
        if !self.store.delete_class(business, id).await? {
            return Err(Error::not_found("class", id));
        }
        info!(class_id = %id, refunded = records.len(), "Class deleted");
        Ok(())
    }

    /// Scheduled classes from the start of today through the configured
    /// window, each with the student's check-in status.
    pub async fn upcoming(&self, business: &BusinessId, student: &UserId) -> Result<Vec<UpcomingClass>> {
        match self.store.get_user(business, student).await? {
            Some(user) if user.role == Role::Student => {}
            _ => return Err(Error::not_found("student", student)),
        }
        let now = self.clock.now();
        let from = start_of_day(now);
        let to = now + self.policy.upcoming_window;

        let classes = self
            .store
            .list_classes(
                business,
                &ClassQuery {
                    status: Some(ClassStatus::Scheduled),
                    from: Some(from),
                    to: Some(to),
                    ..ClassQuery::default()
                },
            )
            .await?;
        let attended: HashSet<ClassId> = self
            .store
            .list_attendance(
                business,
                &AttendanceQuery {
                    student_id: Some(student.clone()),
                    class_from: Some(from),
                    ..AttendanceQuery::default()
                },
            )
            .await?
            .into_iter()
            .map(|a| a.class_id)
            .collect();

        Ok(classes
            .into_iter()
            .map(|class| {
                let check_in = class.check_in_status_with_lead(
                    now,
                    attended.contains(&class.id),
                    self.policy.check_in_lead,
                );
                UpcomingClass {
                    check_in_message: check_in.message(),
                    check_in,
                    class,
                }
            })
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapter::outbound::sqlite::store::fixtures::t0;
    use crate::application::testing::{harness_at, Harness};
    use crate::domain::Attendance;
    use crate::port::outbound::store::{AttendanceStore, ClassStore};
    use chrono::{Duration, TimeZone, Utc};

    fn weekly(h: &Harness, day: i32) -> ScheduleFields {
        ScheduleFields {
            class_type_id: h.studio.class_type.id.clone(),
            instructor_id: h.studio.instructor.id.clone(),
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

    fn date(m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, m, d).unwrap()
    }

    #[tokio::test]
    async fn schedule_instructor_must_be_staff() {
        let h = harness_at(t0()).await;
        let mut fields = weekly(&h, 2);
        fields.instructor_id = h.studio.student.id.clone();
        let err = h
            .services
            .scheduling
            .create_schedule(&h.studio.business.id, fields)
            .await
            .unwrap_err();
        assert!(matches!(err, Error::Domain(DomainError::WrongRole { .. })));
    }

    #[tokio::test]
    async fn generation_is_idempotent() {
        let h = harness_at(t0()).await;
        let business = &h.studio.business.id;
        let scheduling = &h.services.scheduling;
        let schedule = scheduling.create_schedule(business, weekly(&h, 2)).await.unwrap();

        let first = scheduling
            .generate(business, &schedule.id, date(3, 1), date(3, 31))
            .await
            .unwrap();
        assert_eq!(first.len(), 5);
        // 19:00 PST on 2026-03-03 is 03:00 UTC the next day; after the
        // DST switch it is 02:00 UTC.
        assert_eq!(
            first[0].scheduled_at,
            Utc.with_ymd_and_hms(2026, 3, 4, 3, 0, 0).unwrap()
        );
        assert_eq!(
            first[1].scheduled_at,
            Utc.with_ymd_and_hms(2026, 3, 11, 2, 0, 0).unwrap()
        );
        assert!(first
            .iter()
            .all(|c| c.recurring_schedule_id.as_ref() == Some(&schedule.id)));

        let again = scheduling
            .generate(business, &schedule.id, date(3, 1), date(4, 7))
            .await
            .unwrap();
        assert_eq!(again.len(), 1);

        let all = scheduling
            .list_classes(
                business,
                &ClassQuery {
                    schedule_id: Some(schedule.id.clone()),
                    ..ClassQuery::default()
                },
            )
            .await
            .unwrap();
        assert_eq!(all.len(), 6);
    }

    #[tokio::test]
    async fn inactive_schedule_does_not_generate() {
        let h = harness_at(t0()).await;
        let business = &h.studio.business.id;
        let scheduling = &h.services.scheduling;
        let schedule = scheduling.create_schedule(business, weekly(&h, 2)).await.unwrap();
        scheduling
            .set_schedule_active(business, &schedule.id, false)
            .await
            .unwrap();
        let err = scheduling
            .generate(business, &schedule.id, date(3, 1), date(3, 31))
            .await
            .unwrap_err();
        assert!(matches!(err, Error::Domain(DomainError::ScheduleInactive)));
    }

    #[tokio::test]
    async fn one_time_class_lifecycle() {
        let h = harness_at(t0()).await;
        let business = &h.studio.business.id;
        let scheduling = &h.services.scheduling;
        let class = scheduling
            .create_class(
                business,
                ClassFields {
                    class_type_id: h.studio.class_type.id.clone(),
                    instructor_id: h.studio.instructor.id.clone(),
                    scheduled_at: t0() + Duration::days(1),
                    duration_minutes: 90,
                    notes: Some(" Workshop ".into()),
                },
            )
            .await
            .unwrap();
        assert_eq!(class.notes.as_deref(), Some("Workshop"));

        let cancelled = scheduling
            .set_class_status(business, &class.id, ClassStatus::Cancelled)
            .await
            .unwrap();
        assert_eq!(cancelled.status, ClassStatus::Cancelled);

        let one_time = scheduling
            .list_classes(
                business,
                &ClassQuery {
                    one_time_only: true,
                    ..ClassQuery::default()
                },
            )
            .await
            .unwrap();
        assert_eq!(one_time.len(), 1);

        scheduling.delete_class(business, &class.id).await.unwrap();
        assert!(scheduling.get_class(business, &class.id).await.is_err());
    }

    #[tokio::test]
    async fn upcoming_annotates_check_in_status() {
        let now = t0();
        let h = harness_at(now).await;
        let business = &h.studio.business.id;
        let open = h.studio.class_at(now + Duration::minutes(30)).await;
        let soon = h.studio.class_at(now + Duration::minutes(90)).await;
        let later = h.studio.class_at(now + Duration::days(2)).await;
        let done = h.studio.class_at(now - Duration::hours(3)).await;
        h.studio.class_at(now + Duration::days(8)).await;
        let mut cancelled = h.studio.class_at(now + Duration::hours(5)).await;
        cancelled.status = ClassStatus::Cancelled;
        h.studio.store.update_class(&cancelled).await.unwrap();

        let attended = h.studio.class_at(now - Duration::minutes(10)).await;
        let pkg = h.studio.package(&h.studio.card).await;
        h.studio
            .store
            .record_attendance(&Attendance::record(
                business.clone(),
                attended.id.clone(),
                h.studio.student.id.clone(),
                pkg.id.clone(),
                h.studio.student.id.clone(),
                None,
                now,
            ))
            .await
            .unwrap();

        let upcoming = h
            .services
            .scheduling
            .upcoming(business, &h.studio.student.id)
            .await
            .unwrap();
        let states: Vec<_> = upcoming.iter().map(|u| (u.class.id.clone(), u.check_in)).collect();
        assert_eq!(
            states,
            vec![
                (done.id, CheckInStatus::Ended),
                (attended.id, CheckInStatus::CheckedIn),
                (open.id, CheckInStatus::Available),
                (soon.id, CheckInStatus::AvailableIn { minutes: 30 }),
                (later.id, CheckInStatus::NotYetAvailable),
            ]
        );
    }

    #[tokio::test]
    async fn upcoming_starts_at_midnight_utc() {
        let now = t0();
        let h = harness_at(now).await;
        let midnight = start_of_day(now);
        let first = h.studio.class_at(midnight).await;
        h.studio.class_at(midnight - Duration::minutes(1)).await;

        let upcoming = h
            .services
            .scheduling
            .upcoming(&h.studio.business.id, &h.studio.student.id)
            .await
            .unwrap();
        let ids: Vec<_> = upcoming.iter().map(|u| u.class.id.clone()).collect();
        assert_eq!(ids, vec![first.id]);
    }
}
