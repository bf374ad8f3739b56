//! Weekly recurring schedules and the class instances they generate.

use chrono::{DateTime, Datelike, Duration, LocalResult, NaiveDate, NaiveTime, TimeZone, Utc};
use chrono_tz::Tz;
use serde::{Deserialize, Serialize};

use super::class::{Class, ClassStatus};
use super::class_type::trim_optional;
use super::error::DomainError;
use super::id::{BusinessId, ClassId, ClassTypeId, ScheduleId, UserId};

/// Largest window `occurrences` will expand in one call.
pub const MAX_GENERATION_DAYS: i64 = 366;

pub const DAYS_OF_WEEK: [&str; 7] = [
    "Sunday",
    "Monday",
    "Tuesday",
    "Wednesday",
    "Thursday",
    "Friday",
    "Saturday",
];

/// A weekly class template.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecurringSchedule {
    pub id: ScheduleId,
    pub business_id: BusinessId,
    pub class_type_id: ClassTypeId,
    pub instructor_id: UserId,
    /// 0 = Sunday ... 6 = Saturday.
    pub day_of_week: i32,
    pub start_time: NaiveTime,
    pub duration_minutes: i32,
    /// IANA zone name the start time is expressed in.
    pub timezone: String,
    pub start_date: NaiveDate,
    pub end_date: Option<NaiveDate>,
    pub is_active: bool,
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Editable schedule fields as submitted by a client.
#[derive(Debug, Clone, Deserialize)]
pub struct ScheduleFields {
    pub class_type_id: ClassTypeId,
    pub instructor_id: UserId,
    pub day_of_week: i32,
    /// `HH:MM` or `HH:MM:SS`.
    pub start_time: String,
    pub duration_minutes: i32,
    #[serde(default = "default_timezone")]
    pub timezone: String,
    pub start_date: NaiveDate,
    #[serde(default)]
    pub end_date: Option<NaiveDate>,
    #[serde(default = "default_true")]
    pub is_active: bool,
    #[serde(default)]
    pub notes: Option<String>,
}

fn default_timezone() -> String {
    "America/Los_Angeles".to_string()
}

fn default_true() -> bool {
    true
}

/// Validated form of [`ScheduleFields`].
struct ValidSchedule {
    class_type_id: ClassTypeId,
    instructor_id: UserId,
    day_of_week: i32,
    start_time: NaiveTime,
    duration_minutes: i32,
    timezone: String,
    start_date: NaiveDate,
    end_date: Option<NaiveDate>,
    is_active: bool,
    notes: Option<String>,
}

impl ScheduleFields {
    fn validate(self) -> Result<ValidSchedule, DomainError> {
        if !(0..=6).contains(&self.day_of_week) {
            return Err(DomainError::InvalidDayOfWeek(self.day_of_week));
        }
        if self.duration_minutes <= 0 {
            return Err(DomainError::NotPositive { field: "duration" });
        }
        let start_time = super::time::parse_time(self.start_time.trim())?;
        let timezone = self.timezone.trim().to_string();
        parse_timezone(&timezone)?;
        if matches!(self.end_date, Some(end) if end < self.start_date) {
            return Err(DomainError::EndBeforeStart);
        }
        Ok(ValidSchedule {
            class_type_id: self.class_type_id,
            instructor_id: self.instructor_id,
            day_of_week: self.day_of_week,
            start_time,
            duration_minutes: self.duration_minutes,
            timezone,
            start_date: self.start_date,
            end_date: self.end_date,
            is_active: self.is_active,
            notes: trim_optional(self.notes),
        })
    }
}

pub fn parse_timezone(name: &str) -> Result<Tz, DomainError> {
    name.parse::<Tz>()
        .map_err(|_| DomainError::InvalidTimezone(name.to_string()))
}

impl RecurringSchedule {
    pub fn create(
        business_id: BusinessId,
        fields: ScheduleFields,
        now: DateTime<Utc>,
    ) -> Result<Self, DomainError> {
        let v = fields.validate()?;
        Ok(Self {
            id: ScheduleId::new(),
            business_id,
            class_type_id: v.class_type_id,
            instructor_id: v.instructor_id,
            day_of_week: v.day_of_week,
            start_time: v.start_time,
            duration_minutes: v.duration_minutes,
            timezone: v.timezone,
            start_date: v.start_date,
            end_date: v.end_date,
            is_active: v.is_active,
            notes: v.notes,
            created_at: now,
            updated_at: now,
        })
    }

    pub fn apply(&mut self, fields: ScheduleFields, now: DateTime<Utc>) -> Result<(), DomainError> {
        let v = fields.validate()?;
        self.class_type_id = v.class_type_id;
        self.instructor_id = v.instructor_id;
        self.day_of_week = v.day_of_week;
        self.start_time = v.start_time;
        self.duration_minutes = v.duration_minutes;
        self.timezone = v.timezone;
        self.start_date = v.start_date;
        self.end_date = v.end_date;
        self.is_active = v.is_active;
        self.notes = v.notes;
        self.updated_at = now;
        Ok(())
    }

    /// "Tuesday at 19:00:00", for logs and confirmations.
    #[must_use]
    pub fn label(&self) -> String {
        let day = usize::try_from(self.day_of_week)
            .ok()
            .and_then(|d| DAYS_OF_WEEK.get(d))
            .copied()
            .unwrap_or("?");
        format!("{day} at {}", super::time::format_time(self.start_time))
    }

    /// Start instants (UTC) of every occurrence between `from` and `to`,
    /// inclusive, clipped to the schedule's own date range.
    ///
    /// Local times that fall in a DST gap are skipped; ambiguous local times
    /// resolve to the earlier instant.
    pub fn occurrences(
        &self,
        from: NaiveDate,
        to: NaiveDate,
    ) -> Result<Vec<DateTime<Utc>>, DomainError> {
        if to < from {
            return Err(DomainError::EndBeforeStart);
        }
        if (to - from).num_days() > MAX_GENERATION_DAYS {
            return Err(DomainError::WindowTooLarge {
                max_days: MAX_GENERATION_DAYS,
            });
        }
        let tz = parse_timezone(&self.timezone)?;
        let first = from.max(self.start_date);
        let last = match self.end_date {
            Some(end) => to.min(end),
            None => to,
        };

        let mut out = Vec::new();
        let mut day = first;
        while day <= last {
            if i64::from(day.weekday().num_days_from_sunday()) == i64::from(self.day_of_week) {
                let local = day.and_time(self.start_time);
                match tz.from_local_datetime(&local) {
                    LocalResult::Single(at) => out.push(at.with_timezone(&Utc)),
                    LocalResult::Ambiguous(earlier, _) => out.push(earlier.with_timezone(&Utc)),
                    LocalResult::None => {}
                }
            }
            day += Duration::days(1);
        }
        Ok(out)
    }

    /// Build the class instance for one occurrence.
    #[must_use]
    pub fn instance_at(&self, scheduled_at: DateTime<Utc>, now: DateTime<Utc>) -> Class {
        Class {
            id: ClassId::new(),
            business_id: self.business_id.clone(),
            class_type_id: self.class_type_id.clone(),
            instructor_id: self.instructor_id.clone(),
            recurring_schedule_id: Some(self.id.clone()),
            scheduled_at,
            duration_minutes: self.duration_minutes,
            notes: self.notes.clone(),
            status: ClassStatus::Scheduled,
            created_at: now,
            updated_at: now,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn fields(day_of_week: i32, tz: &str) -> ScheduleFields {
        ScheduleFields {
            class_type_id: ClassTypeId::from("ct"),
            instructor_id: UserId::from("i"),
            day_of_week,
            start_time: "19:00".into(),
            duration_minutes: 60,
            timezone: tz.into(),
            start_date: date(2026, 3, 1),
            end_date: Some(date(2026, 3, 31)),
            is_active: true,
            notes: None,
        }
    }

    fn schedule(day_of_week: i32, tz: &str) -> RecurringSchedule {
        RecurringSchedule::create(BusinessId::from("b"), fields(day_of_week, tz), Utc::now())
            .unwrap()
    }

    #[test]
    fn tuesdays_in_march_utc() {
        let s = schedule(2, "UTC");
        let occ = s.occurrences(date(2026, 1, 1), date(2026, 12, 31)).unwrap();
        let days: Vec<u32> = occ.iter().map(|d| d.day()).collect();
        assert_eq!(days, vec![3, 10, 17, 24, 31]);
        assert!(occ.iter().all(|d| d.format("%H:%M").to_string() == "19:00"));
    }

    #[test]
    fn local_time_is_converted_across_dst() {
        // US DST starts 2026-03-08: 19:00 PST = 03:00Z, 19:00 PDT = 02:00Z.
        let s = schedule(0, "America/Los_Angeles");
        let occ = s.occurrences(date(2026, 3, 1), date(2026, 3, 8)).unwrap();
        assert_eq!(occ.len(), 2);
        assert_eq!(occ[0].to_rfc3339(), "2026-03-02T03:00:00+00:00");
        assert_eq!(occ[1].to_rfc3339(), "2026-03-09T02:00:00+00:00");
    }

    fn sunday_at(start_time: &str) -> RecurringSchedule {
        let mut f = fields(0, "America/Los_Angeles");
        f.start_time = start_time.into();
        f.end_date = None;
        RecurringSchedule::create(BusinessId::from("b"), f, Utc::now()).unwrap()
    }

    #[test]
    fn time_in_spring_forward_gap_is_skipped() {
        // 02:30 does not exist on 2026-03-08 in Los Angeles.
        let occ = sunday_at("02:30")
            .occurrences(date(2026, 3, 1), date(2026, 3, 15))
            .unwrap();
        let stamps: Vec<String> = occ.iter().map(|d| d.to_rfc3339()).collect();
        assert_eq!(
            stamps,
            vec!["2026-03-01T10:30:00+00:00", "2026-03-15T09:30:00+00:00"]
        );
    }

    #[test]
    fn repeated_fall_back_hour_takes_the_first_instant() {
        let occ = sunday_at("01:30")
            .occurrences(date(2026, 11, 1), date(2026, 11, 1))
            .unwrap();
        assert_eq!(occ.len(), 1);
        assert_eq!(occ[0].to_rfc3339(), "2026-11-01T08:30:00+00:00");
    }

    #[test]
    fn window_is_clipped_to_schedule_range() {
        let s = schedule(2, "UTC");
        let occ = s.occurrences(date(2026, 3, 11), date(2026, 3, 20)).unwrap();
        assert_eq!(occ.len(), 1);
    }

    #[test]
    fn oversized_window_is_rejected() {
        let s = schedule(2, "UTC");
        assert_eq!(
            s.occurrences(date(2026, 1, 1), date(2027, 6, 1)),
            Err(DomainError::WindowTooLarge { max_days: 366 })
        );
    }

    #[test]
    fn invalid_fields_are_rejected() {
        let err = RecurringSchedule::create(BusinessId::from("b"), fields(7, "UTC"), Utc::now())
            .unwrap_err();
        assert_eq!(err, DomainError::InvalidDayOfWeek(7));

        let err =
            RecurringSchedule::create(BusinessId::from("b"), fields(1, "Mars/Olympus"), Utc::now())
                .unwrap_err();
        assert_eq!(err, DomainError::InvalidTimezone("Mars/Olympus".into()));

        let mut f = fields(1, "UTC");
        f.end_date = Some(date(2026, 2, 1));
        assert_eq!(
            RecurringSchedule::create(BusinessId::from("b"), f, Utc::now()).unwrap_err(),
            DomainError::EndBeforeStart
        );
    }

    #[test]
    fn instance_links_back_to_schedule() {
        let s = schedule(2, "UTC");
        let at = s.occurrences(date(2026, 3, 1), date(2026, 3, 7)).unwrap()[0];
        let class = s.instance_at(at, Utc::now());
        assert_eq!(class.recurring_schedule_id, Some(s.id.clone()));
        assert_eq!(class.status, ClassStatus::Scheduled);
        assert_eq!(s.label(), "Tuesday at 19:00:00");
    }
}
