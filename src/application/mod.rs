//! Application services (use cases).
//!
//! Each service validates its inputs against the domain rules, checks that
//! every referenced record belongs to the calling business, and then goes
//! through the store port. Services share one [`Clock`] so tests can pin
//! the current time.

pub mod attendance;
pub mod catalog;
pub mod packages;
pub mod roster;
pub mod scheduling;

use std::fmt;
use std::sync::Arc;

use chrono::{DateTime, Duration, Utc};

use crate::port::{IdentityProvider, Store};

pub use attendance::{AttendanceOutcome, AttendanceService, MarkAttendance};
pub use catalog::CatalogService;
pub use packages::{AssignPackage, PackageService};
pub use roster::{RosterService, StudentAdminError};
pub use scheduling::{SchedulingService, UpcomingClass};

/// Source of the current instant.
#[derive(Clone)]
pub struct Clock(Arc<dyn Fn() -> DateTime<Utc> + Send + Sync>);

impl Clock {
    /// Wall-clock time.
    #[must_use]
    pub fn system() -> Self {
        Self(Arc::new(Utc::now))
    }

    /// Always returns `at`.
    #[must_use]
    pub fn fixed(at: DateTime<Utc>) -> Self {
        Self(Arc::new(move || at))
    }

    #[must_use]
    pub fn now(&self) -> DateTime<Utc> {
        (self.0)()
    }
}

impl Default for Clock {
    fn default() -> Self {
        Self::system()
    }
}

impl fmt::Debug for Clock {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Clock").field(&self.now()).finish()
    }
}

/// Tunables for check-in and the upcoming-classes view.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AttendancePolicy {
    /// How long before the start students may check in.
    pub check_in_lead: Duration,
    /// How far ahead the upcoming-classes view looks.
    pub upcoming_window: Duration,
}

impl Default for AttendancePolicy {
    fn default() -> Self {
        Self {
            check_in_lead: Duration::minutes(crate::domain::class::DEFAULT_CHECK_IN_LEAD_MINUTES),
            upcoming_window: Duration::days(7),
        }
    }
}

/// Every service, wired to the same store, identity provider and clock.
#[derive(Clone)]
pub struct Services {
    pub roster: RosterService,
    pub catalog: CatalogService,
    pub packages: PackageService,
    pub scheduling: SchedulingService,
    pub attendance: AttendanceService,
}

impl Services {
    /// Wire every service to one store, identity provider and clock.
    #[must_use]
    pub fn new(
        store: Arc<dyn Store>,
        identity: Arc<dyn IdentityProvider>,
        clock: Clock,
        policy: AttendancePolicy,
    ) -> Self {
        let packages = PackageService::new(store.clone(), clock.clone());
        Self {
            roster: RosterService::new(store.clone(), identity, clock.clone()),
            catalog: CatalogService::new(store.clone(), clock.clone()),
            scheduling: SchedulingService::new(store.clone(), clock.clone(), policy),
            attendance: AttendanceService::new(store, packages.clone(), clock, policy),
            packages,
        }
    }
}

#[cfg(test)]
pub(crate) mod testing {
    //! Services over a seeded temp database with a pinned clock.

    use std::sync::Arc;

    use chrono::{DateTime, Utc};

    use super::{AttendancePolicy, Clock, Services};
    use crate::adapter::outbound::identity::LocalIdentity;
    use crate::adapter::outbound::sqlite::store::fixtures::{studio, Studio};

    pub struct Harness {
        pub studio: Studio,
        pub identity: Arc<LocalIdentity>,
        pub services: Services,
    }

    pub async fn harness_at(now: DateTime<Utc>) -> Harness {
        let studio = studio().await;
        let identity = Arc::new(LocalIdentity::new());
        let services = Services::new(
            Arc::new(studio.store.clone()),
            identity.clone(),
            Clock::fixed(now),
            AttendancePolicy::default(),
        );
        Harness {
            studio,
            identity,
            services,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn fixed_clock_does_not_move() {
        let at = Utc.with_ymd_and_hms(2026, 5, 1, 12, 0, 0).unwrap();
        let clock = Clock::fixed(at);
        assert_eq!(clock.now(), at);
        assert_eq!(clock.clone().now(), at);
    }

    #[test]
    fn default_policy_opens_an_hour_early() {
        let policy = AttendancePolicy::default();
        assert_eq!(policy.check_in_lead, Duration::hours(1));
        assert_eq!(policy.upcoming_window, Duration::days(7));
    }
}
