//! Studio domain: entities, enumerations and the rules that govern them.
//!
//! Nothing in here touches storage or the network. Operations that depend
//! on the current time take `now` explicitly so they can be tested without
//! a clock.

/// Declares a fieldless enum that round-trips through a lowercase
/// snake_case string, both in JSON and in the database.
macro_rules! string_enum {
    (
        $(#[$meta:meta])*
        $name:ident, $field:literal {
            $($(#[$vmeta:meta])* $variant:ident => $text:literal),+ $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
        #[serde(rename_all = "snake_case")]
        pub enum $name {
            $($(#[$vmeta])* $variant),+
        }

        impl $name {
            /// Database and wire representation.
            #[must_use]
            pub fn as_str(&self) -> &'static str {
                match self {
                    $(Self::$variant => $text),+
                }
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl std::str::FromStr for $name {
            type Err = $crate::domain::error::DomainError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                match s {
                    $($text => Ok(Self::$variant),)+
                    other => Err($crate::domain::error::DomainError::UnknownVariant {
                        field: $field,
                        value: other.to_string(),
                    }),
                }
            }
        }
    };
}

pub mod attendance;
pub mod business;
pub mod class;
pub mod class_type;
pub mod error;
pub mod id;
pub mod package;
pub mod package_type;
pub mod schedule;
pub mod time;
pub mod user;

pub use attendance::Attendance;
pub use business::{Business, PaymentProvider};
pub use class::{CheckInStatus, Class, ClassStatus};
pub use class_type::ClassType;
pub use error::DomainError;
pub use id::{
    AttendanceId, BusinessId, ClassId, ClassTypeId, PackageId, PackageTypeId, ScheduleId, UserId,
};
pub use package::{Package, PackageStatus, Payment, PaymentMethod};
pub use package_type::{PackageStructure, PackageType};
pub use schedule::RecurringSchedule;
pub use user::{NewStudent, Role, User};
