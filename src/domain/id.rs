//! Domain identifier types with proper encapsulation.
//!
//! Every record is keyed by a UUID v4 string. Each table gets its own
//! newtype so a class id can never be passed where a package id is expected.

use std::fmt;

use serde::{Deserialize, Serialize};

macro_rules! uuid_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(String);

        impl $name {
            /// Create a new identifier with a generated UUID.
            #[must_use]
            pub fn new() -> Self {
                Self(uuid::Uuid::new_v4().to_string())
            }

            /// Get the identifier as a string slice.
            #[must_use]
            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl Default for $name {
            fn default() -> Self {
                Self::new()
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl From<String> for $name {
            fn from(s: String) -> Self {
                Self(s)
            }
        }

        impl From<&str> for $name {
            fn from(s: &str) -> Self {
                Self(s.to_string())
            }
        }
    };
}

uuid_id!(
    /// Identifier of a studio (the tenant that owns every other record).
    BusinessId
);
uuid_id!(
    /// Identifier of a user profile. Shared with the identity provider.
    UserId
);
uuid_id!(
    /// Identifier of a class type (e.g. "Salsa Fundamentals").
    ClassTypeId
);
uuid_id!(
    /// Identifier of a package type offered for sale.
    PackageTypeId
);
uuid_id!(
    /// Identifier of a package owned by a student.
    PackageId
);
uuid_id!(
    /// Identifier of a weekly recurring schedule.
    ScheduleId
);
uuid_id!(
    /// Identifier of a single class instance.
    ClassId
);
uuid_id!(
    /// Identifier of an attendance record.
    AttendanceId
);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_ids_are_unique() {
        assert_ne!(ClassId::new(), ClassId::new());
    }

    #[test]
    fn id_roundtrips_through_string() {
        let id = PackageId::from("pkg-1");
        assert_eq!(id.as_str(), "pkg-1");
        assert_eq!(id.to_string(), "pkg-1");
    }

    #[test]
    fn id_serializes_as_plain_string() {
        let id = UserId::from("u-1");
        assert_eq!(serde_json::to_string(&id).unwrap(), "\"u-1\"");
        let back: UserId = serde_json::from_str("\"u-1\"").unwrap();
        assert_eq!(back, id);
    }
}
