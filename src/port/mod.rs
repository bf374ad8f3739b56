//! Trait definitions (hexagonal ports). Depend only on domain.
//!
//! ```text
//!                    ┌─────────────────────────┐
//!     HTTP / CLI ───▶│      Application        │
//!                    │   (domain + services)   │
//!                    └───────┬─────────┬───────┘
//!                            ▼         ▼
//!                     ┌─────────┐ ┌──────────┐
//!                     │  Store  │ │ Identity │
//!                     │ Adapter │ │ Provider │
//!                     └─────────┘ └──────────┘
//! ```

pub mod outbound;

pub use outbound::identity::{Identity, IdentityMetadata, IdentityProvider, NewIdentity};
pub use outbound::store::{AttendanceQuery, ClassQuery, Store};
