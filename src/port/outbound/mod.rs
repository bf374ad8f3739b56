//! Outbound ports (driven side): interfaces implemented by outbound adapters.
//!
//! These contracts describe the infrastructure the studio services depend
//! on: relational storage and the hosted identity provider.

pub mod identity;
pub mod store;
