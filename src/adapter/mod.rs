//! Implementations of ports (hexagonal adapters).
//!
//! - [`inbound`] drives the application: the HTTP API and the CLI.
//! - [`outbound`] is driven by it: SQLite storage and identity providers.

pub mod inbound;
pub mod outbound;
