//! Studiodesk - multi-tenant dance studio management.
//!
//! Instructors manage class types, recurring and one-time classes, student
//! rosters, package types and package sales. Students see their packages and
//! check themselves in to upcoming classes. Marking attendance debits the
//! charged package; removing it credits the package back.
//!
//! # Architecture
//!
//! Ports and adapters:
//!
//! - [`domain`] - Entities, enums and their rules (no I/O)
//! - [`port`] - Store and identity provider traits
//! - [`application`] - Use-case services over the ports
//! - [`adapter`] - SQLite store, identity providers, HTTP API and CLI
//! - [`infrastructure`] - Configuration, logging and runtime wiring
//! - [`error`] - Error types for the crate
//!
//! Every record belongs to one business, and every store call is scoped by
//! its [`domain::BusinessId`].
//!
//! # Example
//!
//! ```no_run
//! use studiodesk::infrastructure::{bootstrap, config::Config};
//!
//! # async fn run() -> studiodesk::error::Result<()> {
//! let config = Config::load("config.toml")?;
//! let store = bootstrap::open_store(&config)?;
//! let services = bootstrap::services(&config, store)?;
//! let studio = services.catalog.create_business("Prisma Dance").await?;
//! # Ok(())
//! # }
//! ```

pub mod adapter;
pub mod application;
pub mod domain;
pub mod error;
pub mod infrastructure;
pub mod port;
