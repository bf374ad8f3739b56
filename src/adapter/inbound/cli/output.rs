//! Terminal output for CLI handlers.
//!
//! Human-readable by default. With `--json` every handler prints a single
//! JSON document instead and the decorative helpers are silent.

use std::fmt::Display;
use std::sync::atomic::{AtomicBool, Ordering};

use serde::Serialize;

static JSON_MODE: AtomicBool = AtomicBool::new(false);

/// Switch JSON output on or off for the rest of the process.
pub fn set_json(enabled: bool) {
    JSON_MODE.store(enabled, Ordering::Relaxed);
}

#[must_use]
pub fn is_json() -> bool {
    JSON_MODE.load(Ordering::Relaxed)
}

pub fn section(title: &str) {
    if !is_json() {
        println!();
        println!("{title}");
    }
}

pub fn field(label: &str, value: impl Display) {
    if !is_json() {
        println!("  {label:<14} {value}");
    }
}

pub fn success(message: &str) {
    if !is_json() {
        println!("  ✓ {message}");
    }
}

pub fn warning(message: &str) {
    if !is_json() {
        println!("  ! {message}");
    }
}

pub fn note(message: &str) {
    if !is_json() {
        println!("    {message}");
    }
}

/// Print `value` when in JSON mode.
pub fn json<T: Serialize>(value: &T) -> crate::error::Result<()> {
    if is_json() {
        println!("{}", serde_json::to_string_pretty(value)?);
    }
    Ok(())
}
