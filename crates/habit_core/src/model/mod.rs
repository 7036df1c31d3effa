//! Domain model for habits and their daily completion records.
//!
//! # Responsibility
//! - Define canonical data structures used by core business logic.
//! - Own input validation for habit creation.
//!
//! # Invariants
//! - Every habit and day is identified by a stable UUID.
//! - Dates carry day granularity only; time of day never reaches storage.
//! - Weekday numbering is 0 = Sunday through 6 = Saturday everywhere.

pub mod day;
pub mod habit;
