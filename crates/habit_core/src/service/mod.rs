//! Core use-case services.
//!
//! # Responsibility
//! - Orchestrate validation, clock, and repository calls into use-case APIs.
//! - Keep the HTTP layer decoupled from storage details.

pub mod habit_service;
