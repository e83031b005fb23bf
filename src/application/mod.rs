//! Application layer: Use cases and services.
//!
//! This module orchestrates domain types with the API port to implement
//! the core use cases of the application.

mod triage;

pub use triage::TriageService;
