//! Ports layer: Trait definitions for external operations.
//!
//! Following Hexagonal Architecture, these traits define the boundary
//! between the application and the remote triage service.

mod api;

pub use api::{ApiError, DiagnosisApi, HealthReport, PrescriptionDocument, TrainReport};
