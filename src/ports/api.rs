//! Diagnosis API port: Trait for the remote triage service.
//!
//! This trait abstracts the HTTP transport from the application logic, so
//! services and the TUI state machine can be driven by a mock in tests.

use serde::{Deserialize, Serialize};

use crate::domain::{DiagnosisResult, HistoryEntry, PredictRequest};

/// Errors that can occur when talking to the triage service.
///
/// The distinctions exist for the log; every user-facing surface collapses
/// them to one generic message per context.
#[derive(Debug, Clone, thiserror::Error)]
pub enum ApiError {
    #[error("Cannot reach the triage service at {0}")]
    Connection(String),

    #[error("Request to the triage service timed out")]
    Timeout,

    #[error("Triage service returned HTTP {status}: {body}")]
    Status { status: u16, body: String },

    #[error("Malformed response from the triage service: {0}")]
    Decode(String),

    #[error("HTTP transport error: {0}")]
    Transport(String),
}

/// Outcome of a model training run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrainReport {
    pub success: bool,

    /// Validation accuracy as a percentage (already scaled by the service)
    pub accuracy: f64,

    pub message: String,
}

/// Service identity and liveness report.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthReport {
    pub status: String,
    pub service: String,
    pub version: String,
}

/// A prescription document as served, before it is written to disk.
#[derive(Debug, Clone)]
pub struct PrescriptionDocument {
    /// Raw PDF bytes
    pub bytes: Vec<u8>,

    /// Filename advertised by the service, when it sent one
    pub filename: Option<String>,
}

/// Trait for the remote diagnosis service operations.
///
/// One method per endpoint, pure request/response: no retries, no backoff,
/// no client-side timeout policy.
pub trait DiagnosisApi: Send + Sync {
    /// Trigger a (re)training run on the service.
    ///
    /// # Errors
    /// Returns an error on transport failure or a non-success status.
    fn train_model(&self) -> Result<TrainReport, ApiError>;

    /// Submit a patient panel and obtain a diagnosis.
    ///
    /// # Errors
    /// Returns an error on transport failure, a non-success status
    /// (including validation rejections), or an undecodable body.
    fn predict(&self, request: &PredictRequest) -> Result<DiagnosisResult, ApiError>;

    /// Fetch all stored diagnoses, most recent first.
    ///
    /// # Errors
    /// Returns an error on transport failure or a non-success status.
    fn history(&self) -> Result<Vec<HistoryEntry>, ApiError>;

    /// Fetch a single stored record by id.
    ///
    /// # Errors
    /// Returns an error on transport failure, a non-success status (404 for
    /// unknown ids), or an undecodable body.
    fn result(&self, id: i64) -> Result<HistoryEntry, ApiError>;

    /// Fetch the prescription document for a record.
    ///
    /// # Errors
    /// Returns an error on transport failure or a non-success status.
    fn prescription(&self, id: i64) -> Result<PrescriptionDocument, ApiError>;

    /// Probe service identity and liveness.
    ///
    /// # Errors
    /// Returns an error on transport failure or a non-success status.
    fn health(&self) -> Result<HealthReport, ApiError>;
}
