//! # Labscope
//!
//! Terminal client for a medical diagnosis REST service.
//!
//! This crate provides:
//! - A diagnostic intake form for blood panels and risk factors
//! - Background submission to the prediction endpoint
//! - Diagnosis history browsing and prescription download
//!
//! ## Architecture
//!
//! The crate follows Hexagonal Architecture:
//! - `domain`: Core business types (PredictRequest, DiagnosisResult, history rows)
//! - `ports`: Trait definitions for the remote service
//! - `adapters`: Concrete implementations (reqwest HTTP client, test mock)
//! - `application`: Use cases orchestrating domain and ports
//! - `tui`: Terminal user interface

pub mod adapters;
pub mod application;
pub mod config;
pub mod domain;
pub mod ports;
pub mod tui;

pub use domain::{DiagnosisOutcome, DiagnosisResult, HistoryEntry, PredictRequest};

/// Result type for Labscope operations
pub type Result<T> = std::result::Result<T, LabscopeError>;

/// Main error type for Labscope
#[derive(Debug, thiserror::Error)]
pub enum LabscopeError {
    #[error("API request failed: {0}")]
    Api(#[from] ports::ApiError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
