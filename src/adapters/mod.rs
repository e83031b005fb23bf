//! Adapters layer: Concrete implementations of ports.
//!
//! These modules contain the actual integration with external systems:
//! - `http`: reqwest client for the remote triage service
//! - `mock`: canned-response API for tests
//! - `sanitize`: PII filtering for logs

pub mod http;
pub mod mock;
pub mod sanitize;

pub use http::HttpDiagnosisApi;
