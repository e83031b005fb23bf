//! Domain layer: Core business types.
//!
//! This module contains pure data types shared across the application.
//! Everything that crosses the wire is serde-serializable; the display
//! helpers carry the canonical label mapping used by every view.

mod diagnosis;
mod history;
mod patient;

pub use diagnosis::{
    display_icon, display_name, is_healthy, DiagnosisLabel, DiagnosisOutcome, DiagnosisResult,
};
pub use history::HistoryEntry;
pub use patient::{Gender, PredictRequest};
