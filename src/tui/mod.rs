//! TUI module: Terminal User Interface using Ratatui.
//!
//! Provides a clinical-themed interface for:
//! - Diagnostic intake form
//! - Results overlay with per-class probabilities
//! - Diagnosis history browsing

mod app;
mod styles;
mod ui;
mod worker;

pub use app::{App, Tab};
pub use styles::ClinicalTheme;
pub use worker::{ApiWorker, TaskHandle};
