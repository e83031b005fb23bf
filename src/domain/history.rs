//! Stored patient records as served by the history and result endpoints.

use serde::{Deserialize, Serialize};

use super::Gender;

/// One stored diagnosis record.
///
/// The service serializes its full patient row here; this type keeps the
/// fields the client renders and ignores the rest. `blood_pressure` and
/// `blood_sugar` default to `None` because deployed schema revisions do not
/// all carry them.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HistoryEntry {
    /// Server-assigned record id
    pub id: i64,

    /// Raw classification code
    pub diagnosis: String,

    /// Age in years
    pub age: u32,

    pub gender: Gender,

    /// Systolic pressure in mmHg, when the schema carries it
    #[serde(default)]
    pub blood_pressure: Option<f64>,

    /// Blood sugar in g/L, when the schema carries it
    #[serde(default)]
    pub blood_sugar: Option<f64>,

    /// Server-side creation time
    pub created_at: chrono::DateTime<chrono::Utc>,
}
