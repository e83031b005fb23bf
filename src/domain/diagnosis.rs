//! Diagnosis result types returned by the triage service.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// The classification labels the service is known to produce.
///
/// The wire carries the raw uppercase codes; unknown codes are passed
/// through to the UI untranslated rather than rejected, so a newer service
/// can introduce labels without breaking this client.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DiagnosisLabel {
    /// SAIN: no pathology detected
    Healthy,
    /// DIABETE
    Diabetes,
    /// HYPERLIPIDEMIE
    Hyperlipidemia,
    /// RENAL: renal insufficiency
    RenalFailure,
    /// HEPATIQUE: hepatic insufficiency
    HepaticFailure,
}

impl DiagnosisLabel {
    /// Parse a wire code. Unknown codes yield `None`.
    #[must_use]
    pub fn from_code(code: &str) -> Option<Self> {
        match code {
            "SAIN" => Some(Self::Healthy),
            "DIABETE" => Some(Self::Diabetes),
            "HYPERLIPIDEMIE" => Some(Self::Hyperlipidemia),
            "RENAL" => Some(Self::RenalFailure),
            "HEPATIQUE" => Some(Self::HepaticFailure),
            _ => None,
        }
    }

    /// Wire code for this label.
    #[must_use]
    pub fn code(&self) -> &'static str {
        match self {
            Self::Healthy => "SAIN",
            Self::Diabetes => "DIABETE",
            Self::Hyperlipidemia => "HYPERLIPIDEMIE",
            Self::RenalFailure => "RENAL",
            Self::HepaticFailure => "HEPATIQUE",
        }
    }

    /// Human-readable classification name.
    #[must_use]
    pub fn name(&self) -> &'static str {
        match self {
            Self::Healthy => "Healthy Patient",
            Self::Diabetes => "Diabetes",
            Self::Hyperlipidemia => "Hyperlipidemia",
            Self::RenalFailure => "Renal Failure",
            Self::HepaticFailure => "Hepatic Failure",
        }
    }

    /// Icon shown next to the classification.
    #[must_use]
    pub fn icon(&self) -> &'static str {
        match self {
            Self::Healthy => "✅",
            Self::Diabetes => "🩸",
            Self::Hyperlipidemia => "🍔",
            Self::RenalFailure => "💧",
            Self::HepaticFailure => "🍺",
        }
    }
}

/// Display name for a diagnosis code, falling back to the raw code for
/// labels this client does not know.
#[must_use]
pub fn display_name(code: &str) -> &str {
    DiagnosisLabel::from_code(code).map_or(code, |label| label.name())
}

/// Icon for a diagnosis code; unknown codes get a generic hospital icon.
#[must_use]
pub fn display_icon(code: &str) -> &'static str {
    DiagnosisLabel::from_code(code).map_or("🏥", |label| label.icon())
}

/// Whether a code denotes the healthy classification.
#[must_use]
pub fn is_healthy(code: &str) -> bool {
    DiagnosisLabel::from_code(code) == Some(DiagnosisLabel::Healthy)
}

/// A fresh prediction as returned by the predict operation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DiagnosisResult {
    /// Server-assigned record id
    pub id: i64,

    /// Raw classification code (e.g. "SAIN")
    pub diagnosis: String,

    /// Per-label probability estimates in 0.0..=1.0, keyed by wire code.
    /// The service does not guarantee they sum to 1.
    pub probabilities: BTreeMap<String, f64>,

    /// Server-side creation time
    pub created_at: chrono::DateTime<chrono::Utc>,
}

/// A completed diagnosis paired with the locally entered patient name.
///
/// The name never crosses the wire; it is attached here for display only.
#[derive(Debug, Clone)]
pub struct DiagnosisOutcome {
    pub patient_name: String,
    pub result: DiagnosisResult,
}
