//! Patient intake types for the remote triage service.
//!
//! The field inventory mirrors the service's patient record: demographics,
//! a nine-value blood panel, and three lifestyle risk flags.

use serde::{Deserialize, Serialize};

/// Patient gender as encoded on the wire.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Gender {
    #[default]
    #[serde(rename = "M")]
    Male,
    #[serde(rename = "F")]
    Female,
}

impl Gender {
    /// Human-readable form for display.
    #[must_use]
    pub fn label(&self) -> &'static str {
        match self {
            Self::Male => "Male",
            Self::Female => "Female",
        }
    }

    /// The other option, for select-style cycling.
    #[must_use]
    pub fn toggled(&self) -> Self {
        match self {
            Self::Male => Self::Female,
            Self::Female => Self::Male,
        }
    }
}

impl std::fmt::Display for Gender {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.label())
    }
}

/// Request body for a prediction.
///
/// Numeric fields are `Option` on purpose: an intake buffer that fails to
/// parse is submitted as JSON `null` and rejected by the service, never
/// locally. The patient name stays on this side of the wire and is not part
/// of the body.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PredictRequest {
    /// Age in years (service accepts 1-120)
    pub age: Option<u32>,

    pub gender: Gender,

    /// Fasting glucose in mmol/L
    pub glucose: Option<f64>,

    /// Total cholesterol in mmol/L
    pub cholesterol: Option<f64>,

    /// Triglycerides in mmol/L
    pub triglycerides: Option<f64>,

    /// Serum creatinine in µmol/L
    pub creatinine: Option<f64>,

    /// Urea in mmol/L (wire name kept from the service schema)
    #[serde(rename = "uree")]
    pub urea: Option<f64>,

    /// Uric acid in µmol/L
    pub uric_acid: Option<f64>,

    /// GOT (AST) transaminase in U/L
    pub got: Option<f64>,

    /// GPT (ALT) transaminase in U/L
    pub gpt: Option<f64>,

    /// Total bilirubin in µmol/L
    pub bilirubin: Option<f64>,

    /// Active smoker
    pub smoking: bool,

    /// Clinical obesity
    pub obesity: bool,

    /// Family history of metabolic disease
    pub family_history: bool,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::Value;

    fn filled_request() -> PredictRequest {
        PredictRequest {
            age: Some(45),
            gender: Gender::Female,
            glucose: Some(5.2),
            cholesterol: Some(4.8),
            triglycerides: Some(1.1),
            creatinine: Some(82.0),
            urea: Some(5.4),
            uric_acid: Some(301.0),
            got: Some(24.0),
            gpt: Some(28.0),
            bilirubin: Some(9.0),
            smoking: true,
            obesity: false,
            family_history: true,
        }
    }

    #[test]
    fn test_wire_body_types() {
        let body = serde_json::to_value(filled_request()).expect("serializes");

        assert!(body["age"].is_u64());
        assert!(body["glucose"].is_f64());
        assert!(body["smoking"].is_boolean());
        assert_eq!(body["gender"], Value::String("F".into()));
        assert_eq!(body["uree"], 5.4);
        assert!(body.get("name").is_none());
        assert!(body.get("urea").is_none());
    }

    #[test]
    fn test_unparsed_fields_serialize_as_null() {
        let body = serde_json::to_value(PredictRequest::default()).expect("serializes");

        assert!(body["age"].is_null());
        assert!(body["bilirubin"].is_null());
        // Flags and gender always carry a concrete value
        assert_eq!(body["gender"], Value::String("M".into()));
        assert_eq!(body["obesity"], Value::Bool(false));
    }

    #[test]
    fn test_gender_cycle_and_labels() {
        assert_eq!(Gender::default(), Gender::Male);
        assert_eq!(Gender::Male.toggled(), Gender::Female);
        assert_eq!(Gender::Female.toggled(), Gender::Male);
        assert_eq!(Gender::Female.label(), "Female");
    }
}
