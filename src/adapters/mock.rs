//! In-memory diagnosis API with canned responses, for tests.

use std::collections::BTreeMap;
use std::sync::Mutex;

use crate::domain::{DiagnosisResult, Gender, HistoryEntry, PredictRequest};
use crate::ports::{ApiError, DiagnosisApi, HealthReport, PrescriptionDocument, TrainReport};

/// Mock diagnosis API. Every operation returns its configured response and
/// records the call in an inspectable log.
pub struct MockDiagnosisApi {
    predict: Result<DiagnosisResult, ApiError>,
    history: Result<Vec<HistoryEntry>, ApiError>,
    prescription: Result<PrescriptionDocument, ApiError>,
    calls: Mutex<Vec<String>>,
}

impl MockDiagnosisApi {
    #[must_use]
    pub fn new() -> Self {
        Self {
            predict: Ok(sample_result(1, "SAIN", &[("SAIN", 0.9), ("DIABETE", 0.1)])),
            history: Ok(Vec::new()),
            prescription: Ok(PrescriptionDocument {
                bytes: b"%PDF-1.4 stub".to_vec(),
                filename: None,
            }),
            calls: Mutex::new(Vec::new()),
        }
    }

    /// Mock whose every operation fails with a connection error.
    #[must_use]
    pub fn unreachable() -> Self {
        let down = || ApiError::Connection("http://localhost:8000/api".to_string());
        Self {
            predict: Err(down()),
            history: Err(down()),
            prescription: Err(down()),
            calls: Mutex::new(Vec::new()),
        }
    }

    #[must_use]
    pub fn with_predict(mut self, response: Result<DiagnosisResult, ApiError>) -> Self {
        self.predict = response;
        self
    }

    #[must_use]
    pub fn with_history(mut self, response: Result<Vec<HistoryEntry>, ApiError>) -> Self {
        self.history = response;
        self
    }

    #[must_use]
    pub fn with_prescription(mut self, response: Result<PrescriptionDocument, ApiError>) -> Self {
        self.prescription = response;
        self
    }

    /// Operations invoked so far, in order.
    #[must_use]
    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().expect("call log lock").clone()
    }

    fn record(&self, call: impl Into<String>) {
        self.calls.lock().expect("call log lock").push(call.into());
    }
}

impl Default for MockDiagnosisApi {
    fn default() -> Self {
        Self::new()
    }
}

impl DiagnosisApi for MockDiagnosisApi {
    fn train_model(&self) -> Result<TrainReport, ApiError> {
        self.record("train_model");
        Ok(TrainReport {
            success: true,
            accuracy: 97.5,
            message: "Model trained successfully".to_string(),
        })
    }

    fn predict(&self, _request: &PredictRequest) -> Result<DiagnosisResult, ApiError> {
        self.record("predict");
        self.predict.clone()
    }

    fn history(&self) -> Result<Vec<HistoryEntry>, ApiError> {
        self.record("history");
        self.history.clone()
    }

    fn result(&self, id: i64) -> Result<HistoryEntry, ApiError> {
        self.record(format!("result:{id}"));
        match &self.history {
            Ok(entries) => entries
                .iter()
                .find(|entry| entry.id == id)
                .cloned()
                .ok_or(ApiError::Status {
                    status: 404,
                    body: r#"{"error": "Patient not found"}"#.to_string(),
                }),
            Err(e) => Err(e.clone()),
        }
    }

    fn prescription(&self, id: i64) -> Result<PrescriptionDocument, ApiError> {
        self.record(format!("prescription:{id}"));
        self.prescription.clone()
    }

    fn health(&self) -> Result<HealthReport, ApiError> {
        self.record("health");
        Ok(HealthReport {
            status: "healthy".to_string(),
            service: "Medical Diagnosis API".to_string(),
            version: "2.0".to_string(),
        })
    }
}

/// Build a diagnosis result with the given probability table.
#[must_use]
pub fn sample_result(id: i64, diagnosis: &str, probabilities: &[(&str, f64)]) -> DiagnosisResult {
    let probabilities: BTreeMap<String, f64> = probabilities
        .iter()
        .map(|(code, p)| ((*code).to_string(), *p))
        .collect();

    DiagnosisResult {
        id,
        diagnosis: diagnosis.to_string(),
        probabilities,
        created_at: chrono::Utc::now(),
    }
}

/// Build a stored record row.
#[must_use]
pub fn sample_entry(id: i64, diagnosis: &str, age: u32) -> HistoryEntry {
    HistoryEntry {
        id,
        diagnosis: diagnosis.to_string(),
        age,
        gender: Gender::Male,
        blood_pressure: None,
        blood_sugar: None,
        created_at: chrono::Utc::now(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mock_returns_configured_responses() {
        let api = MockDiagnosisApi::new()
            .with_predict(Ok(sample_result(5, "RENAL", &[("RENAL", 0.7)])));

        let result = api.predict(&PredictRequest::default()).expect("canned ok");
        assert_eq!(result.diagnosis, "RENAL");
        assert_eq!(api.calls(), vec!["predict"]);
    }

    #[test]
    fn test_unreachable_mock_fails_everything() {
        let api = MockDiagnosisApi::unreachable();
        assert!(api.predict(&PredictRequest::default()).is_err());
        assert!(api.history().is_err());
    }

    #[test]
    fn test_result_looks_up_history_rows() {
        let api = MockDiagnosisApi::new()
            .with_history(Ok(vec![sample_entry(1, "SAIN", 40), sample_entry(2, "DIABETE", 61)]));

        assert_eq!(api.result(2).expect("found").diagnosis, "DIABETE");
        assert!(matches!(
            api.result(99),
            Err(ApiError::Status { status: 404, .. })
        ));
    }
}
