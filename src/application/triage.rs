//! Triage service: Orchestrates calls to the remote diagnosis service.
//!
//! The prediction model and all persistence live on the service side. This
//! layer merges local-only context (the patient name) into outcomes and
//! owns the download directory, including prescription filename
//! resolution.

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::domain::{DiagnosisOutcome, HistoryEntry, PredictRequest};
use crate::ports::{DiagnosisApi, HealthReport, TrainReport};
use crate::Result;

/// Service wrapping the remote diagnosis API for the UI.
pub struct TriageService<A>
where
    A: DiagnosisApi,
{
    api: Arc<A>,
    download_dir: PathBuf,
}

impl<A> TriageService<A>
where
    A: DiagnosisApi,
{
    /// Create a new triage service writing downloads under `download_dir`.
    pub fn new(api: Arc<A>, download_dir: impl Into<PathBuf>) -> Self {
        Self {
            api,
            download_dir: download_dir.into(),
        }
    }

    /// Submit a patient panel for diagnosis.
    ///
    /// The patient name is attached to the outcome locally; the request body
    /// never carries it.
    ///
    /// # Errors
    /// Returns error when the service rejects the panel or cannot be
    /// reached.
    pub fn submit(&self, patient_name: &str, request: &PredictRequest) -> Result<DiagnosisOutcome> {
        tracing::debug!("Submitting panel for prediction");
        let result = self.api.predict(request)?;
        tracing::info!(
            "Prediction complete: record={}, diagnosis={}",
            result.id,
            result.diagnosis
        );

        Ok(DiagnosisOutcome {
            patient_name: patient_name.to_string(),
            result,
        })
    }

    /// Fetch all stored diagnoses, most recent first.
    ///
    /// # Errors
    /// Returns error when the service cannot be reached or replies with a
    /// failure status.
    pub fn fetch_history(&self) -> Result<Vec<HistoryEntry>> {
        let entries = self.api.history()?;
        tracing::debug!("Fetched {} history entries", entries.len());
        Ok(entries)
    }

    /// Fetch one stored record by id.
    ///
    /// # Errors
    /// Returns error on transport failure or unknown id.
    pub fn fetch_result(&self, id: i64) -> Result<HistoryEntry> {
        Ok(self.api.result(id)?)
    }

    /// Trigger a training run on the service.
    ///
    /// # Errors
    /// Returns error when the run fails or the service cannot be reached.
    pub fn train_model(&self) -> Result<TrainReport> {
        let report = self.api.train_model()?;
        tracing::info!("Training finished: accuracy={:.2}%", report.accuracy);
        Ok(report)
    }

    /// Probe service identity and liveness.
    ///
    /// # Errors
    /// Returns error when the service cannot be reached.
    pub fn check_health(&self) -> Result<HealthReport> {
        Ok(self.api.health()?)
    }

    /// Download the prescription for a record into the download directory,
    /// creating the directory if needed.
    ///
    /// Returns the path of the written file. The filename is the one the
    /// service advertised, reduced to its final path component; without one
    /// a constructed default is used.
    ///
    /// # Errors
    /// Returns error on transport failure or when the file cannot be
    /// written.
    pub fn download_prescription(&self, id: i64) -> Result<PathBuf> {
        let document = self.api.prescription(id)?;

        let filename = document
            .filename
            .as_deref()
            .and_then(safe_file_name)
            .unwrap_or_else(|| format!("Ordonnance_Patient_{id}.pdf"));

        fs::create_dir_all(&self.download_dir)?;
        let path = self.download_dir.join(filename);
        fs::write(&path, &document.bytes)?;

        tracing::info!(
            "Prescription saved: record={}, {} bytes",
            id,
            document.bytes.len()
        );
        Ok(path)
    }
}

/// Reduce a served filename to its final component. A value that dissolves
/// entirely into path structure yields `None`.
fn safe_file_name(served: &str) -> Option<String> {
    Path::new(served)
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::mock::{sample_result, MockDiagnosisApi};
    use crate::ports::PrescriptionDocument;

    fn service_with(
        api: MockDiagnosisApi,
        dir: &std::path::Path,
    ) -> TriageService<MockDiagnosisApi> {
        TriageService::new(Arc::new(api), dir)
    }

    #[test]
    fn test_submit_merges_patient_name() {
        let dir = tempfile::tempdir().expect("tempdir");
        let api = MockDiagnosisApi::new()
            .with_predict(Ok(sample_result(4, "DIABETE", &[("DIABETE", 0.8)])));
        let service = service_with(api, dir.path());

        let outcome = service
            .submit("Alice Martin", &PredictRequest::default())
            .expect("submit succeeds");

        assert_eq!(outcome.patient_name, "Alice Martin");
        assert_eq!(outcome.result.diagnosis, "DIABETE");
    }

    #[test]
    fn test_submit_propagates_failure() {
        let dir = tempfile::tempdir().expect("tempdir");
        let service = service_with(MockDiagnosisApi::unreachable(), dir.path());

        assert!(service.submit("Bob", &PredictRequest::default()).is_err());
    }

    #[test]
    fn test_download_uses_served_filename() {
        let dir = tempfile::tempdir().expect("tempdir");
        let api = MockDiagnosisApi::new().with_prescription(Ok(PrescriptionDocument {
            bytes: b"%PDF-1.4 canned".to_vec(),
            filename: Some("Ordonnance_Patient_7_2026-02-01.pdf".to_string()),
        }));
        let service = service_with(api, dir.path());

        let path = service.download_prescription(7).expect("download succeeds");

        assert_eq!(
            path.file_name().and_then(|n| n.to_str()),
            Some("Ordonnance_Patient_7_2026-02-01.pdf")
        );
        assert_eq!(fs::read(&path).expect("file written"), b"%PDF-1.4 canned");
    }

    #[test]
    fn test_download_falls_back_to_constructed_name() {
        let dir = tempfile::tempdir().expect("tempdir");
        let service = service_with(MockDiagnosisApi::new(), dir.path());

        let path = service.download_prescription(42).expect("download succeeds");

        assert_eq!(
            path.file_name().and_then(|n| n.to_str()),
            Some("Ordonnance_Patient_42.pdf")
        );
    }

    #[test]
    fn test_download_strips_path_components() {
        let dir = tempfile::tempdir().expect("tempdir");
        let api = MockDiagnosisApi::new().with_prescription(Ok(PrescriptionDocument {
            bytes: b"%PDF-1.4 hostile".to_vec(),
            filename: Some("../../escape.pdf".to_string()),
        }));
        let service = service_with(api, dir.path());

        let path = service.download_prescription(1).expect("download succeeds");

        assert_eq!(path.parent(), Some(dir.path()));
        assert_eq!(path.file_name().and_then(|n| n.to_str()), Some("escape.pdf"));
    }

    #[test]
    fn test_download_creates_missing_directory() {
        let dir = tempfile::tempdir().expect("tempdir");
        let nested = dir.path().join("labscope").join("prescriptions");
        let service = service_with(MockDiagnosisApi::new(), &nested);

        let path = service.download_prescription(3).expect("download succeeds");
        assert!(path.starts_with(&nested));
        assert!(path.exists());
    }

    #[test]
    fn test_safe_file_name() {
        assert_eq!(safe_file_name("report.pdf"), Some("report.pdf".to_string()));
        assert_eq!(safe_file_name("a/b/report.pdf"), Some("report.pdf".to_string()));
        assert_eq!(safe_file_name(".."), None);
        assert_eq!(safe_file_name(""), None);
    }
}
