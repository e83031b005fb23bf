//! HTTP adapter: reqwest implementation of the diagnosis API port.
//!
//! Plain request/response against the service's REST surface. No retry, no
//! backoff, and no client-side timeout: the workflows behind these calls
//! either wait or cancel delivery of the result.

use std::sync::OnceLock;

use regex::Regex;

use crate::domain::{DiagnosisResult, HistoryEntry, PredictRequest};
use crate::ports::{ApiError, DiagnosisApi, HealthReport, PrescriptionDocument, TrainReport};

/// Blocking HTTP client for the triage REST API.
pub struct HttpDiagnosisApi {
    base_url: String,
    client: reqwest::blocking::Client,
}

impl HttpDiagnosisApi {
    /// Create a client against the given base URL, e.g.
    /// `http://localhost:8000/api`. A trailing slash is tolerated.
    ///
    /// # Errors
    /// Returns an error when the underlying connection pool cannot be
    /// initialized.
    pub fn new(base_url: &str) -> Result<Self, ApiError> {
        // The service contract has no timeout policy; disable reqwest's
        // 30-second blocking default instead of inventing one.
        let client = reqwest::blocking::Client::builder()
            .timeout(None)
            .build()
            .map_err(|e| ApiError::Transport(e.to_string()))?;

        Ok(Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            client,
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}{path}", self.base_url)
    }

    fn send_error(&self, e: reqwest::Error) -> ApiError {
        if e.is_connect() {
            ApiError::Connection(self.base_url.clone())
        } else if e.is_timeout() {
            ApiError::Timeout
        } else {
            ApiError::Transport(e.to_string())
        }
    }

    fn get(&self, path: &str) -> Result<reqwest::blocking::Response, ApiError> {
        let response = self
            .client
            .get(self.url(path))
            .send()
            .map_err(|e| self.send_error(e))?;
        check_status(response)
    }
}

fn check_status(
    response: reqwest::blocking::Response,
) -> Result<reqwest::blocking::Response, ApiError> {
    let status = response.status();
    if status.is_success() {
        Ok(response)
    } else {
        let body = response.text().unwrap_or_default();
        Err(ApiError::Status {
            status: status.as_u16(),
            body,
        })
    }
}

fn decode<T: serde::de::DeserializeOwned>(
    response: reqwest::blocking::Response,
) -> Result<T, ApiError> {
    response.json().map_err(|e| ApiError::Decode(e.to_string()))
}

/// Extract the filename advertised in a `Content-Disposition` value.
/// Handles both the quoted and bare forms.
fn filename_from_disposition(value: &str) -> Option<String> {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    let re = PATTERN
        .get_or_init(|| Regex::new(r#"filename="?([^";]+)"?"#).expect("filename pattern is valid"));

    re.captures(value)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().to_string())
}

impl DiagnosisApi for HttpDiagnosisApi {
    fn train_model(&self) -> Result<TrainReport, ApiError> {
        let response = self
            .client
            .post(self.url("/train/"))
            .send()
            .map_err(|e| self.send_error(e))?;
        decode(check_status(response)?)
    }

    fn predict(&self, request: &PredictRequest) -> Result<DiagnosisResult, ApiError> {
        let response = self
            .client
            .post(self.url("/predict/"))
            .json(request)
            .send()
            .map_err(|e| self.send_error(e))?;
        decode(check_status(response)?)
    }

    fn history(&self) -> Result<Vec<HistoryEntry>, ApiError> {
        decode(self.get("/history/")?)
    }

    fn result(&self, id: i64) -> Result<HistoryEntry, ApiError> {
        decode(self.get(&format!("/results/{id}/"))?)
    }

    fn prescription(&self, id: i64) -> Result<PrescriptionDocument, ApiError> {
        let response = self.get(&format!("/prescription/{id}/"))?;

        let filename = response
            .headers()
            .get(reqwest::header::CONTENT_DISPOSITION)
            .and_then(|value| value.to_str().ok())
            .and_then(filename_from_disposition);

        let bytes = response
            .bytes()
            .map_err(|e| ApiError::Transport(e.to_string()))?
            .to_vec();

        Ok(PrescriptionDocument { bytes, filename })
    }

    fn health(&self) -> Result<HealthReport, ApiError> {
        decode(self.get("/health/")?)
    }
}
