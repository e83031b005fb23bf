//! Runtime configuration.
//!
//! Built once at startup and injected into the adapters and services.
//! Nothing else reads the environment for these values.

use std::path::PathBuf;

/// Default service base URL, matching a local deployment of the triage API.
pub const DEFAULT_API_URL: &str = "http://localhost:8000/api";

/// Runtime configuration for the client.
#[derive(Debug, Clone)]
pub struct Config {
    /// Base URL of the triage service REST API
    pub api_base_url: String,

    /// Directory prescription downloads are written into
    pub download_dir: PathBuf,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_base_url: DEFAULT_API_URL.to_string(),
            download_dir: default_download_dir(),
        }
    }
}

impl Config {
    /// Build the configuration from the environment.
    ///
    /// `LABSCOPE_API_URL` overrides the service base URL and
    /// `LABSCOPE_DOWNLOAD_DIR` the prescription download directory. Empty
    /// values are treated as unset.
    #[must_use]
    pub fn from_env() -> Self {
        let mut config = Self::default();

        if let Ok(url) = std::env::var("LABSCOPE_API_URL") {
            if !url.trim().is_empty() {
                config.api_base_url = url;
            }
        }

        if let Ok(dir) = std::env::var("LABSCOPE_DOWNLOAD_DIR") {
            if !dir.trim().is_empty() {
                config.download_dir = PathBuf::from(dir);
            }
        }

        config
    }
}

/// The user's download directory, falling back to the working directory on
/// platforms without one.
fn default_download_dir() -> PathBuf {
    dirs::download_dir().unwrap_or_else(|| PathBuf::from("."))
}
