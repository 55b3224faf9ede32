//! Version descriptor and the endpoint it comes from.

use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Default connect/read timeout for the single version fetch. There is no
/// retry; a failure is swallowed by the caller and the app proceeds.
const FETCH_TIMEOUT: Duration = Duration::from_secs(10);

/// Errors during the version fetch.
#[derive(Debug, Error)]
pub enum UpdateError {
    #[error("version endpoint request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("malformed version response: {0}")]
    Malformed(#[from] serde_json::Error),
}

/// Latest-version record served by the backend. Consumed once per launch,
/// never persisted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VersionDescriptor {
    pub version_code: u32,
    pub version_name: String,
    pub download_url: String,
    #[serde(default)]
    pub release_notes: Option<String>,
    pub is_mandatory: bool,
    pub min_supported_version: u32,
}

/// Read-only REST endpoint returning a JSON array of at most one
/// descriptor, sorted descending by version code.
#[derive(Debug, Clone)]
pub struct VersionEndpoint {
    base_url: String,
    api_key: Option<String>,
    timeout: Duration,
}

impl VersionEndpoint {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            api_key: None,
            timeout: FETCH_TIMEOUT,
        }
    }

    /// Attach the backend's public API key, sent as the `apikey` header.
    pub fn with_api_key(mut self, key: impl Into<String>) -> Self {
        let key = key.into();
        if !key.is_empty() {
            self.api_key = Some(key);
        }
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Fetch the newest version record. `Ok(None)` means the backend
    /// reported no rows.
    pub fn fetch_latest(&self) -> Result<Option<VersionDescriptor>, UpdateError> {
        let url = format!(
            "{}/rest/v1/app_versions?select=*&order=version_code.desc&limit=1",
            self.base_url.trim_end_matches('/')
        );

        let client = reqwest::blocking::Client::builder()
            .timeout(self.timeout)
            .build()?;

        let mut request = client
            .get(&url)
            .header(reqwest::header::ACCEPT, "application/json");
        if let Some(key) = &self.api_key {
            request = request.header("apikey", key);
        }

        let body = request.send()?.error_for_status()?.text()?;
        parse_rows(&body)
    }
}

/// Parse the endpoint's response body, keeping only the first (newest) row.
fn parse_rows(body: &str) -> Result<Option<VersionDescriptor>, UpdateError> {
    let mut rows: Vec<VersionDescriptor> = serde_json::from_str(body)?;
    if rows.is_empty() {
        Ok(None)
    } else {
        Ok(Some(rows.remove(0)))
    }
}
