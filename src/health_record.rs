//! Health record retrieval from the upstream records service.
//!
//! The handler only needs the raw status and body of the upstream response;
//! decoding and status interpretation happen in the service layer so the
//! ordering of those checks stays in one place.

use std::time::Duration;

use async_trait::async_trait;
use http::StatusCode;
use serde_json::Value;

use crate::config::UpstreamConfig;
use crate::recommendations::Vitals;

/// Error type for health record retrieval
#[derive(Debug, thiserror::Error)]
pub enum FetchError {
    #[error("Failed to create HTTP client: {0}")]
    Client(String),

    #[error("Health record request failed: {0}")]
    Transport(#[from] reqwest::Error),
}

/// Raw upstream reply, before any decoding.
#[derive(Debug, Clone)]
pub struct UpstreamResponse {
    pub status: StatusCode,
    pub body: Vec<u8>,
}

/// Source of health records, keyed by record id.
#[async_trait]
pub trait HealthRecordSource: Send + Sync {
    async fn fetch(&self, record_id: &str) -> Result<UpstreamResponse, FetchError>;
}

/// Builds the lookup URL for a record.
///
/// The id is joined with a `/` regardless of whether `base_url` already ends
/// with one; the upstream has always been called with the resulting `//`.
pub fn record_url(base_url: &str, record_id: &str) -> String {
    format!("{}/{}", base_url, record_id)
}

/// Health record source backed by the records HTTP API.
pub struct HttpHealthRecordSource {
    base_url: String,
    http_client: reqwest::Client,
}

impl HttpHealthRecordSource {
    pub fn new(config: &UpstreamConfig) -> Result<Self, FetchError> {
        let mut builder = reqwest::Client::builder();
        if let Some(secs) = config.timeout_seconds {
            builder = builder.timeout(Duration::from_secs(secs));
        }
        let http_client = builder
            .build()
            .map_err(|e| FetchError::Client(e.to_string()))?;

        Ok(Self {
            base_url: config.base_url.clone(),
            http_client,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }
}

#[async_trait]
impl HealthRecordSource for HttpHealthRecordSource {
    async fn fetch(&self, record_id: &str) -> Result<UpstreamResponse, FetchError> {
        let url = record_url(&self.base_url, record_id);
        tracing::debug!(%url, record_id, "Fetching health record");

        let response = self.http_client.get(&url).send().await?;
        let status = response.status();
        let body = response.bytes().await?.to_vec();

        tracing::debug!(
            status = status.as_u16(),
            bytes = body.len(),
            "Health record response received"
        );

        Ok(UpstreamResponse { status, body })
    }
}

/// Read the vitals out of a decoded health record.
///
/// Missing fields, non-numeric fields and non-object records all read as 0.
pub fn extract_vitals(record: &Value) -> Vitals {
    let field = |name: &str| record.get(name).and_then(Value::as_f64).unwrap_or(0.0);

    Vitals {
        weight: field("weight"),
        height: field("height"),
        blood_pressure: field("bloodPressure"),
    }
}
