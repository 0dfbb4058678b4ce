use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;

use crate::health_record::FetchError;

pub const MISSING_RECORD_ID: &str = "Record ID is required";
pub const DECODE_FAILED: &str = "Failed to decode JSON from health record response.";
pub const FETCH_FAILED: &str = "Failed to fetch health record";

/// Ways a recommendation request can fail. Each maps to a JSON `{"error": ...}` body.
#[derive(Debug, thiserror::Error)]
pub enum RecommendationError {
    #[error("{}", MISSING_RECORD_ID)]
    MissingRecordId,

    /// Upstream body was not JSON; carries the upstream status.
    #[error("{}", DECODE_FAILED)]
    Decode { status: StatusCode },

    /// Upstream answered with something other than 200.
    #[error("{}", FETCH_FAILED)]
    Upstream { status: StatusCode },

    /// Upstream could not be reached at all.
    #[error("{}", FETCH_FAILED)]
    Unreachable(#[from] FetchError),
}

impl RecommendationError {
    pub fn status(&self) -> StatusCode {
        match self {
            RecommendationError::MissingRecordId => StatusCode::BAD_REQUEST,
            RecommendationError::Decode { status } | RecommendationError::Upstream { status } => {
                *status
            }
            RecommendationError::Unreachable(_) => StatusCode::BAD_GATEWAY,
        }
    }
}

impl IntoResponse for RecommendationError {
    fn into_response(self) -> Response {
        let status = self.status();

        match &self {
            RecommendationError::MissingRecordId => {
                tracing::debug!("Rejected request without record id");
            }
            RecommendationError::Unreachable(e) => {
                tracing::error!(error = %e, "Health record service unreachable");
            }
            _ => {
                tracing::warn!(
                    status = status.as_u16(),
                    error = %self,
                    "Health record lookup failed"
                );
            }
        }

        (status, Json(json!({ "error": self.to_string() }))).into_response()
    }
}
