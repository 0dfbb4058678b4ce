//! The recommendation workflow: validate id, fetch record, compute, persist.
//!
//! `RecommendationService` holds its collaborators explicitly so tests can
//! swap in fakes for the records API and the store.

use std::sync::Arc;

use http::StatusCode;
use serde_json::Value;

use crate::error::RecommendationError;
use crate::health_record::{extract_vitals, HealthRecordSource};
use crate::recommendations::RecommendationSet;
use crate::store::{save_recommendations, RecommendationStore};

#[derive(Clone)]
pub struct RecommendationService {
    records: Arc<dyn HealthRecordSource>,
    store: Arc<dyn RecommendationStore>,
}

impl RecommendationService {
    pub fn new(records: Arc<dyn HealthRecordSource>, store: Arc<dyn RecommendationStore>) -> Self {
        Self { records, store }
    }

    /// Produce recommendations for `record_id`.
    ///
    /// A missing or empty id fails before any outbound call. The upstream body
    /// is decoded before its status is checked, so a non-JSON 404 reports a
    /// decode failure. Store failures are logged and do not affect the result.
    pub async fn recommend(
        &self,
        record_id: Option<&str>,
    ) -> Result<RecommendationSet, RecommendationError> {
        let record_id = match record_id {
            Some(id) if !id.is_empty() => id,
            _ => return Err(RecommendationError::MissingRecordId),
        };

        let response = self.records.fetch(record_id).await?;

        let record: Value = serde_json::from_slice(&response.body).map_err(|e| {
            tracing::debug!(record_id, error = %e, "Health record body is not valid JSON");
            RecommendationError::Decode {
                status: response.status,
            }
        })?;

        if response.status != StatusCode::OK {
            return Err(RecommendationError::Upstream {
                status: response.status,
            });
        }

        let vitals = extract_vitals(&record);
        let recommendations = RecommendationSet::from_vitals(&vitals);
        tracing::debug!(
            record_id,
            weight = vitals.weight,
            height = vitals.height,
            blood_pressure = vitals.blood_pressure,
            "Computed recommendations"
        );

        save_recommendations(self.store.as_ref(), record_id, &recommendations).await;

        Ok(recommendations)
    }
}
