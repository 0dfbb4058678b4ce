//! Handlers producing recommendations for a health record.

use axum::{
    extract::{Path, State},
    Extension, Json,
};
use serde::Deserialize;

use crate::error::RecommendationError;
use crate::middleware::RequestId;
use crate::recommendations::RecommendationSet;
use crate::state::AppState;

#[derive(Deserialize)]
pub struct RecordPath {
    pub record_id: String,
}

/// Computes, stores and returns recommendations for `record_id`.
pub async fn recommend(
    State(state): State<AppState>,
    Extension(request_id): Extension<RequestId>,
    Path(path): Path<RecordPath>,
) -> Result<Json<RecommendationSet>, RecommendationError> {
    tracing::debug!(
        request_id = %request_id.0,
        record_id = %path.record_id,
        "Recommendation requested"
    );

    let recommendations = state
        .recommendations
        .recommend(Some(path.record_id.as_str()))
        .await?;
    Ok(Json(recommendations))
}

/// Requests that reach the collection path without an id segment.
pub async fn recommend_without_id(
    State(state): State<AppState>,
    Extension(request_id): Extension<RequestId>,
) -> Result<Json<RecommendationSet>, RecommendationError> {
    tracing::debug!(request_id = %request_id.0, "Recommendation requested without record id");

    let recommendations = state.recommendations.recommend(None).await?;
    Ok(Json(recommendations))
}
