//! Shared application state for request handlers.

use crate::service::RecommendationService;

/// Shared application state, cloneable across handlers.
#[derive(Clone)]
pub struct AppState {
    pub recommendations: RecommendationService,
}

impl AppState {
    pub fn new(recommendations: RecommendationService) -> Self {
        Self { recommendations }
    }
}
