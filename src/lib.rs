//! vitals-advisor: threshold-based health recommendations.
//!
//! Fetches a health record from the records API, derives one recommendation
//! each for weight, height and blood pressure, persists the result keyed by
//! record id, and returns it over HTTP.

pub mod config;
pub mod error;
pub mod health_record;
pub mod http;
pub mod middleware;
pub mod recommendations;
pub mod routes;
pub mod service;
pub mod state;
pub mod store;

pub use error::RecommendationError;
pub use recommendations::{RecommendationSet, Vitals};
pub use service::RecommendationService;
