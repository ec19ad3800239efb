use std::sync::Arc;

use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
    Router,
};
use chrono::{NaiveDate, Utc};
use serde::Deserialize;
use serde_json::json;

use super::ShiftRecommender;

/// Shared state for the recommendations endpoint.
pub struct RecommendationsRouterState {
    pub recommender: ShiftRecommender,
}

pub fn recommendations_router(state: Arc<RecommendationsRouterState>) -> Router {
    Router::new()
        .route("/api/v1/recommendations", get(recommendations_handler))
        .with_state(state)
}

#[derive(Debug, Default, Deserialize)]
pub struct RecommendationsQuery {
    /// Planning start date (YYYY-MM-DD); defaults to today.
    pub date: Option<String>,
    pub limit: Option<usize>,
}

pub(crate) async fn recommendations_handler(
    State(state): State<Arc<RecommendationsRouterState>>,
    Query(query): Query<RecommendationsQuery>,
) -> Response {
    let from = match query.date.as_deref() {
        None => Utc::now().date_naive(),
        Some(raw) => match NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d") {
            Ok(date) => date,
            Err(_) => {
                let payload = json!({
                    "error": format!("'{raw}' is not a valid YYYY-MM-DD date"),
                });
                return (StatusCode::UNPROCESSABLE_ENTITY, axum::Json(payload)).into_response();
            }
        },
    };

    let recommender = match query.limit {
        Some(limit) => ShiftRecommender::with_limit(limit),
        None => state.recommender,
    };

    (StatusCode::OK, axum::Json(recommender.recommend(from))).into_response()
}
