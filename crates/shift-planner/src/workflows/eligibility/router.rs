use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, post, put},
    Router,
};
use serde_json::json;

use crate::auth::{authenticate_admin, AuthProvider};
use crate::workflows::guarantee::DriverId;

use super::domain::MetricsUpdate;
use super::evaluator::{EligibilityEvaluator, EligibilityStore, EligibilityStoreError};

/// Shared state for the eligibility endpoints.
pub struct EligibilityRouterState<S, P> {
    pub evaluator: Arc<EligibilityEvaluator<S>>,
    pub auth: Arc<P>,
}

/// Router builder for eligibility checks and account standing.
pub fn eligibility_router<S, P>(state: Arc<EligibilityRouterState<S, P>>) -> Router
where
    S: EligibilityStore + 'static,
    P: AuthProvider + 'static,
{
    Router::new()
        .route(
            "/api/v1/eligibility/:worker_id",
            get(eligibility_handler::<S, P>),
        )
        .route(
            "/api/v1/eligibility/:worker_id/status",
            get(status_handler::<S, P>),
        )
        .route(
            "/api/v1/eligibility/:worker_id/metrics",
            put(metrics_handler::<S, P>),
        )
        .route(
            "/api/v1/eligibility/:worker_id/suspend",
            post(suspend_handler::<S, P>),
        )
        .route(
            "/api/v1/eligibility/:worker_id/reactivate",
            post(reactivate_handler::<S, P>),
        )
        .with_state(state)
}

pub(crate) async fn eligibility_handler<S, P>(
    State(state): State<Arc<EligibilityRouterState<S, P>>>,
    Path(worker_id): Path<u64>,
) -> Response
where
    S: EligibilityStore + 'static,
    P: AuthProvider + 'static,
{
    match state.evaluator.is_eligible(DriverId(worker_id)) {
        Ok(is_eligible) => (
            StatusCode::OK,
            axum::Json(json!({
                "worker_id": worker_id,
                "is_eligible": is_eligible,
            })),
        )
            .into_response(),
        Err(error) => store_error_response(error),
    }
}

pub(crate) async fn status_handler<S, P>(
    State(state): State<Arc<EligibilityRouterState<S, P>>>,
    Path(worker_id): Path<u64>,
) -> Response
where
    S: EligibilityStore + 'static,
    P: AuthProvider + 'static,
{
    match state.evaluator.status(DriverId(worker_id)) {
        Ok(status) => (StatusCode::OK, axum::Json(status)).into_response(),
        Err(error) => store_error_response(error),
    }
}

pub(crate) async fn metrics_handler<S, P>(
    State(state): State<Arc<EligibilityRouterState<S, P>>>,
    headers: HeaderMap,
    Path(worker_id): Path<u64>,
    axum::Json(update): axum::Json<MetricsUpdate>,
) -> Response
where
    S: EligibilityStore + 'static,
    P: AuthProvider + 'static,
{
    if let Err(denied) = authenticate_admin(state.auth.as_ref(), &headers) {
        return denied.into_response();
    }

    if !rates_valid(&update) {
        let payload = json!({
            "error": "acceptance and cancellation rates must be fractions in 0.0..=1.0 and hours must be >= 0",
        });
        return (StatusCode::UNPROCESSABLE_ENTITY, axum::Json(payload)).into_response();
    }

    match state.evaluator.update_metrics(DriverId(worker_id), update) {
        Ok(record) => (StatusCode::OK, axum::Json(record)).into_response(),
        Err(error) => store_error_response(error),
    }
}

pub(crate) async fn suspend_handler<S, P>(
    State(state): State<Arc<EligibilityRouterState<S, P>>>,
    headers: HeaderMap,
    Path(worker_id): Path<u64>,
) -> Response
where
    S: EligibilityStore + 'static,
    P: AuthProvider + 'static,
{
    if let Err(denied) = authenticate_admin(state.auth.as_ref(), &headers) {
        return denied.into_response();
    }

    match state.evaluator.suspend(DriverId(worker_id)) {
        Ok(record) => (StatusCode::OK, axum::Json(record)).into_response(),
        Err(error) => store_error_response(error),
    }
}

pub(crate) async fn reactivate_handler<S, P>(
    State(state): State<Arc<EligibilityRouterState<S, P>>>,
    headers: HeaderMap,
    Path(worker_id): Path<u64>,
) -> Response
where
    S: EligibilityStore + 'static,
    P: AuthProvider + 'static,
{
    if let Err(denied) = authenticate_admin(state.auth.as_ref(), &headers) {
        return denied.into_response();
    }

    match state.evaluator.reactivate(DriverId(worker_id)) {
        Ok(record) => (StatusCode::OK, axum::Json(record)).into_response(),
        Err(error) => store_error_response(error),
    }
}

fn rates_valid(update: &MetricsUpdate) -> bool {
    let fraction = 0.0..=1.0;
    update.active_hours_week.is_finite()
        && update.active_hours_week >= 0.0
        && fraction.contains(&update.acceptance_rate)
        && fraction.contains(&update.cancellation_rate)
}

fn store_error_response(error: EligibilityStoreError) -> Response {
    let payload = json!({ "error": error.to_string() });
    (StatusCode::INTERNAL_SERVER_ERROR, axum::Json(payload)).into_response()
}
