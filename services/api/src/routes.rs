use crate::infra::{
    AppState, InMemoryEligibilityStore, InMemoryGuaranteeRepository, InMemoryWorkerRepository,
    StaticTokenAuthProvider,
};
use axum::http::{header, StatusCode};
use axum::response::IntoResponse;
use axum::Extension;
use axum::Json;
use serde_json::json;
use std::sync::Arc;

use shift_planner::workflows::eligibility::{eligibility_router, EligibilityRouterState};
use shift_planner::workflows::guarantee::{guarantee_router, GuaranteeRouterState};
use shift_planner::workflows::recommendations::{
    recommendations_router, RecommendationsRouterState,
};
use shift_planner::workflows::workers::{workers_router, WorkerRouterState};

pub(crate) type GuaranteeState = GuaranteeRouterState<
    InMemoryGuaranteeRepository,
    InMemoryWorkerRepository,
    StaticTokenAuthProvider,
>;
pub(crate) type EligibilityState =
    EligibilityRouterState<InMemoryEligibilityStore, StaticTokenAuthProvider>;
pub(crate) type WorkerState =
    WorkerRouterState<InMemoryWorkerRepository, StaticTokenAuthProvider>;

pub(crate) fn api_router(
    guarantee: Arc<GuaranteeState>,
    eligibility: Arc<EligibilityState>,
    workers: Arc<WorkerState>,
    recommendations: Arc<RecommendationsRouterState>,
) -> axum::Router {
    guarantee_router(guarantee)
        .merge(eligibility_router(eligibility))
        .merge(workers_router(workers))
        .merge(recommendations_router(recommendations))
        .route("/health", axum::routing::get(healthcheck))
        .route("/ready", axum::routing::get(readiness_endpoint))
        .route("/metrics", axum::routing::get(metrics_endpoint))
}

pub(crate) async fn healthcheck() -> Json<serde_json::Value> {
    Json(json!({ "status": "ok" }))
}

pub(crate) async fn readiness_endpoint(Extension(state): Extension<AppState>) -> impl IntoResponse {
    let ready = state.readiness.load(std::sync::atomic::Ordering::Relaxed);
    let status = if ready {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };

    let payload = if ready {
        json!({ "status": "ready" })
    } else {
        json!({ "status": "initializing" })
    };

    (status, Json(payload))
}

pub(crate) async fn metrics_endpoint(Extension(state): Extension<AppState>) -> impl IntoResponse {
    (
        StatusCode::OK,
        [(header::CONTENT_TYPE, "text/plain; version=0.0.4")],
        state.metrics.render(),
    )
}
