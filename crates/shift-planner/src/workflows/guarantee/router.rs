use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, post},
    Router,
};
use serde::Deserialize;
use serde_json::json;

use crate::auth::{authenticate, AuthProvider};

use super::domain::{DriverId, ShiftId, ShiftRecommendation, ShiftStatus};
use super::repository::{DriverDirectory, GuaranteeRepository, RepositoryError};
use super::service::{GuaranteeServiceError, IncomeGuaranteeService};

const DEFAULT_HISTORY_LIMIT: usize = 50;

/// Shared state for the guarantee endpoints: the engine plus the token
/// verifier gating mutations.
pub struct GuaranteeRouterState<R, D, P> {
    pub service: Arc<IncomeGuaranteeService<R, D>>,
    pub auth: Arc<P>,
}

/// Router builder exposing the guarantee lifecycle and reports.
pub fn guarantee_router<R, D, P>(state: Arc<GuaranteeRouterState<R, D, P>>) -> Router
where
    R: GuaranteeRepository + 'static,
    D: DriverDirectory + 'static,
    P: AuthProvider + 'static,
{
    Router::new()
        .route("/api/v1/guarantee/commit", post(commit_handler::<R, D, P>))
        .route(
            "/api/v1/guarantee/shifts/:shift_id/start",
            post(start_handler::<R, D, P>),
        )
        .route(
            "/api/v1/guarantee/shifts/:shift_id/actual-earnings",
            post(actual_earnings_handler::<R, D, P>),
        )
        .route(
            "/api/v1/guarantee/shifts/:shift_id/cancel",
            post(cancel_handler::<R, D, P>),
        )
        .route(
            "/api/v1/guarantee/driver/:driver_id/summary",
            get(summary_handler::<R, D, P>),
        )
        .route(
            "/api/v1/guarantee/driver/:driver_id/shifts",
            get(shifts_handler::<R, D, P>),
        )
        .route(
            "/api/v1/guarantee/driver/:driver_id/volatility",
            get(volatility_handler::<R, D, P>),
        )
        .route(
            "/api/v1/guarantee/driver/:driver_id/performance",
            get(performance_handler::<R, D, P>),
        )
        .route(
            "/api/v1/guarantee/driver/:driver_id/accuracy",
            get(accuracy_handler::<R, D, P>),
        )
        .route(
            "/api/v1/guarantee/driver/:driver_id/history",
            get(history_handler::<R, D, P>),
        )
        .with_state(state)
}

#[derive(Debug, Deserialize)]
pub struct CommitRequest {
    pub driver_id: DriverId,
    #[serde(flatten)]
    pub recommendation: ShiftRecommendation,
}

#[derive(Debug, Deserialize)]
pub struct ActualEarningsRequest {
    pub driver_id: DriverId,
    pub actual_earnings: f64,
}

#[derive(Debug, Deserialize)]
pub struct DriverRef {
    pub driver_id: DriverId,
}

#[derive(Debug, Default, Deserialize)]
pub struct ShiftsQuery {
    pub status: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct HistoryQuery {
    pub limit: Option<usize>,
}

pub(crate) async fn commit_handler<R, D, P>(
    State(state): State<Arc<GuaranteeRouterState<R, D, P>>>,
    headers: HeaderMap,
    axum::Json(payload): axum::Json<CommitRequest>,
) -> Response
where
    R: GuaranteeRepository + 'static,
    D: DriverDirectory + 'static,
    P: AuthProvider + 'static,
{
    if let Err(denied) = authenticate(state.auth.as_ref(), &headers) {
        return denied.into_response();
    }

    match state.service.commit(payload.driver_id, payload.recommendation) {
        Ok(shift) => (StatusCode::CREATED, axum::Json(shift.to_view())).into_response(),
        Err(error) => service_error_response(error),
    }
}

pub(crate) async fn start_handler<R, D, P>(
    State(state): State<Arc<GuaranteeRouterState<R, D, P>>>,
    headers: HeaderMap,
    Path(shift_id): Path<u64>,
    axum::Json(payload): axum::Json<DriverRef>,
) -> Response
where
    R: GuaranteeRepository + 'static,
    D: DriverDirectory + 'static,
    P: AuthProvider + 'static,
{
    if let Err(denied) = authenticate(state.auth.as_ref(), &headers) {
        return denied.into_response();
    }

    match state.service.start(ShiftId(shift_id), payload.driver_id) {
        Ok(shift) => (StatusCode::OK, axum::Json(shift.to_view())).into_response(),
        Err(error) => service_error_response(error),
    }
}

pub(crate) async fn actual_earnings_handler<R, D, P>(
    State(state): State<Arc<GuaranteeRouterState<R, D, P>>>,
    headers: HeaderMap,
    Path(shift_id): Path<u64>,
    axum::Json(payload): axum::Json<ActualEarningsRequest>,
) -> Response
where
    R: GuaranteeRepository + 'static,
    D: DriverDirectory + 'static,
    P: AuthProvider + 'static,
{
    if let Err(denied) = authenticate(state.auth.as_ref(), &headers) {
        return denied.into_response();
    }

    match state.service.record_actual_earnings(
        ShiftId(shift_id),
        payload.driver_id,
        payload.actual_earnings,
    ) {
        Ok(shift) => (StatusCode::OK, axum::Json(shift.to_view())).into_response(),
        Err(error) => service_error_response(error),
    }
}

pub(crate) async fn cancel_handler<R, D, P>(
    State(state): State<Arc<GuaranteeRouterState<R, D, P>>>,
    headers: HeaderMap,
    Path(shift_id): Path<u64>,
    axum::Json(payload): axum::Json<DriverRef>,
) -> Response
where
    R: GuaranteeRepository + 'static,
    D: DriverDirectory + 'static,
    P: AuthProvider + 'static,
{
    if let Err(denied) = authenticate(state.auth.as_ref(), &headers) {
        return denied.into_response();
    }

    match state.service.cancel(ShiftId(shift_id), payload.driver_id) {
        Ok(shift) => (StatusCode::OK, axum::Json(shift.to_view())).into_response(),
        Err(error) => service_error_response(error),
    }
}

pub(crate) async fn summary_handler<R, D, P>(
    State(state): State<Arc<GuaranteeRouterState<R, D, P>>>,
    Path(driver_id): Path<u64>,
) -> Response
where
    R: GuaranteeRepository + 'static,
    D: DriverDirectory + 'static,
    P: AuthProvider + 'static,
{
    match state.service.summary(DriverId(driver_id)) {
        Ok(summary) => (StatusCode::OK, axum::Json(summary)).into_response(),
        Err(error) => service_error_response(error),
    }
}

pub(crate) async fn shifts_handler<R, D, P>(
    State(state): State<Arc<GuaranteeRouterState<R, D, P>>>,
    Path(driver_id): Path<u64>,
    Query(query): Query<ShiftsQuery>,
) -> Response
where
    R: GuaranteeRepository + 'static,
    D: DriverDirectory + 'static,
    P: AuthProvider + 'static,
{
    let status = match query.status.as_deref() {
        None => None,
        Some(raw) => match ShiftStatus::parse(raw) {
            Some(status) => Some(status),
            None => {
                let payload = json!({ "error": format!("unknown shift status '{raw}'") });
                return (StatusCode::UNPROCESSABLE_ENTITY, axum::Json(payload)).into_response();
            }
        },
    };

    match state.service.shifts(DriverId(driver_id), status) {
        Ok(shifts) => {
            let views: Vec<_> = shifts.iter().map(|s| s.to_view()).collect();
            (StatusCode::OK, axum::Json(views)).into_response()
        }
        Err(error) => service_error_response(error),
    }
}

pub(crate) async fn volatility_handler<R, D, P>(
    State(state): State<Arc<GuaranteeRouterState<R, D, P>>>,
    Path(driver_id): Path<u64>,
) -> Response
where
    R: GuaranteeRepository + 'static,
    D: DriverDirectory + 'static,
    P: AuthProvider + 'static,
{
    match state.service.volatility(DriverId(driver_id)) {
        Ok(report) => (StatusCode::OK, axum::Json(report)).into_response(),
        Err(error) => service_error_response(error),
    }
}

pub(crate) async fn performance_handler<R, D, P>(
    State(state): State<Arc<GuaranteeRouterState<R, D, P>>>,
    Path(driver_id): Path<u64>,
) -> Response
where
    R: GuaranteeRepository + 'static,
    D: DriverDirectory + 'static,
    P: AuthProvider + 'static,
{
    match state.service.performance(DriverId(driver_id)) {
        Ok(report) => (StatusCode::OK, axum::Json(report)).into_response(),
        Err(error) => service_error_response(error),
    }
}

pub(crate) async fn accuracy_handler<R, D, P>(
    State(state): State<Arc<GuaranteeRouterState<R, D, P>>>,
    Path(driver_id): Path<u64>,
) -> Response
where
    R: GuaranteeRepository + 'static,
    D: DriverDirectory + 'static,
    P: AuthProvider + 'static,
{
    match state.service.accuracy(DriverId(driver_id)) {
        Ok(report) => (StatusCode::OK, axum::Json(report)).into_response(),
        Err(error) => service_error_response(error),
    }
}

pub(crate) async fn history_handler<R, D, P>(
    State(state): State<Arc<GuaranteeRouterState<R, D, P>>>,
    Path(driver_id): Path<u64>,
    Query(query): Query<HistoryQuery>,
) -> Response
where
    R: GuaranteeRepository + 'static,
    D: DriverDirectory + 'static,
    P: AuthProvider + 'static,
{
    let limit = query.limit.unwrap_or(DEFAULT_HISTORY_LIMIT);
    match state.service.history(DriverId(driver_id), limit) {
        Ok(entries) => {
            let views: Vec<_> = entries.iter().map(|e| e.to_view()).collect();
            (StatusCode::OK, axum::Json(views)).into_response()
        }
        Err(error) => service_error_response(error),
    }
}

fn service_error_response(error: GuaranteeServiceError) -> Response {
    let status = match &error {
        GuaranteeServiceError::Commitment(_) | GuaranteeServiceError::InvalidEarnings { .. } => {
            StatusCode::UNPROCESSABLE_ENTITY
        }
        GuaranteeServiceError::DriverNotFound(_)
        | GuaranteeServiceError::ShiftNotFound(_)
        | GuaranteeServiceError::Repository(RepositoryError::NotFound) => StatusCode::NOT_FOUND,
        GuaranteeServiceError::DriverSuspended(_) => StatusCode::FORBIDDEN,
        GuaranteeServiceError::InvalidTransition { .. } => StatusCode::BAD_REQUEST,
        GuaranteeServiceError::Repository(RepositoryError::Conflict) => StatusCode::CONFLICT,
        GuaranteeServiceError::Repository(RepositoryError::Unavailable(_))
        | GuaranteeServiceError::Directory(_) => StatusCode::INTERNAL_SERVER_ERROR,
    };

    let payload = json!({ "error": error.to_string() });
    (status, axum::Json(payload)).into_response()
}
