use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, post},
    Router,
};
use serde_json::json;

use crate::auth::{authenticate_admin, AuthProvider};
use crate::workflows::guarantee::DriverId;

use super::domain::RegisterWorker;
use super::repository::{WorkerRepository, WorkerRepositoryError};
use super::service::{WorkerService, WorkerServiceError};

/// Shared state for the worker-registry endpoints.
pub struct WorkerRouterState<W, P> {
    pub service: Arc<WorkerService<W>>,
    pub auth: Arc<P>,
}

/// Router builder for worker registration and account administration.
pub fn workers_router<W, P>(state: Arc<WorkerRouterState<W, P>>) -> Router
where
    W: WorkerRepository + 'static,
    P: AuthProvider + 'static,
{
    Router::new()
        .route("/api/v1/workers", post(register_handler::<W, P>))
        .route("/api/v1/workers", get(list_handler::<W, P>))
        .route("/api/v1/workers/:worker_id", get(get_handler::<W, P>))
        .route(
            "/api/v1/workers/:worker_id/suspend",
            post(suspend_handler::<W, P>),
        )
        .route(
            "/api/v1/workers/:worker_id/reactivate",
            post(reactivate_handler::<W, P>),
        )
        .with_state(state)
}

pub(crate) async fn register_handler<W, P>(
    State(state): State<Arc<WorkerRouterState<W, P>>>,
    axum::Json(request): axum::Json<RegisterWorker>,
) -> Response
where
    W: WorkerRepository + 'static,
    P: AuthProvider + 'static,
{
    match state.service.register(request) {
        Ok(worker) => (StatusCode::CREATED, axum::Json(worker.to_view())).into_response(),
        Err(error) => service_error_response(error),
    }
}

pub(crate) async fn list_handler<W, P>(
    State(state): State<Arc<WorkerRouterState<W, P>>>,
) -> Response
where
    W: WorkerRepository + 'static,
    P: AuthProvider + 'static,
{
    match state.service.list() {
        Ok(workers) => {
            let views: Vec<_> = workers.iter().map(|w| w.to_view()).collect();
            (StatusCode::OK, axum::Json(views)).into_response()
        }
        Err(error) => service_error_response(error),
    }
}

pub(crate) async fn get_handler<W, P>(
    State(state): State<Arc<WorkerRouterState<W, P>>>,
    Path(worker_id): Path<u64>,
) -> Response
where
    W: WorkerRepository + 'static,
    P: AuthProvider + 'static,
{
    match state.service.get(DriverId(worker_id)) {
        Ok(worker) => (StatusCode::OK, axum::Json(worker.to_view())).into_response(),
        Err(error) => service_error_response(error),
    }
}

pub(crate) async fn suspend_handler<W, P>(
    State(state): State<Arc<WorkerRouterState<W, P>>>,
    headers: HeaderMap,
    Path(worker_id): Path<u64>,
) -> Response
where
    W: WorkerRepository + 'static,
    P: AuthProvider + 'static,
{
    if let Err(denied) = authenticate_admin(state.auth.as_ref(), &headers) {
        return denied.into_response();
    }

    match state.service.suspend(DriverId(worker_id)) {
        Ok(worker) => (StatusCode::OK, axum::Json(worker.to_view())).into_response(),
        Err(error) => service_error_response(error),
    }
}

pub(crate) async fn reactivate_handler<W, P>(
    State(state): State<Arc<WorkerRouterState<W, P>>>,
    headers: HeaderMap,
    Path(worker_id): Path<u64>,
) -> Response
where
    W: WorkerRepository + 'static,
    P: AuthProvider + 'static,
{
    if let Err(denied) = authenticate_admin(state.auth.as_ref(), &headers) {
        return denied.into_response();
    }

    match state.service.reactivate(DriverId(worker_id)) {
        Ok(worker) => (StatusCode::OK, axum::Json(worker.to_view())).into_response(),
        Err(error) => service_error_response(error),
    }
}

fn service_error_response(error: WorkerServiceError) -> Response {
    let status = match &error {
        WorkerServiceError::BlankName | WorkerServiceError::InvalidEmail { .. } => {
            StatusCode::UNPROCESSABLE_ENTITY
        }
        WorkerServiceError::Repository(WorkerRepositoryError::Conflict) => StatusCode::CONFLICT,
        WorkerServiceError::Repository(WorkerRepositoryError::NotFound) => StatusCode::NOT_FOUND,
        WorkerServiceError::Repository(WorkerRepositoryError::Unavailable(_)) => {
            StatusCode::INTERNAL_SERVER_ERROR
        }
    };

    let payload = json!({ "error": error.to_string() });
    (status, axum::Json(payload)).into_response()
}
