use crate::cli::ServeArgs;
use crate::infra::{
    AppState, InMemoryEligibilityStore, InMemoryGuaranteeRepository, InMemoryWorkerRepository,
    StaticTokenAuthProvider,
};
use crate::routes::api_router;
use axum::Extension;
use axum_prometheus::PrometheusMetricLayer;
use std::sync::atomic::Ordering;
use std::sync::Arc;
use tracing::{info, warn};

use shift_planner::auth::AccessRole;
use shift_planner::config::{AppConfig, AppEnvironment};
use shift_planner::error::AppError;
use shift_planner::telemetry;
use shift_planner::workflows::eligibility::{EligibilityEvaluator, EligibilityRouterState};
use shift_planner::workflows::guarantee::{GuaranteeRouterState, IncomeGuaranteeService};
use shift_planner::workflows::recommendations::{RecommendationsRouterState, ShiftRecommender};
use shift_planner::workflows::workers::{WorkerRouterState, WorkerService};

pub(crate) async fn run(mut args: ServeArgs) -> Result<(), AppError> {
    let mut config = AppConfig::load()?;

    if let Some(host) = args.host.take() {
        config.server.host = host;
    }
    if let Some(port) = args.port.take() {
        config.server.port = port;
    }

    telemetry::init(&config.telemetry)?;

    let (prometheus_layer, prometheus_handle) = PrometheusMetricLayer::pair();
    let readiness_flag = Arc::new(std::sync::atomic::AtomicBool::new(false));
    let app_state = AppState {
        readiness: readiness_flag.clone(),
        metrics: Arc::new(prometheus_handle),
    };

    let ledger = Arc::new(InMemoryGuaranteeRepository::default());
    let worker_repository = Arc::new(InMemoryWorkerRepository::default());
    let eligibility_store = Arc::new(InMemoryEligibilityStore::default());
    let auth = Arc::new(StaticTokenAuthProvider::default());

    if config.environment != AppEnvironment::Production {
        // Well-known tokens so local clients can exercise the API without
        // standing up a real identity provider.
        auth.grant("demo-driver", 1, AccessRole::Driver);
        auth.grant("demo-admin", 1000, AccessRole::Admin);
        warn!("static demo tokens are active; do not enable outside development");
    }

    let guarantee_service = Arc::new(IncomeGuaranteeService::new(
        ledger,
        worker_repository.clone(),
        config.guarantee,
    ));
    let eligibility_evaluator = Arc::new(EligibilityEvaluator::new(
        eligibility_store,
        config.eligibility,
    ));
    let worker_service = Arc::new(WorkerService::new(worker_repository));

    let app = api_router(
        Arc::new(GuaranteeRouterState {
            service: guarantee_service,
            auth: auth.clone(),
        }),
        Arc::new(EligibilityRouterState {
            evaluator: eligibility_evaluator,
            auth: auth.clone(),
        }),
        Arc::new(WorkerRouterState {
            service: worker_service,
            auth,
        }),
        Arc::new(RecommendationsRouterState {
            recommender: ShiftRecommender::default(),
        }),
    )
    .layer(Extension(app_state))
    .layer(prometheus_layer);

    let addr = config.server.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    readiness_flag.store(true, Ordering::Release);

    info!(?config.environment, %addr, "shift planner service ready");

    axum::serve(listener, app).await?;
    Ok(())
}
