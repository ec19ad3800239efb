//! Worker account registry.

pub mod domain;
pub mod repository;
pub mod router;
pub mod service;

pub use domain::{RegisterWorker, Worker, WorkerRole, WorkerView};
pub use repository::{WorkerRepository, WorkerRepositoryError};
pub use router::{workers_router, WorkerRouterState};
pub use service::{WorkerService, WorkerServiceError};
