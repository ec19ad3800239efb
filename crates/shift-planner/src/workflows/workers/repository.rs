use crate::workflows::guarantee::DriverId;

use super::domain::Worker;

/// Storage abstraction for worker accounts. Email is the unique key;
/// inserting a duplicate must yield `Conflict`.
pub trait WorkerRepository: Send + Sync {
    fn insert(&self, worker: Worker) -> Result<Worker, WorkerRepositoryError>;
    fn update(&self, worker: Worker) -> Result<(), WorkerRepositoryError>;
    fn fetch(&self, id: DriverId) -> Result<Option<Worker>, WorkerRepositoryError>;
    fn fetch_by_email(&self, email: &str) -> Result<Option<Worker>, WorkerRepositoryError>;
    fn list(&self) -> Result<Vec<Worker>, WorkerRepositoryError>;
}

#[derive(Debug, thiserror::Error)]
pub enum WorkerRepositoryError {
    #[error("a worker with this email already exists")]
    Conflict,
    #[error("worker not found")]
    NotFound,
    #[error("worker repository unavailable: {0}")]
    Unavailable(String),
}
