use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use chrono::Utc;
use tracing::info;

use crate::workflows::guarantee::DriverId;

use super::domain::{RegisterWorker, Worker};
use super::repository::{WorkerRepository, WorkerRepositoryError};

static WORKER_SEQUENCE: AtomicU64 = AtomicU64::new(1);

fn next_worker_id() -> DriverId {
    DriverId(WORKER_SEQUENCE.fetch_add(1, Ordering::Relaxed))
}

/// Account registry: registration, lookup, and admin suspend/reactivate.
/// Hard deletes are deliberately not offered.
pub struct WorkerService<W> {
    repository: Arc<W>,
}

impl<W> WorkerService<W>
where
    W: WorkerRepository + 'static,
{
    pub fn new(repository: Arc<W>) -> Self {
        Self { repository }
    }

    pub fn register(&self, request: RegisterWorker) -> Result<Worker, WorkerServiceError> {
        let name = request.name.trim().to_string();
        if name.is_empty() {
            return Err(WorkerServiceError::BlankName);
        }

        let email = request.email.trim().to_ascii_lowercase();
        if !email.contains('@') || email.starts_with('@') || email.ends_with('@') {
            return Err(WorkerServiceError::InvalidEmail { found: email });
        }

        if self.repository.fetch_by_email(&email)?.is_some() {
            return Err(WorkerServiceError::Repository(WorkerRepositoryError::Conflict));
        }

        let worker = Worker {
            id: next_worker_id(),
            name,
            email,
            role: request.role,
            active: true,
            created_at: Utc::now(),
        };
        let stored = self.repository.insert(worker)?;
        info!(worker = stored.id.0, role = stored.role.label(), "worker registered");
        Ok(stored)
    }

    pub fn get(&self, id: DriverId) -> Result<Worker, WorkerServiceError> {
        self.repository
            .fetch(id)?
            .ok_or(WorkerServiceError::Repository(WorkerRepositoryError::NotFound))
    }

    pub fn list(&self) -> Result<Vec<Worker>, WorkerServiceError> {
        Ok(self.repository.list()?)
    }

    pub fn suspend(&self, id: DriverId) -> Result<Worker, WorkerServiceError> {
        self.set_active(id, false)
    }

    pub fn reactivate(&self, id: DriverId) -> Result<Worker, WorkerServiceError> {
        self.set_active(id, true)
    }

    fn set_active(&self, id: DriverId, active: bool) -> Result<Worker, WorkerServiceError> {
        let mut worker = self.get(id)?;
        worker.active = active;
        self.repository.update(worker.clone())?;
        info!(worker = id.0, active, "worker account flag updated");
        Ok(worker)
    }
}

#[derive(Debug, thiserror::Error)]
pub enum WorkerServiceError {
    #[error("worker name must not be blank")]
    BlankName,
    #[error("'{found}' is not a valid email address")]
    InvalidEmail { found: String },
    #[error(transparent)]
    Repository(#[from] WorkerRepositoryError),
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::workflows::workers::domain::WorkerRole;
    use std::collections::HashMap;
    use std::sync::Mutex;

    #[derive(Default)]
    struct MemoryWorkers {
        workers: Mutex<HashMap<DriverId, Worker>>,
    }

    impl WorkerRepository for MemoryWorkers {
        fn insert(&self, worker: Worker) -> Result<Worker, WorkerRepositoryError> {
            let mut workers = self.workers.lock().expect("worker mutex poisoned");
            if workers.values().any(|w| w.email == worker.email) {
                return Err(WorkerRepositoryError::Conflict);
            }
            workers.insert(worker.id, worker.clone());
            Ok(worker)
        }

        fn update(&self, worker: Worker) -> Result<(), WorkerRepositoryError> {
            let mut workers = self.workers.lock().expect("worker mutex poisoned");
            if !workers.contains_key(&worker.id) {
                return Err(WorkerRepositoryError::NotFound);
            }
            workers.insert(worker.id, worker);
            Ok(())
        }

        fn fetch(&self, id: DriverId) -> Result<Option<Worker>, WorkerRepositoryError> {
            Ok(self
                .workers
                .lock()
                .expect("worker mutex poisoned")
                .get(&id)
                .cloned())
        }

        fn fetch_by_email(&self, email: &str) -> Result<Option<Worker>, WorkerRepositoryError> {
            Ok(self
                .workers
                .lock()
                .expect("worker mutex poisoned")
                .values()
                .find(|w| w.email == email)
                .cloned())
        }

        fn list(&self) -> Result<Vec<Worker>, WorkerRepositoryError> {
            Ok(self
                .workers
                .lock()
                .expect("worker mutex poisoned")
                .values()
                .cloned()
                .collect())
        }
    }

    fn service() -> WorkerService<MemoryWorkers> {
        WorkerService::new(Arc::new(MemoryWorkers::default()))
    }

    fn registration(email: &str) -> RegisterWorker {
        RegisterWorker {
            name: "Avery Park".to_string(),
            email: email.to_string(),
            role: WorkerRole::Driver,
        }
    }

    #[test]
    fn register_normalizes_and_stores_the_account() {
        let service = service();
        let worker = service
            .register(registration("  Avery.Park@Example.COM  "))
            .expect("registration succeeds");
        assert_eq!(worker.email, "avery.park@example.com");
        assert_eq!(worker.role, WorkerRole::Driver);
        assert!(worker.active);
    }

    #[test]
    fn duplicate_emails_conflict() {
        let service = service();
        service
            .register(registration("avery@example.com"))
            .expect("first registration succeeds");

        match service.register(registration("AVERY@example.com")) {
            Err(WorkerServiceError::Repository(WorkerRepositoryError::Conflict)) => {}
            other => panic!("expected conflict, got {other:?}"),
        }
    }

    #[test]
    fn rejects_blank_names_and_bad_emails() {
        let service = service();

        let mut blank = registration("avery@example.com");
        blank.name = "  ".to_string();
        assert!(matches!(
            service.register(blank),
            Err(WorkerServiceError::BlankName)
        ));

        assert!(matches!(
            service.register(registration("not-an-email")),
            Err(WorkerServiceError::InvalidEmail { .. })
        ));
    }

    #[test]
    fn suspend_and_reactivate_toggle_the_active_flag() {
        let service = service();
        let worker = service
            .register(registration("avery@example.com"))
            .expect("registration succeeds");

        let suspended = service.suspend(worker.id).expect("suspend succeeds");
        assert!(!suspended.active);

        let restored = service.reactivate(worker.id).expect("reactivate succeeds");
        assert!(restored.active);
    }

    #[test]
    fn unknown_workers_read_as_not_found() {
        let service = service();
        match service.get(DriverId(424_242)) {
            Err(WorkerServiceError::Repository(WorkerRepositoryError::NotFound)) => {}
            other => panic!("expected not found, got {other:?}"),
        }
    }
}
