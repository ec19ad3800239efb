use metrics_exporter_prometheus::PrometheusHandle;
use std::collections::HashMap;
use std::sync::atomic::AtomicBool;
use std::sync::{Arc, Mutex};

use shift_planner::auth::{AccessRole, AuthContext, AuthProvider};
use shift_planner::workflows::eligibility::{
    EligibilityRecord, EligibilityStore, EligibilityStoreError,
};
use shift_planner::workflows::guarantee::{
    CommittedShift, DirectoryError, DriverAccount, DriverDirectory, DriverId, GuaranteeLogEntry,
    GuaranteeRepository, RepositoryError, ShiftId,
};
use shift_planner::workflows::workers::{Worker, WorkerRepository, WorkerRepositoryError};

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
}

#[derive(Default)]
struct LedgerState {
    shifts: HashMap<ShiftId, CommittedShift>,
    logs: Vec<GuaranteeLogEntry>,
}

/// Shifts and their audit log live behind one mutex so each lifecycle
/// operation commits atomically with its log insert.
#[derive(Default)]
pub(crate) struct InMemoryGuaranteeRepository {
    state: Mutex<LedgerState>,
}

impl GuaranteeRepository for InMemoryGuaranteeRepository {
    fn insert_shift(&self, shift: CommittedShift) -> Result<CommittedShift, RepositoryError> {
        let mut state = self.state.lock().expect("ledger mutex poisoned");
        if state.shifts.contains_key(&shift.id) {
            return Err(RepositoryError::Conflict);
        }
        state.shifts.insert(shift.id, shift.clone());
        Ok(shift)
    }

    fn update_shift(&self, shift: CommittedShift) -> Result<(), RepositoryError> {
        let mut state = self.state.lock().expect("ledger mutex poisoned");
        if !state.shifts.contains_key(&shift.id) {
            return Err(RepositoryError::NotFound);
        }
        state.shifts.insert(shift.id, shift);
        Ok(())
    }

    fn fetch_shift(&self, id: ShiftId) -> Result<Option<CommittedShift>, RepositoryError> {
        let state = self.state.lock().expect("ledger mutex poisoned");
        Ok(state.shifts.get(&id).cloned())
    }

    fn shifts_for_driver(
        &self,
        driver_id: DriverId,
    ) -> Result<Vec<CommittedShift>, RepositoryError> {
        let state = self.state.lock().expect("ledger mutex poisoned");
        let mut shifts: Vec<CommittedShift> = state
            .shifts
            .values()
            .filter(|s| s.driver_id == driver_id)
            .cloned()
            .collect();
        shifts.sort_by(|a, b| b.id.cmp(&a.id));
        Ok(shifts)
    }

    fn append_log(&self, entry: GuaranteeLogEntry) -> Result<(), RepositoryError> {
        let mut state = self.state.lock().expect("ledger mutex poisoned");
        state.logs.push(entry);
        Ok(())
    }

    fn logs_for_driver(
        &self,
        driver_id: DriverId,
        limit: usize,
    ) -> Result<Vec<GuaranteeLogEntry>, RepositoryError> {
        let state = self.state.lock().expect("ledger mutex poisoned");
        let mut logs: Vec<GuaranteeLogEntry> = state
            .logs
            .iter()
            .filter(|entry| entry.driver_id == driver_id)
            .cloned()
            .collect();
        logs.sort_by(|a, b| b.id.cmp(&a.id));
        logs.truncate(limit);
        Ok(logs)
    }
}

/// Worker accounts, also serving as the guarantee engine's driver
/// directory.
#[derive(Default)]
pub(crate) struct InMemoryWorkerRepository {
    workers: Mutex<HashMap<DriverId, Worker>>,
}

impl WorkerRepository for InMemoryWorkerRepository {
    fn insert(&self, worker: Worker) -> Result<Worker, WorkerRepositoryError> {
        let mut workers = self.workers.lock().expect("worker mutex poisoned");
        if workers.contains_key(&worker.id) {
            return Err(WorkerRepositoryError::Conflict);
        }
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
        let workers = self.workers.lock().expect("worker mutex poisoned");
        Ok(workers.get(&id).cloned())
    }

    fn fetch_by_email(&self, email: &str) -> Result<Option<Worker>, WorkerRepositoryError> {
        let workers = self.workers.lock().expect("worker mutex poisoned");
        Ok(workers.values().find(|w| w.email == email).cloned())
    }

    fn list(&self) -> Result<Vec<Worker>, WorkerRepositoryError> {
        let workers = self.workers.lock().expect("worker mutex poisoned");
        let mut all: Vec<Worker> = workers.values().cloned().collect();
        all.sort_by(|a, b| a.id.cmp(&b.id));
        Ok(all)
    }
}

impl DriverDirectory for InMemoryWorkerRepository {
    fn find_driver(&self, id: DriverId) -> Result<Option<DriverAccount>, DirectoryError> {
        let workers = self.workers.lock().expect("worker mutex poisoned");
        Ok(workers.get(&id).map(|worker| DriverAccount {
            id: worker.id,
            active: worker.active,
        }))
    }
}

#[derive(Default)]
pub(crate) struct InMemoryEligibilityStore {
    records: Mutex<HashMap<DriverId, EligibilityRecord>>,
}

impl EligibilityStore for InMemoryEligibilityStore {
    fn fetch(
        &self,
        worker_id: DriverId,
    ) -> Result<Option<EligibilityRecord>, EligibilityStoreError> {
        let records = self.records.lock().expect("eligibility mutex poisoned");
        Ok(records.get(&worker_id).cloned())
    }

    fn upsert(&self, record: EligibilityRecord) -> Result<EligibilityRecord, EligibilityStoreError> {
        let mut records = self.records.lock().expect("eligibility mutex poisoned");
        records.insert(record.worker_id, record.clone());
        Ok(record)
    }
}

/// Token verifier backed by a static map. Stands in for the real identity
/// provider in development and demos.
#[derive(Default)]
pub(crate) struct StaticTokenAuthProvider {
    tokens: Mutex<HashMap<String, AuthContext>>,
}

impl StaticTokenAuthProvider {
    pub(crate) fn grant(&self, token: &str, user_id: u64, role: AccessRole) {
        self.tokens
            .lock()
            .expect("token mutex poisoned")
            .insert(token.to_string(), AuthContext { user_id, role });
    }
}

impl AuthProvider for StaticTokenAuthProvider {
    fn verify(&self, token: &str) -> Option<AuthContext> {
        self.tokens
            .lock()
            .expect("token mutex poisoned")
            .get(token)
            .copied()
    }
}
