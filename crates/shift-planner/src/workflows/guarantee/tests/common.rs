use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use chrono::{TimeZone, Utc};

use crate::auth::{AccessRole, AuthContext, AuthProvider};
use crate::config::GuaranteeConfig;
use crate::workflows::guarantee::domain::{
    CommittedShift, DriverId, GuaranteeLogEntry, ShiftId, ShiftRecommendation,
};
use crate::workflows::guarantee::repository::{
    DirectoryError, DriverAccount, DriverDirectory, GuaranteeRepository, RepositoryError,
};
use crate::workflows::guarantee::service::IncomeGuaranteeService;

pub(super) const ACTIVE_DRIVER: DriverId = DriverId(901);
pub(super) const SUSPENDED_DRIVER: DriverId = DriverId(902);

pub(super) fn guarantee_config() -> GuaranteeConfig {
    GuaranteeConfig {
        threshold: 0.9,
        min_shift_hours: 4.0,
    }
}

pub(super) fn recommendation() -> ShiftRecommendation {
    ShiftRecommendation {
        location_name: "Central London".to_string(),
        location_key: Some("london_central".to_string()),
        region: Some("London".to_string()),
        zone: Some("Central".to_string()),
        shift_type: "Evening Rush (Peak)".to_string(),
        day_name: Some("Friday".to_string()),
        start_time: Utc
            .with_ymd_and_hms(2026, 3, 6, 17, 0, 0)
            .single()
            .expect("valid"),
        end_time: Utc
            .with_ymd_and_hms(2026, 3, 6, 22, 0, 0)
            .single()
            .expect("valid"),
        predicted_earnings: 100.0,
        base_hourly_rate: Some(22.5),
        demand_score: Some(63.0),
        guarantee_eligible: true,
    }
}

#[derive(Default)]
struct RepoState {
    shifts: HashMap<ShiftId, CommittedShift>,
    logs: Vec<GuaranteeLogEntry>,
}

/// One mutex over shifts and logs together, mirroring the one-transaction
/// discipline of the real store.
#[derive(Default)]
pub(super) struct MemoryRepository {
    state: Mutex<RepoState>,
}

impl MemoryRepository {
    pub(super) fn logs(&self) -> Vec<GuaranteeLogEntry> {
        self.state
            .lock()
            .expect("repository mutex poisoned")
            .logs
            .clone()
    }
}

impl GuaranteeRepository for MemoryRepository {
    fn insert_shift(&self, shift: CommittedShift) -> Result<CommittedShift, RepositoryError> {
        let mut state = self.state.lock().expect("repository mutex poisoned");
        if state.shifts.contains_key(&shift.id) {
            return Err(RepositoryError::Conflict);
        }
        state.shifts.insert(shift.id, shift.clone());
        Ok(shift)
    }

    fn update_shift(&self, shift: CommittedShift) -> Result<(), RepositoryError> {
        let mut state = self.state.lock().expect("repository mutex poisoned");
        if !state.shifts.contains_key(&shift.id) {
            return Err(RepositoryError::NotFound);
        }
        state.shifts.insert(shift.id, shift);
        Ok(())
    }

    fn fetch_shift(&self, id: ShiftId) -> Result<Option<CommittedShift>, RepositoryError> {
        let state = self.state.lock().expect("repository mutex poisoned");
        Ok(state.shifts.get(&id).cloned())
    }

    fn shifts_for_driver(
        &self,
        driver_id: DriverId,
    ) -> Result<Vec<CommittedShift>, RepositoryError> {
        let state = self.state.lock().expect("repository mutex poisoned");
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
        let mut state = self.state.lock().expect("repository mutex poisoned");
        state.logs.push(entry);
        Ok(())
    }

    fn logs_for_driver(
        &self,
        driver_id: DriverId,
        limit: usize,
    ) -> Result<Vec<GuaranteeLogEntry>, RepositoryError> {
        let state = self.state.lock().expect("repository mutex poisoned");
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

/// Repository that fails every call, for exercising the 500 path.
pub(super) struct UnavailableRepository;

impl GuaranteeRepository for UnavailableRepository {
    fn insert_shift(&self, _shift: CommittedShift) -> Result<CommittedShift, RepositoryError> {
        Err(RepositoryError::Unavailable("ledger offline".to_string()))
    }

    fn update_shift(&self, _shift: CommittedShift) -> Result<(), RepositoryError> {
        Err(RepositoryError::Unavailable("ledger offline".to_string()))
    }

    fn fetch_shift(&self, _id: ShiftId) -> Result<Option<CommittedShift>, RepositoryError> {
        Err(RepositoryError::Unavailable("ledger offline".to_string()))
    }

    fn shifts_for_driver(
        &self,
        _driver_id: DriverId,
    ) -> Result<Vec<CommittedShift>, RepositoryError> {
        Err(RepositoryError::Unavailable("ledger offline".to_string()))
    }

    fn append_log(&self, _entry: GuaranteeLogEntry) -> Result<(), RepositoryError> {
        Err(RepositoryError::Unavailable("ledger offline".to_string()))
    }

    fn logs_for_driver(
        &self,
        _driver_id: DriverId,
        _limit: usize,
    ) -> Result<Vec<GuaranteeLogEntry>, RepositoryError> {
        Err(RepositoryError::Unavailable("ledger offline".to_string()))
    }
}

#[derive(Default)]
pub(super) struct MemoryDirectory {
    drivers: Mutex<HashMap<DriverId, DriverAccount>>,
}

impl MemoryDirectory {
    pub(super) fn insert(&self, id: DriverId, active: bool) {
        self.drivers
            .lock()
            .expect("directory mutex poisoned")
            .insert(id, DriverAccount { id, active });
    }
}

impl DriverDirectory for MemoryDirectory {
    fn find_driver(&self, id: DriverId) -> Result<Option<DriverAccount>, DirectoryError> {
        Ok(self
            .drivers
            .lock()
            .expect("directory mutex poisoned")
            .get(&id)
            .copied())
    }
}

/// Fixed-token verifier for router tests.
pub(super) struct StaticAuth;

pub(super) const DRIVER_TOKEN: &str = "driver-token";

impl AuthProvider for StaticAuth {
    fn verify(&self, token: &str) -> Option<AuthContext> {
        (token == DRIVER_TOKEN).then_some(AuthContext {
            user_id: ACTIVE_DRIVER.0,
            role: AccessRole::Driver,
        })
    }
}

pub(super) type TestService = IncomeGuaranteeService<MemoryRepository, MemoryDirectory>;

pub(super) fn build_service() -> (Arc<TestService>, Arc<MemoryRepository>, Arc<MemoryDirectory>) {
    let repository = Arc::new(MemoryRepository::default());
    let directory = Arc::new(MemoryDirectory::default());
    directory.insert(ACTIVE_DRIVER, true);
    directory.insert(SUSPENDED_DRIVER, false);
    let service = Arc::new(IncomeGuaranteeService::new(
        repository.clone(),
        directory.clone(),
        guarantee_config(),
    ));
    (service, repository, directory)
}
