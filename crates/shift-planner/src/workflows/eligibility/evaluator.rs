use std::sync::Arc;

use chrono::Utc;
use tracing::info;

use crate::config::EligibilityConfig;
use crate::workflows::guarantee::DriverId;

use super::domain::{EligibilityCheck, EligibilityRecord, EligibilityStatus, MetricsUpdate};

/// Storage seam for eligibility records.
pub trait EligibilityStore: Send + Sync {
    fn fetch(&self, worker_id: DriverId) -> Result<Option<EligibilityRecord>, EligibilityStoreError>;
    fn upsert(&self, record: EligibilityRecord) -> Result<EligibilityRecord, EligibilityStoreError>;
}

#[derive(Debug, thiserror::Error)]
pub enum EligibilityStoreError {
    #[error("eligibility store unavailable: {0}")]
    Unavailable(String),
}

/// Evaluates the four independent checks gating guarantee protection:
/// weekly active hours, acceptance rate, cancellation rate, and account
/// standing. A worker with no record is eligible by default.
pub struct EligibilityEvaluator<S> {
    store: Arc<S>,
    config: EligibilityConfig,
}

impl<S> EligibilityEvaluator<S>
where
    S: EligibilityStore + 'static,
{
    pub fn new(store: Arc<S>, config: EligibilityConfig) -> Self {
        Self { store, config }
    }

    pub fn is_eligible(&self, worker_id: DriverId) -> Result<bool, EligibilityStoreError> {
        Ok(self.status(worker_id)?.is_eligible)
    }

    pub fn status(&self, worker_id: DriverId) -> Result<EligibilityStatus, EligibilityStoreError> {
        match self.store.fetch(worker_id)? {
            None => Ok(EligibilityStatus::default_allow(worker_id)),
            Some(record) => Ok(evaluate(&record, &self.config)),
        }
    }

    /// Overwrite the rolling metrics, preserving the account flag.
    pub fn update_metrics(
        &self,
        worker_id: DriverId,
        update: MetricsUpdate,
    ) -> Result<EligibilityRecord, EligibilityStoreError> {
        let mut record = self
            .store
            .fetch(worker_id)?
            .unwrap_or_else(|| EligibilityRecord::fresh(worker_id, Utc::now()));
        record.active_hours_week = update.active_hours_week;
        record.acceptance_rate = update.acceptance_rate;
        record.cancellation_rate = update.cancellation_rate;
        record.last_updated = Utc::now();
        self.store.upsert(record)
    }

    /// Suspension flips only the account flag; the other metrics are left
    /// as they were so reactivation restores the prior standing.
    pub fn suspend(&self, worker_id: DriverId) -> Result<EligibilityRecord, EligibilityStoreError> {
        self.set_account_active(worker_id, false)
    }

    pub fn reactivate(
        &self,
        worker_id: DriverId,
    ) -> Result<EligibilityRecord, EligibilityStoreError> {
        self.set_account_active(worker_id, true)
    }

    fn set_account_active(
        &self,
        worker_id: DriverId,
        active: bool,
    ) -> Result<EligibilityRecord, EligibilityStoreError> {
        let mut record = self
            .store
            .fetch(worker_id)?
            .unwrap_or_else(|| EligibilityRecord::fresh(worker_id, Utc::now()));
        record.account_active = active;
        record.last_updated = Utc::now();
        let stored = self.store.upsert(record)?;
        info!(
            worker = worker_id.0,
            active, "eligibility account flag updated"
        );
        Ok(stored)
    }
}

/// Pure evaluation of a record against the configured thresholds. All
/// four checks must pass; the reason lists every failing check.
pub fn evaluate(record: &EligibilityRecord, config: &EligibilityConfig) -> EligibilityStatus {
    let checks = vec![
        EligibilityCheck {
            name: "active_hours",
            met: record.active_hours_week >= config.min_active_hours_per_week,
            value: format!("{:.1}", record.active_hours_week),
            requirement: format!(">= {:.1} hours/week", config.min_active_hours_per_week),
        },
        EligibilityCheck {
            name: "acceptance_rate",
            met: record.acceptance_rate >= config.min_acceptance_rate,
            value: format!("{:.1}%", record.acceptance_rate * 100.0),
            requirement: format!(">= {:.1}%", config.min_acceptance_rate * 100.0),
        },
        EligibilityCheck {
            name: "cancellation_rate",
            met: record.cancellation_rate <= config.max_cancellation_rate,
            value: format!("{:.1}%", record.cancellation_rate * 100.0),
            requirement: format!("<= {:.1}%", config.max_cancellation_rate * 100.0),
        },
        EligibilityCheck {
            name: "account_status",
            met: record.account_active,
            value: if record.account_active {
                "active".to_string()
            } else {
                "suspended".to_string()
            },
            requirement: "active".to_string(),
        },
    ];

    let failed_checks: Vec<&'static str> = checks
        .iter()
        .filter(|check| !check.met)
        .map(|check| check.name)
        .collect();
    let is_eligible = failed_checks.is_empty();
    let reason = if is_eligible {
        "all checks passed".to_string()
    } else {
        format!("failed checks: {}", failed_checks.join(", "))
    };

    EligibilityStatus {
        worker_id: record.worker_id,
        is_eligible,
        checks,
        failed_checks,
        reason,
    }
}
