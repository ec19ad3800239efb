use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::workflows::guarantee::DriverId;

/// Rolling per-worker metrics backing the eligibility checks. Overwritten
/// in place on each refresh, not versioned.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EligibilityRecord {
    pub worker_id: DriverId,
    pub active_hours_week: f64,
    /// Fraction of offers accepted, 0..=1.
    pub acceptance_rate: f64,
    /// Fraction of shifts cancelled, 0..=1.
    pub cancellation_rate: f64,
    pub account_active: bool,
    pub last_updated: DateTime<Utc>,
}

impl EligibilityRecord {
    pub fn fresh(worker_id: DriverId, now: DateTime<Utc>) -> Self {
        Self {
            worker_id,
            active_hours_week: 0.0,
            acceptance_rate: 1.0,
            cancellation_rate: 0.0,
            account_active: true,
            last_updated: now,
        }
    }
}

/// Metrics update accepted over the API; the account flag is managed by
/// suspend/reactivate, never through this payload.
#[derive(Debug, Clone, Copy, Deserialize)]
pub struct MetricsUpdate {
    pub active_hours_week: f64,
    pub acceptance_rate: f64,
    pub cancellation_rate: f64,
}

/// Outcome of a single eligibility check.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EligibilityCheck {
    pub name: &'static str,
    pub met: bool,
    pub value: String,
    pub requirement: String,
}

/// Full eligibility verdict with per-check detail. `checks` is empty when
/// no record exists (the default-allow case).
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EligibilityStatus {
    pub worker_id: DriverId,
    pub is_eligible: bool,
    pub checks: Vec<EligibilityCheck>,
    pub failed_checks: Vec<&'static str>,
    pub reason: String,
}

impl EligibilityStatus {
    /// Default-allow: a worker without a record is eligible. This is a
    /// deliberate policy choice, surfaced as its own state rather than
    /// inferred from missing data.
    pub fn default_allow(worker_id: DriverId) -> Self {
        Self {
            worker_id,
            is_eligible: true,
            checks: Vec::new(),
            failed_checks: Vec::new(),
            reason: "no eligibility record on file; default eligible".to_string(),
        }
    }
}
