use chrono::{DateTime, Utc};
use serde::Serialize;

use super::domain::{CommittedShift, DriverId, GuaranteeLogEntry, ShiftId, ShiftStatus};

/// Storage abstraction owned by the guarantee engine. The engine is the
/// sole writer of shifts and audit log rows; the API layer never touches
/// these tables directly.
pub trait GuaranteeRepository: Send + Sync {
    fn insert_shift(&self, shift: CommittedShift) -> Result<CommittedShift, RepositoryError>;
    fn update_shift(&self, shift: CommittedShift) -> Result<(), RepositoryError>;
    fn fetch_shift(&self, id: ShiftId) -> Result<Option<CommittedShift>, RepositoryError>;
    /// All shifts for a driver, newest commitment first.
    fn shifts_for_driver(&self, driver_id: DriverId)
        -> Result<Vec<CommittedShift>, RepositoryError>;
    /// Append-only: entries are never updated or deleted.
    fn append_log(&self, entry: GuaranteeLogEntry) -> Result<(), RepositoryError>;
    /// Audit entries for a driver, newest first, capped at `limit`.
    fn logs_for_driver(
        &self,
        driver_id: DriverId,
        limit: usize,
    ) -> Result<Vec<GuaranteeLogEntry>, RepositoryError>;
}

/// Error enumeration for repository failures.
#[derive(Debug, thiserror::Error)]
pub enum RepositoryError {
    #[error("record already exists")]
    Conflict,
    #[error("record not found")]
    NotFound,
    #[error("repository unavailable: {0}")]
    Unavailable(String),
}

/// A driver account as seen by the guarantee engine. The worker registry
/// owns the full record; this seam only answers existence and standing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DriverAccount {
    pub id: DriverId,
    pub active: bool,
}

/// Lookup seam into the worker registry.
pub trait DriverDirectory: Send + Sync {
    fn find_driver(&self, id: DriverId) -> Result<Option<DriverAccount>, DirectoryError>;
}

#[derive(Debug, thiserror::Error)]
pub enum DirectoryError {
    #[error("driver directory unavailable: {0}")]
    Unavailable(String),
}

/// Serializable representation of a committed shift for API responses.
#[derive(Debug, Clone, Serialize)]
pub struct CommittedShiftView {
    pub id: ShiftId,
    pub driver_id: DriverId,
    pub location_name: String,
    pub region: Option<String>,
    pub zone: Option<String>,
    pub shift_type: String,
    pub day_name: Option<String>,
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
    pub duration_hours: f64,
    pub predicted_earnings: f64,
    pub actual_earnings: Option<f64>,
    pub guaranteed_minimum: f64,
    pub topup_amount: Option<f64>,
    pub guarantee_eligible: bool,
    pub guarantee_activated: Option<bool>,
    pub status: &'static str,
    pub demand_score: Option<f64>,
    pub committed_at: DateTime<Utc>,
    pub completed_at: Option<DateTime<Utc>>,
    pub cancelled_at: Option<DateTime<Utc>>,
}

impl CommittedShift {
    pub fn to_view(&self) -> CommittedShiftView {
        CommittedShiftView {
            id: self.id,
            driver_id: self.driver_id,
            location_name: self.location_name.clone(),
            region: self.region.clone(),
            zone: self.zone.clone(),
            shift_type: self.shift_type.clone(),
            day_name: self.day_name.clone(),
            start_time: self.start_time,
            end_time: self.end_time,
            duration_hours: self.duration_hours(),
            predicted_earnings: self.predicted_earnings,
            actual_earnings: self.actual_earnings,
            guaranteed_minimum: self.guaranteed_minimum,
            topup_amount: self.topup_amount,
            guarantee_eligible: self.guarantee_eligible,
            guarantee_activated: self.guarantee_activated,
            status: self.status.label(),
            demand_score: self.demand_score,
            committed_at: self.committed_at,
            completed_at: self.completed_at,
            cancelled_at: self.cancelled_at,
        }
    }
}

/// Serializable audit log row.
#[derive(Debug, Clone, Serialize)]
pub struct GuaranteeLogView {
    pub id: u64,
    pub shift_id: ShiftId,
    pub event_type: &'static str,
    pub description: String,
    pub predicted_earnings: Option<f64>,
    pub actual_earnings: Option<f64>,
    pub guaranteed_minimum: Option<f64>,
    pub topup_amount: Option<f64>,
    pub was_eligible: Option<bool>,
    pub recorded_at: DateTime<Utc>,
}

impl GuaranteeLogEntry {
    pub fn to_view(&self) -> GuaranteeLogView {
        GuaranteeLogView {
            id: self.id,
            shift_id: self.shift_id,
            event_type: self.event.label(),
            description: self.description.clone(),
            predicted_earnings: self.snapshot.map(|s| s.predicted_earnings),
            actual_earnings: self.snapshot.and_then(|s| s.actual_earnings),
            guaranteed_minimum: self.snapshot.map(|s| s.guaranteed_minimum),
            topup_amount: self.snapshot.and_then(|s| s.topup_amount),
            was_eligible: self.was_eligible,
            recorded_at: self.recorded_at,
        }
    }
}

/// Count shifts for a driver grouped by lifecycle status.
pub fn count_by_status(shifts: &[CommittedShift]) -> StatusCounts {
    let mut counts = StatusCounts::default();
    for shift in shifts {
        match shift.status {
            ShiftStatus::Committed => counts.committed += 1,
            ShiftStatus::InProgress => counts.in_progress += 1,
            ShiftStatus::Completed => counts.completed += 1,
            ShiftStatus::Cancelled => counts.cancelled += 1,
        }
    }
    counts
}

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct StatusCounts {
    pub committed: usize,
    pub in_progress: usize,
    pub completed: usize,
    pub cancelled: usize,
}
