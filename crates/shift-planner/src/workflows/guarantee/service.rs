use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use chrono::Utc;
use tracing::{debug, info};

use crate::config::GuaranteeConfig;

use super::domain::{
    round_to_cents, CommittedShift, DriverId, FinancialSnapshot, GuaranteeEvent, GuaranteeLogEntry,
    ShiftId, ShiftRecommendation, ShiftStatus,
};
use super::intake::{CommitmentGuard, CommitmentViolation};
use super::report::views::{
    AccuracyReport, GuaranteeSummary, PerformanceReport, VolatilityComparison,
};
use super::report::{accuracy_report, guarantee_summary, performance_report, volatility_comparison};
use super::repository::{DirectoryError, DriverDirectory, GuaranteeRepository, RepositoryError};

static SHIFT_SEQUENCE: AtomicU64 = AtomicU64::new(1);
static LOG_SEQUENCE: AtomicU64 = AtomicU64::new(1);

fn next_shift_id() -> ShiftId {
    ShiftId(SHIFT_SEQUENCE.fetch_add(1, Ordering::Relaxed))
}

fn next_log_id() -> u64 {
    LOG_SEQUENCE.fetch_add(1, Ordering::Relaxed)
}

/// Owner of the committed-shift lifecycle and the guarantee-calculation
/// contract: commitment, earnings recording, top-up resolution, audit
/// logging, and the read-only reports derived from them.
pub struct IncomeGuaranteeService<R, D> {
    repository: Arc<R>,
    directory: Arc<D>,
    guard: CommitmentGuard,
    config: GuaranteeConfig,
}

impl<R, D> IncomeGuaranteeService<R, D>
where
    R: GuaranteeRepository + 'static,
    D: DriverDirectory + 'static,
{
    pub fn new(repository: Arc<R>, directory: Arc<D>, config: GuaranteeConfig) -> Self {
        Self {
            repository,
            directory,
            guard: CommitmentGuard::from_config(&config),
            config,
        }
    }

    pub fn config(&self) -> &GuaranteeConfig {
        &self.config
    }

    /// Commit a driver to a recommended shift. The guaranteed minimum is
    /// computed here, from the threshold in effect right now, and frozen.
    pub fn commit(
        &self,
        driver_id: DriverId,
        recommendation: ShiftRecommendation,
    ) -> Result<CommittedShift, GuaranteeServiceError> {
        let driver = self
            .directory
            .find_driver(driver_id)?
            .ok_or(GuaranteeServiceError::DriverNotFound(driver_id))?;
        if !driver.active {
            return Err(GuaranteeServiceError::DriverSuspended(driver_id));
        }

        let recommendation = self.guard.sanitize(recommendation)?;
        let shift = CommittedShift::from_recommendation(
            next_shift_id(),
            driver_id,
            recommendation,
            self.config.threshold,
            Utc::now(),
        );
        let stored = self.repository.insert_shift(shift)?;

        self.append_log(
            &stored,
            GuaranteeEvent::Commitment,
            format!(
                "driver committed to {} at {}; predicted {:.2}, guaranteed minimum {:.2}",
                stored.shift_type,
                stored.location_name,
                stored.predicted_earnings,
                stored.guaranteed_minimum
            ),
            Some(snapshot_of(&stored)),
            Some(stored.guarantee_eligible),
        )?;

        info!(
            shift = stored.id.0,
            driver = driver_id.0,
            predicted = stored.predicted_earnings,
            guaranteed_minimum = stored.guaranteed_minimum,
            "shift committed"
        );
        Ok(stored)
    }

    /// Mark a committed shift as underway.
    pub fn start(
        &self,
        shift_id: ShiftId,
        driver_id: DriverId,
    ) -> Result<CommittedShift, GuaranteeServiceError> {
        let mut shift = self.owned_shift(shift_id, driver_id)?;
        if shift.status != ShiftStatus::Committed {
            return Err(GuaranteeServiceError::InvalidTransition {
                from: shift.status,
                action: "start",
            });
        }

        shift.status = ShiftStatus::InProgress;
        shift.started_at = Some(Utc::now());
        self.repository.update_shift(shift.clone())?;

        debug!(shift = shift.id.0, driver = driver_id.0, "shift started");
        Ok(shift)
    }

    /// Record actual earnings after a shift ends. Resolves the guarantee:
    /// the top-up and activation flag are computed exactly once, here.
    pub fn record_actual_earnings(
        &self,
        shift_id: ShiftId,
        driver_id: DriverId,
        actual_earnings: f64,
    ) -> Result<CommittedShift, GuaranteeServiceError> {
        if !actual_earnings.is_finite() || actual_earnings < 0.0 {
            return Err(GuaranteeServiceError::InvalidEarnings {
                found: actual_earnings,
            });
        }

        let mut shift = self.owned_shift(shift_id, driver_id)?;
        if !shift.status.accepts_earnings() {
            return Err(GuaranteeServiceError::InvalidTransition {
                from: shift.status,
                action: "record earnings",
            });
        }

        shift.settle(actual_earnings, Utc::now());
        self.repository.update_shift(shift.clone())?;

        self.append_log(
            &shift,
            GuaranteeEvent::EarningsRecorded,
            format!(
                "actual earnings {:.2} recorded against guaranteed minimum {:.2}",
                shift.actual_earnings.unwrap_or(0.0),
                shift.guaranteed_minimum
            ),
            Some(snapshot_of(&shift)),
            Some(shift.guarantee_eligible),
        )?;

        if shift.guarantee_activated == Some(true) {
            let topup = shift.topup_amount.unwrap_or(0.0);
            self.append_log(
                &shift,
                GuaranteeEvent::GuaranteeActivated,
                format!(
                    "income guarantee activated; top-up {:.2} raises earnings to {:.2}",
                    topup,
                    shift.earnings_with_guarantee().unwrap_or(0.0)
                ),
                Some(snapshot_of(&shift)),
                Some(shift.guarantee_eligible),
            )?;
            info!(
                shift = shift.id.0,
                driver = driver_id.0,
                topup,
                "guarantee activated"
            );
        }

        Ok(shift)
    }

    /// Cancel a shift before it starts. Only plain `committed` shifts can
    /// be cancelled; anything further along is refused.
    pub fn cancel(
        &self,
        shift_id: ShiftId,
        driver_id: DriverId,
    ) -> Result<CommittedShift, GuaranteeServiceError> {
        let mut shift = self.owned_shift(shift_id, driver_id)?;
        if shift.status != ShiftStatus::Committed {
            return Err(GuaranteeServiceError::InvalidTransition {
                from: shift.status,
                action: "cancel",
            });
        }

        shift.status = ShiftStatus::Cancelled;
        shift.cancelled_at = Some(Utc::now());
        self.repository.update_shift(shift.clone())?;

        // Cancellations carry no financial snapshot: nothing was settled.
        self.append_log(
            &shift,
            GuaranteeEvent::Cancellation,
            format!("driver cancelled shift at {}", shift.location_name),
            None,
            None,
        )?;

        info!(shift = shift.id.0, driver = driver_id.0, "shift cancelled");
        Ok(shift)
    }

    pub fn summary(&self, driver_id: DriverId) -> Result<GuaranteeSummary, GuaranteeServiceError> {
        let shifts = self.repository.shifts_for_driver(driver_id)?;
        Ok(guarantee_summary(
            driver_id,
            &shifts,
            self.config.threshold,
        ))
    }

    pub fn shifts(
        &self,
        driver_id: DriverId,
        status: Option<ShiftStatus>,
    ) -> Result<Vec<CommittedShift>, GuaranteeServiceError> {
        let mut shifts = self.repository.shifts_for_driver(driver_id)?;
        if let Some(status) = status {
            shifts.retain(|s| s.status == status);
        }
        Ok(shifts)
    }

    pub fn volatility(
        &self,
        driver_id: DriverId,
    ) -> Result<VolatilityComparison, GuaranteeServiceError> {
        let shifts = self.repository.shifts_for_driver(driver_id)?;
        Ok(volatility_comparison(driver_id, &shifts))
    }

    pub fn performance(
        &self,
        driver_id: DriverId,
    ) -> Result<PerformanceReport, GuaranteeServiceError> {
        let shifts = self.repository.shifts_for_driver(driver_id)?;
        Ok(performance_report(driver_id, &shifts))
    }

    pub fn accuracy(&self, driver_id: DriverId) -> Result<AccuracyReport, GuaranteeServiceError> {
        let shifts = self.repository.shifts_for_driver(driver_id)?;
        Ok(accuracy_report(driver_id, &shifts))
    }

    pub fn history(
        &self,
        driver_id: DriverId,
        limit: usize,
    ) -> Result<Vec<GuaranteeLogEntry>, GuaranteeServiceError> {
        Ok(self.repository.logs_for_driver(driver_id, limit)?)
    }

    fn owned_shift(
        &self,
        shift_id: ShiftId,
        driver_id: DriverId,
    ) -> Result<CommittedShift, GuaranteeServiceError> {
        let shift = self
            .repository
            .fetch_shift(shift_id)?
            .ok_or(GuaranteeServiceError::ShiftNotFound(shift_id))?;
        if shift.driver_id != driver_id {
            // Ownership mismatch reads as "not found" so shift ids cannot
            // be probed across drivers.
            return Err(GuaranteeServiceError::ShiftNotFound(shift_id));
        }
        Ok(shift)
    }

    fn append_log(
        &self,
        shift: &CommittedShift,
        event: GuaranteeEvent,
        description: String,
        snapshot: Option<FinancialSnapshot>,
        was_eligible: Option<bool>,
    ) -> Result<(), GuaranteeServiceError> {
        self.repository.append_log(GuaranteeLogEntry {
            id: next_log_id(),
            shift_id: shift.id,
            driver_id: shift.driver_id,
            event,
            description,
            snapshot,
            was_eligible,
            recorded_at: Utc::now(),
        })?;
        Ok(())
    }
}

fn snapshot_of(shift: &CommittedShift) -> FinancialSnapshot {
    FinancialSnapshot {
        predicted_earnings: round_to_cents(shift.predicted_earnings),
        actual_earnings: shift.actual_earnings,
        guaranteed_minimum: shift.guaranteed_minimum,
        topup_amount: shift.topup_amount,
        guarantee_threshold: shift.guarantee_threshold,
    }
}

/// Error raised by the guarantee engine.
#[derive(Debug, thiserror::Error)]
pub enum GuaranteeServiceError {
    #[error(transparent)]
    Commitment(#[from] CommitmentViolation),
    #[error(transparent)]
    Repository(#[from] RepositoryError),
    #[error(transparent)]
    Directory(#[from] DirectoryError),
    #[error("driver {0} not found")]
    DriverNotFound(DriverId),
    #[error("shift {0} not found")]
    ShiftNotFound(ShiftId),
    #[error("driver {0} is suspended")]
    DriverSuspended(DriverId),
    #[error("cannot {action} a shift in status '{}'", from.label())]
    InvalidTransition {
        from: ShiftStatus,
        action: &'static str,
    },
    #[error("actual earnings must be a finite amount >= 0 (found {found})")]
    InvalidEarnings { found: f64 },
}
