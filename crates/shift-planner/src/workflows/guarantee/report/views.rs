use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::workflows::analytics::{AccuracyMetrics, EarningsStatistics};

use super::super::domain::DriverId;
use super::super::repository::{CommittedShiftView, StatusCounts};

/// Aggregate guarantee position for one driver. Monetary totals cover
/// completed shifts only; a driver with no shifts gets the zeroed shape.
#[derive(Debug, Clone, Serialize)]
pub struct GuaranteeSummary {
    pub driver_id: DriverId,
    pub counts: StatusCounts,
    pub total_predicted_earnings: f64,
    pub total_actual_earnings: f64,
    pub total_guaranteed_minimum: f64,
    pub total_topup_paid: f64,
    pub guarantee_activations: usize,
    /// Share of completed shifts that needed a top-up, in percent.
    pub guarantee_activation_rate: f64,
    pub avg_predicted_per_shift: f64,
    pub avg_actual_per_shift: f64,
    /// Actual over predicted, in percent.
    pub earnings_accuracy_pct: f64,
    /// Top-ups relative to raw earnings, in percent.
    pub income_improvement_pct: f64,
    pub guarantee_threshold_pct: f64,
    pub shifts: Vec<CommittedShiftView>,
}

/// Volatility comparison output; dispersion needs at least two completed
/// shifts, so the thin case is an explicit variant rather than an error.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum VolatilityComparison {
    InsufficientData {
        driver_id: DriverId,
        completed_shifts: usize,
        required: usize,
    },
    Ready(VolatilityReport),
}

#[derive(Debug, Clone, Serialize)]
pub struct VolatilityReport {
    pub driver_id: DriverId,
    pub sample_size: usize,
    pub without_guarantee: EarningsStatistics,
    pub with_guarantee: EarningsStatistics,
    pub impact: GuaranteeImpact,
}

#[derive(Debug, Clone, Serialize)]
pub struct GuaranteeImpact {
    pub volatility_reduction_pct: f64,
    pub cv_reduction_pct: f64,
    pub earnings_floor_without: f64,
    pub earnings_floor_with: f64,
    pub total_topup_paid: f64,
}

/// Earnings trend and per-location/per-shift-type breakdowns over
/// completed shifts, ordered chronologically.
#[derive(Debug, Clone, Serialize)]
pub struct PerformanceReport {
    pub driver_id: DriverId,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub period: Option<ReportPeriod>,
    pub earnings: EarningsOverview,
    pub trend: Vec<TrendPoint>,
    pub best_locations: Vec<LocationPerformance>,
    pub best_shift_types: Vec<ShiftTypePerformance>,
}

#[derive(Debug, Clone, Serialize)]
pub struct ReportPeriod {
    pub from: DateTime<Utc>,
    pub to: DateTime<Utc>,
    pub total_shifts: usize,
    pub total_hours: f64,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct EarningsOverview {
    pub total_actual: f64,
    pub total_topups: f64,
    pub total_with_guarantee: f64,
    pub avg_per_shift: f64,
    pub avg_hourly: f64,
    pub income_boost_pct: f64,
}

#[derive(Debug, Clone, Serialize)]
pub struct TrendPoint {
    pub date: DateTime<Utc>,
    pub day: String,
    pub location: String,
    pub shift_type: String,
    pub predicted: f64,
    pub actual: f64,
    pub topup: f64,
    pub total_with_guarantee: f64,
    pub hours: f64,
    pub hourly_rate: Option<f64>,
}

#[derive(Debug, Clone, Serialize)]
pub struct LocationPerformance {
    pub location: String,
    pub avg_earnings: f64,
    pub total_earnings: f64,
    pub shifts_worked: usize,
    pub total_hours: f64,
    pub avg_hourly: f64,
}

#[derive(Debug, Clone, Serialize)]
pub struct ShiftTypePerformance {
    pub shift_type: String,
    pub avg_earnings: f64,
    pub total_earnings: f64,
    pub shifts_worked: usize,
}

/// Prediction accuracy over a driver's completed shifts.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum AccuracyReport {
    InsufficientData {
        driver_id: DriverId,
        completed_shifts: usize,
    },
    Ready {
        driver_id: DriverId,
        metrics: AccuracyMetrics,
        accuracy_label: &'static str,
    },
}
