//! Read-only aggregation over a driver's committed shifts.
//!
//! These are pure functions; the service fetches the rows and hands them
//! over, so the shapes stay testable without a repository.

pub mod views;

use std::collections::BTreeMap;

use crate::workflows::analytics::{AccuracyMetrics, EarningsStatistics};

use super::domain::{round_to_cents, CommittedShift, DriverId, ShiftStatus};
use super::repository::count_by_status;
use views::{
    AccuracyReport, EarningsOverview, GuaranteeImpact, GuaranteeSummary, LocationPerformance,
    PerformanceReport, ReportPeriod, ShiftTypePerformance, TrendPoint, VolatilityComparison,
    VolatilityReport,
};

const MIN_SHIFTS_FOR_VOLATILITY: usize = 2;

fn round_pct(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

fn completed_chronological(shifts: &[CommittedShift]) -> Vec<&CommittedShift> {
    let mut completed: Vec<&CommittedShift> = shifts
        .iter()
        .filter(|s| s.status == ShiftStatus::Completed)
        .collect();
    completed.sort_by_key(|s| s.start_time);
    completed
}

pub fn guarantee_summary(
    driver_id: DriverId,
    shifts: &[CommittedShift],
    threshold: f64,
) -> GuaranteeSummary {
    let counts = count_by_status(shifts);
    let completed: Vec<&CommittedShift> = shifts
        .iter()
        .filter(|s| s.status == ShiftStatus::Completed)
        .collect();

    let total_predicted: f64 = completed.iter().map(|s| s.predicted_earnings).sum();
    let total_actual: f64 = completed
        .iter()
        .filter_map(|s| s.actual_earnings)
        .sum();
    let total_guaranteed: f64 = completed.iter().map(|s| s.guaranteed_minimum).sum();
    let total_topup: f64 = completed
        .iter()
        .filter_map(|s| s.topup_amount)
        .sum();
    let activations = completed
        .iter()
        .filter(|s| s.guarantee_activated == Some(true))
        .count();

    let n = completed.len();
    let activation_rate = if n > 0 {
        activations as f64 / n as f64 * 100.0
    } else {
        0.0
    };
    let accuracy_pct = if total_predicted > 0.0 {
        total_actual / total_predicted * 100.0
    } else {
        0.0
    };
    let improvement_pct = if total_actual > 0.0 {
        total_topup / total_actual * 100.0
    } else {
        0.0
    };

    GuaranteeSummary {
        driver_id,
        counts,
        total_predicted_earnings: round_to_cents(total_predicted),
        total_actual_earnings: round_to_cents(total_actual),
        total_guaranteed_minimum: round_to_cents(total_guaranteed),
        total_topup_paid: round_to_cents(total_topup),
        guarantee_activations: activations,
        guarantee_activation_rate: round_pct(activation_rate),
        avg_predicted_per_shift: if n > 0 {
            round_to_cents(total_predicted / n as f64)
        } else {
            0.0
        },
        avg_actual_per_shift: if n > 0 {
            round_to_cents(total_actual / n as f64)
        } else {
            0.0
        },
        earnings_accuracy_pct: round_pct(accuracy_pct),
        income_improvement_pct: round_pct(improvement_pct),
        guarantee_threshold_pct: round_pct(threshold * 100.0),
        shifts: shifts.iter().map(CommittedShift::to_view).collect(),
    }
}

/// Dispersion of raw earnings vs. earnings after top-ups. Top-ups only
/// raise values that fall below the floor, so the guaranteed series can
/// never be more volatile than the raw one.
pub fn volatility_comparison(driver_id: DriverId, shifts: &[CommittedShift]) -> VolatilityComparison {
    let completed = completed_chronological(shifts);
    if completed.len() < MIN_SHIFTS_FOR_VOLATILITY {
        return VolatilityComparison::InsufficientData {
            driver_id,
            completed_shifts: completed.len(),
            required: MIN_SHIFTS_FOR_VOLATILITY,
        };
    }

    let raw: Vec<f64> = completed
        .iter()
        .map(|s| s.actual_earnings.unwrap_or(0.0))
        .collect();
    let guaranteed: Vec<f64> = completed
        .iter()
        .map(|s| s.earnings_with_guarantee().unwrap_or(0.0))
        .collect();

    let without = EarningsStatistics::from_series(&raw).expect("two or more points");
    let with = EarningsStatistics::from_series(&guaranteed).expect("two or more points");

    let volatility_reduction = if without.std_dev > 0.0 {
        (without.std_dev - with.std_dev) / without.std_dev * 100.0
    } else {
        0.0
    };
    let cv_reduction = if without.coefficient_of_variation > 0.0 {
        (without.coefficient_of_variation - with.coefficient_of_variation)
            / without.coefficient_of_variation
            * 100.0
    } else {
        0.0
    };
    let total_topup: f64 = completed.iter().filter_map(|s| s.topup_amount).sum();

    VolatilityComparison::Ready(VolatilityReport {
        driver_id,
        sample_size: completed.len(),
        impact: GuaranteeImpact {
            volatility_reduction_pct: round_pct(volatility_reduction),
            cv_reduction_pct: round_pct(cv_reduction),
            earnings_floor_without: without.min,
            earnings_floor_with: with.min,
            total_topup_paid: round_to_cents(total_topup),
        },
        without_guarantee: without,
        with_guarantee: with,
    })
}

pub fn performance_report(driver_id: DriverId, shifts: &[CommittedShift]) -> PerformanceReport {
    let completed = completed_chronological(shifts);
    if completed.is_empty() {
        return PerformanceReport {
            driver_id,
            period: None,
            earnings: EarningsOverview::default(),
            trend: Vec::new(),
            best_locations: Vec::new(),
            best_shift_types: Vec::new(),
        };
    }

    let trend: Vec<TrendPoint> = completed
        .iter()
        .map(|s| {
            let actual = s.actual_earnings.unwrap_or(0.0);
            let topup = s.topup_amount.unwrap_or(0.0);
            TrendPoint {
                date: s.start_time,
                day: s
                    .day_name
                    .clone()
                    .unwrap_or_else(|| s.start_time.format("%A").to_string()),
                location: s.location_name.clone(),
                shift_type: s.shift_type.clone(),
                predicted: s.predicted_earnings,
                actual,
                topup,
                total_with_guarantee: round_to_cents(actual + topup),
                hours: s.duration_hours(),
                hourly_rate: s.actual_hourly_rate(),
            }
        })
        .collect();

    #[derive(Default)]
    struct Bucket {
        total: f64,
        count: usize,
        hours: f64,
    }

    let mut by_location: BTreeMap<String, Bucket> = BTreeMap::new();
    let mut by_type: BTreeMap<String, Bucket> = BTreeMap::new();
    for s in &completed {
        let actual = s.actual_earnings.unwrap_or(0.0);
        let loc = by_location.entry(s.location_name.clone()).or_default();
        loc.total += actual;
        loc.count += 1;
        loc.hours += s.duration_hours();
        let ty = by_type.entry(s.shift_type.clone()).or_default();
        ty.total += actual;
        ty.count += 1;
    }

    let mut best_locations: Vec<LocationPerformance> = by_location
        .into_iter()
        .map(|(location, b)| LocationPerformance {
            location,
            avg_earnings: round_to_cents(b.total / b.count as f64),
            total_earnings: round_to_cents(b.total),
            shifts_worked: b.count,
            total_hours: (b.hours * 10.0).round() / 10.0,
            avg_hourly: if b.hours > 0.0 {
                round_to_cents(b.total / b.hours)
            } else {
                0.0
            },
        })
        .collect();
    best_locations.sort_by(|a, b| {
        b.avg_earnings
            .partial_cmp(&a.avg_earnings)
            .expect("earnings are finite")
    });

    let mut best_shift_types: Vec<ShiftTypePerformance> = by_type
        .into_iter()
        .map(|(shift_type, b)| ShiftTypePerformance {
            shift_type,
            avg_earnings: round_to_cents(b.total / b.count as f64),
            total_earnings: round_to_cents(b.total),
            shifts_worked: b.count,
        })
        .collect();
    best_shift_types.sort_by(|a, b| {
        b.avg_earnings
            .partial_cmp(&a.avg_earnings)
            .expect("earnings are finite")
    });

    let total_actual: f64 = completed.iter().filter_map(|s| s.actual_earnings).sum();
    let total_topups: f64 = completed.iter().filter_map(|s| s.topup_amount).sum();
    let total_hours: f64 = completed.iter().map(|s| s.duration_hours()).sum();

    PerformanceReport {
        driver_id,
        period: Some(ReportPeriod {
            from: completed[0].start_time,
            to: completed[completed.len() - 1].start_time,
            total_shifts: completed.len(),
            total_hours: (total_hours * 10.0).round() / 10.0,
        }),
        earnings: EarningsOverview {
            total_actual: round_to_cents(total_actual),
            total_topups: round_to_cents(total_topups),
            total_with_guarantee: round_to_cents(total_actual + total_topups),
            avg_per_shift: round_to_cents(total_actual / completed.len() as f64),
            avg_hourly: if total_hours > 0.0 {
                round_to_cents(total_actual / total_hours)
            } else {
                0.0
            },
            income_boost_pct: if total_actual > 0.0 {
                round_pct(total_topups / total_actual * 100.0)
            } else {
                0.0
            },
        },
        trend,
        best_locations,
        best_shift_types,
    }
}

pub fn accuracy_report(driver_id: DriverId, shifts: &[CommittedShift]) -> AccuracyReport {
    let pairs: Vec<(f64, f64)> = completed_chronological(shifts)
        .iter()
        .filter_map(|s| s.actual_earnings.map(|a| (s.predicted_earnings, a)))
        .collect();

    match AccuracyMetrics::from_pairs(&pairs) {
        Some(metrics) => AccuracyReport::Ready {
            driver_id,
            accuracy_label: metrics.level.label(),
            metrics,
        },
        None => AccuracyReport::InsufficientData {
            driver_id,
            completed_shifts: pairs.len(),
        },
    }
}
