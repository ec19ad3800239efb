use crate::infra::{InMemoryGuaranteeRepository, InMemoryWorkerRepository};
use chrono::Utc;
use clap::Args;
use std::sync::Arc;

use shift_planner::config::GuaranteeConfig;
use shift_planner::error::AppError;
use shift_planner::workflows::guarantee::{
    AccuracyReport, IncomeGuaranteeService, VolatilityComparison,
};
use shift_planner::workflows::recommendations::ShiftRecommender;
use shift_planner::workflows::workers::{RegisterWorker, WorkerRole, WorkerService};

#[derive(Args, Debug, Default)]
pub(crate) struct DemoArgs {
    /// Number of recommended shifts to commit and settle
    #[arg(long, default_value_t = 5)]
    pub(crate) shifts: usize,
}

/// Fraction of predicted earnings actually banked per settled shift; the
/// dips below 0.9 are what trip the guarantee.
const ACTUAL_RATIOS: [f64; 5] = [0.72, 0.95, 1.1, 0.85, 1.02];

pub(crate) fn run_demo(args: DemoArgs) -> Result<(), AppError> {
    let ledger = Arc::new(InMemoryGuaranteeRepository::default());
    let workers = Arc::new(InMemoryWorkerRepository::default());
    let worker_service = WorkerService::new(workers.clone());
    let guarantee_service =
        IncomeGuaranteeService::new(ledger, workers, GuaranteeConfig::default());

    let driver = worker_service.register(RegisterWorker {
        name: "Demo Driver".to_string(),
        email: "demo.driver@example.com".to_string(),
        role: WorkerRole::Driver,
    })?;
    println!("registered driver #{} ({})", driver.id.0, driver.name);

    let count = args.shifts.max(1);
    let recommendations = ShiftRecommender::with_limit(count).recommend(Utc::now().date_naive());
    println!("\ntop {} recommended shifts:", recommendations.len());
    for rec in &recommendations {
        println!(
            "  {:<28} {:<20} predicted {:>8.2}  demand {:>3.0}",
            rec.location_name,
            rec.shift_type,
            rec.predicted_earnings,
            rec.demand_score.unwrap_or(0.0),
        );
    }

    println!("\ncommitting and settling:");
    for (index, recommendation) in recommendations.into_iter().enumerate() {
        let predicted = recommendation.predicted_earnings;
        let shift = guarantee_service.commit(driver.id, recommendation)?;
        let ratio = ACTUAL_RATIOS[index % ACTUAL_RATIOS.len()];
        let settled =
            guarantee_service.record_actual_earnings(shift.id, driver.id, predicted * ratio)?;
        println!(
            "  shift #{:<4} predicted {:>8.2}  floor {:>8.2}  actual {:>8.2}  top-up {:>6.2}{}",
            settled.id.0,
            settled.predicted_earnings,
            settled.guaranteed_minimum,
            settled.actual_earnings.unwrap_or(0.0),
            settled.topup_amount.unwrap_or(0.0),
            if settled.guarantee_activated == Some(true) {
                "  <- guarantee activated"
            } else {
                ""
            },
        );
    }

    let summary = guarantee_service.summary(driver.id)?;
    println!("\nguarantee summary:");
    println!("  completed shifts        {}", summary.counts.completed);
    println!(
        "  predicted / actual      {:.2} / {:.2}",
        summary.total_predicted_earnings, summary.total_actual_earnings
    );
    println!("  total top-ups paid      {:.2}", summary.total_topup_paid);
    println!(
        "  activation rate         {:.1}%",
        summary.guarantee_activation_rate
    );
    println!(
        "  earnings accuracy       {:.1}%",
        summary.earnings_accuracy_pct
    );

    match guarantee_service.volatility(driver.id)? {
        VolatilityComparison::Ready(report) => {
            println!("\nvolatility with vs. without the guarantee:");
            println!(
                "  std dev                 {:.2} -> {:.2}",
                report.without_guarantee.std_dev, report.with_guarantee.std_dev
            );
            println!(
                "  coefficient of var.     {:.2}% -> {:.2}%",
                report.without_guarantee.coefficient_of_variation,
                report.with_guarantee.coefficient_of_variation
            );
            println!(
                "  earnings floor          {:.2} -> {:.2}",
                report.impact.earnings_floor_without, report.impact.earnings_floor_with
            );
            println!(
                "  volatility reduction    {:.1}%",
                report.impact.volatility_reduction_pct
            );
        }
        VolatilityComparison::InsufficientData {
            completed_shifts,
            required,
            ..
        } => {
            println!(
                "\nvolatility: insufficient data ({completed_shifts} completed, {required} required)"
            );
        }
    }

    match guarantee_service.accuracy(driver.id)? {
        AccuracyReport::Ready {
            metrics,
            accuracy_label,
            ..
        } => {
            println!("\nprediction accuracy: {accuracy_label}");
            println!(
                "  MAE {:.2}  MAPE {:.2}%  RMSE {:.2}  R^2 {:.3}",
                metrics.mae, metrics.mape, metrics.rmse, metrics.r_squared
            );
        }
        AccuracyReport::InsufficientData { .. } => {
            println!("\nprediction accuracy: insufficient data");
        }
    }

    let history = guarantee_service.history(driver.id, 100)?;
    println!("\naudit trail ({} entries, newest first):", history.len());
    for entry in history {
        println!(
            "  [{}] shift #{:<4} {}",
            entry.event.label(),
            entry.shift_id.0,
            entry.description
        );
    }

    Ok(())
}
