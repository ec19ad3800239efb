use super::{round2, round3};
use serde::Serialize;

/// Classification of prediction quality from MAPE.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum AccuracyLevel {
    Excellent,
    Good,
    Acceptable,
    Poor,
}

impl AccuracyLevel {
    const EXCELLENT_MAPE_MAX: f64 = 10.0;
    const GOOD_MAPE_MAX: f64 = 15.0;
    const ACCEPTABLE_MAPE_MAX: f64 = 20.0;

    pub fn from_mape(mape: f64) -> Self {
        if mape <= Self::EXCELLENT_MAPE_MAX {
            AccuracyLevel::Excellent
        } else if mape <= Self::GOOD_MAPE_MAX {
            AccuracyLevel::Good
        } else if mape <= Self::ACCEPTABLE_MAPE_MAX {
            AccuracyLevel::Acceptable
        } else {
            AccuracyLevel::Poor
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            AccuracyLevel::Excellent => "Excellent",
            AccuracyLevel::Good => "Good",
            AccuracyLevel::Acceptable => "Acceptable",
            AccuracyLevel::Poor => "Poor",
        }
    }
}

/// Regression-accuracy metrics over (predicted, actual) pairs.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AccuracyMetrics {
    pub mae: f64,
    pub mape: f64,
    pub rmse: f64,
    pub r_squared: f64,
    pub mean_prediction: f64,
    pub mean_actual: f64,
    pub sample_size: usize,
    pub level: AccuracyLevel,
}

impl AccuracyMetrics {
    /// `None` for an empty input; pairs with a zero actual are excluded
    /// from MAPE only (a percentage error against zero is undefined).
    pub fn from_pairs(pairs: &[(f64, f64)]) -> Option<Self> {
        if pairs.is_empty() {
            return None;
        }

        let n = pairs.len() as f64;
        let mae = pairs.iter().map(|(p, a)| (p - a).abs()).sum::<f64>() / n;

        let pct_errors: Vec<f64> = pairs
            .iter()
            .filter(|(_, a)| *a != 0.0)
            .map(|(p, a)| (p - a).abs() / a * 100.0)
            .collect();
        let mape = if pct_errors.is_empty() {
            0.0
        } else {
            pct_errors.iter().sum::<f64>() / pct_errors.len() as f64
        };

        let mse = pairs.iter().map(|(p, a)| (p - a).powi(2)).sum::<f64>() / n;
        let rmse = mse.sqrt();

        let mean_prediction = pairs.iter().map(|(p, _)| p).sum::<f64>() / n;
        let mean_actual = pairs.iter().map(|(_, a)| a).sum::<f64>() / n;

        // An R-squared below zero means "worse than predicting the mean";
        // report 0 in that case.
        let ss_res = pairs.iter().map(|(p, a)| (p - a).powi(2)).sum::<f64>();
        let ss_tot = pairs
            .iter()
            .map(|(_, a)| (a - mean_actual).powi(2))
            .sum::<f64>();
        let r_squared = if ss_tot > 0.0 {
            (1.0 - ss_res / ss_tot).clamp(0.0, 1.0)
        } else {
            0.0
        };

        Some(Self {
            mae: round2(mae),
            mape: round2(mape),
            rmse: round2(rmse),
            r_squared: round3(r_squared),
            mean_prediction: round2(mean_prediction),
            mean_actual: round2(mean_actual),
            sample_size: pairs.len(),
            level: AccuracyLevel::from_mape(mape),
        })
    }
}
