use super::round2;
use serde::Serialize;

/// Quartile cut points computed with the linear-interpolation method.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Quartiles {
    pub q1: f64,
    pub median: f64,
    pub q3: f64,
}

/// Dispersion profile of an earnings series.
///
/// Standard deviation is the population form; the coefficient of variation
/// is expressed as a percentage so series at different scales compare
/// directly.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EarningsStatistics {
    pub mean: f64,
    pub std_dev: f64,
    pub variance: f64,
    pub coefficient_of_variation: f64,
    pub min: f64,
    pub max: f64,
    pub range: f64,
    pub quartiles: Quartiles,
    pub iqr: f64,
    pub sample_size: usize,
}

impl EarningsStatistics {
    /// `None` for an empty series: no answer, not an error.
    pub fn from_series(values: &[f64]) -> Option<Self> {
        if values.is_empty() {
            return None;
        }

        let n = values.len() as f64;
        let mean = values.iter().sum::<f64>() / n;
        let variance = values.iter().map(|x| (x - mean).powi(2)).sum::<f64>() / n;
        let std_dev = variance.sqrt();
        let cv = if mean > 0.0 { std_dev / mean * 100.0 } else { 0.0 };

        let mut sorted = values.to_vec();
        sorted.sort_by(|a, b| a.partial_cmp(b).expect("earnings are finite"));
        let min = sorted[0];
        let max = sorted[sorted.len() - 1];

        let quartiles = Quartiles {
            q1: round2(percentile(&sorted, 25.0)),
            median: round2(percentile(&sorted, 50.0)),
            q3: round2(percentile(&sorted, 75.0)),
        };

        Some(Self {
            mean: round2(mean),
            std_dev: round2(std_dev),
            variance: round2(variance),
            coefficient_of_variation: round2(cv),
            min: round2(min),
            max: round2(max),
            range: round2(max - min),
            iqr: round2(quartiles.q3 - quartiles.q1),
            quartiles,
            sample_size: values.len(),
        })
    }
}

/// Linear-interpolation percentile over an already sorted slice.
fn percentile(sorted: &[f64], p: f64) -> f64 {
    let index = (p / 100.0) * (sorted.len() - 1) as f64;
    let lower = index.floor() as usize;
    let upper = lower + 1;
    if upper >= sorted.len() {
        return sorted[lower];
    }
    let weight = index - lower as f64;
    sorted[lower] * (1.0 - weight) + sorted[upper] * weight
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_series_has_no_statistics() {
        assert!(EarningsStatistics::from_series(&[]).is_none());
    }

    #[test]
    fn single_point_series_has_zero_dispersion() {
        let stats = EarningsStatistics::from_series(&[80.0]).expect("one point suffices");
        assert_eq!(stats.mean, 80.0);
        assert_eq!(stats.std_dev, 0.0);
        assert_eq!(stats.coefficient_of_variation, 0.0);
        assert_eq!(stats.range, 0.0);
        assert_eq!(stats.sample_size, 1);
    }

    #[test]
    fn computes_population_dispersion() {
        let stats =
            EarningsStatistics::from_series(&[10.0, 20.0, 30.0, 40.0]).expect("non-empty");
        assert_eq!(stats.mean, 25.0);
        assert_eq!(stats.variance, 125.0);
        assert_eq!(stats.std_dev, 11.18);
        assert_eq!(stats.coefficient_of_variation, 44.72);
        assert_eq!(stats.min, 10.0);
        assert_eq!(stats.max, 40.0);
        assert_eq!(stats.range, 30.0);
    }

    #[test]
    fn quartiles_use_linear_interpolation() {
        let stats =
            EarningsStatistics::from_series(&[10.0, 20.0, 30.0, 40.0]).expect("non-empty");
        assert_eq!(stats.quartiles.q1, 17.5);
        assert_eq!(stats.quartiles.median, 25.0);
        assert_eq!(stats.quartiles.q3, 32.5);
        assert_eq!(stats.iqr, 15.0);
    }

    #[test]
    fn zero_mean_series_guards_cv_division() {
        let stats = EarningsStatistics::from_series(&[0.0, 0.0]).expect("non-empty");
        assert_eq!(stats.coefficient_of_variation, 0.0);
    }
}
