//! Pure statistical analyzers shared by the reporting endpoints.

pub mod accuracy;
pub mod volatility;

pub use accuracy::{AccuracyLevel, AccuracyMetrics};
pub use volatility::{EarningsStatistics, Quartiles};

/// Round a monetary or percentage figure to two decimal places at the
/// point of computation, so stored snapshots stay reproducible.
pub(crate) fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

pub(crate) fn round3(value: f64) -> f64 {
    (value * 1000.0).round() / 1000.0
}
