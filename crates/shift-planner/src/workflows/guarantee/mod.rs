//! Income guarantee engine: committed-shift lifecycle, top-up resolution,
//! append-only audit logging, and the volatility/performance reports that
//! measure what the guarantee buys drivers.

pub mod domain;
pub(crate) mod intake;
pub mod report;
pub mod repository;
pub mod router;
pub mod service;

#[cfg(test)]
mod tests;

pub use domain::{
    round_to_cents, CommittedShift, DriverId, FinancialSnapshot, GuaranteeEvent, GuaranteeLogEntry,
    ShiftId, ShiftRecommendation, ShiftStatus,
};
pub use intake::CommitmentViolation;
pub use report::views::{
    AccuracyReport, GuaranteeSummary, PerformanceReport, VolatilityComparison, VolatilityReport,
};
pub use repository::{
    CommittedShiftView, DirectoryError, DriverAccount, DriverDirectory, GuaranteeLogView,
    GuaranteeRepository, RepositoryError, StatusCounts,
};
pub use router::{guarantee_router, GuaranteeRouterState};
pub use service::{GuaranteeServiceError, IncomeGuaranteeService};
