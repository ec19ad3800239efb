//! Guarantee eligibility: per-worker rolling metrics, the four-check
//! evaluation, and account suspension.

pub mod domain;
pub mod evaluator;
pub mod router;

pub use domain::{EligibilityCheck, EligibilityRecord, EligibilityStatus, MetricsUpdate};
pub use evaluator::{evaluate, EligibilityEvaluator, EligibilityStore, EligibilityStoreError};
pub use router::{eligibility_router, EligibilityRouterState};
