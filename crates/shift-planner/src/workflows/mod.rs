pub mod analytics;
pub mod eligibility;
pub mod guarantee;
pub mod recommendations;
pub mod workers;
