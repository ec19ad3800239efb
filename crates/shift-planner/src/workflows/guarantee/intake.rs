use crate::config::GuaranteeConfig;

use super::domain::ShiftRecommendation;

/// Validation errors raised when a commitment request is malformed.
#[derive(Debug, thiserror::Error)]
pub enum CommitmentViolation {
    #[error("predicted earnings must be a finite amount >= 0 (found {found})")]
    InvalidPredictedEarnings { found: f64 },
    #[error("shift window must end after it starts")]
    InvalidWindow,
    #[error("location name must not be blank")]
    BlankLocation,
    #[error("shift type must not be blank")]
    BlankShiftType,
}

/// Guard producing sanitized commitments from inbound recommendations.
///
/// Shifts shorter than the configured minimum stay committable but lose
/// guarantee coverage rather than being rejected.
#[derive(Debug, Clone, Copy)]
pub struct CommitmentGuard {
    min_shift_hours: f64,
}

impl CommitmentGuard {
    pub fn from_config(config: &GuaranteeConfig) -> Self {
        Self {
            min_shift_hours: config.min_shift_hours,
        }
    }

    pub fn sanitize(
        &self,
        mut recommendation: ShiftRecommendation,
    ) -> Result<ShiftRecommendation, CommitmentViolation> {
        let predicted = recommendation.predicted_earnings;
        if !predicted.is_finite() || predicted < 0.0 {
            return Err(CommitmentViolation::InvalidPredictedEarnings { found: predicted });
        }

        if recommendation.end_time <= recommendation.start_time {
            return Err(CommitmentViolation::InvalidWindow);
        }

        recommendation.location_name = recommendation.location_name.trim().to_string();
        if recommendation.location_name.is_empty() {
            return Err(CommitmentViolation::BlankLocation);
        }

        recommendation.shift_type = recommendation.shift_type.trim().to_string();
        if recommendation.shift_type.is_empty() {
            return Err(CommitmentViolation::BlankShiftType);
        }

        if recommendation.duration_hours() < self.min_shift_hours {
            recommendation.guarantee_eligible = false;
        }

        Ok(recommendation)
    }
}
