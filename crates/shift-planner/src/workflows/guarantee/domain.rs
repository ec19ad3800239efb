use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Identifier wrapper for driver accounts (users table).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct DriverId(pub u64);

impl std::fmt::Display for DriverId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Identifier wrapper for committed shifts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ShiftId(pub u64);

impl std::fmt::Display for ShiftId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Round a monetary amount to two decimal places at the point of
/// computation, so stored audit snapshots stay exact and reproducible.
pub fn round_to_cents(amount: f64) -> f64 {
    (amount * 100.0).round() / 100.0
}

/// Lifecycle of a committed shift. Transitions are one-directional:
/// `Committed -> {InProgress -> Completed | Cancelled}`; `Completed` and
/// `Cancelled` are terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ShiftStatus {
    Committed,
    InProgress,
    Completed,
    Cancelled,
}

impl ShiftStatus {
    pub const fn label(self) -> &'static str {
        match self {
            ShiftStatus::Committed => "committed",
            ShiftStatus::InProgress => "in_progress",
            ShiftStatus::Completed => "completed",
            ShiftStatus::Cancelled => "cancelled",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "committed" => Some(ShiftStatus::Committed),
            "in_progress" => Some(ShiftStatus::InProgress),
            "completed" => Some(ShiftStatus::Completed),
            "cancelled" => Some(ShiftStatus::Cancelled),
            _ => None,
        }
    }

    pub const fn is_terminal(self) -> bool {
        matches!(self, ShiftStatus::Completed | ShiftStatus::Cancelled)
    }

    /// Earnings can be recorded while the shift is still open.
    pub const fn accepts_earnings(self) -> bool {
        matches!(self, ShiftStatus::Committed | ShiftStatus::InProgress)
    }
}

/// A recommended shift as submitted with a commitment request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ShiftRecommendation {
    pub location_name: String,
    #[serde(default)]
    pub location_key: Option<String>,
    #[serde(default)]
    pub region: Option<String>,
    #[serde(default)]
    pub zone: Option<String>,
    pub shift_type: String,
    #[serde(default)]
    pub day_name: Option<String>,
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
    pub predicted_earnings: f64,
    #[serde(default)]
    pub base_hourly_rate: Option<f64>,
    #[serde(default)]
    pub demand_score: Option<f64>,
    #[serde(default = "default_guarantee_eligible")]
    pub guarantee_eligible: bool,
}

fn default_guarantee_eligible() -> bool {
    true
}

impl ShiftRecommendation {
    pub fn duration_hours(&self) -> f64 {
        let seconds = (self.end_time - self.start_time).num_seconds();
        (seconds as f64 / 3600.0 * 100.0).round() / 100.0
    }
}

/// The central entity: a driver's accepted shift recommendation, tracked
/// through completion.
///
/// `guaranteed_minimum` is frozen at commitment from `predicted_earnings`
/// and the threshold in effect at that time; later threshold changes never
/// retroactively alter it. `topup_amount` and `guarantee_activated` stay
/// unset until actual earnings are recorded and are computed exactly once.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CommittedShift {
    pub id: ShiftId,
    pub driver_id: DriverId,
    pub location_name: String,
    pub location_key: Option<String>,
    pub region: Option<String>,
    pub zone: Option<String>,
    pub shift_type: String,
    pub day_name: Option<String>,
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
    pub predicted_earnings: f64,
    pub actual_earnings: Option<f64>,
    pub base_hourly_rate: Option<f64>,
    pub demand_score: Option<f64>,
    pub guarantee_eligible: bool,
    pub guarantee_threshold: f64,
    pub guaranteed_minimum: f64,
    pub topup_amount: Option<f64>,
    pub guarantee_activated: Option<bool>,
    pub status: ShiftStatus,
    pub committed_at: DateTime<Utc>,
    pub started_at: Option<DateTime<Utc>>,
    pub completed_at: Option<DateTime<Utc>>,
    pub cancelled_at: Option<DateTime<Utc>>,
}

impl CommittedShift {
    pub fn from_recommendation(
        id: ShiftId,
        driver_id: DriverId,
        recommendation: ShiftRecommendation,
        threshold: f64,
        committed_at: DateTime<Utc>,
    ) -> Self {
        let predicted = round_to_cents(recommendation.predicted_earnings);
        Self {
            id,
            driver_id,
            location_name: recommendation.location_name,
            location_key: recommendation.location_key,
            region: recommendation.region,
            zone: recommendation.zone,
            shift_type: recommendation.shift_type,
            day_name: recommendation.day_name,
            start_time: recommendation.start_time,
            end_time: recommendation.end_time,
            predicted_earnings: predicted,
            actual_earnings: None,
            base_hourly_rate: recommendation.base_hourly_rate,
            demand_score: recommendation.demand_score,
            guarantee_eligible: recommendation.guarantee_eligible,
            guarantee_threshold: threshold,
            guaranteed_minimum: round_to_cents(predicted * threshold),
            topup_amount: None,
            guarantee_activated: None,
            status: ShiftStatus::Committed,
            committed_at,
            started_at: None,
            completed_at: None,
            cancelled_at: None,
        }
    }

    /// Record actual earnings and resolve the guarantee. Called exactly
    /// once per shift, on the transition to `Completed`.
    pub fn settle(&mut self, actual_earnings: f64, at: DateTime<Utc>) {
        let actual = round_to_cents(actual_earnings);
        let topup = round_to_cents((self.guaranteed_minimum - actual).max(0.0));
        self.actual_earnings = Some(actual);
        self.topup_amount = Some(topup);
        self.guarantee_activated = Some(topup > 0.0);
        self.status = ShiftStatus::Completed;
        self.completed_at = Some(at);
    }

    pub fn duration_hours(&self) -> f64 {
        let seconds = (self.end_time - self.start_time).num_seconds();
        (seconds as f64 / 3600.0 * 100.0).round() / 100.0
    }

    pub fn actual_hourly_rate(&self) -> Option<f64> {
        let hours = self.duration_hours();
        match self.actual_earnings {
            Some(actual) if hours > 0.0 => Some(round_to_cents(actual / hours)),
            _ => None,
        }
    }

    /// What the driver takes home once any top-up is paid out.
    pub fn earnings_with_guarantee(&self) -> Option<f64> {
        let actual = self.actual_earnings?;
        Some(round_to_cents(actual + self.topup_amount.unwrap_or(0.0)))
    }
}

/// Audit event kinds recorded on every state transition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GuaranteeEvent {
    Commitment,
    EarningsRecorded,
    GuaranteeActivated,
    Cancellation,
}

impl GuaranteeEvent {
    pub const fn label(self) -> &'static str {
        match self {
            GuaranteeEvent::Commitment => "commitment",
            GuaranteeEvent::EarningsRecorded => "earnings_recorded",
            GuaranteeEvent::GuaranteeActivated => "guarantee_activated",
            GuaranteeEvent::Cancellation => "cancellation",
        }
    }
}

/// Financial figures captured at the moment of an audit event.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FinancialSnapshot {
    pub predicted_earnings: f64,
    pub actual_earnings: Option<f64>,
    pub guaranteed_minimum: f64,
    pub topup_amount: Option<f64>,
    pub guarantee_threshold: f64,
}

/// Append-only audit record; the system of record for the guarantee
/// lifecycle. Never updated or deleted once written.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GuaranteeLogEntry {
    pub id: u64,
    pub shift_id: ShiftId,
    pub driver_id: DriverId,
    pub event: GuaranteeEvent,
    pub description: String,
    pub snapshot: Option<FinancialSnapshot>,
    pub was_eligible: Option<bool>,
    pub recorded_at: DateTime<Utc>,
}
