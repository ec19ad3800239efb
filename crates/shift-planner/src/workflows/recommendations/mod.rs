//! Ranked shift suggestions from static demand tables.
//!
//! This is lookup arithmetic, not a trained model: predicted earnings are
//! base rate x hours x average hourly demand x day multiplier x location
//! multiplier, and the results feed the guarantee engine as commitments.

pub mod router;
pub mod tables;

use chrono::{DateTime, Datelike, Duration, NaiveDate, TimeZone, Timelike, Utc};

use crate::workflows::guarantee::{round_to_cents, ShiftRecommendation};

pub use router::{recommendations_router, RecommendationsRouterState};
pub use tables::{location, LocationProfile, LOCATIONS, SHIFT_TEMPLATES};

const DEFAULT_RECOMMENDATION_LIMIT: usize = 5;
const PLANNING_HORIZON_DAYS: i64 = 3;

/// Predicted shift earnings below this are not worth guaranteeing.
const GUARANTEE_ELIGIBLE_FLOOR: f64 = 60.0;

#[derive(Debug, Clone, Copy)]
pub struct ShiftRecommender {
    limit: usize,
}

impl Default for ShiftRecommender {
    fn default() -> Self {
        Self {
            limit: DEFAULT_RECOMMENDATION_LIMIT,
        }
    }
}

impl ShiftRecommender {
    pub fn with_limit(limit: usize) -> Self {
        Self {
            limit: limit.max(1),
        }
    }

    /// Predicted earnings for one location and window.
    pub fn predict_earnings(
        &self,
        profile: &LocationProfile,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> f64 {
        let hours = (end - start).num_hours();
        if hours <= 0 {
            return 0.0;
        }

        let start_hour = start.hour();
        let avg_demand = average_demand(start_hour, hours as u32);
        let day = day_factor(start);
        round_to_cents(
            profile.base_hourly * hours as f64 * avg_demand * day * profile.demand_multiplier,
        )
    }

    /// Top shift suggestions over the planning horizon, ranked by
    /// predicted earnings.
    pub fn recommend(&self, from: NaiveDate) -> Vec<ShiftRecommendation> {
        let mut recommendations = Vec::new();

        for day_offset in 0..PLANNING_HORIZON_DAYS {
            let date = from + Duration::days(day_offset);
            for profile in LOCATIONS {
                for &(shift_type, start_hour, end_hour) in SHIFT_TEMPLATES {
                    let start = Utc
                        .with_ymd_and_hms(date.year(), date.month(), date.day(), start_hour, 0, 0)
                        .single()
                        .expect("template hours are valid");
                    let end = Utc
                        .with_ymd_and_hms(date.year(), date.month(), date.day(), end_hour, 0, 0)
                        .single()
                        .expect("template hours are valid");

                    let predicted = self.predict_earnings(profile, start, end);
                    let demand = average_demand(start_hour, end_hour - start_hour);

                    recommendations.push(ShiftRecommendation {
                        location_name: profile.display_name.to_string(),
                        location_key: Some(profile.key.to_string()),
                        region: Some(profile.region.to_string()),
                        zone: Some(profile.zone.to_string()),
                        shift_type: shift_type.to_string(),
                        day_name: Some(date.format("%A").to_string()),
                        start_time: start,
                        end_time: end,
                        predicted_earnings: predicted,
                        base_hourly_rate: Some(profile.base_hourly),
                        demand_score: Some(demand_score(demand)),
                        guarantee_eligible: predicted >= GUARANTEE_ELIGIBLE_FLOOR,
                    });
                }
            }
        }

        recommendations.sort_by(|a, b| {
            b.predicted_earnings
                .partial_cmp(&a.predicted_earnings)
                .expect("predictions are finite")
        });
        recommendations.truncate(self.limit);
        recommendations
    }
}

fn average_demand(start_hour: u32, hours: u32) -> f64 {
    if hours == 0 {
        return 1.0;
    }
    let total: f64 = (start_hour..start_hour + hours)
        .map(|h| tables::hourly_demand(h % 24))
        .sum();
    total / hours as f64
}

fn day_factor(at: DateTime<Utc>) -> f64 {
    tables::day_multiplier(at.weekday().num_days_from_monday())
}

/// Scale average demand (roughly 0.4..=2.3) onto 0..=100.
fn demand_score(avg_demand: f64) -> f64 {
    (avg_demand * 30.0).min(100.0).round()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_date() -> NaiveDate {
        // A Friday, so the weekend multiplier applies.
        NaiveDate::from_ymd_opt(2026, 3, 6).expect("valid date")
    }

    #[test]
    fn predicts_peak_window_earnings() {
        let recommender = ShiftRecommender::default();
        let profile = location("london_central").expect("known location");
        let start = Utc.with_ymd_and_hms(2026, 3, 6, 17, 0, 0).single().expect("valid");
        let end = Utc.with_ymd_and_hms(2026, 3, 6, 20, 0, 0).single().expect("valid");

        let predicted = recommender.predict_earnings(profile, start, end);
        // 22.50 x 3h x avg(2.3, 2.2, 1.8) x 1.15 (Friday) x 1.3 (location)
        assert_eq!(predicted, 211.92);
    }

    #[test]
    fn empty_window_predicts_nothing() {
        let recommender = ShiftRecommender::default();
        let profile = location("leeds_city").expect("known location");
        let at = Utc.with_ymd_and_hms(2026, 3, 6, 9, 0, 0).single().expect("valid");
        assert_eq!(recommender.predict_earnings(profile, at, at), 0.0);
    }

    #[test]
    fn recommendations_are_ranked_by_predicted_earnings() {
        let recommendations = ShiftRecommender::with_limit(10).recommend(sample_date());
        assert_eq!(recommendations.len(), 10);
        for pair in recommendations.windows(2) {
            assert!(pair[0].predicted_earnings >= pair[1].predicted_earnings);
        }
    }

    #[test]
    fn demand_scores_stay_within_bounds() {
        for recommendation in ShiftRecommender::with_limit(50).recommend(sample_date()) {
            let score = recommendation.demand_score.expect("score set");
            assert!((0.0..=100.0).contains(&score));
        }
    }

    #[test]
    fn high_value_shifts_are_guarantee_eligible() {
        let recommendations = ShiftRecommender::with_limit(5).recommend(sample_date());
        // The top slots comfortably clear the eligibility floor.
        assert!(recommendations.iter().all(|r| r.guarantee_eligible));
    }

    #[test]
    fn unknown_location_key_is_absent() {
        assert!(location("atlantis_docks").is_none());
    }
}
