//! Static UK demand lookup tables backing the recommender.

/// Demand multiplier per hour of day (index 0 = midnight). Peaks sit on
/// the morning and evening commutes.
pub const HOURLY_DEMAND: [f64; 24] = [
    0.6, 0.5, 0.4, 0.4, 0.5, 1.2, 1.8, 2.2, 2.0, 1.4, 1.0, 1.1, 1.3, 1.2, 0.9, 1.0, 1.3, 2.3,
    2.2, 1.8, 1.6, 1.4, 1.2, 0.8,
];

/// Demand multiplier per weekday (index 0 = Monday). Weekends run hot.
pub const DAY_MULTIPLIERS: [f64; 7] = [1.0, 1.0, 1.0, 1.0, 1.15, 1.35, 1.25];

/// A serviced pickup area with its baseline hourly rate.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LocationProfile {
    pub key: &'static str,
    pub display_name: &'static str,
    pub base_hourly: f64,
    pub demand_multiplier: f64,
    pub zone: &'static str,
    pub region: &'static str,
}

pub const LOCATIONS: &[LocationProfile] = &[
    LocationProfile {
        key: "london_central",
        display_name: "Central London",
        base_hourly: 22.5,
        demand_multiplier: 1.3,
        zone: "Central",
        region: "London",
    },
    LocationProfile {
        key: "london_heathrow",
        display_name: "Heathrow Airport",
        base_hourly: 28.0,
        demand_multiplier: 1.4,
        zone: "Airport",
        region: "London",
    },
    LocationProfile {
        key: "london_suburban",
        display_name: "Greater London",
        base_hourly: 18.0,
        demand_multiplier: 1.0,
        zone: "Suburban",
        region: "London",
    },
    LocationProfile {
        key: "manchester_city",
        display_name: "Manchester City Centre",
        base_hourly: 18.5,
        demand_multiplier: 1.1,
        zone: "City Centre",
        region: "Manchester",
    },
    LocationProfile {
        key: "manchester_airport",
        display_name: "Manchester Airport",
        base_hourly: 24.0,
        demand_multiplier: 1.2,
        zone: "Airport",
        region: "Manchester",
    },
    LocationProfile {
        key: "birmingham_city",
        display_name: "Birmingham City Centre",
        base_hourly: 17.0,
        demand_multiplier: 1.0,
        zone: "City Centre",
        region: "Birmingham",
    },
    LocationProfile {
        key: "bristol_city",
        display_name: "Bristol City Centre",
        base_hourly: 16.5,
        demand_multiplier: 0.95,
        zone: "City Centre",
        region: "Bristol",
    },
    LocationProfile {
        key: "edinburgh_city",
        display_name: "Edinburgh City Centre",
        base_hourly: 16.0,
        demand_multiplier: 0.9,
        zone: "City Centre",
        region: "Edinburgh",
    },
    LocationProfile {
        key: "leeds_city",
        display_name: "Leeds City Centre",
        base_hourly: 16.0,
        demand_multiplier: 0.95,
        zone: "City Centre",
        region: "Leeds",
    },
];

/// Recurring shift windows offered to drivers, as (label, start hour,
/// end hour) on a 24h clock.
pub const SHIFT_TEMPLATES: &[(&str, u32, u32)] = &[
    ("Morning Rush Hour", 7, 9),
    ("Evening Rush (Peak)", 17, 20),
    ("Night Shift", 20, 23),
    ("Lunch Time", 11, 14),
    ("Afternoon", 14, 17),
];

pub fn hourly_demand(hour: u32) -> f64 {
    HOURLY_DEMAND
        .get(hour as usize)
        .copied()
        .unwrap_or(1.0)
}

pub fn day_multiplier(weekday_from_monday: u32) -> f64 {
    DAY_MULTIPLIERS
        .get(weekday_from_monday as usize)
        .copied()
        .unwrap_or(1.0)
}

pub fn location(key: &str) -> Option<&'static LocationProfile> {
    LOCATIONS.iter().find(|profile| profile.key == key)
}
