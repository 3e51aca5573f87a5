//! Deterministic day curves for simulated sensor history, with optional
//! random jitter on top.

use rand::Rng;

use time::OffsetDateTime;
use time::format_description::well_known::Rfc3339;

use smartroom_api::models::{PowerReading, TempReading};

use crate::data::HistoryProfile;

pub fn day_fraction(ts: OffsetDateTime) -> f64 {
    let t = ts.time();
    (t.hour() as f64 * 3600.0 + t.minute() as f64 * 60.0 + t.second() as f64) / 86_400.0
}

/// Temperature rises through the morning and falls back to the overnight
/// baseline.
pub fn simulated_temperature(day_fraction: f64, profile: &HistoryProfile) -> f64 {
    let radians = day_fraction * 2.0 * std::f64::consts::PI;

    profile.base_temp + radians.sin().max(0.0) * profile.temp_swing
}

/// Power draw idles overnight and peaks through the afternoon and evening.
pub fn simulated_watts(day_fraction: f64, profile: &HistoryProfile) -> f64 {
    let radians = (day_fraction - 0.25) * 2.0 * std::f64::consts::PI;

    profile.base_watt + radians.sin().max(0.0) * profile.watt_swing
}

pub fn temperature_series(
    start: OffsetDateTime,
    end: OffsetDateTime,
    profile: &HistoryProfile,
) -> Vec<TempReading> {
    sample_instants(start, end, profile)
        .into_iter()
        .map(|ts| TempReading {
            timestamp: ts.format(&Rfc3339).unwrap_or_default(),
            avg_temp_c: Some(simulated_temperature(day_fraction(ts), profile) + jitter(profile)),
        })
        .collect()
}

pub fn power_series(
    start: OffsetDateTime,
    end: OffsetDateTime,
    profile: &HistoryProfile,
) -> Vec<PowerReading> {
    let hours_per_sample = f64::from(profile.sample_minutes.max(1)) / 60.0;

    sample_instants(start, end, profile)
        .into_iter()
        .map(|ts| {
            let watts = simulated_watts(day_fraction(ts), profile) + jitter(profile);
            PowerReading {
                timestamp: ts.format(&Rfc3339).unwrap_or_default(),
                avg_watt: Some(watts),
                avg_watt_hour: Some(watts * hours_per_sample),
            }
        })
        .collect()
}

fn jitter(profile: &HistoryProfile) -> f64 {
    if profile.jitter > 0.0 {
        rand::rng().random_range(-profile.jitter..profile.jitter)
    } else {
        0.0
    }
}

fn sample_instants(
    start: OffsetDateTime,
    end: OffsetDateTime,
    profile: &HistoryProfile,
) -> Vec<OffsetDateTime> {
    let step = time::Duration::minutes(i64::from(profile.sample_minutes.max(1)));
    let mut instants = Vec::new();
    let mut current = start;

    // Bounded so a pathological range cannot build an unbounded response.
    while current < end && instants.len() < 100_000 {
        instants.push(current);
        current += step;
    }

    instants
}
