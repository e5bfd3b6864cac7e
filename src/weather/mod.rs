pub mod merge;
pub mod met_no;
pub mod open_meteo;

use async_trait::async_trait;
use chrono::{DateTime, FixedOffset};
use serde::Serialize;

use crate::error::ForecastError;
use crate::forecast::ForecastQuery;

/// One hourly observation, normalized across providers
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WeatherSample {
    pub timestamp: DateTime<FixedOffset>,
    pub temperature_c: f64,
    pub wind_speed_kmh: f64,
    pub wind_direction_deg: f64,
    pub pressure_hpa: f64,
    pub precipitation_mm: f64,
    /// WMO weather interpretation code
    pub weather_code: Option<u8>,
}

impl WeatherSample {
    pub fn new(
        timestamp: DateTime<FixedOffset>,
        temperature_c: f64,
        wind_speed_kmh: f64,
        wind_direction_deg: f64,
        pressure_hpa: f64,
    ) -> Self {
        Self {
            timestamp,
            temperature_c,
            wind_speed_kmh,
            wind_direction_deg,
            pressure_hpa,
            precipitation_mm: 0.0,
            weather_code: None,
        }
    }

    pub fn with_precipitation(mut self, mm: f64) -> Self {
        self.precipitation_mm = mm;
        self
    }

    pub fn with_weather_code(mut self, code: u8) -> Self {
        self.weather_code = Some(code);
        self
    }

    /// Same instant, expressed in another offset
    pub fn in_offset(mut self, offset: FixedOffset) -> Self {
        self.timestamp = self.timestamp.with_timezone(&offset);
        self
    }

    pub fn cardinal(&self) -> &'static str {
        wind_cardinal(self.wind_direction_deg)
    }
}

/// A provider's view of one day (or more, for providers without a date filter)
#[derive(Debug, Clone)]
pub struct DayForecast {
    pub provider: &'static str,
    pub utc_offset: FixedOffset,
    pub timezone: Option<String>,
    /// `HH:MM`, passed through from the provider
    pub sunrise: Option<String>,
    pub sunset: Option<String>,
    pub samples: Vec<WeatherSample>,
}

/// A source of hourly samples for a query
#[async_trait]
pub trait WeatherSource: Send + Sync {
    fn name(&self) -> &'static str;

    async fn fetch_day(&self, query: &ForecastQuery) -> Result<DayForecast, ForecastError>;
}

const CARDINALS: [&str; 8] = [
    "North", "North-East", "East", "South-East",
    "South", "South-West", "West", "North-West",
];

/// 8-point compass name for a bearing in degrees
pub fn wind_cardinal(degrees: f64) -> &'static str {
    let deg = if degrees.is_finite() { degrees.rem_euclid(360.0) } else { 0.0 };
    let idx = (deg / 45.0).round() as usize % 8;
    CARDINALS[idx]
}

/// Short icon + label for a WMO weather code
pub fn weather_label(code: Option<u8>) -> &'static str {
    match code {
        Some(0) => "☀️ Clear",
        Some(1..=3) => "⛅ Cloudy",
        Some(45 | 48) => "🌫️ Fog",
        Some(51 | 53 | 55) => "🌦️ Drizzle",
        Some(61 | 63 | 65) => "🌧️ Rain",
        Some(71 | 73 | 75) => "❄️ Snow",
        Some(80..=82) => "🌧️🌧️ Heavy showers",
        Some(95 | 96 | 99) => "⛈️ Thunderstorm",
        _ => "❔",
    }
}

#[cfg(test)]
pub(crate) mod test_support {
    use super::WeatherSample;
    use chrono::{FixedOffset, NaiveDate, TimeZone};

    /// Sample at `date` `hour`:00 UTC+2 with calm, dry, stable defaults
    pub fn sample_at(date: NaiveDate, hour: u32, temperature_c: f64) -> WeatherSample {
        let offset = FixedOffset::east_opt(2 * 3600).unwrap();
        let naive = date.and_hms_opt(hour, 0, 0).unwrap();
        let timestamp = offset.from_local_datetime(&naive).unwrap();
        WeatherSample::new(timestamp, temperature_c, 10.0, 0.0, 1015.0)
    }
}
