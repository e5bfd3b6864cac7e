use anyhow::{Context, Result};
use async_trait::async_trait;
use chrono::{DateTime, FixedOffset};
use serde::Deserialize;
use tracing::{debug, info};

use super::{DayForecast, WeatherSample, WeatherSource};
use crate::api::endpoints;
use crate::config::ForecastSettings;
use crate::error::ForecastError;
use crate::forecast::ForecastQuery;

const PROVIDER: &str = "met.no";

/// MET Norway locationforecast client, the secondary source.
/// Returns its whole timeseries in UTC; the caller aligns and filters it.
/// MET requires an identifying User-Agent.
pub struct MetNoClient {
    http: reqwest::Client,
    base_url: String,
}

#[derive(Debug, Deserialize)]
struct LocationForecast {
    properties: Properties,
}

#[derive(Debug, Deserialize)]
struct Properties {
    #[serde(default)]
    timeseries: Vec<TimeStep>,
}

#[derive(Debug, Deserialize)]
struct TimeStep {
    time: String,
    data: StepData,
}

#[derive(Debug, Deserialize)]
struct StepData {
    instant: Instant,
    next_1_hours: Option<NextHours>,
}

#[derive(Debug, Deserialize)]
struct Instant {
    details: InstantDetails,
}

#[derive(Debug, Deserialize)]
struct InstantDetails {
    air_temperature: Option<f64>,
    air_pressure_at_sea_level: Option<f64>,
    wind_from_direction: Option<f64>,
    /// m/s
    wind_speed: Option<f64>,
}

#[derive(Debug, Deserialize)]
struct NextHours {
    summary: Option<Summary>,
    details: Option<NextHoursDetails>,
}

#[derive(Debug, Deserialize)]
struct Summary {
    symbol_code: String,
}

#[derive(Debug, Deserialize)]
struct NextHoursDetails {
    precipitation_amount: Option<f64>,
}

impl MetNoClient {
    pub fn new(settings: &ForecastSettings) -> Result<Self> {
        let http = reqwest::Client::builder()
            .user_agent(settings.user_agent.as_str())
            .timeout(std::time::Duration::from_secs(settings.timeout_secs))
            .build()
            .context("Failed to create MET Norway HTTP client")?;

        Ok(Self {
            http,
            base_url: endpoints::MET_NO_API.to_string(),
        })
    }
}

#[async_trait]
impl WeatherSource for MetNoClient {
    fn name(&self) -> &'static str {
        PROVIDER
    }

    async fn fetch_day(&self, query: &ForecastQuery) -> Result<DayForecast, ForecastError> {
        // MET truncates coordinates beyond 4 decimals and caches on them
        let url = format!(
            "{}{}?lat={:.4}&lon={:.4}",
            self.base_url,
            endpoints::LOCATION_FORECAST,
            query.latitude,
            query.longitude
        );
        debug!("MET Norway request: {}", url);

        let resp = self
            .http
            .get(&url)
            .send()
            .await
            .map_err(|e| ForecastError::from_reqwest(PROVIDER, e))?;

        if !resp.status().is_success() {
            return Err(ForecastError::Status { provider: PROVIDER, status: resp.status() });
        }

        let body: LocationForecast = resp
            .json()
            .await
            .map_err(|e| ForecastError::from_reqwest(PROVIDER, e))?;

        let day = into_day_forecast(body, query)?;
        info!("MET Norway: {} timesteps", day.samples.len());
        Ok(day)
    }
}

fn into_day_forecast(body: LocationForecast, query: &ForecastQuery) -> Result<DayForecast, ForecastError> {
    let utc = FixedOffset::east_opt(0).ok_or_else(|| ForecastError::Parse {
        provider: PROVIDER,
        message: "invalid UTC offset".to_string(),
    })?;

    let samples: Vec<WeatherSample> = body
        .properties
        .timeseries
        .into_iter()
        .filter_map(|step| {
            let timestamp = DateTime::parse_from_rfc3339(&step.time).ok()?;
            let details = step.data.instant.details;
            let next = step.data.next_1_hours;
            Some(WeatherSample {
                timestamp,
                temperature_c: details.air_temperature?,
                wind_speed_kmh: details.wind_speed? * 3.6,
                wind_direction_deg: details.wind_from_direction?,
                pressure_hpa: details.air_pressure_at_sea_level?,
                precipitation_mm: next
                    .as_ref()
                    .and_then(|n| n.details.as_ref())
                    .and_then(|d| d.precipitation_amount)
                    .unwrap_or(0.0),
                weather_code: next
                    .as_ref()
                    .and_then(|n| n.summary.as_ref())
                    .and_then(|s| symbol_to_wmo(&s.symbol_code)),
            })
        })
        .collect();

    if samples.is_empty() {
        return Err(ForecastError::NoData { provider: PROVIDER, date: query.date });
    }

    Ok(DayForecast {
        provider: PROVIDER,
        utc_offset: utc,
        timezone: Some("UTC".to_string()),
        sunrise: None,
        sunset: None,
        samples,
    })
}

/// Map a MET symbol code (`lightrain_day`, `heavysnowshowers_night`, ...) onto the closest
/// WMO weather code
pub fn symbol_to_wmo(symbol: &str) -> Option<u8> {
    let base = symbol.split('_').next().unwrap_or(symbol);
    if base.contains("thunder") {
        return Some(95);
    }
    let code = match base {
        "clearsky" => 0,
        "fair" => 1,
        "partlycloudy" => 2,
        "cloudy" => 3,
        "fog" => 45,
        "lightrain" => 61,
        "rain" => 63,
        "heavyrain" => 65,
        "lightrainshowers" => 80,
        "rainshowers" => 81,
        "heavyrainshowers" => 82,
        "lightsleet" | "sleet" | "lightsleetshowers" | "sleetshowers" => 66,
        "heavysleet" | "heavysleetshowers" => 67,
        "lightsnow" | "lightsnowshowers" => 71,
        "snow" | "snowshowers" => 73,
        "heavysnow" | "heavysnowshowers" => 75,
        _ => return None,
    };
    Some(code)
}
