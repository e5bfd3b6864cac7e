use anyhow::{Context, Result};
use async_trait::async_trait;
use chrono::{FixedOffset, NaiveDateTime, TimeZone};
use serde::Deserialize;
use tracing::{debug, info};

use super::{DayForecast, WeatherSample, WeatherSource};
use crate::api::endpoints;
use crate::config::ForecastSettings;
use crate::error::ForecastError;
use crate::forecast::ForecastQuery;

const PROVIDER: &str = "open-meteo";

/// Open-Meteo hourly forecast client, the primary source.
/// Requests `timezone=auto` so hours come back in the location's local time.
pub struct OpenMeteoClient {
    http: reqwest::Client,
    base_url: String,
}

#[derive(Debug, Deserialize)]
struct ForecastResponse {
    #[serde(default)]
    utc_offset_seconds: i32,
    timezone: Option<String>,
    hourly: Option<Hourly>,
    daily: Option<Daily>,
}

#[derive(Debug, Deserialize)]
struct Hourly {
    time: Vec<String>,
    #[serde(default)]
    temperature_2m: Vec<Option<f64>>,
    #[serde(default)]
    weathercode: Vec<Option<f64>>,
    #[serde(default)]
    windspeed_10m: Vec<Option<f64>>,
    #[serde(default)]
    winddirection_10m: Vec<Option<f64>>,
    #[serde(default)]
    pressure_msl: Vec<Option<f64>>,
    #[serde(default)]
    precipitation: Vec<Option<f64>>,
}

#[derive(Debug, Deserialize)]
struct Daily {
    #[serde(default)]
    sunrise: Vec<String>,
    #[serde(default)]
    sunset: Vec<String>,
}

impl OpenMeteoClient {
    pub fn new(settings: &ForecastSettings) -> Result<Self> {
        let http = reqwest::Client::builder()
            .user_agent(settings.user_agent.as_str())
            .timeout(std::time::Duration::from_secs(settings.timeout_secs))
            .build()
            .context("Failed to create Open-Meteo HTTP client")?;

        Ok(Self {
            http,
            base_url: endpoints::OPEN_METEO_API.to_string(),
        })
    }

    fn url(&self, query: &ForecastQuery) -> String {
        let date = query.date.format("%Y-%m-%d");
        format!(
            "{}{}?latitude={:.4}&longitude={:.4}&hourly={}&daily={}&start_date={}&end_date={}&timezone=auto",
            self.base_url,
            endpoints::FORECAST,
            query.latitude,
            query.longitude,
            endpoints::OPEN_METEO_HOURLY,
            endpoints::OPEN_METEO_DAILY,
            date,
            date
        )
    }
}

#[async_trait]
impl WeatherSource for OpenMeteoClient {
    fn name(&self) -> &'static str {
        PROVIDER
    }

    async fn fetch_day(&self, query: &ForecastQuery) -> Result<DayForecast, ForecastError> {
        let url = self.url(query);
        debug!("Open-Meteo request: {}", url);

        let resp = self
            .http
            .get(&url)
            .send()
            .await
            .map_err(|e| ForecastError::from_reqwest(PROVIDER, e))?;

        if !resp.status().is_success() {
            return Err(ForecastError::Status { provider: PROVIDER, status: resp.status() });
        }

        let body: ForecastResponse = resp
            .json()
            .await
            .map_err(|e| ForecastError::from_reqwest(PROVIDER, e))?;

        let day = into_day_forecast(body, query)?;
        info!(
            "Open-Meteo: {} hours for {} ({})",
            day.samples.len(),
            query.date,
            day.timezone.as_deref().unwrap_or("UTC")
        );
        Ok(day)
    }
}

fn into_day_forecast(body: ForecastResponse, query: &ForecastQuery) -> Result<DayForecast, ForecastError> {
    let offset = FixedOffset::east_opt(body.utc_offset_seconds).ok_or_else(|| ForecastError::Parse {
        provider: PROVIDER,
        message: format!("invalid utc_offset_seconds {}", body.utc_offset_seconds),
    })?;

    let hourly = body.hourly.ok_or(ForecastError::NoData { provider: PROVIDER, date: query.date })?;

    let mut samples = Vec::with_capacity(hourly.time.len());
    for (i, time) in hourly.time.iter().enumerate() {
        let field = |values: &[Option<f64>]| values.get(i).copied().flatten();

        let naive = match NaiveDateTime::parse_from_str(time, "%Y-%m-%dT%H:%M") {
            Ok(n) => n,
            Err(e) => {
                debug!("Skipping unparseable Open-Meteo time '{}': {}", time, e);
                continue;
            }
        };
        let Some(timestamp) = offset.from_local_datetime(&naive).single() else {
            continue;
        };

        // Hours missing a core field are skipped; precipitation and code are optional
        let (Some(temp), Some(speed), Some(dir), Some(pressure)) = (
            field(&hourly.temperature_2m),
            field(&hourly.windspeed_10m),
            field(&hourly.winddirection_10m),
            field(&hourly.pressure_msl),
        ) else {
            debug!("Skipping incomplete Open-Meteo hour {}", time);
            continue;
        };

        samples.push(WeatherSample {
            timestamp,
            temperature_c: temp,
            wind_speed_kmh: speed,
            wind_direction_deg: dir,
            pressure_hpa: pressure,
            precipitation_mm: field(&hourly.precipitation).unwrap_or(0.0),
            weather_code: field(&hourly.weathercode).map(|c| c.round() as u8),
        });
    }

    if samples.is_empty() {
        return Err(ForecastError::NoData { provider: PROVIDER, date: query.date });
    }

    let (sunrise, sunset) = match body.daily {
        Some(daily) => (
            daily.sunrise.first().and_then(|s| clock_time(s)),
            daily.sunset.first().and_then(|s| clock_time(s)),
        ),
        None => (None, None),
    };

    Ok(DayForecast {
        provider: PROVIDER,
        utc_offset: offset,
        timezone: body.timezone,
        sunrise,
        sunset,
        samples,
    })
}

/// `2026-06-15T05:47` -> `05:47`
fn clock_time(iso: &str) -> Option<String> {
    iso.get(11..16).map(String::from)
}
