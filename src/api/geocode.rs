use anyhow::{Context, Result};
use serde::{Deserialize, Deserializer};
use tracing::{debug, info};

use super::endpoints;
use crate::config::ForecastSettings;
use crate::error::ForecastError;

const PROVIDER: &str = "nominatim";

/// Nominatim returns coordinates as strings; accept numbers too
fn deserialize_coordinate<'de, D>(deserializer: D) -> Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum StringOrNum {
        Num(f64),
        Str(String),
    }
    match StringOrNum::deserialize(deserializer)? {
        StringOrNum::Num(n) => Ok(n),
        StringOrNum::Str(s) => s.trim().parse::<f64>().map_err(serde::de::Error::custom),
    }
}

#[derive(Debug, Deserialize)]
struct SearchResult {
    #[serde(deserialize_with = "deserialize_coordinate")]
    lat: f64,
    #[serde(deserialize_with = "deserialize_coordinate")]
    lon: f64,
    display_name: Option<String>,
}

/// A resolved city
#[derive(Debug, Clone, PartialEq)]
pub struct Place {
    pub name: String,
    pub latitude: f64,
    pub longitude: f64,
}

/// OpenStreetMap Nominatim city search
pub struct GeocodeClient {
    http: reqwest::Client,
    base_url: String,
}

impl GeocodeClient {
    pub fn new(settings: &ForecastSettings) -> Result<Self> {
        let http = reqwest::Client::builder()
            .user_agent(settings.user_agent.as_str())
            .timeout(std::time::Duration::from_secs(settings.timeout_secs))
            .build()
            .context("Failed to create geocoding HTTP client")?;

        Ok(Self {
            http,
            base_url: endpoints::NOMINATIM_API.to_string(),
        })
    }

    /// First match for `city`; no results is an error, never a fallback location
    pub async fn search(&self, city: &str) -> Result<Place, ForecastError> {
        let url = format!("{}{}", self.base_url, endpoints::SEARCH);
        debug!("Nominatim search: {}", city);

        let resp = self
            .http
            .get(&url)
            .query(&[("format", "json"), ("limit", "1"), ("q", city)])
            .send()
            .await
            .map_err(|e| ForecastError::from_reqwest(PROVIDER, e))?;

        if !resp.status().is_success() {
            return Err(ForecastError::Status { provider: PROVIDER, status: resp.status() });
        }

        let results: Vec<SearchResult> = resp
            .json()
            .await
            .map_err(|e| ForecastError::from_reqwest(PROVIDER, e))?;

        let place = first_place(city, results)?;
        info!("Resolved '{}' to {:.4}, {:.4}", city, place.latitude, place.longitude);
        Ok(place)
    }
}

fn first_place(city: &str, results: Vec<SearchResult>) -> Result<Place, ForecastError> {
    let first = results
        .into_iter()
        .next()
        .ok_or_else(|| ForecastError::CityNotFound(city.to_string()))?;

    Ok(Place {
        name: first.display_name.unwrap_or_else(|| city.to_string()),
        latitude: first.lat,
        longitude: first.lon,
    })
}
