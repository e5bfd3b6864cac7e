use chrono::NaiveDate;
use thiserror::Error;

/// Failures surfaced by providers, geocoding and the forecast controller.
/// The scoring engine itself never fails.
#[derive(Debug, Error)]
pub enum ForecastError {
    #[error("{provider} request failed: {source}")]
    Http {
        provider: &'static str,
        #[source]
        source: reqwest::Error,
    },

    #[error("{provider} returned HTTP {status}")]
    Status {
        provider: &'static str,
        status: reqwest::StatusCode,
    },

    #[error("failed to parse {provider} response: {message}")]
    Parse {
        provider: &'static str,
        message: String,
    },

    #[error("no {provider} data for {date}")]
    NoData {
        provider: &'static str,
        date: NaiveDate,
    },

    #[error("city not found: {0}")]
    CityNotFound(String),

    #[error("date {date} is outside the forecast range (today to today + {max_days} days)")]
    DateOutOfRange { date: NaiveDate, max_days: u32 },
}

impl ForecastError {
    /// Short text for the user, independent of the underlying cause
    pub fn user_message(&self) -> &'static str {
        match self {
            ForecastError::Http { .. }
            | ForecastError::Status { .. }
            | ForecastError::Parse { .. }
            | ForecastError::NoData { .. } => "Weather retrieval error",
            ForecastError::CityNotFound(_) => "City not found",
            ForecastError::DateOutOfRange { .. } => "Date outside the forecast range",
        }
    }

    /// Map a reqwest failure, separating body decode errors from transport errors
    pub fn from_reqwest(provider: &'static str, err: reqwest::Error) -> Self {
        if err.is_decode() {
            ForecastError::Parse { provider, message: err.to_string() }
        } else {
            ForecastError::Http { provider, source: err }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_provider_failures_share_user_message() {
        let date = NaiveDate::from_ymd_opt(2026, 6, 15).unwrap();
        let no_data = ForecastError::NoData { provider: "open-meteo", date };
        let parse = ForecastError::Parse { provider: "met.no", message: "eof".into() };
        assert_eq!(no_data.user_message(), "Weather retrieval error");
        assert_eq!(parse.user_message(), "Weather retrieval error");
        assert_eq!(ForecastError::CityNotFound("Atlantis".into()).user_message(), "City not found");
    }

    #[test]
    fn test_display_includes_context() {
        let date = NaiveDate::from_ymd_opt(2026, 6, 15).unwrap();
        let err = ForecastError::DateOutOfRange { date, max_days: 7 };
        assert!(err.to_string().contains("2026-06-15"));
        assert!(err.to_string().contains("7 days"));
    }
}
