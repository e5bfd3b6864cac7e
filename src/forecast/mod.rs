pub mod controller;

use chrono::NaiveDate;
use serde::Serialize;

use crate::windows::{BestWindow, DayWindow};

pub use controller::{ForecastController, ForecastObserver, RequestTicket, RequestTracker, RunOutcome};

/// What the user asked for: one place, one day. Built fresh for every request.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ForecastQuery {
    pub date: NaiveDate,
    pub latitude: f64,
    pub longitude: f64,
    /// Display name when the place came from a city search
    pub place: Option<String>,
}

impl ForecastQuery {
    pub fn new(date: NaiveDate, latitude: f64, longitude: f64) -> Self {
        Self { date, latitude, longitude, place: None }
    }

    pub fn with_place(mut self, place: impl Into<String>) -> Self {
        self.place = Some(place.into());
        self
    }
}

/// Everything the presentation layer needs to render one day
#[derive(Debug, Clone, Serialize)]
pub struct ForecastReport {
    pub query: ForecastQuery,
    pub providers: Vec<&'static str>,
    pub timezone: Option<String>,
    pub sunrise: Option<String>,
    pub sunset: Option<String>,
    pub policy: &'static str,
    /// Eligible windows only, chronological
    pub windows: Vec<DayWindow>,
    pub best: Option<BestWindow>,
}

impl ForecastReport {
    pub fn is_best(&self, index: usize) -> bool {
        self.best.as_ref().is_some_and(|b| b.index == index)
    }

    pub fn best_window(&self) -> Option<&DayWindow> {
        self.best.as_ref().and_then(|b| self.windows.get(b.index))
    }
}
