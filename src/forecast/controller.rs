use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use chrono::{DateTime, Duration, NaiveDate, Timelike, Utc};
use tracing::{debug, info, warn};

use super::{ForecastQuery, ForecastReport};
use crate::error::ForecastError;
use crate::scoring::Scorer;
use crate::weather::merge::merge_samples;
use crate::weather::WeatherSource;
use crate::windows::{self, WindowMode};

/// Receives finished forecasts. Only results of the latest request are delivered.
pub trait ForecastObserver {
    fn on_report(&self, report: &ForecastReport);
    fn on_error(&self, query: &ForecastQuery, error: &ForecastError);
}

/// Generation number handed out when a request starts
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RequestTicket(u64);

/// Hands out increasing tickets; a ticket is current until a newer one is issued
#[derive(Debug, Clone, Default)]
pub struct RequestTracker {
    latest: Arc<AtomicU64>,
}

impl RequestTracker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn begin(&self) -> RequestTicket {
        RequestTicket(self.latest.fetch_add(1, Ordering::SeqCst) + 1)
    }

    pub fn is_current(&self, ticket: RequestTicket) -> bool {
        self.latest.load(Ordering::SeqCst) == ticket.0
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunOutcome {
    Delivered,
    Failed,
    /// A newer request started; the result was dropped
    Superseded,
}

/// Fetches, merges, scores and selects for one query, then notifies the observer
pub struct ForecastController {
    primary: Box<dyn WeatherSource>,
    secondary: Option<Box<dyn WeatherSource>>,
    scorer: Scorer,
    window_mode: WindowMode,
    max_days_ahead: u32,
    tracker: RequestTracker,
    clock: fn() -> DateTime<Utc>,
}

impl ForecastController {
    pub fn new(primary: Box<dyn WeatherSource>, scorer: Scorer, window_mode: WindowMode) -> Self {
        Self {
            primary,
            secondary: None,
            scorer,
            window_mode,
            max_days_ahead: 7,
            tracker: RequestTracker::new(),
            clock: Utc::now,
        }
    }

    pub fn with_secondary(mut self, secondary: Box<dyn WeatherSource>) -> Self {
        self.secondary = Some(secondary);
        self
    }

    pub fn with_max_days_ahead(mut self, days: u32) -> Self {
        self.max_days_ahead = days;
        self
    }

    pub fn with_clock(mut self, clock: fn() -> DateTime<Utc>) -> Self {
        self.clock = clock;
        self
    }

    pub fn tracker(&self) -> &RequestTracker {
        &self.tracker
    }

    /// Start a new request and run it
    pub async fn forecast(&self, query: &ForecastQuery, observer: &dyn ForecastObserver) -> RunOutcome {
        let ticket = self.tracker.begin();
        self.run(ticket, query, observer).await
    }

    pub async fn run(
        &self,
        ticket: RequestTicket,
        query: &ForecastQuery,
        observer: &dyn ForecastObserver,
    ) -> RunOutcome {
        let result = self.build_report(query).await;

        if !self.tracker.is_current(ticket) {
            debug!("Dropping superseded forecast for {} ({:?})", query.date, ticket);
            return RunOutcome::Superseded;
        }

        match result {
            Ok(report) => {
                observer.on_report(&report);
                RunOutcome::Delivered
            }
            Err(e) => {
                observer.on_error(query, &e);
                RunOutcome::Failed
            }
        }
    }

    pub async fn build_report(&self, query: &ForecastQuery) -> Result<ForecastReport, ForecastError> {
        // The location's own date is only known after the primary answers; allow a day of slack
        let utc_today = (self.clock)().date_naive();
        let slack = Duration::days(1);
        let last = utc_today + Duration::days(i64::from(self.max_days_ahead)) + slack;
        if query.date < utc_today - slack || query.date > last {
            return Err(ForecastError::DateOutOfRange { date: query.date, max_days: self.max_days_ahead });
        }

        let secondary = async {
            match &self.secondary {
                Some(source) => Some((source.name(), source.fetch_day(query).await)),
                None => None,
            }
        };
        let (primary, secondary) = tokio::join!(self.primary.fetch_day(query), secondary);
        let primary = primary?;

        let offset = primary.utc_offset;
        let mut providers = vec![primary.provider];
        let samples = match secondary {
            Some((_, Ok(other))) => {
                let aligned: Vec<_> = other
                    .samples
                    .into_iter()
                    .map(|s| s.in_offset(offset))
                    .filter(|s| s.timestamp.date_naive() == query.date)
                    .collect();
                providers.push(other.provider);
                merge_samples(&primary.samples, &aligned)
            }
            Some((name, Err(e))) => {
                warn!("{} forecast failed: {}, using {} only", name, e, primary.provider);
                primary.samples
            }
            None => primary.samples,
        };

        let now_local = (self.clock)().with_timezone(&offset);
        let today = now_local.date_naive();
        check_date(query.date, today, self.max_days_ahead)?;
        let current_hour = (query.date == today).then(|| now_local.hour());

        let windows = windows::score_day(
            &samples,
            query.date,
            current_hour,
            &self.window_mode,
            &self.scorer,
            query.latitude,
        );
        let best = windows::pick_best_window(&windows);

        match &best {
            Some(b) => info!(
                "{} windows for {}, best {} (score {:.1})",
                windows.len(),
                query.date,
                b.label,
                b.score
            ),
            None => info!("No eligible windows left for {}", query.date),
        }

        Ok(ForecastReport {
            query: query.clone(),
            providers,
            timezone: primary.timezone,
            sunrise: primary.sunrise,
            sunset: primary.sunset,
            policy: self.scorer.policy.name(),
            windows,
            best,
        })
    }
}

/// `date` must lie in `[today, today + max_days]`
pub fn check_date(date: NaiveDate, today: NaiveDate, max_days: u32) -> Result<(), ForecastError> {
    let last = today + Duration::days(i64::from(max_days));
    if date < today || date > last {
        return Err(ForecastError::DateOutOfRange { date, max_days });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::weather::test_support::sample_at;
    use crate::weather::{DayForecast, WeatherSample};
    use async_trait::async_trait;
    use chrono::{FixedOffset, TimeZone};
    use std::sync::Mutex;

    struct FakeSource {
        name: &'static str,
        day: Option<DayForecast>,
    }

    #[async_trait]
    impl WeatherSource for FakeSource {
        fn name(&self) -> &'static str {
            self.name
        }

        async fn fetch_day(&self, query: &ForecastQuery) -> Result<DayForecast, ForecastError> {
            self.day
                .clone()
                .ok_or(ForecastError::NoData { provider: self.name, date: query.date })
        }
    }

    #[derive(Default)]
    struct Recorder {
        reports: Mutex<Vec<ForecastReport>>,
        errors: Mutex<Vec<String>>,
    }

    impl ForecastObserver for Recorder {
        fn on_report(&self, report: &ForecastReport) {
            self.reports.lock().unwrap().push(report.clone());
        }

        fn on_error(&self, _query: &ForecastQuery, error: &ForecastError) {
            self.errors.lock().unwrap().push(error.to_string());
        }
    }

    /// 12:00 UTC, 14:00 at the UTC+2 test location
    fn noon_utc() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 6, 15, 12, 0, 0).unwrap()
    }

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 6, 15).unwrap()
    }

    fn day_forecast(provider: &'static str, date: NaiveDate, temp: f64) -> DayForecast {
        DayForecast {
            provider,
            utc_offset: FixedOffset::east_opt(7200).unwrap(),
            timezone: Some("Europe/Paris".to_string()),
            sunrise: Some("05:47".to_string()),
            sunset: Some("21:56".to_string()),
            samples: (0..24).map(|h| sample_at(date, h, temp)).collect(),
        }
    }

    fn controller(primary: Option<DayForecast>) -> ForecastController {
        ForecastController::new(
            Box::new(FakeSource { name: "primary", day: primary }),
            Scorer::default(),
            WindowMode::Hourly,
        )
        .with_clock(noon_utc)
    }

    #[test]
    fn test_tracker_only_latest_is_current() {
        let tracker = RequestTracker::new();
        let first = tracker.begin();
        assert!(tracker.is_current(first));
        let second = tracker.begin();
        assert!(!tracker.is_current(first));
        assert!(tracker.is_current(second));

        let shared = tracker.clone();
        let third = shared.begin();
        assert!(!tracker.is_current(second));
        assert!(tracker.is_current(third));
    }

    #[test]
    fn test_check_date_range() {
        assert!(check_date(today(), today(), 7).is_ok());
        assert!(check_date(today() + Duration::days(7), today(), 7).is_ok());
        assert!(check_date(today() + Duration::days(8), today(), 7).is_err());
        assert!(check_date(today() - Duration::days(1), today(), 7).is_err());
    }

    #[tokio::test]
    async fn test_today_starts_at_current_local_hour() {
        let c = controller(Some(day_forecast("primary", today(), 18.0)));
        let query = ForecastQuery::new(today(), 48.85, 2.35);
        let report = c.build_report(&query).await.unwrap();

        assert_eq!(report.windows.len(), 10);
        assert_eq!(report.windows[0].label, "14h");
        assert!(report.windows.iter().all(|w| w.hour >= 14));
        assert_eq!(report.sunrise.as_deref(), Some("05:47"));
        // identical hours: the earliest wins
        assert_eq!(report.best.as_ref().unwrap().label, "14h");
        assert!(report.is_best(0));
    }

    #[tokio::test]
    async fn test_future_day_keeps_all_hours() {
        let tomorrow = today().succ_opt().unwrap();
        let c = controller(Some(day_forecast("primary", tomorrow, 18.0)));
        let report = c.build_report(&ForecastQuery::new(tomorrow, 48.85, 2.35)).await.unwrap();
        assert_eq!(report.windows.len(), 24);
        assert_eq!(report.windows[0].label, "00h");
    }

    #[tokio::test]
    async fn test_secondary_is_aligned_and_merged() {
        let utc = FixedOffset::east_opt(0).unwrap();
        let mut secondary = day_forecast("secondary", today(), 14.0);
        secondary.utc_offset = utc;
        secondary.samples = secondary.samples.into_iter().map(|s: WeatherSample| s.in_offset(utc)).collect();
        let primary = day_forecast("primary", today(), 10.0);

        let c = controller(Some(primary))
            .with_secondary(Box::new(FakeSource { name: "secondary", day: Some(secondary) }));
        let report = c.build_report(&ForecastQuery::new(today(), 48.85, 2.35)).await.unwrap();

        assert_eq!(report.providers, vec!["primary", "secondary"]);
        assert_eq!(report.windows[0].label, "14h");
        assert_eq!(report.windows[0].sample.temperature_c, 12.0);
    }

    #[tokio::test]
    async fn test_secondary_failure_falls_back_to_primary() {
        let c = controller(Some(day_forecast("primary", today(), 18.0)))
            .with_secondary(Box::new(FakeSource { name: "secondary", day: None }));
        let report = c.build_report(&ForecastQuery::new(today(), 48.85, 2.35)).await.unwrap();
        assert_eq!(report.providers, vec!["primary"]);
        assert_eq!(report.windows.len(), 10);
    }

    #[tokio::test]
    async fn test_primary_failure_reaches_observer() {
        let c = controller(None);
        let recorder = Recorder::default();
        let outcome = c.forecast(&ForecastQuery::new(today(), 48.85, 2.35), &recorder).await;

        assert_eq!(outcome, RunOutcome::Failed);
        assert!(recorder.reports.lock().unwrap().is_empty());
        assert_eq!(recorder.errors.lock().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_superseded_request_is_dropped() {
        let c = controller(Some(day_forecast("primary", today(), 18.0)));
        let recorder = Recorder::default();
        let query = ForecastQuery::new(today(), 48.85, 2.35);

        let stale = c.tracker().begin();
        let fresh = c.tracker().begin();

        assert_eq!(c.run(stale, &query, &recorder).await, RunOutcome::Superseded);
        assert!(recorder.reports.lock().unwrap().is_empty());

        assert_eq!(c.run(fresh, &query, &recorder).await, RunOutcome::Delivered);
        assert_eq!(recorder.reports.lock().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_date_beyond_range_is_rejected() {
        let later = today() + Duration::days(12);
        let c = controller(Some(day_forecast("primary", later, 18.0)));
        let err = c.build_report(&ForecastQuery::new(later, 48.85, 2.35)).await.unwrap_err();
        assert!(matches!(err, ForecastError::DateOutOfRange { max_days: 7, .. }));
    }

    #[tokio::test]
    async fn test_today_after_last_hour_is_empty_report() {
        fn late_evening() -> DateTime<Utc> {
            Utc.with_ymd_and_hms(2026, 6, 15, 21, 59, 0).unwrap()
        }
        let mut day = day_forecast("primary", today(), 18.0);
        day.samples.truncate(20);
        let c = controller(Some(day)).with_clock(late_evening);
        let report = c.build_report(&ForecastQuery::new(today(), 48.85, 2.35)).await.unwrap();
        assert!(report.windows.is_empty());
        assert!(report.best.is_none());
    }
}
