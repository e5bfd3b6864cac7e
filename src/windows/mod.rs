use chrono::{NaiveDate, Timelike};
use serde::Serialize;
use tracing::debug;

use crate::scoring::{ConditionAssessment, Scorer};
use crate::weather::WeatherSample;

/// A fixed block of hours, `[start_hour, end_hour)`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Slot {
    pub start_hour: u32,
    pub end_hour: u32,
}

impl Slot {
    pub const fn new(start_hour: u32, end_hour: u32) -> Self {
        Self { start_hour, end_hour }
    }

    pub fn contains(&self, hour: u32) -> bool {
        hour >= self.start_hour && hour < self.end_hour
    }

    pub fn label(&self) -> String {
        format!("{:02}h–{:02}h", self.start_hour, self.end_hour)
    }
}

const DEFAULT_SLOTS: [Slot; 6] = [
    Slot::new(4, 7),
    Slot::new(7, 10),
    Slot::new(10, 13),
    Slot::new(13, 16),
    Slot::new(16, 19),
    Slot::new(19, 22),
];

#[derive(Debug, Clone, PartialEq)]
pub enum WindowMode {
    Hourly,
    Slots(Vec<Slot>),
}

impl WindowMode {
    pub fn default_slots() -> Self {
        WindowMode::Slots(DEFAULT_SLOTS.to_vec())
    }
}

/// A scored unit of the day
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DayWindow {
    pub label: String,
    /// Hour of the representative sample
    pub hour: u32,
    pub sample: WeatherSample,
    pub assessment: ConditionAssessment,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BestWindow {
    pub index: usize,
    pub label: String,
    pub score: f64,
}

/// Samples that may be scored for `date`. When `current_hour` is set the date is today and
/// earlier hours are dropped.
pub fn eligible_samples<'a>(
    samples: &'a [WeatherSample],
    date: NaiveDate,
    current_hour: Option<u32>,
) -> impl Iterator<Item = &'a WeatherSample> + 'a {
    samples.iter().filter(move |s| {
        s.timestamp.date_naive() == date
            && current_hour.map_or(true, |now| s.timestamp.hour() >= now)
    })
}

/// Window labels with their representative samples, chronological
pub fn build_windows<'a>(
    samples: &'a [WeatherSample],
    date: NaiveDate,
    current_hour: Option<u32>,
    mode: &WindowMode,
) -> Vec<(String, &'a WeatherSample)> {
    let eligible: Vec<&WeatherSample> = eligible_samples(samples, date, current_hour).collect();

    match mode {
        WindowMode::Hourly => eligible
            .into_iter()
            .map(|s| (format!("{:02}h", s.timestamp.hour()), s))
            .collect(),
        WindowMode::Slots(slots) => slots
            .iter()
            .filter_map(|slot| {
                eligible
                    .iter()
                    .find(|s| slot.contains(s.timestamp.hour()))
                    .map(|s| (slot.label(), *s))
            })
            .collect(),
    }
}

/// Build and score every eligible window of the day
pub fn score_day(
    samples: &[WeatherSample],
    date: NaiveDate,
    current_hour: Option<u32>,
    mode: &WindowMode,
    scorer: &Scorer,
    latitude: f64,
) -> Vec<DayWindow> {
    let ctx = scorer.context(date, latitude);
    let windows: Vec<DayWindow> = build_windows(samples, date, current_hour, mode)
        .into_iter()
        .map(|(label, sample)| DayWindow {
            label,
            hour: sample.timestamp.hour(),
            sample: sample.clone(),
            assessment: scorer.policy.assess(sample, &ctx),
        })
        .collect();

    debug!(
        "{} of {} samples form {} windows for {}",
        eligible_samples(samples, date, current_hour).count(),
        samples.len(),
        windows.len(),
        date
    );
    windows
}

/// Index of the first maximum; later ties never replace an earlier best
pub fn best_index<I>(scores: I) -> Option<usize>
where
    I: IntoIterator<Item = f64>,
{
    let mut best: Option<(usize, f64)> = None;
    for (i, score) in scores.into_iter().enumerate() {
        if score.is_nan() {
            continue;
        }
        if best.map_or(true, |(_, best_score)| score > best_score) {
            best = Some((i, score));
        }
    }
    best.map(|(i, _)| i)
}

pub fn pick_best_window(windows: &[DayWindow]) -> Option<BestWindow> {
    let index = best_index(windows.iter().map(|w| w.assessment.score))?;
    let window = &windows[index];
    Some(BestWindow {
        index,
        label: window.label.clone(),
        score: window.assessment.score,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::astro::PhaseTable;
    use crate::scoring::ScoringPolicy;
    use crate::weather::test_support::sample_at;

    fn day() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 6, 15).unwrap()
    }

    fn full_day() -> Vec<WeatherSample> {
        (0..24).map(|h| sample_at(day(), h, 10.0 + h as f64 * 0.5)).collect()
    }

    #[test]
    fn test_first_maximum_wins_ties() {
        assert_eq!(best_index([3.0, 7.0, 5.0, 7.0]), Some(1));
        assert_eq!(best_index([2.0, 2.0, 2.0]), Some(0));
        assert_eq!(best_index([1.0, 4.0, 9.0]), Some(2));
        assert_eq!(best_index(Vec::<f64>::new()), None);
    }

    #[test]
    fn test_nan_never_beats_a_score() {
        assert_eq!(best_index([f64::NAN, 1.0]), Some(1));
        assert_eq!(best_index([1.0, f64::NAN]), Some(0));
    }

    #[test]
    fn test_today_excludes_past_hours() {
        let samples = full_day();
        let hours: Vec<u32> = eligible_samples(&samples, day(), Some(14))
            .map(|s| s.timestamp.hour())
            .collect();
        assert!(!hours.contains(&10));
        assert_eq!(hours.first(), Some(&14));
        assert_eq!(hours.len(), 10);

        // future days keep every hour
        assert_eq!(eligible_samples(&samples, day(), None).count(), 24);
    }

    #[test]
    fn test_other_dates_are_excluded() {
        let mut samples = full_day();
        samples.push(sample_at(day().succ_opt().unwrap(), 0, 15.0));
        assert_eq!(eligible_samples(&samples, day(), None).count(), 24);
    }

    #[test]
    fn test_hourly_labels() {
        let samples = full_day();
        let windows = build_windows(&samples, day(), Some(21), &WindowMode::Hourly);
        let labels: Vec<&str> = windows.iter().map(|(l, _)| l.as_str()).collect();
        assert_eq!(labels, vec!["21h", "22h", "23h"]);
    }

    #[test]
    fn test_slots_use_first_remaining_hour() {
        let samples = full_day();
        let windows = build_windows(&samples, day(), None, &WindowMode::default_slots());
        assert_eq!(windows.len(), 6);
        assert_eq!(windows[1].0, "07h–10h");
        assert_eq!(windows[1].1.timestamp.hour(), 7);

        let windows = build_windows(&samples, day(), Some(8), &WindowMode::default_slots());
        assert_eq!(windows[0].0, "07h–10h");
        assert_eq!(windows[0].1.timestamp.hour(), 8);
        assert_eq!(windows.len(), 5);
    }

    #[test]
    fn test_slots_without_samples_are_skipped() {
        let samples = vec![sample_at(day(), 11, 15.0), sample_at(day(), 20, 15.0)];
        let windows = build_windows(&samples, day(), None, &WindowMode::default_slots());
        let labels: Vec<&str> = windows.iter().map(|(l, _)| l.as_str()).collect();
        assert_eq!(labels, vec!["10h–13h", "19h–22h"]);
    }

    #[test]
    fn test_score_day_and_pick_best() {
        // ideal summer band is (16, 24]; 18 °C scores above the rest
        let samples = vec![
            sample_at(day(), 6, 14.0),
            sample_at(day(), 7, 18.0),
            sample_at(day(), 8, 18.0),
            sample_at(day(), 9, 26.0),
        ];
        let windows = score_day(&samples, day(), None, &WindowMode::Hourly, &Scorer::default(), 48.85);
        assert_eq!(windows.len(), 4);
        let best = pick_best_window(&windows).unwrap();
        assert_eq!(best.index, 1);
        assert_eq!(best.label, "07h");
        assert_eq!(best.score, windows[1].assessment.score);
    }

    #[test]
    fn test_no_eligible_windows_means_no_best() {
        let samples = full_day();
        let windows = score_day(&samples, day(), Some(24), &WindowMode::Hourly, &Scorer::default(), 48.85);
        assert!(windows.is_empty());
        assert!(pick_best_window(&windows).is_none());
    }

    #[test]
    fn test_simple_policy_ranks_with_hour_score() {
        let samples = vec![sample_at(day(), 6, 9.0), sample_at(day(), 7, 15.0)];
        let scorer = Scorer::new(ScoringPolicy::Simple, PhaseTable::simple());
        let windows = score_day(&samples, day(), None, &WindowMode::Hourly, &scorer, 48.85);
        assert_eq!(pick_best_window(&windows).unwrap().label, "07h");
    }
}
