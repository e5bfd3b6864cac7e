pub mod simple;
pub mod tips;
pub mod weighted;

use chrono::NaiveDate;
use serde::Serialize;

use crate::astro::{AstroContext, MoonPhase, PhaseTable, Season};
use crate::weather::{wind_cardinal, WeatherSample};
use weighted::WeightedConfig;

/// Traffic-light summary, ordered worst to best
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ColorTier {
    Red,
    Orange,
    Yellow,
    Green,
}

impl std::fmt::Display for ColorTier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ColorTier::Red => write!(f, "RED"),
            ColorTier::Orange => write!(f, "ORANGE"),
            ColorTier::Yellow => write!(f, "YELLOW"),
            ColorTier::Green => write!(f, "GREEN"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ConditionAssessment {
    pub score: f64,
    pub tier: ColorTier,
    /// Temperature, pressure, wind, precipitation, season, lunar, in that order
    pub tips: Vec<String>,
    pub season: Season,
    pub moon_phase: MoonPhase,
}

/// Sample values as the policies see them: negatives clamped to zero, direction resolved
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Conditions {
    pub temperature_c: f64,
    pub pressure_hpa: f64,
    pub wind_speed_kmh: f64,
    pub precipitation_mm: f64,
    pub cardinal: &'static str,
}

impl Conditions {
    pub fn from_sample(sample: &WeatherSample) -> Self {
        Self {
            temperature_c: sample.temperature_c,
            pressure_hpa: sample.pressure_hpa,
            // f64::max also maps NaN to 0
            wind_speed_kmh: sample.wind_speed_kmh.max(0.0),
            precipitation_mm: sample.precipitation_mm.max(0.0),
            cardinal: wind_cardinal(sample.wind_direction_deg),
        }
    }
}

/// How a sample is turned into a score and tier
#[derive(Debug, Clone, PartialEq)]
pub enum ScoringPolicy {
    /// Rule overrides decide a three-tier color; the score only ranks hours
    Simple,
    /// Summed points decide a four-tier color
    Weighted(WeightedConfig),
}

impl Default for ScoringPolicy {
    fn default() -> Self {
        ScoringPolicy::Weighted(WeightedConfig::default())
    }
}

impl ScoringPolicy {
    pub fn name(&self) -> &'static str {
        match self {
            ScoringPolicy::Simple => "simple",
            ScoringPolicy::Weighted(_) => "weighted",
        }
    }

    pub fn assess(&self, sample: &WeatherSample, ctx: &AstroContext) -> ConditionAssessment {
        let conditions = Conditions::from_sample(sample);
        match self {
            ScoringPolicy::Simple => simple::assess(&conditions, ctx),
            ScoringPolicy::Weighted(config) => config.assess(&conditions, ctx),
        }
    }
}

/// A policy paired with the lunar table it reads phases from
#[derive(Debug, Clone, Default)]
pub struct Scorer {
    pub policy: ScoringPolicy,
    pub phase_table: PhaseTable,
}

impl Scorer {
    pub fn new(policy: ScoringPolicy, phase_table: PhaseTable) -> Self {
        Self { policy, phase_table }
    }

    pub fn context(&self, date: NaiveDate, latitude: f64) -> AstroContext {
        AstroContext::for_date(date, latitude, &self.phase_table)
    }

    /// Score one sample for the query date at the given latitude
    pub fn score(&self, sample: &WeatherSample, date: NaiveDate, latitude: f64) -> ConditionAssessment {
        self.policy.assess(sample, &self.context(date, latitude))
    }
}

/// First rung whose inclusive upper bound is >= `value`, else `otherwise`
pub(crate) fn ladder<T: Copy>(value: f64, rungs: &[(f64, T)], otherwise: T) -> T {
    rungs
        .iter()
        .find(|(bound, _)| value <= *bound)
        .map(|(_, item)| *item)
        .unwrap_or(otherwise)
}
