use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use serde::{Deserialize, Serialize};

/// Mean length of a lunation in days
pub const SYNODIC_PERIOD_DAYS: f64 = 29.53058867;

/// 2000-01-06T18:14:00Z, a known new moon, as unix seconds
pub const REFERENCE_NEW_MOON_UNIX: i64 = 947_182_440;

const MS_PER_DAY: f64 = 86_400_000.0;

/// Fractions above this wrap back to a new moon
const NEW_MOON_WRAP: f64 = 0.97;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MoonPhase {
    NewMoon,
    FirstQuarter,
    WaxingGibbous,
    FullMoon,
    WaningGibbous,
    LastQuarter,
}

impl std::fmt::Display for MoonPhase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            MoonPhase::NewMoon => write!(f, "New moon"),
            MoonPhase::FirstQuarter => write!(f, "First quarter"),
            MoonPhase::WaxingGibbous => write!(f, "Waxing gibbous"),
            MoonPhase::FullMoon => write!(f, "Full moon"),
            MoonPhase::WaningGibbous => write!(f, "Waning gibbous"),
            MoonPhase::LastQuarter => write!(f, "Last quarter"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SolunarActivity {
    Major,
    Minor,
}

pub fn solunar_activity(phase: MoonPhase) -> SolunarActivity {
    match phase {
        MoonPhase::NewMoon | MoonPhase::FullMoon => SolunarActivity::Major,
        _ => SolunarActivity::Minor,
    }
}

/// Which phase table to classify with
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PhaseTableKind {
    #[default]
    Simple,
    Fine,
}

/// Ordered `(exclusive upper bound, phase)` rows; anything past the last row is a new moon.
#[derive(Debug, Clone, PartialEq)]
pub struct PhaseTable {
    rows: Vec<(f64, MoonPhase)>,
}

impl PhaseTable {
    /// Four labels
    pub fn simple() -> Self {
        Self {
            rows: vec![
                (0.03, MoonPhase::NewMoon),
                (0.22, MoonPhase::FirstQuarter),
                (0.47, MoonPhase::FullMoon),
                (0.72, MoonPhase::LastQuarter),
            ],
        }
    }

    /// Six labels, adding the gibbous phases at 0.28 and 0.53
    pub fn fine() -> Self {
        Self {
            rows: vec![
                (0.03, MoonPhase::NewMoon),
                (0.22, MoonPhase::FirstQuarter),
                (0.28, MoonPhase::WaxingGibbous),
                (0.47, MoonPhase::FullMoon),
                (0.53, MoonPhase::WaningGibbous),
                (0.72, MoonPhase::LastQuarter),
            ],
        }
    }

    pub fn from_kind(kind: PhaseTableKind) -> Self {
        match kind {
            PhaseTableKind::Simple => Self::simple(),
            PhaseTableKind::Fine => Self::fine(),
        }
    }

    pub fn classify(&self, fraction: f64) -> MoonPhase {
        if fraction > NEW_MOON_WRAP {
            return MoonPhase::NewMoon;
        }
        self.rows
            .iter()
            .find(|(bound, _)| fraction < *bound)
            .map(|(_, phase)| *phase)
            .unwrap_or(MoonPhase::NewMoon)
    }
}

impl Default for PhaseTable {
    fn default() -> Self {
        Self::simple()
    }
}

/// Position in the current lunation, in `[0, 1)`
pub fn phase_fraction(instant: DateTime<Utc>) -> f64 {
    let elapsed_ms = instant.timestamp_millis() - REFERENCE_NEW_MOON_UNIX * 1000;
    let days = elapsed_ms as f64 / MS_PER_DAY;
    let fraction = days.rem_euclid(SYNODIC_PERIOD_DAYS) / SYNODIC_PERIOD_DAYS;
    // rem_euclid can round up to the period itself for tiny negative inputs
    if fraction >= 1.0 { 0.0 } else { fraction }
}

pub fn moon_phase(instant: DateTime<Utc>, table: &PhaseTable) -> MoonPhase {
    table.classify(phase_fraction(instant))
}

/// A calendar date is evaluated at 12:00 UTC
pub fn date_instant(date: NaiveDate) -> DateTime<Utc> {
    date.and_time(NaiveTime::MIN).and_utc() + chrono::Duration::hours(12)
}

pub fn moon_phase_on(date: NaiveDate, table: &PhaseTable) -> MoonPhase {
    moon_phase(date_instant(date), table)
}
