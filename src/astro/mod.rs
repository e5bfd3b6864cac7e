pub mod moon;
pub mod season;

use chrono::NaiveDate;
use serde::Serialize;

pub use moon::{MoonPhase, PhaseTable, PhaseTableKind, SolunarActivity};
pub use season::{Hemisphere, Season};

/// Season and lunar context for one query date and place
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct AstroContext {
    pub season: Season,
    pub moon_phase: MoonPhase,
    pub phase_fraction: f64,
    pub solunar: SolunarActivity,
}

impl AstroContext {
    pub fn for_date(date: NaiveDate, latitude: f64, table: &PhaseTable) -> Self {
        let fraction = moon::phase_fraction(moon::date_instant(date));
        let moon_phase = table.classify(fraction);
        Self {
            season: season::season(date, Hemisphere::from_latitude(latitude)),
            moon_phase,
            phase_fraction: fraction,
            solunar: moon::solunar_activity(moon_phase),
        }
    }
}
