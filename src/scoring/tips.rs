//! Fixed advisory text shown alongside each assessment.

use super::weighted::{PressureBucket, RainBucket, TemperatureBucket, WindBucket};
use crate::astro::{MoonPhase, Season, SolunarActivity};

pub fn temperature(bucket: TemperatureBucket) -> &'static str {
    match bucket {
        TemperatureBucket::VeryCold => "🥶 Very cold water, fish are sluggish",
        TemperatureBucket::Cold => "🌡️ Cold water, slow down your presentations",
        TemperatureBucket::Ideal => "✅ Ideal temperature",
        TemperatureBucket::Hot => "🔥 Warm water, fish hold deeper",
    }
}

pub fn pressure(bucket: PressureBucket) -> &'static str {
    match bucket {
        PressureBucket::Low => "📉 Low pressure, favorable",
        PressureBucket::Stable => "➖ Stable pressure",
        PressureBucket::High => "📈 High pressure, fish less active",
    }
}

pub fn wind(bucket: WindBucket, cardinal: &str) -> String {
    match bucket {
        WindBucket::Light => format!("💨 Light wind from the {}", cardinal),
        WindBucket::Moderate => format!("💨 Moderate wind from the {}, fish the windward bank", cardinal),
        WindBucket::Strong => format!("🌬️ Strong wind from the {}, look for sheltered water", cardinal),
    }
}

pub fn precipitation(bucket: RainBucket) -> &'static str {
    match bucket {
        RainBucket::None => "☀️ No rain",
        RainBucket::Light => "🌦️ Light rain, can trigger feeding",
        RainBucket::Heavy => "🌧️ Heavy rain, expect murky water",
    }
}

pub fn season(season: Season) -> &'static str {
    match season {
        Season::Spring => {
            "🌱 Spring: fish move into the shallows to spawn. Check closed seasons and release spawning fish."
        }
        Season::Summer => {
            "☀️ Summer: fish early morning and late evening, fish seek cool deep water at midday."
        }
        Season::Autumn => {
            "🍂 Autumn: fish feed heavily before winter, activity holds through the day."
        }
        Season::Winter => {
            "❄️ Winter: fish are slow, target the warmest hours and fish slowly near the bottom."
        }
    }
}

pub fn lunar(phase: MoonPhase, activity: SolunarActivity) -> String {
    match activity {
        SolunarActivity::Major => format!("🌙 {} (major solunar activity)", phase),
        SolunarActivity::Minor => format!("🌙 {} (minor solunar activity)", phase),
    }
}

// Short forms used by the simple policy

pub const VERY_COLD_WATER: &str = "🥶 Very cold water";
pub const COLD_WATER: &str = "🌡️ Cold water";
pub const IDEAL_TEMPERATURE: &str = "✅ Ideal temperature";
pub const WARM_WATER: &str = "🔥 Warm water";
pub const LOW_PRESSURE: &str = "📉 Low pressure, favorable";
pub const HIGH_PRESSURE: &str = "📈 High pressure";

pub fn wind_short(cardinal: &str) -> String {
    format!("💨 Wind {}", cardinal)
}

pub fn lunar_short(phase: MoonPhase) -> String {
    format!("🌙 {}", phase)
}
