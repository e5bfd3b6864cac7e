use anyhow::{bail, Result};
use serde::{Deserialize, Serialize};

use super::{ladder, tips, ColorTier, Conditions, ConditionAssessment};
use crate::astro::{AstroContext, Season, SolunarActivity};

/// Upper bounds (inclusive) of the temperature buckets for one season; above `ideal` is hot
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TemperatureBands {
    pub very_cold: f64,
    pub cold: f64,
    pub ideal: f64,
}

impl TemperatureBands {
    pub const fn new(very_cold: f64, cold: f64, ideal: f64) -> Self {
        Self { very_cold, cold, ideal }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SeasonalTemperatures {
    pub spring: TemperatureBands,
    pub summer: TemperatureBands,
    pub autumn: TemperatureBands,
    pub winter: TemperatureBands,
}

impl Default for SeasonalTemperatures {
    fn default() -> Self {
        Self {
            spring: TemperatureBands::new(8.0, 12.0, 20.0),
            summer: TemperatureBands::new(12.0, 16.0, 24.0),
            autumn: TemperatureBands::new(8.0, 12.0, 20.0),
            winter: TemperatureBands::new(4.0, 8.0, 14.0),
        }
    }
}

impl SeasonalTemperatures {
    pub fn for_season(&self, season: Season) -> &TemperatureBands {
        match season {
            Season::Spring => &self.spring,
            Season::Summer => &self.summer,
            Season::Autumn => &self.autumn,
            Season::Winter => &self.winter,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TemperaturePoints {
    pub very_cold: f64,
    pub cold: f64,
    pub ideal: f64,
    pub hot: f64,
}

impl Default for TemperaturePoints {
    fn default() -> Self {
        Self { very_cold: 0.0, cold: 1.0, ideal: 3.0, hot: 1.0 }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PressureBands {
    pub low_max: f64,
    pub stable_max: f64,
    pub low_points: f64,
    pub stable_points: f64,
    pub high_points: f64,
}

impl Default for PressureBands {
    fn default() -> Self {
        Self { low_max: 1009.0, stable_max: 1020.0, low_points: 2.0, stable_points: 1.0, high_points: 0.0 }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WindBands {
    pub light_max: f64,
    pub moderate_max: f64,
    pub light_points: f64,
    pub moderate_points: f64,
    pub strong_points: f64,
}

impl Default for WindBands {
    fn default() -> Self {
        Self { light_max: 5.0, moderate_max: 15.0, light_points: 2.0, moderate_points: 1.0, strong_points: 0.0 }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PrecipitationBands {
    pub none_max: f64,
    pub light_max: f64,
    pub none_points: f64,
    pub light_points: f64,
    pub heavy_points: f64,
}

impl Default for PrecipitationBands {
    fn default() -> Self {
        Self { none_max: 0.0, light_max: 2.0, none_points: 2.0, light_points: 1.0, heavy_points: 0.0 }
    }
}

/// Minimum score (inclusive) for each tier; below `orange` is red
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TierThresholds {
    pub green: f64,
    pub yellow: f64,
    pub orange: f64,
}

impl Default for TierThresholds {
    fn default() -> Self {
        Self { green: 9.0, yellow: 7.0, orange: 4.0 }
    }
}

impl TierThresholds {
    pub fn tier(&self, score: f64) -> ColorTier {
        if score >= self.green {
            ColorTier::Green
        } else if score >= self.yellow {
            ColorTier::Yellow
        } else if score >= self.orange {
            ColorTier::Orange
        } else {
            ColorTier::Red
        }
    }
}

/// Point-based policy: every factor contributes points, the sum picks one of four tiers
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WeightedConfig {
    pub temperature: SeasonalTemperatures,
    pub temperature_points: TemperaturePoints,
    pub pressure: PressureBands,
    pub wind: WindBands,
    pub precipitation: PrecipitationBands,
    pub tiers: TierThresholds,
    /// Add solunar points on top of the weather score
    pub lunar_bonus: bool,
    pub major_bonus: f64,
    pub minor_bonus: f64,
}

impl Default for WeightedConfig {
    fn default() -> Self {
        Self {
            temperature: SeasonalTemperatures::default(),
            temperature_points: TemperaturePoints::default(),
            pressure: PressureBands::default(),
            wind: WindBands::default(),
            precipitation: PrecipitationBands::default(),
            tiers: TierThresholds::default(),
            lunar_bonus: false,
            major_bonus: 1.0,
            minor_bonus: 0.5,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TemperatureBucket {
    VeryCold,
    Cold,
    Ideal,
    Hot,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PressureBucket {
    Low,
    Stable,
    High,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WindBucket {
    Light,
    Moderate,
    Strong,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RainBucket {
    None,
    Light,
    Heavy,
}

impl WeightedConfig {
    pub fn validate(&self) -> Result<()> {
        for season in [Season::Spring, Season::Summer, Season::Autumn, Season::Winter] {
            let b = self.temperature.for_season(season);
            if !(b.very_cold <= b.cold && b.cold <= b.ideal) {
                bail!("{} temperature bands must ascend: very_cold <= cold <= ideal", season);
            }
        }
        if self.pressure.low_max > self.pressure.stable_max {
            bail!("pressure low_max must not exceed stable_max");
        }
        if self.wind.light_max > self.wind.moderate_max {
            bail!("wind light_max must not exceed moderate_max");
        }
        if self.precipitation.none_max > self.precipitation.light_max {
            bail!("precipitation none_max must not exceed light_max");
        }
        let t = &self.tiers;
        if !(t.green >= t.yellow && t.yellow >= t.orange) {
            bail!("tier thresholds must descend: green >= yellow >= orange");
        }
        let negative_points = [
            self.temperature_points.very_cold, self.temperature_points.cold,
            self.temperature_points.ideal, self.temperature_points.hot,
            self.pressure.low_points, self.pressure.stable_points, self.pressure.high_points,
            self.wind.light_points, self.wind.moderate_points, self.wind.strong_points,
            self.precipitation.none_points, self.precipitation.light_points,
            self.precipitation.heavy_points, self.major_bonus, self.minor_bonus,
        ]
        .iter()
        .any(|p| *p < 0.0);
        if negative_points {
            bail!("points must be non-negative");
        }
        Ok(())
    }

    pub fn temperature_bucket(&self, season: Season, temperature_c: f64) -> TemperatureBucket {
        let b = self.temperature.for_season(season);
        ladder(
            temperature_c,
            &[
                (b.very_cold, TemperatureBucket::VeryCold),
                (b.cold, TemperatureBucket::Cold),
                (b.ideal, TemperatureBucket::Ideal),
            ],
            TemperatureBucket::Hot,
        )
    }

    pub fn pressure_bucket(&self, pressure_hpa: f64) -> PressureBucket {
        ladder(
            pressure_hpa,
            &[(self.pressure.low_max, PressureBucket::Low), (self.pressure.stable_max, PressureBucket::Stable)],
            PressureBucket::High,
        )
    }

    pub fn wind_bucket(&self, speed_kmh: f64) -> WindBucket {
        ladder(
            speed_kmh,
            &[(self.wind.light_max, WindBucket::Light), (self.wind.moderate_max, WindBucket::Moderate)],
            WindBucket::Strong,
        )
    }

    pub fn rain_bucket(&self, precipitation_mm: f64) -> RainBucket {
        ladder(
            precipitation_mm,
            &[(self.precipitation.none_max, RainBucket::None), (self.precipitation.light_max, RainBucket::Light)],
            RainBucket::Heavy,
        )
    }

    pub fn assess(&self, conditions: &Conditions, ctx: &AstroContext) -> ConditionAssessment {
        let mut tips = Vec::with_capacity(6);
        let mut score = 0.0;

        let temp = self.temperature_bucket(ctx.season, conditions.temperature_c);
        let tp = &self.temperature_points;
        score += match temp {
            TemperatureBucket::VeryCold => tp.very_cold,
            TemperatureBucket::Cold => tp.cold,
            TemperatureBucket::Ideal => tp.ideal,
            TemperatureBucket::Hot => tp.hot,
        };
        tips.push(tips::temperature(temp).to_string());

        let pressure = self.pressure_bucket(conditions.pressure_hpa);
        score += match pressure {
            PressureBucket::Low => self.pressure.low_points,
            PressureBucket::Stable => self.pressure.stable_points,
            PressureBucket::High => self.pressure.high_points,
        };
        tips.push(tips::pressure(pressure).to_string());

        let wind = self.wind_bucket(conditions.wind_speed_kmh);
        score += match wind {
            WindBucket::Light => self.wind.light_points,
            WindBucket::Moderate => self.wind.moderate_points,
            WindBucket::Strong => self.wind.strong_points,
        };
        tips.push(tips::wind(wind, conditions.cardinal));

        let rain = self.rain_bucket(conditions.precipitation_mm);
        score += match rain {
            RainBucket::None => self.precipitation.none_points,
            RainBucket::Light => self.precipitation.light_points,
            RainBucket::Heavy => self.precipitation.heavy_points,
        };
        tips.push(tips::precipitation(rain).to_string());

        tips.push(tips::season(ctx.season).to_string());
        tips.push(tips::lunar(ctx.moon_phase, ctx.solunar));

        if self.lunar_bonus {
            score += match ctx.solunar {
                SolunarActivity::Major => self.major_bonus,
                SolunarActivity::Minor => self.minor_bonus,
            };
        }

        ConditionAssessment {
            score,
            tier: self.tiers.tier(score),
            tips,
            season: ctx.season,
            moon_phase: ctx.moon_phase,
        }
    }
}
