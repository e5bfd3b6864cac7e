use super::{tips, ColorTier, Conditions, ConditionAssessment};
use crate::astro::{AstroContext, Season, SolunarActivity};

const VERY_COLD_BELOW: f64 = 8.0;
const COLD_BELOW: f64 = 12.0;
const IDEAL_MAX: f64 = 22.0;
const LOW_PRESSURE_BELOW: f64 = 1010.0;
const HIGH_PRESSURE_ABOVE: f64 = 1020.0;
const CALM_WIND_MAX: f64 = 15.0;

/// Three-tier rule policy. The color starts green and individual rules override it:
/// very cold water is red, cold or warm water is orange, high pressure and winter both turn
/// green into orange. Stable pressure emits no tip and precipitation is not considered.
pub fn assess(conditions: &Conditions, ctx: &AstroContext) -> ConditionAssessment {
    let mut tier = ColorTier::Green;
    let mut tips = Vec::with_capacity(4);
    let temp = conditions.temperature_c;

    if temp < VERY_COLD_BELOW {
        tips.push(tips::VERY_COLD_WATER.to_string());
        tier = ColorTier::Red;
    } else if temp < COLD_BELOW {
        tips.push(tips::COLD_WATER.to_string());
        tier = ColorTier::Orange;
    } else if temp <= IDEAL_MAX {
        tips.push(tips::IDEAL_TEMPERATURE.to_string());
    } else {
        tips.push(tips::WARM_WATER.to_string());
        tier = ColorTier::Orange;
    }

    if conditions.pressure_hpa < LOW_PRESSURE_BELOW {
        tips.push(tips::LOW_PRESSURE.to_string());
    } else if conditions.pressure_hpa > HIGH_PRESSURE_ABOVE {
        tips.push(tips::HIGH_PRESSURE.to_string());
        if tier == ColorTier::Green {
            tier = ColorTier::Orange;
        }
    }

    tips.push(tips::wind_short(conditions.cardinal));
    tips.push(tips::lunar_short(ctx.moon_phase));

    if ctx.season == Season::Winter && tier == ColorTier::Green {
        tier = ColorTier::Orange;
    }

    ConditionAssessment {
        score: hour_score(conditions, ctx.solunar),
        tier,
        tips,
        season: ctx.season,
        moon_phase: ctx.moon_phase,
    }
}

/// Ranking score used to pick the best hour; unrelated to the color rules above
pub fn hour_score(conditions: &Conditions, solunar: SolunarActivity) -> f64 {
    let mut score = 0.0;
    let temp = conditions.temperature_c;

    if (COLD_BELOW..=IDEAL_MAX).contains(&temp) {
        score += 4.0;
    } else if temp >= VERY_COLD_BELOW {
        score += 2.0;
    }

    let pressure = conditions.pressure_hpa;
    if (LOW_PRESSURE_BELOW..=HIGH_PRESSURE_ABOVE).contains(&pressure) {
        score += 3.0;
    } else if pressure < LOW_PRESSURE_BELOW {
        score += 2.0;
    }

    if conditions.wind_speed_kmh <= CALM_WIND_MAX {
        score += 2.0;
    }

    if solunar == SolunarActivity::Major {
        score += 2.0;
    }

    score
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::astro::MoonPhase;

    fn ctx(season: Season, moon_phase: MoonPhase) -> AstroContext {
        AstroContext {
            season,
            moon_phase,
            phase_fraction: 0.1,
            solunar: crate::astro::moon::solunar_activity(moon_phase),
        }
    }

    fn conditions(temperature_c: f64, pressure_hpa: f64, wind_speed_kmh: f64) -> Conditions {
        Conditions {
            temperature_c,
            pressure_hpa,
            wind_speed_kmh,
            precipitation_mm: 0.0,
            cardinal: "South-West",
        }
    }

    #[test]
    fn test_temperature_overrides() {
        let summer = ctx(Season::Summer, MoonPhase::FirstQuarter);
        assert_eq!(assess(&conditions(5.0, 1015.0, 5.0), &summer).tier, ColorTier::Red);
        assert_eq!(assess(&conditions(10.0, 1015.0, 5.0), &summer).tier, ColorTier::Orange);
        assert_eq!(assess(&conditions(18.0, 1015.0, 5.0), &summer).tier, ColorTier::Green);
        assert_eq!(assess(&conditions(22.0, 1015.0, 5.0), &summer).tier, ColorTier::Green);
        assert_eq!(assess(&conditions(25.0, 1015.0, 5.0), &summer).tier, ColorTier::Orange);
    }

    #[test]
    fn test_high_pressure_and_winter_downgrade_green_only() {
        let summer = ctx(Season::Summer, MoonPhase::FirstQuarter);
        let winter = ctx(Season::Winter, MoonPhase::FirstQuarter);
        assert_eq!(assess(&conditions(18.0, 1025.0, 5.0), &summer).tier, ColorTier::Orange);
        assert_eq!(assess(&conditions(18.0, 1015.0, 5.0), &winter).tier, ColorTier::Orange);
        // red stays red
        assert_eq!(assess(&conditions(5.0, 1025.0, 5.0), &winter).tier, ColorTier::Red);
    }

    #[test]
    fn test_tips_order_and_content() {
        let a = assess(&conditions(18.0, 1005.0, 5.0), &ctx(Season::Summer, MoonPhase::FullMoon));
        assert_eq!(
            a.tips,
            vec![
                tips::IDEAL_TEMPERATURE.to_string(),
                tips::LOW_PRESSURE.to_string(),
                "💨 Wind South-West".to_string(),
                "🌙 Full moon".to_string(),
            ]
        );

        let stable = assess(&conditions(18.0, 1015.0, 5.0), &ctx(Season::Summer, MoonPhase::FullMoon));
        assert_eq!(stable.tips.len(), 3, "stable pressure has no tip");
    }

    #[test]
    fn test_hour_score() {
        assert_eq!(hour_score(&conditions(18.0, 1015.0, 10.0), SolunarActivity::Major), 11.0);
        assert_eq!(hour_score(&conditions(18.0, 1015.0, 10.0), SolunarActivity::Minor), 9.0);
        assert_eq!(hour_score(&conditions(9.0, 1005.0, 20.0), SolunarActivity::Minor), 4.0);
        assert_eq!(hour_score(&conditions(30.0, 1030.0, 20.0), SolunarActivity::Minor), 2.0);
        assert_eq!(hour_score(&conditions(2.0, 1030.0, 20.0), SolunarActivity::Minor), 0.0);
    }
}
