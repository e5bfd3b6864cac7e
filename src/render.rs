use std::fmt::Write;

use tracing::warn;

use crate::error::ForecastError;
use crate::forecast::{ForecastObserver, ForecastQuery, ForecastReport};
use crate::weather::weather_label;
use crate::windows::DayWindow;

/// Prints reports to stdout as cards, or as JSON
pub struct TerminalRenderer {
    pub details: bool,
    pub json: bool,
}

impl ForecastObserver for TerminalRenderer {
    fn on_report(&self, report: &ForecastReport) {
        if self.json {
            match serde_json::to_string_pretty(report) {
                Ok(json) => println!("{}", json),
                Err(e) => warn!("Failed to serialize report: {}", e),
            }
        } else {
            print!("{}", format_report(report, self.details));
        }
    }

    fn on_error(&self, query: &ForecastQuery, error: &ForecastError) {
        warn!("Forecast for {} failed: {}", query.date, error);
        eprintln!("\n⚠️  {}: {}", error.user_message(), error);
    }
}

pub fn format_report(report: &ForecastReport, details: bool) -> String {
    let mut out = String::new();
    let q = &report.query;
    let place = q
        .place
        .clone()
        .unwrap_or_else(|| format!("{:.4}, {:.4}", q.latitude, q.longitude));

    let _ = writeln!(out, "\n🎣 {} | {}", place, q.date.format("%d-%m-%Y"));
    let _ = writeln!(
        out,
        "   🌅 {} / 🌇 {} ({})  |  {} policy  |  {}",
        report.sunrise.as_deref().unwrap_or("--:--"),
        report.sunset.as_deref().unwrap_or("--:--"),
        report.timezone.as_deref().unwrap_or("local time"),
        report.policy,
        report.providers.join(" + ")
    );

    if report.windows.is_empty() {
        let _ = writeln!(out, "\n   No remaining hours to score for this day.");
        return out;
    }

    let _ = writeln!(out);
    for (i, window) in report.windows.iter().enumerate() {
        let _ = writeln!(out, "{}", card_line(window, report.is_best(i)));
        if details {
            write_tips(&mut out, window);
        }
    }

    if !details {
        if let Some(best) = report.best_window() {
            let _ = writeln!(out, "\n⭐ Best time: {} ({})", best.label, best.assessment.season);
            write_tips(&mut out, best);
        }
    }

    out
}

fn card_line(window: &DayWindow, best: bool) -> String {
    let s = &window.sample;
    let a = &window.assessment;
    format!(
        "{:<9}{} {:<18} {:>5.1}°C {:>5.1} km/h {:<10} {:>4.1} mm {:>7.1} hPa  {:>4.1} {}",
        window.label,
        if best { " ★" } else { "  " },
        weather_label(s.weather_code),
        s.temperature_c,
        s.wind_speed_kmh,
        s.cardinal(),
        s.precipitation_mm,
        s.pressure_hpa,
        a.score,
        a.tier,
    )
}

fn write_tips(out: &mut String, window: &DayWindow) {
    for tip in &window.assessment.tips {
        let _ = writeln!(out, "      • {}", tip);
    }
}
