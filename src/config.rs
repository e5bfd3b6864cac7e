use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::{debug, info};

use crate::astro::{PhaseTable, PhaseTableKind};
use crate::scoring::weighted::WeightedConfig;
use crate::scoring::{Scorer, ScoringPolicy};
use crate::windows::WindowMode;

const CONFIG_FILE: &str = "fishing_forecast.toml";
const CONFIG_ENV: &str = "FISHING_FORECAST_CONFIG";

/// Application configuration loaded from fishing_forecast.toml
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub scoring: ScoringSettings,
    #[serde(default)]
    pub forecast: ForecastSettings,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum PolicyKind {
    /// Rule-override tiers (green / orange / red)
    Simple,
    /// Summed points with four tiers
    #[default]
    Weighted,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WindowModeKind {
    #[default]
    Hourly,
    Slots,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ScoringSettings {
    #[serde(default)]
    pub policy: PolicyKind,
    #[serde(default)]
    pub phase_table: PhaseTableKind,
    #[serde(default)]
    pub weighted: WeightedConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ForecastSettings {
    #[serde(default)]
    pub window_mode: WindowModeKind,
    /// Average Open-Meteo with MET Norway where both have the hour
    #[serde(default)]
    pub merge_secondary: bool,
    #[serde(default = "default_max_days_ahead")]
    pub max_days_ahead: u32,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
    #[serde(default = "default_user_agent")]
    pub user_agent: String,
}

impl Default for ForecastSettings {
    fn default() -> Self {
        Self {
            window_mode: WindowModeKind::Hourly,
            merge_secondary: false,
            max_days_ahead: 7,
            timeout_secs: 15,
            user_agent: default_user_agent(),
        }
    }
}

fn default_max_days_ahead() -> u32 { 7 }
fn default_timeout_secs() -> u64 { 15 }
fn default_user_agent() -> String {
    format!("fishing-forecast/{} (github.com/nazrihussain/fishing-forecast)", env!("CARGO_PKG_VERSION"))
}

impl AppConfig {
    /// Load from `$FISHING_FORECAST_CONFIG` or `fishing_forecast.toml`; defaults if absent
    pub fn load() -> Result<Self> {
        let path = std::env::var(CONFIG_ENV).unwrap_or_else(|_| CONFIG_FILE.to_string());
        Self::load_from(Path::new(&path))
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        let config = if path.exists() {
            let data = std::fs::read_to_string(path)
                .with_context(|| format!("Failed to read config {}", path.display()))?;
            let config: Self = toml::from_str(&data)
                .with_context(|| format!("Failed to parse config {}", path.display()))?;
            info!("Loaded config from {}", path.display());
            config
        } else {
            debug!("No config at {}, using defaults", path.display());
            Self::default()
        };

        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        self.scoring.weighted.validate().context("Invalid [scoring.weighted] settings")?;
        if self.forecast.timeout_secs == 0 {
            anyhow::bail!("forecast.timeout_secs must be positive");
        }
        Ok(())
    }

    pub fn policy(&self) -> ScoringPolicy {
        match self.scoring.policy {
            PolicyKind::Simple => ScoringPolicy::Simple,
            PolicyKind::Weighted => ScoringPolicy::Weighted(self.scoring.weighted.clone()),
        }
    }

    pub fn scorer(&self) -> Scorer {
        Scorer::new(self.policy(), PhaseTable::from_kind(self.scoring.phase_table))
    }

    pub fn window_mode(&self) -> WindowMode {
        match self.forecast.window_mode {
            WindowModeKind::Hourly => WindowMode::Hourly,
            WindowModeKind::Slots => WindowMode::default_slots(),
        }
    }
}
