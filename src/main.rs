mod api;
mod astro;
mod config;
mod error;
mod forecast;
mod render;
mod scoring;
mod weather;
mod windows;

use anyhow::Result;
use chrono::NaiveDate;
use clap::{Args, Parser, Subcommand};
use tracing::{info, warn};

use astro::moon::{date_instant, phase_fraction, solunar_activity, PhaseTable};
use astro::Hemisphere;
use config::{AppConfig, PolicyKind, WindowModeKind};
use error::ForecastError;
use forecast::{ForecastController, ForecastQuery, RunOutcome};
use render::TerminalRenderer;
use weather::met_no::MetNoClient;
use weather::open_meteo::OpenMeteoClient;

#[derive(Parser)]
#[command(name = "fishing-forecast", about = "Hour-by-hour fishing conditions for a place and day")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Forecast for a latitude / longitude
    Forecast {
        #[arg(long, allow_hyphen_values = true)]
        lat: f64,
        #[arg(long, allow_hyphen_values = true)]
        lon: f64,
        #[command(flatten)]
        opts: ForecastArgs,
    },
    /// Look up a city, then forecast for it
    City {
        name: String,
        #[command(flatten)]
        opts: ForecastArgs,
    },
    /// Show the season and moon phase for a date
    Moon {
        /// Date (YYYY-MM-DD), defaults to today
        #[arg(short, long)]
        date: Option<NaiveDate>,
        /// Latitude, decides the hemisphere
        #[arg(long, allow_hyphen_values = true)]
        lat: Option<f64>,
    },
}

#[derive(Args)]
struct ForecastArgs {
    /// Date (YYYY-MM-DD), defaults to today
    #[arg(short, long)]
    date: Option<NaiveDate>,
    /// Override the configured scoring policy
    #[arg(short, long, value_enum)]
    policy: Option<PolicyKind>,
    /// Score 3-hour slots instead of every hour
    #[arg(long)]
    slots: bool,
    /// Show tips for every window
    #[arg(long)]
    details: bool,
    /// Print the report as JSON
    #[arg(long)]
    json: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "fishing_forecast=info".into()),
        )
        .init();

    // Load .env if present (override system env vars)
    dotenvy::dotenv_override().ok();

    let cli = Cli::parse();
    let mut config = AppConfig::load()?;

    match cli.command {
        Commands::Forecast { lat, lon, opts } => {
            let query = ForecastQuery::new(opts.date.unwrap_or_else(today), lat, lon);
            run_forecast(&mut config, query, &opts).await?;
        }
        Commands::City { name, opts } => {
            let geocoder = api::geocode::GeocodeClient::new(&config.forecast)?;
            let place = match geocoder.search(&name).await {
                Ok(place) => place,
                Err(e @ ForecastError::CityNotFound(_)) => {
                    println!("\n⚠️  {}: {}", e.user_message(), name);
                    return Ok(());
                }
                Err(e) => {
                    println!("\n⚠️  {}: {}", e.user_message(), e);
                    return Ok(());
                }
            };
            let query = ForecastQuery::new(opts.date.unwrap_or_else(today), place.latitude, place.longitude)
                .with_place(place.name);
            run_forecast(&mut config, query, &opts).await?;
        }
        Commands::Moon { date, lat } => {
            let date = date.unwrap_or_else(today);
            let hemisphere = lat.map(Hemisphere::from_latitude).unwrap_or(Hemisphere::Northern);
            let fraction = phase_fraction(date_instant(date));
            let simple = PhaseTable::simple().classify(fraction);
            let fine = PhaseTable::fine().classify(fraction);

            println!("\n🗓️  {}", date.format("%d-%m-%Y"));
            println!("   Season: {} ({:?} hemisphere)", astro::season::season(date, hemisphere), hemisphere);
            println!("   Moon: {} / {} ({:.3} of the cycle)", simple, fine, fraction);
            println!("   Solunar activity: {:?}", solunar_activity(fine));
        }
    }

    Ok(())
}

async fn run_forecast(config: &mut AppConfig, query: ForecastQuery, opts: &ForecastArgs) -> Result<()> {
    if let Some(policy) = opts.policy {
        config.scoring.policy = policy;
    }
    if opts.slots {
        config.forecast.window_mode = WindowModeKind::Slots;
    }

    let primary = OpenMeteoClient::new(&config.forecast)?;
    let mut controller = ForecastController::new(Box::new(primary), config.scorer(), config.window_mode())
        .with_max_days_ahead(config.forecast.max_days_ahead);
    if config.forecast.merge_secondary {
        controller = controller.with_secondary(Box::new(MetNoClient::new(&config.forecast)?));
    }

    info!(
        "Forecast for {:.4}, {:.4} on {} ({} policy)",
        query.latitude,
        query.longitude,
        query.date,
        config.policy().name()
    );

    let renderer = TerminalRenderer { details: opts.details, json: opts.json };
    match controller.forecast(&query, &renderer).await {
        RunOutcome::Delivered | RunOutcome::Failed => {}
        RunOutcome::Superseded => warn!("Forecast was superseded before it finished"),
    }
    Ok(())
}

fn today() -> NaiveDate {
    chrono::Local::now().date_naive()
}
