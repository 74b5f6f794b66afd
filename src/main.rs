mod cli;
mod config;
mod datasources;
mod error;
mod logic;
mod models;
mod report;

use anyhow::{anyhow, Context};
use chrono::{Duration, Local};
use clap::Parser;
use cli::{Cli, Commands, LocationArgs};
use config::Config;
use error::CropwiseError;
use datasources::{
    ArchiveClient, ClimateArchive, CurrentConditionsSource, ForecastClient, LiveConditionsSource,
    OpenWeatherMapClient, StageServiceClient,
};
use logic::forecast_risk::project_forecast;
use logic::soil::classify_sample;
use logic::{GrowthPlanService, Phase, RulesEngine};
use models::{CropType, Location, PlanInputs};
use std::io::IsTerminal;
use tokio::sync::mpsc;
use tracing_subscriber::EnvFilter;

const NO_LOCATION: &str =
    "No location available. Pass --lat/--lon or set `location` in config.yaml";

/// Used by `check` when no location is configured
const CHECK_LOCATION: (f64, f64) = (18.52, 73.86);

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env file if present
    let _ = dotenvy::dotenv();

    let cli = Cli::parse();
    init_logging(cli.verbose);

    if let Commands::Init = cli.command {
        Config::setup_interactive()?;
        return Ok(());
    }

    let config = load_config(&cli)?;

    match cli.command {
        Commands::Plan {
            crop,
            sowing_date,
            location,
        } => run_plan(&config, crop, sowing_date, &location, cli.json).await,
        Commands::Advise { location } => run_advise(&config, &location, cli.json).await,
        Commands::Soil { location } => run_soil(&config, &location, cli.json).await,
        Commands::Check => run_check(&config).await,
        Commands::Init => Ok(()),
    }
}

fn init_logging(verbose: u8) {
    let filter = match verbose {
        0 => EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        1 => EnvFilter::new("cropwise=debug"),
        _ => EnvFilter::new("trace"),
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

/// First run without a config file goes through interactive setup when a
/// terminal is attached; otherwise built-in defaults are used.
fn load_config(cli: &Cli) -> anyhow::Result<Config> {
    if Config::exists(cli.config.as_ref()) || cli.config.is_some() {
        return Ok(Config::load(cli.config.clone())?);
    }

    if std::io::stdin().is_terminal() {
        eprintln!("No configuration found.");
        let (config, _) = Config::setup_interactive()?;
        return Ok(config);
    }

    tracing::warn!("No configuration found, using defaults. Run `cropwise init` to set up.");
    Ok(Config::default())
}

/// Command-line coordinates win over the configured location
fn resolve_location(args: &LocationArgs, config: &Config) -> anyhow::Result<Option<Location>> {
    match (args.lat, args.lon) {
        (Some(latitude), Some(longitude)) => {
            if !(-90.0..=90.0).contains(&latitude) || !(-180.0..=180.0).contains(&longitude) {
                return Err(anyhow!(
                    "Coordinates ({}, {}) are out of range",
                    latitude,
                    longitude
                ));
            }
            Ok(Some(Location {
                latitude,
                longitude,
                city: args.city.clone(),
            }))
        }
        _ => Ok(config.location.clone().map(|mut loc| {
            if args.city.is_some() {
                loc.city = args.city.clone();
            }
            loc
        })),
    }
}

async fn run_plan(
    config: &Config,
    crop: Option<String>,
    sowing_date: Option<chrono::NaiveDate>,
    location: &LocationArgs,
    json: bool,
) -> anyhow::Result<()> {
    let crop = match crop {
        Some(name) => Some(CropType::from_str(&name).ok_or_else(|| {
            let known: Vec<&str> = CropType::all().iter().map(|c| c.as_str()).collect();
            anyhow!("Unknown crop '{}'. Choose one of: {}", name, known.join(", "))
        })?),
        None => None,
    };

    let inputs = PlanInputs {
        crop,
        sowing_date,
        location: resolve_location(location, config)?,
    };
    let request = inputs.into_request(Local::now().date_naive())?;

    let (tx, mut rx) = mpsc::unbounded_channel();
    let service = GrowthPlanService::from_config(config).with_progress(tx);

    let progress = tokio::spawn(async move {
        while let Some(update) = rx.recv().await {
            tracing::debug!("Run {} entered {:?}", update.run_id, update.phase);
            if !update.phase.is_terminal() && update.phase != Phase::Idle {
                eprintln!("{}", update.phase.label());
            }
        }
    });

    // Ctrl-C abandons the run; the in-flight request finishes but is discarded
    let outcome = {
        let run = service.run(request);
        tokio::pin!(run);
        tokio::select! {
            outcome = &mut run => outcome,
            _ = tokio::signal::ctrl_c() => {
                service.abandon().await;
                eprintln!("Interrupted, waiting for the in-flight request to finish...");
                run.await
            }
        }
    };

    let state = service.state().await;
    tracing::debug!(
        "Run {} ended in {:?} (result: {}, error: {:?})",
        state.run_id,
        state.phase,
        state.result.is_some(),
        state.error
    );

    // Closing the sender ends the progress task
    drop(service);
    let _ = progress.await;

    if let Err(CropwiseError::Superseded(id)) = outcome {
        return Err(anyhow!("Run {} abandoned; its result was discarded", id));
    }

    let plan = outcome?;
    if json {
        println!("{}", serde_json::to_string_pretty(&plan)?);
    } else {
        print!("{}", report::render_plan(&plan));
    }
    Ok(())
}

async fn run_advise(config: &Config, location: &LocationArgs, json: bool) -> anyhow::Result<()> {
    let loc = resolve_location(location, config)?.ok_or_else(|| anyhow!(NO_LOCATION))?;

    let owm = config
        .openweathermap
        .as_ref()
        .filter(|o| o.is_usable())
        .context("OpenWeatherMap is not configured. Run `cropwise init` to add an API key")?;

    let client = OpenWeatherMapClient::new(owm.clone());
    let conditions = client.fetch_conditions(loc.latitude, loc.longitude).await?;
    let signals = RulesEngine::new().evaluate(&conditions);

    if json {
        let out = serde_json::json!({
            "conditions": conditions,
            "advisories": signals,
        });
        println!("{}", serde_json::to_string_pretty(&out)?);
    } else {
        print!("{}", report::render_advisories(&conditions, &signals));
    }
    Ok(())
}

async fn run_soil(config: &Config, location: &LocationArgs, json: bool) -> anyhow::Result<()> {
    let loc = resolve_location(location, config)?.ok_or_else(|| anyhow!(NO_LOCATION))?;

    let client = ForecastClient::new(config.forecast.clone())
        .with_representative_hour(config.soil.representative_hour_index);
    let live = client.fetch_live(loc.latitude, loc.longitude).await?;

    let readings = classify_sample(&live.soil);
    let forecast = project_forecast(&live.forecast);

    if json {
        let out = serde_json::json!({
            "location": loc,
            "temperature_c": live.temperature_c,
            "humidity_percent": live.humidity_percent,
            "soil_moisture": readings,
            "soil_temp_c": live.soil.soil_temp_c,
            "forecast": forecast,
        });
        println!("{}", serde_json::to_string_pretty(&out)?);
    } else {
        let air = match (live.temperature_c, live.humidity_percent) {
            (Some(t), Some(h)) => format!("{:.1}°C, humidity {:.0}%", t, h),
            (Some(t), None) => format!("{:.1}°C", t),
            _ => "current conditions unavailable".to_string(),
        };
        println!("{}: {}\n", loc.city_name(), air);
        print!("{}", report::render_soil(&readings, live.soil.soil_temp_c));
        println!();
        print!("{}", report::render_forecast(&forecast));
    }
    Ok(())
}

fn print_status(name: &str, outcome: error::Result<bool>) {
    match outcome {
        Ok(true) => println!("  {:<16} OK", name),
        Ok(false) => println!("  {:<16} UNREACHABLE (non-success status)", name),
        Err(e) => println!("  {:<16} OFFLINE ({})", name, e),
    }
}

async fn run_check(config: &Config) -> anyhow::Result<()> {
    println!("Configuration OK");
    tracing::debug!("{:?}", config);

    let (lat, lon) = config
        .location
        .as_ref()
        .map(|l| (l.latitude, l.longitude))
        .unwrap_or(CHECK_LOCATION);

    println!("Connections:");

    let archive = ArchiveClient::new(config.archive.clone());
    let day = Local::now().date_naive() - Duration::days(7);
    print_status(
        "Climate archive",
        archive
            .fetch_daily(lat, lon, day, day)
            .await
            .map(|records| !records.is_empty()),
    );

    let forecast = ForecastClient::new(config.forecast.clone());
    print_status("Forecast", forecast.test_connection(lat, lon).await);

    let stages = StageServiceClient::new(config.stage_service.clone());
    print_status("Stage service", stages.test_connection().await);

    match config.openweathermap.as_ref().filter(|o| o.is_usable()) {
        Some(owm) => {
            let client = OpenWeatherMapClient::new(owm.clone());
            print_status("OpenWeatherMap", client.test_connection(lat, lon).await);
        }
        None => println!("  {:<16} not configured", "OpenWeatherMap"),
    }

    println!("Advisory rules:");
    for (id, name) in RulesEngine::new().list_rules() {
        println!("  {:<16} {}", id, name);
    }

    Ok(())
}
