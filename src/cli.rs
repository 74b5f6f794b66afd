use chrono::NaiveDate;
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(
    name = "cropwise",
    version,
    about = "Crop growth planning with weather-driven agronomic advisories"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Path to config.yaml
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Increase log verbosity (-v for debug, -vv for trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Print results as JSON
    #[arg(long, global = true)]
    pub json: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Build a growth plan: GDD since sowing, soil moisture, forecast and crop stage
    Plan {
        /// wheat, rice, jowar or maize
        #[arg(long)]
        crop: Option<String>,

        /// Sowing date (YYYY-MM-DD)
        #[arg(long)]
        sowing_date: Option<NaiveDate>,

        #[command(flatten)]
        location: LocationArgs,
    },
    /// Field advisories from current conditions and the 5-day forecast
    Advise {
        #[command(flatten)]
        location: LocationArgs,
    },
    /// Soil moisture by depth and the 16-day forecast risk
    Soil {
        #[command(flatten)]
        location: LocationArgs,
    },
    /// Re-run interactive setup
    Init,
    /// Validate config and test connections
    Check,
}

/// Location override; falls back to the configured default
#[derive(Args, Debug, Clone, Default)]
pub struct LocationArgs {
    #[arg(long, requires = "lon", allow_negative_numbers = true)]
    pub lat: Option<f64>,

    #[arg(long, requires = "lat", allow_negative_numbers = true)]
    pub lon: Option<f64>,

    /// City label sent to the stage service
    #[arg(long)]
    pub city: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plan_arguments_parse() {
        let cli = Cli::try_parse_from([
            "cropwise",
            "plan",
            "--crop",
            "maize",
            "--sowing-date",
            "2026-09-01",
            "--lat",
            "19.99",
            "--lon",
            "73.79",
            "--json",
        ])
        .unwrap();

        assert!(cli.json);
        match cli.command {
            Commands::Plan {
                crop,
                sowing_date,
                location,
            } => {
                assert_eq!(crop.as_deref(), Some("maize"));
                assert_eq!(sowing_date, NaiveDate::from_ymd_opt(2026, 9, 1));
                assert_eq!(location.lat, Some(19.99));
                assert_eq!(location.lon, Some(73.79));
                assert!(location.city.is_none());
            }
            _ => panic!("expected plan"),
        }
    }

    #[test]
    fn negative_coordinates_accepted() {
        let cli =
            Cli::try_parse_from(["cropwise", "soil", "--lat", "-33.9", "--lon", "-70.6"]).unwrap();
        match cli.command {
            Commands::Soil { location } => {
                assert_eq!(location.lat, Some(-33.9));
                assert_eq!(location.lon, Some(-70.6));
            }
            _ => panic!("expected soil"),
        }
    }

    #[test]
    fn latitude_requires_longitude() {
        assert!(Cli::try_parse_from(["cropwise", "advise", "--lat", "19.99"]).is_err());
    }

    #[test]
    fn verbosity_counts() {
        let cli = Cli::try_parse_from(["cropwise", "-vv", "check"]).unwrap();
        assert_eq!(cli.verbose, 2);
    }
}
