use anyhow::Context;
use chrono::Utc;
use clap::{Args, Parser, Subcommand};
use tokio::io::BufReader;
use weatherpanel_core::{
    Config, ConfiguredPosition, Coordinates, WeatherPanel, WeatherProvider, format_local_time,
    provider_from_config,
};

use crate::{configure, interactive, render};

/// Top-level CLI struct.
#[derive(Debug, Parser)]
#[command(name = "weatherpanel", version, about = "Current weather with a live local clock")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Set the API key and default position interactively.
    Configure,

    /// Print the weather once, for a city or for the configured position.
    Show {
        /// City name; when absent the position is used instead.
        city: Option<String>,

        #[command(flatten)]
        position: PositionArgs,

        /// Print the weather result as JSON.
        #[arg(long)]
        json: bool,
    },

    /// Live panel: type a city and press Enter to look it up, `:q` to quit.
    Watch {
        #[command(flatten)]
        position: PositionArgs,
    },
}

/// Overrides the configured position for this run.
#[derive(Debug, Args)]
pub struct PositionArgs {
    /// Latitude in decimal degrees.
    #[arg(long, requires = "lon", allow_negative_numbers = true)]
    pub lat: Option<f64>,

    /// Longitude in decimal degrees.
    #[arg(long, requires = "lat", allow_negative_numbers = true)]
    pub lon: Option<f64>,
}

impl PositionArgs {
    pub fn coordinates(&self) -> Option<Coordinates> {
        match (self.lat, self.lon) {
            (Some(lat), Some(lon)) => Some(Coordinates::new(lat, lon)),
            _ => None,
        }
    }
}

type Panel = WeatherPanel<Box<dyn WeatherProvider>, ConfiguredPosition>;

fn build_panel(position: &PositionArgs) -> anyhow::Result<Panel> {
    let config = Config::load()?;
    let provider = provider_from_config(&config)?;
    Ok(WeatherPanel::new(provider, config.position(position.coordinates())))
}

impl Cli {
    pub async fn run(self) -> anyhow::Result<()> {
        match self.command {
            Command::Configure => configure::run(),
            Command::Show { city, position, json } => show(city, &position, json).await,
            Command::Watch { position } => {
                let panel = build_panel(&position)?;
                let input = BufReader::new(tokio::io::stdin());
                interactive::run(panel, input, std::io::stdout()).await
            }
        }
    }
}

async fn show(city: Option<String>, position: &PositionArgs, json: bool) -> anyhow::Result<()> {
    let mut panel = build_panel(position)?;

    match city {
        Some(city) => panel.search(&city).await,
        None => panel.mount().await,
    }

    if let Some(err) = panel.error() {
        return Err(err.into());
    }

    let Some(result) = panel.result() else {
        return Ok(());
    };

    if json {
        let out = serde_json::to_string_pretty(result).context("Failed to serialize weather result")?;
        println!("{out}");
    } else {
        // One-shot output never waits for a tick, so compute the local time directly.
        let local_time = format_local_time(Utc::now(), result.utc_offset_secs);
        println!("{}", render::panel_text(Some(result), None, &local_time));
    }

    Ok(())
}
