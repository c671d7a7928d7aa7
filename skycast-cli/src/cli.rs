use std::sync::Arc;

use anyhow::Context;
use clap::{Args, Parser, Subcommand};
use inquire::{Password, PasswordDisplayMode, Select, Text};
use skycast_core::{
    Config, WeatherService, WeatherSnapshot, debounce,
    provider::{mock::MockProvider, provider_from_config},
};
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::debug;

use crate::render::{self, View};

const FETCH_FAILED: &str = "Failed to fetch weather data. Please try again.";

/// Top-level CLI struct.
#[derive(Debug, Parser)]
#[command(name = "skycast", version, about = "Weather dashboard for the terminal")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Args)]
pub struct Output {
    /// Which dashboard view to print.
    #[arg(long, value_enum, default_value_t = View::Overview)]
    pub view: View,

    /// Print the full snapshot as JSON instead.
    #[arg(long)]
    pub json: bool,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Store the API key and default place.
    Configure,

    /// Show weather for a place (defaults to the configured place).
    Show {
        place: Option<String>,

        /// Country code to disambiguate the place, e.g. "GB".
        #[arg(long)]
        country: Option<String>,

        #[command(flatten)]
        output: Output,
    },

    /// Show weather at a latitude/longitude.
    Coords {
        #[arg(allow_hyphen_values = true)]
        lat: f64,

        #[arg(allow_hyphen_values = true)]
        lon: f64,

        #[command(flatten)]
        output: Output,
    },

    /// Suggest places matching a partial name.
    Search {
        query: Option<String>,

        /// Choose one of the suggestions and show its weather.
        #[arg(long)]
        pick: bool,

        /// Read queries line by line from stdin, suggesting after each pause.
        #[arg(long, conflicts_with = "pick")]
        live: bool,
    },

    /// Show synthetic weather without contacting the provider.
    Demo {
        place: Option<String>,

        /// Seed for reproducible output.
        #[arg(long, default_value_t = 42)]
        seed: u64,

        #[command(flatten)]
        output: Output,
    },
}

impl Cli {
    pub async fn run(self) -> anyhow::Result<()> {
        match self.command {
            Command::Configure => configure(),
            Command::Show {
                place,
                country,
                output,
            } => {
                let config = Config::load()?;
                let service = live_service(&config)?;
                let place = place.unwrap_or_else(|| config.default_place.clone());
                let country = country.or_else(|| config.default_country().map(str::to_owned));

                let snapshot = service
                    .snapshot_for_place(&place, country.as_deref())
                    .await
                    .context(FETCH_FAILED)?;
                print_snapshot(&snapshot, &output)
            }
            Command::Coords { lat, lon, output } => {
                let service = live_service(&Config::load()?)?;
                let snapshot = service
                    .snapshot_for_coords(lat, lon)
                    .await
                    .context(FETCH_FAILED)?;
                print_snapshot(&snapshot, &output)
            }
            Command::Search { query, pick, live } => {
                let service = live_service(&Config::load()?)?;
                if live {
                    return live_search(&service).await;
                }

                let query = match query {
                    Some(q) => q,
                    None => Text::new("Search for a city:").prompt()?,
                };
                let candidates = service.suggest(&query).await;
                if !pick || candidates.is_empty() {
                    println!("{}", render::render_candidates(&candidates));
                    return Ok(());
                }

                let labels: Vec<String> = candidates.iter().map(|c| c.label()).collect();
                let chosen = Select::new("Pick a place:", labels.clone()).prompt()?;
                let Some(candidate) = labels
                    .iter()
                    .position(|l| *l == chosen)
                    .and_then(|i| candidates.get(i))
                else {
                    return Ok(());
                };

                let snapshot = service
                    .snapshot_for_place(&candidate.name, Some(candidate.country.as_str()))
                    .await
                    .context(FETCH_FAILED)?;
                println!("Weather data loaded for {}", candidate.name);
                print_snapshot(&snapshot, &Output { view: View::Overview, json: false })
            }
            Command::Demo {
                place,
                seed,
                output,
            } => {
                let service = WeatherService::new(Arc::new(MockProvider::seeded(seed)));
                let place = place.unwrap_or_else(|| "New York".to_string());
                let snapshot = service.snapshot_for_place(&place, Some("US")).await?;
                print_snapshot(&snapshot, &output)
            }
        }
    }
}

fn live_service(config: &Config) -> anyhow::Result<WeatherService> {
    let provider = provider_from_config(config)?;
    Ok(WeatherService::new(Arc::new(provider)))
}

fn print_snapshot(snapshot: &WeatherSnapshot, output: &Output) -> anyhow::Result<()> {
    if output.json {
        let json = serde_json::to_string_pretty(snapshot).context("Failed to serialize snapshot")?;
        println!("{json}");
    } else {
        println!("{}", render::render(snapshot, output.view));
    }
    Ok(())
}

fn configure() -> anyhow::Result<()> {
    let mut config = Config::load()?;

    let api_key = Password::new("OpenWeather API key:")
        .with_display_mode(PasswordDisplayMode::Masked)
        .without_confirmation()
        .prompt()?;
    config.set_api_key(api_key.trim().to_string());

    let place = Text::new("Default place:")
        .with_default(&config.default_place)
        .prompt()?;
    config.default_place = place.trim().to_string();

    let country = Text::new("Default country code (optional):")
        .with_default(config.default_country().unwrap_or_default())
        .prompt()?;
    config.default_country = Some(country.trim().to_string()).filter(|c| !c.is_empty());

    config.save()?;
    println!("Saved configuration to {}", Config::config_file_path()?.display());
    Ok(())
}

/// Each stdin line stands in for the current contents of a search box.
async fn live_search(service: &WeatherService) -> anyhow::Result<()> {
    let (input, mut debouncer) = debounce::channel(debounce::DEFAULT_DELAY);

    let reader = tokio::spawn(async move {
        let mut lines = BufReader::new(tokio::io::stdin()).lines();
        while let Ok(Some(line)) = lines.next_line().await {
            if !input.push(line) {
                break;
            }
        }
    });

    while let Some(query) = debouncer.next().await {
        debug!(%query, "debounced search");
        println!("> {query}");
        println!("{}", render::render_candidates(&service.suggest(&query).await));
    }

    reader.await.context("stdin reader stopped unexpectedly")?;
    Ok(())
}
