use std::sync::Arc;

use anyhow::Context;
use chrono::Local;
use clap::{Parser, Subcommand};
use inquire::{CustomType, Password, PasswordDisplayMode};
use weather_ingest_core::{
    Config, MemoryWeatherStore, SqliteWeatherStore, WeatherIngestor, WeatherRecord, WeatherStore,
    provider_from_config,
};

/// Top-level CLI struct.
#[derive(Debug, Parser)]
#[command(name = "weather-ingest", version, about = "Fetch and store current weather")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Set the API key and coordinates.
    Configure,

    /// Fetch current weather once and store it.
    Fetch {
        /// Keep the record in memory instead of writing to the database.
        #[arg(long)]
        dry_run: bool,

        /// Print the stored record as JSON.
        #[arg(long)]
        json: bool,
    },

    /// Print the location of the config file.
    ConfigPath,
}

impl Cli {
    pub async fn run(self) -> anyhow::Result<()> {
        match self.command {
            Command::Configure => configure(),
            Command::Fetch { dry_run, json } => fetch(dry_run, json).await,
            Command::ConfigPath => {
                println!("{}", Config::config_file_path()?.display());
                Ok(())
            }
        }
    }
}

fn configure() -> anyhow::Result<()> {
    let mut cfg = Config::load()?;

    let api_key = Password::new("API key:")
        .with_display_mode(PasswordDisplayMode::Masked)
        .without_confirmation()
        .prompt()
        .context("Failed to read API key")?;

    let mut lat_prompt = CustomType::<f64>::new("Latitude:")
        .with_error_message("Please enter a decimal number, e.g. 51.5072");
    if let Some(lat) = cfg.lat {
        lat_prompt = lat_prompt.with_default(lat);
    }
    let lat = lat_prompt.prompt().context("Failed to read latitude")?;

    let mut long_prompt = CustomType::<f64>::new("Longitude:")
        .with_error_message("Please enter a decimal number, e.g. -0.1276");
    if let Some(long) = cfg.long {
        long_prompt = long_prompt.with_default(long);
    }
    let long = long_prompt.prompt().context("Failed to read longitude")?;

    cfg.api_key = Some(api_key);
    cfg.lat = Some(lat);
    cfg.long = Some(long);
    cfg.save()?;

    println!("Saved configuration to {}", Config::config_file_path()?.display());
    Ok(())
}

async fn fetch(dry_run: bool, json: bool) -> anyhow::Result<()> {
    let cfg = Config::load()?;
    let provider = provider_from_config(&cfg)?;

    let store: Arc<dyn WeatherStore> = if dry_run {
        Arc::new(MemoryWeatherStore::new())
    } else {
        let path = cfg.database_path()?;
        Arc::new(
            SqliteWeatherStore::open(&path)
                .with_context(|| format!("Failed to open database: {}", path.display()))?,
        )
    };

    let ingestor = WeatherIngestor::new(Arc::new(cfg), Arc::from(provider), store);

    let record = match ingestor.fetch_and_store_weather().await {
        Ok(record) => record,
        Err(err) => {
            let err = anyhow::Error::from(err);
            tracing::error!("weather ingestion failed: {err:#}");
            return Err(err);
        }
    };

    if json {
        println!("{}", serde_json::to_string_pretty(&record)?);
    } else {
        print_record(&record);
    }

    Ok(())
}

fn print_record(record: &WeatherRecord) {
    let snap = &record.snapshot;
    let period = if snap.is_day { "day" } else { "night" };

    println!("Record #{} ({})", record.id, record.created_at.with_timezone(&Local));
    println!(
        "  Upstream update: {}",
        snap.external_last_update.with_timezone(&Local).format("%Y-%m-%d %H:%M")
    );
    println!(
        "  Condition:       {} (code {}, {period})",
        snap.condition_text, snap.condition_code
    );
    println!("  Temperature:     {}°C / {}°F", snap.temp_c, snap.temp_f);
    println!("  Humidity:        {}%", snap.humidity);
    println!("  Cloud cover:     {}%", snap.cloud);
    println!("  Wind:            {} km/h / {} mph", snap.wind_k, snap.wind_m);
}
