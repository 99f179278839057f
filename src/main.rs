use std::path::PathBuf;

use anyhow::Context;
use clap::{Args, Parser, Subcommand, ValueEnum};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod batch;
mod client;
mod config;
mod error;
mod form;
mod lookup;
mod models;
mod report;
mod validation;

use crate::client::{PredictionClient, WeatherClient};
use crate::config::Config;
use crate::error::AppError;
use crate::form::Form;
use crate::models::{Field, DEFAULT_SALINITY};

#[derive(Parser)]
#[command(name = "fishiko")]
#[command(about = "Fishing zone recommender for Halifax harbour", long_about = None)]
struct Cli {
    /// Base URL of the prediction API
    #[arg(long, global = true, env = "FISHIKO_API_URL")]
    api_url: Option<String>,

    /// Bearer token issued by the identity provider
    #[arg(long, global = true, env = "FISHIKO_TOKEN", hide_env_values = true)]
    token: Option<String>,

    /// Current-conditions weather endpoint
    #[arg(long, global = true, env = "FISHIKO_WEATHER_URL")]
    weather_url: Option<String>,

    #[arg(long, global = true, env = "OPENWEATHER_API_KEY", hide_env_values = true)]
    weather_api_key: Option<String>,

    /// Profile name from config file
    #[arg(long, short, global = true)]
    profile: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Validate readings without submitting them
    Check {
        #[command(flatten)]
        reading: ReadingArgs,
    },
    /// Ask the prediction service for a fishing zone
    Predict {
        #[command(flatten)]
        reading: ReadingArgs,
        #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
        format: OutputFormat,
        /// Also write the markdown report to this file
        #[arg(long)]
        out: Option<PathBuf>,
    },
    /// Submit every valid row of a CSV file
    Batch {
        #[arg(long)]
        csv: PathBuf,
    },
    /// Show current weather at a location
    Weather {
        #[arg(long, allow_hyphen_values = true)]
        lat: String,
        #[arg(long, allow_hyphen_values = true)]
        lon: String,
    },
    /// List the fishing zones
    Zones,
    /// Show gear recommendations
    Gear {
        #[arg(long)]
        fish: Option<String>,
    },
}

#[derive(Args)]
struct ReadingArgs {
    /// Water temperature in °C
    #[arg(long, default_value = "", allow_hyphen_values = true)]
    temperature: String,
    /// Salinity in PSU
    #[arg(long, default_value = DEFAULT_SALINITY, allow_hyphen_values = true)]
    salinity: String,
    /// Spring, Summer, Fall or Winter
    #[arg(long, default_value = "Spring")]
    season: String,
    #[arg(long, default_value = "", allow_hyphen_values = true)]
    latitude: String,
    #[arg(long, default_value = "", allow_hyphen_values = true)]
    longitude: String,
}

impl ReadingArgs {
    fn into_form(self) -> Form {
        let mut form = Form::new();
        form.change(Field::Temperature, &self.temperature);
        form.change(Field::Salinity, &self.salinity);
        form.change(Field::Season, &self.season);
        form.change(Field::Latitude, &self.latitude);
        form.change(Field::Longitude, &self.longitude);
        form
    }
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum OutputFormat {
    Text,
    Json,
}

fn init_tracing() {
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "warn".into()),
        ))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

/// Reads the config file only for the commands that talk to a service, so
/// the offline commands work without one.
fn load_config(profile: Option<&str>, overrides: Config) -> anyhow::Result<Config> {
    Ok(Config::load(profile)
        .context("failed to load configuration")?
        .merge(overrides))
}

/// Runs the same aggregate check as `predict` and renders the per-field report.
fn check_form(form: &mut Form) -> (String, bool) {
    let submittable = form.validate();
    (report::build_validation_report(form.errors()), submittable)
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_tracing();
    let cli = Cli::parse();

    let profile = cli.profile;
    let overrides = Config {
        api_url: cli.api_url,
        token: cli.token,
        weather_url: cli.weather_url,
        weather_api_key: cli.weather_api_key,
    };

    match cli.command {
        Commands::Check { reading } => {
            let mut form = reading.into_form();
            let (rendered, _) = check_form(&mut form);
            print!("{rendered}");
            if !form.is_submittable() {
                return Err(AppError::Invalid(form.errors().clone()).into());
            }
        }
        Commands::Predict {
            reading,
            format,
            out,
        } => {
            let config = load_config(profile.as_deref(), overrides)?;
            let mut form = reading.into_form();
            let client = PredictionClient::new(config.api_url()?)?;

            let submission = match form.submit(&client, config.token.as_deref()).await {
                Ok(submission) => submission,
                Err(AppError::Invalid(errors)) => {
                    eprint!("{}", report::build_validation_report(&errors));
                    return Err(AppError::Invalid(errors).into());
                }
                Err(err) => return Err(err.into()),
            };

            let markdown = report::build_prediction_report(
                &submission.request,
                &submission.result,
                chrono::Utc::now(),
            );

            match format {
                OutputFormat::Text => print!("{markdown}"),
                OutputFormat::Json => {
                    println!("{}", serde_json::to_string_pretty(&submission.result)?)
                }
            }

            if let Some(out) = out {
                std::fs::write(&out, &markdown)
                    .with_context(|| format!("failed to write {}", out.display()))?;
                println!("Report written to {}.", out.display());
            }
        }
        Commands::Batch { csv } => {
            let config = load_config(profile.as_deref(), overrides)?;
            let rows = batch::read_csv(&csv)
                .with_context(|| format!("failed to read {}", csv.display()))?;
            let client = PredictionClient::new(config.api_url()?)?;
            let outcomes = batch::run(&client, config.token.as_deref(), &rows).await?;

            for (row, outcome) in outcomes.iter() {
                match outcome {
                    batch::RowOutcome::Predicted(result) => println!(
                        "- row {}: {} ({}) fish {}",
                        row,
                        result.gps_zone,
                        result.area_name,
                        result.fish_recommendations.join(", ")
                    ),
                    batch::RowOutcome::Invalid(errors) => {
                        let messages: Vec<String> = errors
                            .iter()
                            .filter_map(|(field, _)| errors.message(field))
                            .collect();
                        println!("- row {}: invalid ({})", row, messages.join("; "));
                    }
                    batch::RowOutcome::Failed(message) => {
                        println!("- row {}: failed ({})", row, message)
                    }
                }
            }

            let summary = batch::summarize(&outcomes);
            println!(
                "Predicted {} of {} rows ({} invalid, {} failed).",
                summary.predicted,
                rows.len(),
                summary.invalid,
                summary.failed
            );
        }
        Commands::Weather { lat, lon } => {
            let at = validation::parse_coordinates(&lat, &lon)?;
            let config = load_config(profile.as_deref(), overrides)?;
            let client = WeatherClient::new(config.weather_url(), config.weather_api_key()?)?;
            let weather = client.current(at).await?;
            print!("{}", report::build_weather_report(&weather));
        }
        Commands::Zones => {
            print!("{}", report::build_zone_table());
        }
        Commands::Gear { fish } => {
            print!("{}", report::build_gear_guide(fish.as_deref()));
        }
    }

    Ok(())
}
