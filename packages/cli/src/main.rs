#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Command-line front end for dengue-watch.
//!
//! ```text
//! dengue_watch weather <location>
//! dengue_watch risk --temperature 29 --humidity 80 --rainfall 120
//! dengue_watch predict --location Dhaka --state "Dhaka Division" [--temperature ...]
//! dengue_watch report --location Mirpur --description "..." [--image site.jpg]
//! dengue_watch analyze-image site.jpg --location Mirpur
//! ```
//!
//! Settings come from the environment (see [`dengue_watch_config`]).
//! Results are printed as pretty JSON on stdout; logs go to stderr and
//! are controlled with `RUST_LOG`.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use clap::{Parser, Subcommand};
use dengue_watch_config::Settings;
use dengue_watch_prediction::{PredictionClient, PredictionRequest};
use dengue_watch_report::{ImageUpload, ReportClient, ReportSubmission};
use dengue_watch_transport::{HttpTransport, ReqwestTransport};
use dengue_watch_weather::{GatewayConfig, OPENWEATHERMAP, WEATHERSTACK, WeatherGateway};
use serde::Serialize;

#[derive(Parser)]
#[command(
    name = "dengue_watch",
    about = "Dengue breeding risk, outbreak prediction and site reporting"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Current weather and breeding risk for a location
    Weather {
        /// City or district name
        location: String,
    },
    /// Score breeding risk for explicit conditions (no network)
    Risk {
        /// Temperature in °C
        #[arg(long, allow_negative_numbers = true)]
        temperature: f64,
        /// Relative humidity in percent
        #[arg(long, allow_negative_numbers = true)]
        humidity: f64,
        /// Rainfall in mm
        #[arg(long, allow_negative_numbers = true)]
        rainfall: f64,
    },
    /// Outbreak prediction for a location
    Predict {
        #[arg(long)]
        location: String,
        /// State or division
        #[arg(long)]
        state: String,
        #[arg(long, allow_negative_numbers = true)]
        temperature: Option<f64>,
        #[arg(long)]
        humidity: Option<f64>,
        #[arg(long)]
        rainfall: Option<f64>,
        /// Wind speed in km/h
        #[arg(long)]
        wind_speed: Option<f64>,
    },
    /// Report a possible breeding site
    Report {
        #[arg(long)]
        location: String,
        #[arg(long)]
        description: String,
        /// Photo of the site
        #[arg(long)]
        image: Option<PathBuf>,
        #[arg(long, allow_negative_numbers = true)]
        latitude: Option<f64>,
        #[arg(long, allow_negative_numbers = true)]
        longitude: Option<f64>,
        /// Phone or email for follow-up
        #[arg(long)]
        contact: Option<String>,
    },
    /// Classify a photo of a possible breeding site
    AnalyzeImage {
        /// Path to the image
        path: PathBuf,
        #[arg(long)]
        location: String,
    },
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    pretty_env_logger::init_custom_env("RUST_LOG");
    let cli = Cli::parse();

    let settings = Settings::from_env()?;
    log::debug!("Using backend at {}", settings.api_base_url);
    let transport: Arc<dyn HttpTransport> =
        Arc::new(ReqwestTransport::new(settings.request_timeout));

    match cli.command {
        Commands::Risk {
            temperature,
            humidity,
            rainfall,
        } => {
            print_json(&dengue_watch_risk::assess_risk(
                temperature,
                humidity,
                rainfall,
            ))?;
        }
        Commands::Weather { location } => {
            let gateway = weather_gateway(transport, &settings);
            print_json(&gateway.current_conditions(&location).await)?;
        }
        Commands::Predict {
            location,
            state,
            temperature,
            humidity,
            rainfall,
            wind_speed,
        } => {
            let client = PredictionClient::new(transport, settings.api_base_url.as_str());
            let request = PredictionRequest {
                location,
                state,
                temperature,
                humidity,
                rainfall,
                wind_speed,
            };
            print_json(&client.predict_outbreak(&request).await)?;
        }
        Commands::Report {
            location,
            description,
            image,
            latitude,
            longitude,
            contact,
        } => {
            let client = ReportClient::new(transport, settings.api_base_url.as_str());
            let submission = ReportSubmission {
                location,
                description,
                image: image.as_deref().map(read_image).transpose()?,
                latitude,
                longitude,
                contact,
            };
            print_json(&client.submit_report(&submission).await?)?;
        }
        Commands::AnalyzeImage { path, location } => {
            let client = ReportClient::new(transport, settings.api_base_url.as_str());
            let result = client.analyze_image(read_image(&path)?, &location).await?;
            print_json(&result)?;
        }
    }

    Ok(())
}

fn weather_gateway(transport: Arc<dyn HttpTransport>, settings: &Settings) -> WeatherGateway {
    let config = GatewayConfig::default()
        .with_api_key(WEATHERSTACK, settings.weatherstack_api_key.clone())
        .with_api_key(OPENWEATHERMAP, settings.openweather_api_key.clone())
        .with_cache_ttl(settings.weather_cache_ttl);
    WeatherGateway::new(transport, config)
}

fn read_image(path: &Path) -> std::io::Result<ImageUpload> {
    let bytes = std::fs::read(path)?;
    let file_name = path
        .file_name()
        .map_or_else(|| "image".to_string(), |n| n.to_string_lossy().into_owned());
    Ok(ImageUpload::new(file_name, content_type_for(path), bytes))
}

fn content_type_for(path: &Path) -> &'static str {
    let extension = path
        .extension()
        .map(|e| e.to_string_lossy().to_ascii_lowercase());
    match extension.as_deref() {
        Some("jpg" | "jpeg") => "image/jpeg",
        Some("png") => "image/png",
        Some("webp") => "image/webp",
        Some("gif") => "image/gif",
        Some("heic") => "image/heic",
        _ => "application/octet-stream",
    }
}

fn print_json(value: &impl Serialize) -> Result<(), Box<dyn std::error::Error>> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

#[cfg(test)]
mod tests {
    use clap::CommandFactory as _;

    use super::*;

    #[test]
    fn cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn parses_predict_with_partial_weather() {
        let cli = Cli::try_parse_from([
            "dengue_watch",
            "predict",
            "--location",
            "Dhaka",
            "--state",
            "Dhaka Division",
            "--temperature",
            "31.5",
        ])
        .unwrap();
        let Commands::Predict {
            temperature,
            humidity,
            ..
        } = cli.command
        else {
            panic!("expected predict");
        };
        assert_eq!(temperature, Some(31.5));
        assert_eq!(humidity, None);
    }

    #[test]
    fn risk_accepts_negative_values() {
        let cli = Cli::try_parse_from([
            "dengue_watch",
            "risk",
            "--temperature",
            "-5",
            "--humidity",
            "40",
            "--rainfall",
            "0",
        ])
        .unwrap();
        let Commands::Risk { temperature, .. } = cli.command else {
            panic!("expected risk");
        };
        assert!((temperature + 5.0).abs() < f64::EPSILON);
    }

    #[test]
    fn parses_analyze_image() {
        let cli =
            Cli::try_parse_from(["dengue_watch", "analyze-image", "a.png", "--location", "Uttara"])
                .unwrap();
        assert!(matches!(cli.command, Commands::AnalyzeImage { .. }));
    }

    #[test]
    fn content_types_by_extension() {
        assert_eq!(content_type_for(Path::new("site.JPG")), "image/jpeg");
        assert_eq!(content_type_for(Path::new("site.png")), "image/png");
        assert_eq!(content_type_for(Path::new("site")), "application/octet-stream");
    }
}
