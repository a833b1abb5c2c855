use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use clap::{Parser, Subcommand};
use inquire::{CustomType, Select, Text};
use tracing::{debug, info};

use solmate_core::{
    Config, LocationConfig, ObserverPosition, ReportRequest, StatusBody, Temperature,
    TemperatureUnit, WeatherObservation, current_report, format, narrate,
    provider::source_from_config,
};

/// Top-level CLI struct.
#[derive(Debug, Parser)]
#[command(name = "solmate", version, about = "Narrates current outdoor conditions")]
pub struct Cli {
    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Store a default location and temperature unit.
    Configure,

    /// Fetch current weather and narrate it.
    Show {
        /// Latitude in degrees, north positive. Falls back to the configured location.
        #[arg(long, allow_negative_numbers = true, requires = "longitude")]
        latitude: Option<f64>,

        /// Longitude in degrees, east positive.
        #[arg(long, allow_negative_numbers = true, requires = "latitude")]
        longitude: Option<f64>,

        /// IANA timezone name, e.g. "Europe/Stockholm".
        #[arg(long)]
        timezone: Option<String>,

        /// celsius or fahrenheit.
        #[arg(long)]
        unit: Option<TemperatureUnit>,

        /// Print `{"status": ...}` instead of plain text.
        #[arg(long)]
        json: bool,
    },

    /// Narrate explicit observation values without any network access.
    Describe {
        #[arg(long, allow_negative_numbers = true)]
        latitude: f64,

        #[arg(long, allow_negative_numbers = true)]
        longitude: f64,

        /// Instant to describe (RFC 3339); defaults to now.
        #[arg(long)]
        at: Option<DateTime<Utc>>,

        #[arg(long, default_value = "UTC")]
        timezone: String,

        #[arg(long, allow_negative_numbers = true)]
        temperature: f64,

        #[arg(long, default_value_t = TemperatureUnit::Celsius)]
        unit: TemperatureUnit,

        /// Fraction of the sky covered, 0 to 1.
        #[arg(long, default_value_t = 0.0, allow_negative_numbers = true)]
        cloud_cover: f64,

        /// km/h.
        #[arg(long, default_value_t = 0.0, allow_negative_numbers = true)]
        wind_speed: f64,

        /// Meters.
        #[arg(long, default_value_t = 0.0, allow_negative_numbers = true)]
        snow_depth: f64,

        /// WMO weather code.
        #[arg(long, default_value_t = 0)]
        weather_code: u32,

        #[arg(long)]
        json: bool,
    },
}

impl Cli {
    pub async fn run(self) -> Result<()> {
        match self.command {
            Command::Configure => configure(),
            Command::Show { latitude, longitude, timezone, unit, json } => {
                let config = Config::load()?;
                let request = resolve_request(&config, latitude.zip(longitude), timezone, unit)?;
                let source = source_from_config(&config)?;

                let report = current_report(source.as_ref(), &request, Utc::now()).await?;
                print_report(report, json)
            }
            Command::Describe {
                latitude,
                longitude,
                at,
                timezone,
                temperature,
                unit,
                cloud_cover,
                wind_speed,
                snow_depth,
                weather_code,
                json,
            } => {
                let position = ObserverPosition { latitude, longitude };
                let timezone = format::parse_timezone(&timezone)?;
                let instant = at.unwrap_or_else(Utc::now);
                let observation = WeatherObservation {
                    temperature: Temperature::new(temperature, unit.symbol()),
                    cloud_cover,
                    snow_depth,
                    wind_speed,
                    weather_code,
                };
                debug!(?position, %instant, ?observation, "Describing explicit observation");

                let report = narrate(
                    &position,
                    instant,
                    &observation,
                    &format::temperature(&observation.temperature),
                    &format::local_time(instant, timezone),
                )?;
                print_report(report, json)
            }
        }
    }
}

/// Command-line values win; anything missing comes from the config file.
fn resolve_request(
    config: &Config,
    coordinates: Option<(f64, f64)>,
    timezone: Option<String>,
    unit: Option<TemperatureUnit>,
) -> Result<ReportRequest> {
    let unit = unit.unwrap_or(config.temperature_unit);

    let (position, timezone_name) = match coordinates {
        Some((latitude, longitude)) => {
            let position = ObserverPosition::new(latitude, longitude)?;
            (position, timezone.unwrap_or_else(|| "UTC".to_string()))
        }
        None => {
            let location = config.default_location()?;
            let name = timezone.unwrap_or_else(|| location.timezone.clone());
            (location.position()?, name)
        }
    };

    Ok(ReportRequest { position, timezone: format::parse_timezone(&timezone_name)?, unit })
}

fn print_report(report: String, json: bool) -> Result<()> {
    if json {
        let body = StatusBody { status: report };
        let rendered =
            serde_json::to_string_pretty(&body).context("Failed to serialize report as JSON")?;
        println!("{rendered}");
    } else {
        println!("{report}");
    }
    Ok(())
}

fn configure() -> Result<()> {
    let mut config = Config::load()?;
    let current = config.location.clone();

    let mut latitude_prompt = CustomType::<f64>::new("Latitude:")
        .with_help_message("Degrees, -90 to 90, north positive")
        .with_error_message("Please type a number");
    let mut longitude_prompt = CustomType::<f64>::new("Longitude:")
        .with_help_message("Degrees, -180 to 180, east positive")
        .with_error_message("Please type a number");
    if let Some(location) = &current {
        latitude_prompt = latitude_prompt.with_default(location.latitude);
        longitude_prompt = longitude_prompt.with_default(location.longitude);
    }

    let latitude = latitude_prompt.prompt()?;
    let longitude = longitude_prompt.prompt()?;
    ObserverPosition::new(latitude, longitude)?;

    let default_timezone = current.as_ref().map_or("UTC", |l| l.timezone.as_str());
    let timezone = Text::new("Timezone:")
        .with_help_message("IANA name, e.g. America/New_York")
        .with_default(default_timezone)
        .prompt()?;
    let timezone = timezone.trim().to_string();
    format::parse_timezone(&timezone)?;

    let units = TemperatureUnit::all().to_vec();
    let cursor = units.iter().position(|u| *u == config.temperature_unit).unwrap_or(0);
    let unit = Select::new("Temperature unit:", units).with_starting_cursor(cursor).prompt()?;

    config.set_location(LocationConfig { latitude, longitude, timezone });
    config.temperature_unit = unit;
    config.save()?;

    let path = Config::config_file_path()?;
    info!(path = %path.display(), "Configuration saved");
    println!("Saved configuration to {}", path.display());
    Ok(())
}
