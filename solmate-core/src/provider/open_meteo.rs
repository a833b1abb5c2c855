use std::time::Duration;

use anyhow::{Context, Result, anyhow};
use async_trait::async_trait;
use chrono_tz::Tz;
use reqwest::Client;
use serde::Deserialize;
use tracing::{debug, instrument};

use crate::{
    config::OpenMeteoConfig,
    model::{ObserverPosition, Temperature, TemperatureUnit, WeatherObservation},
};

use super::WeatherSource;

const CURRENT_FIELDS: &str = "temperature_2m,snow_depth,weather_code,cloud_cover,wind_speed_10m";

/// Current conditions from the Open-Meteo forecast API.
#[derive(Debug, Clone)]
pub struct OpenMeteoSource {
    config: OpenMeteoConfig,
    http: Client,
}

impl OpenMeteoSource {
    pub fn new(config: OpenMeteoConfig) -> Result<Self> {
        let http = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .context("Failed to build HTTP client for Open-Meteo")?;

        Ok(Self { config, http })
    }

    fn forecast_url(&self) -> String {
        format!("{}/forecast", self.config.base_url.trim_end_matches('/'))
    }
}

#[derive(Debug, Deserialize)]
struct OmCurrent {
    temperature_2m: f64,
    #[serde(default)]
    snow_depth: Option<f64>,
    weather_code: u32,
    /// Percent.
    cloud_cover: f64,
    wind_speed_10m: f64,
}

#[derive(Debug, Default, Deserialize)]
struct OmCurrentUnits {
    #[serde(default)]
    temperature_2m: Option<String>,
}

#[derive(Debug, Deserialize)]
struct OmResponse {
    current: OmCurrent,
    #[serde(default)]
    current_units: OmCurrentUnits,
}

impl OmResponse {
    fn into_observation(self, unit: TemperatureUnit) -> WeatherObservation {
        let unit_tag = self
            .current_units
            .temperature_2m
            .unwrap_or_else(|| unit.symbol().to_string());

        WeatherObservation {
            temperature: Temperature::new(self.current.temperature_2m, unit_tag),
            cloud_cover: self.current.cloud_cover / 100.0,
            snow_depth: self.current.snow_depth.unwrap_or_default(),
            wind_speed: self.current.wind_speed_10m,
            weather_code: self.current.weather_code,
        }
    }
}

#[async_trait]
impl WeatherSource for OpenMeteoSource {
    #[instrument(skip(self), fields(lat = %position.latitude, lon = %position.longitude))]
    async fn current(
        &self,
        position: &ObserverPosition,
        timezone: Tz,
        unit: TemperatureUnit,
    ) -> Result<WeatherObservation> {
        position.validate()?;

        let url = self.forecast_url();
        debug!(url = %url, "Fetching current conditions from Open-Meteo");

        let res = self
            .http
            .get(&url)
            .query(&[
                ("latitude", position.latitude.to_string()),
                ("longitude", position.longitude.to_string()),
                ("timezone", timezone.name().to_string()),
                ("current", CURRENT_FIELDS.to_string()),
                ("temperature_unit", unit.as_str().to_string()),
                ("wind_speed_unit", "kmh".to_string()),
                ("precipitation_unit", "mm".to_string()),
            ])
            .send()
            .await
            .context("Failed to send request to Open-Meteo (current conditions)")?;

        let status = res.status();
        let body = res
            .text()
            .await
            .context("Failed to read Open-Meteo response body")?;

        if !status.is_success() {
            return Err(anyhow!(
                "Open-Meteo request failed with status {}: {}",
                status,
                truncate_body(&body),
            ));
        }

        let parsed: OmResponse =
            serde_json::from_str(&body).context("Failed to parse Open-Meteo current JSON")?;

        let observation = parsed.into_observation(unit);
        debug!(?observation, "Received observation");
        Ok(observation)
    }
}

fn truncate_body(body: &str) -> String {
    const MAX: usize = 200;
    if body.len() > MAX {
        let mut end = MAX;
        while !body.is_char_boundary(end) {
            end -= 1;
        }
        format!("{}...", &body[..end])
    } else {
        body.to_string()
    }
}
