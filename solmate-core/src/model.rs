use std::{fmt, str::FromStr};

use anyhow::anyhow;
use serde::{Deserialize, Serialize};

use crate::error::NarrateError;

/// Geographic position of the observer, in signed degrees.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ObserverPosition {
    pub latitude: f64,
    pub longitude: f64,
}

impl ObserverPosition {
    /// Build a position, rejecting out-of-range or non-finite coordinates.
    pub fn new(latitude: f64, longitude: f64) -> Result<Self, NarrateError> {
        let position = Self { latitude, longitude };
        position.validate()?;
        Ok(position)
    }

    pub fn validate(&self) -> Result<(), NarrateError> {
        // `contains` is false for NaN, so non-finite input is rejected too.
        if (-90.0..=90.0).contains(&self.latitude) && (-180.0..=180.0).contains(&self.longitude) {
            Ok(())
        } else {
            Err(NarrateError::InvalidPosition {
                latitude: self.latitude,
                longitude: self.longitude,
            })
        }
    }
}

/// Unit requested from the data source for temperatures.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TemperatureUnit {
    #[default]
    Celsius,
    Fahrenheit,
}

impl TemperatureUnit {
    pub fn as_str(&self) -> &'static str {
        match self {
            TemperatureUnit::Celsius => "celsius",
            TemperatureUnit::Fahrenheit => "fahrenheit",
        }
    }

    /// Unit tag used when the data source does not report one.
    pub fn symbol(&self) -> &'static str {
        match self {
            TemperatureUnit::Celsius => "°C",
            TemperatureUnit::Fahrenheit => "°F",
        }
    }

    pub const fn all() -> &'static [TemperatureUnit] {
        &[TemperatureUnit::Celsius, TemperatureUnit::Fahrenheit]
    }
}

impl fmt::Display for TemperatureUnit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TemperatureUnit {
    type Err = anyhow::Error;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.to_lowercase().as_str() {
            "celsius" | "c" => Ok(TemperatureUnit::Celsius),
            "fahrenheit" | "f" => Ok(TemperatureUnit::Fahrenheit),
            _ => Err(anyhow!(
                "Unknown temperature unit '{value}'. Supported units: celsius, fahrenheit."
            )),
        }
    }
}

/// A temperature value tagged with the unit text reported alongside it (e.g. "°C").
#[derive(Debug, Clone, PartialEq)]
pub struct Temperature {
    pub value: f64,
    pub unit: String,
}

impl Temperature {
    pub fn new(value: f64, unit: impl Into<String>) -> Self {
        Self { value, unit: unit.into() }
    }
}

/// Snapshot of one measurement instant.
#[derive(Debug, Clone, PartialEq)]
pub struct WeatherObservation {
    pub temperature: Temperature,
    /// Fraction of the sky covered, 0.0..=1.0.
    pub cloud_cover: f64,
    /// Meters.
    pub snow_depth: f64,
    /// km/h.
    pub wind_speed: f64,
    pub weather_code: u32,
}

impl WeatherObservation {
    pub fn validate(&self) -> Result<(), NarrateError> {
        if !self.temperature.value.is_finite() {
            return Err(NarrateError::InvalidObservation(format!(
                "temperature must be a finite number, got {}",
                self.temperature.value
            )));
        }
        if !(0.0..=1.0).contains(&self.cloud_cover) {
            return Err(NarrateError::InvalidObservation(format!(
                "cloud_cover must be within 0..=1, got {}",
                self.cloud_cover
            )));
        }
        check_non_negative("snow_depth", self.snow_depth)?;
        check_non_negative("wind_speed", self.wind_speed)?;
        Ok(())
    }
}

fn check_non_negative(field: &str, value: f64) -> Result<(), NarrateError> {
    if value >= 0.0 && value.is_finite() {
        Ok(())
    } else {
        Err(NarrateError::InvalidObservation(format!(
            "{field} must be a non-negative number, got {value}"
        )))
    }
}

#[cfg(test)]
pub(crate) fn sample_observation() -> WeatherObservation {
    WeatherObservation {
        temperature: Temperature::new(12.4, "°C"),
        cloud_cover: 0.05,
        snow_depth: 0.0,
        wind_speed: 0.5,
        weather_code: 0,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn position_accepts_range_edges() {
        assert!(ObserverPosition::new(90.0, 180.0).is_ok());
        assert!(ObserverPosition::new(-90.0, -180.0).is_ok());
        assert!(ObserverPosition::new(59.33, 18.07).is_ok());
    }

    #[test]
    fn position_rejects_out_of_range_and_nan() {
        for (lat, lon) in [(90.5, 0.0), (-91.0, 0.0), (0.0, 180.1), (0.0, -181.0), (f64::NAN, 0.0)] {
            let err = ObserverPosition::new(lat, lon).unwrap_err();
            assert!(matches!(err, NarrateError::InvalidPosition { .. }), "{lat}/{lon}");
        }
    }

    #[test]
    fn observation_rejects_cloud_cover_outside_unit_range() {
        let mut obs = sample_observation();
        obs.cloud_cover = 1.2;
        let err = obs.validate().unwrap_err();
        assert!(err.to_string().contains("cloud_cover"));

        obs.cloud_cover = -0.01;
        assert!(obs.validate().is_err());
    }

    #[test]
    fn observation_rejects_negative_wind_and_snow() {
        let mut obs = sample_observation();
        obs.wind_speed = -1.0;
        assert!(obs.validate().unwrap_err().to_string().contains("wind_speed"));

        let mut obs = sample_observation();
        obs.snow_depth = f64::NAN;
        assert!(obs.validate().unwrap_err().to_string().contains("snow_depth"));
    }

    #[test]
    fn observation_rejects_non_finite_temperature() {
        for value in [f64::NAN, f64::INFINITY, f64::NEG_INFINITY] {
            let mut obs = sample_observation();
            obs.temperature.value = value;
            let err = obs.validate().unwrap_err();
            assert!(matches!(err, NarrateError::InvalidObservation(_)), "{value}");
            assert!(err.to_string().contains("temperature"), "{value}");
        }
    }

    #[test]
    fn observation_accepts_edges() {
        let mut obs = sample_observation();
        obs.cloud_cover = 1.0;
        obs.snow_depth = 0.0;
        obs.wind_speed = 0.0;
        assert!(obs.validate().is_ok());
    }

    #[test]
    fn temperature_unit_parses_case_insensitively() {
        assert_eq!("Fahrenheit".parse::<TemperatureUnit>().unwrap(), TemperatureUnit::Fahrenheit);
        assert_eq!("c".parse::<TemperatureUnit>().unwrap(), TemperatureUnit::Celsius);
        let err = "kelvin".parse::<TemperatureUnit>().unwrap_err();
        assert!(err.to_string().contains("Unknown temperature unit"));
    }
}
