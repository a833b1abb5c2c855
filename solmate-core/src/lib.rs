//! Core library for the `solmate` conditions narrator.
//!
//! This crate defines:
//! - Sun/moon altitude and moon age for a position and instant
//! - Threshold classifiers turning observations into sentences
//! - The narrative composer and the `narrate` entry point
//! - Configuration, the Open-Meteo data source and the report pipeline
//!
//! It is used by `solmate-cli`, but the narration core has no I/O and can be reused anywhere.

pub mod astro;
pub mod classify;
pub mod config;
pub mod error;
pub mod format;
pub mod model;
pub mod narrative;
pub mod provider;
pub mod report;
pub mod weather_code;

pub use astro::CelestialState;
pub use config::{Config, LocationConfig, OpenMeteoConfig};
pub use error::NarrateError;
pub use model::{ObserverPosition, Temperature, TemperatureUnit, WeatherObservation};
pub use narrative::{Narrative, narrate};
pub use provider::{WeatherSource, open_meteo::OpenMeteoSource};
pub use report::{ReportRequest, StatusBody, current_report};
