use async_trait::async_trait;
use chrono_tz::Tz;

use crate::{
    Config,
    model::{ObserverPosition, TemperatureUnit, WeatherObservation},
    provider::open_meteo::OpenMeteoSource,
};

pub mod open_meteo;

/// A source of current weather observations for a position.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait WeatherSource: Send + Sync {
    async fn current(
        &self,
        position: &ObserverPosition,
        timezone: Tz,
        unit: TemperatureUnit,
    ) -> anyhow::Result<WeatherObservation>;
}

/// Construct the configured data source.
pub fn source_from_config(config: &Config) -> anyhow::Result<Box<dyn WeatherSource>> {
    let source = OpenMeteoSource::new(config.open_meteo.clone())?;
    Ok(Box::new(source))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::OpenMeteoConfig;

    #[test]
    fn source_from_default_config_builds() {
        let cfg = Config::default();
        assert!(source_from_config(&cfg).is_ok());
    }

    #[test]
    fn source_from_config_accepts_custom_base_url() {
        let cfg = Config {
            open_meteo: OpenMeteoConfig {
                base_url: "http://127.0.0.1:9".to_string(),
                timeout_secs: 1,
            },
            ..Config::default()
        };
        assert!(source_from_config(&cfg).is_ok());
    }
}
