use std::fmt;

use chrono::{DateTime, Utc};

use crate::{
    astro,
    classify::{self, SkyDescription},
    error::NarrateError,
    model::{ObserverPosition, WeatherObservation},
    weather_code,
};

/// The fixed-order slots of a report. Absent or empty slots are skipped when rendered.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Narrative {
    pub temperature: Option<String>,
    pub weather: Option<String>,
    pub time: Option<String>,
    pub sun: Option<String>,
    pub moon: Option<String>,
    pub clouds: Option<String>,
    pub wind: Option<String>,
    pub snow: Option<String>,
}

impl Narrative {
    /// Assemble the slots from already-classified pieces.
    ///
    /// `formatted_temperature` is the value with its unit (e.g. "21°C"), `formatted_time`
    /// the complete time-of-day sentence. Either may be empty to drop its line.
    pub fn compose(
        formatted_temperature: &str,
        weather_description: &str,
        formatted_time: &str,
        sky: SkyDescription,
        clouds: &str,
        wind: Option<&str>,
        snow: Option<&str>,
    ) -> Self {
        let labelled = |label: &str, text: &str| {
            (!text.is_empty()).then(|| format!("{label}: {text}"))
        };

        Self {
            temperature: labelled("Temperature", formatted_temperature),
            weather: labelled("Weather condition", weather_description),
            time: Some(formatted_time.to_string()),
            sun: Some(sky.sun.to_string()),
            moon: sky.moon.map(str::to_string),
            clouds: Some(clouds.to_string()),
            wind: wind.map(str::to_string),
            snow: snow.map(str::to_string),
        }
    }

    /// Non-empty lines in slot order.
    pub fn lines(&self) -> impl Iterator<Item = &str> {
        [
            &self.temperature,
            &self.weather,
            &self.time,
            &self.sun,
            &self.moon,
            &self.clouds,
            &self.wind,
            &self.snow,
        ]
        .into_iter()
        .filter_map(|slot| slot.as_deref())
        .filter(|line| !line.is_empty())
    }

    pub fn render(&self) -> String {
        self.lines().collect::<Vec<_>>().join("\n")
    }
}

impl fmt::Display for Narrative {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.render())
    }
}

/// Classify one observation at one place and time into a [`Narrative`].
pub fn build(
    position: &ObserverPosition,
    instant: DateTime<Utc>,
    observation: &WeatherObservation,
    formatted_temperature: &str,
    formatted_time: &str,
) -> Result<Narrative, NarrateError> {
    observation.validate()?;
    let state = astro::compute(position, instant)?;

    Ok(Narrative::compose(
        formatted_temperature,
        weather_code::describe(observation.weather_code),
        formatted_time,
        classify::describe_sky(&state, observation.cloud_cover),
        classify::describe_clouds(observation.cloud_cover),
        classify::describe_wind(observation.wind_speed),
        classify::describe_snow(observation.snow_depth),
    ))
}

/// Newline-joined report for one observation at one place and time.
pub fn narrate(
    position: &ObserverPosition,
    instant: DateTime<Utc>,
    observation: &WeatherObservation,
    formatted_temperature: &str,
    formatted_time: &str,
) -> Result<String, NarrateError> {
    build(position, instant, observation, formatted_temperature, formatted_time)
        .map(|narrative| narrative.render())
}
