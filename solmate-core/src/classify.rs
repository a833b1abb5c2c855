//! Threshold classifiers turning numeric observations into sentences.
//!
//! Every classifier is an ordered band table: rows are tested top to bottom and the
//! first row whose predicate holds decides the outcome. A row may decide that no
//! sentence applies (`sentence: None`), which is distinct from no row matching.

use crate::astro::CelestialState;

/// One row of an ordered threshold table.
struct Band<T> {
    applies: fn(T) -> bool,
    sentence: Option<&'static str>,
}

fn first_match<T: Copy>(bands: &[Band<T>], input: T) -> Option<&'static str> {
    bands
        .iter()
        .find(|band| (band.applies)(input))
        .and_then(|band| band.sentence)
}

/// Cloud fraction at or above which the sky counts as overcast for sun/moon purposes.
const OVERCAST: f64 = 0.9;

#[derive(Clone, Copy)]
struct SunInput {
    altitude: f64,
    cloud_cover: f64,
}

const SUN_BANDS: &[Band<SunInput>] = &[
    Band { applies: |s| s.altitude <= -18.0, sentence: Some("It is dark.") },
    Band {
        applies: |s| -18.0 < s.altitude && s.altitude <= -12.0,
        sentence: Some("It is dark, with hints of twilight."),
    },
    Band {
        applies: |s| -12.0 < s.altitude && s.altitude <= -6.0,
        sentence: Some("It is twilight."),
    },
    Band {
        applies: |s| -6.0 < s.altitude && s.altitude < 0.0,
        sentence: Some("It is the blue hour."),
    },
    Band {
        applies: |s| (0.0..=6.0).contains(&s.altitude),
        sentence: Some("It is the golden hour."),
    },
    Band {
        applies: |s| s.altitude > 6.0 && s.cloud_cover >= OVERCAST,
        sentence: Some("The sun is hidden behind clouds."),
    },
    Band { applies: |s| s.altitude > 20.0, sentence: Some("The sun is high in the sky.") },
    Band { applies: |s| s.altitude > 6.0, sentence: Some("The sun is low in the sky.") },
];

const DARK: &str = "It is dark.";

const MOON_THROUGH_CLOUDS: &str = "The moon is shining through the clouds.";

// The full-moon row must stay ahead of the wider gibbous row it sits inside.
const MOON_PHASE_BANDS: &[Band<f64>] = &[
    Band {
        applies: |age| age < 3.0 || age > 25.0,
        sentence: Some("A crescent moon is visible in the sky."),
    },
    Band {
        applies: |age| 13.0 < age && age < 15.0,
        sentence: Some("A full moon is visible in the sky."),
    },
    Band {
        applies: |age| 7.0 < age && age < 22.0,
        sentence: Some("A gibbous moon is visible in the sky."),
    },
    Band { applies: |_| true, sentence: Some("The moon is visible in the sky.") },
];

const CLOUD_BANDS: &[Band<f64>] = &[
    Band { applies: |c| c < 0.1, sentence: Some("There's not a single cloud in the sky.") },
    Band { applies: |c| c < 0.3, sentence: Some("The sky is mostly clear with a few clouds.") },
    Band { applies: |c| c < 0.7, sentence: Some("The sky is partly cloudy.") },
    Band { applies: |c| c < 0.9, sentence: Some("The sky is mostly cloudy.") },
    Band { applies: |_| true, sentence: Some("The sky is completely overcast.") },
];

const SNOW_BANDS: &[Band<f64>] = &[
    Band { applies: |d| d == 0.0, sentence: None },
    Band { applies: |d| d < 0.01, sentence: Some("There is a light dusting of snow on the ground.") },
    Band { applies: |d| d < 0.1, sentence: Some("There is snow on the ground.") },
    Band { applies: |_| true, sentence: Some("There is a thick layer of snow on the ground.") },
];

const WIND_BANDS: &[Band<f64>] = &[
    Band { applies: |w| w < 1.0, sentence: None },
    Band { applies: |w| w < 20.0, sentence: Some("There's a light breeze gently blowing.") },
    Band { applies: |w| w < 40.0, sentence: Some("A moderate breeze is blowing.") },
    Band { applies: |w| w < 60.0, sentence: Some("There's a strong wind blowing.") },
    Band { applies: |w| w < 90.0, sentence: Some("A gale is blowing with very strong winds.") },
    Band { applies: |_| true, sentence: Some("The wind is stormy and extremely strong.") },
];

/// Sun sentence plus, at night or in twilight, an optional moon sentence.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SkyDescription {
    pub sun: &'static str,
    pub moon: Option<&'static str>,
}

pub fn describe_sky(state: &CelestialState, cloud_cover: f64) -> SkyDescription {
    let input = SunInput { altitude: state.sun_altitude_deg, cloud_cover };

    SkyDescription {
        sun: first_match(SUN_BANDS, input).unwrap_or(DARK),
        moon: describe_moon(state, cloud_cover),
    }
}

fn describe_moon(state: &CelestialState, cloud_cover: f64) -> Option<&'static str> {
    let sun = state.sun_altitude_deg;
    if sun > -6.0 || state.moon_altitude_deg <= 0.0 {
        return None;
    }

    if cloud_cover >= OVERCAST {
        // Under dim twilight the clouds hide it entirely.
        return (sun < -12.0).then_some(MOON_THROUGH_CLOUDS);
    }

    first_match(MOON_PHASE_BANDS, state.moon_age_days)
}

/// Always yields a sentence for a cloud fraction in 0..=1.
pub fn describe_clouds(cloud_cover: f64) -> &'static str {
    first_match(CLOUD_BANDS, cloud_cover).unwrap_or("The sky is completely overcast.")
}

pub fn describe_snow(snow_depth: f64) -> Option<&'static str> {
    first_match(SNOW_BANDS, snow_depth)
}

pub fn describe_wind(wind_speed: f64) -> Option<&'static str> {
    first_match(WIND_BANDS, wind_speed)
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn state(sun: f64, moon: f64, age: f64) -> CelestialState {
        CelestialState { sun_altitude_deg: sun, moon_altitude_deg: moon, moon_age_days: age }
    }

    fn sun_sentence(sun: f64, cloud: f64) -> &'static str {
        describe_sky(&state(sun, -10.0, 10.0), cloud).sun
    }

    #[test]
    fn sun_band_edges() {
        assert_eq!(sun_sentence(-18.0, 0.0), "It is dark.");
        assert_eq!(sun_sentence(-17.99, 0.0), "It is dark, with hints of twilight.");
        assert_eq!(sun_sentence(-12.0, 0.0), "It is dark, with hints of twilight.");
        assert_eq!(sun_sentence(-11.99, 0.0), "It is twilight.");
        assert_eq!(sun_sentence(-6.0, 0.0), "It is twilight.");
        assert_eq!(sun_sentence(-5.99, 0.0), "It is the blue hour.");
        assert_eq!(sun_sentence(-0.01, 0.0), "It is the blue hour.");
        assert_eq!(sun_sentence(0.0, 0.0), "It is the golden hour.");
        assert_eq!(sun_sentence(6.0, 0.95), "It is the golden hour.");
        assert_eq!(sun_sentence(6.01, 0.0), "The sun is low in the sky.");
        assert_eq!(sun_sentence(20.0, 0.0), "The sun is low in the sky.");
        assert_eq!(sun_sentence(20.01, 0.0), "The sun is high in the sky.");
    }

    #[test]
    fn clouds_hide_the_sun_once_above_golden_hour() {
        assert_eq!(sun_sentence(10.0, 0.95), "The sun is hidden behind clouds.");
        assert_eq!(sun_sentence(45.0, 0.9), "The sun is hidden behind clouds.");
        assert_eq!(sun_sentence(45.0, 0.89), "The sun is high in the sky.");
    }

    #[test]
    fn full_moon_takes_precedence_over_gibbous() {
        let sky = describe_sky(&state(-20.0, 10.0, 14.0), 0.05);
        assert_eq!(sky.sun, "It is dark.");
        assert_eq!(sky.moon, Some("A full moon is visible in the sky."));
    }

    #[test]
    fn moon_phase_bands() {
        let moon = |age| describe_sky(&state(-20.0, 10.0, age), 0.0).moon;
        assert_eq!(moon(0.5), Some("A crescent moon is visible in the sky."));
        assert_eq!(moon(25.5), Some("A crescent moon is visible in the sky."));
        assert_eq!(moon(3.0), Some("The moon is visible in the sky."));
        assert_eq!(moon(7.0), Some("The moon is visible in the sky."));
        assert_eq!(moon(7.5), Some("A gibbous moon is visible in the sky."));
        assert_eq!(moon(13.0), Some("A gibbous moon is visible in the sky."));
        assert_eq!(moon(15.0), Some("A gibbous moon is visible in the sky."));
        assert_eq!(moon(22.0), Some("The moon is visible in the sky."));
        assert_eq!(moon(25.0), Some("The moon is visible in the sky."));
    }

    #[test]
    fn moon_below_horizon_is_absent() {
        assert_eq!(describe_sky(&state(-20.0, 0.0, 14.0), 0.0).moon, None);
        assert_eq!(describe_sky(&state(-20.0, -5.0, 14.0), 0.0).moon, None);
    }

    #[test]
    fn moon_behind_clouds_depends_on_darkness() {
        let dark = describe_sky(&state(-12.5, 10.0, 14.0), 0.95);
        assert_eq!(dark.moon, Some("The moon is shining through the clouds."));

        let twilight = describe_sky(&state(-12.0, 10.0, 14.0), 0.95);
        assert_eq!(twilight.sun, "It is dark, with hints of twilight.");
        assert_eq!(twilight.moon, None);
    }

    #[test]
    fn moon_considered_at_exactly_minus_six() {
        let sky = describe_sky(&state(-6.0, 10.0, 1.0), 0.0);
        assert_eq!(sky.moon, Some("A crescent moon is visible in the sky."));
        assert_eq!(describe_sky(&state(-5.99, 10.0, 1.0), 0.0).moon, None);
    }

    #[test]
    fn cloud_band_edges() {
        assert_eq!(describe_clouds(0.0), "There's not a single cloud in the sky.");
        assert_eq!(describe_clouds(0.1), "The sky is mostly clear with a few clouds.");
        assert_eq!(describe_clouds(0.3), "The sky is partly cloudy.");
        assert_eq!(describe_clouds(0.7), "The sky is mostly cloudy.");
        assert_eq!(describe_clouds(0.9), "The sky is completely overcast.");
        assert_eq!(describe_clouds(1.0), "The sky is completely overcast.");
    }

    #[test]
    fn snow_band_edges() {
        assert_eq!(describe_snow(0.0), None);
        assert_eq!(describe_snow(0.0099), Some("There is a light dusting of snow on the ground."));
        assert_eq!(describe_snow(0.01), Some("There is snow on the ground."));
        assert_eq!(describe_snow(0.0999), Some("There is snow on the ground."));
        assert_eq!(describe_snow(0.1), Some("There is a thick layer of snow on the ground."));
    }

    #[test]
    fn wind_band_edges() {
        assert_eq!(describe_wind(0.0), None);
        assert_eq!(describe_wind(0.99), None);
        assert_eq!(describe_wind(1.0), Some("There's a light breeze gently blowing."));
        assert_eq!(describe_wind(20.0), Some("A moderate breeze is blowing."));
        assert_eq!(describe_wind(40.0), Some("There's a strong wind blowing."));
        assert_eq!(describe_wind(60.0), Some("A gale is blowing with very strong winds."));
        assert_eq!(describe_wind(89.99), Some("A gale is blowing with very strong winds."));
        assert_eq!(describe_wind(90.0), Some("The wind is stormy and extremely strong."));
    }

    proptest! {
        #[test]
        fn every_cloud_fraction_maps_to_a_fixed_sentence(cloud in 0.0f64..=1.0) {
            let sentence = describe_clouds(cloud);
            prop_assert!(CLOUD_BANDS.iter().any(|band| band.sentence == Some(sentence)));
        }

        #[test]
        fn positive_snow_always_yields_a_sentence(depth in 1e-9f64..100.0) {
            prop_assert!(describe_snow(depth).is_some());
        }

        #[test]
        fn wind_is_absent_only_below_one(speed in 0.0f64..500.0) {
            prop_assert_eq!(describe_wind(speed).is_none(), speed < 1.0);
        }

        #[test]
        fn moon_absent_when_sun_above_minus_six(
            sun in -5.999f64..90.0,
            moon in -90.0f64..90.0,
            age in 0.0f64..29.53,
            cloud in 0.0f64..=1.0,
        ) {
            prop_assert_eq!(describe_sky(&state(sun, moon, age), cloud).moon, None);
        }

        #[test]
        fn sun_sentence_comes_from_the_table(sun in -90.0f64..=90.0, cloud in 0.0f64..=1.0) {
            let sentence = describe_sky(&state(sun, 0.0, 0.0), cloud).sun;
            prop_assert!(SUN_BANDS.iter().any(|band| band.sentence == Some(sentence)));
        }
    }
}
