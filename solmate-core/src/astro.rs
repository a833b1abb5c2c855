//! Sun and moon altitude for an observer, plus the age of the moon.
//!
//! The sun comes from NREL's Solar Position Algorithm via `solar_positioning`. The moon
//! uses the low-precision Meeus series (*Astronomical Algorithms*, ch. 47 and 49), good
//! to a few tenths of a degree, well inside the width of the narrative bands it feeds.

use chrono::{DateTime, Datelike, Utc};
use solar_positioning::{RefractionCorrection, spa, time::DeltaT};
use tracing::debug;

use crate::{error::NarrateError, model::ObserverPosition};

mod lunar;

/// Mean synodic month in days.
pub const LUNAR_MONTH_DAYS: f64 = 29.530588861;

const DEG: f64 = std::f64::consts::PI / 180.0;
const J2000: f64 = 2451545.0;
const UNIX_EPOCH_JD: f64 = 2440587.5;
const MILLIS_PER_DAY: f64 = 86_400_000.0;

/// Derived sun/moon state for one position and instant.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CelestialState {
    pub sun_altitude_deg: f64,
    pub moon_altitude_deg: f64,
    /// Days since the most recent new moon strictly before the instant.
    pub moon_age_days: f64,
}

/// Apparent (refracted) sun and moon altitudes and the moon's age.
pub fn compute(
    position: &ObserverPosition,
    instant: DateTime<Utc>,
) -> Result<CelestialState, NarrateError> {
    position.validate()?;

    let sun_altitude_deg = sun_altitude(position, instant)?;

    let jd = julian_date(instant);
    let t = julian_century(jd);
    let lst = local_sidereal_time(jd, position.longitude);

    let moon = lunar::position(t);
    let (ra, dec) = ecliptic_to_equatorial(moon.longitude, moon.latitude, lunar::obliquity(t));
    let geocentric = geometric_altitude(ra, dec, position.latitude, lst);
    let moon_altitude_deg = refract(lunar::topocentric_altitude(geocentric, moon.distance_km));

    let moon_age_days = jd - lunar::previous_new_moon(jd);

    debug!(
        lat = position.latitude,
        lon = position.longitude,
        %instant,
        sun_altitude_deg,
        moon_altitude_deg,
        moon_age_days,
        "Computed celestial state"
    );

    Ok(CelestialState { sun_altitude_deg, moon_altitude_deg, moon_age_days })
}

/// Sea-level sun elevation, refracted for a standard atmosphere.
fn sun_altitude(position: &ObserverPosition, instant: DateTime<Utc>) -> Result<f64, NarrateError> {
    let delta_t = DeltaT::estimate_from_date(instant.year(), instant.month())?;
    let sun = spa::solar_position(
        instant,
        position.latitude,
        position.longitude,
        0.0,
        delta_t,
        Some(RefractionCorrection::standard()),
    )?;
    Ok(sun.elevation_angle())
}

fn julian_date(instant: DateTime<Utc>) -> f64 {
    instant.timestamp_millis() as f64 / MILLIS_PER_DAY + UNIX_EPOCH_JD
}

fn julian_century(jd: f64) -> f64 {
    (jd - J2000) / 36525.0
}

fn normalize_degrees(angle: f64) -> f64 {
    angle.rem_euclid(360.0)
}

/// Local mean sidereal time in degrees; longitude east-positive.
fn local_sidereal_time(jd: f64, longitude: f64) -> f64 {
    let t = julian_century(jd);
    let gmst = 280.46061837 + 360.98564736629 * (jd - J2000) + 0.000387933 * t * t
        - t * t * t / 38_710_000.0;
    normalize_degrees(gmst + longitude)
}

/// Returns (right ascension, declination) in degrees.
fn ecliptic_to_equatorial(longitude: f64, latitude: f64, obliquity: f64) -> (f64, f64) {
    let (lon, lat, eps) = (longitude * DEG, latitude * DEG, obliquity * DEG);

    let ra = (lon.sin() * eps.cos() - lat.tan() * eps.sin()).atan2(lon.cos());
    let dec = (lat.sin() * eps.cos() + lat.cos() * eps.sin() * lon.sin()).asin();

    (normalize_degrees(ra / DEG), dec / DEG)
}

fn geometric_altitude(ra: f64, dec: f64, latitude: f64, lst: f64) -> f64 {
    let hour_angle = (lst - ra) * DEG;
    let (dec, lat) = (dec * DEG, latitude * DEG);

    let sin_alt = lat.sin() * dec.sin() + lat.cos() * dec.cos() * hour_angle.cos();
    sin_alt.clamp(-1.0, 1.0).asin() / DEG
}

/// Atmospheric refraction (Saemundsson) for the moon near or above the horizon.
fn refract(altitude: f64) -> f64 {
    if altitude < -1.0 {
        return altitude;
    }
    let arcmin = 1.02 / ((altitude + 10.3 / (altitude + 5.11)) * DEG).tan();
    (altitude + arcmin / 60.0).clamp(-90.0, 90.0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn at(y: i32, mo: u32, d: u32, h: u32, mi: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(y, mo, d, h, mi, 0).unwrap()
    }

    #[test]
    fn julian_date_of_j2000_noon() {
        assert!((julian_date(at(2000, 1, 1, 12, 0)) - J2000).abs() < 1e-9);
    }

    #[test]
    fn equinox_sun_is_overhead_at_the_equator_near_noon() {
        let equator = ObserverPosition::new(0.0, 0.0).unwrap();

        let noon = compute(&equator, at(2024, 3, 20, 12, 7)).unwrap();
        assert!(noon.sun_altitude_deg > 89.0, "{}", noon.sun_altitude_deg);

        let midnight = compute(&equator, at(2024, 3, 20, 0, 7)).unwrap();
        assert!(midnight.sun_altitude_deg < -89.0, "{}", midnight.sun_altitude_deg);
    }

    #[test]
    fn midsummer_noon_altitude_in_stockholm() {
        let stockholm = ObserverPosition::new(59.33, 18.07).unwrap();
        let state = compute(&stockholm, at(2024, 6, 21, 10, 49)).unwrap();

        // 90 - 59.33 + 23.44
        assert!((state.sun_altitude_deg - 54.11).abs() < 0.3, "{}", state.sun_altitude_deg);
    }

    #[test]
    fn sun_just_below_the_horizon_is_not_lifted_by_refraction() {
        // Sydney at sunset; geometric elevation about -0.98 deg.
        let sydney = ObserverPosition::new(-33.9, 151.2).unwrap();
        let state = compute(&sydney, at(2025, 10, 3, 8, 0)).unwrap();
        assert!((state.sun_altitude_deg + 0.979).abs() < 0.02, "{}", state.sun_altitude_deg);
    }

    #[test]
    fn sun_altitude_follows_the_solar_position_algorithm() {
        let position = ObserverPosition::new(51.5, -0.12).unwrap();
        for hour in (0..24).step_by(3) {
            let instant = at(2025, 6, 1, hour, 30);
            let expected = spa::solar_position(
                instant,
                51.5,
                -0.12,
                0.0,
                DeltaT::estimate_from_date(2025, 6).unwrap(),
                Some(RefractionCorrection::standard()),
            )
            .unwrap()
            .elevation_angle();

            let state = compute(&position, instant).unwrap();
            assert_eq!(state.sun_altitude_deg, expected, "hour {hour}");
        }
    }

    #[test]
    fn sun_and_moon_coincide_during_total_eclipse() {
        let dallas = ObserverPosition::new(32.7767, -96.797).unwrap();
        let state = compute(&dallas, at(2024, 4, 8, 18, 42)).unwrap();

        assert!(state.sun_altitude_deg > 60.0 && state.sun_altitude_deg < 68.0);
        assert!(
            (state.sun_altitude_deg - state.moon_altitude_deg).abs() < 1.0,
            "sun {} moon {}",
            state.sun_altitude_deg,
            state.moon_altitude_deg
        );
        // New moon was at 18:21 UTC that day.
        assert!(state.moon_age_days < 0.05, "{}", state.moon_age_days);
    }

    #[test]
    fn moon_age_one_day_after_new_moon() {
        let anywhere = ObserverPosition::new(40.7128, -74.006).unwrap();
        let state = compute(&anywhere, at(2024, 4, 9, 18, 21)).unwrap();
        assert!((state.moon_age_days - 1.0).abs() < 0.01, "{}", state.moon_age_days);
    }

    #[test]
    fn moon_age_just_before_new_moon_counts_from_previous_one() {
        // Previous new moon: 2024-03-10 09:00 UTC.
        let anywhere = ObserverPosition::new(0.0, 0.0).unwrap();
        let state = compute(&anywhere, at(2024, 4, 8, 18, 0)).unwrap();
        assert!((state.moon_age_days - 29.375).abs() < 0.02, "{}", state.moon_age_days);
    }

    #[test]
    fn altitudes_and_age_stay_in_range() {
        for (lat, lon) in [(90.0, 0.0), (-90.0, 180.0), (51.5, -0.12), (-33.9, 151.2)] {
            let position = ObserverPosition::new(lat, lon).unwrap();
            for day in 1..=28 {
                let state = compute(&position, at(2025, 2, day, (day * 5) % 24, 0)).unwrap();
                assert!((-90.0..=90.0).contains(&state.sun_altitude_deg));
                assert!((-90.0..=90.0).contains(&state.moon_altitude_deg));
                assert!(state.moon_age_days >= 0.0 && state.moon_age_days < 30.0);
            }
        }
    }

    #[test]
    fn rejects_invalid_position() {
        let bogus = ObserverPosition { latitude: 120.0, longitude: 0.0 };
        let err = compute(&bogus, at(2024, 1, 1, 0, 0)).unwrap_err();
        assert!(matches!(err, NarrateError::InvalidPosition { .. }));
    }

    #[test]
    fn is_deterministic_for_a_fixed_instant() {
        let position = ObserverPosition::new(35.68, 139.69).unwrap();
        let instant = at(2023, 11, 12, 20, 30);
        assert_eq!(compute(&position, instant).unwrap(), compute(&position, instant).unwrap());
    }
}
