//! Moon position (Meeus ch. 47, principal terms) and new moon instants (ch. 49).

use super::{DEG, LUNAR_MONTH_DAYS, normalize_degrees};

const EARTH_RADIUS_KM: f64 = 6378.14;

/// Approximate TT - UT for the current era.
const DELTA_T_DAYS: f64 = 69.0 / 86_400.0;

/// JDE of the mean new moon of lunation 0 (2000 January 6).
const NEW_MOON_EPOCH: f64 = 2451550.09766;

#[derive(Debug, Clone, Copy)]
pub(super) struct MoonPosition {
    pub longitude: f64,
    pub latitude: f64,
    pub distance_km: f64,
}

// Multiples of [D, M, M', F], then longitude (1e-6 deg) and distance (1e-3 km).
const LONGITUDE_DISTANCE_TERMS: [([i8; 4], f64, f64); 20] = [
    ([0, 0, 1, 0], 6_288_774.0, -20_905_355.0),
    ([2, 0, -1, 0], 1_274_027.0, -3_699_111.0),
    ([2, 0, 0, 0], 658_314.0, -2_955_968.0),
    ([0, 0, 2, 0], 213_618.0, -569_925.0),
    ([0, 1, 0, 0], -185_116.0, 48_888.0),
    ([0, 0, 0, 2], -114_332.0, -3_149.0),
    ([2, 0, -2, 0], 58_793.0, 246_158.0),
    ([2, -1, -1, 0], 57_066.0, -152_138.0),
    ([2, 0, 1, 0], 53_322.0, -170_733.0),
    ([2, -1, 0, 0], 45_758.0, -204_586.0),
    ([0, 1, -1, 0], -40_923.0, -129_620.0),
    ([1, 0, 0, 0], -34_720.0, 108_743.0),
    ([0, 1, 1, 0], -30_383.0, 104_755.0),
    ([2, 0, 0, -2], 15_327.0, 10_321.0),
    ([0, 0, 1, 2], -12_528.0, 0.0),
    ([0, 0, 1, -2], 10_980.0, 79_661.0),
    ([4, 0, -1, 0], 10_675.0, -34_782.0),
    ([0, 0, 3, 0], 10_034.0, -23_210.0),
    ([4, 0, -2, 0], 8_548.0, -21_636.0),
    ([2, 1, -1, 0], -7_888.0, 24_208.0),
];

// Multiples of [D, M, M', F], then latitude (1e-6 deg).
const LATITUDE_TERMS: [([i8; 4], f64); 20] = [
    ([0, 0, 0, 1], 5_128_122.0),
    ([0, 0, 1, 1], 280_602.0),
    ([0, 0, 1, -1], 277_693.0),
    ([2, 0, 0, -1], 173_237.0),
    ([2, 0, -1, 1], 55_413.0),
    ([2, 0, -1, -1], 46_271.0),
    ([2, 0, 0, 1], 32_573.0),
    ([0, 0, 2, 1], 17_198.0),
    ([2, 0, 1, -1], 9_266.0),
    ([0, 0, 2, -1], 8_822.0),
    ([2, -1, 0, -1], 8_216.0),
    ([2, 0, -2, -1], 4_324.0),
    ([2, 0, 1, 1], 4_200.0),
    ([2, 1, 0, -1], -3_359.0),
    ([2, -1, -1, 1], 2_463.0),
    ([2, -1, 0, 1], 2_211.0),
    ([2, -1, -1, -1], 2_065.0),
    ([0, 1, -1, -1], -1_870.0),
    ([4, 0, -1, -1], 1_828.0),
    ([0, 1, 0, 1], -1_794.0),
];

/// Apparent obliquity of the ecliptic in degrees, with the nutation term driven by
/// the longitude of the moon's ascending node.
pub(super) fn obliquity(t: f64) -> f64 {
    let arcsec = 21.448 - 46.8150 * t - 0.00059 * t * t + 0.001813 * t * t * t;
    let mean = 23.0 + (26.0 + arcsec / 60.0) / 60.0;
    let ascending_node = 125.04 - 1934.136 * t;
    mean + 0.00256 * (ascending_node * DEG).cos()
}

/// Geocentric ecliptic position of the moon at Julian century `t`.
pub(super) fn position(t: f64) -> MoonPosition {
    let t2 = t * t;
    let t3 = t2 * t;
    let t4 = t3 * t;

    let mean_longitude = normalize_degrees(
        218.3164477 + 481267.88123421 * t - 0.0015786 * t2 + t3 / 538_841.0 - t4 / 65_194_000.0,
    );
    let elongation = normalize_degrees(
        297.8501921 + 445267.1114034 * t - 0.0018819 * t2 + t3 / 545_868.0 - t4 / 113_065_000.0,
    );
    let sun_anomaly =
        normalize_degrees(357.5291092 + 35999.0502909 * t - 0.0001536 * t2 + t3 / 24_490_000.0);
    let moon_anomaly = normalize_degrees(
        134.9633964 + 477198.8675055 * t + 0.0087414 * t2 + t3 / 69_699.0 - t4 / 14_712_000.0,
    );
    let latitude_argument = normalize_degrees(
        93.2720950 + 483202.0175233 * t - 0.0036539 * t2 - t3 / 3_526_000.0 + t4 / 863_310_000.0,
    );

    let eccentricity = 1.0 - 0.002516 * t - 0.0000074 * t2;
    let args = [elongation, sun_anomaly, moon_anomaly, latitude_argument];

    // Terms involving the sun's anomaly shrink with the earth's orbital eccentricity.
    let argument_and_scale = |multiples: &[i8; 4]| {
        let angle: f64 = multiples.iter().zip(args).map(|(&k, arg)| f64::from(k) * arg).sum();
        let scale = eccentricity.powi(i32::from(multiples[1].abs()));
        (angle * DEG, scale)
    };

    let (mut sum_l, mut sum_r) = (0.0, 0.0);
    for (multiples, coeff_l, coeff_r) in &LONGITUDE_DISTANCE_TERMS {
        let (angle, scale) = argument_and_scale(multiples);
        sum_l += coeff_l * scale * angle.sin();
        sum_r += coeff_r * scale * angle.cos();
    }

    let mut sum_b = 0.0;
    for (multiples, coeff_b) in &LATITUDE_TERMS {
        let (angle, scale) = argument_and_scale(multiples);
        sum_b += coeff_b * scale * angle.sin();
    }

    let a1 = (119.75 + 131.849 * t) * DEG;
    let a2 = (53.09 + 479264.290 * t) * DEG;
    let a3 = (313.45 + 481266.484 * t) * DEG;
    let (lp, mp, f) = (mean_longitude * DEG, moon_anomaly * DEG, latitude_argument * DEG);

    sum_l += 3958.0 * a1.sin() + 1962.0 * (lp - f).sin() + 318.0 * a2.sin();
    sum_b += -2235.0 * lp.sin()
        + 382.0 * a3.sin()
        + 175.0 * (a1 - f).sin()
        + 175.0 * (a1 + f).sin()
        + 127.0 * (lp - mp).sin()
        - 115.0 * (lp + mp).sin();

    MoonPosition {
        longitude: normalize_degrees(mean_longitude + sum_l / 1_000_000.0),
        latitude: sum_b / 1_000_000.0,
        distance_km: 385_000.56 + sum_r / 1000.0,
    }
}

/// Shift a geocentric altitude to the observer's surface position (lunar parallax).
pub(super) fn topocentric_altitude(geocentric: f64, distance_km: f64) -> f64 {
    let horizontal_parallax = (EARTH_RADIUS_KM / distance_km).asin();
    let parallax = (horizontal_parallax.sin() * (geocentric * DEG).cos()).asin() / DEG;
    geocentric - parallax
}

// Coefficient, power of E, then multiples of [M, M', F, Omega].
const NEW_MOON_TERMS: [(f64, i32, [i8; 4]); 25] = [
    (-0.40720, 0, [0, 1, 0, 0]),
    (0.17241, 1, [1, 0, 0, 0]),
    (0.01608, 0, [0, 2, 0, 0]),
    (0.01039, 0, [0, 0, 2, 0]),
    (0.00739, 1, [-1, 1, 0, 0]),
    (-0.00514, 1, [1, 1, 0, 0]),
    (0.00208, 2, [2, 0, 0, 0]),
    (-0.00111, 0, [0, 1, -2, 0]),
    (-0.00057, 0, [0, 1, 2, 0]),
    (0.00056, 1, [1, 2, 0, 0]),
    (-0.00042, 0, [0, 3, 0, 0]),
    (0.00042, 1, [1, 0, 2, 0]),
    (0.00038, 1, [1, 0, -2, 0]),
    (-0.00024, 1, [-1, 2, 0, 0]),
    (-0.00017, 0, [0, 0, 0, 1]),
    (-0.00007, 0, [2, 1, 0, 0]),
    (0.00004, 0, [0, 2, -2, 0]),
    (0.00004, 0, [3, 0, 0, 0]),
    (0.00003, 0, [1, 1, -2, 0]),
    (0.00003, 0, [0, 2, 2, 0]),
    (-0.00003, 0, [1, 1, 2, 0]),
    (0.00003, 0, [-1, 1, 2, 0]),
    (-0.00002, 0, [-1, 1, -2, 0]),
    (-0.00002, 0, [1, 3, 0, 0]),
    (0.00002, 0, [0, 4, 0, 0]),
];

/// Julian date (UT) of the true new moon of lunation `k` counted from 2000 January 6.
fn new_moon(k: f64) -> f64 {
    let t = k / 1236.85;
    let t2 = t * t;
    let t3 = t2 * t;
    let t4 = t3 * t;

    let mean = NEW_MOON_EPOCH + LUNAR_MONTH_DAYS * k + 0.00015437 * t2 - 0.000000150 * t3
        + 0.00000000073 * t4;

    let sun_anomaly = 2.5534 + 29.10535670 * k - 0.0000014 * t2 - 0.00000011 * t3;
    let moon_anomaly =
        201.5643 + 385.81693528 * k + 0.0107582 * t2 + 0.00001238 * t3 - 0.000000058 * t4;
    let latitude_argument =
        160.7108 + 390.67050284 * k - 0.0016118 * t2 - 0.00000227 * t3 + 0.000000011 * t4;
    let node = 124.7746 - 1.56375588 * k + 0.0020672 * t2 + 0.00000215 * t3;
    let eccentricity = 1.0 - 0.002516 * t - 0.0000074 * t2;

    let args = [sun_anomaly, moon_anomaly, latitude_argument, node];
    let correction: f64 = NEW_MOON_TERMS
        .iter()
        .map(|(coeff, e_power, multiples)| {
            let angle: f64 = multiples.iter().zip(args).map(|(&m, arg)| f64::from(m) * arg).sum();
            coeff * eccentricity.powi(*e_power) * (angle * DEG).sin()
        })
        .sum();

    mean + correction - DELTA_T_DAYS
}

/// Julian date of the most recent new moon strictly before `jd`.
pub(super) fn previous_new_moon(jd: f64) -> f64 {
    let mut k = ((jd - NEW_MOON_EPOCH) / LUNAR_MONTH_DAYS).floor();
    // Periodic corrections stay well under a day, so at most one step either way.
    while new_moon(k) >= jd {
        k -= 1.0;
    }
    while new_moon(k + 1.0) < jd {
        k += 1.0;
    }
    new_moon(k)
}
