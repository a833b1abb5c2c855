//! WMO weather interpretation codes, as reported by Open-Meteo.

/// Label used for any code outside the known set.
pub const UNKNOWN: &str = "Unknown";

const DESCRIPTIONS: &[(u32, &str)] = &[
    (0, "clear sky"),
    (1, "mainly clear"),
    (2, "partly cloudy"),
    (3, "overcast"),
    (45, "fog"),
    (48, "depositing rime fog"),
    (51, "light drizzle"),
    (53, "moderate drizzle"),
    (55, "dense drizzle"),
    (56, "light freezing drizzle"),
    (57, "dense freezing drizzle"),
    (61, "slight rain"),
    (63, "moderate rain"),
    (65, "heavy rain"),
    (66, "light freezing rain"),
    (67, "heavy freezing rain"),
    (71, "slight snow fall"),
    (73, "moderate snow fall"),
    (75, "heavy snow fall"),
    (77, "snow grains"),
    (80, "slight rain showers"),
    (81, "moderate rain showers"),
    (82, "violent rain showers"),
    (85, "slight snow showers"),
    (86, "heavy snow showers"),
    (95, "slight thunderstorm"),
    (96, "thunderstorm with slight hail"),
    (99, "thunderstorm with heavy hail"),
];

/// Short description for a weather code; unknown codes yield [`UNKNOWN`].
pub fn describe(code: u32) -> &'static str {
    DESCRIPTIONS
        .binary_search_by_key(&code, |&(known, _)| known)
        .map(|idx| DESCRIPTIONS[idx].1)
        .unwrap_or(UNKNOWN)
}
