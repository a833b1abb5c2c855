//! Presentation helpers producing the caller-supplied strings of a report.

use anyhow::{Result, anyhow};
use chrono::{DateTime, Utc};
use chrono_tz::Tz;

use crate::model::Temperature;

/// Whole-degree temperature with its unit tag, rounding halves to even ("21°C").
pub fn temperature(temperature: &Temperature) -> String {
    // Casting also folds -0.0 into 0.
    let rounded = temperature.value.round_ties_even() as i64;
    format!("{rounded}{}", temperature.unit)
}

/// "The local time is 14:05 on a Tuesday in March."
pub fn local_time(instant: DateTime<Utc>, timezone: Tz) -> String {
    let local = instant.with_timezone(&timezone);
    format!(
        "The local time is {} on a {}.",
        local.format("%H:%M"),
        local.format("%A in %B")
    )
}

/// Resolve an IANA timezone name such as "America/New_York".
pub fn parse_timezone(name: &str) -> Result<Tz> {
    name.parse::<Tz>()
        .map_err(|err| anyhow!("Unknown timezone '{name}': {err}"))
}
