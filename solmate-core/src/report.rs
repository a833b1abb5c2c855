use anyhow::Result;
use chrono::{DateTime, Utc};
use chrono_tz::Tz;
use serde::Serialize;
use tracing::{info, instrument};

use crate::{
    format,
    model::{ObserverPosition, TemperatureUnit},
    narrative,
    provider::WeatherSource,
};

/// Where and how to report.
#[derive(Debug, Clone, Copy)]
pub struct ReportRequest {
    pub position: ObserverPosition,
    pub timezone: Tz,
    pub unit: TemperatureUnit,
}

/// JSON shape of a report, `{"status": "..."}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StatusBody {
    pub status: String,
}

/// Fetch current conditions from `source` and narrate them as of `instant`.
#[instrument(skip(source), fields(lat = %request.position.latitude, lon = %request.position.longitude))]
pub async fn current_report(
    source: &dyn WeatherSource,
    request: &ReportRequest,
    instant: DateTime<Utc>,
) -> Result<String> {
    request.position.validate()?;

    let observation = source
        .current(&request.position, request.timezone, request.unit)
        .await?;

    let report = narrative::narrate(
        &request.position,
        instant,
        &observation,
        &format::temperature(&observation.temperature),
        &format::local_time(instant, request.timezone),
    )?;

    info!(lines = report.lines().count(), "Report ready");
    Ok(report)
}
