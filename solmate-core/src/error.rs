use thiserror::Error;

/// Failures surfaced by the narration core.
///
/// The validation kinds are caller-correctable; the core performs no I/O and never retries.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum NarrateError {
    #[error(
        "Invalid position: latitude {latitude} / longitude {longitude} \
         (latitude must be -90..=90, longitude must be -180..=180)"
    )]
    InvalidPosition { latitude: f64, longitude: f64 },

    #[error("Invalid observation: {0}")]
    InvalidObservation(String),

    /// The solar position algorithm refused the instant (outside its supported range).
    #[error("Ephemeris calculation failed: {0}")]
    Ephemeris(#[from] solar_positioning::Error),
}
