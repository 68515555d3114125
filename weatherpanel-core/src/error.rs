//! User-facing error types.
//!
//! Provider and config failures travel as `anyhow::Error` with context; the
//! panel collapses them into one of the fixed messages below before they
//! reach the screen.

use thiserror::Error;

use crate::model::LocationQuery;

/// Why the device position could not be obtained.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum LocationError {
    #[error("position lookup is not supported")]
    Unsupported,

    #[error("position lookup was denied")]
    Denied,

    #[error("position is unavailable")]
    Unavailable,
}

/// The single message shown in place of weather data.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum PanelError {
    #[error("Geolocation is not supported by this platform.")]
    GeolocationUnsupported,

    #[error("Unable to retrieve location")]
    LocationUnavailable,

    #[error("City not found")]
    CityNotFound,

    #[error("Unable to get weather data")]
    WeatherUnavailable,
}

impl PanelError {
    /// Message for a failed fetch, chosen by which lookup path was taken.
    pub fn for_failed_query(query: &LocationQuery) -> Self {
        if query.is_city() {
            PanelError::CityNotFound
        } else {
            PanelError::WeatherUnavailable
        }
    }
}

impl From<LocationError> for PanelError {
    fn from(err: LocationError) -> Self {
        match err {
            LocationError::Unsupported => PanelError::GeolocationUnsupported,
            LocationError::Denied | LocationError::Unavailable => PanelError::LocationUnavailable,
        }
    }
}
