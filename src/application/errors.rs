// Error types surfaced by the application services
use crate::domain::dashboard::InvalidDays;
use crate::domain::location::{CoordinateError, GeolocationError};
use thiserror::Error;

/// Upstream weather fetch failure; the cause stays attached for logging.
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("failed to fetch grid point")]
    GridResolution(#[source] anyhow::Error),
    #[error("failed to fetch hourly weather data")]
    HourlyForecast(#[source] anyhow::Error),
    #[error("failed to fetch forecast data")]
    Forecast(#[source] anyhow::Error),
}

impl FetchError {
    /// Message suitable for showing to the user
    pub fn user_message(&self) -> &'static str {
        match self {
            Self::GridResolution(_) => "Failed to fetch grid point from NWS API",
            Self::HourlyForecast(_) => "Failed to fetch hourly weather data from NWS API",
            Self::Forecast(_) => "Failed to fetch forecast data from NWS API",
        }
    }
}

#[derive(Debug, Error)]
pub enum DashboardError {
    #[error(transparent)]
    Fetch(#[from] FetchError),
    #[error(transparent)]
    Coordinates(#[from] CoordinateError),
    #[error(transparent)]
    Days(#[from] InvalidDays),
    #[error(transparent)]
    Geolocation(#[from] GeolocationError),
    #[error("No location selected for session {0}")]
    SessionNotFound(String),
}
