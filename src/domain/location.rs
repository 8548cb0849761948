// Location domain models
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// A geocoding hit the user can pick from.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LocationMatch {
    pub latitude: f64,
    pub longitude: f64,
    pub display_name: String,
}

impl LocationMatch {
    pub fn new(latitude: f64, longitude: f64, display_name: String) -> Self {
        Self {
            latitude,
            longitude,
            display_name,
        }
    }
}

/// Why the geocoding provider could not answer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum ProviderFailure {
    /// No API key configured
    Unconfigured,
    /// Network error or non-success status
    Request,
    /// Body could not be decoded
    Response,
}

/// Result of a location search. Zero matches and provider failure are
/// kept apart so the page can say which one happened.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", rename_all = "camelCase")]
pub enum SearchOutcome {
    Matches { results: Vec<LocationMatch> },
    NoMatches,
    ProviderFailure { reason: ProviderFailure },
}

impl SearchOutcome {
    pub fn from_matches(results: Vec<LocationMatch>) -> Self {
        if results.is_empty() {
            Self::NoMatches
        } else {
            Self::Matches { results }
        }
    }

    /// Collapse to a plain list; failures read as "no results".
    pub fn into_matches(self) -> Vec<LocationMatch> {
        match self {
            Self::Matches { results } => results,
            Self::NoMatches | Self::ProviderFailure { .. } => Vec::new(),
        }
    }
}

#[derive(Debug, Error, PartialEq)]
pub enum CoordinateError {
    #[error("Latitude must be between -90 and 90, got: {0}")]
    Latitude(f64),
    #[error("Longitude must be between -180 and 180, got: {0}")]
    Longitude(f64),
}

pub fn validate_coordinates(latitude: f64, longitude: f64) -> Result<(), CoordinateError> {
    if !(-90.0..=90.0).contains(&latitude) {
        return Err(CoordinateError::Latitude(latitude));
    }
    if !(-180.0..=180.0).contains(&longitude) {
        return Err(CoordinateError::Longitude(longitude));
    }
    Ok(())
}

/// Point as sent upstream, rounded to 4 decimal places: `39.7456,-97.0892`
pub fn point_key(latitude: f64, longitude: f64) -> String {
    format!("{:.4},{:.4}", latitude, longitude)
}

/// Name shown for a location picked by coordinates rather than by search
pub fn coordinates_label(latitude: f64, longitude: f64) -> String {
    format!("{:.4}, {:.4}", latitude, longitude)
}

/// What the browser's geolocation call produced
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(tag = "outcome", rename_all = "camelCase")]
pub enum GeolocationReport {
    Fix { latitude: f64, longitude: f64 },
    Denied,
    Unavailable,
    Unsupported,
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum GeolocationError {
    #[error("Geolocation is not supported by your browser")]
    Unsupported,
    #[error("Failed to get your location. Please enable location services.")]
    NoFix,
}

impl GeolocationReport {
    pub fn into_coordinates(self) -> Result<(f64, f64), GeolocationError> {
        match self {
            Self::Fix {
                latitude,
                longitude,
            } => Ok((latitude, longitude)),
            Self::Denied | Self::Unavailable => Err(GeolocationError::NoFix),
            Self::Unsupported => Err(GeolocationError::Unsupported),
        }
    }
}
