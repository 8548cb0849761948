// Weather domain models
use chrono::{DateTime, FixedOffset};
use regex::Regex;
use serde::Serialize;
use std::sync::LazyLock;

static FIRST_NUMBER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\d+").expect("static pattern is valid"));

const COMPASS_POINTS: [&str; 16] = [
    "N", "NNE", "NE", "ENE", "E", "ESE", "SE", "SSE", "S", "SSW", "SW", "WSW", "W", "WNW", "NW",
    "NNW",
];

/// One hour of forecast data, flattened for charting.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WeatherSample {
    pub time: DateTime<FixedOffset>,
    pub temperature_f: f64,
    pub relative_humidity_pct: f64,
    pub wind_speed_mph: u32,
    pub wind_direction_deg: f64,
    pub conditions: String,
}

/// A named forecast segment such as "Tonight" or "Monday".
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ForecastPeriod {
    pub name: String,
    pub start_time: DateTime<FixedOffset>,
    pub end_time: DateTime<FixedOffset>,
    pub temperature: f64,
    pub temperature_unit: String,
    pub wind_speed: String,
    pub wind_direction: String,
    pub short_forecast: String,
    pub detailed_forecast: String,
}

/// Upstream grid cell that forecasts are addressed by.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GridCoordinate {
    pub grid_id: String,
    pub grid_x: i64,
    pub grid_y: i64,
}

impl GridCoordinate {
    pub fn new(grid_id: String, grid_x: i64, grid_y: i64) -> Self {
        Self {
            grid_id,
            grid_x,
            grid_y,
        }
    }

    /// Path segment used by the gridpoints endpoints, e.g. `TOP/31,80`
    pub fn path(&self) -> String {
        format!("{}/{},{}", self.grid_id, self.grid_x, self.grid_y)
    }
}

/// Hourly and period forecasts fetched together for one location
#[derive(Debug, Clone)]
pub struct LocationWeather {
    pub samples: Vec<WeatherSample>,
    pub forecast: Vec<ForecastPeriod>,
}

/// Extract the first run of digits from text like "5 to 10 mph".
/// Text without digits yields 0.
pub fn parse_wind_speed(text: &str) -> u32 {
    FIRST_NUMBER
        .find(text)
        .and_then(|m| m.as_str().parse().ok())
        .unwrap_or(0)
}

/// Convert a 16-point compass heading ("SW", "NNE") to degrees
pub fn compass_to_degrees(heading: &str) -> Option<f64> {
    let heading = heading.trim().to_ascii_uppercase();
    COMPASS_POINTS
        .iter()
        .position(|p| *p == heading)
        .map(|idx| idx as f64 * 22.5)
}
