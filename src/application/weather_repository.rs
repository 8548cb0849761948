// Repository traits for upstream weather and geocoding access
use crate::domain::location::SearchOutcome;
use crate::domain::weather::{ForecastPeriod, GridCoordinate, WeatherSample};
use async_trait::async_trait;

#[async_trait]
pub trait WeatherRepository: Send + Sync {
    /// Look up the grid cell covering a point
    async fn resolve_grid(&self, latitude: f64, longitude: f64) -> anyhow::Result<GridCoordinate>;

    /// Hourly samples for a grid cell, in upstream order
    async fn hourly_samples(&self, grid: &GridCoordinate) -> anyhow::Result<Vec<WeatherSample>>;

    /// Named forecast periods for a grid cell
    async fn forecast_periods(&self, grid: &GridCoordinate) -> anyhow::Result<Vec<ForecastPeriod>>;
}

#[async_trait]
pub trait Geocoder: Send + Sync {
    /// Free-text place search. Never fails; provider trouble is part of the outcome.
    async fn search(&self, query: &str) -> SearchOutcome;
}
