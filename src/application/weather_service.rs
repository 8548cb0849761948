// Weather service - Use cases for fetching hourly and period forecasts
use crate::application::errors::FetchError;
use crate::application::weather_repository::WeatherRepository;
use crate::domain::location::point_key;
use crate::domain::weather::{ForecastPeriod, GridCoordinate, LocationWeather, WeatherSample};
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

#[derive(Clone)]
pub struct WeatherService {
    repository: Arc<dyn WeatherRepository>,
    // keyed by the rounded point sent upstream; grid mapping for a point is stable
    grid_cache: Arc<RwLock<HashMap<String, GridCoordinate>>>,
}

impl WeatherService {
    pub fn new(repository: Arc<dyn WeatherRepository>) -> Self {
        Self {
            repository,
            grid_cache: Arc::new(RwLock::new(HashMap::new())),
        }
    }

    pub async fn resolve_grid(
        &self,
        latitude: f64,
        longitude: f64,
    ) -> Result<GridCoordinate, FetchError> {
        let key = point_key(latitude, longitude);

        if let Some(grid) = self.grid_cache.read().await.get(&key) {
            tracing::debug!("Grid cache hit for {}: {}", key, grid.path());
            return Ok(grid.clone());
        }

        let grid = self
            .repository
            .resolve_grid(latitude, longitude)
            .await
            .map_err(|e| {
                tracing::error!("Error fetching grid point for {}: {:#}", key, e);
                FetchError::GridResolution(e)
            })?;

        tracing::debug!("Resolved {} to grid {}", key, grid.path());
        self.grid_cache.write().await.insert(key, grid.clone());
        Ok(grid)
    }

    pub async fn hourly_weather(
        &self,
        latitude: f64,
        longitude: f64,
    ) -> Result<Vec<WeatherSample>, FetchError> {
        let grid = self.resolve_grid(latitude, longitude).await?;
        self.hourly_for_grid(&grid).await
    }

    pub async fn forecast(
        &self,
        latitude: f64,
        longitude: f64,
    ) -> Result<Vec<ForecastPeriod>, FetchError> {
        let grid = self.resolve_grid(latitude, longitude).await?;
        self.forecast_for_grid(&grid).await
    }

    async fn hourly_for_grid(&self, grid: &GridCoordinate) -> Result<Vec<WeatherSample>, FetchError> {
        self.repository.hourly_samples(grid).await.map_err(|e| {
            tracing::error!("Error fetching hourly weather for {}: {:#}", grid.path(), e);
            FetchError::HourlyForecast(e)
        })
    }

    async fn forecast_for_grid(&self, grid: &GridCoordinate) -> Result<Vec<ForecastPeriod>, FetchError> {
        self.repository.forecast_periods(grid).await.map_err(|e| {
            tracing::error!("Error fetching forecast for {}: {:#}", grid.path(), e);
            FetchError::Forecast(e)
        })
    }

    /// Resolve the grid once, then fetch hourly and period forecasts
    /// concurrently. Either failing fails both.
    pub async fn load_location(
        &self,
        latitude: f64,
        longitude: f64,
    ) -> Result<LocationWeather, FetchError> {
        let grid = self.resolve_grid(latitude, longitude).await?;
        let (samples, forecast) = futures::try_join!(
            self.hourly_for_grid(&grid),
            self.forecast_for_grid(&grid)
        )?;

        tracing::debug!(
            "Loaded {} hourly samples and {} forecast periods for {}",
            samples.len(),
            forecast.len(),
            point_key(latitude, longitude)
        );

        Ok(LocationWeather { samples, forecast })
    }
}
