// In-memory fakes for service and handler tests
use crate::application::weather_repository::{Geocoder, WeatherRepository};
use crate::domain::location::SearchOutcome;
use crate::domain::weather::{ForecastPeriod, GridCoordinate, WeatherSample};
use async_trait::async_trait;
use chrono::{DateTime, Duration, FixedOffset};
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};
use tokio::sync::watch;

pub fn sample_at(time: DateTime<FixedOffset>, temperature_f: f64) -> WeatherSample {
    WeatherSample {
        time,
        temperature_f,
        relative_humidity_pct: 70.0,
        wind_speed_mph: 8,
        wind_direction_deg: 270.0,
        conditions: "Mostly Cloudy".to_string(),
    }
}

pub fn hourly_from(start: &str, hours: i64) -> Vec<WeatherSample> {
    let start = DateTime::parse_from_rfc3339(start).unwrap();
    (0..hours)
        .map(|i| sample_at(start + Duration::hours(i), 60.0 + i as f64))
        .collect()
}

pub fn period(name: &str) -> ForecastPeriod {
    ForecastPeriod {
        name: name.to_string(),
        start_time: DateTime::parse_from_rfc3339("2024-10-18T18:00:00-05:00").unwrap(),
        end_time: DateTime::parse_from_rfc3339("2024-10-19T06:00:00-05:00").unwrap(),
        temperature: 48.0,
        temperature_unit: "F".to_string(),
        wind_speed: "5 to 10 mph".to_string(),
        wind_direction: "S".to_string(),
        short_forecast: "Mostly Clear".to_string(),
        detailed_forecast: "Mostly clear, with a low around 48.".to_string(),
    }
}

#[derive(Default)]
pub struct FakeWeatherRepository {
    pub samples: Vec<WeatherSample>,
    pub forecast: Vec<ForecastPeriod>,
    pub fail_grid: bool,
    pub fail_hourly: bool,
    pub fail_forecast: bool,
    /// Grid lookups for this latitude fail
    pub reject_latitude: Option<f64>,
    /// Grid lookups for this latitude wait until the gate opens
    pub gate: Option<(f64, watch::Receiver<bool>)>,
    pub points_calls: AtomicUsize,
}

impl FakeWeatherRepository {
    pub fn with_data(samples: Vec<WeatherSample>, forecast: Vec<ForecastPeriod>) -> Self {
        Self {
            samples,
            forecast,
            ..Self::default()
        }
    }

    pub fn points_calls(&self) -> usize {
        self.points_calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl WeatherRepository for FakeWeatherRepository {
    async fn resolve_grid(&self, latitude: f64, _longitude: f64) -> anyhow::Result<GridCoordinate> {
        self.points_calls.fetch_add(1, Ordering::SeqCst);
        if let Some((gated_latitude, gate)) = &self.gate {
            if *gated_latitude == latitude {
                let mut gate = gate.clone();
                gate.wait_for(|open| *open).await?;
            }
        }
        if self.fail_grid || self.reject_latitude == Some(latitude) {
            anyhow::bail!("points request failed with status 500");
        }
        Ok(GridCoordinate::new("TOP".to_string(), 31, 80))
    }

    async fn hourly_samples(&self, _grid: &GridCoordinate) -> anyhow::Result<Vec<WeatherSample>> {
        if self.fail_hourly {
            anyhow::bail!("hourly request failed with status 503");
        }
        Ok(self.samples.clone())
    }

    async fn forecast_periods(&self, _grid: &GridCoordinate) -> anyhow::Result<Vec<ForecastPeriod>> {
        if self.fail_forecast {
            anyhow::bail!("forecast request failed with status 503");
        }
        Ok(self.forecast.clone())
    }
}

pub struct FakeGeocoder {
    outcome: SearchOutcome,
    pub queries: Mutex<Vec<String>>,
}

impl FakeGeocoder {
    pub fn new(outcome: SearchOutcome) -> Self {
        Self {
            outcome,
            queries: Mutex::new(Vec::new()),
        }
    }
}

#[async_trait]
impl Geocoder for FakeGeocoder {
    async fn search(&self, query: &str) -> SearchOutcome {
        self.queries.lock().unwrap().push(query.to_string());
        self.outcome.clone()
    }
}
