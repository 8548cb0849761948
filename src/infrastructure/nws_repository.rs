// National Weather Service (api.weather.gov) repository implementation
use crate::application::weather_repository::WeatherRepository;
use crate::domain::location::point_key;
use crate::domain::weather::{
    ForecastPeriod, GridCoordinate, WeatherSample, compass_to_degrees, parse_wind_speed,
};
use anyhow::{Context, Result};
use async_trait::async_trait;
use chrono::{DateTime, FixedOffset};
use serde::Deserialize;
use serde::de::DeserializeOwned;
use std::time::Duration;

#[derive(Debug, Clone)]
pub struct NwsRepository {
    client: reqwest::Client,
    base_url: String,
}

#[derive(Debug, Deserialize)]
struct PointsResponse {
    properties: PointProperties,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct PointProperties {
    grid_id: String,
    grid_x: i64,
    grid_y: i64,
}

#[derive(Debug, Deserialize)]
struct ForecastResponse<P> {
    properties: ForecastProperties<P>,
}

#[derive(Debug, Deserialize)]
struct ForecastProperties<P> {
    periods: Vec<P>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct HourlyPeriod {
    start_time: DateTime<FixedOffset>,
    temperature: f64,
    #[serde(default)]
    relative_humidity: Option<QuantitativeValue>,
    #[serde(default)]
    wind_speed: String,
    // compass text ("SW") upstream, occasionally a number or absent
    #[serde(default)]
    wind_direction: serde_json::Value,
    short_forecast: String,
}

#[derive(Debug, Deserialize)]
struct QuantitativeValue {
    value: Option<f64>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct PeriodDto {
    name: String,
    start_time: DateTime<FixedOffset>,
    end_time: DateTime<FixedOffset>,
    temperature: f64,
    temperature_unit: String,
    #[serde(default)]
    wind_speed: String,
    #[serde(default)]
    wind_direction: String,
    short_forecast: String,
    #[serde(default)]
    detailed_forecast: String,
}

impl HourlyPeriod {
    fn into_sample(self) -> WeatherSample {
        let wind_direction_deg = match &self.wind_direction {
            serde_json::Value::Number(n) => n.as_f64().unwrap_or(0.0),
            serde_json::Value::String(s) => compass_to_degrees(s).unwrap_or(0.0),
            _ => 0.0,
        };

        WeatherSample {
            time: self.start_time,
            temperature_f: self.temperature,
            relative_humidity_pct: self
                .relative_humidity
                .and_then(|h| h.value)
                .unwrap_or(0.0),
            wind_speed_mph: parse_wind_speed(&self.wind_speed),
            wind_direction_deg,
            conditions: self.short_forecast,
        }
    }
}

impl From<PeriodDto> for ForecastPeriod {
    fn from(period: PeriodDto) -> Self {
        Self {
            name: period.name,
            start_time: period.start_time,
            end_time: period.end_time,
            temperature: period.temperature,
            temperature_unit: period.temperature_unit,
            wind_speed: period.wind_speed,
            wind_direction: period.wind_direction,
            short_forecast: period.short_forecast,
            detailed_forecast: period.detailed_forecast,
        }
    }
}

impl NwsRepository {
    pub fn new(base_url: &str, user_agent: &str, timeout_seconds: u64) -> Result<Self> {
        let client = reqwest::Client::builder()
            .user_agent(user_agent)
            .timeout(Duration::from_secs(timeout_seconds))
            .build()
            .context("Failed to build NWS HTTP client")?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    async fn get_json<T: DeserializeOwned>(&self, path: &str) -> Result<T> {
        let url = format!("{}{}", self.base_url, path);
        tracing::debug!("NWS request: {}", url);

        let response = self
            .client
            .get(&url)
            .header("Accept", "application/geo+json")
            .send()
            .await
            .with_context(|| format!("Failed to send request to {}", url))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            anyhow::bail!("NWS request {} failed with status {}: {}", path, status, body);
        }

        response
            .json::<T>()
            .await
            .with_context(|| format!("Failed to parse NWS response for {}", path))
    }
}

#[async_trait]
impl WeatherRepository for NwsRepository {
    async fn resolve_grid(&self, latitude: f64, longitude: f64) -> Result<GridCoordinate> {
        let path = format!("/points/{}", point_key(latitude, longitude));
        let points: PointsResponse = self.get_json(&path).await?;
        let p = points.properties;

        Ok(GridCoordinate::new(p.grid_id, p.grid_x, p.grid_y))
    }

    async fn hourly_samples(&self, grid: &GridCoordinate) -> Result<Vec<WeatherSample>> {
        let path = format!("/gridpoints/{}/forecast/hourly", grid.path());
        let response: ForecastResponse<HourlyPeriod> = self.get_json(&path).await?;

        let samples: Vec<WeatherSample> = response
            .properties
            .periods
            .into_iter()
            .map(HourlyPeriod::into_sample)
            .collect();

        tracing::debug!("Got {} hourly samples for {}", samples.len(), grid.path());
        Ok(samples)
    }

    async fn forecast_periods(&self, grid: &GridCoordinate) -> Result<Vec<ForecastPeriod>> {
        let path = format!("/gridpoints/{}/forecast", grid.path());
        let response: ForecastResponse<PeriodDto> = self.get_json(&path).await?;

        let periods: Vec<ForecastPeriod> = response
            .properties
            .periods
            .into_iter()
            .map(ForecastPeriod::from)
            .collect();

        tracing::debug!("Got {} forecast periods for {}", periods.len(), grid.path());
        Ok(periods)
    }
}
