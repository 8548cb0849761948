// Main entry point - Dependency injection and server setup
mod domain;
mod application;
mod infrastructure;
mod presentation;

use std::{net::SocketAddr, sync::Arc};
use anyhow::Context;
use axum::{
    Router,
    routing::{get, post},
};
use tower_http::trace::TraceLayer;
use tracing_subscriber::EnvFilter;

use crate::application::dashboard_service::DashboardService;
use crate::application::location_service::LocationService;
use crate::application::weather_service::WeatherService;
use crate::infrastructure::config::load_app_config;
use crate::infrastructure::locationiq_geocoder::LocationIqGeocoder;
use crate::infrastructure::nws_repository::NwsRepository;
use crate::presentation::app_state::AppState;
use crate::presentation::handlers::{
    dashboard, forecast, health_check, hourly_weather, report_geolocation, search_locations,
    select_location,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = load_app_config().context("Failed to load configuration")?;

    // RUST_LOG wins over the configured level
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&config.logging.level))
        .context("Invalid log level")?;
    tracing_subscriber::fmt().with_env_filter(filter).init();

    // Infrastructure layer
    let repository = Arc::new(NwsRepository::new(
        &config.weather.base_url,
        &config.weather.user_agent,
        config.weather.timeout_seconds,
    )?);
    if config.geocoder.api_key.as_deref().is_none_or(|k| k.trim().is_empty()) {
        tracing::warn!("No geocoder API key configured; location search will report a provider failure");
    }
    let geocoder = Arc::new(LocationIqGeocoder::new(
        &config.geocoder.base_url,
        config.geocoder.api_key.clone(),
        config.geocoder.limit,
        config.geocoder.timeout_seconds,
    )?);

    // Application layer
    let weather_service = WeatherService::new(repository);
    let location_service = LocationService::new(geocoder);
    let dashboard_service =
        DashboardService::new(weather_service.clone(), config.sessions.max_sessions);

    let state = Arc::new(AppState {
        weather_service,
        location_service,
        dashboard_service,
    });

    // Presentation layer
    // JSON bodies are Brotli-encoded by the response builder, so no CompressionLayer here
    let router = Router::new()
        .route("/healthz", get(health_check))
        .route("/locations/search", get(search_locations))
        .route("/weather/hourly", get(hourly_weather))
        .route("/weather/forecast", get(forecast))
        .route("/sessions/:id/selection", post(select_location))
        .route("/sessions/:id/geolocation", post(report_geolocation))
        .route("/sessions/:id/dashboard", get(dashboard))
        .layer(TraceLayer::new_for_http())
        .with_state(state);

    let addr: SocketAddr = config
        .server
        .bind_address
        .parse()
        .with_context(|| format!("Invalid bind address '{}'", config.server.bind_address))?;
    tracing::info!("Starting weather-dashboard service on {}", addr);

    axum::serve(tokio::net::TcpListener::bind(addr).await?, router).await?;

    Ok(())
}
