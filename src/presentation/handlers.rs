// HTTP request handlers
use crate::domain::dashboard::DaysToDisplay;
use crate::domain::location::{GeolocationReport, validate_coordinates};
use crate::infrastructure::http_response::{accepts_brotli, json_response};
use crate::presentation::api_error::ApiError;
use crate::presentation::app_state::AppState;
use axum::{
    Json,
    extract::{
        Path, Query, State,
        rejection::{JsonRejection, QueryRejection},
    },
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Response},
};
use chrono::Utc;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

const SELECTION_FAILED: &str = "Failed to fetch weather data. Please try again.";
const GEOLOCATION_SELECTION_FAILED: &str = "Failed to fetch weather data for your location";

#[derive(Deserialize)]
pub struct SearchQuery {
    #[serde(default)]
    pub q: String,
}

#[derive(Deserialize)]
pub struct CoordinatesQuery {
    pub lat: f64,
    pub lon: f64,
}

#[derive(Deserialize)]
pub struct DashboardQuery {
    pub days: Option<u32>,
}

#[derive(Deserialize)]
pub struct SelectionRequest {
    pub latitude: f64,
    pub longitude: f64,
    #[serde(default)]
    pub name: Option<String>,
}

async fn respond<T: Serialize>(data: &T, headers: &HeaderMap) -> Response {
    match json_response(StatusCode::OK, data, accepts_brotli(headers)).await {
        Ok(response) => response,
        Err(status) => status.into_response(),
    }
}

/// Health check endpoint
pub async fn health_check() -> &'static str {
    "ok"
}

/// Free-text location search
pub async fn search_locations(
    query: Result<Query<SearchQuery>, QueryRejection>,
    headers: HeaderMap,
    State(state): State<Arc<AppState>>,
) -> Result<Response, ApiError> {
    let Query(query) = query?;
    let outcome = state.location_service.search(&query.q).await;
    Ok(respond(&outcome, &headers).await)
}

/// Hourly samples for a point
pub async fn hourly_weather(
    query: Result<Query<CoordinatesQuery>, QueryRejection>,
    headers: HeaderMap,
    State(state): State<Arc<AppState>>,
) -> Result<Response, ApiError> {
    let Query(query) = query?;
    validate_coordinates(query.lat, query.lon)?;

    let samples = state
        .weather_service
        .hourly_weather(query.lat, query.lon)
        .await
        .map_err(|e| ApiError::bad_gateway(e.user_message()))?;

    Ok(respond(&samples, &headers).await)
}

/// Named forecast periods for a point
pub async fn forecast(
    query: Result<Query<CoordinatesQuery>, QueryRejection>,
    headers: HeaderMap,
    State(state): State<Arc<AppState>>,
) -> Result<Response, ApiError> {
    let Query(query) = query?;
    validate_coordinates(query.lat, query.lon)?;

    let periods = state
        .weather_service
        .forecast(query.lat, query.lon)
        .await
        .map_err(|e| ApiError::bad_gateway(e.user_message()))?;

    Ok(respond(&periods, &headers).await)
}

/// Select a location (from search results or typed coordinates) for a session
pub async fn select_location(
    Path(session_id): Path<String>,
    headers: HeaderMap,
    State(state): State<Arc<AppState>>,
    request: Result<Json<SelectionRequest>, JsonRejection>,
) -> Result<Response, ApiError> {
    let Json(request) = request?;
    validate_coordinates(request.latitude, request.longitude)?;

    let outcome = state
        .dashboard_service
        .select_location(
            &session_id,
            request.latitude,
            request.longitude,
            request.name,
        )
        .await
        .map_err(|_| ApiError::bad_gateway(SELECTION_FAILED))?;

    Ok(respond(&outcome, &headers).await)
}

/// Select the browser's current position for a session
pub async fn report_geolocation(
    Path(session_id): Path<String>,
    headers: HeaderMap,
    State(state): State<Arc<AppState>>,
    report: Result<Json<GeolocationReport>, JsonRejection>,
) -> Result<Response, ApiError> {
    let Json(report) = report?;
    let (latitude, longitude) = report.into_coordinates().map_err(|e| {
        tracing::debug!("Geolocation unavailable for session {}: {}", session_id, e);
        ApiError::from(e)
    })?;
    validate_coordinates(latitude, longitude)?;

    let outcome = state
        .dashboard_service
        .select_location(&session_id, latitude, longitude, None)
        .await
        .map_err(|_| ApiError::bad_gateway(GEOLOCATION_SELECTION_FAILED))?;

    Ok(respond(&outcome, &headers).await)
}

/// Charts, tick labels and forecast table for a session's selection
pub async fn dashboard(
    Path(session_id): Path<String>,
    query: Result<Query<DashboardQuery>, QueryRejection>,
    headers: HeaderMap,
    State(state): State<Arc<AppState>>,
) -> Result<Response, ApiError> {
    let Query(query) = query?;
    let days = match query.days {
        Some(days) => DaysToDisplay::try_from(days)?,
        None => DaysToDisplay::default(),
    };

    let view = state
        .dashboard_service
        .dashboard(&session_id, days, Utc::now())
        .await?;

    Ok(respond(&view, &headers).await)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::dashboard_service::{DEFAULT_MAX_SESSIONS, DashboardService};
    use crate::application::location_service::LocationService;
    use crate::application::test_support::{FakeGeocoder, FakeWeatherRepository, hourly_from, period};
    use crate::application::weather_service::WeatherService;
    use crate::domain::location::{LocationMatch, SearchOutcome};
    use chrono::Duration;
    use serde_json::Value;

    fn state_with(repo: FakeWeatherRepository, outcome: SearchOutcome) -> Arc<AppState> {
        let weather_service = WeatherService::new(Arc::new(repo));
        Arc::new(AppState {
            weather_service: weather_service.clone(),
            location_service: LocationService::new(Arc::new(FakeGeocoder::new(outcome))),
            dashboard_service: DashboardService::new(weather_service, DEFAULT_MAX_SESSIONS),
        })
    }

    fn upcoming_samples() -> FakeWeatherRepository {
        let start = (Utc::now() + Duration::hours(1)).to_rfc3339();
        FakeWeatherRepository::with_data(hourly_from(&start, 48), vec![period("Tonight")])
    }

    async fn body_json(response: Response) -> Value {
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn test_search_returns_tagged_outcome() {
        let state = state_with(
            FakeWeatherRepository::default(),
            SearchOutcome::from_matches(vec![LocationMatch::new(
                39.05,
                -95.68,
                "Topeka, Kansas, USA".to_string(),
            )]),
        );

        let response = search_locations(
            Ok(Query(SearchQuery {
                q: "Topeka".to_string(),
            })),
            HeaderMap::new(),
            State(state),
        )
        .await
        .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let body = body_json(response).await;
        assert_eq!(body["status"], "matches");
        assert_eq!(body["results"][0]["displayName"], "Topeka, Kansas, USA");
    }

    #[tokio::test]
    async fn test_hourly_rejects_bad_coordinates() {
        let state = state_with(upcoming_samples(), SearchOutcome::NoMatches);

        let err = hourly_weather(
            Ok(Query(CoordinatesQuery {
                lat: 95.0,
                lon: 0.0,
            })),
            HeaderMap::new(),
            State(state),
        )
        .await
        .unwrap_err();

        assert_eq!(err.status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_hourly_grid_failure_is_bad_gateway() {
        let state = state_with(
            FakeWeatherRepository {
                fail_grid: true,
                ..FakeWeatherRepository::default()
            },
            SearchOutcome::NoMatches,
        );

        let err = forecast(
            Ok(Query(CoordinatesQuery {
                lat: 39.0,
                lon: -95.0,
            })),
            HeaderMap::new(),
            State(state),
        )
        .await
        .unwrap_err();

        assert_eq!(err.status, StatusCode::BAD_GATEWAY);
        assert_eq!(err.message, "Failed to fetch grid point from NWS API");
    }

    #[tokio::test]
    async fn test_selection_then_dashboard() {
        let state = state_with(upcoming_samples(), SearchOutcome::NoMatches);

        let response = select_location(
            Path("abc".to_string()),
            HeaderMap::new(),
            State(state.clone()),
            Ok(Json(SelectionRequest {
                latitude: 39.05,
                longitude: -95.68,
                name: Some("Topeka".to_string()),
            })),
        )
        .await
        .unwrap();
        let body = body_json(response).await;
        assert_eq!(body["status"], "applied");
        assert_eq!(body["generation"], 1);

        let response = dashboard(
            Path("abc".to_string()),
            Ok(Query(DashboardQuery { days: Some(1) })),
            HeaderMap::new(),
            State(state),
        )
        .await
        .unwrap();
        let body = body_json(response).await;
        assert_eq!(body["locationName"], "Topeka");
        assert_eq!(body["days"], 1);
        assert_eq!(body["charts"].as_array().unwrap().len(), 3);
        assert_eq!(body["forecast"][0]["name"], "Tonight");
    }

    #[tokio::test]
    async fn test_selection_failure_message() {
        let state = state_with(
            FakeWeatherRepository {
                fail_forecast: true,
                ..FakeWeatherRepository::default()
            },
            SearchOutcome::NoMatches,
        );

        let err = select_location(
            Path("abc".to_string()),
            HeaderMap::new(),
            State(state),
            Ok(Json(SelectionRequest {
                latitude: 39.05,
                longitude: -95.68,
                name: None,
            })),
        )
        .await
        .unwrap_err();

        assert_eq!(err.status, StatusCode::BAD_GATEWAY);
        assert_eq!(err.message, SELECTION_FAILED);
    }

    #[tokio::test]
    async fn test_dashboard_rejects_unsupported_days() {
        let state = state_with(upcoming_samples(), SearchOutcome::NoMatches);

        let err = dashboard(
            Path("abc".to_string()),
            Ok(Query(DashboardQuery { days: Some(5) })),
            HeaderMap::new(),
            State(state),
        )
        .await
        .unwrap_err();

        assert_eq!(err.status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_dashboard_without_selection_is_not_found() {
        let state = state_with(upcoming_samples(), SearchOutcome::NoMatches);

        let err = dashboard(
            Path("fresh".to_string()),
            Ok(Query(DashboardQuery { days: None })),
            HeaderMap::new(),
            State(state),
        )
        .await
        .unwrap_err();

        assert_eq!(err.status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_geolocation_outcomes() {
        let state = state_with(upcoming_samples(), SearchOutcome::NoMatches);

        let err = report_geolocation(
            Path("abc".to_string()),
            HeaderMap::new(),
            State(state.clone()),
            Ok(Json(GeolocationReport::Denied)),
        )
        .await
        .unwrap_err();
        assert_eq!(err.status, StatusCode::BAD_REQUEST);
        assert_eq!(
            err.message,
            "Failed to get your location. Please enable location services."
        );

        let err = report_geolocation(
            Path("abc".to_string()),
            HeaderMap::new(),
            State(state.clone()),
            Ok(Json(GeolocationReport::Unsupported)),
        )
        .await
        .unwrap_err();
        assert_eq!(err.message, "Geolocation is not supported by your browser");

        report_geolocation(
            Path("abc".to_string()),
            HeaderMap::new(),
            State(state.clone()),
            Ok(Json(GeolocationReport::Fix {
                latitude: 47.606_21,
                longitude: -122.332_07,
            })),
        )
        .await
        .unwrap();

        let response = dashboard(
            Path("abc".to_string()),
            Ok(Query(DashboardQuery { days: Some(7) })),
            HeaderMap::new(),
            State(state),
        )
        .await
        .unwrap();
        let body = body_json(response).await;
        assert_eq!(body["locationName"], "47.6062, -122.3321");
    }

    fn query<T: serde::de::DeserializeOwned>(uri: &str) -> Result<Query<T>, QueryRejection> {
        Query::try_from_uri(&uri.parse().unwrap())
    }

    #[tokio::test]
    async fn test_malformed_query_is_json_bad_request() {
        let state = state_with(upcoming_samples(), SearchOutcome::NoMatches);

        let err = dashboard(
            Path("abc".to_string()),
            query("/sessions/abc/dashboard?days=-1"),
            HeaderMap::new(),
            State(state.clone()),
        )
        .await
        .unwrap_err();
        assert_eq!(err.status, StatusCode::BAD_REQUEST);
        assert!(err.message.contains("Failed to deserialize query string"));

        let err = hourly_weather(
            query("/weather/hourly?lat=abc&lon=1"),
            HeaderMap::new(),
            State(state),
        )
        .await
        .unwrap_err();
        assert_eq!(err.status, StatusCode::BAD_REQUEST);

        let response = err.into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let body = body_json(response).await;
        assert!(body["error"].as_str().unwrap().contains("invalid float literal"));
    }

    #[tokio::test]
    async fn test_body_missing_field_is_bad_request() {
        let state = state_with(upcoming_samples(), SearchOutcome::NoMatches);

        let err = select_location(
            Path("abc".to_string()),
            HeaderMap::new(),
            State(state.clone()),
            Json::from_bytes(br#"{"latitude":40}"#),
        )
        .await
        .unwrap_err();
        assert_eq!(err.status, StatusCode::BAD_REQUEST);
        assert!(err.message.contains("missing field `longitude`"));

        let err = report_geolocation(
            Path("abc".to_string()),
            HeaderMap::new(),
            State(state),
            Json::from_bytes(br#"{"outcome":"fix"}"#),
        )
        .await
        .unwrap_err();
        assert_eq!(err.status, StatusCode::BAD_REQUEST);
        assert!(err.message.contains("missing field `latitude`"));
    }
}
