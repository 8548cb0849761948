// Error responses for HTTP handlers
use crate::application::errors::DashboardError;
use crate::domain::dashboard::InvalidDays;
use crate::domain::location::{CoordinateError, GeolocationError};
use axum::{
    Json,
    extract::rejection::{JsonRejection, QueryRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;

#[derive(Debug)]
pub struct ApiError {
    pub status: StatusCode,
    pub message: String,
}

impl ApiError {
    pub fn new(status: StatusCode, message: impl Into<String>) -> Self {
        Self {
            status,
            message: message.into(),
        }
    }

    pub fn bad_gateway(message: impl Into<String>) -> Self {
        Self::new(StatusCode::BAD_GATEWAY, message)
    }
}

impl From<DashboardError> for ApiError {
    fn from(err: DashboardError) -> Self {
        match err {
            DashboardError::Fetch(e) => Self::bad_gateway(e.user_message()),
            DashboardError::SessionNotFound(_) => Self::new(StatusCode::NOT_FOUND, err.to_string()),
            DashboardError::Coordinates(_)
            | DashboardError::Days(_)
            | DashboardError::Geolocation(_) => Self::new(StatusCode::BAD_REQUEST, err.to_string()),
        }
    }
}

impl From<CoordinateError> for ApiError {
    fn from(err: CoordinateError) -> Self {
        DashboardError::from(err).into()
    }
}

impl From<InvalidDays> for ApiError {
    fn from(err: InvalidDays) -> Self {
        DashboardError::from(err).into()
    }
}

impl From<GeolocationError> for ApiError {
    fn from(err: GeolocationError) -> Self {
        DashboardError::from(err).into()
    }
}

// Malformed query strings and bodies get the same 400 JSON body as other bad input
impl From<QueryRejection> for ApiError {
    fn from(rejection: QueryRejection) -> Self {
        Self::new(StatusCode::BAD_REQUEST, rejection.body_text())
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        Self::new(StatusCode::BAD_REQUEST, rejection.body_text())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.status, Json(json!({ "error": self.message }))).into_response()
    }
}
