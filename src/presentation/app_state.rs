// Application state for HTTP handlers
use crate::application::dashboard_service::DashboardService;
use crate::application::location_service::LocationService;
use crate::application::weather_service::WeatherService;

#[derive(Clone)]
pub struct AppState {
    pub weather_service: WeatherService,
    pub location_service: LocationService,
    pub dashboard_service: DashboardService,
}
