// Application layer - Use cases and the ports they depend on
pub mod dashboard_service;
pub mod errors;
pub mod location_service;
pub mod weather_repository;
pub mod weather_service;

#[cfg(test)]
pub mod test_support;
