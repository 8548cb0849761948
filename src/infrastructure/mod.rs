// Infrastructure layer - External dependencies and adapters
pub mod config;
pub mod http_response;
pub mod locationiq_geocoder;
pub mod nws_repository;
