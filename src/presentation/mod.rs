// Presentation layer - HTTP handlers and shared state
pub mod api_error;
pub mod app_state;
pub mod handlers;
