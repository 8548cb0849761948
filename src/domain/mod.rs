// Domain layer - Plain data types and pure shaping rules
pub mod chart;
pub mod dashboard;
pub mod location;
pub mod weather;
