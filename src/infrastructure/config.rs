// Application configuration loaded from config/app.toml and WEATHER_DASH__* env vars
use crate::application::dashboard_service::DEFAULT_MAX_SESSIONS;
use serde::Deserialize;

const ENV_PREFIX: &str = "WEATHER_DASH";
const ENV_SEPARATOR: &str = "__";

#[derive(Debug, Deserialize, Clone, Default)]
pub struct AppConfig {
    #[serde(default)]
    pub server: ServerSettings,
    #[serde(default)]
    pub weather: WeatherSettings,
    #[serde(default)]
    pub geocoder: GeocoderSettings,
    #[serde(default)]
    pub sessions: SessionSettings,
    #[serde(default)]
    pub logging: LoggingSettings,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ServerSettings {
    #[serde(default = "default_bind_address")]
    pub bind_address: String,
}

#[derive(Debug, Deserialize, Clone)]
pub struct WeatherSettings {
    #[serde(default = "default_weather_base_url")]
    pub base_url: String,
    /// api.weather.gov rejects requests without one
    #[serde(default = "default_user_agent")]
    pub user_agent: String,
    #[serde(default = "default_timeout_seconds")]
    pub timeout_seconds: u64,
}

#[derive(Debug, Deserialize, Clone)]
pub struct GeocoderSettings {
    #[serde(default = "default_geocoder_base_url")]
    pub base_url: String,
    #[serde(default)]
    pub api_key: Option<String>,
    #[serde(default = "default_geocoder_limit")]
    pub limit: u32,
    #[serde(default = "default_timeout_seconds")]
    pub timeout_seconds: u64,
}

#[derive(Debug, Deserialize, Clone)]
pub struct SessionSettings {
    /// Least recently touched idle sessions are evicted past this
    #[serde(default = "default_max_sessions")]
    pub max_sessions: usize,
}

#[derive(Debug, Deserialize, Clone)]
pub struct LoggingSettings {
    #[serde(default = "default_log_level")]
    pub level: String,
}

fn default_bind_address() -> String {
    "0.0.0.0:8080".to_string()
}

fn default_weather_base_url() -> String {
    "https://api.weather.gov".to_string()
}

fn default_user_agent() -> String {
    format!("weather-dashboard/{}", env!("CARGO_PKG_VERSION"))
}

fn default_timeout_seconds() -> u64 {
    10
}

fn default_geocoder_base_url() -> String {
    "https://us1.locationiq.com/v1".to_string()
}

fn default_geocoder_limit() -> u32 {
    10
}

fn default_max_sessions() -> usize {
    DEFAULT_MAX_SESSIONS
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            bind_address: default_bind_address(),
        }
    }
}

impl Default for WeatherSettings {
    fn default() -> Self {
        Self {
            base_url: default_weather_base_url(),
            user_agent: default_user_agent(),
            timeout_seconds: default_timeout_seconds(),
        }
    }
}

impl Default for GeocoderSettings {
    fn default() -> Self {
        Self {
            base_url: default_geocoder_base_url(),
            api_key: None,
            limit: default_geocoder_limit(),
            timeout_seconds: default_timeout_seconds(),
        }
    }
}

impl Default for SessionSettings {
    fn default() -> Self {
        Self {
            max_sessions: default_max_sessions(),
        }
    }
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

pub fn load_app_config() -> anyhow::Result<AppConfig> {
    build_app_config(
        config::File::with_name("config/app").required(false),
        config::Environment::with_prefix(ENV_PREFIX).separator(ENV_SEPARATOR),
    )
}

fn build_app_config<F>(file: F, environment: config::Environment) -> anyhow::Result<AppConfig>
where
    F: config::Source + Send + Sync + 'static,
{
    let settings = config::Config::builder()
        .add_source(file)
        .add_source(environment)
        .build()?;

    Ok(settings.try_deserialize()?)
}
