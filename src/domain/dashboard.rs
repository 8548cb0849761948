// Dashboard domain model: windowing, tick labels and the rendered view
use super::chart::{ChartData, ChartPoint};
use super::weather::{ForecastPeriod, WeatherSample};
use chrono::{DateTime, Duration, FixedOffset, Timelike, Utc};
use serde::Serialize;
use thiserror::Error;

/// How many days of hourly data the charts show
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DaysToDisplay {
    #[default]
    One,
    Three,
    Seven,
}

#[derive(Debug, Error, PartialEq, Eq)]
#[error("Days to display must be 1, 3 or 7, got: {0}")]
pub struct InvalidDays(pub u32);

impl TryFrom<u32> for DaysToDisplay {
    type Error = InvalidDays;

    fn try_from(days: u32) -> Result<Self, Self::Error> {
        match days {
            1 => Ok(Self::One),
            3 => Ok(Self::Three),
            7 => Ok(Self::Seven),
            other => Err(InvalidDays(other)),
        }
    }
}

impl DaysToDisplay {
    pub fn days(self) -> u32 {
        match self {
            Self::One => 1,
            Self::Three => 3,
            Self::Seven => 7,
        }
    }

    pub fn span(self) -> Duration {
        Duration::days(i64::from(self.days()))
    }

    /// Local hours that get an x-axis label
    pub fn tick_hours(self) -> &'static [u32] {
        match self {
            Self::One => &[0, 6, 12, 18],
            Self::Three => &[0, 12],
            Self::Seven => &[0],
        }
    }
}

/// Samples with `now <= time < now + days`, in input order
pub fn window_samples(
    samples: &[WeatherSample],
    now: DateTime<Utc>,
    days: DaysToDisplay,
) -> Vec<&WeatherSample> {
    let cutoff = now + days.span();
    samples
        .iter()
        .filter(|s| {
            let time = s.time.with_timezone(&Utc);
            time >= now && time < cutoff
        })
        .collect()
}

/// Axis label for a sample, in the sample's own offset: "Oct 18, 3 PM"
pub fn point_label(time: &DateTime<FixedOffset>) -> String {
    time.format("%b %-d, %-I %p").to_string()
}

/// Labels of the windowed samples that fall on a tick hour.
pub fn tick_labels(window: &[&WeatherSample], days: DaysToDisplay) -> Vec<String> {
    let hours = days.tick_hours();
    window
        .iter()
        .filter(|s| hours.contains(&s.time.hour()))
        .map(|s| point_label(&s.time))
        .collect()
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CurrentConditions {
    pub temperature_f: f64,
    pub conditions: String,
    pub wind_speed_mph: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardView {
    pub location_name: String,
    pub days: u32,
    pub generation: u64,
    pub current: Option<CurrentConditions>,
    pub charts: Vec<ChartData>,
    pub tick_labels: Vec<String>,
    pub forecast: Vec<ForecastPeriod>,
}

impl DashboardView {
    pub fn build(
        location_name: &str,
        generation: u64,
        samples: &[WeatherSample],
        forecast: &[ForecastPeriod],
        days: DaysToDisplay,
        now: DateTime<Utc>,
    ) -> Self {
        let window = window_samples(samples, now, days);
        let tick_labels = tick_labels(&window, days);

        let current = samples.first().map(|s| CurrentConditions {
            temperature_f: s.temperature_f,
            conditions: s.conditions.clone(),
            wind_speed_mph: s.wind_speed_mph,
        });

        let charts = vec![
            ChartData::new(
                "temperature",
                "Temperature (°F)",
                "°F",
                chart_points(&window, |s| s.temperature_f),
            ),
            ChartData::new(
                "humidity",
                "Relative Humidity (%)",
                "%",
                chart_points(&window, |s| s.relative_humidity_pct),
            ),
            ChartData::new(
                "windSpeed",
                "Wind Speed (mph)",
                "mph",
                chart_points(&window, |s| f64::from(s.wind_speed_mph)),
            ),
        ];

        Self {
            location_name: location_name.to_string(),
            days: days.days(),
            generation,
            current,
            charts,
            tick_labels,
            forecast: forecast.to_vec(),
        }
    }
}

fn chart_points(window: &[&WeatherSample], value: impl Fn(&WeatherSample) -> f64) -> Vec<ChartPoint> {
    window
        .iter()
        .map(|s| ChartPoint::new(point_label(&s.time), s.time.timestamp_millis(), value(s)))
        .collect()
}
