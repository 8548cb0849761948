// Chart data domain models
use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ChartPoint {
    pub label: String,
    pub time_ms: i64,
    pub value: f64,
}

impl ChartPoint {
    pub fn new(label: String, time_ms: i64, value: f64) -> Self {
        Self {
            label,
            time_ms,
            value,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ChartData {
    pub id: String,
    pub title: String,
    pub unit: String,
    pub points: Vec<ChartPoint>,
}

impl ChartData {
    pub fn new(id: &str, title: &str, unit: &str, points: Vec<ChartPoint>) -> Self {
        Self {
            id: id.to_string(),
            title: title.to_string(),
            unit: unit.to_string(),
            points,
        }
    }
}
