// Dashboard service - Per-session location selection and dashboard views
use crate::application::errors::{DashboardError, FetchError};
use crate::application::weather_service::WeatherService;
use crate::domain::dashboard::{DashboardView, DaysToDisplay};
use crate::domain::location::coordinates_label;
use crate::domain::weather::{ForecastPeriod, WeatherSample};
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Instant;
use tokio::sync::RwLock;

/// Data shown for a session, replaced wholesale on each applied selection
#[derive(Debug, Clone)]
pub struct SessionSelection {
    pub location_name: String,
    pub samples: Vec<WeatherSample>,
    pub forecast: Vec<ForecastPeriod>,
    pub generation: u64,
}

/// Sessions kept when no limit is configured
pub const DEFAULT_MAX_SESSIONS: usize = 10_000;

#[derive(Debug)]
struct SessionState {
    generation: u64,
    in_flight: u32,
    touched: Instant,
    selection: Option<SessionSelection>,
}

impl SessionState {
    fn new() -> Self {
        Self {
            generation: 0,
            in_flight: 0,
            touched: Instant::now(),
            selection: None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "camelCase")]
pub enum SelectionOutcome {
    Applied { generation: u64 },
    /// A newer selection started while this one was in flight; its results were dropped
    Superseded { generation: u64 },
}

#[derive(Clone)]
pub struct DashboardService {
    weather_service: WeatherService,
    // an entry exists while a selection is applied or in flight
    sessions: Arc<RwLock<HashMap<String, SessionState>>>,
    max_sessions: usize,
}

impl DashboardService {
    pub fn new(weather_service: WeatherService, max_sessions: usize) -> Self {
        Self {
            weather_service,
            sessions: Arc::new(RwLock::new(HashMap::new())),
            max_sessions: max_sessions.max(1),
        }
    }

    pub async fn select_location(
        &self,
        session_id: &str,
        latitude: f64,
        longitude: f64,
        name: Option<String>,
    ) -> Result<SelectionOutcome, FetchError> {
        let generation = self.begin_selection(session_id).await;

        let loaded = self.weather_service.load_location(latitude, longitude).await;

        let mut sessions = self.sessions.write().await;
        let Some(state) = sessions.get_mut(session_id) else {
            return loaded.map(|_| SelectionOutcome::Superseded { generation });
        };
        state.in_flight = state.in_flight.saturating_sub(1);

        let weather = match loaded {
            Ok(weather) => weather,
            Err(e) => {
                if state.selection.is_none() && state.in_flight == 0 {
                    sessions.remove(session_id);
                }
                return Err(e);
            }
        };

        if state.generation != generation {
            tracing::debug!(
                "Discarding selection {} for session {}; generation {} is current",
                generation,
                session_id,
                state.generation
            );
            return Ok(SelectionOutcome::Superseded { generation });
        }

        let location_name = name
            .filter(|n| !n.trim().is_empty())
            .unwrap_or_else(|| coordinates_label(latitude, longitude));
        tracing::info!(
            "Session {} now showing {} ({} samples, {} periods)",
            session_id,
            location_name,
            weather.samples.len(),
            weather.forecast.len()
        );

        state.touched = Instant::now();
        state.selection = Some(SessionSelection {
            location_name,
            samples: weather.samples,
            forecast: weather.forecast,
            generation,
        });

        Ok(SelectionOutcome::Applied { generation })
    }

    /// Bump the session's generation, making room for a new session if needed
    async fn begin_selection(&self, session_id: &str) -> u64 {
        let mut sessions = self.sessions.write().await;
        if !sessions.contains_key(session_id) && sessions.len() >= self.max_sessions {
            evict_idle_session(&mut sessions);
        }

        let state = sessions
            .entry(session_id.to_string())
            .or_insert_with(SessionState::new);
        state.generation += 1;
        state.in_flight += 1;
        state.touched = Instant::now();
        state.generation
    }

    #[cfg(test)]
    async fn session_count(&self) -> usize {
        self.sessions.read().await.len()
    }

    pub async fn dashboard(
        &self,
        session_id: &str,
        days: DaysToDisplay,
        now: DateTime<Utc>,
    ) -> Result<DashboardView, DashboardError> {
        let sessions = self.sessions.read().await;
        let selection = sessions
            .get(session_id)
            .and_then(|s| s.selection.as_ref())
            .ok_or_else(|| DashboardError::SessionNotFound(session_id.to_string()))?;

        Ok(DashboardView::build(
            &selection.location_name,
            selection.generation,
            &selection.samples,
            &selection.forecast,
            days,
            now,
        ))
    }
}

/// Drop the least recently touched session with nothing in flight
fn evict_idle_session(sessions: &mut HashMap<String, SessionState>) {
    let oldest = sessions
        .iter()
        .filter(|(_, state)| state.in_flight == 0)
        .min_by_key(|(_, state)| state.touched)
        .map(|(id, _)| id.clone());

    if let Some(id) = oldest {
        tracing::debug!("Evicting session {}", id);
        sessions.remove(&id);
    }
}
