// Location service - Use case for searching places by name
use crate::application::weather_repository::Geocoder;
use crate::domain::location::SearchOutcome;
use std::sync::Arc;

#[derive(Clone)]
pub struct LocationService {
    geocoder: Arc<dyn Geocoder>,
}

impl LocationService {
    pub fn new(geocoder: Arc<dyn Geocoder>) -> Self {
        Self { geocoder }
    }

    pub async fn search(&self, query: &str) -> SearchOutcome {
        let query = query.trim();
        if query.is_empty() {
            return SearchOutcome::NoMatches;
        }

        let outcome = self.geocoder.search(query).await;
        if let SearchOutcome::ProviderFailure { reason } = &outcome {
            tracing::warn!("Location search for '{}' failed: {:?}", query, reason);
        }
        outcome
    }
}
