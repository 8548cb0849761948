// LocationIQ forward geocoder
use crate::application::weather_repository::Geocoder;
use crate::domain::location::{LocationMatch, ProviderFailure, SearchOutcome};
use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::StatusCode;
use serde::Deserialize;
use std::time::Duration;

#[derive(Debug, Clone)]
pub struct LocationIqGeocoder {
    client: reqwest::Client,
    base_url: String,
    api_key: Option<String>,
    limit: u32,
}

/// LocationIQ returns coordinates as strings
#[derive(Debug, Deserialize)]
struct LocationIqPlace {
    display_name: String,
    lat: String,
    lon: String,
}

impl LocationIqGeocoder {
    pub fn new(
        base_url: &str,
        api_key: Option<String>,
        limit: u32,
        timeout_seconds: u64,
    ) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(timeout_seconds))
            .build()
            .context("Failed to build LocationIQ HTTP client")?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key: api_key.filter(|k| !k.trim().is_empty()),
            limit,
        })
    }

    fn build_search_url(&self, api_key: &str, query: &str) -> String {
        format!(
            "{}/search?key={}&q={}&format=json&limit={}",
            self.base_url,
            urlencoding::encode(api_key),
            urlencoding::encode(query),
            self.limit
        )
    }
}

#[async_trait]
impl Geocoder for LocationIqGeocoder {
    async fn search(&self, query: &str) -> SearchOutcome {
        let Some(api_key) = self.api_key.as_deref() else {
            tracing::error!("LocationIQ API key is not configured");
            return SearchOutcome::ProviderFailure {
                reason: ProviderFailure::Unconfigured,
            };
        };

        // the URL carries the key, so only the query is logged
        tracing::debug!("LocationIQ search: '{}'", query);
        let url = self.build_search_url(api_key, query);

        let response = match self.client.get(&url).send().await {
            Ok(response) => response,
            Err(e) => {
                tracing::error!("LocationIQ request failed: {}", e.without_url());
                return SearchOutcome::ProviderFailure {
                    reason: ProviderFailure::Request,
                };
            }
        };

        let status = response.status();
        // "Unable to geocode" comes back as a 404
        if status == StatusCode::NOT_FOUND {
            return SearchOutcome::NoMatches;
        }
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            tracing::error!("LocationIQ API error: status {}: {}", status, body);
            return SearchOutcome::ProviderFailure {
                reason: ProviderFailure::Request,
            };
        }

        let places = match response.json::<Vec<LocationIqPlace>>().await {
            Ok(places) => places,
            Err(e) => {
                tracing::error!("Failed to parse LocationIQ response: {}", e.without_url());
                return SearchOutcome::ProviderFailure {
                    reason: ProviderFailure::Response,
                };
            }
        };

        let matches: Vec<LocationMatch> = places
            .into_iter()
            .filter_map(|place| match (place.lat.parse(), place.lon.parse()) {
                (Ok(lat), Ok(lon)) => Some(LocationMatch::new(lat, lon, place.display_name)),
                _ => {
                    tracing::debug!(
                        "Skipping '{}' with unparseable coordinates ({}, {})",
                        place.display_name,
                        place.lat,
                        place.lon
                    );
                    None
                }
            })
            .collect();

        tracing::debug!("LocationIQ returned {} matches for '{}'", matches.len(), query);
        SearchOutcome::from_matches(matches)
    }
}
