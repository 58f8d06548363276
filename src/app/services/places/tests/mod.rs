//! Test utilities for places lookup testing

use crate::app::models::ResolvedPlace;
use crate::app::services::places::{LookupError, LookupResult, PlaceQuery, PlacesLookup};
use std::collections::HashMap;
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

mod station_tests;

/// Lookup double that counts calls and answers from a table keyed by query text
#[derive(Debug, Default)]
pub struct MockLookup {
    responses: HashMap<String, LookupResult>,
    fallback: Option<ResolvedPlace>,
    delay: Option<Duration>,
    calls: AtomicUsize,
    queries: Mutex<Vec<String>>,
}

impl MockLookup {
    pub fn new() -> Self {
        Self::default()
    }

    /// Answer `query` (matched by substring of the query text) with `result`
    pub fn respond(mut self, query: &str, result: LookupResult) -> Self {
        self.responses.insert(query.to_string(), result);
        self
    }

    /// Answer every unmatched query with `place`
    pub fn respond_all(mut self, place: ResolvedPlace) -> Self {
        self.fallback = Some(place);
        self
    }

    /// Sleep this long before answering
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn queries(&self) -> Vec<String> {
        self.queries.lock().unwrap().clone()
    }
}

impl PlacesLookup for MockLookup {
    async fn lookup(&self, query: &PlaceQuery) -> LookupResult {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.queries.lock().unwrap().push(query.text.clone());

        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }

        let matched = self
            .responses
            .iter()
            .find(|(needle, _)| query.text.contains(needle.as_str()))
            .map(|(_, result)| result.clone());

        match (matched, &self.fallback) {
            (Some(result), _) => result,
            (None, Some(place)) => Ok(place.clone()),
            (None, None) => Err(LookupError::NotFound {
                query: query.text.clone(),
            }),
        }
    }
}

/// A complete place in 横浜市港北区
pub fn kohoku_place() -> ResolvedPlace {
    ResolvedPlace {
        name: Some("さくら保育園".to_string()),
        types: vec![
            "school".to_string(),
            "point_of_interest".to_string(),
            "establishment".to_string(),
        ],
        address: Some("日本、〒222-0011 神奈川県横浜市港北区菊名1-1".to_string()),
        lat: Some(35.5),
        lng: Some(139.6),
        phone: Some("045-111-2222".to_string()),
        website: Some("https://sakura.example".to_string()),
        map_url: Some("https://maps.google.com/?cid=1".to_string()),
        nearest_station: Some("菊名駅".to_string()),
        walk_minutes: Some(6),
    }
}
