//! Google Maps Platform backed places lookup
//!
//! One lookup is up to five sequential requests: text search (with an
//! optional broader fallback query), place details, a nearby
//! `transit_station` search around the resolved location and a walking
//! distance-matrix request to the chosen station. Every request waits for
//! the configured delay first.

use super::station::{is_bad_station_name, normalize_station_name};
use super::{LookupError, LookupResult, PlaceQuery, PlacesLookup};
use crate::app::models::ResolvedPlace;
use crate::constants::{GOOGLE_MAPS_API_BASE, STATION_SUFFIX};
use crate::{Error, Result};
use serde::Deserialize;
use serde::de::DeserializeOwned;
use std::time::Duration;
use tracing::{debug, warn};

const DETAIL_FIELDS: &str = "name,formatted_address,geometry,types,formatted_phone_number,international_phone_number,website,url";
const STATION_TYPES: &[&str] = &["train_station", "subway_station", "transit_station"];

#[derive(Debug, Deserialize)]
struct ApiResponse<T> {
    #[serde(default)]
    status: String,
    #[serde(default)]
    error_message: Option<String>,
    #[serde(flatten)]
    body: T,
}

#[derive(Debug, Default, Deserialize)]
struct ResultsBody {
    #[serde(default)]
    results: Vec<PlaceSummary>,
}

#[derive(Debug, Default, Deserialize)]
struct DetailsBody {
    #[serde(default)]
    result: Option<PlaceDetails>,
}

#[derive(Debug, Default, Deserialize)]
struct MatrixBody {
    #[serde(default)]
    rows: Vec<MatrixRow>,
}

#[derive(Debug, Clone, Deserialize)]
struct PlaceSummary {
    #[serde(default)]
    place_id: Option<String>,
    #[serde(default)]
    name: String,
    #[serde(default)]
    types: Vec<String>,
    #[serde(default)]
    geometry: Option<Geometry>,
}

#[derive(Debug, Clone, Copy, Deserialize)]
struct Geometry {
    location: LatLng,
}

#[derive(Debug, Clone, Copy, Deserialize)]
struct LatLng {
    lat: f64,
    lng: f64,
}

#[derive(Debug, Deserialize)]
struct PlaceDetails {
    #[serde(default)]
    name: Option<String>,
    #[serde(default)]
    types: Vec<String>,
    #[serde(default)]
    formatted_address: Option<String>,
    #[serde(default)]
    geometry: Option<Geometry>,
    #[serde(default)]
    formatted_phone_number: Option<String>,
    #[serde(default)]
    international_phone_number: Option<String>,
    #[serde(default)]
    website: Option<String>,
    #[serde(default)]
    url: Option<String>,
}

#[derive(Debug, Deserialize)]
struct MatrixRow {
    #[serde(default)]
    elements: Vec<MatrixElement>,
}

#[derive(Debug, Deserialize)]
struct MatrixElement {
    #[serde(default)]
    status: String,
    #[serde(default)]
    duration: Option<MatrixDuration>,
}

#[derive(Debug, Deserialize)]
struct MatrixDuration {
    value: f64,
}

/// Great-circle distance in meters
pub fn haversine_m(a: (f64, f64), b: (f64, f64)) -> f64 {
    const EARTH_RADIUS_M: f64 = 6_371_000.0;
    let (p1, p2) = (a.0.to_radians(), b.0.to_radians());
    let dp = (b.0 - a.0).to_radians();
    let dl = (b.1 - a.1).to_radians();
    let h = (dp / 2.0).sin().powi(2) + p1.cos() * p2.cos() * (dl / 2.0).sin().powi(2);
    2.0 * EARTH_RADIUS_M * h.sqrt().asin()
}

/// Turn a trimmed optional string into `None` when blank
fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

/// Map an API status string to a lookup error, `None` for usable responses
fn status_error(status: &str, message: Option<String>) -> Option<LookupError> {
    let message = message.unwrap_or_default();
    match status {
        "OK" | "ZERO_RESULTS" | "" => None,
        "OVER_QUERY_LIMIT" | "OVER_DAILY_LIMIT" | "RESOURCE_EXHAUSTED" => {
            Some(LookupError::Quota {
                message: format!("{} {}", status, message).trim().to_string(),
            })
        }
        other => Some(LookupError::Http {
            status: other.to_string(),
            message,
        }),
    }
}

/// Closest plausible station among nearby search results
fn pick_station(candidates: &[PlaceSummary], origin: (f64, f64)) -> Option<(String, LatLng)> {
    candidates
        .iter()
        .filter(|c| !is_bad_station_name(&c.name))
        .filter(|c| {
            c.types.iter().any(|t| STATION_TYPES.contains(&t.as_str()))
                || c.name.contains(STATION_SUFFIX)
        })
        .filter_map(|c| {
            let location = c.geometry?.location;
            let distance = haversine_m(origin, (location.lat, location.lng));
            Some((distance, c))
        })
        .min_by(|a, b| a.0.total_cmp(&b.0))
        .and_then(|(_, c)| {
            let location = c.geometry?.location;
            let name = normalize_station_name(&c.name);
            (!name.is_empty()).then_some((name, location))
        })
}

/// Google Places client
#[derive(Debug, Clone)]
pub struct GooglePlacesClient {
    http: reqwest::Client,
    api_key: String,
    base_url: String,
    request_delay: Duration,
    nearby_radius_m: u32,
}

impl GooglePlacesClient {
    /// Create a client; a blank API key is a configuration error
    pub fn new(api_key: &str, request_delay: Duration, timeout: Duration, nearby_radius_m: u32) -> Result<Self> {
        let api_key = api_key.trim();
        if api_key.is_empty() {
            return Err(Error::configuration(
                "GOOGLE_MAPS_API_KEY is not set; enrichment needs an API key",
            ));
        }

        let http = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| Error::configuration(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            http,
            api_key: api_key.to_string(),
            base_url: GOOGLE_MAPS_API_BASE.to_string(),
            request_delay,
            nearby_radius_m,
        })
    }

    /// Point the client at a different endpoint (local test server)
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    async fn get<T: DeserializeOwned>(
        &self,
        path: &str,
        params: &[(&str, String)],
    ) -> std::result::Result<T, LookupError> {
        if !self.request_delay.is_zero() {
            tokio::time::sleep(self.request_delay).await;
        }

        let url = format!("{}/{}", self.base_url, path);
        debug!("GET {}", url);

        let response = self
            .http
            .get(&url)
            .query(params)
            .query(&[("key", self.api_key.as_str()), ("language", "ja"), ("region", "jp")])
            .send()
            .await
            .map_err(|e| LookupError::Transport {
                message: e.without_url().to_string(),
            })?;

        let status = response.status();
        if status == reqwest::StatusCode::TOO_MANY_REQUESTS {
            return Err(LookupError::Quota {
                message: format!("HTTP {}", status),
            });
        }
        if !status.is_success() {
            return Err(LookupError::Http {
                status: status.as_u16().to_string(),
                message: status.canonical_reason().unwrap_or("").to_string(),
            });
        }

        let parsed: ApiResponse<T> = response.json().await.map_err(|e| LookupError::Transport {
            message: format!("undecodable response from {}: {}", path, e.without_url()),
        })?;

        match status_error(&parsed.status, parsed.error_message) {
            Some(error) => Err(error),
            None => Ok(parsed.body),
        }
    }

    async fn text_search(&self, query: &str) -> std::result::Result<Option<String>, LookupError> {
        let body: ResultsBody = self
            .get("place/textsearch/json", &[("query", query.to_string())])
            .await?;
        Ok(body.results.into_iter().find_map(|r| r.place_id))
    }

    async fn details(&self, place_id: &str) -> std::result::Result<Option<PlaceDetails>, LookupError> {
        let body: DetailsBody = self
            .get(
                "place/details/json",
                &[
                    ("place_id", place_id.to_string()),
                    ("fields", DETAIL_FIELDS.to_string()),
                ],
            )
            .await?;
        Ok(body.result)
    }

    async fn nearby_stations(&self, origin: (f64, f64)) -> std::result::Result<Vec<PlaceSummary>, LookupError> {
        let body: ResultsBody = self
            .get(
                "place/nearbysearch/json",
                &[
                    ("location", format!("{},{}", origin.0, origin.1)),
                    ("radius", self.nearby_radius_m.to_string()),
                    ("type", "transit_station".to_string()),
                ],
            )
            .await?;
        Ok(body.results)
    }

    async fn walk_minutes(&self, origin: (f64, f64), destination: LatLng) -> std::result::Result<Option<u32>, LookupError> {
        let body: MatrixBody = self
            .get(
                "distancematrix/json",
                &[
                    ("origins", format!("{},{}", origin.0, origin.1)),
                    ("destinations", format!("{},{}", destination.lat, destination.lng)),
                    ("mode", "walking".to_string()),
                ],
            )
            .await?;

        let minutes = body
            .rows
            .first()
            .and_then(|row| row.elements.first())
            .filter(|element| element.status == "OK")
            .and_then(|element| element.duration.as_ref())
            .map(|duration| (duration.value / 60.0).round().max(0.0) as u32);
        Ok(minutes)
    }
}

impl PlacesLookup for GooglePlacesClient {
    async fn lookup(&self, query: &PlaceQuery) -> LookupResult {
        let mut place_id = self.text_search(&query.text).await?;
        if place_id.is_none() {
            if let Some(fallback) = &query.fallback_text {
                debug!("No result for '{}', trying '{}'", query.text, fallback);
                place_id = self.text_search(fallback).await?;
            }
        }
        let place_id = place_id.ok_or_else(|| LookupError::NotFound {
            query: query.text.clone(),
        })?;

        let details = self
            .details(&place_id)
            .await?
            .ok_or_else(|| LookupError::NotFound {
                query: format!("details for {}", place_id),
            })?;

        let location = details.geometry.map(|g| g.location);
        let mut place = ResolvedPlace {
            name: non_blank(details.name),
            types: details.types,
            address: non_blank(details.formatted_address),
            lat: location.map(|l| l.lat),
            lng: location.map(|l| l.lng),
            phone: non_blank(details.formatted_phone_number)
                .or_else(|| non_blank(details.international_phone_number)),
            website: non_blank(details.website),
            map_url: non_blank(details.url),
            nearest_station: None,
            walk_minutes: None,
        };

        let Some(origin) = location.map(|l| (l.lat, l.lng)).or(query.origin) else {
            warn!("No coordinates for '{}', skipping station search", query.text);
            return Ok(place);
        };

        let candidates = self.nearby_stations(origin).await?;
        let Some((station, station_location)) = pick_station(&candidates, origin) else {
            debug!("No station within {} m of '{}'", self.nearby_radius_m, query.text);
            return Ok(place);
        };

        place.walk_minutes = self.walk_minutes(origin, station_location).await?;
        place.nearest_station = Some(station);
        Ok(place)
    }
}
