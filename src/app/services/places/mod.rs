//! External places lookup boundary
//!
//! The enrichment pass treats the external service as one opaque capability:
//! given a query it yields a [`ResolvedPlace`] (possibly partial) or a
//! [`LookupError`]. Lookup errors are row-level and never become a run-level
//! [`crate::Error`].
//!
//! ## Architecture
//!
//! - [`google`] - Google Maps Platform backed implementation
//! - [`station`] - Station name normalization and plausibility checks

pub mod google;
pub mod station;

#[cfg(test)]
pub mod tests;

use crate::app::models::ResolvedPlace;
use std::future::Future;

pub use google::GooglePlacesClient;
pub use station::{is_bad_station_name, needs_station_fix, normalize_station_name, station_kana};

/// What the enrichment pass asks the external service for
#[derive(Debug, Clone, PartialEq)]
pub struct PlaceQuery {
    /// Primary free-text query (name plus address or city and ward)
    pub text: String,
    /// Broader query tried when the primary one finds nothing
    pub fallback_text: Option<String>,
    /// Known coordinates of the facility, used for the station step when
    /// the place itself comes back without a location
    pub origin: Option<(f64, f64)>,
}

impl PlaceQuery {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            fallback_text: None,
            origin: None,
        }
    }

    pub fn with_fallback(mut self, text: impl Into<String>) -> Self {
        self.fallback_text = Some(text.into());
        self
    }

    pub fn with_origin(mut self, origin: Option<(f64, f64)>) -> Self {
        self.origin = origin;
        self
    }
}

/// Row-level lookup failure
#[derive(thiserror::Error, Debug, Clone, PartialEq)]
pub enum LookupError {
    /// The lookup did not finish within the configured bound
    #[error("lookup timed out after {secs}s")]
    Timeout { secs: u64 },

    /// The service found no matching place
    #[error("no place found for '{query}'")]
    NotFound { query: String },

    /// Rate limit or quota exhausted
    #[error("quota exceeded: {message}")]
    Quota { message: String },

    /// The service answered with an error status
    #[error("service error {status}: {message}")]
    Http { status: String, message: String },

    /// Network failure or undecodable response
    #[error("transport error: {message}")]
    Transport { message: String },

    /// A result came back but failed the address sanity check
    #[error("result rejected: {reason}")]
    Rejected { reason: String },
}

impl LookupError {
    /// Short machine-readable reason for the misses report
    pub fn reason_code(&self) -> &'static str {
        match self {
            Self::Timeout { .. } => "timeout",
            Self::NotFound { .. } => "not_found",
            Self::Quota { .. } => "quota",
            Self::Http { .. } => "service_error",
            Self::Transport { .. } => "transport_error",
            Self::Rejected { .. } => "rejected",
        }
    }
}

/// Result of one external lookup
pub type LookupResult = std::result::Result<ResolvedPlace, LookupError>;

/// External places lookup capability
///
/// Implementations issue their requests sequentially; the caller never runs
/// two lookups at once.
pub trait PlacesLookup {
    fn lookup(&self, query: &PlaceQuery) -> impl Future<Output = LookupResult> + Send;
}
