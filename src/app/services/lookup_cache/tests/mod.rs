//! Test utilities for lookup cache testing

use crate::app::models::ResolvedPlace;

mod key_tests;
mod store_tests;

/// Resolved place with an address and coordinates
pub fn place(address: &str) -> ResolvedPlace {
    ResolvedPlace {
        address: Some(address.to_string()),
        lat: Some(35.5),
        lng: Some(139.6),
        nearest_station: Some("菊名駅".to_string()),
        walk_minutes: Some(6),
        ..Default::default()
    }
}
