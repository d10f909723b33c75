//! Reverse geocoding: turn coordinates into a short place label.
//! Uses Nominatim (OpenStreetMap) - free, no API key required.

use crate::types::Coordinates;
use reqwest::Client;
use serde::Deserialize;

pub const NOMINATIM_URL: &str = "https://nominatim.openstreetmap.org/reverse";

/// Label used when the place name cannot be resolved.
pub const UNKNOWN_LOCATION: &str = "Unknown Location";

#[derive(Debug, Deserialize)]
struct NominatimResponse {
    address: Option<NominatimAddress>,
}

#[derive(Debug, Deserialize)]
struct NominatimAddress {
    city: Option<String>,
    town: Option<String>,
    village: Option<String>,
    municipality: Option<String>,
    county: Option<String>,
    state: Option<String>,
    country: Option<String>,
}

impl NominatimAddress {
    /// First non-blank field, most specific first.
    fn place_name(self) -> Option<String> {
        [
            self.city,
            self.town,
            self.village,
            self.municipality,
            self.county,
            self.state,
            self.country,
        ]
        .into_iter()
        .flatten()
        .find(|name| !name.trim().is_empty())
    }
}

/// Reverse geocode coordinates to a place name (e.g. "Seattle").
/// Returns `None` on failure; the caller falls back to [`UNKNOWN_LOCATION`].
pub async fn reverse_geocode(
    client: &Client,
    base_url: &str,
    coords: Coordinates,
) -> Option<String> {
    let url = format!(
        "{}?lat={}&lon={}&format=json&addressdetails=1&zoom=10",
        base_url, coords.latitude, coords.longitude
    );

    let response = match client.get(&url).send().await {
        Ok(r) => r,
        Err(e) => {
            tracing::debug!("Reverse geocode request failed: {}", e);
            return None;
        }
    };

    if !response.status().is_success() {
        tracing::debug!("Reverse geocode returned status {}", response.status());
        return None;
    }

    let body: NominatimResponse = match response.json().await {
        Ok(b) => b,
        Err(e) => {
            tracing::debug!("Reverse geocode parse error: {}", e);
            return None;
        }
    };

    let place = body.address?.place_name()?;
    tracing::info!("Reverse geocoded to: {}", place);
    Some(place)
}
