//! Geolocation and reverse-geocoding adapters.
//!
//! Position acquisition is modeled as a value-returning outcome, never an
//! error: the checkout flow degrades to "no fee calculated" on denial, so
//! exceptions would only be control flow in disguise. Reverse geocoding is
//! best-effort enrichment and absorbs every failure into `None`.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};
use url::Url;

/// A latitude/longitude pair in degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinates {
    pub lat: f64,
    pub lng: f64,
}

/// Result of asking the platform for the user's position.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PositionOutcome {
    /// The platform produced a position.
    Position(Coordinates),
    /// The user denied permission, or acquisition timed out.
    Denied,
    /// The platform has no geolocation capability at all.
    Unsupported,
}

/// Source of the user's position.
///
/// The platform position API may suspend indefinitely behind a permission
/// prompt, so implementations are async. The concrete provider is injected
/// into [`crate::checkout::CheckoutFlow`]; tests implement this directly.
#[allow(async_fn_in_trait)]
pub trait PositionProvider {
    async fn request_position(&self) -> PositionOutcome;
}

/// Provider pinned to fixed coordinates, for kiosk deployments and tests.
#[derive(Debug, Clone, Copy)]
pub struct FixedPosition(pub Coordinates);

impl PositionProvider for FixedPosition {
    async fn request_position(&self) -> PositionOutcome {
        PositionOutcome::Position(self.0)
    }
}

/// Provider for platforms with no position source.
#[derive(Debug, Clone, Copy, Default)]
pub struct UnsupportedPlatform;

impl PositionProvider for UnsupportedPlatform {
    async fn request_position(&self) -> PositionOutcome {
        PositionOutcome::Unsupported
    }
}

// =============================================================================
// Reverse geocoding
// =============================================================================

/// Best-effort reverse geocoder against a Nominatim-shaped endpoint.
///
/// Used only to pre-fill the delivery-address field; a `None` from
/// [`Self::resolve_area`] leaves the field for the user to type.
#[derive(Clone)]
pub struct ReverseGeocoder {
    inner: Arc<ReverseGeocoderInner>,
}

struct ReverseGeocoderInner {
    client: reqwest::Client,
    endpoint: String,
}

impl ReverseGeocoder {
    /// Create a geocoder against the given service base URL.
    #[must_use]
    pub fn new(base: &Url) -> Self {
        let endpoint = format!("{}/reverse", base.as_str().trim_end_matches('/'));
        Self {
            inner: Arc::new(ReverseGeocoderInner {
                client: reqwest::Client::new(),
                endpoint,
            }),
        }
    }

    /// Resolve coordinates to a human-readable area string.
    ///
    /// Any failure (network, non-2xx, malformed body, missing fields)
    /// resolves to `None`; nothing here may interrupt checkout.
    #[instrument(skip(self))]
    pub async fn resolve_area(&self, position: Coordinates) -> Option<String> {
        match self.fetch(position).await {
            Ok(area) => area,
            Err(e) => {
                debug!(error = %e, "reverse geocode failed");
                None
            }
        }
    }

    async fn fetch(&self, position: Coordinates) -> Result<Option<String>, reqwest::Error> {
        let response = self
            .inner
            .client
            .get(&self.inner.endpoint)
            .query(&[
                ("format", "json".to_string()),
                ("lat", position.lat.to_string()),
                ("lon", position.lng.to_string()),
            ])
            .send()
            .await?
            .error_for_status()?;

        let body: GeocodeResponse = response.json().await?;
        Ok(area_from_response(&body))
    }
}

/// Subset of the reverse-geocode response we read.
#[derive(Debug, Deserialize)]
struct GeocodeResponse {
    display_name: Option<String>,
    address: Option<GeocodeAddress>,
}

#[derive(Debug, Deserialize)]
struct GeocodeAddress {
    suburb: Option<String>,
    neighbourhood: Option<String>,
    city: Option<String>,
    town: Option<String>,
    village: Option<String>,
}

/// Pick the most useful area string out of a geocode response.
///
/// Prefers "locality, city" from the structured address, falling back to the
/// full display name.
fn area_from_response(response: &GeocodeResponse) -> Option<String> {
    let address = response.address.as_ref();

    let locality = address.and_then(|a| {
        a.suburb
            .as_deref()
            .or(a.neighbourhood.as_deref())
            .filter(|s| !s.is_empty())
    });
    let city = address.and_then(|a| {
        a.city
            .as_deref()
            .or(a.town.as_deref())
            .or(a.village.as_deref())
            .filter(|s| !s.is_empty())
    });

    match (locality, city) {
        (Some(locality), Some(city)) => Some(format!("{locality}, {city}")),
        (Some(area), None) | (None, Some(area)) => Some(area.to_string()),
        (None, None) => response
            .display_name
            .clone()
            .filter(|name| !name.is_empty()),
    }
}
