//! Google Places (v1) and Routes (v2) gateway
//!
//! One [`GoogleMapsClient`] can serve every session: it wraps a pooled
//! `reqwest::Client` and carries no per-session state.

use super::{LookupResult, PlacesGateway, RoutesGateway};
use crate::config::TourConfig;
use crate::error::{LookupError, Result, TourError};
use crate::place::{Location, PlaceRecord, PlaceType};
use crate::route::{Route, TravelMode};
use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::{debug, trace, warn};

const PLACES_FIELD_MASK: &str = "places.id,\
places.displayName,\
places.types,\
places.location,\
places.formattedAddress,\
places.rating,\
places.userRatingCount,\
places.websiteUri,\
places.internationalPhoneNumber";

const ROUTES_FIELD_MASK: &str = "routes.distanceMeters,routes.duration";

const DEFAULT_ROUTES_LANGUAGE: &str = "en-US";

/// HTTP client for the Google Places and Routes APIs
#[derive(Debug, Clone)]
pub struct GoogleMapsClient {
    http: reqwest::Client,
    api_key: String,
    places_base_url: String,
    routes_base_url: String,
    max_result_count: u32,
    language_code: Option<String>,
    timeout: Duration,
}

impl GoogleMapsClient {
    pub fn new(config: &TourConfig) -> Result<Self> {
        config.validate()?;

        let http = reqwest::Client::builder()
            .timeout(config.request_timeout)
            .build()
            .map_err(|e| TourError::Configuration(format!("failed to build HTTP client: {}", e)))?;

        Ok(Self {
            http,
            api_key: config.places_api_key.clone(),
            places_base_url: config.places_base_url.trim_end_matches('/').to_string(),
            routes_base_url: config.routes_base_url.trim_end_matches('/').to_string(),
            max_result_count: config.max_result_count,
            language_code: config.language_code.clone(),
            timeout: config.request_timeout,
        })
    }

    async fn post<B, R>(&self, url: &str, field_mask: &str, body: &B, context: String) -> LookupResult<R>
    where
        B: Serialize + Sync,
        R: DeserializeOwned,
    {
        debug!(url = %url, context = %context, "Sending lookup request");

        let response = self
            .http
            .post(url)
            .header("X-Goog-Api-Key", &self.api_key)
            .header("X-Goog-FieldMask", field_mask)
            .json(body)
            .send()
            .await
            .map_err(|e| self.transport_error(&context, e))?;

        let status = response.status();
        let text = response
            .text()
            .await
            .map_err(|e| self.transport_error(&context, e))?;

        if !status.is_success() {
            warn!(context = %context, status = status.as_u16(), "Lookup returned error status");
            return Err(LookupError::Status {
                context,
                status: status.as_u16(),
                body: text,
            });
        }

        trace!(context = %context, bytes = text.len(), "Lookup response received");

        serde_json::from_str(&text).map_err(|e| LookupError::Malformed {
            context,
            message: e.to_string(),
        })
    }

    fn transport_error(&self, context: &str, err: reqwest::Error) -> LookupError {
        if err.is_timeout() {
            warn!(context = %context, timeout_secs = self.timeout.as_secs(), "Lookup timed out");
            LookupError::Timeout {
                context: context.to_string(),
                timeout: self.timeout,
            }
        } else {
            warn!(context = %context, error = %err, "Lookup transport failure");
            LookupError::Transport {
                context: context.to_string(),
                message: err.to_string(),
            }
        }
    }

    fn into_records(response: SearchResponse, context: String) -> LookupResult<Vec<PlaceRecord>> {
        response
            .places
            .into_iter()
            .map(WirePlace::into_record)
            .collect::<std::result::Result<Vec<_>, _>>()
            .map_err(|message| LookupError::Malformed { context, message })
    }
}

#[async_trait]
impl PlacesGateway for GoogleMapsClient {
    async fn search_by_text(&self, query: &str) -> LookupResult<Vec<PlaceRecord>> {
        let context = format!("text search '{}'", query);
        let body = TextSearchRequest {
            text_query: query,
            max_result_count: self.max_result_count,
            language_code: self.language_code.as_deref(),
        };
        let url = format!("{}/places:searchText", self.places_base_url);

        let response: SearchResponse = self.post(&url, PLACES_FIELD_MASK, &body, context.clone()).await?;
        let places = Self::into_records(response, context)?;

        debug!(query = %query, results = places.len(), "Text search completed");
        Ok(places)
    }

    async fn search_nearby(
        &self,
        origin: &PlaceRecord,
        radius_meters: f64,
        included_types: &[PlaceType],
    ) -> LookupResult<Vec<PlaceRecord>> {
        let context = format!(
            "nearby search around '{}' {} within {}m",
            origin.display_name, origin.location, radius_meters
        );
        let body = NearbySearchRequest {
            location_restriction: LocationRestriction {
                circle: Circle {
                    center: origin.location,
                    radius: radius_meters,
                },
            },
            included_types,
            max_result_count: self.max_result_count,
            language_code: self.language_code.as_deref(),
        };
        let url = format!("{}/places:searchNearby", self.places_base_url);

        let response: SearchResponse = self.post(&url, PLACES_FIELD_MASK, &body, context.clone()).await?;
        let places = Self::into_records(response, context)?;

        debug!(
            origin = %origin.display_name,
            radius_meters,
            results = places.len(),
            "Nearby search completed"
        );
        Ok(places)
    }
}

#[async_trait]
impl RoutesGateway for GoogleMapsClient {
    async fn compute_route(
        &self,
        origin: &Location,
        destination: &Location,
        mode: TravelMode,
    ) -> LookupResult<Option<Route>> {
        let context = format!("{} route {} -> {}", mode, origin, destination);
        let body = ComputeRoutesRequest {
            origin: Waypoint::at(*origin),
            destination: Waypoint::at(*destination),
            travel_mode: mode,
            compute_alternative_routes: false,
            language_code: self.language_code.as_deref().unwrap_or(DEFAULT_ROUTES_LANGUAGE),
            units: "METRIC",
        };
        let url = format!("{}/directions/v2:computeRoutes", self.routes_base_url);

        let response: RoutesResponse = self.post(&url, ROUTES_FIELD_MASK, &body, context.clone()).await?;

        let Some(first) = response.routes.into_iter().next() else {
            debug!(context = %context, "No route found");
            return Ok(None);
        };

        let duration_secs = first
            .duration
            .as_deref()
            .and_then(Route::parse_duration)
            .ok_or_else(|| LookupError::Malformed {
                context: context.clone(),
                message: format!("invalid route duration {:?}", first.duration),
            })?;

        Ok(Some(Route {
            distance_meters: first.distance_meters,
            duration_secs,
        }))
    }
}

// Wire format

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct TextSearchRequest<'a> {
    text_query: &'a str,
    max_result_count: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    language_code: Option<&'a str>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct NearbySearchRequest<'a> {
    location_restriction: LocationRestriction,
    #[serde(skip_serializing_if = "no_types")]
    included_types: &'a [PlaceType],
    max_result_count: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    language_code: Option<&'a str>,
}

fn no_types(types: &&[PlaceType]) -> bool {
    types.is_empty()
}

#[derive(Serialize)]
struct LocationRestriction {
    circle: Circle,
}

#[derive(Serialize)]
struct Circle {
    center: Location,
    radius: f64,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct ComputeRoutesRequest<'a> {
    origin: Waypoint,
    destination: Waypoint,
    travel_mode: TravelMode,
    compute_alternative_routes: bool,
    language_code: &'a str,
    units: &'static str,
}

#[derive(Serialize)]
struct Waypoint {
    location: WaypointLocation,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct WaypointLocation {
    lat_lng: Location,
}

impl Waypoint {
    fn at(location: Location) -> Self {
        Self {
            location: WaypointLocation { lat_lng: location },
        }
    }
}

/// The service answers `{}` when nothing matches
#[derive(Deserialize)]
struct SearchResponse {
    #[serde(default)]
    places: Vec<WirePlace>,
}

#[derive(Deserialize)]
struct LocalizedText {
    text: String,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct WirePlace {
    id: Option<String>,
    display_name: Option<LocalizedText>,
    #[serde(default)]
    types: Vec<String>,
    location: Option<Location>,
    formatted_address: Option<String>,
    rating: Option<f64>,
    user_rating_count: Option<u32>,
    website_uri: Option<String>,
    international_phone_number: Option<String>,
}

impl WirePlace {
    fn into_record(self) -> std::result::Result<PlaceRecord, String> {
        let id = self.id.ok_or("place without id")?;
        let display_name = self
            .display_name
            .map(|name| name.text)
            .ok_or_else(|| format!("place {} has no displayName", id))?;
        let location = self
            .location
            .filter(Location::is_valid)
            .ok_or_else(|| format!("place '{}' has no valid location", display_name))?;
        if let Some(rating) = self.rating {
            if !(0.0..=5.0).contains(&rating) {
                return Err(format!(
                    "place '{}' has rating {} outside 0..=5",
                    display_name, rating
                ));
            }
        }

        let mut record = PlaceRecord::new(id, display_name, location);
        record.address = self.formatted_address;
        record.rating = self.rating;
        record.user_rating_count = self.user_rating_count;
        record.website = self.website_uri;
        record.phone_number = self.international_phone_number;
        for tag in self.types {
            record = record.with_type(tag);
        }
        Ok(record)
    }
}

#[derive(Deserialize)]
struct RoutesResponse {
    #[serde(default)]
    routes: Vec<WireRoute>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct WireRoute {
    #[serde(default)]
    distance_meters: u64,
    duration: Option<String>,
}
