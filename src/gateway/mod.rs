//! Adapters to the external places and routes services
//!
//! Gateways only fetch. They hold no session state and never touch a catalog;
//! callers decide what to merge.

use crate::error::LookupError;
use crate::place::{Location, PlaceRecord, PlaceType};
use crate::route::{Route, TravelMode};
use async_trait::async_trait;

pub mod google;

/// Result type for gateway calls
pub type LookupResult<T> = std::result::Result<T, LookupError>;

/// Text and nearby search against a places service
#[async_trait]
pub trait PlacesGateway: Send + Sync {
    /// Search places by free text.
    ///
    /// A well-formed query that matches nothing yields an empty list, not an
    /// error. Results keep the service's relevance order.
    async fn search_by_text(&self, query: &str) -> LookupResult<Vec<PlaceRecord>>;

    /// Search places within `radius_meters` of `origin`.
    ///
    /// An empty `included_types` means no category filter.
    async fn search_nearby(
        &self,
        origin: &PlaceRecord,
        radius_meters: f64,
        included_types: &[PlaceType],
    ) -> LookupResult<Vec<PlaceRecord>>;
}

/// Route computation between two coordinates
#[async_trait]
pub trait RoutesGateway: Send + Sync {
    /// Returns `None` when the service cannot find a route
    async fn compute_route(
        &self,
        origin: &Location,
        destination: &Location,
        mode: TravelMode,
    ) -> LookupResult<Option<Route>>;
}
