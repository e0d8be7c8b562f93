//! Tour controller
//!
//! Each operation is one agent tool call: it reads a [`TourState`], may call
//! a gateway, and returns an [`Update`] holding the new state and a message
//! for the user. The input state is never modified, so a failed call leaves
//! nothing half-applied and the caller simply keeps its old state.
//!
//! Nothing is retried here. Gateway failures are surfaced as they are and
//! retry policy belongs to the caller.

use crate::config::{TourConfig, MAX_RADIUS_METERS};
use crate::error::{Result, TourError};
use crate::gateway::{PlacesGateway, RoutesGateway};
use crate::place::{PlaceRecord, PlaceType};
use crate::route::{RouteLeg, TravelMode};
use crate::tour::TourState;
use futures::future::try_join_all;
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Result of a successful controller operation
#[derive(Debug, Clone, PartialEq)]
pub struct Update<T> {
    /// State to write back to the session
    pub state: TourState,
    /// Operation-specific payload
    pub value: T,
    /// User-facing summary of what happened
    pub message: String,
}

impl<T> Update<T> {
    fn new(state: TourState, value: T, message: impl Into<String>) -> Self {
        Self {
            state,
            value,
            message: message.into(),
        }
    }
}

/// Add/remove/expand operations over a session's tour state
pub struct TourController {
    places: Arc<dyn PlacesGateway>,
    routes: Option<Arc<dyn RoutesGateway>>,
    default_radius_meters: f64,
}

impl TourController {
    pub fn new(places: Arc<dyn PlacesGateway>) -> Self {
        Self {
            places,
            routes: None,
            default_radius_meters: 1000.0,
        }
    }

    /// Controller with the radius default taken from `config`
    pub fn from_config(places: Arc<dyn PlacesGateway>, config: &TourConfig) -> Self {
        Self::new(places).with_default_radius(config.default_radius_meters)
    }

    /// Attach a routes gateway, enabling [`TourController::plan_route`]
    pub fn with_routes(mut self, routes: Arc<dyn RoutesGateway>) -> Self {
        self.routes = Some(routes);
        self
    }

    pub fn with_default_radius(mut self, radius_meters: f64) -> Self {
        self.default_radius_meters = radius_meters;
        self
    }

    pub fn default_radius_meters(&self) -> f64 {
        self.default_radius_meters
    }

    /// Search places by text and make every result addable by name
    pub async fn search(&self, state: &TourState, query: &str) -> Result<Update<Vec<PlaceRecord>>> {
        let query = non_blank(query, "query")?;
        let results = self.places.search_by_text(query).await?;

        let mut next = state.clone();
        next.catalog.merge(results.iter().cloned());

        let message = if results.is_empty() {
            format!("Nothing found for '{}'", query)
        } else {
            format!(
                "Found {} place(s) for '{}': {}",
                results.len(),
                query,
                join_names(&results)
            )
        };
        info!(query = %query, results = results.len(), "Search completed");
        Ok(Update::new(next, results, message))
    }

    /// Find `display_name` in the catalog, or fetch it by text search.
    ///
    /// On a miss the first search result is trusted as the match and stored
    /// in the catalog under its own display name.
    pub async fn resolve_or_fetch(&self, state: &TourState, display_name: &str) -> Result<Update<PlaceRecord>> {
        let display_name = non_blank(display_name, "display_name")?;

        if let Ok(place) = state.catalog.get(display_name) {
            debug!(display_name = %display_name, "Resolved from catalog");
            return Ok(Update::new(
                state.clone(),
                place.clone(),
                format!("'{}' is already known", display_name),
            ));
        }

        let place = self
            .places
            .search_by_text(display_name)
            .await?
            .into_iter()
            .next()
            .ok_or_else(|| TourError::PlaceNotFound {
                query: display_name.to_string(),
            })?;

        debug!(
            display_name = %display_name,
            resolved = %place.display_name,
            place_id = %place.id,
            "Resolved by text search"
        );

        let mut next = state.clone();
        next.catalog.upsert(place.clone());
        let message = format!("Found '{}' for '{}'", place.display_name, display_name);
        Ok(Update::new(next, place, message))
    }

    /// Add a place to the end of the tour.
    ///
    /// A place already on the tour is not added again. The name stored on the
    /// tour is the resolved record's display name, which always has a catalog
    /// entry.
    pub async fn add_place(&self, state: &TourState, display_name: &str) -> Result<Update<PlaceRecord>> {
        let Update {
            state: mut next,
            value: place,
            ..
        } = self.resolve_or_fetch(state, display_name).await?;

        let message = if next.tour.push(place.display_name.clone()) {
            info!(display_name = %place.display_name, stops = next.tour.len(), "Added place to tour");
            format!(
                "Added '{}' to the tour ({} stop(s))",
                place.display_name,
                next.tour.len()
            )
        } else {
            debug!(display_name = %place.display_name, "Place already on tour");
            format!("'{}' is already on the tour", place.display_name)
        };

        Ok(Update::new(next, place, message))
    }

    /// Remove a place from the tour, keeping the order of the others
    pub fn remove_place(&self, state: &TourState, display_name: &str) -> Result<Update<()>> {
        let display_name = non_blank(display_name, "display_name")?;
        let mut next = state.clone();
        next.tour.remove(display_name)?;

        info!(display_name = %display_name, stops = next.tour.len(), "Removed place from tour");
        let message = format!(
            "Removed '{}' from the tour ({} stop(s) left)",
            display_name,
            next.tour.len()
        );
        Ok(Update::new(next, (), message))
    }

    /// Search around a place and merge what is found into the catalog.
    ///
    /// The tour itself is untouched: results are candidates, each needs its
    /// own [`TourController::add_place`]. `radius_meters` falls back to the
    /// configured default.
    pub async fn expand_nearby(
        &self,
        state: &TourState,
        display_name: &str,
        radius_meters: Option<f64>,
        included_types: &[PlaceType],
    ) -> Result<Update<Vec<PlaceRecord>>> {
        let radius = radius_meters.unwrap_or(self.default_radius_meters);
        if !(radius > 0.0 && radius <= MAX_RADIUS_METERS) {
            return Err(TourError::InvalidInput(format!(
                "radius must be in (0, {}] meters, got {}",
                MAX_RADIUS_METERS, radius
            )));
        }

        let Update {
            state: mut next,
            value: origin,
            ..
        } = self.resolve_or_fetch(state, display_name).await?;

        let results = self
            .places
            .search_nearby(&origin, radius, included_types)
            .await?;
        next.catalog.merge(results.iter().cloned());

        info!(
            origin = %origin.display_name,
            radius_meters = radius,
            results = results.len(),
            catalog_size = next.catalog.len(),
            "Nearby expansion completed"
        );

        let message = if results.is_empty() {
            format!(
                "Nothing found within {}m of '{}'",
                radius, origin.display_name
            )
        } else {
            format!(
                "Found {} place(s) within {}m of '{}': {}",
                results.len(),
                radius,
                origin.display_name,
                join_names(&results)
            )
        };
        Ok(Update::new(next, results, message))
    }

    /// Compute one route leg per pair of consecutive stops.
    ///
    /// Legs are requested concurrently; the first failing leg fails the call.
    pub async fn plan_route(&self, state: &TourState, mode: TravelMode) -> Result<Update<Vec<RouteLeg>>> {
        let routes = self.routes.as_ref().ok_or_else(|| {
            TourError::Configuration("no routes gateway configured".to_string())
        })?;

        let stops = state.stops()?;
        if stops.is_empty() {
            return Err(TourError::EmptyTour);
        }

        let legs = try_join_all(stops.windows(2).map(|pair| {
            let (from, to) = (pair[0], pair[1]);
            async move {
                let route = routes
                    .compute_route(&from.location, &to.location, mode)
                    .await?;
                if route.is_none() {
                    warn!(from = %from.display_name, to = %to.display_name, "No route between stops");
                }
                Ok::<_, TourError>(RouteLeg {
                    from: from.display_name.clone(),
                    to: to.display_name.clone(),
                    route,
                })
            }
        }))
        .await?;

        let message = if legs.is_empty() {
            "The tour has a single stop, there is nothing to route".to_string()
        } else {
            legs.iter()
                .map(RouteLeg::describe)
                .collect::<Vec<_>>()
                .join("\n")
        };
        info!(legs = legs.len(), mode = %mode, "Route planned");
        Ok(Update::new(state.clone(), legs, message))
    }

    /// Itinerary text for the narration component
    pub fn describe_tour(&self, state: &TourState) -> Result<String> {
        state.itinerary_text()
    }
}

fn non_blank<'a>(value: &'a str, field: &str) -> Result<&'a str> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(TourError::InvalidInput(format!("{} must not be empty", field)));
    }
    Ok(trimmed)
}

fn join_names(places: &[PlaceRecord]) -> String {
    places
        .iter()
        .map(|p| p.display_name.as_str())
        .collect::<Vec<_>>()
        .join(", ")
}
