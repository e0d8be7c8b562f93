//! Tour list and the per-session tour state
//!
//! [`TourState`] is the value every controller operation reads and returns.
//! It is cloned on write, so an operation that fails leaves the caller's copy
//! exactly as it was.

use crate::catalog::PlaceCatalog;
use crate::error::{Result, TourError};
use crate::place::PlaceRecord;
use serde::{Deserialize, Serialize};

/// Ordered, duplicate-free list of display names in visit order
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TourList(Vec<String>);

impl TourList {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append `display_name` unless it is already present.
    ///
    /// Returns whether the list changed.
    pub fn push(&mut self, display_name: impl Into<String>) -> bool {
        let display_name = display_name.into();
        if self.contains(&display_name) {
            return false;
        }
        self.0.push(display_name);
        true
    }

    /// Remove the single entry matching `display_name`, keeping the order of
    /// the rest.
    pub fn remove(&mut self, display_name: &str) -> Result<()> {
        if self.0.is_empty() {
            return Err(TourError::EmptyTour);
        }
        let position = self
            .0
            .iter()
            .position(|name| name == display_name)
            .ok_or_else(|| TourError::PlaceNotInTour {
                name: display_name.to_string(),
                tour: self.0.clone(),
            })?;
        self.0.remove(position);
        Ok(())
    }

    pub fn contains(&self, display_name: &str) -> bool {
        self.0.iter().any(|name| name == display_name)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn names(&self) -> &[String] {
        &self.0
    }
}

/// Place catalog plus tour list for one conversation session
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TourState {
    #[serde(default)]
    pub catalog: PlaceCatalog,
    #[serde(default)]
    pub tour: TourList,
}

impl TourState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Resolve every tour stop in visit order.
    ///
    /// A stop without a catalog entry means the state was corrupted outside
    /// the public operations, so it is reported as an internal error.
    pub fn stops(&self) -> Result<Vec<&PlaceRecord>> {
        self.catalog
            .get_many(self.tour.names())
            .map_err(|err| match err {
                TourError::NotFound(name) => TourError::Internal(format!(
                    "tour entry '{}' has no catalog entry",
                    name
                )),
                other => other,
            })
    }

    /// Itinerary text handed to the narration component
    pub fn itinerary_text(&self) -> Result<String> {
        let stops = self.stops()?;
        if stops.is_empty() {
            return Ok("The tour is empty.".to_string());
        }
        Ok(stops
            .iter()
            .enumerate()
            .map(|(n, place)| format!("Stop {}\n{}", n + 1, place.structured_summary()))
            .collect::<Vec<_>>()
            .join("\n"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::place::Location;

    fn tour(names: &[&str]) -> TourList {
        let mut list = TourList::new();
        for name in names {
            list.push(*name);
        }
        list
    }

    #[test]
    fn test_push_rejects_duplicates() {
        let mut list = tour(&["A"]);
        assert!(!list.push("A"));
        assert!(list.push("B"));
        assert_eq!(list.names(), &["A".to_string(), "B".to_string()]);
    }

    #[test]
    fn test_remove_preserves_order() {
        let mut list = tour(&["A", "B", "C"]);
        list.remove("B").unwrap();
        assert_eq!(list.names(), &["A".to_string(), "C".to_string()]);
    }

    #[test]
    fn test_remove_from_empty_tour() {
        let mut list = TourList::new();
        assert!(matches!(list.remove("A"), Err(TourError::EmptyTour)));
    }

    #[test]
    fn test_remove_missing_names_current_tour() {
        let mut list = tour(&["A", "B"]);
        match list.remove("C") {
            Err(TourError::PlaceNotInTour { name, tour }) => {
                assert_eq!(name, "C");
                assert_eq!(tour, vec!["A".to_string(), "B".to_string()]);
            }
            other => panic!("expected PlaceNotInTour, got {:?}", other),
        }
        assert_eq!(list.len(), 2);
    }

    #[test]
    fn test_stops_reports_corruption_as_internal() {
        let mut state = TourState::new();
        state.tour.push("Ghost");
        assert!(matches!(state.stops(), Err(TourError::Internal(_))));
    }

    #[test]
    fn test_itinerary_text() {
        let mut state = TourState::new();
        assert_eq!(state.itinerary_text().unwrap(), "The tour is empty.");

        state.catalog.upsert(
            PlaceRecord::new("p1", "Pantheon", Location::new(41.8986, 12.4769))
                .with_address("Piazza della Rotonda, Roma"),
        );
        state.tour.push("Pantheon");

        let text = state.itinerary_text().unwrap();
        assert!(text.starts_with("Stop 1\nDisplay Name: Pantheon\n"));
        assert!(text.contains("Address: Piazza della Rotonda, Roma"));
    }
}
