//! Session-scoped place catalog
//!
//! Every place seen during a session ends up here, keyed by display name.
//! The catalog only grows; the tour list decides what the visitor sees.

use crate::error::{Result, TourError};
use crate::place::PlaceRecord;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use tracing::trace;

/// What an upsert did to the catalog
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Upsert {
    Inserted,
    Updated,
    Unchanged,
}

/// Deduplicated collection of places keyed by display name.
///
/// Iteration follows first-insertion order; an update keeps the entry in its
/// original slot.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(from = "Vec<PlaceRecord>", into = "Vec<PlaceRecord>")]
pub struct PlaceCatalog {
    places: Vec<PlaceRecord>,
    index: HashMap<String, usize>,
}

impl PlaceCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or overwrite the entry for `place.display_name`. Last write wins.
    pub fn upsert(&mut self, place: PlaceRecord) -> Upsert {
        match self.index.get(&place.display_name) {
            Some(&slot) if self.places[slot] == place => Upsert::Unchanged,
            Some(&slot) => {
                trace!(display_name = %place.display_name, "Replacing catalog entry");
                self.places[slot] = place;
                Upsert::Updated
            }
            None => {
                trace!(display_name = %place.display_name, "Adding catalog entry");
                self.index
                    .insert(place.display_name.clone(), self.places.len());
                self.places.push(place);
                Upsert::Inserted
            }
        }
    }

    pub fn get(&self, display_name: &str) -> Result<&PlaceRecord> {
        self.index
            .get(display_name)
            .map(|&slot| &self.places[slot])
            .ok_or_else(|| TourError::NotFound(display_name.to_string()))
    }

    /// Look up every name, failing on the first one that is missing
    pub fn get_many<S: AsRef<str>>(&self, display_names: &[S]) -> Result<Vec<&PlaceRecord>> {
        display_names
            .iter()
            .map(|name| self.get(name.as_ref()))
            .collect()
    }

    /// Upsert every record from `source`; returns how many entries changed
    pub fn merge<I>(&mut self, source: I) -> usize
    where
        I: IntoIterator<Item = PlaceRecord>,
    {
        source
            .into_iter()
            .map(|place| self.upsert(place))
            .filter(|outcome| *outcome != Upsert::Unchanged)
            .count()
    }

    pub fn contains(&self, display_name: &str) -> bool {
        self.index.contains_key(display_name)
    }

    pub fn len(&self) -> usize {
        self.places.len()
    }

    pub fn is_empty(&self) -> bool {
        self.places.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &PlaceRecord> {
        self.places.iter()
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.places.iter().map(|p| p.display_name.as_str())
    }
}

impl From<Vec<PlaceRecord>> for PlaceCatalog {
    fn from(places: Vec<PlaceRecord>) -> Self {
        let mut catalog = Self::new();
        catalog.merge(places);
        catalog
    }
}

impl From<PlaceCatalog> for Vec<PlaceRecord> {
    fn from(catalog: PlaceCatalog) -> Self {
        catalog.places
    }
}

impl IntoIterator for PlaceCatalog {
    type Item = PlaceRecord;
    type IntoIter = std::vec::IntoIter<PlaceRecord>;

    fn into_iter(self) -> Self::IntoIter {
        self.places.into_iter()
    }
}

impl Extend<PlaceRecord> for PlaceCatalog {
    fn extend<I: IntoIterator<Item = PlaceRecord>>(&mut self, iter: I) {
        self.merge(iter);
    }
}
