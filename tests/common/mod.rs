//! Shared fixtures for integration tests
//!
//! `StubPlaces` answers from fixed maps and counts calls, so tests can check
//! when the catalog short-circuits a lookup.

#![allow(dead_code)]

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;
use std::time::Duration;
use tour_guide::{
    Location, LookupError, LookupResult, PlaceRecord, PlaceType, PlacesGateway, Route,
    RoutesGateway, TravelMode,
};

pub fn colosseum() -> PlaceRecord {
    PlaceRecord::new("colosseum", "Colosseum", Location::new(41.8902, 12.4923))
        .with_address("Piazza del Colosseo, 1, 00184 Roma RM, Italy")
        .with_rating(4.7)
        .with_type("tourist_attraction")
        .with_type("historical_landmark")
}

pub fn roman_forum() -> PlaceRecord {
    PlaceRecord::new("forum", "Roman Forum", Location::new(41.8925, 12.4853))
        .with_rating(4.8)
        .with_type("historical_landmark")
}

pub fn pantheon() -> PlaceRecord {
    PlaceRecord::new("pantheon", "Pantheon", Location::new(41.8986, 12.4769))
        .with_rating(4.8)
        .with_type("church")
}

pub fn trevi_fountain() -> PlaceRecord {
    PlaceRecord::new("trevi", "Trevi Fountain", Location::new(41.9009, 12.4833))
        .with_rating(4.8)
        .with_type("tourist_attraction")
}

/// Places gateway answering from fixed maps
#[derive(Default)]
pub struct StubPlaces {
    text: HashMap<String, Vec<PlaceRecord>>,
    nearby: HashMap<String, Vec<PlaceRecord>>,
    failure: Mutex<Option<LookupError>>,
    pub text_calls: AtomicUsize,
    pub nearby_calls: AtomicUsize,
    pub last_nearby: Mutex<Option<(f64, Vec<PlaceType>)>>,
}

impl StubPlaces {
    pub fn new() -> Self {
        Self::default()
    }

    /// Answer text queries matching `query` (case-insensitive) with `results`
    pub fn with_text(mut self, query: &str, results: Vec<PlaceRecord>) -> Self {
        self.text.insert(query.to_lowercase(), results);
        self
    }

    /// Answer nearby searches around `origin` with `results`
    pub fn with_nearby(mut self, origin: &str, results: Vec<PlaceRecord>) -> Self {
        self.nearby.insert(origin.to_string(), results);
        self
    }

    /// Rome fixtures: each landmark is found by its own name, and the
    /// Colosseum has the Forum and Pantheon around it
    pub fn rome() -> Self {
        Self::new()
            .with_text("colosseum", vec![colosseum()])
            .with_text("colosseo", vec![colosseum()])
            .with_text("pantheon", vec![pantheon()])
            .with_text("trevi fountain", vec![trevi_fountain()])
            .with_text("roman forum", vec![roman_forum()])
            .with_text("rome landmarks", vec![colosseum(), pantheon(), trevi_fountain()])
            .with_nearby("Colosseum", vec![roman_forum(), pantheon()])
    }

    /// Fail every following call with `err`
    pub fn fail_with(&self, err: LookupError) {
        *self.failure.lock().unwrap() = Some(err);
    }

    pub fn fail_with_timeout(&self) {
        self.fail_with(LookupError::Timeout {
            context: "stub".to_string(),
            timeout: Duration::from_secs(30),
        });
    }

    pub fn recover(&self) {
        *self.failure.lock().unwrap() = None;
    }

    pub fn text_calls(&self) -> usize {
        self.text_calls.load(Ordering::SeqCst)
    }

    pub fn nearby_calls(&self) -> usize {
        self.nearby_calls.load(Ordering::SeqCst)
    }

    fn check_failure(&self) -> LookupResult<()> {
        match self.failure.lock().unwrap().clone() {
            Some(err) => Err(err),
            None => Ok(()),
        }
    }
}

#[async_trait]
impl PlacesGateway for StubPlaces {
    async fn search_by_text(&self, query: &str) -> LookupResult<Vec<PlaceRecord>> {
        self.text_calls.fetch_add(1, Ordering::SeqCst);
        self.check_failure()?;
        Ok(self.text.get(&query.to_lowercase()).cloned().unwrap_or_default())
    }

    async fn search_nearby(
        &self,
        origin: &PlaceRecord,
        radius_meters: f64,
        included_types: &[PlaceType],
    ) -> LookupResult<Vec<PlaceRecord>> {
        self.nearby_calls.fetch_add(1, Ordering::SeqCst);
        *self.last_nearby.lock().unwrap() = Some((radius_meters, included_types.to_vec()));
        self.check_failure()?;
        Ok(self
            .nearby
            .get(&origin.display_name)
            .cloned()
            .unwrap_or_default())
    }
}

/// Routes gateway returning a fixed route for every pair, except pairs
/// starting at `unroutable`
#[derive(Default)]
pub struct StubRoutes {
    pub unroutable: Option<Location>,
    pub calls: AtomicUsize,
    pub modes: Mutex<Vec<TravelMode>>,
}

impl StubRoutes {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl RoutesGateway for StubRoutes {
    async fn compute_route(
        &self,
        origin: &Location,
        _destination: &Location,
        mode: TravelMode,
    ) -> LookupResult<Option<Route>> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.modes.lock().unwrap().push(mode);
        if self.unroutable.as_ref() == Some(origin) {
            return Ok(None);
        }
        Ok(Some(Route {
            distance_meters: 1500,
            duration_secs: 1125,
        }))
    }
}
