//! Integration tests for the built-in tour tools
//!
//! Exercises the tools through a bare `ToolRegistry`, without sessions, to
//! check schemas, parameter validation and the effects each tool reports.

mod common;

use common::{colosseum, StubPlaces, StubRoutes};
use serde_json::{json, Value};
use std::collections::HashMap;
use std::sync::Arc;
use tour_guide::*;

async fn registry(places: Arc<StubPlaces>) -> ToolRegistry {
    let controller = TourController::new(places).with_routes(Arc::new(StubRoutes::new()));
    let registry = ToolRegistry::new();
    register_tour_tools(&registry, Arc::new(controller))
        .await
        .unwrap();
    registry
}

fn params(entries: &[(&str, Value)]) -> HashMap<String, Value> {
    entries
        .iter()
        .map(|(k, v)| (k.to_string(), v.clone()))
        .collect()
}

#[tokio::test]
async fn test_registering_twice_fails() {
    let places = Arc::new(StubPlaces::new());
    let registry = registry(places.clone()).await;

    let err = register_tour_tools(&registry, Arc::new(TourController::new(places)))
        .await
        .unwrap_err();
    assert!(matches!(err, TourError::ToolAlreadyRegistered(_)));
}

#[tokio::test]
async fn test_schemas_describe_parameters() {
    let registry = registry(Arc::new(StubPlaces::new())).await;
    let schemas = registry.schemas().await;
    let by_name = |name: &str| {
        schemas
            .iter()
            .find(|s| s["name"] == json!(name))
            .cloned()
            .unwrap()
    };

    let expand = by_name("expand_nearby");
    assert_eq!(expand["parameters"]["display_name"]["required"], json!(true));
    assert_eq!(expand["parameters"]["radius_meters"]["param_type"], json!("number"));
    assert!(expand["parameters"]["included_types"]["description"]
        .as_str()
        .unwrap()
        .contains("tourist_attraction"));

    let route = by_name("plan_route");
    assert_eq!(route["parameters"]["travel_mode"]["default"], json!("walk"));

    let show = by_name("show_tour");
    assert_eq!(show["parameters"], json!({}));
}

#[tokio::test]
async fn test_search_places_returns_new_state() {
    let registry = registry(Arc::new(StubPlaces::rome())).await;

    let effect = registry
        .execute(
            "search_places",
            &TourState::new(),
            params(&[("query", json!("rome landmarks"))]),
        )
        .await
        .unwrap();

    assert_eq!(effect.output["places"].as_array().unwrap().len(), 3);
    let state = effect.state.unwrap();
    assert_eq!(state.catalog.len(), 3);
    assert!(state.tour.is_empty());
    assert!(effect.message.starts_with("Found 3 place(s)"));
}

#[tokio::test]
async fn test_blank_query_is_invalid_input() {
    let registry = registry(Arc::new(StubPlaces::rome())).await;

    let err = registry
        .execute("search_places", &TourState::new(), params(&[("query", json!("  "))]))
        .await
        .unwrap_err();
    assert!(matches!(err, TourError::InvalidInput(_)));
}

#[tokio::test]
async fn test_remove_place_tool() {
    let registry = registry(Arc::new(StubPlaces::new())).await;
    let mut state = TourState::new();
    state.catalog.upsert(colosseum());
    state.tour.push("Colosseum");

    let effect = registry
        .execute(
            "remove_place",
            &state,
            params(&[("display_name", json!("Colosseum"))]),
        )
        .await
        .unwrap();

    assert_eq!(effect.output["tour"], json!([]));
    assert!(effect.state.unwrap().tour.is_empty());
}

#[tokio::test]
async fn test_expand_nearby_rejects_non_string_type() {
    let registry = registry(Arc::new(StubPlaces::rome())).await;
    let mut state = TourState::new();
    state.catalog.upsert(colosseum());

    let err = registry
        .execute(
            "expand_nearby",
            &state,
            params(&[
                ("display_name", json!("Colosseum")),
                ("included_types", json!([42])),
            ]),
        )
        .await
        .unwrap_err();
    assert!(matches!(err, TourError::InvalidInput(_)));
}

#[tokio::test]
async fn test_expand_nearby_wrong_radius_type() {
    let registry = registry(Arc::new(StubPlaces::rome())).await;

    let err = registry
        .execute(
            "expand_nearby",
            &TourState::new(),
            params(&[
                ("display_name", json!("Colosseum")),
                ("radius_meters", json!("wide")),
            ]),
        )
        .await
        .unwrap_err();
    assert!(matches!(err, TourError::InvalidToolParameters { .. }));
}

#[tokio::test]
async fn test_plan_route_accepts_mode_names() {
    let registry = registry(Arc::new(StubPlaces::rome())).await;
    let mut state = TourState::new();
    for name in ["Colosseum", "Pantheon"] {
        state = registry
            .execute("add_place", &state, params(&[("display_name", json!(name))]))
            .await
            .unwrap()
            .state
            .unwrap();
    }

    for mode in ["walk", "DRIVE", "bike", "transit"] {
        let effect = registry
            .execute("plan_route", &state, params(&[("travel_mode", json!(mode))]))
            .await
            .unwrap();
        assert!(effect.state.is_none(), "plan_route must not change state");
        assert_eq!(effect.output["legs"][0]["from"], json!("Colosseum"));
        assert_eq!(effect.output["legs"][0]["route"]["distance_meters"], json!(1500));
    }
}
