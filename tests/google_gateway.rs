//! Integration tests for the Google Maps gateway against a mock HTTP server

use mockito::Matcher;
use serde_json::json;
use tour_guide::{
    GoogleMapsClient, Location, LookupError, PlaceRecord, PlaceType, PlacesGateway, RoutesGateway,
    TourConfig, TravelMode,
};

fn client(url: &str) -> GoogleMapsClient {
    let config = TourConfig::new("test_key")
        .with_places_base_url(url)
        .with_routes_base_url(url);
    GoogleMapsClient::new(&config).unwrap()
}

fn colosseum_json() -> serde_json::Value {
    json!({
        "id": "ChIJrRMgU7ZhLxMRxAOFkC7I8Sg",
        "displayName": {"text": "Colosseum", "languageCode": "en"},
        "types": ["tourist_attraction", "historical_landmark", "point_of_interest"],
        "location": {"latitude": 41.8902102, "longitude": 12.4922309},
        "formattedAddress": "Piazza del Colosseo, 1, 00184 Roma RM, Italy",
        "rating": 4.7,
        "userRatingCount": 389134,
        "websiteUri": "https://colosseo.it/",
        "internationalPhoneNumber": "+39 06 3996 7700"
    })
}

#[tokio::test]
async fn test_text_search_succeeds() {
    let mut server = mockito::Server::new_async().await;

    let mock = server
        .mock("POST", "/places:searchText")
        .match_header("x-goog-api-key", "test_key")
        .match_header("x-goog-fieldmask", Matcher::Regex("places.displayName".to_string()))
        .match_body(Matcher::PartialJson(json!({
            "textQuery": "colosseo, roma",
            "maxResultCount": 20
        })))
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(json!({ "places": [colosseum_json()] }).to_string())
        .create_async()
        .await;

    let places = client(&server.url()).search_by_text("colosseo, roma").await.unwrap();

    assert_eq!(places.len(), 1);
    let place = &places[0];
    assert_eq!(place.display_name, "Colosseum");
    assert_eq!(place.address.as_deref(), Some("Piazza del Colosseo, 1, 00184 Roma RM, Italy"));
    assert_eq!(place.phone_number.as_deref(), Some("+39 06 3996 7700"));
    assert!(place.has_type(PlaceType::TouristAttraction));
    mock.assert_async().await;
}

#[tokio::test]
async fn test_empty_response_is_no_results() {
    let mut server = mockito::Server::new_async().await;

    let mock = server
        .mock("POST", "/places:searchText")
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body("{}")
        .create_async()
        .await;

    let places = client(&server.url()).search_by_text("nowhere").await.unwrap();

    assert!(places.is_empty());
    mock.assert_async().await;
}

#[tokio::test]
async fn test_error_status_is_reported() {
    let mut server = mockito::Server::new_async().await;

    let mock = server
        .mock("POST", "/places:searchText")
        .with_status(403)
        .with_header("content-type", "application/json")
        .with_body(
            json!({
                "error": {
                    "code": 403,
                    "message": "API key not valid",
                    "status": "PERMISSION_DENIED"
                }
            })
            .to_string(),
        )
        .create_async()
        .await;

    let err = client(&server.url()).search_by_text("colosseo").await.unwrap_err();

    match err {
        LookupError::Status { status, body, context } => {
            assert_eq!(status, 403);
            assert!(body.contains("API key not valid"));
            assert!(context.contains("colosseo"));
        }
        other => panic!("unexpected error: {other:?}"),
    }
    mock.assert_async().await;
}

#[tokio::test]
async fn test_invalid_json_is_malformed() {
    let mut server = mockito::Server::new_async().await;

    let _mock = server
        .mock("POST", "/places:searchText")
        .with_status(200)
        .with_body("not json")
        .create_async()
        .await;

    let err = client(&server.url()).search_by_text("colosseo").await.unwrap_err();
    assert!(matches!(err, LookupError::Malformed { .. }));
}

#[tokio::test]
async fn test_place_without_location_is_malformed() {
    let mut server = mockito::Server::new_async().await;

    let _mock = server
        .mock("POST", "/places:searchText")
        .with_status(200)
        .with_body(
            json!({ "places": [{ "id": "x", "displayName": { "text": "Nowhere" } }] }).to_string(),
        )
        .create_async()
        .await;

    let err = client(&server.url()).search_by_text("nowhere").await.unwrap_err();
    assert!(matches!(err, LookupError::Malformed { ref message, .. } if message.contains("Nowhere")));
}

#[tokio::test]
async fn test_refused_connection_is_transport_error() {
    let err = client("http://127.0.0.1:1")
        .search_by_text("colosseo")
        .await
        .unwrap_err();
    assert!(matches!(err, LookupError::Transport { .. }));
    assert!(!err.is_timeout());
}

#[tokio::test]
async fn test_nearby_search_sends_circle_and_types() {
    let mut server = mockito::Server::new_async().await;

    let mock = server
        .mock("POST", "/places:searchNearby")
        .match_header("x-goog-api-key", "test_key")
        .match_body(Matcher::PartialJson(json!({
            "locationRestriction": {
                "circle": {
                    "center": {"latitude": 41.8902, "longitude": 12.4923},
                    "radius": 1000.0
                }
            },
            "includedTypes": ["museum", "monument"],
            "maxResultCount": 20
        })))
        .with_status(200)
        .with_body(json!({ "places": [colosseum_json()] }).to_string())
        .create_async()
        .await;

    let origin = PlaceRecord::new("colosseum", "Colosseum", Location::new(41.8902, 12.4923));
    let places = client(&server.url())
        .search_nearby(&origin, 1000.0, &[PlaceType::Museum, PlaceType::Monument])
        .await
        .unwrap();

    assert_eq!(places.len(), 1);
    mock.assert_async().await;
}

#[tokio::test]
async fn test_compute_route_parses_distance_and_duration() {
    let mut server = mockito::Server::new_async().await;

    let mock = server
        .mock("POST", "/directions/v2:computeRoutes")
        .match_header("x-goog-api-key", "test_key")
        .match_header("x-goog-fieldmask", "routes.distanceMeters,routes.duration")
        .match_body(Matcher::PartialJson(json!({
            "travelMode": "WALK",
            "computeAlternativeRoutes": false,
            "units": "METRIC",
            "origin": {"location": {"latLng": {"latitude": 41.8902, "longitude": 12.4923}}}
        })))
        .with_status(200)
        .with_body(json!({ "routes": [{ "distanceMeters": 2350, "duration": "1830s" }] }).to_string())
        .create_async()
        .await;

    let route = client(&server.url())
        .compute_route(
            &Location::new(41.8902, 12.4923),
            &Location::new(41.8986, 12.4769),
            TravelMode::Walk,
        )
        .await
        .unwrap()
        .unwrap();

    assert_eq!(route.distance_meters, 2350);
    assert_eq!(route.duration_secs, 1830);
    assert_eq!(route.humanized_distance(), "2.35 km");
    assert_eq!(route.humanized_duration(), "0 hours, 30 minutes, 30 seconds");
    mock.assert_async().await;
}

#[tokio::test]
async fn test_compute_route_without_routes_is_none() {
    let mut server = mockito::Server::new_async().await;

    let _mock = server
        .mock("POST", "/directions/v2:computeRoutes")
        .with_status(200)
        .with_body("{}")
        .create_async()
        .await;

    let route = client(&server.url())
        .compute_route(
            &Location::new(41.8902, 12.4923),
            &Location::new(40.0, 10.0),
            TravelMode::Transit,
        )
        .await
        .unwrap();

    assert!(route.is_none());
}

/// A server that accepts the connection but never answers hits the client timeout
#[tokio::test]
async fn test_silent_server_is_timeout() {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let url = format!("http://{}", listener.local_addr().unwrap());
    let silent = tokio::spawn(async move {
        let mut open = Vec::new();
        loop {
            let (socket, _) = listener.accept().await.unwrap();
            open.push(socket);
        }
    });

    let config = TourConfig::new("test_key")
        .with_places_base_url(&url)
        .with_routes_base_url(&url)
        .with_request_timeout(std::time::Duration::from_secs(1));
    let err = GoogleMapsClient::new(&config)
        .unwrap()
        .search_by_text("Colosseum")
        .await
        .unwrap_err();

    assert!(err.is_timeout(), "unexpected error: {err:?}");
    match err {
        LookupError::Timeout { context, timeout } => {
            assert_eq!(context, "text search 'Colosseum'");
            assert_eq!(timeout, std::time::Duration::from_secs(1));
        }
        other => panic!("unexpected error: {other:?}"),
    }
    silent.abort();
}
