//! Rome Tour Example
//!
//! Plans a short walking tour through the live Google Places and Routes APIs,
//! calling the same tools an LLM runtime would.
//!
//! Run with: PLACES_API_KEY=... cargo run --example rome_tour

use serde_json::{json, Value};
use std::collections::HashMap;
use std::sync::Arc;
use tour_guide::{GoogleMapsClient, TourConfig, TourController, TourError, TourService};

fn params(entries: &[(&str, Value)]) -> HashMap<String, Value> {
    entries
        .iter()
        .map(|(k, v)| (k.to_string(), v.clone()))
        .collect()
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config = match TourConfig::from_env() {
        Ok(config) => config,
        Err(TourError::Configuration(reason)) => {
            println!("Configuration missing: {}", reason);
            println!("Set PLACES_API_KEY to run against the live APIs.");
            return Ok(());
        }
        Err(e) => return Err(e.into()),
    };

    tracing_subscriber::fmt()
        .with_max_level(tracing::Level::from(config.log_level))
        .init();

    println!("Rome Tour Example");
    println!("=================\n");

    let client = Arc::new(GoogleMapsClient::new(&config)?);
    let controller = TourController::from_config(client.clone(), &config).with_routes(client);
    let service = TourService::builder()
        .controller(Arc::new(controller))
        .build()
        .await?;

    let session_id = service.create_session().await?;

    let calls = [
        ("add_place", params(&[("display_name", json!("Colosseo, Roma"))])),
        (
            "expand_nearby",
            params(&[
                ("display_name", json!("Colosseum")),
                ("radius_meters", json!(1500)),
                ("included_types", json!(["historical_landmark", "museum"])),
            ]),
        ),
        ("add_place", params(&[("display_name", json!("Pantheon, Roma"))])),
        ("add_place", params(&[("display_name", json!("Fontana di Trevi"))])),
        ("show_tour", HashMap::new()),
        ("plan_route", params(&[("travel_mode", json!("walk"))])),
    ];

    for (tool, parameters) in calls {
        println!("> {}", tool);
        let result = service.call_tool(&session_id, tool, parameters).await?;
        match &result.error {
            Some(error) => println!("  failed ({}): {}\n", result.error_kind().unwrap_or("unknown"), error),
            None => println!(
                "{}\n",
                result
                    .metadata
                    .get("message")
                    .and_then(Value::as_str)
                    .unwrap_or_default()
            ),
        }
    }

    if let Some(session) = service.session(&session_id).await? {
        println!(
            "Tour: {} stop(s), {} place(s) known",
            session.state.tour.len(),
            session.state.catalog.len()
        );
    }

    service.end_session(&session_id).await?;
    Ok(())
}
