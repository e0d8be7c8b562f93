//! # Tour Guide - Session-scoped tour planning for conversational agents
//!
//! Tour Guide keeps the state behind a travel-assistant conversation: a catalog
//! of places discovered so far and an ordered tour of stops the user wants to
//! visit. Each agent tool call reads that state, may consult the Google Places
//! or Routes API, and returns the new state plus a message for the user.
//!
//! ## Features
//!
//! - **Place catalog**: places keyed by display name, later lookups refresh earlier ones
//! - **Ordered tour**: append, remove and describe stops, no duplicates
//! - **Nearby expansion**: discover candidates around a known place, filtered by category
//! - **Route planning**: distance and travel time between consecutive stops
//! - **Session isolation**: every conversation owns its catalog, tour and transcript
//! - **Tool schemas**: built-in tools ready to advertise to an LLM runtime
//!
//! ## Quick Start
//!
//! ```no_run
//! use std::collections::HashMap;
//! use std::sync::Arc;
//! use tour_guide::{GoogleMapsClient, TourConfig, TourController, TourService};
//!
//! # #[tokio::main]
//! # async fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let config = TourConfig::from_env()?;
//! let client = Arc::new(GoogleMapsClient::new(&config)?);
//!
//! let controller = TourController::from_config(client.clone(), &config).with_routes(client);
//! let service = TourService::builder()
//!     .controller(Arc::new(controller))
//!     .build()
//!     .await?;
//!
//! let session_id = service.create_session().await?;
//! let mut params = HashMap::new();
//! params.insert("display_name".to_string(), serde_json::json!("Colosseo, Roma"));
//!
//! let result = service.call_tool(&session_id, "add_place", params).await?;
//! println!("{:?}", result.metadata.get("message"));
//! # Ok(())
//! # }
//! ```
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────┐
//! │                  TourService                    │
//! │  ┌──────────────┐  ┌──────────────┐             │
//! │  │ ToolRegistry │  │ SessionStore │             │
//! │  │  - schemas   │  │  - memory    │             │
//! │  └──────────────┘  └──────────────┘             │
//! │  ┌──────────────────────────────────┐           │
//! │  │        TourController            │           │
//! │  │  TourState = Catalog + TourList  │           │
//! │  └──────────────────────────────────┘           │
//! │  ┌──────────────────────────────────┐           │
//! │  │   PlacesGateway / RoutesGateway  │           │
//! │  │   - GoogleMapsClient             │           │
//! │  └──────────────────────────────────┘           │
//! └─────────────────────────────────────────────────┘
//! ```
//!
//! ## Module Overview
//!
//! - [`catalog`]: Place catalog keyed by display name
//! - [`tour`]: Tour list and the combined tour state
//! - [`controller`]: Add, remove, expand and route operations
//! - [`gateway`]: Places and Routes lookups, Google Maps client
//! - [`tool`]: Tool trait and registry
//! - [`tour_tools`]: Built-in tools over the controller
//! - [`service`]: Session-aware tool dispatch
//! - [`storage`]: Session storage backends
//! - [`config`]: Configuration and environment loading
//! - [`error`]: Error types and result aliases

// Core type definitions
pub mod types;

// Error types
pub mod error;

// Places and their catalog
pub mod place;
pub mod catalog;

// Tour list and state
pub mod tour;

// Routes between stops
pub mod route;

pub mod config;

// External lookups
pub mod gateway;

// Tour operations
pub mod controller;

// Conversation transcript
pub mod transcript;

// Session management
pub mod session;

// Storage backends
pub mod storage;

// Tool integration
pub mod tool;
pub mod tour_tools;

// Session-aware entry point
pub mod service;

pub use catalog::{PlaceCatalog, Upsert};
pub use config::{LogLevel, TourConfig, MAX_RADIUS_METERS, MAX_RESULT_COUNT};
pub use controller::{TourController, Update};
pub use error::{LookupError, Result, StorageError, StorageResult, TourError};
pub use gateway::{google::GoogleMapsClient, LookupResult, PlacesGateway, RoutesGateway};
pub use place::{Location, PlaceRecord, PlaceType};
pub use route::{Route, RouteLeg, TravelMode};
pub use service::{TourService, TourServiceBuilder};
pub use session::Session;
pub use storage::{memory::InMemorySessionStore, SessionStore};
pub use tool::{ParameterSchema, Tool, ToolEffect, ToolRegistry, ToolResult};
pub use tour::{TourList, TourState};
pub use tour_tools::register_tour_tools;
pub use transcript::{Message, MessageRole};
pub use types::*;
