//! Built-in tools exposing the tour controller to an agent runtime
//!
//! One tool per controller operation. Each returns plain data plus a
//! user-facing message; turning that into a framework-specific directive is
//! the runtime adapter's job.

use crate::controller::{TourController, Update};
use crate::error::{Result, TourError};
use crate::place::PlaceType;
use crate::route::TravelMode;
use crate::tool::{string_param, ParameterSchema, Tool, ToolEffect, ToolRegistry};
use crate::tour::TourState;
use crate::types::ToolId;
use async_trait::async_trait;
use serde_json::{json, Value};
use std::collections::HashMap;
use std::sync::Arc;

fn schema(entries: Vec<(&str, ParameterSchema)>) -> HashMap<String, ParameterSchema> {
    entries
        .into_iter()
        .map(|(name, schema)| (name.to_string(), schema))
        .collect()
}

fn changed<T>(update: Update<T>, output: Value) -> ToolEffect {
    ToolEffect {
        output,
        message: update.message,
        state: Some(update.state),
    }
}

/// Register every built-in tour tool with `registry`
pub async fn register_tour_tools(
    registry: &ToolRegistry,
    controller: Arc<TourController>,
) -> Result<Vec<ToolId>> {
    let tools: Vec<Arc<dyn Tool>> = vec![
        Arc::new(SearchPlacesTool::new(controller.clone())),
        Arc::new(AddPlaceTool::new(controller.clone())),
        Arc::new(RemovePlaceTool::new(controller.clone())),
        Arc::new(ExpandNearbyTool::new(controller.clone())),
        Arc::new(ShowTourTool::new(controller.clone())),
        Arc::new(PlanRouteTool::new(controller)),
    ];

    let mut ids = Vec::with_capacity(tools.len());
    for tool in tools {
        ids.push(registry.register(tool).await?);
    }
    Ok(ids)
}

/// `search_places(query)`
pub struct SearchPlacesTool {
    id: ToolId,
    controller: Arc<TourController>,
    parameters: HashMap<String, ParameterSchema>,
}

impl SearchPlacesTool {
    pub fn new(controller: Arc<TourController>) -> Self {
        Self {
            id: ToolId::new(),
            controller,
            parameters: schema(vec![(
                "query",
                ParameterSchema::required("string", "Free-text description, e.g. 'colosseo, roma'"),
            )]),
        }
    }
}

#[async_trait]
impl Tool for SearchPlacesTool {
    fn id(&self) -> &ToolId {
        &self.id
    }

    fn name(&self) -> &str {
        "search_places"
    }

    fn description(&self) -> &str {
        "Search places by text. Results become available to add_place and expand_nearby by their display name."
    }

    fn parameters(&self) -> &HashMap<String, ParameterSchema> {
        &self.parameters
    }

    async fn execute(&self, state: &TourState, parameters: HashMap<String, Value>) -> Result<ToolEffect> {
        let query = string_param(self, &parameters, "query")?;
        let update = self.controller.search(state, query).await?;
        let output = json!({ "places": update.value });
        Ok(changed(update, output))
    }
}

/// `add_place(display_name)`
pub struct AddPlaceTool {
    id: ToolId,
    controller: Arc<TourController>,
    parameters: HashMap<String, ParameterSchema>,
}

impl AddPlaceTool {
    pub fn new(controller: Arc<TourController>) -> Self {
        Self {
            id: ToolId::new(),
            controller,
            parameters: schema(vec![(
                "display_name",
                ParameterSchema::required("string", "Name of the place to append to the tour"),
            )]),
        }
    }
}

#[async_trait]
impl Tool for AddPlaceTool {
    fn id(&self) -> &ToolId {
        &self.id
    }

    fn name(&self) -> &str {
        "add_place"
    }

    fn description(&self) -> &str {
        "Append a place to the end of the tour. Unknown names are looked up first."
    }

    fn parameters(&self) -> &HashMap<String, ParameterSchema> {
        &self.parameters
    }

    async fn execute(&self, state: &TourState, parameters: HashMap<String, Value>) -> Result<ToolEffect> {
        let display_name = string_param(self, &parameters, "display_name")?;
        let update = self.controller.add_place(state, display_name).await?;
        let output = json!({
            "place": update.value,
            "tour": update.state.tour,
        });
        Ok(changed(update, output))
    }
}

/// `remove_place(display_name)`
pub struct RemovePlaceTool {
    id: ToolId,
    controller: Arc<TourController>,
    parameters: HashMap<String, ParameterSchema>,
}

impl RemovePlaceTool {
    pub fn new(controller: Arc<TourController>) -> Self {
        Self {
            id: ToolId::new(),
            controller,
            parameters: schema(vec![(
                "display_name",
                ParameterSchema::required("string", "Name of the tour stop to remove"),
            )]),
        }
    }
}

#[async_trait]
impl Tool for RemovePlaceTool {
    fn id(&self) -> &ToolId {
        &self.id
    }

    fn name(&self) -> &str {
        "remove_place"
    }

    fn description(&self) -> &str {
        "Remove a stop from the tour, keeping the order of the others."
    }

    fn parameters(&self) -> &HashMap<String, ParameterSchema> {
        &self.parameters
    }

    async fn execute(&self, state: &TourState, parameters: HashMap<String, Value>) -> Result<ToolEffect> {
        let display_name = string_param(self, &parameters, "display_name")?;
        let update = self.controller.remove_place(state, display_name)?;
        let output = json!({ "tour": update.state.tour });
        Ok(changed(update, output))
    }
}

/// `expand_nearby(display_name, radius_meters?, included_types?)`
pub struct ExpandNearbyTool {
    id: ToolId,
    controller: Arc<TourController>,
    parameters: HashMap<String, ParameterSchema>,
}

impl ExpandNearbyTool {
    pub fn new(controller: Arc<TourController>) -> Self {
        let radius_description = format!(
            "Search radius in meters (default {})",
            controller.default_radius_meters()
        );
        let types_description = format!(
            "Category filter, any of: {}",
            PlaceType::ALL
                .iter()
                .map(PlaceType::as_str)
                .collect::<Vec<_>>()
                .join(", ")
        );
        Self {
            id: ToolId::new(),
            controller,
            parameters: schema(vec![
                (
                    "display_name",
                    ParameterSchema::required("string", "Place to search around"),
                ),
                (
                    "radius_meters",
                    ParameterSchema::optional("number", radius_description),
                ),
                (
                    "included_types",
                    ParameterSchema::optional("array", types_description),
                ),
            ]),
        }
    }

    fn included_types(parameters: &HashMap<String, Value>) -> Result<Vec<PlaceType>> {
        let Some(Value::Array(items)) = parameters.get("included_types") else {
            return Ok(Vec::new());
        };
        items
            .iter()
            .map(|item| {
                item.as_str()
                    .ok_or_else(|| {
                        TourError::InvalidInput(format!("place type must be a string, got {}", item))
                    })?
                    .parse::<PlaceType>()
            })
            .collect()
    }
}

#[async_trait]
impl Tool for ExpandNearbyTool {
    fn id(&self) -> &ToolId {
        &self.id
    }

    fn name(&self) -> &str {
        "expand_nearby"
    }

    fn description(&self) -> &str {
        "Find places around a known place. Results are candidates only; add each one with add_place."
    }

    fn parameters(&self) -> &HashMap<String, ParameterSchema> {
        &self.parameters
    }

    async fn execute(&self, state: &TourState, parameters: HashMap<String, Value>) -> Result<ToolEffect> {
        let display_name = string_param(self, &parameters, "display_name")?;
        let radius = parameters.get("radius_meters").and_then(Value::as_f64);
        let included_types = Self::included_types(&parameters)?;

        let update = self
            .controller
            .expand_nearby(state, display_name, radius, &included_types)
            .await?;
        let output = json!({ "places": update.value });
        Ok(changed(update, output))
    }
}

/// `show_tour()`
pub struct ShowTourTool {
    id: ToolId,
    controller: Arc<TourController>,
    parameters: HashMap<String, ParameterSchema>,
}

impl ShowTourTool {
    pub fn new(controller: Arc<TourController>) -> Self {
        Self {
            id: ToolId::new(),
            controller,
            parameters: HashMap::new(),
        }
    }
}

#[async_trait]
impl Tool for ShowTourTool {
    fn id(&self) -> &ToolId {
        &self.id
    }

    fn name(&self) -> &str {
        "show_tour"
    }

    fn description(&self) -> &str {
        "Describe the current tour stops in visit order."
    }

    fn parameters(&self) -> &HashMap<String, ParameterSchema> {
        &self.parameters
    }

    async fn execute(&self, state: &TourState, _parameters: HashMap<String, Value>) -> Result<ToolEffect> {
        let message = self.controller.describe_tour(state)?;
        let stops = state.stops()?;
        Ok(ToolEffect {
            output: json!({ "stops": stops }),
            message,
            state: None,
        })
    }
}

/// `plan_route(travel_mode?)`
pub struct PlanRouteTool {
    id: ToolId,
    controller: Arc<TourController>,
    parameters: HashMap<String, ParameterSchema>,
}

impl PlanRouteTool {
    pub fn new(controller: Arc<TourController>) -> Self {
        Self {
            id: ToolId::new(),
            controller,
            parameters: schema(vec![(
                "travel_mode",
                ParameterSchema::optional("string", "walk, drive, bicycle or transit")
                    .with_default(json!("walk")),
            )]),
        }
    }
}

#[async_trait]
impl Tool for PlanRouteTool {
    fn id(&self) -> &ToolId {
        &self.id
    }

    fn name(&self) -> &str {
        "plan_route"
    }

    fn description(&self) -> &str {
        "Compute distance and travel time between consecutive tour stops."
    }

    fn parameters(&self) -> &HashMap<String, ParameterSchema> {
        &self.parameters
    }

    async fn execute(&self, state: &TourState, parameters: HashMap<String, Value>) -> Result<ToolEffect> {
        let mode: TravelMode = match parameters.get("travel_mode").and_then(Value::as_str) {
            Some(mode) => mode.parse()?,
            None => TravelMode::default(),
        };
        let update = self.controller.plan_route(state, mode).await?;
        Ok(ToolEffect {
            output: json!({ "legs": update.value }),
            message: update.message,
            state: None,
        })
    }
}
