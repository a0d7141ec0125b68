use mx_domain::geo::LatLng;
use serde::Serialize;

/// A point of interest placed on the map.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Location {
    pub name: String,
    pub description: String,
    pub position: LatLng,
    /// Time of day to visit, e.g. `"09:00"`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub time: Option<String>,
    /// Suggested stay, free text.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub duration: Option<String>,
    /// Itinerary order as given by the model. Display only; never re-sorted.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sequence: Option<u32>,
}

/// A directed connection between two coordinates.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Route {
    pub name: String,
    pub start: LatLng,
    pub end: LatLng,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub transport: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub travel_time: Option<String>,
}

/// What one successful query returns.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct QueryResult {
    /// Every accepted location, in arrival order.
    pub locations: Vec<Location>,
    /// Itinerary stops in arrival order. Empty outside planner mode.
    pub day_plan: Vec<Location>,
    /// Every accepted route, in arrival order.
    pub lines: Vec<Route>,
}
