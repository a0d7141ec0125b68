//! The two structured-call contracts offered to the model and the decode
//! step that turns their raw arguments into typed entities.
//!
//! Coordinates are declared as strings toward the model but accepted as
//! either strings or numbers; anything that does not coerce to a finite
//! number rejects the whole call.

use mx_domain::geo::LatLng;
use mx_domain::tool::{ToolCall, ToolDefinition};
use serde_json::{Map, Value};

use crate::model::{Location, Route};

pub const LOCATION_CALL: &str = "location";
pub const LINE_CALL: &str = "line";

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// Tool definitions
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

/// The `location` call: one point of interest.
pub fn location_tool() -> ToolDefinition {
    ToolDefinition {
        name: LOCATION_CALL.into(),
        description: "Geographic coordinates of a location.".into(),
        parameters: serde_json::json!({
            "type": "object",
            "properties": {
                "name": { "type": "string", "description": "Name of the location." },
                "description": {
                    "type": "string",
                    "description": "Description of the location: why is it relevant, details to know."
                },
                "lat": { "type": "string", "description": "Latitude of the location." },
                "lng": { "type": "string", "description": "Longitude of the location." },
                "time": {
                    "type": "string",
                    "description": "Time of day to visit this location (e.g., \"09:00\", \"14:30\")."
                },
                "duration": {
                    "type": "string",
                    "description": "Suggested duration of stay at this location (e.g., \"1 hour\", \"45 minutes\")."
                },
                "sequence": {
                    "type": "number",
                    "description": "Order in the day itinerary (1 = first stop of the day)."
                }
            },
            "required": ["name", "description", "lat", "lng"]
        }),
    }
}

/// The `line` call: a connection between two coordinates.
pub fn line_tool() -> ToolDefinition {
    let endpoint = |what: &str| {
        serde_json::json!({
            "type": "object",
            "description": format!("{what} location of the route"),
            "properties": {
                "lat": { "type": "string", "description": format!("Latitude of the {} location.", what.to_lowercase()) },
                "lng": { "type": "string", "description": format!("Longitude of the {} location.", what.to_lowercase()) }
            }
        })
    };

    ToolDefinition {
        name: LINE_CALL.into(),
        description: "Connection between a start location and an end location.".into(),
        parameters: serde_json::json!({
            "type": "object",
            "properties": {
                "name": { "type": "string", "description": "Name of the route or connection" },
                "start": endpoint("Start"),
                "end": endpoint("End"),
                "transport": {
                    "type": "string",
                    "description": "Mode of transportation between locations (e.g., \"walking\", \"driving\", \"public transit\")."
                },
                "travelTime": {
                    "type": "string",
                    "description": "Estimated travel time between locations (e.g., \"15 minutes\", \"1 hour\")."
                }
            },
            "required": ["name", "start", "end"]
        }),
    }
}

/// Both contracts, in the order they are offered to the model.
pub fn tool_definitions() -> Vec<ToolDefinition> {
    vec![location_tool(), line_tool()]
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// Decoding
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

/// A structured call whose required fields all validated.
#[derive(Debug, Clone, PartialEq)]
pub enum GeoCall {
    Location(Location),
    Line(Route),
}

/// Why a structured call was dropped.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum DecodeError {
    #[error("unknown call '{0}'")]
    UnknownCall(String),
    #[error("arguments are not an object")]
    NotAnObject,
    #[error("missing or empty field '{0}'")]
    Missing(&'static str),
    #[error("field '{0}' is not a finite number")]
    NotANumber(&'static str),
}

impl GeoCall {
    pub fn decode(call: &ToolCall) -> Result<Self, DecodeError> {
        match call.tool_name.as_str() {
            LOCATION_CALL => decode_location(&call.arguments).map(GeoCall::Location),
            LINE_CALL => decode_line(&call.arguments).map(GeoCall::Line),
            other => Err(DecodeError::UnknownCall(other.to_string())),
        }
    }
}

fn decode_location(args: &Value) -> Result<Location, DecodeError> {
    let args = args.as_object().ok_or(DecodeError::NotAnObject)?;

    let name = required_text(args, "name")?;
    if name.trim().is_empty() {
        return Err(DecodeError::Missing("name"));
    }
    let description = required_text(args, "description")?;
    let lat = required_number(args, "lat", "lat")?;
    let lng = required_number(args, "lng", "lng")?;

    Ok(Location {
        name,
        description,
        position: LatLng::new(lat, lng),
        time: optional_text(args, "time"),
        duration: optional_text(args, "duration"),
        sequence: args.get("sequence").and_then(coerce_sequence),
    })
}

fn decode_line(args: &Value) -> Result<Route, DecodeError> {
    let args = args.as_object().ok_or(DecodeError::NotAnObject)?;

    let name = required_text(args, "name")?;
    let start = required_point(args, "start", ("start.lat", "start.lng"))?;
    let end = required_point(args, "end", ("end.lat", "end.lng"))?;

    Ok(Route {
        name,
        start,
        end,
        transport: optional_text(args, "transport"),
        travel_time: optional_text(args, "travelTime"),
    })
}

fn required_text(args: &Map<String, Value>, key: &'static str) -> Result<String, DecodeError> {
    args.get(key)
        .and_then(Value::as_str)
        .map(str::to_string)
        .ok_or(DecodeError::Missing(key))
}

fn required_number(
    args: &Map<String, Value>,
    key: &str,
    field: &'static str,
) -> Result<f64, DecodeError> {
    let value = args.get(key).ok_or(DecodeError::Missing(field))?;
    coerce_number(value).ok_or(DecodeError::NotANumber(field))
}

fn required_point(
    args: &Map<String, Value>,
    key: &'static str,
    fields: (&'static str, &'static str),
) -> Result<LatLng, DecodeError> {
    let point = args
        .get(key)
        .and_then(Value::as_object)
        .ok_or(DecodeError::Missing(key))?;
    let lat = required_number(point, "lat", fields.0)?;
    let lng = required_number(point, "lng", fields.1)?;
    Ok(LatLng::new(lat, lng))
}

/// Non-string and blank values read as absent. Anything else is kept
/// verbatim.
fn optional_text(args: &Map<String, Value>, key: &str) -> Option<String> {
    let text = args.get(key)?.as_str()?;
    (!text.trim().is_empty()).then(|| text.to_string())
}

/// Numeric coercion for coordinates: JSON numbers, or strings that parse
/// as a finite `f64` after trimming.
pub fn coerce_number(value: &Value) -> Option<f64> {
    let n = match value {
        Value::Number(n) => n.as_f64()?,
        Value::String(s) => {
            let s = s.trim();
            if s.is_empty() {
                return None;
            }
            s.parse::<f64>().ok()?
        }
        _ => return None,
    };
    n.is_finite().then_some(n)
}

fn coerce_sequence(value: &Value) -> Option<u32> {
    let n = coerce_number(value)?;
    (n >= 1.0 && n.fract() == 0.0 && n <= u32::MAX as f64).then_some(n as u32)
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// Tests
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn location(args: Value) -> Result<Location, DecodeError> {
        match GeoCall::decode(&ToolCall::new(LOCATION_CALL, args))? {
            GeoCall::Location(loc) => Ok(loc),
            other => panic!("expected location, got {other:?}"),
        }
    }

    fn line(args: Value) -> Result<Route, DecodeError> {
        match GeoCall::decode(&ToolCall::new(LINE_CALL, args))? {
            GeoCall::Line(route) => Ok(route),
            other => panic!("expected line, got {other:?}"),
        }
    }

    #[test]
    fn location_coerces_string_coordinates() {
        let loc = location(json!({
            "name": "Eiffel Tower",
            "description": "Wrought-iron lattice tower.",
            "lat": "48.8584",
            "lng": " 2.2945 "
        }))
        .unwrap();
        assert_eq!(loc.position, LatLng::new(48.8584, 2.2945));
        assert!(loc.time.is_none());
        assert!(loc.sequence.is_none());
    }

    #[test]
    fn location_accepts_numeric_coordinates() {
        let loc = location(json!({
            "name": "Shibuya Crossing",
            "description": "",
            "lat": 35.6595,
            "lng": 139.7005
        }))
        .unwrap();
        assert_eq!(loc.position, LatLng::new(35.6595, 139.7005));
        assert_eq!(loc.description, "");
    }

    #[test]
    fn location_keeps_itinerary_fields() {
        let loc = location(json!({
            "name": "Café de Flore",
            "description": "Breakfast",
            "lat": "48.854",
            "lng": "2.333",
            "time": "09:00",
            "duration": "1 hour",
            "sequence": 1
        }))
        .unwrap();
        assert_eq!(loc.time.as_deref(), Some("09:00"));
        assert_eq!(loc.duration.as_deref(), Some("1 hour"));
        assert_eq!(loc.sequence, Some(1));
    }

    #[test]
    fn uncoercible_latitude_drops_the_call() {
        let err = location(json!({
            "name": "Nowhere",
            "description": "x",
            "lat": "not-a-number",
            "lng": "2.0"
        }))
        .unwrap_err();
        assert_eq!(err, DecodeError::NotANumber("lat"));
    }

    #[test]
    fn non_finite_and_empty_coordinates_are_rejected() {
        for bad in [json!("NaN"), json!("inf"), json!(""), json!(null), json!(true)] {
            let err = location(json!({
                "name": "X",
                "description": "x",
                "lat": "1.0",
                "lng": bad
            }))
            .unwrap_err();
            assert_eq!(err, DecodeError::NotANumber("lng"));
        }
    }

    #[test]
    fn missing_required_fields_are_reported() {
        let err = location(json!({ "description": "x", "lat": "1", "lng": "2" })).unwrap_err();
        assert_eq!(err, DecodeError::Missing("name"));

        let err = location(json!({ "name": "   ", "description": "x", "lat": "1", "lng": "2" }))
            .unwrap_err();
        assert_eq!(err, DecodeError::Missing("name"));

        let err = location(json!({ "name": "A", "lat": "1", "lng": "2" })).unwrap_err();
        assert_eq!(err, DecodeError::Missing("description"));

        let err = location(json!({ "name": "A", "description": "x", "lng": "2" })).unwrap_err();
        assert_eq!(err, DecodeError::Missing("lat"));
    }

    #[test]
    fn blank_time_is_absent() {
        let loc = location(json!({
            "name": "A", "description": "x", "lat": "1", "lng": "2", "time": "  "
        }))
        .unwrap();
        assert!(loc.time.is_none());
    }

    #[test]
    fn optional_text_is_kept_verbatim() {
        let loc = location(json!({
            "name": "A", "description": "x", "lat": "1", "lng": "2",
            "time": " 09:00", "duration": "1 hour "
        }))
        .unwrap();
        assert_eq!(loc.time.as_deref(), Some(" 09:00"));
        assert_eq!(loc.duration.as_deref(), Some("1 hour "));

        let route = line(json!({
            "name": "L",
            "start": { "lat": "1", "lng": "2" },
            "end": { "lat": "3", "lng": "4" },
            "transport": "\twalking",
            "travelTime": "   "
        }))
        .unwrap();
        assert_eq!(route.transport.as_deref(), Some("\twalking"));
        assert!(route.travel_time.is_none());
    }

    #[test]
    fn odd_sequences_are_ignored_not_fatal() {
        for seq in [json!(0), json!(-2), json!(1.5), json!("two"), json!(null)] {
            let loc = location(json!({
                "name": "A", "description": "x", "lat": "1", "lng": "2", "sequence": seq
            }))
            .unwrap();
            assert!(loc.sequence.is_none());
        }
        let loc = location(json!({
            "name": "A", "description": "x", "lat": "1", "lng": "2", "sequence": "3"
        }))
        .unwrap();
        assert_eq!(loc.sequence, Some(3));
        let loc = location(json!({
            "name": "A", "description": "x", "lat": "1", "lng": "2", "sequence": 4.0
        }))
        .unwrap();
        assert_eq!(loc.sequence, Some(4));
    }

    #[test]
    fn line_decodes_endpoints_and_options() {
        let route = line(json!({
            "name": "Seine walk",
            "start": { "lat": "48.8584", "lng": "2.2945" },
            "end": { "lat": 48.8606, "lng": 2.3376 },
            "transport": "walking",
            "travelTime": "45 minutes"
        }))
        .unwrap();
        assert_eq!(route.start, LatLng::new(48.8584, 2.2945));
        assert_eq!(route.end, LatLng::new(48.8606, 2.3376));
        assert_eq!(route.transport.as_deref(), Some("walking"));
        assert_eq!(route.travel_time.as_deref(), Some("45 minutes"));
    }

    #[test]
    fn line_with_bad_endpoint_is_rejected() {
        let err = line(json!({
            "name": "broken",
            "start": { "lat": "1", "lng": "2" },
            "end": { "lat": "north", "lng": "2" }
        }))
        .unwrap_err();
        assert_eq!(err, DecodeError::NotANumber("end.lat"));

        let err = line(json!({ "name": "no start", "end": { "lat": "1", "lng": "2" } })).unwrap_err();
        assert_eq!(err, DecodeError::Missing("start"));

        let err = line(json!({
            "start": { "lat": "1", "lng": "2" },
            "end": { "lat": "1", "lng": "2" }
        }))
        .unwrap_err();
        assert_eq!(err, DecodeError::Missing("name"));
    }

    #[test]
    fn unknown_call_and_non_object_args() {
        let err = GeoCall::decode(&ToolCall::new("polygon", json!({}))).unwrap_err();
        assert_eq!(err, DecodeError::UnknownCall("polygon".into()));

        let err = GeoCall::decode(&ToolCall::new(LOCATION_CALL, json!("Paris"))).unwrap_err();
        assert_eq!(err, DecodeError::NotAnObject);
    }

    #[test]
    fn tool_definitions_declare_required_fields() {
        let defs = tool_definitions();
        assert_eq!(defs.len(), 2);
        assert_eq!(defs[0].name, "location");
        assert_eq!(
            defs[0].parameters["required"],
            json!(["name", "description", "lat", "lng"])
        );
        assert_eq!(defs[1].name, "line");
        assert_eq!(defs[1].parameters["required"], json!(["name", "start", "end"]));
        assert_eq!(
            defs[1].parameters["properties"]["end"]["properties"]["lat"]["description"],
            "Latitude of the end location."
        );
        assert_eq!(defs[0].parameters["properties"]["sequence"]["type"], "number");
    }
}
