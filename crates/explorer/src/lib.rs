//! Map explorer core: turns a free-text query into map overlays by
//! aggregating the structured `location` / `line` calls a model emits
//! while it streams its answer.
//!
//! - [`schema`] decodes raw structured calls into typed entities.
//! - [`mode`] selects instructions and itinerary rules per interaction mode.
//! - [`overlay`] owns the displayed entities and their map overlays.
//! - [`map`] is the boundary toward the map widget.
//! - [`aggregator`] drives one query end-to-end.

pub mod aggregator;
pub mod geojson;
pub mod map;
pub mod mode;
pub mod model;
pub mod overlay;
pub mod schema;

pub use aggregator::{Explorer, QueryPhase, EXPLORER_TEMPERATURE};
pub use geojson::GeoJsonMap;
pub use map::{MapSurface, OverlayHandle, PolylinePair, RouteStyle, StrokeStyle};
pub use mode::Mode;
pub use model::{Location, QueryResult, Route};
pub use overlay::OverlayStore;
