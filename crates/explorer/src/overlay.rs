//! The displayed state: accepted locations and routes, the bounds that
//! enclose them, and the map overlays drawn for each.

use mx_domain::error::Result;
use mx_domain::geo::LatLngBounds;

use crate::map::{MapSurface, OverlayHandle, PolylinePair};
use crate::mode::Mode;
use crate::model::{Location, Route};

struct PlacedLocation {
    location: Location,
    marker: OverlayHandle,
    popup: OverlayHandle,
}

struct PlacedRoute {
    route: Route,
    strokes: PolylinePair,
}

/// Owns every entity currently on the map together with the map surface
/// that draws them.
///
/// Entities are kept in arrival order. Every mutation completes before it
/// returns, so a caller never observes a half-reset or half-added state.
pub struct OverlayStore<M: MapSurface> {
    map: M,
    locations: Vec<PlacedLocation>,
    routes: Vec<PlacedRoute>,
    bounds: LatLngBounds,
}

impl<M: MapSurface> OverlayStore<M> {
    pub fn new(map: M) -> Self {
        Self {
            map,
            locations: Vec::new(),
            routes: Vec::new(),
            bounds: LatLngBounds::empty(),
        }
    }

    /// Tear down every overlay, then forget all entities and bounds.
    /// Safe to call repeatedly.
    pub fn reset(&mut self) {
        for placed in self.locations.drain(..) {
            self.map.remove(placed.marker);
            self.map.remove(placed.popup);
        }
        for placed in self.routes.drain(..) {
            self.map.remove(placed.strokes.hit);
            self.map.remove(placed.strokes.visible);
        }
        self.bounds = LatLngBounds::empty();
    }

    /// Pin a location: draw a marker and its popup, extend the bounds and
    /// refit the viewport. The popup only opens on its own outside planner
    /// mode.
    ///
    /// Returns the marker handle. If the map refuses an overlay, anything
    /// already drawn for this location is removed and neither the entity
    /// nor its bounds are recorded. The viewport is only refitted once every
    /// overlay exists, so it never covers an entity the store dropped.
    pub fn add_location(&mut self, location: Location, mode: Mode) -> Result<OverlayHandle> {
        let marker = self.map.create_marker(location.position, &location.name)?;
        let popup = match self.map.create_popup(
            marker,
            location.position,
            &popup_html(&location),
            mode.auto_open_popups(),
        ) {
            Ok(popup) => popup,
            Err(e) => {
                self.map.remove(marker);
                return Err(e);
            }
        };

        let mut bounds = self.bounds;
        bounds.extend(location.position);
        if let Err(e) = self.map.fit_bounds(&bounds) {
            self.map.remove(popup);
            self.map.remove(marker);
            return Err(e);
        }

        self.bounds = bounds;
        self.locations.push(PlacedLocation {
            location,
            marker,
            popup,
        });
        Ok(marker)
    }

    /// Draw a route as a hit-target / visible stroke pair styled for `mode`.
    pub fn add_route(&mut self, route: Route, mode: Mode) -> Result<PolylinePair> {
        let strokes = self
            .map
            .create_polyline_pair(route.start, route.end, mode.route_style())?;

        let mut bounds = self.bounds;
        bounds.extend(route.start);
        bounds.extend(route.end);
        if let Err(e) = self.map.fit_bounds(&bounds) {
            self.map.remove(strokes.visible);
            self.map.remove(strokes.hit);
            return Err(e);
        }

        self.bounds = bounds;
        self.routes.push(PlacedRoute { route, strokes });
        Ok(strokes)
    }

    pub fn current_bounds(&self) -> LatLngBounds {
        self.bounds
    }

    pub fn locations(&self) -> Vec<Location> {
        self.locations.iter().map(|p| p.location.clone()).collect()
    }

    pub fn routes(&self) -> Vec<Route> {
        self.routes.iter().map(|p| p.route.clone()).collect()
    }

    pub fn popup_for(&self, marker: OverlayHandle) -> Option<OverlayHandle> {
        self.locations
            .iter()
            .find(|p| p.marker == marker)
            .map(|p| p.popup)
    }

    pub fn is_empty(&self) -> bool {
        self.locations.is_empty() && self.routes.is_empty()
    }

    pub fn map(&self) -> &M {
        &self.map
    }
}

/// Popup body: bold name, description, and a time line when the location
/// carries a time. Model text is escaped.
pub fn popup_html(location: &Location) -> String {
    let mut html = format!(
        "<b>{}</b><br/>{}",
        escape_html(&location.name),
        escape_html(&location.description)
    );
    if let Some(time) = &location.time {
        html.push_str(r#"<div class="popup-time">"#);
        html.push_str(&escape_html(time));
        if let Some(duration) = &location.duration {
            html.push_str(" • ");
            html.push_str(&escape_html(duration));
        }
        html.push_str("</div>");
    }
    html
}

fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            c => out.push(c),
        }
    }
    out
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// Tests
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
