//! Boundary toward the map widget.
//!
//! The core only ever creates markers, stroke pairs and popups, fits the
//! viewport, and removes what it created. Positioning, projection and
//! drawing stay behind [`MapSurface`].

use mx_domain::error::Result;
use mx_domain::geo::{LatLng, LatLngBounds};
use serde::Serialize;

/// Opaque id of one overlay created by a [`MapSurface`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct OverlayHandle(pub u64);

/// The two strokes drawn for one route: a wide transparent hit target and
/// the visible line on top of it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PolylinePair {
    pub hit: OverlayHandle,
    pub visible: OverlayHandle,
}

/// Named route style presets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum RouteStyle {
    Explorer,
    Planner,
}

/// Concrete stroke parameters for one polyline.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct StrokeStyle {
    pub color: &'static str,
    pub weight: u8,
    pub opacity: f32,
    pub dashed: bool,
}

impl RouteStyle {
    /// The visible stroke for this preset.
    pub fn stroke(self) -> StrokeStyle {
        match self {
            RouteStyle::Explorer => StrokeStyle {
                color: "#CC0099",
                weight: 3,
                opacity: 1.0,
                dashed: false,
            },
            RouteStyle::Planner => StrokeStyle {
                color: "#2196F3",
                weight: 4,
                opacity: 1.0,
                dashed: true,
            },
        }
    }
}

/// A map widget, as seen by the overlay store.
///
/// Creation calls may fail (the error is propagated to the query);
/// [`MapSurface::remove`] must be idempotent and accept handles that are
/// already gone.
pub trait MapSurface: Send {
    fn create_marker(&mut self, position: LatLng, title: &str) -> Result<OverlayHandle>;

    fn create_polyline_pair(
        &mut self,
        start: LatLng,
        end: LatLng,
        style: RouteStyle,
    ) -> Result<PolylinePair>;

    /// Attach a popup at `position`, bound to the `anchor` marker. `open`
    /// controls whether it is shown immediately or only attached.
    fn create_popup(
        &mut self,
        anchor: OverlayHandle,
        position: LatLng,
        html: &str,
        open: bool,
    ) -> Result<OverlayHandle>;

    fn fit_bounds(&mut self, bounds: &LatLngBounds) -> Result<()>;

    fn remove(&mut self, handle: OverlayHandle);
}

impl<M: MapSurface + ?Sized> MapSurface for Box<M> {
    fn create_marker(&mut self, position: LatLng, title: &str) -> Result<OverlayHandle> {
        (**self).create_marker(position, title)
    }

    fn create_polyline_pair(
        &mut self,
        start: LatLng,
        end: LatLng,
        style: RouteStyle,
    ) -> Result<PolylinePair> {
        (**self).create_polyline_pair(start, end, style)
    }

    fn create_popup(
        &mut self,
        anchor: OverlayHandle,
        position: LatLng,
        html: &str,
        open: bool,
    ) -> Result<OverlayHandle> {
        (**self).create_popup(anchor, position, html, open)
    }

    fn fit_bounds(&mut self, bounds: &LatLngBounds) -> Result<()> {
        (**self).fit_bounds(bounds)
    }

    fn remove(&mut self, handle: OverlayHandle) {
        (**self).remove(handle)
    }
}
