//! Headless [`MapSurface`] that keeps live overlays in memory and exports
//! them as a GeoJSON `FeatureCollection`.
//!
//! Used by the CLI to hand results to any GeoJSON viewer, and by tests to
//! observe exactly what the overlay store drew.

use std::collections::BTreeMap;

use mx_domain::error::Result;
use mx_domain::geo::{LatLng, LatLngBounds};
use serde_json::{json, Value};

use crate::map::{MapSurface, OverlayHandle, PolylinePair, RouteStyle};

#[derive(Debug, Clone, PartialEq)]
enum Overlay {
    Marker { position: LatLng, title: String },
    Popup { anchor: OverlayHandle, html: String, open: bool },
    HitStroke,
    Stroke { start: LatLng, end: LatLng, style: RouteStyle },
}

#[derive(Debug, Default)]
pub struct GeoJsonMap {
    next_id: u64,
    overlays: BTreeMap<OverlayHandle, Overlay>,
    viewport: Option<LatLngBounds>,
}

impl GeoJsonMap {
    pub fn new() -> Self {
        Self::default()
    }

    fn insert(&mut self, overlay: Overlay) -> OverlayHandle {
        self.next_id += 1;
        let handle = OverlayHandle(self.next_id);
        self.overlays.insert(handle, overlay);
        handle
    }

    /// Number of overlays currently drawn (hit strokes included).
    pub fn live_overlays(&self) -> usize {
        self.overlays.len()
    }

    pub fn is_live(&self, handle: OverlayHandle) -> bool {
        self.overlays.contains_key(&handle)
    }

    pub fn marker_titles(&self) -> Vec<&str> {
        self.overlays
            .values()
            .filter_map(|o| match o {
                Overlay::Marker { title, .. } => Some(title.as_str()),
                _ => None,
            })
            .collect()
    }

    pub fn open_popups(&self) -> usize {
        self.overlays
            .values()
            .filter(|o| matches!(o, Overlay::Popup { open: true, .. }))
            .count()
    }

    pub fn popup_html(&self, handle: OverlayHandle) -> Option<&str> {
        match self.overlays.get(&handle)? {
            Overlay::Popup { html, .. } => Some(html.as_str()),
            _ => None,
        }
    }

    pub fn stroke_styles(&self) -> Vec<RouteStyle> {
        self.overlays
            .values()
            .filter_map(|o| match o {
                Overlay::Stroke { style, .. } => Some(*style),
                _ => None,
            })
            .collect()
    }

    /// The bounds most recently passed to `fit_bounds`.
    pub fn viewport(&self) -> Option<LatLngBounds> {
        self.viewport
    }

    /// Markers and visible strokes as GeoJSON features. Popups ride along
    /// as a property of the marker they are anchored to; hit strokes are
    /// omitted.
    pub fn feature_collection(&self) -> Value {
        let popups: BTreeMap<OverlayHandle, &str> = self
            .overlays
            .values()
            .filter_map(|o| match o {
                Overlay::Popup { anchor, html, .. } => Some((*anchor, html.as_str())),
                _ => None,
            })
            .collect();

        let mut features = Vec::new();

        for (handle, overlay) in &self.overlays {
            match overlay {
                Overlay::Marker { position, title } => {
                    let popup = popups.get(handle).copied();
                    features.push(json!({
                        "type": "Feature",
                        "geometry": { "type": "Point", "coordinates": [position.lng, position.lat] },
                        "properties": { "title": title, "popup": popup },
                    }));
                }
                Overlay::Stroke { start, end, style } => {
                    let stroke = style.stroke();
                    features.push(json!({
                        "type": "Feature",
                        "geometry": {
                            "type": "LineString",
                            "coordinates": [[start.lng, start.lat], [end.lng, end.lat]],
                        },
                        "properties": {
                            "style": style,
                            "stroke": stroke.color,
                            "stroke-width": stroke.weight,
                            "dashed": stroke.dashed,
                        },
                    }));
                }
                Overlay::Popup { .. } | Overlay::HitStroke => {}
            }
        }

        let mut collection = json!({
            "type": "FeatureCollection",
            "features": features,
        });
        if let Some((sw, ne)) = self
            .viewport
            .and_then(|b| Some((b.south_west()?, b.north_east()?)))
        {
            collection["bbox"] = json!([sw.lng, sw.lat, ne.lng, ne.lat]);
        }
        collection
    }
}

impl MapSurface for GeoJsonMap {
    fn create_marker(&mut self, position: LatLng, title: &str) -> Result<OverlayHandle> {
        Ok(self.insert(Overlay::Marker {
            position,
            title: title.to_string(),
        }))
    }

    fn create_polyline_pair(
        &mut self,
        start: LatLng,
        end: LatLng,
        style: RouteStyle,
    ) -> Result<PolylinePair> {
        let hit = self.insert(Overlay::HitStroke);
        let visible = self.insert(Overlay::Stroke { start, end, style });
        Ok(PolylinePair { hit, visible })
    }

    fn create_popup(
        &mut self,
        anchor: OverlayHandle,
        _position: LatLng,
        html: &str,
        open: bool,
    ) -> Result<OverlayHandle> {
        Ok(self.insert(Overlay::Popup {
            anchor,
            html: html.to_string(),
            open,
        }))
    }

    fn fit_bounds(&mut self, bounds: &LatLngBounds) -> Result<()> {
        self.viewport = Some(*bounds);
        Ok(())
    }

    fn remove(&mut self, handle: OverlayHandle) {
        self.overlays.remove(&handle);
    }
}
