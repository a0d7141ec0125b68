//! Geographic primitives shared by the overlay store and map surfaces.

use serde::{Deserialize, Serialize};

/// A point in WGS84 degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LatLng {
    pub lat: f64,
    pub lng: f64,
}

impl LatLng {
    pub fn new(lat: f64, lng: f64) -> Self {
        Self { lat, lng }
    }
}

/// The minimal rectangle enclosing every point it has been extended with.
///
/// Starts empty; an empty bounds contains nothing and has no corners.
/// Longitudes are treated linearly (no antimeridian wrapping).
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct LatLngBounds {
    #[serde(skip_serializing_if = "Option::is_none")]
    south_west: Option<LatLng>,
    #[serde(skip_serializing_if = "Option::is_none")]
    north_east: Option<LatLng>,
}

impl LatLngBounds {
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.south_west.is_none()
    }

    /// Grow the rectangle so that it includes `point`.
    pub fn extend(&mut self, point: LatLng) {
        match (&mut self.south_west, &mut self.north_east) {
            (Some(sw), Some(ne)) => {
                sw.lat = sw.lat.min(point.lat);
                sw.lng = sw.lng.min(point.lng);
                ne.lat = ne.lat.max(point.lat);
                ne.lng = ne.lng.max(point.lng);
            }
            _ => {
                self.south_west = Some(point);
                self.north_east = Some(point);
            }
        }
    }

    pub fn contains(&self, point: LatLng) -> bool {
        match (self.south_west, self.north_east) {
            (Some(sw), Some(ne)) => {
                point.lat >= sw.lat
                    && point.lat <= ne.lat
                    && point.lng >= sw.lng
                    && point.lng <= ne.lng
            }
            _ => false,
        }
    }

    pub fn south_west(&self) -> Option<LatLng> {
        self.south_west
    }

    pub fn north_east(&self) -> Option<LatLng> {
        self.north_east
    }
}
