//! Route geometry extracted from the planner's GeoJSON.
//!
//! Only what a basemap needs to frame the route is computed here: the bounding
//! box and the start/end points. Drawing is left to the map renderer.

use serde::Serialize;
use serde_json::Value;

/// A `[longitude, latitude]` position.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct LngLat {
    pub lng: f64,
    pub lat: f64,
}

/// Axis-aligned bounds of a route.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Bounds {
    pub min_lng: f64,
    pub min_lat: f64,
    pub max_lng: f64,
    pub max_lat: f64,
}

impl Bounds {
    fn around(point: LngLat) -> Self {
        Self {
            min_lng: point.lng,
            min_lat: point.lat,
            max_lng: point.lng,
            max_lat: point.lat,
        }
    }

    fn extend(mut self, point: LngLat) -> Self {
        self.min_lng = self.min_lng.min(point.lng);
        self.min_lat = self.min_lat.min(point.lat);
        self.max_lng = self.max_lng.max(point.lng);
        self.max_lat = self.max_lat.max(point.lat);
        self
    }
}

/// Ordered coordinates of a driving route.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct RouteGeometry {
    pub coordinates: Vec<LngLat>,
}

impl RouteGeometry {
    /// Extracts the route line from a GeoJSON value.
    ///
    /// Accepts a `Feature`, a `FeatureCollection` (first `LineString` feature
    /// wins) or a bare `LineString` geometry. Positions that are not a pair of
    /// finite numbers are skipped.
    pub fn from_geojson(value: &Value) -> Option<Self> {
        let line = find_line_string(value)?;
        let coordinates = line
            .get("coordinates")?
            .as_array()?
            .iter()
            .filter_map(parse_position)
            .collect();
        Some(Self { coordinates })
    }

    pub fn bounds(&self) -> Option<Bounds> {
        let (first, rest) = self.coordinates.split_first()?;
        Some(
            rest.iter()
                .fold(Bounds::around(*first), |bounds, &point| bounds.extend(point)),
        )
    }

    /// First and last point; `None` unless the route has two or more points.
    pub fn endpoints(&self) -> Option<(LngLat, LngLat)> {
        match self.coordinates.as_slice() {
            [first, .., last] => Some((*first, *last)),
            _ => None,
        }
    }
}

fn find_line_string(value: &Value) -> Option<&Value> {
    match value.get("type")?.as_str()? {
        "LineString" => Some(value),
        "Feature" => find_line_string(value.get("geometry")?),
        "FeatureCollection" => value
            .get("features")?
            .as_array()?
            .iter()
            .find_map(find_line_string),
        _ => None,
    }
}

fn parse_position(value: &Value) -> Option<LngLat> {
    let pair = value.as_array()?;
    let lng = pair.first()?.as_f64()?;
    let lat = pair.get(1)?.as_f64()?;
    (lng.is_finite() && lat.is_finite()).then_some(LngLat { lng, lat })
}
