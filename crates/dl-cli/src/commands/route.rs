//! Route command: start, end and bounding box of the planned route.

use std::fmt::Write;
use std::path::Path;

use anyhow::{Result, bail};
use dl_core::{Bounds, LngLat, RouteGeometry};
use serde::Serialize;

use super::util::read_plan;

/// Viewport data a map needs to frame the route.
#[derive(Debug, Serialize)]
pub struct RouteOverview {
    pub points: usize,
    pub start: Option<LngLat>,
    pub end: Option<LngLat>,
    pub bounds: Option<Bounds>,
}

impl RouteOverview {
    pub fn new(route: &RouteGeometry) -> Self {
        let endpoints = route.endpoints();
        Self {
            points: route.coordinates.len(),
            start: endpoints.map(|(start, _)| start),
            end: endpoints.map(|(_, end)| end),
            bounds: route.bounds(),
        }
    }
}

fn format_point(point: LngLat) -> String {
    format!("{:.5}, {:.5}", point.lat, point.lng)
}

/// Formats the overview as human-readable text.
pub fn format_route(overview: &RouteOverview) -> String {
    let mut output = String::new();

    writeln!(output, "ROUTE: {} point(s)", overview.points).unwrap();
    if let Some(start) = overview.start {
        writeln!(output, "Start:  {}", format_point(start)).unwrap();
    }
    if let Some(end) = overview.end {
        writeln!(output, "End:    {}", format_point(end)).unwrap();
    }
    if let Some(bounds) = overview.bounds {
        writeln!(
            output,
            "Bounds: {:.5}, {:.5} to {:.5}, {:.5}",
            bounds.min_lat, bounds.min_lng, bounds.max_lat, bounds.max_lng
        )
        .unwrap();
    }

    output
}

pub fn run(input: Option<&Path>, json: bool) -> Result<()> {
    let plan = read_plan(input)?;
    let Some(route) = plan.route() else {
        bail!("plan has no route geometry");
    };
    tracing::debug!(points = route.coordinates.len(), "parsed route geometry");

    let overview = RouteOverview::new(&route);
    if json {
        println!("{}", serde_json::to_string_pretty(&overview)?);
    } else {
        print!("{}", format_route(&overview));
    }
    Ok(())
}

#[cfg(test)]
#[expect(clippy::float_cmp, reason = "coordinates are copied, not computed")]
mod tests {
    use super::*;
    use insta::assert_snapshot;
    use serde_json::json;

    fn route() -> RouteGeometry {
        RouteGeometry::from_geojson(&json!({
            "type": "LineString",
            "coordinates": [[74.3587, 31.5204], [73.0479, 33.6844], [67.0011, 24.8607]]
        }))
        .unwrap()
    }

    #[test]
    fn test_overview_has_endpoints_and_bounds() {
        let overview = RouteOverview::new(&route());
        assert_eq!(overview.points, 3);
        assert_eq!(overview.start.map(|p| p.lat), Some(31.5204));
        assert_eq!(overview.end.map(|p| p.lng), Some(67.0011));
        let bounds = overview.bounds.unwrap();
        assert_eq!(bounds.max_lat, 33.6844);
        assert_eq!(bounds.min_lng, 67.0011);
    }

    #[test]
    fn test_single_point_route_has_no_endpoints() {
        let route = RouteGeometry::from_geojson(&json!({
            "type": "LineString",
            "coordinates": [[74.3587, 31.5204]]
        }))
        .unwrap();
        let overview = RouteOverview::new(&route);
        assert!(overview.start.is_none());
        assert!(overview.bounds.is_some());
    }

    #[test]
    fn test_format_route() {
        let output = format_route(&RouteOverview::new(&route()));
        assert_snapshot!(output, @r"
        ROUTE: 3 point(s)
        Start:  31.52040, 74.35870
        End:    24.86070, 67.00110
        Bounds: 24.86070, 67.00110 to 33.68440, 74.35870
        ");
    }
}
