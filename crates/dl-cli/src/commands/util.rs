//! Shared utilities for CLI commands.

use std::io::Read;
use std::path::Path;
use std::sync::LazyLock;

use anyhow::{Context, Result, bail};
use dl_core::{DayPlan, PlanResponse};
use regex::Regex;
use serde_json::Value;

/// Pre-compiled regex for `lat,lng` locations.
static LOCATION_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^\s*(-?\d{1,3}(?:\.\d+)?)\s*,\s*(-?\d{1,3}(?:\.\d+)?)\s*$").unwrap()
});

/// Reads plan JSON from `path`, or stdin when `path` is `None` or `-`.
pub fn read_plan(path: Option<&Path>) -> Result<PlanResponse> {
    let text = match path {
        Some(path) if path != Path::new("-") => std::fs::read_to_string(path)
            .with_context(|| format!("failed to read {}", path.display()))?,
        _ => {
            let mut text = String::new();
            std::io::stdin()
                .read_to_string(&mut text)
                .context("failed to read plan from stdin")?;
            text
        }
    };
    parse_plan(&text)
}

/// Parses a full plan response, a single day plan, or a list of day plans.
pub fn parse_plan(text: &str) -> Result<PlanResponse> {
    let value: Value = serde_json::from_str(text).context("plan input is not valid JSON")?;

    if value.is_array() {
        let day_plans: Vec<DayPlan> =
            serde_json::from_value(value).context("invalid list of day plans")?;
        return Ok(PlanResponse {
            day_plans,
            ..PlanResponse::default()
        });
    }
    if value.get("date").is_some() {
        let day: DayPlan = serde_json::from_value(value).context("invalid day plan")?;
        return Ok(PlanResponse {
            day_plans: vec![day],
            ..PlanResponse::default()
        });
    }
    if value.is_object() {
        return serde_json::from_value(value).context("invalid plan response");
    }
    bail!("expected a plan response, a day plan, or a list of day plans")
}

/// Picks a day by 1-based number.
pub fn select_day(plan: &PlanResponse, day: usize) -> Result<&DayPlan> {
    if plan.day_plans.is_empty() {
        bail!("plan contains no days");
    }
    day.checked_sub(1)
        .and_then(|index| plan.day_plans.get(index))
        .with_context(|| {
            format!(
                "day {day} out of range: plan has {} day(s)",
                plan.day_plans.len()
            )
        })
}

/// Validates a `lat,lng` location and returns it in canonical form.
pub fn parse_location(s: &str) -> Result<String> {
    let Some(caps) = LOCATION_RE.captures(s) else {
        bail!(
            "Invalid location: {s}. Use \"lat,lng\" (e.g. \"31.5204,74.3587\")"
        );
    };

    let lat: f64 = caps[1].parse().context("failed to parse latitude")?;
    let lng: f64 = caps[2].parse().context("failed to parse longitude")?;
    if !(-90.0..=90.0).contains(&lat) {
        bail!("Latitude out of range: {lat}");
    }
    if !(-180.0..=180.0).contains(&lng) {
        bail!("Longitude out of range: {lng}");
    }
    Ok(format!("{},{}", &caps[1], &caps[2]))
}

/// Formats minutes as `h:mm`.
pub fn format_hhmm(minutes: u32) -> String {
    format!("{}:{:02}", minutes / 60, minutes % 60)
}
