//! Day plans and the duty-status segments they carry.

use std::collections::BTreeMap;

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};

use crate::normalize::TimeNormalizer;
use crate::status::DutyStatus;

/// Totals pre-computed by the planning backend, keyed by name.
///
/// Kept exactly as received. The engine recomputes its own totals and never
/// writes into this map.
pub type UpstreamTotals = BTreeMap<String, serde_json::Value>;

/// One contiguous interval of a single duty status.
///
/// Endpoints are deserialized leniently: a missing or malformed timestamp
/// becomes `None` instead of failing the whole day.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Segment {
    #[serde(default)]
    pub status: DutyStatus,

    #[serde(default, deserialize_with = "lenient_timestamp")]
    pub start: Option<DateTime<Utc>>,

    #[serde(default, deserialize_with = "lenient_timestamp")]
    pub end: Option<DateTime<Utc>>,

    #[serde(
        default,
        deserialize_with = "lenient_number",
        skip_serializing_if = "Option::is_none"
    )]
    pub miles: Option<f64>,

    /// Opaque annotation from upstream; never interpreted.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<serde_json::Value>,
}

impl Segment {
    /// Creates a segment without miles or label.
    pub const fn new(status: DutyStatus, start: DateTime<Utc>, end: DateTime<Utc>) -> Self {
        Self {
            status,
            start: Some(start),
            end: Some(end),
            miles: None,
            label: None,
        }
    }
}

/// One calendar day of duty-status data.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DayPlan {
    /// The UTC calendar day this plan covers.
    pub date: NaiveDate,

    /// Segments in the order supplied. Never re-sorted.
    #[serde(default)]
    pub segments: Vec<Segment>,

    #[serde(default)]
    pub totals: UpstreamTotals,
}

impl DayPlan {
    /// Creates a day with no upstream totals.
    pub const fn new(date: NaiveDate, segments: Vec<Segment>) -> Self {
        Self {
            date,
            segments,
            totals: BTreeMap::new(),
        }
    }

    /// Normalizer for this day's grid.
    pub const fn normalizer(&self) -> TimeNormalizer {
        TimeNormalizer::for_date(self.date)
    }
}

/// Parses an ISO 8601 timestamp and converts it to UTC.
///
/// Timestamps without an offset are taken to be UTC already.
pub fn parse_timestamp(s: &str) -> Option<DateTime<Utc>> {
    let s = s.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.with_timezone(&Utc));
    }
    NaiveDateTime::parse_from_str(s, "%Y-%m-%dT%H:%M:%S%.f")
        .or_else(|_| NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M:%S%.f"))
        .ok()
        .map(|naive| naive.and_utc())
}

fn lenient_timestamp<'de, D>(deserializer: D) -> Result<Option<DateTime<Utc>>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = serde_json::Value::deserialize(deserializer)?;
    let parsed = value.as_str().and_then(parse_timestamp);
    if parsed.is_none() && !value.is_null() {
        tracing::debug!(%value, "unparseable segment timestamp");
    }
    Ok(parsed)
}

fn lenient_number<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = serde_json::Value::deserialize(deserializer)?;
    Ok(value.as_f64().filter(|n| n.is_finite()))
}
