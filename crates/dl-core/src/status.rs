//! Duty status enum as the single source of truth for status names and lane order.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// What a driver is doing during an interval.
///
/// Variant order is the display order of the log grid: `Off` is the top lane,
/// `OnDuty` the bottom one.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum DutyStatus {
    #[default]
    Off,
    Sleeper,
    Driving,
    OnDuty,
}

impl DutyStatus {
    /// All statuses in lane order.
    pub const ALL: [Self; 4] = [Self::Off, Self::Sleeper, Self::Driving, Self::OnDuty];

    /// Zero-based lane index in the grid.
    #[must_use]
    pub const fn lane_index(self) -> usize {
        match self {
            Self::Off => 0,
            Self::Sleeper => 1,
            Self::Driving => 2,
            Self::OnDuty => 3,
        }
    }

    /// Wire name, as sent by the planning backend.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Off => "Off",
            Self::Sleeper => "Sleeper",
            Self::Driving => "Driving",
            Self::OnDuty => "OnDuty",
        }
    }

    /// Abbreviation printed at the left edge of a lane.
    #[must_use]
    pub const fn short_label(self) -> &'static str {
        match self {
            Self::Off => "OFF",
            Self::Sleeper => "SB",
            Self::Driving => "D",
            Self::OnDuty => "ON",
        }
    }

    #[must_use]
    pub const fn long_label(self) -> &'static str {
        match self {
            Self::Off => "Off Duty",
            Self::Sleeper => "Sleeper Berth",
            Self::Driving => "Driving",
            Self::OnDuty => "On Duty",
        }
    }

    /// Parses a wire name, falling back to `Off` for anything unrecognised.
    pub fn from_str_lossy(s: &str) -> Self {
        s.parse().unwrap_or_else(|err: UnknownDutyStatus| {
            tracing::debug!(%err, "treating unknown duty status as Off");
            Self::Off
        })
    }
}

impl fmt::Display for DutyStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for DutyStatus {
    type Err = UnknownDutyStatus;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Off" => Ok(Self::Off),
            "Sleeper" => Ok(Self::Sleeper),
            "Driving" => Ok(Self::Driving),
            "OnDuty" => Ok(Self::OnDuty),
            _ => Err(UnknownDutyStatus(s.to_string())),
        }
    }
}

impl Serialize for DutyStatus {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for DutyStatus {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        // A status of the wrong JSON type is as unknown as a misspelled one.
        let value = serde_json::Value::deserialize(deserializer)?;
        Ok(value.as_str().map_or(Self::Off, Self::from_str_lossy))
    }
}

/// Error type for unknown duty status strings.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown duty status: {0}")]
pub struct UnknownDutyStatus(String);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn roundtrip_all_variants() {
        for status in DutyStatus::ALL {
            let parsed: DutyStatus = status.to_string().parse().expect("should parse");
            assert_eq!(parsed, status, "roundtrip failed for {status:?}");
        }
    }

    #[test]
    fn lane_indices_follow_display_order() {
        let indices: Vec<_> = DutyStatus::ALL.iter().map(|s| s.lane_index()).collect();
        assert_eq!(indices, vec![0, 1, 2, 3]);
    }

    #[test]
    fn unknown_status_errors_on_strict_parse() {
        let err = "Yard".parse::<DutyStatus>().unwrap_err();
        assert_eq!(err.to_string(), "unknown duty status: Yard");
    }

    #[test]
    fn unknown_status_is_off_on_lossy_parse() {
        assert_eq!(DutyStatus::from_str_lossy("Yard"), DutyStatus::Off);
        assert_eq!(DutyStatus::from_str_lossy("ondutY"), DutyStatus::Off);
        assert_eq!(DutyStatus::from_str_lossy("Sleeper"), DutyStatus::Sleeper);
    }

    #[test]
    fn deserialize_is_lenient() {
        let parsed: DutyStatus = serde_json::from_str("\"OnDuty\"").unwrap();
        assert_eq!(parsed, DutyStatus::OnDuty);

        let parsed: DutyStatus = serde_json::from_str("\"PersonalConveyance\"").unwrap();
        assert_eq!(parsed, DutyStatus::Off);

        let parsed: DutyStatus = serde_json::from_str("3").unwrap();
        assert_eq!(parsed, DutyStatus::Off);
    }

    #[test]
    fn serializes_wire_name() {
        let json = serde_json::to_string(&DutyStatus::OnDuty).unwrap();
        assert_eq!(json, "\"OnDuty\"");
    }
}
