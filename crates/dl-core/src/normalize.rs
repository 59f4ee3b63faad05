//! Timestamp to minute-of-day normalization.
//!
//! All minute arithmetic uses UTC clock time. A segment that runs past
//! midnight ends at 1440 instead of wrapping back to the top of the grid.

use std::fmt;

use chrono::{DateTime, NaiveDate, Timelike, Utc};
use serde::Serialize;

use crate::day::Segment;

/// Number of minutes in a rendered day.
pub const MINUTES_PER_DAY: u16 = 1440;

/// A minute offset from day start in the range \[0, 1440\].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(transparent)]
pub struct MinuteOfDay(u16);

impl MinuteOfDay {
    /// Day start (00:00).
    pub const MIN: Self = Self(0);

    /// Day end (24:00).
    pub const MAX: Self = Self(MINUTES_PER_DAY);

    /// Creates a minute offset, clamping to \[0, 1440\].
    #[must_use]
    #[allow(
        clippy::cast_possible_truncation,
        clippy::cast_sign_loss,
        clippy::cast_lossless
    )]
    pub const fn clamped(minute: i64) -> Self {
        if minute < 0 {
            Self::MIN
        } else if minute > MINUTES_PER_DAY as i64 {
            Self::MAX
        } else {
            Self(minute as u16)
        }
    }

    #[must_use]
    pub const fn get(self) -> u16 {
        self.0
    }
}

impl fmt::Display for MinuteOfDay {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:02}:{:02}", self.0 / 60, self.0 % 60)
    }
}

/// A resolved segment: lane plus ordered, clamped endpoints.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct NormalizedSpan {
    pub lane: usize,
    pub start: MinuteOfDay,
    pub end: MinuteOfDay,
}

impl NormalizedSpan {
    /// Length of the span in minutes. Never negative.
    pub const fn duration_minutes(&self) -> u16 {
        self.end.0 - self.start.0
    }
}

/// Maps timestamps onto the minute grid of one UTC day.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimeNormalizer {
    date: NaiveDate,
}

impl TimeNormalizer {
    /// Normalizer for the day plan dated `date`.
    pub const fn for_date(date: NaiveDate) -> Self {
        Self { date }
    }

    /// UTC clock time of `timestamp` as `hours * 60 + minutes`, seconds
    /// discarded. Always in \[0, 1440).
    pub fn minute_of_day(timestamp: DateTime<Utc>) -> i64 {
        i64::from(timestamp.hour() * 60 + timestamp.minute())
    }

    /// Clamps a raw minute offset to the day. A missing offset is day start.
    pub fn clamp(minute: Option<i64>) -> MinuteOfDay {
        minute.map_or(MinuteOfDay::MIN, MinuteOfDay::clamped)
    }

    /// Resolves a pair of endpoints to `(a, b)` with `a <= b`.
    ///
    /// Reversed endpoints are swapped. Endpoints on the same UTC date keep
    /// their clock positions whatever the plan's date. A segment crossing
    /// midnight is cut at the grid edge: it starts at 00:00 when it began
    /// before the plan's date and otherwise runs to 24:00.
    pub fn resolve_span(
        &self,
        start: Option<DateTime<Utc>>,
        end: Option<DateTime<Utc>>,
    ) -> (MinuteOfDay, MinuteOfDay) {
        let (start, end) = match (start, end) {
            (Some(s), Some(e)) if e < s => (Some(e), Some(s)),
            other => other,
        };

        let (a, b) = match (start, end) {
            (Some(s), Some(e)) if e.date_naive() > s.date_naive() => {
                if s.date_naive() < self.date {
                    let b = if e.date_naive() > self.date {
                        MinuteOfDay::MAX
                    } else {
                        Self::clamp(Some(Self::minute_of_day(e)))
                    };
                    (MinuteOfDay::MIN, b)
                } else {
                    (Self::clamp(Some(Self::minute_of_day(s))), MinuteOfDay::MAX)
                }
            }
            _ => (
                Self::clamp(start.map(Self::minute_of_day)),
                Self::clamp(end.map(Self::minute_of_day)),
            ),
        };
        if b < a { (b, a) } else { (a, b) }
    }

    pub fn normalize(&self, segment: &Segment) -> NormalizedSpan {
        let (start, end) = self.resolve_span(segment.start, segment.end);
        NormalizedSpan {
            lane: segment.status.lane_index(),
            start,
            end,
        }
    }
}
