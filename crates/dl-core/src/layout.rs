//! Renderer-agnostic geometry for the 24-hour log grid.
//!
//! The horizontal axis is one unit per minute (`0..=1440`), so positions are
//! minute offsets and can be overlaid on real time without scaling. The
//! vertical axis stacks one lane per duty status in [`DutyStatus::ALL`] order.

use std::fmt;

use chrono::NaiveDate;
use serde::Serialize;

use crate::aggregate::is_qualifying_break;
use crate::day::{DayPlan, Segment};
use crate::normalize::{MINUTES_PER_DAY, MinuteOfDay, TimeNormalizer};
use crate::status::DutyStatus;

/// Height of one status lane.
pub const LANE_HEIGHT: f64 = 36.0;

/// Space above the first lane, where hour labels sit.
pub const TOP_MARGIN: f64 = 24.0;

pub const BOTTOM_MARGIN: f64 = 20.0;

/// Canvas width: one unit per minute.
#[allow(clippy::cast_lossless)]
pub const CANVAS_WIDTH: f64 = MINUTES_PER_DAY as f64;

#[allow(clippy::cast_precision_loss)]
pub const CANVAS_HEIGHT: f64 =
    TOP_MARGIN + DutyStatus::ALL.len() as f64 * LANE_HEIGHT + BOTTOM_MARGIN;

/// Vertical midpoint of the lane for `status`.
#[allow(clippy::cast_precision_loss)]
pub fn lane_center(status: DutyStatus) -> f64 {
    TOP_MARGIN + status.lane_index() as f64 * LANE_HEIGHT + LANE_HEIGHT / 2.0
}

/// Label printed above an hour line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickLabel {
    Midnight,
    Noon,
    /// Hour on a 12-hour dial.
    Hour(u8),
}

impl fmt::Display for TickLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Midnight => f.write_str("M"),
            Self::Noon => f.write_str("N"),
            Self::Hour(hour) => write!(f, "{hour}"),
        }
    }
}

impl Serialize for TickLabel {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.collect_str(self)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct HourTick {
    pub position: u16,
    pub label: TickLabel,
}

/// The 25 hour lines from midnight to midnight.
pub fn hour_ticks() -> Vec<HourTick> {
    (0..=24u8)
        .map(|hour| HourTick {
            position: u16::from(hour) * 60,
            label: match hour {
                0 => TickLabel::Midnight,
                12 => TickLabel::Noon,
                _ => TickLabel::Hour(hour % 12),
            },
        })
        .collect()
}

/// One horizontal status lane.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Lane {
    pub status: DutyStatus,
    pub label: &'static str,
    pub center: f64,
    /// Position of the divider line under the lane.
    pub divider: f64,
}

pub fn lanes() -> Vec<Lane> {
    DutyStatus::ALL
        .into_iter()
        .map(|status| {
            let center = lane_center(status);
            Lane {
                status,
                label: status.short_label(),
                center,
                divider: center + LANE_HEIGHT / 2.0,
            }
        })
        .collect()
}

/// A segment placed on the grid.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct SegmentGeometry {
    pub status: DutyStatus,
    pub lane_center: f64,
    pub start: MinuteOfDay,
    pub end: MinuteOfDay,
    pub is_break: bool,
}

/// The complete grid for one day.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GridLayout {
    pub date: NaiveDate,
    pub width: f64,
    pub height: f64,
    pub lanes: Vec<Lane>,
    pub ticks: Vec<HourTick>,
    /// Segments in input order; later entries draw over earlier ones.
    pub segments: Vec<SegmentGeometry>,
}

/// Places segments of one day on the grid.
#[derive(Debug, Clone, Copy)]
pub struct GridLayoutBuilder {
    date: NaiveDate,
    normalizer: TimeNormalizer,
}

impl GridLayoutBuilder {
    pub const fn for_date(date: NaiveDate) -> Self {
        Self {
            date,
            normalizer: TimeNormalizer::for_date(date),
        }
    }

    /// Resolves span, lane and break flag for a single segment.
    ///
    /// The break flag uses the same rule as aggregation but needs no prior
    /// aggregation pass.
    pub fn segment_geometry(&self, segment: &Segment) -> SegmentGeometry {
        let span = self.normalizer.normalize(segment);
        SegmentGeometry {
            status: segment.status,
            lane_center: lane_center(segment.status),
            start: span.start,
            end: span.end,
            is_break: is_qualifying_break(segment.status, span.duration_minutes()),
        }
    }

    pub fn build(&self, segments: &[Segment]) -> GridLayout {
        GridLayout {
            date: self.date,
            width: CANVAS_WIDTH,
            height: CANVAS_HEIGHT,
            lanes: lanes(),
            ticks: hour_ticks(),
            segments: segments
                .iter()
                .map(|segment| self.segment_geometry(segment))
                .collect(),
        }
    }
}

/// Builds the grid layout for a day plan.
pub fn build_layout(day: &DayPlan) -> GridLayout {
    GridLayoutBuilder::for_date(day.date).build(&day.segments)
}

#[cfg(test)]
#[expect(
    clippy::float_cmp,
    reason = "layout constants are exact small integers"
)]
mod tests {
    use super::*;
    use chrono::{DateTime, TimeZone, Utc};

    fn date() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 3, 4).unwrap()
    }

    fn at(hour: u32, minute: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 3, 4, hour, minute, 0).unwrap()
    }

    // ========== Constant Tests ==========

    #[test]
    fn canvas_height_is_derived_from_lanes() {
        assert_eq!(CANVAS_HEIGHT, 188.0);
        assert_eq!(CANVAS_WIDTH, 1440.0);
    }

    #[test]
    fn lane_centers_follow_status_order() {
        assert_eq!(lane_center(DutyStatus::Off), 42.0);
        assert_eq!(lane_center(DutyStatus::Sleeper), 78.0);
        assert_eq!(lane_center(DutyStatus::Driving), 114.0);
        assert_eq!(lane_center(DutyStatus::OnDuty), 150.0);
    }

    #[test]
    fn lanes_have_labels_and_dividers() {
        let lanes = lanes();
        let labels: Vec<_> = lanes.iter().map(|lane| lane.label).collect();
        assert_eq!(labels, vec!["OFF", "SB", "D", "ON"]);
        assert_eq!(lanes[0].divider, 60.0);
        assert_eq!(lanes[3].divider, 168.0);
    }

    // ========== Tick Tests ==========

    #[test]
    fn hour_ticks_cover_the_day() {
        let ticks = hour_ticks();
        assert_eq!(ticks.len(), 25);
        assert_eq!(ticks.first().unwrap().position, 0);
        assert_eq!(ticks.last().unwrap().position, 1440);
        assert!(ticks.windows(2).all(|w| w[1].position - w[0].position == 60));
    }

    #[test]
    fn hour_tick_labels() {
        let ticks = hour_ticks();
        assert_eq!(ticks[0].label, TickLabel::Midnight);
        assert_eq!(ticks[12].label, TickLabel::Noon);
        assert_eq!(ticks[12].position, 720);
        assert_eq!(ticks[1].label, TickLabel::Hour(1));
        assert_eq!(ticks[13].label, TickLabel::Hour(1));
        let rendered: Vec<_> = ticks.iter().take(3).map(|t| t.label.to_string()).collect();
        assert_eq!(rendered, vec!["M", "1", "2"]);
    }

    // ========== Segment Geometry Tests ==========

    #[test]
    fn segment_geometry_resolves_span_lane_and_break() {
        let builder = GridLayoutBuilder::for_date(date());
        let geometry =
            builder.segment_geometry(&Segment::new(DutyStatus::OnDuty, at(14, 0), at(14, 30)));
        assert_eq!(geometry.lane_center, 150.0);
        assert_eq!(geometry.start.get(), 840);
        assert_eq!(geometry.end.get(), 870);
        assert!(geometry.is_break);

        let geometry =
            builder.segment_geometry(&Segment::new(DutyStatus::OnDuty, at(8, 0), at(8, 32)));
        assert!(!geometry.is_break);
    }

    #[test]
    fn segments_after_utc_midnight_keep_clock_position() {
        let next_day = |hour, minute| Utc.with_ymd_and_hms(2025, 3, 5, hour, minute, 0).unwrap();
        let day = DayPlan::new(
            date(),
            vec![
                Segment::new(DutyStatus::Driving, at(21, 0), next_day(5, 0)),
                Segment::new(DutyStatus::OnDuty, next_day(5, 0), next_day(5, 30)),
            ],
        );
        let layout = build_layout(&day);
        let spans: Vec<_> = layout
            .segments
            .iter()
            .map(|g| (g.start.get(), g.end.get(), g.is_break))
            .collect();
        assert_eq!(spans, vec![(1260, 1440, false), (300, 330, true)]);
    }

    #[test]
    fn zero_duration_segment_is_kept() {
        let day = DayPlan::new(
            date(),
            vec![Segment::new(DutyStatus::Driving, at(9, 0), at(9, 0))],
        );
        let layout = build_layout(&day);
        assert_eq!(layout.segments.len(), 1);
        assert_eq!(layout.segments[0].start, layout.segments[0].end);
    }

    #[test]
    fn segments_keep_input_order() {
        let day = DayPlan::new(
            date(),
            vec![
                Segment::new(DutyStatus::Driving, at(10, 0), at(12, 0)),
                Segment::new(DutyStatus::Off, at(0, 0), at(10, 0)),
                Segment::new(DutyStatus::OnDuty, at(11, 0), at(11, 30)),
            ],
        );
        let statuses: Vec<_> = build_layout(&day)
            .segments
            .iter()
            .map(|g| g.status)
            .collect();
        assert_eq!(
            statuses,
            vec![DutyStatus::Driving, DutyStatus::Off, DutyStatus::OnDuty]
        );
    }

    #[test]
    fn empty_day_has_grid_but_no_segments() {
        let layout = build_layout(&DayPlan::new(date(), vec![]));
        assert!(layout.segments.is_empty());
        assert_eq!(layout.ticks.len(), 25);
        assert_eq!(layout.lanes.len(), 4);
    }

    #[test]
    fn build_layout_is_idempotent() {
        let day = DayPlan::new(
            date(),
            vec![Segment::new(DutyStatus::Sleeper, at(10, 0), at(8, 0))],
        );
        assert_eq!(build_layout(&day), build_layout(&day));
        assert_eq!(build_layout(&day).segments[0].start.get(), 480);
    }

    #[test]
    fn layout_serializes_positions_as_minutes() {
        let day = DayPlan::new(
            date(),
            vec![Segment::new(DutyStatus::Driving, at(6, 0), at(7, 0))],
        );
        let json = serde_json::to_value(build_layout(&day)).unwrap();
        assert_eq!(json["segments"][0]["start"], 360);
        assert_eq!(json["segments"][0]["status"], "Driving");
        assert_eq!(json["ticks"][12]["label"], "N");
        assert_eq!(json["height"], 188.0);
    }
}
