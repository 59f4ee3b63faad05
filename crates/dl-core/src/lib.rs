//! Core domain logic for driver duty-status logs.
//!
//! This crate contains the fundamental types and logic for:
//! - Normalization: mapping segment timestamps onto a UTC minute-of-day grid
//! - Aggregation: per-status totals and qualifying break detection
//! - Layout: lane, tick and segment geometry for a 1440-unit wide log grid
//! - Route: bounds and endpoints of the planned route line

mod aggregate;
pub mod day;
pub mod layout;
pub mod normalize;
pub mod plan;
pub mod route;
pub mod status;

pub use aggregate::{
    BREAK_MINUTES, BREAK_TOLERANCE_MINUTES, CategoryTotals, DaySummary, TotalsDivergence,
    aggregate, compare_upstream, is_qualifying_break, summarize_days,
};
pub use day::{DayPlan, Segment, UpstreamTotals};
pub use layout::{GridLayout, GridLayoutBuilder, SegmentGeometry, build_layout};
pub use normalize::{MINUTES_PER_DAY, MinuteOfDay, NormalizedSpan, TimeNormalizer};
pub use plan::{PlanRequest, PlanRequestError, PlanResponse};
pub use route::{Bounds, LngLat, RouteGeometry};
pub use status::{DutyStatus, UnknownDutyStatus};
