//! Per-day duty-status totals and break detection.
//!
//! # Algorithm Summary
//!
//! 1. Resolve every segment to a clamped, ordered span on the day grid
//! 2. Add positive span lengths to the segment's status total
//! 3. Flag on-duty segments of roughly 30 minutes as qualifying breaks
//!
//! Totals are recomputed on every call and are independent of whatever the
//! planning backend reported in [`DayPlan::totals`].

use chrono::NaiveDate;
use rayon::prelude::*;
use serde::Serialize;

use crate::day::{DayPlan, UpstreamTotals};
use crate::normalize::MINUTES_PER_DAY;
use crate::status::DutyStatus;

/// Nominal length of a regulatory rest break.
pub const BREAK_MINUTES: u16 = 30;

/// How far a break may deviate from [`BREAK_MINUTES`] and still qualify.
pub const BREAK_TOLERANCE_MINUTES: u16 = 1;

/// Recomputed and upstream figures closer than this are considered equal.
pub const DIVERGENCE_TOLERANCE_MINUTES: f64 = 1.0;

/// Whether a span of `duration_minutes` in `status` is a qualifying break.
pub const fn is_qualifying_break(status: DutyStatus, duration_minutes: u16) -> bool {
    matches!(status, DutyStatus::OnDuty)
        && duration_minutes.abs_diff(BREAK_MINUTES) <= BREAK_TOLERANCE_MINUTES
}

/// Accumulated minutes per duty status for one day.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct CategoryTotals {
    pub off: u32,
    pub sleeper: u32,
    pub driving: u32,
    pub on_duty: u32,
}

impl CategoryTotals {
    pub const fn get(&self, status: DutyStatus) -> u32 {
        match status {
            DutyStatus::Off => self.off,
            DutyStatus::Sleeper => self.sleeper,
            DutyStatus::Driving => self.driving,
            DutyStatus::OnDuty => self.on_duty,
        }
    }

    const fn get_mut(&mut self, status: DutyStatus) -> &mut u32 {
        match status {
            DutyStatus::Off => &mut self.off,
            DutyStatus::Sleeper => &mut self.sleeper,
            DutyStatus::Driving => &mut self.driving,
            DutyStatus::OnDuty => &mut self.on_duty,
        }
    }

    /// On-duty time including driving.
    pub const fn on_duty_incl_driving(&self) -> u32 {
        self.on_duty + self.driving
    }

    /// Sum over all four statuses.
    pub const fn sum(&self) -> u32 {
        self.off + self.sleeper + self.driving + self.on_duty
    }

    /// Totals in lane order.
    pub fn iter(&self) -> impl Iterator<Item = (DutyStatus, u32)> + '_ {
        DutyStatus::ALL.into_iter().map(|status| (status, self.get(status)))
    }

    fn add(&mut self, status: DutyStatus, minutes: u16) {
        let total = self.get_mut(status);
        // One status cannot account for more than a whole day.
        *total = (*total + u32::from(minutes)).min(u32::from(MINUTES_PER_DAY));
    }
}

/// Aggregation result for one day.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DaySummary {
    pub date: NaiveDate,
    pub totals: CategoryTotals,
    /// One flag per input segment, in input order.
    pub breaks: Vec<bool>,
}

impl DaySummary {
    pub fn break_count(&self) -> usize {
        self.breaks.iter().filter(|&&flag| flag).count()
    }
}

/// Computes status totals and break flags for one day.
pub fn aggregate(day: &DayPlan) -> DaySummary {
    let normalizer = day.normalizer();
    let mut totals = CategoryTotals::default();
    let mut breaks = Vec::with_capacity(day.segments.len());

    for segment in &day.segments {
        let duration = normalizer.normalize(segment).duration_minutes();
        if duration > 0 {
            totals.add(segment.status, duration);
        }
        breaks.push(is_qualifying_break(segment.status, duration));
    }

    DaySummary {
        date: day.date,
        totals,
        breaks,
    }
}

/// Aggregates independent days in parallel. Output order matches input order.
pub fn summarize_days(days: &[DayPlan]) -> Vec<DaySummary> {
    tracing::debug!(days = days.len(), "summarizing day plans");
    days.par_iter().map(aggregate).collect()
}

/// A recomputed total that disagrees with the backend's figure.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TotalsDivergence {
    /// Key as it appeared in the upstream totals.
    pub key: String,
    pub status: DutyStatus,
    pub upstream_minutes: f64,
    pub computed_minutes: u32,
}

/// Compares recomputed totals with upstream hour figures.
///
/// Only keys naming a single duty status are compared; anything else (such
/// as a driving-window figure) and non-numeric values are skipped.
pub fn compare_upstream(
    totals: &CategoryTotals,
    upstream: &UpstreamTotals,
) -> Vec<TotalsDivergence> {
    upstream
        .iter()
        .filter_map(|(key, value)| {
            let status = upstream_key_status(key)?;
            let upstream_minutes = value.as_f64()? * 60.0;
            let computed_minutes = totals.get(status);
            let delta = (upstream_minutes - f64::from(computed_minutes)).abs();
            (delta > DIVERGENCE_TOLERANCE_MINUTES).then(|| TotalsDivergence {
                key: key.clone(),
                status,
                upstream_minutes,
                computed_minutes,
            })
        })
        .collect()
}

fn upstream_key_status(key: &str) -> Option<DutyStatus> {
    let normalized = key.trim().to_ascii_lowercase().replace(['-', ' '], "_");
    match normalized.as_str() {
        "off" | "off_duty" => Some(DutyStatus::Off),
        "sleeper" | "sleeper_berth" => Some(DutyStatus::Sleeper),
        "driving" | "drive" => Some(DutyStatus::Driving),
        "on_duty" | "onduty" => Some(DutyStatus::OnDuty),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::day::Segment;
    use chrono::{DateTime, Duration, TimeZone, Utc};
    use serde_json::json;

    fn date() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 3, 4).unwrap()
    }

    fn at(hour: u32, minute: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 3, 4, 0, 0, 0).unwrap()
            + Duration::hours(i64::from(hour))
            + Duration::minutes(i64::from(minute))
    }

    fn seg(status: DutyStatus, start: (u32, u32), end: (u32, u32)) -> Segment {
        Segment::new(status, at(start.0, start.1), at(end.0, end.1))
    }

    fn sample_day() -> DayPlan {
        DayPlan::new(
            date(),
            vec![
                seg(DutyStatus::Off, (0, 0), (6, 0)),
                seg(DutyStatus::Driving, (6, 0), (14, 0)),
                seg(DutyStatus::OnDuty, (14, 0), (14, 30)),
                seg(DutyStatus::Driving, (14, 30), (18, 0)),
                seg(DutyStatus::Off, (18, 0), (24, 0)),
            ],
        )
    }

    // ========== Break Rule Tests ==========

    #[test]
    fn break_rule_tolerance() {
        assert!(is_qualifying_break(DutyStatus::OnDuty, 29));
        assert!(is_qualifying_break(DutyStatus::OnDuty, 30));
        assert!(is_qualifying_break(DutyStatus::OnDuty, 31));
        assert!(!is_qualifying_break(DutyStatus::OnDuty, 28));
        assert!(!is_qualifying_break(DutyStatus::OnDuty, 32));
        assert!(!is_qualifying_break(DutyStatus::Off, 30));
        assert!(!is_qualifying_break(DutyStatus::Driving, 30));
    }

    #[test]
    fn thirty_minute_on_duty_segment_is_break() {
        let day = DayPlan::new(date(), vec![seg(DutyStatus::OnDuty, (8, 0), (8, 30))]);
        assert_eq!(aggregate(&day).breaks, vec![true]);

        let day = DayPlan::new(date(), vec![seg(DutyStatus::OnDuty, (8, 0), (8, 32))]);
        assert_eq!(aggregate(&day).breaks, vec![false]);
    }

    // ========== Aggregation Tests ==========

    #[test]
    fn full_day_example_totals() {
        let summary = aggregate(&sample_day());
        assert_eq!(summary.totals.off, 720);
        assert_eq!(summary.totals.driving, 690);
        assert_eq!(summary.totals.on_duty, 30);
        assert_eq!(summary.totals.sleeper, 0);
        assert_eq!(summary.totals.on_duty_incl_driving(), 720);
        assert_eq!(summary.totals.sum(), 1440);
        assert_eq!(summary.breaks, vec![false, false, true, false, false]);
        assert_eq!(summary.break_count(), 1);
    }

    #[test]
    fn reversed_segment_counts_like_forward_one() {
        let reversed = DayPlan::new(
            date(),
            vec![Segment::new(DutyStatus::Sleeper, at(10, 0), at(8, 0))],
        );
        let forward = DayPlan::new(date(), vec![seg(DutyStatus::Sleeper, (8, 0), (10, 0))]);
        assert_eq!(aggregate(&reversed).totals, aggregate(&forward).totals);
        assert_eq!(aggregate(&reversed).totals.sleeper, 120);
    }

    #[test]
    fn start_before_day_clamps_to_midnight() {
        let day = DayPlan::new(
            date(),
            vec![Segment::new(
                DutyStatus::Off,
                at(0, 0) - Duration::minutes(60),
                at(2, 0),
            )],
        );
        assert_eq!(aggregate(&day).totals.off, 120);
    }

    #[test]
    fn day_running_past_midnight_keeps_its_break() {
        let next = |hour: u32, minute: u32| at(24 + hour, minute);
        let day = DayPlan::new(
            date(),
            vec![
                Segment::new(DutyStatus::OnDuty, at(20, 0), at(21, 0)),
                Segment::new(DutyStatus::Driving, at(21, 0), next(5, 0)),
                Segment::new(DutyStatus::OnDuty, next(5, 0), next(5, 30)),
                Segment::new(DutyStatus::Driving, next(5, 30), next(8, 30)),
            ],
        );
        let summary = aggregate(&day);
        assert_eq!(summary.totals.on_duty, 90);
        assert_eq!(summary.totals.driving, 360);
        assert_eq!(summary.breaks, vec![false, false, true, false]);
    }

    #[test]
    fn zero_duration_contributes_nothing() {
        let day = DayPlan::new(date(), vec![seg(DutyStatus::Driving, (9, 0), (9, 0))]);
        let summary = aggregate(&day);
        assert_eq!(summary.totals, CategoryTotals::default());
        assert_eq!(summary.breaks, vec![false]);
    }

    #[test]
    fn missing_endpoints_do_not_abort_the_day() {
        let mut broken = seg(DutyStatus::Driving, (6, 0), (8, 0));
        broken.start = None;
        broken.end = None;
        let day = DayPlan::new(
            date(),
            vec![broken, seg(DutyStatus::Driving, (8, 0), (9, 0))],
        );
        assert_eq!(aggregate(&day).totals.driving, 60);
    }

    #[test]
    fn unknown_status_counts_as_off() {
        let json = json!({
            "date": "2025-03-04",
            "segments": [
                {"status": "Yard", "start": "2025-03-04T01:00:00Z", "end": "2025-03-04T02:00:00Z"}
            ],
            "totals": {}
        });
        let day: DayPlan = serde_json::from_value(json).unwrap();
        assert_eq!(aggregate(&day).totals.off, 60);
    }

    #[test]
    fn empty_day_is_all_zero() {
        let summary = aggregate(&DayPlan::new(date(), vec![]));
        assert_eq!(summary.totals, CategoryTotals::default());
        assert!(summary.breaks.is_empty());
    }

    #[test]
    fn overlapping_totals_are_capped_per_status() {
        let day = DayPlan::new(
            date(),
            vec![
                seg(DutyStatus::Off, (0, 0), (24, 0)),
                seg(DutyStatus::Off, (0, 0), (12, 0)),
                seg(DutyStatus::Driving, (6, 0), (7, 0)),
            ],
        );
        let totals = aggregate(&day).totals;
        assert_eq!(totals.off, 1440);
        assert_eq!(totals.driving, 60);
    }

    #[test]
    fn aggregate_is_idempotent() {
        let day = sample_day();
        assert_eq!(aggregate(&day), aggregate(&day));
    }

    #[test]
    fn iter_follows_lane_order() {
        let totals = aggregate(&sample_day()).totals;
        let pairs: Vec<_> = totals.iter().collect();
        assert_eq!(
            pairs,
            vec![
                (DutyStatus::Off, 720),
                (DutyStatus::Sleeper, 0),
                (DutyStatus::Driving, 690),
                (DutyStatus::OnDuty, 30),
            ]
        );
    }

    #[test]
    fn summarize_days_preserves_order() {
        let days: Vec<_> = (0..16)
            .map(|i| {
                let date = date() + Duration::days(i);
                let start = date.and_hms_opt(0, 0, 0).unwrap().and_utc();
                DayPlan::new(
                    date,
                    vec![Segment::new(
                        DutyStatus::Driving,
                        start,
                        start + Duration::minutes(i + 1),
                    )],
                )
            })
            .collect();
        let summaries = summarize_days(&days);
        assert_eq!(summaries.len(), 16);
        for (i, summary) in summaries.iter().enumerate() {
            assert_eq!(summary.date, days[i].date);
            assert_eq!(summary.totals.driving as usize, i + 1);
        }
    }

    // ========== Upstream Comparison Tests ==========

    #[test]
    fn compare_upstream_reports_only_real_divergence() {
        let totals = aggregate(&sample_day()).totals;
        let upstream: UpstreamTotals = [
            ("driving".to_string(), json!(11.0)),
            ("on_duty".to_string(), json!(0.5)),
            ("window".to_string(), json!(18.0)),
            ("Off Duty".to_string(), json!("n/a")),
        ]
        .into_iter()
        .collect();

        let divergences = compare_upstream(&totals, &upstream);
        assert_eq!(divergences.len(), 1);
        let driving = &divergences[0];
        assert_eq!(driving.key, "driving");
        assert_eq!(driving.status, DutyStatus::Driving);
        assert_eq!(driving.computed_minutes, 690);
        assert!((driving.upstream_minutes - 660.0).abs() < f64::EPSILON);
    }

    #[test]
    fn compare_upstream_accepts_key_variants() {
        let totals = CategoryTotals {
            off: 600,
            sleeper: 0,
            driving: 0,
            on_duty: 60,
        };
        let upstream: UpstreamTotals = [
            ("Off-Duty".to_string(), json!(10)),
            ("OnDuty".to_string(), json!(2)),
        ]
        .into_iter()
        .collect();

        let divergences = compare_upstream(&totals, &upstream);
        assert_eq!(divergences.len(), 1);
        assert_eq!(divergences[0].status, DutyStatus::OnDuty);
    }

    #[test]
    fn recomputed_totals_leave_upstream_untouched() {
        let mut day = sample_day();
        day.totals.insert("driving".to_string(), json!(3.0));
        let before = day.totals.clone();
        let summary = aggregate(&day);
        assert_eq!(day.totals, before);
        assert_eq!(summary.totals.driving, 690);
    }
}
