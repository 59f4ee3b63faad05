//! Summary command for per-day duty-status totals.
//!
//! Totals are recomputed from the segments of each day and compared with the
//! figures the planning backend reported.

use std::fmt::Write;
use std::path::Path;

use anyhow::Result;
use chrono::NaiveDate;
use dl_core::{CategoryTotals, DaySummary, DutyStatus, PlanResponse, TotalsDivergence};
use serde::Serialize;

use super::util::{format_hhmm, read_plan};

/// Summary of one day, paired with its backend divergences.
#[derive(Debug)]
pub struct DayReport {
    pub summary: DaySummary,
    pub divergences: Vec<TotalsDivergence>,
}

/// Computes per-day summaries for every day of a plan.
pub fn build_reports(plan: &PlanResponse) -> Vec<DayReport> {
    dl_core::summarize_days(&plan.day_plans)
        .into_iter()
        .zip(&plan.day_plans)
        .map(|(summary, day)| DayReport {
            divergences: dl_core::compare_upstream(&summary.totals, &day.totals),
            summary,
        })
        .collect()
}

// ========== Text Output ==========

const ROW_ORDER: [DutyStatus; 4] = [
    DutyStatus::Driving,
    DutyStatus::OnDuty,
    DutyStatus::Sleeper,
    DutyStatus::Off,
];

fn write_row(output: &mut String, label: &str, value: &str) {
    writeln!(output, "{label:<24}{value:>6}").unwrap();
}

fn format_hours(minutes: f64) -> String {
    format!("{:.1}h", minutes / 60.0)
}

/// Formats reports as human-readable text.
pub fn format_summary(reports: &[DayReport]) -> String {
    let mut output = String::new();

    writeln!(output, "DUTY LOG: {} day(s)", reports.len()).unwrap();

    if reports.is_empty() {
        writeln!(output).unwrap();
        writeln!(output, "No days in plan.").unwrap();
        return output;
    }

    for (index, report) in reports.iter().enumerate() {
        let title = format!(
            "Day {} - {}",
            index + 1,
            report.summary.date.format("%a, %b %-d, %Y")
        );
        writeln!(output).unwrap();
        writeln!(output, "{title}").unwrap();
        writeln!(output, "{}", "─".repeat(title.chars().count())).unwrap();

        let totals = &report.summary.totals;
        for status in ROW_ORDER {
            let label = format!("{} ({})", status.long_label(), status.short_label());
            write_row(&mut output, &label, &format_hhmm(totals.get(status)));
        }
        write_row(
            &mut output,
            "On-duty incl. Driving",
            &format_hhmm(totals.on_duty_incl_driving()),
        );
        write_row(
            &mut output,
            "Qualifying breaks",
            &report.summary.break_count().to_string(),
        );

        for divergence in &report.divergences {
            writeln!(
                output,
                "  ! {}: backend {}, recomputed {}",
                divergence.key,
                format_hours(divergence.upstream_minutes),
                format_hours(f64::from(divergence.computed_minutes)),
            )
            .unwrap();
        }
    }

    output
}

// ========== JSON Output ==========

#[derive(Serialize)]
struct JsonDay<'a> {
    day: usize,
    date: NaiveDate,
    totals: &'a CategoryTotals,
    on_duty_incl_driving: u32,
    breaks: usize,
    divergences: &'a [TotalsDivergence],
}

/// Formats reports as JSON.
pub fn format_summary_json(reports: &[DayReport]) -> Result<String> {
    let days: Vec<JsonDay<'_>> = reports
        .iter()
        .enumerate()
        .map(|(index, report)| JsonDay {
            day: index + 1,
            date: report.summary.date,
            totals: &report.summary.totals,
            on_duty_incl_driving: report.summary.totals.on_duty_incl_driving(),
            breaks: report.summary.break_count(),
            divergences: &report.divergences,
        })
        .collect();
    Ok(serde_json::to_string_pretty(&days)?)
}

// ========== Public Interface ==========

/// Runs the summary command.
pub fn run(input: Option<&Path>, json: bool) -> Result<()> {
    let plan = read_plan(input)?;
    let reports = build_reports(&plan);

    for report in &reports {
        for divergence in &report.divergences {
            tracing::warn!(
                date = %report.summary.date,
                key = %divergence.key,
                upstream_minutes = divergence.upstream_minutes,
                computed_minutes = divergence.computed_minutes,
                "backend totals disagree with segments"
            );
        }
    }

    if json {
        let output = format_summary_json(&reports)?;
        println!("{output}");
    } else {
        let output = format_summary(&reports);
        print!("{output}");
    }

    Ok(())
}
