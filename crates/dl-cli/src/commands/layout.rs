//! Layout command: grid geometry of one day as JSON.

use std::path::Path;

use anyhow::Result;
use dl_core::{PlanResponse, build_layout};

use super::util::{read_plan, select_day};

/// Formats the layout of day `day` (1-based) as pretty JSON.
pub fn format_layout_json(plan: &PlanResponse, day: usize) -> Result<String> {
    let layout = build_layout(select_day(plan, day)?);
    Ok(serde_json::to_string_pretty(&layout)?)
}

pub fn run(input: Option<&Path>, day: usize) -> Result<()> {
    let plan = read_plan(input)?;
    println!("{}", format_layout_json(&plan, day)?);
    Ok(())
}
