//! SVG log sheet rendering.
//!
//! Draws a [`GridLayout`] as a standalone SVG document. One user unit is one
//! minute horizontally, so the document's `viewBox` matches the grid exactly.

use std::fmt;
use std::path::Path;

use anyhow::{Context, Result};
use dl_core::GridLayout;
use dl_core::layout::TOP_MARGIN;

use super::util::{read_plan, select_day};

const GRID_COLOR: &str = "#E5E7EB";
const TEXT_COLOR: &str = "#374151";
const LINE_COLOR: &str = "#2563EB";
const BREAK_COLOR: &str = "#DC2626";

/// Half-length of the vertical ticks at segment endpoints.
const END_TICK: f64 = 6.0;

/// Writes `layout` as an SVG document.
pub fn write_svg<W: fmt::Write>(out: &mut W, layout: &GridLayout) -> fmt::Result {
    let (width, height) = (layout.width, layout.height);

    writeln!(
        out,
        r#"<svg xmlns="http://www.w3.org/2000/svg" viewBox="0 0 {width} {height}" width="{width}" height="{height}">"#
    )?;
    writeln!(out, "  <title>Duty status log {}</title>", layout.date)?;
    writeln!(
        out,
        r##"  <rect x="0" y="0" width="{width}" height="{height}" fill="#FFFFFF"/>"##
    )?;

    for tick in &layout.ticks {
        let x = tick.position;
        writeln!(
            out,
            r#"  <line x1="{x}" y1="{}" x2="{x}" y2="{height}" stroke="{GRID_COLOR}" stroke-width="0.5"/>"#,
            TOP_MARGIN - 6.0
        )?;
        writeln!(
            out,
            r#"  <text x="{x}" y="{}" font-size="10" text-anchor="middle" fill="{TEXT_COLOR}">{}</text>"#,
            TOP_MARGIN - 10.0,
            tick.label
        )?;
    }

    for lane in &layout.lanes {
        writeln!(
            out,
            r#"  <line x1="0" y1="{y}" x2="{width}" y2="{y}" stroke="{GRID_COLOR}" stroke-width="0.5"/>"#,
            y = lane.divider
        )?;
        writeln!(
            out,
            r#"  <text x="4" y="{}" font-size="10" font-weight="500" fill="{TEXT_COLOR}">{}</text>"#,
            lane.center + 3.0,
            lane.label
        )?;
    }

    for segment in &layout.segments {
        let color = if segment.is_break {
            BREAK_COLOR
        } else {
            LINE_COLOR
        };
        let y = segment.lane_center;
        let (x1, x2) = (segment.start.get(), segment.end.get());
        writeln!(
            out,
            r#"  <line x1="{x1}" y1="{y}" x2="{x2}" y2="{y}" stroke="{color}" stroke-width="3" stroke-linecap="round"/>"#
        )?;
        for x in [x1, x2] {
            writeln!(
                out,
                r#"  <line x1="{x}" y1="{}" x2="{x}" y2="{}" stroke="{TEXT_COLOR}" stroke-width="1"/>"#,
                y - END_TICK,
                y + END_TICK
            )?;
        }
    }

    writeln!(out, "</svg>")
}

/// Renders `layout` to an SVG string.
pub fn render_svg(layout: &GridLayout) -> Result<String> {
    let mut svg = String::new();
    write_svg(&mut svg, layout).context("failed to render SVG")?;
    Ok(svg)
}

pub fn run(input: Option<&Path>, day: usize, output: Option<&Path>) -> Result<()> {
    let plan = read_plan(input)?;
    let layout = dl_core::build_layout(select_day(&plan, day)?);
    let svg = render_svg(&layout)?;

    match output {
        Some(path) => {
            std::fs::write(path, svg)
                .with_context(|| format!("failed to write {}", path.display()))?;
            tracing::debug!(path = %path.display(), "wrote log sheet");
        }
        None => print!("{svg}"),
    }
    Ok(())
}
