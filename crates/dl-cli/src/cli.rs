//! Command-line argument definitions.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

use crate::commands::plan::PlanArgs;

/// Driver duty-status log sheets.
///
/// Plans trips with the planning backend and turns each day's duty-status
/// segments into totals, grid geometry and SVG log sheets.
#[derive(Debug, Parser)]
#[command(name = "dutylog", version, about, long_about = None)]
pub struct Cli {
    /// Enable verbose output.
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Path to config file.
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Available subcommands.
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Plan a trip with the backend and print the daily totals.
    Plan(PlanArgs),

    /// Print per-day duty-status totals for a saved plan.
    Summary {
        /// Plan JSON file. Reads stdin when omitted or `-`.
        input: Option<PathBuf>,

        /// Output as JSON.
        #[arg(long)]
        json: bool,
    },

    /// Print the grid geometry of one day as JSON.
    Layout {
        /// Plan JSON file. Reads stdin when omitted or `-`.
        input: Option<PathBuf>,

        /// Day number, starting at 1.
        #[arg(long, default_value_t = 1)]
        day: usize,
    },

    /// Render one day as an SVG log sheet.
    Svg {
        /// Plan JSON file. Reads stdin when omitted or `-`.
        input: Option<PathBuf>,

        /// Day number, starting at 1.
        #[arg(long, default_value_t = 1)]
        day: usize,

        /// Write the SVG here instead of stdout.
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Print the route's start, end and bounding box.
    Route {
        /// Plan JSON file. Reads stdin when omitted or `-`.
        input: Option<PathBuf>,

        /// Output as JSON.
        #[arg(long)]
        json: bool,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn verify_cli() {
        use clap::CommandFactory;
        Cli::command().debug_assert();
    }

    #[test]
    fn parses_svg_with_day_and_output() {
        let cli = Cli::try_parse_from(["dutylog", "svg", "plan.json", "--day", "2", "-o", "day2.svg"])
            .unwrap();
        match cli.command {
            Some(Commands::Svg { input, day, output }) => {
                assert_eq!(input, Some(PathBuf::from("plan.json")));
                assert_eq!(day, 2);
                assert_eq!(output, Some(PathBuf::from("day2.svg")));
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn parses_plan_arguments() {
        let cli = Cli::try_parse_from([
            "dutylog",
            "plan",
            "--current",
            "31.52,74.35",
            "--pickup",
            "33.68,73.04",
            "--dropoff",
            "24.86,67.00",
            "--cycle-used",
            "12.5",
        ])
        .unwrap();
        let Some(Commands::Plan(args)) = cli.command else {
            panic!("expected plan command");
        };
        assert_eq!(args.current, "31.52,74.35");
        assert!((args.cycle_used - 12.5).abs() < f64::EPSILON);
        assert!(!args.json);
    }
}
