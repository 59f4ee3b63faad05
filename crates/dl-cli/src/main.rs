use anyhow::{Context, Result};
use clap::Parser;
use tracing_subscriber::EnvFilter;

use dl_cli::commands::{layout, plan, route, summary, svg};
use dl_cli::{Cli, Commands, Config};

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize tracing with verbose flag support
    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::from_default_env()
    };
    // Use try_init to avoid panic if tracing is already initialized (e.g., in tests)
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();

    match &cli.command {
        Some(Commands::Plan(args)) => {
            let config =
                Config::load_from(cli.config.as_deref()).context("failed to load configuration")?;
            tracing::debug!(?config, "loaded configuration");
            plan::run(&config, args)?;
        }
        Some(Commands::Summary { input, json }) => {
            summary::run(input.as_deref(), *json)?;
        }
        Some(Commands::Layout { input, day }) => {
            layout::run(input.as_deref(), *day)?;
        }
        Some(Commands::Svg { input, day, output }) => {
            svg::run(input.as_deref(), *day, output.as_deref())?;
        }
        Some(Commands::Route { input, json }) => {
            route::run(input.as_deref(), *json)?;
        }
        None => {
            // No subcommand, show help
            use clap::CommandFactory;
            Cli::command().print_help()?;
            println!();
        }
    }

    Ok(())
}
