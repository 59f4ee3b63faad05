//! Plan command: submits a trip to the planning backend.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;
use dl_client::Client;
use dl_core::PlanRequest;

use super::summary::{build_reports, format_summary, format_summary_json};
use super::util::parse_location;
use crate::Config;

/// Arguments for `dutylog plan`.
#[derive(Debug, Args)]
pub struct PlanArgs {
    /// Current location as "lat,lng".
    #[arg(long, allow_hyphen_values = true)]
    pub current: String,

    /// Pickup location as "lat,lng".
    #[arg(long, allow_hyphen_values = true)]
    pub pickup: String,

    /// Dropoff location as "lat,lng".
    #[arg(long, allow_hyphen_values = true)]
    pub dropoff: String,

    /// Hours already used in the current 70-hour/8-day cycle.
    #[arg(long)]
    pub cycle_used: f64,

    /// Save the full plan response as JSON.
    #[arg(long)]
    pub save: Option<PathBuf>,

    /// Print the daily totals as JSON.
    #[arg(long)]
    pub json: bool,
}

impl PlanArgs {
    /// Validates the locations and builds the backend request.
    pub fn to_request(&self) -> Result<PlanRequest> {
        let request = PlanRequest {
            current_location: parse_location(&self.current).context("invalid --current")?,
            pickup_location: parse_location(&self.pickup).context("invalid --pickup")?,
            dropoff_location: parse_location(&self.dropoff).context("invalid --dropoff")?,
            current_cycle_used_hours: self.cycle_used,
        };
        request.validate()?;
        Ok(request)
    }
}

/// Runs the plan command.
pub fn run(config: &Config, args: &PlanArgs) -> Result<()> {
    let request = args.to_request()?;
    let client = Client::new(config.api_url.as_str(), config.request_timeout())
        .context("failed to create planning client")?;

    tracing::info!(url = %client.plan_url(), "planning trip");
    let rt = tokio::runtime::Runtime::new().context("failed to create tokio runtime")?;
    let plan = rt
        .block_on(client.plan_trip(&request))
        .context("trip planning failed")?;

    if let Some(path) = &args.save {
        let json = serde_json::to_string_pretty(&plan)?;
        std::fs::write(path, json)
            .with_context(|| format!("failed to write {}", path.display()))?;
        tracing::info!(path = %path.display(), "saved plan");
    }

    let reports = build_reports(&plan);
    if args.json {
        println!("{}", format_summary_json(&reports)?);
    } else {
        print!("{}", format_summary(&reports));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(current: &str, cycle_used: f64) -> PlanArgs {
        PlanArgs {
            current: current.to_string(),
            pickup: "33.6844,73.0479".to_string(),
            dropoff: "24.8607,67.0011".to_string(),
            cycle_used,
            save: None,
            json: false,
        }
    }

    #[test]
    fn test_to_request_normalizes_locations() {
        let request = args(" 31.5204 , 74.3587 ", 12.0).to_request().unwrap();
        assert_eq!(request.current_location, "31.5204,74.3587");
        assert_eq!(request.dropoff_location, "24.8607,67.0011");
    }

    #[test]
    fn test_to_request_rejects_bad_location() {
        let err = args("Lahore", 12.0).to_request().unwrap_err();
        assert_eq!(err.to_string(), "invalid --current");
    }

    #[test]
    fn test_to_request_rejects_cycle_hours_out_of_range() {
        assert!(args("31.5204,74.3587", 71.0).to_request().is_err());
        assert!(args("31.5204,74.3587", -1.0).to_request().is_err());
    }

    #[test]
    fn test_run_reports_unreachable_backend() {
        let config = Config {
            api_url: "http://127.0.0.1:9".to_string(),
            request_timeout_secs: 1,
        };
        let err = run(&config, &args("31.5204,74.3587", 12.0)).unwrap_err();
        assert_eq!(err.to_string(), "trip planning failed");
    }
}
