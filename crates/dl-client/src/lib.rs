//! Trip planning backend client.
//!
//! Submits a [`PlanRequest`] to `POST {base_url}/api/plan` and returns the
//! day plans and route geometry the backend computed.

use std::fmt;
use std::time::Duration;

use dl_core::{PlanRequest, PlanRequestError, PlanResponse};
use serde::Deserialize;
use thiserror::Error;

/// Default request timeout for planning calls.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(20);
const PLAN_PATH: &str = "/api/plan";

/// Planning client errors.
#[derive(Debug, Error)]
pub enum ClientError {
    /// The configured backend URL was unusable.
    #[error("invalid backend URL: {reason}")]
    InvalidBaseUrl { reason: &'static str },
    /// Failed to build HTTP client.
    #[error("failed to build HTTP client: {0}")]
    ClientBuild(#[source] reqwest::Error),
    /// The request was rejected before sending.
    #[error("invalid plan request: {0}")]
    InvalidRequest(#[from] PlanRequestError),
    /// HTTP request failed.
    #[error("request failed: {0}")]
    Request(#[from] reqwest::Error),
    /// Backend answered with a non-success status.
    #[error("Planning failed ({status}): {message}")]
    Planning { status: u16, message: String },
    /// Failed to parse response.
    #[error("invalid response: {0}")]
    InvalidResponse(String),
}

/// Planning backend client.
///
/// # Thread Safety
///
/// The client is safe to clone and share across threads. Each clone shares
/// the underlying HTTP connection pool.
#[derive(Clone)]
pub struct Client {
    http: reqwest::Client,
    base_url: String,
}

impl fmt::Debug for Client {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Client")
            .field("base_url", &self.base_url)
            .finish_non_exhaustive()
    }
}

impl Client {
    /// Creates a client for the backend at `base_url`.
    ///
    /// # Errors
    ///
    /// Returns an error if the URL is empty or not http(s), or if the HTTP
    /// client fails to build.
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Result<Self, ClientError> {
        let base_url = base_url.into().trim().trim_end_matches('/').to_string();

        if base_url.is_empty() {
            return Err(ClientError::InvalidBaseUrl {
                reason: "backend URL cannot be empty",
            });
        }
        if !(base_url.starts_with("http://") || base_url.starts_with("https://")) {
            return Err(ClientError::InvalidBaseUrl {
                reason: "backend URL must start with http:// or https://",
            });
        }

        let http = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(ClientError::ClientBuild)?;

        Ok(Self { http, base_url })
    }

    pub fn plan_url(&self) -> String {
        format!("{}{PLAN_PATH}", self.base_url)
    }

    /// Plans a trip.
    pub async fn plan_trip(&self, request: &PlanRequest) -> Result<PlanResponse, ClientError> {
        request.validate()?;

        let url = self.plan_url();
        tracing::debug!(%url, "submitting plan request");
        let response = self.http.post(&url).json(request).send().await?;

        let status = response.status();
        if !status.is_success() {
            // An unreadable error body should not hide the status code.
            let body = response.text().await.unwrap_or_default();
            return Err(ClientError::Planning {
                status: status.as_u16(),
                message: parse_api_error(&body).unwrap_or(body),
            });
        }

        let body = response.text().await?;
        let plan = parse_plan_response(&body)?;
        tracing::debug!(days = plan.day_plans.len(), "received plan");
        Ok(plan)
    }
}

fn parse_plan_response(body: &str) -> Result<PlanResponse, ClientError> {
    serde_json::from_str(body).map_err(|err| ClientError::InvalidResponse(err.to_string()))
}

/// Extracts `detail` from a backend error payload.
fn parse_api_error(body: &str) -> Option<String> {
    #[derive(Deserialize)]
    struct ErrorPayload {
        detail: String,
    }

    serde_json::from_str::<ErrorPayload>(body)
        .ok()
        .map(|payload| payload.detail)
}
