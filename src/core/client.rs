use serde::Deserialize;
use thiserror::Error;

use crate::core::models::{CheckRequest, CheckResult};

pub const DEFAULT_ENDPOINT: &str = "http://localhost:8000/rate-limit/check";

/// Substituted when an error response carries no parseable `detail`.
const GENERIC_FAILURE: &str = "Request failed";

/// What went wrong with a single check submission.
#[derive(Debug, Error)]
pub enum CheckError {
    /// The request never reached the service or no response was received.
    #[error("{0}")]
    Transport(String),
    /// The service answered with a non-2xx status.
    #[error("{detail}")]
    Service { status: u16, detail: String },
    /// A 2xx response whose body did not parse as a verdict. Surfaced like a
    /// transport failure: the parse error's description is the message.
    #[error("{0}")]
    MalformedResponse(String),
}

#[derive(Deserialize)]
struct ErrorBody {
    detail: Option<String>,
}

/// Extract the `detail` message from an error-response body, falling back to
/// a generic message when the body is empty, malformed, or missing the field.
fn service_detail(body: &str) -> String {
    serde_json::from_str::<ErrorBody>(body)
        .ok()
        .and_then(|b| b.detail)
        .unwrap_or_else(|| GENERIC_FAILURE.to_string())
}

/// Thin client for the decision service's check endpoint.
///
/// One outbound call per invocation; no retries, no deduplication, no
/// client-side timeout beyond whatever the transport enforces.
pub struct CheckClient {
    http: reqwest::Client,
    endpoint: String,
}

impl CheckClient {
    pub fn new(endpoint: impl Into<String>) -> Self {
        Self {
            http: reqwest::Client::new(),
            endpoint: endpoint.into(),
        }
    }

    /// Submit one check and parse the verdict.
    pub async fn check(&self, request: &CheckRequest) -> Result<CheckResult, CheckError> {
        let response = self
            .http
            .post(&self.endpoint)
            .json(request)
            .send()
            .await
            .map_err(|e| CheckError::Transport(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(CheckError::Service {
                status: status.as_u16(),
                detail: service_detail(&body),
            });
        }

        response
            .json::<CheckResult>()
            .await
            .map_err(|e| CheckError::MalformedResponse(e.to_string()))
    }
}
