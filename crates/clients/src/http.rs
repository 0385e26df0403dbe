//! Shared request/response plumbing for the HTTP adapters.

use std::time::Duration;

use serde_json::Value;
use tracing::debug;

use smsprobe_core::error::{ProbeError, TransportError, UpstreamError};

/// Builds a reqwest client with a request timeout.
pub(crate) fn build_client(
    service: &str,
    timeout_secs: u64,
) -> Result<reqwest::Client, ProbeError> {
    reqwest::Client::builder()
        .timeout(Duration::from_secs(timeout_secs))
        .build()
        .map_err(|e| {
            TransportError::Request {
                service: service.to_owned(),
                reason: format!("failed to build http client: {e}"),
            }
            .into()
        })
}

/// Sends the request and decodes the body as JSON.
///
/// Network failures and non-success statuses are transport errors; a body
/// that is not JSON is a malformed upstream response.
pub(crate) async fn send_json(
    service: &str,
    request: reqwest::RequestBuilder,
) -> Result<Value, ProbeError> {
    let response = request.send().await.map_err(|e| TransportError::Request {
        service: service.to_owned(),
        reason: e.to_string(),
    })?;

    let status = response.status();
    let body = response.text().await.map_err(|e| TransportError::Request {
        service: service.to_owned(),
        reason: format!("failed to read response body: {e}"),
    })?;
    debug!(service, status = status.as_u16(), bytes = body.len(), "response received");

    if !status.is_success() {
        return Err(TransportError::Status {
            service: service.to_owned(),
            status: status.as_u16(),
            body,
        }
        .into());
    }

    match serde_json::from_str(&body) {
        Ok(value) => Ok(value),
        Err(e) => Err(UpstreamError::malformed(service, format!("response is not JSON: {e}"), body).into()),
    }
}

/// Renders a JSON string or number as a plain string.
///
/// Provider ids arrive as numbers in some responses and strings in others.
pub(crate) fn scalar_to_string(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

/// Reads a required scalar field, failing with a malformed-response error.
pub(crate) fn required_scalar(
    service: &str,
    object: &Value,
    field: &str,
) -> Result<String, ProbeError> {
    object
        .get(field)
        .and_then(scalar_to_string)
        .ok_or_else(|| {
            UpstreamError::malformed(service, format!("missing field '{field}'"), object.to_string())
                .into()
        })
}

/// Reads an optional scalar field. `null` counts as absent.
pub(crate) fn optional_scalar(object: &Value, field: &str) -> Option<String> {
    object.get(field).and_then(scalar_to_string)
}
