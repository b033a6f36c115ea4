//! REST plumbing shared by the auth and profile clients.
//!
//! ERROR HANDLING
//! ==============
//! Non-success statuses become [`error::ApiError::Status`] with the body kept
//! verbatim, so callers can still read the backend's message.

pub mod error;
pub mod transport;
pub mod types;

use serde::Serialize;
use serde::de::DeserializeOwned;

use error::ApiError;
use transport::{ApiRequest, ApiResponse, ApiTransport};

/// Send and decode a JSON response body.
pub(crate) async fn send_json<T: DeserializeOwned>(
    transport: &dyn ApiTransport,
    request: ApiRequest,
) -> Result<T, ApiError> {
    let response = check_status(transport.send(request).await?)?;
    parse_json(&response.body)
}

/// Send and return the raw text body.
pub(crate) async fn send_text(transport: &dyn ApiTransport, request: ApiRequest) -> Result<String, ApiError> {
    let response = check_status(transport.send(request).await?)?;
    Ok(response.body)
}

fn check_status(response: ApiResponse) -> Result<ApiResponse, ApiError> {
    if response.is_success() {
        Ok(response)
    } else {
        Err(ApiError::Status { status: response.status, body: response.body })
    }
}

pub(crate) fn to_body<T: Serialize>(value: &T) -> Result<serde_json::Value, ApiError> {
    serde_json::to_value(value).map_err(|e| ApiError::Decode(e.to_string()))
}

pub(crate) fn parse_json<T: DeserializeOwned>(body: &str) -> Result<T, ApiError> {
    serde_json::from_str(body).map_err(|e| ApiError::Decode(e.to_string()))
}

#[cfg(test)]
pub(crate) mod mock;

#[cfg(test)]
#[path = "mod_test.rs"]
mod tests;
