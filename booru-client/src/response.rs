//! Classifies raw responses and decodes their bodies.
use booru_common::ResponseFormat;
use log::debug;
use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::error::ApiError;
use crate::status;
use crate::transport::RawResponse;
use crate::xml;

/// Maps a response to its decoded body or to an error.
///
/// Only [`SUCCESS_CODES`](status::SUCCESS_CODES) count as success. `204` and empty bodies
/// decode to [`Value::Null`].
///
/// # Errors
/// [`ApiError::Http`] for any other status code and [`ApiError::Decode`] for undecodable bodies.
pub fn normalize(response: &RawResponse, format: ResponseFormat) -> Result<Value, ApiError> {
    if !status::is_success(response.status) {
        let reason = status::describe(response.status);
        debug!("{} from {}: {reason}", response.status, response.url);
        return Err(ApiError::Http {
            status_code: response.status,
            url: response.url.clone(),
            reason,
        });
    }

    if response.status == 204 || response.body.trim().is_empty() {
        return Ok(Value::Null);
    }

    match format {
        ResponseFormat::Json => decode_json(&response.body),
        ResponseFormat::Xml => xml::to_value(&response.body),
    }
}

/// # Errors
/// Returns [`ApiError::Decode`] with the position of the first error.
pub fn decode_json(body: &str) -> Result<Value, ApiError> {
    serde_json::from_str(body).map_err(json_error)
}

/// Converts an already decoded body into a caller chosen type.
///
/// # Errors
/// Returns [`ApiError::Decode`] if the value doesn't match `D`.
pub fn decode_as<D: DeserializeOwned>(value: Value) -> Result<D, ApiError> {
    serde_json::from_value(value).map_err(json_error)
}

fn json_error(error: serde_json::Error) -> ApiError {
    // serde_json reports line 0 when no position is known
    let (line, column) = match error.line() {
        0 => (None, None),
        line => (Some(line), Some(error.column())),
    };

    let message = error.to_string();
    let message = match message.rfind(" at line ") {
        Some(idx) if line.is_some() => message[..idx].to_string(),
        _ => message,
    };

    ApiError::Decode {
        message,
        line,
        column,
    }
}
