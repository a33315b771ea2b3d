use serde_json::Value;

use crate::models::FieldError;
use crate::transport::{ApiError, TransportResult};

pub const GENERIC_FAILURE_MESSAGE: &str = "Request failed";

/// Maps a raw HTTP status and body onto the transport contract: the JSON
/// payload of a 2xx response, or an `ApiError` for everything else.
pub fn normalize_response(status: u16, body: &str) -> TransportResult<Value> {
    if (200..300).contains(&status) {
        return normalize_success(body);
    }

    let parsed = serde_json::from_str::<Value>(body).ok();
    let message = parsed
        .as_ref()
        .and_then(error_message)
        .unwrap_or_else(|| GENERIC_FAILURE_MESSAGE.to_string());

    Err(match status {
        400 => ApiError::Validation {
            message,
            details: parsed.as_ref().map(field_details).unwrap_or_default(),
        },
        401 | 403 => ApiError::Unauthorized { status, message },
        404 => ApiError::NotFound { message },
        _ => ApiError::Status { status, message },
    })
}

fn normalize_success(body: &str) -> TransportResult<Value> {
    if body.trim().is_empty() {
        return Ok(Value::Null);
    }

    let value: Value = serde_json::from_str(body).map_err(|_| ApiError::InvalidResponse)?;
    if value.get("success").and_then(Value::as_bool) == Some(false) {
        return Err(ApiError::Status {
            status: 200,
            message: error_message(&value).unwrap_or_else(|| GENERIC_FAILURE_MESSAGE.to_string()),
        });
    }

    Ok(value)
}

fn error_message(body: &Value) -> Option<String> {
    ["error", "message"]
        .into_iter()
        .filter_map(|key| body.get(key).and_then(Value::as_str))
        .map(str::trim)
        .find(|message| !message.is_empty())
        .map(str::to_string)
}

fn field_details(body: &Value) -> Vec<FieldError> {
    match body.get("details") {
        Some(Value::Array(entries)) => entries
            .iter()
            .filter_map(|entry| {
                let field = entry
                    .get("field")
                    .or_else(|| entry.get("path"))
                    .and_then(Value::as_str)?;
                let message = entry.get("message").and_then(Value::as_str)?;
                Some(FieldError {
                    field: field.to_string(),
                    message: message.to_string(),
                })
            })
            .collect(),
        Some(Value::Object(map)) => map
            .iter()
            .filter_map(|(field, message)| {
                Some(FieldError {
                    field: field.clone(),
                    message: message.as_str()?.to_string(),
                })
            })
            .collect(),
        _ => Vec::new(),
    }
}
