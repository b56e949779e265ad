//! Response builders shared by the three handlers.
//!
//! Every response carries the open CORS header, on error paths too.

use serde::Serialize;
use serde_json::{Value, json};
use tracing::error;

use crate::errors::LeaderboardError;

fn response(status_code: u16, body: String) -> Value {
    json!({
        "statusCode": status_code,
        "headers": {
            "Access-Control-Allow-Origin": "*",
            "Content-Type": "application/json"
        },
        "body": body
    })
}

/// Returns a 200 OK response with an empty JSON object body.
#[must_use]
pub fn ok_empty() -> Value {
    response(200, "{}".to_string())
}

/// Returns a 200 OK response with `payload` encoded as the JSON body.
///
/// Falls back to a 500 if the payload cannot be encoded.
#[must_use]
pub fn ok_json<T: Serialize + ?Sized>(payload: &T) -> Value {
    match serde_json::to_string(payload) {
        Ok(body) => response(200, body),
        Err(e) => {
            error!("Failed to serialize response body: {}", e);
            err_response(500, &format!("Failed to serialize response: {e}"))
        }
    }
}

/// Returns an error response whose body is `message` as a JSON string.
#[must_use]
pub fn err_response(status_code: u16, message: &str) -> Value {
    response(status_code, Value::String(message.to_string()).to_string())
}

/// Returns the error response matching the error's kind.
#[must_use]
pub fn error_response(error: &LeaderboardError) -> Value {
    err_response(error.status_code(), &error.to_string())
}
