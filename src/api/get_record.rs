//! Stored record lookup handler.

use lambda_runtime::{Error, LambdaEvent};
use serde_json::Value;
use tracing::{error, info, warn};

use super::helpers;
use super::parsing::ProxyRequest;
use crate::errors::LeaderboardError;
use crate::store::RecordStore;

pub use self::function_handler as handler;

/// Lambda handler for the record lookup entrypoint.
///
/// # Errors
///
/// Never fails; lookup problems become 400/404/500 responses.
#[tracing::instrument(level = "info", skip_all)]
pub async fn function_handler<S>(store: &S, event: LambdaEvent<Value>) -> Result<Value, Error>
where
    S: RecordStore + ?Sized,
{
    info!("GetRecord received request: {:?}", event.payload);
    Ok(lookup_record(store, &event.payload).await)
}

/// Fetch the record named by the `key` path parameter.
pub async fn lookup_record<S>(store: &S, payload: &Value) -> Value
where
    S: RecordStore + ?Sized,
{
    let key = match record_key(payload) {
        Ok(key) => key,
        Err(e) => {
            warn!("Rejected record lookup: {}", e);
            return helpers::error_response(&e);
        }
    };

    match store.get_record(&key).await {
        Ok(Some(record)) => {
            info!(key = %key, "Returning stored record");
            helpers::ok_json(&record)
        }
        Ok(None) => {
            info!(key = %key, "No stored record");
            helpers::error_response(&LeaderboardError::NotFound(format!(
                "No record found for key {key}"
            )))
        }
        Err(e) => {
            error!("Failed to read record {}: {}", key, e);
            helpers::err_response(500, &format!("Server error while reading record: {e}"))
        }
    }
}

fn record_key(payload: &Value) -> Result<String, LeaderboardError> {
    let missing = || LeaderboardError::Validation(format!("Missing model key in {payload}"));
    let request = ProxyRequest::from_event(payload).map_err(|_| missing())?;
    request
        .path_parameter("key")
        .map(ToString::to_string)
        .ok_or_else(missing)
}
