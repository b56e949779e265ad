//! Leaderboard read handler.

use lambda_runtime::{Error, LambdaEvent};
use serde_json::Value;
use tracing::{error, info};

use super::helpers;
use crate::core::models::sort_entries;
use crate::store::LeaderboardStore;

pub use self::function_handler as handler;

/// Lambda handler for the leaderboard entrypoint. The event is ignored.
///
/// # Errors
///
/// Never fails; store errors become a 500 response.
#[tracing::instrument(level = "info", skip_all)]
pub async fn function_handler<S>(store: &S, _event: LambdaEvent<Value>) -> Result<Value, Error>
where
    S: LeaderboardStore + ?Sized,
{
    Ok(fetch_leaderboard(store).await)
}

/// Read every ordered entry and return them sorted by score, then time.
pub async fn fetch_leaderboard<S>(store: &S) -> Value
where
    S: LeaderboardStore + ?Sized,
{
    match store.query_ordered().await {
        Ok(mut entries) => {
            // Index order does not break score ties by timestamp
            sort_entries(&mut entries);
            info!(count = entries.len(), "Returning leaderboard");
            helpers::ok_json(&entries)
        }
        Err(e) => {
            error!("Failed to query leaderboard: {}", e);
            helpers::err_response(500, &format!("Server error while reading leaderboard: {e}"))
        }
    }
}
