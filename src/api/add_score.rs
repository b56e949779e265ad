//! Score submission handler.
//!
//! Validates `{name, score}`, stamps the entry with the server time, and
//! writes it to the leaderboard table.

use chrono::Utc;
use lambda_runtime::{Error, LambdaEvent};
use serde_json::Value;
use tracing::{error, info, warn};

use super::helpers;
use super::parsing::ScoreSubmission;
use crate::core::models::LeaderboardEntry;
use crate::store::LeaderboardStore;

pub use self::function_handler as handler;

/// Lambda handler for the score submission entrypoint.
///
/// # Errors
///
/// Never fails; validation and store errors become 400/500 responses.
#[tracing::instrument(level = "info", skip_all)]
pub async fn function_handler<S>(store: &S, event: LambdaEvent<Value>) -> Result<Value, Error>
where
    S: LeaderboardStore + ?Sized,
{
    info!("AddScore received request: {:?}", event.payload);
    Ok(submit_score(store, &event.payload).await)
}

/// Validate and persist one submission, returning the proxy response.
pub async fn submit_score<S>(store: &S, payload: &Value) -> Value
where
    S: LeaderboardStore + ?Sized,
{
    let submission = match ScoreSubmission::from_event(payload) {
        Ok(submission) => submission,
        Err(e) => {
            warn!("Rejected score submission: {}", e);
            return helpers::error_response(&e);
        }
    };

    let entry = LeaderboardEntry {
        name: submission.name,
        score: submission.score,
        timestamp: Utc::now().timestamp(),
    };

    match store.put_entry(&entry).await {
        Ok(()) => {
            info!(name = %entry.name, score = %entry.score, "Stored leaderboard entry");
            helpers::ok_empty()
        }
        Err(e) => {
            error!("Failed to store leaderboard entry: {}", e);
            helpers::err_response(
                500,
                &format!("Server error while updating leaderboard: {e}"),
            )
        }
    }
}
