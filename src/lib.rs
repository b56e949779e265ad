//! Leaderboard - three Lambda handlers over DynamoDB for a game leaderboard.
//!
//! Each handler is deployed as its own Lambda binary behind API Gateway:
//! 1. `add-score` validates `{name, score}` and stores a new leaderboard entry
//! 2. `get-leaderboard` returns every entry sorted by score, then submission time
//! 3. `get-record` returns a stored parameter record by its `key` path parameter
//!
//! # Architecture
//!
//! The system uses:
//! - AWS Lambda for serverless execution
//! - DynamoDB for storage, behind the traits in [`store`]
//! - `rust_decimal` for exact score storage; floats appear only in response bodies
//! - Tokio for async runtime
//!
//! # Example
//!
//! ```
//! use leaderboard::api::{add_score, get_leaderboard};
//! use leaderboard::store::InMemoryStore;
//!
//! #[tokio::main]
//! async fn main() {
//!     let store = InMemoryStore::new();
//!
//!     let event = serde_json::json!({ "body": r#"{"name":"ada","score":19.99}"# });
//!     let response = add_score::submit_score(&store, &event).await;
//!     assert_eq!(response["statusCode"], 200);
//!
//!     let response = get_leaderboard::fetch_leaderboard(&store).await;
//!     println!("{}", response["body"]);
//! }
//! ```

pub mod api;
pub mod core;
pub mod errors;
pub mod store;

pub use errors::LeaderboardError;

/// Configure structured logging with JSON format for AWS Lambda environments.
///
/// This function sets up tracing-subscriber with a JSON formatter suitable for
/// `CloudWatch` Logs integration. It should be called at the start of each Lambda
/// binary. Calling it again is a no-op.
///
/// # Example
///
/// ```
/// leaderboard::setup_logging();
/// ```
pub fn setup_logging() {
    use tracing_subscriber::prelude::*;
    let fmt_layer = tracing_subscriber::fmt::layer().json().with_target(true);

    let _ = tracing_subscriber::registry().with(fmt_layer).try_init();
}
