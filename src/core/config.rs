use std::env;

pub const DEFAULT_LEADERBOARD_TABLE: &str = "leaderboard";
pub const DEFAULT_LEADERBOARD_INDEX: &str = "order-score-index";
pub const DEFAULT_RECORD_TABLE: &str = "AR_r_bring_your_own";

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub leaderboard_table: String,
    pub leaderboard_index: String,
    pub record_table: String,
    /// Endpoint override for DynamoDB Local. Unset in deployed Lambdas.
    pub dynamodb_endpoint: Option<String>,
}

impl AppConfig {
    #[must_use]
    pub fn from_env() -> Self {
        Self {
            leaderboard_table: env::var("LEADERBOARD_TABLE")
                .unwrap_or_else(|_| DEFAULT_LEADERBOARD_TABLE.to_string()),
            leaderboard_index: env::var("LEADERBOARD_INDEX")
                .unwrap_or_else(|_| DEFAULT_LEADERBOARD_INDEX.to_string()),
            record_table: env::var("RECORD_TABLE")
                .unwrap_or_else(|_| DEFAULT_RECORD_TABLE.to_string()),
            dynamodb_endpoint: env::var("DYNAMODB_ENDPOINT")
                .ok()
                .filter(|endpoint| !endpoint.is_empty()),
        }
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            leaderboard_table: DEFAULT_LEADERBOARD_TABLE.to_string(),
            leaderboard_index: DEFAULT_LEADERBOARD_INDEX.to_string(),
            record_table: DEFAULT_RECORD_TABLE.to_string(),
            dynamodb_endpoint: None,
        }
    }
}
