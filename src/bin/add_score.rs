use lambda_runtime::{Error, LambdaEvent, run, service_fn};
use leaderboard::api::add_score;
use leaderboard::core::config::AppConfig;
use leaderboard::store::{DynamoLeaderboardStore, dynamodb};
use serde_json::Value;

#[tokio::main]
async fn main() -> Result<(), Error> {
    leaderboard::setup_logging();

    let config = AppConfig::from_env();
    let client = dynamodb::create_client(&config).await;
    if config.dynamodb_endpoint.is_some() {
        dynamodb::ensure_leaderboard_table(
            &client,
            &config.leaderboard_table,
            &config.leaderboard_index,
        )
        .await?;
    }

    let store = DynamoLeaderboardStore::new(
        client,
        config.leaderboard_table,
        config.leaderboard_index,
    );
    let store = &store;

    run(service_fn(move |event: LambdaEvent<Value>| async move {
        add_score::handler(store, event).await
    }))
    .await
}
