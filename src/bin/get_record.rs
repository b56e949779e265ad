use lambda_runtime::{Error, LambdaEvent, run, service_fn};
use leaderboard::api::get_record;
use leaderboard::core::config::AppConfig;
use leaderboard::store::{DynamoRecordStore, dynamodb};
use serde_json::Value;

#[tokio::main]
async fn main() -> Result<(), Error> {
    leaderboard::setup_logging();

    let config = AppConfig::from_env();
    let client = dynamodb::create_client(&config).await;
    if config.dynamodb_endpoint.is_some() {
        dynamodb::ensure_record_table(&client, &config.record_table).await?;
    }

    let store = DynamoRecordStore::new(client, config.record_table);
    let store = &store;

    run(service_fn(move |event: LambdaEvent<Value>| async move {
        get_record::handler(store, event).await
    }))
    .await
}
