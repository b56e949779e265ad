use std::collections::BTreeMap;

use async_trait::async_trait;
use leaderboard::api::get_record::lookup_record;
use leaderboard::core::decimal::StoredNumber;
use leaderboard::core::models::{FieldValue, StoredRecord};
use leaderboard::errors::LeaderboardError;
use leaderboard::store::{InMemoryStore, RecordStore};
use rust_decimal::Decimal;
use serde_json::{Value, json};

struct FailingStore;

#[async_trait]
impl RecordStore for FailingStore {
    async fn get_record(&self, _key: &str) -> Result<Option<StoredRecord>, LeaderboardError> {
        Err(LeaderboardError::Store("AccessDeniedException".into()))
    }
}

fn event_for_key(key: &str) -> Value {
    json!({ "pathParameters": { "key": key }, "httpMethod": "GET" })
}

fn decoded_body(response: &Value) -> Value {
    serde_json::from_str(response["body"].as_str().expect("body string")).expect("json body")
}

#[tokio::test]
async fn existing_record_is_returned_verbatim() {
    let store = InMemoryStore::new();
    let record = StoredRecord::default()
        .with_field("learning_rate", FieldValue::Number(Decimal::new(5, 3).into()))
        .with_field("epochs", FieldValue::Number(Decimal::new(12, 0).into()))
        .with_field("label", FieldValue::String("baseline".into()))
        .with_field(
            "weights",
            FieldValue::Map(BTreeMap::from([(
                "bias".to_string(),
                FieldValue::Number(Decimal::new(-125, 2).into()),
            )])),
        );
    store.insert_record("model-1", record).unwrap();

    let response = lookup_record(&store, &event_for_key("model-1")).await;

    assert_eq!(response["statusCode"], 200);
    assert_eq!(response["headers"]["Access-Control-Allow-Origin"], "*");
    assert_eq!(
        decoded_body(&response),
        json!({
            "parameters": "model-1",
            "learning_rate": 0.005,
            "epochs": 12.0,
            "label": "baseline",
            "weights": { "bias": -1.25 }
        })
    );
}

#[tokio::test]
async fn record_numbers_outside_decimal_range_are_returned() {
    let store = InMemoryStore::new();
    let record = StoredRecord::default()
        .with_field("huge", FieldValue::Number(StoredNumber::parse("1e30").unwrap()))
        .with_field("tiny", FieldValue::Number(StoredNumber::parse("1e-35").unwrap()));
    store.insert_record("model-2", record).unwrap();

    let response = lookup_record(&store, &event_for_key("model-2")).await;

    assert_eq!(response["statusCode"], 200);
    let body = decoded_body(&response);
    assert_eq!(body["huge"].as_f64(), Some(1e30));
    assert_eq!(body["tiny"].as_f64(), Some(1e-35));
}

#[tokio::test]
async fn missing_path_parameter_is_rejected() {
    let store = InMemoryStore::new();
    let events = [
        json!({ "httpMethod": "GET" }),
        json!({ "httpMethod": "GET", "pathParameters": null }),
        json!({ "httpMethod": "GET", "pathParameters": { "other": "x" } }),
    ];

    for event in &events {
        let response = lookup_record(&store, event).await;
        assert_eq!(response["statusCode"], 400, "event {event} should be rejected");
        assert_eq!(response["headers"]["Access-Control-Allow-Origin"], "*");
        let message = decoded_body(&response);
        assert!(message.as_str().unwrap().starts_with("Missing model key in "));
    }
}

#[tokio::test]
async fn unknown_key_is_not_found() {
    let store = InMemoryStore::new();

    let response = lookup_record(&store, &event_for_key("nope")).await;

    assert_eq!(response["statusCode"], 404);
    assert_eq!(response["headers"]["Access-Control-Allow-Origin"], "*");
    assert_eq!(decoded_body(&response), "No record found for key nope");
}

#[tokio::test]
async fn read_failure_surfaces_as_server_error() {
    let response = lookup_record(&FailingStore, &event_for_key("model-1")).await;

    assert_eq!(response["statusCode"], 500);
    assert_eq!(
        decoded_body(&response),
        "Server error while reading record: AccessDeniedException"
    );
}
