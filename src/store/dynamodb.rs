//! DynamoDB-backed stores and table provisioning.
//!
//! Table layouts:
//! - leaderboard: hash key `id` (S), GSI `order-score-index` with hash
//!   `order` (S) and range `score` (N), projecting all attributes
//! - records: hash key `parameters` (S)

use std::collections::{BTreeMap, HashMap};

use async_trait::async_trait;
use aws_config::meta::region::RegionProviderChain;
use aws_sdk_dynamodb::{
    Client,
    error::SdkError,
    operation::create_table::{CreateTableError, CreateTableOutput},
    types::{
        AttributeDefinition, AttributeValue, BillingMode, GlobalSecondaryIndex, KeySchemaElement,
        KeyType, Projection, ProjectionType, ScalarAttributeType,
    },
};
use tracing::{debug, info, warn};
use uuid::Uuid;

use super::{LeaderboardStore, RECORD_KEY_ATTRIBUTE, RecordStore};
use crate::core::config::AppConfig;
use crate::core::decimal::{StoredNumber, parse_decimal};
use crate::core::models::{FieldValue, LeaderboardEntry, ORDER_TAG, StoredRecord};
use crate::errors::LeaderboardError;

/// Build a DynamoDB client.
///
/// Uses the default AWS provider chain, or DynamoDB Local with dummy
/// credentials when `dynamodb_endpoint` is configured.
pub async fn create_client(config: &AppConfig) -> Client {
    let Some(endpoint) = &config.dynamodb_endpoint else {
        let shared_config = aws_config::from_env().load().await;
        return Client::new(&shared_config);
    };

    info!(endpoint = %endpoint, "Using DynamoDB endpoint override");
    let region = RegionProviderChain::default_provider().or_else("us-east-1");
    let shared_config = aws_config::from_env()
        .endpoint_url(endpoint)
        .region(region)
        // DynamoDB Local ignores credentials but the SDK still needs a provider
        .credentials_provider(aws_sdk_dynamodb::config::Credentials::new(
            "local", "local", None, None, "local",
        ))
        .load()
        .await;

    Client::new(&shared_config)
}

pub struct DynamoLeaderboardStore {
    client: Client,
    table_name: String,
    index_name: String,
}

impl DynamoLeaderboardStore {
    #[must_use]
    pub fn new(client: Client, table_name: String, index_name: String) -> Self {
        Self {
            client,
            table_name,
            index_name,
        }
    }
}

#[async_trait]
impl LeaderboardStore for DynamoLeaderboardStore {
    #[tracing::instrument(skip_all, level = "debug", fields(table = %self.table_name))]
    async fn put_entry(&self, entry: &LeaderboardEntry) -> Result<(), LeaderboardError> {
        self.client
            .put_item()
            .table_name(&self.table_name)
            .item("id", AttributeValue::S(Uuid::new_v4().to_string()))
            .item("name", AttributeValue::S(entry.name.clone()))
            .item("score", AttributeValue::N(entry.score.to_string()))
            .item("order", AttributeValue::S(ORDER_TAG.to_string()))
            .item("timestamp", AttributeValue::N(entry.timestamp.to_string()))
            .send()
            .await?;
        Ok(())
    }

    #[tracing::instrument(
        skip_all,
        level = "debug",
        fields(table = %self.table_name, index = %self.index_name)
    )]
    async fn query_ordered(&self) -> Result<Vec<LeaderboardEntry>, LeaderboardError> {
        let mut entries = Vec::new();
        let mut start_key: Option<HashMap<String, AttributeValue>> = None;

        loop {
            // "order" is a DynamoDB reserved word
            let output = self
                .client
                .query()
                .table_name(&self.table_name)
                .index_name(&self.index_name)
                .key_condition_expression("#order = :order")
                .expression_attribute_names("#order", "order")
                .expression_attribute_values(":order", AttributeValue::S(ORDER_TAG.to_string()))
                .scan_index_forward(true)
                .set_exclusive_start_key(start_key.take())
                .send()
                .await?;

            for item in output.items() {
                match entry_from_item(item) {
                    Ok(entry) => entries.push(entry),
                    Err(e) => warn!("Skipping malformed leaderboard item: {}", e),
                }
            }

            match output.last_evaluated_key {
                Some(key) if !key.is_empty() => start_key = Some(key),
                _ => break,
            }
        }

        debug!(count = entries.len(), "Leaderboard query complete");
        Ok(entries)
    }
}

pub struct DynamoRecordStore {
    client: Client,
    table_name: String,
}

impl DynamoRecordStore {
    #[must_use]
    pub fn new(client: Client, table_name: String) -> Self {
        Self { client, table_name }
    }
}

#[async_trait]
impl RecordStore for DynamoRecordStore {
    #[tracing::instrument(skip_all, level = "debug", fields(table = %self.table_name))]
    async fn get_record(&self, key: &str) -> Result<Option<StoredRecord>, LeaderboardError> {
        let output = self
            .client
            .get_item()
            .table_name(&self.table_name)
            .key(RECORD_KEY_ATTRIBUTE, AttributeValue::S(key.to_string()))
            .send()
            .await?;

        output.item.map(|item| record_from_item(&item)).transpose()
    }
}

// ============================================================================
// Item Conversion
// ============================================================================

fn entry_from_item(
    item: &HashMap<String, AttributeValue>,
) -> Result<LeaderboardEntry, LeaderboardError> {
    let name = item
        .get("name")
        .and_then(|v| v.as_s().ok())
        .cloned()
        .ok_or_else(|| LeaderboardError::Store("attribute 'name' missing".to_string()))?;
    let score = get_n(item, "score")?;
    let score = parse_decimal(score)
        .map_err(|e| LeaderboardError::Store(format!("invalid score '{score}': {e}")))?;
    let timestamp = get_n(item, "timestamp")?;
    let timestamp = timestamp
        .parse::<i64>()
        .map_err(|e| {
            LeaderboardError::Store(format!("invalid timestamp '{timestamp}': {e}"))
        })?;

    Ok(LeaderboardEntry {
        name,
        score,
        timestamp,
    })
}

fn get_n<'a>(
    item: &'a HashMap<String, AttributeValue>,
    key: &str,
) -> Result<&'a str, LeaderboardError> {
    item.get(key)
        .and_then(|v| v.as_n().ok())
        .map(String::as_str)
        .ok_or_else(|| LeaderboardError::Store(format!("numeric attribute '{key}' missing")))
}

fn record_from_item(
    item: &HashMap<String, AttributeValue>,
) -> Result<StoredRecord, LeaderboardError> {
    let fields = item
        .iter()
        .map(|(name, value)| Ok((name.clone(), field_from_attribute(value)?)))
        .collect::<Result<BTreeMap<_, _>, LeaderboardError>>()?;
    Ok(StoredRecord::new(fields))
}

fn field_from_attribute(value: &AttributeValue) -> Result<FieldValue, LeaderboardError> {
    let number = |text: &str| StoredNumber::parse(text).map_err(LeaderboardError::Store);

    Ok(match value {
        AttributeValue::S(s) => FieldValue::String(s.clone()),
        AttributeValue::N(n) => FieldValue::Number(number(n.as_str())?),
        AttributeValue::Bool(b) => FieldValue::Bool(*b),
        AttributeValue::Null(_) => FieldValue::Null,
        AttributeValue::L(items) => FieldValue::List(
            items
                .iter()
                .map(field_from_attribute)
                .collect::<Result<_, _>>()?,
        ),
        AttributeValue::M(fields) => FieldValue::Map(
            fields
                .iter()
                .map(|(k, v)| Ok((k.clone(), field_from_attribute(v)?)))
                .collect::<Result<_, LeaderboardError>>()?,
        ),
        AttributeValue::Ss(items) => FieldValue::StringSet(items.clone()),
        AttributeValue::Ns(items) => FieldValue::NumberSet(
            items
                .iter()
                .map(|n| number(n.as_str()))
                .collect::<Result<_, _>>()?,
        ),
        AttributeValue::B(blob) => FieldValue::Binary(blob.as_ref().to_vec()),
        AttributeValue::Bs(blobs) => {
            FieldValue::BinarySet(blobs.iter().map(|b| b.as_ref().to_vec()).collect())
        }
        other => {
            return Err(LeaderboardError::Store(format!(
                "unsupported attribute type: {other:?}"
            )));
        }
    })
}

// ============================================================================
// Table Provisioning (DynamoDB Local)
// ============================================================================

/// Create the leaderboard table and its score index if missing (idempotent).
///
/// # Errors
///
/// Returns an error if the table cannot be described or created.
pub async fn ensure_leaderboard_table(
    client: &Client,
    table_name: &str,
    index_name: &str,
) -> Result<(), LeaderboardError> {
    if table_exists(client, table_name).await? {
        return Ok(());
    }

    info!("Creating table '{}' with index '{}'", table_name, index_name);

    let index = GlobalSecondaryIndex::builder()
        .index_name(index_name)
        .key_schema(key_element("order", KeyType::Hash)?)
        .key_schema(key_element("score", KeyType::Range)?)
        .projection(
            Projection::builder()
                .projection_type(ProjectionType::All)
                .build(),
        )
        .build()?;

    let result = client
        .create_table()
        .table_name(table_name)
        .key_schema(key_element("id", KeyType::Hash)?)
        .attribute_definitions(attribute("id", ScalarAttributeType::S)?)
        .attribute_definitions(attribute("order", ScalarAttributeType::S)?)
        .attribute_definitions(attribute("score", ScalarAttributeType::N)?)
        .global_secondary_indexes(index)
        .billing_mode(BillingMode::PayPerRequest)
        .send()
        .await;

    accept_in_use(table_name, result)
}

/// Create the record table if missing (idempotent).
///
/// # Errors
///
/// Returns an error if the table cannot be described or created.
pub async fn ensure_record_table(
    client: &Client,
    table_name: &str,
) -> Result<(), LeaderboardError> {
    if table_exists(client, table_name).await? {
        return Ok(());
    }

    info!("Creating table '{}'", table_name);

    let result = client
        .create_table()
        .table_name(table_name)
        .key_schema(key_element(RECORD_KEY_ATTRIBUTE, KeyType::Hash)?)
        .attribute_definitions(attribute(RECORD_KEY_ATTRIBUTE, ScalarAttributeType::S)?)
        .billing_mode(BillingMode::PayPerRequest)
        .send()
        .await;

    accept_in_use(table_name, result)
}

async fn table_exists(client: &Client, table_name: &str) -> Result<bool, LeaderboardError> {
    match client.describe_table().table_name(table_name).send().await {
        Ok(_) => {
            debug!("Table '{}' already exists", table_name);
            Ok(true)
        }
        Err(err) => {
            let not_found = err
                .as_service_error()
                .is_some_and(|e| e.is_resource_not_found_exception());
            if not_found { Ok(false) } else { Err(err.into()) }
        }
    }
}

fn accept_in_use(
    table_name: &str,
    result: Result<CreateTableOutput, SdkError<CreateTableError>>,
) -> Result<(), LeaderboardError> {
    match result {
        Ok(_) => {
            info!("Created table '{}'", table_name);
            Ok(())
        }
        // A concurrent caller may already be creating the table
        Err(err)
            if err
                .as_service_error()
                .is_some_and(|e| e.is_resource_in_use_exception()) =>
        {
            debug!("Table '{}' is already being created", table_name);
            Ok(())
        }
        Err(err) => Err(err.into()),
    }
}

fn key_element(name: &str, key_type: KeyType) -> Result<KeySchemaElement, LeaderboardError> {
    Ok(KeySchemaElement::builder()
        .attribute_name(name)
        .key_type(key_type)
        .build()?)
}

fn attribute(
    name: &str,
    kind: ScalarAttributeType,
) -> Result<AttributeDefinition, LeaderboardError> {
    Ok(AttributeDefinition::builder()
        .attribute_name(name)
        .attribute_type(kind)
        .build()?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use aws_sdk_dynamodb::primitives::Blob;
    use rust_decimal::Decimal;

    #[test]
    fn entry_from_item_drops_storage_attributes() {
        let item = HashMap::from([
            ("id".to_string(), AttributeValue::S("abc".into())),
            ("name".to_string(), AttributeValue::S("ada".into())),
            ("score".to_string(), AttributeValue::N("19.99".into())),
            ("order".to_string(), AttributeValue::S(ORDER_TAG.into())),
            ("timestamp".to_string(), AttributeValue::N("1700000000".into())),
        ]);

        let entry = entry_from_item(&item).unwrap();
        assert_eq!(
            entry,
            LeaderboardEntry {
                name: "ada".into(),
                score: Decimal::new(1999, 2),
                timestamp: 1_700_000_000,
            }
        );
    }

    #[test]
    fn entry_from_item_rejects_missing_score() {
        let item = HashMap::from([
            ("name".to_string(), AttributeValue::S("ada".into())),
            ("timestamp".to_string(), AttributeValue::N("1".into())),
        ]);
        assert!(matches!(
            entry_from_item(&item),
            Err(LeaderboardError::Store(_))
        ));
    }

    fn num(text: &str) -> StoredNumber {
        StoredNumber::parse(text).unwrap()
    }

    #[test]
    fn record_from_item_converts_nested_attributes() {
        let item = HashMap::from([
            ("parameters".to_string(), AttributeValue::S("model".into())),
            ("rate".to_string(), AttributeValue::N("0.25".into())),
            (
                "layers".to_string(),
                AttributeValue::L(vec![AttributeValue::N("1".into()), AttributeValue::Null(true)]),
            ),
            ("raw".to_string(), AttributeValue::B(Blob::new(vec![1, 2]))),
            (
                "ids".to_string(),
                AttributeValue::Ns(vec!["4".into(), "5.5".into()]),
            ),
        ]);

        let record = record_from_item(&item).unwrap();
        assert_eq!(record.get("rate"), Some(&FieldValue::Number(num("0.25"))));
        assert_eq!(
            record.get("layers"),
            Some(&FieldValue::List(vec![FieldValue::Number(num("1")), FieldValue::Null]))
        );
        assert_eq!(record.get("raw"), Some(&FieldValue::Binary(vec![1, 2])));
        assert_eq!(
            record.get("ids"),
            Some(&FieldValue::NumberSet(vec![num("4"), num("5.5")]))
        );
    }

    #[test]
    fn record_from_item_accepts_numbers_beyond_decimal_range() {
        let item = HashMap::from([
            ("parameters".to_string(), AttributeValue::S("m".into())),
            ("huge".to_string(), AttributeValue::N("1e30".into())),
            ("tiny".to_string(), AttributeValue::N("1e-35".into())),
            (
                "wide".to_string(),
                AttributeValue::N("100000000000000000000000000000000".into()),
            ),
            (
                "extremes".to_string(),
                AttributeValue::Ns(vec!["1E+125".into(), "1E-130".into()]),
            ),
        ]);

        let record = record_from_item(&item).unwrap();
        let json = serde_json::to_value(&record).unwrap();
        assert_eq!(json["huge"].as_f64(), Some(1e30));
        assert_eq!(json["tiny"].as_f64(), Some(1e-35));
        assert_eq!(json["wide"].as_f64(), Some(1e32));
        assert_eq!(json["extremes"][0].as_f64(), Some(1e125));
        assert_eq!(json["extremes"][1].as_f64(), Some(1e-130));
    }

    #[test]
    fn record_from_item_rejects_non_numeric_number() {
        let item = HashMap::from([("v".to_string(), AttributeValue::N("NaN".into()))]);
        assert!(matches!(
            record_from_item(&item),
            Err(LeaderboardError::Store(_))
        ));
    }
}
