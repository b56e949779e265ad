use std::collections::BTreeMap;

use base64::{Engine, engine::general_purpose::STANDARD as BASE64};
use rust_decimal::Decimal;
use serde::ser::SerializeSeq;
use serde::{Serialize, Serializer};

use super::decimal::{StoredNumber, serialize_decimal_as_f64};

/// Partition value shared by every leaderboard entry on the score index.
pub const ORDER_TAG: &str = "ORDERED";

/// A single leaderboard submission as exposed to callers.
///
/// The storage-only `id` and `order` attributes never appear here.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LeaderboardEntry {
    pub name: String,
    #[serde(serialize_with = "serialize_decimal_as_f64")]
    pub score: Decimal,
    pub timestamp: i64,
}

/// Sort entries by score, then by submission time. Stable for full ties.
pub fn sort_entries(entries: &mut [LeaderboardEntry]) {
    entries.sort_by(|a, b| {
        a.score
            .cmp(&b.score)
            .then_with(|| a.timestamp.cmp(&b.timestamp))
    });
}

/// One attribute of an opaque stored record.
#[derive(Debug, Clone, PartialEq)]
pub enum FieldValue {
    String(String),
    Number(StoredNumber),
    Bool(bool),
    Null,
    List(Vec<FieldValue>),
    Map(BTreeMap<String, FieldValue>),
    StringSet(Vec<String>),
    NumberSet(Vec<StoredNumber>),
    Binary(Vec<u8>),
    BinarySet(Vec<Vec<u8>>),
}

impl Serialize for FieldValue {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            FieldValue::String(s) => serializer.serialize_str(s),
            FieldValue::Number(n) => n.serialize(serializer),
            FieldValue::Bool(b) => serializer.serialize_bool(*b),
            FieldValue::Null => serializer.serialize_unit(),
            FieldValue::List(items) => items.serialize(serializer),
            FieldValue::Map(fields) => fields.serialize(serializer),
            FieldValue::StringSet(items) => items.serialize(serializer),
            FieldValue::NumberSet(items) => items.serialize(serializer),
            FieldValue::Binary(bytes) => serializer.serialize_str(&BASE64.encode(bytes)),
            FieldValue::BinarySet(items) => {
                let mut seq = serializer.serialize_seq(Some(items.len()))?;
                for bytes in items {
                    seq.serialize_element(&BASE64.encode(bytes))?;
                }
                seq.end()
            }
        }
    }
}

/// A record read from the record table, passed through uninterpreted.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct StoredRecord {
    fields: BTreeMap<String, FieldValue>,
}

impl StoredRecord {
    #[must_use]
    pub fn new(fields: BTreeMap<String, FieldValue>) -> Self {
        Self { fields }
    }

    #[must_use]
    pub fn with_field(mut self, name: impl Into<String>, value: FieldValue) -> Self {
        self.fields.insert(name.into(), value);
        self
    }

    #[must_use]
    pub fn get(&self, name: &str) -> Option<&FieldValue> {
        self.fields.get(name)
    }

    #[must_use]
    pub fn fields(&self) -> &BTreeMap<String, FieldValue> {
        &self.fields
    }
}
