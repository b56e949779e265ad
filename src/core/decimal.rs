//! Exact-decimal helpers for the storage and response boundaries.
//!
//! Leaderboard scores are kept as [`Decimal`] everywhere inside the crate.
//! They become `f64` only when a response body is serialized, through
//! [`serialize_decimal_as_f64`]. Numbers inside opaque stored records use
//! [`StoredNumber`] instead.

use std::str::FromStr;

use rust_decimal::Decimal;
use serde::{Serialize, Serializer};

/// Parse a decimal from its textual form (`"19.99"`, `"-3"`, `"1.5e3"`).
///
/// # Errors
///
/// Returns an error if the text is not a number or does not fit in a [`Decimal`].
pub fn parse_decimal(text: &str) -> Result<Decimal, rust_decimal::Error> {
    let text = text.trim();
    Decimal::from_str(text).or_else(|_| Decimal::from_scientific(text))
}

/// Serde adapter emitting a [`Decimal`] as a JSON floating-point number.
///
/// Goes through the decimal's string form so the nearest `f64` is chosen,
/// e.g. `19.99` stays `19.99`.
///
/// # Errors
///
/// Fails only if the serializer itself fails.
pub fn serialize_decimal_as_f64<S>(value: &Decimal, serializer: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    let float: f64 = value
        .to_string()
        .parse()
        .map_err(serde::ser::Error::custom)?;
    serializer.serialize_f64(float)
}

/// A number read from an opaque stored record.
///
/// Record numbers may span the full store range (1e-130 to 1e125), which
/// [`Decimal`] cannot hold, so they keep their stored text and are resolved
/// to the nearest `f64` once, when read.
#[derive(Debug, Clone, PartialEq)]
pub struct StoredNumber {
    text: String,
    value: f64,
}

impl StoredNumber {
    /// # Errors
    ///
    /// Returns an error if the text is not a finite number.
    pub fn parse(text: &str) -> Result<Self, String> {
        let text = text.trim();
        match text.parse::<f64>() {
            Ok(value) if value.is_finite() => Ok(Self {
                text: text.to_string(),
                value,
            }),
            _ => Err(format!("invalid number '{text}'")),
        }
    }

    /// The number exactly as stored.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.text
    }

    #[must_use]
    pub fn as_f64(&self) -> f64 {
        self.value
    }
}

impl From<Decimal> for StoredNumber {
    fn from(value: Decimal) -> Self {
        let text = value.to_string();
        // Decimal text always parses as a finite f64
        let value = text.parse().unwrap_or_default();
        Self { text, value }
    }
}

impl Serialize for StoredNumber {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_f64(self.value)
    }
}
