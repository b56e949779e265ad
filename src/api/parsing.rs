//! Typed views over the API Gateway proxy event.

use std::collections::HashMap;

use base64::{Engine, engine::general_purpose::STANDARD as BASE64};
use rust_decimal::Decimal;
use serde::Deserialize;
use serde_json::Value;

use crate::core::decimal::parse_decimal;
use crate::errors::LeaderboardError;

/// The parts of a proxy event the handlers read.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProxyRequest {
    #[serde(default)]
    pub body: Option<String>,
    #[serde(default)]
    pub is_base64_encoded: bool,
    #[serde(default)]
    pub path_parameters: Option<HashMap<String, String>>,
}

impl ProxyRequest {
    /// # Errors
    ///
    /// Returns a validation error if the event does not have the proxy shape.
    pub fn from_event(payload: &Value) -> Result<Self, LeaderboardError> {
        Self::deserialize(payload).map_err(|e| {
            LeaderboardError::Validation(format!("Malformed request ({e}) in {payload}"))
        })
    }

    /// Non-empty path parameter by name.
    #[must_use]
    pub fn path_parameter(&self, name: &str) -> Option<&str> {
        self.path_parameters
            .as_ref()?
            .get(name)
            .map(String::as_str)
            .filter(|value| !value.is_empty())
    }

    /// Request body as text, decoding base64 bodies.
    ///
    /// # Errors
    ///
    /// Returns a validation error if a base64 body does not decode to UTF-8.
    pub fn body_text(&self) -> Result<Option<String>, LeaderboardError> {
        let Some(body) = &self.body else {
            return Ok(None);
        };
        if !self.is_base64_encoded {
            return Ok(Some(body.clone()));
        }

        let bytes = BASE64
            .decode(body)
            .map_err(|e| LeaderboardError::Validation(format!("Invalid base64 body: {e}")))?;
        String::from_utf8(bytes)
            .map(Some)
            .map_err(|e| LeaderboardError::Validation(format!("Invalid UTF-8 body: {e}")))
    }
}

/// A validated score submission.
#[derive(Debug, Clone, PartialEq)]
pub struct ScoreSubmission {
    pub name: String,
    pub score: Decimal,
}

impl ScoreSubmission {
    /// Validate the submission carried in a proxy event body.
    ///
    /// `null` counts as absent. The score keeps the exact digits of the JSON
    /// number.
    ///
    /// # Errors
    ///
    /// Returns a validation error embedding the event when the body is
    /// missing, not a JSON object, or lacks a string `name` or numeric `score`.
    pub fn from_event(payload: &Value) -> Result<Self, LeaderboardError> {
        let invalid = |reason: &str| LeaderboardError::Validation(format!("{reason} in {payload}"));

        let request = ProxyRequest::from_event(payload)?;
        let body = request.body_text().map_err(|e| invalid(&e.to_string()))?;
        let Some(body) = body else {
            return Err(invalid("Missing score data"));
        };
        let body: Value =
            serde_json::from_str(&body).map_err(|_| invalid("Invalid score data"))?;
        // Only an object can carry named fields
        let Value::Object(mut fields) = body else {
            return Err(invalid("Missing score data"));
        };

        let mut take = |field: &str| fields.remove(field).filter(|value| !value.is_null());
        let (Some(name), Some(score)) = (take("name"), take("score")) else {
            return Err(invalid("Missing score data"));
        };
        let Value::String(name) = name else {
            return Err(invalid("Score name must be a string"));
        };
        let Value::Number(score) = score else {
            return Err(invalid("Score must be a number"));
        };
        let score = parse_decimal(&score.to_string())
            .map_err(|e| invalid(&format!("Score out of range ({e})")))?;

        Ok(Self { name, score })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn path_parameter_ignores_null_and_empty() {
        let request = ProxyRequest::from_event(&json!({ "pathParameters": null })).unwrap();
        assert_eq!(request.path_parameter("key"), None);

        let request =
            ProxyRequest::from_event(&json!({ "pathParameters": { "key": "" } })).unwrap();
        assert_eq!(request.path_parameter("key"), None);

        let request =
            ProxyRequest::from_event(&json!({ "pathParameters": { "key": "abc" } })).unwrap();
        assert_eq!(request.path_parameter("key"), Some("abc"));
    }

    #[test]
    fn decodes_base64_body() {
        let request = ProxyRequest::from_event(&json!({
            "body": "eyJuYW1lIjoiYSJ9",
            "isBase64Encoded": true
        }))
        .unwrap();
        assert_eq!(request.body_text().unwrap().as_deref(), Some(r#"{"name":"a"}"#));
    }

    #[test]
    fn submission_keeps_exact_score_digits() {
        let event = json!({ "body": r#"{"name":"ada","score":19.99}"# });
        let submission = ScoreSubmission::from_event(&event).unwrap();
        assert_eq!(submission.name, "ada");
        assert_eq!(submission.score, Decimal::new(1999, 2));
    }

    #[test]
    fn submission_rejects_non_object_bodies() {
        for body in [r#"["ada", 5]"#, "5", r#""ada""#, "null"] {
            let event = json!({ "body": body });
            match ScoreSubmission::from_event(&event) {
                Err(LeaderboardError::Validation(msg)) => {
                    assert!(msg.starts_with("Missing score data in "), "body {body}: {msg}");
                }
                other => panic!("body {body} should be rejected, got {other:?}"),
            }
        }
    }

    #[test]
    fn undecodable_body_errors_embed_the_request() {
        let event = json!({ "body": "%%%", "isBase64Encoded": true, "requestId": "req-7" });
        match ScoreSubmission::from_event(&event) {
            Err(LeaderboardError::Validation(msg)) => {
                assert!(msg.starts_with("Invalid base64 body"));
                assert!(msg.contains("req-7"));
            }
            other => panic!("expected validation error, got {other:?}"),
        }

        // 0xFF is never valid UTF-8
        let event = json!({ "body": "/w==", "isBase64Encoded": true, "requestId": "req-8" });
        match ScoreSubmission::from_event(&event) {
            Err(LeaderboardError::Validation(msg)) => {
                assert!(msg.starts_with("Invalid UTF-8 body"));
                assert!(msg.contains("req-8"));
            }
            other => panic!("expected validation error, got {other:?}"),
        }
    }

    #[test]
    fn submission_rejects_wrong_types() {
        let event = json!({ "body": r#"{"name":7,"score":1}"# });
        assert!(matches!(
            ScoreSubmission::from_event(&event),
            Err(LeaderboardError::Validation(_))
        ));

        let event = json!({ "body": r#"{"name":"a","score":"high"}"# });
        assert!(matches!(
            ScoreSubmission::from_event(&event),
            Err(LeaderboardError::Validation(_))
        ));

        let event = json!({ "body": "not json" });
        assert!(matches!(
            ScoreSubmission::from_event(&event),
            Err(LeaderboardError::Validation(_))
        ));
    }
}
