//! Workflow records returned by the service.
//!
//! Field names are matched case-insensitively and `null` is read as the
//! field's default.

use crate::constants::status;
use serde::{Deserialize, Deserializer};
use serde_json::Value;

/// Human-readable name of a remote workflow status.
pub fn status_name(code: i64) -> Option<&'static str> {
    match code {
        status::QUEUED => Some("Queued"),
        status::IN_PROGRESS => Some("In progress"),
        status::SUCCEEDED => Some("Completed successfully"),
        status::FAILED => Some("Failed"),
        status::CANCEL_REQUESTED => Some("Cancellation requested"),
        status::CANCELLED => Some("Cancelled"),
        _ => None,
    }
}

fn integer<'de, D>(deserializer: D) -> Result<i64, D::Error>
where
    D: Deserializer<'de>,
{
    use serde::de::Error;
    match Value::deserialize(deserializer)? {
        Value::Null => Ok(0),
        Value::Number(n) => n
            .as_i64()
            .ok_or_else(|| D::Error::custom(format!("{n} is not an integer"))),
        Value::String(s) if s.trim().is_empty() => Ok(0),
        Value::String(s) => s
            .trim()
            .parse()
            .map_err(|_| D::Error::custom(format!("'{s}' is not an integer"))),
        other => Err(D::Error::custom(format!("expected an integer, got {other}"))),
    }
}

fn count<'de, D>(deserializer: D) -> Result<Option<u64>, D::Error>
where
    D: Deserializer<'de>,
{
    use serde::de::Error;
    match Value::deserialize(deserializer)? {
        Value::Null => Ok(None),
        Value::Number(n) => n
            .as_u64()
            .map(Some)
            .ok_or_else(|| D::Error::custom(format!("{n} is not a count"))),
        Value::String(s) if s.trim().is_empty() => Ok(None),
        Value::String(s) => s
            .trim()
            .parse()
            .map(Some)
            .map_err(|_| D::Error::custom(format!("'{s}' is not a count"))),
        other => Err(D::Error::custom(format!("expected a count, got {other}"))),
    }
}

fn text<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Value::deserialize(deserializer)? {
        Value::Null => String::new(),
        Value::String(s) => s,
        other => other.to_string(),
    })
}

fn optional_text<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Some(text(deserializer)?).filter(|s| !s.is_empty()))
}

/// One workflow as reported by the service.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct WorkflowRecord {
    /// Workflow identifier; 0 when unknown.
    #[serde(rename = "id", deserialize_with = "integer")]
    pub id: i64,
    /// Remote status code; 0 when unknown.
    #[serde(rename = "status", deserialize_with = "integer")]
    pub status: i64,
    /// Service message.
    #[serde(rename = "message", deserialize_with = "text")]
    pub message: String,
    /// Process name.
    #[serde(rename = "process", deserialize_with = "text")]
    pub process: String,
    /// Description.
    #[serde(rename = "description", deserialize_with = "text")]
    pub description: String,
    /// Creation time, `YYYY-MM-DDTHH:MM:SS[.fff]` in UTC.
    #[serde(rename = "createddate", deserialize_with = "optional_text")]
    pub created_date: Option<String>,
    /// Completion time, same format; absent while running.
    #[serde(rename = "enddate", deserialize_with = "optional_text")]
    pub end_date: Option<String>,
    /// Number of bases processed.
    #[serde(rename = "basesprocessed", deserialize_with = "count")]
    pub bases_processed: Option<u64>,
}

impl WorkflowRecord {
    /// Record carrying only a message.
    pub fn with_message(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            ..Self::default()
        }
    }

    /// Build a record from a JSON object, ignoring key case.
    pub fn from_value(value: Value) -> Option<Self> {
        let Value::Object(map) = value else {
            return None;
        };
        let lowered: serde_json::Map<String, Value> = map
            .into_iter()
            .map(|(key, value)| (key.to_lowercase(), value))
            .collect();
        serde_json::from_value(Value::Object(lowered)).ok()
    }

    /// Interpret a response to a single-workflow call.
    ///
    /// Responses in `[200, 500)` are parsed; unparseable content yields a
    /// record explaining so. Anything else is reported as a server error.
    pub fn from_response(status: u16, body: &str) -> Self {
        if !(200..500).contains(&status) {
            return Self::with_message(format!("{status}: Internal server error"));
        }
        serde_json::from_str(body)
            .ok()
            .and_then(Self::from_value)
            .unwrap_or_else(|| Self::with_message("Invalid response content"))
    }

    /// Name of the record's status.
    pub fn status_name(&self) -> Option<&'static str> {
        status_name(self.status)
    }
}

/// Payload of a list call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ListPayload {
    /// The workflows, in the order the service returned them.
    Records(Vec<WorkflowRecord>),
    /// Anything other than a list; carries the service message or raw text.
    Rejected(String),
}

impl ListPayload {
    /// Interpret a list response body.
    pub fn from_body(body: &str) -> Self {
        match serde_json::from_str::<Value>(body) {
            Ok(Value::Array(items)) => Self::Records(
                items
                    .into_iter()
                    .map(|item| WorkflowRecord::from_value(item).unwrap_or_default())
                    .collect(),
            ),
            Ok(Value::Object(map)) => {
                let message = map
                    .iter()
                    .find(|(key, _)| key.eq_ignore_ascii_case("message"))
                    .map(|(_, value)| match value {
                        Value::String(s) => s.clone(),
                        other => other.to_string(),
                    });
                Self::Rejected(message.unwrap_or_else(|| Value::Object(map.clone()).to_string()))
            }
            Ok(other) => Self::Rejected(other.to_string()),
            Err(_) => Self::Rejected(body.to_string()),
        }
    }
}
