//! Status document data structures

use crate::card::DisplayZone;
use crate::errors::{DashboardError, Result};
use chrono::{DateTime, NaiveDate, NaiveDateTime, TimeZone, Utc};
use serde::Deserialize;
use serde_json::{Map, Number, Value};

/// One monitored service's current status, as written by the pinger
#[derive(Clone, Debug, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct StatusRecord {
    pub description: String,
    pub is_up: bool,
    pub time: Timestamp,
    pub url: String,
    pub ping_times: Vec<PingAttempt>,
}

/// A single ping attempt. Only `responseTime` is read by the dashboard.
#[derive(Clone, Debug, Default, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct PingAttempt {
    #[serde(default)]
    pub response_time: Option<Number>,
}

/// Last-check time, either epoch milliseconds or an ISO 8601 string
#[derive(Clone, Debug, Deserialize, PartialEq)]
#[serde(untagged)]
pub enum Timestamp {
    Millis(f64),
    Text(String),
}

impl Timestamp {
    /// Resolve to an instant. Strings without an offset are read in `zone`.
    pub fn resolve(&self, zone: &DisplayZone) -> Option<DateTime<Utc>> {
        match self {
            Timestamp::Millis(ms) => {
                if !ms.is_finite() {
                    return None;
                }
                Utc.timestamp_millis_opt(ms.trunc() as i64).single()
            }
            Timestamp::Text(text) => {
                let text = text.trim();
                if let Ok(parsed) = DateTime::parse_from_rfc3339(text) {
                    return Some(parsed.with_timezone(&Utc));
                }

                if let Some(parsed) = [
                    "%Y-%m-%d %H:%M:%S%:z",
                    "%Y-%m-%d %H:%M:%S%.f%:z",
                    "%Y-%m-%dT%H:%M%:z",
                    "%Y-%m-%d %H:%M%:z",
                ]
                .iter()
                .find_map(|fmt| DateTime::parse_from_str(text, fmt).ok())
                {
                    return Some(parsed.with_timezone(&Utc));
                }

                // Date-only strings are UTC midnight
                if let Ok(date) = NaiveDate::parse_from_str(text, "%Y-%m-%d") {
                    return date
                        .and_hms_opt(0, 0, 0)
                        .map(|midnight| Utc.from_utc_datetime(&midnight));
                }

                [
                    "%Y-%m-%dT%H:%M:%S",
                    "%Y-%m-%dT%H:%M:%S%.f",
                    "%Y-%m-%d %H:%M:%S",
                    "%Y-%m-%d %H:%M:%S%.f",
                    "%Y-%m-%dT%H:%M",
                    "%Y-%m-%d %H:%M",
                ]
                .iter()
                .find_map(|fmt| NaiveDateTime::parse_from_str(text, fmt).ok())
                .and_then(|naive| zone.from_local(&naive))
            }
        }
    }
}

impl StatusRecord {
    /// Validate a raw JSON record into a typed one
    pub fn from_value(service_id: &str, value: &Value) -> Result<Self> {
        StatusRecord::deserialize(value)
            .map_err(|e| DashboardError::shape(service_id, e.to_string()))
    }

    /// The attempt the dashboard displays
    pub fn first_ping(&self, service_id: &str) -> Result<&PingAttempt> {
        self.ping_times
            .first()
            .ok_or_else(|| DashboardError::shape(service_id, "pingTimes is empty"))
    }
}

/// Service id to raw record.
///
/// Iteration follows object property order: array-index keys ("0", "2",
/// "10") ascending by value first, then every other key in document order.
#[derive(Clone, Debug, Default)]
pub struct StatusCollection {
    records: Map<String, Value>,
}

impl StatusCollection {
    /// Parse a fetched body. Records themselves are validated later, one at a time.
    pub fn from_slice(body: &[u8]) -> Result<Self> {
        let value: Value = serde_json::from_slice(body)?;

        match value {
            Value::Object(records) => Ok(Self { records }),
            other => Err(DashboardError::NotACollection(describe_json(&other).to_string())),
        }
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn service_ids(&self) -> impl Iterator<Item = &str> {
        self.iter().map(|(id, _)| id)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        let mut entries: Vec<(&str, &Value)> = self
            .records
            .iter()
            .map(|(id, value)| (id.as_str(), value))
            .collect();

        // Stable, so non-index keys keep their document order
        entries.sort_by_key(|(id, _)| match array_index(id) {
            Some(index) => (0, index),
            None => (1, 0),
        });

        entries.into_iter()
    }
}

/// Canonical array index: no sign, no leading zero, below 2^32 - 1
fn array_index(key: &str) -> Option<u32> {
    if key.is_empty() || !key.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    if key.len() > 1 && key.starts_with('0') {
        return None;
    }

    key.parse::<u32>().ok().filter(|index| *index != u32::MAX)
}

fn describe_json(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
