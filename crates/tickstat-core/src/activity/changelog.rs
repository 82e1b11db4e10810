//! Changelog model and timestamp normalization.

use chrono::{DateTime, NaiveDateTime};
use serde::{Deserialize, Serialize};

use crate::error::ParseError;

/// Field name Jira uses for workflow status transitions.
pub const STATUS_FIELD: &str = "status";

/// A single field transition, flattened out of its history entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusChangeEvent {
    pub timestamp: NaiveDateTime,
    pub field: String,
    pub to_value: String,
}

impl StatusChangeEvent {
    pub fn status(timestamp: NaiveDateTime, to_value: impl Into<String>) -> Self {
        Self {
            timestamp,
            field: STATUS_FIELD.to_string(),
            to_value: to_value.into(),
        }
    }

    pub fn is_status_change(&self) -> bool {
        self.field == STATUS_FIELD
    }
}

/// Changelog as returned under `changelog` by `issue?expand=changelog`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Changelog {
    #[serde(default)]
    pub histories: Vec<History>,
}

/// One revision of a work item; every item in it shares `created`.
#[derive(Debug, Clone, Deserialize)]
pub struct History {
    pub created: String,
    #[serde(default)]
    pub items: Vec<ChangeItem>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ChangeItem {
    pub field: String,
    #[serde(rename = "toString", default)]
    pub to_string: Option<String>,
}

impl Changelog {
    /// Flatten histories into time-ordered status events.
    ///
    /// Histories whose `created` timestamp cannot be parsed are skipped with a
    /// warning; the rest of the changelog is still used. The sort is stable, so
    /// several transitions recorded in one history keep their relative order.
    pub fn status_events(&self) -> Vec<StatusChangeEvent> {
        let mut events = Vec::new();
        for history in &self.histories {
            let status_items: Vec<&ChangeItem> = history
                .items
                .iter()
                .filter(|item| item.field == STATUS_FIELD)
                .collect();
            if status_items.is_empty() {
                continue;
            }

            let timestamp = match parse_timestamp(&history.created) {
                Ok(ts) => ts,
                Err(e) => {
                    tracing::warn!("skipping changelog entry: {e}");
                    continue;
                }
            };

            for item in status_items {
                events.push(StatusChangeEvent::status(
                    timestamp,
                    item.to_string.clone().unwrap_or_default(),
                ));
            }
        }
        events.sort_by_key(|e| e.timestamp);
        events
    }
}

/// Parse a changelog timestamp and drop any UTC offset.
///
/// Accepts Jira's `2025-03-05T10:15:00.000+0000`, RFC 3339
/// (`2025-03-05T10:15:00Z`, `+01:00`) and offset-less
/// `2025-03-05T10:15:00.000`. The wall-clock time as written is kept; offsets
/// are discarded, not applied.
pub fn parse_timestamp(value: &str) -> Result<NaiveDateTime, ParseError> {
    let value = value.trim();
    if let Ok(dt) = DateTime::parse_from_str(value, "%Y-%m-%dT%H:%M:%S%.f%z") {
        return Ok(dt.naive_local());
    }
    if let Ok(dt) = DateTime::parse_from_rfc3339(value) {
        return Ok(dt.naive_local());
    }
    NaiveDateTime::parse_from_str(value, "%Y-%m-%dT%H:%M:%S%.f").map_err(|_| {
        ParseError::InvalidTimestamp {
            value: value.to_string(),
        }
    })
}
