//! Action log entries recorded for every annotation mutation.

use chrono::{DateTime, Utc};
use doc_model::{Annotation, AnnotationId};
use serde::{Deserialize, Serialize};

use crate::error::{TelemetryError, TelemetryResult};

/// Kind of mutation being logged.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum LogAction {
    /// An annotation was added
    Add,
    /// An annotation was deleted
    Delete,
    /// All annotations were cleared
    Clear,
}

impl std::fmt::Display for LogAction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LogAction::Add => write!(f, "add"),
            LogAction::Delete => write!(f, "delete"),
            LogAction::Clear => write!(f, "clear"),
        }
    }
}

/// Trimmed copy of an annotation for the log (no icon payloads).
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct LoggedStyle {
    pub id: String,
    #[serde(rename = "type")]
    pub kind: String,
    pub text: String,
    pub color: String,
    pub para_index: usize,
    pub start_offset: usize,
    pub end_offset: usize,
}

impl From<&Annotation> for LoggedStyle {
    fn from(annotation: &Annotation) -> Self {
        Self {
            id: annotation.id.to_string(),
            kind: annotation.annotation_type().as_str().to_string(),
            text: annotation.text.clone(),
            color: annotation.value().to_string(),
            para_index: annotation.para_index,
            start_offset: annotation.start_offset,
            end_offset: annotation.end_offset,
        }
    }
}

/// One entry of the enrichment log.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ActionLogEntry {
    /// Unique identifier for this entry
    pub log_id: String,
    /// What happened
    pub action: LogAction,
    /// When it happened
    pub timestamp: DateTime<Utc>,
    /// The affected annotation, for add and delete
    pub style: Option<LoggedStyle>,
    /// Number of annotations removed, for clear
    pub styles_cleared: Option<usize>,
}

impl ActionLogEntry {
    fn new(action: LogAction, style: Option<LoggedStyle>, styles_cleared: Option<usize>) -> Self {
        Self {
            log_id: AnnotationId::with_prefix("log").to_string(),
            action,
            timestamp: Utc::now(),
            style,
            styles_cleared,
        }
    }

    /// Entry for an added annotation.
    pub fn added(annotation: &Annotation) -> Self {
        Self::new(LogAction::Add, Some(annotation.into()), None)
    }

    /// Entry for a deleted annotation.
    pub fn deleted(annotation: &Annotation) -> Self {
        Self::new(LogAction::Delete, Some(annotation.into()), None)
    }

    /// Entry for a clear-all.
    pub fn cleared(count: usize) -> Self {
        Self::new(LogAction::Clear, None, Some(count))
    }

    /// Parse and validate an entry received from a client.
    ///
    /// The entry must carry an `action` of add/delete/clear and a timestamp.
    pub fn from_json(json: &str) -> TelemetryResult<Self> {
        let value: serde_json::Value = serde_json::from_str(json)?;
        for field in ["action", "timestamp"] {
            if value.get(field).is_none() {
                return Err(TelemetryError::InvalidEntry(format!("missing '{}'", field)));
            }
        }
        serde_json::from_value(value).map_err(|e| TelemetryError::InvalidEntry(e.to_string()))
    }
}
