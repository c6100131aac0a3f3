//! Wire types exchanged with the document service

use crate::{Result, StoreError};
use chrono::{DateTime, Utc};
use doc_model::{Annotation, Document, IconPayload};
use serde::{Deserialize, Serialize};
use telemetry::ActionLogEntry;

/// Where a content block came from in the uploaded document
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum BlockKind {
    Paragraph,
    TableCell,
}

/// One extracted run of plain text; becomes one paragraph of the document
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContentBlock {
    pub id: String,
    #[serde(rename = "type")]
    pub kind: BlockKind,
    pub text: String,
}

impl ContentBlock {
    pub fn new(id: impl Into<String>, kind: BlockKind, text: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            kind,
            text: text.into(),
        }
    }
}

/// Response to a document upload
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UploadResult {
    pub success: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub doc_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub filename: Option<String>,
    #[serde(default)]
    pub content: Vec<ContentBlock>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl UploadResult {
    /// Build the editable document described by a successful upload
    pub fn into_document(self) -> Result<Document> {
        if !self.success {
            return Err(StoreError::Transport(
                self.error
                    .or(self.message)
                    .unwrap_or_else(|| "upload failed".to_string()),
            ));
        }
        let doc_id = self
            .doc_id
            .ok_or_else(|| StoreError::Transport("upload response has no doc_id".to_string()))?;
        Ok(Document::from_texts(self.content.into_iter().map(|b| b.text))
            .with_identity(doc_id, self.filename.unwrap_or_default()))
    }
}

/// Body of a save-styles or export request
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StylesRequest {
    #[serde(default)]
    pub styles: Vec<Annotation>,
}

impl StylesRequest {
    pub fn new(styles: Vec<Annotation>) -> Self {
        Self { styles }
    }
}

/// Generic response of the document service
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApiResponse {
    pub success: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub export_filename: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub download_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub log_count: Option<usize>,
}

impl ApiResponse {
    pub fn ok(message: impl Into<String>) -> Self {
        Self {
            success: true,
            message: Some(message.into()),
            ..Self::default()
        }
    }

    pub fn failure(error: impl Into<String>) -> Self {
        Self {
            success: false,
            error: Some(error.into()),
            ..Self::default()
        }
    }

    /// Turn an unsuccessful response into a transport error
    pub fn into_result(self) -> Result<Self> {
        if self.success {
            Ok(self)
        } else {
            Err(StoreError::Transport(
                self.error
                    .clone()
                    .unwrap_or_else(|| "request failed".to_string()),
            ))
        }
    }
}

/// Request for a generated icon
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IconRequest {
    pub description: String,
}

/// Generated icon
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IconResponse {
    pub success: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub icon_data: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub icon_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub svg_code: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl IconResponse {
    /// Payload for icon placement; fails when the service produced no image
    pub fn into_payload(self) -> Result<IconPayload> {
        if !self.success {
            return Err(StoreError::Transport(
                self.error
                    .unwrap_or_else(|| "icon generation failed".to_string()),
            ));
        }
        if self.icon_data.is_none() && self.svg_code.is_none() {
            return Err(StoreError::Transport("icon response has no image".to_string()));
        }
        Ok(IconPayload {
            icon_name: self.icon_name.unwrap_or_else(|| "icon".to_string()),
            icon_data: self.icon_data,
            svg_code: self.svg_code,
        })
    }
}

/// Row of the document listing
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DocumentSummary {
    pub doc_id: String,
    pub filename: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Persisted state of an uploaded document
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DocumentRecord {
    pub doc_id: String,
    pub original_filename: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    #[serde(default)]
    pub content: Vec<ContentBlock>,
    /// Stored verbatim so one malformed style does not make the record unreadable
    #[serde(default)]
    pub styles: Vec<serde_json::Value>,
    #[serde(default)]
    pub enrichment_log: Vec<ActionLogEntry>,
}

impl DocumentRecord {
    pub fn new(doc_id: impl Into<String>, filename: impl Into<String>, content: Vec<ContentBlock>) -> Self {
        let now = Utc::now();
        Self {
            doc_id: doc_id.into(),
            original_filename: filename.into(),
            created_at: now,
            updated_at: now,
            content,
            styles: Vec::new(),
            enrichment_log: Vec::new(),
        }
    }

    /// The editable document, one paragraph per content block
    pub fn document(&self) -> Document {
        Document::from_texts(self.content.iter().map(|b| b.text.as_str()))
            .with_identity(self.doc_id.clone(), self.original_filename.clone())
    }

    /// Decode the stored styles, skipping any that do not parse
    pub fn annotations(&self) -> Vec<Annotation> {
        self.styles
            .iter()
            .filter_map(|value| match serde_json::from_value(value.clone()) {
                Ok(annotation) => Some(annotation),
                Err(e) => {
                    tracing::warn!("Skipping unreadable style in {}: {}", self.doc_id, e);
                    None
                }
            })
            .collect()
    }

    /// Replace the stored styles
    pub fn set_annotations(&mut self, annotations: &[Annotation]) -> Result<()> {
        self.styles = annotations
            .iter()
            .map(serde_json::to_value)
            .collect::<std::result::Result<_, _>>()?;
        Ok(())
    }

    pub fn summary(&self) -> DocumentSummary {
        DocumentSummary {
            doc_id: self.doc_id.clone(),
            filename: self.original_filename.clone(),
            created_at: self.created_at,
            updated_at: self.updated_at,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use doc_model::SpanStyle;
    use serde_json::json;

    #[test]
    fn test_upload_result_into_document() {
        let result: UploadResult = serde_json::from_value(json!({
            "success": true,
            "doc_id": "abc",
            "filename": "report.docx",
            "content": [
                {"id": "p-0", "type": "paragraph", "text": "Hello world"},
                {"id": "t-0-0-0", "type": "table-cell", "text": "Cell"}
            ],
            "message": "Document uploaded successfully"
        }))
        .unwrap();

        let document = result.into_document().unwrap();
        assert_eq!(document.doc_id(), Some("abc"));
        assert_eq!(document.len(), 2);
        assert_eq!(document.paragraph(1).unwrap().text, "Cell");
    }

    #[test]
    fn test_failed_upload_is_transport_error() {
        let result: UploadResult =
            serde_json::from_value(json!({"success": false, "error": "No file provided"})).unwrap();
        let err = result.into_document().unwrap_err();
        assert!(matches!(err, StoreError::Transport(msg) if msg == "No file provided"));
    }

    #[test]
    fn test_icon_response_wire_names() {
        let response: IconResponse = serde_json::from_value(json!({
            "success": true,
            "iconName": "rocket",
            "svgCode": "<svg></svg>"
        }))
        .unwrap();
        let payload = response.into_payload().unwrap();
        assert_eq!(payload.icon_name, "rocket");
        assert_eq!(payload.svg_code.as_deref(), Some("<svg></svg>"));

        let empty = IconResponse {
            success: true,
            ..IconResponse::default()
        };
        assert!(empty.into_payload().is_err());
    }

    #[test]
    fn test_record_skips_unreadable_styles() {
        let mut record = DocumentRecord::new("abc", "report.docx", vec![]);
        let bold = Annotation::span(SpanStyle::Bold, "#000000", 0, 0, 5, "Hello");
        record.set_annotations(std::slice::from_ref(&bold)).unwrap();
        record.styles.push(json!({"type": "sparkle", "id": "x"}));

        assert_eq!(record.annotations(), vec![bold]);
    }

    #[test]
    fn test_api_response_into_result() {
        assert!(ApiResponse::ok("Styles saved successfully").into_result().is_ok());
        let err = ApiResponse::failure("Document not found").into_result().unwrap_err();
        assert!(err.to_string().contains("Document not found"));
    }
}
