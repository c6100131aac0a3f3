//! The document service seam

use crate::api::{
    ApiResponse, DocumentRecord, DocumentSummary, IconRequest, IconResponse, StylesRequest,
    UploadResult,
};
use crate::Result;
use std::path::Path;
use telemetry::ActionLogEntry;

/// Operations the editor needs from a document service.
///
/// Failures of the service itself (unknown document, rejected upload) come
/// back as errors; a response with `success: false` is only produced for
/// features the service does not offer.
#[allow(async_fn_in_trait)]
pub trait DocumentBackend {
    /// Upload a Word document and extract its text
    async fn upload(&self, path: &Path) -> Result<UploadResult>;

    /// Fetch the stored state of a document
    async fn fetch(&self, doc_id: &str) -> Result<DocumentRecord>;

    /// List uploaded documents, most recently updated first
    async fn list(&self) -> Result<Vec<DocumentSummary>>;

    /// Delete a document and its upload
    async fn delete(&self, doc_id: &str) -> Result<ApiResponse>;

    /// Replace the stored annotations of a document
    async fn save_styles(&self, doc_id: &str, request: &StylesRequest) -> Result<ApiResponse>;

    /// Save the annotations and write a standalone HTML rendering
    async fn export(&self, doc_id: &str, request: &StylesRequest) -> Result<ApiResponse>;

    /// Generate an icon from a text description
    async fn generate_icon(&self, request: &IconRequest) -> Result<IconResponse>;

    /// Append an entry to the document's enrichment log
    async fn log_action(&self, doc_id: &str, entry: &ActionLogEntry) -> Result<ApiResponse>;
}
