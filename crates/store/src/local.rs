//! A document service backed by the local filesystem
//!
//! Layout under the root directory:
//!
//! - `uploads/<doc_id>_<filename>` - the uploaded file
//! - `data/<doc_id>.json` - the [`DocumentRecord`]
//! - `exports/<doc_id>_<base>_enriched.html` - exported pages

use crate::api::{
    ApiResponse, DocumentRecord, DocumentSummary, IconRequest, IconResponse, StylesRequest,
    UploadResult,
};
use crate::backend::DocumentBackend;
use crate::docx::extract_content_bytes;
use crate::file_io::{load_record, save_record};
use crate::{Result, StoreError};
use chrono::Utc;
use doc_model::AnnotationStore;
use render_model::{html::render_document_page, render_document};
use std::path::{Path, PathBuf};
use telemetry::{ActionLogEntry, LogSink, TelemetryError, TelemetryResult};
use uuid::Uuid;

/// Largest accepted upload (16 MiB)
pub const MAX_UPLOAD_BYTES: u64 = 16 * 1024 * 1024;

/// Accepted upload extensions
pub const ALLOWED_EXTENSIONS: [&str; 2] = ["docx", "doc"];

/// Reduce a file name to a safe ASCII name without path components
pub fn secure_filename(name: &str) -> String {
    let base = name.rsplit(['/', '\\']).next().unwrap_or("");
    let cleaned: String = base
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || matches!(c, '.' | '-' | '_') {
                c
            } else {
                '_'
            }
        })
        .collect();
    cleaned.trim_matches(|c| c == '.' || c == '_').to_string()
}

fn allowed_file(filename: &str) -> bool {
    filename
        .rsplit_once('.')
        .map(|(_, ext)| ext.to_ascii_lowercase())
        .is_some_and(|ext| ALLOWED_EXTENSIONS.contains(&ext.as_str()))
}

fn valid_doc_id(doc_id: &str) -> bool {
    !doc_id.is_empty() && doc_id.chars().all(|c| c.is_ascii_alphanumeric() || c == '-')
}

/// Filesystem implementation of [`DocumentBackend`]
#[derive(Debug, Clone)]
pub struct LocalBackend {
    root: PathBuf,
}

impl LocalBackend {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn uploads_dir(&self) -> PathBuf {
        self.root.join("uploads")
    }

    fn data_dir(&self) -> PathBuf {
        self.root.join("data")
    }

    fn exports_dir(&self) -> PathBuf {
        self.root.join("exports")
    }

    fn record_path(&self, doc_id: &str) -> Result<PathBuf> {
        if !valid_doc_id(doc_id) {
            return Err(StoreError::FileNotFound(doc_id.to_string()));
        }
        Ok(self.data_dir().join(format!("{}.json", doc_id)))
    }

    async fn ensure_dirs(&self) -> Result<()> {
        for dir in [self.uploads_dir(), self.data_dir(), self.exports_dir()] {
            tokio::fs::create_dir_all(dir).await?;
        }
        Ok(())
    }

    async fn write_record(&self, record: &mut DocumentRecord) -> Result<()> {
        record.updated_at = Utc::now();
        let path = self.record_path(&record.doc_id)?;
        save_record(record, path).await
    }

    async fn read_record(&self, doc_id: &str) -> Result<DocumentRecord> {
        let path = self.record_path(doc_id)?;
        load_record(path).await.map_err(|e| match e {
            StoreError::FileNotFound(_) => StoreError::FileNotFound(doc_id.to_string()),
            other => other,
        })
    }
}

impl DocumentBackend for LocalBackend {
    async fn upload(&self, path: &Path) -> Result<UploadResult> {
        let filename = path
            .file_name()
            .and_then(|n| n.to_str())
            .map(secure_filename)
            .filter(|n| !n.is_empty())
            .ok_or_else(|| StoreError::InvalidFormat("No file selected".to_string()))?;
        if !allowed_file(&filename) {
            return Err(StoreError::InvalidFormat(
                "Only Word documents (.docx) are allowed".to_string(),
            ));
        }
        if !tokio::fs::try_exists(path).await? {
            return Err(StoreError::FileNotFound(path.display().to_string()));
        }
        let size = tokio::fs::metadata(path).await?.len();
        if size > MAX_UPLOAD_BYTES {
            return Err(StoreError::TooLarge {
                size,
                limit: MAX_UPLOAD_BYTES,
            });
        }

        self.ensure_dirs().await?;
        let doc_id = Uuid::new_v4().to_string();
        let upload_path = self.uploads_dir().join(format!("{}_{}", doc_id, filename));
        tokio::fs::copy(path, &upload_path).await?;

        let bytes = tokio::fs::read(&upload_path).await?;
        let extracted = tokio::task::spawn_blocking(move || extract_content_bytes(&bytes))
            .await
            .map_err(std::io::Error::other)?;
        let content = match extracted {
            Ok(content) => content,
            Err(e) => {
                if let Err(cleanup) = tokio::fs::remove_file(&upload_path).await {
                    tracing::warn!("Failed to remove rejected upload {}: {}", upload_path.display(), cleanup);
                }
                return Err(e.into());
            }
        };

        let mut record = DocumentRecord::new(&doc_id, &filename, content);
        self.write_record(&mut record).await?;
        tracing::info!(
            "Uploaded {} as {} ({} blocks)",
            filename,
            doc_id,
            record.content.len()
        );

        Ok(UploadResult {
            success: true,
            doc_id: Some(doc_id),
            filename: Some(filename),
            content: record.content,
            error: None,
            message: Some("Document uploaded successfully".to_string()),
        })
    }

    async fn fetch(&self, doc_id: &str) -> Result<DocumentRecord> {
        self.read_record(doc_id).await
    }

    async fn list(&self) -> Result<Vec<DocumentSummary>> {
        let data_dir = self.data_dir();
        if !tokio::fs::try_exists(&data_dir).await? {
            return Ok(Vec::new());
        }

        let mut summaries = Vec::new();
        let mut entries = tokio::fs::read_dir(&data_dir).await?;
        while let Some(entry) = entries.next_entry().await? {
            let path = entry.path();
            if path.extension().and_then(|e| e.to_str()) != Some("json") {
                continue;
            }
            match load_record(&path).await {
                Ok(record) => summaries.push(record.summary()),
                Err(e) => tracing::warn!("Skipping unreadable record {}: {}", path.display(), e),
            }
        }
        summaries.sort_by(|a, b| b.updated_at.cmp(&a.updated_at));
        Ok(summaries)
    }

    async fn delete(&self, doc_id: &str) -> Result<ApiResponse> {
        let record = self.read_record(doc_id).await?;
        tokio::fs::remove_file(self.record_path(doc_id)?).await?;

        let upload = self
            .uploads_dir()
            .join(format!("{}_{}", doc_id, record.original_filename));
        if tokio::fs::try_exists(&upload).await? {
            tokio::fs::remove_file(&upload).await?;
        }
        tracing::info!("Deleted document {}", doc_id);
        Ok(ApiResponse::ok("Document deleted successfully"))
    }

    async fn save_styles(&self, doc_id: &str, request: &StylesRequest) -> Result<ApiResponse> {
        let mut record = self.read_record(doc_id).await?;
        record.set_annotations(&request.styles)?;
        self.write_record(&mut record).await?;

        Ok(ApiResponse {
            updated_at: Some(record.updated_at),
            ..ApiResponse::ok("Styles saved successfully")
        })
    }

    async fn export(&self, doc_id: &str, request: &StylesRequest) -> Result<ApiResponse> {
        let mut record = self.read_record(doc_id).await?;
        record.set_annotations(&request.styles)?;
        self.write_record(&mut record).await?;

        let document = record.document();
        let store = AnnotationStore::from_annotations(request.styles.clone());
        let page = render_document_page(
            &record.original_filename,
            &render_document(&document, &store),
        );

        let base = record
            .original_filename
            .rsplit_once('.')
            .map_or(record.original_filename.as_str(), |(base, _)| base);
        let export_filename = format!("{}_enriched.html", base);
        tokio::fs::create_dir_all(self.exports_dir()).await?;
        let export_path = self
            .exports_dir()
            .join(format!("{}_{}", doc_id, export_filename));
        tokio::fs::write(&export_path, page).await?;
        tracing::info!("Exported {} to {}", doc_id, export_path.display());

        Ok(ApiResponse {
            export_filename: Some(export_filename),
            download_url: Some(export_path.display().to_string()),
            updated_at: Some(record.updated_at),
            ..ApiResponse::ok("Document exported successfully")
        })
    }

    async fn generate_icon(&self, request: &IconRequest) -> Result<IconResponse> {
        tracing::debug!("Icon generation requested offline: {:?}", request.description);
        Ok(IconResponse {
            success: false,
            error: Some("Icon generation is not available without a document service".to_string()),
            ..IconResponse::default()
        })
    }

    async fn log_action(&self, doc_id: &str, entry: &ActionLogEntry) -> Result<ApiResponse> {
        // Entries are re-validated as they would be when received over the wire
        let entry = ActionLogEntry::from_json(&serde_json::to_string(entry)?)
            .map_err(|e| StoreError::InvalidFormat(e.to_string()))?;

        let mut record = self.read_record(doc_id).await?;
        record.enrichment_log.push(entry);
        self.write_record(&mut record).await?;

        Ok(ApiResponse {
            log_count: Some(record.enrichment_log.len()),
            ..ApiResponse::ok("Action logged")
        })
    }
}

impl LogSink for LocalBackend {
    async fn send(&self, doc_id: &str, entry: &ActionLogEntry) -> TelemetryResult<()> {
        self.log_action(doc_id, entry)
            .await
            .map(|_| ())
            .map_err(|e| TelemetryError::Transport(e.to_string()))
    }
}
