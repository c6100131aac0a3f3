//! File I/O operations for document records

use crate::api::DocumentRecord;
use crate::{Result, StoreError};
use std::path::Path;

/// Save a record to a file
pub async fn save_record(record: &DocumentRecord, path: impl AsRef<Path>) -> Result<()> {
    let json = serde_json::to_string_pretty(record)?;
    tokio::fs::write(path, json).await?;
    Ok(())
}

/// Load a record from a file
pub async fn load_record(path: impl AsRef<Path>) -> Result<DocumentRecord> {
    let path = path.as_ref();

    if !tokio::fs::try_exists(path).await? {
        return Err(StoreError::FileNotFound(path.display().to_string()));
    }

    let json = tokio::fs::read_to_string(path).await?;
    Ok(serde_json::from_str(&json)?)
}
