//! Recently used colors, per color category
//!
//! Each category keeps at most [`MAX_RECENT_COLORS`] colors, most recent
//! first, persisted as a JSON array under the category's storage key.

use crate::Result;
use doc_model::{ColorCategory, HexColor};
use std::collections::{BTreeMap, HashMap};
use std::path::PathBuf;

/// Colors kept per category
pub const MAX_RECENT_COLORS: usize = 6;

/// String key-value persistence
pub trait KeyValueStore {
    fn get(&self, key: &str) -> Option<String>;
    fn set(&mut self, key: &str, value: String) -> Result<()>;
}

/// In-memory store, used for tests and when no data directory is available
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    values: HashMap<String, String>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Option<String> {
        self.values.get(key).cloned()
    }

    fn set(&mut self, key: &str, value: String) -> Result<()> {
        self.values.insert(key.to_string(), value);
        Ok(())
    }
}

/// Store backed by a single JSON object file
#[derive(Debug)]
pub struct FileKeyValueStore {
    path: PathBuf,
    values: BTreeMap<String, String>,
}

impl FileKeyValueStore {
    /// Open the store, reading existing values if the file is present.
    ///
    /// A corrupt file is treated as empty and overwritten on the next write.
    pub fn open(path: PathBuf) -> Result<Self> {
        let values = if path.exists() {
            let content = std::fs::read_to_string(&path)?;
            serde_json::from_str(&content).unwrap_or_else(|e| {
                tracing::warn!("Ignoring unreadable preferences file {}: {}", path.display(), e);
                BTreeMap::new()
            })
        } else {
            BTreeMap::new()
        };
        Ok(Self { path, values })
    }

    pub fn path(&self) -> &PathBuf {
        &self.path
    }
}

impl KeyValueStore for FileKeyValueStore {
    fn get(&self, key: &str) -> Option<String> {
        self.values.get(key).cloned()
    }

    fn set(&mut self, key: &str, value: String) -> Result<()> {
        self.values.insert(key.to_string(), value);
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(&self.path, serde_json::to_string_pretty(&self.values)?)?;
        Ok(())
    }
}

/// Most-recently-used colors for every category
#[derive(Debug)]
pub struct ColorHistory<S: KeyValueStore> {
    store: S,
    recent: HashMap<ColorCategory, Vec<String>>,
}

impl<S: KeyValueStore> ColorHistory<S> {
    /// Load every category from the store; unreadable entries start empty
    pub fn load(store: S) -> Self {
        let recent = ColorCategory::ALL
            .iter()
            .map(|&category| (category, Self::read(&store, category)))
            .collect();
        Self { store, recent }
    }

    fn read(store: &S, category: ColorCategory) -> Vec<String> {
        let Some(raw) = store.get(&category.storage_key()) else {
            return Vec::new();
        };
        match serde_json::from_str::<Vec<String>>(&raw) {
            Ok(colors) => {
                let mut cleaned: Vec<String> = Vec::new();
                for color in colors.iter().filter_map(|c| HexColor::parse(c).ok()) {
                    let color = color.as_str().to_string();
                    if !cleaned.contains(&color) {
                        cleaned.push(color);
                    }
                }
                cleaned.truncate(MAX_RECENT_COLORS);
                cleaned
            }
            Err(e) => {
                tracing::warn!("Resetting {} color history: {}", category.as_str(), e);
                Vec::new()
            }
        }
    }

    /// Record a color as most recent.
    ///
    /// Invalid colors are ignored and return `false`. Persistence failures
    /// are logged; the in-memory history is still updated.
    pub fn add(&mut self, category: ColorCategory, color: &str) -> bool {
        let Ok(color) = HexColor::parse(color) else {
            return false;
        };
        let color = color.as_str().to_string();

        let colors = self.recent.entry(category).or_default();
        colors.retain(|c| c != &color);
        colors.insert(0, color);
        colors.truncate(MAX_RECENT_COLORS);

        let serialized = match serde_json::to_string(colors) {
            Ok(serialized) => serialized,
            Err(e) => {
                tracing::warn!("Failed to serialize color history: {}", e);
                return true;
            }
        };
        if let Err(e) = self.store.set(&category.storage_key(), serialized) {
            tracing::warn!("Failed to persist {} color history: {}", category.as_str(), e);
        }
        true
    }

    /// Recent colors of a category, most recent first
    pub fn recent(&self, category: ColorCategory) -> &[String] {
        self.recent.get(&category).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn store(&self) -> &S {
        &self.store
    }
}
