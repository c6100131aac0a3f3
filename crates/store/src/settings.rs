//! Application settings management
//!
//! This module provides settings persistence, loading, and updating
//! for the document typography tool.

use crate::Result;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Main application settings container
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct AppSettings {
    /// General application settings
    pub general: GeneralSettings,
    /// Tool defaults
    pub editing: EditingSettings,
    /// Privacy settings
    pub privacy: PrivacySettings,
}

/// General application settings
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct GeneralSettings {
    /// Number of documents shown by `list`
    pub recent_documents_count: u8,
}

impl Default for GeneralSettings {
    fn default() -> Self {
        Self {
            recent_documents_count: 20,
        }
    }
}

/// Default values for the styling tools
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct EditingSettings {
    /// Highlight color
    pub highlight_color: String,
    /// Text color
    pub text_color: String,
    /// Color for borders, circles and every other colored tool
    pub border_color: String,
    /// Callout container background
    pub callout_background: String,
    /// Value applied by the font size tool
    pub font_size: String,
    /// Value applied by the letter spacing tool
    pub letter_spacing: String,
}

impl Default for EditingSettings {
    fn default() -> Self {
        Self {
            highlight_color: "#FFEB3B".to_string(),
            text_color: "#E53935".to_string(),
            border_color: "#1976D2".to_string(),
            callout_background: "#E3F2FD".to_string(),
            font_size: "18px".to_string(),
            letter_spacing: "0.1em".to_string(),
        }
    }
}

/// Privacy settings
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct PrivacySettings {
    /// Whether annotation changes are reported to the document service
    pub action_log_enabled: bool,
}

impl Default for PrivacySettings {
    fn default() -> Self {
        Self {
            action_log_enabled: true,
        }
    }
}

/// Settings manager for loading, saving, and updating application settings
pub struct SettingsManager {
    /// Path to the settings file
    settings_path: PathBuf,
    /// Current settings (cached)
    current: AppSettings,
}

impl SettingsManager {
    /// Create a new settings manager with the given app data directory
    pub fn new(app_data_dir: PathBuf) -> Self {
        let settings_path = app_data_dir.join("settings.json");
        Self {
            settings_path,
            current: AppSettings::default(),
        }
    }

    /// Get the path to the settings file
    pub fn settings_path(&self) -> &PathBuf {
        &self.settings_path
    }

    fn parse_or_default(content: &str) -> AppSettings {
        serde_json::from_str::<AppSettings>(content).unwrap_or_else(|e| {
            tracing::warn!("Failed to parse settings file, using defaults: {}", e);
            AppSettings::default()
        })
    }

    /// Load settings from disk, or return defaults if file doesn't exist
    pub async fn load(&mut self) -> Result<&AppSettings> {
        self.current = if tokio::fs::try_exists(&self.settings_path).await? {
            let content = tokio::fs::read_to_string(&self.settings_path).await?;
            Self::parse_or_default(&content)
        } else {
            AppSettings::default()
        };
        Ok(&self.current)
    }

    /// Load settings synchronously (for use during startup)
    pub fn load_sync(&mut self) -> Result<&AppSettings> {
        self.current = if self.settings_path.exists() {
            let content = std::fs::read_to_string(&self.settings_path)?;
            Self::parse_or_default(&content)
        } else {
            AppSettings::default()
        };
        Ok(&self.current)
    }

    /// Save current settings to disk
    pub async fn save(&self) -> Result<()> {
        if let Some(parent) = self.settings_path.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }

        let content = serde_json::to_string_pretty(&self.current)?;
        tokio::fs::write(&self.settings_path, content).await?;
        Ok(())
    }

    /// Save settings synchronously
    pub fn save_sync(&self) -> Result<()> {
        if let Some(parent) = self.settings_path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let content = serde_json::to_string_pretty(&self.current)?;
        std::fs::write(&self.settings_path, content)?;
        Ok(())
    }

    /// Get current settings
    pub fn get(&self) -> &AppSettings {
        &self.current
    }

    /// Update settings and save to disk
    pub async fn update(&mut self, settings: AppSettings) -> Result<()> {
        self.current = settings;
        self.save().await
    }

    /// Update settings synchronously
    pub fn update_sync(&mut self, settings: AppSettings) -> Result<()> {
        self.current = settings;
        self.save_sync()
    }

    /// Reset settings to defaults synchronously
    pub fn reset_sync(&mut self) -> Result<&AppSettings> {
        self.current = AppSettings::default();
        self.save_sync()?;
        Ok(&self.current)
    }

    /// Update only the tool defaults
    pub async fn update_editing(&mut self, editing: EditingSettings) -> Result<()> {
        self.current.editing = editing;
        self.save().await
    }
}
