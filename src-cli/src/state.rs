//! Application state management

use anyhow::Result;
use edit_engine::{EditingSession, ToolPalette};
use std::path::PathBuf;
use store::{ColorHistory, EditingSettings, FileKeyValueStore, LocalBackend, SettingsManager};
use telemetry::{ActionLogTransport, FlushReport, TransportConfig};

/// Everything the driver keeps between commands
pub struct AppState {
    /// Persisted settings
    pub settings: SettingsManager,
    /// Document service
    pub backend: LocalBackend,
    /// Recently used colors
    pub colors: ColorHistory<FileKeyValueStore>,
    /// Outgoing action log
    pub transport: ActionLogTransport,
}

impl AppState {
    /// Open (or create) the data directory
    pub async fn open(data_dir: PathBuf) -> Result<Self> {
        tracing::info!("Data directory: {:?}", data_dir);

        let mut settings = SettingsManager::new(data_dir.clone());
        settings.load().await?;

        let colors = ColorHistory::load(FileKeyValueStore::open(data_dir.join("preferences.json"))?);
        let transport = ActionLogTransport::with_config(
            TransportConfig::default().with_enabled(settings.get().privacy.action_log_enabled),
        );

        Ok(Self {
            settings,
            backend: LocalBackend::new(data_dir),
            colors,
            transport,
        })
    }

    /// A fresh editing session using the configured tool defaults
    pub fn new_session(&self) -> EditingSession {
        EditingSession::with_palette(palette_from_settings(&self.settings.get().editing))
    }

    /// Send everything the session logged since the last flush
    pub async fn flush_action_log(&mut self, session: &mut EditingSession) -> FlushReport {
        let entries = session.drain_action_log();
        let Some(doc_id) = session.document().doc_id() else {
            return FlushReport::default();
        };
        self.transport.queue_all(doc_id, entries);
        let report = self.transport.flush(&self.backend).await;
        if report.retained > 0 || report.dropped > 0 {
            tracing::debug!("Action log flush: {:?}", report);
        }
        report
    }
}

/// Build a tool palette from the configured defaults.
///
/// Values that fail validation leave the built-in default in place.
pub fn palette_from_settings(editing: &EditingSettings) -> ToolPalette {
    use doc_model::ColorCategory;

    let mut palette = ToolPalette::default();
    let accepted = [
        palette.set_color(ColorCategory::Background, &editing.highlight_color),
        palette.set_color(ColorCategory::Text, &editing.text_color),
        palette.set_color(ColorCategory::Border, &editing.border_color),
        palette.set_callout_background(&editing.callout_background),
        palette.set_font_size(&editing.font_size),
        palette.set_letter_spacing(&editing.letter_spacing),
    ];
    if accepted.contains(&false) {
        tracing::warn!("Some tool defaults in settings are invalid and were ignored");
    }
    palette
}
