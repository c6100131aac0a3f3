//! Fire-and-forget delivery of action log entries.
//!
//! Entries are queued per document and flushed through a [`LogSink`]. A failed
//! send only affects the queue: entries that could not be delivered stay
//! queued for the next flush until they run out of attempts, and nothing is
//! ever reported back to the editing session.

use crate::action_log::ActionLogEntry;
use crate::error::{TelemetryError, TelemetryResult};
use std::time::Duration;

/// Destination for action log entries (usually the document service).
#[allow(async_fn_in_trait)]
pub trait LogSink {
    /// Deliver one entry for the given document.
    async fn send(&self, doc_id: &str, entry: &ActionLogEntry) -> TelemetryResult<()>;
}

/// Configuration for log transport.
#[derive(Debug, Clone)]
pub struct TransportConfig {
    /// Whether entries are accepted at all
    pub enabled: bool,
    /// Maximum queue size before new entries are refused
    pub max_queue_size: usize,
    /// Delivery attempts per entry before it is dropped
    pub max_attempts: u32,
    /// Time allowed for a single send
    pub send_timeout: Duration,
}

impl Default for TransportConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            max_queue_size: 1000,
            max_attempts: 3,
            send_timeout: Duration::from_secs(10),
        }
    }
}

impl TransportConfig {
    /// Set whether logging is enabled.
    pub fn with_enabled(mut self, enabled: bool) -> Self {
        self.enabled = enabled;
        self
    }

    /// Set the maximum queue size.
    pub fn with_max_queue_size(mut self, size: usize) -> Self {
        self.max_queue_size = size;
        self
    }

    /// Set the maximum delivery attempts per entry.
    pub fn with_max_attempts(mut self, attempts: u32) -> Self {
        self.max_attempts = attempts;
        self
    }

    /// Set the per-send timeout.
    pub fn with_send_timeout(mut self, timeout: Duration) -> Self {
        self.send_timeout = timeout;
        self
    }
}

#[derive(Debug, Clone)]
struct QueuedEntry {
    doc_id: String,
    entry: ActionLogEntry,
    attempts: u32,
}

/// Outcome of a flush.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FlushReport {
    /// Entries delivered
    pub sent: usize,
    /// Entries that failed and remain queued
    pub retained: usize,
    /// Entries that failed for the last time and were dropped
    pub dropped: usize,
}

/// Queue of action log entries waiting for delivery.
#[derive(Debug, Default)]
pub struct ActionLogTransport {
    config: TransportConfig,
    queue: Vec<QueuedEntry>,
    failed_send_count: u32,
}

impl ActionLogTransport {
    /// Create a new transport with default configuration.
    pub fn new() -> Self {
        Self::with_config(TransportConfig::default())
    }

    /// Create a new transport with full configuration.
    pub fn with_config(config: TransportConfig) -> Self {
        Self {
            config,
            queue: Vec::new(),
            failed_send_count: 0,
        }
    }

    /// Queue an entry for sending.
    ///
    /// Disabled transports silently accept and discard entries.
    pub fn queue(&mut self, doc_id: &str, entry: ActionLogEntry) -> TelemetryResult<()> {
        if !self.config.enabled {
            return Ok(());
        }
        if self.queue.len() >= self.config.max_queue_size {
            return Err(TelemetryError::QueueFull);
        }
        self.queue.push(QueuedEntry {
            doc_id: doc_id.to_string(),
            entry,
            attempts: 0,
        });
        Ok(())
    }

    /// Queue several entries, logging (not returning) any refusal.
    pub fn queue_all(&mut self, doc_id: &str, entries: impl IntoIterator<Item = ActionLogEntry>) {
        for entry in entries {
            if let Err(e) = self.queue(doc_id, entry) {
                tracing::warn!("Dropping action log entry: {}", e);
            }
        }
    }

    /// Get the number of queued entries.
    pub fn queued_count(&self) -> usize {
        self.queue.len()
    }

    /// Check if there are any queued entries.
    pub fn has_queued(&self) -> bool {
        !self.queue.is_empty()
    }

    /// Get the number of failed sends since creation.
    pub fn failed_send_count(&self) -> u32 {
        self.failed_send_count
    }

    /// Get the transport configuration.
    pub fn config(&self) -> &TransportConfig {
        &self.config
    }

    /// Deliver every queued entry in order.
    pub async fn flush<S: LogSink>(&mut self, sink: &S) -> FlushReport {
        let mut report = FlushReport::default();
        let pending = std::mem::take(&mut self.queue);

        for mut queued in pending {
            let sent = tokio::time::timeout(
                self.config.send_timeout,
                sink.send(&queued.doc_id, &queued.entry),
            )
            .await
            .unwrap_or_else(|_| Err(TelemetryError::Transport("send timed out".to_string())));

            match sent {
                Ok(()) => report.sent += 1,
                Err(e) => {
                    self.failed_send_count += 1;
                    queued.attempts += 1;
                    if queued.attempts >= self.config.max_attempts {
                        tracing::warn!(
                            "Dropping action log entry {} after {} attempts: {}",
                            queued.entry.log_id,
                            queued.attempts,
                            e
                        );
                        report.dropped += 1;
                    } else {
                        tracing::debug!("Failed to send action log entry {}: {}", queued.entry.log_id, e);
                        report.retained += 1;
                        self.queue.push(queued);
                    }
                }
            }
        }

        report
    }

    /// Clear all queued entries without sending.
    pub fn clear(&mut self) {
        self.queue.clear();
    }
}
