//! Action Log
//!
//! This crate records the annotation mutations a user performs (add, delete,
//! clear) as enrichment log entries and delivers them to the document service
//! on a best-effort basis.
//!
//! Logging is fire-and-forget: the editing session only produces entries, and
//! a failed delivery never feeds back into the in-memory annotation state.
//!
//! # Modules
//!
//! - [`action_log`] - Log entry types
//! - [`transport`] - Queued delivery through a [`LogSink`]
//! - [`error`] - Error types

pub mod action_log;
mod error;
pub mod transport;

pub use action_log::{ActionLogEntry, LogAction, LoggedStyle};
pub use error::{TelemetryError, TelemetryResult};
pub use transport::{ActionLogTransport, FlushReport, LogSink, TransportConfig};
