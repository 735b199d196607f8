//! Audit event log for symlock.
//!
//! When `event_log` is configured, CLI commands append one event per line
//! (NDJSON) describing what happened to a lock. The library core never writes
//! events itself.
//!
//! # Event Format
//!
//! Each event is a JSON object with the following fields:
//! - `ts`: RFC3339 timestamp
//! - `action`: What happened (acquire, contended, release, clear, run)
//! - `actor`: The owner string (e.g., `user@HOST`)
//! - `lock`: The lock path
//! - `details`: Freeform object with action-specific details
//!
//! # Usage
//!
//! ```no_run
//! use symlock::events::{Event, EventAction, append_event};
//! use serde_json::json;
//! use std::path::Path;
//!
//! let event = Event::new(EventAction::Acquire, Path::new("/tmp/x.lock"))
//!     .with_details(json!({"owner": 1234}));
//! append_event(Path::new("/tmp/symlock.ndjson"), &event)?;
//! # Ok::<(), symlock::error::SymlockError>(())
//! ```

use crate::error::{Result, SymlockError};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};

/// Actions that can be logged as events.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EventAction {
    /// Lock acquired (possibly after reclaiming stale markers)
    Acquire,
    /// Acquisition refused because a live process holds the lock
    Contended,
    /// Lock released by its holder
    Release,
    /// Stale marker cleared by hand
    Clear,
    /// Command run while holding the lock
    Run,
}

impl std::fmt::Display for EventAction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            EventAction::Acquire => write!(f, "acquire"),
            EventAction::Contended => write!(f, "contended"),
            EventAction::Release => write!(f, "release"),
            EventAction::Clear => write!(f, "clear"),
            EventAction::Run => write!(f, "run"),
        }
    }
}

/// An event record for the audit log.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Event {
    /// RFC3339 timestamp when the event occurred.
    pub ts: DateTime<Utc>,

    /// The action that was performed.
    pub action: EventAction,

    /// The actor who performed the action (e.g., `user@HOST`).
    pub actor: String,

    /// The lock path the event concerns.
    pub lock: PathBuf,

    /// Freeform details object with action-specific information.
    pub details: Value,
}

impl Event {
    /// Create a new event with the given action.
    ///
    /// The timestamp is set to the current time, and the actor is
    /// determined from the environment (USER@HOSTNAME).
    pub fn new(action: EventAction, lock: &Path) -> Self {
        Self {
            ts: Utc::now(),
            action,
            actor: get_actor_string(),
            lock: lock.to_path_buf(),
            details: Value::Object(serde_json::Map::new()),
        }
    }

    /// Set the details object for this event.
    pub fn with_details(mut self, details: Value) -> Self {
        self.details = details;
        self
    }

    /// Serialize the event to a single-line JSON string.
    pub fn to_ndjson_line(&self) -> Result<String> {
        serde_json::to_string(self).map_err(|e| {
            SymlockError::UserError(format!("failed to serialize event to JSON: {}", e))
        })
    }
}

/// Get the actor string for event metadata.
fn get_actor_string() -> String {
    let user = std::env::var("USER")
        .or_else(|_| std::env::var("USERNAME"))
        .unwrap_or_else(|_| "unknown".to_string());

    let host = hostname::get()
        .map(|h| h.to_string_lossy().to_string())
        .unwrap_or_else(|_| "unknown".to_string());

    format!("{}@{}", user, host)
}

/// Append an event to the log at `log_path`.
///
/// The file (and its parent directory) is created if it doesn't exist.
/// Each append results in one line with a trailing newline.
///
/// # Returns
///
/// * `Ok(())` - Event was successfully appended
/// * `Err(SymlockError::UserError)` - Serialization or write failed
pub fn append_event(log_path: &Path, event: &Event) -> Result<()> {
    let json_line = event.to_ndjson_line()?;

    if let Some(parent) = log_path.parent()
        && !parent.as_os_str().is_empty()
        && !parent.exists()
    {
        fs::create_dir_all(parent).map_err(|e| {
            SymlockError::UserError(format!(
                "failed to create event log directory '{}': {}",
                parent.display(),
                e
            ))
        })?;
    }

    let mut file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(log_path)
        .map_err(|e| {
            SymlockError::UserError(format!(
                "failed to open event log '{}': {}",
                log_path.display(),
                e
            ))
        })?;

    // One write per line so concurrent appenders don't interleave.
    file.write_all(format!("{}\n", json_line).as_bytes())
        .map_err(|e| {
            SymlockError::UserError(format!(
                "failed to write event to '{}': {}",
                log_path.display(),
                e
            ))
        })?;

    file.sync_all().map_err(|e| {
        SymlockError::UserError(format!(
            "failed to sync event log '{}': {}",
            log_path.display(),
            e
        ))
    })?;

    Ok(())
}
