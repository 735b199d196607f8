//! Core Config struct definition.

use super::types::{ProbeKind, default_max_attempts, default_proc_root};
use serde::Deserialize;
use std::path::PathBuf;

/// Configuration for symlock.
///
/// Unknown fields in the YAML are ignored for forward compatibility.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct Config {
    // =========================================================================
    // Lock protocol
    // =========================================================================
    /// Upper bound on claim attempts per acquisition.
    #[serde(default = "default_max_attempts")]
    pub max_attempts: u32,

    // =========================================================================
    // Liveness probing
    // =========================================================================
    /// Which probe decides whether a marker's owner is still running.
    #[serde(default)]
    pub probe: ProbeKind,

    /// Process table root used by the `procfs` probe.
    #[serde(default = "default_proc_root")]
    pub proc_root: PathBuf,

    // =========================================================================
    // Audit
    // =========================================================================
    /// NDJSON file that CLI commands append events to. Disabled when unset.
    #[serde(default)]
    pub event_log: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            max_attempts: default_max_attempts(),
            probe: ProbeKind::default(),
            proc_root: default_proc_root(),
            event_log: None,
        }
    }
}
