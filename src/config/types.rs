//! Configuration types and defaults for symlock.

use crate::locks::{DEFAULT_MAX_ATTEMPTS, DEFAULT_PROC_ROOT};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Liveness probe backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum ProbeKind {
    /// Look for `<proc_root>/<pid>` (default on hosts with procfs).
    #[default]
    Procfs,
    /// Probe with the null signal, `kill(pid, 0)`.
    Signal,
}

impl ProbeKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ProbeKind::Procfs => "procfs",
            ProbeKind::Signal => "signal",
        }
    }
}

impl std::fmt::Display for ProbeKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

// Default value functions for serde
pub(super) fn default_max_attempts() -> u32 {
    DEFAULT_MAX_ATTEMPTS
}
pub(super) fn default_proc_root() -> PathBuf {
    PathBuf::from(DEFAULT_PROC_ROOT)
}
