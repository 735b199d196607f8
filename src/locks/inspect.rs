//! Read-only marker inspection for status and clear.

use super::marker::{MarkerStore, SymlinkMarkers};
use super::probe::ProcessProbe;
use super::types::{Liveness, ProcessId};
use crate::error::{Result, SymlockError};
use chrono::{DateTime, Duration, Utc};
use serde::Serialize;
use std::fs;
use std::path::{Path, PathBuf};

/// Snapshot of an existing marker.
#[derive(Debug, Clone, Serialize)]
pub struct MarkerInfo {
    /// The marker path.
    pub path: PathBuf,

    /// PID recorded in the marker.
    pub owner: ProcessId,

    /// Liveness of the owner at inspection time.
    pub liveness: Liveness,

    /// Modification time of the symlink itself, if the filesystem reports one.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
}

impl MarkerInfo {
    /// Whether the owner is gone and the marker may be reclaimed.
    pub fn is_stale(&self) -> bool {
        self.liveness.is_dead()
    }

    /// How long the marker has existed.
    pub fn age(&self) -> Option<Duration> {
        self.created_at
            .map(|created| Utc::now().signed_duration_since(created))
    }

    /// Format the age as a human-readable string.
    pub fn age_string(&self) -> String {
        let Some(age) = self.age() else {
            return "unknown".to_string();
        };
        let seconds = age.num_seconds().max(0);
        let minutes = age.num_minutes();
        let hours = age.num_hours();
        let days = age.num_days();

        if days > 0 {
            format!("{}d {}h", days, hours % 24)
        } else if hours > 0 {
            format!("{}h {}m", hours, minutes % 60)
        } else if minutes > 0 {
            format!("{}m", minutes)
        } else {
            format!("{}s", seconds)
        }
    }
}

impl std::fmt::Display for MarkerInfo {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} (owner: {}, {}, age: {}{})",
            self.path.display(),
            self.owner,
            self.liveness,
            self.age_string(),
            if self.is_stale() { ", STALE" } else { "" }
        )
    }
}

/// Inspect the marker at `lock_path` without changing anything.
///
/// # Returns
///
/// * `Ok(None)` - no marker exists
/// * `Ok(Some(info))` - the marker, its owner, and the owner's liveness
/// * `Err(SymlockError::MarkerRead)` - the entry exists but is not a valid marker
pub fn inspect(lock_path: impl AsRef<Path>, probe: &impl ProcessProbe) -> Result<Option<MarkerInfo>> {
    let path = lock_path.as_ref();
    let read_err = |source| SymlockError::MarkerRead {
        path: path.to_path_buf(),
        source,
    };

    let Some(owner) = SymlinkMarkers.read_owner(path).map_err(read_err)? else {
        return Ok(None);
    };

    // The marker may vanish between the two reads; the owner is still worth reporting.
    let created_at = fs::symlink_metadata(path)
        .and_then(|meta| meta.modified())
        .ok()
        .map(DateTime::<Utc>::from);

    Ok(Some(MarkerInfo {
        path: path.to_path_buf(),
        owner,
        liveness: probe.probe(owner),
        created_at,
    }))
}
