//! RAII lock guard and release operations.

use super::marker::{MarkerStore, Removal, SymlinkMarkers};
use super::types::ProcessId;
use crate::error::{Result, SymlockError};
use std::mem;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// Proof that the current process holds a lock.
///
/// When dropped, the marker is removed if it still names this guard's
/// identity. If removal fails, a warning is logged but no panic occurs.
#[derive(Debug)]
pub struct LockGuard<M: MarkerStore = SymlinkMarkers> {
    /// Path to the marker.
    path: PathBuf,

    /// Identity recorded in the marker.
    owner: ProcessId,

    /// Dead owners whose markers were removed on the way to this claim.
    reclaimed: Vec<ProcessId>,

    markers: M,

    /// Whether the lock has been released or handed off manually.
    released: bool,
}

impl<M: MarkerStore> LockGuard<M> {
    pub(super) fn new(path: PathBuf, owner: ProcessId, reclaimed: Vec<ProcessId>, markers: M) -> Self {
        Self {
            path,
            owner,
            reclaimed,
            markers,
            released: false,
        }
    }

    /// Get the path to the marker.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// The identity the marker was created with.
    pub fn owner(&self) -> ProcessId {
        self.owner
    }

    /// Stale owners reclaimed during acquisition, oldest first.
    pub fn reclaimed(&self) -> &[ProcessId] {
        &self.reclaimed
    }

    /// Release the lock now, reporting errors instead of logging them.
    ///
    /// The marker is only removed if it still names this guard's owner.
    pub fn release(mut self) -> Result<()> {
        self.released = true;
        release_owned_with(&self.markers, &self.path, self.owner)
    }

    /// Give up the guard without releasing, leaving the marker in place.
    ///
    /// Used when the lock outlives this process, e.g. a claim made on behalf
    /// of a parent shell. Returns the marker path for a later release.
    pub fn persist(mut self) -> PathBuf {
        self.released = true;
        mem::take(&mut self.path)
    }
}

impl<M: MarkerStore> Drop for LockGuard<M> {
    fn drop(&mut self) {
        if self.released {
            return;
        }
        match release_owned_with(&self.markers, &self.path, self.owner) {
            Ok(()) => debug!(path = %self.path.display(), "lock released on drop"),
            Err(SymlockError::NotHeld { .. }) => {}
            Err(e) => warn!("failed to release lock on drop: {}", e),
        }
    }
}

/// Remove the marker at `lock_path` unconditionally.
///
/// Does not check who owns the marker. Only call this while certain the
/// lock was acquired by this process (or on its behalf) and not yet released.
///
/// # Returns
///
/// * `Ok(())` - the marker was removed
/// * `Err(SymlockError::NotHeld)` - there was no marker
/// * `Err(SymlockError::Release)` - removal failed
pub fn release_resource(lock_path: impl AsRef<Path>) -> Result<()> {
    remove_with(&SymlinkMarkers, lock_path.as_ref())
}

/// Remove the marker at `lock_path` only if it names `owner`.
///
/// There is still a window between the ownership check and the removal.
pub fn release_if_owner(lock_path: impl AsRef<Path>, owner: ProcessId) -> Result<()> {
    release_owned_with(&SymlinkMarkers, lock_path.as_ref(), owner)
}

fn release_owned_with<M: MarkerStore>(markers: &M, path: &Path, owner: ProcessId) -> Result<()> {
    let current = markers
        .read_owner(path)
        .map_err(|source| SymlockError::MarkerRead {
            path: path.to_path_buf(),
            source,
        })?;

    match current {
        None => Err(SymlockError::NotHeld {
            path: path.to_path_buf(),
        }),
        Some(current) if current != owner => Err(SymlockError::NotOwner {
            path: path.to_path_buf(),
            owner: current,
            expected: owner,
        }),
        Some(_) => remove_with(markers, path),
    }
}

fn remove_with<M: MarkerStore>(markers: &M, path: &Path) -> Result<()> {
    match markers.remove(path) {
        Ok(Removal::Removed) => Ok(()),
        Ok(Removal::AlreadyGone) => Err(SymlockError::NotHeld {
            path: path.to_path_buf(),
        }),
        Err(source) => Err(SymlockError::Release {
            path: path.to_path_buf(),
            source,
        }),
    }
}
