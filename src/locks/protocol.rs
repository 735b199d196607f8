//! The acquire loop: claim, inspect, reclaim, retry.

use super::guard::LockGuard;
use super::marker::{Claim, MarkerStore, Removal, SymlinkMarkers};
use super::probe::{PlatformProbe, ProcessProbe};
use super::types::{Liveness, ProcessId};
use crate::config::Config;
use crate::error::{Result, SymlockError};
use std::path::Path;
use tracing::{debug, trace};

/// Attempt bound used when none is configured.
pub const DEFAULT_MAX_ATTEMPTS: u32 = 10;

/// Result of a completed acquisition attempt.
#[derive(Debug)]
#[must_use = "dropping an Acquired guard releases the lock immediately"]
pub enum Acquisition<M: MarkerStore = SymlinkMarkers> {
    /// The caller now holds the lock.
    Acquired(LockGuard<M>),
    /// A live (or undeterminable) process holds the lock.
    Contended(ProcessId),
}

impl<M: MarkerStore> Acquisition<M> {
    pub fn is_acquired(&self) -> bool {
        matches!(self, Acquisition::Acquired(_))
    }

    /// The blocking owner, if contended.
    pub fn contended_by(&self) -> Option<ProcessId> {
        match self {
            Acquisition::Contended(owner) => Some(*owner),
            Acquisition::Acquired(_) => None,
        }
    }
}

/// Outcome of one reclamation step.
enum Reclaim {
    Removed,
    /// The marker was already gone or now names someone else.
    Changed,
}

/// Stale-aware lock acquisition over a marker store and a liveness probe.
#[derive(Debug, Clone)]
pub struct LockProtocol<M = SymlinkMarkers, P = PlatformProbe> {
    markers: M,
    probe: P,
    identity: ProcessId,
    max_attempts: u32,
}

impl Default for LockProtocol {
    fn default() -> Self {
        Self::with_parts(SymlinkMarkers, PlatformProbe::default())
    }
}

impl LockProtocol {
    /// Protocol with the probe backend and attempt bound from `config`.
    pub fn from_config(config: &Config) -> Self {
        Self::with_parts(SymlinkMarkers, PlatformProbe::from_config(config))
            .with_max_attempts(config.max_attempts)
    }
}

impl<M, P> LockProtocol<M, P>
where
    M: MarkerStore + Clone,
    P: ProcessProbe,
{
    /// Protocol claiming as the current process with the default bound.
    pub fn with_parts(markers: M, probe: P) -> Self {
        Self {
            markers,
            probe,
            identity: ProcessId::current(),
            max_attempts: DEFAULT_MAX_ATTEMPTS,
        }
    }

    /// Claim on behalf of another process instead of the caller.
    pub fn with_identity(mut self, identity: ProcessId) -> Self {
        self.identity = identity;
        self
    }

    /// Set the attempt bound. At least one attempt is always made.
    pub fn with_max_attempts(mut self, max_attempts: u32) -> Self {
        self.max_attempts = max_attempts.max(1);
        self
    }

    /// The identity written into markers this protocol creates.
    pub fn identity(&self) -> ProcessId {
        self.identity
    }

    pub fn max_attempts(&self) -> u32 {
        self.max_attempts
    }

    /// Try to take the lock at `lock_path`.
    ///
    /// Never blocks or sleeps. Every iteration re-reads the marker, so an
    /// observation from a previous iteration is never trusted.
    ///
    /// # Returns
    ///
    /// * `Ok(Acquisition::Acquired(_))` - the marker now names our identity
    /// * `Ok(Acquisition::Contended(pid))` - `pid` is alive, or its liveness is unknown
    /// * `Err(SymlockError::ClaimIo)` - creating the marker failed for a reason other than EEXIST
    /// * `Err(SymlockError::MarkerRead)` - an existing marker could not be interpreted
    /// * `Err(SymlockError::StaleRemoval)` - a dead owner's marker could not be removed
    /// * `Err(SymlockError::AttemptsExhausted)` - the marker kept changing under us
    pub fn acquire(&self, lock_path: impl AsRef<Path>) -> Result<Acquisition<M>> {
        let path = lock_path.as_ref();
        let mut reclaimed = Vec::new();

        for attempt in 1..=self.max_attempts {
            trace!(path = %path.display(), attempt, "claiming lock marker");

            let claim = self
                .markers
                .try_claim(path, self.identity)
                .map_err(|source| SymlockError::ClaimIo {
                    path: path.to_path_buf(),
                    source,
                })?;

            if claim == Claim::Claimed {
                debug!(path = %path.display(), owner = %self.identity, attempt, "lock acquired");
                return Ok(Acquisition::Acquired(LockGuard::new(
                    path.to_path_buf(),
                    self.identity,
                    reclaimed,
                    self.markers.clone(),
                )));
            }

            let Some(owner) = self.read_owner(path)? else {
                debug!(path = %path.display(), attempt, "marker vanished before it could be read");
                continue;
            };

            let liveness = self.probe.probe(owner);
            if liveness != Liveness::Dead {
                debug!(path = %path.display(), %owner, %liveness, "lock is contended");
                return Ok(Acquisition::Contended(owner));
            }

            debug!(path = %path.display(), %owner, attempt, "owner is dead, reclaiming marker");
            if let Reclaim::Removed = self.reclaim(path, owner)? {
                reclaimed.push(owner);
            }
        }

        Err(SymlockError::AttemptsExhausted {
            path: path.to_path_buf(),
            attempts: self.max_attempts,
        })
    }

    fn read_owner(&self, path: &Path) -> Result<Option<ProcessId>> {
        self.markers
            .read_owner(path)
            .map_err(|source| SymlockError::MarkerRead {
                path: path.to_path_buf(),
                source,
            })
    }

    /// Remove a marker proven stale, unless it changed since it was judged.
    fn reclaim(&self, path: &Path, stale_owner: ProcessId) -> Result<Reclaim> {
        match self.read_owner(path)? {
            Some(current) if current == stale_owner => {}
            Some(current) => {
                debug!(path = %path.display(), %stale_owner, %current, "marker changed hands before reclamation");
                return Ok(Reclaim::Changed);
            }
            None => return Ok(Reclaim::Changed),
        }

        match self.markers.remove(path) {
            Ok(Removal::Removed) => Ok(Reclaim::Removed),
            Ok(Removal::AlreadyGone) => Ok(Reclaim::Changed),
            Err(source) => Err(SymlockError::StaleRemoval {
                path: path.to_path_buf(),
                owner: stale_owner,
                source,
            }),
        }
    }
}

/// Acquire `lock_path` for the current process with default settings.
pub fn acquire_resource(lock_path: impl AsRef<Path>) -> Result<Acquisition> {
    LockProtocol::default().acquire(lock_path)
}
