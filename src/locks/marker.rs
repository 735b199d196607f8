//! Ownership markers.
//!
//! A marker is a symbolic link at the lock path whose target is the owner's
//! PID in decimal (`/tmp/x.lock -> "1234"`). `symlink(2)` either creates the
//! link or fails with `EEXIST`, so creation is the only exclusion point: there
//! is no check-then-create anywhere in this crate.
//!
//! The link target is never dereferenced, only read with `readlink(2)`.

use super::types::ProcessId;
use std::fs;
use std::io;
use std::path::Path;

/// Outcome of an exclusive-create attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Claim {
    /// The marker was created and now names the caller.
    Claimed,
    /// Some marker already occupies the path. Nothing was changed.
    Conflict,
}

/// Outcome of removing a marker.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Removal {
    Removed,
    AlreadyGone,
}

/// Storage capability behind the lock protocol.
///
/// Errors are raw `io::Error`s; the protocol decides which of them are fatal
/// and how they are reported.
pub trait MarkerStore {
    /// Atomically create a marker naming `owner`.
    ///
    /// "Already exists" must come back as `Ok(Claim::Conflict)`; every other
    /// failure is an `Err`.
    fn try_claim(&self, path: &Path, owner: ProcessId) -> io::Result<Claim>;

    /// Read the owner recorded in the marker.
    ///
    /// `Ok(None)` means the marker vanished. A marker that does not encode a
    /// process identity is an `InvalidData` error.
    fn read_owner(&self, path: &Path) -> io::Result<Option<ProcessId>>;

    /// Remove the marker, whoever owns it.
    fn remove(&self, path: &Path) -> io::Result<Removal>;
}

/// Markers stored as PID-valued symlinks on the local filesystem.
#[derive(Debug, Clone, Copy, Default)]
pub struct SymlinkMarkers;

impl MarkerStore for SymlinkMarkers {
    fn try_claim(&self, path: &Path, owner: ProcessId) -> io::Result<Claim> {
        match std::os::unix::fs::symlink(owner.to_string(), path) {
            Ok(()) => Ok(Claim::Claimed),
            Err(e) if e.kind() == io::ErrorKind::AlreadyExists => Ok(Claim::Conflict),
            Err(e) => Err(e),
        }
    }

    fn read_owner(&self, path: &Path) -> io::Result<Option<ProcessId>> {
        let target = match fs::read_link(path) {
            Ok(target) => target,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(e),
        };

        let text = target.to_str().ok_or_else(|| {
            io::Error::new(
                io::ErrorKind::InvalidData,
                format!("marker target {:?} is not valid UTF-8", target),
            )
        })?;

        text.parse::<ProcessId>()
            .map(Some)
            .map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))
    }

    fn remove(&self, path: &Path) -> io::Result<Removal> {
        match fs::remove_file(path) {
            Ok(()) => Ok(Removal::Removed),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(Removal::AlreadyGone),
            Err(e) => Err(e),
        }
    }
}
