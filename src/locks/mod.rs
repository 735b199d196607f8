//! Locking subsystem for symlock.
//!
//! A lock is a named filesystem path. Holding it means a marker exists at that
//! path naming the holder's PID.
//!
//! # Markers
//!
//! Markers are symlinks created with `symlink(2)`, which fails with `EEXIST`
//! when the path is occupied. That atomic create is the only mutual-exclusion
//! point; no in-process mutex is involved.
//!
//! # Staleness
//!
//! A holder that crashes leaves its marker behind. On conflict, the acquirer
//! reads the owner PID and asks a [`ProcessProbe`] whether it still exists.
//! A dead owner's marker is removed and the claim retried; a live or
//! undeterminable owner is reported as contention. The loop is bounded by a
//! fixed number of attempts and never sleeps.
//!
//! # RAII Guards
//!
//! A successful acquisition yields a [`LockGuard`] that removes the marker
//! when dropped, provided the marker still names the guard's owner.

mod guard;
mod inspect;
mod marker;
mod probe;
mod protocol;
mod types;


// Re-export public API
pub use guard::{LockGuard, release_if_owner, release_resource};
pub use inspect::{MarkerInfo, inspect};
pub use marker::{Claim, MarkerStore, Removal, SymlinkMarkers};
pub use probe::{DEFAULT_PROC_ROOT, PlatformProbe, ProcessProbe, ProcfsProbe, SignalProbe};
pub use protocol::{Acquisition, DEFAULT_MAX_ATTEMPTS, LockProtocol, acquire_resource};
pub use types::{InvalidProcessId, Liveness, ProcessId};
