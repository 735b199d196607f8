//! Symlock: stale-aware named locks for unrelated processes on one host.
//!
//! A lock is identified by a filesystem path. Holding it means a symbolic
//! link exists at that path whose target text is the holder's decimal PID.
//! Creating the link is the atomic claim; a marker whose owner no longer
//! exists is stale and is reclaimed by the next acquirer.
//!
//! ```no_run
//! use symlock::locks::{Acquisition, acquire_resource};
//!
//! match acquire_resource("/tmp/build.lock")? {
//!     Acquisition::Acquired(guard) => {
//!         // ... critical section ...
//!         guard.release()?;
//!     }
//!     Acquisition::Contended(owner) => eprintln!("held by pid {}", owner),
//! }
//! # Ok::<(), symlock::error::SymlockError>(())
//! ```

pub mod config;
pub mod error;
pub mod events;
pub mod exit_codes;
pub mod locks;
pub mod logging;

#[cfg(test)]
mod test_support;

pub use error::{Result, SymlockError};
pub use locks::{
    Acquisition, LockGuard, LockProtocol, ProcessId, acquire_resource, release_if_owner,
    release_resource,
};
