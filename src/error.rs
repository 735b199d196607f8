//! Error types for symlock.
//!
//! Uses thiserror for derive macros. Every I/O-backed variant keeps the
//! underlying `std::io::Error` as its source so callers can log or re-raise
//! the OS error code.

use crate::exit_codes;
use crate::locks::ProcessId;
use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Main error type for symlock operations.
///
/// Contention is not an error: it is reported through
/// [`Acquisition::Contended`](crate::locks::Acquisition::Contended).
#[derive(Error, Debug)]
pub enum SymlockError {
    /// Creating the marker failed for a reason other than "already exists".
    #[error("failed to create lock marker '{}': {source}", path.display())]
    ClaimIo {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// An existing marker could not be read or does not name a process.
    #[error("failed to read lock marker '{}': {source}", path.display())]
    MarkerRead {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// A marker whose owner is dead could not be removed.
    #[error("failed to remove stale lock marker '{}' left by pid {owner}: {source}", path.display())]
    StaleRemoval {
        path: PathBuf,
        owner: ProcessId,
        #[source]
        source: io::Error,
    },

    /// The bounded retry loop ran out of attempts.
    #[error("gave up acquiring '{}' after {attempts} attempts (marker keeps changing)", path.display())]
    AttemptsExhausted { path: PathBuf, attempts: u32 },

    /// Release was requested but no marker exists.
    #[error("lock '{}' is not held (no marker found)", path.display())]
    NotHeld { path: PathBuf },

    /// Release was requested for an identity that no longer owns the marker.
    #[error("lock '{}' is owned by pid {owner}, not pid {expected}", path.display())]
    NotOwner {
        path: PathBuf,
        owner: ProcessId,
        expected: ProcessId,
    },

    /// Removing the marker during release failed.
    #[error("failed to release lock '{}': {source}", path.display())]
    Release {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// Invalid arguments, configuration, or command invocation.
    #[error("{0}")]
    UserError(String),
}

impl SymlockError {
    /// Returns the appropriate exit code for this error type.
    pub fn exit_code(&self) -> i32 {
        match self {
            SymlockError::ClaimIo { .. }
            | SymlockError::MarkerRead { .. }
            | SymlockError::StaleRemoval { .. }
            | SymlockError::Release { .. } => exit_codes::IO_FAILURE,
            SymlockError::AttemptsExhausted { .. } => exit_codes::ATTEMPTS_EXHAUSTED,
            SymlockError::NotHeld { .. }
            | SymlockError::NotOwner { .. }
            | SymlockError::UserError(_) => exit_codes::USER_ERROR,
        }
    }

    /// The OS error code behind this error, if it came from a system call.
    pub fn raw_os_error(&self) -> Option<i32> {
        match self {
            SymlockError::ClaimIo { source, .. }
            | SymlockError::MarkerRead { source, .. }
            | SymlockError::StaleRemoval { source, .. }
            | SymlockError::Release { source, .. } => source.raw_os_error(),
            _ => None,
        }
    }
}

/// Result type alias for symlock operations.
pub type Result<T> = std::result::Result<T, SymlockError>;
