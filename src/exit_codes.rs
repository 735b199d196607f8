//! Exit code constants for the symlock CLI.
//!
//! - 0: Success (lock acquired, released, or command completed)
//! - 1: User error (bad args, invalid config, lock not held by caller)
//! - 2: I/O failure while claiming, reading, or removing a marker
//! - 3: Retry bound exhausted
//! - 4: Lock held by a live process

/// Successful execution.
pub const SUCCESS: i32 = 0;

/// User error: bad arguments, invalid config, or releasing a lock that is not ours.
pub const USER_ERROR: i32 = 1;

/// Filesystem failure creating, reading, or removing a marker.
pub const IO_FAILURE: i32 = 2;

/// Acquisition gave up after the configured number of attempts.
pub const ATTEMPTS_EXHAUSTED: i32 = 3;

/// Lock is held by another live process.
pub const CONTENDED: i32 = 4;
