//! Process identity and liveness types shared by the lock protocol.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Identity of a lock claimant: a positive OS process ID.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "u32", into = "u32")]
pub struct ProcessId(u32);

impl ProcessId {
    /// Wrap a raw PID. Zero is not a valid process identity.
    pub fn new(raw: u32) -> Option<Self> {
        (raw > 0).then_some(Self(raw))
    }

    /// The PID of the calling process.
    pub fn current() -> Self {
        Self(std::process::id())
    }

    /// The PID of the calling process's parent, if it has one.
    pub fn parent() -> Option<Self> {
        Self::new(std::os::unix::process::parent_id())
    }

    /// The raw PID value.
    pub fn get(self) -> u32 {
        self.0
    }
}

impl fmt::Display for ProcessId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A marker target that does not encode a process identity.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("'{0}' is not a valid process id")]
pub struct InvalidProcessId(pub String);

impl FromStr for ProcessId {
    type Err = InvalidProcessId;

    /// Parse the decimal form written into a marker.
    ///
    /// Only plain ASCII digits are accepted: no sign, whitespace, or
    /// trailing data.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.is_empty() || !s.bytes().all(|b| b.is_ascii_digit()) {
            return Err(InvalidProcessId(s.to_string()));
        }
        s.parse::<u32>()
            .ok()
            .and_then(ProcessId::new)
            .ok_or_else(|| InvalidProcessId(s.to_string()))
    }
}

impl TryFrom<u32> for ProcessId {
    type Error = InvalidProcessId;

    fn try_from(raw: u32) -> Result<Self, Self::Error> {
        ProcessId::new(raw).ok_or_else(|| InvalidProcessId(raw.to_string()))
    }
}

impl From<ProcessId> for u32 {
    fn from(pid: ProcessId) -> Self {
        pid.0
    }
}

/// Result of asking whether a process still exists.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Liveness {
    /// The process exists.
    Alive,
    /// The process is gone; its marker is stale.
    Dead,
    /// The probe could not tell. Treated like `Alive` by the protocol.
    Unknown,
}

impl Liveness {
    /// Whether a marker owned by this process may be reclaimed.
    pub fn is_dead(self) -> bool {
        self == Liveness::Dead
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Liveness::Alive => "alive",
            Liveness::Dead => "dead",
            Liveness::Unknown => "unknown",
        }
    }
}

impl fmt::Display for Liveness {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
