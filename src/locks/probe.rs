//! Liveness probes.
//!
//! A probe answers "does a process with this PID exist on this host". It is a
//! presence check only; no signal is ever delivered.
//!
//! PID reuse is not detected: if the original owner died and the kernel handed
//! its PID to an unrelated process, the marker looks live.

use super::types::{Liveness, ProcessId};
use crate::config::{Config, ProbeKind};
use nix::errno::Errno;
use nix::sys::signal::kill;
use nix::unistd::Pid;
use std::io;
use std::path::{Path, PathBuf};
use tracing::warn;

/// Default process-table root.
pub const DEFAULT_PROC_ROOT: &str = "/proc";

/// Capability for checking whether a process exists.
pub trait ProcessProbe {
    fn probe(&self, pid: ProcessId) -> Liveness;
}

impl<T: ProcessProbe + ?Sized> ProcessProbe for &T {
    fn probe(&self, pid: ProcessId) -> Liveness {
        (**self).probe(pid)
    }
}

/// Looks for `<root>/<pid>` in a procfs-style process table.
#[derive(Debug, Clone)]
pub struct ProcfsProbe {
    root: PathBuf,
}

impl ProcfsProbe {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }
}

impl Default for ProcfsProbe {
    fn default() -> Self {
        Self::new(DEFAULT_PROC_ROOT)
    }
}

impl ProcfsProbe {
    /// Whether the process table itself is present.
    fn has_table(&self) -> bool {
        self.root.is_dir()
    }
}

impl ProcessProbe for ProcfsProbe {
    fn probe(&self, pid: ProcessId) -> Liveness {
        match std::fs::metadata(self.root.join(pid.to_string())) {
            Ok(_) => Liveness::Alive,
            // An absent entry only proves absence if the table exists.
            Err(e) if e.kind() == io::ErrorKind::NotFound && self.has_table() => Liveness::Dead,
            Err(_) => Liveness::Unknown,
        }
    }
}

/// Uses `kill(pid, 0)`, which validates the PID without sending anything.
#[derive(Debug, Clone, Copy, Default)]
pub struct SignalProbe;

impl ProcessProbe for SignalProbe {
    fn probe(&self, pid: ProcessId) -> Liveness {
        let Ok(raw) = i32::try_from(pid.get()) else {
            return Liveness::Unknown;
        };
        liveness_from_signal(kill(Pid::from_raw(raw), None))
    }
}

/// Interpret the result of a null-signal `kill`.
fn liveness_from_signal(result: nix::Result<()>) -> Liveness {
    match result {
        Ok(()) => Liveness::Alive,
        // The process exists but belongs to someone else.
        Err(Errno::EPERM) => Liveness::Alive,
        Err(Errno::ESRCH) => Liveness::Dead,
        Err(_) => Liveness::Unknown,
    }
}

/// The probe backend selected by configuration.
#[derive(Debug, Clone)]
pub enum PlatformProbe {
    Procfs(ProcfsProbe),
    Signal(SignalProbe),
}

impl PlatformProbe {
    /// Backend named by `config`.
    ///
    /// A `procfs` setting whose root is not a directory falls back to signal
    /// probing.
    pub fn from_config(config: &Config) -> Self {
        match config.probe {
            ProbeKind::Procfs => {
                let procfs = ProcfsProbe::new(&config.proc_root);
                if procfs.has_table() {
                    PlatformProbe::Procfs(procfs)
                } else {
                    warn!(
                        proc_root = %config.proc_root.display(),
                        "process table not found, probing with signals"
                    );
                    PlatformProbe::Signal(SignalProbe)
                }
            }
            ProbeKind::Signal => PlatformProbe::Signal(SignalProbe),
        }
    }

    /// Which backend is in use.
    pub fn kind(&self) -> ProbeKind {
        match self {
            PlatformProbe::Procfs(_) => ProbeKind::Procfs,
            PlatformProbe::Signal(_) => ProbeKind::Signal,
        }
    }
}

impl Default for PlatformProbe {
    /// Procfs when the host exposes `/proc/self`, signal probing otherwise.
    fn default() -> Self {
        if Path::new(DEFAULT_PROC_ROOT).join("self").exists() {
            PlatformProbe::Procfs(ProcfsProbe::default())
        } else {
            PlatformProbe::Signal(SignalProbe)
        }
    }
}

impl ProcessProbe for PlatformProbe {
    fn probe(&self, pid: ProcessId) -> Liveness {
        match self {
            PlatformProbe::Procfs(probe) => probe.probe(pid),
            PlatformProbe::Signal(probe) => probe.probe(pid),
        }
    }
}
