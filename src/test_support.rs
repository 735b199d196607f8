use crate::locks::{Claim, Liveness, MarkerStore, ProcessId, ProcessProbe, Removal, SymlinkMarkers};
use std::cell::{Cell, RefCell};
use std::collections::{HashSet, VecDeque};
use std::io;
use std::path::{Path, PathBuf};
use std::process::Command;
use std::rc::Rc;
use std::sync::{LazyLock, Mutex, MutexGuard};

static CWD_LOCK: LazyLock<Mutex<()>> = LazyLock::new(|| Mutex::new(()));

pub(crate) struct DirGuard {
    original: PathBuf,
    _lock: MutexGuard<'static, ()>,
}

impl DirGuard {
    pub(crate) fn new(new_dir: &Path) -> Self {
        // Changing the process current working directory is global and not thread-safe.
        // Lock it so tests don't race even if a #[serial] annotation is missed.
        let lock = CWD_LOCK.lock().unwrap_or_else(|poison| poison.into_inner());
        let original = std::env::current_dir().unwrap();
        std::env::set_current_dir(new_dir).unwrap();
        Self {
            original,
            _lock: lock,
        }
    }
}

impl Drop for DirGuard {
    fn drop(&mut self) {
        let _ = std::env::set_current_dir(&self.original);
    }
}

/// PID of a child that has already exited and been reaped.
pub(crate) fn dead_pid() -> ProcessId {
    let mut child = Command::new("true")
        .spawn()
        .unwrap_or_else(|e| panic!("failed to spawn `true`: {}", e));
    let pid = child.id();
    child.wait().unwrap();
    ProcessId::new(pid).unwrap()
}

pub(crate) fn pid(raw: u32) -> ProcessId {
    ProcessId::new(raw).unwrap()
}

/// Probe backed by a fixed table instead of the OS.
#[derive(Debug, Clone, Default)]
pub(crate) struct FakeProbe {
    alive: HashSet<u32>,
    unknown: HashSet<u32>,
    calls: Rc<Cell<u32>>,
}

impl FakeProbe {
    /// Every PID not listed is dead.
    pub(crate) fn alive(pids: &[u32]) -> Self {
        Self {
            alive: pids.iter().copied().collect(),
            ..Self::default()
        }
    }

    pub(crate) fn with_unknown(mut self, pid: u32) -> Self {
        self.unknown.insert(pid);
        self
    }

    pub(crate) fn calls(&self) -> u32 {
        self.calls.get()
    }
}

impl ProcessProbe for FakeProbe {
    fn probe(&self, pid: ProcessId) -> Liveness {
        self.calls.set(self.calls.get() + 1);
        if self.alive.contains(&pid.get()) {
            Liveness::Alive
        } else if self.unknown.contains(&pid.get()) {
            Liveness::Unknown
        } else {
            Liveness::Dead
        }
    }
}

/// What a scripted `read_owner` call returns.
#[derive(Debug, Clone, Copy)]
pub(crate) enum OwnerRead {
    Owner(ProcessId),
    Vanished,
    Fails(io::ErrorKind),
}

/// Marker store that never lets a claim through by itself.
///
/// `try_claim` conflicts until `claim_after` claims have been made, reads
/// follow the queued script and then fall back to `default_read`.
#[derive(Debug, Clone)]
pub(crate) struct ScriptedMarkers {
    default_read: OwnerRead,
    reads: Rc<RefCell<VecDeque<OwnerRead>>>,
    claim_after: Option<u32>,
    claim_error: Option<io::ErrorKind>,
    remove_error: Option<io::ErrorKind>,
    claims: Rc<Cell<u32>>,
    removals: Rc<Cell<u32>>,
}

impl ScriptedMarkers {
    pub(crate) fn new(default_read: OwnerRead) -> Self {
        Self {
            default_read,
            reads: Rc::default(),
            claim_after: None,
            claim_error: None,
            remove_error: None,
            claims: Rc::default(),
            removals: Rc::default(),
        }
    }

    pub(crate) fn then_read(self, read: OwnerRead) -> Self {
        self.reads.borrow_mut().push_back(read);
        self
    }

    /// Let the claim numbered `n` (1-based) succeed.
    pub(crate) fn claim_succeeds_on(mut self, n: u32) -> Self {
        self.claim_after = Some(n);
        self
    }

    pub(crate) fn claim_fails_with(mut self, kind: io::ErrorKind) -> Self {
        self.claim_error = Some(kind);
        self
    }

    pub(crate) fn remove_fails_with(mut self, kind: io::ErrorKind) -> Self {
        self.remove_error = Some(kind);
        self
    }

    pub(crate) fn claims(&self) -> u32 {
        self.claims.get()
    }

    pub(crate) fn removals(&self) -> u32 {
        self.removals.get()
    }
}

impl MarkerStore for ScriptedMarkers {
    fn try_claim(&self, _path: &Path, _owner: ProcessId) -> io::Result<Claim> {
        self.claims.set(self.claims.get() + 1);
        if let Some(kind) = self.claim_error {
            return Err(io::Error::from(kind));
        }
        match self.claim_after {
            Some(n) if self.claims.get() >= n => Ok(Claim::Claimed),
            _ => Ok(Claim::Conflict),
        }
    }

    fn read_owner(&self, _path: &Path) -> io::Result<Option<ProcessId>> {
        let read = self
            .reads
            .borrow_mut()
            .pop_front()
            .unwrap_or(self.default_read);
        match read {
            OwnerRead::Owner(pid) => Ok(Some(pid)),
            OwnerRead::Vanished => Ok(None),
            OwnerRead::Fails(kind) => Err(io::Error::from(kind)),
        }
    }

    fn remove(&self, _path: &Path) -> io::Result<Removal> {
        if let Some(kind) = self.remove_error {
            return Err(io::Error::from(kind));
        }
        self.removals.set(self.removals.get() + 1);
        Ok(Removal::Removed)
    }
}

/// Real symlink store where every removal is immediately undone by a
/// "competitor" that plants a fresh stale marker.
#[derive(Debug, Clone, Copy)]
pub(crate) struct RecreatingMarkers {
    pub(crate) stale_owner: ProcessId,
}

impl MarkerStore for RecreatingMarkers {
    fn try_claim(&self, path: &Path, owner: ProcessId) -> io::Result<Claim> {
        SymlinkMarkers.try_claim(path, owner)
    }

    fn read_owner(&self, path: &Path) -> io::Result<Option<ProcessId>> {
        SymlinkMarkers.read_owner(path)
    }

    fn remove(&self, path: &Path) -> io::Result<Removal> {
        let removal = SymlinkMarkers.remove(path)?;
        std::os::unix::fs::symlink(self.stale_owner.to_string(), path)?;
        Ok(removal)
    }
}
