//! CLI argument parsing for symlock.
//!
//! Uses clap derive macros for declarative argument definitions.
//! This module defines the command structure; actual implementations
//! are in the `commands` module.

use clap::{ArgAction, Parser, Subcommand};
use std::path::PathBuf;
use symlock::locks::ProcessId;

/// Symlock: stale-aware named locks for unrelated processes on one host.
///
/// A lock is a path. Holding it means a symlink exists at that path whose
/// target is the holder's PID. Locks left behind by dead processes are
/// reclaimed automatically; locks held by live processes are reported.
#[derive(Parser, Debug)]
#[command(name = "symlock")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Config file (YAML). Defaults to $SYMLOCK_CONFIG, then built-in defaults.
    #[arg(long, global = true, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Override the maximum number of claim attempts.
    #[arg(long, global = true, value_name = "N")]
    pub max_attempts: Option<u32>,

    /// Increase diagnostic output on stderr (-v info, -vv debug).
    #[arg(short, long, action = ArgAction::Count, global = true)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Command,
}

/// Available commands for symlock.
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Acquire a lock and leave it held.
    ///
    /// The marker names the invoking process (normally the calling shell),
    /// or the PID given with --pid. Exits 4 if a live process holds the lock.
    Acquire(AcquireArgs),

    /// Release a lock by removing its marker.
    ///
    /// Without --pid the marker is removed no matter who owns it.
    Release(ReleaseArgs),

    /// Show who holds one or more locks.
    ///
    /// Read-only: never removes or creates markers.
    Status(StatusArgs),

    /// Run a command while holding a lock.
    ///
    /// The lock is released when the command exits, and symlock exits
    /// with the command's exit code.
    Run(RunArgs),

    /// Remove a marker left behind by a dead process.
    ///
    /// Refuses to clear a lock whose owner is alive unless --force is given.
    Clear(ClearArgs),
}

/// Arguments for the `acquire` command.
#[derive(Parser, Debug)]
pub struct AcquireArgs {
    /// Lock path (the marker is created here).
    pub lock_path: PathBuf,

    /// Claim on behalf of this PID instead of the parent process.
    #[arg(long)]
    pub pid: Option<ProcessId>,

    /// Print the outcome as JSON.
    #[arg(long)]
    pub json: bool,
}

/// Arguments for the `release` command.
#[derive(Parser, Debug)]
pub struct ReleaseArgs {
    /// Lock path to release.
    pub lock_path: PathBuf,

    /// Only release if the marker still names this PID.
    #[arg(long)]
    pub pid: Option<ProcessId>,
}

/// Arguments for the `status` command.
#[derive(Parser, Debug)]
pub struct StatusArgs {
    /// Lock paths to inspect.
    #[arg(required = true)]
    pub lock_paths: Vec<PathBuf>,

    /// Print the result as JSON.
    #[arg(long)]
    pub json: bool,
}

/// Arguments for the `run` command.
#[derive(Parser, Debug)]
pub struct RunArgs {
    /// Lock path to hold while the command runs.
    pub lock_path: PathBuf,

    /// Command and arguments, after `--`.
    #[arg(last = true, required = true, num_args = 1..)]
    pub command: Vec<String>,
}

/// Arguments for the `clear` command.
#[derive(Parser, Debug)]
pub struct ClearArgs {
    /// Lock path whose marker should be cleared.
    pub lock_path: PathBuf,

    /// Clear even if the owner is alive or its liveness is unknown.
    #[arg(long)]
    pub force: bool,
}

impl Cli {
    /// Parse command-line arguments.
    pub fn parse_args() -> Self {
        Cli::parse()
    }
}
