//! `symlock run`: hold a lock for the lifetime of a child command.

use super::record;
use crate::cli::RunArgs;
use serde_json::json;
use std::os::unix::process::ExitStatusExt;
use std::process::{Command, ExitStatus};
use symlock::config::Config;
use symlock::error::{Result, SymlockError};
use symlock::events::EventAction;
use symlock::exit_codes;
use symlock::locks::{Acquisition, LockProtocol};
use tracing::{info, warn};

pub(super) fn cmd_run(config: &Config, args: RunArgs) -> Result<i32> {
    let Some((program, program_args)) = args.command.split_first() else {
        return Err(SymlockError::UserError("no command given".to_string()));
    };

    let protocol = LockProtocol::from_config(config);
    let guard = match protocol.acquire(&args.lock_path)? {
        Acquisition::Acquired(guard) => guard,
        Acquisition::Contended(holder) => {
            eprintln!(
                "Lock {} is held by pid {}",
                args.lock_path.display(),
                holder
            );
            return Ok(exit_codes::CONTENDED);
        }
    };

    info!(path = %guard.path().display(), program = %program, "running command under lock");

    // The guard releases on drop if spawning fails.
    let status = Command::new(program)
        .args(program_args)
        .status()
        .map_err(|e| SymlockError::UserError(format!("failed to run '{}': {}", program, e)))?;

    // The child's outcome wins over a failed release.
    if let Err(e) = guard.release() {
        warn!("failed to release {}: {}", args.lock_path.display(), e);
    }

    let code = child_exit_code(status);
    record(
        config,
        EventAction::Run,
        &args.lock_path,
        json!({ "command": args.command, "exit_code": code }),
    );

    Ok(code)
}

/// Exit code to report for a finished child, using the shell's 128+N
/// convention for signals.
fn child_exit_code(status: ExitStatus) -> i32 {
    match (status.code(), status.signal()) {
        (Some(code), _) => code,
        (None, Some(signal)) => 128 + signal,
        (None, None) => exit_codes::IO_FAILURE,
    }
}
