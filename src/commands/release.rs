//! `symlock release`: remove a lock marker.

use super::record;
use crate::cli::ReleaseArgs;
use serde_json::json;
use symlock::config::Config;
use symlock::error::Result;
use symlock::events::EventAction;
use symlock::exit_codes;
use symlock::locks::{release_if_owner, release_resource};

pub(super) fn cmd_release(config: &Config, args: ReleaseArgs) -> Result<i32> {
    match args.pid {
        Some(owner) => release_if_owner(&args.lock_path, owner)?,
        None => release_resource(&args.lock_path)?,
    }

    record(
        config,
        EventAction::Release,
        &args.lock_path,
        json!({ "checked_owner": args.pid }),
    );

    println!("Released lock: {}", args.lock_path.display());
    Ok(exit_codes::SUCCESS)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::os::unix::fs::symlink;
    use symlock::error::SymlockError;
    use symlock::locks::ProcessId;
    use tempfile::TempDir;

    #[test]
    fn release_removes_marker() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("x.lock");
        symlink("4242", &path).unwrap();

        let args = ReleaseArgs {
            lock_path: path.clone(),
            pid: None,
        };
        assert_eq!(cmd_release(&Config::default(), args).unwrap(), exit_codes::SUCCESS);
        assert!(path.symlink_metadata().is_err());
    }

    #[test]
    fn release_missing_marker_is_not_held() {
        let dir = TempDir::new().unwrap();
        let args = ReleaseArgs {
            lock_path: dir.path().join("x.lock"),
            pid: None,
        };

        let err = cmd_release(&Config::default(), args).unwrap_err();
        assert!(matches!(err, SymlockError::NotHeld { .. }));
        assert_eq!(err.exit_code(), exit_codes::USER_ERROR);
    }

    #[test]
    fn release_with_wrong_pid_leaves_marker() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("x.lock");
        symlink("4242", &path).unwrap();

        let args = ReleaseArgs {
            lock_path: path.clone(),
            pid: ProcessId::new(1111),
        };
        let err = cmd_release(&Config::default(), args).unwrap_err();

        assert!(matches!(err, SymlockError::NotOwner { .. }));
        assert!(path.symlink_metadata().is_ok());
    }
}
