//! `symlock acquire`: take a lock on behalf of a long-lived process.

use super::{format_pids, print_json, record};
use crate::cli::AcquireArgs;
use serde_json::json;
use symlock::config::Config;
use symlock::error::{Result, SymlockError};
use symlock::events::EventAction;
use symlock::exit_codes;
use symlock::locks::{Acquisition, LockProtocol, ProcessId};

pub(super) fn cmd_acquire(config: &Config, args: AcquireArgs) -> Result<i32> {
    // This process exits right away, so by default the lock belongs to
    // whoever invoked us.
    let owner = match args.pid {
        Some(pid) => pid,
        None => ProcessId::parent().ok_or_else(|| {
            SymlockError::UserError(
                "cannot determine the parent process; pass --pid <PID>".to_string(),
            )
        })?,
    };

    let protocol = LockProtocol::from_config(config).with_identity(owner);

    match protocol.acquire(&args.lock_path)? {
        Acquisition::Acquired(guard) => {
            let reclaimed = guard.reclaimed().to_vec();
            let path = guard.persist();

            record(
                config,
                EventAction::Acquire,
                &path,
                json!({ "owner": owner, "reclaimed": reclaimed }),
            );

            if args.json {
                print_json(&json!({
                    "status": "acquired",
                    "lock": path.display().to_string(),
                    "owner": owner,
                    "reclaimed": reclaimed,
                }))?;
            } else {
                println!("Acquired lock: {}", path.display());
                println!("  Owner:      {}", owner);
                if !reclaimed.is_empty() {
                    println!("  Reclaimed:  stale marker(s) from pid {}", format_pids(&reclaimed));
                }
            }
            Ok(exit_codes::SUCCESS)
        }
        Acquisition::Contended(holder) => {
            record(
                config,
                EventAction::Contended,
                &args.lock_path,
                json!({ "owner": holder, "requested_by": owner }),
            );

            if args.json {
                print_json(&json!({
                    "status": "contended",
                    "lock": args.lock_path.display().to_string(),
                    "owner": holder,
                }))?;
            } else {
                println!(
                    "Lock {} is held by pid {}",
                    args.lock_path.display(),
                    holder
                );
            }
            Ok(exit_codes::CONTENDED)
        }
    }
}
