//! `symlock clear`: remove a marker left behind by a dead process.

use super::record;
use crate::cli::ClearArgs;
use serde_json::json;
use symlock::config::Config;
use symlock::error::{Result, SymlockError};
use symlock::events::EventAction;
use symlock::exit_codes;
use symlock::locks::{PlatformProbe, inspect, release_if_owner};

pub(super) fn cmd_clear(config: &Config, args: ClearArgs) -> Result<i32> {
    let probe = PlatformProbe::from_config(config);

    let Some(info) = inspect(&args.lock_path, &probe)? else {
        return Err(SymlockError::NotHeld {
            path: args.lock_path,
        });
    };

    if !info.is_stale() && !args.force {
        return Err(SymlockError::UserError(format!(
            "lock '{}' is held by pid {} ({}).\n\
             Use --force to clear it anyway.",
            args.lock_path.display(),
            info.owner,
            info.liveness
        )));
    }

    // Only remove the marker we inspected; a new holder may have replaced it.
    release_if_owner(&args.lock_path, info.owner)?;

    record(
        config,
        EventAction::Clear,
        &args.lock_path,
        json!({
            "owner": info.owner,
            "liveness": info.liveness,
            "forced": args.force,
            "age": info.age_string(),
        }),
    );

    println!("Cleared lock: {}", args.lock_path.display());
    println!("  Owner:    {} ({})", info.owner, info.liveness);
    println!("  Age:      {}", info.age_string());

    Ok(exit_codes::SUCCESS)
}
