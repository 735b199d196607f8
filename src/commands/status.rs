//! `symlock status`: report who holds each lock.

use super::print_json;
use crate::cli::StatusArgs;
use serde_json::{Value, json};
use symlock::config::Config;
use symlock::error::Result;
use symlock::exit_codes;
use symlock::locks::{MarkerInfo, PlatformProbe, inspect};

pub(super) fn cmd_status(config: &Config, args: StatusArgs) -> Result<i32> {
    let probe = PlatformProbe::from_config(config);

    let mut entries = Vec::with_capacity(args.lock_paths.len());
    for path in &args.lock_paths {
        entries.push((path, inspect(path, &probe)?));
    }

    if args.json {
        let report: Vec<Value> = entries
            .iter()
            .map(|(path, info)| status_json(&path.display().to_string(), info.as_ref()))
            .collect();
        print_json(&Value::Array(report))?;
        return Ok(exit_codes::SUCCESS);
    }

    let held = entries.iter().filter(|(_, info)| info.is_some()).count();
    if held == 0 {
        println!("No locks held.");
        for (path, _) in &entries {
            println!("  {}: free", path.display());
        }
        return Ok(exit_codes::SUCCESS);
    }

    println!(
        "Locks ({} of {} held, {} probe):",
        held,
        entries.len(),
        probe.kind()
    );
    println!();
    let mut stale_count = 0;
    for (path, info) in &entries {
        match info {
            Some(info) => {
                if info.is_stale() {
                    stale_count += 1;
                }
                println!("  {}", info);
            }
            None => println!("  {}: free", path.display()),
        }
    }

    if stale_count > 0 {
        println!();
        println!(
            "{} stale lock(s). Use 'symlock clear <path>' to remove them.",
            stale_count
        );
    }

    Ok(exit_codes::SUCCESS)
}

fn status_json(lock: &str, info: Option<&MarkerInfo>) -> Value {
    match info {
        Some(info) => json!({
            "lock": lock,
            "held": true,
            "owner": info.owner,
            "liveness": info.liveness,
            "created_at": info.created_at,
            "stale": info.is_stale(),
        }),
        None => json!({
            "lock": lock,
            "held": false,
        }),
    }
}
