//! Command implementations for symlock.
//!
//! This module provides the dispatcher that routes CLI commands to their
//! implementations. Each handler returns the process exit code on success;
//! errors are mapped to exit codes by `main`.

mod acquire;
mod clear;
mod release;
mod run;
mod status;

use crate::cli::{Cli, Command};
use serde_json::Value;
use std::path::Path;
use symlock::config::Config;
use symlock::error::{Result, SymlockError};
use symlock::events::{Event, EventAction, append_event};
use symlock::locks::ProcessId;
use tracing::warn;

/// Dispatch a command to its implementation.
///
/// Loads configuration first so every command sees the same settings.
pub fn dispatch(cli: Cli) -> Result<i32> {
    let config = load_config(&cli)?;

    match cli.command {
        Command::Acquire(args) => acquire::cmd_acquire(&config, args),
        Command::Release(args) => release::cmd_release(&config, args),
        Command::Status(args) => status::cmd_status(&config, args),
        Command::Run(args) => run::cmd_run(&config, args),
        Command::Clear(args) => clear::cmd_clear(&config, args),
    }
}

fn load_config(cli: &Cli) -> Result<Config> {
    let mut config = Config::resolve(cli.config.as_deref())?;
    if let Some(max_attempts) = cli.max_attempts {
        config.max_attempts = max_attempts;
        config.validate()?;
    }
    Ok(config)
}

/// Append an audit event if an event log is configured.
///
/// Best-effort: a failure is reported as a warning and never changes the
/// outcome of the command.
fn record(config: &Config, action: EventAction, lock: &Path, details: Value) {
    let Some(log_path) = &config.event_log else {
        return;
    };
    let event = Event::new(action, lock).with_details(details);
    if let Err(e) = append_event(log_path, &event) {
        warn!("failed to log {} event: {}", action, e);
    }
}

fn print_json(value: &Value) -> Result<()> {
    let text = serde_json::to_string_pretty(value)
        .map_err(|e| SymlockError::UserError(format!("failed to serialize output: {}", e)))?;
    println!("{}", text);
    Ok(())
}

fn format_pids(pids: &[ProcessId]) -> String {
    pids.iter()
        .map(ProcessId::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}
