//! Configuration model for symlock.
//!
//! This module defines the Config struct loaded from an optional YAML file.
//! It supports forward-compatible YAML parsing (unknown fields are ignored),
//! sensible defaults for optional fields, and validation of config values.

mod model;
mod operations;
pub mod types;


// Re-export public API
pub use model::Config;
pub use operations::CONFIG_ENV_VAR;
pub use types::ProbeKind;
