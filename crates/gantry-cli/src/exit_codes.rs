//! Unified exit codes for the gantry CLI.
//! These codes are part of the public contract and stay stable across releases.

pub const SUCCESS: i32 = 0;
pub const RUN_FAILED: i32 = 1; // A run failed at the parse stage, or --strict batch had failures
pub const CONFIG_ERROR: i32 = 2; // Config missing/invalid, unknown target/kind, resolution failure
pub const INVOCATION_ERROR: i32 = 3; // External process could not be started
