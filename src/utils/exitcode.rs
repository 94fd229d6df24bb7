//! Process exit codes.

/// Every service exported.
pub const OK: i32 = 0;

/// Any failure: argument parsing, configuration, provider, filesystem or serialization.
pub const FAILURE: i32 = 1;
