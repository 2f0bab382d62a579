//! Exit codes for the `authmodel` binary.
//!
//! Read failures use `ReadModelError::exit_code`: 1 not found, 5 transient
//! storage failure (cancelled, deadline), 6 any other storage failure.

pub const SUCCESS: i32 = 0;
pub const CONFIG_ERROR: i32 = 2; // Bad arguments, unreadable input, store open/write failure
