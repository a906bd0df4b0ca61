#![forbid(unsafe_code)]

//! Command-line support for the `plan-print` binary.
//!
//! The printer itself never reads files; this module loads serialized plan
//! trees for the binary and its tests.

/// Loading plan trees serialized as JSON.
pub mod plan_file;
