//! nodekind version information.
//!
//! Generated file headers and the CLI both read this constant, so a regenerated artifact always names the generator
//! version that produced it.

/// The nodekind version string (for example, `0.1.0`).
pub const NODEKIND_VERSION: &str = env!("CARGO_PKG_VERSION");
