#![forbid(unsafe_code)]
//! nodekind: one node-kind table, many generated artifacts.
//!
//! A compiler backend keeps several artifacts keyed by IR node kind (opcode enum, debug-name table, class
//! declarations, visitor dispatch). This crate generates all of them from a single declaration table so they can
//! never drift apart. The registry itself lives in `nodekind_core`, the table format in `nodekind_syntax`; this crate
//! adds the concrete consumers, Rust emission, the generation pipeline and the `nodekind` CLI.
//!
//! ## Panic Policy
//!
//! This codebase follows explicit error handling:
//!
//! - **Production code**: Use `Result` or `Option` with `?` / `ok_or` / `map_err`. The `cli` module enforces
//!   `#![deny(clippy::unwrap_used)]`.
//!
//! - **Test code**: `.unwrap()` and `.expect()` are acceptable in tests.
//!
//! - **True invariants**: If a panic represents a generator bug (logic error), use `.expect("INVARIANT: reason")` with
//!   a clear explanation.

pub mod cli;
pub mod config;
pub mod consumers;
pub mod emit;
pub mod pipeline;
pub mod tables;
pub mod version;

#[cfg(test)]
pub(crate) mod test_support;

pub use config::{ConfigError, GenerateConfig, Output};
pub use emit::EmitError;
pub use pipeline::{GeneratedFiles, PipelineError, generate};
