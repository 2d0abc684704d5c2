//! Declaration-table frontend for the nodekind registry: lexer, parser, AST, lowering, diagnostics.
//!
//! A declaration table is the persisted form of the registry: one node kind per line, in declaration order.
//!
//! ```text
//! AbsD                                    # always
//! CallNative          if(native_calls)    # optional
//! ShenandoahIUBarrier soft(shenandoah_gc) # soft-gated
//! ```
//!
//! ## Notes
//! - This crate only turns text into a frozen [`nodekind_core::Registry`]; it does not classify or expand.
//! - Identifier rules come from `nodekind_core::ident`, so the table format and the programmatic builder accept
//!   exactly the same names.
//!
//! ## Examples
//! ```rust
//! use nodekind_core::GateSet;
//! use nodekind_syntax::lower;
//!
//! let gates = GateSet::new().with("X", false);
//! let loaded = lower::load("demo.nk", "A\nB if(X)\nC\n", &gates).unwrap();
//! assert_eq!(loaded.registry.len(), 3);
//! ```

pub mod ast;
pub mod diagnostics;
pub mod lexer;
pub mod lower;
pub mod parser;

pub use diagnostics::{DeclError, TableError};
pub use lower::{LoadedTable, load};
