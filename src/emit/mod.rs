//! Render consumer artifacts as Rust source.
//!
//! Every file is built as tokens with `quote!`, parsed into a `syn::File`, and pretty-printed with `prettyplease`, so
//! emitted code is always syntactically valid and formatted the same way on every run.
//!
//! ## Notes
//!
//! - Emission is codegen-only: it does not read or write files.
//! - `prettyplease` drops plain comments, so the `@generated` header is prepended as text.
//! - `visitor.rs` refers to `super::opcodes::Opcode`; the generated files are meant to live side by side in one module.

pub mod errors;
pub mod names;
pub mod opcodes;
pub mod stubs;
pub mod visitor;

pub use errors::EmitError;
pub use names::emit_names;
pub use opcodes::emit_opcodes;
pub use stubs::emit_stubs;
pub use visitor::{emit_visitor, visitor_table};

use nodekind_core::Artifact;
use proc_macro2::TokenStream;

use crate::version::NODEKIND_VERSION;

/// First line of every generated file.
pub fn header() -> String {
    format!("// @generated by nodekind {NODEKIND_VERSION}. Do not edit by hand.\n\n")
}

pub(crate) fn render(file: &'static str, tokens: TokenStream) -> Result<String, EmitError> {
    let syntax_tree: syn::File = syn::parse2(tokens).map_err(|e| EmitError::SynParse {
        file,
        message: e.to_string(),
    })?;
    let formatted = prettyplease::unparse(&syntax_tree);
    tracing::debug!(file, bytes = formatted.len(), "rendered artifact");
    Ok(format!("{}{formatted}", header()))
}

/// Fail unless `left` and `right` can be indexed with the same slot numbers.
pub fn ensure_aligned<L, R>(left: &Artifact<L>, right: &Artifact<R>) -> Result<(), EmitError> {
    if left.is_aligned_with(right) {
        Ok(())
    } else {
        Err(EmitError::Misaligned {
            left: left.consumer,
            left_len: left.len(),
            right: right.consumer,
            right_len: right.len(),
        })
    }
}
