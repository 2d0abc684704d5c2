//! `names.rs`: the node-class name table.

use nodekind_core::Artifact;
use proc_macro2::Literal;
use quote::quote;

use super::{EmitError, render};
use crate::consumers::NameRow;

/// Emit `pub static NODE_CLASS_NAMES: [&str; N]`, indexed by opcode.
///
/// Reserved rows keep their name so debug output for a stale id still says what it used to be.
pub fn emit_names(rows: &Artifact<NameRow>) -> Result<String, EmitError> {
    let names = rows.iter().map(|row| &row.name);
    let count = Literal::usize_unsuffixed(rows.len());

    let tokens = quote! {
        /// Node-class names, indexed by opcode.
        pub static NODE_CLASS_NAMES: [&str; #count] = [#(#names),*];
    };
    render("names.rs", tokens)
}
