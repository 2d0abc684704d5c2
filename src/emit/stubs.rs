//! `stubs.rs`: forward declarations for node classes.

use nodekind_core::Artifact;
use quote::{format_ident, quote};

use super::{EmitError, render};
use crate::consumers::TypeStub;

/// Emit one opaque `pub struct <Name>Node` per active stub. Reserved stubs emit nothing.
pub fn emit_stubs(stubs: &Artifact<TypeStub>) -> Result<String, EmitError> {
    let items = stubs.iter().filter(|s| !s.reserved).map(|stub| {
        let ident = format_ident!("{}", stub.type_name);
        let doc = format!(" IR node class for the `{}` node kind.", stub.node);
        quote! {
            #[doc = #doc]
            #[derive(Debug)]
            #[allow(non_camel_case_types)]
            pub struct #ident {
                _private: (),
            }
        }
    });

    render("stubs.rs", quote! { #(#items)* })
}
