//! `visitor.rs`: a visitor trait with one method per node kind, plus opcode dispatch.
//!
//! Method names are `visit_<snake_case name>`. Distinct node kinds can snake-case to the same name (`AddVB` and
//! `AddVb` both become `add_vb`), which would make the trait ambiguous, so collisions are rejected before any tokens
//! are built.

use std::collections::HashMap;

use heck::ToSnakeCase;
use nodekind_core::{ActiveSequence, Artifact, SlotPolicy, expand};
use proc_macro2::Ident;
use quote::{format_ident, quote};

use super::{EmitError, render};
use crate::consumers::{DispatchRecord, DispatchTable};

const FALLBACK_METHOD: &str = "visit_default";

/// Visitor method name for a node kind.
pub fn method_name(node: &str) -> String {
    format!("visit_{}", node.to_snake_case())
}

/// Build the dispatch artifact that backs `visitor.rs`: one visitor method per active slot, none for reserved slots.
///
/// ## Errors
/// - [`EmitError::NameCollision`] if two active node kinds (or a node kind and the fallback method) share a method
///   name.
pub fn visitor_table(
    sequence: &ActiveSequence<'_>,
    policy: SlotPolicy,
) -> Result<Artifact<DispatchRecord<Ident>>, EmitError> {
    let mut owners: HashMap<String, String> = HashMap::new();
    owners.insert(FALLBACK_METHOD.to_string(), format!("NodeVisitor::{FALLBACK_METHOD}"));

    let mut handlers = Vec::with_capacity(sequence.len());
    for entry in sequence.iter() {
        let method = method_name(entry.name());
        if let Some(first) = owners.get(&method) {
            return Err(EmitError::NameCollision {
                method,
                first: first.clone(),
                second: entry.name().to_string(),
            });
        }
        owners.insert(method.clone(), entry.name().to_string());
        handlers.push((entry.name(), format_ident!("{}", method)));
    }

    let mut table = DispatchTable::new().with_handlers(handlers).with_slot_policy(policy);
    Ok(expand::run(sequence, &mut table))
}

/// Emit `pub trait NodeVisitor` and `pub fn dispatch`.
///
/// Every per-kind method defaults to `visit_default(opcode)`; reserved opcodes dispatch straight to it.
pub fn emit_visitor(table: &Artifact<DispatchRecord<Ident>>) -> Result<String, EmitError> {
    let fallback = format_ident!("{}", FALLBACK_METHOD);

    let methods = table.iter().filter_map(|record| {
        let method = record.handler.as_ref()?;
        let variant = format_ident!("{}", record.name);
        let doc = format!(" Visit a `{}` node.", record.name);
        Some(quote! {
            #[doc = #doc]
            fn #method(&mut self) -> Self::Output {
                self.#fallback(Opcode::#variant)
            }
        })
    });
    let arms = table.iter().map(|record| {
        let variant = format_ident!("{}", record.name);
        match &record.handler {
            Some(method) => quote! { Opcode::#variant => visitor.#method() },
            None => quote! { Opcode::#variant => visitor.#fallback(opcode) },
        }
    });

    let tokens = quote! {
        use super::opcodes::Opcode;

        /// One method per node kind. Unimplemented methods fall back to `visit_default`.
        pub trait NodeVisitor {
            type Output;

            fn #fallback(&mut self, opcode: Opcode) -> Self::Output;

            #(#methods)*
        }

        /// Call the `visitor` method that handles `opcode`.
        pub fn dispatch<V: NodeVisitor + ?Sized>(visitor: &mut V, opcode: Opcode) -> V::Output {
            match opcode {
                #(#arms,)*
            }
        }
    };
    render("visitor.rs", tokens)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::abc_sequence;
    use nodekind_core::{Classifier, GateSet, InclusionMode, RegistryBuilder};

    #[test]
    fn method_names_are_snake_case() {
        assert_eq!(method_name("AbsD"), "visit_abs_d");
        assert_eq!(method_name("CallStaticJava"), "visit_call_static_java");
        assert_eq!(method_name("Loop"), "visit_loop");
    }

    #[test]
    fn emits_trait_and_dispatch() {
        abc_sequence(false, |active| {
            let table = visitor_table(active, SlotPolicy::Reserve).unwrap();
            let source = emit_visitor(&table).unwrap();
            syn::parse_file(&source).unwrap();
            assert!(source.contains("use super::opcodes::Opcode;"));
            assert!(source.contains("fn visit_a(&mut self) -> Self::Output {"));
            assert!(!source.contains("fn visit_b("));
            assert!(source.contains("Opcode::A => visitor.visit_a(),"));
            assert!(source.contains("Opcode::B => visitor.visit_default(opcode),"));
        });
    }

    #[test]
    fn snake_case_collisions_are_rejected() {
        let gates = GateSet::new();
        let mut b = RegistryBuilder::new();
        b.register("AddVB", InclusionMode::Always).unwrap();
        b.register("AddVb", InclusionMode::Always).unwrap();
        let registry = b.finalize(&gates).unwrap();
        let active = Classifier::new().classify(&registry, &gates).unwrap();

        let err = visitor_table(&active, SlotPolicy::Compact).unwrap_err();
        match err {
            EmitError::NameCollision { method, first, second } => {
                assert_eq!(method, "visit_add_vb");
                assert_eq!((first.as_str(), second.as_str()), ("AddVB", "AddVb"));
            }
            other => panic!("expected collision, got {other:?}"),
        }
    }

    #[test]
    fn fallback_method_cannot_be_shadowed() {
        let gates = GateSet::new();
        let mut b = RegistryBuilder::new();
        b.register("Default", InclusionMode::Always).unwrap();
        let registry = b.finalize(&gates).unwrap();
        let active = Classifier::new().classify(&registry, &gates).unwrap();
        assert!(matches!(
            visitor_table(&active, SlotPolicy::Compact),
            Err(EmitError::NameCollision { .. })
        ));
    }
}
