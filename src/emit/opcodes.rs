//! `opcodes.rs`: the `Opcode` enum.

use nodekind_core::Artifact;
use proc_macro2::Literal;
use quote::{format_ident, quote};

use super::{EmitError, render};
use crate::consumers::OpcodeRow;

/// Emit `#[repr(u32)] pub enum Opcode` plus `OPCODE_COUNT`, `Opcode::ALL`, `Opcode::from_u32` and `Opcode::name`.
///
/// Reserved rows still get a variant (hidden from docs) so every id in `0..OPCODE_COUNT` is valid. Variants keep the
/// node-class spelling, so names like `LoadD_unaligned` are allowed through `non_camel_case_types`.
pub fn emit_opcodes(rows: &Artifact<OpcodeRow>) -> Result<String, EmitError> {
    let idents: Vec<_> = rows.iter().map(|row| format_ident!("{}", row.name)).collect();

    let variants = rows.iter().zip(&idents).map(|(row, ident)| {
        let id = Literal::u32_unsuffixed(row.id);
        if row.reserved {
            quote! {
                #[doc(hidden)]
                #ident = #id
            }
        } else {
            quote! { #ident = #id }
        }
    });
    let from_arms = rows.iter().zip(&idents).map(|(row, ident)| {
        let id = Literal::u32_unsuffixed(row.id);
        quote! { #id => Some(Opcode::#ident) }
    });
    let name_arms = rows.iter().zip(&idents).map(|(row, ident)| {
        let name = &row.name;
        quote! { Opcode::#ident => #name }
    });
    let count = Literal::usize_unsuffixed(rows.len());
    // `repr` is rejected on zero-variant enums.
    let repr = if rows.is_empty() {
        quote! {}
    } else {
        quote! { #[repr(u32)] }
    };

    let tokens = quote! {
        /// IR node-kind opcodes, numbered in declaration order.
        #[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
        #[allow(non_camel_case_types)]
        #repr
        pub enum Opcode {
            #(#variants,)*
        }

        /// Number of opcodes (one past the largest id).
        pub const OPCODE_COUNT: usize = #count;

        impl Opcode {
            /// Every opcode, in id order.
            pub const ALL: [Opcode; OPCODE_COUNT] = [#(Opcode::#idents),*];

            pub const fn from_u32(value: u32) -> Option<Opcode> {
                match value {
                    #(#from_arms,)*
                    _ => None,
                }
            }

            /// Node-class name of this opcode.
            pub const fn name(self) -> &'static str {
                match self {
                    #(#name_arms,)*
                }
            }
        }
    };
    render("opcodes.rs", tokens)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::consumers::OpcodeEnum;
    use crate::test_support::abc_sequence;
    use nodekind_core::{SlotPolicy, expand};

    #[test]
    fn emits_dense_enum() {
        abc_sequence(false, |active| {
            let source = emit_opcodes(&expand::run(active, &mut OpcodeEnum::new())).unwrap();
            syn::parse_file(&source).unwrap();
            assert!(source.starts_with("// @generated by nodekind"));
            assert!(source.contains("#[repr(u32)]"));
            assert!(
                source.contains("#[allow(non_camel_case_types)]\n#[repr(u32)]\npub enum Opcode {"),
                "{source}"
            );
            assert!(source.contains("A = 0,"));
            assert!(source.contains("C = 1,"));
            assert!(!source.contains("B = "));
            assert!(source.contains("pub const OPCODE_COUNT: usize = 2;"));
            assert!(source.contains("Opcode::C => \"C\""));
        });
    }

    #[test]
    fn reserved_variants_are_hidden() {
        abc_sequence(false, |active| {
            let rows = expand::run(active, &mut OpcodeEnum::new().with_slot_policy(SlotPolicy::Reserve));
            let source = emit_opcodes(&rows).unwrap();
            assert!(source.contains("#[doc(hidden)]\n    B = 1,"), "{source}");
            assert!(source.contains("C = 2,"));
            assert!(source.contains("pub const OPCODE_COUNT: usize = 3;"));
        });
    }

    #[test]
    fn empty_sequence_emits_valid_enum() {
        let rows = nodekind_core::Artifact {
            consumer: "opcodes",
            policy: SlotPolicy::Compact,
            items: Vec::new(),
        };
        let source = emit_opcodes(&rows).unwrap();
        syn::parse_file(&source).unwrap();
        assert!(!source.contains("repr"));
        assert!(source.contains("pub const OPCODE_COUNT: usize = 0;"));
    }
}
