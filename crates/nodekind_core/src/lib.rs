//! Node-kind registry for compiler IR artifacts.
//!
//! One authored, ordered list of IR node kinds; one gate classification per build; any number of independent
//! consumers deriving artifacts (opcode enums, name tables, forward declarations, dispatch tables) from the same
//! active sequence so they can never disagree on order or length.
//!
//! The pipeline is three steps:
//!
//! 1. [`RegistryBuilder::register`] entries, then [`RegistryBuilder::finalize`] into a frozen [`Registry`].
//! 2. [`Classifier::classify`] the registry against a resolved [`GateSet`] into an [`ActiveSequence`].
//! 3. Expand the sequence with [`expand::generate`] (closure) or [`expand::run`] (a [`Consumer`]).
//!
//! ## Notes
//!
//! - This crate is pure: **no IO**, no global state. Gate values arrive already resolved.
//! - Opcodes are dense and 0-based relative to one active sequence; they are never stored on entries.
//!
//! ## Examples
//! ```rust
//! use nodekind_core::{expand, Classifier, GateSet, InclusionMode, RegistryBuilder};
//!
//! let gates = GateSet::new().with("X", true);
//! let mut b = RegistryBuilder::new();
//! b.register("A", InclusionMode::Always).unwrap();
//! b.register("B", InclusionMode::optional("X").unwrap()).unwrap();
//! b.register("C", InclusionMode::Always).unwrap();
//! let registry = b.finalize(&gates).unwrap();
//!
//! let active = Classifier::new().classify(&registry, &gates).unwrap();
//! let names = expand::generate(&active, |e| e.name());
//! assert_eq!(names, ["A", "B", "C"]);
//! ```

pub mod classify;
pub mod entry;
pub mod errors;
pub mod expand;
pub mod gates;
pub mod ident;
pub mod registry;

pub use classify::{ActiveEntry, ActiveSequence, Classifier, Inclusion, Opcode, SoftFallback};
pub use entry::{Entry, GateKind, GateRef, InclusionMode};
pub use errors::RegistryError;
pub use expand::{Artifact, Consumer, ReservedEntry, Slot, SlotPolicy, SlotRef};
pub use gates::GateSet;
pub use ident::Identifier;
pub use registry::{Registry, RegistryBuilder};
