//! Concrete consumers of an active sequence.
//!
//! Each consumer turns one slot into one row of a specific artifact. They share nothing but the sequence they are
//! driven over, so artifacts produced under the same [`SlotPolicy`](nodekind_core::SlotPolicy) line up index for index.
//!
//! | Consumer | Row | Artifact |
//! |---|---|---|
//! | [`OpcodeEnum`] | [`OpcodeRow`] | dense integer ids |
//! | [`NameTable`] | [`NameRow`] | debug/display names |
//! | [`ForwardDecls`] | [`TypeStub`] | one type stub per node class |
//! | [`DispatchTable`] | [`DispatchRecord`] | slot → handler |
//! | [`Manifest`] | [`ManifestRow`] | JSON description of the build |
//!
//! ## See also
//! - [`crate::emit`] renders these artifacts as Rust source.

pub mod dispatch;
pub mod manifest;
pub mod names;
pub mod opcodes;
pub mod stubs;

pub use dispatch::{DispatchRecord, DispatchTable};
pub use manifest::{Manifest, ManifestDocument, ManifestRow};
pub use names::{NameRow, NameTable};
pub use opcodes::{OpcodeEnum, OpcodeRow};
pub use stubs::{ForwardDecls, TypeStub};
