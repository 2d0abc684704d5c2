//! Registry entries and their inclusion modes.

use std::fmt;

use crate::errors::RegistryError;
use crate::ident::Identifier;

/// How a gate reacts when its capability is switched off.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GateKind {
    /// Off means excluded.
    Hard,
    /// Off defers to the classifier's [`SoftFallback`](crate::classify::SoftFallback).
    Soft,
}

/// Reference to an externally resolved boolean capability.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct GateRef {
    pub name: Identifier,
    pub kind: GateKind,
}

impl GateRef {
    /// A plain capability gate.
    pub fn hard(name: impl Into<String>) -> Result<Self, RegistryError> {
        Ok(Self {
            name: Identifier::new(name)?,
            kind: GateKind::Hard,
        })
    }

    /// A capability gate whose "off" behavior is chosen by the classifier.
    pub fn soft(name: impl Into<String>) -> Result<Self, RegistryError> {
        Ok(Self {
            name: Identifier::new(name)?,
            kind: GateKind::Soft,
        })
    }

    pub fn is_soft(&self) -> bool {
        self.kind == GateKind::Soft
    }
}

/// Whether an entry is always present or depends on a capability.
///
/// ## Notes
/// - Soft gates are not a third variant: they are `Optional` with a [`GateKind::Soft`] gate, so every consumer only
///   ever has to handle two shapes.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum InclusionMode {
    Always,
    Optional(GateRef),
}

impl InclusionMode {
    /// `Optional` under a hard gate.
    ///
    /// ## Examples
    /// ```rust
    /// use nodekind_core::InclusionMode;
    ///
    /// let mode = InclusionMode::optional("X").unwrap();
    /// assert_eq!(mode.gate().map(|g| g.name.as_str()), Some("X"));
    /// ```
    pub fn optional(gate: impl Into<String>) -> Result<Self, RegistryError> {
        Ok(InclusionMode::Optional(GateRef::hard(gate)?))
    }

    /// `Optional` under a soft gate: active with the capability, fallback-controlled without it.
    pub fn soft(capability: impl Into<String>) -> Result<Self, RegistryError> {
        Ok(InclusionMode::Optional(GateRef::soft(capability)?))
    }

    /// The gate this mode depends on, if any.
    pub fn gate(&self) -> Option<&GateRef> {
        match self {
            InclusionMode::Always => None,
            InclusionMode::Optional(gate) => Some(gate),
        }
    }
}

impl fmt::Display for InclusionMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            InclusionMode::Always => f.write_str("always"),
            InclusionMode::Optional(GateRef {
                name,
                kind: GateKind::Hard,
            }) => write!(f, "if({name})"),
            InclusionMode::Optional(GateRef {
                name,
                kind: GateKind::Soft,
            }) => write!(f, "soft({name})"),
        }
    }
}

/// One declared node kind.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Entry {
    pub name: Identifier,
    pub mode: InclusionMode,
}

impl Entry {
    pub fn new(name: Identifier, mode: InclusionMode) -> Self {
        Self { name, mode }
    }

    pub fn name(&self) -> &str {
        self.name.as_str()
    }
}
