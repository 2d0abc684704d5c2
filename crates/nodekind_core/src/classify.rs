//! Gate classification: frozen registry + gate mapping → active sequence.
//!
//! Classification is pure. The same registry and the same [`GateSet`] always produce an identical
//! [`ActiveSequence`], and opcodes are assigned here (dense, 0-based, in declaration order) rather than stored on
//! entries, because they depend on which optional entries survive.

use std::fmt;

use crate::entry::{Entry, GateKind, InclusionMode};
use crate::errors::RegistryError;
use crate::gates::GateSet;
use crate::registry::Registry;

/// What a soft-gated entry does when its capability is off.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum SoftFallback {
    /// Keep the entry as if the capability were on.
    Include,
    /// Drop the entry silently.
    #[default]
    Exclude,
}

/// Why an entry is (or is not) in the active sequence.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Inclusion {
    /// Declared `Always`.
    Always,
    /// Optional, and its gate is on.
    GateOn,
    /// Soft-gated, gate off, kept by [`SoftFallback::Include`].
    SoftFallback,
    /// Optional, gate off, not kept.
    Excluded,
}

impl Inclusion {
    pub fn is_active(self) -> bool {
        !matches!(self, Inclusion::Excluded)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Inclusion::Always => "always",
            Inclusion::GateOn => "gate-on",
            Inclusion::SoftFallback => "soft-fallback",
            Inclusion::Excluded => "excluded",
        }
    }
}

impl fmt::Display for Inclusion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Dense id of an active node kind, valid only for the sequence that produced it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Opcode(u32);

impl Opcode {
    pub fn new(value: u32) -> Self {
        Self(value)
    }

    pub fn as_u32(self) -> u32 {
        self.0
    }

    pub fn index(self) -> usize {
        self.0 as usize
    }
}

impl fmt::Display for Opcode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Gate classifier.
///
/// ## Examples
/// ```rust
/// use nodekind_core::{Classifier, GateSet, InclusionMode, RegistryBuilder};
///
/// let mut b = RegistryBuilder::new();
/// b.register("A", InclusionMode::Always).unwrap();
/// b.register("B", InclusionMode::optional("X").unwrap()).unwrap();
/// b.register("C", InclusionMode::Always).unwrap();
/// let gates = GateSet::new().with("X", false);
/// let registry = b.finalize(&gates).unwrap();
///
/// let active = Classifier::new().classify(&registry, &gates).unwrap();
/// let names: Vec<&str> = active.iter().map(|e| e.name()).collect();
/// assert_eq!(names, ["A", "C"]);
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Classifier {
    soft_fallback: SoftFallback,
}

impl Classifier {
    pub fn new() -> Self {
        Self::default()
    }

    /// Choose what soft-gated entries do when their capability is off.
    pub fn with_soft_fallback(mut self, fallback: SoftFallback) -> Self {
        self.soft_fallback = fallback;
        self
    }

    pub fn soft_fallback(&self) -> SoftFallback {
        self.soft_fallback
    }

    /// Decide inclusion for one entry.
    ///
    /// ## Errors
    /// - [`RegistryError::UnknownGate`] if the entry's gate is missing from `gates`.
    pub fn decide(&self, entry: &Entry, gates: &GateSet) -> Result<Inclusion, RegistryError> {
        let gate = match &entry.mode {
            InclusionMode::Always => return Ok(Inclusion::Always),
            InclusionMode::Optional(gate) => gate,
        };
        let enabled = gates.get(gate.name.as_str()).ok_or_else(|| RegistryError::UnknownGate {
            gate: gate.name.to_string(),
            entry: entry.name().to_string(),
        })?;

        Ok(match (enabled, gate.kind, self.soft_fallback) {
            (true, _, _) => Inclusion::GateOn,
            (false, GateKind::Soft, SoftFallback::Include) => Inclusion::SoftFallback,
            (false, GateKind::Soft, SoftFallback::Exclude) | (false, GateKind::Hard, _) => Inclusion::Excluded,
        })
    }

    /// Classify every entry of `registry` against `gates`.
    ///
    /// ## Errors
    /// - [`RegistryError::UnknownGate`] for the first optional entry whose gate `gates` does not resolve. A registry
    ///   frozen against the same mapping never hits this.
    #[tracing::instrument(skip_all, fields(entry_count = registry.len(), soft_fallback = ?self.soft_fallback))]
    pub fn classify<'r>(&self, registry: &'r Registry, gates: &GateSet) -> Result<ActiveSequence<'r>, RegistryError> {
        let mut decisions = Vec::with_capacity(registry.len());
        let mut active = Vec::with_capacity(registry.len());

        for (index, entry) in registry.iter().enumerate() {
            let decision = self.decide(entry, gates)?;
            if decision.is_active() {
                active.push(index);
            }
            decisions.push(decision);
        }

        tracing::debug!(active = active.len(), excluded = registry.len() - active.len(), "classified registry");
        Ok(ActiveSequence {
            registry,
            decisions,
            active,
        })
    }
}

/// One entry of an [`ActiveSequence`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ActiveEntry<'r> {
    pub opcode: Opcode,
    /// Declaration position in the registry.
    pub position: usize,
    pub inclusion: Inclusion,
    pub entry: &'r Entry,
}

impl<'r> ActiveEntry<'r> {
    pub fn name(&self) -> &'r str {
        self.entry.name()
    }
}

/// The ordered, gated subsequence of a registry for one build configuration.
///
/// ## Notes
/// - Read-only after construction and `Send + Sync`, so any number of consumers can expand it concurrently.
/// - Per-entry decisions for excluded entries are kept so placeholder-emitting consumers and tooling can see them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActiveSequence<'r> {
    registry: &'r Registry,
    decisions: Vec<Inclusion>,
    /// Registry positions of active entries; the index into this vector is the opcode.
    active: Vec<usize>,
}

impl<'r> ActiveSequence<'r> {
    pub fn registry(&self) -> &'r Registry {
        self.registry
    }

    pub fn len(&self) -> usize {
        self.active.len()
    }

    pub fn is_empty(&self) -> bool {
        self.active.is_empty()
    }

    /// Active entries in opcode order.
    pub fn iter(&self) -> impl ExactSizeIterator<Item = ActiveEntry<'r>> + '_ {
        self.active
            .iter()
            .enumerate()
            .map(move |(opcode, &position)| self.active_entry(opcode, position))
    }

    /// The active entry with the given opcode.
    pub fn get(&self, opcode: Opcode) -> Option<ActiveEntry<'r>> {
        let position = *self.active.get(opcode.index())?;
        Some(self.active_entry(opcode.index(), position))
    }

    /// Opcode of an active entry by name. Excluded and undeclared names yield `None`.
    pub fn opcode_of(&self, name: &str) -> Option<Opcode> {
        let position = self.registry.position(name)?;
        // `active` is sorted by position.
        self.active
            .binary_search(&position)
            .ok()
            .map(|opcode| Opcode(opcode as u32))
    }

    /// Decision for every registry entry, in declaration order.
    pub fn decisions(&self) -> impl ExactSizeIterator<Item = (&'r Entry, Inclusion)> + '_ {
        self.registry.iter().zip(self.decisions.iter().copied())
    }

    /// Decision for one declaration position.
    pub fn decision(&self, position: usize) -> Option<Inclusion> {
        self.decisions.get(position).copied()
    }

    fn active_entry(&self, opcode: usize, position: usize) -> ActiveEntry<'r> {
        ActiveEntry {
            opcode: Opcode(opcode as u32),
            position,
            inclusion: self.decisions[position],
            entry: &self.registry.entries()[position],
        }
    }
}
