//! The entry table: append-only authoring, validated freeze.
//!
//! [`RegistryBuilder`] is the only mutable form. [`RegistryBuilder::finalize`] consumes it and returns a [`Registry`]
//! that has no mutating API, so "frozen before any consumer runs" is a property of the types rather than a runtime
//! flag.

use std::collections::HashMap;

use crate::entry::{Entry, InclusionMode};
use crate::errors::RegistryError;
use crate::gates::GateSet;
use crate::ident::Identifier;

/// Append-only entry table under construction.
#[derive(Debug, Clone, Default)]
pub struct RegistryBuilder {
    entries: Vec<Entry>,
}

impl RegistryBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a declaration.
    ///
    /// ## Errors
    /// - [`RegistryError::InvalidIdentifier`] if `name` is malformed. Nothing is appended in that case.
    ///
    /// ## Notes
    /// - Duplicates are accepted here and reported by [`finalize`](Self::finalize), which knows both positions.
    pub fn register(&mut self, name: impl Into<String>, mode: InclusionMode) -> Result<&mut Self, RegistryError> {
        let name = Identifier::new(name)?;
        self.entries.push(Entry::new(name, mode));
        Ok(self)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Validate and freeze.
    ///
    /// Entries are scanned in declaration order and the first defect wins.
    ///
    /// ## Errors
    /// - [`RegistryError::DuplicateEntry`] for the first name seen twice, with both positions.
    /// - [`RegistryError::UnknownGate`] for the first optional entry whose gate is absent from `gates`.
    #[tracing::instrument(skip_all, fields(entry_count = self.entries.len(), gate_count = gates.len()))]
    pub fn finalize(self, gates: &GateSet) -> Result<Registry, RegistryError> {
        let mut first_seen: HashMap<&str, usize> = HashMap::with_capacity(self.entries.len());

        for (index, entry) in self.entries.iter().enumerate() {
            if let Some(&first_index) = first_seen.get(entry.name()) {
                return Err(RegistryError::DuplicateEntry {
                    name: entry.name().to_string(),
                    first_index,
                    second_index: index,
                });
            }
            first_seen.insert(entry.name(), index);

            if let Some(gate) = entry.mode.gate() {
                if !gates.contains(gate.name.as_str()) {
                    return Err(RegistryError::UnknownGate {
                        gate: gate.name.to_string(),
                        entry: entry.name().to_string(),
                    });
                }
            }
        }

        let positions = self
            .entries
            .iter()
            .enumerate()
            .map(|(index, entry)| (entry.name.clone(), index))
            .collect();

        tracing::debug!(entries = self.entries.len(), "registry frozen");
        Ok(Registry {
            entries: self.entries,
            positions,
        })
    }
}

/// A frozen, validated entry table.
///
/// ## Notes
/// - Names are unique and every referenced gate was resolvable when the table was frozen.
/// - Declaration order is the iteration order of every accessor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Registry {
    entries: Vec<Entry>,
    positions: HashMap<Identifier, usize>,
}

impl Registry {
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn entries(&self) -> &[Entry] {
        &self.entries
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Entry> {
        self.entries.iter()
    }

    /// Entry at a declaration position.
    pub fn get(&self, index: usize) -> Option<&Entry> {
        self.entries.get(index)
    }

    /// Declaration position of `name`.
    pub fn position(&self, name: &str) -> Option<usize> {
        self.positions.get(name).copied()
    }

    /// Distinct gate names referenced by the table, in first-use order.
    pub fn gates(&self) -> Vec<&str> {
        let mut out: Vec<&str> = Vec::new();
        for gate in self.entries.iter().filter_map(|e| e.mode.gate()) {
            if !out.contains(&gate.name.as_str()) {
                out.push(gate.name.as_str());
            }
        }
        out
    }
}

impl<'a> IntoIterator for &'a Registry {
    type Item = &'a Entry;
    type IntoIter = std::slice::Iter<'a, Entry>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}
