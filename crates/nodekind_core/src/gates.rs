//! Resolved gate mapping supplied by the surrounding build.
//!
//! The registry never resolves feature flags itself. It receives a finished `name -> bool` mapping once per build and
//! only reads it.

use std::collections::BTreeMap;

/// Capability name to boolean, resolved outside the registry.
///
/// ## Notes
/// - Backed by a `BTreeMap` so iteration order (and anything derived from it, e.g. a manifest) is deterministic.
///
/// ## Examples
/// ```rust
/// use nodekind_core::GateSet;
///
/// let gates = GateSet::new().with("shenandoah_gc", true).with("native_calls", false);
/// assert_eq!(gates.get("shenandoah_gc"), Some(true));
/// assert_eq!(gates.get("zgc"), None);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GateSet {
    values: BTreeMap<String, bool>,
}

impl GateSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style insert.
    pub fn with(mut self, name: impl Into<String>, enabled: bool) -> Self {
        self.values.insert(name.into(), enabled);
        self
    }

    /// Insert or override a gate value.
    pub fn set(&mut self, name: impl Into<String>, enabled: bool) {
        self.values.insert(name.into(), enabled);
    }

    /// Look up a gate. `None` means the build never resolved it.
    pub fn get(&self, name: &str) -> Option<bool> {
        self.values.get(name).copied()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.values.contains_key(name)
    }

    /// Overlay `other` on top of `self`; values in `other` win.
    pub fn merged_with(mut self, other: &GateSet) -> Self {
        for (name, enabled) in &other.values {
            self.values.insert(name.clone(), *enabled);
        }
        self
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, bool)> {
        self.values.iter().map(|(k, v)| (k.as_str(), *v))
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

impl<K: Into<String>> FromIterator<(K, bool)> for GateSet {
    fn from_iter<I: IntoIterator<Item = (K, bool)>>(iter: I) -> Self {
        Self {
            values: iter.into_iter().map(|(k, v)| (k.into(), v)).collect(),
        }
    }
}
