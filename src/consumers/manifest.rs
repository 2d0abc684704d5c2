//! Manifest consumer: a JSON description of one build's active sequence.
//!
//! The manifest records the inputs that shaped the build (gate values, soft fallback, slot policy) next to one row per
//! slot, so downstream tooling can check which node kinds a generated artifact was built with without re-running the
//! classifier.

use std::collections::BTreeMap;

use nodekind_core::{ActiveSequence, Artifact, Consumer, GateSet, Inclusion, SlotPolicy, SlotRef, SoftFallback};
use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ManifestRow {
    pub slot: usize,
    pub name: String,
    /// Classifier decision (`always`, `gate-on`, `soft-fallback`, `excluded`).
    pub inclusion: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub gate: Option<String>,
}

#[derive(Debug, Clone, Copy, Default)]
pub struct Manifest {
    policy: SlotPolicy,
}

impl Manifest {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_slot_policy(mut self, policy: SlotPolicy) -> Self {
        self.policy = policy;
        self
    }
}

impl Consumer for Manifest {
    type Item = ManifestRow;

    fn name(&self) -> &'static str {
        "manifest"
    }

    fn slot_policy(&self) -> SlotPolicy {
        self.policy
    }

    fn expand(&mut self, slot: SlotRef<'_>) -> ManifestRow {
        let inclusion = slot.active().map(|e| e.inclusion).unwrap_or(Inclusion::Excluded);
        ManifestRow {
            slot: slot.index,
            name: slot.name().to_string(),
            inclusion: inclusion.as_str(),
            gate: slot.entry().mode.gate().map(|g| g.name.to_string()),
        }
    }
}

/// Serialized manifest.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ManifestDocument {
    pub generator: String,
    pub slot_policy: &'static str,
    pub soft_fallback: &'static str,
    pub gates: BTreeMap<String, bool>,
    pub declared: usize,
    pub active: usize,
    pub entries: Vec<ManifestRow>,
}

impl ManifestDocument {
    pub fn new(
        sequence: &ActiveSequence<'_>,
        gates: &GateSet,
        soft_fallback: SoftFallback,
        artifact: Artifact<ManifestRow>,
    ) -> Self {
        let referenced = sequence.registry().gates();
        Self {
            generator: format!("nodekind {}", crate::version::NODEKIND_VERSION),
            slot_policy: policy_name(artifact.policy),
            soft_fallback: match soft_fallback {
                SoftFallback::Include => "include",
                SoftFallback::Exclude => "exclude",
            },
            gates: gates
                .iter()
                .filter(|(name, _)| referenced.contains(name))
                .map(|(name, value)| (name.to_string(), value))
                .collect(),
            declared: sequence.registry().len(),
            active: sequence.len(),
            entries: artifact.items,
        }
    }

    /// Pretty-printed JSON with a trailing newline.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        let mut json = serde_json::to_string_pretty(self)?;
        json.push('\n');
        Ok(json)
    }
}

pub(crate) fn policy_name(policy: SlotPolicy) -> &'static str {
    match policy {
        SlotPolicy::Compact => "compact",
        SlotPolicy::Reserve => "reserve",
    }
}
