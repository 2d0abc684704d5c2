//! Generation configuration and gate resolution.
//!
//! Gate values come from two places: a JSON object file (`{"shenandoah_gc": true}`) and repeated `name=value`
//! command-line specs. Command-line values win. The result is one [`GateSet`] handed to the registry unchanged.

use std::collections::{BTreeMap, BTreeSet};
use std::fs;
use std::path::{Path, PathBuf};

use nodekind_core::{GateSet, SlotPolicy, SoftFallback, ident};
use serde::Deserialize;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid gate `{spec}`: expected `name=value`")]
    InvalidGateSpec { spec: String },

    #[error("invalid gate name `{name}`")]
    InvalidGateName { name: String },

    #[error("invalid value `{value}` for gate `{gate}`: expected true/false, on/off, yes/no or 1/0")]
    InvalidGateValue { gate: String, value: String },

    #[error("cannot read gates file `{}`: {source}", .path.display())]
    GatesFileIo {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid gates file `{}`: {source}", .path.display())]
    GatesFileFormat {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

/// Parse a boolean gate value.
pub fn parse_gate_value(value: &str) -> Option<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "true" | "on" | "yes" | "1" => Some(true),
        "false" | "off" | "no" | "0" => Some(false),
        _ => None,
    }
}

/// Parse one `name=value` gate spec.
pub fn parse_gate_spec(spec: &str) -> Result<(String, bool), ConfigError> {
    let Some((name, value)) = spec.split_once('=') else {
        return Err(ConfigError::InvalidGateSpec { spec: spec.to_string() });
    };
    let name = name.trim();
    if !ident::is_valid_identifier(name) {
        return Err(ConfigError::InvalidGateName { name: name.to_string() });
    }
    let enabled = parse_gate_value(value).ok_or_else(|| ConfigError::InvalidGateValue {
        gate: name.to_string(),
        value: value.to_string(),
    })?;
    Ok((name.to_string(), enabled))
}

#[derive(Debug, Deserialize)]
#[serde(transparent)]
struct GatesFile(BTreeMap<String, bool>);

/// Parse a JSON gate object. `origin` is only used in errors.
pub fn parse_gates_json(json: &str, origin: &Path) -> Result<GateSet, ConfigError> {
    let GatesFile(values) = serde_json::from_str(json).map_err(|source| ConfigError::GatesFileFormat {
        path: origin.to_path_buf(),
        source,
    })?;
    if let Some(name) = values.keys().find(|name| !ident::is_valid_identifier(name)) {
        return Err(ConfigError::InvalidGateName { name: name.clone() });
    }
    Ok(values.into_iter().collect())
}

pub fn load_gates_file(path: &Path) -> Result<GateSet, ConfigError> {
    let json = fs::read_to_string(path).map_err(|source| ConfigError::GatesFileIo {
        path: path.to_path_buf(),
        source,
    })?;
    parse_gates_json(&json, path)
}

/// Resolve the final gate mapping: `defaults`, then the gates file, then command-line specs.
#[tracing::instrument(skip_all, fields(file = ?file, specs = specs.len()))]
pub fn resolve_gates(defaults: GateSet, file: Option<&Path>, specs: &[String]) -> Result<GateSet, ConfigError> {
    let mut gates = defaults;
    if let Some(path) = file {
        gates = gates.merged_with(&load_gates_file(path)?);
    }
    for spec in specs {
        let (name, enabled) = parse_gate_spec(spec)?;
        gates.set(name, enabled);
    }
    tracing::debug!(gates = gates.len(), "resolved gates");
    Ok(gates)
}

/// One generated file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Output {
    Opcodes,
    Names,
    Stubs,
    Visitor,
    Manifest,
}

impl Output {
    pub const ALL: [Output; 5] = [
        Output::Opcodes,
        Output::Names,
        Output::Stubs,
        Output::Visitor,
        Output::Manifest,
    ];

    pub fn file_name(self) -> &'static str {
        match self {
            Output::Opcodes => "opcodes.rs",
            Output::Names => "names.rs",
            Output::Stubs => "stubs.rs",
            Output::Visitor => "visitor.rs",
            Output::Manifest => "manifest.json",
        }
    }
}

/// Configuration for one generation run.
#[derive(Debug, Clone)]
pub struct GenerateConfig {
    /// Resolved gate values
    pub gates: GateSet,
    /// What soft-gated entries do when their capability is off
    pub soft_fallback: SoftFallback,
    /// Slot policy shared by every emitted artifact
    pub slot_policy: SlotPolicy,
    /// Files to produce
    pub outputs: BTreeSet<Output>,
}

impl Default for GenerateConfig {
    fn default() -> Self {
        Self {
            gates: GateSet::new(),
            soft_fallback: SoftFallback::Exclude,
            slot_policy: SlotPolicy::Compact,
            outputs: Output::ALL.into_iter().collect(),
        }
    }
}

impl GenerateConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_gates(mut self, gates: GateSet) -> Self {
        self.gates = gates;
        self
    }

    pub fn with_gate(mut self, name: impl Into<String>, enabled: bool) -> Self {
        self.gates.set(name, enabled);
        self
    }

    pub fn with_soft_fallback(mut self, fallback: SoftFallback) -> Self {
        self.soft_fallback = fallback;
        self
    }

    pub fn with_slot_policy(mut self, policy: SlotPolicy) -> Self {
        self.slot_policy = policy;
        self
    }

    /// Restrict generation to `outputs`. An empty set is treated as "everything".
    pub fn with_outputs(mut self, outputs: impl IntoIterator<Item = Output>) -> Self {
        let outputs: BTreeSet<Output> = outputs.into_iter().collect();
        self.outputs = if outputs.is_empty() {
            Output::ALL.into_iter().collect()
        } else {
            outputs
        };
        self
    }

    pub fn wants(&self, output: Output) -> bool {
        self.outputs.contains(&output)
    }
}
