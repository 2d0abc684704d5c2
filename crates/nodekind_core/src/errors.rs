//! Registry authoring errors.
//!
//! Every variant is a deterministic authoring defect detected before any consumer runs. None of them are retryable,
//! and there is no partial success: either the whole registry freezes or the build step fails.

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RegistryError {
    /// A node-kind or gate name is not a valid identifier in the generated artifacts.
    #[error("invalid identifier `{name}`: expected ASCII letters, digits or `_`, not starting with a digit")]
    InvalidIdentifier { name: String },

    /// A node-kind name was declared more than once. Indices are declaration positions.
    #[error("duplicate entry `{name}` at position {second_index} (first declared at position {first_index})")]
    DuplicateEntry {
        name: String,
        first_index: usize,
        second_index: usize,
    },

    /// An optional entry references a gate missing from the resolved gate set.
    #[error("entry `{entry}` references unknown gate `{gate}`")]
    UnknownGate { gate: String, entry: String },
}
