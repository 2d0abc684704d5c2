//! Shared fixtures for unit tests.

use nodekind_core::{ActiveSequence, Classifier, GateSet, InclusionMode, RegistryBuilder};

/// `[A, B if(X), C]` classified with `X = x`.
pub fn abc_sequence(x: bool, test: impl FnOnce(&ActiveSequence<'_>)) {
    let gates = GateSet::new().with("X", x);
    let mut builder = RegistryBuilder::new();
    builder.register("A", InclusionMode::Always).unwrap();
    builder.register("B", InclusionMode::optional("X").unwrap()).unwrap();
    builder.register("C", InclusionMode::Always).unwrap();
    let registry = builder.finalize(&gates).unwrap();
    let active = Classifier::new().classify(&registry, &gates).unwrap();
    test(&active);
}
