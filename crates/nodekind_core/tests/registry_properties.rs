//! Property-based and scenario tests for the registry → classifier → expansion pipeline.
//!
//! The properties here are the consistency guarantees every generated artifact relies on: uniqueness, determinism,
//! order preservation, cross-consumer alignment, gate independence and name-table round trips.

use nodekind_core::expand::{self, generate, generate_slots};
use nodekind_core::{
    Classifier, GateSet, Inclusion, InclusionMode, Registry, RegistryBuilder, RegistryError, SlotPolicy, SoftFallback,
};
use proptest::prelude::*;

const GATES: [&str; 3] = ["g0", "g1", "g2"];

fn build(entries: &[(&str, InclusionMode)], gates: &GateSet) -> Result<Registry, RegistryError> {
    let mut b = RegistryBuilder::new();
    for (name, mode) in entries {
        b.register(*name, mode.clone())?;
    }
    b.finalize(gates)
}

// =============================================================================
// Concrete scenarios
// =============================================================================

fn abc() -> Vec<(&'static str, InclusionMode)> {
    vec![
        ("A", InclusionMode::Always),
        ("B", InclusionMode::optional("X").unwrap()),
        ("C", InclusionMode::Always),
    ]
}

#[test]
fn scenario_gate_off() {
    let gates = GateSet::new().with("X", false);
    let registry = build(&abc(), &gates).unwrap();
    let active = Classifier::new().classify(&registry, &gates).unwrap();

    let ids = generate(&active, |e| (e.name().to_string(), e.opcode.as_u32()));
    assert_eq!(ids, vec![("A".to_string(), 0), ("C".to_string(), 1)]);

    let names = generate(&active, |e| e.name());
    assert_eq!(names, vec!["A", "C"]);
}

#[test]
fn scenario_gate_on() {
    let gates = GateSet::new().with("X", true);
    let registry = build(&abc(), &gates).unwrap();
    let active = Classifier::new().classify(&registry, &gates).unwrap();

    let ids = generate(&active, |e| (e.name().to_string(), e.opcode.as_u32()));
    assert_eq!(
        ids,
        vec![("A".to_string(), 0), ("B".to_string(), 1), ("C".to_string(), 2)]
    );
    assert_eq!(generate(&active, |e| e.name()), vec!["A", "B", "C"]);
}

#[test]
fn scenario_duplicate() {
    let err = build(
        &[("Foo", InclusionMode::Always), ("Foo", InclusionMode::Always)],
        &GateSet::new(),
    )
    .unwrap_err();
    assert_eq!(
        err,
        RegistryError::DuplicateEntry {
            name: "Foo".into(),
            first_index: 0,
            second_index: 1,
        }
    );
}

#[test]
fn scenario_unknown_gate() {
    let err = build(&[("D", InclusionMode::optional("Y").unwrap())], &GateSet::new()).unwrap_err();
    assert_eq!(
        err,
        RegistryError::UnknownGate {
            gate: "Y".into(),
            entry: "D".into(),
        }
    );
}

#[test]
fn scenario_invalid_identifier() {
    let mut b = RegistryBuilder::new();
    b.register("E", InclusionMode::Always).unwrap();
    let err = b.register("1Bad", InclusionMode::Always).unwrap_err();
    assert_eq!(err, RegistryError::InvalidIdentifier { name: "1Bad".into() });
}

#[test]
fn scenario_generate_twice() {
    let gates = GateSet::new().with("X", true);
    let registry = build(&abc(), &gates).unwrap();
    let active = Classifier::new().classify(&registry, &gates).unwrap();
    let first = generate_slots(&active, SlotPolicy::Reserve, |s| format!("{}:{}", s.index, s.name()));
    let second = generate_slots(&active, SlotPolicy::Reserve, |s| format!("{}:{}", s.index, s.name()));
    assert_eq!(first, second);
}

// =============================================================================
// Properties
// =============================================================================

#[derive(Debug, Clone)]
struct Table {
    /// (mode kind, gate index): 0 = always, 1 = optional, 2 = soft.
    modes: Vec<(u8, usize)>,
    gate_values: [bool; 3],
    soft_include: bool,
}

impl Table {
    fn names(&self) -> Vec<String> {
        (0..self.modes.len()).map(|i| format!("N{i}")).collect()
    }

    fn mode(&self, i: usize) -> InclusionMode {
        let (kind, gate) = self.modes[i];
        match kind {
            0 => InclusionMode::Always,
            1 => InclusionMode::optional(GATES[gate]).unwrap(),
            _ => InclusionMode::soft(GATES[gate]).unwrap(),
        }
    }

    fn gates(&self) -> GateSet {
        GATES
            .iter()
            .zip(self.gate_values)
            .map(|(name, value)| (*name, value))
            .collect()
    }

    fn registry(&self) -> Registry {
        let names = self.names();
        let mut b = RegistryBuilder::new();
        for (i, name) in names.iter().enumerate() {
            b.register(name.as_str(), self.mode(i)).unwrap();
        }
        b.finalize(&self.gates()).unwrap()
    }

    fn classifier(&self) -> Classifier {
        Classifier::new().with_soft_fallback(if self.soft_include {
            SoftFallback::Include
        } else {
            SoftFallback::Exclude
        })
    }
}

fn table_strategy() -> impl Strategy<Value = Table> {
    (
        prop::collection::vec((0u8..3, 0usize..3), 0..40),
        prop::array::uniform3(any::<bool>()),
        any::<bool>(),
    )
        .prop_map(|(modes, gate_values, soft_include)| Table {
            modes,
            gate_values,
            soft_include,
        })
}

proptest! {
    #[test]
    fn classification_is_deterministic(table in table_strategy()) {
        let registry = table.registry();
        let gates = table.gates();
        let a = table.classifier().classify(&registry, &gates).unwrap();
        let b = table.classifier().classify(&registry, &gates).unwrap();
        prop_assert_eq!(a, b);
    }

    #[test]
    fn active_sequence_is_ordered_subsequence(table in table_strategy()) {
        let registry = table.registry();
        let gates = table.gates();
        let active = table.classifier().classify(&registry, &gates).unwrap();

        let positions: Vec<usize> = active.iter().map(|e| e.position).collect();
        prop_assert!(positions.windows(2).all(|w| w[0] < w[1]));
        for e in active.iter() {
            prop_assert_eq!(registry.get(e.position).map(|r| r.name()), Some(e.name()));
            prop_assert!(e.inclusion.is_active());
        }
        let excluded = active.decisions().filter(|(_, d)| *d == Inclusion::Excluded).count();
        prop_assert_eq!(active.len() + excluded, registry.len());
    }

    #[test]
    fn consumers_are_aligned(table in table_strategy()) {
        let registry = table.registry();
        let gates = table.gates();
        let active = table.classifier().classify(&registry, &gates).unwrap();

        let ids = generate(&active, |e| e.opcode.as_u32());
        let names = generate(&active, |e| e.name().to_string());
        prop_assert_eq!(ids.len(), names.len());
        for (i, (id, name)) in ids.iter().zip(&names).enumerate() {
            prop_assert_eq!(*id as usize, i);
            prop_assert_eq!(active.opcode_of(name).map(|o| o.index()), Some(i));
        }

        let reserved = generate_slots(&active, SlotPolicy::Reserve, |s| s.name().to_string());
        prop_assert_eq!(reserved.len(), registry.len());
        for (i, name) in reserved.iter().enumerate() {
            prop_assert_eq!(registry.position(name), Some(i));
        }
    }

    #[test]
    fn name_table_round_trips(table in table_strategy()) {
        let registry = table.registry();
        let gates = table.gates();
        let active = table.classifier().classify(&registry, &gates).unwrap();
        let names = generate(&active, |e| e.name());
        for e in active.iter() {
            let opcode = active.opcode_of(e.name()).unwrap();
            prop_assert_eq!(names[opcode.index()], e.name());
        }
    }

    #[test]
    fn toggling_a_gate_only_affects_its_entries(table in table_strategy(), toggled in 0usize..3) {
        let registry = table.registry();
        let before_gates = table.gates();
        let after_gates = before_gates.clone().with(GATES[toggled], !table.gate_values[toggled]);

        let before = table.classifier().classify(&registry, &before_gates).unwrap();
        let after = table.classifier().classify(&registry, &after_gates).unwrap();

        let untouched = |seq: &nodekind_core::ActiveSequence<'_>| -> Vec<String> {
            seq.iter()
                .filter(|e| e.entry.mode.gate().map(|g| g.name.as_str()) != Some(GATES[toggled]))
                .map(|e| e.name().to_string())
                .collect()
        };
        prop_assert_eq!(untouched(&before), untouched(&after));

        for ((entry, d_before), (_, d_after)) in before.decisions().zip(after.decisions()) {
            if entry.mode.gate().map(|g| g.name.as_str()) != Some(GATES[toggled]) {
                prop_assert_eq!(d_before, d_after);
            }
        }
    }

    #[test]
    fn run_matches_closure_form(table in table_strategy()) {
        struct Upper;
        impl nodekind_core::Consumer for Upper {
            type Item = String;
            fn name(&self) -> &'static str { "upper" }
            fn expand(&mut self, slot: nodekind_core::SlotRef<'_>) -> String {
                slot.name().to_uppercase()
            }
        }

        let registry = table.registry();
        let gates = table.gates();
        let active = table.classifier().classify(&registry, &gates).unwrap();
        let artifact = expand::run(&active, &mut Upper);
        let closure = generate(&active, |e| e.name().to_uppercase());
        prop_assert_eq!(artifact.items, closure);
    }
}
