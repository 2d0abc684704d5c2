#![no_main]

use libfuzzer_sys::fuzz_target;
use nodekind_core::{Classifier, GateSet};
use nodekind_syntax::{lexer, lower, parser};

fuzz_target!(|data: &[u8]| {
    let Ok(source) = std::str::from_utf8(data) else {
        return;
    };
    let Ok(tokens) = lexer::lex(source) else {
        return;
    };
    let Ok(table) = parser::parse(&tokens) else {
        return;
    };
    let Ok(builder) = lower::lower(&table) else {
        return;
    };

    // Resolve every referenced gate to `true` so finalize only fails on duplicates.
    let gates: GateSet = table
        .declarations
        .iter()
        .filter_map(|d| d.node.mode.as_ref())
        .map(|m| (m.node.gate.node.clone(), true))
        .collect();
    if let Ok(registry) = builder.finalize(&gates) {
        let active = Classifier::new().classify(&registry, &gates);
        assert!(active.is_ok(), "classification must succeed after finalize");
    }
});
