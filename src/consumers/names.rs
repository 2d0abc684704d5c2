//! Name-table consumer: the human-readable name of each slot.

use nodekind_core::{Consumer, SlotPolicy, SlotRef};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NameRow {
    pub name: String,
    pub reserved: bool,
}

#[derive(Debug, Clone, Copy, Default)]
pub struct NameTable {
    policy: SlotPolicy,
}

impl NameTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_slot_policy(mut self, policy: SlotPolicy) -> Self {
        self.policy = policy;
        self
    }
}

impl Consumer for NameTable {
    type Item = NameRow;

    fn name(&self) -> &'static str {
        "names"
    }

    fn slot_policy(&self) -> SlotPolicy {
        self.policy
    }

    fn expand(&mut self, slot: SlotRef<'_>) -> NameRow {
        NameRow {
            name: slot.name().to_string(),
            reserved: slot.is_reserved(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::consumers::OpcodeEnum;
    use crate::test_support::abc_sequence;
    use nodekind_core::expand;

    #[test]
    fn names_round_trip_through_opcodes() {
        for gate in [false, true] {
            abc_sequence(gate, |active| {
                let ids = expand::run(active, &mut OpcodeEnum::new());
                let names = expand::run(active, &mut NameTable::new());
                assert!(ids.is_aligned_with(&names));
                for row in ids.iter() {
                    assert_eq!(names[row.id as usize].name, row.name);
                }
            });
        }
    }

    #[test]
    fn mixed_policies_are_not_aligned() {
        abc_sequence(false, |active| {
            let compact = expand::run(active, &mut NameTable::new());
            let reserved = expand::run(active, &mut NameTable::new().with_slot_policy(SlotPolicy::Reserve));
            assert!(!compact.is_aligned_with(&reserved));
            assert_eq!(reserved.len(), 3);
            assert!(reserved[1].reserved);
        });
    }
}
