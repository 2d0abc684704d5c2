//! Opcode consumer: one dense integer id per slot.

use nodekind_core::{Consumer, SlotPolicy, SlotRef};

/// One opcode enum variant.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OpcodeRow {
    pub name: String,
    pub id: u32,
    /// Gated out in this build; the id is kept so later ids do not shift.
    pub reserved: bool,
}

#[derive(Debug, Clone, Copy, Default)]
pub struct OpcodeEnum {
    policy: SlotPolicy,
}

impl OpcodeEnum {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_slot_policy(mut self, policy: SlotPolicy) -> Self {
        self.policy = policy;
        self
    }
}

impl Consumer for OpcodeEnum {
    type Item = OpcodeRow;

    fn name(&self) -> &'static str {
        "opcodes"
    }

    fn slot_policy(&self) -> SlotPolicy {
        self.policy
    }

    fn expand(&mut self, slot: SlotRef<'_>) -> OpcodeRow {
        OpcodeRow {
            name: slot.name().to_string(),
            id: slot.index as u32,
            reserved: slot.is_reserved(),
        }
    }
}
