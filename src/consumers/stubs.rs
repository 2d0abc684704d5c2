//! Forward-declaration consumer: one type stub per node class.
//!
//! The type name is the node-kind name with a `Node` suffix (`AddI` → `AddINode`), which is how IR node classes are
//! conventionally named next to their opcodes.

use nodekind_core::{Consumer, SlotPolicy, SlotRef};

pub const TYPE_SUFFIX: &str = "Node";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TypeStub {
    pub node: String,
    pub type_name: String,
    pub reserved: bool,
}

#[derive(Debug, Clone, Copy, Default)]
pub struct ForwardDecls {
    policy: SlotPolicy,
}

impl ForwardDecls {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_slot_policy(mut self, policy: SlotPolicy) -> Self {
        self.policy = policy;
        self
    }
}

impl Consumer for ForwardDecls {
    type Item = TypeStub;

    fn name(&self) -> &'static str {
        "stubs"
    }

    fn slot_policy(&self) -> SlotPolicy {
        self.policy
    }

    fn expand(&mut self, slot: SlotRef<'_>) -> TypeStub {
        TypeStub {
            node: slot.name().to_string(),
            type_name: format!("{}{TYPE_SUFFIX}", slot.name()),
            reserved: slot.is_reserved(),
        }
    }
}
