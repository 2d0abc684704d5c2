//! Dispatch-table consumer: maps every slot to a caller-provided handler.
//!
//! Handlers are registered by node-kind name before the run; slots without a handler (and reserved slots) fall back
//! to the default handler when one is set. The resulting artifact is indexed by slot, so an opcode from an aligned
//! [`OpcodeEnum`](super::OpcodeEnum) artifact can be used directly with [`DispatchTable::lookup`].

use std::collections::HashMap;

use nodekind_core::{Artifact, Consumer, SlotPolicy, SlotRef};

/// One dispatch-table row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DispatchRecord<H> {
    pub slot: usize,
    pub name: String,
    pub handler: Option<H>,
}

#[derive(Debug, Clone)]
pub struct DispatchTable<H> {
    handlers: HashMap<String, H>,
    default: Option<H>,
    policy: SlotPolicy,
}

impl<H> Default for DispatchTable<H> {
    fn default() -> Self {
        Self {
            handlers: HashMap::new(),
            default: None,
            policy: SlotPolicy::default(),
        }
    }
}

impl<H: Clone> DispatchTable<H> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_slot_policy(mut self, policy: SlotPolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Handler for the node kind called `name`.
    pub fn with_handler(mut self, name: impl Into<String>, handler: H) -> Self {
        self.handlers.insert(name.into(), handler);
        self
    }

    pub fn with_handlers<K: Into<String>>(mut self, handlers: impl IntoIterator<Item = (K, H)>) -> Self {
        self.handlers
            .extend(handlers.into_iter().map(|(name, handler)| (name.into(), handler)));
        self
    }

    /// Handler for slots with no specific handler, including reserved slots.
    pub fn with_default(mut self, handler: H) -> Self {
        self.default = Some(handler);
        self
    }

    /// Handler stored for `slot` in a dispatch artifact.
    pub fn lookup(artifact: &Artifact<DispatchRecord<H>>, slot: usize) -> Option<&H> {
        artifact.items.get(slot).and_then(|r| r.handler.as_ref())
    }
}

impl<H: Clone> Consumer for DispatchTable<H> {
    type Item = DispatchRecord<H>;

    fn name(&self) -> &'static str {
        "dispatch"
    }

    fn slot_policy(&self) -> SlotPolicy {
        self.policy
    }

    fn expand(&mut self, slot: SlotRef<'_>) -> DispatchRecord<H> {
        let specific = if slot.is_reserved() {
            None
        } else {
            self.handlers.get(slot.name())
        };
        DispatchRecord {
            slot: slot.index,
            name: slot.name().to_string(),
            handler: specific.or(self.default.as_ref()).cloned(),
        }
    }
}
