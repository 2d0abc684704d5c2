//! Expansion engine: one consumer-supplied transform applied to every slot of an active sequence.
//!
//! The engine assigns no meaning beyond position. Each consumer injects its own semantics through a transform (a
//! closure or a [`Consumer`] implementation) and gets back exactly one element per slot, in sequence order. Because
//! every consumer walks the same sequence, an index computed from one consumer's artifact is a valid index into every
//! other artifact produced under the same [`SlotPolicy`].
//!
//! ## Notes
//! - Expansion is side-effect-free apart from what the transform itself does, and running it twice over the same
//!   inputs produces identical output.
//! - Some consumers need gated-out entries to keep their numeric slot (ABI-stable numbering); others want them gone.
//!   That choice is per consumer, not global: see [`SlotPolicy`].

use crate::classify::{ActiveEntry, ActiveSequence, Inclusion};
use crate::entry::Entry;

/// How excluded optional entries are treated by one consumer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum SlotPolicy {
    /// Excluded entries produce nothing; slot numbers are opcodes.
    #[default]
    Compact,
    /// Excluded entries produce a reserved placeholder; slot numbers are declaration positions.
    Reserve,
}

/// A gated-out entry kept as a placeholder under [`SlotPolicy::Reserve`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReservedEntry<'r> {
    pub position: usize,
    pub entry: &'r Entry,
}

impl<'r> ReservedEntry<'r> {
    pub fn name(&self) -> &'r str {
        self.entry.name()
    }
}

/// One element position of an expansion.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Slot<'r> {
    Active(ActiveEntry<'r>),
    Reserved(ReservedEntry<'r>),
}

/// A slot together with its index in the expanded artifact.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SlotRef<'r> {
    /// Index of this element in the artifact.
    pub index: usize,
    pub slot: Slot<'r>,
}

impl<'r> SlotRef<'r> {
    pub fn name(&self) -> &'r str {
        match self.slot {
            Slot::Active(e) => e.name(),
            Slot::Reserved(e) => e.name(),
        }
    }

    pub fn entry(&self) -> &'r Entry {
        match self.slot {
            Slot::Active(e) => e.entry,
            Slot::Reserved(e) => e.entry,
        }
    }

    pub fn is_reserved(&self) -> bool {
        matches!(self.slot, Slot::Reserved(_))
    }

    pub fn active(&self) -> Option<ActiveEntry<'r>> {
        match self.slot {
            Slot::Active(e) => Some(e),
            Slot::Reserved(_) => None,
        }
    }
}

/// Enumerate the slots of `sequence` under `policy`.
pub fn slots<'s, 'r>(sequence: &'s ActiveSequence<'r>, policy: SlotPolicy) -> Box<dyn Iterator<Item = SlotRef<'r>> + 's> {
    match policy {
        SlotPolicy::Compact => Box::new(sequence.iter().map(|entry| SlotRef {
            index: entry.opcode.index(),
            slot: Slot::Active(entry),
        })),
        SlotPolicy::Reserve => {
            let mut active = sequence.iter().peekable();
            Box::new(
                sequence
                    .decisions()
                    .enumerate()
                    .map(move |(position, (entry, decision))| {
                        let slot = match decision {
                            Inclusion::Excluded => Slot::Reserved(ReservedEntry { position, entry }),
                            _ => match active.next_if(|a| a.position == position) {
                                Some(a) => Slot::Active(a),
                                // Decisions and the active list come from the same classification.
                                None => Slot::Reserved(ReservedEntry { position, entry }),
                            },
                        };
                        SlotRef { index: position, slot }
                    }),
            )
        }
    }
}

/// Apply `transform` to every active entry, in opcode order.
///
/// This is the compact, closure-based form; it yields exactly `sequence.len()` elements.
///
/// ## Examples
/// ```rust
/// use nodekind_core::{expand, Classifier, GateSet, InclusionMode, RegistryBuilder};
///
/// let mut b = RegistryBuilder::new();
/// b.register("A", InclusionMode::Always).unwrap();
/// b.register("B", InclusionMode::optional("X").unwrap()).unwrap();
/// b.register("C", InclusionMode::Always).unwrap();
/// let gates = GateSet::new().with("X", false);
/// let registry = b.finalize(&gates).unwrap();
/// let active = Classifier::new().classify(&registry, &gates).unwrap();
///
/// let ids = expand::generate(&active, |e| (e.name().to_string(), e.opcode.as_u32()));
/// assert_eq!(ids, [("A".to_string(), 0), ("C".to_string(), 1)]);
/// ```
#[tracing::instrument(skip_all, fields(active = sequence.len()))]
pub fn generate<'r, A, F>(sequence: &ActiveSequence<'r>, mut transform: F) -> Vec<A>
where
    F: FnMut(ActiveEntry<'r>) -> A,
{
    let mut out = Vec::with_capacity(sequence.len());
    for entry in sequence.iter() {
        out.push(transform(entry));
    }
    out
}

/// Apply `transform` to every slot under `policy`.
#[tracing::instrument(skip_all, fields(active = sequence.len(), policy = ?policy))]
pub fn generate_slots<'r, A, F>(sequence: &ActiveSequence<'r>, policy: SlotPolicy, transform: F) -> Vec<A>
where
    F: FnMut(SlotRef<'r>) -> A,
{
    slots(sequence, policy).map(transform).collect()
}

/// A named artifact generator driven by the expansion engine.
///
/// Implementations own their transform and never see another consumer's state.
pub trait Consumer {
    /// One artifact element.
    type Item;

    /// Short stable name, used in logs and manifests.
    fn name(&self) -> &'static str;

    fn slot_policy(&self) -> SlotPolicy {
        SlotPolicy::Compact
    }

    fn expand(&mut self, slot: SlotRef<'_>) -> Self::Item;
}

/// An expanded artifact: one element per slot, tagged with how it was produced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Artifact<T> {
    pub consumer: &'static str,
    pub policy: SlotPolicy,
    pub items: Vec<T>,
}

impl<T> Artifact<T> {
    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, T> {
        self.items.iter()
    }

    /// Whether indices into `self` are valid indices into `other` for the same entries.
    pub fn is_aligned_with<U>(&self, other: &Artifact<U>) -> bool {
        self.policy == other.policy && self.items.len() == other.items.len()
    }
}

impl<T> std::ops::Index<usize> for Artifact<T> {
    type Output = T;

    fn index(&self, index: usize) -> &T {
        &self.items[index]
    }
}

/// Drive `consumer` over `sequence` with the consumer's own slot policy.
pub fn run<C: Consumer + ?Sized>(sequence: &ActiveSequence<'_>, consumer: &mut C) -> Artifact<C::Item> {
    let policy = consumer.slot_policy();
    let span = tracing::debug_span!("expand", consumer = consumer.name(), policy = ?policy);
    let _guard = span.enter();

    let items: Vec<C::Item> = slots(sequence, policy).map(|slot| consumer.expand(slot)).collect();
    tracing::debug!(items = items.len(), "expansion finished");
    Artifact {
        consumer: consumer.name(),
        policy,
        items,
    }
}
