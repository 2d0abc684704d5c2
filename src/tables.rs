//! Bundled declaration tables.

use nodekind_core::GateSet;

/// HotSpot C2 ideal-graph node kinds, in declaration order.
pub const C2_NODES: &str = include_str!("../tables/c2_nodes.nk");

/// Name used for [`C2_NODES`] in diagnostics.
pub const C2_NODES_ORIGIN: &str = "tables/c2_nodes.nk";

/// Capability gating the Shenandoah barrier nodes of [`C2_NODES`].
pub const SHENANDOAH_GC: &str = "shenandoah_gc";

/// Gate defaults for [`C2_NODES`]: every capability it references, off.
pub fn c2_default_gates() -> GateSet {
    GateSet::new().with(SHENANDOAH_GC, false)
}
