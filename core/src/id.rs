//! Graph-scoped handles.
//!
//! A handle is an arena slot plus the id of the graph that allocated it, so
//! a graph can reject handles it did not hand out.

use std::fmt;
use std::sync::atomic::{AtomicU32, Ordering};

static NEXT_GRAPH_ID: AtomicU32 = AtomicU32::new(1);

/// Identifier of one graph instance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct GraphId(u32);

impl GraphId {
    /// Allocate a fresh, process-unique graph id.
    pub fn next() -> Self {
        Self(NEXT_GRAPH_ID.fetch_add(1, Ordering::Relaxed))
    }
}

impl fmt::Display for GraphId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "g{}", self.0)
    }
}

macro_rules! handle {
    ($(#[$doc:meta])* $name:ident, $prefix:literal) => {
        $(#[$doc])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
        pub struct $name {
            graph: GraphId,
            slot: u64,
        }

        impl $name {
            pub fn new(graph: GraphId, slot: u64) -> Self {
                Self { graph, slot }
            }

            /// The graph that allocated this handle.
            pub fn graph(&self) -> GraphId {
                self.graph
            }

            pub fn slot(&self) -> u64 {
                self.slot
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, concat!($prefix, "{}@{}"), self.slot, self.graph)
            }
        }
    };
}

handle!(
    /// Handle of a node inside one graph.
    NodeId,
    "n"
);
handle!(
    /// Handle of an edge inside one graph.
    EdgeId,
    "e"
);
