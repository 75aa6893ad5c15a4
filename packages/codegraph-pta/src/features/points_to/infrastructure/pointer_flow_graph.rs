//! Pointer flow graph
//!
//! Edge `u → v` means every object `u` points to also flows into `v`.
//! Edges are added at most once and never removed.

use crate::features::points_to::domain::PointerId;
use petgraph::graphmap::DiGraphMap;
use petgraph::Direction;

#[derive(Debug, Clone, Default)]
pub struct PointerFlowGraph {
    graph: DiGraphMap<PointerId, ()>,
}

impl PointerFlowGraph {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add `source → target`. Returns false if the edge already existed.
    pub fn add_edge(&mut self, source: PointerId, target: PointerId) -> bool {
        if self.graph.contains_edge(source, target) {
            return false;
        }
        self.graph.add_edge(source, target, ());
        true
    }

    /// Pointers `pointer` flows into
    pub fn succs_of(&self, pointer: PointerId) -> impl Iterator<Item = PointerId> + '_ {
        self.graph.neighbors_directed(pointer, Direction::Outgoing)
    }

    pub fn has_edge(&self, source: PointerId, target: PointerId) -> bool {
        self.graph.contains_edge(source, target)
    }

    pub fn edge_count(&self) -> usize {
        self.graph.edge_count()
    }

    pub fn node_count(&self) -> usize {
        self.graph.node_count()
    }
}
