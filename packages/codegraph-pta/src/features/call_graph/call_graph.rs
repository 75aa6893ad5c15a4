//! Call graph
//!
//! Generic over the call-site and method representation so the same structure
//! serves the context-sensitive graph built by the solver
//! (`CallGraph<CSCallSiteId, CSMethodId>`) and its context-insensitive
//! projection / the CHA graph (`CallGraph<StmtId, MethodId>`).
//! Edges are only ever added.

use crate::ir::InvokeKind;
use petgraph::dot::{Config, Dot};
use petgraph::graph::{DiGraph, NodeIndex};
use rustc_hash::{FxHashMap, FxHashSet};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::hash::Hash;

/// How a call edge was resolved
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum CallKind {
    Static,
    Special,
    Virtual,
    Interface,
    Dynamic,
    Other,
}

impl CallKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            CallKind::Static => "STATIC",
            CallKind::Special => "SPECIAL",
            CallKind::Virtual => "VIRTUAL",
            CallKind::Interface => "INTERFACE",
            CallKind::Dynamic => "DYNAMIC",
            CallKind::Other => "OTHER",
        }
    }
}

impl From<InvokeKind> for CallKind {
    fn from(kind: InvokeKind) -> Self {
        match kind {
            InvokeKind::Static => CallKind::Static,
            InvokeKind::Special => CallKind::Special,
            InvokeKind::Virtual => CallKind::Virtual,
            InvokeKind::Interface => CallKind::Interface,
            InvokeKind::Dynamic => CallKind::Dynamic,
        }
    }
}

impl fmt::Display for CallKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Call edge. `caller` is the method containing `call_site`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Edge<CS, M> {
    pub kind: CallKind,
    pub caller: M,
    pub call_site: CS,
    pub callee: M,
}

impl<CS, M> Edge<CS, M> {
    pub fn new(kind: CallKind, caller: M, call_site: CS, callee: M) -> Self {
        Self {
            kind,
            caller,
            call_site,
            callee,
        }
    }
}

#[derive(Debug, Clone)]
pub struct CallGraph<CS, M> {
    entry_methods: Vec<M>,

    /// Reachable methods in discovery order
    reachable: Vec<M>,
    reachable_set: FxHashSet<M>,

    /// Edges in discovery order
    edges: Vec<Edge<CS, M>>,
    edge_set: FxHashSet<Edge<CS, M>>,

    out_edges: FxHashMap<CS, Vec<usize>>,
    in_edges: FxHashMap<M, Vec<usize>>,
}

impl<CS, M> Default for CallGraph<CS, M> {
    fn default() -> Self {
        Self {
            entry_methods: Vec::new(),
            reachable: Vec::new(),
            reachable_set: FxHashSet::default(),
            edges: Vec::new(),
            edge_set: FxHashSet::default(),
            out_edges: FxHashMap::default(),
            in_edges: FxHashMap::default(),
        }
    }
}

impl<CS, M> CallGraph<CS, M>
where
    CS: Copy + Eq + Hash,
    M: Copy + Eq + Hash,
{
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_entry_method(&mut self, method: M) {
        if !self.entry_methods.contains(&method) {
            self.entry_methods.push(method);
        }
    }

    pub fn entry_methods(&self) -> &[M] {
        &self.entry_methods
    }

    /// Mark `method` reachable. Returns false if it already was.
    pub fn add_reachable_method(&mut self, method: M) -> bool {
        if self.reachable_set.insert(method) {
            self.reachable.push(method);
            true
        } else {
            false
        }
    }

    #[inline]
    pub fn contains(&self, method: M) -> bool {
        self.reachable_set.contains(&method)
    }

    pub fn reachable_methods(&self) -> impl Iterator<Item = M> + '_ {
        self.reachable.iter().copied()
    }

    pub fn reachable_count(&self) -> usize {
        self.reachable.len()
    }

    /// Add an edge. Returns false if the identical edge already exists.
    pub fn add_edge(&mut self, edge: Edge<CS, M>) -> bool {
        if !self.edge_set.insert(edge) {
            return false;
        }
        let index = self.edges.len();
        self.edges.push(edge);
        self.out_edges.entry(edge.call_site).or_default().push(index);
        self.in_edges.entry(edge.callee).or_default().push(index);
        true
    }

    pub fn has_edge(&self, edge: &Edge<CS, M>) -> bool {
        self.edge_set.contains(edge)
    }

    pub fn edges(&self) -> impl Iterator<Item = &Edge<CS, M>> + '_ {
        self.edges.iter()
    }

    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    /// Edges leaving `call_site`
    pub fn edges_out_of(&self, call_site: CS) -> impl Iterator<Item = &Edge<CS, M>> + '_ {
        self.out_edges
            .get(&call_site)
            .into_iter()
            .flatten()
            .map(move |&i| &self.edges[i])
    }

    /// Edges entering `method`
    pub fn edges_into(&self, method: M) -> impl Iterator<Item = &Edge<CS, M>> + '_ {
        self.in_edges
            .get(&method)
            .into_iter()
            .flatten()
            .map(move |&i| &self.edges[i])
    }

    pub fn callees_of(&self, call_site: CS) -> impl Iterator<Item = M> + '_ {
        self.edges_out_of(call_site).map(|e| e.callee)
    }

    /// Methods with at least one call into `method`
    pub fn callers_of(&self, method: M) -> impl Iterator<Item = M> + '_ {
        self.edges_into(method).map(|e| e.caller)
    }

    /// Method-level petgraph view (parallel call sites collapse into one edge
    /// per (caller, callee, kind))
    pub fn to_petgraph(&self) -> DiGraph<M, CallKind> {
        let mut graph = DiGraph::new();
        let mut nodes: FxHashMap<M, NodeIndex> = FxHashMap::default();
        for &m in &self.reachable {
            nodes.insert(m, graph.add_node(m));
        }
        let mut seen = FxHashSet::default();
        for edge in &self.edges {
            if !seen.insert((edge.caller, edge.callee, edge.kind)) {
                continue;
            }
            let src = *nodes
                .entry(edge.caller)
                .or_insert_with(|| graph.add_node(edge.caller));
            let dst = *nodes
                .entry(edge.callee)
                .or_insert_with(|| graph.add_node(edge.callee));
            graph.add_edge(src, dst, edge.kind);
        }
        graph
    }

    /// Graphviz rendering with caller-supplied method labels
    pub fn to_dot(&self, label: impl Fn(M) -> String) -> String {
        let graph = self.to_petgraph().map(|_, &m| label(m), |_, &kind| kind);
        let body = Dot::with_config(&graph, &[Config::GraphContentOnly]);
        format!("digraph callgraph {{\n{}}}\n", body)
    }
}
