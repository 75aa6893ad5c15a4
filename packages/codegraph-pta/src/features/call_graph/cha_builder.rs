//! Class hierarchy analysis (CHA) call graph
//!
//! Baseline call graph that needs no points-to facts: a virtual call may
//! target the dispatch result of its declared class or of any transitive
//! subclass, subinterface or implementor. Always a superset of the call graph
//! found by the pointer analysis on the same program.

use super::call_graph::{CallGraph, CallKind, Edge};
use super::dispatch::dispatch;
use crate::ir::{ClassHierarchy, Invoke, InvokeKind, MethodId, StmtId, World};
use rustc_hash::FxHashSet;
use std::collections::VecDeque;
use tracing::{debug, info};

/// Build the CHA call graph from the world's entry method
pub fn build_cha(world: &World) -> CallGraph<StmtId, MethodId> {
    let program = world.program();
    let hierarchy = world.hierarchy();
    let entry = world.entry();

    let mut call_graph = CallGraph::new();
    call_graph.add_entry_method(entry);

    let mut queue = VecDeque::from([entry]);
    while let Some(method) = queue.pop_front() {
        if !call_graph.add_reachable_method(method) {
            continue;
        }
        for (i, stmt) in program.method(method).body.iter().enumerate() {
            let Some(invoke) = stmt.as_invoke() else {
                continue;
            };
            let site = StmtId::new(method, i);
            let targets = resolve(hierarchy, invoke);
            if targets.is_empty() {
                debug!(call_site = %site, "CHA: unresolved call skipped");
            }
            for callee in targets {
                call_graph.add_edge(Edge::new(CallKind::from(invoke.kind), method, site, callee));
                queue.push_back(callee);
            }
        }
    }

    info!(
        reachable = call_graph.reachable_count(),
        edges = call_graph.edge_count(),
        "CHA call graph built"
    );
    call_graph
}

/// All possible targets of `invoke` under CHA, in discovery order
pub fn resolve(hierarchy: &ClassHierarchy, invoke: &Invoke) -> Vec<MethodId> {
    let class = invoke.method_ref.class;
    let subsignature = &invoke.method_ref.subsignature;
    match invoke.kind {
        InvokeKind::Static => hierarchy
            .declared_method(class, subsignature)
            .into_iter()
            .collect(),
        InvokeKind::Special => dispatch(hierarchy, class, subsignature).into_iter().collect(),
        InvokeKind::Dynamic if invoke.receiver.is_none() => Vec::new(),
        InvokeKind::Virtual | InvokeKind::Interface | InvokeKind::Dynamic => {
            let mut targets = Vec::new();
            let mut seen_targets = FxHashSet::default();
            let mut visited = FxHashSet::from_iter([class]);
            let mut queue = VecDeque::from([class]);

            while let Some(c) = queue.pop_front() {
                if let Some(m) = dispatch(hierarchy, c, subsignature) {
                    if seen_targets.insert(m) {
                        targets.push(m);
                    }
                }
                let subtypes = hierarchy
                    .direct_subclasses_of(c)
                    .iter()
                    .chain(hierarchy.direct_subinterfaces_of(c))
                    .chain(hierarchy.direct_implementors_of(c));
                for &sub in subtypes {
                    if visited.insert(sub) {
                        queue.push_back(sub);
                    }
                }
            }
            targets
        }
    }
}
