//! Context-sensitive pointer analysis solver
//!
//! Worklist-driven inclusion-based analysis that builds the call graph on the
//! fly. Reachable methods are interpreted once per context; field, array and
//! instance-call statements are deferred until their base variable points to
//! a concrete object, at which point the corresponding pointer flow edges and
//! call edges are materialized.
//!
//! # Algorithm
//! 1. Make the entry method reachable under the empty context
//! 2. Interpret each new reachable method: allocations seed the worklist,
//!    copies and static field accesses add PFG edges, static calls add call
//!    edges
//! 3. Pop (pointer, objects) entries, merge, and forward to PFG successors;
//!    new objects of a variable trigger its deferred accesses and calls
//! 4. Stop when the worklist is empty
//!
//! Every update is a monotone join over a finite lattice, so the loop
//! terminates and the fixpoint does not depend on the worklist order.
//!
//! # References
//! - Tan & Li "Tai-e: A Developer-Friendly Static Analysis Framework" (ISSTA 2023)
//! - Lhoták & Hendren "Context-Sensitive Points-to Analysis: Is It Worth It?" (CC 2006)

use super::cs_manager::CSManager;
use super::pointer_flow_graph::PointerFlowGraph;
use super::stmt_index::StmtIndex;
use super::worklist::WorkList;
use crate::config::WorklistOrder;
use crate::errors::{PtaError, Result};
use crate::features::call_graph::{resolve_callee, CallGraph, CallKind, Edge};
use crate::features::points_to::domain::{
    CSCallSiteId, CSMethodId, CSObjId, ContextId, PointerId, PointsToSet,
};
use crate::features::points_to::ports::{CallSiteRef, ContextSelector, ReceiverRef};
use crate::ir::{FieldId, Invoke, MethodId, Stmt, StmtId, VarId, World};
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;
use std::rc::Rc;
use std::time::Instant;
use tracing::{debug, info, trace};

/// Context-sensitive call graph produced by the solver
pub type CSCallGraph = CallGraph<CSCallSiteId, CSMethodId>;

/// Solver statistics
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SolverStats {
    /// Worklist entries popped
    pub worklist_entries: usize,

    /// Popped entries that changed their pointer's points-to set
    pub effective_propagations: usize,

    pub reachable_methods: usize,
    pub call_edges: usize,
    pub pfg_edges: usize,
    pub pointers: usize,
    pub cs_objects: usize,
    pub contexts: usize,

    /// Calls skipped because no target could be resolved
    pub unresolved_calls: usize,

    pub duration_ms: f64,
}

/// Everything the solver computed, handed to the result layer
#[derive(Debug)]
pub struct SolverOutput {
    pub cs_manager: CSManager,
    pub call_graph: CSCallGraph,
    pub pfg: PointerFlowGraph,
    pub stats: SolverStats,
}

pub struct Solver<'w> {
    world: &'w World,
    selector: Box<dyn ContextSelector>,
    index: Rc<StmtIndex>,

    cs_manager: CSManager,
    pfg: PointerFlowGraph,
    call_graph: CSCallGraph,
    worklist: WorkList,

    /// Methods made reachable but not yet interpreted
    pending: VecDeque<CSMethodId>,

    stats: SolverStats,
    initialized: bool,
}

impl<'w> Solver<'w> {
    /// Create a solver. Resolves every field reference of the program, so a
    /// malformed one fails here.
    pub fn new(
        world: &'w World,
        selector: Box<dyn ContextSelector>,
        order: WorklistOrder,
    ) -> Result<Self> {
        let index = StmtIndex::new(world.program(), world.hierarchy())?;
        Ok(Self {
            world,
            selector,
            index: Rc::new(index),
            cs_manager: CSManager::new(),
            pfg: PointerFlowGraph::new(),
            call_graph: CSCallGraph::new(),
            worklist: WorkList::new(order),
            pending: VecDeque::new(),
            stats: SolverStats::default(),
            initialized: false,
        })
    }

    /// Run to fixpoint
    pub fn solve(mut self) -> Result<SolverOutput> {
        let start = Instant::now();
        info!(
            selector = %self.selector.name(),
            entry = %self.world.program().method_signature(self.world.entry()),
            "Starting pointer analysis"
        );

        self.initialize()?;
        while self.step()? {}

        self.finish_stats();
        self.stats.duration_ms = start.elapsed().as_secs_f64() * 1000.0;
        info!(
            reachable_methods = self.stats.reachable_methods,
            call_edges = self.stats.call_edges,
            pointers = self.stats.pointers,
            worklist_entries = self.stats.worklist_entries,
            duration_ms = self.stats.duration_ms,
            "Pointer analysis finished"
        );

        Ok(SolverOutput {
            cs_manager: self.cs_manager,
            call_graph: self.call_graph,
            pfg: self.pfg,
            stats: self.stats,
        })
    }

    /// Make the entry method reachable. Idempotent.
    pub fn initialize(&mut self) -> Result<()> {
        if self.initialized {
            return Ok(());
        }
        self.initialized = true;

        let context = self.cs_manager.intern_context(self.selector.empty_context());
        let entry = self.cs_manager.get_cs_method(context, self.world.entry());
        self.call_graph.add_entry_method(entry);
        self.add_reachable(entry);
        self.drain_pending()
    }

    /// Process one worklist entry. Returns false once the worklist is empty.
    pub fn step(&mut self) -> Result<bool> {
        self.initialize()?;
        let Some((pointer, pts)) = self.worklist.pop() else {
            return Ok(false);
        };
        self.stats.worklist_entries += 1;
        trace!(%pointer, objects = pts.len(), "worklist entry");

        let delta = self.propagate(pointer, &pts);
        if !delta.is_empty() {
            if let Some((context, var)) = self.cs_manager.pointer(pointer).as_var() {
                for obj in &delta {
                    self.process_instance_accesses(context, var, obj);
                    self.process_calls(context, var, obj)?;
                }
            }
        }
        self.drain_pending()?;
        Ok(true)
    }

    pub fn cs_manager(&self) -> &CSManager {
        &self.cs_manager
    }

    pub fn call_graph(&self) -> &CSCallGraph {
        &self.call_graph
    }

    pub fn pfg(&self) -> &PointerFlowGraph {
        &self.pfg
    }

    pub fn worklist_len(&self) -> usize {
        self.worklist.len()
    }

    pub fn stats(&self) -> &SolverStats {
        &self.stats
    }

    // ═══════════════════════════════════════════════════════════════════════
    // Reachability
    // ═══════════════════════════════════════════════════════════════════════

    fn add_reachable(&mut self, method: CSMethodId) {
        self.pending.push_back(method);
    }

    /// Interpret every pending method that is not reachable yet
    fn drain_pending(&mut self) -> Result<()> {
        while let Some(method) = self.pending.pop_front() {
            if self.call_graph.add_reachable_method(method) {
                self.process_method(method)?;
            }
        }
        Ok(())
    }

    fn process_method(&mut self, cs_method: CSMethodId) -> Result<()> {
        let world = self.world;
        let index = Rc::clone(&self.index);
        let csm = self.cs_manager.cs_method(cs_method);
        let (context, method) = (csm.context, csm.method);
        debug!(
            method = %world.program().method_signature(method),
            context = %self.cs_manager.context(context),
            "New reachable method"
        );

        for (i, stmt) in world.program().method(method).body.iter().enumerate() {
            let site = StmtId::new(method, i);
            match stmt {
                Stmt::New { lhs, .. } => {
                    let obj = world.heap().obj_at(site).ok_or_else(|| {
                        PtaError::invariant(format!("no abstract object for allocation {}", site))
                    })?;
                    let heap_context = self.selector.select_heap_context(
                        self.cs_manager.context(context),
                        method,
                        world.heap().obj(obj),
                    );
                    let heap_context = self.cs_manager.intern_context(heap_context);
                    let cs_obj = self.cs_manager.get_cs_obj(heap_context, obj);
                    let target = self.cs_manager.get_cs_var(context, *lhs);
                    self.worklist.push(target, PointsToSet::singleton(cs_obj));
                }
                Stmt::Copy { lhs, rhs } => {
                    let source = self.cs_manager.get_cs_var(context, *rhs);
                    let target = self.cs_manager.get_cs_var(context, *lhs);
                    self.add_pfg_edge(source, target);
                }
                Stmt::LoadField { lhs, base: None, .. } => {
                    let field = static_field(&index, site)?;
                    let source = self.cs_manager.get_static_field(field);
                    let target = self.cs_manager.get_cs_var(context, *lhs);
                    self.add_pfg_edge(source, target);
                }
                Stmt::StoreField { base: None, rhs, .. } => {
                    let field = static_field(&index, site)?;
                    let source = self.cs_manager.get_cs_var(context, *rhs);
                    let target = self.cs_manager.get_static_field(field);
                    self.add_pfg_edge(source, target);
                }
                Stmt::Invoke(invoke) if invoke.is_static() => {
                    self.process_static_call(cs_method, context, site, invoke)?;
                }
                Stmt::Invoke(invoke) if invoke.receiver.is_none() => {
                    self.stats.unresolved_calls += 1;
                    debug!(call_site = %site, kind = invoke.kind.as_str(), "Call without receiver skipped");
                }
                // deferred until the base variable points to something
                Stmt::LoadField { .. }
                | Stmt::StoreField { .. }
                | Stmt::LoadArray { .. }
                | Stmt::StoreArray { .. }
                | Stmt::Invoke(_) => {}
                Stmt::Return { .. } | Stmt::Nop => {}
            }
        }
        Ok(())
    }

    // ═══════════════════════════════════════════════════════════════════════
    // Propagation
    // ═══════════════════════════════════════════════════════════════════════

    /// Add `source → target`; a new edge is seeded with `source`'s current set
    fn add_pfg_edge(&mut self, source: PointerId, target: PointerId) {
        if self.pfg.add_edge(source, target) {
            let pts = self.cs_manager.points_to(source);
            if !pts.is_empty() {
                self.worklist.push(target, pts.clone());
            }
        }
    }

    /// Merge `pts` into `pointer` and forward it to the successors.
    /// Returns the objects that were new to `pointer`.
    fn propagate(&mut self, pointer: PointerId, pts: &PointsToSet) -> PointsToSet {
        let delta = self.cs_manager.points_to_mut(pointer).add_all(pts);
        if !delta.is_empty() {
            self.stats.effective_propagations += 1;
            let succs: Vec<PointerId> = self.pfg.succs_of(pointer).collect();
            for succ in succs {
                self.worklist.push(succ, pts.clone());
            }
        }
        delta
    }

    /// Field and array accesses based on `var`, for one newly known object
    fn process_instance_accesses(&mut self, context: ContextId, var: VarId, obj: CSObjId) {
        let index = Rc::clone(&self.index);
        let Some(accesses) = index.accesses_of(var) else {
            return;
        };

        for &(field, rhs) in &accesses.store_fields {
            let source = self.cs_manager.get_cs_var(context, rhs);
            let target = self.cs_manager.get_instance_field(obj, field);
            self.add_pfg_edge(source, target);
        }
        for &(lhs, field) in &accesses.load_fields {
            let source = self.cs_manager.get_instance_field(obj, field);
            let target = self.cs_manager.get_cs_var(context, lhs);
            self.add_pfg_edge(source, target);
        }
        for &rhs in &accesses.store_arrays {
            let source = self.cs_manager.get_cs_var(context, rhs);
            let target = self.cs_manager.get_array_index(obj);
            self.add_pfg_edge(source, target);
        }
        for &lhs in &accesses.load_arrays {
            let source = self.cs_manager.get_array_index(obj);
            let target = self.cs_manager.get_cs_var(context, lhs);
            self.add_pfg_edge(source, target);
        }
    }

    // ═══════════════════════════════════════════════════════════════════════
    // Calls
    // ═══════════════════════════════════════════════════════════════════════

    fn process_static_call(
        &mut self,
        caller: CSMethodId,
        context: ContextId,
        site: StmtId,
        invoke: &Invoke,
    ) -> Result<()> {
        let Some(callee) = resolve_callee(self.world.hierarchy(), None, invoke)? else {
            self.skip_unresolved(site, invoke);
            return Ok(());
        };

        let callee_context = self.selector.select_context(
            CallSiteRef {
                context: self.cs_manager.context(context),
                site,
            },
            callee,
        );
        let callee_context = self.cs_manager.intern_context(callee_context);
        let cs_callee = self.cs_manager.get_cs_method(callee_context, callee);
        let cs_site = self.cs_manager.get_cs_call_site(context, site);

        if self
            .call_graph
            .add_edge(Edge::new(CallKind::Static, caller, cs_site, cs_callee))
        {
            debug!(call_site = %site, callee = %self.world.program().method_signature(callee), "New static call edge");
            self.add_reachable(cs_callee);
            self.bind_call(context, invoke, callee_context, callee)?;
        }
        Ok(())
    }

    /// Instance calls whose receiver is `var`, for one newly known receiver object
    fn process_calls(&mut self, context: ContextId, var: VarId, recv: CSObjId) -> Result<()> {
        let world = self.world;
        let index = Rc::clone(&self.index);
        let Some(accesses) = index.accesses_of(var) else {
            return Ok(());
        };

        for &site in &accesses.invokes {
            let invoke = world
                .program()
                .method(site.method)
                .body
                .get(site.index as usize)
                .and_then(Stmt::as_invoke)
                .ok_or_else(|| PtaError::invariant(format!("indexed call {} is not a call", site)))?;

            let cs_recv = self.cs_manager.cs_obj(recv);
            let recv_obj = world.heap().obj(cs_recv.obj);
            let Some(callee) = resolve_callee(world.hierarchy(), Some(recv_obj.class), invoke)? else {
                self.skip_unresolved(site, invoke);
                continue;
            };

            let callee_context = self.selector.select_instance_context(
                CallSiteRef {
                    context: self.cs_manager.context(context),
                    site,
                },
                ReceiverRef {
                    heap_context: self.cs_manager.context(cs_recv.heap_context),
                    id: cs_recv.obj,
                    obj: recv_obj,
                },
                callee,
            );
            let callee_context = self.cs_manager.intern_context(callee_context);
            let cs_callee = self.cs_manager.get_cs_method(callee_context, callee);

            let this = world.program().method(callee).this.ok_or_else(|| {
                PtaError::malformed(format!(
                    "{} at {} targets static method {}",
                    invoke.kind.as_str(),
                    site,
                    world.program().method_signature(callee)
                ))
            })?;
            let this_ptr = self.cs_manager.get_cs_var(callee_context, this);
            self.worklist.push(this_ptr, PointsToSet::singleton(recv));

            let caller = self.cs_manager.get_cs_method(context, site.method);
            let cs_site = self.cs_manager.get_cs_call_site(context, site);
            let kind = CallKind::from(invoke.kind);
            if self
                .call_graph
                .add_edge(Edge::new(kind, caller, cs_site, cs_callee))
            {
                debug!(
                    call_site = %site,
                    kind = kind.as_str(),
                    callee = %world.program().method_signature(callee),
                    "New call edge"
                );
                self.add_reachable(cs_callee);
                self.bind_call(context, invoke, callee_context, callee)?;
            }
        }
        Ok(())
    }

    /// Arguments → parameters and return values → result variable
    fn bind_call(
        &mut self,
        caller_context: ContextId,
        invoke: &Invoke,
        callee_context: ContextId,
        callee: MethodId,
    ) -> Result<()> {
        let world = self.world;
        let method = world.program().method(callee);
        if invoke.args.len() != method.params.len() {
            return Err(PtaError::malformed(format!(
                "call passes {} argument(s) but {} takes {}",
                invoke.args.len(),
                world.program().method_signature(callee),
                method.params.len()
            )));
        }

        for (&arg, &param) in invoke.args.iter().zip(&method.params) {
            let source = self.cs_manager.get_cs_var(caller_context, arg);
            let target = self.cs_manager.get_cs_var(callee_context, param);
            self.add_pfg_edge(source, target);
        }
        if let Some(result) = invoke.result {
            let target = self.cs_manager.get_cs_var(caller_context, result);
            for ret in method.return_vars() {
                let source = self.cs_manager.get_cs_var(callee_context, ret);
                self.add_pfg_edge(source, target);
            }
        }
        Ok(())
    }

    fn skip_unresolved(&mut self, site: StmtId, invoke: &Invoke) {
        self.stats.unresolved_calls += 1;
        debug!(
            call_site = %site,
            target = %invoke.method_ref.subsignature,
            "Unresolved call skipped"
        );
    }

    fn finish_stats(&mut self) {
        self.stats.reachable_methods = self.call_graph.reachable_count();
        self.stats.call_edges = self.call_graph.edge_count();
        self.stats.pfg_edges = self.pfg.edge_count();
        self.stats.pointers = self.cs_manager.pointer_count();
        self.stats.cs_objects = self.cs_manager.cs_obj_count();
        self.stats.contexts = self.cs_manager.context_count();
    }
}

fn static_field(index: &StmtIndex, site: StmtId) -> Result<FieldId> {
    index
        .static_field_at(site)
        .ok_or_else(|| PtaError::invariant(format!("static field access {} was not indexed", site)))
}
