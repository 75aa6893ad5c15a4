//! Pointer analysis result
//!
//! Immutable snapshot taken once the solver reached its fixpoint. Offers the
//! context-sensitive facts as computed plus context-insensitive projections,
//! which is what most consumers (alias queries, constant propagation, call
//! graph clients) want.

use crate::features::call_graph::{CallGraph, Edge};
use crate::features::points_to::domain::{
    CSObj, CSObjId, Context, ContextId, Pointer, PointsToSet,
};
use crate::features::points_to::infrastructure::{
    CSCallGraph, CSManager, PointerFlowGraph, SolverOutput, SolverStats,
};
use crate::ir::{FieldId, MethodId, ObjId, StmtId, VarId, World};
use once_cell::unsync::OnceCell;
use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Context-insensitive call graph: statements and methods without contexts
pub type CICallGraph = CallGraph<StmtId, MethodId>;

pub struct PointerAnalysisResult {
    selector: String,
    cs_manager: CSManager,
    call_graph: CSCallGraph,
    pfg: PointerFlowGraph,
    stats: SolverStats,

    ci_call_graph: OnceCell<CICallGraph>,

    /// object → variables whose projected points-to set contains it
    alias_index: OnceCell<FxHashMap<ObjId, Vec<VarId>>>,
}

impl PointerAnalysisResult {
    pub(crate) fn new(selector: String, output: SolverOutput) -> Self {
        Self {
            selector,
            cs_manager: output.cs_manager,
            call_graph: output.call_graph,
            pfg: output.pfg,
            stats: output.stats,
            ci_call_graph: OnceCell::new(),
            alias_index: OnceCell::new(),
        }
    }

    /// Name of the context selector that produced this result
    pub fn selector(&self) -> &str {
        &self.selector
    }

    pub fn stats(&self) -> &SolverStats {
        &self.stats
    }

    pub fn cs_manager(&self) -> &CSManager {
        &self.cs_manager
    }

    pub fn pfg(&self) -> &PointerFlowGraph {
        &self.pfg
    }

    // ═══════════════════════════════════════════════════════════════════════
    // Points-to queries
    // ═══════════════════════════════════════════════════════════════════════

    /// Abstract objects `var` may point to under any context
    pub fn points_to_set_of(&self, var: VarId) -> Vec<ObjId> {
        let mut objs: Vec<ObjId> = self
            .cs_points_to_union(var)
            .iter()
            .map(|o| self.cs_manager.cs_obj(o).obj)
            .collect();
        objs.sort_unstable();
        objs.dedup();
        objs
    }

    /// Context-qualified objects `var` may point to, unioned over its contexts
    pub fn cs_points_to_union(&self, var: VarId) -> PointsToSet {
        let mut union = PointsToSet::new();
        for &p in self.cs_manager.var_pointers(var) {
            union.add_all(self.cs_manager.points_to(p));
        }
        union
    }

    /// Points-to set of `var` under exactly `context`; `None` if `var` was
    /// never analyzed under that context
    pub fn cs_points_to_set_of(&self, context: &Context, var: VarId) -> Option<&PointsToSet> {
        let context = self.cs_manager.find_context(context)?;
        let pointer = self
            .cs_manager
            .find_pointer(&Pointer::Var { context, var })?;
        Some(self.cs_manager.points_to(pointer))
    }

    /// Contexts `var` was analyzed under, with their points-to sets
    pub fn contexts_of(&self, var: VarId) -> impl Iterator<Item = (&Context, &PointsToSet)> + '_ {
        self.cs_manager.var_pointers(var).iter().filter_map(move |&p| {
            let (context, _) = self.cs_manager.pointer(p).as_var()?;
            Some((self.cs_manager.context(context), self.cs_manager.points_to(p)))
        })
    }

    /// Objects stored in `field` of `base`; empty if never written
    pub fn instance_field_points_to(&self, base: CSObjId, field: FieldId) -> PointsToSet {
        self.cs_manager
            .find_pointer(&Pointer::InstanceField { base, field })
            .map(|p| self.cs_manager.points_to(p).clone())
            .unwrap_or_default()
    }

    /// Every context-qualified instance of an abstract object
    pub fn cs_objects_of(&self, obj: ObjId) -> Vec<CSObjId> {
        self.cs_manager
            .cs_obj_ids()
            .filter(|&o| self.cs_manager.cs_obj(o).obj == obj)
            .collect()
    }

    pub fn cs_obj(&self, id: CSObjId) -> CSObj {
        self.cs_manager.cs_obj(id)
    }

    pub fn context(&self, id: ContextId) -> &Context {
        self.cs_manager.context(id)
    }

    // ═══════════════════════════════════════════════════════════════════════
    // Alias queries
    // ═══════════════════════════════════════════════════════════════════════

    /// `v1` and `v2` may alias if their projected points-to sets share an
    /// abstract object
    pub fn may_alias(&self, v1: VarId, v2: VarId) -> bool {
        let pts1 = self.points_to_set_of(v1);
        self.points_to_set_of(v2)
            .iter()
            .any(|o| pts1.binary_search(o).is_ok())
    }

    /// Stricter variant: some context-qualified object is shared. Objects
    /// allocated under different heap contexts do not alias here.
    pub fn cs_may_alias(&self, v1: VarId, v2: VarId) -> bool {
        self.cs_points_to_union(v1)
            .intersects(&self.cs_points_to_union(v2))
    }

    /// Variables that may alias `var` (excluding `var`), ascending
    pub fn aliases_of(&self, var: VarId) -> Vec<VarId> {
        let index = self.alias_index();
        let mut aliases: Vec<VarId> = self
            .points_to_set_of(var)
            .iter()
            .filter_map(|o| index.get(o))
            .flatten()
            .copied()
            .filter(|&v| v != var)
            .collect();
        aliases.sort_unstable();
        aliases.dedup();
        aliases
    }

    /// Build (once) the object → variables inverted index
    pub(crate) fn alias_index(&self) -> &FxHashMap<ObjId, Vec<VarId>> {
        self.alias_index.get_or_init(|| {
            let mut index: FxHashMap<ObjId, Vec<VarId>> = FxHashMap::default();
            for p in self.cs_manager.pointer_ids() {
                let Some((_, var)) = self.cs_manager.pointer(p).as_var() else {
                    continue;
                };
                for o in self.cs_manager.points_to(p) {
                    index
                        .entry(self.cs_manager.cs_obj(o).obj)
                        .or_default()
                        .push(var);
                }
            }
            for vars in index.values_mut() {
                vars.sort_unstable();
                vars.dedup();
            }
            index
        })
    }

    // ═══════════════════════════════════════════════════════════════════════
    // Call graph
    // ═══════════════════════════════════════════════════════════════════════

    /// Context-sensitive call graph
    pub fn call_graph(&self) -> &CSCallGraph {
        &self.call_graph
    }

    /// Call graph with contexts projected away
    pub fn ci_call_graph(&self) -> &CICallGraph {
        self.ci_call_graph.get_or_init(|| {
            let m = &self.cs_manager;
            let mut ci = CICallGraph::new();
            for entry in self.call_graph.entry_methods() {
                ci.add_entry_method(m.cs_method(*entry).method);
            }
            for method in self.call_graph.reachable_methods() {
                ci.add_reachable_method(m.cs_method(method).method);
            }
            for edge in self.call_graph.edges() {
                ci.add_edge(Edge::new(
                    edge.kind,
                    m.cs_method(edge.caller).method,
                    m.cs_call_site(edge.call_site).site,
                    m.cs_method(edge.callee).method,
                ));
            }
            ci
        })
    }

    /// Reachable methods, contexts projected away, in discovery order
    pub fn reachable_methods(&self) -> Vec<MethodId> {
        self.ci_call_graph().reachable_methods().collect()
    }

    // ═══════════════════════════════════════════════════════════════════════
    // Reporting
    // ═══════════════════════════════════════════════════════════════════════

    /// Human-readable, serializable summary
    pub fn report(&self, world: &World) -> AnalysisReport {
        let program = world.program();
        let heap = world.heap();

        let describe_obj = |id: ObjId| {
            let obj = heap.obj(id);
            format!(
                "new {} @ {}[{}]",
                program.class(obj.class).name,
                program.method_signature(obj.site.method),
                obj.site.index
            )
        };

        let mut points_to = BTreeMap::new();
        for (i, _) in program.vars.iter().enumerate() {
            let var = VarId(i as u32);
            let objs = self.points_to_set_of(var);
            if !objs.is_empty() {
                points_to.insert(
                    program.var_name(var),
                    objs.into_iter().map(describe_obj).collect(),
                );
            }
        }

        let ci = self.ci_call_graph();
        let mut call_edges: Vec<ReportEdge> = ci
            .edges()
            .map(|e| ReportEdge {
                kind: e.kind.as_str().to_string(),
                caller: program.method_signature(e.caller),
                call_site: e.call_site.index,
                callee: program.method_signature(e.callee),
            })
            .collect();
        call_edges.sort();

        AnalysisReport {
            selector: self.selector.clone(),
            reachable_methods: ci
                .reachable_methods()
                .map(|m| program.method_signature(m))
                .collect(),
            call_edges,
            points_to,
            stats: self.stats.clone(),
        }
    }
}

impl std::fmt::Debug for PointerAnalysisResult {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PointerAnalysisResult")
            .field("selector", &self.selector)
            .field("stats", &self.stats)
            .finish_non_exhaustive()
    }
}

/// Call edge in an [`AnalysisReport`]
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ReportEdge {
    pub caller: String,
    pub call_site: u32,
    pub kind: String,
    pub callee: String,
}

/// Serializable analysis summary (context-insensitive view)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisReport {
    pub selector: String,
    pub reachable_methods: Vec<String>,
    pub call_edges: Vec<ReportEdge>,

    /// `method/var` → allocation sites
    pub points_to: BTreeMap<String, Vec<String>>,

    pub stats: SolverStats,
}
