//! Analysis helpers and custom assertions

use codegraph_pta::config::{ContextSensitivity, PtaConfig, WorklistOrder};
use codegraph_pta::features::call_graph::CallKind;
use codegraph_pta::features::points_to::{PointerAnalysis, PointerAnalysisResult, PointsToSet};
use codegraph_pta::ir::{MethodId, ObjId, StmtId, VarId, World};
use std::collections::BTreeSet;

/// Run the analysis with `sensitivity` and FIFO order
pub fn analyze(world: &World, sensitivity: ContextSensitivity) -> PointerAnalysisResult {
    analyze_ordered(world, sensitivity, WorklistOrder::Fifo)
}

pub fn analyze_ordered(
    world: &World,
    sensitivity: ContextSensitivity,
    order: WorklistOrder,
) -> PointerAnalysisResult {
    let config = PtaConfig::default()
        .context_sensitivity(sensitivity)
        .worklist_order(order);
    PointerAnalysis::new(config)
        .expect("valid config")
        .analyze(world)
        .expect("analysis succeeds")
}

/// Abstract objects of a context-qualified set, ascending
pub fn objects_of(result: &PointerAnalysisResult, pts: &PointsToSet) -> Vec<ObjId> {
    let objs: BTreeSet<ObjId> = pts.iter().map(|o| result.cs_obj(o).obj).collect();
    objs.into_iter().collect()
}

/// Assert the context-insensitive points-to set of `var`
pub fn assert_points_to(result: &PointerAnalysisResult, var: VarId, expected: &[ObjId]) {
    let mut expected = expected.to_vec();
    expected.sort_unstable();
    assert_eq!(
        result.points_to_set_of(var),
        expected,
        "points-to set of {:?} under {}",
        var,
        result.selector()
    );
}

/// Context-insensitive call edges leaving `site`, as (kind, callee), sorted
pub fn edges_from(result: &PointerAnalysisResult, site: StmtId) -> Vec<(CallKind, MethodId)> {
    let mut edges: Vec<_> = result
        .ci_call_graph()
        .edges_out_of(site)
        .map(|e| (e.kind, e.callee))
        .collect();
    edges.sort();
    edges
}

/// Number of contexts `method` was made reachable under
pub fn instantiations_of(result: &PointerAnalysisResult, method: MethodId) -> usize {
    let cs_manager = result.cs_manager();
    result
        .call_graph()
        .reachable_methods()
        .filter(|&m| cs_manager.cs_method(m).method == method)
        .count()
}

/// Every fact of the run rendered without interning handles, so results of
/// different runs can be compared
pub fn canonical_facts(result: &PointerAnalysisResult, world: &World) -> BTreeSet<String> {
    let program = world.program();
    let cs_manager = result.cs_manager();
    let render_obj = |o| {
        let cs_obj = result.cs_obj(o);
        format!("{}{}", result.context(cs_obj.heap_context), cs_obj.obj)
    };

    let mut facts = BTreeSet::new();
    for i in 0..program.vars.len() {
        let var = VarId(i as u32);
        for (context, pts) in result.contexts_of(var) {
            for o in pts {
                facts.insert(format!("pts {}{} {}", context, program.var_name(var), render_obj(o)));
            }
        }
    }
    for edge in result.call_graph().edges() {
        let caller = cs_manager.cs_method(edge.caller);
        let site = cs_manager.cs_call_site(edge.call_site);
        let callee = cs_manager.cs_method(edge.callee);
        facts.insert(format!(
            "edge {} {}{} {}{} {}{}",
            edge.kind,
            result.context(caller.context),
            program.method_signature(caller.method),
            result.context(site.context),
            site.site,
            result.context(callee.context),
            program.method_signature(callee.method),
        ));
    }
    facts
}
