//! Infrastructure layer: selectors, interning, graphs and the solver

pub mod context_selector;
pub mod cs_manager;
pub mod pointer_flow_graph;
pub mod solver;
pub mod stmt_index;
pub mod worklist;

pub use context_selector::{
    make_selector, HybridSelector, InsensitiveSelector, KCallSiteSelector, KObjectSelector,
    KTypeSelector,
};
pub use cs_manager::CSManager;
pub use pointer_flow_graph::PointerFlowGraph;
pub use solver::{CSCallGraph, Solver, SolverOutput, SolverStats};
pub use stmt_index::{StmtIndex, VarAccesses};
pub use worklist::WorkList;
