//! Call graph construction
//!
//! - [`CallGraph`]: edge-additive call graph, generic over call-site and
//!   method representation
//! - [`dispatch`]: virtual dispatch shared by every builder
//! - [`build_cha`]: class hierarchy analysis baseline
//!
//! The on-the-fly (points-to driven) call graph is built by the points-to
//! solver itself.

pub mod call_graph;
pub mod cha_builder;
pub mod dispatch;

pub use call_graph::{CallGraph, CallKind, Edge};
pub use cha_builder::build_cha;
pub use dispatch::{dispatch, resolve_callee};
