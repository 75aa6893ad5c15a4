//! Analysis features

pub mod call_graph;
pub mod points_to;
