//! Domain models for context-sensitive points-to analysis

pub mod context;
pub mod cs_element;
pub mod points_to_set;

pub use context::{Context, ContextElement};
pub use cs_element::{
    CSCallSite, CSCallSiteId, CSMethod, CSMethodId, CSObj, CSObjId, ContextId, Pointer, PointerId,
};
pub use points_to_set::PointsToSet;
