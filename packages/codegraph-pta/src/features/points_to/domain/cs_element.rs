//! Context-qualified entities and pointers
//!
//! Every entity is referred to by a dense handle handed out by the
//! `CSManager`. Handles are only meaningful for the manager that created them.

use crate::ir::{FieldId, MethodId, ObjId, StmtId, VarId};
use serde::{Deserialize, Serialize};
use std::fmt;

macro_rules! define_handle {
    ($(#[$meta:meta])* $name:ident, $prefix:literal) => {
        $(#[$meta])*
        #[derive(
            Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
        )]
        #[serde(transparent)]
        pub struct $name(pub u32);

        impl $name {
            #[inline]
            pub fn index(self) -> usize {
                self.0 as usize
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, concat!($prefix, "#{}"), self.0)
            }
        }
    };
}

define_handle!(
    /// Interned [`Context`](super::context::Context)
    ContextId,
    "ctx"
);
define_handle!(
    /// Context-qualified abstract object
    CSObjId,
    "obj"
);
define_handle!(
    /// Context-qualified call site
    CSCallSiteId,
    "cs"
);
define_handle!(
    /// Context-qualified method
    CSMethodId,
    "method"
);
define_handle!(
    /// Any pointer: variable, static field, instance field or array index
    PointerId,
    "ptr"
);

/// Abstract object under a heap context
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CSObj {
    pub heap_context: ContextId,
    pub obj: ObjId,
}

/// Call statement under the caller's context
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CSCallSite {
    pub context: ContextId,
    pub site: StmtId,
}

/// Method under a callee context
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CSMethod {
    pub context: ContextId,
    pub method: MethodId,
}

/// Pointer content. Each variant owns one points-to set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Pointer {
    /// Local variable under a context
    Var { context: ContextId, var: VarId },

    /// Static field; static fields carry no context
    StaticField { field: FieldId },

    /// Field of one context-qualified object
    InstanceField { base: CSObjId, field: FieldId },

    /// All elements of one array object, indices merged
    ArrayIndex { base: CSObjId },
}

impl Pointer {
    /// Variable behind a `Var` pointer
    #[inline]
    pub fn as_var(&self) -> Option<(ContextId, VarId)> {
        match *self {
            Pointer::Var { context, var } => Some((context, var)),
            _ => None,
        }
    }
}
