//! Ports (Interfaces) for Points-to Analysis
//!
//! The solver is parameterized by two policies:
//! - [`ContextSelector`]: which context a callee or a new object gets
//! - [`HeapModel`]: which abstract object an allocation statement creates
//!
//! Both are object-safe so they can be chosen at runtime from configuration.

use crate::features::points_to::domain::Context;
use crate::ir::{MethodId, Obj, ObjId, StmtId};

pub use crate::ir::HeapModel;

/// Call site as seen by a selector: the caller's context plus the statement
#[derive(Debug, Clone, Copy)]
pub struct CallSiteRef<'a> {
    pub context: &'a Context,
    pub site: StmtId,
}

/// Receiver object of an instance call
#[derive(Debug, Clone, Copy)]
pub struct ReceiverRef<'a> {
    pub heap_context: &'a Context,
    pub id: ObjId,
    pub obj: &'a Obj,
}

/// Context sensitivity policy
///
/// Implementations must be pure functions of their arguments and must bound
/// the length of every context they return; the solver's termination depends
/// on the context universe being finite.
pub trait ContextSelector: Send + Sync {
    /// Context of the entry method
    fn empty_context(&self) -> Context {
        Context::empty()
    }

    /// Callee context for a static call
    fn select_context(&self, call_site: CallSiteRef<'_>, callee: MethodId) -> Context;

    /// Callee context for an instance call on `receiver`
    fn select_instance_context(
        &self,
        call_site: CallSiteRef<'_>,
        receiver: ReceiverRef<'_>,
        callee: MethodId,
    ) -> Context;

    /// Heap context for an object allocated in `method` under `method_context`
    fn select_heap_context(&self, method_context: &Context, method: MethodId, obj: &Obj) -> Context;

    /// Short name, e.g. `2-obj`
    fn name(&self) -> String;
}
