//! Context selectors
//!
//! Context abstractions supported:
//! - **Insensitive**: every context is empty (baseline)
//! - **k-call (k-CFA)**: the k most recent call sites
//! - **k-obj**: the receiver object and its allocation context
//! - **k-type**: like k-obj, with each object replaced by the class whose
//!   method allocated it
//! - **Hybrid**: k-obj for instance calls, k-call for static calls
//!
//! Object- and type-sensitive heaps keep k−1 elements of the allocating
//! method's context. Call-site sensitivity uses a context-insensitive heap.
//!
//! # References
//! - Milanova et al. "Parameterized Object Sensitivity" (TOSEM 2005)
//! - Smaragdakis et al. "Pick Your Contexts Well" (POPL 2011)

use crate::config::{ContextSensitivity, SelectorKind};
use crate::features::points_to::domain::{Context, ContextElement};
use crate::features::points_to::ports::{CallSiteRef, ContextSelector, ReceiverRef};
use crate::ir::{MethodId, Obj};

/// Build the selector for a (validated) sensitivity setting
pub fn make_selector(sensitivity: ContextSensitivity) -> Box<dyn ContextSelector> {
    let k = sensitivity.depth;
    match sensitivity.kind {
        SelectorKind::Insensitive => Box::new(InsensitiveSelector),
        SelectorKind::CallSite => Box::new(KCallSiteSelector::new(k)),
        SelectorKind::Object => Box::new(KObjectSelector::new(k)),
        SelectorKind::Type => Box::new(KTypeSelector::new(k)),
        SelectorKind::Hybrid => Box::new(HybridSelector::new(k)),
    }
}

/// Heap context shared by the object-flavoured selectors
#[inline]
fn truncated_heap_context(method_context: &Context, k: usize) -> Context {
    method_context.suffix(k.saturating_sub(1))
}

// ═══════════════════════════════════════════════════════════════════════════
// Context-insensitive
// ═══════════════════════════════════════════════════════════════════════════

#[derive(Debug, Clone, Copy, Default)]
pub struct InsensitiveSelector;

impl ContextSelector for InsensitiveSelector {
    fn select_context(&self, _call_site: CallSiteRef<'_>, _callee: MethodId) -> Context {
        Context::empty()
    }

    fn select_instance_context(
        &self,
        _call_site: CallSiteRef<'_>,
        _receiver: ReceiverRef<'_>,
        _callee: MethodId,
    ) -> Context {
        Context::empty()
    }

    fn select_heap_context(&self, _method_context: &Context, _method: MethodId, _obj: &Obj) -> Context {
        Context::empty()
    }

    fn name(&self) -> String {
        ContextSensitivity::INSENSITIVE.to_string()
    }
}

// ═══════════════════════════════════════════════════════════════════════════
// k-call-site
// ═══════════════════════════════════════════════════════════════════════════

#[derive(Debug, Clone, Copy)]
pub struct KCallSiteSelector {
    k: usize,
}

impl KCallSiteSelector {
    pub fn new(k: usize) -> Self {
        Self { k }
    }

    fn push_site(&self, call_site: CallSiteRef<'_>) -> Context {
        call_site
            .context
            .append_truncated(ContextElement::CallSite(call_site.site), self.k)
    }
}

impl ContextSelector for KCallSiteSelector {
    fn select_context(&self, call_site: CallSiteRef<'_>, _callee: MethodId) -> Context {
        self.push_site(call_site)
    }

    fn select_instance_context(
        &self,
        call_site: CallSiteRef<'_>,
        _receiver: ReceiverRef<'_>,
        _callee: MethodId,
    ) -> Context {
        self.push_site(call_site)
    }

    fn select_heap_context(&self, _method_context: &Context, _method: MethodId, _obj: &Obj) -> Context {
        Context::empty()
    }

    fn name(&self) -> String {
        ContextSensitivity::call_site(self.k).to_string()
    }
}

// ═══════════════════════════════════════════════════════════════════════════
// k-object
// ═══════════════════════════════════════════════════════════════════════════

#[derive(Debug, Clone, Copy)]
pub struct KObjectSelector {
    k: usize,
}

impl KObjectSelector {
    pub fn new(k: usize) -> Self {
        Self { k }
    }
}

impl ContextSelector for KObjectSelector {
    /// Static calls inherit the caller's context
    fn select_context(&self, call_site: CallSiteRef<'_>, _callee: MethodId) -> Context {
        call_site.context.clone()
    }

    fn select_instance_context(
        &self,
        _call_site: CallSiteRef<'_>,
        receiver: ReceiverRef<'_>,
        _callee: MethodId,
    ) -> Context {
        receiver
            .heap_context
            .append_truncated(ContextElement::Object(receiver.id), self.k)
    }

    fn select_heap_context(&self, method_context: &Context, _method: MethodId, _obj: &Obj) -> Context {
        truncated_heap_context(method_context, self.k)
    }

    fn name(&self) -> String {
        ContextSensitivity::object(self.k).to_string()
    }
}

// ═══════════════════════════════════════════════════════════════════════════
// k-type
// ═══════════════════════════════════════════════════════════════════════════

#[derive(Debug, Clone, Copy)]
pub struct KTypeSelector {
    k: usize,
}

impl KTypeSelector {
    pub fn new(k: usize) -> Self {
        Self { k }
    }
}

impl ContextSelector for KTypeSelector {
    fn select_context(&self, call_site: CallSiteRef<'_>, _callee: MethodId) -> Context {
        call_site.context.clone()
    }

    fn select_instance_context(
        &self,
        _call_site: CallSiteRef<'_>,
        receiver: ReceiverRef<'_>,
        _callee: MethodId,
    ) -> Context {
        receiver
            .heap_context
            .append_truncated(ContextElement::Type(receiver.obj.container), self.k)
    }

    fn select_heap_context(&self, method_context: &Context, _method: MethodId, _obj: &Obj) -> Context {
        truncated_heap_context(method_context, self.k)
    }

    fn name(&self) -> String {
        ContextSensitivity::type_sensitive(self.k).to_string()
    }
}

// ═══════════════════════════════════════════════════════════════════════════
// Selective hybrid
// ═══════════════════════════════════════════════════════════════════════════

/// k-obj on instance calls; static calls push their call site instead of
/// inheriting the caller's context unchanged
#[derive(Debug, Clone, Copy)]
pub struct HybridSelector {
    object: KObjectSelector,
    k: usize,
}

impl HybridSelector {
    pub fn new(k: usize) -> Self {
        Self {
            object: KObjectSelector::new(k),
            k,
        }
    }
}

impl ContextSelector for HybridSelector {
    fn select_context(&self, call_site: CallSiteRef<'_>, _callee: MethodId) -> Context {
        call_site
            .context
            .append_truncated(ContextElement::CallSite(call_site.site), self.k)
    }

    fn select_instance_context(
        &self,
        call_site: CallSiteRef<'_>,
        receiver: ReceiverRef<'_>,
        callee: MethodId,
    ) -> Context {
        self.object.select_instance_context(call_site, receiver, callee)
    }

    fn select_heap_context(&self, method_context: &Context, method: MethodId, obj: &Obj) -> Context {
        self.object.select_heap_context(method_context, method, obj)
    }

    fn name(&self) -> String {
        ContextSensitivity::hybrid(self.k).to_string()
    }
}
