//! Context-sensitive entity manager
//!
//! Interns contexts, context-qualified objects, call sites, methods and
//! pointers. Each distinct (context, raw entity) pair gets exactly one dense
//! handle for the lifetime of the manager; nothing is ever removed. The
//! manager also owns the points-to set of every pointer.

use crate::features::points_to::domain::{
    CSCallSite, CSCallSiteId, CSMethod, CSMethodId, CSObj, CSObjId, Context, ContextId, Pointer,
    PointerId, PointsToSet,
};
use crate::ir::{FieldId, MethodId, ObjId, StmtId, VarId};
use rustc_hash::FxHashMap;
use std::hash::Hash;

/// Append-only interning table
#[derive(Debug, Clone)]
struct Interner<T> {
    items: Vec<T>,
    ids: FxHashMap<T, u32>,
}

impl<T> Default for Interner<T> {
    fn default() -> Self {
        Self {
            items: Vec::new(),
            ids: FxHashMap::default(),
        }
    }
}

impl<T: Clone + Eq + Hash> Interner<T> {
    /// Returns the handle and whether it was newly created
    fn intern(&mut self, item: T) -> (u32, bool) {
        if let Some(&id) = self.ids.get(&item) {
            return (id, false);
        }
        let id = self.items.len() as u32;
        self.items.push(item.clone());
        self.ids.insert(item, id);
        (id, true)
    }

    fn find(&self, item: &T) -> Option<u32> {
        self.ids.get(item).copied()
    }

    #[inline]
    fn get(&self, id: u32) -> &T {
        &self.items[id as usize]
    }

    #[inline]
    fn len(&self) -> usize {
        self.items.len()
    }
}

#[derive(Debug, Clone)]
pub struct CSManager {
    contexts: Interner<Context>,
    objs: Interner<CSObj>,
    call_sites: Interner<CSCallSite>,
    methods: Interner<CSMethod>,
    pointers: Interner<Pointer>,

    /// Points-to set per pointer, indexed by [`PointerId`]
    points_to: Vec<PointsToSet>,

    /// Every context-qualified instance of a variable
    var_pointers: FxHashMap<VarId, Vec<PointerId>>,

    empty_context: ContextId,
}

impl Default for CSManager {
    fn default() -> Self {
        Self::new()
    }
}

impl CSManager {
    pub fn new() -> Self {
        let mut contexts = Interner::default();
        let (empty, _) = contexts.intern(Context::empty());
        Self {
            contexts,
            objs: Interner::default(),
            call_sites: Interner::default(),
            methods: Interner::default(),
            pointers: Interner::default(),
            points_to: Vec::new(),
            var_pointers: FxHashMap::default(),
            empty_context: ContextId(empty),
        }
    }

    // ═══════════════════════════════════════════════════════════════════════
    // Contexts and non-pointer entities
    // ═══════════════════════════════════════════════════════════════════════

    #[inline]
    pub fn empty_context(&self) -> ContextId {
        self.empty_context
    }

    pub fn intern_context(&mut self, context: Context) -> ContextId {
        ContextId(self.contexts.intern(context).0)
    }

    /// Handle of an already interned context
    pub fn find_context(&self, context: &Context) -> Option<ContextId> {
        self.contexts.find(context).map(ContextId)
    }

    #[inline]
    pub fn context(&self, id: ContextId) -> &Context {
        self.contexts.get(id.0)
    }

    pub fn get_cs_obj(&mut self, heap_context: ContextId, obj: ObjId) -> CSObjId {
        CSObjId(self.objs.intern(CSObj { heap_context, obj }).0)
    }

    #[inline]
    pub fn cs_obj(&self, id: CSObjId) -> CSObj {
        *self.objs.get(id.0)
    }

    pub fn get_cs_call_site(&mut self, context: ContextId, site: StmtId) -> CSCallSiteId {
        CSCallSiteId(self.call_sites.intern(CSCallSite { context, site }).0)
    }

    #[inline]
    pub fn cs_call_site(&self, id: CSCallSiteId) -> CSCallSite {
        *self.call_sites.get(id.0)
    }

    pub fn get_cs_method(&mut self, context: ContextId, method: MethodId) -> CSMethodId {
        CSMethodId(self.methods.intern(CSMethod { context, method }).0)
    }

    #[inline]
    pub fn cs_method(&self, id: CSMethodId) -> CSMethod {
        *self.methods.get(id.0)
    }

    // ═══════════════════════════════════════════════════════════════════════
    // Pointers
    // ═══════════════════════════════════════════════════════════════════════

    fn get_pointer(&mut self, pointer: Pointer) -> PointerId {
        let (id, created) = self.pointers.intern(pointer);
        let id = PointerId(id);
        if created {
            self.points_to.push(PointsToSet::new());
            if let Pointer::Var { var, .. } = pointer {
                self.var_pointers.entry(var).or_default().push(id);
            }
        }
        id
    }

    pub fn get_cs_var(&mut self, context: ContextId, var: VarId) -> PointerId {
        self.get_pointer(Pointer::Var { context, var })
    }

    pub fn get_static_field(&mut self, field: FieldId) -> PointerId {
        self.get_pointer(Pointer::StaticField { field })
    }

    pub fn get_instance_field(&mut self, base: CSObjId, field: FieldId) -> PointerId {
        self.get_pointer(Pointer::InstanceField { base, field })
    }

    pub fn get_array_index(&mut self, base: CSObjId) -> PointerId {
        self.get_pointer(Pointer::ArrayIndex { base })
    }

    /// Handle of an existing pointer, without creating it
    pub fn find_pointer(&self, pointer: &Pointer) -> Option<PointerId> {
        self.pointers.find(pointer).map(PointerId)
    }

    #[inline]
    pub fn pointer(&self, id: PointerId) -> Pointer {
        *self.pointers.get(id.0)
    }

    #[inline]
    pub fn points_to(&self, id: PointerId) -> &PointsToSet {
        &self.points_to[id.index()]
    }

    #[inline]
    pub fn points_to_mut(&mut self, id: PointerId) -> &mut PointsToSet {
        &mut self.points_to[id.index()]
    }

    /// Context-qualified pointers of `var`, in creation order
    pub fn var_pointers(&self, var: VarId) -> &[PointerId] {
        self.var_pointers
            .get(&var)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    pub fn pointer_ids(&self) -> impl Iterator<Item = PointerId> {
        (0..self.pointers.len() as u32).map(PointerId)
    }

    pub fn cs_obj_ids(&self) -> impl Iterator<Item = CSObjId> {
        (0..self.objs.len() as u32).map(CSObjId)
    }

    pub fn pointer_count(&self) -> usize {
        self.pointers.len()
    }

    pub fn cs_obj_count(&self) -> usize {
        self.objs.len()
    }

    pub fn cs_method_count(&self) -> usize {
        self.methods.len()
    }

    pub fn context_count(&self) -> usize {
        self.contexts.len()
    }
}
