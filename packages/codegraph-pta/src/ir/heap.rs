//! Heap abstraction
//!
//! Maps allocation statements to abstract objects. Object sensitivity relies on
//! the identity being the syntactic allocation site, never the dynamic
//! allocation instance.

use super::program::{ClassId, Program};
use super::stmt::{Stmt, StmtId};
use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Abstract object identifier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ObjId(pub u32);

impl ObjId {
    #[inline]
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

impl fmt::Display for ObjId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "o{}", self.0)
    }
}

/// Abstract heap object
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Obj {
    /// Allocation statement
    pub site: StmtId,

    /// Runtime type of the allocated object
    pub class: ClassId,

    /// Class declaring the method that contains the allocation site
    pub container: ClassId,
}

/// Heap abstraction consumed by the solver
pub trait HeapModel: Send + Sync {
    /// Abstract object for an allocation statement, `None` if `site` is not
    /// an allocation
    fn obj_at(&self, site: StmtId) -> Option<ObjId>;

    fn obj(&self, id: ObjId) -> &Obj;

    fn objects(&self) -> &[Obj];
}

/// One abstract object per allocation statement
#[derive(Debug, Clone, Default)]
pub struct AllocationSiteHeapModel {
    objects: Vec<Obj>,
    by_site: FxHashMap<StmtId, ObjId>,
}

impl AllocationSiteHeapModel {
    pub fn new(program: &Program) -> Self {
        let mut heap = Self::default();
        for m in program.method_ids() {
            let method = program.method(m);
            for (i, stmt) in method.body.iter().enumerate() {
                if let Stmt::New { class, .. } = stmt {
                    let site = StmtId::new(m, i);
                    let id = ObjId(heap.objects.len() as u32);
                    heap.objects.push(Obj {
                        site,
                        class: *class,
                        container: method.declaring_class,
                    });
                    heap.by_site.insert(site, id);
                }
            }
        }
        heap
    }
}

impl HeapModel for AllocationSiteHeapModel {
    #[inline]
    fn obj_at(&self, site: StmtId) -> Option<ObjId> {
        self.by_site.get(&site).copied()
    }

    #[inline]
    fn obj(&self, id: ObjId) -> &Obj {
        &self.objects[id.index()]
    }

    fn objects(&self) -> &[Obj] {
        &self.objects
    }
}
