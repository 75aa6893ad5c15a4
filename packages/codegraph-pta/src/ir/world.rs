//! Analysis world: the read-only program facts handed to the solver

use super::heap::{AllocationSiteHeapModel, HeapModel};
use super::hierarchy::ClassHierarchy;
use super::program::{MethodId, Program};
use crate::errors::Result;

/// Program, class hierarchy, heap abstraction and entry method of one run.
///
/// Passed explicitly to every analysis; nothing here is global.
pub struct World {
    program: Program,
    hierarchy: ClassHierarchy,
    heap: Box<dyn HeapModel>,
    entry: MethodId,
}

impl World {
    /// Validate `program` and index it with the allocation-site heap model
    pub fn new(program: Program) -> Result<Self> {
        let heap = AllocationSiteHeapModel::new(&program);
        Self::with_heap_model(program, Box::new(heap))
    }

    /// Use a custom heap abstraction
    pub fn with_heap_model(program: Program, heap: Box<dyn HeapModel>) -> Result<Self> {
        program.validate()?;
        let entry = program.entry_method()?;
        let hierarchy = ClassHierarchy::new(&program);
        Ok(Self {
            program,
            hierarchy,
            heap,
            entry,
        })
    }

    /// Load a JSON-serialized program
    pub fn from_json(json: &str) -> Result<Self> {
        let program: Program = serde_json::from_str(json)?;
        Self::new(program)
    }

    #[inline]
    pub fn program(&self) -> &Program {
        &self.program
    }

    #[inline]
    pub fn hierarchy(&self) -> &ClassHierarchy {
        &self.hierarchy
    }

    #[inline]
    pub fn heap(&self) -> &dyn HeapModel {
        self.heap.as_ref()
    }

    #[inline]
    pub fn entry(&self) -> MethodId {
        self.entry
    }
}

impl std::fmt::Debug for World {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("World")
            .field("classes", &self.program.classes.len())
            .field("methods", &self.program.methods.len())
            .field("objects", &self.heap.objects().len())
            .field("entry", &self.entry)
            .finish()
    }
}
