//! Program representation consumed by the analyses
//!
//! A small object-oriented IR: classes with single inheritance and
//! interfaces, methods with flat statement lists, and a heap abstraction.

pub mod builder;
pub mod heap;
pub mod hierarchy;
pub mod program;
pub mod stmt;
pub mod world;

pub use builder::ProgramBuilder;
pub use heap::{AllocationSiteHeapModel, HeapModel, Obj, ObjId};
pub use hierarchy::ClassHierarchy;
pub use program::{Class, ClassId, Field, FieldId, Method, MethodId, Program, Var, VarId};
pub use stmt::{FieldRef, Invoke, InvokeKind, MethodRef, Stmt, StmtId, Subsignature};
pub use world::World;
