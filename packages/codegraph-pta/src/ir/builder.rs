//! Programmatic construction of [`Program`]s
//!
//! Used by tests, benchmarks and embedders that lower their own front-end IR.
//!
//! ```
//! use codegraph_pta::ir::ProgramBuilder;
//!
//! let mut b = ProgramBuilder::new();
//! let main_class = b.add_class("Main", None);
//! let main = b.add_static_method(main_class, "main", "void main()", &[]);
//! let x = b.add_var(main, "x");
//! b.new_obj(main, x, main_class);
//! b.set_entry(main);
//! let program = b.build().unwrap();
//! assert_eq!(program.methods.len(), 1);
//! ```

use super::program::{Class, ClassId, Field, FieldId, Method, MethodId, Program, Var, VarId};
use super::stmt::{FieldRef, Invoke, InvokeKind, MethodRef, Stmt, StmtId, Subsignature};
use crate::errors::Result;

#[derive(Debug, Default)]
pub struct ProgramBuilder {
    program: Program,
}

impl ProgramBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    // ═══════════════════════════════════════════════════════════════════════
    // Types and members
    // ═══════════════════════════════════════════════════════════════════════

    fn push_class(&mut self, class: Class) -> ClassId {
        let id = ClassId(self.program.classes.len() as u32);
        self.program.classes.push(class);
        id
    }

    /// Add a concrete class
    pub fn add_class(&mut self, name: &str, superclass: Option<ClassId>) -> ClassId {
        self.push_class(Class {
            name: name.to_string(),
            superclass,
            interfaces: Vec::new(),
            is_interface: false,
            is_abstract: false,
            methods: Vec::new(),
            fields: Vec::new(),
        })
    }

    pub fn add_abstract_class(&mut self, name: &str, superclass: Option<ClassId>) -> ClassId {
        let id = self.add_class(name, superclass);
        self.program.classes[id.index()].is_abstract = true;
        id
    }

    /// Add an interface extending `extends`
    pub fn add_interface(&mut self, name: &str, extends: &[ClassId]) -> ClassId {
        self.push_class(Class {
            name: name.to_string(),
            superclass: None,
            interfaces: extends.to_vec(),
            is_interface: true,
            is_abstract: true,
            methods: Vec::new(),
            fields: Vec::new(),
        })
    }

    /// Declare that `class` implements `iface`
    pub fn implement(&mut self, class: ClassId, iface: ClassId) {
        self.program.classes[class.index()].interfaces.push(iface);
    }

    pub fn add_field(&mut self, class: ClassId, name: &str, is_static: bool) -> FieldId {
        let id = FieldId(self.program.fields.len() as u32);
        self.program.fields.push(Field {
            name: name.to_string(),
            declaring_class: class,
            is_static,
        });
        self.program.classes[class.index()].fields.push(id);
        id
    }

    fn push_method(
        &mut self,
        class: ClassId,
        name: &str,
        subsignature: &str,
        is_static: bool,
        is_abstract: bool,
        params: &[&str],
    ) -> MethodId {
        let id = MethodId(self.program.methods.len() as u32);
        self.program.methods.push(Method {
            name: name.to_string(),
            declaring_class: class,
            subsignature: Subsignature::new(subsignature),
            is_static,
            is_abstract,
            this: None,
            params: Vec::new(),
            body: Vec::new(),
        });
        self.program.classes[class.index()].methods.push(id);

        if !is_static {
            let this = self.add_var(id, "this");
            self.program.methods[id.index()].this = Some(this);
        }
        for param in params {
            let v = self.add_var(id, param);
            self.program.methods[id.index()].params.push(v);
        }
        id
    }

    /// Add a static method with named parameters
    pub fn add_static_method(
        &mut self,
        class: ClassId,
        name: &str,
        subsignature: &str,
        params: &[&str],
    ) -> MethodId {
        self.push_method(class, name, subsignature, true, false, params)
    }

    /// Add an instance method; its `this` variable is created automatically
    pub fn add_instance_method(
        &mut self,
        class: ClassId,
        name: &str,
        subsignature: &str,
        params: &[&str],
    ) -> MethodId {
        self.push_method(class, name, subsignature, false, false, params)
    }

    /// Add an abstract instance method (no body)
    pub fn add_abstract_method(
        &mut self,
        class: ClassId,
        name: &str,
        subsignature: &str,
        params: &[&str],
    ) -> MethodId {
        self.push_method(class, name, subsignature, false, true, params)
    }

    /// Add a local variable to `method`
    pub fn add_var(&mut self, method: MethodId, name: &str) -> VarId {
        let id = VarId(self.program.vars.len() as u32);
        self.program.vars.push(Var {
            name: name.to_string(),
            method,
        });
        id
    }

    pub fn this_var(&self, method: MethodId) -> Option<VarId> {
        self.program.methods[method.index()].this
    }

    pub fn param(&self, method: MethodId, index: usize) -> Option<VarId> {
        self.program.methods[method.index()].params.get(index).copied()
    }

    pub fn set_entry(&mut self, method: MethodId) {
        self.program.entry = Some(method);
    }

    // ═══════════════════════════════════════════════════════════════════════
    // Statements
    // ═══════════════════════════════════════════════════════════════════════

    /// Append a statement to `method`'s body
    pub fn push(&mut self, method: MethodId, stmt: Stmt) -> StmtId {
        let body = &mut self.program.methods[method.index()].body;
        body.push(stmt);
        StmtId::new(method, body.len() - 1)
    }

    /// `lhs = new class`
    pub fn new_obj(&mut self, method: MethodId, lhs: VarId, class: ClassId) -> StmtId {
        self.push(method, Stmt::New { lhs, class })
    }

    /// `lhs = rhs`
    pub fn copy(&mut self, method: MethodId, lhs: VarId, rhs: VarId) -> StmtId {
        self.push(method, Stmt::Copy { lhs, rhs })
    }

    /// `lhs = base.name`
    pub fn load_field(
        &mut self,
        method: MethodId,
        lhs: VarId,
        base: VarId,
        class: ClassId,
        name: &str,
    ) -> StmtId {
        self.push(
            method,
            Stmt::LoadField {
                lhs,
                base: Some(base),
                field: FieldRef::new(class, name),
            },
        )
    }

    /// `base.name = rhs`
    pub fn store_field(
        &mut self,
        method: MethodId,
        base: VarId,
        class: ClassId,
        name: &str,
        rhs: VarId,
    ) -> StmtId {
        self.push(
            method,
            Stmt::StoreField {
                base: Some(base),
                field: FieldRef::new(class, name),
                rhs,
            },
        )
    }

    /// `lhs = Class.name`
    pub fn load_static(&mut self, method: MethodId, lhs: VarId, class: ClassId, name: &str) -> StmtId {
        self.push(
            method,
            Stmt::LoadField {
                lhs,
                base: None,
                field: FieldRef::new(class, name),
            },
        )
    }

    /// `Class.name = rhs`
    pub fn store_static(&mut self, method: MethodId, class: ClassId, name: &str, rhs: VarId) -> StmtId {
        self.push(
            method,
            Stmt::StoreField {
                base: None,
                field: FieldRef::new(class, name),
                rhs,
            },
        )
    }

    /// `lhs = base[*]`
    pub fn load_array(&mut self, method: MethodId, lhs: VarId, base: VarId) -> StmtId {
        self.push(method, Stmt::LoadArray { lhs, base })
    }

    /// `base[*] = rhs`
    pub fn store_array(&mut self, method: MethodId, base: VarId, rhs: VarId) -> StmtId {
        self.push(method, Stmt::StoreArray { base, rhs })
    }

    #[allow(clippy::too_many_arguments)]
    fn invoke(
        &mut self,
        method: MethodId,
        kind: InvokeKind,
        receiver: Option<VarId>,
        class: ClassId,
        subsignature: &str,
        args: &[VarId],
        result: Option<VarId>,
    ) -> StmtId {
        self.push(
            method,
            Stmt::Invoke(Invoke {
                kind,
                method_ref: MethodRef::new(class, subsignature),
                receiver,
                args: args.to_vec(),
                result,
            }),
        )
    }

    /// `result = Class.m(args)`
    pub fn invoke_static(
        &mut self,
        method: MethodId,
        class: ClassId,
        subsignature: &str,
        args: &[VarId],
        result: Option<VarId>,
    ) -> StmtId {
        self.invoke(method, InvokeKind::Static, None, class, subsignature, args, result)
    }

    /// `result = receiver.m(args)`, dispatched on the receiver's runtime type
    pub fn invoke_virtual(
        &mut self,
        method: MethodId,
        receiver: VarId,
        class: ClassId,
        subsignature: &str,
        args: &[VarId],
        result: Option<VarId>,
    ) -> StmtId {
        self.invoke(method, InvokeKind::Virtual, Some(receiver), class, subsignature, args, result)
    }

    pub fn invoke_interface(
        &mut self,
        method: MethodId,
        receiver: VarId,
        iface: ClassId,
        subsignature: &str,
        args: &[VarId],
        result: Option<VarId>,
    ) -> StmtId {
        self.invoke(method, InvokeKind::Interface, Some(receiver), iface, subsignature, args, result)
    }

    /// Constructor / private / `super.m()` call, resolved against `class`
    pub fn invoke_special(
        &mut self,
        method: MethodId,
        receiver: VarId,
        class: ClassId,
        subsignature: &str,
        args: &[VarId],
        result: Option<VarId>,
    ) -> StmtId {
        self.invoke(method, InvokeKind::Special, Some(receiver), class, subsignature, args, result)
    }

    /// Dynamic call site; without a receiver it is never resolved
    pub fn invoke_dynamic(
        &mut self,
        method: MethodId,
        receiver: Option<VarId>,
        class: ClassId,
        subsignature: &str,
        args: &[VarId],
        result: Option<VarId>,
    ) -> StmtId {
        self.invoke(method, InvokeKind::Dynamic, receiver, class, subsignature, args, result)
    }

    /// `return value`
    pub fn ret(&mut self, method: MethodId, value: Option<VarId>) -> StmtId {
        self.push(method, Stmt::Return { value })
    }

    pub fn nop(&mut self, method: MethodId) -> StmtId {
        self.push(method, Stmt::Nop)
    }

    // ═══════════════════════════════════════════════════════════════════════
    // Finish
    // ═══════════════════════════════════════════════════════════════════════

    /// Validate and return the program
    pub fn build(self) -> Result<Program> {
        self.program.validate()?;
        Ok(self.program)
    }

    /// Return the program without validation
    pub fn into_program_unchecked(self) -> Program {
        self.program
    }
}
