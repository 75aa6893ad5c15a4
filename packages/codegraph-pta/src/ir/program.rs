//! Program model: classes, methods, fields and local variables
//!
//! All entities live in flat vectors and are referred to by dense ids.

use super::stmt::{InvokeKind, Stmt, Subsignature};
use crate::errors::{PtaError, Result};
use serde::{Deserialize, Serialize};
use std::fmt;

macro_rules! define_id {
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
                write!(f, concat!($prefix, "{}"), self.0)
            }
        }
    };
}

define_id!(
    /// Class (or interface) identifier
    ClassId,
    "c"
);
define_id!(
    /// Method identifier
    MethodId,
    "m"
);
define_id!(
    /// Field identifier
    FieldId,
    "f"
);
define_id!(
    /// Local variable identifier (unique across the whole program)
    VarId,
    "v"
);

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Class {
    pub name: String,
    #[serde(default)]
    pub superclass: Option<ClassId>,
    /// Directly implemented (or, for interfaces, extended) interfaces
    #[serde(default)]
    pub interfaces: Vec<ClassId>,
    #[serde(default)]
    pub is_interface: bool,
    #[serde(default)]
    pub is_abstract: bool,
    #[serde(default)]
    pub methods: Vec<MethodId>,
    #[serde(default)]
    pub fields: Vec<FieldId>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Method {
    pub name: String,
    pub declaring_class: ClassId,
    pub subsignature: Subsignature,
    #[serde(default)]
    pub is_static: bool,
    #[serde(default)]
    pub is_abstract: bool,
    /// `this` variable; `None` for static methods
    #[serde(default)]
    pub this: Option<VarId>,
    #[serde(default)]
    pub params: Vec<VarId>,
    #[serde(default)]
    pub body: Vec<Stmt>,
}

impl Method {
    /// Variables returned by `return` statements of this method
    pub fn return_vars(&self) -> impl Iterator<Item = VarId> + '_ {
        self.body.iter().filter_map(|stmt| match stmt {
            Stmt::Return { value } => *value,
            _ => None,
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Field {
    pub name: String,
    pub declaring_class: ClassId,
    #[serde(default)]
    pub is_static: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Var {
    pub name: String,
    pub method: MethodId,
}

/// A whole program
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Program {
    pub classes: Vec<Class>,
    pub methods: Vec<Method>,
    #[serde(default)]
    pub fields: Vec<Field>,
    pub vars: Vec<Var>,
    /// Program entry (`main`)
    pub entry: Option<MethodId>,
}

impl Program {
    #[inline]
    pub fn class(&self, id: ClassId) -> &Class {
        &self.classes[id.index()]
    }

    #[inline]
    pub fn method(&self, id: MethodId) -> &Method {
        &self.methods[id.index()]
    }

    #[inline]
    pub fn field(&self, id: FieldId) -> &Field {
        &self.fields[id.index()]
    }

    #[inline]
    pub fn var(&self, id: VarId) -> &Var {
        &self.vars[id.index()]
    }

    pub fn method_ids(&self) -> impl Iterator<Item = MethodId> {
        (0..self.methods.len() as u32).map(MethodId)
    }

    pub fn class_ids(&self) -> impl Iterator<Item = ClassId> {
        (0..self.classes.len() as u32).map(ClassId)
    }

    /// Find a class by name
    pub fn class_by_name(&self, name: &str) -> Option<ClassId> {
        self.classes
            .iter()
            .position(|c| c.name == name)
            .map(|i| ClassId(i as u32))
    }

    /// Find a method by class name and method name
    pub fn method_by_name(&self, class: &str, name: &str) -> Option<MethodId> {
        let class = self.class_by_name(class)?;
        self.class(class)
            .methods
            .iter()
            .copied()
            .find(|&m| self.method(m).name == name)
    }

    /// Find a variable by method and name
    pub fn var_by_name(&self, method: MethodId, name: &str) -> Option<VarId> {
        self.vars
            .iter()
            .position(|v| v.method == method && v.name == name)
            .map(|i| VarId(i as u32))
    }

    /// `<Class: subsignature>` rendering used in logs and reports
    pub fn method_signature(&self, id: MethodId) -> String {
        let method = self.method(id);
        format!(
            "<{}: {}>",
            self.class(method.declaring_class).name,
            method.subsignature
        )
    }

    /// `method/name` rendering of a variable
    pub fn var_name(&self, id: VarId) -> String {
        let var = self.var(id);
        format!("{}/{}", self.method(var.method).name, var.name)
    }

    /// Entry method, or an error if none is set
    pub fn entry_method(&self) -> Result<MethodId> {
        self.entry
            .ok_or_else(|| PtaError::malformed("program has no entry method"))
    }

    /// Structural checks: every id is in range, variables belong to the
    /// method that uses them, and the entry method is a concrete static method.
    pub fn validate(&self) -> Result<()> {
        let check_class = |c: ClassId, what: &str| -> Result<()> {
            if c.index() < self.classes.len() {
                Ok(())
            } else {
                Err(PtaError::malformed(format!("{} refers to unknown class {}", what, c)))
            }
        };

        for (i, class) in self.classes.iter().enumerate() {
            let what = format!("class '{}'", class.name);
            if let Some(sup) = class.superclass {
                check_class(sup, &what)?;
            }
            for &iface in &class.interfaces {
                check_class(iface, &what)?;
            }
            for &m in &class.methods {
                if m.index() >= self.methods.len() {
                    return Err(PtaError::malformed(format!("{} lists unknown method {}", what, m)));
                }
                if self.method(m).declaring_class.index() != i {
                    return Err(PtaError::malformed(format!(
                        "{} lists method {} declared elsewhere",
                        what, m
                    )));
                }
            }
            for &f in &class.fields {
                if f.index() >= self.fields.len() {
                    return Err(PtaError::malformed(format!("{} lists unknown field {}", what, f)));
                }
            }
        }

        self.check_acyclic_hierarchy()?;

        for field in &self.fields {
            check_class(field.declaring_class, &format!("field '{}'", field.name))?;
        }

        for m in self.method_ids() {
            let method = self.method(m);
            let what = format!("method {}", method.name);
            check_class(method.declaring_class, &what)?;

            let check_var = |v: VarId| -> Result<()> {
                match self.vars.get(v.index()) {
                    Some(var) if var.method == m => Ok(()),
                    Some(_) => Err(PtaError::malformed(format!(
                        "{} uses variable {} of another method",
                        what, v
                    ))),
                    None => Err(PtaError::malformed(format!(
                        "{} uses unknown variable {}",
                        what, v
                    ))),
                }
            };

            if method.is_static == method.this.is_some() {
                return Err(PtaError::malformed(format!(
                    "{}: static methods have no 'this', instance methods need one",
                    what
                )));
            }
            method.this.into_iter().try_for_each(&check_var)?;
            method.params.iter().copied().try_for_each(&check_var)?;

            for stmt in &method.body {
                stmt.def().into_iter().try_for_each(&check_var)?;
                stmt.uses().into_iter().try_for_each(&check_var)?;
                match stmt {
                    Stmt::New { class, .. } => check_class(*class, &what)?,
                    Stmt::LoadField { field, .. } | Stmt::StoreField { field, .. } => {
                        check_class(field.class, &what)?
                    }
                    Stmt::Invoke(invoke) => {
                        check_class(invoke.method_ref.class, &what)?;
                        // dynamic call sites may lack a receiver
                        let receiver_ok = match invoke.kind {
                            InvokeKind::Static => invoke.receiver.is_none(),
                            InvokeKind::Dynamic => true,
                            _ => invoke.receiver.is_some(),
                        };
                        if !receiver_ok {
                            return Err(PtaError::malformed(format!(
                                "{}: {} call with{} receiver",
                                what,
                                invoke.kind.as_str(),
                                if invoke.receiver.is_some() { "" } else { "out" }
                            )));
                        }
                    }
                    _ => {}
                }
            }
        }

        let entry = self.entry_method()?;
        match self.methods.get(entry.index()) {
            Some(main) if main.is_static && !main.is_abstract => Ok(()),
            Some(main) => Err(PtaError::malformed(format!(
                "entry method '{}' must be a concrete static method",
                main.name
            ))),
            None => Err(PtaError::malformed(format!("unknown entry method {}", entry))),
        }
    }

    /// Reject superclass / interface cycles; hierarchy walks assume none.
    /// Class ids must already be in range.
    fn check_acyclic_hierarchy(&self) -> Result<()> {
        #[derive(Clone, Copy, PartialEq)]
        enum Mark {
            Unvisited,
            OnPath,
            Done,
        }

        let supertypes = |c: ClassId| {
            let class = self.class(c);
            class.superclass.into_iter().chain(class.interfaces.iter().copied())
        };

        let mut marks = vec![Mark::Unvisited; self.classes.len()];
        for root in self.class_ids() {
            if marks[root.index()] != Mark::Unvisited {
                continue;
            }
            marks[root.index()] = Mark::OnPath;
            // (class, index of the next supertype to visit)
            let mut stack = vec![(root, 0usize)];
            while let Some((c, next)) = stack.pop() {
                match supertypes(c).nth(next) {
                    Some(sup) => {
                        stack.push((c, next + 1));
                        match marks[sup.index()] {
                            Mark::OnPath => {
                                return Err(PtaError::malformed(format!(
                                    "class hierarchy cycle through '{}' and '{}'",
                                    self.class(c).name,
                                    self.class(sup).name
                                )));
                            }
                            Mark::Unvisited => {
                                marks[sup.index()] = Mark::OnPath;
                                stack.push((sup, 0));
                            }
                            Mark::Done => {}
                        }
                    }
                    None => marks[c.index()] = Mark::Done,
                }
            }
        }
        Ok(())
    }
}
