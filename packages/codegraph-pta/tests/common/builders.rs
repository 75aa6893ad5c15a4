//! Fixture programs
//!
//! Each builder returns the world together with the handles a test needs to
//! ask questions about it.

use codegraph_pta::ir::{FieldId, MethodId, ObjId, ProgramBuilder, StmtId, VarId, World};

pub const VOID_FOO: &str = "void foo()";
pub const OBJ_FOO: &str = "java.lang.Object foo(java.lang.Object)";
pub const OBJ_MAKE: &str = "java.lang.Object make()";
pub const VOID_MAIN: &str = "void main()";

/// Abstract object allocated at `site`
pub fn obj_at(world: &World, site: StmtId) -> ObjId {
    world
        .heap()
        .obj_at(site)
        .unwrap_or_else(|| panic!("{} is not an allocation", site))
}

// ═══════════════════════════════════════════════════════════════════════════
// Copy
// ═══════════════════════════════════════════════════════════════════════════

pub struct CopyFixture {
    pub world: World,
    pub a: VarId,
    pub b: VarId,
    pub c: VarId,
    pub obj_a: ObjId,
    pub obj_b: ObjId,
}

/// `a = new A(); b = new B(); c = a;`
pub fn copy_program() -> CopyFixture {
    let mut b = ProgramBuilder::new();
    let main_class = b.add_class("Main", None);
    let class_a = b.add_class("A", None);
    let class_b = b.add_class("B", None);
    let main = b.add_static_method(main_class, "main", "void main()", &[]);
    let va = b.add_var(main, "a");
    let vb = b.add_var(main, "b");
    let vc = b.add_var(main, "c");
    let site_a = b.new_obj(main, va, class_a);
    let site_b = b.new_obj(main, vb, class_b);
    b.copy(main, vc, va);
    b.set_entry(main);

    let world = World::new(b.build().unwrap()).unwrap();
    CopyFixture {
        obj_a: obj_at(&world, site_a),
        obj_b: obj_at(&world, site_b),
        world,
        a: va,
        b: vb,
        c: vc,
    }
}

// ═══════════════════════════════════════════════════════════════════════════
// Virtual dispatch
// ═══════════════════════════════════════════════════════════════════════════

pub struct DispatchFixture {
    pub world: World,
    pub main: MethodId,
    pub x: VarId,
    pub call_site: StmtId,
    pub base_foo: MethodId,
    pub sub1_foo: MethodId,
    pub sub2_foo: MethodId,
    pub sub3_foo: MethodId,
}

/// `Base.foo` overridden by `Sub1`, `Sub2` and `Sub3`; `x` is assigned a
/// `Sub1` and a `Sub2` (the two branches of a conditional), then `x.foo()`.
/// `Sub3` is never allocated.
pub fn virtual_dispatch_program() -> DispatchFixture {
    let mut b = ProgramBuilder::new();
    let main_class = b.add_class("Main", None);
    let base = b.add_class("Base", None);
    let sub1 = b.add_class("Sub1", Some(base));
    let sub2 = b.add_class("Sub2", Some(base));
    let sub3 = b.add_class("Sub3", Some(base));
    let base_foo = b.add_instance_method(base, "foo", VOID_FOO, &[]);
    let sub1_foo = b.add_instance_method(sub1, "foo", VOID_FOO, &[]);
    let sub2_foo = b.add_instance_method(sub2, "foo", VOID_FOO, &[]);
    let sub3_foo = b.add_instance_method(sub3, "foo", VOID_FOO, &[]);

    let main = b.add_static_method(main_class, "main", "void main()", &[]);
    let x = b.add_var(main, "x");
    b.new_obj(main, x, sub1);
    b.new_obj(main, x, sub2);
    let call_site = b.invoke_virtual(main, x, base, VOID_FOO, &[], None);
    b.set_entry(main);

    DispatchFixture {
        world: World::new(b.build().unwrap()).unwrap(),
        main,
        x,
        call_site,
        base_foo,
        sub1_foo,
        sub2_foo,
        sub3_foo,
    }
}

// ═══════════════════════════════════════════════════════════════════════════
// Field separation
// ═══════════════════════════════════════════════════════════════════════════

pub struct FieldFixture {
    pub world: World,
    pub a: VarId,
    pub b: VarId,
    pub ra: VarId,
    pub rb: VarId,
    pub foo: MethodId,
    pub foo_this: VarId,
    pub field: FieldId,
    pub obj_a: ObjId,
    pub obj_b: ObjId,
    pub item1: ObjId,
    pub item2: ObjId,
}

/// Two `Sub1` allocation sites; `Sub1.foo(p)` stores `p` into the inherited
/// field `f` and returns what it reads back.
///
/// ```text
/// a = new Sub1; b = new Sub1; o1 = new Item; o2 = new Item;
/// ra = a.foo(o1); rb = b.foo(o2);
///
/// Sub1.foo(p) { this.f = p; r = this.f; return r; }
/// ```
pub fn field_program() -> FieldFixture {
    let mut b = ProgramBuilder::new();
    let main_class = b.add_class("Main", None);
    let base = b.add_class("Base", None);
    let sub1 = b.add_class("Sub1", Some(base));
    let item = b.add_class("Item", None);
    let field = b.add_field(base, "f", false);

    let foo = b.add_instance_method(sub1, "foo", OBJ_FOO, &["p"]);
    let foo_this = b.this_var(foo).unwrap();
    let p = b.param(foo, 0).unwrap();
    let r = b.add_var(foo, "r");
    b.store_field(foo, foo_this, sub1, "f", p);
    b.load_field(foo, r, foo_this, sub1, "f");
    b.ret(foo, Some(r));

    let main = b.add_static_method(main_class, "main", "void main()", &[]);
    let va = b.add_var(main, "a");
    let vb = b.add_var(main, "b");
    let o1 = b.add_var(main, "o1");
    let o2 = b.add_var(main, "o2");
    let ra = b.add_var(main, "ra");
    let rb = b.add_var(main, "rb");
    let site_a = b.new_obj(main, va, sub1);
    let site_b = b.new_obj(main, vb, sub1);
    let site_1 = b.new_obj(main, o1, item);
    let site_2 = b.new_obj(main, o2, item);
    b.invoke_virtual(main, va, sub1, OBJ_FOO, &[o1], Some(ra));
    b.invoke_virtual(main, vb, sub1, OBJ_FOO, &[o2], Some(rb));
    b.set_entry(main);

    let world = World::new(b.build().unwrap()).unwrap();
    FieldFixture {
        obj_a: obj_at(&world, site_a),
        obj_b: obj_at(&world, site_b),
        item1: obj_at(&world, site_1),
        item2: obj_at(&world, site_2),
        world,
        a: va,
        b: vb,
        ra,
        rb,
        foo,
        foo_this,
        field,
    }
}

// ═══════════════════════════════════════════════════════════════════════════
// Static calls
// ═══════════════════════════════════════════════════════════════════════════

pub struct StaticCallFixture {
    pub world: World,
    pub g: MethodId,
    pub f: MethodId,
    pub site1: StmtId,
    pub site2: StmtId,
    pub site3: StmtId,
    pub p: VarId,
    pub x: VarId,
}

/// ```text
/// main() { x = new A; y = new A; Util.g(x); /*site1*/ Util.g(y); /*site2*/ }
/// Util.g(q) { Util.f(q); /*site3*/ }
/// Util.f(p) { }
/// ```
pub fn static_call_program() -> StaticCallFixture {
    let mut b = ProgramBuilder::new();
    let main_class = b.add_class("Main", None);
    let util = b.add_class("Util", None);
    let class_a = b.add_class("A", None);

    let f = b.add_static_method(util, "f", "void f(java.lang.Object)", &["p"]);
    let p = b.param(f, 0).unwrap();
    b.nop(f);

    let g = b.add_static_method(util, "g", "void g(java.lang.Object)", &["q"]);
    let q = b.param(g, 0).unwrap();
    let site3 = b.invoke_static(g, util, "void f(java.lang.Object)", &[q], None);

    let main = b.add_static_method(main_class, "main", "void main()", &[]);
    let x = b.add_var(main, "x");
    let y = b.add_var(main, "y");
    b.new_obj(main, x, class_a);
    b.new_obj(main, y, class_a);
    let site1 = b.invoke_static(main, util, "void g(java.lang.Object)", &[x], None);
    let site2 = b.invoke_static(main, util, "void g(java.lang.Object)", &[y], None);
    b.set_entry(main);

    StaticCallFixture {
        world: World::new(b.build().unwrap()).unwrap(),
        g,
        f,
        site1,
        site2,
        site3,
        p,
        x,
    }
}

/// Static call chain `main → a → b → c`; `c` allocates into `z`.
/// Returns the world, `z` and the call sites in order.
pub fn call_chain_program() -> (World, VarId, [StmtId; 3]) {
    let mut b = ProgramBuilder::new();
    let main_class = b.add_class("Main", None);
    let class_a = b.add_class("A", None);

    let c = b.add_static_method(main_class, "c", "void c()", &[]);
    let z = b.add_var(c, "z");
    b.new_obj(c, z, class_a);

    let mb = b.add_static_method(main_class, "b", "void b()", &[]);
    let s3 = b.invoke_static(mb, main_class, "void c()", &[], None);

    let ma = b.add_static_method(main_class, "a", "void a()", &[]);
    let s2 = b.invoke_static(ma, main_class, "void b()", &[], None);

    let main = b.add_static_method(main_class, "main", "void main()", &[]);
    let s1 = b.invoke_static(main, main_class, "void a()", &[], None);
    b.set_entry(main);

    (World::new(b.build().unwrap()).unwrap(), z, [s1, s2, s3])
}

// ═══════════════════════════════════════════════════════════════════════════
// Unresolvable calls
// ═══════════════════════════════════════════════════════════════════════════

pub struct UnresolvedFixture {
    pub world: World,
    pub run: MethodId,
    pub unresolved_sites: Vec<StmtId>,
}

/// `x = new A; x.run();` and, with `with_unresolved`, a static call into a
/// class without methods plus a virtual call to a method `A` lacks.
pub fn unresolved_call_program(with_unresolved: bool) -> UnresolvedFixture {
    let mut b = ProgramBuilder::new();
    let main_class = b.add_class("Main", None);
    let lib = b.add_class("Lib", None);
    let class_a = b.add_class("A", None);
    let run = b.add_instance_method(class_a, "run", "void run()", &[]);

    let main = b.add_static_method(main_class, "main", "void main()", &[]);
    let x = b.add_var(main, "x");
    let y = b.add_var(main, "y");
    b.new_obj(main, x, class_a);

    let mut unresolved_sites = Vec::new();
    if with_unresolved {
        unresolved_sites.push(b.invoke_static(
            main,
            lib,
            "java.lang.Object missing(java.lang.Object)",
            &[x],
            Some(y),
        ));
        unresolved_sites.push(b.invoke_virtual(main, x, class_a, "void absent()", &[], None));
    }
    b.invoke_virtual(main, x, class_a, "void run()", &[], None);
    b.set_entry(main);

    UnresolvedFixture {
        world: World::new(b.build().unwrap()).unwrap(),
        run,
        unresolved_sites,
    }
}
