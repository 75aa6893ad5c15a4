//! End-to-end solver scenarios
//!
//! Small programs with hand-computed expected facts, run through the public
//! `PointerAnalysis` entry point.

mod common;

use codegraph_pta::config::ContextSensitivity;
use codegraph_pta::features::call_graph::CallKind;
use codegraph_pta::features::points_to::{Context, ContextElement};
use codegraph_pta::ir::{ProgramBuilder, World};
use codegraph_pta::PtaError;
use common::*;
use pretty_assertions::assert_eq;

// ═══════════════════════════════════════════════════════════════════════════
// Copy propagation
// ═══════════════════════════════════════════════════════════════════════════

#[test]
fn test_copy_propagates_exactly_the_source_set() {
    let fx = copy_program();
    for cs in [ContextSensitivity::default(), ContextSensitivity::object(1)] {
        let result = analyze(&fx.world, cs);
        assert_points_to(&result, fx.a, &[fx.obj_a]);
        assert_points_to(&result, fx.b, &[fx.obj_b]);
        assert_points_to(&result, fx.c, &[fx.obj_a]);
    }
}

// ═══════════════════════════════════════════════════════════════════════════
// Virtual dispatch
// ═══════════════════════════════════════════════════════════════════════════

#[test]
fn test_virtual_call_gets_one_edge_per_receiver_type() {
    let fx = virtual_dispatch_program();
    let result = analyze(&fx.world, ContextSensitivity::default());

    assert_eq!(
        edges_from(&result, fx.call_site),
        vec![
            (CallKind::Virtual, fx.sub1_foo),
            (CallKind::Virtual, fx.sub2_foo),
        ]
    );
    let reachable = result.reachable_methods();
    assert!(reachable.contains(&fx.main));
    assert!(!reachable.contains(&fx.base_foo));
    assert!(!reachable.contains(&fx.sub3_foo));
    assert_eq!(result.stats().call_edges, 2);
}

#[test]
fn test_receiver_flows_into_this_of_its_own_target_only() {
    let fx = virtual_dispatch_program();
    let result = analyze(&fx.world, ContextSensitivity::default());
    let program = fx.world.program();

    let x_objs = result.points_to_set_of(fx.x);
    assert_eq!(x_objs.len(), 2);

    for target in [fx.sub1_foo, fx.sub2_foo] {
        let this = program.method(target).this.unwrap();
        let objs = result.points_to_set_of(this);
        assert_eq!(objs.len(), 1);
        assert_eq!(
            fx.world.heap().obj(objs[0]).class,
            program.method(target).declaring_class
        );
    }
}

// ═══════════════════════════════════════════════════════════════════════════
// Field sensitivity under object sensitivity
// ═══════════════════════════════════════════════════════════════════════════

#[test]
fn test_one_object_sensitivity_keeps_instance_fields_apart() {
    let fx = field_program();
    let result = analyze(&fx.world, ContextSensitivity::object(1));

    let cs_a = result.cs_objects_of(fx.obj_a);
    let cs_b = result.cs_objects_of(fx.obj_b);
    assert_eq!(cs_a.len(), 1);
    assert_eq!(cs_b.len(), 1);
    assert_ne!(cs_a[0], cs_b[0]);

    let field_a = result.instance_field_points_to(cs_a[0], fx.field);
    let field_b = result.instance_field_points_to(cs_b[0], fx.field);
    assert_eq!(objects_of(&result, &field_a), vec![fx.item1]);
    assert_eq!(objects_of(&result, &field_b), vec![fx.item2]);
    assert!(!field_a.intersects(&field_b));

    assert_points_to(&result, fx.ra, &[fx.item1]);
    assert_points_to(&result, fx.rb, &[fx.item2]);
    assert!(!result.may_alias(fx.ra, fx.rb));
}

#[test]
fn test_one_object_sensitivity_analyzes_callee_per_receiver() {
    let fx = field_program();
    let result = analyze(&fx.world, ContextSensitivity::object(1));

    let mut contexts: Vec<Context> = result
        .contexts_of(fx.foo_this)
        .map(|(context, pts)| {
            assert_eq!(pts.len(), 1);
            context.clone()
        })
        .collect();
    contexts.sort();
    assert_eq!(
        contexts,
        vec![
            Context::from_elements([ContextElement::Object(fx.obj_a)]),
            Context::from_elements([ContextElement::Object(fx.obj_b)]),
        ]
    );
    assert_eq!(instantiations_of(&result, fx.foo), 2);
}

#[test]
fn test_insensitive_analysis_merges_the_same_fields() {
    let fx = field_program();
    let result = analyze(&fx.world, ContextSensitivity::default());

    let cs_a = result.cs_objects_of(fx.obj_a);
    let field_a = result.instance_field_points_to(cs_a[0], fx.field);
    assert_eq!(objects_of(&result, &field_a), vec![fx.item1, fx.item2]);
    assert_points_to(&result, fx.ra, &[fx.item1, fx.item2]);
    assert!(result.may_alias(fx.ra, fx.rb));
    assert_eq!(instantiations_of(&result, fx.foo), 1);
}

// ═══════════════════════════════════════════════════════════════════════════
// Static calls
// ═══════════════════════════════════════════════════════════════════════════

#[test]
fn test_static_call_site_has_one_edge_across_contexts() {
    let fx = static_call_program();
    let result = analyze(&fx.world, ContextSensitivity::call_site(2));

    assert_eq!(edges_from(&result, fx.site3), vec![(CallKind::Static, fx.f)]);
    assert_eq!(edges_from(&result, fx.site1), vec![(CallKind::Static, fx.g)]);
    assert_eq!(edges_from(&result, fx.site2), vec![(CallKind::Static, fx.g)]);

    // one instantiation per selected context, not per call site
    assert_eq!(instantiations_of(&result, fx.g), 2);
    assert_eq!(instantiations_of(&result, fx.f), 2);
    assert_eq!(result.call_graph().edge_count(), 4);
    assert_eq!(result.ci_call_graph().edge_count(), 3);
}

#[test]
fn test_static_call_instantiations_follow_depth() {
    let fx = static_call_program();

    let ci = analyze(&fx.world, ContextSensitivity::default());
    assert_eq!(instantiations_of(&ci, fx.f), 1);
    assert_eq!(ci.points_to_set_of(fx.p).len(), 2);

    let one_call = analyze(&fx.world, ContextSensitivity::call_site(1));
    assert_eq!(instantiations_of(&one_call, fx.f), 1);
    assert_eq!(instantiations_of(&one_call, fx.g), 2);

    let two_call = analyze(&fx.world, ContextSensitivity::call_site(2));
    let via_site1 = Context::from_elements([
        ContextElement::CallSite(fx.site1),
        ContextElement::CallSite(fx.site3),
    ]);
    let pts = two_call.cs_points_to_set_of(&via_site1, fx.p).unwrap();
    assert_eq!(objects_of(&two_call, pts), two_call.points_to_set_of(fx.x));
}

#[test]
fn test_call_site_contexts_keep_the_most_recent_sites() {
    let (world, z, [s1, s2, s3]) = call_chain_program();
    let site = ContextElement::CallSite;

    let expected = [
        (1, Context::from_elements([site(s3)])),
        (2, Context::from_elements([site(s2), site(s3)])),
        (3, Context::from_elements([site(s1), site(s2), site(s3)])),
        (4, Context::from_elements([site(s1), site(s2), site(s3)])),
    ];
    for (k, context) in expected {
        let result = analyze(&world, ContextSensitivity::call_site(k));
        let contexts: Vec<Context> = result.contexts_of(z).map(|(c, _)| c.clone()).collect();
        assert_eq!(contexts, vec![context], "k = {}", k);
    }
}

// ═══════════════════════════════════════════════════════════════════════════
// Unresolvable calls
// ═══════════════════════════════════════════════════════════════════════════

#[test]
fn test_unresolvable_calls_are_skipped() {
    let fx = unresolved_call_program(true);
    let result = analyze(&fx.world, ContextSensitivity::default());

    for &site in &fx.unresolved_sites {
        assert!(edges_from(&result, site).is_empty());
    }
    assert!(result.reachable_methods().contains(&fx.run));
    assert_eq!(result.stats().unresolved_calls, 2);
    assert_eq!(result.stats().call_edges, 1);
}

#[test]
fn test_unresolvable_calls_add_no_work() {
    let with = analyze(&unresolved_call_program(true).world, ContextSensitivity::default());
    let without = analyze(&unresolved_call_program(false).world, ContextSensitivity::default());

    assert_eq!(with.stats().worklist_entries, without.stats().worklist_entries);
    assert_eq!(with.stats().pointers, without.stats().pointers);
    assert_eq!(with.stats().pfg_edges, without.stats().pfg_edges);
    assert_eq!(without.stats().unresolved_calls, 0);
}

// ═══════════════════════════════════════════════════════════════════════════
// Call kinds
// ═══════════════════════════════════════════════════════════════════════════

#[test]
fn test_special_call_resolves_from_declaring_class() {
    let mut b = ProgramBuilder::new();
    let main_class = b.add_class("Main", None);
    let base = b.add_class("Base", None);
    let sub = b.add_class("Sub", Some(base));
    let base_init = b.add_instance_method(base, "<init>", "void <init>()", &[]);
    let base_foo = b.add_instance_method(base, "foo", VOID_FOO, &[]);
    b.add_instance_method(sub, "foo", VOID_FOO, &[]);

    let main = b.add_static_method(main_class, "main", "void main()", &[]);
    let x = b.add_var(main, "x");
    b.new_obj(main, x, sub);
    // Sub declares no constructor; found on Base
    let init = b.invoke_special(main, x, sub, "void <init>()", &[], None);
    // super.foo(): no dispatch on the Sub receiver
    let sup = b.invoke_special(main, x, base, VOID_FOO, &[], None);
    b.set_entry(main);
    let world = World::new(b.build().unwrap()).unwrap();

    let result = analyze(&world, ContextSensitivity::default());
    assert_eq!(edges_from(&result, init), vec![(CallKind::Special, base_init)]);
    assert_eq!(edges_from(&result, sup), vec![(CallKind::Special, base_foo)]);

    let this = world.program().method(base_foo).this.unwrap();
    assert_eq!(result.points_to_set_of(this), result.points_to_set_of(x));
}

#[test]
fn test_interface_and_dynamic_calls_dispatch_on_receiver() {
    let mut b = ProgramBuilder::new();
    let main_class = b.add_class("Main", None);
    let runnable = b.add_interface("Runnable", &[]);
    b.add_abstract_method(runnable, "run", "void run()", &[]);
    let task = b.add_class("Task", None);
    b.implement(task, runnable);
    let task_run = b.add_instance_method(task, "run", "void run()", &[]);

    let main = b.add_static_method(main_class, "main", "void main()", &[]);
    let x = b.add_var(main, "x");
    b.new_obj(main, x, task);
    let iface = b.invoke_interface(main, x, runnable, "void run()", &[], None);
    let dynamic = b.invoke_dynamic(main, Some(x), runnable, "void run()", &[], None);
    let bootstrap = b.invoke_dynamic(main, None, runnable, "void run()", &[], None);
    b.set_entry(main);
    let world = World::new(b.build().unwrap()).unwrap();

    let result = analyze(&world, ContextSensitivity::default());
    assert_eq!(edges_from(&result, iface), vec![(CallKind::Interface, task_run)]);
    assert_eq!(edges_from(&result, dynamic), vec![(CallKind::Dynamic, task_run)]);
    assert!(edges_from(&result, bootstrap).is_empty());
    assert_eq!(result.stats().unresolved_calls, 1);
}

#[test]
fn test_returns_flow_back_to_call_result() {
    let mut b = ProgramBuilder::new();
    let main_class = b.add_class("Main", None);
    let factory = b.add_class("Factory", None);
    let product = b.add_class("Product", None);

    let make = b.add_instance_method(factory, "make", "Product make()", &[]);
    let made = b.add_var(make, "made");
    let site = b.new_obj(make, made, product);
    b.ret(make, Some(made));

    let main = b.add_static_method(main_class, "main", "void main()", &[]);
    let f = b.add_var(main, "f");
    let r = b.add_var(main, "r");
    b.new_obj(main, f, factory);
    b.invoke_virtual(main, f, factory, "Product make()", &[], Some(r));
    b.set_entry(main);
    let world = World::new(b.build().unwrap()).unwrap();

    let result = analyze(&world, ContextSensitivity::object(2));
    assert_points_to(&result, r, &[obj_at(&world, site)]);

    // heap context is the receiver object of make()
    let cs_objs = result.cs_objects_of(obj_at(&world, site));
    assert_eq!(cs_objs.len(), 1);
    let heap_context = result.context(result.cs_obj(cs_objs[0]).heap_context);
    assert_eq!(heap_context.len(), 1);
}

// ═══════════════════════════════════════════════════════════════════════════
// Arrays and static fields
// ═══════════════════════════════════════════════════════════════════════════

#[test]
fn test_array_elements_and_static_fields_flow() {
    let mut b = ProgramBuilder::new();
    let main_class = b.add_class("Main", None);
    let holder = b.add_class("Holder", None);
    let item = b.add_class("Item", None);
    b.add_field(holder, "shared", true);

    let reader = b.add_static_method(holder, "read", "java.lang.Object read()", &[]);
    let got = b.add_var(reader, "got");
    b.load_static(reader, got, holder, "shared");
    b.ret(reader, Some(got));

    let main = b.add_static_method(main_class, "main", "void main()", &[]);
    let arr = b.add_var(main, "arr");
    let o = b.add_var(main, "o");
    let elem = b.add_var(main, "elem");
    let back = b.add_var(main, "back");
    b.new_obj(main, arr, item);
    let item_site = b.new_obj(main, o, item);
    b.store_array(main, arr, o);
    b.load_array(main, elem, arr);
    b.store_static(main, holder, "shared", elem);
    b.invoke_static(main, holder, "java.lang.Object read()", &[], Some(back));
    b.set_entry(main);
    let world = World::new(b.build().unwrap()).unwrap();

    let result = analyze(&world, ContextSensitivity::call_site(1));
    let expected = [obj_at(&world, item_site)];
    assert_points_to(&result, elem, &expected);
    assert_points_to(&result, got, &expected);
    assert_points_to(&result, back, &expected);
}

// ═══════════════════════════════════════════════════════════════════════════
// Fatal input errors
// ═══════════════════════════════════════════════════════════════════════════

#[test]
fn test_unresolved_field_fails_before_solving() {
    let mut b = ProgramBuilder::new();
    let main_class = b.add_class("Main", None);
    let main = b.add_static_method(main_class, "main", "void main()", &[]);
    let x = b.add_var(main, "x");
    let y = b.add_var(main, "y");
    b.new_obj(main, x, main_class);
    b.load_field(main, y, x, main_class, "nope");
    b.set_entry(main);
    let world = World::new(b.build().unwrap()).unwrap();

    let err = codegraph_pta::PointerAnalysis::new(Default::default())
        .unwrap()
        .analyze(&world)
        .unwrap_err();
    match err {
        PtaError::UnresolvedField { class, name } => {
            assert_eq!(class, "Main");
            assert_eq!(name, "nope");
        }
        other => panic!("unexpected error: {other}"),
    }
}
