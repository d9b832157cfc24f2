// SPDX-License-Identifier: Apache-2.0

use netloom::*;

#[test]
fn test_basic_construction() {
    let hier = Module::create_hier();
    let leaf = Module::create_leaf();
    assert!(hier.is_hier());
    assert!(!hier.is_leaf());
    assert!(leaf.is_leaf());
    assert!(hier.is_valid() && leaf.is_valid());

    let inst = hier.create_instance(&leaf);
    let w = hier.create_wire();
    assert!(inst.get_parent_module() == hier);
    assert!(inst.get_down_module() == leaf);
    assert!(w.get_parent_module() == hier);

    let mpt1 = leaf.create_port();
    let mpt2 = leaf.create_port();
    let ipt1 = mpt1.get_up_port(&inst);
    let ipt2 = mpt2.get_up_port(&inst);
    assert!(!ipt1.is_connected());
    assert!(!ipt2.is_connected());

    ipt1.connect(&w);
    assert!(ipt1.is_connected());
    assert!(!ipt2.is_connected());
    assert!(ipt1.get_wire() == w);

    ipt2.connect(&w);
    assert!(ipt1.is_connected());
    assert!(ipt2.is_connected());

    // The wire reports each connected port exactly once.
    assert_eq!(w.ports().count(), 2);
    assert_eq!(w.ports().filter(|p| p == ipt1.as_port()).count(), 1);
    assert_eq!(w.ports().filter(|p| p == ipt2.as_port()).count(), 1);

    ipt1.disconnect();
    assert!(!ipt1.is_connected());
    assert!(ipt2.is_connected());
    assert_eq!(w.ports().count(), 1);

    mpt1.destroy();
    inst.destroy();
    w.destroy();
}

#[test]
fn instance_and_module_port_duality() {
    let hier = Module::create_hier();
    let leaf = Module::create_leaf();
    let inst = hier.create_instance(&leaf);
    let mpt = leaf.create_port();

    let ipt = mpt.get_up_port(&inst);
    assert!(ipt.is_instance_port());
    assert!(!ipt.is_module_port());
    assert!(mpt.is_module_port());
    assert!(ipt.get_down_port() == mpt);
    assert!(ipt.get_instance() == inst);
    assert!(ipt.get_node() == *inst.as_node());
    assert!(ipt.get_parent_module() == hier);
    assert!(mpt.get_parent_module() == leaf);
}

#[test]
fn destroy_cleans_connections() {
    let hier = Module::create_hier();
    let leaf = Module::create_leaf();
    let p = leaf.create_port();
    let inst1 = hier.create_instance(&leaf);
    let inst2 = hier.create_instance(&leaf);
    let w = hier.create_wire();

    let ip1 = p.get_up_port(&inst1);
    let ip2 = p.get_up_port(&inst2);
    ip1.connect(&w);
    ip2.connect(&w);
    assert_eq!(w.ports().count(), 2);

    inst1.destroy();
    assert!(!inst1.is_valid());
    assert!(!ip1.is_valid());
    assert_eq!(w.ports().count(), 1);

    w.destroy();
    assert!(!w.is_valid());
    assert!(!ip2.is_connected());
}

#[test]
fn wire_slots_are_reused_after_destroy() {
    let hier = Module::create_hier();
    let w0 = hier.create_wire();
    let w1 = hier.create_wire();
    assert_eq!(hier.wires().count(), 2);

    w0.destroy();
    assert!(!w0.is_valid());
    assert_eq!(hier.wires().count(), 1);

    let w2 = hier.create_wire();
    assert_eq!(hier.wires().count(), 2);
    assert!(w2.is_valid());
    // The freed slot is recycled, so the stale handle aliases the new
    // wire.
    assert!(w0 == w2);
    assert!(w1.is_valid());
}

#[test]
fn port_slots_are_reused_after_destroy() {
    let leaf = Module::create_leaf();
    let p0 = leaf.create_port();
    let p1 = leaf.create_port();
    let p2 = leaf.create_port();
    assert_eq!(leaf.ports().count(), 3);

    p1.destroy();
    assert!(!p1.is_valid());
    assert!(p0.is_valid() && p2.is_valid());
    assert_eq!(leaf.ports().count(), 2);

    let p3 = leaf.create_port();
    assert_eq!(leaf.ports().count(), 3);
    assert!(p3.as_port() == p1.as_port());
}

#[test]
fn module_port_destroy_leaves_wire_side_entry() {
    let hier = Module::create_hier();
    let p = hier.create_port();
    let w = hier.create_wire();
    p.connect(&w);
    assert!(p.is_connected());
    assert_eq!(w.ports().count(), 1);

    p.destroy();
    assert!(!p.is_valid());
    assert_eq!(hier.ports().count(), 0);

    // Destroying a module port does not clean its connection: the
    // wire keeps its entry, which now points at a slot that is no
    // longer live.
    assert_eq!(w.ports().count(), 1);
    for stale in w.ports() {
        assert!(!stale.is_valid());
    }

    // The slot is back on the freelist and reusable.
    let replacement = hier.create_port();
    assert!(replacement.is_valid());
    assert!(!replacement.is_connected());
    assert_eq!(hier.ports().count(), 1);
}

#[test]
fn down_module_outlives_its_last_handle() {
    let hier = Module::create_hier();
    let inst;
    {
        let leaf = Module::create_leaf();
        leaf.create_port();
        inst = hier.create_instance(&leaf);
    }
    // The instance keeps the down module alive after every direct
    // handle is gone.
    let down = inst.get_down_module();
    assert!(down.is_valid());
    assert!(down.is_leaf());
    assert_eq!(down.ports().count(), 1);
}

#[test]
fn direction_tags_are_properties() {
    let leaf = Module::create_leaf();
    let p = leaf.create_port();
    assert!(!p.has_property(Symbol::DirIn.id()));

    p.add_dir_in();
    assert!(p.has_property(Symbol::DirIn.id()));
    p.add_dir_out();
    assert!(p.has_property(Symbol::DirOut.id()));

    p.reset_dir();
    assert!(!p.has_property(Symbol::DirIn.id()));
    assert!(!p.has_property(Symbol::DirOut.id()));
    assert!(!p.has_property(Symbol::DirInout.id()));
}

#[test]
fn attributes_are_typed_and_optional() {
    let hier = Module::create_hier();
    let w = hier.create_wire();
    assert_eq!(w.get_attr(42), None);
    assert!(!w.has_attr(42));

    assert!(w.add_attr(Attr {
        id: 42,
        value: AttrValue::Int64(-7),
    }));
    assert!(!w.add_attr(Attr {
        id: 42,
        value: AttrValue::Id(3),
    }));
    assert_eq!(w.get_attr(42), Some(AttrValue::Int64(-7)));

    assert!(w.erase_attr(42));
    assert!(!w.erase_attr(42));
    assert_eq!(w.get_attr(42), None);

    let n = hier.as_node();
    assert!(n.add_attr(Attr {
        id: Symbol::Vcc.id(),
        value: AttrValue::Id(Symbol::ConstantOne.id()),
    }));
    assert_eq!(
        n.get_attr(Symbol::Vcc.id()),
        Some(AttrValue::Id(Symbol::ConstantOne.id()))
    );
}

#[test]
#[should_panic(expected = "leaf module")]
fn create_wire_on_leaf_panics() {
    Module::create_leaf().create_wire();
}

#[test]
#[should_panic(expected = "leaf module")]
fn create_instance_on_leaf_panics() {
    let leaf = Module::create_leaf();
    let other = Module::create_leaf();
    leaf.create_instance(&other);
}

#[test]
#[should_panic(expected = "already connected")]
fn double_connect_panics() {
    let hier = Module::create_hier();
    let p = hier.create_port();
    let w1 = hier.create_wire();
    let w2 = hier.create_wire();
    p.connect(&w1);
    p.connect(&w2);
}

#[test]
#[should_panic(expected = "not connected")]
fn disconnect_unconnected_panics() {
    let hier = Module::create_hier();
    let p = hier.create_port();
    p.disconnect();
}

#[test]
#[should_panic(expected = "different modules")]
fn cross_module_connect_panics() {
    let a = Module::create_hier();
    let b = Module::create_hier();
    let p = a.create_port();
    let w = b.create_wire();
    p.connect(&w);
}

#[test]
#[should_panic(expected = "does not instantiate")]
fn up_port_of_unrelated_instance_panics() {
    let hier = Module::create_hier();
    let leaf_a = Module::create_leaf();
    let leaf_b = Module::create_leaf();
    let inst_b = hier.create_instance(&leaf_b);
    let p = leaf_a.create_port();
    p.get_up_port(&inst_b);
}
