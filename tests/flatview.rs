// SPDX-License-Identifier: Apache-2.0

use rstest::rstest;

use netloom::*;

/// Chain of hierarchical modules, each holding two live instances of
/// the next one. Two extra instances are created and destroyed per
/// level so the node pools contain holes.
fn build_chain(depth: usize, wires_per_level: usize, ports_per_level: usize) -> Vec<Module> {
    let mut mods = vec![Module::create_hier()];
    for _ in 0..depth {
        let next = Module::create_hier();
        let d1 = mods.last().unwrap().create_instance(&next);
        mods.last().unwrap().create_instance(&next);
        let d2 = mods.last().unwrap().create_instance(&next);
        mods.last().unwrap().create_instance(&next);
        d1.destroy();
        d2.destroy();
        for _ in 0..wires_per_level {
            next.create_wire();
        }
        for _ in 0..ports_per_level {
            next.create_port();
        }
        mods.push(next);
    }
    mods
}

#[test]
fn huge_chain_is_indexed_without_materialisation() {
    let _ = env_logger::builder().is_test(true).try_init();

    // 2^59 flat leaf instantiations; the view must stay proportional
    // to the 60 hierarchical modules.
    let depth = 59;
    let mods = build_chain(depth, 10, 5);

    let view = FlatView::new(&mods[0]).unwrap();
    view.selfcheck();

    for (i, module) in mods.iter().enumerate() {
        assert_eq!(view.get_num_flat_instantiations(module), 1u64 << i);
    }
    assert_eq!(view.get_num_flat_modules(), (1u64 << 60) - 1);
    assert_eq!(view.get_num_flat_wires(), 10 * ((1u64 << 60) - 2));
    assert_eq!(view.get_num_flat_ports(), 5 * ((1u64 << 60) - 2));

    let top = view.get_top();
    assert!(top.is_top());
    assert_eq!(top.get_index(), 0);
    assert!(top.get_object() == mods[0]);

    let mut i = 0u64;
    for inst in top.instances() {
        let down = inst.get_down_module();
        assert!(inst.get_parent_module() == top);
        assert!(!down.is_top());
        assert!(down.get_up_instance() == inst);
        assert_eq!(inst.get_index(), i + 1);
        let mut j = 0u64;
        for down_inst in down.instances() {
            assert!(down_inst.get_down_module().get_up_instance() == down_inst);
            assert!(down_inst.get_parent_module() == down);
            assert_eq!(down_inst.get_index(), 2 * j + i + 3);
            j += 1;
        }
        assert_eq!(j, 2);
        i += 1;
    }
    assert_eq!(i, 2);
}

#[test]
fn decode_then_encode_is_identity_on_samples() {
    let mods = build_chain(59, 10, 5);
    let view = FlatView::new(&mods[0]).unwrap();

    let num_modules = view.get_num_flat_modules();
    for index in [0, 1, 2, 1000, 1 << 40, num_modules - 1] {
        let flat = view.get_flat_module_by_index(index);
        assert!(flat.get_object().is_valid());
        assert_eq!(flat.get_index(), index);
        if index != 0 {
            assert_eq!(view.get_flat_instance_by_index(index).get_index(), index);
        }
    }
    let num_wires = view.get_num_flat_wires();
    for index in [0, 1, 12345, (1 << 50) + 17, num_wires - 1] {
        let wire = view.get_flat_wire_by_index(index);
        assert!(wire.get_object().is_valid());
        assert_eq!(wire.get_index(), index);
    }
    let num_ports = view.get_num_flat_ports();
    for index in [0, 1, 54321, (1 << 50) + 23, num_ports - 1] {
        let port = view.get_flat_module_port_by_index(index);
        assert!(port.get_object().is_valid());
        assert_eq!(port.get_index(), index);
        if !port.is_top_port() {
            assert_eq!(port.get_up_port().get_index(), index);
            assert!(port.get_up_port().get_down_port() == port);
        }
    }
}

#[test]
fn up_navigation_reaches_the_top() {
    let depth = 59;
    let mods = build_chain(depth, 0, 0);
    let view = FlatView::new(&mods[0]).unwrap();

    // Deepest replica of the deepest module, walked back to the top
    // one level at a time.
    let mut module = view.get_flat_module_by_index(view.get_num_flat_modules() - 1);
    let mut steps = 0;
    while !module.is_top() {
        let up = module.get_up_instance();
        assert!(up.get_down_module() == module);
        module = up.get_parent_module();
        steps += 1;
    }
    assert_eq!(steps, depth);
}

#[rstest]
#[case(1)]
#[case(4)]
#[case(12)]
fn chain_flat_sizes_follow_the_recurrence(#[case] depth: usize) {
    let mods = build_chain(depth, 3, 2);
    let view = FlatView::new(&mods[0]).unwrap();
    view.selfcheck();

    // Every level doubles: two live parent instances per module. The
    // flat size of a module must equal the flat sizes of its parents
    // summed over their instances of it.
    for (i, module) in mods.iter().enumerate() {
        let expected: u64 = if i == 0 {
            1
        } else {
            mods.iter()
                .take(i)
                .map(|parent| {
                    let uses = parent
                        .instances()
                        .filter(|inst| inst.get_down_module() == *module)
                        .count() as u64;
                    uses * view.get_num_flat_instantiations(parent)
                })
                .sum()
        };
        assert_eq!(view.get_num_flat_instantiations(module), expected);
        assert_eq!(view.get_num_flat_instantiations(module), 1u64 << i);

        // The node- and wire-keyed counts resolve through the holding
        // module: an instance node counts with its parent, not with
        // the module it instantiates.
        assert_eq!(
            view.get_num_flat_node_instantiations(&module.as_node()),
            1u64 << i
        );
        if let Some(inst) = module.instances().next() {
            assert_eq!(
                view.get_num_flat_node_instantiations(inst.as_node()),
                1u64 << i
            );
        }
        if let Some(wire) = module.wires().next() {
            assert_eq!(view.get_num_flat_wire_instantiations(&wire), 1u64 << i);
        }
    }
}

#[test]
fn shared_module_diamond() {
    let top = Module::create_hier();
    let left = Module::create_hier();
    let right = Module::create_hier();
    let bottom = Module::create_leaf();
    bottom.create_port();
    top.create_instance(&left);
    top.create_instance(&right);
    left.create_instance(&bottom);
    right.create_instance(&bottom);

    let view = FlatView::new(&top).unwrap();
    view.selfcheck();
    assert_eq!(view.get_num_flat_instantiations(&top), 1);
    assert_eq!(view.get_num_flat_instantiations(&left), 1);
    assert_eq!(view.get_num_flat_instantiations(&right), 1);
    assert_eq!(view.get_num_flat_instantiations(&bottom), 2);
    assert_eq!(view.get_num_flat_modules(), 5);
    assert_eq!(view.get_num_flat_ports(), 2);

    // An instance of the doubly-instantiated leaf still counts with
    // its parent module.
    let left_inst = left.instances().next().unwrap();
    assert!(left_inst.get_down_module() == bottom);
    assert_eq!(view.get_num_flat_node_instantiations(left_inst.as_node()), 1);

    // The two flat instantiations of the shared leaf sit in distinct
    // parents.
    let first = view.get_flat_module_by_index(3);
    let second = view.get_flat_module_by_index(4);
    assert!(first.get_object() == bottom && second.get_object() == bottom);
    let p1 = first.get_up_instance().get_parent_module();
    let p2 = second.get_up_instance().get_parent_module();
    assert!(p1 != p2);
}

#[test]
fn cycle_is_rejected() {
    let a = Module::create_hier();
    let b = Module::create_hier();
    a.create_instance(&b);
    b.create_instance(&a);
    assert!(matches!(FlatView::new(&a), Err(Error::HierarchyCycle)));
}

#[test]
fn self_instantiation_is_rejected() {
    let a = Module::create_hier();
    a.create_instance(&a);
    assert!(matches!(FlatView::new(&a), Err(Error::HierarchyCycle)));
}

#[test]
fn flat_attribute_reads_delegate_to_objects() {
    let top = Module::create_hier();
    let leaf = Module::create_leaf();
    let port = leaf.create_port();
    top.create_instance(&leaf);
    let wire = top.create_wire();
    wire.add_name(17);
    port.add_property(Symbol::Vcc.id());

    let view = FlatView::new(&top).unwrap();
    let flat_wire = view.get_flat_wire_by_index(0);
    assert!(flat_wire.has_name(17));
    assert_eq!(flat_wire.names(), vec![17]);

    let flat_port = view.get_flat_module_port_by_index(0);
    assert!(flat_port.has_property(Symbol::Vcc.id()));
    assert!(!flat_port.is_top_port());
}
