// SPDX-License-Identifier: Apache-2.0

//! Lazy, validity-filtered traversal over the stable index spaces.
//!
//! Iterators capture their end bound at creation and re-check slot
//! validity on every step, so a slot destroyed mid-iteration is
//! skipped. No stability is promised across mutation of the module;
//! iterate first, mutate after.

use std::cell::RefCell;
use std::rc::{Rc, Weak};

use crate::{Index, Instance, InstancePort, ModuleCore, ModulePort, Node, Port, Wire};

/// Live wires of a module, in slot order.
pub struct WireIter {
    core: Weak<RefCell<ModuleCore>>,
    cursor: Index,
    end: Index,
}

impl WireIter {
    pub(crate) fn new(core: &Rc<RefCell<ModuleCore>>) -> Self {
        WireIter {
            core: Rc::downgrade(core),
            cursor: 0,
            end: core.borrow().wires.len(),
        }
    }
}

impl Iterator for WireIter {
    type Item = Wire;

    fn next(&mut self) -> Option<Wire> {
        let rc = self.core.upgrade()?;
        let core = rc.borrow();
        while self.cursor < self.end {
            let index = self.cursor;
            self.cursor += 1;
            if core.wires.is_valid(index) {
                return Some(Wire {
                    core: self.core.clone(),
                    index,
                });
            }
        }
        None
    }
}

/// Live nodes of a module, interface node included, in slot order.
pub struct NodeIter {
    core: Weak<RefCell<ModuleCore>>,
    cursor: Index,
    end: Index,
}

impl NodeIter {
    pub(crate) fn new(core: &Rc<RefCell<ModuleCore>>) -> Self {
        NodeIter {
            core: Rc::downgrade(core),
            cursor: 0,
            end: core.borrow().nodes.len(),
        }
    }
}

impl Iterator for NodeIter {
    type Item = Node;

    fn next(&mut self) -> Option<Node> {
        let rc = self.core.upgrade()?;
        let core = rc.borrow();
        while self.cursor < self.end {
            let index = self.cursor;
            self.cursor += 1;
            if core.nodes.is_valid(index) {
                return Some(Node {
                    core: self.core.clone(),
                    index,
                });
            }
        }
        None
    }
}

/// Live instances of a module, in slot order.
pub struct InstanceIter(NodeIter);

impl InstanceIter {
    pub(crate) fn new(nodes: NodeIter) -> Self {
        InstanceIter(nodes)
    }
}

impl Iterator for InstanceIter {
    type Item = Instance;

    fn next(&mut self) -> Option<Instance> {
        loop {
            let node = self.0.next()?;
            if node.is_instance() {
                return Some(Instance(node));
            }
        }
    }
}

/// Live ports of one node, in port-index order.
pub struct NodePortIter {
    core: Weak<RefCell<ModuleCore>>,
    node: Index,
    cursor: Index,
    end: Index,
}

impl NodePortIter {
    pub(crate) fn new(node: &Node) -> Self {
        node.assert_valid();
        let rc = node.upgrade();
        let end = {
            let core = rc.borrow();
            if node.index == 0 {
                core.interface_len()
            } else {
                let target = core.nodes[node.index]
                    .target
                    .clone()
                    .expect("instance node carries a down module");
                if Rc::ptr_eq(&target, &rc) {
                    core.interface_len()
                } else {
                    target.borrow().interface_len()
                }
            }
        };
        NodePortIter {
            core: node.core.clone(),
            node: node.index,
            cursor: 0,
            end,
        }
    }
}

impl Iterator for NodePortIter {
    type Item = Port;

    fn next(&mut self) -> Option<Port> {
        while self.cursor < self.end {
            let port = Port {
                core: self.core.clone(),
                node: self.node,
                port: self.cursor,
            };
            self.cursor += 1;
            if port.is_valid() {
                return Some(port);
            }
        }
        None
    }
}

/// Live ports of a module interface, in port-index order.
pub struct ModulePortIter(NodePortIter);

impl ModulePortIter {
    pub(crate) fn new(ports: NodePortIter) -> Self {
        ModulePortIter(ports)
    }
}

impl Iterator for ModulePortIter {
    type Item = ModulePort;

    fn next(&mut self) -> Option<ModulePort> {
        self.0.next().map(ModulePort)
    }
}

/// Live ports of an instance, in port-index order.
pub struct InstancePortIter(NodePortIter);

impl InstancePortIter {
    pub(crate) fn new(ports: NodePortIter) -> Self {
        InstancePortIter(ports)
    }
}

impl Iterator for InstancePortIter {
    type Item = InstancePort;

    fn next(&mut self) -> Option<InstancePort> {
        self.0.next().map(InstancePort)
    }
}

/// Ports connected to one wire, in cross-reference slot order.
pub struct WirePortIter {
    core: Weak<RefCell<ModuleCore>>,
    wire: Index,
    cursor: Index,
    end: Index,
}

impl WirePortIter {
    pub(crate) fn new(wire: &Wire) -> Self {
        wire.assert_valid();
        let rc = wire.upgrade();
        let end = rc.borrow().wires[wire.index].refs.len();
        WirePortIter {
            core: wire.core.clone(),
            wire: wire.index,
            cursor: 0,
            end,
        }
    }
}

impl Iterator for WirePortIter {
    type Item = Port;

    fn next(&mut self) -> Option<Port> {
        let rc = self.core.upgrade()?;
        let core = rc.borrow();
        while self.cursor < self.end {
            let slot = self.cursor;
            self.cursor += 1;
            let xref = core.wires[self.wire].refs.get(slot);
            if xref.is_valid() && xref.is_connected() {
                return Some(Port {
                    core: self.core.clone(),
                    node: xref.obj,
                    port: xref.index,
                });
            }
        }
        None
    }
}
