// SPDX-License-Identifier: Apache-2.0

//! The mutation protocol: symmetric link maintenance between port
//! slots and wire cross-reference lists, and the destroy operations
//! built on top of it.

use std::rc::Rc;

use crate::xref::{EMPTY, Xref};
use crate::{Instance, ModulePort, Node, Port, Symbol, Wire};

impl Port {
    /// Connects this port to `wire`. The port must be disconnected and
    /// the wire must live in the same module.
    ///
    /// On an instance node whose reference table is still shorter than
    /// the down module's interface, the table grows to cover this port
    /// index.
    pub fn connect(&self, wire: &Wire) {
        assert!(
            !self.is_connected(),
            "port {} of node {} is already connected",
            self.port,
            self.node
        );
        let rc = self.upgrade();
        assert!(
            Rc::ptr_eq(&rc, &wire.upgrade()),
            "port and wire belong to different modules"
        );
        wire.assert_valid();

        let mut core = rc.borrow_mut();
        let wire_slot = core.wires[wire.index].refs.push();

        let refs = &mut core.nodes[self.node].refs;
        if refs.len() <= self.port as usize {
            debug_assert!(self.node != 0);
            refs.resize(self.port as usize + 1, Xref::invalid());
        }
        refs[self.port as usize] = Xref {
            obj: wire.index,
            index: wire_slot,
        };
        core.wires[wire.index].refs.set(
            wire_slot,
            Xref {
                obj: self.node,
                index: self.port,
            },
        );
    }

    /// Severs the link to the connected wire. The port must be
    /// connected.
    pub fn disconnect(&self) {
        assert!(
            self.is_connected(),
            "port {} of node {} is not connected",
            self.port,
            self.node
        );
        let rc = self.upgrade();
        let mut core = rc.borrow_mut();
        let xref = core.nodes[self.node].refs[self.port as usize];
        core.wires[xref.obj].refs.erase(xref.index);
        core.nodes[self.node].refs[self.port as usize] = Xref::disconnected();
    }
}

impl Node {
    /// Disconnects every connected port of this node.
    pub fn disconnect_all(&self) {
        let rc = self.upgrade();
        let mut core = rc.borrow_mut();
        assert!(
            core.nodes.is_valid(self.index),
            "node {} is not live in its parent module",
            self.index
        );
        for slot in 0..core.nodes[self.index].refs.len() {
            let xref = core.nodes[self.index].refs[slot];
            if xref.is_valid() && xref.is_connected() {
                core.wires[xref.obj].refs.erase(xref.index);
                core.nodes[self.index].refs[slot] = Xref::disconnected();
            }
        }
    }
}

impl Wire {
    /// Disconnects every port connected to this wire.
    pub fn disconnect_all(&self) {
        let rc = self.upgrade();
        let mut core = rc.borrow_mut();
        assert!(
            core.wires.is_valid(self.index),
            "wire {} is not live in its parent module",
            self.index
        );
        for slot in 0..core.wires[self.index].refs.len() {
            let xref = core.wires[self.index].refs.get(slot);
            if xref.is_valid() && xref.is_connected() {
                core.nodes[xref.obj].refs[xref.index as usize] = Xref::disconnected();
                core.wires[self.index].refs.erase(slot);
            }
        }
    }

    /// Disconnects all ports and returns the wire slot to the pool.
    /// The slot index may be reused by a later `create_wire`.
    pub fn destroy(&self) {
        self.disconnect_all();
        self.upgrade().borrow_mut().wires.deallocate(self.index);
    }
}

impl Instance {
    /// Disconnects all ports and returns the node slot to the pool,
    /// releasing the hold on the down module.
    pub fn destroy(&self) {
        self.0.disconnect_all();
        self.0.upgrade().borrow_mut().nodes.deallocate(self.0.index);
    }
}

impl ModulePort {
    /// Destroys the canonical port slot and chains it into the
    /// module's port freelist for reuse by a later `create_port`.
    ///
    /// Connections are not cleaned up: a wire connected to this port
    /// keeps its cross-reference entry, which then points at a slot
    /// that is no longer live.
    pub fn destroy(&self) {
        self.0.assert_valid();
        let rc = self.0.upgrade();
        let mut core = rc.borrow_mut();
        let free_head = core.first_free_port;
        core.nodes[0].refs[self.0.port as usize] = Xref {
            obj: EMPTY,
            index: free_head,
        };
        core.first_free_port = self.0.port;
    }

    /// Clears the direction tags of this port.
    pub fn reset_dir(&self) {
        self.0.erase_property(Symbol::DirIn.id());
        self.0.erase_property(Symbol::DirOut.id());
        self.0.erase_property(Symbol::DirInout.id());
    }

    /// Tags this port as an input. Presence only; no semantics are
    /// attached.
    pub fn add_dir_in(&self) {
        self.0.add_property(Symbol::DirIn.id());
    }

    /// Tags this port as an output. Presence only; no semantics are
    /// attached.
    pub fn add_dir_out(&self) {
        self.0.add_property(Symbol::DirOut.id());
    }
}
