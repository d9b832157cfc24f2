// SPDX-License-Identifier: Apache-2.0

use std::cell::RefCell;
use std::ops::Deref;
use std::rc::{Rc, Weak};

use crate::{Attr, AttrValue, Id, Index, Instance, Module, ModuleCore, Node, Wire};

mod connect;

/// One connection endpoint, addressed by `(module, node index, port
/// index)`.
///
/// Ports at node index 0 belong to the module interface and own the
/// canonical port slot; ports on instance nodes mirror the down
/// module's interface port with the same port index.
#[derive(Clone)]
pub struct Port {
    pub(crate) core: Weak<RefCell<ModuleCore>>,
    pub(crate) node: Index,
    pub(crate) port: Index,
}

impl Port {
    pub(crate) fn upgrade(&self) -> Rc<RefCell<ModuleCore>> {
        self.core
            .upgrade()
            .expect("port handle outlived its parent module")
    }

    pub fn is_module_port(&self) -> bool {
        self.node == 0
    }

    pub fn is_instance_port(&self) -> bool {
        self.node != 0
    }

    pub fn get_node(&self) -> Node {
        Node {
            core: self.core.clone(),
            index: self.node,
        }
    }

    pub fn get_parent_module(&self) -> Module {
        Module {
            core: self.upgrade(),
        }
    }

    /// A port is live while its node is live and the canonical
    /// interface slot of the down module has not been destroyed.
    pub fn is_valid(&self) -> bool {
        let Some(rc) = self.core.upgrade() else {
            return false;
        };
        let core = rc.borrow();
        if !core.nodes.is_valid(self.node) {
            return false;
        }
        if self.node == 0 {
            core.module_port_is_valid(self.port)
        } else {
            let target = core.nodes[self.node]
                .target
                .clone()
                .expect("instance node carries a down module");
            if Rc::ptr_eq(&target, &rc) {
                core.module_port_is_valid(self.port)
            } else {
                target.borrow().module_port_is_valid(self.port)
            }
        }
    }

    pub(crate) fn assert_valid(&self) {
        assert!(
            self.is_valid(),
            "port {} of node {} is not live",
            self.port,
            self.node
        );
    }

    /// Whether this port is connected to a wire. Instance-side
    /// reference tables may be shorter than the interface table, in
    /// which case the missing trailing entries read as disconnected.
    pub fn is_connected(&self) -> bool {
        self.assert_valid();
        let rc = self.upgrade();
        let core = rc.borrow();
        match core.nodes[self.node].refs.get(self.port as usize) {
            Some(xref) => xref.is_valid() && xref.is_connected(),
            None => false,
        }
    }

    /// The wire this port is connected to. Panics when disconnected.
    pub fn get_wire(&self) -> Wire {
        assert!(
            self.is_connected(),
            "port {} of node {} is not connected",
            self.port,
            self.node
        );
        let rc = self.upgrade();
        let core = rc.borrow();
        let xref = core.nodes[self.node].refs[self.port as usize];
        Wire {
            core: self.core.clone(),
            index: xref.obj,
        }
    }

    pub fn has_name(&self, id: Id) -> bool {
        self.assert_valid();
        let rc = self.upgrade();
        let core = rc.borrow();
        match core.nodes[self.node].ref_data.get(self.port as usize) {
            Some(data) => data.has_name(id),
            None => false,
        }
    }

    pub fn has_property(&self, id: Id) -> bool {
        self.assert_valid();
        let rc = self.upgrade();
        let core = rc.borrow();
        match core.nodes[self.node].ref_data.get(self.port as usize) {
            Some(data) => data.has_prop(id),
            None => false,
        }
    }

    pub fn add_name(&self, id: Id) -> bool {
        self.assert_valid();
        let rc = self.upgrade();
        let mut core = rc.borrow_mut();
        self.grown_data(&mut core).add_name(id)
    }

    pub fn add_property(&self, id: Id) -> bool {
        self.assert_valid();
        let rc = self.upgrade();
        let mut core = rc.borrow_mut();
        self.grown_data(&mut core).add_prop(id)
    }

    pub fn erase_name(&self, id: Id) -> bool {
        self.assert_valid();
        let rc = self.upgrade();
        let mut core = rc.borrow_mut();
        match core.nodes[self.node].ref_data.get_mut(self.port as usize) {
            Some(data) => data.erase_name(id),
            None => false,
        }
    }

    pub fn erase_property(&self, id: Id) -> bool {
        self.assert_valid();
        let rc = self.upgrade();
        let mut core = rc.borrow_mut();
        match core.nodes[self.node].ref_data.get_mut(self.port as usize) {
            Some(data) => data.erase_prop(id),
            None => false,
        }
    }

    pub fn names(&self) -> Vec<Id> {
        self.assert_valid();
        let rc = self.upgrade();
        let core = rc.borrow();
        match core.nodes[self.node].ref_data.get(self.port as usize) {
            Some(data) => data.names().to_vec(),
            None => Vec::new(),
        }
    }

    pub fn properties(&self) -> Vec<Id> {
        self.assert_valid();
        let rc = self.upgrade();
        let core = rc.borrow();
        match core.nodes[self.node].ref_data.get(self.port as usize) {
            Some(data) => data.props().to_vec(),
            None => Vec::new(),
        }
    }

    pub fn has_attr(&self, id: Id) -> bool {
        self.assert_valid();
        let rc = self.upgrade();
        let core = rc.borrow();
        match core.nodes[self.node].ref_data.get(self.port as usize) {
            Some(data) => data.has_attr(id),
            None => false,
        }
    }

    pub fn add_attr(&self, attr: Attr) -> bool {
        self.assert_valid();
        let rc = self.upgrade();
        let mut core = rc.borrow_mut();
        self.grown_data(&mut core).add_attr(attr)
    }

    pub fn erase_attr(&self, id: Id) -> bool {
        self.assert_valid();
        let rc = self.upgrade();
        let mut core = rc.borrow_mut();
        match core.nodes[self.node].ref_data.get_mut(self.port as usize) {
            Some(data) => data.erase_attr(id),
            None => false,
        }
    }

    pub fn get_attr(&self, id: Id) -> Option<AttrValue> {
        self.assert_valid();
        let rc = self.upgrade();
        let core = rc.borrow();
        core.nodes[self.node]
            .ref_data
            .get(self.port as usize)
            .and_then(|data| data.get_attr(id))
    }

    fn grown_data<'a>(&self, core: &'a mut ModuleCore) -> &'a mut crate::AttrStore {
        let ref_data = &mut core.nodes[self.node].ref_data;
        if ref_data.len() <= self.port as usize {
            ref_data.resize_with(self.port as usize + 1, Default::default);
        }
        &mut ref_data[self.port as usize]
    }
}

impl PartialEq for Port {
    fn eq(&self, other: &Self) -> bool {
        match (self.core.upgrade(), other.core.upgrade()) {
            (Some(a), Some(b)) => {
                Rc::ptr_eq(&a, &b) && self.node == other.node && self.port == other.port
            }
            _ => false,
        }
    }
}

impl Eq for Port {}

impl std::fmt::Debug for Port {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Port")
            .field("module", &self.core.as_ptr())
            .field("node", &self.node)
            .field("port", &self.port)
            .finish()
    }
}

/// A canonical port slot on a module interface.
#[derive(Clone, PartialEq, Eq, Debug)]
pub struct ModulePort(pub(crate) Port);

impl ModulePort {
    /// Wraps a port known to sit on the module interface.
    pub fn from_port(port: Port) -> ModulePort {
        assert!(port.is_module_port(), "port sits on an instance node");
        ModulePort(port)
    }

    pub fn as_port(&self) -> &Port {
        &self.0
    }

    /// The mirror of this port on one instance of its module.
    pub fn get_up_port(&self, inst: &Instance) -> InstancePort {
        self.0.assert_valid();
        let down = inst.get_down_module();
        let own = self.0.upgrade();
        assert!(
            Rc::ptr_eq(&down.core, &own),
            "instance does not instantiate the module owning port {}",
            self.0.port
        );
        InstancePort(Port {
            core: inst.0.core.clone(),
            node: inst.0.index,
            port: self.0.port,
        })
    }
}

impl Deref for ModulePort {
    type Target = Port;

    fn deref(&self) -> &Port {
        &self.0
    }
}

impl From<ModulePort> for Port {
    fn from(port: ModulePort) -> Port {
        port.0
    }
}

/// A port on an instance node, mirroring a module port of the
/// instance's down module.
#[derive(Clone, PartialEq, Eq, Debug)]
pub struct InstancePort(pub(crate) Port);

impl InstancePort {
    /// Wraps a port known to sit on an instance node.
    pub fn from_port(port: Port) -> InstancePort {
        assert!(port.is_instance_port(), "port sits on the module interface");
        InstancePort(port)
    }

    pub fn as_port(&self) -> &Port {
        &self.0
    }

    pub fn get_instance(&self) -> Instance {
        Instance(self.0.get_node())
    }

    /// The canonical module port this instance port mirrors.
    pub fn get_down_port(&self) -> ModulePort {
        self.0.assert_valid();
        let rc = self.0.upgrade();
        let target = rc.borrow().nodes[self.0.node]
            .target
            .clone()
            .expect("instance node carries a down module");
        ModulePort(Port {
            core: Rc::downgrade(&target),
            node: 0,
            port: self.0.port,
        })
    }
}

impl Deref for InstancePort {
    type Target = Port;

    fn deref(&self) -> &Port {
        &self.0
    }
}

impl From<InstancePort> for Port {
    fn from(port: InstancePort) -> Port {
        port.0
    }
}
