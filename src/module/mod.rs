// SPDX-License-Identifier: Apache-2.0

use std::cell::RefCell;
use std::rc::Rc;

use crate::iter::{InstanceIter, ModulePortIter, NodeIter, WireIter};
use crate::{Attr, AttrValue, Id, Node};

mod core;
pub(crate) use self::core::ModuleCore;

mod create;

/// A module definition: either a leaf or a hierarchical container of
/// instances and wires.
///
/// `Module` is a by-value shared handle. Cloning it is cheap, and a
/// module stays alive while any handle or any instance referencing it
/// as its down module exists; the storage is reclaimed when the last
/// one drops.
#[derive(Clone)]
pub struct Module {
    pub(crate) core: Rc<RefCell<ModuleCore>>,
}

impl Module {
    /// Creates a hierarchical module, with its interface pre-allocated
    /// at node index 0.
    pub fn create_hier() -> Module {
        Module {
            core: Rc::new(RefCell::new(ModuleCore::new(false))),
        }
    }

    /// Creates a leaf module. Leaves have ports but never wires or
    /// instances.
    pub fn create_leaf() -> Module {
        Module {
            core: Rc::new(RefCell::new(ModuleCore::new(true))),
        }
    }

    pub fn is_leaf(&self) -> bool {
        self.core.borrow().leaf
    }

    pub fn is_hier(&self) -> bool {
        !self.is_leaf()
    }

    /// The module's own interface node (node index 0).
    pub fn as_node(&self) -> Node {
        Node {
            core: Rc::downgrade(&self.core),
            index: 0,
        }
    }

    pub fn is_valid(&self) -> bool {
        self.as_node().is_valid()
    }

    /// Ports of the module interface, in slot order.
    pub fn ports(&self) -> ModulePortIter {
        ModulePortIter::new(self.as_node().ports())
    }

    /// Live wires, in slot order.
    pub fn wires(&self) -> WireIter {
        WireIter::new(&self.core)
    }

    /// Live nodes, interface node included, in slot order.
    pub fn nodes(&self) -> NodeIter {
        NodeIter::new(&self.core)
    }

    /// Live instance nodes, in slot order.
    pub fn instances(&self) -> InstanceIter {
        InstanceIter::new(NodeIter::new(&self.core))
    }

    pub fn has_name(&self, id: Id) -> bool {
        self.as_node().has_name(id)
    }

    pub fn has_property(&self, id: Id) -> bool {
        self.as_node().has_property(id)
    }

    pub fn add_name(&self, id: Id) -> bool {
        self.as_node().add_name(id)
    }

    pub fn add_property(&self, id: Id) -> bool {
        self.as_node().add_property(id)
    }

    pub fn erase_name(&self, id: Id) -> bool {
        self.as_node().erase_name(id)
    }

    pub fn erase_property(&self, id: Id) -> bool {
        self.as_node().erase_property(id)
    }

    pub fn names(&self) -> Vec<Id> {
        self.as_node().names()
    }

    pub fn properties(&self) -> Vec<Id> {
        self.as_node().properties()
    }

    pub fn has_attr(&self, id: Id) -> bool {
        self.as_node().has_attr(id)
    }

    pub fn add_attr(&self, attr: Attr) -> bool {
        self.as_node().add_attr(attr)
    }

    pub fn erase_attr(&self, id: Id) -> bool {
        self.as_node().erase_attr(id)
    }

    pub fn get_attr(&self, id: Id) -> Option<AttrValue> {
        self.as_node().get_attr(id)
    }
}

impl PartialEq for Module {
    fn eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.core, &other.core)
    }
}

impl Eq for Module {}

impl std::fmt::Debug for Module {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Module")
            .field("ptr", &Rc::as_ptr(&self.core))
            .field("leaf", &self.is_leaf())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use std::rc::Rc;

    use crate::Module;

    #[test]
    fn storage_is_reclaimed_with_the_last_reference() {
        let hier = Module::create_hier();
        let leaf = Module::create_leaf();
        let observer = Rc::downgrade(&leaf.core);
        let inst = hier.create_instance(&leaf);

        // The instance alone keeps the leaf alive.
        drop(leaf);
        assert!(observer.upgrade().is_some());

        inst.destroy();
        assert!(observer.upgrade().is_none());
    }

    #[test]
    fn parent_drop_releases_children() {
        let leaf = Module::create_leaf();
        let observer = Rc::downgrade(&leaf.core);
        {
            let hier = Module::create_hier();
            hier.create_instance(&leaf);
            drop(leaf);
            assert!(observer.upgrade().is_some());
        }
        assert!(observer.upgrade().is_none());
    }

    #[test]
    fn shared_child_survives_either_parent() {
        let shared = Module::create_leaf();
        let observer = Rc::downgrade(&shared.core);
        let a = Module::create_hier();
        let b = Module::create_hier();
        a.create_instance(&shared);
        b.create_instance(&shared);
        drop(shared);

        drop(a);
        assert!(observer.upgrade().is_some());
        drop(b);
        assert!(observer.upgrade().is_none());
    }
}
