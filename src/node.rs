// SPDX-License-Identifier: Apache-2.0

use std::cell::RefCell;
use std::rc::{Rc, Weak};

use crate::iter::NodePortIter;
use crate::{Attr, AttrValue, Id, Index, Module, ModuleCore};

/// A slot in a module's node pool: the module interface at index 0, an
/// instance of another module otherwise.
///
/// Nodes are lightweight value handles. They do not keep their parent
/// module alive; using a node whose module has been dropped panics,
/// and `is_valid` reports whether the addressed slot is still live.
#[derive(Clone)]
pub struct Node {
    pub(crate) core: Weak<RefCell<ModuleCore>>,
    pub(crate) index: Index,
}

impl Node {
    pub(crate) fn upgrade(&self) -> Rc<RefCell<ModuleCore>> {
        self.core
            .upgrade()
            .expect("node handle outlived its parent module")
    }

    pub fn is_module(&self) -> bool {
        self.index == 0
    }

    pub fn is_instance(&self) -> bool {
        self.index != 0
    }

    pub fn get_parent_module(&self) -> Module {
        Module {
            core: self.upgrade(),
        }
    }

    pub fn is_valid(&self) -> bool {
        match self.core.upgrade() {
            Some(core) => core.borrow().nodes.is_valid(self.index),
            None => false,
        }
    }

    /// Ports of this node, in port-index order. For an instance the
    /// port space is defined by the down module's interface.
    pub fn ports(&self) -> NodePortIter {
        NodePortIter::new(self)
    }

    pub(crate) fn assert_valid(&self) {
        assert!(
            self.is_valid(),
            "node {} is not live in its parent module",
            self.index
        );
    }

    pub fn has_name(&self, id: Id) -> bool {
        self.assert_valid();
        self.upgrade().borrow().nodes[self.index].data.has_name(id)
    }

    pub fn has_property(&self, id: Id) -> bool {
        self.assert_valid();
        self.upgrade().borrow().nodes[self.index].data.has_prop(id)
    }

    pub fn add_name(&self, id: Id) -> bool {
        self.assert_valid();
        self.upgrade().borrow_mut().nodes[self.index]
            .data
            .add_name(id)
    }

    pub fn add_property(&self, id: Id) -> bool {
        self.assert_valid();
        self.upgrade().borrow_mut().nodes[self.index]
            .data
            .add_prop(id)
    }

    pub fn erase_name(&self, id: Id) -> bool {
        self.assert_valid();
        self.upgrade().borrow_mut().nodes[self.index]
            .data
            .erase_name(id)
    }

    pub fn erase_property(&self, id: Id) -> bool {
        self.assert_valid();
        self.upgrade().borrow_mut().nodes[self.index]
            .data
            .erase_prop(id)
    }

    pub fn names(&self) -> Vec<Id> {
        self.assert_valid();
        self.upgrade().borrow().nodes[self.index]
            .data
            .names()
            .to_vec()
    }

    pub fn properties(&self) -> Vec<Id> {
        self.assert_valid();
        self.upgrade().borrow().nodes[self.index]
            .data
            .props()
            .to_vec()
    }

    pub fn has_attr(&self, id: Id) -> bool {
        self.assert_valid();
        self.upgrade().borrow().nodes[self.index].data.has_attr(id)
    }

    pub fn add_attr(&self, attr: Attr) -> bool {
        self.assert_valid();
        self.upgrade().borrow_mut().nodes[self.index]
            .data
            .add_attr(attr)
    }

    pub fn erase_attr(&self, id: Id) -> bool {
        self.assert_valid();
        self.upgrade().borrow_mut().nodes[self.index]
            .data
            .erase_attr(id)
    }

    pub fn get_attr(&self, id: Id) -> Option<AttrValue> {
        self.assert_valid();
        self.upgrade().borrow().nodes[self.index].data.get_attr(id)
    }
}

impl PartialEq for Node {
    fn eq(&self, other: &Self) -> bool {
        match (self.core.upgrade(), other.core.upgrade()) {
            (Some(a), Some(b)) => Rc::ptr_eq(&a, &b) && self.index == other.index,
            _ => false,
        }
    }
}

impl Eq for Node {}

impl std::fmt::Debug for Node {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Node")
            .field("module", &self.core.as_ptr())
            .field("index", &self.index)
            .finish()
    }
}
