// SPDX-License-Identifier: Apache-2.0

use std::cell::RefCell;
use std::rc::{Rc, Weak};

use crate::iter::WirePortIter;
use crate::{Attr, AttrValue, Id, Index, Module, ModuleCore};

/// A slot in a module's wire pool: an in-module net with a
/// cross-reference list of connected ports.
#[derive(Clone)]
pub struct Wire {
    pub(crate) core: Weak<RefCell<ModuleCore>>,
    pub(crate) index: Index,
}

impl Wire {
    pub(crate) fn upgrade(&self) -> Rc<RefCell<ModuleCore>> {
        self.core
            .upgrade()
            .expect("wire handle outlived its parent module")
    }

    pub fn get_parent_module(&self) -> Module {
        Module {
            core: self.upgrade(),
        }
    }

    pub fn is_valid(&self) -> bool {
        match self.core.upgrade() {
            Some(core) => core.borrow().wires.is_valid(self.index),
            None => false,
        }
    }

    /// Ports currently connected to this wire, in cross-reference slot
    /// order.
    pub fn ports(&self) -> WirePortIter {
        WirePortIter::new(self)
    }

    pub(crate) fn assert_valid(&self) {
        assert!(
            self.is_valid(),
            "wire {} is not live in its parent module",
            self.index
        );
    }

    pub fn has_name(&self, id: Id) -> bool {
        self.assert_valid();
        self.upgrade().borrow().wires[self.index].data.has_name(id)
    }

    pub fn has_property(&self, id: Id) -> bool {
        self.assert_valid();
        self.upgrade().borrow().wires[self.index].data.has_prop(id)
    }

    pub fn add_name(&self, id: Id) -> bool {
        self.assert_valid();
        self.upgrade().borrow_mut().wires[self.index]
            .data
            .add_name(id)
    }

    pub fn add_property(&self, id: Id) -> bool {
        self.assert_valid();
        self.upgrade().borrow_mut().wires[self.index]
            .data
            .add_prop(id)
    }

    pub fn erase_name(&self, id: Id) -> bool {
        self.assert_valid();
        self.upgrade().borrow_mut().wires[self.index]
            .data
            .erase_name(id)
    }

    pub fn erase_property(&self, id: Id) -> bool {
        self.assert_valid();
        self.upgrade().borrow_mut().wires[self.index]
            .data
            .erase_prop(id)
    }

    pub fn names(&self) -> Vec<Id> {
        self.assert_valid();
        self.upgrade().borrow().wires[self.index]
            .data
            .names()
            .to_vec()
    }

    pub fn properties(&self) -> Vec<Id> {
        self.assert_valid();
        self.upgrade().borrow().wires[self.index]
            .data
            .props()
            .to_vec()
    }

    pub fn has_attr(&self, id: Id) -> bool {
        self.assert_valid();
        self.upgrade().borrow().wires[self.index].data.has_attr(id)
    }

    pub fn add_attr(&self, attr: Attr) -> bool {
        self.assert_valid();
        self.upgrade().borrow_mut().wires[self.index]
            .data
            .add_attr(attr)
    }

    pub fn erase_attr(&self, id: Id) -> bool {
        self.assert_valid();
        self.upgrade().borrow_mut().wires[self.index]
            .data
            .erase_attr(id)
    }

    pub fn get_attr(&self, id: Id) -> Option<AttrValue> {
        self.assert_valid();
        self.upgrade().borrow().wires[self.index].data.get_attr(id)
    }
}

impl PartialEq for Wire {
    fn eq(&self, other: &Self) -> bool {
        match (self.core.upgrade(), other.core.upgrade()) {
            (Some(a), Some(b)) => Rc::ptr_eq(&a, &b) && self.index == other.index,
            _ => false,
        }
    }
}

impl Eq for Wire {}

impl std::fmt::Debug for Wire {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Wire")
            .field("module", &self.core.as_ptr())
            .field("index", &self.index)
            .finish()
    }
}
