// SPDX-License-Identifier: Apache-2.0

use std::ops::Deref;

use crate::iter::InstancePortIter;
use crate::{Module, Node};

/// A node that instantiates another module.
///
/// Derefs to [`Node`] for the shared node surface (validity,
/// attributes, parent module).
#[derive(Clone, PartialEq, Eq, Debug)]
pub struct Instance(pub(crate) Node);

impl Instance {
    /// Wraps a node known to be an instance. Panics on the interface
    /// node.
    pub fn from_node(node: Node) -> Instance {
        assert!(
            node.is_instance(),
            "node 0 is the module interface, not an instance"
        );
        Instance(node)
    }

    pub fn as_node(&self) -> &Node {
        &self.0
    }

    /// The module this instance instantiates.
    pub fn get_down_module(&self) -> Module {
        let rc = self.0.upgrade();
        let core = rc.borrow();
        assert!(
            core.nodes.is_valid(self.0.index),
            "instance {} is not live in its parent module",
            self.0.index
        );
        Module {
            core: core.nodes[self.0.index]
                .target
                .clone()
                .expect("instance node carries a down module"),
        }
    }

    /// Ports of this instance, in port-index order of the down
    /// module's interface.
    pub fn ports(&self) -> InstancePortIter {
        InstancePortIter::new(self.0.ports())
    }
}

impl Deref for Instance {
    type Target = Node;

    fn deref(&self) -> &Node {
        &self.0
    }
}

impl From<Instance> for Node {
    fn from(instance: Instance) -> Node {
        instance.0
    }
}
