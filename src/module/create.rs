// SPDX-License-Identifier: Apache-2.0

use std::rc::Rc;

use crate::xref::{EMPTY, Xref};
use crate::{Index, Instance, Module, ModulePort, Node, Port, Wire};

impl Module {
    /// Allocates a new port on the module interface, reusing a
    /// previously destroyed slot when one is available.
    pub fn create_port(&self) -> ModulePort {
        let mut core = self.core.borrow_mut();
        let port = if core.first_free_port == EMPTY {
            let port = core.nodes[0].refs.len() as Index;
            core.nodes[0].refs.push(Xref::disconnected());
            port
        } else {
            let port = core.first_free_port;
            core.first_free_port = core.nodes[0].refs[port as usize].index;
            core.nodes[0].refs[port as usize] = Xref::disconnected();
            port
        };
        drop(core);
        ModulePort(Port {
            core: Rc::downgrade(&self.core),
            node: 0,
            port,
        })
    }

    /// Allocates a wire. Only hierarchical modules carry wires.
    pub fn create_wire(&self) -> Wire {
        if self.is_leaf() {
            panic!("cannot create a wire in a leaf module");
        }
        let index = self.core.borrow_mut().wires.allocate();
        Wire {
            core: Rc::downgrade(&self.core),
            index,
        }
    }

    /// Allocates an instance node referencing `instantiated` as its
    /// down module. The down module stays alive at least as long as
    /// the instance does.
    pub fn create_instance(&self, instantiated: &Module) -> Instance {
        if self.is_leaf() {
            panic!("cannot create an instance in a leaf module");
        }
        let mut core = self.core.borrow_mut();
        let index = core.nodes.allocate();
        core.nodes[index].target = Some(instantiated.core.clone());
        drop(core);
        Instance(Node {
            core: Rc::downgrade(&self.core),
            index,
        })
    }
}
