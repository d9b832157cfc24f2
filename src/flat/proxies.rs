// SPDX-License-Identifier: Apache-2.0

use std::ops::Deref;

use crate::flat::{FlatView, bisect};
use crate::{
    FlatIndex, INVALID_FLAT_INDEX, Id, Instance, InstancePort, Module, ModulePort, Node, Port, Wire,
};

/// A node of one flat instantiation: the underlying hierarchical node
/// plus the local index selecting which replica of its parent module
/// is meant.
#[derive(Clone)]
pub struct FlatNode<'v> {
    pub(crate) object: Node,
    pub(crate) local: FlatIndex,
    pub(crate) view: &'v FlatView,
}

impl<'v> FlatNode<'v> {
    pub fn get_object(&self) -> Node {
        self.object.clone()
    }

    pub fn is_module(&self) -> bool {
        self.object.is_module()
    }

    pub fn is_instance(&self) -> bool {
        self.object.is_instance()
    }

    pub fn is_valid(&self) -> bool {
        self.object.is_valid()
    }

    pub fn get_parent_module(&self) -> FlatModule<'v> {
        FlatModule(FlatNode {
            object: self.object.get_parent_module().as_node(),
            local: self.local,
            view: self.view,
        })
    }

    /// The global module index of this node: its own for a module
    /// interface, the down module's for an instance.
    pub fn get_index(&self) -> FlatIndex {
        let repr = if self.is_instance() {
            FlatInstance(self.clone()).get_down_module()
        } else {
            FlatModule(self.clone())
        };
        let mod_index = self
            .view
            .mod_index_of_core(&repr.0.object.upgrade());
        self.view.mod_end[mod_index] + repr.0.local
    }

    pub fn ports(&self) -> impl Iterator<Item = FlatPort<'v>> + use<'v> {
        let local = self.local;
        let view = self.view;
        self.object
            .ports()
            .map(move |port| FlatPort { object: port, local, view })
    }

    pub fn has_name(&self, id: Id) -> bool {
        self.object.has_name(id)
    }

    pub fn has_property(&self, id: Id) -> bool {
        self.object.has_property(id)
    }

    pub fn names(&self) -> Vec<Id> {
        self.object.names()
    }

    pub fn properties(&self) -> Vec<Id> {
        self.object.properties()
    }
}

impl PartialEq for FlatNode<'_> {
    fn eq(&self, other: &Self) -> bool {
        self.object == other.object && self.local == other.local
    }
}

impl Eq for FlatNode<'_> {}

/// One flat instantiation of a module.
#[derive(Clone, PartialEq, Eq)]
pub struct FlatModule<'v>(pub(crate) FlatNode<'v>);

impl<'v> FlatModule<'v> {
    pub fn get_object(&self) -> Module {
        self.0.object.get_parent_module()
    }

    pub fn is_leaf(&self) -> bool {
        self.get_object().is_leaf()
    }

    pub fn is_hier(&self) -> bool {
        self.get_object().is_hier()
    }

    pub fn is_top(&self) -> bool {
        *self == self.0.view.get_top()
    }

    /// The instance this flat instantiation was produced through.
    /// Panics on the top flat module, which has none.
    pub fn get_up_instance(&self) -> FlatInstance<'v> {
        let view = self.0.view;
        let mod_index = view.mod_index_of_core(&self.0.object.upgrade());
        assert!(mod_index != 0, "the top flat module has no up instance");
        let parent_info = &view.parents[mod_index];
        let interval = bisect(&parent_info.inst_end, self.0.local);
        let up = &parent_info.ups[interval];
        debug_assert!(up.offset <= self.0.local);
        FlatInstance(FlatNode {
            object: up.parent_instance.as_node().clone(),
            local: self.0.local - up.offset,
            view,
        })
    }

    pub fn instances(&self) -> impl Iterator<Item = FlatInstance<'v>> + use<'v> {
        let local = self.0.local;
        let view = self.0.view;
        self.get_object().instances().map(move |instance| {
            FlatInstance(FlatNode {
                object: instance.into(),
                local,
                view,
            })
        })
    }

    pub fn nodes(&self) -> impl Iterator<Item = FlatNode<'v>> + use<'v> {
        let local = self.0.local;
        let view = self.0.view;
        self.get_object()
            .nodes()
            .map(move |node| FlatNode { object: node, local, view })
    }

    pub fn wires(&self) -> impl Iterator<Item = FlatWire<'v>> + use<'v> {
        let local = self.0.local;
        let view = self.0.view;
        self.get_object()
            .wires()
            .map(move |wire| FlatWire { object: wire, local, view })
    }

    pub fn ports(&self) -> impl Iterator<Item = FlatModulePort<'v>> + use<'v> {
        let local = self.0.local;
        let view = self.0.view;
        self.get_object().ports().map(move |port| {
            FlatModulePort(FlatPort {
                object: port.into(),
                local,
                view,
            })
        })
    }
}

impl<'v> Deref for FlatModule<'v> {
    type Target = FlatNode<'v>;

    fn deref(&self) -> &FlatNode<'v> {
        &self.0
    }
}

/// One flat instantiation of an instance node.
#[derive(Clone, PartialEq, Eq)]
pub struct FlatInstance<'v>(pub(crate) FlatNode<'v>);

impl<'v> FlatInstance<'v> {
    pub fn get_object(&self) -> Instance {
        Instance(self.0.object.clone())
    }

    /// The flat instantiation of the down module this instance
    /// produces.
    pub fn get_down_module(&self) -> FlatModule<'v> {
        let view = self.0.view;
        let parent_index = view.mod_index_of_core(&self.0.object.upgrade());
        let offset = view.children[parent_index].down_offsets[self.0.object.index as usize];
        debug_assert_ne!(offset, INVALID_FLAT_INDEX);
        let down = self.get_object().get_down_module();
        FlatModule(FlatNode {
            object: down.as_node(),
            local: self.0.local + offset,
            view,
        })
    }

    pub fn ports(&self) -> impl Iterator<Item = FlatInstancePort<'v>> + use<'v> {
        let local = self.0.local;
        let view = self.0.view;
        self.get_object().ports().map(move |port| {
            FlatInstancePort(FlatPort {
                object: port.into(),
                local,
                view,
            })
        })
    }
}

impl<'v> Deref for FlatInstance<'v> {
    type Target = FlatNode<'v>;

    fn deref(&self) -> &FlatNode<'v> {
        &self.0
    }
}

/// One flat instantiation of a wire.
#[derive(Clone)]
pub struct FlatWire<'v> {
    pub(crate) object: Wire,
    pub(crate) local: FlatIndex,
    pub(crate) view: &'v FlatView,
}

impl<'v> FlatWire<'v> {
    pub fn get_object(&self) -> Wire {
        self.object.clone()
    }

    pub fn is_valid(&self) -> bool {
        self.object.is_valid()
    }

    pub fn get_parent_module(&self) -> FlatModule<'v> {
        FlatModule(FlatNode {
            object: self.object.get_parent_module().as_node(),
            local: self.local,
            view: self.view,
        })
    }

    /// The global wire index of this flat wire.
    pub fn get_index(&self) -> FlatIndex {
        let view = self.view;
        let mod_index = view.mod_index_of_core(&self.object.upgrade());
        let num = view.num_flat(mod_index);
        assert!(self.local < num);
        let internal = view.wire_hier_to_internal[mod_index][self.object.index as usize];
        view.wire_end[mod_index] + num * internal as FlatIndex + self.local
    }

    pub fn ports(&self) -> impl Iterator<Item = FlatPort<'v>> + use<'v> {
        let local = self.local;
        let view = self.view;
        self.object
            .ports()
            .map(move |port| FlatPort { object: port, local, view })
    }

    pub fn has_name(&self, id: Id) -> bool {
        self.object.has_name(id)
    }

    pub fn has_property(&self, id: Id) -> bool {
        self.object.has_property(id)
    }

    pub fn names(&self) -> Vec<Id> {
        self.object.names()
    }

    pub fn properties(&self) -> Vec<Id> {
        self.object.properties()
    }
}

impl PartialEq for FlatWire<'_> {
    fn eq(&self, other: &Self) -> bool {
        self.object == other.object && self.local == other.local
    }
}

impl Eq for FlatWire<'_> {}

/// One flat instantiation of a port.
#[derive(Clone)]
pub struct FlatPort<'v> {
    pub(crate) object: Port,
    pub(crate) local: FlatIndex,
    pub(crate) view: &'v FlatView,
}

impl<'v> FlatPort<'v> {
    pub fn get_object(&self) -> Port {
        self.object.clone()
    }

    pub fn is_valid(&self) -> bool {
        self.object.is_valid()
    }

    pub fn is_module_port(&self) -> bool {
        self.object.is_module_port()
    }

    pub fn is_instance_port(&self) -> bool {
        self.object.is_instance_port()
    }

    pub fn is_connected(&self) -> bool {
        self.object.is_connected()
    }

    pub fn get_node(&self) -> FlatNode<'v> {
        FlatNode {
            object: self.object.get_node(),
            local: self.local,
            view: self.view,
        }
    }

    pub fn get_parent_module(&self) -> FlatModule<'v> {
        FlatModule(FlatNode {
            object: self.object.get_parent_module().as_node(),
            local: self.local,
            view: self.view,
        })
    }

    pub fn get_wire(&self) -> FlatWire<'v> {
        FlatWire {
            object: self.object.get_wire(),
            local: self.local,
            view: self.view,
        }
    }

    /// The global port index, computed on the canonical module-port
    /// side: an instance port and its module port share one index.
    pub fn get_index(&self) -> FlatIndex {
        let repr = if self.is_instance_port() {
            FlatInstancePort(self.clone()).get_down_port()
        } else {
            FlatModulePort(self.clone())
        };
        let view = self.view;
        let mod_index = view.mod_index_of_core(&repr.0.object.upgrade());
        let num = view.num_flat(mod_index);
        assert!(repr.0.local < num);
        let internal = view.port_hier_to_internal[mod_index][repr.0.object.port as usize];
        view.port_end[mod_index] + num * internal as FlatIndex + repr.0.local
    }

    pub fn has_name(&self, id: Id) -> bool {
        self.object.has_name(id)
    }

    pub fn has_property(&self, id: Id) -> bool {
        self.object.has_property(id)
    }

    pub fn names(&self) -> Vec<Id> {
        self.object.names()
    }

    pub fn properties(&self) -> Vec<Id> {
        self.object.properties()
    }
}

impl PartialEq for FlatPort<'_> {
    fn eq(&self, other: &Self) -> bool {
        self.object == other.object && self.local == other.local
    }
}

impl Eq for FlatPort<'_> {}

/// One flat instantiation of a canonical module port.
#[derive(Clone, PartialEq, Eq)]
pub struct FlatModulePort<'v>(pub(crate) FlatPort<'v>);

impl<'v> FlatModulePort<'v> {
    pub fn get_object(&self) -> ModulePort {
        ModulePort(self.0.object.clone())
    }

    /// Whether this is a port of the top flat module, which has no
    /// instance side.
    pub fn is_top_port(&self) -> bool {
        self.0.get_parent_module().is_top()
    }

    /// The mirror of this port on the instance that produced this
    /// flat instantiation. Panics on a top port.
    pub fn get_up_port(&self) -> FlatInstancePort<'v> {
        assert!(!self.is_top_port(), "a top port has no up port");
        let up_instance = self.0.get_parent_module().get_up_instance();
        let port = self.get_object().get_up_port(&up_instance.get_object());
        FlatInstancePort(FlatPort {
            object: port.into(),
            local: up_instance.0.local,
            view: self.0.view,
        })
    }
}

impl<'v> Deref for FlatModulePort<'v> {
    type Target = FlatPort<'v>;

    fn deref(&self) -> &FlatPort<'v> {
        &self.0
    }
}

/// One flat instantiation of an instance port.
#[derive(Clone, PartialEq, Eq)]
pub struct FlatInstancePort<'v>(pub(crate) FlatPort<'v>);

impl<'v> FlatInstancePort<'v> {
    pub fn get_object(&self) -> InstancePort {
        InstancePort(self.0.object.clone())
    }

    pub fn get_instance(&self) -> FlatInstance<'v> {
        FlatInstance(self.0.get_node())
    }

    /// The canonical module port in the flat instantiation of the down
    /// module.
    pub fn get_down_port(&self) -> FlatModulePort<'v> {
        let down_module = self.get_instance().get_down_module();
        let port = self.get_object().get_down_port();
        FlatModulePort(FlatPort {
            object: port.into(),
            local: down_module.0.local,
            view: self.0.view,
        })
    }
}

impl<'v> Deref for FlatInstancePort<'v> {
    type Target = FlatPort<'v>;

    fn deref(&self) -> &FlatPort<'v> {
        &self.0
    }
}
