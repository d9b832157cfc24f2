// SPDX-License-Identifier: Apache-2.0

//! Read-only flat enumeration of a module hierarchy.
//!
//! A [`FlatView`] assigns contiguous 64-bit indices to every flat
//! instantiation of every module, wire and port reachable from a top
//! module, in storage proportional to the hierarchical design rather
//! than to the number of flat instances. It is a snapshot: any
//! mutation of the underlying module graph invalidates it.

use std::cell::RefCell;
use std::collections::HashSet;
use std::rc::Rc;

use indexmap::IndexMap;
use log::debug;

use crate::{
    Error, FlatIndex, INVALID_FLAT_INDEX, INVALID_INDEX, Index, Instance, Module, ModuleCore, Node,
    Wire,
};

mod check;
mod proxies;
pub use proxies::{
    FlatInstance, FlatInstancePort, FlatModule, FlatModulePort, FlatNode, FlatPort, FlatWire,
};

/// One parent instance of a module: where its interval starts in the
/// child's local index space, and which instance produced it.
pub(crate) struct UpInfo {
    pub(crate) offset: FlatIndex,
    pub(crate) parent_instance: Instance,
}

/// Intervals of a module's local index space, one per parent instance,
/// in topological processing order. `inst_end[0] == 0` and
/// `inst_end[k+1] - inst_end[k]` is the flat size of parent `k`.
pub(crate) struct ParentInfo {
    pub(crate) inst_end: Vec<FlatIndex>,
    pub(crate) ups: Vec<UpInfo>,
}

/// Child-side mirror of [`UpInfo`]: local base offset per instance
/// node slot, with `INVALID_FLAT_INDEX` in the holes left by destroyed
/// or interface slots.
#[derive(Default)]
pub(crate) struct ChildInfo {
    pub(crate) down_offsets: Vec<FlatIndex>,
}

/// Flat enumeration of everything instantiated under one top module.
pub struct FlatView {
    pub(crate) top: Module,

    /// Modules in topological order, parents before children;
    /// `mods[0]` is the top module.
    pub(crate) mods: Vec<Rc<RefCell<ModuleCore>>>,
    /// Storage pointer to topological position.
    pub(crate) mod_to_index: IndexMap<usize, u32>,

    pub(crate) parents: Vec<ParentInfo>,
    pub(crate) children: Vec<ChildInfo>,

    /// Prefix sums of flat sizes; module `i` owns global module
    /// indices `mod_end[i] .. mod_end[i + 1]`.
    pub(crate) mod_end: Vec<FlatIndex>,

    /// Live wire slots per module, ascending, with the reverse
    /// slot-to-position table and the global prefix sums.
    pub(crate) wires: Vec<Vec<Index>>,
    pub(crate) wire_hier_to_internal: Vec<Vec<Index>>,
    pub(crate) wire_end: Vec<FlatIndex>,

    /// Same three tables for interface ports.
    pub(crate) ports: Vec<Vec<Index>>,
    pub(crate) port_hier_to_internal: Vec<Vec<Index>>,
    pub(crate) port_end: Vec<FlatIndex>,
}

/// Largest `i` with `vec[i] <= value`; `vec` must be sorted and
/// bracket `value`.
pub(crate) fn bisect(vec: &[FlatIndex], value: FlatIndex) -> usize {
    let pos = vec.partition_point(|&x| x <= value);
    assert!(pos > 0 && pos < vec.len(), "flat index out of range");
    pos - 1
}

fn visit(
    core: &Rc<RefCell<ModuleCore>>,
    order: &mut Vec<Rc<RefCell<ModuleCore>>>,
    visited: &mut HashSet<usize>,
    on_path: &mut HashSet<usize>,
) -> Result<(), Error> {
    let key = Rc::as_ptr(core) as usize;
    if !visited.insert(key) {
        return Ok(());
    }
    on_path.insert(key);
    let targets: Vec<Rc<RefCell<ModuleCore>>> = {
        let borrowed = core.borrow();
        (1..borrowed.nodes.len())
            .filter(|&index| borrowed.nodes.is_valid(index))
            .map(|index| {
                borrowed.nodes[index]
                    .target
                    .clone()
                    .expect("instance node carries a down module")
            })
            .collect()
    };
    for target in targets {
        if on_path.contains(&(Rc::as_ptr(&target) as usize)) {
            return Err(Error::HierarchyCycle);
        }
        visit(&target, order, visited, on_path)?;
    }
    on_path.remove(&key);
    order.push(core.clone());
    Ok(())
}

impl FlatView {
    /// Builds the flat enumeration rooted at `top`.
    ///
    /// Fails with [`Error::HierarchyCycle`] when a module transitively
    /// instantiates itself. The caller must not mutate the module
    /// graph while the view is in use; the view holds the graph alive
    /// but does not track changes.
    pub fn new(top: &Module) -> Result<FlatView, Error> {
        // Topological order via postorder DFS, parents first after the
        // reversal.
        let mut mods = Vec::new();
        let mut visited = HashSet::new();
        let mut on_path = HashSet::new();
        visit(&top.core, &mut mods, &mut visited, &mut on_path)?;
        mods.reverse();

        let n = mods.len();
        let mut mod_to_index = IndexMap::with_capacity(n);
        for (i, core) in mods.iter().enumerate() {
            mod_to_index.insert(Rc::as_ptr(core) as usize, i as u32);
        }

        // Flat size of a module is the sum of the flat sizes of all
        // its parent instances; processing in topological order makes
        // every size final before it is consumed.
        let mut flat_sizes = vec![0u64; n];
        flat_sizes[0] = 1;
        let mut mod_end = Vec::with_capacity(n + 1);
        mod_end.push(0);
        for i in 0..n {
            let fsize = flat_sizes[i];
            debug_assert!(fsize > 0);
            let core = mods[i].borrow();
            for index in 1..core.nodes.len() {
                if !core.nodes.is_valid(index) {
                    continue;
                }
                let target = core.nodes[index]
                    .target
                    .as_ref()
                    .expect("instance node carries a down module");
                let down = mod_to_index[&(Rc::as_ptr(target) as usize)] as usize;
                debug_assert!(down > i);
                flat_sizes[down] += fsize;
            }
            mod_end.push(mod_end[i] + fsize);
        }

        // Parent intervals and the child-side offset mirror.
        let mut parents: Vec<ParentInfo> = (0..n)
            .map(|_| ParentInfo {
                inst_end: vec![0],
                ups: Vec::new(),
            })
            .collect();
        let mut children: Vec<ChildInfo> = (0..n).map(|_| ChildInfo::default()).collect();
        for i in 0..n {
            let core = mods[i].borrow();
            for index in 1..core.nodes.len() {
                if !core.nodes.is_valid(index) {
                    continue;
                }
                let target = core.nodes[index]
                    .target
                    .as_ref()
                    .expect("instance node carries a down module");
                let down = mod_to_index[&(Rc::as_ptr(target) as usize)] as usize;

                let parent_info = &mut parents[down];
                let offset = *parent_info.inst_end.last().unwrap();
                parent_info.inst_end.push(offset + flat_sizes[i]);
                parent_info.ups.push(UpInfo {
                    offset,
                    parent_instance: Instance(Node {
                        core: Rc::downgrade(&mods[i]),
                        index,
                    }),
                });

                let child_info = &mut children[i];
                if child_info.down_offsets.len() <= index as usize {
                    child_info
                        .down_offsets
                        .resize(index as usize + 1, INVALID_FLAT_INDEX);
                }
                child_info.down_offsets[index as usize] = offset;
            }
        }

        // Wire and port index spaces stride through every flat replica
        // of the owning module.
        let mut wires: Vec<Vec<Index>> = vec![Vec::new(); n];
        let mut wire_hier_to_internal: Vec<Vec<Index>> = vec![Vec::new(); n];
        let mut wire_end = vec![0u64];
        let mut ports: Vec<Vec<Index>> = vec![Vec::new(); n];
        let mut port_hier_to_internal: Vec<Vec<Index>> = vec![Vec::new(); n];
        let mut port_end = vec![0u64];
        for i in 0..n {
            let core = mods[i].borrow();
            let num = mod_end[i + 1] - mod_end[i];
            for slot in 0..core.wires.len() {
                if !core.wires.is_valid(slot) {
                    continue;
                }
                let internal = wires[i].len() as Index;
                wires[i].push(slot);
                wire_hier_to_internal[i].resize(slot as usize + 1, INVALID_INDEX);
                wire_hier_to_internal[i][slot as usize] = internal;
            }
            wire_end.push(wire_end[i] + wires[i].len() as u64 * num);
            for slot in 0..core.interface_len() {
                if !core.module_port_is_valid(slot) {
                    continue;
                }
                let internal = ports[i].len() as Index;
                ports[i].push(slot);
                port_hier_to_internal[i].resize(slot as usize + 1, INVALID_INDEX);
                port_hier_to_internal[i][slot as usize] = internal;
            }
            port_end.push(port_end[i] + ports[i].len() as u64 * num);
        }

        let view = FlatView {
            top: top.clone(),
            mods,
            mod_to_index,
            parents,
            children,
            mod_end,
            wires,
            wire_hier_to_internal,
            wire_end,
            ports,
            port_hier_to_internal,
            port_end,
        };
        debug!(
            "flat view over {} modules: {} flat modules, {} flat wires, {} flat ports",
            n,
            view.get_num_flat_modules(),
            view.get_num_flat_wires(),
            view.get_num_flat_ports()
        );
        if cfg!(debug_assertions) {
            view.selfcheck();
        }
        Ok(view)
    }

    pub(crate) fn mod_index_of_core(&self, core: &Rc<RefCell<ModuleCore>>) -> usize {
        *self
            .mod_to_index
            .get(&(Rc::as_ptr(core) as usize))
            .expect("module is not part of this flat view") as usize
    }

    pub(crate) fn num_flat(&self, mod_index: usize) -> FlatIndex {
        self.mod_end[mod_index + 1] - self.mod_end[mod_index]
    }

    /// Number of distinct paths from the top module to `module`.
    pub fn get_num_flat_instantiations(&self, module: &Module) -> FlatIndex {
        self.num_flat(self.mod_index_of_core(&module.core))
    }

    /// Number of flat instantiations of the module holding `node`.
    pub fn get_num_flat_node_instantiations(&self, node: &Node) -> FlatIndex {
        self.get_num_flat_instantiations(&node.get_parent_module())
    }

    /// Number of flat instantiations of the module holding `wire`.
    pub fn get_num_flat_wire_instantiations(&self, wire: &Wire) -> FlatIndex {
        self.get_num_flat_instantiations(&wire.get_parent_module())
    }

    pub fn get_num_flat_modules(&self) -> FlatIndex {
        *self.mod_end.last().unwrap()
    }

    pub fn get_num_flat_wires(&self) -> FlatIndex {
        *self.wire_end.last().unwrap()
    }

    pub fn get_num_flat_ports(&self) -> FlatIndex {
        *self.port_end.last().unwrap()
    }

    /// The unique flat instantiation of the top module, at global
    /// module index 0.
    pub fn get_top(&self) -> FlatModule<'_> {
        FlatModule(FlatNode {
            object: self.top.as_node(),
            local: 0,
            view: self,
        })
    }

    /// Decodes a global module index.
    pub fn get_flat_module_by_index(&self, index: FlatIndex) -> FlatModule<'_> {
        let mod_index = bisect(&self.mod_end, index);
        FlatModule(FlatNode {
            object: Node {
                core: Rc::downgrade(&self.mods[mod_index]),
                index: 0,
            },
            local: index - self.mod_end[mod_index],
            view: self,
        })
    }

    /// Decodes a global instance index. An instance shares its index
    /// with its flattened down module, so index 0 (the top) has no
    /// instance and is rejected.
    pub fn get_flat_instance_by_index(&self, index: FlatIndex) -> FlatInstance<'_> {
        self.get_flat_module_by_index(index).get_up_instance()
    }

    /// Decodes a global wire index.
    pub fn get_flat_wire_by_index(&self, index: FlatIndex) -> FlatWire<'_> {
        let mod_index = bisect(&self.wire_end, index);
        let num = self.num_flat(mod_index);
        let rem = index - self.wire_end[mod_index];
        FlatWire {
            object: Wire {
                core: Rc::downgrade(&self.mods[mod_index]),
                index: self.wires[mod_index][(rem / num) as usize],
            },
            local: rem % num,
            view: self,
        }
    }

    /// Decodes a global port index to its canonical module-port side.
    pub fn get_flat_module_port_by_index(&self, index: FlatIndex) -> FlatModulePort<'_> {
        let mod_index = bisect(&self.port_end, index);
        let num = self.num_flat(mod_index);
        let rem = index - self.port_end[mod_index];
        FlatModulePort(FlatPort {
            object: crate::Port {
                core: Rc::downgrade(&self.mods[mod_index]),
                node: 0,
                port: self.ports[mod_index][(rem / num) as usize],
            },
            local: rem % num,
            view: self,
        })
    }

    /// Decodes a global port index to the instance-port side. Ports of
    /// the top module have no instance side and are rejected.
    pub fn get_flat_instance_port_by_index(&self, index: FlatIndex) -> FlatInstancePort<'_> {
        self.get_flat_module_port_by_index(index).get_up_port()
    }
}
