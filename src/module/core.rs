// SPDX-License-Identifier: Apache-2.0

use std::cell::RefCell;
use std::rc::Rc;

use crate::Index;
use crate::attr::AttrStore;
use crate::pool::Pool;
use crate::xref::{EMPTY, Xref};

/// Backing storage of one module.
///
/// Not used directly; `Module` wraps a shared pointer to this struct
/// and the other proxy types address into it by index.
pub(crate) struct ModuleCore {
    pub(crate) nodes: Pool<NodeData>,
    pub(crate) wires: Pool<WireData>,
    /// Head of the freelist threaded through destroyed slots of the
    /// interface node's port table.
    pub(crate) first_free_port: Index,
    pub(crate) leaf: bool,
}

/// A slot in the node pool: the module's own interface at index 0,
/// instances of other modules everywhere else.
pub(crate) struct NodeData {
    pub(crate) data: AttrStore,
    /// Port connections. On the interface node this table also defines
    /// which port indices exist; destroyed entries carry the port
    /// freelist. Instance-side tables may be shorter than the down
    /// module's interface table and grow on demand.
    pub(crate) refs: Vec<Xref>,
    /// Per-port annotations, grown on demand alongside `refs`.
    pub(crate) ref_data: Vec<AttrStore>,
    /// The instantiated module. `None` on the interface node, which
    /// stands for the module itself.
    pub(crate) target: Option<Rc<RefCell<ModuleCore>>>,
}

impl Default for NodeData {
    fn default() -> Self {
        NodeData {
            data: AttrStore::new(),
            refs: Vec::new(),
            ref_data: Vec::new(),
            target: None,
        }
    }
}

/// A slot in the wire pool.
#[derive(Default)]
pub(crate) struct WireData {
    pub(crate) data: AttrStore,
    pub(crate) refs: crate::xref::XrefList,
}

impl ModuleCore {
    pub(crate) fn new(leaf: bool) -> Self {
        let mut nodes = Pool::new();
        let interface = nodes.allocate();
        debug_assert_eq!(interface, 0);
        ModuleCore {
            nodes,
            wires: Pool::new(),
            first_free_port: EMPTY,
            leaf,
        }
    }

    /// Upper bound of the interface port table; live port indices are
    /// strictly below this and pass `module_port_is_valid`.
    pub(crate) fn interface_len(&self) -> Index {
        self.nodes[0].refs.len() as Index
    }

    /// Whether the interface port slot exists and has not been
    /// destroyed.
    pub(crate) fn module_port_is_valid(&self, port: Index) -> bool {
        match self.nodes[0].refs.get(port as usize) {
            Some(xref) => xref.is_valid(),
            None => false,
        }
    }
}
