// SPDX-License-Identifier: Apache-2.0

//! In-memory core for hierarchical netlists: modules containing
//! interface nodes, instances and wires, cross-linked through ports,
//! plus a read-only flat view that indexes every instantiation path
//! without materialising it.

mod symbol;
pub use symbol::{Id, NULL_ID, Symbol};

mod attr;
pub use attr::{Attr, AttrStore, AttrValue};

mod pool;
mod xref;

mod error;
pub use error::Error;

mod module;
pub(crate) use module::ModuleCore;
pub use module::Module;

mod wire;
pub use wire::Wire;

mod node;
pub use node::Node;

mod instance;
pub use instance::Instance;

mod port;
pub use port::{InstancePort, ModulePort, Port};

mod iter;
pub use iter::{
    InstanceIter, InstancePortIter, ModulePortIter, NodeIter, NodePortIter, WireIter, WirePortIter,
};

mod flat;
pub use flat::{
    FlatInstance, FlatInstancePort, FlatModule, FlatModulePort, FlatNode, FlatPort, FlatView,
    FlatWire,
};

/// Index of a slot inside a module's node, wire or port tables. Slot
/// indices are stable for the lifetime of the entity they address and
/// may be reused after destruction.
pub type Index = u32;

/// Index into the flat instantiation space of a [`FlatView`].
pub type FlatIndex = u64;

/// Reserved invalid slot index. The two largest `Index` values are
/// reserved for internal discriminators and are never allocated.
pub const INVALID_INDEX: Index = Index::MAX;

/// Reserved invalid flat index.
pub const INVALID_FLAT_INDEX: FlatIndex = FlatIndex::MAX;
