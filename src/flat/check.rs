// SPDX-License-Identifier: Apache-2.0

use std::rc::Rc;

use itertools::Itertools;

use crate::flat::FlatView;
use crate::{INVALID_INDEX, Index};

impl FlatView {
    /// Verifies the internal consistency of every table. Runs after
    /// construction in debug builds; cheap enough for tests to call
    /// directly.
    pub fn selfcheck(&self) {
        let n = self.mods.len();
        assert!(n > 0 && Rc::ptr_eq(&self.mods[0], &self.top.core));
        assert_eq!(self.mod_to_index.len(), n);
        assert_eq!(self.mod_end.len(), n + 1);
        assert_eq!(self.parents.len(), n);
        assert_eq!(self.children.len(), n);
        assert_eq!(self.wires.len(), n);
        assert_eq!(self.wire_hier_to_internal.len(), n);
        assert_eq!(self.wire_end.len(), n + 1);
        assert_eq!(self.ports.len(), n);
        assert_eq!(self.port_hier_to_internal.len(), n);
        assert_eq!(self.port_end.len(), n + 1);

        for end in [&self.mod_end, &self.wire_end, &self.port_end] {
            assert!(end.iter().tuple_windows().all(|(a, b)| a <= b));
        }
        assert_eq!(self.mod_end[0], 0);
        assert_eq!(self.mod_end[1], 1, "the top module has exactly one instantiation");

        // The top module has no parents; every other module's parent
        // intervals tile its local index space and mirror the child
        // tables exactly.
        assert!(self.parents[0].ups.is_empty());
        assert_eq!(self.parents[0].inst_end, vec![0]);
        for i in 1..n {
            let parent_info = &self.parents[i];
            assert_eq!(parent_info.inst_end[0], 0);
            assert_eq!(*parent_info.inst_end.last().unwrap(), self.num_flat(i));
            assert_eq!(parent_info.inst_end.len(), parent_info.ups.len() + 1);
            assert!(parent_info.inst_end.iter().tuple_windows().all(|(a, b)| a < b));

            for (interval, up) in parent_info.ups.iter().enumerate() {
                assert_eq!(up.offset, parent_info.inst_end[interval]);
                let parent_core = up.parent_instance.as_node().upgrade();
                let parent_index = self.mod_index_of_core(&parent_core);
                assert!(parent_index < i, "parents precede children in topological order");
                assert_eq!(
                    parent_info.inst_end[interval + 1] - parent_info.inst_end[interval],
                    self.num_flat(parent_index)
                );
                let node_index = up.parent_instance.as_node().index;
                assert_eq!(
                    self.children[parent_index].down_offsets[node_index as usize],
                    up.offset
                );
            }
        }

        for i in 0..n {
            check_slot_tables(&self.wires[i], &self.wire_hier_to_internal[i]);
            check_slot_tables(&self.ports[i], &self.port_hier_to_internal[i]);
            assert_eq!(
                self.wire_end[i + 1] - self.wire_end[i],
                self.wires[i].len() as u64 * self.num_flat(i)
            );
            assert_eq!(
                self.port_end[i + 1] - self.port_end[i],
                self.ports[i].len() as u64 * self.num_flat(i)
            );
        }
    }
}

/// The slot list must be strictly increasing and the reverse table
/// must be its exact inverse, holes excluded.
fn check_slot_tables(slots: &[Index], hier_to_internal: &[Index]) {
    assert!(slots.iter().tuple_windows().all(|(a, b)| a < b));
    for (internal, &slot) in slots.iter().enumerate() {
        assert_eq!(hier_to_internal[slot as usize], internal as Index);
    }
    for (slot, &internal) in hier_to_internal.iter().enumerate() {
        if internal != INVALID_INDEX {
            assert_eq!(slots[internal as usize], slot as Index);
        }
    }
}
