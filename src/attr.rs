// SPDX-License-Identifier: Apache-2.0

use smallvec::SmallVec;

use crate::Id;

/// Typed value of an attribute.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AttrValue {
    Id(Id),
    Int64(i64),
}

/// A keyed, typed attribute.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Attr {
    pub id: Id,
    pub value: AttrValue,
}

/// Per-entity annotation storage: a set of name IDs, a set of property
/// IDs, and a sparse map of typed attributes.
///
/// The sets are expected to stay small (well under 16 entries), so
/// membership is a linear scan and erasure swaps with the last entry.
/// Attributes iterate in insertion order modulo erasures.
#[derive(Clone, Debug, Default)]
pub struct AttrStore {
    names: SmallVec<[Id; 8]>,
    props: SmallVec<[Id; 8]>,
    attrs: Vec<Attr>,
}

impl AttrStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn has_name(&self, name: Id) -> bool {
        self.names.contains(&name)
    }

    pub fn has_prop(&self, prop: Id) -> bool {
        self.props.contains(&prop)
    }

    pub fn has_attr(&self, attr: Id) -> bool {
        self.attrs.iter().any(|a| a.id == attr)
    }

    /// Returns false if the name is already present.
    pub fn add_name(&mut self, name: Id) -> bool {
        if self.has_name(name) {
            return false;
        }
        self.names.push(name);
        true
    }

    /// Returns false if the property is already present.
    pub fn add_prop(&mut self, prop: Id) -> bool {
        if self.has_prop(prop) {
            return false;
        }
        self.props.push(prop);
        true
    }

    /// Returns false if an attribute with the same id is already present.
    pub fn add_attr(&mut self, attr: Attr) -> bool {
        if self.has_attr(attr.id) {
            return false;
        }
        self.attrs.push(attr);
        true
    }

    /// Returns false if the name was absent.
    pub fn erase_name(&mut self, name: Id) -> bool {
        match self.names.iter().position(|&id| id == name) {
            Some(pos) => {
                self.names.swap_remove(pos);
                true
            }
            None => false,
        }
    }

    /// Returns false if the property was absent.
    pub fn erase_prop(&mut self, prop: Id) -> bool {
        match self.props.iter().position(|&id| id == prop) {
            Some(pos) => {
                self.props.swap_remove(pos);
                true
            }
            None => false,
        }
    }

    /// Returns false if no attribute with this id was present.
    pub fn erase_attr(&mut self, attr: Id) -> bool {
        match self.attrs.iter().position(|a| a.id == attr) {
            Some(pos) => {
                self.attrs.swap_remove(pos);
                true
            }
            None => false,
        }
    }

    pub fn get_attr(&self, attr: Id) -> Option<AttrValue> {
        self.attrs.iter().find(|a| a.id == attr).map(|a| a.value)
    }

    pub fn names(&self) -> &[Id] {
        &self.names
    }

    pub fn props(&self) -> &[Id] {
        &self.props
    }

    pub fn attrs(&self) -> &[Attr] {
        &self.attrs
    }

    pub fn clear(&mut self) {
        self.names.clear();
        self.props.clear();
        self.attrs.clear();
    }
}
