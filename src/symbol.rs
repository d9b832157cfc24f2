// SPDX-License-Identifier: Apache-2.0

/// Opaque identifier handed out by an external intern table.
pub type Id = u32;

/// The null identifier. Interners must keep index 0 unassigned.
pub const NULL_ID: Id = 0;

/// Well-known identifiers with reserved values.
///
/// These are stable across processes as long as the external interner
/// pre-registers them in declaration order, starting at 1.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[repr(u32)]
pub enum Symbol {
    ConstantOne = 1,
    ConstantZero,
    DirIn,
    DirInout,
    DirOut,
    Vcc,
    Vss,
}

impl Symbol {
    /// All reserved symbols, in registration order.
    pub const ALL: [Symbol; 7] = [
        Symbol::ConstantOne,
        Symbol::ConstantZero,
        Symbol::DirIn,
        Symbol::DirInout,
        Symbol::DirOut,
        Symbol::Vcc,
        Symbol::Vss,
    ];

    /// The string an interner should register for this symbol.
    pub fn as_str(self) -> &'static str {
        match self {
            Symbol::ConstantOne => "CONSTANT_ONE",
            Symbol::ConstantZero => "CONSTANT_ZERO",
            Symbol::DirIn => "DIR_IN",
            Symbol::DirInout => "DIR_INOUT",
            Symbol::DirOut => "DIR_OUT",
            Symbol::Vcc => "VCC",
            Symbol::Vss => "VSS",
        }
    }

    pub fn id(self) -> Id {
        self as Id
    }
}

impl From<Symbol> for Id {
    fn from(symbol: Symbol) -> Id {
        symbol.id()
    }
}
