// SPDX-License-Identifier: Apache-2.0

use thiserror::Error;

/// Recoverable failures of the netlist core.
///
/// Contract violations (stale handles, double connects, leaf-module
/// misuse) are programming errors and panic instead.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum Error {
    /// The module graph transitively instantiates one of its own
    /// ancestors, so no flat enumeration of it exists.
    #[error("module hierarchy contains an instantiation cycle")]
    HierarchyCycle,
}
