//! Strongly typed identifiers for the analysis snapshot.
//!
//! Symbols are compared by identity, never by name: two classes called
//! `List` in different namespaces get different [`SymbolId`]s.

use std::fmt;

/// Index of a symbol in its [`SymbolIndex`](super::SymbolIndex).
#[derive(Clone, Copy, PartialEq, Eq, Hash, Ord, PartialOrd)]
pub struct SymbolId(pub(crate) u32);

impl SymbolId {
    /// Retrieve the underlying integer value.
    pub const fn to_raw(self) -> u32 {
        self.0
    }

    pub(crate) fn index(self) -> usize {
        self.0 as usize
    }
}

impl fmt::Debug for SymbolId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "SymbolId({})", self.0)
    }
}

/// The `index`-th type parameter declared by the type symbol `owner`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct TypeParamId {
    pub owner: SymbolId,
    pub index: u32,
}
