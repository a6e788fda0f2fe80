//! Type references and generic substitution.

use smol_str::SmolStr;

use super::ids::{SymbolId, TypeParamId};

/// A (possibly generic) type as written in a declaration.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum HirType {
    /// A class, interface or struct with its type arguments.
    Named { symbol: SymbolId, args: Vec<HirType> },
    /// A reference to a type parameter of some type symbol.
    Param(TypeParamId),
    /// A primitive such as `string` or `int`.
    Builtin(SmolStr),
    /// The front end could not determine the type.
    Unknown,
}

impl HirType {
    /// A named type without type arguments.
    pub fn simple(symbol: SymbolId) -> Self {
        Self::Named {
            symbol,
            args: Vec::new(),
        }
    }

    pub fn generic(symbol: SymbolId, args: Vec<HirType>) -> Self {
        Self::Named { symbol, args }
    }

    pub fn param(owner: SymbolId, index: u32) -> Self {
        Self::Param(TypeParamId { owner, index })
    }

    pub fn builtin(name: &str) -> Self {
        Self::Builtin(SmolStr::new(name))
    }

    /// The type symbol this type refers to, if it is a named type.
    pub fn symbol(&self) -> Option<SymbolId> {
        match self {
            Self::Named { symbol, .. } => Some(*symbol),
            _ => None,
        }
    }

    /// Replace parameters of `owner` with the matching entry of `args`.
    ///
    /// Parameters without a corresponding argument are left in place.
    pub fn substitute(&self, owner: SymbolId, args: &[HirType]) -> HirType {
        match self {
            Self::Param(param) if param.owner == owner => args
                .get(param.index as usize)
                .cloned()
                .unwrap_or_else(|| self.clone()),
            Self::Named { symbol, args: inner } => Self::Named {
                symbol: *symbol,
                args: inner.iter().map(|arg| arg.substitute(owner, args)).collect(),
            },
            other => other.clone(),
        }
    }

    /// Resolve a base-type edge declared on `instance`'s symbol against the
    /// type arguments `instance` carries.
    ///
    /// For `class StringList : List<string>` nothing changes; for
    /// `class Wrapper<G> : List<G>` seen as `Wrapper<int>` this yields `List<int>`.
    pub fn actual_in(&self, instance: &HirType) -> HirType {
        match instance {
            Self::Named { symbol, args } => self.substitute(*symbol, args),
            _ => self.clone(),
        }
    }
}
