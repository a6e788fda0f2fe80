//! Symbols of the analysis snapshot.

use std::path::PathBuf;

use smol_str::SmolStr;

use super::ids::SymbolId;
use super::types::HirType;
use crate::base::Span;

/// Where a symbol is declared.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct SourceRef {
    pub file: PathBuf,
    pub span: Span,
}

impl SourceRef {
    pub fn new(file: impl Into<PathBuf>, span: Span) -> Self {
        Self {
            file: file.into(),
            span,
        }
    }
}

/// The shape of a type symbol and its base-type edges.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum TypeShape {
    Class { bases: Vec<HirType> },
    Interface { prerequisites: Vec<HirType> },
    Struct { base: Option<HirType> },
}

impl TypeShape {
    /// Direct base-type edges in declaration order.
    pub fn base_edges(&self) -> &[HirType] {
        match self {
            Self::Class { bases } => bases,
            Self::Interface { prerequisites } => prerequisites,
            Self::Struct { base } => base.as_slice(),
        }
    }
}

/// The kind of a symbol.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SymbolKind {
    Namespace,
    Type(TypeShape),
    Method,
    Constructor,
    Signal,
    Property,
    Field,
    Constant,
}

impl SymbolKind {
    pub fn is_type(&self) -> bool {
        matches!(self, Self::Type(_))
    }

    /// Whether references to the symbol are invoked (`foo ()`).
    pub fn is_callable(&self) -> bool {
        matches!(self, Self::Method | Self::Constructor | Self::Signal)
    }
}

/// How a member relates to the ancestor member it shadows.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum LinkKind {
    /// Overrides a virtual or abstract class member.
    Overrides,
    /// Implements an interface member.
    Implements,
    /// Hides an inherited member with the same name.
    Hides,
}

/// An override/hide relationship recorded by the analysis pass.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct AncestorLink {
    pub kind: LinkKind,
    pub target: SymbolId,
}

/// A symbol of the analysis snapshot.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct HirSymbol {
    /// The simple name of the symbol
    pub name: SmolStr,
    pub kind: SymbolKind,
    /// The immediately enclosing symbol (`None` for the root namespace's members)
    pub parent: Option<SymbolId>,
    /// Declared type parameters, for type symbols
    pub type_params: Vec<SmolStr>,
    pub source: Option<SourceRef>,
    /// The ancestor member this symbol overrides, implements or hides
    pub link: Option<AncestorLink>,
}

impl HirSymbol {
    pub fn new(name: &str, kind: SymbolKind, parent: Option<SymbolId>) -> Self {
        Self {
            name: SmolStr::new(name),
            kind,
            parent,
            type_params: Vec::new(),
            source: None,
            link: None,
        }
    }

    pub fn base_edges(&self) -> &[HirType] {
        match &self.kind {
            SymbolKind::Type(shape) => shape.base_edges(),
            _ => &[],
        }
    }
}
