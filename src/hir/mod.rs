//! High-level IR (HIR): the analysis snapshot consumed by IDE features.
//!
//! The compiler front end fills a [`SymbolIndex`] after each build. Nothing
//! in this crate mutates it afterwards, so readers need no locking.
//!
//! ## Key Types
//!
//! - [`SymbolIndex`]: Arena of symbols addressed by [`SymbolId`]
//! - [`HirSymbol`]: A symbol with its enclosing symbol and source reference
//! - [`TypeShape`]: Class / interface / struct with ordered base-type edges
//! - [`HirType`]: Possibly generic type with substitution support

mod display;
mod ids;
mod index;
mod symbols;
mod types;

pub use ids::{SymbolId, TypeParamId};
pub use index::SymbolIndex;
pub use symbols::{AncestorLink, HirSymbol, LinkKind, SourceRef, SymbolKind, TypeShape};
pub use types::HirType;
