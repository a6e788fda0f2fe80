//! SymbolIndex: the arena holding one finalized analysis snapshot.
//!
//! The front end populates the index once per build; IDE features only read
//! it. Base edges are attached after all symbols exist so hierarchies may
//! refer forward (and, in malformed input, cyclically).

use std::path::Path;

use super::ids::{SymbolId, TypeParamId};
use super::symbols::{AncestorLink, HirSymbol, LinkKind, SourceRef, SymbolKind, TypeShape};
use super::types::HirType;

/// Arena of symbols addressed by [`SymbolId`].
#[derive(Clone, Debug, Default)]
pub struct SymbolIndex {
    symbols: Vec<HirSymbol>,
}

impl SymbolIndex {
    pub fn new() -> Self {
        Self::default()
    }

    // ==================== Building ====================

    /// Add a symbol and return its id.
    ///
    /// # Panics
    ///
    /// If the index already holds `u32::MAX + 1` symbols.
    pub fn add(&mut self, symbol: HirSymbol) -> SymbolId {
        let id = symbol_id_at(self.symbols.len());
        self.symbols.push(symbol);
        id
    }

    pub fn add_namespace(&mut self, parent: Option<SymbolId>, name: &str) -> SymbolId {
        self.add(HirSymbol::new(name, SymbolKind::Namespace, parent))
    }

    pub fn add_class(&mut self, parent: Option<SymbolId>, name: &str, type_params: &[&str]) -> SymbolId {
        self.add_type(parent, name, type_params, TypeShape::Class { bases: Vec::new() })
    }

    pub fn add_interface(
        &mut self,
        parent: Option<SymbolId>,
        name: &str,
        type_params: &[&str],
    ) -> SymbolId {
        self.add_type(
            parent,
            name,
            type_params,
            TypeShape::Interface {
                prerequisites: Vec::new(),
            },
        )
    }

    pub fn add_struct(&mut self, parent: Option<SymbolId>, name: &str) -> SymbolId {
        self.add_type(parent, name, &[], TypeShape::Struct { base: None })
    }

    /// Add a non-type member (method, property, ...) to `parent`.
    pub fn add_member(&mut self, parent: SymbolId, name: &str, kind: SymbolKind) -> SymbolId {
        self.add(HirSymbol::new(name, kind, Some(parent)))
    }

    fn add_type(
        &mut self,
        parent: Option<SymbolId>,
        name: &str,
        type_params: &[&str],
        shape: TypeShape,
    ) -> SymbolId {
        let mut symbol = HirSymbol::new(name, SymbolKind::Type(shape), parent);
        symbol.type_params = type_params.iter().map(|p| (*p).into()).collect();
        self.add(symbol)
    }

    /// Append a base-type edge to a type symbol.
    ///
    /// Classes and interfaces accumulate edges in call order; a struct's
    /// single base is replaced. Non-type symbols ignore the call.
    pub fn add_base(&mut self, id: SymbolId, base: HirType) {
        if let SymbolKind::Type(shape) = &mut self.symbols[id.index()].kind {
            match shape {
                TypeShape::Class { bases } => bases.push(base),
                TypeShape::Interface { prerequisites } => prerequisites.push(base),
                TypeShape::Struct { base: slot } => *slot = Some(base),
            }
        }
    }

    pub fn set_source(&mut self, id: SymbolId, source: SourceRef) {
        self.symbols[id.index()].source = Some(source);
    }

    /// Record that `id` overrides, implements or hides `target`.
    pub fn link(&mut self, id: SymbolId, kind: LinkKind, target: SymbolId) {
        self.symbols[id.index()].link = Some(AncestorLink { kind, target });
    }

    // ==================== Queries ====================

    /// The symbol behind `id`.
    ///
    /// Ids are only minted by this index; an id from another index panics.
    pub fn symbol(&self, id: SymbolId) -> &HirSymbol {
        &self.symbols[id.index()]
    }

    pub fn get(&self, id: SymbolId) -> Option<&HirSymbol> {
        self.symbols.get(id.index())
    }

    pub fn len(&self) -> usize {
        self.symbols.len()
    }

    pub fn is_empty(&self) -> bool {
        self.symbols.is_empty()
    }

    pub fn parent(&self, id: SymbolId) -> Option<SymbolId> {
        self.symbol(id).parent
    }

    pub fn is_type(&self, id: SymbolId) -> bool {
        self.symbol(id).kind.is_type()
    }

    /// Direct base-type edges of `id` in declaration order (empty for non-types).
    pub fn base_edges(&self, id: SymbolId) -> &[HirType] {
        self.symbol(id).base_edges()
    }

    /// `id` instantiated with its own type parameters, e.g. `List<T>` for `List`.
    pub fn instance_type(&self, id: SymbolId) -> HirType {
        let params = self.symbol(id).type_params.len() as u32;
        HirType::generic(id, (0..params).map(|i| HirType::param(id, i)).collect())
    }

    pub fn type_param_name(&self, param: TypeParamId) -> Option<&str> {
        self.get(param.owner)?
            .type_params
            .get(param.index as usize)
            .map(|name| name.as_str())
    }

    /// Enclosing symbols of `id`, innermost first, excluding `id` itself.
    pub fn ancestors(&self, id: SymbolId) -> impl Iterator<Item = SymbolId> + '_ {
        std::iter::successors(self.parent(id), move |&current| self.parent(current))
    }

    /// Dot-separated path from the outermost namespace, e.g. `Gee.ArrayList`.
    pub fn qualified_name(&self, id: SymbolId) -> String {
        let mut names: Vec<&str> = self
            .ancestors(id)
            .map(|ancestor| self.symbol(ancestor).name.as_str())
            .collect();
        names.reverse();
        names.push(self.symbol(id).name.as_str());
        names.join(".")
    }

    /// Symbols declared in `file`, in insertion order.
    pub fn symbols_in_file<'a>(
        &'a self,
        file: &'a Path,
    ) -> impl Iterator<Item = (SymbolId, &'a HirSymbol)> + 'a {
        self.symbols
            .iter()
            .enumerate()
            .filter(move |(_, symbol)| symbol.source.as_ref().is_some_and(|s| s.file == file))
            .map(|(i, symbol)| (symbol_id_at(i), symbol))
    }
}

/// The id of the symbol stored at arena slot `index`.
fn symbol_id_at(index: usize) -> SymbolId {
    match u32::try_from(index) {
        Ok(raw) => SymbolId(raw),
        Err(_) => panic!("symbol index overflow: slot {index} does not fit a SymbolId"),
    }
}
