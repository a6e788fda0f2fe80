//! A small Gee-like library plus an application deriving from it.

use std::path::Path;

use tessera::Span;
use tessera::hir::{HirType, LinkKind, SourceRef, SymbolId, SymbolIndex, SymbolKind};

pub const APP_FILE: &str = "/p/src/app.vala";
pub const GEE_VAPI: &str = "/usr/share/vala/vapi/gee-0.8.vapi";

pub struct Library {
    pub index: SymbolIndex,
    pub gee: SymbolId,
    pub traversable: SymbolId,
    pub collection: SymbolId,
    pub array_list: SymbolId,
    pub foreach: SymbolId,
    pub add: SymbolId,
    pub size: SymbolId,
}

fn span(line: u32) -> Span {
    Span::from_coords(line, 4, line, 30)
}

pub fn source(file: &str, line: u32) -> SourceRef {
    SourceRef::new(file, span(line))
}

/// ```text
/// namespace Gee {
///     interface Traversable<G> { foreach(); }
///     interface Collection<G> : Traversable<G> { add(); size; }
///     class ArrayList<G> : Collection<G> { add(); size; }
/// }
/// ```
pub fn gee_library() -> Library {
    let mut index = SymbolIndex::new();
    let gee = index.add_namespace(None, "Gee");
    let traversable = index.add_interface(Some(gee), "Traversable", &["G"]);
    let collection = index.add_interface(Some(gee), "Collection", &["G"]);
    index.add_base(
        collection,
        HirType::generic(traversable, vec![HirType::param(collection, 0)]),
    );
    let array_list = index.add_class(Some(gee), "ArrayList", &["G"]);
    index.add_base(
        array_list,
        HirType::generic(collection, vec![HirType::param(array_list, 0)]),
    );

    let foreach = index.add_member(traversable, "foreach", SymbolKind::Method);
    index.set_source(foreach, source(GEE_VAPI, 40));
    index.add_member(collection, "add", SymbolKind::Method);
    let add = index.add_member(array_list, "add", SymbolKind::Method);
    index.set_source(add, source(GEE_VAPI, 210));
    let size = index.add_member(array_list, "size", SymbolKind::Property);
    index.set_source(size, source(GEE_VAPI, 215));

    Library {
        index,
        gee,
        traversable,
        collection,
        array_list,
        foreach,
        add,
        size,
    }
}

/// Declare `member` in `owner` at `line` of [`APP_FILE`] linked to `target`.
pub fn linked_member(
    index: &mut SymbolIndex,
    owner: SymbolId,
    name: &str,
    kind: SymbolKind,
    line: u32,
    link: (LinkKind, SymbolId),
) -> SymbolId {
    let id = index.add_member(owner, name, kind);
    index.set_source(id, source(APP_FILE, line));
    index.link(id, link.0, link.1);
    id
}

pub fn app_file() -> &'static Path {
    Path::new(APP_FILE)
}
