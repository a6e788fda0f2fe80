//! Code lens tests over a library/application symbol index.

use std::path::Path;

use crate::helpers::symbol_fixtures::*;
use tessera::hir::{HirType, LinkKind, SymbolKind};
use tessera::ide::{SHOW_BASE_SYMBOL_COMMAND, SHOW_HIDDEN_SYMBOL_COMMAND, code_lenses};

// =============================================================================
// CODE LENSES - APPLICATION OVER LIBRARY
// =============================================================================

#[test]
fn test_lenses_name_the_instantiated_base() {
    let mut lib = gee_library();
    let app = lib.index.add_namespace(None, "App");
    let string_list = lib.index.add_class(Some(app), "StringList", &[]);
    lib.index.add_base(
        string_list,
        HirType::generic(lib.array_list, vec![HirType::builtin("string")]),
    );
    lib.index.set_source(string_list, source(APP_FILE, 3));

    linked_member(
        &mut lib.index,
        string_list,
        "add",
        SymbolKind::Method,
        5,
        (LinkKind::Overrides, lib.add),
    );
    linked_member(
        &mut lib.index,
        string_list,
        "size",
        SymbolKind::Property,
        9,
        (LinkKind::Hides, lib.size),
    );
    linked_member(
        &mut lib.index,
        string_list,
        "foreach",
        SymbolKind::Method,
        12,
        (LinkKind::Implements, lib.foreach),
    );

    let lenses = code_lenses(&lib.index, app_file());
    let titles: Vec<_> = lenses.iter().map(|lens| lens.title.as_str()).collect();
    assert_eq!(
        titles,
        vec![
            "overrides Gee.ArrayList<string>.add()",
            "hides Gee.ArrayList<string>.size",
            "implements Gee.Traversable<string>.foreach()",
        ]
    );

    let commands: Vec<_> = lenses.iter().map(|lens| lens.command()).collect();
    assert_eq!(
        commands,
        vec![
            SHOW_BASE_SYMBOL_COMMAND,
            SHOW_HIDDEN_SYMBOL_COMMAND,
            SHOW_BASE_SYMBOL_COMMAND,
        ]
    );

    let add_lens = &lenses[0];
    assert_eq!(add_lens.span.start.line, 5);
    let uris: Vec<_> = add_lens
        .arguments
        .locations()
        .map(|location| location.uri.to_string())
        .collect();
    assert_eq!(
        uris,
        vec![
            "file:///p/src/app.vala",
            "file:///usr/share/vala/vapi/gee-0.8.vapi",
        ]
    );
    assert_eq!(add_lens.arguments.target.as_ref().unwrap().span.start.line, 210);
}

#[test]
fn test_lens_through_non_generic_intermediate() {
    let mut lib = gee_library();
    let app = lib.index.add_namespace(None, "App");
    let string_list = lib.index.add_class(Some(app), "StringList", &[]);
    lib.index.add_base(
        string_list,
        HirType::generic(lib.array_list, vec![HirType::builtin("string")]),
    );
    let sorted = lib.index.add_class(Some(app), "SortedStrings", &[]);
    lib.index.add_base(sorted, HirType::simple(string_list));
    linked_member(
        &mut lib.index,
        sorted,
        "add",
        SymbolKind::Method,
        20,
        (LinkKind::Overrides, lib.add),
    );

    let lenses = code_lenses(&lib.index, app_file());
    assert_eq!(lenses.len(), 1);
    assert_eq!(lenses[0].title, "overrides Gee.ArrayList<string>.add()");
}

#[test]
fn test_lens_inside_library_namespace_is_unqualified() {
    let mut lib = gee_library();
    let linked_list = lib.index.add_class(Some(lib.gee), "LinkedList", &["G"]);
    lib.index.add_base(
        linked_list,
        HirType::generic(lib.collection, vec![HirType::param(linked_list, 0)]),
    );
    linked_member(
        &mut lib.index,
        linked_list,
        "foreach",
        SymbolKind::Method,
        30,
        (LinkKind::Implements, lib.foreach),
    );

    let lenses = code_lenses(&lib.index, app_file());
    assert_eq!(lenses[0].title, "implements Traversable<G>.foreach()");
}

#[test]
fn test_unrelated_link_target_falls_back_to_bare_name() {
    let mut lib = gee_library();
    let app = lib.index.add_namespace(None, "App");
    let standalone = lib.index.add_class(Some(app), "Standalone", &[]);
    linked_member(
        &mut lib.index,
        standalone,
        "add",
        SymbolKind::Method,
        4,
        (LinkKind::Overrides, lib.add),
    );

    let lenses = code_lenses(&lib.index, app_file());
    assert_eq!(lenses[0].title, "overrides add()");
}

#[test]
fn test_no_lenses_for_other_files() {
    let mut lib = gee_library();
    let app = lib.index.add_namespace(None, "App");
    let string_list = lib.index.add_class(Some(app), "StringList", &[]);
    linked_member(
        &mut lib.index,
        string_list,
        "add",
        SymbolKind::Method,
        5,
        (LinkKind::Overrides, lib.add),
    );

    assert!(code_lenses(&lib.index, Path::new("/p/src/other.vala")).is_empty());
    assert!(code_lenses(&lib.index, Path::new(GEE_VAPI)).is_empty());
}
