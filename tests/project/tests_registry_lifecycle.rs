//! Open/close lifecycle through a [`ProjectHost`](tessera::ProjectHost).

use std::path::Path;

use crate::helpers::project_helpers::*;
use tessera::FileIdentity;
use tessera::project::ProjectError;
use tokio_util::sync::CancellationToken;

const BASELINE: &[&str] = &["vapi/config.vapi"];

fn project_files() -> Vec<(&'static str, &'static str)> {
    vec![
        ("/p/flags", "--pkg gio-2.0 # io\n--target-glib=2.70"),
        ("/p/vapi/config.vapi", "namespace Config {}"),
        ("/p/src/main.vala", "void main () {}"),
        ("/p/src/window.vala", "class Window {}"),
    ]
}

// =============================================================================
// LIFECYCLE
// =============================================================================

#[test]
fn test_editing_session_lifecycle() {
    let source = memory_source(&project_files());
    let host = host_with_flags(&source, BASELINE);
    let registry = host.registry();

    // Opening two sources creates one target each, sharing the baseline.
    let main = open(registry, "file:///p/src/main.vala");
    let window = open(registry, "src/window.vala");
    assert_eq!(registry.target_count(), 2);
    let main_inputs: Vec<_> = main[0]
        .1
        .input_files()
        .iter()
        .map(|input| input.path.clone())
        .collect();
    assert_eq!(
        main_inputs,
        vec![
            Path::new("/p/src/main.vala").to_path_buf(),
            Path::new("/p/vapi/config.vapi").to_path_buf(),
        ]
    );
    assert_eq!(
        main[0].1.lock().flags(),
        ["--pkg", "gio-2.0", "--target-glib=2.70"]
    );

    // The shared baseline resolves to both targets without creating one.
    let vapi = open(registry, "/p/vapi/config.vapi");
    assert_eq!(vapi.len(), 2);
    assert_eq!(registry.target_count(), 2);

    // Closing main keeps its target alive through the open baseline.
    assert!(!close(registry, "/p/src/main.vala"));
    assert_eq!(registry.target_count(), 2);

    // Closing the baseline now releases main's target only.
    assert!(close(registry, "/p/vapi/config.vapi"));
    let remaining: Vec<_> = registry.targets().iter().map(|t| t.id()).collect();
    assert_eq!(remaining, vec![window[0].1.id()]);

    assert!(close(registry, "/p/src/window.vala"));
    assert_eq!(registry.target_count(), 0);
    assert!(!registry.is_open(&FileIdentity::parse("/p/src/window.vala")).unwrap());

    source.close_watchers();
}

#[test]
fn test_unsaved_buffer_is_built_from_override() {
    let source = memory_source(&project_files());
    let host = host_with_flags(&source, &[]);
    let registry = host.registry();

    let opened = registry
        .open(
            &FileIdentity::parse("/p/src/scratch.vala"),
            Some("class Scratch {}".to_string()),
            &CancellationToken::new(),
        )
        .unwrap();

    let (input, handle) = &opened[0];
    assert!(input.from_override);
    assert_eq!(handle.generation(), 1);

    source.close_watchers();
}

#[test]
fn test_open_of_missing_file_reports_io_error() {
    let source = memory_source(&project_files());
    let host = host_with_flags(&source, BASELINE);

    let result = host.registry().open(
        &FileIdentity::parse("/p/src/missing.vala"),
        None,
        &CancellationToken::new(),
    );

    assert!(
        matches!(result, Err(ProjectError::Io { ref path, .. }) if path == Path::new("/p/src/missing.vala"))
    );
    assert_eq!(host.registry().target_count(), 0);

    source.close_watchers();
}

#[test]
fn test_flags_reload_applies_to_targets_created_afterwards() {
    let source = memory_source(&project_files());
    let host = host_with_flags(&source, &[]);
    let registry = host.registry();
    let flags = host.flags().unwrap();

    let main = open(registry, "/p/src/main.vala");

    source.write("/p/flags", "--pkg gtk4 'two words'");
    wait_for_args(flags, &["--pkg", "gtk4", "two words"]);

    // A broken edit keeps the last good arguments.
    source.write("/p/flags", "--pkg \"unterminated");
    source.write("/p/flags", "--pkg gtk4 'two words'");
    wait_for_args(flags, &["--pkg", "gtk4", "two words"]);

    let window = open(registry, "/p/src/window.vala");
    assert_eq!(
        main[0].1.lock().flags(),
        ["--pkg", "gio-2.0", "--target-glib=2.70"]
    );
    assert_eq!(window[0].1.lock().flags(), ["--pkg", "gtk4", "two words"]);

    source.close_watchers();
}
