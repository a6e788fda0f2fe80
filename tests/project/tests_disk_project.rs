//! A project on the local filesystem, observed through [`DiskFileSource`].

use std::fs;
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use crate::helpers::project_helpers::*;
use tessera::ProjectHost;
use tessera::project::DiskFileSource;
use tokio_util::sync::CancellationToken;

fn disk_source() -> Arc<DiskFileSource> {
    Arc::new(DiskFileSource::new().with_poll_interval(Duration::from_millis(10)))
}

#[test]
fn test_disk_project_rebuilds_only_on_change() {
    let dir = tempfile::tempdir().unwrap();
    let root = dir.path();
    fs::create_dir_all(root.join("src")).unwrap();
    fs::write(root.join("flags"), "--pkg glib-2.0").unwrap();
    fs::write(root.join("src/main.vala"), "void main () {}").unwrap();

    let host = ProjectHost::load(root, disk_source(), Some(Path::new("flags")), Vec::new()).unwrap();
    let registry = host.registry();

    let opened = open(registry, "src/main.vala");
    let handle = &opened[0].1;
    assert_eq!(handle.generation(), 1);

    let cancel = CancellationToken::new();
    assert!(!handle.lock().build_if_stale(&cancel).unwrap());

    fs::write(root.join("src/main.vala"), "void main () { print (\"hi\"); }").unwrap();
    assert!(handle.lock().build_if_stale(&cancel).unwrap());
    assert_eq!(handle.generation(), 2);

    assert!(close(registry, "src/main.vala"));
}

#[test]
fn test_disk_flags_file_is_watched() {
    let dir = tempfile::tempdir().unwrap();
    let root = dir.path();
    fs::write(root.join("flags"), "--pkg glib-2.0").unwrap();

    let host = ProjectHost::load(root, disk_source(), Some(Path::new("flags")), Vec::new()).unwrap();
    let flags = host.flags().unwrap();
    assert!(host.is_watching());
    assert_eq!(flags.path(), root.join("flags"));

    // Give the poller a distinct mtime to observe.
    std::thread::sleep(Duration::from_millis(20));
    fs::write(root.join("flags"), "--pkg gee-0.8 --vapidir=vapi").unwrap();
    wait_for_args(flags, &["--pkg", "gee-0.8", "--vapidir=vapi"]);

    // Removal keeps the last good arguments.
    fs::remove_file(root.join("flags")).unwrap();
    std::thread::sleep(Duration::from_millis(50));
    assert_eq!(&*flags.args(), ["--pkg", "gee-0.8", "--vapidir=vapi"]);
}
