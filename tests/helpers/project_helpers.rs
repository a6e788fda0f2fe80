//! Helpers for building projects over in-memory or on-disk sources.

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::{Duration, Instant};

use tessera::project::{FlagsFile, MemoryFileSource, OpenTargets, ProjectHost};
use tessera::{CompilationRegistry, FileIdentity};
use tokio_util::sync::CancellationToken;

/// In-memory source pre-filled with `(path, contents)` pairs.
pub fn memory_source(files: &[(&str, &str)]) -> Arc<MemoryFileSource> {
    let source = Arc::new(MemoryFileSource::new());
    for (path, text) in files {
        source.write(*path, *text);
    }
    source
}

/// Host rooted at `/p` with a flags file at `/p/flags` and the given baseline.
pub fn host_with_flags(source: &Arc<MemoryFileSource>, baseline: &[&str]) -> ProjectHost {
    ProjectHost::load(
        "/p",
        source.clone(),
        Some(Path::new("flags")),
        baseline.iter().map(PathBuf::from).collect(),
    )
    .expect("project should load")
}

pub fn open(registry: &CompilationRegistry, raw: &str) -> OpenTargets {
    registry
        .open(&FileIdentity::parse(raw), None, &CancellationToken::new())
        .expect("open should succeed")
}

pub fn close(registry: &CompilationRegistry, raw: &str) -> bool {
    registry
        .close(&FileIdentity::parse(raw))
        .expect("close should succeed")
}

/// Poll until the flags file reports `expected`, failing after five seconds.
pub fn wait_for_args(flags: &FlagsFile, expected: &[&str]) {
    let deadline = Instant::now() + Duration::from_secs(5);
    loop {
        let args = flags.args();
        if args.iter().map(String::as_str).eq(expected.iter().copied()) {
            return;
        }
        assert!(
            Instant::now() < deadline,
            "flags never became {:?}, still {:?}",
            expected,
            args
        );
        std::thread::sleep(Duration::from_millis(10));
    }
}
