//! File-content providers.
//!
//! Build targets and the flags file never touch the filesystem directly; they
//! go through a [`FileSource`], which can read bytes and report changes.
//! [`DiskFileSource`] is the production implementation, [`MemoryFileSource`]
//! backs tests and unsaved-buffer scenarios.

use std::io;
use std::path::{Path, PathBuf};
use std::sync::mpsc::{self, Receiver, Sender};
use std::thread;
use std::time::{Duration, SystemTime};

use parking_lot::{Mutex, RwLock};
use rustc_hash::FxHashMap;
use tokio_util::sync::CancellationToken;

/// A change notification for a watched path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FileEvent {
    /// The file was created or its contents changed.
    Changed(PathBuf),
    /// The file no longer exists.
    Removed(PathBuf),
}

impl FileEvent {
    pub fn path(&self) -> &Path {
        match self {
            Self::Changed(path) | Self::Removed(path) => path,
        }
    }
}

/// Reads file contents and streams change events.
pub trait FileSource: Send + Sync {
    /// Read the full contents of `path`.
    fn load_bytes(&self, path: &Path) -> io::Result<Vec<u8>>;

    /// Subscribe to changes of `path` until `stop` is cancelled.
    ///
    /// The stream ends (the receiver disconnects) once the source notices
    /// `stop` or otherwise stops watching.
    fn watch(&self, path: &Path, stop: &CancellationToken) -> io::Result<Receiver<FileEvent>>;
}

// ============================================================================
// DISK
// ============================================================================

/// Reads from the local filesystem and detects changes by polling mtimes.
#[derive(Debug, Clone)]
pub struct DiskFileSource {
    poll_interval: Duration,
}

impl Default for DiskFileSource {
    fn default() -> Self {
        Self::new()
    }
}

impl DiskFileSource {
    pub fn new() -> Self {
        Self {
            poll_interval: Duration::from_millis(500),
        }
    }

    /// Use a custom polling interval for [`FileSource::watch`].
    pub fn with_poll_interval(mut self, poll_interval: Duration) -> Self {
        self.poll_interval = poll_interval;
        self
    }

    fn modified(path: &Path) -> Option<SystemTime> {
        std::fs::metadata(path).and_then(|m| m.modified()).ok()
    }
}

impl FileSource for DiskFileSource {
    fn load_bytes(&self, path: &Path) -> io::Result<Vec<u8>> {
        std::fs::read(path)
    }

    fn watch(&self, path: &Path, stop: &CancellationToken) -> io::Result<Receiver<FileEvent>> {
        let (tx, rx) = mpsc::channel();
        let path = path.to_path_buf();
        let interval = self.poll_interval;
        let stop = stop.clone();
        let mut last = Self::modified(&path);

        thread::Builder::new()
            .name(format!("watch {}", path.display()))
            .spawn(move || {
                while !stop.is_cancelled() {
                    thread::sleep(interval);
                    if stop.is_cancelled() {
                        break;
                    }
                    let current = Self::modified(&path);
                    if current == last {
                        continue;
                    }
                    let event = match current {
                        Some(_) => FileEvent::Changed(path.clone()),
                        None => FileEvent::Removed(path.clone()),
                    };
                    last = current;
                    if tx.send(event).is_err() {
                        tracing::trace!("Watcher for {} dropped", path.display());
                        break;
                    }
                }
                tracing::trace!("Stopped polling {}", path.display());
            })?;

        Ok(rx)
    }
}

// ============================================================================
// MEMORY
// ============================================================================

/// An in-memory file store. Writes notify every watcher of the written path.
#[derive(Debug, Default)]
pub struct MemoryFileSource {
    files: RwLock<FxHashMap<PathBuf, Vec<u8>>>,
    watchers: Mutex<Vec<(PathBuf, Sender<FileEvent>, CancellationToken)>>,
}

impl MemoryFileSource {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store `contents` at `path` and notify watchers.
    pub fn write(&self, path: impl Into<PathBuf>, contents: impl Into<Vec<u8>>) {
        let path = path.into();
        self.files.write().insert(path.clone(), contents.into());
        self.notify(FileEvent::Changed(path));
    }

    /// Delete `path` and notify watchers. Returns whether the file existed.
    pub fn remove(&self, path: &Path) -> bool {
        let existed = self.files.write().remove(path).is_some();
        if existed {
            self.notify(FileEvent::Removed(path.to_path_buf()));
        }
        existed
    }

    /// Drop every watcher, ending their event streams.
    pub fn close_watchers(&self) {
        self.watchers.lock().clear();
    }

    /// Number of watchers whose stop token has not fired.
    pub fn watcher_count(&self) -> usize {
        let mut watchers = self.watchers.lock();
        watchers.retain(|(_, _, stop)| !stop.is_cancelled());
        watchers.len()
    }

    fn notify(&self, event: FileEvent) {
        self.watchers.lock().retain(|(watched, tx, stop)| {
            !stop.is_cancelled() && (watched != event.path() || tx.send(event.clone()).is_ok())
        });
    }
}

impl FileSource for MemoryFileSource {
    fn load_bytes(&self, path: &Path) -> io::Result<Vec<u8>> {
        self.files.read().get(path).cloned().ok_or_else(|| {
            io::Error::new(
                io::ErrorKind::NotFound,
                format!("{} not found", path.display()),
            )
        })
    }

    fn watch(&self, path: &Path, stop: &CancellationToken) -> io::Result<Receiver<FileEvent>> {
        let (tx, rx) = mpsc::channel();
        self.watchers
            .lock()
            .push((path.to_path_buf(), tx, stop.clone()));
        Ok(rx)
    }
}
