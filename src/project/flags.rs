//! The project flags file.
//!
//! A flags file holds extra compiler arguments as one shell-quoted string,
//! e.g. `--pkg gio-2.0 -D 'FEATURE X' # trailing comment`. [`FlagsFile`]
//! parses it once at load time, then keeps it current from a change stream.
//! A reload that fails keeps the previous argument list.

use std::path::{Path, PathBuf};
use std::sync::{Arc, Weak};
use std::sync::mpsc::RecvTimeoutError;
use std::thread::{self, JoinHandle};
use std::time::Duration;

use parking_lot::RwLock;
use tokio_util::sync::CancellationToken;

use super::error::{FlagsError, ProjectError};
use super::source::FileSource;

/// How often an idle watcher thread checks whether it should stop.
const WATCH_TICK: Duration = Duration::from_millis(50);

/// A watched flags file and its most recent successfully parsed arguments.
pub struct FlagsFile {
    path: PathBuf,
    source: Arc<dyn FileSource>,
    args: RwLock<Arc<[String]>>,
    stop: CancellationToken,
}

impl std::fmt::Debug for FlagsFile {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FlagsFile")
            .field("path", &self.path)
            .field("args", &*self.args.read())
            .finish()
    }
}

impl FlagsFile {
    /// Read and parse the flags file.
    ///
    /// Errors here are fatal to project initialization and are returned as-is.
    pub fn load(
        source: Arc<dyn FileSource>,
        path: impl Into<PathBuf>,
    ) -> Result<Arc<Self>, ProjectError> {
        let path = path.into();
        let args = read_args(source.as_ref(), &path)?;
        tracing::debug!("Loaded {} flag(s) from {}", args.len(), path.display());
        Ok(Arc::new(Self {
            path,
            source,
            args: RwLock::new(args.into()),
            stop: CancellationToken::new(),
        }))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Snapshot of the current argument list.
    pub fn args(&self) -> Arc<[String]> {
        Arc::clone(&*self.args.read())
    }

    /// Re-read the file and swap in the new arguments.
    ///
    /// Returns `true` if the list was replaced. On failure the previous list
    /// stays in effect and the error is logged.
    pub fn reload(&self) -> bool {
        match read_args(self.source.as_ref(), &self.path) {
            Ok(args) => {
                tracing::debug!(
                    "Reloaded {} flag(s) from {}",
                    args.len(),
                    self.path.display()
                );
                *self.args.write() = args.into();
                true
            }
            Err(e) => {
                tracing::warn!("Keeping previous flags: {}", e);
                false
            }
        }
    }

    /// Start a thread that reloads the flags on every change event.
    ///
    /// The thread exits when the event stream closes, after
    /// [`FlagsFile::stop_watching`], or once the `FlagsFile` is dropped.
    pub fn watch(self: &Arc<Self>) -> Result<JoinHandle<()>, ProjectError> {
        let events = self
            .source
            .watch(&self.path, &self.stop)
            .map_err(|e| ProjectError::io(&self.path, e))?;
        let flags: Weak<Self> = Arc::downgrade(self);
        let stop = self.stop.clone();

        thread::Builder::new()
            .name("flags-watcher".to_string())
            .spawn(move || {
                while !stop.is_cancelled() {
                    match events.recv_timeout(WATCH_TICK) {
                        Ok(event) => {
                            let Some(flags) = flags.upgrade() else {
                                break;
                            };
                            tracing::trace!("Flags file event: {:?}", event);
                            flags.reload();
                        }
                        Err(RecvTimeoutError::Timeout) => {}
                        Err(RecvTimeoutError::Disconnected) => break,
                    }
                }
                tracing::trace!("Flags watcher stopped");
            })
            .map_err(|e| ProjectError::io(&self.path, e))
    }

    /// Stop every watcher started by [`FlagsFile::watch`], including the
    /// source's own subscription. The current arguments stay available.
    pub fn stop_watching(&self) {
        self.stop.cancel();
    }
}

impl Drop for FlagsFile {
    fn drop(&mut self) {
        self.stop.cancel();
    }
}

fn read_args(source: &dyn FileSource, path: &Path) -> Result<Vec<String>, ProjectError> {
    let bytes = source
        .load_bytes(path)
        .map_err(|e| ProjectError::io(path, e))?;
    let text = String::from_utf8(bytes).map_err(|_| ProjectError::Flags {
        path: path.to_path_buf(),
        source: FlagsError::InvalidUtf8,
    })?;
    split_args(&text).map_err(|source| ProjectError::Flags {
        path: path.to_path_buf(),
        source,
    })
}

/// Split a shell-quoted string into arguments.
///
/// Supports single quotes (literal), double quotes (with `\"`, `\\`, `\$`
/// and `` \` `` escapes), backslash escapes outside quotes, and `#` comments
/// that start at a token boundary.
pub fn split_args(text: &str) -> Result<Vec<String>, FlagsError> {
    let mut args = Vec::new();
    let mut current = String::new();
    let mut in_token = false;
    let mut chars = text.char_indices().peekable();

    while let Some((offset, c)) = chars.next() {
        match c {
            c if c.is_whitespace() => {
                if in_token {
                    args.push(std::mem::take(&mut current));
                    in_token = false;
                }
            }
            '#' if !in_token => {
                for (_, c) in chars.by_ref() {
                    if c == '\n' {
                        break;
                    }
                }
            }
            '\\' => match chars.next() {
                // Escaped newline is a line continuation.
                Some((_, '\n')) => {}
                Some((_, escaped)) => {
                    in_token = true;
                    current.push(escaped);
                }
                None => return Err(FlagsError::TrailingBackslash),
            },
            '\'' => {
                in_token = true;
                loop {
                    match chars.next() {
                        Some((_, '\'')) => break,
                        Some((_, c)) => current.push(c),
                        None => {
                            return Err(FlagsError::UnterminatedQuote { quote: '\'', offset });
                        }
                    }
                }
            }
            '"' => {
                in_token = true;
                loop {
                    match chars.next() {
                        Some((_, '"')) => break,
                        Some((_, '\\')) => match chars.peek() {
                            Some(&(_, escaped @ ('"' | '\\' | '$' | '`'))) => {
                                current.push(escaped);
                                chars.next();
                            }
                            Some(&(_, '\n')) => {
                                chars.next();
                            }
                            _ => current.push('\\'),
                        },
                        Some((_, c)) => current.push(c),
                        None => {
                            return Err(FlagsError::UnterminatedQuote { quote: '"', offset });
                        }
                    }
                }
            }
            c => {
                in_token = true;
                current.push(c);
            }
        }
    }

    if in_token {
        args.push(current);
    }
    Ok(args)
}
