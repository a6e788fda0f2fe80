//! Build-target abstraction.
//!
//! A build target is one compilation unit: an ordered list of input files,
//! extra flags, and the output of its latest build. The compiler front end
//! provides targets through a [`TargetFactory`]; the registry only ever
//! creates them, builds them, and drops them.

use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use parking_lot::{Mutex, MutexGuard};
use rustc_hash::FxHashMap;
use tokio_util::sync::CancellationToken;

use super::error::ProjectError;
use crate::base::normalize_path;

/// In-memory contents that shadow files on disk (unsaved editor buffers).
pub type ContentOverrides = FxHashMap<PathBuf, Arc<str>>;

/// One input of a build target.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct InputFile {
    /// Path of the input.
    pub path: PathBuf,
    /// Whether the contents come from a [`ContentOverrides`] entry rather than the file source.
    pub from_override: bool,
}

impl InputFile {
    pub fn new(path: impl Into<PathBuf>, from_override: bool) -> Self {
        Self {
            path: path.into(),
            from_override,
        }
    }
}

/// A unit of compilation.
pub trait BuildTarget: Send {
    /// The ordered inputs of this target. Fixed for the target's lifetime.
    fn input_files(&self) -> &[InputFile];

    /// The extra arguments the target was created with.
    fn flags(&self) -> &[String];

    /// Number of completed builds that produced new output.
    fn generation(&self) -> u64;

    /// Build if any input changed since the last build.
    ///
    /// Returns `Ok(true)` when a new generation was produced. Implementations
    /// must return [`ProjectError::Cancelled`] once `cancel` fires and leave
    /// their previous output untouched on any error.
    fn build_if_stale(&mut self, cancel: &CancellationToken) -> Result<bool, ProjectError>;
}

/// Creates build targets for newly opened files.
pub trait TargetFactory: Send + Sync {
    fn create(
        &self,
        root: &Path,
        inputs: &[PathBuf],
        flags: &[String],
        overrides: ContentOverrides,
    ) -> Result<Box<dyn BuildTarget>, ProjectError>;
}

/// Registry-assigned identity of a build target. Never reused.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TargetId(pub(crate) u64);

impl TargetId {
    pub fn index(self) -> u64 {
        self.0
    }
}

impl fmt::Display for TargetId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "target#{}", self.0)
    }
}

/// A shared handle to a registered build target.
///
/// Cloning is cheap. The input list is captured (normalized) at registration
/// so lookups never need to lock the target itself.
#[derive(Clone)]
pub struct TargetHandle {
    id: TargetId,
    inputs: Arc<[InputFile]>,
    target: Arc<Mutex<Box<dyn BuildTarget>>>,
}

impl TargetHandle {
    pub(crate) fn new(id: TargetId, target: Box<dyn BuildTarget>, root: &Path) -> Self {
        let inputs = target
            .input_files()
            .iter()
            .map(|input| InputFile::new(normalize_path(&input.path, root), input.from_override))
            .collect();
        Self {
            id,
            inputs,
            target: Arc::new(Mutex::new(target)),
        }
    }

    pub fn id(&self) -> TargetId {
        self.id
    }

    /// Normalized inputs of the target, in target order.
    pub fn input_files(&self) -> &[InputFile] {
        &self.inputs
    }

    /// Whether `path` (normalized) is one of the target's inputs.
    pub fn contains(&self, path: &Path) -> bool {
        self.inputs.iter().any(|input| input.path == path)
    }

    /// Lock the target for building or inspection.
    pub fn lock(&self) -> MutexGuard<'_, Box<dyn BuildTarget>> {
        self.target.lock()
    }

    pub fn generation(&self) -> u64 {
        self.lock().generation()
    }
}

impl PartialEq for TargetHandle {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for TargetHandle {}

impl fmt::Debug for TargetHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TargetHandle")
            .field("id", &self.id)
            .field("inputs", &self.inputs)
            .finish()
    }
}
