//! Compilation registry: which build targets exist and who keeps them alive.
//!
//! Every editor `open` either attaches to the targets that already contain
//! the file or creates, builds and registers a fresh one. Each open adds one
//! reference on a (target, input file) pair and each `close` removes one; a
//! target disappears once none of its inputs is referenced.
//!
//! ## Concurrency
//!
//! All state lives behind one mutex. Building happens outside of it, so
//! opens of unrelated files proceed in parallel, while a file that is being
//! built is marked *pending*: other opens and closes of the same path wait
//! on a condition variable until the build has been registered or discarded.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use indexmap::IndexMap;
use parking_lot::{Condvar, Mutex, MutexGuard};
use rustc_hash::{FxHashMap, FxHashSet};
use tokio_util::sync::CancellationToken;

use super::error::ProjectError;
use super::flags::FlagsFile;
use super::target::{BuildTarget, ContentOverrides, InputFile, TargetFactory, TargetHandle, TargetId};
use crate::base::{FileIdentity, normalize_path};

/// Pairs of (matched input, target) returned by lookups.
pub type OpenTargets = Vec<(InputFile, TargetHandle)>;

/// Static configuration of a [`CompilationRegistry`].
#[derive(Debug, Clone, Default)]
pub struct RegistryConfig {
    /// Project root; relative file identities resolve against it.
    pub root: PathBuf,
    /// Inputs added to every newly created target (e.g. shared `.vapi` files).
    pub baseline_inputs: Vec<PathBuf>,
    /// Shared flags file whose current arguments seed new targets.
    pub flags: Option<Arc<FlagsFile>>,
}

impl RegistryConfig {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            ..Self::default()
        }
    }

    pub fn with_baseline_inputs(mut self, inputs: impl IntoIterator<Item = PathBuf>) -> Self {
        self.baseline_inputs = inputs.into_iter().collect();
        self
    }

    pub fn with_flags(mut self, flags: Arc<FlagsFile>) -> Self {
        self.flags = Some(flags);
        self
    }
}

#[derive(Default)]
struct RegistryState {
    /// Active targets in creation order.
    targets: IndexMap<TargetId, TargetHandle>,
    /// Open reference counts per target and input path.
    open_refs: FxHashMap<TargetId, FxHashMap<PathBuf, usize>>,
    /// Paths whose initial build is in flight.
    pending: FxHashSet<PathBuf>,
    next_id: u64,
}

impl RegistryState {
    fn matching(&self, path: &Path) -> OpenTargets {
        self.targets
            .values()
            .flat_map(|handle| {
                handle
                    .input_files()
                    .iter()
                    .filter(|input| input.path == path)
                    .map(move |input| (input.clone(), handle.clone()))
            })
            .collect()
    }

    fn add_ref(&mut self, id: TargetId, path: &Path) {
        *self
            .open_refs
            .entry(id)
            .or_default()
            .entry(path.to_path_buf())
            .or_insert(0) += 1;
    }

    /// Drop one reference. Returns `false` if none was held.
    fn remove_ref(&mut self, id: TargetId, path: &Path) -> bool {
        let Some(refs) = self.open_refs.get_mut(&id) else {
            return false;
        };
        let Some(count) = refs.get_mut(path) else {
            return false;
        };
        *count -= 1;
        if *count == 0 {
            refs.remove(path);
        }
        true
    }

    fn has_refs(&self, id: TargetId) -> bool {
        self.open_refs.get(&id).is_some_and(|refs| !refs.is_empty())
    }

    fn register(&mut self, target: Box<dyn BuildTarget>, root: &Path) -> TargetHandle {
        let id = TargetId(self.next_id);
        self.next_id += 1;
        let handle = TargetHandle::new(id, target, root);
        self.targets.insert(id, handle.clone());
        handle
    }

    fn unregister(&mut self, id: TargetId) {
        self.targets.shift_remove(&id);
        self.open_refs.remove(&id);
    }
}

/// Tracks active build targets and the open files that keep them alive.
pub struct CompilationRegistry {
    config: RegistryConfig,
    factory: Arc<dyn TargetFactory>,
    state: Mutex<RegistryState>,
    build_finished: Condvar,
}

impl CompilationRegistry {
    pub fn new(config: RegistryConfig, factory: Arc<dyn TargetFactory>) -> Self {
        Self {
            config,
            factory,
            state: Mutex::new(RegistryState::default()),
            build_finished: Condvar::new(),
        }
    }

    pub fn root(&self) -> &Path {
        &self.config.root
    }

    pub fn flags(&self) -> Option<&Arc<FlagsFile>> {
        self.config.flags.as_ref()
    }

    /// All targets containing `file`, in creation order. Never mutates.
    pub fn resolve_open_targets(&self, file: &FileIdentity) -> Result<OpenTargets, ProjectError> {
        let path = file.to_path(&self.config.root)?;
        Ok(self.state.lock().matching(&path))
    }

    /// Open `file`, creating and building a target for it if no existing
    /// target contains it.
    ///
    /// `content` overrides the persisted contents of `file` in a new target.
    /// The build runs before this returns; a target whose first build fails or
    /// is cancelled is never registered and its error is returned.
    pub fn open(
        &self,
        file: &FileIdentity,
        content: Option<String>,
        cancel: &CancellationToken,
    ) -> Result<OpenTargets, ProjectError> {
        let path = file.to_path(&self.config.root)?;

        let mut state = self.lock_settled(&path);
        let existing = state.matching(&path);
        if !existing.is_empty() {
            for (input, handle) in &existing {
                state.add_ref(handle.id(), &input.path);
            }
            return Ok(existing);
        }
        state.pending.insert(path.clone());
        drop(state);

        let built = self.create_target(&path, content, cancel);

        let mut state = self.state.lock();
        state.pending.remove(&path);
        self.build_finished.notify_all();
        let target = built?;

        let handle = state.register(target, &self.config.root);
        tracing::debug!(
            "Registered {} for {} ({} input(s))",
            handle.id(),
            path.display(),
            handle.input_files().len()
        );
        let opened = state.matching(&path);
        if let Some((input, _)) = opened.iter().find(|(_, h)| h.id() == handle.id()) {
            state.add_ref(handle.id(), &input.path);
        }
        Ok(opened)
    }

    /// Close `file`, dropping one reference per target containing it.
    ///
    /// Returns `true` iff at least one target lost its last reference and was
    /// removed.
    pub fn close(&self, file: &FileIdentity) -> Result<bool, ProjectError> {
        let path = file.to_path(&self.config.root)?;

        let mut state = self.lock_settled(&path);
        let matched = state.matching(&path);
        let mut removed = false;
        for (input, handle) in matched {
            if state.remove_ref(handle.id(), &input.path) && !state.has_refs(handle.id()) {
                state.unregister(handle.id());
                tracing::debug!("Removed {} after closing {}", handle.id(), path.display());
                removed = true;
            }
        }
        Ok(removed)
    }

    /// Whether any target holds a reference for `file`.
    pub fn is_open(&self, file: &FileIdentity) -> Result<bool, ProjectError> {
        let path = file.to_path(&self.config.root)?;
        let state = self.state.lock();
        Ok(state
            .open_refs
            .values()
            .any(|refs| refs.contains_key(&path)))
    }

    /// Number of references `target` holds for `file`.
    pub fn open_ref_count(&self, target: TargetId, file: &FileIdentity) -> Result<usize, ProjectError> {
        let path = file.to_path(&self.config.root)?;
        let state = self.state.lock();
        Ok(state
            .open_refs
            .get(&target)
            .and_then(|refs| refs.get(&path))
            .copied()
            .unwrap_or(0))
    }

    /// All active targets, in creation order.
    pub fn targets(&self) -> Vec<TargetHandle> {
        self.state.lock().targets.values().cloned().collect()
    }

    pub fn target_count(&self) -> usize {
        self.state.lock().targets.len()
    }

    /// Lock the state once no initial build of `path` is in flight.
    fn lock_settled(&self, path: &Path) -> MutexGuard<'_, RegistryState> {
        let mut state = self.state.lock();
        while state.pending.contains(path) {
            self.build_finished.wait(&mut state);
        }
        state
    }

    fn create_target(
        &self,
        path: &Path,
        content: Option<String>,
        cancel: &CancellationToken,
    ) -> Result<Box<dyn BuildTarget>, ProjectError> {
        let root = &self.config.root;
        let mut inputs = vec![path.to_path_buf()];
        for baseline in &self.config.baseline_inputs {
            let baseline = normalize_path(baseline, root);
            if !inputs.contains(&baseline) {
                inputs.push(baseline);
            }
        }

        let flags: Arc<[String]> = match &self.config.flags {
            Some(flags) => flags.args(),
            None => Arc::from(Vec::new()),
        };

        let mut overrides = ContentOverrides::default();
        if let Some(content) = content {
            overrides.insert(path.to_path_buf(), Arc::from(content));
        }

        let mut target = self.factory.create(root, &inputs, &flags, overrides)?;
        if cancel.is_cancelled() {
            return Err(ProjectError::Cancelled);
        }
        if let Err(e) = target.build_if_stale(cancel) {
            tracing::debug!("Discarding target for {}: {}", path.display(), e);
            return Err(e);
        }
        // A build may finish normally after cancellation was requested.
        if cancel.is_cancelled() {
            tracing::debug!("Discarding target for {}: cancelled during build", path.display());
            return Err(ProjectError::Cancelled);
        }
        Ok(target)
    }
}
