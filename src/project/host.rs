//! ProjectHost: one project root with its flags file and compilation registry.

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::thread::JoinHandle;

use super::compilation::SourceCompilationFactory;
use super::error::ProjectError;
use super::flags::FlagsFile;
use super::registry::{CompilationRegistry, RegistryConfig};
use super::source::FileSource;
use super::target::TargetFactory;
use crate::base::normalize_path;

/// Owns the flags file (and its watcher thread) and the registry that reads it.
pub struct ProjectHost {
    registry: CompilationRegistry,
    flags: Option<Arc<FlagsFile>>,
    watcher: Option<JoinHandle<()>>,
}

impl ProjectHost {
    /// Load a project whose targets are [`SourceCompilation`](super::SourceCompilation)s.
    ///
    /// A relative `flags_file` resolves against `root`. Failing to read or
    /// parse it is an error; later changes are picked up by a watcher.
    pub fn load(
        root: impl Into<PathBuf>,
        source: Arc<dyn FileSource>,
        flags_file: Option<&Path>,
        baseline_inputs: Vec<PathBuf>,
    ) -> Result<Self, ProjectError> {
        let factory = Arc::new(SourceCompilationFactory::new(Arc::clone(&source)));
        Self::load_with_factory(root, source, factory, flags_file, baseline_inputs)
    }

    /// Like [`ProjectHost::load`] with a custom target factory.
    pub fn load_with_factory(
        root: impl Into<PathBuf>,
        source: Arc<dyn FileSource>,
        factory: Arc<dyn TargetFactory>,
        flags_file: Option<&Path>,
        baseline_inputs: Vec<PathBuf>,
    ) -> Result<Self, ProjectError> {
        let root = root.into();
        let mut config = RegistryConfig::new(&root).with_baseline_inputs(baseline_inputs);

        let (flags, watcher) = match flags_file {
            Some(path) => {
                let flags = FlagsFile::load(source, normalize_path(path, &root))?;
                let watcher = flags.watch()?;
                config = config.with_flags(Arc::clone(&flags));
                (Some(flags), Some(watcher))
            }
            None => (None, None),
        };

        tracing::debug!("Loaded project at {}", root.display());
        Ok(Self {
            registry: CompilationRegistry::new(config, factory),
            flags,
            watcher,
        })
    }

    pub fn registry(&self) -> &CompilationRegistry {
        &self.registry
    }

    pub fn flags(&self) -> Option<&Arc<FlagsFile>> {
        self.flags.as_ref()
    }

    /// Whether a flags watcher thread is still running.
    pub fn is_watching(&self) -> bool {
        self.watcher
            .as_ref()
            .is_some_and(|watcher| !watcher.is_finished())
    }
}

impl Drop for ProjectHost {
    fn drop(&mut self) {
        if let Some(flags) = &self.flags {
            flags.stop_watching();
        }
        if let Some(watcher) = self.watcher.take() {
            if watcher.join().is_err() {
                tracing::warn!("Flags watcher panicked");
            }
        }
    }
}
