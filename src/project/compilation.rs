//! Source-backed build targets.
//!
//! [`SourceCompilation`] is the default [`BuildTarget`]: a build loads every
//! input (from its content override or the [`FileSource`]) and publishes a
//! new [`BuildOutput`] only when some input's contents changed. Semantic
//! analysis of the output belongs to the front end.

use std::hash::{Hash, Hasher};
use std::path::{Path, PathBuf};
use std::sync::Arc;

use rustc_hash::{FxHashMap, FxHasher};
use tokio_util::sync::CancellationToken;

use super::error::ProjectError;
use super::source::FileSource;
use super::target::{BuildTarget, ContentOverrides, InputFile, TargetFactory};

/// The product of one successful build.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BuildOutput {
    /// Generation that produced this output (starts at 1).
    pub generation: u64,
    /// Loaded input contents, in input order.
    pub sources: Vec<(PathBuf, Arc<str>)>,
}

/// A build target whose inputs are loaded through a [`FileSource`].
pub struct SourceCompilation {
    inputs: Vec<InputFile>,
    flags: Vec<String>,
    overrides: ContentOverrides,
    source: Arc<dyn FileSource>,
    fingerprints: FxHashMap<PathBuf, u64>,
    output: Option<BuildOutput>,
}

impl SourceCompilation {
    pub fn new(
        inputs: &[PathBuf],
        flags: &[String],
        overrides: ContentOverrides,
        source: Arc<dyn FileSource>,
    ) -> Self {
        let inputs = inputs
            .iter()
            .map(|path| InputFile::new(path.clone(), overrides.contains_key(path)))
            .collect();
        Self {
            inputs,
            flags: flags.to_vec(),
            overrides,
            source,
            fingerprints: FxHashMap::default(),
            output: None,
        }
    }

    /// Output of the latest successful build, if any.
    pub fn output(&self) -> Option<&BuildOutput> {
        self.output.as_ref()
    }

    fn load(&self, path: &Path) -> Result<Arc<str>, ProjectError> {
        if let Some(text) = self.overrides.get(path) {
            return Ok(Arc::clone(text));
        }
        let bytes = self
            .source
            .load_bytes(path)
            .map_err(|e| ProjectError::io(path, e))?;
        String::from_utf8(bytes).map(Arc::from).map_err(|e| {
            ProjectError::io(
                path,
                std::io::Error::new(std::io::ErrorKind::InvalidData, e),
            )
        })
    }
}

fn fingerprint(text: &str) -> u64 {
    let mut hasher = FxHasher::default();
    text.hash(&mut hasher);
    hasher.finish()
}

impl BuildTarget for SourceCompilation {
    fn input_files(&self) -> &[InputFile] {
        &self.inputs
    }

    fn flags(&self) -> &[String] {
        &self.flags
    }

    fn generation(&self) -> u64 {
        self.output.as_ref().map_or(0, |output| output.generation)
    }

    fn build_if_stale(&mut self, cancel: &CancellationToken) -> Result<bool, ProjectError> {
        let mut sources = Vec::with_capacity(self.inputs.len());
        let mut fingerprints = FxHashMap::default();

        for input in &self.inputs {
            if cancel.is_cancelled() {
                return Err(ProjectError::Cancelled);
            }
            let text = self.load(&input.path)?;
            fingerprints.insert(input.path.clone(), fingerprint(&text));
            sources.push((input.path.clone(), text));
        }

        if self.output.is_some() && fingerprints == self.fingerprints {
            return Ok(false);
        }

        let generation = self.generation() + 1;
        tracing::debug!(
            "Built {} input(s), generation {}",
            sources.len(),
            generation
        );
        self.fingerprints = fingerprints;
        self.output = Some(BuildOutput {
            generation,
            sources,
        });
        Ok(true)
    }
}

/// Creates a [`SourceCompilation`] for each new target.
pub struct SourceCompilationFactory {
    source: Arc<dyn FileSource>,
}

impl SourceCompilationFactory {
    pub fn new(source: Arc<dyn FileSource>) -> Self {
        Self { source }
    }
}

impl TargetFactory for SourceCompilationFactory {
    fn create(
        &self,
        _root: &Path,
        inputs: &[PathBuf],
        flags: &[String],
        overrides: ContentOverrides,
    ) -> Result<Box<dyn BuildTarget>, ProjectError> {
        Ok(Box::new(SourceCompilation::new(
            inputs,
            flags,
            overrides,
            Arc::clone(&self.source),
        )))
    }
}
