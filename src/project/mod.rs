//! Project management: build targets, open-file tracking, flags configuration.
//!
//! ## Key Types
//!
//! - [`CompilationRegistry`]: Active build targets and the open files keeping them alive
//! - [`BuildTarget`] / [`TargetFactory`]: The compilation-unit abstraction
//! - [`SourceCompilation`]: The default, [`FileSource`]-backed build target
//! - [`FlagsFile`]: Watched flags file feeding new targets
//! - [`ProjectHost`]: Wires the above together for one project root

mod compilation;
mod error;
mod flags;
mod host;
mod registry;
mod source;
mod target;

pub use compilation::{BuildOutput, SourceCompilation, SourceCompilationFactory};
pub use error::{FlagsError, ProjectError};
pub use flags::{FlagsFile, split_args};
pub use host::ProjectHost;
pub use registry::{CompilationRegistry, OpenTargets, RegistryConfig};
pub use source::{DiskFileSource, FileEvent, FileSource, MemoryFileSource};
pub use target::{BuildTarget, ContentOverrides, InputFile, TargetFactory, TargetHandle, TargetId};
