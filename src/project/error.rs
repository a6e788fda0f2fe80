//! Error types for project operations.

use std::path::PathBuf;

use thiserror::Error;

use crate::base::FileIdentityError;

/// Errors that can occur while managing build targets and project configuration.
#[derive(Debug, Error)]
pub enum ProjectError {
    /// IO error while reading a source or configuration file.
    #[error("IO error on {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The requested file identity cannot be mapped to a local path.
    #[error(transparent)]
    InvalidUri(#[from] FileIdentityError),

    /// The flags file could not be parsed.
    #[error("Invalid flags in {}: {source}", path.display())]
    Flags {
        path: PathBuf,
        #[source]
        source: FlagsError,
    },

    /// The build target reported a failure.
    #[error("Build failed: {message}")]
    Build { message: String },

    /// The build was aborted through its cancellation token.
    #[error("Build cancelled")]
    Cancelled,
}

impl ProjectError {
    /// Create an IO error tagged with the path being accessed.
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    /// Create a build failure.
    pub fn build(message: impl Into<String>) -> Self {
        Self::Build {
            message: message.into(),
        }
    }
}

/// Errors raised while splitting a flags file into arguments.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FlagsError {
    /// A quoted token was not closed before end of input.
    #[error("unterminated {quote} quote starting at byte {offset}")]
    UnterminatedQuote { quote: char, offset: usize },

    /// The input ends with an escaping backslash.
    #[error("trailing backslash at end of input")]
    TrailingBackslash,

    /// The file contents are not valid UTF-8.
    #[error("flags file is not valid UTF-8")]
    InvalidUtf8,
}
