//! Source locations handed to the client as lens command arguments.

use std::path::PathBuf;

use thiserror::Error;
use url::Url;

use crate::base::Span;
use crate::hir::SourceRef;

/// A file URI plus range, the payload of a jump-to-symbol command.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct LensLocation {
    pub uri: Url,
    pub span: Span,
}

/// Why a symbol's declaration could not be turned into a [`LensLocation`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LocationError {
    #[error("symbol '{0}' has no source reference")]
    NoSource(String),

    #[error("cannot express {} as a file URI", .0.display())]
    NotAbsolute(PathBuf),
}

impl LensLocation {
    pub fn from_source(source: &SourceRef) -> Result<Self, LocationError> {
        let uri = Url::from_file_path(&source.file)
            .map_err(|()| LocationError::NotAbsolute(source.file.clone()))?;
        Ok(Self {
            uri,
            span: source.span,
        })
    }
}
