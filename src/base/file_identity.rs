//! Editor-visible file identities.
//!
//! Clients refer to files either by `file://` URI or by plain path, and the
//! same file may arrive through differently encoded URIs
//! (`file:///a%20b.vala` vs `file:///a b.vala`). Everything that compares
//! files goes through [`FileIdentity::to_path`], which yields one normalized
//! absolute path per file.

use std::fmt;
use std::path::{Component, Path, PathBuf};

use thiserror::Error;
use url::Url;

/// Errors produced while turning a [`FileIdentity`] into a path.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FileIdentityError {
    /// The URI could not be parsed at all.
    #[error("Malformed URI '{uri}': {message}")]
    Malformed { uri: String, message: String },

    /// The URI parsed but does not name a local file.
    #[error("URI '{0}' does not refer to a local file")]
    NotAFile(String),
}

/// A file reference as supplied by an editor request.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum FileIdentity {
    /// A URI such as `file:///home/me/src/main.vala`.
    Uri(String),
    /// A filesystem path, absolute or relative to the project root.
    Path(PathBuf),
}

impl FileIdentity {
    /// Classify a raw string: anything with a URI scheme is a URI, the rest is a path.
    pub fn parse(raw: &str) -> Self {
        if raw.starts_with("file:") || raw.contains("://") {
            Self::Uri(raw.to_string())
        } else {
            Self::Path(PathBuf::from(raw))
        }
    }

    /// Resolve to a normalized absolute path.
    ///
    /// Relative paths are joined onto `root`. Percent-encoding in URIs is
    /// decoded and `.`/`..` components are removed lexically, so the file
    /// does not need to exist.
    pub fn to_path(&self, root: &Path) -> Result<PathBuf, FileIdentityError> {
        match self {
            Self::Path(path) => Ok(normalize_path(path, root)),
            Self::Uri(raw) => {
                let url = Url::parse(raw).map_err(|e| FileIdentityError::Malformed {
                    uri: raw.clone(),
                    message: e.to_string(),
                })?;
                if url.scheme() != "file" {
                    return Err(FileIdentityError::NotAFile(raw.clone()));
                }
                let path = url
                    .to_file_path()
                    .map_err(|()| FileIdentityError::NotAFile(raw.clone()))?;
                Ok(normalize_path(&path, root))
            }
        }
    }
}

impl From<&str> for FileIdentity {
    fn from(raw: &str) -> Self {
        Self::parse(raw)
    }
}

impl From<PathBuf> for FileIdentity {
    fn from(path: PathBuf) -> Self {
        Self::Path(path)
    }
}

impl From<&Path> for FileIdentity {
    fn from(path: &Path) -> Self {
        Self::Path(path.to_path_buf())
    }
}

impl fmt::Display for FileIdentity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Uri(uri) => f.write_str(uri),
            Self::Path(path) => write!(f, "{}", path.display()),
        }
    }
}

/// Make `path` absolute against `root` and strip `.`/`..` components.
///
/// `..` never climbs above the filesystem root.
pub fn normalize_path(path: &Path, root: &Path) -> PathBuf {
    let joined = if path.is_absolute() {
        path.to_path_buf()
    } else {
        root.join(path)
    };

    let mut normalized = PathBuf::new();
    for component in joined.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                if !matches!(
                    normalized.components().next_back(),
                    None | Some(Component::RootDir) | Some(Component::Prefix(_))
                ) {
                    normalized.pop();
                }
            }
            other => normalized.push(other.as_os_str()),
        }
    }
    normalized
}
