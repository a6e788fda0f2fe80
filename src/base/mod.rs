//! Foundation types for the Tessera toolchain.
//!
//! This module provides fundamental types used throughout the crate:
//! - [`FileIdentity`] - Editor-visible file references (URI or path)
//! - [`normalize_path`] - Lexical path normalization against a root
//! - [`Position`], [`Span`] - Line/column positions for source references
//!
//! This module has NO dependencies on other tessera modules.

mod file_identity;
mod position;

pub use file_identity::{FileIdentity, FileIdentityError, normalize_path};
pub use position::{Position, Span};
