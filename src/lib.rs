//! # tessera-base
//!
//! Core library for a language server's project layer: compilation targets
//! created on demand for opened files, a live-reloaded compiler flags file,
//! and code lenses that link overriding members to their base members.
//!
//! ## Module Structure (dependency order)
//!
//! ```text
//! ide       → Code lenses for overriding/implementing/hiding members
//!   ↓
//! hir       → Symbol index, type model, scope-relative type display
//!   ↓
//! project   → Compilation registry, build targets, flags file, file sources
//!   ↓
//! base      → Primitives (FileIdentity, Span/Position, path normalization)
//! ```

// ============================================================================
// MODULES (dependency order: base → project → hir → ide)
// ============================================================================

/// Foundation types: FileIdentity, Span/Position
pub mod base;

/// Project management: compilation registry, flags file, build targets
pub mod project;

/// High-level IR: symbols, types and their base-type edges
pub mod hir;

/// IDE features: base-symbol code lenses
pub mod ide;

// Re-export foundation types
pub use base::{FileIdentity, Position, Span};
pub use project::{CompilationRegistry, ProjectError, ProjectHost};
