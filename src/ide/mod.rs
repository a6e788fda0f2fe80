//! IDE features: High-level APIs for LSP handlers.
//!
//! Functions here take a [`SymbolIndex`](crate::hir::SymbolIndex) in and hand
//! plain data out. Conversion to protocol types happens at the LSP boundary.
//!
//! ```ignore
//! use tessera::ide::code_lenses;
//!
//! for lens in code_lenses(&index, Path::new("/p/string_list.vala")) {
//!     println!("{}: {}", lens.span.start.line, lens.title);
//! }
//! ```

mod code_lens;
mod location;

pub use code_lens::{
    CodeLens, LensArguments, SHOW_BASE_SYMBOL_COMMAND, SHOW_HIDDEN_SYMBOL_COMMAND,
    SymbolLensResolver, code_lenses,
};
pub use location::{LensLocation, LocationError};
