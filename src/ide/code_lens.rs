//! Code lenses linking a member to the ancestor member it overrides or hides.
//!
//! The title of such a lens names the ancestor through the type it is
//! actually reached by, generic arguments included: for
//!
//! ```text
//! class StringList : Gee.ArrayList<string> {
//!     public override bool add (string item) { ... }
//! }
//! ```
//!
//! the lens on `add` reads `overrides Gee.ArrayList<string>.add()` rather
//! than `Gee.ArrayList<G>.add()`.

use std::collections::VecDeque;
use std::path::Path;

use rustc_hash::FxHashSet;

use super::location::{LensLocation, LocationError};
use crate::base::Span;
use crate::hir::{HirType, LinkKind, SymbolId, SymbolIndex};

/// Command that jumps to the overridden or implemented member.
pub const SHOW_BASE_SYMBOL_COMMAND: &str = "tessera.showBaseSymbol";

/// Command that jumps to the hidden member.
pub const SHOW_HIDDEN_SYMBOL_COMMAND: &str = "tessera.showHiddenSymbol";

/// Command identifier plus the locations of both ends of a lens.
///
/// A location that could not be built is `None`; the other is still usable.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LensArguments {
    pub command: &'static str,
    pub current: Option<LensLocation>,
    pub target: Option<LensLocation>,
}

impl LensArguments {
    /// The locations that could be built, current symbol first.
    pub fn locations(&self) -> impl Iterator<Item = &LensLocation> {
        self.current.iter().chain(self.target.iter())
    }
}

/// A lens ready to be sent to the client.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CodeLens {
    /// Declaration span of the overriding/hiding member.
    pub span: Span,
    pub title: String,
    pub arguments: LensArguments,
}

impl CodeLens {
    pub fn command(&self) -> &'static str {
        self.arguments.command
    }
}

/// Resolves the display name and jump targets for one (member, ancestor member) pair.
pub struct SymbolLensResolver<'a> {
    index: &'a SymbolIndex,
}

impl<'a> SymbolLensResolver<'a> {
    pub fn new(index: &'a SymbolIndex) -> Self {
        Self { index }
    }

    /// The type through which `target` is inherited by `current`'s enclosing type.
    ///
    /// Breadth-first over base-type edges in declaration order, substituting
    /// type arguments at every edge. The first edge whose declared symbol is
    /// `target`'s enclosing symbol wins, so in diamond hierarchies the answer
    /// depends on declaration order. Returns `None` if `current` is not a type
    /// member or no path exists. Each type symbol is expanded at most once,
    /// which also bounds cyclic hierarchies.
    pub fn ancestor_type(&self, current: SymbolId, target: SymbolId) -> Option<HirType> {
        let owner = self.index.parent(current)?;
        if !self.index.is_type(owner) {
            return None;
        }
        let target_owner = self.index.parent(target)?;

        let mut visited = FxHashSet::default();
        visited.insert(owner);
        let mut queue = VecDeque::from([self.index.instance_type(owner)]);

        while let Some(frontier) = queue.pop_front() {
            let Some(symbol) = frontier.symbol() else {
                continue;
            };
            for edge in self.index.base_edges(symbol) {
                let actual = edge.actual_in(&frontier);
                tracing::trace!("Ancestor edge {:?} -> {:?}", symbol, actual);
                if edge.symbol() == Some(target_owner) {
                    return Some(actual);
                }
                if actual.symbol().is_some_and(|next| visited.insert(next)) {
                    queue.push_back(actual);
                }
            }
        }
        None
    }

    /// Display string for `target` as inherited by `current`, e.g. `List<string>.add()`.
    ///
    /// Falls back to the bare name when no ancestor type is found. Callable
    /// targets get a `()` suffix.
    pub fn render(&self, current: SymbolId, target: SymbolId) -> String {
        let target_symbol = self.index.symbol(target);
        let mut rendered = match self.ancestor_type(current, target) {
            Some(ancestor) => {
                let mut qualified = self.index.display_type(&ancestor, Some(current));
                qualified.push('.');
                qualified
            }
            None => String::new(),
        };
        rendered.push_str(&target_symbol.name);
        if target_symbol.kind.is_callable() {
            rendered.push_str("()");
        }
        rendered
    }

    /// Command and locations for a lens from `current` to `target`.
    ///
    /// Hide relationships use [`SHOW_HIDDEN_SYMBOL_COMMAND`], everything else
    /// [`SHOW_BASE_SYMBOL_COMMAND`].
    pub fn build_arguments(&self, current: SymbolId, target: SymbolId) -> LensArguments {
        let command = match self.index.symbol(current).link {
            Some(link) if link.kind == LinkKind::Hides && link.target == target => {
                SHOW_HIDDEN_SYMBOL_COMMAND
            }
            _ => SHOW_BASE_SYMBOL_COMMAND,
        };
        LensArguments {
            command,
            current: self.location(current),
            target: self.location(target),
        }
    }

    fn location(&self, id: SymbolId) -> Option<LensLocation> {
        let symbol = self.index.symbol(id);
        let result = symbol
            .source
            .as_ref()
            .ok_or_else(|| LocationError::NoSource(symbol.name.to_string()))
            .and_then(LensLocation::from_source);
        match result {
            Ok(location) => Some(location),
            Err(e) => {
                tracing::warn!("Omitting lens argument: {}", e);
                None
            }
        }
    }
}

/// Lenses for every overriding, implementing or hiding member declared in `file`.
pub fn code_lenses(index: &SymbolIndex, file: &Path) -> Vec<CodeLens> {
    let resolver = SymbolLensResolver::new(index);
    index
        .symbols_in_file(file)
        .filter_map(|(id, symbol)| {
            let link = symbol.link?;
            let span = symbol.source.as_ref()?.span;
            let verb = match link.kind {
                LinkKind::Overrides => "overrides",
                LinkKind::Implements => "implements",
                LinkKind::Hides => "hides",
            };
            Some(CodeLens {
                span,
                title: format!("{} {}", verb, resolver.render(id, link.target)),
                arguments: resolver.build_arguments(id, link.target),
            })
        })
        .collect()
}
