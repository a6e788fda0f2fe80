//! Rendering types the way a user would write them at a given location.

use rustc_hash::FxHashSet;

use super::ids::SymbolId;
use super::index::SymbolIndex;
use super::types::HirType;

impl SymbolIndex {
    /// Render `ty` as seen from inside `scope`.
    ///
    /// Namespaces and types enclosing `scope` are omitted from qualified
    /// names, so `Gee.List<string>` prints as `List<string>` from anywhere
    /// inside `Gee`. Type arguments are rendered recursively.
    pub fn display_type(&self, ty: &HirType, scope: Option<SymbolId>) -> String {
        let visible: FxHashSet<SymbolId> = scope
            .into_iter()
            .flat_map(|scope| std::iter::once(scope).chain(self.ancestors(scope)))
            .collect();
        let mut out = String::new();
        self.write_type(ty, &visible, &mut out);
        out
    }

    fn write_type(&self, ty: &HirType, visible: &FxHashSet<SymbolId>, out: &mut String) {
        match ty {
            HirType::Named { symbol, args } => {
                self.write_scoped_name(*symbol, visible, out);
                if !args.is_empty() {
                    out.push('<');
                    for (i, arg) in args.iter().enumerate() {
                        if i > 0 {
                            out.push_str(", ");
                        }
                        self.write_type(arg, visible, out);
                    }
                    out.push('>');
                }
            }
            HirType::Param(param) => out.push_str(self.type_param_name(*param).unwrap_or("?")),
            HirType::Builtin(name) => out.push_str(name),
            HirType::Unknown => out.push('?'),
        }
    }

    fn write_scoped_name(&self, symbol: SymbolId, visible: &FxHashSet<SymbolId>, out: &mut String) {
        // Outer ancestors up to (not including) the innermost visible one.
        let mut prefix: Vec<&str> = self
            .ancestors(symbol)
            .take_while(|ancestor| !visible.contains(ancestor))
            .map(|ancestor| self.symbol(ancestor).name.as_str())
            .collect();
        prefix.reverse();
        for name in prefix {
            out.push_str(name);
            out.push('.');
        }
        out.push_str(&self.symbol(symbol).name);
    }
}
