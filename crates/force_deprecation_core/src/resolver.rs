use log::trace;

use crate::{
    host::{Declaration, SourceFile, SymbolFlags, TypeChecker},
    types::TargetName,
};

/// Finds the declarations a rule for `module`/`target` points at in `context`.
///
/// The module is matched by the name of the module-scope symbol, i.e. the
/// import as written. Any lookup that comes up empty yields `None`.
pub fn find_imported_symbol<C: TypeChecker + ?Sized>(
    checker: &C,
    context: &SourceFile,
    module: &str,
    target: &TargetName,
) -> Option<Vec<Declaration>> {
    let symbols = checker.symbols_in_scope(context, SymbolFlags::MODULE);
    let import_symbol = symbols.iter().find(|s| s.name == module)?;
    let Some(import_declaration) = import_symbol.declarations.first() else {
        trace!("Module symbol '{}' has no declarations", module);
        return None;
    };

    let Some(module_symbol) = checker.symbol_at_location(import_declaration) else {
        trace!("Could not resolve module symbol for '{}' in {}", module, context.path.display());
        return None;
    };

    match target {
        TargetName::Wildcard => Some(module_symbol.declarations),
        TargetName::Named(name) => {
            let exports = checker.exports_of_module(&module_symbol);
            let Some(export) = exports.iter().find(|s| &s.name == name) else {
                trace!("Module '{}' does not export '{}'", module, name);
                return None;
            };
            export.declarations.first().map(|d| vec![d.clone()])
        }
    }
}
