//! Symbol queries answered from parsed import and export statements.
//!
//! Module-scope symbols are keyed by the import request as written in the
//! file, so `"./legacy"` and `"@/legacy"` are different modules here even if
//! both resolve to the same file. Every declaration handed out lives in the
//! importing file: module symbols point at the import declarations of that
//! module, exports point at the import declaration that binds them (or the
//! first import of the module when nothing binds them).

use anyhow::Result;
use dashmap::DashMap;
use force_deprecation_core::{Declaration, SourceFile, Symbol, SymbolFlags, TypeChecker};
use log::{debug, trace, warn};
use std::{
    collections::{HashMap, HashSet},
    path::{Path, PathBuf},
    sync::Arc,
};

use crate::{
    parser::{ExportEntry, ParsedModule, module_for},
    resolver::resolve_module,
};

pub struct ProjectChecker {
    root: PathBuf,
    tsconfig_paths: HashMap<String, Vec<String>>,
    modules: DashMap<PathBuf, Arc<ParsedModule>>,
    resolutions: DashMap<(PathBuf, String), Option<PathBuf>>,
}

impl ProjectChecker {
    pub fn new(root: PathBuf, tsconfig_paths: HashMap<String, Vec<String>>) -> Self {
        Self { root, tsconfig_paths, modules: DashMap::new(), resolutions: DashMap::new() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn module(&self, path: &Path) -> Result<Arc<ParsedModule>> {
        module_for(path, &self.modules)
    }

    pub fn resolve(&self, from_file: &Path, request: &str) -> Option<PathBuf> {
        resolve_module(&self.root, &self.tsconfig_paths, from_file, request, &self.resolutions)
    }

    /// Drops the cached parse of `path`, every resolution involving it and
    /// every failed resolution, since `path` may be the file they missed.
    pub fn invalidate(&self, path: &Path) {
        self.modules.remove(path);
        self.resolutions.retain(|(from, _), resolved| {
            from != path && resolved.as_deref().is_some_and(|r| r != path)
        });
        trace!("Invalidated {}", path.display());
    }

    /// Drops every cached parse and resolution.
    pub fn clear(&self) {
        self.modules.clear();
        self.resolutions.clear();
    }

    /// (parsed modules, resolutions) currently cached.
    pub fn cache_sizes(&self) -> (usize, usize) {
        (self.modules.len(), self.resolutions.len())
    }

    fn module_or_warn(&self, path: &Path) -> Option<Arc<ParsedModule>> {
        match self.module(path) {
            Ok(m) => Some(m),
            Err(e) => {
                warn!("Error parsing {}: {:#}", path.display(), e);
                None
            }
        }
    }

    /// Names exported by the file at `path`, following `export *` chains.
    fn exported_names(&self, path: &Path, visiting: &mut HashSet<PathBuf>) -> Vec<String> {
        if !visiting.insert(path.to_path_buf()) {
            trace!("Cycle detected at: {}", path.display());
            return vec![];
        }
        let Some(module) = self.module_or_warn(path) else {
            return vec![];
        };

        let mut names = Vec::new();
        for export in &module.exports {
            match export {
                ExportEntry::Named(name) => names.push(name.clone()),
                ExportEntry::ReExportAll(source) => match self.resolve(path, source) {
                    // `export *` never forwards the default export
                    Some(target) => names.extend(
                        self.exported_names(&target, visiting)
                            .into_iter()
                            .filter(|n| n != "default"),
                    ),
                    None => {
                        trace!("Could not resolve re-export '{}' in {}", source, path.display())
                    }
                },
            }
        }
        names
    }
}

impl TypeChecker for ProjectChecker {
    fn symbols_in_scope(&self, location: &SourceFile, meaning: SymbolFlags) -> Vec<Symbol> {
        let Some(module) = self.module_or_warn(&location.path) else {
            return vec![];
        };

        let mut symbols: Vec<Symbol> = Vec::new();
        if meaning.intersects(SymbolFlags::MODULE) {
            for import in &module.imports {
                let declaration = Declaration::new(&location.path, import.span);
                match symbols.iter_mut().find(|s| s.name == import.source) {
                    Some(symbol) => symbol.declarations.push(declaration),
                    None => symbols.push(Symbol {
                        name: import.source.clone(),
                        flags: SymbolFlags::MODULE,
                        declarations: vec![declaration],
                    }),
                }
            }
        }
        if meaning.intersects(SymbolFlags::ALIAS) {
            for import in &module.imports {
                for binding in &import.bindings {
                    symbols.push(Symbol {
                        name: binding.local.clone(),
                        flags: SymbolFlags::ALIAS,
                        declarations: vec![Declaration::new(&location.path, binding.span)],
                    });
                }
            }
        }

        trace!("{} symbols in scope of {}", symbols.len(), location.path.display());
        symbols
    }

    fn symbol_at_location(&self, declaration: &Declaration) -> Option<Symbol> {
        let importer = self.module_or_warn(&declaration.file)?;
        let import = importer.import_at(declaration.span)?;

        let name = match self.resolve(&declaration.file, &import.source) {
            Some(path) => path.to_string_lossy().to_string(),
            None => import.source.clone(),
        };
        let declarations = importer
            .imports_from(&import.source)
            .map(|i| Declaration::new(&declaration.file, i.span))
            .collect();

        Some(Symbol { name, flags: SymbolFlags::MODULE, declarations })
    }

    fn exports_of_module(&self, module: &Symbol) -> Vec<Symbol> {
        let Some(anchor) = module.declarations.first() else {
            return vec![];
        };
        let Some(importer) = self.module_or_warn(&anchor.file) else {
            return vec![];
        };
        let Some(import) = importer.import_at(anchor.span) else {
            debug!("'{}' is not anchored at an import declaration", module.name);
            return vec![];
        };
        let source = import.source.as_str();

        let names: Vec<String> = match self.resolve(&anchor.file, source) {
            Some(path) => self.exported_names(&path, &mut HashSet::new()),
            None => {
                trace!("'{}' is unresolved, using the names imported from it", source);
                importer
                    .imports_from(source)
                    .flat_map(|i| i.bindings.iter())
                    .filter_map(|b| b.imported.export_name().map(str::to_string))
                    .collect()
            }
        };

        let mut seen = HashSet::new();
        names
            .into_iter()
            .filter(|name| seen.insert(name.clone()))
            .map(|name| {
                let site =
                    importer.imports_from(source).find(|i| i.binds_export(&name)).unwrap_or(import);
                Symbol {
                    name,
                    flags: SymbolFlags::VALUE,
                    declarations: vec![Declaration::new(&anchor.file, site.span)],
                }
            })
            .collect()
    }
}
