//! In-memory host used by the unit tests.

use oxc_span::Span;
use std::{
    collections::HashMap,
    path::{Path, PathBuf},
};

use crate::{
    host::{Declaration, LanguageService, Program, SourceFile, Symbol, SymbolFlags, TypeChecker},
    types::Diagnostic,
};

pub fn decl(file: &str, start: u32, end: u32) -> Declaration {
    Declaration::new(file, Span::new(start, end))
}

pub fn file(path: &str, text: &str) -> SourceFile {
    SourceFile { path: PathBuf::from(path), text: text.to_string() }
}

#[derive(Debug, Default, Clone)]
pub struct FakeChecker {
    scopes: HashMap<PathBuf, Vec<Symbol>>,
    modules: HashMap<String, Symbol>,
    exports: HashMap<String, Vec<Symbol>>,
}

impl FakeChecker {
    /// Binds `module` in the top-level scope of `path`.
    pub fn with_import(mut self, path: &str, module: &str, declaration: Declaration) -> Self {
        self.scopes.entry(PathBuf::from(path)).or_default().push(Symbol {
            name: module.to_string(),
            flags: SymbolFlags::MODULE,
            declarations: vec![declaration],
        });
        self
    }

    /// Makes imports of `module` resolve to a module symbol with `declarations`.
    pub fn with_module(mut self, module: &str, declarations: Vec<Declaration>) -> Self {
        self.modules.insert(
            module.to_string(),
            Symbol { name: module.to_string(), flags: SymbolFlags::MODULE, declarations },
        );
        self
    }

    pub fn with_export(mut self, module: &str, name: &str, declarations: Vec<Declaration>) -> Self {
        self.exports.entry(module.to_string()).or_default().push(Symbol {
            name: name.to_string(),
            flags: SymbolFlags::VALUE,
            declarations,
        });
        self
    }
}

impl TypeChecker for FakeChecker {
    fn symbols_in_scope(&self, location: &SourceFile, meaning: SymbolFlags) -> Vec<Symbol> {
        self.scopes
            .get(&location.path)
            .map(|symbols| symbols.iter().filter(|s| s.flags.intersects(meaning)).cloned().collect())
            .unwrap_or_default()
    }

    fn symbol_at_location(&self, declaration: &Declaration) -> Option<Symbol> {
        let import = self
            .scopes
            .values()
            .flatten()
            .find(|s| s.declarations.contains(declaration))?;
        self.modules.get(&import.name).cloned()
    }

    fn exports_of_module(&self, module: &Symbol) -> Vec<Symbol> {
        self.exports.get(&module.name).cloned().unwrap_or_default()
    }
}

#[derive(Debug, Default, Clone)]
pub struct FakeProgram {
    files: HashMap<PathBuf, SourceFile>,
    checker: FakeChecker,
}

impl FakeProgram {
    pub fn new(checker: FakeChecker) -> Self {
        Self { files: HashMap::new(), checker }
    }

    pub fn with_file(mut self, path: &str, text: &str) -> Self {
        self.files.insert(PathBuf::from(path), file(path, text));
        self
    }
}

impl Program for FakeProgram {
    type Checker = FakeChecker;

    fn source_file(&self, file_name: &Path) -> Option<SourceFile> {
        self.files.get(file_name).cloned()
    }

    fn type_checker(&self) -> &FakeChecker {
        &self.checker
    }
}

#[derive(Debug, Default, Clone)]
pub struct FakeService {
    native: HashMap<PathBuf, Vec<Diagnostic>>,
    program: Option<FakeProgram>,
}

impl FakeService {
    pub fn new(program: Option<FakeProgram>) -> Self {
        Self { native: HashMap::new(), program }
    }

    pub fn with_native(mut self, diagnostic: Diagnostic) -> Self {
        self.native.entry(diagnostic.file.clone()).or_default().push(diagnostic);
        self
    }
}

impl LanguageService for FakeService {
    type Program = FakeProgram;

    fn semantic_diagnostics(&self, file_name: &Path) -> Vec<Diagnostic> {
        self.native.get(file_name).cloned().unwrap_or_default()
    }

    fn program(&self) -> Option<&FakeProgram> {
        self.program.as_ref()
    }
}
