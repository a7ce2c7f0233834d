//! The slice of a host language service this plugin talks to.
//!
//! The plugin only ever issues read-only queries: semantic diagnostics for a
//! file, the current program and its source files, and three type checker
//! lookups. Anything able to answer these can host the plugin.

use oxc_span::Span;
use std::{
    ops::BitOr,
    path::{Path, PathBuf},
};

use crate::types::Diagnostic;

/// Meaning of a symbol, used to filter scope queries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct SymbolFlags(u32);

impl SymbolFlags {
    pub const NONE: Self = Self(0);
    pub const VALUE: Self = Self(1 << 0);
    pub const TYPE: Self = Self(1 << 1);
    pub const MODULE: Self = Self(1 << 2);
    pub const ALIAS: Self = Self(1 << 3);

    pub const fn bits(self) -> u32 {
        self.0
    }

    pub const fn intersects(self, other: Self) -> bool {
        self.0 & other.0 != 0
    }

    pub const fn contains(self, other: Self) -> bool {
        self.0 & other.0 == other.0
    }
}

impl BitOr for SymbolFlags {
    type Output = Self;

    fn bitor(self, rhs: Self) -> Self {
        Self(self.0 | rhs.0)
    }
}

/// A syntax node that declares a symbol, located by file and byte span.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Declaration {
    pub file: PathBuf,
    pub span: Span,
}

impl Declaration {
    pub fn new(file: impl Into<PathBuf>, span: Span) -> Self {
        Self { file: file.into(), span }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Symbol {
    pub name: String,
    pub flags: SymbolFlags,
    pub declarations: Vec<Declaration>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceFile {
    pub path: PathBuf,
    pub text: String,
}

pub trait TypeChecker {
    /// Symbols visible at the top level of `location` whose meaning intersects `meaning`.
    fn symbols_in_scope(&self, location: &SourceFile, meaning: SymbolFlags) -> Vec<Symbol>;

    /// The symbol a declaration denotes, following import bindings to their target.
    fn symbol_at_location(&self, declaration: &Declaration) -> Option<Symbol>;

    fn exports_of_module(&self, module: &Symbol) -> Vec<Symbol>;
}

pub trait Program {
    type Checker: TypeChecker;

    fn source_file(&self, file_name: &Path) -> Option<SourceFile>;

    fn type_checker(&self) -> &Self::Checker;
}

pub trait LanguageService {
    type Program: Program;

    fn semantic_diagnostics(&self, file_name: &Path) -> Vec<Diagnostic>;

    fn program(&self) -> Option<&Self::Program>;
}
