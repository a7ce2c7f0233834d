use anyhow::{Context, Result};
use dashmap::DashMap;
use log::{debug, trace};
use oxc_allocator::Allocator;
use oxc_ast::ast::*;
use oxc_parser::{Parser as OxcParser, ParserReturn};
use oxc_span::{SourceType, Span};
use std::{
    fs,
    path::{Path, PathBuf},
    sync::Arc,
};

/// The name an import binding takes from its module.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ImportedName {
    Named(String),
    Default,
    Namespace,
}

impl ImportedName {
    /// The export this binding reads, if it reads a single one.
    pub fn export_name(&self) -> Option<&str> {
        match self {
            Self::Named(name) => Some(name),
            Self::Default => Some("default"),
            Self::Namespace => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImportBinding {
    pub imported: ImportedName,
    pub local: String,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImportDecl {
    pub source: String,
    pub span: Span,
    pub bindings: Vec<ImportBinding>,
    pub type_only: bool,
}

impl ImportDecl {
    pub fn binds_export(&self, name: &str) -> bool {
        self.bindings.iter().any(|b| b.imported.export_name() == Some(name))
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExportEntry {
    Named(String),
    /// `export * from '<source>'`
    ReExportAll(String),
}

/// A parse error and the range of its primary label (empty when it has none).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SyntaxError {
    pub message: String,
    pub span: Span,
}

#[derive(Debug, Clone)]
pub struct ParsedModule {
    pub path: PathBuf,
    pub text: String,
    pub imports: Vec<ImportDecl>,
    pub exports: Vec<ExportEntry>,
    pub errors: Vec<SyntaxError>,
}

impl ParsedModule {
    pub fn imports_from<'m>(&'m self, source: &'m str) -> impl Iterator<Item = &'m ImportDecl> {
        self.imports.iter().filter(move |i| i.source == source)
    }

    pub fn import_at(&self, span: Span) -> Option<&ImportDecl> {
        self.imports.iter().find(|i| i.span == span)
    }
}

pub fn module_for(
    file: &Path,
    cache: &DashMap<PathBuf, Arc<ParsedModule>>,
) -> Result<Arc<ParsedModule>> {
    let file_buf = file.to_path_buf();
    if let Some(m) = cache.get(&file_buf) {
        trace!("Cache hit for module: {}", file.display());
        return Ok(Arc::clone(&m));
    }
    trace!("Parsing module: {}", file.display());
    let src =
        fs::read_to_string(file).with_context(|| format!("Failed to read {}", file.display()))?;

    let module = Arc::new(parse_source(file, src));
    cache.insert(file_buf, Arc::clone(&module));
    Ok(module)
}

pub fn parse_source(file: &Path, src: String) -> ParsedModule {
    let st = source_type_for(file);
    let allocator = Allocator::default();
    let ParserReturn { program, errors, .. } = OxcParser::new(&allocator, &src, st).parse();

    let mut imports = Vec::new();
    let mut exports = Vec::new();

    for stmt in &program.body {
        match stmt {
            Statement::ImportDeclaration(decl) => {
                let bindings = decl
                    .specifiers
                    .iter()
                    .flatten()
                    .map(|spec| match spec {
                        ImportDeclarationSpecifier::ImportSpecifier(s) => ImportBinding {
                            imported: ImportedName::Named(s.imported.name().to_string()),
                            local: s.local.name.to_string(),
                            span: s.span,
                        },
                        ImportDeclarationSpecifier::ImportDefaultSpecifier(s) => ImportBinding {
                            imported: ImportedName::Default,
                            local: s.local.name.to_string(),
                            span: s.span,
                        },
                        ImportDeclarationSpecifier::ImportNamespaceSpecifier(s) => ImportBinding {
                            imported: ImportedName::Namespace,
                            local: s.local.name.to_string(),
                            span: s.span,
                        },
                    })
                    .collect();

                trace!("Found import: '{}' in {}", decl.source.value, file.display());
                imports.push(ImportDecl {
                    source: decl.source.value.to_string(),
                    span: decl.span,
                    bindings,
                    type_only: decl.import_kind.is_type(),
                });
            }
            Statement::ExportNamedDeclaration(decl) => {
                if let Some(declaration) = &decl.declaration {
                    declared_names(declaration, &mut exports);
                }
                for spec in &decl.specifiers {
                    exports.push(ExportEntry::Named(spec.exported.name().to_string()));
                }
            }
            Statement::ExportDefaultDeclaration(_) => {
                exports.push(ExportEntry::Named("default".to_string()));
            }
            Statement::ExportAllDeclaration(decl) => match &decl.exported {
                Some(name) => exports.push(ExportEntry::Named(name.name().to_string())),
                None => exports.push(ExportEntry::ReExportAll(decl.source.value.to_string())),
            },
            _ => {}
        }
    }

    let errors: Vec<SyntaxError> = errors
        .iter()
        .map(|e| {
            let span = e
                .labels
                .as_ref()
                .and_then(|labels| labels.first())
                .map_or(Span::default(), |label| {
                    let start = label.offset() as u32;
                    Span::new(start, start + label.len() as u32)
                });
            SyntaxError { message: e.to_string(), span }
        })
        .collect();
    debug!(
        "Parsed {}: {} imports, {} exports, {} errors",
        file.display(),
        imports.len(),
        exports.len(),
        errors.len()
    );

    ParsedModule { path: file.to_path_buf(), text: src, imports, exports, errors }
}

fn declared_names(declaration: &Declaration, exports: &mut Vec<ExportEntry>) {
    let mut push = |name: &str| exports.push(ExportEntry::Named(name.to_string()));
    match declaration {
        Declaration::VariableDeclaration(vd) => {
            for d in &vd.declarations {
                for id in d.id.get_binding_identifiers() {
                    push(id.name.as_str());
                }
            }
        }
        Declaration::FunctionDeclaration(f) => {
            if let Some(id) = &f.id {
                push(id.name.as_str());
            }
        }
        Declaration::ClassDeclaration(c) => {
            if let Some(id) = &c.id {
                push(id.name.as_str());
            }
        }
        Declaration::TSTypeAliasDeclaration(t) => push(t.id.name.as_str()),
        Declaration::TSInterfaceDeclaration(t) => push(t.id.name.as_str()),
        Declaration::TSEnumDeclaration(e) => push(e.id.name.as_str()),
        _ => {}
    }
}

fn source_type_for(path: &Path) -> SourceType {
    let ext = path.extension().and_then(|e| e.to_str());

    let mut st = SourceType::default()
        .with_jsx(matches!(ext, Some("tsx") | Some("jsx")))
        .with_typescript(matches!(ext, Some("ts") | Some("tsx") | Some("mts") | Some("cts")));

    // ESM heuristic - .mjs, .mts are ES modules
    if matches!(ext, Some("mjs") | Some("mts")) {
        st = st.with_module(true);
    }

    st
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn parse(name: &str, src: &str) -> ParsedModule {
        parse_source(Path::new(name), src.to_string())
    }

    fn export_names(m: &ParsedModule) -> Vec<String> {
        m.exports
            .iter()
            .map(|e| match e {
                ExportEntry::Named(n) => n.clone(),
                ExportEntry::ReExportAll(s) => format!("* from {}", s),
            })
            .collect()
    }

    #[test]
    fn test_named_import() {
        let src = "import { bar, baz as qux } from 'foo';";
        let m = parse("test.ts", src);
        assert_eq!(m.imports.len(), 1);
        let import = &m.imports[0];
        assert_eq!(import.source, "foo");
        assert_eq!(import.span, Span::new(0, src.len() as u32));
        assert_eq!(import.bindings.len(), 2);
        assert_eq!(import.bindings[0].imported, ImportedName::Named("bar".to_string()));
        assert_eq!(import.bindings[1].imported, ImportedName::Named("baz".to_string()));
        assert_eq!(import.bindings[1].local, "qux");
        assert!(import.binds_export("baz"));
        assert!(!import.binds_export("qux"));
        assert!(!import.type_only);
    }

    #[test]
    fn test_default_and_namespace_imports() {
        let m = parse("test.js", "import React from 'react';\nimport * as path from 'path';");
        assert_eq!(m.imports.len(), 2);
        assert_eq!(m.imports[0].bindings[0].imported, ImportedName::Default);
        assert!(m.imports[0].binds_export("default"));
        assert_eq!(m.imports[1].bindings[0].imported, ImportedName::Namespace);
        assert_eq!(m.imports[1].bindings[0].local, "path");
    }

    #[test]
    fn test_side_effect_import_has_no_bindings() {
        let m = parse("test.js", "import './polyfills';");
        assert_eq!(m.imports.len(), 1);
        assert_eq!(m.imports[0].source, "./polyfills");
        assert!(m.imports[0].bindings.is_empty());
    }

    #[test]
    fn test_type_only_import_is_kept() {
        let m = parse("test.ts", "import type { Foo } from './types';");
        assert_eq!(m.imports.len(), 1);
        assert!(m.imports[0].type_only);
    }

    #[test]
    fn test_require_is_not_an_import() {
        let m = parse("test.js", "const fs = require('fs');\nimport('./lazy');");
        assert!(m.imports.is_empty());
    }

    #[test]
    fn test_exported_declarations() {
        let m = parse(
            "test.ts",
            "export const a = 1, b = 2;\n\
             export function c() {}\n\
             export class D {}\n\
             export type E = string;\n\
             export interface F {}\n\
             export enum G { X }\n\
             export default 42;",
        );
        assert_eq!(export_names(&m), ["a", "b", "c", "D", "E", "F", "G", "default"]);
    }

    #[test]
    fn test_export_specifiers_and_reexports() {
        let m = parse(
            "test.ts",
            "const x = 1;\n\
             export { x, x as y };\n\
             export { z } from './z';\n\
             export * from './all';\n\
             export * as ns from './ns';",
        );
        assert_eq!(export_names(&m), ["x", "y", "z", "* from ./all", "ns"]);
    }

    #[test]
    fn test_imports_from_and_import_at() {
        let src = "import { a } from 'm';\nimport { b } from 'n';\nimport c from 'm';";
        let m = parse("test.ts", src);
        assert_eq!(m.imports_from("m").count(), 2);
        let second = m.imports[1].span;
        assert_eq!(m.import_at(second).map(|i| i.source.as_str()), Some("n"));
        assert!(m.import_at(Span::new(1, 2)).is_none());
    }

    #[test]
    fn test_syntax_errors_are_collected() {
        let m = parse("test.ts", "import { from 'foo';");
        assert!(!m.errors.is_empty());
    }

    #[test]
    fn test_syntax_errors_point_into_the_source() {
        let src = "const ok = 1;\nconst = ;\n";
        let m = parse("test.ts", src);
        let error = &m.errors[0];
        assert!(error.span.start as usize >= src.find("const =").unwrap());
        assert!(error.span.end as usize <= src.len());
    }

    #[test]
    fn test_module_for_reads_and_caches() {
        let temp_dir = TempDir::new().unwrap();
        let file = temp_dir.path().join("app.tsx");
        fs::write(&file, "import React from 'react';\nexport const App = () => <div />;").unwrap();
        let cache = DashMap::new();

        let first = module_for(&file, &cache).unwrap();
        assert_eq!(first.imports.len(), 1);
        assert!(first.errors.is_empty());
        assert_eq!(export_names(&first), ["App"]);

        fs::write(&file, "").unwrap();
        let second = module_for(&file, &cache).unwrap();
        assert!(Arc::ptr_eq(&first, &second));
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn test_module_for_missing_file() {
        let temp_dir = TempDir::new().unwrap();
        let cache = DashMap::new();
        assert!(module_for(&temp_dir.path().join("nope.ts"), &cache).is_err());
        assert!(cache.is_empty());
    }
}
