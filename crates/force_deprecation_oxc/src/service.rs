use force_deprecation_core::{
    Diagnostic, DiagnosticCategory, LanguageService, Program, SourceFile,
};
use log::{debug, warn};
use std::{
    collections::HashMap,
    path::{Path, PathBuf},
};

use crate::{
    checker::ProjectChecker,
    constants::{MODULE_NOT_FOUND_CODE, SYNTAX_ERROR_CODE},
    resolver::is_relative_request,
};

pub struct ProjectProgram {
    checker: ProjectChecker,
}

impl Program for ProjectProgram {
    type Checker = ProjectChecker;

    fn source_file(&self, file_name: &Path) -> Option<SourceFile> {
        match self.checker.module(file_name) {
            Ok(m) => Some(SourceFile { path: file_name.to_path_buf(), text: m.text.clone() }),
            Err(e) => {
                debug!("No source file: {:#}", e);
                None
            }
        }
    }

    fn type_checker(&self) -> &ProjectChecker {
        &self.checker
    }
}

/// Language service over the JS/TS files of a project directory.
///
/// Its own semantic diagnostics are limited to syntax errors and relative
/// imports that resolve to no file.
pub struct ProjectService {
    program: ProjectProgram,
}

impl ProjectService {
    pub fn new(root: PathBuf, tsconfig_paths: HashMap<String, Vec<String>>) -> Self {
        Self { program: ProjectProgram { checker: ProjectChecker::new(root, tsconfig_paths) } }
    }

    pub fn checker(&self) -> &ProjectChecker {
        &self.program.checker
    }

    /// Forgets what is cached about `path`, e.g. after it was edited.
    pub fn invalidate(&self, path: &Path) {
        self.program.checker.invalidate(path);
    }
}

impl LanguageService for ProjectService {
    type Program = ProjectProgram;

    fn semantic_diagnostics(&self, file_name: &Path) -> Vec<Diagnostic> {
        let checker = &self.program.checker;
        let module = match checker.module(file_name) {
            Ok(m) => m,
            Err(e) => {
                warn!("Error parsing {}: {:#}", file_name.display(), e);
                return vec![];
            }
        };

        let mut diagnostics: Vec<Diagnostic> = module
            .errors
            .iter()
            .map(|error| Diagnostic {
                file: file_name.to_path_buf(),
                start: error.span.start,
                length: error.span.end.saturating_sub(error.span.start),
                message: error.message.clone(),
                category: DiagnosticCategory::Error,
                code: SYNTAX_ERROR_CODE,
                reports_deprecated: false,
            })
            .collect();

        for import in &module.imports {
            if is_relative_request(&import.source)
                && checker.resolve(file_name, &import.source).is_none()
            {
                diagnostics.push(Diagnostic {
                    file: file_name.to_path_buf(),
                    start: import.span.start,
                    length: import.span.end - import.span.start,
                    message: format!(
                        "Cannot find module '{}' or its corresponding type declarations.",
                        import.source
                    ),
                    category: DiagnosticCategory::Error,
                    code: MODULE_NOT_FOUND_CODE,
                    reports_deprecated: false,
                });
            }
        }

        debug!("{} native diagnostics for {}", diagnostics.len(), file_name.display());
        diagnostics
    }

    fn program(&self) -> Option<&ProjectProgram> {
        Some(&self.program)
    }
}
