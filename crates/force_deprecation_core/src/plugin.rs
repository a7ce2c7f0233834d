use log::{debug, trace, warn};
use std::path::Path;

use crate::{
    config::{OptionsSource, config_to_rules},
    host::{LanguageService, Program},
    resolver::find_imported_symbol,
    types::{DEPRECATION_CODE, Diagnostic, DiagnosticCategory},
};

/// Decorates a host language service with deprecation diagnostics.
///
/// Options are loaded from `options` on every request; nothing derived from
/// them outlives a call.
pub struct DeprecationPlugin<L, S> {
    service: L,
    options: S,
}

impl<L: LanguageService, S: OptionsSource> DeprecationPlugin<L, S> {
    pub fn new(service: L, options: S) -> Self {
        Self { service, options }
    }

    /// The decorated host service.
    pub fn service(&self) -> &L {
        &self.service
    }

    pub fn options(&self) -> &S {
        &self.options
    }

    /// The host's semantic diagnostics for `file_name`, followed by one
    /// deprecation diagnostic per matched declaration.
    pub fn semantic_diagnostics(&self, file_name: &Path) -> Vec<Diagnostic> {
        let mut diagnostics = self.service.semantic_diagnostics(file_name);

        let Some(program) = self.service.program() else {
            debug!("No program available for {}", file_name.display());
            return diagnostics;
        };
        let Some(source_file) = program.source_file(file_name) else {
            debug!("No source file for {}", file_name.display());
            return diagnostics;
        };

        let options = match self.options.load() {
            Ok(options) => options,
            Err(e) => {
                warn!("Ignoring deprecations for {}: {:#}", file_name.display(), e);
                return diagnostics;
            }
        };

        let checker = program.type_checker();
        let text_len = u32::try_from(source_file.text.len()).unwrap_or(u32::MAX);
        let native = diagnostics.len();

        for rule in config_to_rules(&options) {
            trace!("Checking rule {}:{} in {}", rule.module, rule.target, file_name.display());
            let declarations =
                find_imported_symbol(checker, &source_file, &rule.module, &rule.target)
                    .unwrap_or_default();

            for declaration in declarations {
                // The range is reported against the importing file's text.
                let start = declaration.span.start.min(text_len);
                let end = declaration.span.end.clamp(start, text_len);
                diagnostics.push(Diagnostic {
                    file: source_file.path.clone(),
                    start,
                    length: end - start,
                    message: rule.message.clone(),
                    category: DiagnosticCategory::Message,
                    code: DEPRECATION_CODE,
                    reports_deprecated: true,
                });
            }
        }

        debug!(
            "Added {} deprecation diagnostics to {}",
            diagnostics.len() - native,
            file_name.display()
        );
        diagnostics
    }
}

impl<L: LanguageService, S: OptionsSource> LanguageService for DeprecationPlugin<L, S> {
    type Program = L::Program;

    fn semantic_diagnostics(&self, file_name: &Path) -> Vec<Diagnostic> {
        DeprecationPlugin::semantic_diagnostics(self, file_name)
    }

    fn program(&self) -> Option<&L::Program> {
        self.service.program()
    }
}
