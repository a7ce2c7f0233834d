//! Core of the force-deprecation language service plugin.
//!
//! This crate flags configured deprecated imports with custom diagnostics:
//! - Normalizing the plugin options into a flat list of deprecation rules
//! - Describing the host language service as a few narrow traits
//! - Resolving an imported module name, through the host's type checker,
//!   to the declarations a rule points at
//! - Decorating the host's semantic diagnostics with deprecation findings
//!
//! # Examples
//!
//! ```no_run
//! use force_deprecation_core::{DeprecationPlugin, LanguageService, PluginOptions};
//! use std::path::Path;
//!
//! fn lint<L: LanguageService>(service: L) {
//!     let options: PluginOptions = serde_json::from_str(
//!         r#"{ "deprecations": ["moment", { "module": "lodash", "target": ["chain"] }] }"#,
//!     )
//!     .unwrap();
//!
//!     let plugin = DeprecationPlugin::new(service, options);
//!     for d in plugin.semantic_diagnostics(Path::new("src/index.ts")) {
//!         println!("{}:{} {}", d.file.display(), d.start, d.message);
//!     }
//! }
//! ```

mod config;
#[cfg(test)]
mod fake;
mod host;
mod plugin;
mod resolver;
mod types;

// Re-export public API
pub use config::{
    Deprecation, DeprecationEntry, DeprecationSet, OptionsSource, PLUGIN_NAME, PluginOptions,
    TargetEntry, config_to_rules,
};
pub use host::{Declaration, LanguageService, Program, SourceFile, Symbol, SymbolFlags, TypeChecker};
pub use plugin::DeprecationPlugin;
pub use resolver::find_imported_symbol;
pub use types::{DEPRECATION_CODE, DeprecationRule, Diagnostic, DiagnosticCategory, TargetName};
