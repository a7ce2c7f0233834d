//! oxc-backed host for the force-deprecation plugin.
//!
//! This crate answers the plugin's host queries for a JavaScript/TypeScript
//! project on disk:
//! - Parsing import and export statements with oxc
//! - Resolving module requests (relative, tsconfig paths, node_modules)
//! - Serving symbol queries and native diagnostics through
//!   [`ProjectService`]
//! - Loading plugin options from `tsconfig.json` or a standalone JSON file
//! - Collecting the source files of a project

mod checker;
mod collector;
mod config;
mod constants;
mod options;
mod parser;
mod resolver;
mod service;

// Re-export public API
pub use checker::ProjectChecker;
pub use collector::{CollectorConfig, collect_source_files};
pub use config::{find_git_root, read_json_with_comments, read_tsconfig_paths, strip_json_comments};
pub use constants::{JS_TS_EXTENSIONS, MODULE_NOT_FOUND_CODE, SYNTAX_ERROR_CODE};
pub use options::ConfigFile;
pub use parser::{
    ExportEntry, ImportBinding, ImportDecl, ImportedName, ParsedModule, SyntaxError,
    parse_source,
};
pub use resolver::resolve_module;
pub use service::{ProjectProgram, ProjectService};
