//! Deprecated-import checking for JavaScript/TypeScript projects.
//!
//! Runs the force-deprecation plugin over every source file of a project and
//! reports the imports its configured deprecations flag.
//!
//! # Examples
//!
//! ```no_run
//! use clap::Parser;
//! use force_deprecation_check::{Config, run_deprecation_check};
//! use std::io::{BufWriter, Write};
//!
//! # fn main() -> anyhow::Result<()> {
//! let cfg = Config::parse_from(["check", "--root", "/path/to/project"]);
//! let result = run_deprecation_check(cfg.clone())?;
//!
//! if !result.warnings.is_empty() {
//!     let mut stdout = BufWriter::new(std::io::stdout());
//!     force_deprecation_check::print_warnings_tree(&mut stdout, &result.warnings, &cfg)?;
//!     stdout.flush()?;
//! }
//! # Ok(())
//! # }
//! ```

mod checker;
mod config;
mod reporter;
mod types;

// Re-export public API
pub use checker::run_deprecation_check;
pub use config::{Config, OutputFormat};
pub use reporter::{print_json, print_no_deprecations_message, print_warnings_tree};
pub use types::{CheckResult, Warning};
