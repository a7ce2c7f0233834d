use anyhow::{Result, anyhow};
use clap::{Parser, ValueEnum};
use log::{debug, info};
use std::{collections::HashMap, path::PathBuf};

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
}

#[derive(Debug, Clone, Parser)]
#[command(name = "check")]
#[command(about = "Report imports of deprecated modules and exports")]
pub struct Config {
    /// Root directory of the project (defaults to git root)
    #[arg(long)]
    pub root: Option<PathBuf>,

    /// Options file: a tsconfig.json with a ts-force-deprecation plugin entry,
    /// or a bare options object (defaults to <root>/tsconfig.json)
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Only check files whose path relative to the root contains this pattern
    #[arg(long)]
    pub entry_glob: Option<String>,

    /// Also check *.test.* and *.spec.* files
    #[arg(long)]
    pub include_tests: bool,

    #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
    pub format: OutputFormat,

    #[clap(skip)]
    pub tsconfig_paths: HashMap<String, Vec<String>>,
}

impl Config {
    /// Initialize the config by resolving the root directory and loading tsconfig paths
    pub fn initialize(&mut self) -> Result<()> {
        let root = if let Some(r) = self.root.take() {
            debug!("Using provided root directory: {:?}", r);
            r.canonicalize().unwrap_or(r)
        } else {
            debug!("No root provided, searching for git root");
            force_deprecation_oxc::find_git_root()?
        };
        info!("Using root directory: {}", root.display());

        debug!("Reading tsconfig paths");
        self.tsconfig_paths = force_deprecation_oxc::read_tsconfig_paths(&root);
        debug!("Found {} tsconfig path aliases", self.tsconfig_paths.len());

        self.root = Some(root);
        Ok(())
    }

    /// Get the root directory, returning an error if not initialized
    pub fn root(&self) -> Result<&PathBuf> {
        self.root
            .as_ref()
            .ok_or_else(|| anyhow!("Config not initialized - call initialize() first"))
    }

    /// The file plugin options are read from.
    pub fn options_file(&self) -> Result<PathBuf> {
        match &self.config {
            Some(path) => Ok(path.clone()),
            None => Ok(self.root()?.join("tsconfig.json")),
        }
    }
}
