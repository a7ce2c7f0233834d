use anyhow::Result;
use ignore::WalkBuilder;
use log::{debug, trace};
use std::path::PathBuf;

use crate::constants::JS_TS_EXTENSIONS;

pub struct CollectorConfig {
    pub root: PathBuf,
    pub entry_glob: Option<String>,
    pub include_tests: bool,
}

/// Collects the JS/TS source files under `root`, honoring `.gitignore` and
/// skipping `node_modules` and declaration files.
pub fn collect_source_files(cfg: &CollectorConfig) -> Result<Vec<PathBuf>> {
    debug!("Collecting source files");
    let mut files: Vec<PathBuf> = Vec::new();
    let root = &cfg.root;
    debug!("Walking directory tree from root: {}", root.display());
    let walker = WalkBuilder::new(root)
        .hidden(false)
        .ignore(true)
        .git_ignore(true)
        .filter_entry(|e| e.file_name() != "node_modules")
        .build();

    for res in walker {
        let dent = res?;
        let p = dent.path();
        if !p.is_file() {
            continue;
        }

        let path_str = p.to_string_lossy();
        if path_str.ends_with(".d.ts") {
            continue;
        }
        if !cfg.include_tests && (path_str.contains(".test.") || path_str.contains(".spec.")) {
            trace!("Skipping test file: {}", path_str);
            continue;
        }

        if let Some(ext) = p.extension().and_then(|e| e.to_str())
            && JS_TS_EXTENSIONS.contains(&ext)
        {
            // Match if the path relative to root contains the pattern
            if let Some(gl) = &cfg.entry_glob {
                let rel = p.strip_prefix(root).unwrap_or(p).to_string_lossy();
                if !rel.contains(gl.as_str()) {
                    continue;
                }
            }
            trace!("Found source file: {}", p.display());
            files.push(p.to_path_buf());
        }
    }

    files.sort();
    debug!("Collected {} source files", files.len());
    Ok(files)
}
