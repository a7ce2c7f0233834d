use anyhow::{Result, anyhow};
use force_deprecation_core::{
    DeprecationPlugin, Diagnostic, LanguageService, OptionsSource, Program, config_to_rules,
};
use force_deprecation_oxc::{CollectorConfig, ConfigFile, ProjectService, collect_source_files};
use log::{debug, info, trace, warn};
use rayon::prelude::*;
use std::thread;

use crate::{
    config::Config,
    types::{CheckResult, Warning},
};

const SNIPPET_MAX_CHARS: usize = 80;

pub fn run_deprecation_check(mut cfg: Config) -> Result<CheckResult> {
    info!("Starting deprecation check");

    cfg.initialize()?;
    let root = cfg.root()?.clone();

    let options = ConfigFile::new(cfg.options_file()?);
    // Fail fast here; per-file loads only log
    let rules = config_to_rules(&options.load()?).len();
    if rules == 0 {
        warn!("No deprecations configured in {}", options.path().display());
    }
    info!("Loaded {} deprecation rules from {}", rules, options.path().display());

    debug!("Collecting source files with glob: {:?}", cfg.entry_glob);
    let files = collect_source_files(&CollectorConfig {
        root: root.clone(),
        entry_glob: cfg.entry_glob.clone(),
        include_tests: cfg.include_tests,
    })?;
    if files.is_empty() {
        warn!("No source files found under {}", root.display());
        return Err(anyhow!("No source files found under {}", root.display()));
    }
    info!("Checking {} source files", files.len());

    let service = ProjectService::new(root.clone(), cfg.tsconfig_paths.clone());
    let plugin = DeprecationPlugin::new(service, options);

    let mut warnings: Vec<Warning> = files
        .par_iter()
        .flat_map(|file| {
            let thread_id = thread::current().id();
            trace!("Thread {:?} processing: {}", thread_id, file.display());

            let deprecations: Vec<Diagnostic> = plugin
                .semantic_diagnostics(file)
                .into_iter()
                .filter(|d| d.reports_deprecated)
                .collect();
            if deprecations.is_empty() {
                return vec![];
            }

            let Some(source) = plugin.program().and_then(|p| p.source_file(file)) else {
                return vec![];
            };
            let rel_file = file.strip_prefix(&root).unwrap_or(file).to_string_lossy().to_string();
            debug!("{} deprecated imports in {}", deprecations.len(), rel_file);

            deprecations.iter().map(|d| to_warning(&rel_file, &source.text, d)).collect()
        })
        .collect();
    warnings.sort_by(|a, b| (&a.file, a.start).cmp(&(&b.file, b.start)));

    let (modules, resolutions) = plugin.service().checker().cache_sizes();
    info!("Deprecation check complete. Found {} warnings", warnings.len());
    debug!("Cache statistics: modules={}, resolutions={}", modules, resolutions);

    Ok(CheckResult { warnings, files_analyzed: files.len(), rules })
}

fn to_warning(rel_file: &str, text: &str, d: &Diagnostic) -> Warning {
    let start = floor_char_boundary(text, d.start as usize);
    let end = floor_char_boundary(text, d.end() as usize).max(start);
    let (line, column) = line_col(text, start);

    Warning {
        file: rel_file.to_string(),
        line,
        column,
        start: d.start,
        length: d.length,
        message: d.message.clone(),
        code: d.code,
        snippet: snippet(&text[start..end]),
    }
}

fn floor_char_boundary(text: &str, offset: usize) -> usize {
    let mut offset = offset.min(text.len());
    while !text.is_char_boundary(offset) {
        offset -= 1;
    }
    offset
}

/// 1-based line and character column of a byte offset.
pub(crate) fn line_col(text: &str, offset: usize) -> (usize, usize) {
    let before = &text[..floor_char_boundary(text, offset)];
    let line = before.matches('\n').count() + 1;
    let line_start = before.rfind('\n').map_or(0, |i| i + 1);
    (line, before[line_start..].chars().count() + 1)
}

fn snippet(source: &str) -> String {
    let collapsed = source.split_whitespace().collect::<Vec<_>>().join(" ");
    if collapsed.chars().count() <= SNIPPET_MAX_CHARS {
        return collapsed;
    }
    let mut cut: String = collapsed.chars().take(SNIPPET_MAX_CHARS - 1).collect();
    cut.push('…');
    cut
}
