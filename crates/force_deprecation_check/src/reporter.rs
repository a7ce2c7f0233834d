use std::{
    collections::{BTreeMap, HashMap, HashSet},
    env,
    io::{self, Write},
    path::{Component, Path, PathBuf},
};

use colored::Colorize;
use log::{debug, trace};

use crate::{config::Config, types::Warning};

const TOP_MESSAGES: usize = 5;

/// Relativize a path to the current working directory for clickable links
fn relativize_to_cwd(root: &Path, relative_to_root: &str) -> String {
    let cwd = match env::current_dir() {
        Ok(cwd) => cwd,
        Err(_) => {
            debug!("Failed to get current directory");
            return relative_to_root.to_string();
        }
    };

    match make_relative(&root.join(relative_to_root), &cwd) {
        Some(rel_path) => rel_path.to_string_lossy().to_string(),
        None => {
            trace!("Could not relativize '{}', using original", relative_to_root);
            relative_to_root.to_string()
        }
    }
}

/// Create a relative path from `base` to `target`
fn make_relative(target: &Path, base: &Path) -> Option<PathBuf> {
    let mut target_components = target.components().peekable();
    let mut base_components = base.components().peekable();

    let mut shared = 0;
    // Find common prefix
    while let (Some(t), Some(b)) =
        (target_components.peek().copied(), base_components.peek().copied())
        && t == b
    {
        target_components.next();
        base_components.next();
        shared += 1;
    }

    // Nothing in common, not even the root
    if shared == 0 && target.components().next() != base.components().next() {
        return None;
    }

    let mut result = PathBuf::new();
    for _ in base_components {
        result.push("..");
    }
    for component in target_components {
        match component {
            Component::Normal(p) => result.push(p),
            Component::ParentDir => result.push(".."),
            Component::CurDir | Component::RootDir | Component::Prefix(_) => {}
        }
    }

    if result.as_os_str().is_empty() { Some(PathBuf::from(".")) } else { Some(result) }
}

fn display_path(cfg: &Config, file: &str) -> String {
    match &cfg.root {
        Some(root) => relativize_to_cwd(root, file),
        None => file.to_string(),
    }
}

pub fn print_no_deprecations_message<W: Write>(
    writer: &mut W,
    files_analyzed: usize,
) -> io::Result<()> {
    debug!("No deprecated imports found");
    writeln!(
        writer,
        "{} No deprecated imports found in {} files",
        "✓".green().bold(),
        files_analyzed
    )?;
    writer.flush()?;
    Ok(())
}

pub fn print_warnings_tree<W: Write>(
    writer: &mut W,
    warnings: &[Warning],
    cfg: &Config,
) -> io::Result<()> {
    debug!("Printing warnings tree for {} warnings", warnings.len());
    let mut by_file: BTreeMap<&str, Vec<&Warning>> = BTreeMap::new();
    for w in warnings {
        by_file.entry(w.file.as_str()).or_default().push(w);
    }

    writeln!(writer, "{} Deprecated imports found\n", "⚠".yellow().bold())?;

    for (file, mut file_warnings) in by_file {
        trace!("Processing file: {} with {} warnings", file, file_warnings.len());
        file_warnings.sort_by_key(|w| (w.line, w.column));

        writeln!(writer, "{}", display_path(cfg, file).bright_white().bold())?;
        for (idx, warning) in file_warnings.iter().enumerate() {
            let prefix = if idx == file_warnings.len() - 1 { "└──" } else { "├──" };
            writeln!(
                writer,
                "{}  {} {}",
                prefix.dimmed(),
                format!("{}:{}", warning.line, warning.column).blue(),
                warning.message.yellow()
            )?;
            let indent = if idx == file_warnings.len() - 1 { " " } else { "│" };
            writeln!(writer, "{}     {}", indent.dimmed(), warning.snippet.dimmed())?;
        }
        writeln!(writer)?;
    }

    print_summary(writer, warnings)?;

    writer.flush()?;
    Ok(())
}

fn print_summary<W: Write>(writer: &mut W, warnings: &[Warning]) -> io::Result<()> {
    if warnings.is_empty() {
        return Ok(());
    }

    let files = warnings.iter().map(|w| w.file.as_str()).collect::<HashSet<_>>();

    let mut counts: HashMap<&str, usize> = HashMap::new();
    for w in warnings {
        *counts.entry(w.message.as_str()).or_default() += 1;
    }
    let mut top: Vec<(&str, usize)> = counts.into_iter().collect();
    top.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(b.0)));
    top.truncate(TOP_MESSAGES);

    writeln!(writer, "{}", "─".repeat(60).dimmed())?;
    writeln!(writer, "{}", "Summary".bold())?;
    writeln!(writer, "  Deprecated imports: {}", warnings.len().to_string().yellow().bold())?;
    writeln!(writer, "  Files affected: {}", files.len().to_string().yellow().bold())?;
    writeln!(writer, "  Top {} messages:", top.len())?;
    for (idx, (message, count)) in top.iter().enumerate() {
        writeln!(writer, "    {}. {} ({})", idx + 1, message, count.to_string().red())?;
    }

    Ok(())
}

/// Writes the findings as a pretty-printed JSON array.
pub fn print_json<W: Write>(writer: &mut W, warnings: &[Warning]) -> io::Result<()> {
    serde_json::to_writer_pretty(&mut *writer, warnings)?;
    writeln!(writer)?;
    writer.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::OutputFormat;

    fn warning(file: &str, line: usize, message: &str) -> Warning {
        Warning {
            file: file.to_string(),
            line,
            column: 1,
            start: 0,
            length: 10,
            message: message.to_string(),
            code: 9999,
            snippet: "import x from 'x';".to_string(),
        }
    }

    fn config() -> Config {
        Config {
            root: None,
            config: None,
            entry_glob: None,
            include_tests: false,
            format: OutputFormat::Text,
            tsconfig_paths: HashMap::new(),
        }
    }

    fn render<F: FnOnce(&mut Vec<u8>) -> io::Result<()>>(f: F) -> String {
        colored::control::set_override(false);
        let mut out = Vec::new();
        f(&mut out).unwrap();
        String::from_utf8(out).unwrap()
    }

    #[test]
    fn test_make_relative_same_dir() {
        let target = Path::new("/project/src/file.ts");
        let base = Path::new("/project/src");
        assert_eq!(make_relative(target, base), Some(PathBuf::from("file.ts")));
    }

    #[test]
    fn test_make_relative_child_dir() {
        let target = Path::new("/project/src/components/Button.tsx");
        let base = Path::new("/project/src");
        assert_eq!(make_relative(target, base), Some(PathBuf::from("components/Button.tsx")));
    }

    #[test]
    fn test_make_relative_sibling_dir() {
        let target = Path::new("/project/apps/web/index.ts");
        let base = Path::new("/project/apps/api");
        assert_eq!(make_relative(target, base), Some(PathBuf::from("../web/index.ts")));
    }

    #[test]
    fn test_make_relative_same_path() {
        let path = Path::new("/project/src");
        assert_eq!(make_relative(path, path), Some(PathBuf::from(".")));
    }

    #[test]
    fn test_make_relative_multiple_levels_up() {
        let target = Path::new("/project/file.ts");
        let base = Path::new("/project/apps/web/src");
        assert_eq!(make_relative(target, base), Some(PathBuf::from("../../../file.ts")));
    }

    #[test]
    fn test_make_relative_without_shared_root() {
        assert_eq!(make_relative(Path::new("relative/file.ts"), Path::new("/project")), None);
    }

    #[test]
    fn test_tree_groups_by_file() {
        let warnings = vec![
            warning("src/b.ts", 4, "use qux"),
            warning("src/a.ts", 9, "moment is deprecated"),
            warning("src/a.ts", 2, "use qux"),
        ];
        let out = render(|w| print_warnings_tree(w, &warnings, &config()));

        let a = out.find("src/a.ts").unwrap();
        let b = out.find("src/b.ts").unwrap();
        assert!(a < b);
        assert!(out.contains("├──  2:1 use qux"));
        assert!(out.contains("└──  9:1 moment is deprecated"));
        assert!(out.contains("Deprecated imports: 3"));
        assert!(out.contains("Files affected: 2"));
        assert!(out.contains("1. use qux (2)"));
    }

    #[test]
    fn test_no_deprecations_message() {
        let out = render(|w| print_no_deprecations_message(w, 12));
        assert!(out.contains("No deprecated imports found in 12 files"));
    }

    #[test]
    fn test_json_is_an_array_of_findings() {
        let warnings = vec![warning("src/a.ts", 2, "use qux")];
        let out = render(|w| print_json(w, &warnings));

        let value: serde_json::Value = serde_json::from_str(&out).unwrap();
        assert_eq!(value[0]["file"], "src/a.ts");
        assert_eq!(value[0]["line"], 2);
        assert_eq!(value[0]["message"], "use qux");
    }
}
