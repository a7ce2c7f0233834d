use anyhow::{Context, Result, anyhow};
use ignore::WalkBuilder;
use log::{debug, trace};
use path_clean::clean;
use std::{
    collections::HashMap,
    env, fs,
    path::{Path, PathBuf},
};

pub fn find_git_root() -> Result<PathBuf> {
    debug!("Searching for git root");
    let mut current_dir = env::current_dir()?;
    trace!("Starting search from: {:?}", current_dir);

    loop {
        if current_dir.join(".git").exists() {
            debug!("Found git root at: {:?}", current_dir);
            return Ok(current_dir);
        }

        match current_dir.parent() {
            Some(parent) => current_dir = parent.to_path_buf(),
            None => {
                debug!("Could not find .git directory in any parent folder");
                return Err(anyhow!("Could not find .git directory in any parent folder"));
            }
        }
    }
}

/// Removes `//` and `/* */` comments and trailing commas, leaving string
/// literals untouched.
pub fn strip_json_comments(content: &str) -> String {
    let mut out = String::with_capacity(content.len());
    let mut chars = content.chars().peekable();
    let mut in_string = false;

    while let Some(c) = chars.next() {
        if in_string {
            out.push(c);
            match c {
                '\\' => {
                    if let Some(escaped) = chars.next() {
                        out.push(escaped);
                    }
                }
                '"' => in_string = false,
                _ => {}
            }
            continue;
        }

        match c {
            '"' => {
                in_string = true;
                out.push(c);
            }
            '/' if chars.peek() == Some(&'/') => {
                while chars.next_if(|&n| n != '\n').is_some() {}
            }
            '/' if chars.peek() == Some(&'*') => {
                chars.next();
                let mut prev = '\0';
                for n in chars.by_ref() {
                    if prev == '*' && n == '/' {
                        break;
                    }
                    prev = n;
                }
            }
            _ => out.push(c),
        }
    }

    strip_trailing_commas(&out)
}

fn strip_trailing_commas(content: &str) -> String {
    let chars: Vec<char> = content.chars().collect();
    let mut out = String::with_capacity(content.len());
    let mut in_string = false;
    let mut i = 0;

    while i < chars.len() {
        let c = chars[i];
        if in_string {
            match c {
                '\\' => {
                    out.push(c);
                    i += 1;
                    if let Some(&escaped) = chars.get(i) {
                        out.push(escaped);
                    }
                }
                '"' => {
                    in_string = false;
                    out.push(c);
                }
                _ => out.push(c),
            }
        } else if c == '"' {
            in_string = true;
            out.push(c);
        } else if c == ',' {
            let next = chars[i + 1..].iter().find(|n| !n.is_whitespace());
            if !matches!(next, Some('}') | Some(']')) {
                out.push(c);
            }
        } else {
            out.push(c);
        }
        i += 1;
    }

    out
}

/// Reads a JSON file that may contain comments and trailing commas, as
/// `tsconfig.json` files do.
pub fn read_json_with_comments(path: &Path) -> Result<serde_json::Value> {
    let content =
        fs::read_to_string(path).with_context(|| format!("Failed to read {}", path.display()))?;
    serde_json::from_str(&strip_json_comments(&content))
        .with_context(|| format!("Failed to parse {}", path.display()))
}

pub fn read_tsconfig_paths(root: &Path) -> HashMap<String, Vec<String>> {
    debug!("Reading tsconfig paths from root: {:?}", root);
    let mut paths = HashMap::new();

    let walker = WalkBuilder::new(root)
        .hidden(false)
        .git_ignore(true)
        .filter_entry(|e| e.file_name() != "node_modules")
        .build();

    let mut tsconfig_files = Vec::new();
    for entry in walker.filter_map(|e| e.ok()) {
        let path = entry.path();
        if path.file_name().and_then(|n| n.to_str()) == Some("tsconfig.json") {
            trace!("Found tsconfig at: {:?}", path);
            tsconfig_files.push(path.to_path_buf());
        }
    }
    // Shallower configs first so nested ones override their aliases
    tsconfig_files.sort_by_key(|p| p.components().count());

    debug!("Found {} tsconfig.json files", tsconfig_files.len());

    for tsconfig_path in &tsconfig_files {
        let json = match read_json_with_comments(tsconfig_path) {
            Ok(json) => json,
            Err(e) => {
                debug!("Skipping tsconfig: {:#}", e);
                continue;
            }
        };

        if let Some(compiler_options) = json.get("compilerOptions")
            && let Some(paths_obj) = compiler_options.get("paths").and_then(|p| p.as_object())
        {
            let base_url = compiler_options.get("baseUrl").and_then(|b| b.as_str()).unwrap_or(".");

            let tsconfig_dir = tsconfig_path.parent().unwrap_or(root);
            let base_path = tsconfig_dir.join(base_url);

            for (alias, targets) in paths_obj {
                if let Some(target_arr) = targets.as_array() {
                    let resolved_targets: Vec<String> = target_arr
                        .iter()
                        .filter_map(|t| t.as_str())
                        .map(|t| {
                            clean(base_path.join(t.trim_end_matches("/*")))
                                .to_string_lossy()
                                .to_string()
                        })
                        .collect();

                    if !resolved_targets.is_empty() {
                        let alias_key = alias.trim_end_matches("/*").to_string();
                        trace!("Found tsconfig path alias: '{}' -> {:?}", alias_key, resolved_targets);
                        paths.insert(alias_key, resolved_targets);
                    }
                }
            }
        }
    }

    debug!("Loaded {} tsconfig path aliases", paths.len());
    paths
}
