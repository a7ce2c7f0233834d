use dashmap::DashMap;
use log::{debug, trace};
use path_clean::clean;
use std::{
    collections::HashMap,
    fs,
    path::{Path, PathBuf},
};

use crate::constants::{INDEX_FILES, RESOLVE_EXTENSIONS};

pub fn is_relative_request(request: &str) -> bool {
    request.starts_with("./") || request.starts_with("../") || request.starts_with('/')
}

/// Resolves an import request made by `from_file` to a file on disk.
///
/// Relative requests are resolved against the importing file, anything else
/// goes through tsconfig path aliases and then `node_modules` lookup, walking
/// up to `root`.
pub fn resolve_module(
    root: &Path,
    tsconfig_paths: &HashMap<String, Vec<String>>,
    from_file: &Path,
    request: &str,
    cache: &DashMap<(PathBuf, String), Option<PathBuf>>,
) -> Option<PathBuf> {
    let key = (from_file.to_path_buf(), request.to_string());
    if let Some(v) = cache.get(&key) {
        trace!("Cache hit for resolve: '{}' from {}", request, from_file.display());
        return v.clone();
    }
    trace!("Resolving: '{}' from {}", request, from_file.display());

    let resolved = if is_relative_request(request) {
        let base = from_file.parent().unwrap_or(root);
        let p = clean(base.join(request));
        resolve_file(Path::new(&p))
    } else {
        resolve_alias(tsconfig_paths, request).or_else(|| {
            trace!("Resolving as node_modules package: '{}'", request);
            let start_dir = from_file.parent().unwrap_or(root);
            resolve_node_module_from_dir(start_dir, request, root)
        })
    };

    match &resolved {
        Some(p) => debug!("Resolved '{}' from {} to {}", request, from_file.display(), p.display()),
        None => trace!("Failed to resolve '{}' from {}", request, from_file.display()),
    }
    cache.insert(key, resolved.clone());
    resolved
}

fn resolve_alias(tsconfig_paths: &HashMap<String, Vec<String>>, request: &str) -> Option<PathBuf> {
    // Longest alias first so that `@app/ui` wins over `@app`
    let mut aliases: Vec<_> = tsconfig_paths
        .iter()
        .filter(|(alias, _)| {
            request == alias.as_str()
                || request.strip_prefix(alias.as_str()).is_some_and(|rest| rest.starts_with('/'))
        })
        .collect();
    aliases.sort_by(|a, b| b.0.len().cmp(&a.0.len()));

    for (alias, targets) in aliases {
        trace!("Matched alias '{}' for request '{}'", alias, request);
        let remainder = request[alias.len()..].trim_start_matches('/');
        for target in targets {
            let candidate = if remainder.is_empty() {
                PathBuf::from(target)
            } else {
                PathBuf::from(target).join(remainder)
            };
            if let Some(resolved) = resolve_file(&candidate) {
                return Some(resolved);
            }
        }
    }
    None
}

fn resolve_file(p: &Path) -> Option<PathBuf> {
    if p.is_file() {
        return Some(p.canonicalize().unwrap_or_else(|_| p.to_path_buf()));
    }

    for ext in RESOLVE_EXTENSIONS {
        let candidate = PathBuf::from(format!("{}.{}", p.display(), ext));
        if candidate.is_file() {
            return Some(candidate.canonicalize().unwrap_or(candidate));
        }
    }

    for index_file in INDEX_FILES {
        let candidate = p.join(index_file);
        if candidate.is_file() {
            return Some(candidate.canonicalize().unwrap_or(candidate));
        }
    }

    None
}

fn resolve_node_module_from_dir(
    start_dir: &Path,
    pkg: &str,
    workspace_root: &Path,
) -> Option<PathBuf> {
    let mut current_dir = start_dir;

    loop {
        let result = resolve_node_module(current_dir, pkg);
        if result.is_some() {
            return result;
        }

        if current_dir == workspace_root {
            break;
        }

        current_dir = current_dir.parent()?;
    }

    None
}

fn resolve_node_module(dir: &Path, pkg: &str) -> Option<PathBuf> {
    // Scoped packages like @scope/ui are nested directories
    let nm = dir.join("node_modules").join(pkg);
    if !nm.exists() {
        return None;
    }
    trace!("Checking node_modules at: {:?}", nm);

    let pkg_json = nm.join("package.json");
    if let Ok(txt) = fs::read_to_string(&pkg_json)
        && let Ok(v) = serde_json::from_str::<serde_json::Value>(&txt)
    {
        let entries = package_entry_points(&v);
        for entry in entries {
            if let Some(resolved) = resolve_file(&nm.join(entry.trim_start_matches("./"))) {
                return Some(resolved);
            }
        }
    }

    resolve_file(&nm)
}

/// Candidate entry points of a `package.json`, in lookup order.
fn package_entry_points(pkg: &serde_json::Value) -> Vec<&str> {
    let mut entries = Vec::new();

    // Type declarations first, then the modern exports map
    for field in ["types", "typings"] {
        if let Some(s) = pkg.get(field).and_then(|x| x.as_str()) {
            entries.push(s);
        }
    }

    if let Some(exports) = pkg.get("exports") {
        let dot = exports.as_object().and_then(|o| o.get(".")).unwrap_or(exports);
        if let Some(s) = dot.as_str() {
            entries.push(s);
        }
        // Conditional exports like { ".": { "import": "./dist/index.js" } }
        if let Some(conditions) = dot.as_object() {
            for key in ["types", "import", "require", "default"] {
                if let Some(s) = conditions.get(key).and_then(|x| x.as_str()) {
                    entries.push(s);
                }
            }
        }
    }

    for field in ["module", "main"] {
        if let Some(s) = pkg.get(field).and_then(|x| x.as_str()) {
            entries.push(s);
        }
    }

    entries
}
