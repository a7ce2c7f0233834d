use anyhow::{Context, Result};
use force_deprecation_core::{OptionsSource, PluginOptions};
use log::trace;
use std::path::{Path, PathBuf};

use crate::config::read_json_with_comments;

/// Plugin options backed by a JSON file, re-read on every [`OptionsSource::load`].
///
/// A file with `compilerOptions` is treated as a `tsconfig.json` and the
/// plugin's entry is taken from `compilerOptions.plugins`; any other file is
/// the options object itself.
#[derive(Debug, Clone)]
pub struct ConfigFile {
    path: PathBuf,
}

impl ConfigFile {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl OptionsSource for ConfigFile {
    fn load(&self) -> Result<PluginOptions> {
        trace!("Loading plugin options from {}", self.path.display());
        let json = read_json_with_comments(&self.path)?;

        if json.get("compilerOptions").is_some() {
            let options = PluginOptions::from_tsconfig(&json)
                .with_context(|| format!("In {}", self.path.display()))?;
            return Ok(options.unwrap_or_default());
        }

        serde_json::from_value(json)
            .with_context(|| format!("Invalid plugin options in {}", self.path.display()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use force_deprecation_core::{DeprecationEntry, config_to_rules};
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_tsconfig_plugin_entry() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("tsconfig.json");
        fs::write(
            &path,
            r#"{
  "compilerOptions": {
    // editor plugins
    "plugins": [{ "name": "ts-force-deprecation", "deprecations": ["moment"] }],
  },
}"#,
        )
        .unwrap();

        let options = ConfigFile::new(&path).load().unwrap();
        assert_eq!(options.deprecations, Some(vec![DeprecationEntry::Module("moment".to_string())]));
    }

    #[test]
    fn test_tsconfig_without_plugin_is_empty() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("tsconfig.json");
        fs::write(&path, r#"{ "compilerOptions": { "strict": true } }"#).unwrap();

        let options = ConfigFile::new(&path).load().unwrap();
        assert!(config_to_rules(&options).is_empty());
    }

    #[test]
    fn test_bare_options_file() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("deprecations.json");
        fs::write(&path, r#"{ "deprecations": [{ "module": "lodash", "target": ["chain"] }] }"#)
            .unwrap();

        let rules = config_to_rules(&ConfigFile::new(&path).load().unwrap());
        assert_eq!(rules.len(), 1);
        assert_eq!(rules[0].message, "chain is deprecated");
    }

    #[test]
    fn test_edits_are_picked_up() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("deprecations.json");
        let source = ConfigFile::new(&path);

        fs::write(&path, r#"{ "deprecations": ["a"] }"#).unwrap();
        assert_eq!(config_to_rules(&source.load().unwrap()).len(), 1);

        fs::write(&path, r#"{ "deprecations": ["a", "b"] }"#).unwrap();
        assert_eq!(config_to_rules(&source.load().unwrap()).len(), 2);
    }

    #[test]
    fn test_invalid_options_error() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("deprecations.json");
        fs::write(&path, r#"{ "deprecations": [1, 2] }"#).unwrap();
        assert!(ConfigFile::new(&path).load().is_err());

        assert!(ConfigFile::new(temp_dir.path().join("missing.json")).load().is_err());
    }
}
