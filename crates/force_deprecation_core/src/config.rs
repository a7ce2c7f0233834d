use anyhow::{Context, Result};
use log::{debug, trace};
use serde::Deserialize;

use crate::types::{DeprecationRule, TargetName};

/// Identifier of the plugin entry in `compilerOptions.plugins`.
pub const PLUGIN_NAME: &str = "ts-force-deprecation";

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct PluginOptions {
    #[serde(default)]
    pub name: Option<String>,

    /// List of deprecations to enforce.
    ///
    /// A string deprecates the entire module, an object deprecates the
    /// listed targets within the module.
    #[serde(default)]
    pub deprecations: Option<Vec<DeprecationEntry>>,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(untagged)]
pub enum DeprecationEntry {
    Module(String),
    Set(DeprecationSet),
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct DeprecationSet {
    pub module: String,
    pub target: Vec<TargetEntry>,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(untagged)]
pub enum TargetEntry {
    Name(String),
    Detailed(Deprecation),
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Deprecation {
    pub name: String,
    /// Message to display when the target is used.
    pub message: String,
}

impl PluginOptions {
    /// Extracts this plugin's entry from a parsed `tsconfig.json`.
    ///
    /// Returns `Ok(None)` when no entry in `compilerOptions.plugins` carries
    /// [`PLUGIN_NAME`].
    pub fn from_tsconfig(tsconfig: &serde_json::Value) -> Result<Option<Self>> {
        let Some(plugins) = tsconfig
            .get("compilerOptions")
            .and_then(|c| c.get("plugins"))
            .and_then(|p| p.as_array())
        else {
            trace!("tsconfig has no compilerOptions.plugins");
            return Ok(None);
        };

        let Some(entry) =
            plugins.iter().find(|p| p.get("name").and_then(|n| n.as_str()) == Some(PLUGIN_NAME))
        else {
            debug!("No '{}' entry among {} tsconfig plugins", PLUGIN_NAME, plugins.len());
            return Ok(None);
        };

        let options = Self::deserialize(entry)
            .with_context(|| format!("Invalid options for plugin '{}'", PLUGIN_NAME))?;
        Ok(Some(options))
    }
}

/// Something able to produce the current plugin options.
///
/// Called once per diagnostics request so that edits take effect without a
/// restart.
pub trait OptionsSource {
    fn load(&self) -> Result<PluginOptions>;
}

impl OptionsSource for PluginOptions {
    fn load(&self) -> Result<PluginOptions> {
        Ok(self.clone())
    }
}

impl<T: OptionsSource + ?Sized> OptionsSource for &T {
    fn load(&self) -> Result<PluginOptions> {
        (**self).load()
    }
}

/// Flattens the options into one rule per deprecated target, in input order.
pub fn config_to_rules(options: &PluginOptions) -> Vec<DeprecationRule> {
    let mut rules = Vec::new();

    for entry in options.deprecations.iter().flatten() {
        match entry {
            DeprecationEntry::Module(module) => rules.push(DeprecationRule {
                module: module.clone(),
                target: TargetName::Wildcard,
                message: format!("{} is deprecated", module),
            }),
            DeprecationEntry::Set(set) => {
                for target in &set.target {
                    let rule = match target {
                        TargetEntry::Name(name) => DeprecationRule {
                            module: set.module.clone(),
                            target: TargetName::Named(name.clone()),
                            message: format!("{} is deprecated", name),
                        },
                        TargetEntry::Detailed(d) => DeprecationRule {
                            module: set.module.clone(),
                            target: TargetName::Named(d.name.clone()),
                            message: d.message.clone(),
                        },
                    };
                    rules.push(rule);
                }
            }
        }
    }

    trace!("Normalized {} deprecation rules", rules.len());
    rules
}
