use serde::Serialize;
use std::{fmt, path::PathBuf};

/// Code carried by every diagnostic this plugin emits.
pub const DEPRECATION_CODE: u32 = 9999;

/// What a rule deprecates within its module.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum TargetName {
    /// Every export of the module.
    Wildcard,
    /// A single named export.
    Named(String),
}

impl fmt::Display for TargetName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Wildcard => write!(f, "*"),
            Self::Named(name) => write!(f, "{}", name),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeprecationRule {
    pub module: String,
    pub target: TargetName,
    pub message: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum DiagnosticCategory {
    Error,
    Warning,
    Suggestion,
    Message,
}

/// A finding tied to a byte range `[start, start + length)` of a file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Diagnostic {
    pub file: PathBuf,
    pub start: u32,
    pub length: u32,
    pub message: String,
    pub category: DiagnosticCategory,
    pub code: u32,
    pub reports_deprecated: bool,
}

impl Diagnostic {
    pub fn end(&self) -> u32 {
        self.start + self.length
    }
}
