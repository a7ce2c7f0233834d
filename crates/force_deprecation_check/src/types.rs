use serde::Serialize;

/// One deprecated import, located for display.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Warning {
    /// Path relative to the project root
    pub file: String,
    /// 1-based line of the start of the range
    pub line: usize,
    /// 1-based column, in characters
    pub column: usize,
    pub start: u32,
    pub length: u32,
    pub message: String,
    pub code: u32,
    /// The reported source text, whitespace collapsed
    pub snippet: String,
}

#[derive(Debug, Clone)]
pub struct CheckResult {
    pub warnings: Vec<Warning>,
    pub files_analyzed: usize,
    pub rules: usize,
}
