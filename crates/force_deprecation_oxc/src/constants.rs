//! Constants for file extensions, module resolution and native diagnostics.
//!
//! - **TypeScript**: `.ts`, `.tsx`, `.mts` (ES module), `.cts` (CommonJS)
//! - **JavaScript**: `.js`, `.jsx`, `.mjs` (ES module), `.cjs` (CommonJS)

/// File extensions for JavaScript/TypeScript files that should be analyzed
pub const JS_TS_EXTENSIONS: &[&str] = &["ts", "tsx", "mts", "cts", "js", "jsx", "mjs", "cjs"];

/// Extensions to try when resolving module imports (in priority order)
pub const RESOLVE_EXTENSIONS: &[&str] =
    &["ts", "tsx", "d.ts", "mts", "cts", "js", "jsx", "mjs", "cjs"];

/// Index file names to try when resolving directory imports
pub const INDEX_FILES: &[&str] = &[
    "index.ts",
    "index.tsx",
    "index.d.ts",
    "index.mts",
    "index.cts",
    "index.js",
    "index.jsx",
    "index.mjs",
    "index.cjs",
];

/// Code of native diagnostics for source text that failed to parse.
pub const SYNTAX_ERROR_CODE: u32 = 1000;

/// Code of native diagnostics for relative imports that resolve to no file.
pub const MODULE_NOT_FOUND_CODE: u32 = 2307;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolve_extensions_cover_analyzed_extensions() {
        for ext in JS_TS_EXTENSIONS {
            assert!(RESOLVE_EXTENSIONS.contains(ext), "RESOLVE_EXTENSIONS missing '{}'", ext);
        }
    }

    #[test]
    fn test_index_files_follow_resolve_extensions() {
        assert_eq!(INDEX_FILES.len(), RESOLVE_EXTENSIONS.len());
        for ext in RESOLVE_EXTENSIONS {
            let expected = format!("index.{}", ext);
            assert!(INDEX_FILES.contains(&expected.as_str()), "INDEX_FILES missing '{}'", expected);
        }
    }

    #[test]
    fn test_native_codes_differ_from_deprecation_code() {
        assert_ne!(SYNTAX_ERROR_CODE, force_deprecation_core::DEPRECATION_CODE);
        assert_ne!(MODULE_NOT_FOUND_CODE, force_deprecation_core::DEPRECATION_CODE);
    }
}
