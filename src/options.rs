use serde::{Deserialize, Serialize};

/// Options for annotation extraction.
///
/// Every public entry point takes its options explicitly; there is no
/// process-wide configuration state.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScanOptions {
    /// Recurse into subdirectories when the path is a directory.
    pub recursive: bool,
    /// Regex applied to file names; only matching files are scanned.
    pub include_pattern: String,
    /// Regex fragments, OR-combined; a path containing any match is
    /// dropped. Accepts a comma-joined string per fragment as well.
    pub exclude: Vec<String>,
    /// Run the annotation validator and surface its findings as warnings.
    pub validate: bool,
    /// Record the 1-based line where each logical annotation begins.
    pub include_line_numbers: bool,
}

impl Default for ScanOptions {
    fn default() -> Self {
        ScanOptions {
            recursive: false,
            include_pattern: r"\.(R|r|py|sql|sh|jl|js|jsx|ts|tsx|c|h|cpp|hpp|go|rs|java|m|rb|lua|wgsl)$".to_string(),
            exclude: Vec::new(),
            validate: true,
            include_line_numbers: false,
        }
    }
}

/// Options for the auto-detector.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AutoOptions {
    pub recursive: bool,
    pub include_pattern: String,
    pub exclude: Vec<String>,
    /// Scan lines against the input pattern lists.
    pub detect_inputs: bool,
    /// Scan lines against the output pattern lists.
    pub detect_outputs: bool,
    /// Record the first line that matched any pattern for the file.
    pub include_line_numbers: bool,
}

impl Default for AutoOptions {
    fn default() -> Self {
        let scan = ScanOptions::default();
        AutoOptions {
            recursive: false,
            include_pattern: scan.include_pattern,
            exclude: Vec::new(),
            detect_inputs: true,
            detect_outputs: true,
            include_line_numbers: false,
        }
    }
}

/// Normalizes an exclude specification: each element may itself be a
/// comma-joined list of fragments.
pub fn normalize_exclude(exclude: &[String]) -> Vec<String> {
    exclude
        .iter()
        .flat_map(|e| e.split(','))
        .map(|f| f.trim())
        .filter(|f| !f.is_empty())
        .map(|f| f.to_string())
        .collect()
}
