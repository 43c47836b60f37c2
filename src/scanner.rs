//! Candidate file discovery for the extractor and auto-detector.

use std::path::{Path, PathBuf};

use regex::Regex;
use walkdir::WalkDir;

use crate::errors::{PutError, Result};
use crate::options::normalize_exclude;

/// Resolves a root path to the list of files to scan.
///
/// A single file passes through as-is (the include pattern is not applied
/// to an explicitly named file). A directory is walked, one level deep
/// unless `recursive`, and filtered by the include regex (file name) and
/// the exclude fragments (anywhere in the path). A nonexistent root is
/// fatal; an empty result is not.
pub fn discover_files(
    path: &Path,
    recursive: bool,
    include_pattern: &str,
    exclude: &[String],
) -> Result<Vec<PathBuf>> {
    if !path.exists() {
        return Err(PutError::Path {
            message: "path does not exist".to_string(),
            path: path.display().to_string(),
        });
    }

    if path.is_file() {
        return Ok(vec![path.to_path_buf()]);
    }

    let include = Regex::new(include_pattern)?;
    let exclude_res: Vec<Regex> = normalize_exclude(exclude)
        .iter()
        .map(|f| Regex::new(f))
        .collect::<std::result::Result<_, _>>()?;

    let max_depth = if recursive { usize::MAX } else { 1 };
    let mut files: Vec<PathBuf> = Vec::new();

    for entry in WalkDir::new(path)
        .max_depth(max_depth)
        .into_iter()
        .filter_map(|e| e.ok())
    {
        if !entry.file_type().is_file() {
            continue;
        }
        let file_name = entry.file_name().to_string_lossy();
        if !include.is_match(&file_name) {
            continue;
        }
        let full = entry.path().to_string_lossy();
        if exclude_res.iter().any(|re| re.is_match(&full)) {
            continue;
        }
        files.push(entry.path().to_path_buf());
    }

    files.sort();
    Ok(files)
}
