//! Upload directory helpers: filename sanitising and the startup scan.

use std::path::Path;

use anyhow::{Context, Result};
use tracing::{info, warn};

use crate::extraction::extractor::TextExtractor;
use crate::models::document::StoredResume;

/// Strips any path components and replaces characters outside
/// `[A-Za-z0-9._-]` with `_`. Returns `None` when nothing usable is left.
pub fn sanitize_filename(raw: &str) -> Option<String> {
    let base = raw.rsplit(['/', '\\']).next().unwrap_or(raw).trim();
    let cleaned: String = base
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || matches!(c, '.' | '_' | '-') {
                c
            } else {
                '_'
            }
        })
        .collect();
    let cleaned = cleaned.trim_start_matches('.').to_string();
    if cleaned.is_empty() {
        None
    } else {
        Some(cleaned)
    }
}

pub fn is_pdf(filename: &str) -> bool {
    Path::new(filename)
        .extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| e.eq_ignore_ascii_case("pdf"))
}

/// Extracts every `*.pdf` in `dir`, sorted by name. Creates the directory if
/// missing. Files the extractor cannot read are logged and skipped.
pub fn scan_upload_dir(dir: &Path, extractor: &dyn TextExtractor) -> Result<Vec<StoredResume>> {
    std::fs::create_dir_all(dir)
        .with_context(|| format!("failed to create upload directory {}", dir.display()))?;

    let mut names: Vec<String> = std::fs::read_dir(dir)
        .with_context(|| format!("failed to read upload directory {}", dir.display()))?
        .filter_map(|entry| entry.ok())
        .filter(|entry| entry.file_type().map(|t| t.is_file()).unwrap_or(false))
        .filter_map(|entry| entry.file_name().into_string().ok())
        .filter(|name| is_pdf(name))
        .collect();
    names.sort();

    let mut resumes = Vec::with_capacity(names.len());
    for name in names {
        let path = dir.join(&name);
        let bytes = match std::fs::read(&path) {
            Ok(bytes) => bytes,
            Err(e) => {
                warn!(file = %path.display(), "skipping unreadable upload: {e}");
                continue;
            }
        };
        match extractor.extract(&bytes) {
            Ok(text) => resumes.push(StoredResume::new(name, text)),
            Err(e) => warn!(file = %path.display(), "skipping upload: {e}"),
        }
    }

    info!(dir = %dir.display(), count = resumes.len(), "upload directory scanned");
    Ok(resumes)
}
