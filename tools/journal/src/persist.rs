use anyhow::{Context, Result};
use std::path::{Path, PathBuf};

/// Output document flavor; determines the per-date file name.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocumentKind {
    Summary,
    Journal,
}

impl DocumentKind {
    fn suffix(self) -> &'static str {
        match self {
            DocumentKind::Summary => "summary",
            DocumentKind::Journal => "journal",
        }
    }
}

/// Write a rendered document to `{output_dir}/{label}_{kind}.md`,
/// creating the output directory and overwriting any previous run for
/// the same date.
pub fn save_document(
    output_dir: &Path,
    label: &str,
    kind: DocumentKind,
    content: &str,
) -> Result<PathBuf> {
    std::fs::create_dir_all(output_dir)
        .with_context(|| format!("create output dir {}", output_dir.display()))?;
    let path = output_dir.join(format!("{}_{}.md", label, kind.suffix()));
    std::fs::write(&path, content).with_context(|| format!("write {}", path.display()))?;
    Ok(path)
}

/// Overwrite the last-run marker with the given date string.
pub fn update_last_run(cache_file: &Path, date: &str) -> Result<()> {
    if let Some(dir) = cache_file.parent() {
        std::fs::create_dir_all(dir)
            .with_context(|| format!("create cache dir {}", dir.display()))?;
    }
    std::fs::write(cache_file, date)
        .with_context(|| format!("write last-run marker {}", cache_file.display()))
}

/// Read the last-run marker, if one exists.
pub fn last_run(cache_file: &Path) -> Option<String> {
    std::fs::read_to_string(cache_file)
        .ok()
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
}
