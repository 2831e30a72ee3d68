use chrono::{DateTime, Local, NaiveDate};
use journal_types::PlanArtifact;
use std::collections::BTreeMap;
use std::path::Path;
use tracing::warn;

const PLAN_SUFFIX: &str = ".plan.md";
const PREVIEW_CHARS: usize = 2000;

/// Collect plan files under `plans_dir` whose modification time falls on
/// the target calendar day (local time). Each artifact carries a bounded
/// content preview and whatever front-matter the file opens with. A
/// missing directory is not an error; unreadable files are skipped with a
/// warning.
pub fn collect_plans(plans_dir: &Path, target_date: NaiveDate) -> Vec<PlanArtifact> {
    let entries = match std::fs::read_dir(plans_dir) {
        Ok(e) => e,
        Err(_) => return Vec::new(),
    };

    let mut plans = Vec::new();
    for entry in entries.flatten() {
        let path = entry.path();
        let name = entry.file_name().to_string_lossy().into_owned();
        if !name.ends_with(PLAN_SUFFIX) || !path.is_file() {
            continue;
        }

        let modified_on_target = entry
            .metadata()
            .and_then(|m| m.modified())
            .map(|mtime| DateTime::<Local>::from(mtime).date_naive() == target_date)
            .unwrap_or(false);
        if !modified_on_target {
            continue;
        }

        match std::fs::read_to_string(&path) {
            Ok(content) => {
                let preview: String = content.chars().take(PREVIEW_CHARS).collect();
                plans.push(PlanArtifact {
                    file: name,
                    path: path.to_string_lossy().into_owned(),
                    metadata: parse_front_matter(&content),
                    content_preview: preview,
                });
            }
            Err(err) => {
                warn!(plan = %path.display(), error = %err, "skipping unreadable plan file");
            }
        }
    }

    plans.sort_by(|a, b| a.file.cmp(&b.file));
    plans
}

/// Parse a leading `---` delimited block as flat `key: value` lines,
/// stripping surrounding quotes from values. Absent or unterminated
/// front-matter yields an empty map, never an error.
pub fn parse_front_matter(content: &str) -> BTreeMap<String, String> {
    let mut metadata = BTreeMap::new();

    let Some(rest) = content.strip_prefix("---") else {
        return metadata;
    };
    let Some(end) = rest.find("---") else {
        return metadata;
    };

    for line in rest[..end].lines() {
        if let Some((key, value)) = line.split_once(':') {
            let key = key.trim();
            let value = value
                .trim()
                .trim_matches('"')
                .trim_matches('\'')
                .to_string();
            if !key.is_empty() {
                metadata.insert(key.to_string(), value);
            }
        }
    }
    metadata
}
