use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

/// When a commit was authored, as reported by the log invocation that
/// produced it. Flat-mode extraction yields absolute ISO timestamps;
/// stat-mode extraction yields relative phrases ("2 hours ago").
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub enum CommitStamp {
    Iso(String),
    Relative(String),
}

impl CommitStamp {
    pub fn as_str(&self) -> &str {
        match self {
            CommitStamp::Iso(s) => s,
            CommitStamp::Relative(s) => s,
        }
    }
}

/// One per-file change entry from a `--stat` log section.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct FileChange {
    pub file: String,
    /// Total change count as printed by git ("10"), kept as text.
    pub changes: String,
}

/// A single parsed commit. Read-only once constructed; ordering within a
/// repository is whatever the log invocation returned (reverse
/// chronological).
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct CommitRecord {
    pub hash: String,
    pub author: String,
    pub stamp: CommitStamp,
    pub subject: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub body: Option<String>,
    pub repo: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub files: Vec<FileChange>,
}

/// A markdown planning document modified on the target day.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct PlanArtifact {
    pub file: String,
    pub path: String,
    /// Flat key/value pairs from the leading front-matter block, if any.
    pub metadata: BTreeMap<String, String>,
    /// Bounded-length prefix of the file content.
    pub content_preview: String,
}

/// An uncommitted working-tree change whose modification time fell on
/// the target day. Captures work that never reached a commit.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct FileModification {
    pub file: String,
    /// Two-letter porcelain status, trimmed ("M", "??").
    pub status: String,
    /// Modification time, RFC 3339.
    pub modified: String,
}

/// One AI-code-attribution row from the local tracking store.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct AiActivityRecord {
    pub hash: String,
    pub source: String,
    pub file: String,
    pub extension: String,
    pub timestamp_ms: i64,
    pub conversation_id: String,
}

/// The collected AI-activity bundle for one day.
#[derive(Debug, Serialize, Deserialize, Clone, Default, PartialEq, Eq)]
pub struct AiActivity {
    pub code_generated: Vec<AiActivityRecord>,
    /// Distinct file names touched by generated code. Order is not
    /// significant; a sorted set keeps output deterministic.
    pub files_touched: BTreeSet<String>,
}

impl AiActivity {
    pub fn is_empty(&self) -> bool {
        self.code_generated.is_empty()
    }
}

/// Shallow presence probe of one chat session store. No message content
/// is retained.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct ChatProbe {
    pub session: String,
    pub has_data: bool,
}

/// Everything collected for one target date, assembled once per run.
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct DailyContext {
    pub date: NaiveDate,
    pub commits: Vec<CommitRecord>,
    /// Commits grouped by repository name, in first-seen order of the
    /// input sequence; within-group order is preserved from the source.
    pub commits_by_repo: Vec<(String, Vec<CommitRecord>)>,
    pub total_commits: usize,
    pub plans: Vec<PlanArtifact>,
    pub activity: AiActivity,
    pub workspace_root: String,
    /// Workspace-relative location of each repository, by name.
    #[serde(default)]
    pub repo_paths: BTreeMap<String, String>,
    /// Uncommitted working-tree changes per repository, by name. Only
    /// populated for repositories that had commits on the target day.
    #[serde(default)]
    pub uncommitted_by_repo: BTreeMap<String, Vec<FileModification>>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn commit_stamp_round_trips_through_json() {
        let iso = CommitStamp::Iso("2024-01-01 10:00:00 +0000".to_string());
        let json = serde_json::to_string(&iso).unwrap();
        let back: CommitStamp = serde_json::from_str(&json).unwrap();
        assert_eq!(back, iso);
        assert_eq!(back.as_str(), "2024-01-01 10:00:00 +0000");
    }

    #[test]
    fn activity_bundle_defaults_empty() {
        let activity = AiActivity::default();
        assert!(activity.is_empty());
        assert!(activity.files_touched.is_empty());
    }
}
