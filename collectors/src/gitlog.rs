use crate::exec::run_with_timeout;
use crate::parse::{parse_flat_log, parse_stat_log};
use chrono::{DateTime, Local, NaiveDate, SecondsFormat};
use journal_types::{CommitRecord, FileModification};
use std::collections::HashMap;
use std::path::Path;
use std::process::Command;
use std::time::Duration;
use tracing::warn;

const GIT_TIMEOUT: Duration = Duration::from_secs(10);
const STATUS_TIMEOUT: Duration = Duration::from_secs(5);

/// Which log shape to ask git for. Flat carries ISO dates and bodies;
/// Stat carries relative dates and per-file change summaries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LogMode {
    Flat,
    Stat,
}

/// Extracts commits for (repository, date window) pairs, shelling out to
/// `git log` with a per-repository timeout. The repository path is always
/// passed explicitly via the child's working directory, never by changing
/// this process's. Results are cached for the lifetime of the extractor
/// so one run never invokes git twice for the same window.
pub struct GitExtractor {
    max_commits: usize,
    cache: HashMap<(String, NaiveDate, Option<NaiveDate>, LogMode), Vec<CommitRecord>>,
}

impl GitExtractor {
    pub fn new(max_commits: usize) -> Self {
        Self {
            max_commits,
            cache: HashMap::new(),
        }
    }

    /// Return commits authored in `[since, until]` (inclusive calendar
    /// days; `until` defaults to `since`), most recent first, capped at
    /// the configured maximum. Any failure — non-zero exit, timeout,
    /// spawn error — is logged and yields an empty list.
    pub fn commits(
        &mut self,
        repo_path: &Path,
        since: NaiveDate,
        until: Option<NaiveDate>,
        mode: LogMode,
    ) -> Vec<CommitRecord> {
        let key = (
            repo_path.to_string_lossy().into_owned(),
            since,
            until,
            mode,
        );
        if let Some(cached) = self.cache.get(&key) {
            return cached.clone();
        }

        let repo_name = repo_path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| repo_path.to_string_lossy().into_owned());

        let mut cmd = Command::new("git");
        cmd.args(build_log_args(since, until, mode, self.max_commits))
            .current_dir(repo_path);

        let commits = match run_with_timeout(cmd, GIT_TIMEOUT) {
            Ok(out) if out.success => match mode {
                LogMode::Flat => parse_flat_log(&out.stdout, &repo_name),
                LogMode::Stat => parse_stat_log(&out.stdout, &repo_name),
            },
            Ok(_) => {
                warn!(repo = %repo_path.display(), "git log exited non-zero");
                Vec::new()
            }
            Err(err) => {
                warn!(repo = %repo_path.display(), error = %err, "git log failed");
                Vec::new()
            }
        };

        self.cache.insert(key, commits.clone());
        commits
    }
}

/// Uncommitted working-tree changes (modified tracked files and
/// untracked files) whose modification time falls on the target local
/// day. Any git failure degrades to an empty list.
pub fn uncommitted_changes(repo_path: &Path, target_date: NaiveDate) -> Vec<FileModification> {
    let mut cmd = Command::new("git");
    cmd.args(["status", "--porcelain"]).current_dir(repo_path);

    let out = match run_with_timeout(cmd, STATUS_TIMEOUT) {
        Ok(out) if out.success => out,
        Ok(_) => {
            warn!(repo = %repo_path.display(), "git status exited non-zero");
            return Vec::new();
        }
        Err(err) => {
            warn!(repo = %repo_path.display(), error = %err, "git status failed");
            return Vec::new();
        }
    };

    let mut modifications = Vec::new();
    for line in out.stdout.lines() {
        if !(line.starts_with(" M") || line.starts_with("??")) {
            continue;
        }
        let Some(file) = line.get(3..).map(str::trim) else {
            continue;
        };
        if file.is_empty() {
            continue;
        }
        let Ok(meta) = std::fs::metadata(repo_path.join(file)) else {
            continue;
        };
        let Ok(mtime) = meta.modified() else {
            continue;
        };
        let modified: DateTime<Local> = mtime.into();
        if modified.date_naive() != target_date {
            continue;
        }
        modifications.push(FileModification {
            file: file.to_string(),
            status: line[..2].trim().to_string(),
            modified: modified.to_rfc3339_opts(SecondsFormat::Secs, true),
        });
    }
    modifications
}

fn build_log_args(
    since: NaiveDate,
    until: Option<NaiveDate>,
    mode: LogMode,
    max_commits: usize,
) -> Vec<String> {
    let mut args = vec![
        "log".to_string(),
        format!("--since={} 00:00:00", since.format("%Y-%m-%d")),
        "--all".to_string(),
        "--no-merges".to_string(),
    ];
    if let Some(until) = until {
        args.push(format!("--until={} 23:59:59", until.format("%Y-%m-%d")));
    }
    match mode {
        LogMode::Flat => {
            args.push("--pretty=format:%h|%an|%ad|%s|%b".to_string());
            args.push("--date=iso".to_string());
        }
        LogMode::Stat => {
            args.push("--pretty=format:%h|%an|%ar|%s".to_string());
            args.push("--stat".to_string());
        }
    }
    args.push("-n".to_string());
    args.push(max_commits.to_string());
    args
}
