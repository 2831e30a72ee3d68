use crate::exec::{run_with_timeout, ExecError};
use std::path::{Path, PathBuf};
use std::process::Command;
use std::time::Duration;
use tracing::warn;

const FIND_TIMEOUT: Duration = Duration::from_secs(30);
const MAX_DEPTH: usize = 3;

/// Find git repository roots under the workspace root, applying the
/// path-pattern and project-name exclusion lists.
///
/// The primary scan shells out to `find` (much faster than walking from
/// Rust on large directory trees); on timeout or failure it falls back to
/// an unbounded manual walk that stops descending once a repository root
/// is found, so nested repositories are never discovered.
pub fn find_git_repos(
    workspace_root: &Path,
    exclude_patterns: &[String],
    exclude_projects: &[String],
) -> Vec<PathBuf> {
    let mut repos = match find_via_command(workspace_root, exclude_patterns) {
        Ok(repos) => repos,
        Err(err) => {
            warn!(error = %err, "find scan failed, walking directories instead");
            let mut repos = Vec::new();
            walk_for_repos(workspace_root, exclude_patterns, &mut repos);
            repos
        }
    };

    repos.retain(|repo| {
        let name = repo
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        !exclude_projects.iter().any(|p| p == &name)
    });
    repos
}

fn find_via_command(
    workspace_root: &Path,
    exclude_patterns: &[String],
) -> Result<Vec<PathBuf>, ExecError> {
    let mut cmd = Command::new("find");
    cmd.arg(workspace_root)
        .args(["-maxdepth", &(MAX_DEPTH * 2).to_string()])
        .args(["-type", "d", "-name", ".git"]);

    let out = run_with_timeout(cmd, FIND_TIMEOUT)?;

    let mut repos = Vec::new();
    for line in out.stdout.lines() {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        if let Some(repo) = Path::new(line).parent() {
            if !should_exclude(repo, exclude_patterns) {
                repos.push(repo.to_path_buf());
            }
        }
    }
    Ok(repos)
}

/// Manual fallback walk. Unlike the `find` invocation it has no depth
/// limit; a directory that is itself a repository root is not descended
/// into, which keeps the recursion shallow on real workspaces.
fn walk_for_repos(dir: &Path, exclude_patterns: &[String], repos: &mut Vec<PathBuf>) {
    if dir.join(".git").is_dir() {
        if !should_exclude(dir, exclude_patterns) {
            repos.push(dir.to_path_buf());
        }
        return;
    }

    let entries = match std::fs::read_dir(dir) {
        Ok(e) => e,
        Err(_) => return,
    };
    for entry in entries.flatten() {
        let path = entry.path();
        if path.is_dir() {
            walk_for_repos(&path, exclude_patterns, repos);
        }
    }
}

/// Substring exclusion test. Wildcard segments (`**/`, `/**`) are stripped
/// to a plain substring, which deliberately over-matches; see the config
/// docs before changing this to real globbing.
pub fn should_exclude(path: &Path, exclude_patterns: &[String]) -> bool {
    let path_str = path.to_string_lossy();
    exclude_patterns.iter().any(|pattern| {
        let needle = pattern.replace("**/", "").replace("/**", "");
        !needle.is_empty() && path_str.contains(&needle)
    })
}
