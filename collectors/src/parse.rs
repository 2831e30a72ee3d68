use journal_types::{CommitRecord, CommitStamp, FileChange};
use regex::Regex;
use std::sync::OnceLock;

/// Matches an indented file-change summary line from `git log --stat`:
/// ` src/main.rs | 10 +7 -3`. Insertion/deletion counts are optional.
fn stat_line_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"^\s*([^|]+?)\s*\|\s*(\d+)(?:\s+([+-]?\d+))?(?:\s+([+-]?\d+))?").unwrap()
    })
}

/// Parse flat-mode log output: one commit per line,
/// `hash|author|iso-date|subject|body`. The line is split on the first
/// four delimiters only, so the body may itself contain `|`. Lines
/// without enough fields are skipped, not errored.
pub fn parse_flat_log(log_output: &str, repo: &str) -> Vec<CommitRecord> {
    let mut commits = Vec::new();
    for line in log_output.lines() {
        if line.trim().is_empty() || !line.contains('|') {
            continue;
        }
        let parts: Vec<&str> = line.splitn(5, '|').collect();
        if parts.len() < 4 {
            continue;
        }
        let body = parts.get(4).map(|b| b.trim()).filter(|b| !b.is_empty());
        commits.push(CommitRecord {
            hash: parts[0].to_string(),
            author: parts[1].to_string(),
            stamp: CommitStamp::Iso(parts[2].to_string()),
            subject: parts[3].to_string(),
            body: body.map(|b| b.to_string()),
            repo: repo.to_string(),
            files: Vec::new(),
        });
    }
    commits
}

/// Parse stat-mode log output: unindented `hash|author|relative|subject`
/// header lines interleaved with indented file-stat lines, separated by
/// blank lines. A small state machine: a header always starts a new
/// commit (flushing any prior one), a blank line flushes, a stat line
/// appends to the current commit, anything else is ignored. End of input
/// flushes a pending commit.
pub fn parse_stat_log(log_output: &str, repo: &str) -> Vec<CommitRecord> {
    let mut commits = Vec::new();
    let mut current: Option<CommitRecord> = None;

    for line in log_output.lines() {
        if line.trim().is_empty() {
            if let Some(commit) = current.take() {
                commits.push(commit);
            }
            continue;
        }

        if line.contains('|') && !line.starts_with(' ') {
            let parts: Vec<&str> = line.splitn(4, '|').collect();
            if parts.len() >= 4 {
                if let Some(commit) = current.take() {
                    commits.push(commit);
                }
                current = Some(CommitRecord {
                    hash: parts[0].to_string(),
                    author: parts[1].to_string(),
                    stamp: CommitStamp::Relative(parts[2].to_string()),
                    subject: parts[3].to_string(),
                    body: None,
                    repo: repo.to_string(),
                    files: Vec::new(),
                });
                continue;
            }
        }

        if let Some(commit) = current.as_mut() {
            if let Some(caps) = stat_line_re().captures(line) {
                commit.files.push(FileChange {
                    file: caps[1].trim().to_string(),
                    changes: caps[2].to_string(),
                });
            }
            // Malformed stat lines (and the trailing "N files changed"
            // summary) are dropped silently.
        }
    }

    if let Some(commit) = current.take() {
        commits.push(commit);
    }
    commits
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn flat_mode_parses_fields_and_empty_body() {
        let commits = parse_flat_log("abc123|Jane|2024-01-01|Fix bug|", "demo");
        assert_eq!(commits.len(), 1);
        let c = &commits[0];
        assert_eq!(c.hash, "abc123");
        assert_eq!(c.author, "Jane");
        assert_eq!(c.stamp, CommitStamp::Iso("2024-01-01".to_string()));
        assert_eq!(c.subject, "Fix bug");
        assert_eq!(c.body, None);
        assert_eq!(c.repo, "demo");
        assert!(c.files.is_empty());
    }

    #[test]
    fn flat_mode_keeps_delimiters_inside_body() {
        let commits = parse_flat_log(
            "abc|Jane|2024-01-01 10:00:00 +0000|Add parser|details: a|b|c",
            "demo",
        );
        assert_eq!(commits.len(), 1);
        assert_eq!(commits[0].body.as_deref(), Some("details: a|b|c"));
    }

    #[test]
    fn flat_mode_drops_short_lines() {
        let input = "abc|Jane|2024-01-01|Fix bug|\nnot a commit line\nonly|three|fields\n";
        let commits = parse_flat_log(input, "demo");
        // 3 input lines, 2 dropped.
        assert_eq!(commits.len(), 1);
    }

    #[test]
    fn stat_mode_parses_two_commits_with_file_lists() {
        let input = "\
abc123|Jane|2 hours ago|Add widget
 src/widget.rs | 42 +40 -2
 src/lib.rs | 3 +3
 2 files changed, 43 insertions(+), 2 deletions(-)

def456|Raj|3 hours ago|Fix typo
 README.md | 1 +1 -1
";
        let commits = parse_stat_log(input, "demo");
        assert_eq!(commits.len(), 2);

        assert_eq!(commits[0].hash, "abc123");
        assert_eq!(
            commits[0].stamp,
            CommitStamp::Relative("2 hours ago".to_string())
        );
        assert_eq!(commits[0].files.len(), 2);
        assert_eq!(commits[0].files[0].file, "src/widget.rs");
        assert_eq!(commits[0].files[0].changes, "42");
        assert_eq!(commits[0].files[1].file, "src/lib.rs");

        // Trailing commit with no terminating blank line is still flushed.
        assert_eq!(commits[1].hash, "def456");
        assert_eq!(commits[1].files.len(), 1);
        assert_eq!(commits[1].files[0].file, "README.md");
    }

    #[test]
    fn stat_mode_header_flushes_prior_commit_without_blank_line() {
        let input = "\
abc123|Jane|2 hours ago|First
 a.rs | 1 +1
def456|Jane|3 hours ago|Second
 b.rs | 2 +2
";
        let commits = parse_stat_log(input, "demo");
        assert_eq!(commits.len(), 2);
        assert_eq!(commits[0].files.len(), 1);
        assert_eq!(commits[1].files.len(), 1);
    }

    #[test]
    fn stat_mode_ignores_malformed_stat_lines() {
        let input = "\
abc123|Jane|2 hours ago|Only commit
 this line has no pipe
 weird | notanumber
";
        let commits = parse_stat_log(input, "demo");
        assert_eq!(commits.len(), 1);
        assert!(commits[0].files.is_empty());
    }

    #[test]
    fn stat_mode_commit_may_have_empty_file_list() {
        let input = "abc123|Jane|1 hour ago|Empty commit\n\n";
        let commits = parse_stat_log(input, "demo");
        assert_eq!(commits.len(), 1);
        assert!(commits[0].files.is_empty());
    }

    #[test]
    fn empty_input_yields_no_commits() {
        assert!(parse_flat_log("", "demo").is_empty());
        assert!(parse_stat_log("", "demo").is_empty());
    }
}
