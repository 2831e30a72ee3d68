use chrono::{DateTime, Local, NaiveDate};
use journal_types::DailyContext;

const MAX_FILES_SHOWN: usize = 10;
const MAX_APPENDIX_COMMITS: usize = 20;

/// Label for a single date or an inclusive range.
pub fn date_label(date: NaiveDate, end: Option<NaiveDate>) -> String {
    match end {
        Some(end) if end != date => format!("{date} to {end}"),
        _ => date.to_string(),
    }
}

/// Deterministic technical summary. Always succeeds: an empty context
/// renders a valid document with zero counts.
pub fn render_summary(
    ctx: &DailyContext,
    end: Option<NaiveDate>,
    generated_at: DateTime<Local>,
) -> String {
    let mut md = String::new();
    md.push_str(&format!(
        "# Today's Work Summary - {}\n\n",
        date_label(ctx.date, end)
    ));
    md.push_str("## Overview\n\n");
    md.push_str(&format!(
        "Work summary generated on {}.\n",
        generated_at.format("%Y-%m-%d %H:%M:%S")
    ));
    md.push_str(&format!(
        "Analyzed {} repositories with activity.\n\n",
        ctx.commits_by_repo.len()
    ));
    md.push_str("---\n\n");

    for (repo, commits) in &ctx.commits_by_repo {
        md.push_str(&format!("## Project: {repo}\n\n"));
        if let Some(location) = ctx.repo_paths.get(repo) {
            md.push_str(&format!("**Location:** `{location}`\n\n"));
        }
        md.push_str("### Work Completed\n\n");

        for commit in commits {
            md.push_str(&format!("#### {}\n", commit.subject));
            md.push_str(&format!(
                "**Commit:** `{}` - {}, {}\n\n",
                commit.hash,
                commit.author,
                commit.stamp.as_str()
            ));

            if !commit.files.is_empty() {
                md.push_str("**Files Changed:**\n");
                for change in commit.files.iter().take(MAX_FILES_SHOWN) {
                    md.push_str(&format!(
                        "- `{}` ({} changes)\n",
                        change.file, change.changes
                    ));
                }
                if commit.files.len() > MAX_FILES_SHOWN {
                    md.push_str(&format!(
                        "- ... and {} more files\n",
                        commit.files.len() - MAX_FILES_SHOWN
                    ));
                }
                md.push('\n');
            }
        }

        if let Some(mods) = ctx.uncommitted_by_repo.get(repo) {
            if !mods.is_empty() {
                md.push_str("### Uncommitted Changes\n\n");
                for modification in mods {
                    md.push_str(&format!(
                        "- `{}` ({})\n",
                        modification.file, modification.status
                    ));
                }
                md.push('\n');
            }
        }
        md.push_str("---\n\n");
    }

    if !ctx.plans.is_empty() {
        md.push_str("## Plans\n\n");
        for plan in &ctx.plans {
            let title = plan
                .metadata
                .get("name")
                .cloned()
                .unwrap_or_else(|| plan.file.clone());
            md.push_str(&format!("### {title}\n"));
            md.push_str(&format!("**File:** `{}`\n\n", plan.file));
            if let Some(overview) = plan.metadata.get("overview") {
                md.push_str(&format!("**Overview:** {overview}\n\n"));
            }
        }
        md.push_str("---\n\n");
    }

    md.push_str("## Summary Statistics\n\n");
    md.push_str(&format!(
        "- **Total Repositories:** {}\n",
        ctx.commits_by_repo.len()
    ));
    md.push_str(&format!("- **Total Commits:** {}\n", ctx.total_commits));
    md.push_str(&format!("- **Plans:** {}\n\n", ctx.plans.len()));

    md.push_str(&format!(
        "\n*Generated: {}*\n",
        generated_at.format("%Y-%m-%d %H:%M:%S")
    ));
    md
}

/// Wrap an LLM-written (or fallback) narrative with the technical
/// appendix for the journal variant.
pub fn render_journal(
    ctx: &DailyContext,
    narrative: &str,
    generated_at: DateTime<Local>,
) -> String {
    let mut md = String::new();
    md.push_str(&format!("# Daily Journal - {}\n\n", ctx.date));
    md.push_str(&format!(
        "*Generated on {}*\n\n",
        generated_at.format("%Y-%m-%d %H:%M:%S")
    ));
    md.push_str("---\n\n");

    md.push_str("## Today's Reflection\n\n");
    md.push_str(narrative);
    md.push_str("\n\n---\n\n");

    md.push_str("## Technical Details\n\n");
    md.push_str(&format!("**Total Commits:** {}\n", ctx.total_commits));
    md.push_str(&format!("**Plans:** {}\n", ctx.plans.len()));
    if !ctx.activity.is_empty() {
        md.push_str(&format!(
            "**AI-Generated Code:** {} files\n",
            ctx.activity.code_generated.len()
        ));
    }
    md.push('\n');

    if !ctx.commits.is_empty() {
        md.push_str("### Commits\n\n");
        for commit in ctx.commits.iter().take(MAX_APPENDIX_COMMITS) {
            md.push_str(&format!(
                "- `{}`: {} ({})\n",
                commit.hash, commit.subject, commit.repo
            ));
        }
        if ctx.commits.len() > MAX_APPENDIX_COMMITS {
            md.push_str(&format!(
                "- ... and {} more commits\n",
                ctx.commits.len() - MAX_APPENDIX_COMMITS
            ));
        }
    }

    md.push('\n');
    md
}
