use chrono::NaiveDate;
use journal_types::{AiActivity, CommitRecord, DailyContext, FileModification, PlanArtifact};
use std::collections::BTreeMap;

/// Per-repository metadata gathered alongside the commit stream: where
/// each repository sits relative to the workspace root, and which
/// working-tree files changed without being committed.
#[derive(Debug, Default)]
pub struct RepoMeta {
    pub paths: BTreeMap<String, String>,
    pub uncommitted: BTreeMap<String, Vec<FileModification>>,
}

/// Assemble everything collected for one date into a single context.
/// Pure: no filtering, no deduplication — upstream collectors already
/// applied their caps, and dropping data here would hide their failure
/// modes. Repository groups appear in first-seen order of the commit
/// sequence; within-group order is preserved.
pub fn assemble(
    date: NaiveDate,
    commits: Vec<CommitRecord>,
    plans: Vec<PlanArtifact>,
    activity: AiActivity,
    workspace_root: &str,
    repo_meta: RepoMeta,
) -> DailyContext {
    let mut commits_by_repo: Vec<(String, Vec<CommitRecord>)> = Vec::new();
    for commit in &commits {
        match commits_by_repo.iter_mut().find(|(name, _)| name == &commit.repo) {
            Some((_, group)) => group.push(commit.clone()),
            None => commits_by_repo.push((commit.repo.clone(), vec![commit.clone()])),
        }
    }

    DailyContext {
        date,
        total_commits: commits.len(),
        commits,
        commits_by_repo,
        plans,
        activity,
        workspace_root: workspace_root.to_string(),
        repo_paths: repo_meta.paths,
        uncommitted_by_repo: repo_meta.uncommitted,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use journal_types::CommitStamp;

    fn mk_commit(repo: &str, hash: &str) -> CommitRecord {
        CommitRecord {
            hash: hash.to_string(),
            author: "Jane".to_string(),
            stamp: CommitStamp::Iso("2024-01-01 10:00:00 +0000".to_string()),
            subject: format!("Commit {hash}"),
            body: None,
            repo: repo.to_string(),
            files: Vec::new(),
        }
    }

    #[test]
    fn groups_preserve_first_seen_repo_order_and_sizes() {
        let commits = vec![
            mk_commit("beta", "b1"),
            mk_commit("alpha", "a1"),
            mk_commit("beta", "b2"),
            mk_commit("gamma", "g1"),
            mk_commit("alpha", "a2"),
        ];
        let date = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
        let ctx = assemble(
            date,
            commits,
            Vec::new(),
            AiActivity::default(),
            "/ws",
            RepoMeta::default(),
        );

        assert_eq!(ctx.total_commits, 5);
        let order: Vec<&str> = ctx
            .commits_by_repo
            .iter()
            .map(|(name, _)| name.as_str())
            .collect();
        assert_eq!(order, vec!["beta", "alpha", "gamma"]);

        let sum: usize = ctx.commits_by_repo.iter().map(|(_, g)| g.len()).sum();
        assert_eq!(sum, ctx.total_commits);

        // Within-group order follows the input sequence.
        let beta = &ctx.commits_by_repo[0].1;
        assert_eq!(beta[0].hash, "b1");
        assert_eq!(beta[1].hash, "b2");
    }

    #[test]
    fn empty_input_assembles_cleanly() {
        let date = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
        let ctx = assemble(
            date,
            Vec::new(),
            Vec::new(),
            AiActivity::default(),
            "/ws",
            RepoMeta::default(),
        );
        assert_eq!(ctx.total_commits, 0);
        assert!(ctx.commits_by_repo.is_empty());
        assert!(ctx.plans.is_empty());
        assert!(ctx.repo_paths.is_empty());
        assert!(ctx.uncommitted_by_repo.is_empty());
    }

    #[test]
    fn repo_metadata_flows_into_the_context() {
        let mut meta = RepoMeta::default();
        meta.paths
            .insert("alpha".to_string(), "projects/alpha".to_string());
        meta.uncommitted.insert(
            "alpha".to_string(),
            vec![FileModification {
                file: "src/wip.rs".to_string(),
                status: "M".to_string(),
                modified: "2024-01-01T09:00:00Z".to_string(),
            }],
        );

        let date = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
        let ctx = assemble(
            date,
            vec![mk_commit("alpha", "a1")],
            Vec::new(),
            AiActivity::default(),
            "/ws",
            meta,
        );

        assert_eq!(ctx.repo_paths["alpha"], "projects/alpha");
        assert_eq!(ctx.uncommitted_by_repo["alpha"].len(), 1);
    }
}
