mod assemble;
mod llm;
mod narrative;
mod persist;
mod render;

use anyhow::{bail, Context, Result};
use chrono::{Local, NaiveDate};
use clap::{Args, Parser, Subcommand};
use collectors::config::JournalConfig;
use collectors::gitlog::{self, GitExtractor, LogMode};
use collectors::{activity, chats, locate, plans};
use journal_types::{AiActivity, DailyContext};
use llm::LlmClient;
use persist::DocumentKind;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

#[derive(Parser)]
#[command(
    name = "journal",
    about = "Daily work summary and AI-narrated journal generator"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate the deterministic technical summary for a date or range
    Summary {
        #[command(flatten)]
        window: WindowArgs,
    },
    /// Generate an LLM-narrated journal entry for a date or range
    Narrate {
        #[command(flatten)]
        window: WindowArgs,
    },
}

#[derive(Args)]
struct WindowArgs {
    /// Target date (YYYY-MM-DD); defaults to today
    #[arg(long)]
    date: Option<String>,
    /// Range start (YYYY-MM-DD); requires --end
    #[arg(long)]
    start: Option<String>,
    /// Range end (YYYY-MM-DD); requires --start
    #[arg(long)]
    end: Option<String>,
    /// Path to the JSON config file
    #[arg(long, default_value = "config/config.json")]
    config: PathBuf,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let cli = Cli::parse();
    match cli.command {
        Commands::Summary { window } => run(window, Variant::Summary),
        Commands::Narrate { window } => run(window, Variant::Narrate),
    }
}

enum Variant {
    Summary,
    Narrate,
}

fn run(window: WindowArgs, variant: Variant) -> Result<()> {
    let config = JournalConfig::load(&window.config)?;
    let dates = resolve_dates(
        window.date.as_deref(),
        window.start.as_deref(),
        window.end.as_deref(),
        Local::now().date_naive(),
    )?;

    // Credentials are validated before any collection work so a bad key
    // cannot waste a full aggregation pass.
    let client = match variant {
        Variant::Narrate => Some(LlmClient::from_config(&config)?),
        Variant::Summary => None,
    };

    let repos = locate::find_git_repos(
        &config.workspace_root,
        &config.exclude_patterns,
        &config.exclude_projects,
    );
    info!(count = repos.len(), "discovered git repositories");

    let repo_paths: BTreeMap<String, String> = repos
        .iter()
        .map(|repo| {
            (
                repo_display_name(repo),
                repo.strip_prefix(&config.workspace_root)
                    .unwrap_or(repo)
                    .to_string_lossy()
                    .into_owned(),
            )
        })
        .collect();

    let mode = match variant {
        Variant::Summary => LogMode::Stat,
        Variant::Narrate => LogMode::Flat,
    };
    let mut extractor = GitExtractor::new(config.max_commits_per_repo);
    let single_date = dates.len() == 1;

    for date in dates {
        let mut commits = Vec::new();
        for repo in &repos {
            commits.extend(extractor.commits(repo, date, None, mode));
        }
        let plans = plans::collect_plans(&config.plans_dir, date);
        let activity = if config.use_ai_activity {
            activity::collect_activity(&config.activity_db, date)
        } else {
            AiActivity::default()
        };
        if config.use_chat_context {
            let probes = chats::probe_chat_sessions(&config.chats_dir);
            info!(sessions = probes.len(), "chat sessions with data");
        }

        let mut meta = assemble::RepoMeta {
            paths: repo_paths.clone(),
            ..Default::default()
        };
        // Working-tree state only makes sense for the technical summary,
        // and only for repositories that committed on the target day.
        if matches!(variant, Variant::Summary) {
            for repo in &repos {
                let name = repo_display_name(repo);
                if !commits.iter().any(|c| c.repo == name) {
                    continue;
                }
                let mods = gitlog::uncommitted_changes(repo, date);
                if !mods.is_empty() {
                    meta.uncommitted.insert(name, mods);
                }
            }
        }

        let ctx = assemble::assemble(
            date,
            commits,
            plans,
            activity,
            &config.workspace_root.to_string_lossy(),
            meta,
        );

        let now = Local::now();
        let (kind, document) = match (&variant, &client) {
            (Variant::Summary, _) => (
                DocumentKind::Summary,
                render::render_summary(&ctx, None, now),
            ),
            (Variant::Narrate, Some(client)) => {
                let document = write_narrative(client, &ctx, now);
                (DocumentKind::Journal, document)
            }
            (Variant::Narrate, None) => unreachable!("narrate always constructs a client"),
        };

        let path = persist::save_document(&config.output_dir, &date.to_string(), kind, &document)?;
        println!("Wrote {}", path.display());

        if single_date {
            persist::update_last_run(&config.cache_file, &date.to_string())?;
        }
    }

    Ok(())
}

/// The name commits are grouped under; must match the extractor's
/// derivation from the repository path.
fn repo_display_name(repo: &Path) -> String {
    repo.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| repo.to_string_lossy().into_owned())
}

/// Narrate via the provider; if the call fails mid-run, degrade to the
/// static technical document rather than abandon the day's output.
fn write_narrative(client: &LlmClient, ctx: &DailyContext, now: chrono::DateTime<Local>) -> String {
    let prompt = narrative::build_prompt(ctx);
    match client.complete(&prompt) {
        Ok(entry) => render::render_journal(ctx, &entry, now),
        Err(err) => {
            warn!(error = %err, "narrative call failed, falling back to static summary");
            render::render_summary(ctx, None, now)
        }
    }
}

/// Resolve the CLI date flags into the list of days to process.
/// `--date` and `--start`/`--end` are mutually exclusive; a range is
/// inclusive on both ends and iterated day by day.
fn resolve_dates(
    date: Option<&str>,
    start: Option<&str>,
    end: Option<&str>,
    today: NaiveDate,
) -> Result<Vec<NaiveDate>> {
    match (date, start, end) {
        (Some(_), Some(_), _) | (Some(_), _, Some(_)) => {
            bail!("--date cannot be combined with --start/--end")
        }
        (_, Some(start), Some(end)) => {
            let start = parse_date(start)?;
            let end = parse_date(end)?;
            if end < start {
                bail!("--end must be on or after --start");
            }
            let mut dates = Vec::new();
            let mut current = start;
            while current <= end {
                dates.push(current);
                current = current
                    .succ_opt()
                    .context("date range exceeds the calendar")?;
            }
            Ok(dates)
        }
        (_, Some(_), None) | (_, None, Some(_)) => {
            bail!("--start and --end must be given together")
        }
        (Some(date), None, None) => Ok(vec![parse_date(date)?]),
        (None, None, None) => Ok(vec![today]),
    }
}

fn parse_date(raw: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .with_context(|| format!("invalid date {raw:?} (expected YYYY-MM-DD)"))
}
