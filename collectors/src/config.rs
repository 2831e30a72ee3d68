use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};

// ── Default sidecar store locations (relative to home) ──────────────────

/// Cursor AI code-attribution store.
const DEFAULT_ACTIVITY_DB_REL: &str = ".cursor/ai-tracking/ai-code-tracking.db";

/// Cursor per-session chat stores.
const DEFAULT_CHATS_DIR_REL: &str = ".cursor/chats";

const DEFAULT_MAX_COMMITS: usize = 50;
const DEFAULT_AI_PROVIDER: &str = "anthropic";
const DEFAULT_AI_MODEL: &str = "claude-3-haiku-20240307";
const DEFAULT_AI_TEMPERATURE: f32 = 0.7;

/// Runtime configuration, loaded once at startup from a JSON file.
/// A missing or unparseable file is fatal; everything optional has a
/// default matching the raw config shape below.
#[derive(Clone, Debug)]
pub struct JournalConfig {
    pub workspace_root: PathBuf,
    pub output_dir: PathBuf,
    pub cache_file: PathBuf,
    pub plans_dir: PathBuf,
    pub activity_db: PathBuf,
    pub chats_dir: PathBuf,
    pub max_commits_per_repo: usize,
    pub exclude_projects: Vec<String>,
    pub exclude_patterns: Vec<String>,
    pub ai_provider: String,
    pub ai_model: String,
    pub ai_temperature: f32,
    pub anthropic_api_key: Option<String>,
    pub openai_api_key: Option<String>,
    pub use_ai_activity: bool,
    pub use_chat_context: bool,
}

#[derive(Debug, Deserialize)]
struct RawConfig {
    workspace_root: String,
    output_dir: String,
    cache_file: String,
    plans_dir: String,
    activity_db: Option<String>,
    chats_dir: Option<String>,
    max_commits_per_repo: Option<usize>,
    #[serde(default)]
    exclude_projects: Vec<String>,
    #[serde(default)]
    exclude_patterns: Vec<String>,
    ai_provider: Option<String>,
    ai_model: Option<String>,
    ai_temperature: Option<f32>,
    anthropic_api_key: Option<String>,
    openai_api_key: Option<String>,
    use_ai_activity: Option<bool>,
    use_chat_context: Option<bool>,
}

impl JournalConfig {
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("config file not found: {}", path.display()))?;
        let raw: RawConfig = serde_json::from_str(&content)
            .with_context(|| format!("parse config {}", path.display()))?;
        let home = dirs::home_dir().context("could not resolve home directory")?;

        Ok(Self {
            workspace_root: expand_tilde(&raw.workspace_root, &home),
            output_dir: expand_tilde(&raw.output_dir, &home),
            cache_file: expand_tilde(&raw.cache_file, &home),
            plans_dir: expand_tilde(&raw.plans_dir, &home),
            activity_db: raw
                .activity_db
                .map(|p| expand_tilde(&p, &home))
                .unwrap_or_else(|| home.join(DEFAULT_ACTIVITY_DB_REL)),
            chats_dir: raw
                .chats_dir
                .map(|p| expand_tilde(&p, &home))
                .unwrap_or_else(|| home.join(DEFAULT_CHATS_DIR_REL)),
            max_commits_per_repo: raw.max_commits_per_repo.unwrap_or(DEFAULT_MAX_COMMITS),
            exclude_projects: raw.exclude_projects,
            exclude_patterns: raw.exclude_patterns,
            ai_provider: raw
                .ai_provider
                .unwrap_or_else(|| DEFAULT_AI_PROVIDER.to_string()),
            ai_model: raw
                .ai_model
                .unwrap_or_else(|| DEFAULT_AI_MODEL.to_string()),
            ai_temperature: raw.ai_temperature.unwrap_or(DEFAULT_AI_TEMPERATURE),
            anthropic_api_key: raw.anthropic_api_key,
            openai_api_key: raw.openai_api_key,
            use_ai_activity: raw.use_ai_activity.unwrap_or(true),
            use_chat_context: raw.use_chat_context.unwrap_or(true),
        })
    }
}

fn expand_tilde(input: &str, home: &Path) -> PathBuf {
    if let Some(rest) = input.strip_prefix("~/") {
        return home.join(rest);
    }
    PathBuf::from(input)
}
