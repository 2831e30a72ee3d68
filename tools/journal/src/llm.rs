use anyhow::{bail, Context, Result};
use collectors::config::JournalConfig;
use reqwest::blocking::Client;
use serde_json::Value;

const ANTHROPIC_URL: &str = "https://api.anthropic.com/v1/messages";
const ANTHROPIC_VERSION: &str = "2023-06-01";
const OPENAI_URL: &str = "https://api.openai.com/v1/chat/completions";
const MAX_OUTPUT_TOKENS: u32 = 2000;

/// Provider-agnostic chat-completion client. One variant per provider,
/// chosen at construction; callers only see `complete`. Construction
/// validates credentials so a missing key fails before any collection
/// work, not after it.
#[derive(Debug)]
pub enum LlmClient {
    Anthropic {
        http: Client,
        api_key: String,
        model: String,
        temperature: f32,
    },
    OpenAi {
        http: Client,
        api_key: String,
        model: String,
        temperature: f32,
    },
}

impl LlmClient {
    pub fn from_config(config: &JournalConfig) -> Result<Self> {
        match config.ai_provider.as_str() {
            "anthropic" => {
                let api_key = resolve_key("ANTHROPIC_API_KEY", config.anthropic_api_key.as_deref())
                    .context("ANTHROPIC_API_KEY not found; set it in the environment or config")?;
                Ok(LlmClient::Anthropic {
                    http: Client::new(),
                    api_key,
                    model: config.ai_model.clone(),
                    temperature: config.ai_temperature,
                })
            }
            "openai" => {
                let api_key = resolve_key("OPENAI_API_KEY", config.openai_api_key.as_deref())
                    .context("OPENAI_API_KEY not found; set it in the environment or config")?;
                Ok(LlmClient::OpenAi {
                    http: Client::new(),
                    api_key,
                    model: config.ai_model.clone(),
                    temperature: config.ai_temperature,
                })
            }
            other => bail!("unknown ai_provider {other:?} (expected \"anthropic\" or \"openai\")"),
        }
    }

    /// One prompt in, one free-text response out.
    pub fn complete(&self, prompt: &str) -> Result<String> {
        match self {
            LlmClient::Anthropic {
                http,
                api_key,
                model,
                temperature,
            } => {
                let body = serde_json::json!({
                    "model": model,
                    "max_tokens": MAX_OUTPUT_TOKENS,
                    "temperature": temperature,
                    "messages": [{"role": "user", "content": prompt}],
                });
                let res = http
                    .post(ANTHROPIC_URL)
                    .header("x-api-key", api_key)
                    .header("anthropic-version", ANTHROPIC_VERSION)
                    .json(&body)
                    .send()
                    .context("send Anthropic request")?;
                if !res.status().is_success() {
                    let status = res.status();
                    let text = res.text().unwrap_or_default();
                    bail!("Anthropic call failed: {status} - {text}");
                }
                let json: Value = res.json().context("decode Anthropic response")?;
                extract_text(&json, "/content/0/text")
            }
            LlmClient::OpenAi {
                http,
                api_key,
                model,
                temperature,
            } => {
                let body = serde_json::json!({
                    "model": model,
                    "max_tokens": MAX_OUTPUT_TOKENS,
                    "temperature": temperature,
                    "messages": [{"role": "user", "content": prompt}],
                });
                let res = http
                    .post(OPENAI_URL)
                    .bearer_auth(api_key)
                    .json(&body)
                    .send()
                    .context("send OpenAI request")?;
                if !res.status().is_success() {
                    let status = res.status();
                    let text = res.text().unwrap_or_default();
                    bail!("OpenAI call failed: {status} - {text}");
                }
                let json: Value = res.json().context("decode OpenAI response")?;
                extract_text(&json, "/choices/0/message/content")
            }
        }
    }
}

fn resolve_key(env_var: &str, config_key: Option<&str>) -> Option<String> {
    match std::env::var(env_var) {
        Ok(k) if !k.trim().is_empty() => Some(k),
        _ => config_key
            .map(str::trim)
            .filter(|k| !k.is_empty())
            .map(str::to_string),
    }
}

fn extract_text(json: &Value, pointer: &str) -> Result<String> {
    json.pointer(pointer)
        .and_then(Value::as_str)
        .map(str::to_string)
        .with_context(|| format!("response missing text at {pointer}"))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn base_config(provider: &str) -> JournalConfig {
        JournalConfig {
            workspace_root: "/ws".into(),
            output_dir: "/out".into(),
            cache_file: "/cache".into(),
            plans_dir: "/plans".into(),
            activity_db: "/db".into(),
            chats_dir: "/chats".into(),
            max_commits_per_repo: 50,
            exclude_projects: Vec::new(),
            exclude_patterns: Vec::new(),
            ai_provider: provider.to_string(),
            ai_model: "test-model".to_string(),
            ai_temperature: 0.7,
            anthropic_api_key: None,
            openai_api_key: None,
            use_ai_activity: true,
            use_chat_context: true,
        }
    }

    #[test]
    fn unknown_provider_fails_fast() {
        let err = LlmClient::from_config(&base_config("bard")).unwrap_err();
        assert!(err.to_string().contains("unknown ai_provider"));
    }

    #[test]
    fn config_key_satisfies_credential_check() {
        let mut config = base_config("anthropic");
        config.anthropic_api_key = Some("sk-test".to_string());
        let client = LlmClient::from_config(&config).unwrap();
        assert!(matches!(client, LlmClient::Anthropic { .. }));
    }

    #[test]
    fn extracts_provider_response_text() {
        let anthropic = serde_json::json!({
            "content": [{"type": "text", "text": "a reflective entry"}]
        });
        assert_eq!(
            extract_text(&anthropic, "/content/0/text").unwrap(),
            "a reflective entry"
        );

        let openai = serde_json::json!({
            "choices": [{"message": {"role": "assistant", "content": "another entry"}}]
        });
        assert_eq!(
            extract_text(&openai, "/choices/0/message/content").unwrap(),
            "another entry"
        );

        assert!(extract_text(&serde_json::json!({}), "/content/0/text").is_err());
    }
}
