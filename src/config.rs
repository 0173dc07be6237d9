// src/config.rs
use crate::errors::ServerError;
use std::net::SocketAddr;
use std::str::FromStr;

#[derive(Debug, Clone)]
pub struct LlmConfig {
    pub api_key: String,
    /// Chat model name, e.g. "gpt-4o-mini".
    pub model: String,
    /// OpenAI-compatible API root, without the trailing `/chat/completions`.
    pub base_url: String,
    pub temperature: f32,
    pub max_tokens: u32,
    pub timeout_secs: u64,
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            api_key: String::new(),
            model: "gpt-4o-mini".to_string(),
            base_url: "https://api.openai.com/v1".to_string(),
            temperature: 0.1,
            max_tokens: 500,
            timeout_secs: 30,
        }
    }
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub bind_addr: SocketAddr,
    pub database_path: String,
    pub max_workers: usize,
    pub llm: LlmConfig,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            bind_addr: SocketAddr::from(([127, 0, 0, 1], 3000)),
            database_path: "listings.sqlite3".to_string(),
            max_workers: 8,
            llm: LlmConfig::default(),
        }
    }
}

impl AppConfig {
    /// Defaults overridden by environment variables. `OPENAI_API_KEY` has
    /// no default and must be set.
    pub fn from_env() -> Result<Self, ServerError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Same as [`AppConfig::from_env`] but reading from any key lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ServerError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut cfg = Self::default();

        if let Some(addr) = lookup("BIND_ADDR") {
            cfg.bind_addr = parse_var("BIND_ADDR", &addr)?;
        }
        if let Some(path) = lookup("DATABASE_PATH") {
            cfg.database_path = path;
        }
        if let Some(workers) = lookup("MAX_WORKERS") {
            cfg.max_workers = parse_var("MAX_WORKERS", &workers)?;
            if cfg.max_workers == 0 {
                return Err(ServerError::Config("MAX_WORKERS must be at least 1".into()));
            }
        }

        cfg.llm.api_key = lookup("OPENAI_API_KEY")
            .filter(|k| !k.trim().is_empty())
            .ok_or_else(|| {
                ServerError::Config("OPENAI_API_KEY environment variable not set".into())
            })?;
        if let Some(model) = lookup("LLM_MODEL") {
            cfg.llm.model = model;
        }
        if let Some(url) = lookup("LLM_BASE_URL") {
            cfg.llm.base_url = url.trim_end_matches('/').to_string();
        }
        if let Some(secs) = lookup("LLM_TIMEOUT_SECS") {
            cfg.llm.timeout_secs = parse_var("LLM_TIMEOUT_SECS", &secs)?;
        }

        Ok(cfg)
    }
}

fn parse_var<T>(key: &str, raw: &str) -> Result<T, ServerError>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    raw.trim()
        .parse::<T>()
        .map_err(|e| ServerError::Config(format!("invalid {key} '{raw}': {e}")))
}
