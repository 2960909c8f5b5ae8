use std::env;
use std::str::FromStr;

use crate::ai::Provider;
use crate::services::recommend::DEFAULT_RECENT_LIMIT;

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("{var} must be a valid {kind}, got {value:?}")]
    Invalid {
        var: &'static str,
        kind: &'static str,
        value: String,
    },
}

#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    pub host: String,
    pub port: u16,
    pub cors_origins: Vec<String>,

    pub llm_provider: Provider,
    pub llm_base_url: Option<String>,
    pub llm_timeout_secs: Option<u64>,

    pub gemini_api_key: String,
    pub gemini_model: String,

    pub claude_api_key: String,
    pub claude_model: String,

    pub recent_entry_limit: i64,
    pub seed_sample_data: bool,
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        Ok(Self {
            database_url: env::var("DATABASE_URL")
                .unwrap_or_else(|_| "sqlite:journal_app.db?mode=rwc".into()),
            host: env::var("HOST").unwrap_or_else(|_| "0.0.0.0".into()),
            port: parse_var("PORT", "port number", 5100)?,
            cors_origins: env::var("CORS_ORIGINS")
                .map(|raw| split_origins(&raw))
                .unwrap_or_default(),

            llm_provider: parse_var("LLM_PROVIDER", "provider (gemini|claude)", Provider::Gemini)?,
            llm_base_url: env::var("LLM_BASE_URL").ok().filter(|s| !s.is_empty()),
            llm_timeout_secs: match env::var("LLM_TIMEOUT_SECS") {
                Ok(raw) if !raw.is_empty() => Some(parse_value("LLM_TIMEOUT_SECS", "number", raw)?),
                _ => None,
            },

            gemini_api_key: env::var("GEMINI_API_KEY").unwrap_or_default(),
            gemini_model: env::var("GEMINI_MODEL").unwrap_or_else(|_| "gemini-2.5-flash".into()),

            claude_api_key: env::var("CLAUDE_API_KEY").unwrap_or_default(),
            claude_model: env::var("CLAUDE_MODEL")
                .unwrap_or_else(|_| "claude-sonnet-4-20250514".into()),

            recent_entry_limit: at_least_one(
                "RECENT_ENTRY_LIMIT",
                parse_var("RECENT_ENTRY_LIMIT", "number", DEFAULT_RECENT_LIMIT)?,
            )?,
            seed_sample_data: parse_var("SEED_SAMPLE_DATA", "boolean", false)?,
        })
    }

    pub fn listen_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

fn parse_var<T: FromStr>(var: &'static str, kind: &'static str, default: T) -> Result<T, ConfigError> {
    match env::var(var) {
        Ok(raw) if !raw.trim().is_empty() => parse_value(var, kind, raw),
        _ => Ok(default),
    }
}

fn parse_value<T: FromStr>(var: &'static str, kind: &'static str, raw: String) -> Result<T, ConfigError> {
    raw.trim()
        .parse()
        .map_err(|_| ConfigError::Invalid { var, kind, value: raw })
}

fn at_least_one(var: &'static str, value: i64) -> Result<i64, ConfigError> {
    if value < 1 {
        return Err(ConfigError::Invalid {
            var,
            kind: "number of at least 1",
            value: value.to_string(),
        });
    }
    Ok(value)
}

fn split_origins(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|o| !o.is_empty())
        .map(String::from)
        .collect()
}

#[cfg(test)]
impl Config {
    /// Defaults without touching the process environment.
    pub fn for_tests() -> Self {
        Self {
            database_url: "sqlite::memory:".into(),
            host: "127.0.0.1".into(),
            port: 0,
            cors_origins: Vec::new(),
            llm_provider: Provider::Gemini,
            llm_base_url: None,
            llm_timeout_secs: None,
            gemini_api_key: String::new(),
            gemini_model: "gemini-2.5-flash".into(),
            claude_api_key: String::new(),
            claude_model: "claude-sonnet-4-20250514".into(),
            recent_entry_limit: DEFAULT_RECENT_LIMIT,
            seed_sample_data: false,
        }
    }
}
