pub mod claude;
pub mod gemini;
pub mod parser;

use std::str::FromStr;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;

use crate::config::Config;

/// A text-generation backend: prompt in, free-form text out.
///
/// Errors carry the upstream message (transport, auth, quota) unchanged so
/// callers can surface it.
#[async_trait]
pub trait ModelClient: Send + Sync {
    fn name(&self) -> &str;

    async fn generate(&self, prompt: &str) -> anyhow::Result<String>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Provider {
    Gemini,
    Claude,
}

impl FromStr for Provider {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "gemini" | "google" => Ok(Provider::Gemini),
            "claude" | "anthropic" => Ok(Provider::Claude),
            other => Err(format!("unknown LLM provider {other:?}")),
        }
    }
}

/// Builds the configured client. No timeout unless `LLM_TIMEOUT_SECS` is set.
pub fn build_client(config: &Config) -> anyhow::Result<Arc<dyn ModelClient>> {
    let mut builder = reqwest::Client::builder();
    if let Some(secs) = config.llm_timeout_secs {
        builder = builder.timeout(Duration::from_secs(secs));
    }
    let http = builder.build()?;

    let client: Arc<dyn ModelClient> = match config.llm_provider {
        Provider::Gemini => Arc::new(gemini::GeminiClient::new(
            http,
            config.gemini_api_key.clone(),
            config.gemini_model.clone(),
            config.llm_base_url.clone(),
        )),
        Provider::Claude => Arc::new(claude::ClaudeClient::new(
            http,
            config.claude_api_key.clone(),
            config.claude_model.clone(),
            config.llm_base_url.clone(),
        )),
    };

    tracing::info!(provider = client.name(), "Model client ready");
    Ok(client)
}

#[cfg(test)]
pub mod fake {
    use super::*;
    use std::sync::Mutex;

    /// Returns a canned reply (or error) and records every prompt it sees.
    pub struct FakeModel {
        reply: Result<String, String>,
        pub prompts: Mutex<Vec<String>>,
    }

    impl FakeModel {
        pub fn replying(text: &str) -> Self {
            Self {
                reply: Ok(text.to_string()),
                prompts: Mutex::new(Vec::new()),
            }
        }

        pub fn failing(message: &str) -> Self {
            Self {
                reply: Err(message.to_string()),
                prompts: Mutex::new(Vec::new()),
            }
        }

        pub fn calls(&self) -> usize {
            self.prompts.lock().unwrap().len()
        }
    }

    #[async_trait]
    impl ModelClient for FakeModel {
        fn name(&self) -> &str {
            "fake"
        }

        async fn generate(&self, prompt: &str) -> anyhow::Result<String> {
            self.prompts.lock().unwrap().push(prompt.to_string());
            self.reply.clone().map_err(|e| anyhow::anyhow!(e))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_provider_from_str() {
        assert_eq!("gemini".parse::<Provider>().unwrap(), Provider::Gemini);
        assert_eq!(" Anthropic ".parse::<Provider>().unwrap(), Provider::Claude);
        assert!("openai".parse::<Provider>().is_err());
    }

    #[test]
    fn test_build_client_follows_config() {
        let mut config = Config::for_tests();
        config.llm_provider = Provider::Claude;
        let client = build_client(&config).unwrap();
        assert_eq!(client.name(), "claude");

        config.llm_provider = Provider::Gemini;
        config.llm_timeout_secs = Some(30);
        let client = build_client(&config).unwrap();
        assert_eq!(client.name(), "gemini");
    }
}
