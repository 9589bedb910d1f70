//! LLM provider implementations

pub mod mock;
mod openai_compatible;

pub use mock::MockProvider;
pub use openai_compatible::OpenAICompatibleProvider;

use std::str::FromStr;
use std::sync::Arc;
use std::time::Duration;

use crate::config::LlmConfig;
use crate::error::{LlmError, Result};
use crate::provider::LlmProvider;

/// Supported provider types. All of them speak the OpenAI chat completions API.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProviderKind {
    Groq,
    OpenRouter,
    Cerebras,
    OpenAi,
}

impl FromStr for ProviderKind {
    type Err = LlmError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "groq" => Ok(Self::Groq),
            "openrouter" => Ok(Self::OpenRouter),
            "cerebras" => Ok(Self::Cerebras),
            "openai" => Ok(Self::OpenAi),
            _ => Err(LlmError::UnknownProvider(s.to_string())),
        }
    }
}

impl ProviderKind {
    /// Environment variable holding this provider's API key
    pub fn env_var(&self) -> &'static str {
        match self {
            Self::Groq => "GROQ_API_KEY",
            Self::OpenRouter => "OPENROUTER_API_KEY",
            Self::Cerebras => "CEREBRAS_API_KEY",
            Self::OpenAi => "OPENAI_API_KEY",
        }
    }

    pub fn default_base_url(&self) -> &'static str {
        match self {
            Self::Groq => "https://api.groq.com/openai/v1",
            Self::OpenRouter => "https://openrouter.ai/api/v1",
            Self::Cerebras => "https://api.cerebras.ai/v1",
            Self::OpenAi => "https://api.openai.com/v1",
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            Self::Groq => "Groq",
            Self::OpenRouter => "OpenRouter",
            Self::Cerebras => "Cerebras",
            Self::OpenAi => "OpenAI",
        }
    }
}

/// Create a provider instance from configuration.
///
/// Fails with [`LlmError::MissingApiKey`] when no key is configured, so callers
/// can treat a missing credential as a startup error.
pub fn get_provider(config: &LlmConfig) -> Result<Arc<dyn LlmProvider>> {
    let kind = config.kind()?;
    let api_key = config.resolve_api_key()?;
    let base_url = config.resolve_base_url()?;
    let timeout = config.timeout_secs.map(Duration::from_secs);

    Ok(Arc::new(OpenAICompatibleProvider::new(
        &config.model,
        &base_url,
        api_key,
        kind.display_name(),
        timeout,
    )?))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_provider_kind_parsing() {
        assert_eq!("groq".parse::<ProviderKind>().unwrap(), ProviderKind::Groq);
        assert_eq!("GROQ".parse::<ProviderKind>().unwrap(), ProviderKind::Groq);
        assert_eq!(
            "openrouter".parse::<ProviderKind>().unwrap(),
            ProviderKind::OpenRouter
        );
        assert!(matches!(
            "claude-cli".parse::<ProviderKind>(),
            Err(LlmError::UnknownProvider(_))
        ));
    }

    #[test]
    fn test_env_vars() {
        assert_eq!(ProviderKind::Groq.env_var(), "GROQ_API_KEY");
        assert_eq!(ProviderKind::Cerebras.env_var(), "CEREBRAS_API_KEY");
    }

    #[test]
    fn test_get_provider_with_config_key() {
        let config = LlmConfig {
            api_key: Some("test-key".into()),
            ..LlmConfig::default()
        };
        let provider = get_provider(&config).unwrap();
        assert_eq!(provider.name(), "Groq");
        assert_eq!(provider.model(), "llama-3.1-70b-versatile");
    }

    #[test]
    fn test_get_provider_unknown_kind() {
        let config = LlmConfig {
            provider: "nonexistent".into(),
            api_key: Some("test-key".into()),
            ..LlmConfig::default()
        };
        assert!(get_provider(&config).is_err());
    }
}
