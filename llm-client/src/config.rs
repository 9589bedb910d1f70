use serde::{Deserialize, Serialize};

use crate::error::{LlmError, Result};
use crate::providers::ProviderKind;

const DEFAULT_PROVIDER: &str = "groq";
const DEFAULT_MODEL: &str = "llama-3.1-70b-versatile";

/// Connection settings for a single completion provider.
///
/// Meant to be embedded as an `[llm]` table in a program's own TOML file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LlmConfig {
    /// Provider identifier (groq, openrouter, cerebras, openai)
    #[serde(default = "default_provider")]
    pub provider: String,

    /// Model name/identifier for the provider
    #[serde(default = "default_model")]
    pub model: String,

    /// API key (optional, the provider's environment variable is used otherwise)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,

    /// Custom base URL for OpenAI-compatible endpoints
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub base_url: Option<String>,

    /// Per-request timeout in seconds. None waits indefinitely.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timeout_secs: Option<u64>,
}

fn default_provider() -> String {
    DEFAULT_PROVIDER.to_string()
}

fn default_model() -> String {
    DEFAULT_MODEL.to_string()
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            provider: default_provider(),
            model: default_model(),
            api_key: None,
            base_url: None,
            timeout_secs: None,
        }
    }
}

impl LlmConfig {
    /// Parsed provider kind
    pub fn kind(&self) -> Result<ProviderKind> {
        self.provider.parse()
    }

    /// Resolve the API key: config value first, then the provider's env var.
    pub fn resolve_api_key(&self) -> Result<String> {
        let kind = self.kind()?;
        self.resolve_api_key_with(kind, |var| std::env::var(var).ok())
    }

    fn resolve_api_key_with(
        &self,
        kind: ProviderKind,
        lookup: impl Fn(&str) -> Option<String>,
    ) -> Result<String> {
        if let Some(key) = self.api_key.as_deref().filter(|k| !k.trim().is_empty()) {
            return Ok(key.to_string());
        }

        lookup(kind.env_var())
            .filter(|k| !k.trim().is_empty())
            .ok_or_else(|| LlmError::MissingApiKey {
                provider: kind.display_name().to_string(),
                env_var: kind.env_var().to_string(),
            })
    }

    /// Base URL to use: explicit override or the provider default.
    pub fn resolve_base_url(&self) -> Result<String> {
        match &self.base_url {
            Some(url) => Ok(url.clone()),
            None => Ok(self.kind()?.default_base_url().to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = LlmConfig::default();
        assert_eq!(config.provider, "groq");
        assert_eq!(config.model, "llama-3.1-70b-versatile");
        assert!(config.api_key.is_none());
        assert!(config.timeout_secs.is_none());
        assert_eq!(config.kind().unwrap(), ProviderKind::Groq);
    }

    #[test]
    fn test_parse_partial_table() {
        let config: LlmConfig = toml::from_str(r#"model = "llama-3.3-70b-versatile""#).unwrap();
        assert_eq!(config.provider, "groq");
        assert_eq!(config.model, "llama-3.3-70b-versatile");
    }

    #[test]
    fn test_config_key_wins_over_env() {
        let config = LlmConfig {
            api_key: Some("from-config".into()),
            ..LlmConfig::default()
        };
        let key = config
            .resolve_api_key_with(ProviderKind::Groq, |_| Some("from-env".into()))
            .unwrap();
        assert_eq!(key, "from-config");
    }

    #[test]
    fn test_env_key_used_when_config_empty() {
        let config = LlmConfig::default();
        let key = config
            .resolve_api_key_with(ProviderKind::Groq, |var| {
                assert_eq!(var, "GROQ_API_KEY");
                Some("from-env".into())
            })
            .unwrap();
        assert_eq!(key, "from-env");
    }

    #[test]
    fn test_missing_key() {
        let config = LlmConfig::default();
        let err = config
            .resolve_api_key_with(ProviderKind::Groq, |_| None)
            .unwrap_err();
        assert!(matches!(err, LlmError::MissingApiKey { .. }));
    }

    #[test]
    fn test_blank_env_key_is_missing() {
        let config = LlmConfig::default();
        let result = config.resolve_api_key_with(ProviderKind::Groq, |_| Some("  ".into()));
        assert!(result.is_err());
    }

    #[test]
    fn test_base_url_override() {
        let config = LlmConfig {
            base_url: Some("http://localhost:8080/v1".into()),
            ..LlmConfig::default()
        };
        assert_eq!(config.resolve_base_url().unwrap(), "http://localhost:8080/v1");
        assert_eq!(
            LlmConfig::default().resolve_base_url().unwrap(),
            "https://api.groq.com/openai/v1"
        );
    }
}
