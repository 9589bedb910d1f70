use thiserror::Error;

#[derive(Error, Debug)]
pub enum LlmError {
    #[error(
        "API key not found for {provider}. Set {env_var} environment variable or add api_key to the [llm] config table."
    )]
    MissingApiKey { provider: String, env_var: String },

    #[error("Unknown provider: {0}")]
    UnknownProvider(String),

    #[error("Rate limit exceeded{}", .retry_after.map(|s| format!(". Retry after {} seconds", s)).unwrap_or_default())]
    RateLimited { retry_after: Option<u64> },

    #[error("Server overloaded (HTTP 503): {message}")]
    ServerOverloaded { message: String },

    #[error("API error{}: {message}", status_code.map(|c| format!(" (HTTP {})", c)).unwrap_or_default())]
    ApiError {
        message: String,
        status_code: Option<u16>,
    },

    #[error("Model returned an empty completion")]
    EmptyCompletion,

    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl LlmError {
    /// Build an error from a non-success HTTP status and its body.
    pub fn from_status(status: u16, message: String, retry_after: Option<u64>) -> Self {
        match status {
            429 => Self::RateLimited { retry_after },
            503 => Self::ServerOverloaded { message },
            _ => Self::ApiError {
                message,
                status_code: Some(status),
            },
        }
    }
}

pub type Result<T> = std::result::Result<T, LlmError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_status_rate_limited() {
        let err = LlmError::from_status(429, "slow down".into(), Some(12));
        assert!(matches!(err, LlmError::RateLimited { retry_after: Some(12) }));
        assert_eq!(err.to_string(), "Rate limit exceeded. Retry after 12 seconds");
    }

    #[test]
    fn test_from_status_overloaded() {
        let err = LlmError::from_status(503, "busy".into(), None);
        assert!(matches!(err, LlmError::ServerOverloaded { .. }));
    }

    #[test]
    fn test_api_error_display() {
        let err = LlmError::from_status(401, "invalid key".into(), None);
        assert_eq!(err.to_string(), "API error (HTTP 401): invalid key");
    }

    #[test]
    fn test_missing_key_mentions_env_var() {
        let err = LlmError::MissingApiKey {
            provider: "Groq".into(),
            env_var: "GROQ_API_KEY".into(),
        };
        assert!(err.to_string().contains("GROQ_API_KEY"));
    }
}
