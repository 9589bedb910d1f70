//! Mock LLM provider for testing
//!
//! Replies are computed from the request by a caller-supplied closure, so a
//! test can fail specific prompts, echo them back, or delay them to shake out
//! ordering bugs. Every request is recorded.

use async_trait::async_trait;
use std::sync::Mutex;
use std::time::Duration;

use crate::error::{LlmError, Result};
use crate::provider::{LlmProvider, LlmRequest, LlmResponse};

type Responder = Box<dyn Fn(&LlmRequest) -> Result<String> + Send + Sync>;
type Delay = Box<dyn Fn(&LlmRequest) -> Duration + Send + Sync>;

/// A scripted provider for tests
pub struct MockProvider {
    responder: Responder,
    delay: Option<Delay>,
    requests: Mutex<Vec<LlmRequest>>,
    name: String,
}

impl MockProvider {
    /// Create a provider whose reply is computed from each request
    pub fn from_fn<F>(responder: F) -> Self
    where
        F: Fn(&LlmRequest) -> Result<String> + Send + Sync + 'static,
    {
        Self {
            responder: Box::new(responder),
            delay: None,
            requests: Mutex::new(Vec::new()),
            name: "mock".to_string(),
        }
    }

    /// Create a provider that always succeeds with the same content
    pub fn always_succeeds(response: &str) -> Self {
        let response = response.to_string();
        Self::from_fn(move |_| Ok(response.clone()))
    }

    /// Create a provider that always fails with an API error
    pub fn always_fails(message: &str) -> Self {
        let message = message.to_string();
        Self::from_fn(move |_| Err(api_error(&message)))
    }

    /// Create a provider that replies with the prompt it was given
    pub fn echo() -> Self {
        Self::from_fn(|request| Ok(request.prompt.clone()))
    }

    /// Sleep before replying, duration chosen per request
    pub fn with_delay<F>(mut self, delay: F) -> Self
    where
        F: Fn(&LlmRequest) -> Duration + Send + Sync + 'static,
    {
        self.delay = Some(Box::new(delay));
        self
    }

    /// Set a custom provider name
    pub fn with_name(mut self, name: &str) -> Self {
        self.name = name.to_string();
        self
    }

    /// Number of times complete() was called
    pub fn call_count(&self) -> usize {
        self.requests.lock().map(|r| r.len()).unwrap_or(0)
    }

    /// Requests received so far, in arrival order
    pub fn requests(&self) -> Vec<LlmRequest> {
        self.requests
            .lock()
            .map(|r| r.clone())
            .unwrap_or_default()
    }
}

/// Error a mock reply can return to simulate a failed call
pub fn api_error(message: &str) -> LlmError {
    LlmError::ApiError {
        message: message.to_string(),
        status_code: Some(500),
    }
}

#[async_trait]
impl LlmProvider for MockProvider {
    async fn complete(&self, request: LlmRequest) -> Result<LlmResponse> {
        if let Ok(mut requests) = self.requests.lock() {
            requests.push(request.clone());
        }

        if let Some(delay) = &self.delay {
            tokio::time::sleep(delay(&request)).await;
        }

        let content = (self.responder)(&request)?;
        Ok(LlmResponse {
            content,
            model: "mock-model".to_string(),
            usage: None,
        })
    }

    fn name(&self) -> &str {
        &self.name
    }

    fn model(&self) -> &str {
        "mock-model"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_always_succeeds() {
        let provider = MockProvider::always_succeeds("success");

        let result = provider.complete(LlmRequest::new("test")).await;
        assert_eq!(result.unwrap().content, "success");
        assert_eq!(provider.call_count(), 1);
    }

    #[tokio::test]
    async fn test_always_fails() {
        let provider = MockProvider::always_fails("overloaded");

        for _ in 0..3 {
            let result = provider.complete(LlmRequest::new("test")).await;
            assert!(result.is_err());
        }
        assert_eq!(provider.call_count(), 3);
    }

    #[tokio::test]
    async fn test_from_fn_fails_selected_prompts() {
        let provider = MockProvider::from_fn(|request| {
            if request.prompt.contains("bad") {
                Err(api_error("rejected"))
            } else {
                Ok(format!("ok: {}", request.prompt))
            }
        });

        assert!(provider.complete(LlmRequest::new("bad input")).await.is_err());
        let ok = provider.complete(LlmRequest::new("good")).await.unwrap();
        assert_eq!(ok.content, "ok: good");
    }

    #[tokio::test]
    async fn test_records_requests() {
        let provider = MockProvider::echo().with_name("recorder");
        provider
            .complete(LlmRequest::new("first").with_max_tokens(10))
            .await
            .unwrap();
        provider.complete(LlmRequest::new("second")).await.unwrap();

        let requests = provider.requests();
        assert_eq!(requests.len(), 2);
        assert_eq!(requests[0].prompt, "first");
        assert_eq!(requests[0].max_tokens, Some(10));
        assert_eq!(requests[1].prompt, "second");
        assert_eq!(provider.name(), "recorder");
    }

    #[tokio::test]
    async fn test_delay_applies() {
        let provider = MockProvider::echo().with_delay(|_| Duration::from_millis(5));
        let start = std::time::Instant::now();
        provider.complete(LlmRequest::new("x")).await.unwrap();
        assert!(start.elapsed() >= Duration::from_millis(5));
    }
}
