use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use parking_lot::Mutex;

use zonewise_core::context::LlmContext;
use zonewise_core::errors::GatewayError;
use zonewise_core::provider::{Completion, CompletionOptions, LlmProvider};

/// Pre-programmed responses for deterministic testing without API calls.
#[derive(Clone, Debug)]
pub enum MockResponse {
    Completion(Completion),
    Error(GatewayError),
    /// Wait, then resolve the inner response.
    Delay(Duration, Box<MockResponse>),
}

impl MockResponse {
    pub fn text(text: &str) -> Self {
        Self::Completion(Completion::text(text))
    }

    pub fn delayed(delay: Duration, inner: MockResponse) -> Self {
        Self::Delay(delay, Box::new(inner))
    }
}

/// Provider that replays responses in order and records every context it saw.
pub struct MockProvider {
    responses: Vec<MockResponse>,
    call_count: AtomicUsize,
    seen: Mutex<Vec<LlmContext>>,
    repeat_last: bool,
}

impl MockProvider {
    pub fn new(responses: Vec<MockResponse>) -> Self {
        Self {
            responses,
            call_count: AtomicUsize::new(0),
            seen: Mutex::new(Vec::new()),
            repeat_last: false,
        }
    }

    /// Answer every call with the same response. Used for offline runs.
    pub fn repeating(response: MockResponse) -> Self {
        Self {
            repeat_last: true,
            ..Self::new(vec![response])
        }
    }

    pub fn call_count(&self) -> usize {
        self.call_count.load(Ordering::Relaxed)
    }

    /// Contexts passed to `complete`, in call order.
    pub fn contexts(&self) -> Vec<LlmContext> {
        self.seen.lock().clone()
    }
}

#[async_trait]
impl LlmProvider for MockProvider {
    fn name(&self) -> &str {
        "mock"
    }

    fn model(&self) -> &str {
        "mock-model"
    }

    async fn complete(
        &self,
        context: &LlmContext,
        _options: &CompletionOptions,
    ) -> Result<Completion, GatewayError> {
        let idx = self.call_count.fetch_add(1, Ordering::Relaxed);
        self.seen.lock().push(context.clone());

        let slot = if self.repeat_last {
            idx.min(self.responses.len().saturating_sub(1))
        } else {
            idx
        };
        let mut current = self.responses.get(slot).ok_or_else(|| {
            GatewayError::InvalidRequest(format!("MockProvider: no response configured for call {idx}"))
        })?;

        loop {
            match current {
                MockResponse::Completion(c) => return Ok(c.clone()),
                MockResponse::Error(e) => return Err(e.clone()),
                MockResponse::Delay(duration, inner) => {
                    tokio::time::sleep(*duration).await;
                    current = inner;
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use zonewise_core::turns::{Conversation, ConversationTurn};

    #[tokio::test]
    async fn text_response() {
        let mock = MockProvider::new(vec![MockResponse::text("hello world")]);
        let c = mock
            .complete(&LlmContext::empty(), &CompletionOptions::default())
            .await
            .unwrap();
        assert_eq!(c.text, "hello world");
    }

    #[tokio::test]
    async fn sequential_then_exhausted() {
        let mock = MockProvider::new(vec![MockResponse::text("first"), MockResponse::text("second")]);
        let ctx = LlmContext::empty();
        let opts = CompletionOptions::default();

        assert_eq!(mock.complete(&ctx, &opts).await.unwrap().text, "first");
        assert_eq!(mock.complete(&ctx, &opts).await.unwrap().text, "second");
        assert!(matches!(
            mock.complete(&ctx, &opts).await,
            Err(GatewayError::InvalidRequest(_))
        ));
        assert_eq!(mock.call_count(), 3);
    }

    #[tokio::test]
    async fn repeating_never_exhausts() {
        let mock = MockProvider::repeating(MockResponse::text("offline"));
        let ctx = LlmContext::empty();
        let opts = CompletionOptions::default();
        for _ in 0..3 {
            assert_eq!(mock.complete(&ctx, &opts).await.unwrap().text, "offline");
        }
        assert_eq!(mock.call_count(), 3);
    }

    #[tokio::test]
    async fn records_contexts() {
        let mock = MockProvider::new(vec![MockResponse::text("ok")]);
        let conversation = Conversation::new(vec![ConversationTurn::user("R-1?")]);
        let ctx = LlmContext::new("system", &conversation);
        mock.complete(&ctx, &CompletionOptions::default()).await.unwrap();

        let seen = mock.contexts();
        assert_eq!(seen.len(), 1);
        assert_eq!(seen[0].system_prompt, "system");
        assert_eq!(seen[0].turns[0].content, "R-1?");
    }

    #[tokio::test]
    async fn delayed_error() {
        let mock = MockProvider::new(vec![MockResponse::delayed(
            Duration::from_millis(20),
            MockResponse::Error(GatewayError::RateLimited { retry_after: None }),
        )]);
        let start = std::time::Instant::now();
        let result = mock
            .complete(&LlmContext::empty(), &CompletionOptions::default())
            .await;
        assert!(start.elapsed() >= Duration::from_millis(15));
        assert!(matches!(result, Err(GatewayError::RateLimited { .. })));
    }
}
