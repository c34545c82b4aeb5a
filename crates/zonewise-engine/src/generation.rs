use tracing::{info, warn};

use zonewise_core::context::LlmContext;
use zonewise_core::provider::{CompletionOptions, LlmProvider};
use zonewise_core::turns::Conversation;

use crate::error::EngineError;

/// One call to the provider. No retry here; wrap the provider for that.
pub async fn generate(
    provider: &dyn LlmProvider,
    prompt: &str,
    conversation: &Conversation,
    options: &CompletionOptions,
) -> Result<String, EngineError> {
    let context = LlmContext::new(prompt, conversation);

    match provider.complete(&context, options).await {
        Ok(completion) => {
            info!(
                provider = provider.name(),
                model = provider.model(),
                chars = completion.text.len(),
                stop_reason = ?completion.stop_reason,
                "generation complete"
            );
            Ok(completion.text)
        }
        Err(e) => {
            warn!(
                provider = provider.name(),
                error_kind = e.error_kind(),
                error = %e,
                "generation failed"
            );
            Err(EngineError::Generation(e))
        }
    }
}
