use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::context::LlmContext;
use crate::errors::GatewayError;

/// Options controlling a single completion call.
#[derive(Clone, Debug)]
pub struct CompletionOptions {
    pub max_tokens: u32,
    pub temperature: Option<f64>,
    pub stop_sequences: Vec<String>,
}

impl Default for CompletionOptions {
    fn default() -> Self {
        Self {
            max_tokens: 2048,
            temperature: None,
            stop_sequences: Vec::new(),
        }
    }
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum StopReason {
    EndTurn,
    MaxTokens,
    StopSequence,
    Other(String),
}

#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct TokenUsage {
    pub input_tokens: u32,
    pub output_tokens: u32,
}

/// The text a provider produced for one call.
#[derive(Clone, Debug)]
pub struct Completion {
    pub text: String,
    pub stop_reason: Option<StopReason>,
    pub usage: Option<TokenUsage>,
}

impl Completion {
    pub fn text(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            stop_reason: Some(StopReason::EndTurn),
            usage: None,
        }
    }
}

/// Trait implemented by each text-generation backend.
#[async_trait]
pub trait LlmProvider: Send + Sync {
    fn name(&self) -> &str;
    fn model(&self) -> &str;

    async fn complete(
        &self,
        context: &LlmContext,
        options: &CompletionOptions,
    ) -> Result<Completion, GatewayError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn completion_options_defaults() {
        let opts = CompletionOptions::default();
        assert_eq!(opts.max_tokens, 2048);
        assert!(opts.temperature.is_none());
        assert!(opts.stop_sequences.is_empty());
    }

    #[test]
    fn stop_reason_serialization() {
        assert_eq!(serde_json::to_string(&StopReason::EndTurn).unwrap(), r#""end_turn""#);
        assert_eq!(serde_json::to_string(&StopReason::MaxTokens).unwrap(), r#""max_tokens""#);
    }

    #[test]
    fn text_completion_ends_turn() {
        let c = Completion::text("hello");
        assert_eq!(c.text, "hello");
        assert_eq!(c.stop_reason, Some(StopReason::EndTurn));
    }
}
