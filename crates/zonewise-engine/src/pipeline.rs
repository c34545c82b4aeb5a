use std::sync::Arc;

use chrono::Utc;
use serde::{Deserialize, Serialize};
use tokio::task::JoinHandle;
use tracing::{info, instrument};

use zonewise_core::artifact::Artifact;
use zonewise_core::ids::SessionId;
use zonewise_core::provider::{CompletionOptions, LlmProvider};
use zonewise_core::turns::{Conversation, Role};

use crate::error::EngineError;
use crate::extract;
use crate::generation;
use crate::lookup::{self, ZoningSource};
use crate::persist::{self, Exchange, ExchangeSink};
use crate::prompt;
use crate::sanitize;

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TurnRequest {
    pub messages: Conversation,
    #[serde(default)]
    pub session_id: Option<SessionId>,
}

#[derive(Clone, Debug, Serialize)]
pub struct TurnResponse {
    pub response: String,
    pub artifacts: Vec<Artifact>,
}

#[derive(Clone, Debug)]
pub struct AssistantConfig {
    pub system_prompt: String,
    pub completion: CompletionOptions,
}

impl Default for AssistantConfig {
    fn default() -> Self {
        Self {
            system_prompt: prompt::SYSTEM_PROMPT.to_string(),
            completion: CompletionOptions::default(),
        }
    }
}

/// Answers zoning questions. Collaborators are injected once at start-up and
/// shared by every turn.
pub struct ZoningAssistant {
    source: Arc<dyn ZoningSource>,
    provider: Arc<dyn LlmProvider>,
    sink: Arc<dyn ExchangeSink>,
    config: AssistantConfig,
}

impl ZoningAssistant {
    pub fn new(
        source: Arc<dyn ZoningSource>,
        provider: Arc<dyn LlmProvider>,
        sink: Arc<dyn ExchangeSink>,
        config: AssistantConfig,
    ) -> Self {
        Self {
            source,
            provider,
            sink,
            config,
        }
    }

    pub fn provider(&self) -> &dyn LlmProvider {
        self.provider.as_ref()
    }

    /// Run one turn. Persistence is dispatched in the background.
    pub async fn respond(&self, request: TurnRequest) -> Result<TurnResponse, EngineError> {
        let (response, _persistence) = self.respond_tracked(request).await?;
        Ok(response)
    }

    /// Like [`respond`](Self::respond), but also returns the persistence task
    /// handle (when a session id was given) so callers can drain it.
    #[instrument(skip_all, fields(session_id = ?request.session_id, turns = request.messages.len()))]
    pub async fn respond_tracked(
        &self,
        request: TurnRequest,
    ) -> Result<(TurnResponse, Option<JoinHandle<()>>), EngineError> {
        let TurnRequest {
            messages,
            session_id,
        } = request;

        let user_content = match messages.last() {
            None => {
                return Err(EngineError::InvalidConversation("no messages".into()));
            }
            Some(turn) if turn.role != Role::User => {
                return Err(EngineError::InvalidConversation(
                    "last message must come from the user".into(),
                ));
            }
            Some(turn) => turn.content.clone(),
        };

        let context = lookup::lookup(self.source.as_ref(), &messages).await;
        let system_prompt = prompt::build(&self.config.system_prompt, context.as_deref());

        let raw = generation::generate(
            self.provider.as_ref(),
            &system_prompt,
            &messages,
            &self.config.completion,
        )
        .await?;

        let artifacts = extract::extract(&raw, &user_content);
        let response = sanitize::sanitize(&raw);

        info!(
            context = context.is_some(),
            artifacts = artifacts.len(),
            "turn complete"
        );

        let persistence = session_id.map(|session_id| {
            persist::dispatch(
                Arc::clone(&self.sink),
                Exchange {
                    session_id,
                    user_content,
                    assistant_content: response.clone(),
                    artifacts: artifacts.clone(),
                    timestamp: Utc::now(),
                },
            )
        });

        Ok((TurnResponse { response, artifacts }, persistence))
    }
}
