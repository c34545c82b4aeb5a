//! Best-effort logging of each exchange, off the request path.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tokio::task::JoinHandle;
use tracing::{debug, warn};

use zonewise_core::artifact::Artifact;
use zonewise_core::ids::SessionId;
use zonewise_store::{MessageRepo, StoreError};

/// One user question and the sanitized answer it produced.
#[derive(Clone, Debug)]
pub struct Exchange {
    pub session_id: SessionId,
    pub user_content: String,
    pub assistant_content: String,
    pub artifacts: Vec<Artifact>,
    pub timestamp: DateTime<Utc>,
}

/// Append-only destination for exchanges.
#[async_trait]
pub trait ExchangeSink: Send + Sync {
    async fn record(&self, exchange: &Exchange) -> Result<(), StoreError>;
}

/// Writes exchanges to `chat_messages` and bumps the session's query count.
pub struct SqliteSink {
    messages: MessageRepo,
}

impl SqliteSink {
    pub fn new(messages: MessageRepo) -> Self {
        Self { messages }
    }
}

#[async_trait]
impl ExchangeSink for SqliteSink {
    async fn record(&self, exchange: &Exchange) -> Result<(), StoreError> {
        self.messages.append_exchange(
            &exchange.session_id,
            &exchange.user_content,
            &exchange.assistant_content,
            &exchange.artifacts,
            exchange.timestamp,
        )?;
        Ok(())
    }
}

/// Record the exchange on a detached task. Failures are logged and dropped.
/// The handle exists for draining and tests; the request path never awaits it.
pub fn dispatch(sink: Arc<dyn ExchangeSink>, exchange: Exchange) -> JoinHandle<()> {
    tokio::spawn(async move {
        match sink.record(&exchange).await {
            Ok(()) => debug!(
                session_id = %exchange.session_id,
                artifacts = exchange.artifacts.len(),
                "exchange recorded"
            ),
            Err(e) => warn!(
                session_id = %exchange.session_id,
                error = %e,
                "failed to record exchange"
            ),
        }
    })
}
