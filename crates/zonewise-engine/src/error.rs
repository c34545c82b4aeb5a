use zonewise_core::errors::GatewayError;
use zonewise_store::StoreError;

#[derive(Debug, thiserror::Error)]
pub enum EngineError {
    /// The generation call failed. Fatal to the turn.
    #[error("generation failed: {0}")]
    Generation(#[from] GatewayError),

    #[error("invalid conversation: {0}")]
    InvalidConversation(String),

    #[error("store error: {0}")]
    Store(#[from] StoreError),
}

impl EngineError {
    /// Short classification string for logging.
    pub fn error_kind(&self) -> &'static str {
        match self {
            Self::Generation(e) => e.error_kind(),
            Self::InvalidConversation(_) => "invalid_conversation",
            Self::Store(_) => "store",
        }
    }
}
