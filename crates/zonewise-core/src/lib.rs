pub mod artifact;
pub mod context;
pub mod errors;
pub mod ids;
pub mod provider;
pub mod turns;
pub mod zoning;

pub use artifact::{
    Artifact, ArtifactBody, ArtifactKind, ArtifactMetadata, ComparisonData, Coordinates,
    Setbacks, ZoneType, ZoningData,
};
pub use context::LlmContext;
pub use errors::GatewayError;
pub use ids::{ArtifactId, MessageId, SessionId};
pub use provider::{Completion, CompletionOptions, LlmProvider, StopReason, TokenUsage};
pub use turns::{Conversation, ConversationTurn, Role};
pub use zoning::{ZoningQuery, ZoningRecord};
