//! Conversational interface for GradTrack.
//!
//! Matches free-text questions to a fixed set of topics, answers them with
//! prose plus stat tiles, charts and goal cards built from backend data, and
//! keeps the running conversation log.

pub mod conversation;
pub mod error;
pub mod response;
pub mod topics;
pub mod types;

pub use conversation::{ConversationManager, DEGRADED_REPLY};
pub use error::ChatError;
pub use response::{Responder, ResponseResolver, HELP_MESSAGE};
pub use topics::{match_topic, Topic, TopicHandler, TOPIC_REGISTRY};
pub use types::{
    Accent, ChartPoint, ChartSpec, ChartType, ContentBlock, ContentKind, GoalCard, Message,
    MessageContent, ProgressBand, Role, StatTile, Trend, TurnOutcome, TurnPhase, VisualPayload,
};
