//! Keyword-based topic matching.
//!
//! Free text is lowercased and checked against an ordered registry of topic
//! handlers. A handler matches when any of its keywords appears anywhere in
//! the text as a substring. Keyword sets overlap ("study progress" vs. "goal
//! progress"), so registry order decides and the first match wins.

use serde::{Deserialize, Serialize};

/// A subject the assistant can answer about.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Topic {
    StudyProgress,
    Fitness,
    Goals,
    WeeklyOverview,
    SubjectBreakdown,
}

/// A topic and the keywords that select it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TopicHandler {
    pub topic: Topic,
    pub keywords: &'static [&'static str],
}

impl TopicHandler {
    /// Whether any keyword occurs in already-lowercased text.
    pub fn matches(&self, normalized: &str) -> bool {
        self.keywords.iter().any(|k| normalized.contains(k))
    }
}

// =============================================================================
// Registry (order is significant)
// =============================================================================

pub static TOPIC_REGISTRY: &[TopicHandler] = &[
    TopicHandler {
        topic: Topic::StudyProgress,
        keywords: &["study", "progress", "hours", "studying", "academic"],
    },
    TopicHandler {
        topic: Topic::Fitness,
        keywords: &["gym", "fitness", "workout", "exercise", "training"],
    },
    TopicHandler {
        topic: Topic::Goals,
        keywords: &["goal", "goals", "target", "objectives", "achievement"],
    },
    TopicHandler {
        topic: Topic::WeeklyOverview,
        keywords: &["week", "plan", "schedule", "overview", "summary"],
    },
    TopicHandler {
        topic: Topic::SubjectBreakdown,
        keywords: &["subject", "course", "dsa", "dbms", "networks"],
    },
];

/// Select the first registered topic whose keywords occur in `text`.
pub fn match_topic(text: &str) -> Option<Topic> {
    let normalized = text.to_lowercase();
    TOPIC_REGISTRY
        .iter()
        .find(|handler| handler.matches(&normalized))
        .map(|handler| handler.topic)
}
