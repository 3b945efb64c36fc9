//! Chat message and content model.
//!
//! An assistant turn is an ordered list of [`ContentBlock`]s mixing prose and
//! visual payloads. Payloads are plain data; the rendering layer maps each one
//! onto a visual without re-deriving any values.

use chrono::{DateTime, Utc};
use gradtrack_core::types::Goal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

// =============================================================================
// Messages
// =============================================================================

/// Author of a message.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    User,
    Assistant,
}

/// Body of a message: plain text or an ordered sequence of blocks.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum MessageContent {
    Text(String),
    Blocks(Vec<ContentBlock>),
}

impl MessageContent {
    pub fn as_text(&self) -> Option<&str> {
        match self {
            MessageContent::Text(text) => Some(text),
            MessageContent::Blocks(_) => None,
        }
    }

    pub fn blocks(&self) -> &[ContentBlock] {
        match self {
            MessageContent::Text(_) => &[],
            MessageContent::Blocks(blocks) => blocks,
        }
    }
}

/// One entry in the conversation log. Immutable once created.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Message {
    pub id: String,
    pub role: Role,
    pub content: MessageContent,
    pub timestamp: DateTime<Utc>,
}

impl Message {
    pub fn user(text: impl Into<String>, timestamp: DateTime<Utc>) -> Self {
        Self::new(Role::User, MessageContent::Text(text.into()), timestamp)
    }

    pub fn assistant(blocks: Vec<ContentBlock>, timestamp: DateTime<Utc>) -> Self {
        Self::new(Role::Assistant, MessageContent::Blocks(blocks), timestamp)
    }

    fn new(role: Role, content: MessageContent, timestamp: DateTime<Utc>) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            role,
            content,
            timestamp,
        }
    }
}

// =============================================================================
// Content blocks
// =============================================================================

/// What a block displays.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ContentKind {
    Text,
    Chart,
    Stats,
    Goals,
    /// Prose together with a visual payload.
    Mixed,
}

/// A single unit of assistant output.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ContentBlock {
    pub kind: ContentKind,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub payload: Option<VisualPayload>,
}

impl ContentBlock {
    pub fn text(text: impl Into<String>) -> Self {
        Self {
            kind: ContentKind::Text,
            text: Some(text.into()),
            payload: None,
        }
    }

    pub fn stats(tiles: Vec<StatTile>) -> Self {
        Self::visual(ContentKind::Stats, VisualPayload::Stats { tiles })
    }

    pub fn chart(spec: ChartSpec) -> Self {
        Self::visual(ContentKind::Chart, VisualPayload::Chart(spec))
    }

    pub fn goals(goals: Vec<GoalCard>) -> Self {
        Self::visual(ContentKind::Goals, VisualPayload::Goals { goals })
    }

    pub fn mixed(text: impl Into<String>, payload: VisualPayload) -> Self {
        Self {
            kind: ContentKind::Mixed,
            text: Some(text.into()),
            payload: Some(payload),
        }
    }

    fn visual(kind: ContentKind, payload: VisualPayload) -> Self {
        Self {
            kind,
            text: None,
            payload: Some(payload),
        }
    }
}

/// Data descriptor for a visual block.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum VisualPayload {
    Stats { tiles: Vec<StatTile> },
    Chart(ChartSpec),
    Goals { goals: Vec<GoalCard> },
}

// =============================================================================
// Stat tiles
// =============================================================================

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Accent {
    Blue,
    Green,
    Purple,
    Pink,
    Orange,
}

/// Change against a previous period, e.g. `+12 vs last week`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Trend {
    pub value: i32,
    pub label: String,
}

/// A single headline number.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatTile {
    pub title: String,
    /// Display-ready value, e.g. "5.8h" or "4/7".
    pub value: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub subtitle: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub trend: Option<Trend>,
    pub accent: Accent,
}

impl StatTile {
    pub fn new(title: impl Into<String>, value: impl Into<String>, accent: Accent) -> Self {
        Self {
            title: title.into(),
            value: value.into(),
            subtitle: None,
            trend: None,
            accent,
        }
    }

    pub fn with_subtitle(mut self, subtitle: impl Into<String>) -> Self {
        self.subtitle = Some(subtitle.into());
        self
    }

    pub fn with_trend(mut self, value: i32, label: impl Into<String>) -> Self {
        self.trend = Some(Trend {
            value,
            label: label.into(),
        });
        self
    }
}

// =============================================================================
// Charts
// =============================================================================

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ChartType {
    Bar,
    Line,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ChartPoint {
    pub label: String,
    pub value: f64,
}

/// A single-series chart.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ChartSpec {
    pub title: String,
    pub chart_type: ChartType,
    /// Name of the category axis field, e.g. "day".
    pub x_axis_key: String,
    /// Name of the plotted value field, e.g. "hours".
    pub data_key: String,
    /// Series color as a hex string.
    pub color: String,
    pub points: Vec<ChartPoint>,
}

// =============================================================================
// Goal cards
// =============================================================================

/// Coarse progress bucket used to color a goal.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProgressBand {
    Low,
    Medium,
    High,
}

impl ProgressBand {
    /// Band for a progress percentage: below 40 is low, 75 and up is high.
    pub fn for_percent(percent: f64) -> Self {
        if percent >= 75.0 {
            ProgressBand::High
        } else if percent >= 40.0 {
            ProgressBand::Medium
        } else {
            ProgressBand::Low
        }
    }
}

/// A goal record with its derived progress.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct GoalCard {
    #[serde(flatten)]
    pub goal: Goal,
    /// Progress toward the target, rounded to a whole percentage.
    pub percent: u32,
    pub band: ProgressBand,
}

impl From<Goal> for GoalCard {
    fn from(goal: Goal) -> Self {
        let raw = goal.ratio() * 100.0;
        Self {
            percent: raw.round().max(0.0) as u32,
            band: ProgressBand::for_percent(raw),
            goal,
        }
    }
}

// =============================================================================
// Turn state
// =============================================================================

/// Whether a turn is currently in flight.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TurnPhase {
    #[default]
    Idle,
    Sending,
}

/// How a call to `send_message` ended.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TurnOutcome {
    /// Blank input; nothing was appended.
    Ignored,
    Answered,
    /// Resolution failed and the fixed apology was appended.
    Degraded,
}
