//! Response resolution for chat queries.
//!
//! Maps free text to a topic, fetches the data that topic needs and composes
//! an ordered list of content blocks. Composition is pure and works on the
//! response documents directly, so every topic can be tested without a
//! backend.

use std::sync::Arc;

use async_trait::async_trait;
use gradtrack_core::config::BackendConfig;
use gradtrack_core::dataset;
use gradtrack_core::types::{
    FitnessResponse, Goal, GoalsResponse, StudyHoursResponse, SubjectProgressResponse,
};
use gradtrack_data::{resources, DataClient};

use crate::error::ChatError;
use crate::topics::{match_topic, Topic};
use crate::types::{Accent, ChartPoint, ChartSpec, ChartType, ContentBlock, GoalCard, StatTile};

/// Reply when no topic matches.
pub const HELP_MESSAGE: &str = "I'm here to help you track your productivity! Ask me about:

📚 Your **study progress** and hours
💪 Your **gym** consistency and fitness
🎯 Your **goals** and achievements
📅 Your weekly **plan** and overview
📊 Your **subject** breakdown

Try asking something like \"Show my study progress\" or \"How's my gym consistency?\"";

const DAYS_IN_WEEK: u32 = 7;

/// Attendance rate at or above which the fitness reply congratulates.
const STRONG_ATTENDANCE_RATE: u32 = 70;

const STUDY_BAR_COLOR: &str = "#3b82f6";
const STUDY_TREND_COLOR: &str = "#8b5cf6";
const SUBJECT_BAR_COLOR: &str = "#10b981";

// =============================================================================
// Responder
// =============================================================================

/// Produces the assistant's blocks for one user message.
#[async_trait]
pub trait Responder: Send + Sync {
    async fn respond(&self, text: &str) -> Result<Vec<ContentBlock>, ChatError>;
}

// =============================================================================
// ResponseResolver
// =============================================================================

/// Keyword-dispatching responder backed by the data client.
pub struct ResponseResolver {
    client: Arc<DataClient>,
}

impl ResponseResolver {
    pub fn new(client: Arc<DataClient>) -> Self {
        Self { client }
    }

    /// Build a resolver with its own data client.
    pub fn from_config(config: &BackendConfig) -> Result<Self, ChatError> {
        Ok(Self::new(Arc::new(DataClient::new(config)?)))
    }

    pub fn client(&self) -> &DataClient {
        &self.client
    }

    /// Resolve `text` to blocks. Never fails: every fetch has a fallback.
    pub async fn resolve(&self, text: &str) -> Vec<ContentBlock> {
        match match_topic(text) {
            Some(topic) => {
                tracing::debug!(topic = ?topic, "Resolved topic");
                self.answer(topic).await
            }
            None => {
                tracing::debug!("No topic matched, replying with help");
                help()
            }
        }
    }

    async fn answer(&self, topic: Topic) -> Vec<ContentBlock> {
        match topic {
            Topic::StudyProgress => compose_study(&self.study_hours().await),
            Topic::Fitness => compose_fitness(&self.fitness().await),
            Topic::Goals => compose_goals(&self.goals().await),
            Topic::WeeklyOverview => {
                let (study, fitness, goals) =
                    tokio::join!(self.study_hours(), self.fitness(), self.goals());
                compose_weekly(&study, &fitness, &goals)
            }
            Topic::SubjectBreakdown => compose_subjects(&self.subjects().await),
        }
    }

    async fn study_hours(&self) -> StudyHoursResponse {
        self.client
            .fetch_or(resources::STUDY_HOURS, dataset::study_hours_response())
            .await
    }

    async fn fitness(&self) -> FitnessResponse {
        self.client
            .fetch_or(resources::FITNESS_ATTENDANCE, dataset::fitness_response())
            .await
    }

    async fn goals(&self) -> GoalsResponse {
        self.client
            .fetch_or(resources::ACTIVE_GOALS, dataset::goals_response())
            .await
    }

    async fn subjects(&self) -> SubjectProgressResponse {
        self.client
            .fetch_or(
                resources::SUBJECT_PROGRESS,
                dataset::subject_progress_response(),
            )
            .await
    }
}

#[async_trait]
impl Responder for ResponseResolver {
    async fn respond(&self, text: &str) -> Result<Vec<ContentBlock>, ChatError> {
        Ok(self.resolve(text).await)
    }
}

// =============================================================================
// Composition
// =============================================================================

pub fn help() -> Vec<ContentBlock> {
    vec![ContentBlock::text(HELP_MESSAGE)]
}

/// text, stats, bar chart, text
pub fn compose_study(study: &StudyHoursResponse) -> Vec<ContentBlock> {
    vec![
        ContentBlock::text(
            "Great question! Let me show you your study progress for this week. You've been doing fantastic! 📚",
        ),
        ContentBlock::stats(vec![
            StatTile::new("Total Study Hours", study.total.to_string(), Accent::Blue)
                .with_subtitle("This week"),
            StatTile::new("Daily Average", format!("{}h", study.average), Accent::Purple)
                .with_subtitle("Per day")
                .with_trend(12, "vs last week"),
        ]),
        ContentBlock::chart(study_chart(
            study,
            "Study Hours - Last 7 Days",
            ChartType::Bar,
            STUDY_BAR_COLOR,
        )),
        ContentBlock::text(format!(
            "You're averaging {} hours per day. Keep up the excellent work! Your consistency is impressive. 💪",
            study.average
        )),
    ]
}

/// text, stats, text
pub fn compose_fitness(fitness: &FitnessResponse) -> Vec<ContentBlock> {
    let encouragement = if fitness.attendance_rate >= STRONG_ATTENDANCE_RATE {
        "That's fantastic! You're building a strong habit. 🔥"
    } else {
        "Let's aim for at least 5 days next week. You got this! 💪"
    };

    vec![
        ContentBlock::text("Let's check your gym consistency! 💪"),
        ContentBlock::stats(vec![
            StatTile::new(
                "Gym Attendance",
                format!("{}%", fitness.attendance_rate),
                Accent::Green,
            )
            .with_subtitle("This week"),
            StatTile::new(
                "Days Attended",
                format!("{}/{}", fitness.days_attended, DAYS_IN_WEEK),
                Accent::Orange,
            )
            .with_subtitle("Great effort!"),
        ]),
        ContentBlock::text(format!(
            "You attended the gym {} out of {} days this week ({}% attendance). {}",
            fitness.days_attended, DAYS_IN_WEEK, fitness.attendance_rate, encouragement
        )),
    ]
}

/// text, stats, goal cards, text
pub fn compose_goals(goals: &GoalsResponse) -> Vec<ContentBlock> {
    let closing = match nearest_to_completion(&goals.goals) {
        Some(goal) => format!(
            "You're making solid progress across all your goals! \"{}\" is almost complete at {}%. Keep pushing! 🚀",
            goal.title,
            GoalCard::from(goal.clone()).percent
        ),
        None => "You're making solid progress across all your goals! Keep pushing! 🚀".to_string(),
    };

    vec![
        ContentBlock::text("Here's an overview of your current goals and how you're tracking! 🎯"),
        ContentBlock::stats(vec![StatTile::new(
            "Overall Goal Progress",
            format!("{}%", goals.completion_rate),
            Accent::Purple,
        )
        .with_subtitle(active_goals_label(goals))
        .with_trend(8, "vs last week")]),
        ContentBlock::goals(goals.goals.iter().cloned().map(GoalCard::from).collect()),
        ContentBlock::text(closing),
    ]
}

/// text, three stat tiles, line chart, text
pub fn compose_weekly(
    study: &StudyHoursResponse,
    fitness: &FitnessResponse,
    goals: &GoalsResponse,
) -> Vec<ContentBlock> {
    let mut closing = "You're doing great this week! Your study consistency is solid, and you're maintaining a good fitness routine.".to_string();
    if let Some(goal) = next_deadline(&goals.goals) {
        if let Some(deadline) = &goal.deadline {
            closing.push_str(&format!(
                " Focus on completing \"{}\" before the {} deadline! 🎯",
                goal.title, deadline
            ));
        }
    }

    vec![
        ContentBlock::text("Let me give you a comprehensive overview of your week! 📅"),
        ContentBlock::stats(vec![
            StatTile::new("Study Hours", study.total.to_string(), Accent::Blue)
                .with_subtitle("This week"),
            StatTile::new(
                "Gym Days",
                format!("{}/{}", fitness.days_attended, DAYS_IN_WEEK),
                Accent::Green,
            )
            .with_subtitle(format!("{}% attendance", fitness.attendance_rate)),
            StatTile::new(
                "Goal Progress",
                format!("{}%", goals.completion_rate),
                Accent::Purple,
            )
            .with_subtitle(active_goals_label(goals)),
        ]),
        ContentBlock::chart(study_chart(
            study,
            "Study Hours Trend",
            ChartType::Line,
            STUDY_TREND_COLOR,
        )),
        ContentBlock::text(closing),
    ]
}

/// text, bar chart, text
pub fn compose_subjects(subjects: &SubjectProgressResponse) -> Vec<ContentBlock> {
    let behind = subjects
        .subjects
        .iter()
        .filter(|s| s.hours_completed < s.hours_target)
        .max_by_key(|s| s.hours_target - s.hours_completed);

    let closing = match behind {
        Some(s) => format!(
            "{} needs the most attention: {} of {} hours done so far. Try to fit in a session there next. 📖",
            s.subject, s.hours_completed, s.hours_target
        ),
        None => "You've hit your target in every subject. Great balance! 🎉".to_string(),
    };

    vec![
        ContentBlock::text("Here's how your study hours break down by subject this week. 📊"),
        ContentBlock::chart(ChartSpec {
            title: "Hours by Subject".to_string(),
            chart_type: ChartType::Bar,
            x_axis_key: "subject".to_string(),
            data_key: "hoursCompleted".to_string(),
            color: SUBJECT_BAR_COLOR.to_string(),
            points: subjects
                .subjects
                .iter()
                .map(|s| ChartPoint {
                    label: s.subject.clone(),
                    value: f64::from(s.hours_completed),
                })
                .collect(),
        }),
        ContentBlock::text(closing),
    ]
}

// =============================================================================
// Helpers
// =============================================================================

fn study_chart(
    study: &StudyHoursResponse,
    title: &str,
    chart_type: ChartType,
    color: &str,
) -> ChartSpec {
    ChartSpec {
        title: title.to_string(),
        chart_type,
        x_axis_key: "day".to_string(),
        data_key: "hours".to_string(),
        color: color.to_string(),
        points: study
            .data
            .iter()
            .map(|d| ChartPoint {
                label: d.day.clone(),
                value: d.hours,
            })
            .collect(),
    }
}

fn active_goals_label(goals: &GoalsResponse) -> String {
    format!("{} active goals", goals.goals.len())
}

/// The unfinished goal with the highest progress ratio.
///
/// The goals reply names whichever goal this picks from the fetched data
/// instead of a fixed goal, so with the fallback dataset it names "Study 40
/// hours this week" (91%) rather than the DSA problem set.
fn nearest_to_completion(goals: &[Goal]) -> Option<&Goal> {
    goals
        .iter()
        .filter(|g| g.ratio() < 1.0)
        .max_by(|a, b| a.ratio().total_cmp(&b.ratio()))
}

/// The unfinished goal with the earliest deadline; ties go to the first listed.
///
/// Like [`nearest_to_completion`], this makes the weekly reply follow the
/// data rather than always pointing at the DSA problem set.
fn next_deadline(goals: &[Goal]) -> Option<&Goal> {
    goals
        .iter()
        .filter(|g| g.ratio() < 1.0 && g.deadline.is_some())
        .min_by(|a, b| a.deadline.cmp(&b.deadline))
}

// =============================================================================
// Tests
// =============================================================================
