//! Static fallback dataset and derived statistics.
//!
//! Used in place of backend data whenever a fetch fails. Every function here
//! is pure: the dataset never changes at runtime, so nothing is cached.

use crate::types::{
    FitnessResponse, Goal, GoalCategory, GoalsResponse, GymDay, StudyDay, StudyHoursResponse,
    SubjectProgress, SubjectProgressResponse,
};

// =============================================================================
// Raw data
// =============================================================================

const STUDY_HOURS: [(&str, f64); 7] = [
    ("Mon", 6.5),
    ("Tue", 4.2),
    ("Wed", 7.8),
    ("Thu", 5.5),
    ("Fri", 3.0),
    ("Sat", 8.5),
    ("Sun", 5.2),
];

const GYM_ATTENDANCE: [(&str, Option<u32>); 7] = [
    ("Mon", Some(60)),
    ("Tue", None),
    ("Wed", Some(45)),
    ("Thu", None),
    ("Fri", Some(75)),
    ("Sat", Some(90)),
    ("Sun", None),
];

struct GoalSeed {
    id: &'static str,
    title: &'static str,
    category: GoalCategory,
    progress: f64,
    target: f64,
    unit: &'static str,
    deadline: &'static str,
}

const GOALS: [GoalSeed; 4] = [
    GoalSeed {
        id: "1",
        title: "Complete DSA Problem Set",
        category: GoalCategory::Study,
        progress: 75.0,
        target: 100.0,
        unit: "problems",
        deadline: "2025-12-15",
    },
    GoalSeed {
        id: "2",
        title: "Study 40 hours this week",
        category: GoalCategory::Study,
        progress: 36.5,
        target: 40.0,
        unit: "hours",
        deadline: "2025-11-14",
    },
    GoalSeed {
        id: "3",
        title: "Gym 5 days a week",
        category: GoalCategory::Fitness,
        progress: 4.0,
        target: 5.0,
        unit: "days",
        deadline: "2025-11-14",
    },
    GoalSeed {
        id: "4",
        title: "Complete OS assignments",
        category: GoalCategory::Study,
        progress: 2.0,
        target: 3.0,
        unit: "assignments",
        deadline: "2025-11-20",
    },
];

const SUBJECTS: [(&str, u32, u32, &str); 4] = [
    ("DSA", 6, 8, "#3b82f6"),
    ("OS", 5, 6, "#8b5cf6"),
    ("DBMS", 7, 10, "#ec4899"),
    ("Networks", 4, 5, "#10b981"),
];

// =============================================================================
// Datasets
// =============================================================================

/// Study hours for the last seven days.
pub fn study_hours() -> Vec<StudyDay> {
    STUDY_HOURS
        .iter()
        .map(|&(day, hours)| StudyDay {
            day: day.to_string(),
            hours,
            subject: None,
        })
        .collect()
}

/// Gym attendance for the last seven days.
pub fn gym_attendance() -> Vec<GymDay> {
    GYM_ATTENDANCE
        .iter()
        .map(|&(day, duration)| GymDay {
            day: day.to_string(),
            attended: duration.is_some(),
            duration,
        })
        .collect()
}

/// Active goals.
pub fn goals() -> Vec<Goal> {
    GOALS
        .iter()
        .map(|g| Goal {
            id: g.id.to_string(),
            title: g.title.to_string(),
            category: g.category,
            progress: g.progress,
            target: g.target,
            unit: g.unit.to_string(),
            deadline: Some(g.deadline.to_string()),
        })
        .collect()
}

/// Per-subject study progress.
pub fn subject_progress() -> Vec<SubjectProgress> {
    SUBJECTS
        .iter()
        .map(|&(subject, done, target, color)| SubjectProgress {
            subject: subject.to_string(),
            hours_completed: done,
            hours_target: target,
            color: color.to_string(),
        })
        .collect()
}

// =============================================================================
// Derived statistics over the fallback dataset
// =============================================================================

/// Mean study hours per day, one decimal place.
pub fn average_study_hours() -> f64 {
    average_hours(&study_hours())
}

/// Total study hours, one decimal place.
pub fn total_study_hours() -> f64 {
    total_hours(&study_hours())
}

/// Share of days with a gym visit, as a whole percentage.
pub fn gym_attendance_rate() -> u32 {
    attendance_rate(&gym_attendance())
}

/// Number of days with a gym visit.
pub fn days_attended() -> u32 {
    attended_count(&gym_attendance())
}

/// Mean of per-goal `progress / target`, as a whole percentage.
pub fn goal_completion_rate() -> u32 {
    completion_rate(&goals())
}

// =============================================================================
// Pure aggregates over arbitrary input
// =============================================================================

pub fn total_hours(days: &[StudyDay]) -> f64 {
    round_to_tenth(days.iter().map(|d| d.hours).sum())
}

pub fn average_hours(days: &[StudyDay]) -> f64 {
    if days.is_empty() {
        return 0.0;
    }
    let total: f64 = days.iter().map(|d| d.hours).sum();
    round_to_tenth(total / days.len() as f64)
}

pub fn attended_count(days: &[GymDay]) -> u32 {
    days.iter().filter(|d| d.attended).count() as u32
}

pub fn attendance_rate(days: &[GymDay]) -> u32 {
    if days.is_empty() {
        return 0;
    }
    whole_percent(attended_count(days) as f64 / days.len() as f64)
}

pub fn completion_rate(goals: &[Goal]) -> u32 {
    if goals.is_empty() {
        return 0;
    }
    let sum: f64 = goals.iter().map(Goal::ratio).sum();
    whole_percent(sum / goals.len() as f64)
}

fn round_to_tenth(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

fn whole_percent(fraction: f64) -> u32 {
    (fraction * 100.0).round().max(0.0) as u32
}

// =============================================================================
// Fallback response documents
// =============================================================================

pub fn study_hours_response() -> StudyHoursResponse {
    StudyHoursResponse {
        data: study_hours(),
        total: total_study_hours(),
        average: average_study_hours(),
    }
}

pub fn fitness_response() -> FitnessResponse {
    FitnessResponse {
        data: gym_attendance(),
        attendance_rate: gym_attendance_rate(),
        days_attended: days_attended(),
    }
}

pub fn goals_response() -> GoalsResponse {
    GoalsResponse {
        goals: goals(),
        completion_rate: goal_completion_rate(),
    }
}

pub fn subject_progress_response() -> SubjectProgressResponse {
    SubjectProgressResponse {
        subjects: subject_progress(),
    }
}
