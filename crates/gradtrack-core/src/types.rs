//! Backend record and response shapes.
//!
//! These mirror the JSON documents served by the GradTrack backend API
//! (camelCase on the wire). The same types carry the static fallback data.

use serde::{Deserialize, Serialize};

// =============================================================================
// Enums
// =============================================================================

/// Category a goal belongs to.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GoalCategory {
    Study,
    Fitness,
    Personal,
}

// =============================================================================
// Records
// =============================================================================

/// Study hours logged on one day.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct StudyDay {
    /// Short day label, e.g. "Mon".
    pub day: String,
    pub hours: f64,
    /// Subject studied, when the backend tracks it.
    #[serde(default)]
    pub subject: Option<String>,
}

/// Gym attendance on one day.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct GymDay {
    pub day: String,
    pub attended: bool,
    /// Session length in minutes.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub duration: Option<u32>,
}

/// A tracked goal with numeric progress toward a target.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Goal {
    pub id: String,
    pub title: String,
    pub category: GoalCategory,
    pub progress: f64,
    pub target: f64,
    /// Unit of `progress` and `target`, e.g. "problems".
    pub unit: String,
    /// ISO date (YYYY-MM-DD).
    #[serde(default)]
    pub deadline: Option<String>,
}

impl Goal {
    /// Progress as a fraction of the target. A non-positive target counts as
    /// no progress.
    pub fn ratio(&self) -> f64 {
        if self.target > 0.0 {
            self.progress / self.target
        } else {
            0.0
        }
    }
}

/// Hours spent on one subject against its weekly target.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubjectProgress {
    pub subject: String,
    pub hours_completed: u32,
    pub hours_target: u32,
    /// Display color as a hex string.
    pub color: String,
}

// =============================================================================
// Response documents
// =============================================================================

/// `GET /api/study/hours`
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct StudyHoursResponse {
    pub data: Vec<StudyDay>,
    pub total: f64,
    pub average: f64,
}

/// `GET /api/fitness/attendance`
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FitnessResponse {
    pub data: Vec<GymDay>,
    pub attendance_rate: u32,
    pub days_attended: u32,
}

/// `GET /api/goals`
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GoalsResponse {
    pub goals: Vec<Goal>,
    pub completion_rate: u32,
}

/// `GET /api/study/subjects`
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubjectProgressResponse {
    pub subjects: Vec<SubjectProgress>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_fitness_response_uses_camel_case() {
        let resp = FitnessResponse {
            data: vec![GymDay {
                day: "Mon".to_string(),
                attended: true,
                duration: None,
            }],
            attendance_rate: 57,
            days_attended: 4,
        };
        let value = serde_json::to_value(&resp).unwrap();
        assert_eq!(value["attendanceRate"], 57);
        assert_eq!(value["daysAttended"], 4);
        assert!(value["data"][0].get("duration").is_none());
    }

    #[test]
    fn test_study_day_accepts_null_subject() {
        let day: StudyDay =
            serde_json::from_value(json!({"day": "Tue", "hours": 4.2, "subject": null})).unwrap();
        assert_eq!(day.subject, None);
        assert!((day.hours - 4.2).abs() < f64::EPSILON);
    }

    #[test]
    fn test_study_day_accepts_missing_subject() {
        let day: StudyDay = serde_json::from_value(json!({"day": "Wed", "hours": 7.8})).unwrap();
        assert_eq!(day.subject, None);
    }

    #[test]
    fn test_goals_response_parses_backend_document() {
        let doc = json!({
            "goals": [{
                "id": "1",
                "title": "Complete DSA Problem Set",
                "category": "study",
                "progress": 75,
                "target": 100,
                "unit": "problems",
                "deadline": null
            }],
            "completionRate": 75
        });
        let resp: GoalsResponse = serde_json::from_value(doc).unwrap();
        assert_eq!(resp.completion_rate, 75);
        assert_eq!(resp.goals[0].category, GoalCategory::Study);
        assert_eq!(resp.goals[0].deadline, None);
        assert!((resp.goals[0].ratio() - 0.75).abs() < 1e-9);
    }

    #[test]
    fn test_goal_category_rejects_unknown_value() {
        let result: Result<GoalCategory, _> = serde_json::from_value(json!("hobby"));
        assert!(result.is_err());
    }

    #[test]
    fn test_goal_ratio_zero_target() {
        let goal = Goal {
            id: "x".to_string(),
            title: "Empty".to_string(),
            category: GoalCategory::Personal,
            progress: 3.0,
            target: 0.0,
            unit: "things".to_string(),
            deadline: None,
        };
        assert_eq!(goal.ratio(), 0.0);
    }

    #[test]
    fn test_subject_progress_uses_camel_case() {
        let value = serde_json::to_value(SubjectProgress {
            subject: "OS".to_string(),
            hours_completed: 5,
            hours_target: 6,
            color: "#8b5cf6".to_string(),
        })
        .unwrap();
        assert_eq!(value["hoursCompleted"], 5);
        assert_eq!(value["hoursTarget"], 6);
    }
}
