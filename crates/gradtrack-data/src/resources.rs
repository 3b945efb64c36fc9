//! Resource keys for the backend API.
//!
//! A resource key is the path plus query of a backend endpoint. It is both
//! the request target (appended to the base URL) and the cache key.

pub const STUDY_HOURS: &str = "/api/study/hours?period=7d";
pub const FITNESS_ATTENDANCE: &str = "/api/fitness/attendance?period=7d";
pub const ACTIVE_GOALS: &str = "/api/goals?status=active";
pub const SUBJECT_PROGRESS: &str = "/api/study/subjects";
pub const HEALTH: &str = "/health";
