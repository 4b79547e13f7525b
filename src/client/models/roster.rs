//! Workout and race roster models (signups, waitlists)

use serde::{Deserialize, Serialize};

/// A member signed up for a workout
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorkoutSignup {
    /// Signup ID
    pub id: i64,

    /// Workout (post) ID
    pub workout_id: i64,

    /// Member user ID
    pub user_id: i64,

    /// Member display name
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_name: Option<String>,

    /// When the member signed up (ISO 8601)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub signed_up_at: Option<String>,
}

/// A member waiting for a spot on a full workout
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WaitlistEntry {
    /// Waitlist entry ID
    pub id: i64,

    /// Workout (post) ID
    pub workout_id: i64,

    /// Member user ID
    pub user_id: i64,

    /// Member display name
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_name: Option<String>,

    /// Position in the queue (1 = next in line)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub position: Option<u32>,

    /// When the member joined the waitlist (ISO 8601)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub joined_at: Option<String>,
}

/// A member registered for a race
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RaceSignup {
    /// Signup ID
    pub id: i64,

    /// Race ID
    pub race_id: i64,

    /// Member user ID
    pub user_id: i64,

    /// Member display name
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_name: Option<String>,

    /// Registration timestamp (ISO 8601)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<String>,
}
