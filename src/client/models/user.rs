//! Member models

use serde::{Deserialize, Serialize};

/// Club member as returned by the auth endpoint
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    /// User ID
    pub id: i64,

    /// Display name
    #[serde(default)]
    pub name: String,

    /// Email address
    #[serde(default)]
    pub email: String,

    /// Club role ("member", "coach", "exec", ...)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub role: Option<String>,

    /// Workout subtypes the member is eligible to see; empty means all
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub sport_preferences: Vec<String>,

    /// Membership term end date (YYYY-MM-DD)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub term_end_date: Option<String>,
}
