//! Forum post models (workouts and events)

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Coarse post kind understood by the server's `type` filter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PostKind {
    Workout,
    Event,
}

impl PostKind {
    /// Wire value used by the API and the `type` index.
    pub fn as_str(&self) -> &'static str {
        match self {
            PostKind::Workout => "workout",
            PostKind::Event => "event",
        }
    }
}

impl std::fmt::Display for PostKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Forum post as returned by the API and stored verbatim in the local store.
///
/// Every field except `id` carries a serde default so that records written by
/// older schema versions still decode.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ForumPost {
    /// Server-assigned post ID
    pub id: i64,

    /// Post kind ("workout", "event"); kept as the raw wire string
    #[serde(rename = "type", default)]
    pub post_type: String,

    /// Workout subtype ("swim", "spin", "run", ...)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub workout_type: Option<String>,

    /// Post title
    #[serde(default)]
    pub title: String,

    /// Post body
    #[serde(default)]
    pub content: String,

    /// Scheduled date of the workout/event (YYYY-MM-DD or ISO datetime)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date: Option<String>,

    /// Scheduled start time (HH:MM)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub time: Option<String>,

    /// Author user ID
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_id: Option<i64>,

    /// Author display name
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub author_name: Option<String>,

    /// Creation timestamp (ISO 8601)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<String>,

    /// Maximum number of signups, if capped
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub capacity: Option<u32>,

    /// Current number of signups
    #[serde(default)]
    pub signup_count: u32,
}

impl ForumPost {
    /// Parsed post kind, if the wire value is one we know.
    pub fn kind(&self) -> Option<PostKind> {
        match self.post_type.to_ascii_lowercase().as_str() {
            "workout" => Some(PostKind::Workout),
            "event" => Some(PostKind::Event),
            _ => None,
        }
    }

    /// Date used for time-window filtering and ordering.
    ///
    /// Falls back to the creation date when the post has no scheduled date.
    pub fn effective_date(&self) -> Option<NaiveDate> {
        self.date
            .as_deref()
            .and_then(parse_day)
            .or_else(|| self.created_at.as_deref().and_then(parse_day))
    }
}

/// Parse the leading `YYYY-MM-DD` of a date or datetime string.
pub fn parse_day(value: &str) -> Option<NaiveDate> {
    let day = value.get(..10)?;
    NaiveDate::parse_from_str(day, "%Y-%m-%d").ok()
}
