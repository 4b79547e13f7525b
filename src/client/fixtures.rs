//! Test fixtures and builders for API model types
//!
//! Provides builder patterns for creating test data with sensible defaults.
//! Import via `use crate::client::fixtures::*` in test modules.

#![allow(dead_code)]

use chrono::{Duration, NaiveDate};

use super::models::{ForumPost, Race, RaceSignup, User, WaitlistEntry, WorkoutSignup};

// ============================================================================
// ForumPostBuilder
// ============================================================================

/// Builder for creating test ForumPost instances.
///
/// # Example
/// ```ignore
/// let post = ForumPostBuilder::new(42)
///     .workout_type("swim")
///     .date("2025-06-01")
///     .build();
/// ```
#[derive(Debug, Clone)]
pub struct ForumPostBuilder {
    post: ForumPost,
}

impl ForumPostBuilder {
    /// Create a workout post with the given ID.
    pub fn new(id: i64) -> Self {
        Self {
            post: ForumPost {
                id,
                post_type: "workout".to_string(),
                workout_type: Some("run".to_string()),
                title: format!("Workout {}", id),
                content: String::new(),
                date: None,
                time: None,
                user_id: Some(1),
                author_name: None,
                created_at: Some("2025-01-01T12:00:00Z".to_string()),
                capacity: None,
                signup_count: 0,
            },
        }
    }

    /// Make this an event post (no workout subtype).
    pub fn event(mut self) -> Self {
        self.post.post_type = "event".to_string();
        self.post.workout_type = None;
        self
    }

    /// Set the workout subtype.
    pub fn workout_type(mut self, workout_type: &str) -> Self {
        self.post.workout_type = Some(workout_type.to_string());
        self
    }

    /// Set the scheduled date (YYYY-MM-DD).
    pub fn date(mut self, date: &str) -> Self {
        self.post.date = Some(date.to_string());
        self
    }

    /// Set the scheduled date from a NaiveDate.
    pub fn on(self, date: NaiveDate) -> Self {
        self.date(&date.format("%Y-%m-%d").to_string())
    }

    /// Set the start time (HH:MM).
    pub fn time(mut self, time: &str) -> Self {
        self.post.time = Some(time.to_string());
        self
    }

    /// Set the title.
    pub fn title(mut self, title: &str) -> Self {
        self.post.title = title.to_string();
        self
    }

    /// Set the body.
    pub fn content(mut self, content: &str) -> Self {
        self.post.content = content.to_string();
        self
    }

    /// Set the author.
    pub fn user_id(mut self, user_id: i64) -> Self {
        self.post.user_id = Some(user_id);
        self
    }

    /// Set the creation timestamp.
    pub fn created_at(mut self, created_at: &str) -> Self {
        self.post.created_at = Some(created_at.to_string());
        self
    }

    /// Build the ForumPost.
    pub fn build(self) -> ForumPost {
        self.post
    }
}

/// Shorthand for a workout of `subtype` on `date`.
pub fn workout(id: i64, subtype: &str, date: &str) -> ForumPost {
    ForumPostBuilder::new(id)
        .workout_type(subtype)
        .date(date)
        .build()
}

/// `count` workouts cycling through `subtypes`, dated one day apart going
/// back from `newest` (ids start at `first_id`).
pub fn past_workouts(first_id: i64, count: usize, subtypes: &[&str], newest: NaiveDate) -> Vec<ForumPost> {
    (0..count)
        .map(|i| {
            ForumPostBuilder::new(first_id + i as i64)
                .workout_type(subtypes[i % subtypes.len()])
                .on(newest - Duration::days(i as i64))
                .build()
        })
        .collect()
}

// ============================================================================
// Rosters
// ============================================================================

/// Build a workout signup.
pub fn signup(id: i64, workout_id: i64, user_id: i64) -> WorkoutSignup {
    WorkoutSignup {
        id,
        workout_id,
        user_id,
        user_name: Some(format!("Member {}", user_id)),
        signed_up_at: None,
    }
}

/// Build a waitlist entry.
pub fn waitlist_entry(id: i64, workout_id: i64, user_id: i64, position: u32) -> WaitlistEntry {
    WaitlistEntry {
        id,
        workout_id,
        user_id,
        user_name: Some(format!("Member {}", user_id)),
        position: Some(position),
        joined_at: None,
    }
}

/// Build a race signup.
pub fn race_signup(id: i64, race_id: i64, user_id: i64) -> RaceSignup {
    RaceSignup {
        id,
        race_id,
        user_id,
        user_name: None,
        created_at: None,
    }
}

// ============================================================================
// Races & users
// ============================================================================

/// Build a race.
pub fn race(id: i64, name: &str, date: &str) -> Race {
    Race {
        id,
        name: name.to_string(),
        date: Some(date.to_string()),
        location: None,
        distance: Some("olympic".to_string()),
        created_at: Some("2025-01-10T09:00:00Z".to_string()),
    }
}

/// Build a member.
pub fn user(id: i64, sports: &[&str]) -> User {
    User {
        id,
        name: format!("Member {}", id),
        email: format!("member{}@example.com", id),
        role: Some("member".to_string()),
        sport_preferences: sports.iter().map(|s| s.to_string()).collect(),
        term_end_date: None,
    }
}
