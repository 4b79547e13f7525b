//! Club forum API client

use async_trait::async_trait;

use crate::error::Result;

#[cfg(test)]
pub mod fixtures;
pub mod http;
#[cfg(test)]
pub mod mock;
pub mod models;
pub mod pagination;
pub mod parallel;

pub use http::ClubClient;
#[cfg(test)]
pub use mock::MockForumClient;
pub use models::{ForumPost, PostKind, Race, RaceSignup, User, WaitlistEntry, WorkoutSignup};
pub use pagination::{
    DEFAULT_REMOTE_PAGE_SIZE, ListQuery, PaginationMeta, PostsEnvelope, TimeWindow,
};
pub use parallel::fetch_remaining_pages;

/// Club forum API trait
///
/// The remote is the single source of truth. Implementations attach the
/// bearer credential and translate HTTP failures into [`crate::error::ApiError`].
#[async_trait]
pub trait ForumApi: Send + Sync {
    /// Fetch the authenticated member
    async fn me(&self) -> Result<User>;

    /// List one page of forum posts, filtered server-side by kind, time window,
    /// a single workout subtype and free-text search
    async fn list_posts(&self, query: &ListQuery) -> Result<PostsEnvelope>;

    /// Fetch a single workout post
    async fn get_workout(&self, id: i64) -> Result<ForumPost>;

    /// List signups for a workout
    async fn list_signups(&self, workout_id: i64) -> Result<Vec<WorkoutSignup>>;

    /// List the waitlist for a workout
    async fn list_waitlist(&self, workout_id: i64) -> Result<Vec<WaitlistEntry>>;

    /// List races on the club calendar
    async fn list_races(&self) -> Result<Vec<Race>>;

    /// List signups for a race
    async fn list_race_signups(&self, race_id: i64) -> Result<Vec<RaceSignup>>;
}
