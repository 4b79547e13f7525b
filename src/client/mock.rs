//! Mock club API client for testing
//!
//! Serves an in-memory dataset with the same server-side filtering and
//! pagination semantics as the real posts endpoint.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use chrono::NaiveDate;
use tokio::sync::Mutex;

use super::models::{ForumPost, Race, RaceSignup, User, WaitlistEntry, WorkoutSignup};
use super::pagination::{ListQuery, PaginationMeta, PostsEnvelope, TimeWindow};
use super::ForumApi;
use crate::error::{ApiError, Result};

/// Mock API client for testing.
///
/// # Example
/// ```ignore
/// let mock = MockForumClient::new()
///     .with_posts(past_workouts(1, 22, &["swim", "run"], today))
///     .await;
///
/// let page = mock.list_posts(&ListQuery::new()).await?;
/// ```
pub struct MockForumClient {
    /// Full server-side post dataset
    posts: Arc<Mutex<Vec<ForumPost>>>,
    /// Signups per workout
    signups: Arc<Mutex<HashMap<i64, Vec<WorkoutSignup>>>>,
    /// Waitlist per workout
    waitlists: Arc<Mutex<HashMap<i64, Vec<WaitlistEntry>>>>,
    /// Races
    races: Arc<Mutex<Vec<Race>>>,
    /// Signups per race
    race_signups: Arc<Mutex<HashMap<i64, Vec<RaceSignup>>>>,
    /// Authenticated member
    user: Arc<Mutex<Option<User>>>,
    /// "Today" used for the server-side time window
    today: Arc<Mutex<NaiveDate>>,
    /// Whether `workout_type` is applied server-side
    honor_workout_type: Arc<Mutex<bool>>,
    /// Never report exhaustion; pad pages with non-matching posts
    endless: Arc<Mutex<bool>>,
    /// Error to return - consumed on first use
    error: Arc<Mutex<Option<ApiError>>>,
    /// Every call fails with a network error while set
    network_down: Arc<Mutex<bool>>,
    /// `list_posts` fails after this many successful calls
    fail_posts_after: Arc<Mutex<Option<usize>>>,
    /// Artificial latency per call
    latency: Arc<Mutex<Option<Duration>>>,
    /// Track number of calls for verification
    call_count: Arc<Mutex<CallCounts>>,
    /// Captured list queries for test assertions
    captured_queries: Arc<Mutex<Vec<ListQuery>>>,
}

impl Default for MockForumClient {
    fn default() -> Self {
        Self {
            posts: Arc::new(Mutex::new(Vec::new())),
            signups: Arc::new(Mutex::new(HashMap::new())),
            waitlists: Arc::new(Mutex::new(HashMap::new())),
            races: Arc::new(Mutex::new(Vec::new())),
            race_signups: Arc::new(Mutex::new(HashMap::new())),
            user: Arc::new(Mutex::new(None)),
            today: Arc::new(Mutex::new(mock_today())),
            honor_workout_type: Arc::new(Mutex::new(true)),
            endless: Arc::new(Mutex::new(false)),
            error: Arc::new(Mutex::new(None)),
            network_down: Arc::new(Mutex::new(false)),
            fail_posts_after: Arc::new(Mutex::new(None)),
            latency: Arc::new(Mutex::new(None)),
            call_count: Arc::new(Mutex::new(CallCounts::default())),
            captured_queries: Arc::new(Mutex::new(Vec::new())),
        }
    }
}

/// Default "today" of the mock server
pub fn mock_today() -> NaiveDate {
    NaiveDate::from_ymd_opt(2025, 6, 15).unwrap_or_default()
}

/// Tracks API call counts for test verification
#[derive(Default, Debug, Clone)]
pub struct CallCounts {
    pub me: usize,
    pub list_posts: usize,
    pub get_workout: usize,
    pub list_signups: usize,
    pub list_waitlist: usize,
    pub list_races: usize,
    pub list_race_signups: usize,
}

impl CallCounts {
    /// Get total number of API calls made.
    pub fn total(&self) -> usize {
        self.me
            + self.list_posts
            + self.get_workout
            + self.list_signups
            + self.list_waitlist
            + self.list_races
            + self.list_race_signups
    }
}

impl MockForumClient {
    /// Create a new mock client with default (empty) responses.
    pub fn new() -> Self {
        Self::default()
    }

    /// Configure the post dataset.
    pub async fn with_posts(self, posts: Vec<ForumPost>) -> Self {
        self.set_posts(posts).await;
        self
    }

    /// Replace the post dataset after construction.
    pub async fn set_posts(&self, posts: Vec<ForumPost>) {
        *self.posts.lock().await = posts;
    }

    /// Configure signups for a workout.
    pub async fn with_signups(self, workout_id: i64, signups: Vec<WorkoutSignup>) -> Self {
        self.set_signups(workout_id, signups).await;
        self
    }

    /// Replace signups for a workout after construction.
    pub async fn set_signups(&self, workout_id: i64, signups: Vec<WorkoutSignup>) {
        self.signups.lock().await.insert(workout_id, signups);
    }

    /// Configure the waitlist for a workout.
    pub async fn with_waitlist(self, workout_id: i64, entries: Vec<WaitlistEntry>) -> Self {
        self.waitlists.lock().await.insert(workout_id, entries);
        self
    }

    /// Configure races.
    pub async fn with_races(self, races: Vec<Race>) -> Self {
        *self.races.lock().await = races;
        self
    }

    /// Configure signups for a race.
    pub async fn with_race_signups(self, race_id: i64, signups: Vec<RaceSignup>) -> Self {
        self.race_signups.lock().await.insert(race_id, signups);
        self
    }

    /// Configure the authenticated member.
    pub async fn with_user(self, user: User) -> Self {
        *self.user.lock().await = Some(user);
        self
    }

    /// Configure the server's "today".
    pub async fn with_today(self, today: NaiveDate) -> Self {
        *self.today.lock().await = today;
        self
    }

    /// Ignore the `workout_type` parameter, like an older server would.
    pub async fn ignoring_workout_type(self) -> Self {
        *self.honor_workout_type.lock().await = false;
        self
    }

    /// Never signal exhaustion.
    pub async fn endless(self) -> Self {
        *self.endless.lock().await = true;
        self
    }

    /// Configure an error to return on the next API call.
    pub async fn with_error(self, error: ApiError) -> Self {
        self.fail_next(error).await;
        self
    }

    /// Fail the next call after construction.
    pub async fn fail_next(&self, error: ApiError) {
        *self.error.lock().await = Some(error);
    }

    /// Fail every call with a network error while `down` is set.
    pub async fn set_network_down(&self, down: bool) {
        *self.network_down.lock().await = down;
    }

    /// Fail `list_posts` once it has succeeded `calls` times.
    pub async fn fail_posts_after(self, calls: usize) -> Self {
        *self.fail_posts_after.lock().await = Some(calls);
        self
    }

    /// Delay every call.
    pub async fn with_latency(self, latency: Duration) -> Self {
        *self.latency.lock().await = Some(latency);
        self
    }

    /// Get the call counts for verification in tests.
    pub async fn call_counts(&self) -> CallCounts {
        self.call_count.lock().await.clone()
    }

    /// Get all captured list queries.
    pub async fn captured_queries(&self) -> Vec<ListQuery> {
        self.captured_queries.lock().await.clone()
    }

    /// Apply latency, then return any pending or persistent error.
    async fn check_error(&self) -> Result<()> {
        let latency = *self.latency.lock().await;
        if let Some(latency) = latency {
            tokio::time::sleep(latency).await;
        }

        if let Some(e) = self.error.lock().await.take() {
            return Err(e.into());
        }

        if *self.network_down.lock().await {
            return Err(ApiError::Network("connection refused or host down".to_string()).into());
        }

        Ok(())
    }

    /// Apply the server-side filters to the dataset, in server order.
    async fn server_filtered(&self, query: &ListQuery) -> Vec<ForumPost> {
        let today = *self.today.lock().await;
        let honor_workout_type = *self.honor_workout_type.lock().await;

        let mut posts: Vec<ForumPost> = self
            .posts
            .lock()
            .await
            .iter()
            .filter(|p| query.kind.is_none_or(|k| p.kind() == Some(k)))
            .filter(|p| match query.time {
                None => true,
                Some(window) => p.effective_date().is_some_and(|d| match window {
                    TimeWindow::Past => d < today,
                    TimeWindow::Upcoming => d >= today,
                }),
            })
            .filter(|p| {
                !honor_workout_type
                    || query
                        .workout_type
                        .as_deref()
                        .is_none_or(|wt| p.workout_type.as_deref() == Some(wt))
            })
            .filter(|p| {
                query.search.as_deref().is_none_or(|s| {
                    p.title.to_lowercase().contains(&s.to_lowercase())
                })
            })
            .cloned()
            .collect();

        if query.time == Some(TimeWindow::Upcoming) {
            posts.sort_by_key(|p| (p.effective_date(), p.id));
        } else {
            posts.sort_by_key(|p| std::cmp::Reverse((p.effective_date(), p.id)));
        }
        posts
    }
}

#[async_trait]
impl ForumApi for MockForumClient {
    async fn me(&self) -> Result<User> {
        self.check_error().await?;
        self.call_count.lock().await.me += 1;

        self.user
            .lock()
            .await
            .clone()
            .ok_or_else(|| ApiError::Unauthorized.into())
    }

    async fn list_posts(&self, query: &ListQuery) -> Result<PostsEnvelope> {
        self.captured_queries.lock().await.push(query.clone());
        self.check_error().await?;

        let calls = {
            let mut counts = self.call_count.lock().await;
            counts.list_posts += 1;
            counts.list_posts
        };
        let fail_after = *self.fail_posts_after.lock().await;
        if fail_after.is_some_and(|n| calls > n) {
            return Err(ApiError::ServerError("Mock outage".to_string()).into());
        }

        let limit = query.limit.max(1);
        let page = query.page.max(1);

        if *self.endless.lock().await {
            let posts = (0..limit)
                .map(|i| ForumPost {
                    id: 1_000_000 + (page * limit + i) as i64,
                    post_type: "event".to_string(),
                    workout_type: None,
                    title: "Filler".to_string(),
                    content: String::new(),
                    date: Some("2020-01-01".to_string()),
                    time: None,
                    user_id: None,
                    author_name: None,
                    created_at: None,
                    capacity: None,
                    signup_count: 0,
                })
                .collect();
            return Ok(PostsEnvelope::with_pagination(
                posts,
                PaginationMeta {
                    has_more: Some(true),
                    current_page: Some(page),
                    total_pages: None,
                    total_posts: None,
                },
            ));
        }

        let filtered = self.server_filtered(query).await;
        let total = filtered.len();
        let start = (page - 1) * limit;
        let posts: Vec<ForumPost> = filtered.into_iter().skip(start).take(limit).collect();

        Ok(PostsEnvelope::with_pagination(
            posts,
            PaginationMeta {
                has_more: Some(start + limit < total),
                current_page: Some(page),
                total_pages: Some(total.div_ceil(limit)),
                total_posts: Some(total),
            },
        ))
    }

    async fn get_workout(&self, id: i64) -> Result<ForumPost> {
        self.check_error().await?;
        self.call_count.lock().await.get_workout += 1;

        self.posts
            .lock()
            .await
            .iter()
            .find(|p| p.id == id)
            .cloned()
            .ok_or_else(|| ApiError::NotFound(format!("Post {}", id)).into())
    }

    async fn list_signups(&self, workout_id: i64) -> Result<Vec<WorkoutSignup>> {
        self.check_error().await?;
        self.call_count.lock().await.list_signups += 1;

        Ok(self
            .signups
            .lock()
            .await
            .get(&workout_id)
            .cloned()
            .unwrap_or_default())
    }

    async fn list_waitlist(&self, workout_id: i64) -> Result<Vec<WaitlistEntry>> {
        self.check_error().await?;
        self.call_count.lock().await.list_waitlist += 1;

        Ok(self
            .waitlists
            .lock()
            .await
            .get(&workout_id)
            .cloned()
            .unwrap_or_default())
    }

    async fn list_races(&self) -> Result<Vec<Race>> {
        self.check_error().await?;
        self.call_count.lock().await.list_races += 1;

        Ok(self.races.lock().await.clone())
    }

    async fn list_race_signups(&self, race_id: i64) -> Result<Vec<RaceSignup>> {
        self.check_error().await?;
        self.call_count.lock().await.list_race_signups += 1;

        Ok(self
            .race_signups
            .lock()
            .await
            .get(&race_id)
            .cloned()
            .unwrap_or_default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::fixtures::{past_workouts, workout};

    #[tokio::test]
    async fn test_pages_and_metadata() {
        let mock = MockForumClient::new()
            .with_posts(past_workouts(1, 22, &["swim", "run"], NaiveDate::from_ymd_opt(2025, 6, 1).unwrap()))
            .await;

        let first = mock.list_posts(&ListQuery::new()).await.unwrap();
        assert_eq!(first.posts.len(), 20);
        assert!(first.has_next_page());
        assert_eq!(first.remaining_pages(), vec![2]);

        let second = mock.list_posts(&ListQuery::new().page(2)).await.unwrap();
        assert_eq!(second.posts.len(), 2);
        assert!(!second.has_next_page());
    }

    #[tokio::test]
    async fn test_server_side_time_window() {
        let mock = MockForumClient::new()
            .with_posts(vec![
                workout(1, "swim", "2025-06-10"),
                workout(2, "swim", "2025-06-20"),
                workout(3, "swim", "2025-06-15"),
            ])
            .await;

        let past = mock
            .list_posts(&ListQuery::new().time(TimeWindow::Past))
            .await
            .unwrap();
        assert_eq!(past.posts.iter().map(|p| p.id).collect::<Vec<_>>(), vec![1]);

        let upcoming = mock
            .list_posts(&ListQuery::new().time(TimeWindow::Upcoming))
            .await
            .unwrap();
        assert_eq!(
            upcoming.posts.iter().map(|p| p.id).collect::<Vec<_>>(),
            vec![3, 2]
        );
    }

    #[tokio::test]
    async fn test_one_shot_error_is_consumed() {
        let mock = MockForumClient::new()
            .with_error(ApiError::TermExpired)
            .await;

        assert!(mock.list_races().await.unwrap_err().is_term_expired());
        assert!(mock.list_races().await.is_ok());
    }
}
