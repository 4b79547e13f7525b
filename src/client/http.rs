//! HTTP implementation of the club forum API

use std::num::NonZeroU32;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use governor::clock::DefaultClock;
use governor::state::{InMemoryState, NotKeyed};
use governor::{Quota, RateLimiter};
use log::debug;
use reqwest::{Client as HttpClient, StatusCode};
use serde::Deserialize;
use serde::de::DeserializeOwned;

use super::{
    ForumApi, ForumPost, ListQuery, PostsEnvelope, Race, RaceSignup, User, WaitlistEntry,
    WorkoutSignup,
};
use crate::error::{ApiError, Result};

/// Default club API host
pub const DEFAULT_API_HOST: &str = "https://api.clubsync.app";

/// Error code the server attaches to a 403 when the membership term lapsed
const TERM_EXPIRED_CODE: &str = "TERM_EXPIRED";

/// Client-side request budget: 10 requests per second
const RATE_LIMIT_PER_SECOND: u32 = 10;

/// Club forum API client
pub struct ClubClient {
    http: HttpClient,
    base_url: String,
    token: Option<String>,
    rate_limiter: Arc<RateLimiter<NotKeyed, InMemoryState, DefaultClock>>,
}

/// Error body returned by the API on 4xx responses
#[derive(Debug, Default, Deserialize)]
struct ErrorBody {
    #[serde(default)]
    error: Option<String>,
    #[serde(default)]
    code: Option<String>,
    #[serde(default)]
    error_code: Option<String>,
}

impl ErrorBody {
    fn parse(text: &str) -> Self {
        serde_json::from_str(text).unwrap_or_default()
    }

    fn is_term_expired(&self) -> bool {
        [&self.code, &self.error_code]
            .into_iter()
            .flatten()
            .any(|code| code.eq_ignore_ascii_case(TERM_EXPIRED_CODE))
    }

    fn message(self, fallback: &str) -> String {
        self.error.unwrap_or_else(|| fallback.to_string())
    }
}

impl ClubClient {
    /// Create a client with an optional custom API host (development/testing).
    pub fn with_host(token: Option<String>, api_host: Option<String>) -> Result<Self> {
        let http = HttpClient::builder()
            .timeout(Duration::from_secs(30))
            .build()
            .map_err(|e| ApiError::Network(e.to_string()))?;

        let quota = Quota::per_second(
            NonZeroU32::new(RATE_LIMIT_PER_SECOND).unwrap_or(NonZeroU32::MIN),
        );

        let host = api_host.unwrap_or_else(|| DEFAULT_API_HOST.to_string());
        Ok(Self {
            http,
            base_url: host.trim_end_matches('/').to_string(),
            token,
            rate_limiter: Arc::new(RateLimiter::direct(quota)),
        })
    }

    /// Base URL requests are sent to
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Make an authenticated GET request and decode the JSON body
    async fn get<T: DeserializeOwned>(&self, path: &str, query: &[(&str, String)]) -> Result<T> {
        self.rate_limiter.until_ready().await;

        let url = format!("{}{}", self.base_url, path);
        debug!("GET {} {:?}", url, query);

        let mut request = self.http.get(&url).query(query);
        if let Some(ref token) = self.token {
            request = request.bearer_auth(token);
        }
        let response = request.send().await.map_err(ApiError::from)?;

        let status = response.status();
        if status == StatusCode::OK {
            return response.json::<T>().await.map_err(|e| {
                ApiError::InvalidResponse(format!("Failed to parse response: {}", e)).into()
            });
        }

        let retry_after = response
            .headers()
            .get("retry-after")
            .and_then(|v| v.to_str().ok())
            .and_then(|v| v.parse::<u64>().ok());
        let body = response.text().await.unwrap_or_default();
        Err(status_to_error(status, &body, retry_after).into())
    }
}

/// Translate a non-200 status and body into an [`ApiError`].
fn status_to_error(status: StatusCode, body: &str, retry_after: Option<u64>) -> ApiError {
    match status {
        StatusCode::UNAUTHORIZED => ApiError::Unauthorized,
        StatusCode::FORBIDDEN => {
            if ErrorBody::parse(body).is_term_expired() {
                ApiError::TermExpired
            } else {
                ApiError::Forbidden
            }
        }
        StatusCode::NOT_FOUND => ApiError::NotFound(ErrorBody::parse(body).message("Not found")),
        StatusCode::TOO_MANY_REQUESTS => {
            ApiError::RateLimit(Duration::from_secs(retry_after.unwrap_or(60)))
        }
        StatusCode::BAD_REQUEST | StatusCode::UNPROCESSABLE_ENTITY => {
            ApiError::BadRequest(ErrorBody::parse(body).message("Bad request"))
        }
        status if status.is_server_error() => {
            ApiError::ServerError(ErrorBody::parse(body).message(&format!("HTTP {}", status)))
        }
        status => ApiError::InvalidResponse(format!("Unexpected status code: {}", status)),
    }
}

#[async_trait]
impl ForumApi for ClubClient {
    async fn me(&self) -> Result<User> {
        #[derive(Deserialize)]
        struct MeResponse {
            user: User,
        }

        let response: MeResponse = self.get("/api/auth/me", &[]).await?;
        Ok(response.user)
    }

    async fn list_posts(&self, query: &ListQuery) -> Result<PostsEnvelope> {
        self.get("/api/forum/posts", &query.to_query_params()).await
    }

    async fn get_workout(&self, id: i64) -> Result<ForumPost> {
        #[derive(Deserialize)]
        struct PostResponse {
            post: ForumPost,
        }

        let path = format!("/api/forum/posts/{}", id);
        let response: PostResponse = self.get(&path, &[]).await?;
        Ok(response.post)
    }

    async fn list_signups(&self, workout_id: i64) -> Result<Vec<WorkoutSignup>> {
        #[derive(Deserialize)]
        struct SignupsResponse {
            #[serde(default)]
            signups: Vec<WorkoutSignup>,
        }

        let path = format!("/api/forum/workouts/{}/signups", workout_id);
        let response: SignupsResponse = self.get(&path, &[]).await?;
        Ok(response.signups)
    }

    async fn list_waitlist(&self, workout_id: i64) -> Result<Vec<WaitlistEntry>> {
        #[derive(Deserialize)]
        struct WaitlistResponse {
            #[serde(default)]
            waitlist: Vec<WaitlistEntry>,
        }

        let path = format!("/api/forum/workouts/{}/waitlist", workout_id);
        let response: WaitlistResponse = self.get(&path, &[]).await?;
        Ok(response.waitlist)
    }

    async fn list_races(&self) -> Result<Vec<Race>> {
        #[derive(Deserialize)]
        struct RacesResponse {
            #[serde(default)]
            races: Vec<Race>,
        }

        let response: RacesResponse = self.get("/api/races", &[]).await?;
        Ok(response.races)
    }

    async fn list_race_signups(&self, race_id: i64) -> Result<Vec<RaceSignup>> {
        #[derive(Deserialize)]
        struct RaceSignupsResponse {
            #[serde(default)]
            signups: Vec<RaceSignup>,
        }

        let path = format!("/api/races/{}/signups", race_id);
        let response: RaceSignupsResponse = self.get(&path, &[]).await?;
        Ok(response.signups)
    }
}
