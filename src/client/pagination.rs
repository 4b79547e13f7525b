//! Pagination helpers for the forum posts endpoint
//!
//! Provides the query builder for `GET /api/forum/posts` and the response
//! envelope with its pagination metadata.

use serde::{Deserialize, Serialize};

use super::models::{ForumPost, PostKind};

/// Default number of posts requested per remote page.
pub const DEFAULT_REMOTE_PAGE_SIZE: usize = 20;

/// Largest page size the forum API accepts.
pub const MAX_REMOTE_PAGE_SIZE: usize = 100;

/// Server-side time window filter
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TimeWindow {
    /// Dated before today
    Past,
    /// Dated today or later
    Upcoming,
}

impl TimeWindow {
    /// Wire value for the `time` query parameter.
    pub fn as_str(&self) -> &'static str {
        match self {
            TimeWindow::Past => "past",
            TimeWindow::Upcoming => "upcoming",
        }
    }
}

/// Query parameters for listing forum posts.
///
/// # Example
/// ```ignore
/// let query = ListQuery::new()
///     .kind(PostKind::Workout)
///     .time(TimeWindow::Past)
///     .page(2);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListQuery {
    /// Post kind (`type`)
    pub kind: Option<PostKind>,
    /// Time window (`time`)
    pub time: Option<TimeWindow>,
    /// Single workout subtype (`workout_type`)
    pub workout_type: Option<String>,
    /// Page number (1-indexed)
    pub page: usize,
    /// Page size (`limit`)
    pub limit: usize,
    /// Free-text search
    pub search: Option<String>,
}

impl Default for ListQuery {
    fn default() -> Self {
        Self {
            kind: None,
            time: None,
            workout_type: None,
            page: 1,
            limit: DEFAULT_REMOTE_PAGE_SIZE,
            search: None,
        }
    }
}

impl ListQuery {
    /// Create a query for the first page with the default page size.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the post kind.
    pub fn kind(mut self, kind: PostKind) -> Self {
        self.kind = Some(kind);
        self
    }

    /// Set the time window.
    pub fn time(mut self, time: TimeWindow) -> Self {
        self.time = Some(time);
        self
    }

    /// Set the single workout subtype filter.
    pub fn workout_type(mut self, workout_type: impl Into<String>) -> Self {
        self.workout_type = Some(workout_type.into());
        self
    }

    /// Set the page number (1-indexed; 0 is clamped to 1).
    pub fn page(mut self, page: usize) -> Self {
        self.page = page.max(1);
        self
    }

    /// Set the page size, clamped to `1..=MAX_REMOTE_PAGE_SIZE`.
    pub fn limit(mut self, limit: usize) -> Self {
        self.limit = limit.clamp(1, MAX_REMOTE_PAGE_SIZE);
        self
    }

    /// Set the free-text search term. Blank terms are ignored.
    pub fn search(mut self, search: impl Into<String>) -> Self {
        let search = search.into();
        self.search = if search.trim().is_empty() {
            None
        } else {
            Some(search)
        };
        self
    }

    /// Convert to query string parameters.
    pub fn to_query_params(&self) -> Vec<(&'static str, String)> {
        let mut params = Vec::new();

        if let Some(kind) = self.kind {
            params.push(("type", kind.as_str().to_string()));
        }
        if let Some(time) = self.time {
            params.push(("time", time.as_str().to_string()));
        }
        if let Some(ref workout_type) = self.workout_type {
            params.push(("workout_type", workout_type.clone()));
        }
        params.push(("page", self.page.to_string()));
        params.push(("limit", self.limit.to_string()));
        if let Some(ref search) = self.search {
            params.push(("search", search.clone()));
        }

        params
    }
}

/// Pagination metadata returned alongside a page of posts.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaginationMeta {
    /// Whether the server has more pages
    #[serde(default)]
    pub has_more: Option<bool>,

    /// Current page number
    #[serde(default)]
    pub current_page: Option<usize>,

    /// Total number of pages
    #[serde(default)]
    pub total_pages: Option<usize>,

    /// Total number of posts matching the server-side filter
    #[serde(default)]
    pub total_posts: Option<usize>,
}

impl PaginationMeta {
    /// Check if there are more pages to fetch.
    pub fn has_next_page(&self) -> bool {
        if let Some(has_more) = self.has_more {
            return has_more;
        }

        if let (Some(current), Some(total)) = (self.current_page, self.total_pages) {
            return current < total;
        }

        false
    }
}

/// Response envelope of the posts endpoint.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PostsEnvelope {
    /// Posts on this page
    #[serde(default)]
    pub posts: Vec<ForumPost>,

    /// Pagination metadata
    #[serde(default)]
    pub pagination: Option<PaginationMeta>,
}

impl PostsEnvelope {
    /// Create an envelope with metadata.
    #[cfg(test)]
    pub fn with_pagination(posts: Vec<ForumPost>, pagination: PaginationMeta) -> Self {
        Self {
            posts,
            pagination: Some(pagination),
        }
    }

    /// Check if there are more pages to fetch.
    pub fn has_next_page(&self) -> bool {
        self.pagination
            .as_ref()
            .map(|p| p.has_next_page())
            .unwrap_or(false)
    }

    /// Page numbers after the current one, as reported by `totalPages`.
    pub fn remaining_pages(&self) -> Vec<usize> {
        match self.pagination {
            Some(PaginationMeta {
                current_page: Some(current),
                total_pages: Some(total),
                ..
            }) if total > current => (current + 1..=total).collect(),
            _ => Vec::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_list_query_default() {
        let query = ListQuery::new();
        let params = query.to_query_params();

        assert_eq!(params.len(), 2);
        assert!(params.contains(&("page", "1".to_string())));
        assert!(params.contains(&("limit", DEFAULT_REMOTE_PAGE_SIZE.to_string())));
    }

    #[test]
    fn test_list_query_builder() {
        let query = ListQuery::new()
            .kind(PostKind::Workout)
            .time(TimeWindow::Upcoming)
            .workout_type("swim")
            .page(3)
            .limit(50)
            .search("fins");

        let params = query.to_query_params();
        assert!(params.contains(&("type", "workout".to_string())));
        assert!(params.contains(&("time", "upcoming".to_string())));
        assert!(params.contains(&("workout_type", "swim".to_string())));
        assert!(params.contains(&("page", "3".to_string())));
        assert!(params.contains(&("limit", "50".to_string())));
        assert!(params.contains(&("search", "fins".to_string())));
    }

    #[test]
    fn test_list_query_clamps() {
        let query = ListQuery::new().page(0).limit(10_000).search("   ");
        assert_eq!(query.page, 1);
        assert_eq!(query.limit, MAX_REMOTE_PAGE_SIZE);
        assert!(query.search.is_none());
    }

    #[test]
    fn test_pagination_meta_has_next_page() {
        let meta = PaginationMeta {
            has_more: Some(true),
            ..Default::default()
        };
        assert!(meta.has_next_page());

        let meta = PaginationMeta {
            has_more: None,
            current_page: Some(2),
            total_pages: Some(5),
            total_posts: Some(90),
        };
        assert!(meta.has_next_page());

        let meta = PaginationMeta {
            has_more: None,
            current_page: Some(5),
            total_pages: Some(5),
            total_posts: Some(90),
        };
        assert!(!meta.has_next_page());
    }

    #[test]
    fn test_envelope_decodes_wire_format() {
        let json = r#"{
            "posts": [{"id": 1, "type": "event", "title": "Club social"}],
            "pagination": {"hasMore": false, "currentPage": 1, "totalPages": 1, "totalPosts": 1}
        }"#;
        let envelope: PostsEnvelope = serde_json::from_str(json).unwrap();

        assert_eq!(envelope.posts.len(), 1);
        assert!(!envelope.has_next_page());
        assert_eq!(
            envelope.pagination.as_ref().and_then(|p| p.total_posts),
            Some(1)
        );
    }

    #[test]
    fn test_envelope_remaining_pages() {
        let envelope = PostsEnvelope::with_pagination(
            vec![],
            PaginationMeta {
                has_more: Some(true),
                current_page: Some(1),
                total_pages: Some(4),
                total_posts: Some(70),
            },
        );
        assert_eq!(envelope.remaining_pages(), vec![2, 3, 4]);

        let envelope = PostsEnvelope::default();
        assert!(envelope.remaining_pages().is_empty());
    }
}
