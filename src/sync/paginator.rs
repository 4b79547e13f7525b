//! Progressive loading of client-filtered post pages
//!
//! The remote filters coarsely, so the number of remote pages needed to fill
//! one client page is unknown up front. The paginator keeps accumulating
//! remote pages for the current filter until the requested page can be
//! served, the remote runs dry, or the safety ceiling is hit.

use std::collections::HashSet;
use std::sync::Arc;

use chrono::NaiveDate;
use log::{debug, warn};
use serde::Serialize;

use super::connectivity::ConnectivitySignal;
use super::filter::PostFilter;
use crate::cache::Clock;
use crate::client::{DEFAULT_REMOTE_PAGE_SIZE, ForumApi, ForumPost};
use crate::error::Result;
use crate::store::{IndexField, LocalStore};

/// Posts per client page
pub const DEFAULT_PAGE_SIZE: usize = 5;

/// Remote pages fetched per filter before giving up
pub const SAFETY_PAGE_LIMIT: usize = 100;

/// Paginator tuning
#[derive(Debug, Clone, Copy)]
pub struct PaginatorConfig {
    pub page_size: usize,
    pub remote_page_size: usize,
    pub max_remote_pages: usize,
}

impl Default for PaginatorConfig {
    fn default() -> Self {
        Self {
            page_size: DEFAULT_PAGE_SIZE,
            remote_page_size: DEFAULT_REMOTE_PAGE_SIZE,
            max_remote_pages: SAFETY_PAGE_LIMIT,
        }
    }
}

/// Why the load loop stopped
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum StopReason {
    /// Enough buffered for the requested page and the next one
    LookAhead,
    /// Enough buffered for the requested page
    PageFilled,
    /// The remote has no more pages
    Exhausted,
    /// Safety ceiling reached
    SafetyLimit,
    /// A remote fetch failed
    RemoteError,
}

/// Page metadata for the caller
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PageInfo {
    pub current_page: usize,
    pub page_size: usize,
    /// Filtered matches known so far
    pub total_posts: usize,
    /// Estimate from `total_posts`
    pub total_pages: usize,
    /// Whether the remote may hold more data
    pub has_more: bool,
}

/// One client page of posts with provenance
#[derive(Debug, Clone, Serialize)]
pub struct PageResult {
    pub posts: Vec<ForumPost>,
    pub pagination: PageInfo,
    pub from_cache: bool,
    pub offline: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stop_reason: Option<StopReason>,
}

/// Accumulated remote results for one filter
#[derive(Debug)]
struct PaginationState {
    filter: PostFilter,
    accumulated: Vec<ForumPost>,
    seen: HashSet<i64>,
    next_page: usize,
    exhausted: bool,
    iterations: usize,
}

impl PaginationState {
    fn new(filter: PostFilter) -> Self {
        Self {
            filter,
            accumulated: Vec::new(),
            seen: HashSet::new(),
            next_page: 1,
            exhausted: false,
            iterations: 0,
        }
    }
}

/// Fills fixed-size pages of client-filtered posts from a coarsely filtered
/// remote.
///
/// # Example
/// ```ignore
/// let mut paginator = ProgressivePaginator::new(api, store, clock, signal, config);
/// let filter = PostFilter::new(TimeWindow::Past).category(Category::Swim);
/// let page = paginator.load_page(&filter, 1).await?;
/// ```
pub struct ProgressivePaginator<C> {
    api: Arc<C>,
    store: Arc<LocalStore>,
    clock: Arc<dyn Clock>,
    connectivity: ConnectivitySignal,
    config: PaginatorConfig,
    state: Option<PaginationState>,
}

impl<C: ForumApi> ProgressivePaginator<C> {
    pub fn new(
        api: Arc<C>,
        store: Arc<LocalStore>,
        clock: Arc<dyn Clock>,
        connectivity: ConnectivitySignal,
        config: PaginatorConfig,
    ) -> Self {
        Self {
            api,
            store,
            clock,
            connectivity,
            config: PaginatorConfig {
                page_size: config.page_size.max(1),
                remote_page_size: config.remote_page_size.max(1),
                max_remote_pages: config.max_remote_pages.max(1),
            },
            state: None,
        }
    }

    /// Drop the accumulator; the next load starts from remote page 1
    #[allow(dead_code)]
    pub fn reset(&mut self) {
        self.state = None;
    }

    /// Load enough remote data to serve client page `page` (1-indexed)
    pub async fn load_page(&mut self, filter: &PostFilter, page: usize) -> Result<PageResult> {
        let page = page.max(1);
        let today = self.clock.today();

        if !self.connectivity.is_online() {
            debug!("Offline, serving page {} from local store", page);
            return Ok(self.cached_page(filter, page, today, true, None));
        }

        let mut state = match self.state.take() {
            Some(state) if state.filter == *filter => state,
            Some(_) => {
                debug!("Filter changed, discarding accumulated posts");
                PaginationState::new(filter.clone())
            }
            None => PaginationState::new(filter.clone()),
        };

        let (stop, error) = loop {
            let filtered_count = filter.apply(&state.accumulated, today).len();
            if let Some(reason) = self.check_stop(&state, page, filtered_count) {
                break (reason, None);
            }

            if state.iterations >= self.config.max_remote_pages {
                warn!(
                    "Stopped after {} remote pages with {} matches; returning partial results",
                    state.iterations, filtered_count
                );
                break (StopReason::SafetyLimit, None);
            }

            let fetched = self.fetch_next(&mut state).await;
            match fetched {
                Ok(()) => {}
                Err(e) if e.is_term_expired() => {
                    self.state = Some(state);
                    return Err(e);
                }
                Err(e) => {
                    warn!("Remote page {} failed: {}", state.next_page, e);
                    break (StopReason::RemoteError, Some(e.to_string()));
                }
            }
        };
        debug!("Page {} load stopped: {:?}", page, stop);

        // A failed load with no matches falls back to whatever the store holds
        let filtered = filter.apply(&state.accumulated, today);
        let mut result = if filtered.is_empty() && error.is_some() {
            self.cached_page(filter, page, today, false, error)
        } else {
            let mut result = self.slice(filtered, page, !state.exhausted);
            result.error = error;
            result
        };
        result.stop_reason = Some(stop);

        self.state = Some(state);
        Ok(result)
    }

    /// Termination checks in priority order
    fn check_stop(
        &self,
        state: &PaginationState,
        page: usize,
        filtered_count: usize,
    ) -> Option<StopReason> {
        let page_size = self.config.page_size;

        // The first page is filled to capacity whenever the remote can supply it
        if page == 1 && filtered_count < page_size && !state.exhausted {
            return None;
        }
        // Saturating: `page` comes straight from the command line
        if filtered_count >= page.saturating_add(1).saturating_mul(page_size) {
            return Some(StopReason::LookAhead);
        }
        if filtered_count >= page.saturating_mul(page_size) {
            return Some(StopReason::PageFilled);
        }
        if state.exhausted {
            return Some(StopReason::Exhausted);
        }
        None
    }

    async fn fetch_next(&self, state: &mut PaginationState) -> Result<()> {
        let query = state
            .filter
            .remote_query(state.next_page, self.config.remote_page_size);
        let envelope = self.api.list_posts(&query).await?;

        state.iterations += 1;
        state.next_page += 1;

        let short_page = envelope.posts.len() < query.limit;
        let signaled_end = envelope
            .pagination
            .as_ref()
            .is_some_and(|p| !p.has_next_page());
        state.exhausted = short_page || signaled_end;

        if let Err(e) = self.store.put_all(&envelope.posts) {
            warn!("Failed to cache fetched posts: {}", e);
        }

        let before = state.accumulated.len();
        for post in envelope.posts {
            if state.seen.insert(post.id) {
                state.accumulated.push(post);
            }
        }
        debug!(
            "Remote page {}: {} new posts, exhausted={}",
            query.page,
            state.accumulated.len() - before,
            state.exhausted
        );

        Ok(())
    }

    /// Serve the page from cached posts without touching the accumulator
    fn cached_page(
        &self,
        filter: &PostFilter,
        page: usize,
        today: NaiveDate,
        offline: bool,
        error: Option<String>,
    ) -> PageResult {
        let cached = match filter.kind {
            Some(kind) => self
                .store
                .query_by_index::<ForumPost>(IndexField::Type, kind.as_str()),
            None => self.store.get_all::<ForumPost>(),
        };
        let cached = cached.unwrap_or_else(|e| {
            warn!("Failed to read cached posts: {}", e);
            Vec::new()
        });

        let mut result = self.slice(filter.apply(&cached, today), page, false);
        result.from_cache = true;
        result.offline = offline;
        result.error = error;
        result
    }

    fn slice(&self, filtered: Vec<ForumPost>, page: usize, has_more: bool) -> PageResult {
        let page_size = self.config.page_size;
        let total_posts = filtered.len();
        let posts = filtered
            .into_iter()
            .skip((page - 1).saturating_mul(page_size))
            .take(page_size)
            .collect();

        PageResult {
            posts,
            pagination: PageInfo {
                current_page: page,
                page_size,
                total_posts,
                total_pages: total_posts.div_ceil(page_size),
                has_more,
            },
            from_cache: false,
            offline: false,
            error: None,
            stop_reason: None,
        }
    }
}
