//! Cache-first / network-first decisions for whole-collection views
//!
//! Every call consults the local store and the staleness policy, then either
//! serves the cache, fetches and reconciles, or serves the cache and refreshes
//! it in the background. Remote failures degrade to cached data with an
//! advisory error; only an expired membership term is surfaced as an error.

use std::collections::HashSet;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use chrono::{DateTime, Utc};
use log::{debug, info, warn};
use serde::Serialize;
use tokio::sync::broadcast;
use tokio::task::{JoinHandle, JoinSet};

use super::connectivity::ConnectivitySignal;
use super::paginator::SAFETY_PAGE_LIMIT;
use crate::cache::{CacheKey, CacheTtl, ResourceKind, StalenessPolicy};
use crate::client::{
    DEFAULT_REMOTE_PAGE_SIZE, ForumApi, ForumPost, ListQuery, PostKind, Race, RaceSignup,
    WaitlistEntry, WorkoutSignup, fetch_remaining_pages,
};
use crate::error::{ApiError, Error, Result, StorageError};
use crate::store::{IndexField, LocalStore, Record};

/// Concurrent page requests during a whole-collection posts sync
const DEFAULT_MAX_CONCURRENT_PAGES: usize = 4;

/// Buffered events per subscriber
const EVENT_CAPACITY: usize = 64;

/// A resource view the orchestrator can synchronize
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum SyncTarget {
    Posts { kind: Option<PostKind> },
    Workout { id: i64 },
    Signups { workout_id: i64 },
    Waitlist { workout_id: i64 },
    Races,
    RaceSignups { race_id: i64 },
}

impl SyncTarget {
    pub fn cache_key(&self) -> CacheKey {
        match self {
            SyncTarget::Posts { kind } => {
                let key = CacheKey::new(ResourceKind::ForumPosts);
                match kind {
                    Some(kind) => key.with_param("type", kind),
                    None => key,
                }
            }
            SyncTarget::Workout { id } => CacheKey::new(ResourceKind::Workout).with_param("id", id),
            SyncTarget::Signups { workout_id } => {
                CacheKey::new(ResourceKind::WorkoutSignups).with_param("workoutId", workout_id)
            }
            SyncTarget::Waitlist { workout_id } => {
                CacheKey::new(ResourceKind::WorkoutWaitlist).with_param("workoutId", workout_id)
            }
            SyncTarget::Races => CacheKey::new(ResourceKind::Races),
            SyncTarget::RaceSignups { race_id } => {
                CacheKey::new(ResourceKind::RaceSignups).with_param("raceId", race_id)
            }
        }
    }

    pub fn ttl(&self) -> Duration {
        match self {
            SyncTarget::Posts { .. } => CacheTtl::POSTS,
            SyncTarget::Workout { .. } => CacheTtl::WORKOUT,
            SyncTarget::Signups { .. }
            | SyncTarget::Waitlist { .. }
            | SyncTarget::RaceSignups { .. } => CacheTtl::ROSTERS,
            SyncTarget::Races => CacheTtl::RACES,
        }
    }
}

/// Data plus where it came from
#[derive(Debug, Clone, Serialize)]
pub struct SyncResult<T> {
    pub data: T,
    pub from_cache: bool,
    pub offline: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub synced_at: Option<DateTime<Utc>>,
}

/// What triggered a completed sync
#[allow(dead_code)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SyncOrigin {
    Background,
    CatchUp,
}

/// Published to subscribers whenever the store was updated out of band
#[allow(dead_code)]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SyncEvent {
    pub target: SyncTarget,
    pub records: usize,
    pub origin: SyncOrigin,
}

/// Orchestrator tuning
#[derive(Debug, Clone, Copy)]
pub struct SyncConfig {
    pub remote_page_size: usize,
    pub max_concurrent_pages: usize,
}

impl Default for SyncConfig {
    fn default() -> Self {
        Self {
            remote_page_size: DEFAULT_REMOTE_PAGE_SIZE,
            max_concurrent_pages: DEFAULT_MAX_CONCURRENT_PAGES,
        }
    }
}

enum Decision {
    Offline,
    Fresh { refresh: bool },
    Fetch,
}

struct Inner<C> {
    api: Arc<C>,
    store: Arc<LocalStore>,
    staleness: StalenessPolicy,
    connectivity: ConnectivitySignal,
    config: SyncConfig,
    events: broadcast::Sender<SyncEvent>,
    active: Mutex<HashSet<SyncTarget>>,
    refreshing: Mutex<HashSet<SyncTarget>>,
    background: Mutex<JoinSet<()>>,
}

/// Offline-first sync for posts, workouts, rosters and races.
///
/// Cheap to clone; clones share the store, subscriptions and event channel.
pub struct SyncOrchestrator<C> {
    inner: Arc<Inner<C>>,
}

impl<C> Clone for SyncOrchestrator<C> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<C: ForumApi + 'static> SyncOrchestrator<C> {
    pub fn new(
        api: Arc<C>,
        store: Arc<LocalStore>,
        staleness: StalenessPolicy,
        connectivity: ConnectivitySignal,
        config: SyncConfig,
    ) -> Self {
        let (events, _) = broadcast::channel(EVENT_CAPACITY);
        Self {
            inner: Arc::new(Inner {
                api,
                store,
                staleness,
                connectivity,
                config,
                events,
                active: Mutex::new(HashSet::new()),
                refreshing: Mutex::new(HashSet::new()),
                background: Mutex::new(JoinSet::new()),
            }),
        }
    }

    /// Live notifications of background and catch-up syncs
    #[allow(dead_code)]
    pub fn subscribe(&self) -> broadcast::Receiver<SyncEvent> {
        self.inner.events.subscribe()
    }

    /// Targets fetched so far, re-synced on reconnect
    #[allow(dead_code)]
    pub fn active_targets(&self) -> Vec<SyncTarget> {
        match self.inner.active.lock() {
            Ok(active) => active.iter().cloned().collect(),
            Err(_) => Vec::new(),
        }
    }

    // ------------------------------------------------------------------
    // Public fetches
    // ------------------------------------------------------------------

    /// Forum posts, optionally narrowed to one kind
    pub async fn fetch_posts(&self, kind: Option<PostKind>) -> Result<SyncResult<Vec<ForumPost>>> {
        let target = SyncTarget::Posts { kind };
        let cached = self.read_cached(|store| {
            let mut posts: Vec<ForumPost> = match kind {
                Some(kind) => store.query_by_index(IndexField::Type, kind.as_str())?,
                None => store.get_all()?,
            };
            sort_posts(&mut posts);
            Ok(posts)
        });
        let has_cache = !cached.is_empty();

        match self.decide(&target, has_cache) {
            Decision::Fetch => {
                let pulled = self.pull_posts(kind).await;
                self.finish(&target, pulled, cached)
            }
            decision => Ok(self.serve_cached(&target, decision, cached)),
        }
    }

    /// A single workout; `None` when neither cache nor remote has it
    pub async fn fetch_workout(&self, id: i64) -> Result<SyncResult<Option<ForumPost>>> {
        let target = SyncTarget::Workout { id };
        let cached = self.read_cached(|store| store.get::<ForumPost>(&id.to_string()));
        let has_cache = cached.is_some();

        match self.decide(&target, has_cache) {
            Decision::Fetch => {
                let pulled = self.pull_workout(id).await;
                self.finish(&target, pulled, cached)
            }
            decision => Ok(self.serve_cached(&target, decision, cached)),
        }
    }

    /// Signup roster of a workout
    pub async fn fetch_signups(&self, workout_id: i64) -> Result<SyncResult<Vec<WorkoutSignup>>> {
        let target = SyncTarget::Signups { workout_id };
        let cached = self.read_cached(|store| {
            store.query_by_index::<WorkoutSignup>(IndexField::WorkoutId, &workout_id.to_string())
        });
        let has_cache = !cached.is_empty();

        match self.decide(&target, has_cache) {
            Decision::Fetch => {
                let pulled = self.pull_signups(workout_id).await;
                self.finish(&target, pulled, cached)
            }
            decision => Ok(self.serve_cached(&target, decision, cached)),
        }
    }

    /// Waitlist of a workout
    pub async fn fetch_waitlist(&self, workout_id: i64) -> Result<SyncResult<Vec<WaitlistEntry>>> {
        let target = SyncTarget::Waitlist { workout_id };
        let cached = self.read_cached(|store| {
            let mut entries: Vec<WaitlistEntry> =
                store.query_by_index(IndexField::WorkoutId, &workout_id.to_string())?;
            entries.sort_by_key(|e| (e.position, e.id));
            Ok(entries)
        });
        let has_cache = !cached.is_empty();

        match self.decide(&target, has_cache) {
            Decision::Fetch => {
                let pulled = self.pull_waitlist(workout_id).await;
                self.finish(&target, pulled, cached)
            }
            decision => Ok(self.serve_cached(&target, decision, cached)),
        }
    }

    /// Club race calendar
    pub async fn fetch_races(&self) -> Result<SyncResult<Vec<Race>>> {
        let target = SyncTarget::Races;
        let cached = self.read_cached(|store| {
            let mut races: Vec<Race> = store.get_all()?;
            races.sort_by(|a, b| a.date.cmp(&b.date).then(a.id.cmp(&b.id)));
            Ok(races)
        });
        let has_cache = !cached.is_empty();

        match self.decide(&target, has_cache) {
            Decision::Fetch => {
                let pulled = self.pull_races().await;
                self.finish(&target, pulled, cached)
            }
            decision => Ok(self.serve_cached(&target, decision, cached)),
        }
    }

    /// Signup roster of a race
    pub async fn fetch_race_signups(&self, race_id: i64) -> Result<SyncResult<Vec<RaceSignup>>> {
        let target = SyncTarget::RaceSignups { race_id };
        let cached = self.read_cached(|store| {
            store.query_by_index::<RaceSignup>(IndexField::RaceId, &race_id.to_string())
        });
        let has_cache = !cached.is_empty();

        match self.decide(&target, has_cache) {
            Decision::Fetch => {
                let pulled = self.pull_race_signups(race_id).await;
                self.finish(&target, pulled, cached)
            }
            decision => Ok(self.serve_cached(&target, decision, cached)),
        }
    }

    // ------------------------------------------------------------------
    // Decision tree
    // ------------------------------------------------------------------

    /// Read cached candidates; a storage failure counts as "no cache"
    fn read_cached<T: Default>(
        &self,
        read: impl FnOnce(&LocalStore) -> std::result::Result<T, StorageError>,
    ) -> T {
        read(&self.inner.store).unwrap_or_else(|e| {
            warn!("Failed to read local store, treating as empty: {}", e);
            T::default()
        })
    }

    fn decide(&self, target: &SyncTarget, has_cache: bool) -> Decision {
        self.track(target);
        let key = target.cache_key();

        if !self.inner.connectivity.is_online() {
            debug!("Offline, serving cache: {}", key);
            return Decision::Offline;
        }

        let ttl = target.ttl();
        if has_cache && !self.inner.staleness.is_stale(&key, ttl) {
            debug!("Cache hit: {}", key);
            return Decision::Fresh {
                refresh: self.inner.staleness.should_refresh(&key, ttl),
            };
        }

        debug!("Cache miss: {}", key);
        Decision::Fetch
    }

    fn serve_cached<T>(&self, target: &SyncTarget, decision: Decision, data: T) -> SyncResult<T> {
        if let Decision::Fresh { refresh: true } = decision {
            self.spawn_refresh(target.clone());
        }

        SyncResult {
            data,
            from_cache: true,
            offline: matches!(decision, Decision::Offline),
            error: None,
            synced_at: self.inner.staleness.last_synced(&target.cache_key()),
        }
    }

    /// Turn a remote outcome into a result, falling back to `cached`
    fn finish<T>(&self, target: &SyncTarget, pulled: Result<T>, cached: T) -> Result<SyncResult<T>> {
        let key = target.cache_key();
        match pulled {
            Ok(data) => Ok(SyncResult {
                data,
                from_cache: false,
                offline: false,
                error: None,
                synced_at: self.inner.staleness.last_synced(&key),
            }),
            Err(e) if e.is_term_expired() => Err(e),
            Err(e) => {
                warn!("Sync of {} failed, serving cache: {}", key, e);
                Ok(SyncResult {
                    data: cached,
                    from_cache: true,
                    offline: false,
                    error: Some(e.to_string()),
                    synced_at: self.inner.staleness.last_synced(&key),
                })
            }
        }
    }

    fn track(&self, target: &SyncTarget) {
        if let Ok(mut active) = self.inner.active.lock() {
            active.insert(target.clone());
        }
    }

    fn mark_synced(&self, target: &SyncTarget) {
        if let Err(e) = self.inner.staleness.mark_synced(&target.cache_key()) {
            warn!("Failed to record sync of {}: {}", target.cache_key(), e);
        }
    }

    /// Write fetched records; failures are logged, the data is still served
    fn upsert<T: Record>(&self, records: &[T]) {
        if let Err(e) = self.inner.store.put_all(records) {
            warn!("Failed to write {} records to local store: {}", T::COLLECTION, e);
        }
    }

    // ------------------------------------------------------------------
    // Remote fetch + reconcile
    // ------------------------------------------------------------------

    async fn pull_posts(&self, kind: Option<PostKind>) -> Result<Vec<ForumPost>> {
        let mut query = ListQuery::new().limit(self.inner.config.remote_page_size);
        if let Some(kind) = kind {
            query = query.kind(kind);
        }

        let first = self.inner.api.list_posts(&query).await?;
        let remaining = first.remaining_pages();
        let mut complete = !first.has_next_page();
        let mut posts = first.posts;

        if !remaining.is_empty() {
            let api = Arc::clone(&self.inner.api);
            let rest = fetch_remaining_pages(
                remaining,
                |page| {
                    let api = Arc::clone(&api);
                    let query = query.clone().page(page);
                    async move {
                        let envelope = api.list_posts(&query).await?;
                        Ok::<_, Error>(envelope.posts)
                    }
                },
                self.inner.config.max_concurrent_pages,
            )
            .await?;
            posts.extend(rest);
            complete = true;
        } else if !complete {
            // No page count from the server; walk pages until it stops
            let mut page = 1;
            while !complete && page < SAFETY_PAGE_LIMIT {
                page += 1;
                let next = self.inner.api.list_posts(&query.clone().page(page)).await?;
                complete = !next.has_next_page() || next.posts.is_empty();
                posts.extend(next.posts);
            }
        }

        let mut seen = HashSet::new();
        posts.retain(|p| seen.insert(p.id));
        sort_posts(&mut posts);

        self.upsert(&posts);
        if let (Some(kind), true) = (kind, complete) {
            let keep: Vec<String> = posts.iter().map(|r| r.id()).collect();
            match self
                .inner
                .store
                .remove_missing::<ForumPost>(IndexField::Type, kind.as_str(), &keep)
            {
                Ok(0) => {}
                Ok(n) => debug!("Removed {} {} posts no longer on the server", n, kind),
                Err(e) => warn!("Failed to prune cached posts: {}", e),
            }
        }
        self.mark_synced(&SyncTarget::Posts { kind });

        Ok(posts)
    }

    async fn pull_workout(&self, id: i64) -> Result<Option<ForumPost>> {
        let target = SyncTarget::Workout { id };
        match self.inner.api.get_workout(id).await {
            Ok(post) => {
                self.upsert(std::slice::from_ref(&post));
                self.mark_synced(&target);
                Ok(Some(post))
            }
            Err(Error::Api(ApiError::NotFound(_))) => {
                debug!("Workout {} no longer exists, dropping cached copy", id);
                if let Err(e) = self.inner.store.remove::<ForumPost>(&id.to_string()) {
                    warn!("Failed to remove workout {}: {}", id, e);
                }
                self.mark_synced(&target);
                Ok(None)
            }
            Err(e) => Err(e),
        }
    }

    async fn pull_signups(&self, workout_id: i64) -> Result<Vec<WorkoutSignup>> {
        let signups = self.inner.api.list_signups(workout_id).await?;
        self.reconcile_roster(IndexField::WorkoutId, workout_id, &signups);
        self.mark_synced(&SyncTarget::Signups { workout_id });
        Ok(signups)
    }

    async fn pull_waitlist(&self, workout_id: i64) -> Result<Vec<WaitlistEntry>> {
        let mut entries = self.inner.api.list_waitlist(workout_id).await?;
        entries.sort_by_key(|e| (e.position, e.id));
        self.reconcile_roster(IndexField::WorkoutId, workout_id, &entries);
        self.mark_synced(&SyncTarget::Waitlist { workout_id });
        Ok(entries)
    }

    async fn pull_race_signups(&self, race_id: i64) -> Result<Vec<RaceSignup>> {
        let signups = self.inner.api.list_race_signups(race_id).await?;
        self.reconcile_roster(IndexField::RaceId, race_id, &signups);
        self.mark_synced(&SyncTarget::RaceSignups { race_id });
        Ok(signups)
    }

    async fn pull_races(&self) -> Result<Vec<Race>> {
        let mut races = self.inner.api.list_races().await?;
        races.sort_by(|a, b| a.date.cmp(&b.date).then(a.id.cmp(&b.id)));

        self.upsert(&races);
        let keep: Vec<String> = races.iter().map(|r| r.id()).collect();
        if let Err(e) = self.inner.store.retain::<Race>(&keep) {
            warn!("Failed to prune cached races: {}", e);
        }
        self.mark_synced(&SyncTarget::Races);
        Ok(races)
    }

    /// Upsert a roster, then drop entries for the same parent the server no
    /// longer reports
    fn reconcile_roster<T: Record>(&self, parent: IndexField, parent_id: i64, entries: &[T]) {
        self.upsert(entries);
        let keep: Vec<String> = entries.iter().map(|r| r.id()).collect();
        match self
            .inner
            .store
            .remove_missing::<T>(parent, &parent_id.to_string(), &keep)
        {
            Ok(0) => {}
            Ok(n) => debug!("Removed {} stale {} entries", n, T::COLLECTION),
            Err(e) => warn!("Failed to prune {}: {}", T::COLLECTION, e),
        }
    }

    // ------------------------------------------------------------------
    // Background refresh and catch-up
    // ------------------------------------------------------------------

    /// Re-fetch a target and notify subscribers. Returns the record count.
    pub async fn refresh(&self, target: &SyncTarget, origin: SyncOrigin) -> Result<usize> {
        let records = match target {
            SyncTarget::Posts { kind } => self.pull_posts(*kind).await?.len(),
            SyncTarget::Workout { id } => self.pull_workout(*id).await?.map_or(0, |_| 1),
            SyncTarget::Signups { workout_id } => self.pull_signups(*workout_id).await?.len(),
            SyncTarget::Waitlist { workout_id } => self.pull_waitlist(*workout_id).await?.len(),
            SyncTarget::Races => self.pull_races().await?.len(),
            SyncTarget::RaceSignups { race_id } => self.pull_race_signups(*race_id).await?.len(),
        };

        // No subscribers is fine
        let _ = self.inner.events.send(SyncEvent {
            target: target.clone(),
            records,
            origin,
        });
        Ok(records)
    }

    /// Refresh `target` without blocking the caller; at most one in flight
    /// per target
    fn spawn_refresh(&self, target: SyncTarget) {
        match self.inner.refreshing.lock() {
            Ok(mut refreshing) => {
                if !refreshing.insert(target.clone()) {
                    debug!("Refresh of {} already in flight", target.cache_key());
                    return;
                }
            }
            Err(_) => return,
        }

        debug!("Background refresh: {}", target.cache_key());
        let this = self.clone();
        let task = async move {
            if let Err(e) = this.refresh(&target, SyncOrigin::Background).await {
                warn!("Background refresh of {} failed: {}", target.cache_key(), e);
            }
            if let Ok(mut refreshing) = this.inner.refreshing.lock() {
                refreshing.remove(&target);
            }
        };

        if let Ok(mut background) = self.inner.background.lock() {
            // Reap finished refreshes so the set only holds live ones
            while background.try_join_next().is_some() {}
            background.spawn(task);
        }
    }

    /// Wait for in-flight background refreshes to land in the store.
    ///
    /// A runtime that shuts down drops unfinished tasks, so short-lived hosts
    /// call this before exiting.
    pub async fn settle(&self) {
        loop {
            let mut pending = match self.inner.background.lock() {
                Ok(mut background) => std::mem::replace(&mut *background, JoinSet::new()),
                Err(_) => return,
            };
            if pending.is_empty() {
                return;
            }

            debug!("Waiting for {} background refreshes", pending.len());
            while let Some(joined) = pending.join_next().await {
                if let Err(e) = joined {
                    warn!("Background refresh task did not complete: {}", e);
                }
            }
        }
    }

    /// Re-sync every active target. Returns how many succeeded.
    #[allow(dead_code)]
    pub async fn catch_up(&self) -> usize {
        if !self.inner.connectivity.is_online() {
            debug!("Still offline, skipping catch-up");
            return 0;
        }

        let targets = self.active_targets();
        info!("Catching up {} subscribed resources", targets.len());

        let mut synced = 0;
        for target in targets {
            match self.refresh(&target, SyncOrigin::CatchUp).await {
                Ok(_) => synced += 1,
                Err(e) => warn!("Catch-up of {} failed: {}", target.cache_key(), e),
            }
        }
        synced
    }

    /// Run [`Self::catch_up`] on every offline to online transition
    #[allow(dead_code)]
    pub fn watch_connectivity(&self) -> JoinHandle<()> {
        let this = self.clone();
        let mut signal = self.inner.connectivity.clone();
        tokio::spawn(async move {
            while signal.reconnected().await {
                this.catch_up().await;
            }
        })
    }
}

/// Newest first, then by id
fn sort_posts(posts: &mut [ForumPost]) {
    posts.sort_by(|a, b| {
        b.effective_date()
            .cmp(&a.effective_date())
            .then_with(|| b.id.cmp(&a.id))
    });
}
