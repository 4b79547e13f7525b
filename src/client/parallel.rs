//! Parallel fetching of remaining pages.
//!
//! Whole-collection syncs learn `totalPages` from the first response and pull
//! the rest concurrently. Results come back in page order regardless of
//! arrival order so that reconciliation is deterministic.

use std::future::Future;
use std::pin::Pin;

use futures::stream::{FuturesUnordered, StreamExt};
use log::debug;

use crate::error::Result;

/// Boxed page future yielding its page number with the result
type PageFuture<T> = Pin<Box<dyn Future<Output = (usize, Result<Vec<T>>)> + Send>>;

/// Fetch the given pages with at most `max_concurrent` requests in flight.
///
/// Returns all items concatenated in ascending page order. The first failing
/// page aborts the whole fetch.
///
/// # Example
///
/// ```ignore
/// let first = api.list_posts(&query).await?;
/// let rest = fetch_remaining_pages(
///     first.remaining_pages(),
///     |page| {
///         let api = api.clone();
///         let query = query.clone().page(page);
///         async move { Ok(api.list_posts(&query).await?.posts) }
///     },
///     4,
/// )
/// .await?;
/// ```
pub async fn fetch_remaining_pages<T, F, Fut>(
    pages: Vec<usize>,
    fetch_page: F,
    max_concurrent: usize,
) -> Result<Vec<T>>
where
    T: Send + 'static,
    F: Fn(usize) -> Fut,
    Fut: Future<Output = Result<Vec<T>>> + Send + 'static,
{
    if pages.is_empty() {
        return Ok(Vec::new());
    }

    let max_concurrent = max_concurrent.max(1);
    debug!(
        "Fetching {} remaining pages with max {} concurrent",
        pages.len(),
        max_concurrent
    );

    let make_future = |page: usize| -> PageFuture<T> {
        let fut = fetch_page(page);
        Box::pin(async move { (page, fut.await) })
    };

    let mut in_flight: FuturesUnordered<PageFuture<T>> = FuturesUnordered::new();
    let mut pending = pages.into_iter();
    for page in pending.by_ref().take(max_concurrent) {
        in_flight.push(make_future(page));
    }

    let mut by_page: Vec<(usize, Vec<T>)> = Vec::new();
    while let Some((page, result)) = in_flight.next().await {
        let items = result?;
        debug!("Page {} returned {} items", page, items.len());
        by_page.push((page, items));

        if let Some(next) = pending.next() {
            in_flight.push(make_future(next));
        }
    }

    by_page.sort_by_key(|(page, _)| *page);
    Ok(by_page.into_iter().flat_map(|(_, items)| items).collect())
}
