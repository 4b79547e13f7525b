//! Offline-first synchronization engine
//!
//! - [`SyncOrchestrator`] serves whole-collection views cache-first.
//! - [`ProgressivePaginator`] fills client-filtered post pages from a
//!   coarsely filtered remote.
//! - [`ConnectivityObserver`] owns the online flag both consult.

pub mod connectivity;
pub mod filter;
pub mod orchestrator;
pub mod paginator;

pub use connectivity::{ConnectivityEvent, ConnectivityObserver, ConnectivitySignal};
pub use filter::{Category, PostFilter, SportEligibility};
pub use orchestrator::{SyncConfig, SyncEvent, SyncOrchestrator, SyncOrigin, SyncResult, SyncTarget};
pub use paginator::{PageInfo, PageResult, PaginatorConfig, ProgressivePaginator, StopReason};
