//! Data collection and reduction for GitHub repositories
//!
//! This module turns a list of repository references into one metrics record per repository.
//!
//! # Implementation Model
//!
//! A reference is first parsed into a [`RepoRef`]. The [`fetch_snapshot`] function then issues the
//! independent upstream queries for that repository concurrently through a [`RepositoryApi`]
//! and gathers the answers into a [`Snapshot`]. The fetch is all-or-nothing: if any query fails,
//! the outstanding ones are dropped and the whole repository fails with a [`FailureReason`].
//!
//! The [`reduce`] function flattens a snapshot into a [`RepositoryMetrics`] record, applying the
//! defaults for absent licenses and languages and deriving the open issue count.
//!
//! [`run_batch`] drives many repositories at once. A [`Pacer`] caps how many fetches are in
//! flight and, in staggered mode, spaces out their starts to stay under the upstream rate limit.
//! Failures are isolated per entry and successes are handed to a [`BatchSink`] in input order.
//!
//! [`Client`] is the production [`RepositoryApi`], talking to the GitHub REST API.

mod api;
mod batch;
mod client;
#[cfg(test)]
mod fake_api;
mod failure;
mod fetcher;
mod pacer;
mod reducer;
mod repo_ref;
mod repository_metrics;
mod snapshot;

pub use api::RepositoryApi;
pub use batch::{
    BatchEntry, BatchOptions, BatchResult, BatchSink, DEFAULT_FETCH_TIMEOUT, DEFAULT_MAX_CONCURRENT, DEFAULT_STAGGER_INTERVAL,
    run_batch,
};
pub use client::{ApiResult, Client, ClientConfig, DEFAULT_BASE_URL, License, RateLimitInfo, RepositoryDescriptor};
pub use failure::FailureReason;
pub use fetcher::{DEFAULT_BRANCH_CANDIDATES, PAGE_SIZE, fetch_snapshot};
pub use pacer::{Pacer, Pacing};
pub use reducer::{NO_LICENSE, UNKNOWN_LANGUAGE, reduce};
pub use repo_ref::{RepoRef, split_references};
pub use repository_metrics::RepositoryMetrics;
pub use snapshot::{CommitCount, Snapshot};
