use super::{FailureReason, Pacer, Pacing, RepoRef, RepositoryApi, RepositoryMetrics, fetch_snapshot, reduce};
use crate::Result;
use core::time::Duration;
use futures_util::StreamExt;
use futures_util::stream::FuturesUnordered;
use std::sync::Arc;
use tokio::sync::OwnedSemaphorePermit;

const LOG_TARGET: &str = "     batch";

/// Default delay between the start of successive fetches in staggered mode.
pub const DEFAULT_STAGGER_INTERVAL: Duration = Duration::from_secs(6);

/// Default number of repositories fetched at the same time.
pub const DEFAULT_MAX_CONCURRENT: usize = 5;

/// Default time budget for fetching a single repository.
pub const DEFAULT_FETCH_TIMEOUT: Duration = Duration::from_secs(60);

#[derive(Debug, Clone, Copy)]
pub struct BatchOptions {
    pub pacing: Pacing,
    pub stagger_interval: Duration,
    pub max_concurrent: usize,
    pub fetch_timeout: Duration,
}

impl Default for BatchOptions {
    fn default() -> Self {
        Self {
            pacing: Pacing::Staggered,
            stagger_interval: DEFAULT_STAGGER_INTERVAL,
            max_concurrent: DEFAULT_MAX_CONCURRENT,
            fetch_timeout: DEFAULT_FETCH_TIMEOUT,
        }
    }
}

/// The outcome for one input reference.
#[derive(Debug, Clone)]
pub struct BatchEntry {
    /// Position of the reference in the input
    pub index: usize,
    /// The reference as it was supplied
    pub input: Arc<str>,
    pub outcome: Result<RepositoryMetrics, FailureReason>,
}

/// One entry per input reference, in input order.
#[derive(Debug, Clone, Default)]
pub struct BatchResult {
    entries: Vec<BatchEntry>,
}

impl BatchResult {
    #[must_use]
    pub fn entries(&self) -> &[BatchEntry] {
        &self.entries
    }

    #[must_use]
    pub const fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn succeeded(&self) -> impl Iterator<Item = &RepositoryMetrics> {
        self.entries.iter().filter_map(|entry| entry.outcome.as_ref().ok())
    }

    pub fn failed(&self) -> impl Iterator<Item = (&str, &FailureReason)> {
        self.entries
            .iter()
            .filter_map(|entry| entry.outcome.as_ref().err().map(|reason| (&*entry.input, reason)))
    }
}

/// Receives batch outcomes as they become available.
pub trait BatchSink {
    /// Called once per entry as soon as it finishes, in completion order.
    fn completed(&mut self, entry: &BatchEntry, done: usize, total: usize);

    /// Called once per successful entry, in input order.
    fn record(&mut self, metrics: &RepositoryMetrics) -> Result<()>;
}

/// Analyse every reference in `inputs`.
///
/// Each reference is parsed, fetched and reduced independently; a failure at any stage is kept as
/// that entry's outcome and the batch carries on. Only an error from [`BatchSink::record`] stops
/// the batch.
///
/// Fetches are released by a [`Pacer`] configured from `options` and may finish in any order.
/// `sink.completed` sees them in completion order while `sink.record` is held back until every
/// earlier entry has finished, so recorded rows always follow input order.
pub async fn run_batch<A, S>(api: &A, inputs: &[Arc<str>], options: &BatchOptions, sink: &mut S) -> Result<BatchResult>
where
    A: RepositoryApi,
    S: BatchSink,
{
    let total = inputs.len();
    let mut slots: Vec<Option<BatchEntry>> = vec![None; total];
    let mut next_to_record = 0;
    let mut done = 0;

    let mut queue = Vec::with_capacity(total);
    for (index, input) in inputs.iter().enumerate() {
        match RepoRef::parse(input) {
            Ok(repo) => queue.push((index, repo)),
            Err(reason) => {
                let entry = BatchEntry {
                    index,
                    input: Arc::clone(input),
                    outcome: Err(reason),
                };
                done += 1;
                sink.completed(&entry, done, total);
                slots[index] = Some(entry);
            }
        }
    }

    flush_in_order(&slots, &mut next_to_record, sink)?;

    let mut queue = queue.into_iter().peekable();
    let mut pacer = Pacer::new(options.pacing, options.stagger_interval, options.max_concurrent);
    let mut pending = FuturesUnordered::new();

    loop {
        tokio::select! {
            biased;

            Some((index, outcome)) = pending.next(), if !pending.is_empty() => {
                let entry = BatchEntry {
                    index,
                    input: Arc::clone(&inputs[index]),
                    outcome,
                };
                done += 1;
                sink.completed(&entry, done, total);
                slots[index] = Some(entry);
                flush_in_order(&slots, &mut next_to_record, sink)?;
            }

            permit = pacer.acquire(), if queue.peek().is_some() => {
                if let Some((index, repo)) = queue.next() {
                    log::info!(target: LOG_TARGET, "Analysing repository '{repo}' ({}/{total})", index + 1);
                    let timeout = options.fetch_timeout;
                    pending.push(async move { (index, analyse(api, &repo, timeout, permit).await) });
                }
            }

            else => break,
        }
    }

    Ok(BatchResult {
        entries: slots.into_iter().flatten().collect(),
    })
}

/// Fetch and reduce one repository while holding a pacer permit.
async fn analyse<A: RepositoryApi>(
    api: &A,
    repo: &RepoRef,
    timeout: Duration,
    _permit: OwnedSemaphorePermit,
) -> Result<RepositoryMetrics, FailureReason> {
    let snapshot = tokio::time::timeout(timeout, fetch_snapshot(api, repo))
        .await
        .map_err(|elapsed| {
            log::debug!(target: LOG_TARGET, "Fetching '{repo}' {elapsed}");
            FailureReason::Timeout(timeout)
        })??;

    reduce(&snapshot)
}

/// Record every finished entry that no longer waits on an earlier one.
fn flush_in_order<S: BatchSink>(slots: &[Option<BatchEntry>], next_to_record: &mut usize, sink: &mut S) -> Result<()> {
    while let Some(Some(entry)) = slots.get(*next_to_record) {
        if let Ok(metrics) = &entry.outcome {
            sink.record(metrics)?;
        }
        *next_to_record += 1;
    }

    Ok(())
}
