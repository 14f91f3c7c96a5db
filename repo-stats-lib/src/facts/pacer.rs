use clap::ValueEnum;
use core::time::Duration;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tokio::sync::{OwnedSemaphorePermit, Semaphore};
use tokio::time::Instant;

/// How successive repository fetches are released.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum Pacing {
    /// Leave a fixed minimum delay between the start of successive fetches
    Staggered,

    /// Start every fetch as soon as a concurrency slot is free
    Burst,
}

/// Limits concurrency and spaces out the start of successive units of work.
///
/// Call [`Pacer::acquire`] before each unit of work and hold the returned permit for its
/// duration. At most `max_concurrent` permits are outstanding, and in [`Pacing::Staggered`] mode
/// two permits are never handed out less than `interval` apart.
///
/// `acquire` is cancel-safe: a start is only recorded once the permit is actually handed out, so
/// dropping a pending `acquire` does not consume a slot.
#[derive(Debug)]
pub struct Pacer {
    semaphore: Arc<Semaphore>,
    interval: Duration,
    last_start: Option<Instant>,
}

impl Pacer {
    /// Create a pacer. `max_concurrent` is clamped to at least one.
    #[must_use]
    pub fn new(pacing: Pacing, interval: Duration, max_concurrent: usize) -> Self {
        let interval = match pacing {
            Pacing::Staggered => interval,
            Pacing::Burst => Duration::ZERO,
        };

        Self {
            semaphore: Arc::new(Semaphore::new(max_concurrent.max(1))),
            interval,
            last_start: None,
        }
    }

    /// Wait for a concurrency slot and for the next start time, then record the start.
    pub async fn acquire(&mut self) -> OwnedSemaphorePermit {
        let permit = Arc::clone(&self.semaphore)
            .acquire_owned()
            .await
            .expect("semaphore is never closed");

        let start_at = self.next_start(Instant::now());
        tokio::time::sleep_until(start_at).await;

        self.last_start = Some(start_at);
        permit
    }

    /// The earliest instant the next unit of work may start, given the current time.
    #[must_use]
    pub fn next_start(&self, now: Instant) -> Instant {
        self.last_start.map_or(now, |last| (last + self.interval).max(now))
    }
}
