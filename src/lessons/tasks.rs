//! Async task patterns on tokio.
//!
//! - [`sequential`] awaits one fetch after another, so total time is the sum.
//! - [`when_all`] starts every fetch at once and waits for the slowest.
//! - [`when_any`] returns the first fetch to finish; the others keep running
//!   in the background and their results are discarded.
//! - [`process_items`] polls a [`CancelSignal`] between steps. Cancellation
//!   is cooperative: a step already sleeping is never interrupted, the loop
//!   stops at its next check.

use std::future::Future;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use thiserror::Error;
use tokio::task::{JoinHandle, JoinSet};
use tokio::time::{Instant, sleep};
use tokio_stream::Stream;
use tracing::debug;

pub const FETCH_RESULT: &str = "Data fetched successfully";

#[derive(Debug, Error)]
pub enum TaskError {
    #[error("no tasks to wait for")]
    Empty,

    #[error("{0}")]
    Failed(String),

    #[error("task did not complete: {0}")]
    Join(#[from] tokio::task::JoinError),
}

/// The outcome of one simulated fetch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Fetched {
    pub delay: Duration,
    pub message: &'static str,
}

/// Waits `delay`, then reports success.
pub async fn fetch_data(delay: Duration) -> Fetched {
    debug!(?delay, "starting fetch");
    sleep(delay).await;
    debug!(?delay, "fetch completed");
    Fetched { delay, message: FETCH_RESULT }
}

pub async fn sequential(delays: &[Duration]) -> Vec<Fetched> {
    let mut results = Vec::with_capacity(delays.len());
    for delay in delays {
        results.push(fetch_data(*delay).await);
    }
    results
}

/// Runs every fetch concurrently. Results come back in input order.
pub async fn when_all(delays: &[Duration]) -> Result<Vec<Fetched>, TaskError> {
    let handles: Vec<JoinHandle<Fetched>> =
        delays.iter().map(|delay| tokio::spawn(fetch_data(*delay))).collect();

    let mut results = Vec::with_capacity(handles.len());
    for handle in handles {
        results.push(handle.await?);
    }
    Ok(results)
}

/// Returns the first fetch to complete. The rest are detached, not aborted.
pub async fn when_any(delays: &[Duration]) -> Result<Fetched, TaskError> {
    let mut set = JoinSet::new();
    for delay in delays {
        set.spawn(fetch_data(*delay));
    }

    let first = set.join_next().await.ok_or(TaskError::Empty)??;
    // Dropping a JoinSet aborts its tasks; detaching lets them finish.
    set.detach_all();
    Ok(first)
}

pub async fn calculate(a: i64, b: i64) -> i64 {
    sleep(Duration::from_secs(1)).await;
    a + b
}

/// Completes without suspending when `ready` is set.
pub async fn fast_operation(ready: bool) -> u32 {
    if !ready {
        sleep(Duration::from_secs(1)).await;
    }
    42
}

/// An error raised inside a spawned task surfaces where the task is awaited.
pub async fn failing_task() -> Result<(), TaskError> {
    let handle = tokio::spawn(async { Err(TaskError::Failed("Something went wrong!".to_owned())) });
    handle.await?
}

/// Yields `1..=count`, pausing `every` before each number.
pub fn numbers(count: u32, every: Duration) -> impl Stream<Item = u32> {
    async_stream::stream! {
        for n in 1..=count {
            sleep(every).await;
            yield n;
        }
    }
}

/// Starts `work` in the background and returns immediately.
pub fn fire_and_forget<F>(work: F)
where
    F: Future<Output = ()> + Send + 'static,
{
    drop(tokio::spawn(work));
}

// ── Cooperative cancellation ─────────────────────────────────────────────────

/// A cancellation flag checked at well-defined points. Clones share state.
#[derive(Debug, Clone)]
pub struct CancelSignal {
    cancelled: Arc<AtomicBool>,
    deadline: Option<Instant>,
}

impl CancelSignal {
    pub fn new() -> Self {
        Self { cancelled: Arc::new(AtomicBool::new(false)), deadline: None }
    }

    /// Reports cancelled once `after` has elapsed from now.
    pub fn after(after: Duration) -> Self {
        Self { deadline: Some(Instant::now() + after), ..Self::new() }
    }

    pub fn cancel(&self) {
        self.cancelled.store(true, Ordering::Release);
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::Acquire)
            || self.deadline.is_some_and(|deadline| Instant::now() >= deadline)
    }
}

impl Default for CancelSignal {
    fn default() -> Self {
        Self::new()
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
#[error("operation was cancelled after {} items", .processed.len())]
pub struct Cancelled {
    pub processed: Vec<u32>,
}

/// Processes `count` items, spending `step` on each and checking `signal`
/// before starting the next.
pub async fn process_items(count: u32, step: Duration, signal: &CancelSignal) -> Result<Vec<u32>, Cancelled> {
    let mut processed = Vec::new();
    for item in 0..count {
        if signal.is_cancelled() {
            return Err(Cancelled { processed });
        }
        debug!(item, "processing item");
        processed.push(item);
        sleep(step).await;
    }
    Ok(processed)
}
