//! Simulated latency and request cancellation
//!
//! The demo backend waits before answering so interactions feel like a real
//! network round-trip. The wait is a cooperative tokio sleep raced against a
//! [`CancellationToken`]; the HTTP backend uses the same token, so callers get
//! one cancellation contract for both modes.

use crate::{NotebookError, Result};
use rand::Rng;
use std::future::Future;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Notify;
use tokio::time::Instant;
use tracing::debug;

/// Cancellation token shared between a caller and its pending requests
#[derive(Debug, Clone, Default)]
pub struct CancellationToken {
    inner: Arc<TokenState>,
}

#[derive(Debug, Default)]
struct TokenState {
    cancelled: AtomicBool,
    notify: Notify,
}

impl CancellationToken {
    /// Create a live token
    pub fn new() -> Self {
        Self::default()
    }

    /// Cancel every request holding a clone of this token
    pub fn cancel(&self) {
        self.inner.cancelled.store(true, Ordering::SeqCst);
        self.inner.notify.notify_waiters();
    }

    /// Check whether the token was cancelled
    pub fn is_cancelled(&self) -> bool {
        self.inner.cancelled.load(Ordering::SeqCst)
    }

    /// Resolve once the token is cancelled
    pub async fn cancelled(&self) {
        loop {
            let notified = self.inner.notify.notified();
            if self.is_cancelled() {
                return;
            }
            notified.await;
        }
    }
}

/// How long one kind of simulated call waits
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LatencyDelay {
    /// Always the same delay
    Fixed(Duration),
    /// Uniform in `[min, max)`
    Uniform {
        /// Inclusive lower bound
        min: Duration,
        /// Exclusive upper bound
        max: Duration,
    },
}

impl LatencyDelay {
    /// No delay at all
    pub const NONE: LatencyDelay = LatencyDelay::Fixed(Duration::ZERO);

    /// Pick a concrete delay
    pub fn sample(&self) -> Duration {
        match *self {
            LatencyDelay::Fixed(delay) => delay,
            LatencyDelay::Uniform { min, max } if max > min => {
                rand::thread_rng().gen_range(min..max)
            }
            LatencyDelay::Uniform { min, .. } => min,
        }
    }
}

/// Per-operation delays of the demo backend
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LatencyProfile {
    /// Health probe
    pub health: LatencyDelay,
    /// Document listing
    pub list_documents: LatencyDelay,
    /// Folder indexing
    pub index_folder: LatencyDelay,
    /// Chat answer ("thinking" time)
    pub chat: LatencyDelay,
}

impl LatencyProfile {
    /// Delays that mimic the real backend
    pub fn realistic() -> Self {
        Self {
            health: LatencyDelay::Fixed(Duration::from_millis(300)),
            list_documents: LatencyDelay::Fixed(Duration::from_millis(200)),
            index_folder: LatencyDelay::Fixed(Duration::from_secs(3)),
            chat: LatencyDelay::Uniform {
                min: Duration::from_secs(1),
                max: Duration::from_secs(2),
            },
        }
    }

    /// No delays; for tests and scripted use
    pub fn instant() -> Self {
        Self {
            health: LatencyDelay::NONE,
            list_documents: LatencyDelay::NONE,
            index_folder: LatencyDelay::NONE,
            chat: LatencyDelay::NONE,
        }
    }
}

impl Default for LatencyProfile {
    fn default() -> Self {
        Self::realistic()
    }
}

/// Wait for a sampled delay unless `cancel` fires first.
///
/// Returns the elapsed time. The delay is sampled before the first await, so
/// the thread-local RNG is never held across a suspension point.
pub async fn simulate_latency(delay: LatencyDelay, cancel: &CancellationToken) -> Result<Duration> {
    let wait = delay.sample();
    let started = Instant::now();
    if cancel.is_cancelled() {
        return Err(NotebookError::cancelled("request abandoned before it started"));
    }
    tokio::select! {
        _ = tokio::time::sleep(wait) => {
            let elapsed = started.elapsed();
            debug!("Simulated latency of {:?} elapsed", elapsed);
            Ok(elapsed)
        }
        _ = cancel.cancelled() => {
            debug!("Simulated latency cancelled after {:?}", started.elapsed());
            Err(NotebookError::cancelled("request abandoned while waiting"))
        }
    }
}

/// Run `future` under a caller-imposed deadline and cancellation token.
///
/// An expired deadline yields [`NotebookError::Timeout`], never a late answer.
pub async fn with_deadline<T, F>(
    timeout: Duration,
    cancel: &CancellationToken,
    future: F,
) -> Result<T>
where
    F: Future<Output = Result<T>>,
{
    tokio::select! {
        result = tokio::time::timeout(timeout, future) => match result {
            Ok(inner) => inner,
            Err(_) => Err(NotebookError::timeout(format!(
                "no answer within {:.1}s",
                timeout.as_secs_f64()
            ))),
        },
        _ = cancel.cancelled() => Err(NotebookError::cancelled("request abandoned by caller")),
    }
}
