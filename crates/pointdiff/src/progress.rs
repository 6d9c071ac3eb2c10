//! progress reporting for the per-point loops
//!
use std::sync::atomic::{AtomicUsize, Ordering};

use tracing::info;

/// number of progress updates emitted over the course of one loop
const UPDATES_PER_LOOP: usize = 20;

/// Receives progress updates from the buffering and comparison loops.
///
/// Updates may arrive from multiple threads and, as the loops run in parallel,
/// not necessarily in increasing order of `done`.
pub trait ProgressObserver: Sync {
    fn update(&self, label: &str, done: usize, total: usize);
}

/// discards all updates
pub struct NoProgress;

impl ProgressObserver for NoProgress {
    fn update(&self, _label: &str, _done: usize, _total: usize) {}
}

/// writes updates to the log
pub struct LogProgress;

impl ProgressObserver for LogProgress {
    fn update(&self, label: &str, done: usize, total: usize) {
        let percent = if total == 0 {
            100.0
        } else {
            done as f64 * 100.0 / total as f64
        };
        info!("{}: {}/{} ({:.0}%)", label, done, total, percent);
    }
}

/// Counts processed items of one loop and forwards every
/// `total / UPDATES_PER_LOOP`-th count and the final one to an observer.
pub(crate) struct ProgressTracker<'a> {
    observer: &'a dyn ProgressObserver,
    label: String,
    total: usize,
    step: usize,
    done: AtomicUsize,
}

impl<'a> ProgressTracker<'a> {
    pub fn new(observer: &'a dyn ProgressObserver, label: String, total: usize) -> Self {
        Self {
            observer,
            label,
            total,
            step: ((total + UPDATES_PER_LOOP - 1) / UPDATES_PER_LOOP).max(1),
            done: AtomicUsize::new(0),
        }
    }

    pub fn tick(&self) {
        let done = self.done.fetch_add(1, Ordering::Relaxed) + 1;
        if done % self.step == 0 || done == self.total {
            self.observer.update(&self.label, done, self.total);
        }
    }
}
