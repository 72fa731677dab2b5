//! Status - 定期タスクの観測用カウンタ

use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Snapshot of one registered recurring task.
///
/// Counters belong to the task name and carry over when it is re-registered.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaskStatus {
    pub period: Duration,
    /// Ticks whose body was started.
    pub started: u64,
    pub succeeded: u64,
    /// Ticks whose body returned an error or panicked.
    pub failed: u64,
    /// Ticks dropped because the previous body was still running.
    pub skipped: u64,
    pub running: bool,
}

/// Live counters shared between a timer loop and its tick bodies.
#[derive(Debug, Default)]
pub(crate) struct TickCounters {
    started: AtomicU64,
    succeeded: AtomicU64,
    failed: AtomicU64,
    skipped: AtomicU64,
    running: AtomicBool,
}

impl TickCounters {
    /// Claim the running slot. `false` means a body is already in flight.
    pub(crate) fn try_begin(&self) -> bool {
        if self.running.swap(true, Ordering::AcqRel) {
            self.skipped.fetch_add(1, Ordering::Relaxed);
            return false;
        }
        self.started.fetch_add(1, Ordering::Relaxed);
        true
    }

    pub(crate) fn finish(&self, ok: bool) {
        if ok {
            self.succeeded.fetch_add(1, Ordering::Relaxed);
        } else {
            self.failed.fetch_add(1, Ordering::Relaxed);
        }
        self.running.store(false, Ordering::Release);
    }

    pub(crate) fn snapshot(&self, period: Duration) -> TaskStatus {
        TaskStatus {
            period,
            started: self.started.load(Ordering::Relaxed),
            succeeded: self.succeeded.load(Ordering::Relaxed),
            failed: self.failed.load(Ordering::Relaxed),
            skipped: self.skipped.load(Ordering::Relaxed),
            running: self.running.load(Ordering::Acquire),
        }
    }
}
