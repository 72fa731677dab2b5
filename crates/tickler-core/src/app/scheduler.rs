//! IntervalScheduler - tokio タイマーによる Scheduler 実装
//!
//! # フロー（1 タスクあたり）
//! 1. 登録時に timer loop を spawn（最初の tick は 1 period 後）
//! 2. tick ごとに body を別タスクとして spawn
//! 3. 前回の body がまだ走っていれば、その tick は skip
//! 4. body の Err / panic は tracing とカウンタに記録するだけ
//!
//! stop は timer loop の終了を待ってから戻るので、戻った後に新しい tick が
//! 始まることはありません。走行中の body はキャンセルしません。

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use tokio::sync::{Mutex, watch};
use tokio::task::JoinHandle;
use tokio::time::{Instant, MissedTickBehavior};
use tracing::{debug, error, info};

use super::status::{TaskStatus, TickCounters};
use crate::ports::{RecurringTask, Scheduler, SchedulerError};

/// One registered timer.
struct TaskSlot {
    period: Duration,
    shutdown_tx: watch::Sender<bool>,
    timer: JoinHandle<()>,
    counters: Arc<TickCounters>,
}

impl TaskSlot {
    /// Signal the timer loop and wait until it has exited.
    async fn shutdown(self) {
        // ignore send error: the loop may already be gone
        let _ = self.shutdown_tx.send(true);
        let _ = self.timer.await;
    }
}

/// Scheduler owning one tokio timer per task name.
///
/// Dropping the scheduler drops every shutdown sender, which ends all timer
/// loops as well; `stop_all` is the explicit way to do the same and wait.
#[derive(Default)]
pub struct IntervalScheduler {
    slots: Mutex<HashMap<String, TaskSlot>>,
}

impl IntervalScheduler {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn status(&self, name: &str) -> Option<TaskStatus> {
        let slots = self.slots.lock().await;
        slots
            .get(name)
            .map(|slot| slot.counters.snapshot(slot.period))
    }

    /// Registered names, sorted.
    pub async fn task_names(&self) -> Vec<String> {
        let slots = self.slots.lock().await;
        let mut names: Vec<String> = slots.keys().cloned().collect();
        names.sort();
        names
    }
}

#[async_trait]
impl Scheduler for IntervalScheduler {
    async fn schedule_recurring(
        &self,
        name: &str,
        period: Duration,
        task: Arc<dyn RecurringTask>,
    ) -> Result<(), SchedulerError> {
        if period.is_zero() {
            return Err(SchedulerError::ZeroPeriod(name.to_string()));
        }

        let mut slots = self.slots.lock().await;
        // counters stay with the name so a body still running from the
        // replaced timer keeps the new timer's ticks skipped
        let counters = match slots.remove(name) {
            Some(previous) => {
                let counters = Arc::clone(&previous.counters);
                previous.shutdown().await;
                debug!(task = name, "replaced existing timer");
                counters
            }
            None => Arc::new(TickCounters::default()),
        };
        let (shutdown_tx, shutdown_rx) = watch::channel(false);
        let timer = tokio::spawn(timer_loop(
            name.to_string(),
            period,
            task,
            Arc::clone(&counters),
            shutdown_rx,
        ));

        slots.insert(
            name.to_string(),
            TaskSlot {
                period,
                shutdown_tx,
                timer,
                counters,
            },
        );
        info!(task = name, period_ms = period.as_millis() as u64, "recurring task scheduled");
        Ok(())
    }

    async fn stop(&self, name: &str) {
        let slot = self.slots.lock().await.remove(name);
        if let Some(slot) = slot {
            slot.shutdown().await;
            info!(task = name, "recurring task stopped");
        }
    }

    async fn stop_all(&self) {
        let drained: Vec<(String, TaskSlot)> = self.slots.lock().await.drain().collect();
        for (name, slot) in drained {
            slot.shutdown().await;
            info!(task = %name, "recurring task stopped");
        }
    }
}

async fn timer_loop(
    name: String,
    period: Duration,
    task: Arc<dyn RecurringTask>,
    counters: Arc<TickCounters>,
    mut shutdown_rx: watch::Receiver<bool>,
) {
    let mut ticker = tokio::time::interval_at(Instant::now() + period, period);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

    loop {
        tokio::select! {
            biased;
            changed = shutdown_rx.changed() => {
                // Err: the scheduler was dropped
                if changed.is_err() || *shutdown_rx.borrow() {
                    break;
                }
            }
            _ = ticker.tick() => {
                if *shutdown_rx.borrow() {
                    break;
                }
                fire(&name, &task, &counters);
            }
        }
    }

    debug!(task = %name, "timer loop exited");
}

/// Start one tick body unless the previous one is still running.
fn fire(name: &str, task: &Arc<dyn RecurringTask>, counters: &Arc<TickCounters>) {
    if !counters.try_begin() {
        debug!(task = name, "previous tick still running; skipping");
        return;
    }

    debug!(task = name, "running recurring task");
    let body = {
        let task = Arc::clone(task);
        tokio::spawn(async move { task.run().await })
    };

    let name = name.to_string();
    let counters = Arc::clone(counters);
    tokio::spawn(async move {
        let ok = match body.await {
            Ok(Ok(())) => true,
            Ok(Err(err)) => {
                error!(task = %name, error = %err, "recurring task failed");
                false
            }
            Err(join_err) if join_err.is_panic() => {
                error!(task = %name, "recurring task panicked");
                false
            }
            Err(join_err) => {
                error!(task = %name, error = %join_err, "recurring task was cancelled");
                false
            }
        };
        counters.finish(ok);
    });
}
