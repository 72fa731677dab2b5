//! Scheduler port - 名前付きの定期実行タスク
//!
//! todo 固有の知識は持たない汎用の抽象です。
//!
//! # 契約
//! - 名前ごとにタイマーは最大 1 本（再登録は置き換え）
//! - 各 tick は隔離される（失敗・panic は報告のみで、スケジューラは止まらない）
//! - 未登録の名前の stop は no-op
//! - stop_all 後はどの tick も発火しない

use std::error::Error;
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use thiserror::Error;

/// Result of one tick of a recurring task.
pub type TaskResult = Result<(), Box<dyn Error + Send + Sync>>;

/// Body of a recurring task.
///
/// Any `Fn() -> impl Future<Output = TaskResult>` closure is a task.
#[async_trait]
pub trait RecurringTask: Send + Sync + 'static {
    async fn run(&self) -> TaskResult;
}

#[async_trait]
impl<F, Fut> RecurringTask for F
where
    F: Fn() -> Fut + Send + Sync + 'static,
    Fut: Future<Output = TaskResult> + Send + 'static,
{
    async fn run(&self) -> TaskResult {
        (self)().await
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum SchedulerError {
    #[error("recurring task {0:?} needs a non-zero period")]
    ZeroPeriod(String),
}

#[async_trait]
pub trait Scheduler: Send + Sync {
    /// Run `task` every `period`, first tick one period from now.
    ///
    /// Registering a name that is already active stops the old timer first.
    async fn schedule_recurring(
        &self,
        name: &str,
        period: Duration,
        task: Arc<dyn RecurringTask>,
    ) -> Result<(), SchedulerError>;

    /// Stop the timer registered under `name`. Unknown names are ignored.
    async fn stop(&self, name: &str);

    /// Stop every timer. In-flight tick bodies are left to finish.
    async fn stop_all(&self);
}
