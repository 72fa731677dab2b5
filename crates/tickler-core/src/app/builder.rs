//! AppBuilder - アプリケーションの構築とワイヤリング
//!
//! repository・service・scheduler を組み立てて `App` を返します。
//! 設定値の検証は build() で行います（Fail-fast）。

use std::sync::Arc;
use std::time::Duration;

use tracing::info;

use super::scheduler::IntervalScheduler;
use super::todo_service::TodoService;
use super::user_service::UserService;
use crate::impls::{InMemoryTodoRepository, InMemoryUserRepository};
use crate::ports::{Clock, Scheduler, SchedulerError, SystemClock, TaskResult};

/// Name the reminder sweep is registered under.
pub const REMINDER_TASK: &str = "process-due-reminders";

pub const DEFAULT_REMINDER_INTERVAL: Duration = Duration::from_secs(15);

#[derive(Debug, thiserror::Error)]
pub enum BuildError {
    #[error("reminder interval must be greater than zero")]
    ZeroReminderInterval,
}

/// # 使用例
/// ```ignore
/// let app = AppBuilder::new()
///     .reminder_interval(Duration::from_secs(15))
///     .build()?;
/// app.start().await?;
/// ```
pub struct AppBuilder {
    clock: Arc<dyn Clock>,
    reminder_interval: Duration,
}

impl AppBuilder {
    pub fn new() -> Self {
        Self {
            clock: Arc::new(SystemClock),
            reminder_interval: DEFAULT_REMINDER_INTERVAL,
        }
    }

    pub fn clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    pub fn reminder_interval(mut self, interval: Duration) -> Self {
        self.reminder_interval = interval;
        self
    }

    pub fn build(self) -> Result<App, BuildError> {
        if self.reminder_interval.is_zero() {
            return Err(BuildError::ZeroReminderInterval);
        }

        let todos = Arc::new(InMemoryTodoRepository::with_clock(Arc::clone(&self.clock)));
        let users = Arc::new(InMemoryUserRepository::with_clock(Arc::clone(&self.clock)));

        Ok(App {
            todos: Arc::new(TodoService::with_clock(
                todos,
                users.clone(),
                Arc::clone(&self.clock),
            )),
            users: Arc::new(UserService::new(users)),
            scheduler: Arc::new(IntervalScheduler::new()),
            reminder_interval: self.reminder_interval,
        })
    }
}

impl Default for AppBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// The wired application: services plus the scheduler that drives the sweep.
pub struct App {
    pub todos: Arc<TodoService>,
    pub users: Arc<UserService>,
    pub scheduler: Arc<IntervalScheduler>,
    reminder_interval: Duration,
}

impl App {
    pub fn reminder_interval(&self) -> Duration {
        self.reminder_interval
    }

    /// Register the reminder sweep with the scheduler.
    pub async fn start(&self) -> Result<(), SchedulerError> {
        let service = Arc::clone(&self.todos);
        let sweep = move || {
            let service = Arc::clone(&service);
            async move {
                service.process_reminders().await?;
                TaskResult::Ok(())
            }
        };

        self.scheduler
            .schedule_recurring(REMINDER_TASK, self.reminder_interval, Arc::new(sweep))
            .await?;
        info!(
            interval_secs = self.reminder_interval.as_secs_f64(),
            "reminder sweep scheduled"
        );
        Ok(())
    }

    /// Stop every scheduled task. Requests already in flight are unaffected.
    pub async fn shutdown(&self) {
        self.scheduler.stop_all().await;
    }
}
