//! TodoRepository port - todo の正本（source of truth）
//!
//! # 設計原則
//! - 各操作は単独でアトミック（操作をまたぐトランザクションはない）
//! - 出入りする値はすべて所有された copy（内部状態への参照は渡さない）
//! - 「見つからない」は `None`、エラーではない

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::domain::{NewTodo, RepositoryError, Todo, TodoId, TodoPatch, UserId};

#[async_trait]
pub trait TodoRepository: Send + Sync {
    /// Store a new todo with a fresh id and `created_at == updated_at == now`.
    async fn create(&self, data: NewTodo) -> Result<Todo, RepositoryError>;

    /// Merge `patch` into the stored todo. `Ok(None)` if the id is unknown.
    ///
    /// `updated_at` always ends up strictly greater than before. A patch whose
    /// `expect_status` does not match, or whose `skip_status` does, leaves the
    /// todo untouched and returns its current state.
    async fn update(&self, id: TodoId, patch: TodoPatch) -> Result<Option<Todo>, RepositoryError>;

    async fn find_by_id(&self, id: TodoId) -> Result<Option<Todo>, RepositoryError>;

    /// All todos of a user in insertion order, any status.
    async fn find_by_user_id(&self, user_id: UserId) -> Result<Vec<Todo>, RepositoryError>;

    /// Pending todos whose `remind_at <= now`.
    async fn find_due_reminders(&self, now: DateTime<Utc>) -> Result<Vec<Todo>, RepositoryError>;
}
