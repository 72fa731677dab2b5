//! TodoService - todo のユースケース
//!
//! 入力検証、user の存在確認、reminder sweep をまとめます。
//! 状態の変更はすべて repository 経由で行い、service 自身は状態を持ちません。

use std::sync::Arc;

use serde::Serialize;
use tracing::{debug, info, warn};

use crate::domain::{
    NewTodo, RemindAtInput, Todo, TodoError, TodoId, TodoPatch, TodoStatus, UserId,
};
use crate::ports::{Clock, SystemClock, TodoRepository, UserRepository};

/// Input for [`TodoService::create_todo`].
#[derive(Debug, Clone)]
pub struct CreateTodo {
    pub user_id: UserId,
    pub title: String,
    pub description: Option<String>,
    pub remind_at: Option<RemindAtInput>,
}

/// What one reminder sweep did.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct ReminderSweep {
    /// Todos that were due when the sweep started.
    pub due: usize,
    /// Todos moved to `REMINDER_DUE`.
    pub promoted: usize,
    /// Todos that changed status between the query and the update.
    pub skipped: usize,
    /// Todos whose update failed.
    pub failed: usize,
}

pub struct TodoService {
    todos: Arc<dyn TodoRepository>,
    users: Arc<dyn UserRepository>,
    clock: Arc<dyn Clock>,
}

impl TodoService {
    pub fn new(todos: Arc<dyn TodoRepository>, users: Arc<dyn UserRepository>) -> Self {
        Self::with_clock(todos, users, Arc::new(SystemClock))
    }

    pub fn with_clock(
        todos: Arc<dyn TodoRepository>,
        users: Arc<dyn UserRepository>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            todos,
            users,
            clock,
        }
    }

    /// Create a pending todo for an existing user.
    ///
    /// Checks run in order: title, remind_at, user.
    pub async fn create_todo(&self, input: CreateTodo) -> Result<Todo, TodoError> {
        if input.title.trim().is_empty() {
            return Err(TodoError::EmptyTitle);
        }
        let remind_at = input
            .remind_at
            .as_ref()
            .filter(|input| !input.is_blank())
            .map(RemindAtInput::parse)
            .transpose()?;

        if self.users.find_by_id(input.user_id).await?.is_none() {
            return Err(TodoError::UserNotFound(input.user_id.to_string()));
        }

        let todo = self
            .todos
            .create(NewTodo {
                user_id: input.user_id,
                title: input.title,
                description: input.description,
                status: TodoStatus::Pending,
                remind_at,
            })
            .await?;

        debug!(todo_id = %todo.id, user_id = %todo.user_id, "todo created");
        Ok(todo)
    }

    /// Mark a todo as done. Completing a done todo returns it unchanged.
    pub async fn complete_todo(&self, id: TodoId) -> Result<Todo, TodoError> {
        let Some(todo) = self.todos.find_by_id(id).await? else {
            return Err(TodoError::TodoNotFound(id.to_string()));
        };

        if todo.status.is_terminal() {
            return Ok(todo);
        }

        // a concurrent completion may have won since the read above
        let updated = self
            .todos
            .update(id, TodoPatch::status(TodoStatus::Done).unless(TodoStatus::Done))
            .await?
            .ok_or(TodoError::Inconsistent(id))?;

        debug!(todo_id = %id, "todo completed");
        Ok(updated)
    }

    /// All todos of `user_id`. Unknown users simply have none.
    pub async fn get_todos_by_user(&self, user_id: UserId) -> Result<Vec<Todo>, TodoError> {
        Ok(self.todos.find_by_user_id(user_id).await?)
    }

    /// Promote every pending todo whose reminder time has passed.
    ///
    /// The clock is read once; each todo is updated on its own and a failure
    /// on one does not stop the others.
    pub async fn process_reminders(&self) -> Result<ReminderSweep, TodoError> {
        let now = self.clock.now();
        let due = self.todos.find_due_reminders(now).await?;

        let mut sweep = ReminderSweep {
            due: due.len(),
            ..ReminderSweep::default()
        };

        for todo in due {
            let patch = TodoPatch::status(TodoStatus::ReminderDue).only_if(TodoStatus::Pending);
            match self.todos.update(todo.id, patch).await {
                Ok(Some(updated)) if updated.status == TodoStatus::ReminderDue => {
                    sweep.promoted += 1;
                }
                Ok(Some(updated)) => {
                    debug!(todo_id = %todo.id, status = ?updated.status, "todo moved on before promotion");
                    sweep.skipped += 1;
                }
                Ok(None) => {
                    warn!(todo_id = %todo.id, "due todo disappeared before promotion");
                    sweep.failed += 1;
                }
                Err(err) => {
                    warn!(todo_id = %todo.id, error = %err, "failed to promote due todo");
                    sweep.failed += 1;
                }
            }
        }

        if sweep.due > 0 {
            info!(
                due = sweep.due,
                promoted = sweep.promoted,
                skipped = sweep.skipped,
                failed = sweep.failed,
                "reminder sweep finished"
            );
        }
        Ok(sweep)
    }
}
