//! Todo record, status machine and partial updates.

use chrono::{DateTime, NaiveDate, NaiveDateTime, TimeDelta, Utc};
use serde::{Deserialize, Serialize};

use super::errors::TodoError;
use super::ids::{TodoId, UserId};

/// Smallest step `updated_at` is pushed forward by on every update.
///
/// `DateTime<Utc>` resolves nanoseconds, so two updates inside the same
/// clock reading still produce strictly ordered timestamps.
pub const UPDATED_AT_TICK: TimeDelta = TimeDelta::nanoseconds(1);

/// Todo status.
///
/// State transitions:
/// - Pending -> ReminderDue (reminder sweep)
/// - Pending | ReminderDue -> Done (completion)
///
/// Done is terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TodoStatus {
    Pending,
    ReminderDue,
    Done,
}

impl TodoStatus {
    pub fn is_terminal(self) -> bool {
        matches!(self, TodoStatus::Done)
    }
}

/// A stored todo.
///
/// Values of this type handed out by a repository are owned copies; mutating
/// one never reaches back into the store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Todo {
    pub id: TodoId,
    pub user_id: UserId,
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub status: TodoStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub remind_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Todo {
    /// Build a freshly stored todo. `created_at == updated_at == now`.
    pub fn new(id: TodoId, data: NewTodo, now: DateTime<Utc>) -> Self {
        Self {
            id,
            user_id: data.user_id,
            title: data.title,
            description: data.description,
            status: data.status,
            remind_at: data.remind_at,
            created_at: now,
            updated_at: now,
        }
    }

    /// Is this todo a due reminder at `now`? (inclusive at the boundary)
    pub fn is_reminder_due(&self, now: DateTime<Utc>) -> bool {
        self.status == TodoStatus::Pending && self.remind_at.is_some_and(|at| at <= now)
    }

    /// Merge the provided fields and advance `updated_at`.
    ///
    /// `updated_at` becomes `max(patch.updated_at or now, previous + tick)`,
    /// so it strictly increases no matter what the caller or the clock says.
    ///
    /// Returns `false` (and changes nothing) when the patch carries an
    /// `expect_status` that does not match, or a `skip_status` that does.
    pub fn apply(&mut self, patch: TodoPatch, now: DateTime<Utc>) -> bool {
        if let Some(expected) = patch.expect_status
            && self.status != expected
        {
            return false;
        }
        if patch.skip_status == Some(self.status) {
            return false;
        }

        if let Some(title) = patch.title {
            self.title = title;
        }
        if let Some(description) = patch.description {
            self.description = description;
        }
        if let Some(status) = patch.status {
            self.status = status;
        }
        if let Some(remind_at) = patch.remind_at {
            self.remind_at = remind_at;
        }

        let requested = patch.updated_at.unwrap_or(now);
        self.updated_at = requested.max(self.updated_at + UPDATED_AT_TICK);
        true
    }
}

/// Everything a caller supplies to create a todo. The store assigns the rest.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewTodo {
    pub user_id: UserId,
    pub title: String,
    pub description: Option<String>,
    pub status: TodoStatus,
    pub remind_at: Option<DateTime<Utc>>,
}

/// Partial update for a todo.
///
/// `id`, `user_id` and `created_at` have no field here: they cannot be
/// changed through an update. For the nullable fields the outer `Option`
/// means "leave as is" and the inner one is the new value.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TodoPatch {
    pub title: Option<String>,
    pub description: Option<Option<String>>,
    pub status: Option<TodoStatus>,
    pub remind_at: Option<Option<DateTime<Utc>>>,
    pub updated_at: Option<DateTime<Utc>>,
    /// Only apply while the todo is still in this status.
    pub expect_status: Option<TodoStatus>,
    /// Leave the todo untouched when it is already in this status.
    pub skip_status: Option<TodoStatus>,
}

impl TodoPatch {
    pub fn status(status: TodoStatus) -> Self {
        Self {
            status: Some(status),
            ..Self::default()
        }
    }

    pub fn only_if(mut self, status: TodoStatus) -> Self {
        self.expect_status = Some(status);
        self
    }

    pub fn unless(mut self, status: TodoStatus) -> Self {
        self.skip_status = Some(status);
        self
    }
}

/// Date-like input accepted for `remindAt`.
///
/// JSON numbers are epoch milliseconds. Strings may be RFC 3339, a naive
/// `YYYY-MM-DDTHH:MM:SS[.fff]` (read as UTC) or a bare `YYYY-MM-DD`
/// (midnight UTC).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RemindAtInput {
    EpochMillis(i64),
    Text(String),
}

impl RemindAtInput {
    /// An empty or whitespace-only string counts as "no reminder".
    pub fn is_blank(&self) -> bool {
        matches!(self, RemindAtInput::Text(text) if text.trim().is_empty())
    }

    pub fn parse(&self) -> Result<DateTime<Utc>, TodoError> {
        match self {
            RemindAtInput::EpochMillis(ms) => DateTime::from_timestamp_millis(*ms)
                .ok_or_else(|| TodoError::InvalidRemindAt(ms.to_string())),
            RemindAtInput::Text(text) => parse_date_like(text),
        }
    }
}

impl From<DateTime<Utc>> for RemindAtInput {
    fn from(at: DateTime<Utc>) -> Self {
        RemindAtInput::Text(at.to_rfc3339())
    }
}

impl From<&str> for RemindAtInput {
    fn from(text: &str) -> Self {
        RemindAtInput::Text(text.to_string())
    }
}

fn parse_date_like(text: &str) -> Result<DateTime<Utc>, TodoError> {
    let text = text.trim();

    if let Ok(at) = DateTime::parse_from_rfc3339(text) {
        return Ok(at.with_timezone(&Utc));
    }
    for fmt in ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"] {
        if let Ok(naive) = NaiveDateTime::parse_from_str(text, fmt) {
            return Ok(naive.and_utc());
        }
    }
    if let Ok(date) = NaiveDate::parse_from_str(text, "%Y-%m-%d")
        && let Some(midnight) = date.and_hms_opt(0, 0, 0)
    {
        return Ok(midnight.and_utc());
    }

    Err(TodoError::InvalidRemindAt(text.to_string()))
}
