//! In-memory todo repository.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tokio::sync::Mutex;

use crate::domain::{NewTodo, RepositoryError, Todo, TodoId, TodoPatch, UserId};
use crate::ports::{Clock, IdGenerator, SystemClock, TodoRepository, UlidGenerator};

/// In-memory store state.
///
/// Design:
/// - `todos` is the single source of truth.
/// - `order` remembers insertion order for listing queries.
#[derive(Default)]
struct InMemoryTodoState {
    todos: HashMap<TodoId, Todo>,
    order: Vec<TodoId>,
}

impl InMemoryTodoState {
    fn insert(&mut self, todo: Todo) {
        self.order.push(todo.id);
        self.todos.insert(todo.id, todo);
    }

    fn in_order(&self) -> impl Iterator<Item = &Todo> {
        self.order.iter().filter_map(|id| self.todos.get(id))
    }
}

/// Todo repository backed by a mutex-guarded map.
///
/// Every operation takes the lock exactly once, so each one observes and
/// leaves a consistent snapshot. Values go in and come out by value.
pub struct InMemoryTodoRepository {
    state: Arc<Mutex<InMemoryTodoState>>,
    clock: Arc<dyn Clock>,
    ids: Arc<dyn IdGenerator>,
}

impl InMemoryTodoRepository {
    pub fn new() -> Self {
        Self::with_clock(Arc::new(SystemClock))
    }

    pub fn with_clock(clock: Arc<dyn Clock>) -> Self {
        let ids = Arc::new(UlidGenerator::new(Arc::clone(&clock)));
        Self::with_parts(clock, ids)
    }

    fn with_parts(clock: Arc<dyn Clock>, ids: Arc<dyn IdGenerator>) -> Self {
        Self {
            state: Arc::new(Mutex::new(InMemoryTodoState::default())),
            clock,
            ids,
        }
    }

    pub async fn len(&self) -> usize {
        self.state.lock().await.todos.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }
}

impl Default for InMemoryTodoRepository {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl TodoRepository for InMemoryTodoRepository {
    async fn create(&self, data: NewTodo) -> Result<Todo, RepositoryError> {
        let mut state = self.state.lock().await;
        let todo = Todo::new(self.ids.generate_todo_id(), data, self.clock.now());
        state.insert(todo.clone());
        Ok(todo)
    }

    async fn update(&self, id: TodoId, patch: TodoPatch) -> Result<Option<Todo>, RepositoryError> {
        let mut state = self.state.lock().await;
        let Some(todo) = state.todos.get_mut(&id) else {
            return Ok(None);
        };
        todo.apply(patch, self.clock.now());
        Ok(Some(todo.clone()))
    }

    async fn find_by_id(&self, id: TodoId) -> Result<Option<Todo>, RepositoryError> {
        let state = self.state.lock().await;
        Ok(state.todos.get(&id).cloned())
    }

    async fn find_by_user_id(&self, user_id: UserId) -> Result<Vec<Todo>, RepositoryError> {
        let state = self.state.lock().await;
        Ok(state
            .in_order()
            .filter(|todo| todo.user_id == user_id)
            .cloned()
            .collect())
    }

    async fn find_due_reminders(&self, now: DateTime<Utc>) -> Result<Vec<Todo>, RepositoryError> {
        let state = self.state.lock().await;
        Ok(state
            .in_order()
            .filter(|todo| todo.is_reminder_due(now))
            .cloned()
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::TodoStatus;
    use crate::ports::FixedClock;
    use chrono::{TimeDelta, TimeZone};
    use std::collections::HashSet;
    use ulid::Ulid;

    fn noon() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 1, 1, 12, 0, 0).unwrap()
    }

    fn fixed_repo() -> (Arc<FixedClock>, InMemoryTodoRepository) {
        let clock = Arc::new(FixedClock::new(noon()));
        let repo = InMemoryTodoRepository::with_clock(clock.clone());
        (clock, repo)
    }

    fn new_todo(user_id: UserId, title: &str, remind_at: Option<DateTime<Utc>>) -> NewTodo {
        NewTodo {
            user_id,
            title: title.to_string(),
            description: None,
            status: TodoStatus::Pending,
            remind_at,
        }
    }

    fn user() -> UserId {
        UserId::from_ulid(Ulid::new())
    }

    #[tokio::test]
    async fn create_assigns_id_and_timestamps() {
        let (_, repo) = fixed_repo();

        let todo = repo.create(new_todo(user(), "a", None)).await.unwrap();

        assert_eq!(todo.created_at, noon());
        assert_eq!(todo.updated_at, noon());
        assert_eq!(repo.find_by_id(todo.id).await.unwrap(), Some(todo));
    }

    #[tokio::test]
    async fn update_unknown_id_returns_none() {
        let (_, repo) = fixed_repo();
        let missing = TodoId::from_ulid(Ulid::new());

        let result = repo
            .update(missing, TodoPatch::status(TodoStatus::Done))
            .await
            .unwrap();

        assert!(result.is_none());
        assert!(repo.is_empty().await);
    }

    #[tokio::test]
    async fn back_to_back_updates_strictly_increase_updated_at() {
        let (_, repo) = fixed_repo();
        let todo = repo.create(new_todo(user(), "a", None)).await.unwrap();

        let first = repo.update(todo.id, TodoPatch::default()).await.unwrap().unwrap();
        let second = repo.update(todo.id, TodoPatch::default()).await.unwrap().unwrap();

        assert!(first.updated_at > todo.updated_at);
        assert!(second.updated_at > first.updated_at);
        assert_eq!(second.created_at, todo.created_at);
    }

    #[tokio::test]
    async fn update_follows_the_clock_when_it_moves() {
        let (clock, repo) = fixed_repo();
        let todo = repo.create(new_todo(user(), "a", None)).await.unwrap();

        clock.advance(TimeDelta::minutes(3));
        let updated = repo
            .update(todo.id, TodoPatch::status(TodoStatus::Done))
            .await
            .unwrap()
            .unwrap();

        assert_eq!(updated.updated_at, noon() + TimeDelta::minutes(3));
        assert_eq!(updated.status, TodoStatus::Done);
    }

    #[tokio::test]
    async fn guarded_update_does_not_touch_a_moved_todo() {
        let (_, repo) = fixed_repo();
        let todo = repo.create(new_todo(user(), "a", Some(noon()))).await.unwrap();
        let done = repo
            .update(todo.id, TodoPatch::status(TodoStatus::Done))
            .await
            .unwrap()
            .unwrap();

        let after = repo
            .update(
                todo.id,
                TodoPatch::status(TodoStatus::ReminderDue).only_if(TodoStatus::Pending),
            )
            .await
            .unwrap()
            .unwrap();

        assert_eq!(after, done);
    }

    #[tokio::test]
    async fn returned_values_are_independent_copies() {
        let (_, repo) = fixed_repo();
        let created = repo.create(new_todo(user(), "original", None)).await.unwrap();

        let mut a = repo.find_by_id(created.id).await.unwrap().unwrap();
        let b = repo.find_by_id(created.id).await.unwrap().unwrap();
        a.title = "mutated".into();
        a.status = TodoStatus::Done;

        assert_eq!(b.title, "original");
        let stored = repo.find_by_id(created.id).await.unwrap().unwrap();
        assert_eq!(stored.title, "original");
        assert_eq!(stored.status, TodoStatus::Pending);
    }

    #[tokio::test]
    async fn earlier_copies_do_not_see_later_updates() {
        let (_, repo) = fixed_repo();
        let created = repo.create(new_todo(user(), "a", None)).await.unwrap();
        let before = repo.find_by_id(created.id).await.unwrap().unwrap();

        repo.update(created.id, TodoPatch::status(TodoStatus::Done))
            .await
            .unwrap();

        assert_eq!(before.status, TodoStatus::Pending);
        assert_eq!(before.updated_at, created.updated_at);
    }

    #[tokio::test]
    async fn find_by_user_id_keeps_insertion_order_and_all_statuses() {
        let (_, repo) = fixed_repo();
        let alice = user();
        let bob = user();

        let first = repo.create(new_todo(alice, "first", None)).await.unwrap();
        repo.create(new_todo(bob, "other", None)).await.unwrap();
        let second = repo.create(new_todo(alice, "second", None)).await.unwrap();
        repo.update(first.id, TodoPatch::status(TodoStatus::Done))
            .await
            .unwrap();

        let titles: Vec<String> = repo
            .find_by_user_id(alice)
            .await
            .unwrap()
            .into_iter()
            .map(|todo| todo.title)
            .collect();

        assert_eq!(titles, vec!["first".to_string(), "second".to_string()]);
        assert!(repo.find_by_user_id(user()).await.unwrap().is_empty());
        assert_ne!(first.id, second.id);
    }

    #[tokio::test]
    async fn find_due_reminders_is_inclusive_and_pending_only() {
        let (_, repo) = fixed_repo();
        let owner = user();
        let now = noon();

        let overdue = repo
            .create(new_todo(owner, "overdue", Some(now - TimeDelta::seconds(1))))
            .await
            .unwrap();
        let exact = repo
            .create(new_todo(owner, "exact", Some(now)))
            .await
            .unwrap();
        repo.create(new_todo(owner, "future", Some(now + TimeDelta::seconds(1))))
            .await
            .unwrap();
        repo.create(new_todo(owner, "no reminder", None)).await.unwrap();
        let done = repo
            .create(new_todo(owner, "done", Some(now - TimeDelta::hours(1))))
            .await
            .unwrap();
        repo.update(done.id, TodoPatch::status(TodoStatus::Done))
            .await
            .unwrap();

        let due: Vec<TodoId> = repo
            .find_due_reminders(now)
            .await
            .unwrap()
            .into_iter()
            .map(|todo| todo.id)
            .collect();

        assert_eq!(due, vec![overdue.id, exact.id]);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn concurrent_creates_are_all_kept() {
        let repo = Arc::new(InMemoryTodoRepository::new());
        let owner = user();

        let mut joins = Vec::new();
        for i in 0..64 {
            let repo = Arc::clone(&repo);
            joins.push(tokio::spawn(async move {
                repo.create(new_todo(owner, &format!("todo {i}"), None))
                    .await
                    .unwrap()
                    .id
            }));
        }

        let mut ids = HashSet::new();
        for join in joins {
            ids.insert(join.await.unwrap());
        }

        assert_eq!(ids.len(), 64);
        assert_eq!(repo.find_by_user_id(owner).await.unwrap().len(), 64);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn concurrent_updates_never_reuse_a_timestamp() {
        let (_, repo) = fixed_repo();
        let repo = Arc::new(repo);
        let todo = repo.create(new_todo(user(), "hot", None)).await.unwrap();

        let mut joins = Vec::new();
        for _ in 0..32 {
            let repo = Arc::clone(&repo);
            joins.push(tokio::spawn(async move {
                repo.update(todo.id, TodoPatch::default())
                    .await
                    .unwrap()
                    .unwrap()
                    .updated_at
            }));
        }

        let mut stamps = HashSet::new();
        for join in joins {
            stamps.insert(join.await.unwrap());
        }

        assert_eq!(stamps.len(), 32);
        let last = repo.find_by_id(todo.id).await.unwrap().unwrap();
        assert_eq!(last.updated_at, noon() + crate::domain::UPDATED_AT_TICK * 32);
    }
}
