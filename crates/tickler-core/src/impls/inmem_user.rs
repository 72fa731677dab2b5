//! In-memory user repository.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::Mutex;

use crate::domain::{NewUser, RepositoryError, User, UserId};
use crate::ports::{Clock, IdGenerator, SystemClock, UlidGenerator, UserRepository};

#[derive(Default)]
struct InMemoryUserState {
    users: HashMap<UserId, User>,
    order: Vec<UserId>,
}

/// User repository with the same copy-in/copy-out contract as
/// [`InMemoryTodoRepository`](super::InMemoryTodoRepository).
pub struct InMemoryUserRepository {
    state: Arc<Mutex<InMemoryUserState>>,
    clock: Arc<dyn Clock>,
    ids: Arc<dyn IdGenerator>,
}

impl InMemoryUserRepository {
    pub fn new() -> Self {
        Self::with_clock(Arc::new(SystemClock))
    }

    pub fn with_clock(clock: Arc<dyn Clock>) -> Self {
        let ids = Arc::new(UlidGenerator::new(Arc::clone(&clock)));
        Self {
            state: Arc::new(Mutex::new(InMemoryUserState::default())),
            clock,
            ids,
        }
    }
}

impl Default for InMemoryUserRepository {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl UserRepository for InMemoryUserRepository {
    async fn create(&self, data: NewUser) -> Result<User, RepositoryError> {
        let mut state = self.state.lock().await;
        let user = User::new(self.ids.generate_user_id(), data, self.clock.now());
        state.order.push(user.id);
        state.users.insert(user.id, user.clone());
        Ok(user)
    }

    async fn find_by_id(&self, id: UserId) -> Result<Option<User>, RepositoryError> {
        let state = self.state.lock().await;
        Ok(state.users.get(&id).cloned())
    }

    async fn find_all(&self) -> Result<Vec<User>, RepositoryError> {
        let state = self.state.lock().await;
        Ok(state
            .order
            .iter()
            .filter_map(|id| state.users.get(id))
            .cloned()
            .collect())
    }
}
