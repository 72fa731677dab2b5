//! UserService - user の登録と一覧

use std::sync::Arc;

use tracing::debug;

use crate::domain::{NewUser, TodoError, User};
use crate::ports::UserRepository;

pub struct UserService {
    users: Arc<dyn UserRepository>,
}

impl UserService {
    pub fn new(users: Arc<dyn UserRepository>) -> Self {
        Self { users }
    }

    /// Register a user. Both fields must be non-blank.
    pub async fn register_user(&self, email: String, name: String) -> Result<User, TodoError> {
        if email.trim().is_empty() {
            return Err(TodoError::MissingField("email"));
        }
        if name.trim().is_empty() {
            return Err(TodoError::MissingField("name"));
        }

        let user = self.users.create(NewUser { email, name }).await?;
        debug!(user_id = %user.id, "user registered");
        Ok(user)
    }

    pub async fn list_users(&self) -> Result<Vec<User>, TodoError> {
        Ok(self.users.find_all().await?)
    }
}
