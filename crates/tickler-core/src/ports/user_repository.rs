//! UserRepository port
//!
//! TodoRepository と同じ copy 分離の契約。更新・削除はありません。

use async_trait::async_trait;

use crate::domain::{NewUser, RepositoryError, User, UserId};

#[async_trait]
pub trait UserRepository: Send + Sync {
    async fn create(&self, data: NewUser) -> Result<User, RepositoryError>;

    async fn find_by_id(&self, id: UserId) -> Result<Option<User>, RepositoryError>;

    /// All users in insertion order.
    async fn find_all(&self) -> Result<Vec<User>, RepositoryError>;
}
