//! Errors - エラー型と分類
//!
//! Repository は「見つからない」を `Option::None` で返し、エラーにはしません。
//! それをエラーとみなすかどうかは service 層が決めます。

use thiserror::Error;

use super::ids::TodoId;

/// ErrorKind は境界（HTTP など）での分類
///
/// - Validation: 入力が不正（400）
/// - NotFound: 参照先が存在しない（404）
/// - Internal: 内部の不整合や backend の障害（500、詳細は外に出さない）
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Validation,
    NotFound,
    Internal,
}

/// Backend-level storage fault.
///
/// The in-memory repositories never produce one; the variant exists so
/// other backends can report failures through the same port.
#[derive(Debug, Error)]
pub enum RepositoryError {
    #[error("repository unavailable: {0}")]
    Unavailable(String),
}

#[derive(Debug, Error)]
pub enum TodoError {
    #[error("Title must be a non-empty string")]
    EmptyTitle,

    #[error("{0} is required")]
    MissingField(&'static str),

    #[error("remindAt is not a valid date: {0:?}")]
    InvalidRemindAt(String),

    #[error("User not found")]
    UserNotFound(String),

    #[error("Todo not found")]
    TodoNotFound(String),

    /// An update missed an id that was read a moment earlier.
    #[error("todo {0} disappeared during update")]
    Inconsistent(TodoId),

    #[error(transparent)]
    Repository(#[from] RepositoryError),
}

impl TodoError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            TodoError::EmptyTitle
            | TodoError::MissingField(_)
            | TodoError::InvalidRemindAt(_) => ErrorKind::Validation,
            TodoError::UserNotFound(_) | TodoError::TodoNotFound(_) => ErrorKind::NotFound,
            TodoError::Inconsistent(_) | TodoError::Repository(_) => ErrorKind::Internal,
        }
    }
}
