//! Domain model (ids, users, todos, errors).

pub mod errors;
pub mod ids;
pub mod todo;
pub mod user;

pub use self::errors::{ErrorKind, RepositoryError, TodoError};
pub use self::ids::{Id, IdMarker, ParseIdError, TodoId, UserId};
pub use self::todo::{NewTodo, RemindAtInput, Todo, TodoPatch, TodoStatus, UPDATED_AT_TICK};
pub use self::user::{NewUser, User};
