//! Impls - ports の in-memory 実装
//!
//! プロセスの寿命だけ保持されるストアです。再起動で内容は消えます。

pub mod inmem_todo;
pub mod inmem_user;

pub use self::inmem_todo::InMemoryTodoRepository;
pub use self::inmem_user::InMemoryUserRepository;
