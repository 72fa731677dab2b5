//! Ports - 抽象化レイヤー
//!
//! service と scheduler が依存する境界を trait として定義します。
//! 実装は `impls`（in-memory store）と `app::scheduler`（tokio タイマー）にあります。

pub mod clock;
pub mod id_generator;
pub mod scheduler;
pub mod todo_repository;
pub mod user_repository;

pub use self::clock::{Clock, FixedClock, SystemClock};
pub use self::id_generator::{IdGenerator, UlidGenerator};
pub use self::scheduler::{RecurringTask, Scheduler, SchedulerError, TaskResult};
pub use self::todo_repository::TodoRepository;
pub use self::user_repository::UserRepository;
