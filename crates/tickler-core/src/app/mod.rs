//! App - アプリケーション層
//!
//! ports を組み合わせてユースケースを実装します。
//!
//! # 主要コンポーネント
//! - **AppBuilder**: アプリケーションの構築とワイヤリング
//! - **TodoService**: todo の作成・完了・一覧とリマインダー掃引
//! - **UserService**: user の登録と一覧
//! - **IntervalScheduler**: 名前付きの定期タスク実行

pub mod builder;
pub mod scheduler;
pub mod status;
pub mod todo_service;
pub mod user_service;

// 主要な型を再エクスポート
pub use self::builder::{App, AppBuilder, BuildError, REMINDER_TASK};
pub use self::scheduler::IntervalScheduler;
pub use self::status::TaskStatus;
pub use self::todo_service::{CreateTodo, ReminderSweep, TodoService};
pub use self::user_service::UserService;
