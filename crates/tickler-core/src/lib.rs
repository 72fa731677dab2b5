//! tickler-core
//!
//! Core building blocks for the Tickler todo reminder service.
//!
//! # モジュール構成
//! - **domain**: ドメインモデル（ids, todo, user, errors）
//! - **ports**: 抽象化レイヤー（TodoRepository, UserRepository, Clock, IdGenerator, Scheduler）
//! - **impls**: 実装（InMemoryTodoRepository, InMemoryUserRepository）
//! - **app**: アプリケーションロジック（builder, todo_service, user_service, scheduler）

pub mod app;
pub mod domain;
pub mod impls;
pub mod ports;
